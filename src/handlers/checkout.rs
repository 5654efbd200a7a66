use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    clients::{
        AuthProvider, COLLECTION_BOOKINGS, COLLECTION_LISTINGS, CheckoutWidget, ClientError,
        DocumentStore, EmailSender,
    },
    config::Settings,
    handlers::quote::handle_quote,
    models::{
        booking::{Booking, BookingStatus},
        listing::Listing,
    },
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("No signed-in user")]
    Unauthenticated,

    #[error("Listing not found: {0}")]
    ListingNotFound(String),

    #[error("Payment was not completed (status {0})")]
    PaymentNotCompleted(String),

    #[error("Failed to encode booking: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Client request failed: {0}")]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub listing_id: String,
    pub quantity: i64,
}

pub struct CheckoutClients<'a, S, A, C, E> {
    pub store: &'a S,
    pub auth: &'a A,
    pub checkout: &'a C,
    pub email: &'a E,
}

pub async fn handle_checkout<S, A, C, E>(
    clients: CheckoutClients<'_, S, A, C, E>,
    settings: &Settings,
    request: CheckoutRequest,
) -> Result<Booking, CheckoutError>
where
    S: DocumentStore,
    A: AuthProvider,
    C: CheckoutWidget,
    E: EmailSender,
{
    let guest = clients
        .auth
        .current_user()
        .await?
        .ok_or(CheckoutError::Unauthenticated)?;

    let doc = clients
        .store
        .get(COLLECTION_LISTINGS, &request.listing_id)
        .await?
        .ok_or_else(|| CheckoutError::ListingNotFound(request.listing_id.clone()))?;
    let listing = Listing::from_document(&request.listing_id, doc);

    let priced = handle_quote(&listing, request.quantity, settings);

    let capture = clients
        .checkout
        .capture(priced.quote.display_total(), &settings.currency)
        .await?;

    if !capture.is_completed() {
        warn!(
            "checkout listing={} capture={} status={}",
            listing.id, capture.id, capture.status
        );
        return Err(CheckoutError::PaymentNotCompleted(capture.status));
    }

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        listing_id: listing.id.clone(),
        guest_id: guest.id.clone(),
        quantity: priced.quantity,
        quote: priced.quote,
        capture_id: capture.id,
        status: BookingStatus::Confirmed,
    };

    let record = booking.to_document()?;
    clients
        .store
        .set(COLLECTION_BOOKINGS, &booking.id, record)
        .await?;

    info!("booking {} created for listing {}", booking.id, listing.id);

    let params = confirmation_params(&listing, &booking, guest.email.as_deref());
    if let Err(e) = clients
        .email
        .send(&settings.email.confirmation_template, &params)
        .await
    {
        warn!("booking {} confirmation email not sent: {e}", booking.id);
    }

    Ok(booking)
}

fn confirmation_params(
    listing: &Listing,
    booking: &Booking,
    guest_email: Option<&str>,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("listingTitle".to_string(), listing.title().to_string()),
        ("quantity".to_string(), booking.quantity.to_string()),
        ("subtotal".to_string(), format!("{:.2}", booking.quote.subtotal)),
        ("tax".to_string(), format!("{:.2}", booking.quote.tax)),
        ("total".to_string(), booking.quote.display_total_string()),
        ("bookingId".to_string(), booking.id.clone()),
        (
            "guestEmail".to_string(),
            guest_email.unwrap_or_default().to_string(),
        ),
    ])
}
