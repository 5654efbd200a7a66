use tracing::info;

use crate::{
    config::Settings,
    models::{listing::Listing, quote::Quote},
    utils::{price::compute_quote, quantity::clamp_quantity},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuote {
    pub quantity: u32,
    pub quote: Quote,
}

/// Quotes a listing for a raw participant selection. The selection is first
/// clamped to the listing's bounds (or the configured cap when the listing
/// sets none), then priced at the configured tax rate.
pub fn handle_quote(
    listing: &Listing,
    requested_quantity: i64,
    settings: &Settings,
) -> ListingQuote {
    let max = listing.max_participants(settings.max_participants);
    let quantity = clamp_quantity(requested_quantity, max);
    let quote = compute_quote(listing.unit_price(), quantity, settings.tax_rate);

    info!(
        "quote listing={} quantity={} total={}",
        listing.id,
        quantity,
        quote.display_total_string()
    );

    ListingQuote { quantity, quote }
}
