use booking_quote::{
    clients::{
        COLLECTION_BOOKINGS, COLLECTION_LISTINGS, ClientError, DocumentStore,
        memory::{MemoryDocumentStore, MemoryEmailSender, MockCheckout, StaticAuth},
    },
    config::Settings,
    handlers::checkout::{CheckoutClients, CheckoutError, CheckoutRequest, handle_checkout},
    models::booking::BookingStatus,
};
use serde_json::{Value, json};

async fn store_with_listing(doc: Value) -> MemoryDocumentStore {
    let store = MemoryDocumentStore::new();
    let Value::Object(doc) = doc else {
        panic!("expected object")
    };
    store.insert(COLLECTION_LISTINGS, "kayak", doc).await;
    store
}

fn request(quantity: i64) -> CheckoutRequest {
    CheckoutRequest {
        listing_id: "kayak".to_string(),
        quantity,
    }
}

#[tokio::test]
async fn completed_capture_creates_booking_and_sends_email() {
    let store = store_with_listing(json!({
        "title": "Harbour kayak tour",
        "price": "100",
        "maxParticipants": 3,
    }))
    .await;
    let auth = StaticAuth::signed_in("guest-1", Some("guest@example.com"));
    let checkout = MockCheckout::completing();
    let email = MemoryEmailSender::new();
    let settings = Settings::default();

    let booking = handle_checkout(
        CheckoutClients {
            store: &store,
            auth: &auth,
            checkout: &checkout,
            email: &email,
        },
        &settings,
        request(5),
    )
    .await
    .unwrap();

    assert_eq!(booking.quantity, 3);
    assert_eq!(booking.guest_id, "guest-1");
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert!((booking.quote.total - 336.0).abs() < 1e-9);

    let captures = checkout.captures().await;
    assert_eq!(captures, vec![(336.0, "USD".to_string())]);

    let stored = store
        .get(COLLECTION_BOOKINGS, &booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["listingId"], json!("kayak"));
    assert_eq!(stored["captureId"], json!(booking.capture_id));

    let sent = email.sent().await;
    assert_eq!(sent.len(), 1);
    let (template, params) = &sent[0];
    assert_eq!(template, "booking_confirmation");
    assert_eq!(params["listingTitle"], "Harbour kayak tour");
    assert_eq!(params["quantity"], "3");
    assert_eq!(params["subtotal"], "300.00");
    assert_eq!(params["tax"], "36.00");
    assert_eq!(params["total"], "336.00");
    assert_eq!(params["bookingId"], booking.id);
    assert_eq!(params["guestEmail"], "guest@example.com");
}

#[tokio::test]
async fn incomplete_capture_writes_nothing() {
    let store = store_with_listing(json!({"title": "Loft", "price": 80})).await;
    let auth = StaticAuth::signed_in("guest-1", None);
    let checkout = MockCheckout::with_status("DECLINED");
    let email = MemoryEmailSender::new();

    let result = handle_checkout(
        CheckoutClients {
            store: &store,
            auth: &auth,
            checkout: &checkout,
            email: &email,
        },
        &Settings::default(),
        request(1),
    )
    .await;

    assert!(matches!(result, Err(CheckoutError::PaymentNotCompleted(status)) if status == "DECLINED"));
    assert!(store.ids(COLLECTION_BOOKINGS).await.is_empty());
    assert!(email.sent().await.is_empty());
}

#[tokio::test]
async fn email_failure_keeps_booking() {
    let store = store_with_listing(json!({"title": "Loft", "price": "19.99"})).await;
    let auth = StaticAuth::signed_in("guest-1", None);
    let checkout = MockCheckout::completing();
    let email = MemoryEmailSender::failing();

    let booking = handle_checkout(
        CheckoutClients {
            store: &store,
            auth: &auth,
            checkout: &checkout,
            email: &email,
        },
        &Settings::default(),
        request(3),
    )
    .await
    .unwrap();

    assert_eq!(store.ids(COLLECTION_BOOKINGS).await, vec![booking.id.clone()]);
    // 19.99 * 3 * 1.12 = 67.1664, captured at cent precision
    assert_eq!(checkout.captures().await[0].0, 67.17);
}

#[tokio::test]
async fn rejects_missing_user_and_listing() {
    let store = store_with_listing(json!({"price": 10})).await;
    let checkout = MockCheckout::completing();
    let email = MemoryEmailSender::new();
    let settings = Settings::default();

    let signed_out = StaticAuth::signed_out();
    let result = handle_checkout(
        CheckoutClients {
            store: &store,
            auth: &signed_out,
            checkout: &checkout,
            email: &email,
        },
        &settings,
        request(1),
    )
    .await;
    assert!(matches!(result, Err(CheckoutError::Unauthenticated)));

    let auth = StaticAuth::signed_in("guest-1", None);
    let result = handle_checkout(
        CheckoutClients {
            store: &store,
            auth: &auth,
            checkout: &checkout,
            email: &email,
        },
        &settings,
        CheckoutRequest {
            listing_id: "missing".to_string(),
            quantity: 1,
        },
    )
    .await;
    assert!(matches!(result, Err(CheckoutError::ListingNotFound(id)) if id == "missing"));
    assert!(checkout.captures().await.is_empty());
}

#[tokio::test]
async fn configured_cap_bounds_listing_without_one() {
    let store = store_with_listing(json!({"title": "Pottery class", "price": "10"})).await;
    let auth = StaticAuth::signed_in("guest-1", None);
    let checkout = MockCheckout::completing();
    let email = MemoryEmailSender::new();
    let settings = Settings::default().with_max_participants(5);

    let booking = handle_checkout(
        CheckoutClients {
            store: &store,
            auth: &auth,
            checkout: &checkout,
            email: &email,
        },
        &settings,
        request(20),
    )
    .await
    .unwrap();

    assert_eq!(booking.quantity, 5);
    assert_eq!(checkout.captures().await[0].0, 56.0);
}

#[tokio::test]
async fn capture_error_writes_nothing() {
    let store = store_with_listing(json!({"title": "Loft", "price": 80})).await;
    let auth = StaticAuth::signed_in("guest-1", None);
    let checkout = MockCheckout::unavailable();
    let email = MemoryEmailSender::new();

    let result = handle_checkout(
        CheckoutClients {
            store: &store,
            auth: &auth,
            checkout: &checkout,
            email: &email,
        },
        &Settings::default(),
        request(1),
    )
    .await;

    assert!(matches!(
        result,
        Err(CheckoutError::Client(ClientError::Capture(_)))
    ));
    assert!(store.ids(COLLECTION_BOOKINGS).await.is_empty());
    assert!(email.sent().await.is_empty());
}
