use futures::future::try_join_all;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::{
    clients::{
        AuthProvider, COLLECTION_LISTINGS, ClientError, DocumentStore, ObjectStorage, UploadFile,
    },
    models::listing::Listing,
    utils::merge::{MergeError, append_unique, merge_fields, remove_at},
};

#[derive(Debug, Error)]
pub enum ListingEditError {
    #[error("No signed-in user")]
    Unauthenticated,

    #[error("Listing not found: {0}")]
    NotFound(String),

    #[error("Listing {0} belongs to another host")]
    NotOwner(String),

    #[error("Listing is not ready to publish: {0}")]
    Incomplete(String),

    #[error("Unsupported photo {name}: {content_type}")]
    UnsupportedPhoto { name: String, content_type: String },

    #[error("Invalid edit: {0}")]
    Merge(#[from] MergeError),

    #[error("Client request failed: {0}")]
    Client(#[from] ClientError),
}

async fn load_owned_listing<S, A>(
    store: &S,
    auth: &A,
    listing_id: &str,
) -> Result<Listing, ListingEditError>
where
    S: DocumentStore,
    A: AuthProvider,
{
    let user = auth
        .current_user()
        .await?
        .ok_or(ListingEditError::Unauthenticated)?;

    let doc = store
        .get(COLLECTION_LISTINGS, listing_id)
        .await?
        .ok_or_else(|| ListingEditError::NotFound(listing_id.to_string()))?;
    let listing = Listing::from_document(listing_id, doc);

    if listing.host_id() != Some(user.id.as_str()) {
        return Err(ListingEditError::NotOwner(listing_id.to_string()));
    }

    Ok(listing)
}

async fn save_listing<S: DocumentStore>(store: &S, listing: &Listing) -> Result<(), ClientError> {
    store
        .set(COLLECTION_LISTINGS, &listing.id, listing.fields.clone())
        .await
}

pub async fn handle_listing_update<S, A>(
    store: &S,
    auth: &A,
    listing_id: &str,
    patch: Map<String, Value>,
) -> Result<Listing, ListingEditError>
where
    S: DocumentStore,
    A: AuthProvider,
{
    let mut listing = load_owned_listing(store, auth, listing_id).await?;
    merge_fields(&mut listing.fields, patch);
    save_listing(store, &listing).await?;

    info!("listing {} updated", listing.id);

    Ok(listing)
}

pub fn check_publishable(listing: &Listing) -> Result<(), ListingEditError> {
    if listing.title().trim().is_empty() {
        return Err(ListingEditError::Incomplete("missing title".into()));
    }
    if listing.unit_price() <= 0.0 {
        return Err(ListingEditError::Incomplete("missing or invalid price".into()));
    }
    if listing.photos().is_empty() {
        return Err(ListingEditError::Incomplete("at least one photo required".into()));
    }
    Ok(())
}

pub async fn handle_listing_publish<S, A>(
    store: &S,
    auth: &A,
    listing_id: &str,
) -> Result<Listing, ListingEditError>
where
    S: DocumentStore,
    A: AuthProvider,
{
    let mut listing = load_owned_listing(store, auth, listing_id).await?;
    check_publishable(&listing)?;

    listing.set_published(true);
    save_listing(store, &listing).await?;

    info!("listing {} published", listing.id);

    Ok(listing)
}

/// Uploads all files, then records their URLs on the listing. Nothing is
/// uploaded if any file is not an image, and nothing is written if any
/// upload fails.
pub async fn handle_photo_upload<O, S, A>(
    storage: &O,
    store: &S,
    auth: &A,
    listing_id: &str,
    files: &[UploadFile],
) -> Result<Vec<String>, ListingEditError>
where
    O: ObjectStorage,
    S: DocumentStore,
    A: AuthProvider,
{
    let mut listing = load_owned_listing(store, auth, listing_id).await?;

    if let Some(file) = files.iter().find(|f| !f.content_type.starts_with("image/")) {
        return Err(ListingEditError::UnsupportedPhoto {
            name: file.name.clone(),
            content_type: file.content_type.clone(),
        });
    }

    let uploads = files.iter().map(|file| {
        let path = format!("{COLLECTION_LISTINGS}/{listing_id}/{}", file.name);
        async move { storage.upload(&path, file).await }
    });
    let urls = try_join_all(uploads).await?;

    let mut photos = listing.photos();
    for url in &urls {
        append_unique(&mut photos, url.clone());
    }
    listing.set_photos(photos);
    save_listing(store, &listing).await?;

    info!("listing {} received {} photos", listing.id, urls.len());

    Ok(urls)
}

pub async fn handle_photo_remove<S, A>(
    store: &S,
    auth: &A,
    listing_id: &str,
    index: usize,
) -> Result<String, ListingEditError>
where
    S: DocumentStore,
    A: AuthProvider,
{
    let mut listing = load_owned_listing(store, auth, listing_id).await?;

    let mut photos = listing.photos();
    let removed = remove_at(&mut photos, index)?;
    listing.set_photos(photos);
    save_listing(store, &listing).await?;

    Ok(removed)
}
