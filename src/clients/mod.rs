//! Interfaces to the hosted services the booking flows depend on.
//!
//! Handlers take these as generics so tests can swap in the in-memory
//! implementations from [`memory`].

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::booking::{CaptureResult, User};

pub const COLLECTION_LISTINGS: &str = "listings";
pub const COLLECTION_BOOKINGS: &str = "bookings";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Document store request failed: {0}")]
    Store(String),

    #[error("Upload failed for {name}: {reason}")]
    Upload { name: String, reason: String },

    #[error("Payment capture failed: {0}")]
    Capture(String),

    #[error("Email send failed: {0}")]
    Email(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Document = Map<String, Value>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `None` when no document exists under `id`.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ClientError>;

    /// Creates or fully replaces the document.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), ClientError>;
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user(&self) -> Result<Option<User>, ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores the file and returns its public URL.
    async fn upload(&self, path: &str, file: &UploadFile) -> Result<String, ClientError>;
}

#[async_trait]
pub trait CheckoutWidget: Send + Sync {
    async fn capture(&self, amount: f64, currency: &str) -> Result<CaptureResult, ClientError>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        template_id: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<(), ClientError>;
}
