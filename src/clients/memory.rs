//! In-process client implementations for tests and offline runs.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    AuthProvider, CheckoutWidget, ClientError, Document, DocumentStore, EmailSender,
    ObjectStorage, UploadFile,
};
use crate::models::booking::{CAPTURE_STATUS_COMPLETED, CaptureResult, User};

#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    docs: Arc<RwLock<HashMap<(String, String), Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, collection: &str, id: &str, doc: Document) {
        self.docs
            .write()
            .await
            .insert((collection.to_string(), id.to_string()), doc);
    }

    pub async fn ids(&self, collection: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .docs
            .read()
            .await
            .keys()
            .filter(|(c, _)| c == collection)
            .map(|(_, id)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ClientError> {
        Ok(self
            .docs
            .read()
            .await
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), ClientError> {
        self.insert(collection, id, doc).await;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    pub fn signed_in(id: &str, email: Option<&str>) -> Self {
        Self {
            user: Some(User {
                id: id.to_string(),
                email: email.map(str::to_string),
            }),
        }
    }

    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_user(&self) -> Result<Option<User>, ClientError> {
        Ok(self.user.clone())
    }
}

/// Hands out `memory://<path>` URLs. Files whose name is listed in
/// `failing` are rejected.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStorage {
    failing: Vec<String>,
    uploads: Arc<RwLock<Vec<String>>>,
}

impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub async fn uploaded(&self) -> Vec<String> {
        self.uploads.read().await.clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(&self, path: &str, file: &UploadFile) -> Result<String, ClientError> {
        if self.failing.contains(&file.name) {
            return Err(ClientError::Upload {
                name: file.name.clone(),
                reason: "rejected by storage".to_string(),
            });
        }

        let url = format!("memory://{path}");
        self.uploads.write().await.push(url.clone());
        Ok(url)
    }
}

/// Captures every payment with a fixed status and records the amounts. An
/// unavailable checkout errors before recording anything.
#[derive(Debug, Clone)]
pub struct MockCheckout {
    status: String,
    unavailable: bool,
    captures: Arc<RwLock<Vec<(f64, String)>>>,
}

impl MockCheckout {
    pub fn completing() -> Self {
        Self::with_status(CAPTURE_STATUS_COMPLETED)
    }

    pub fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            unavailable: false,
            captures: Arc::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::completing()
        }
    }

    pub async fn captures(&self) -> Vec<(f64, String)> {
        self.captures.read().await.clone()
    }
}

#[async_trait]
impl CheckoutWidget for MockCheckout {
    async fn capture(&self, amount: f64, currency: &str) -> Result<CaptureResult, ClientError> {
        if self.unavailable {
            return Err(ClientError::Capture("checkout widget unavailable".to_string()));
        }

        let mut captures = self.captures.write().await;
        captures.push((amount, currency.to_string()));

        Ok(CaptureResult {
            id: format!("capture-{}", captures.len()),
            status: self.status.clone(),
        })
    }
}

pub type SentEmail = (String, BTreeMap<String, String>);

#[derive(Debug, Clone, Default)]
pub struct MemoryEmailSender {
    fail: bool,
    sent: Arc<RwLock<Vec<SentEmail>>>,
}

impl MemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl EmailSender for MemoryEmailSender {
    async fn send(
        &self,
        template_id: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<(), ClientError> {
        if self.fail {
            return Err(ClientError::Email("mail relay unavailable".to_string()));
        }

        self.sent
            .write()
            .await
            .push((template_id.to_string(), params.clone()));
        Ok(())
    }
}
