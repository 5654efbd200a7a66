use async_trait::async_trait;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

use super::{ClientError, Document, DocumentStore};

/// Document store laid out as `<root>/<collection>/<id>.json`.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, collection: &str, id: &str) -> Result<PathBuf, ClientError> {
        for part in [collection, id] {
            if part.is_empty() || part.contains(['/', '\\']) || part == "." || part == ".." {
                return Err(ClientError::Store(format!("invalid document path segment: {part:?}")));
            }
        }
        Ok(self.root.join(collection).join(format!("{id}.json")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ClientError> {
        let path = self.path(collection, id)?;

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Value>(&raw)? {
            Value::Object(doc) => Ok(Some(doc)),
            _ => Err(ClientError::Store(format!(
                "{} does not contain a JSON object",
                path.display()
            ))),
        }
    }

    /// Writes through a temp file in the collection directory and renames it
    /// over the target, so readers see either the old or the new document.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), ClientError> {
        let path = self.path(collection, id)?;
        let dir = self.root.join(collection);
        fs::create_dir_all(&dir).await?;

        let payload = serde_json::to_vec_pretty(&Value::Object(doc))?;

        tokio::task::spawn_blocking(move || -> Result<(), ClientError> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&payload)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| ClientError::Store(format!("write task failed: {e}")))?
    }
}
