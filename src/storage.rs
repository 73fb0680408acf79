//! Gallery storage backends.
//!
//! The service does not own gallery data; it asks a storage collaborator for
//! "all gallery items" and passes the answer through. Items are opaque JSON
//! values: nothing here inspects, reorders, or rewrites them.
//!
//! | Backend | Source |
//! |---------|--------|
//! | [`FileStore`] | a local JSON file holding an array (missing file = empty gallery) |
//! | [`HttpStore`] | a remote endpoint answering `GET` with a JSON array |
//!
//! Every call goes to the backend. There is no caching, retrying, or timeout
//! here: a backend that hangs hangs the request that called it.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::config::StorageConfig;

/// A gallery entry as the backend returned it.
pub type GalleryItem = Value;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("storage responded with HTTP {0}")]
    Status(u16),
    #[error("expected a JSON array of gallery items, got {0}")]
    NotAnArray(&'static str),
    /// A failure reported by the backend itself. May carry no message.
    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// List every gallery item, in backend order.
    async fn list_items(&self) -> Result<Vec<GalleryItem>, StoreError>;

    /// Short human-readable description for logs and CLI output.
    fn describe(&self) -> String;
}

/// Pick the backend named by config: `url` when set, otherwise `file`.
pub fn from_config(config: &StorageConfig) -> Arc<dyn GalleryStore> {
    match &config.url {
        Some(url) => Arc::new(HttpStore::new(url.clone())),
        None => Arc::new(FileStore::new(&config.file)),
    }
}

/// Interpret a parsed document as the item list.
fn into_items(doc: Value) -> Result<Vec<GalleryItem>, StoreError> {
    match doc {
        Value::Array(items) => Ok(items),
        Value::Null => Err(StoreError::NotAnArray("null")),
        Value::Bool(_) => Err(StoreError::NotAnArray("a boolean")),
        Value::Number(_) => Err(StoreError::NotAnArray("a number")),
        Value::String(_) => Err(StoreError::NotAnArray("a string")),
        Value::Object(_) => Err(StoreError::NotAnArray("an object")),
    }
}

// ============================================================================
// File
// ============================================================================

/// Reads a JSON array from disk on every call.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl GalleryStore for FileStore {
    async fn list_items(&self) -> Result<Vec<GalleryItem>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist, gallery is empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        into_items(serde_json::from_str(&content)?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Fetches a JSON array from a remote endpoint on every call.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    url: String,
}

impl HttpStore {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl GalleryStore for HttpStore {
    async fn list_items(&self) -> Result<Vec<GalleryItem>, StoreError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        into_items(response.json::<Value>().await?)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}
