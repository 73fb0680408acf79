//! Shared test utilities: config fixtures, state builders, and a one-shot
//! request driver for the router.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let state = state_with_store(MemoryStore::with_items(vec![json!(1)]));
//! let (status, body) = get_json(router(state), GALLERY_ROUTE).await;
//! assert_eq!(body["count"], 1);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::storage::{GalleryItem, GalleryStore, StoreError};

// =========================================================================
// Fixtures
// =========================================================================

/// Default config with the public URL pointed at `https://example.com`.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.manifest.public_url = "https://example.com".to_string();
    config
}

/// State over [`test_config`] and the given store.
pub fn state_with_store(store: impl GalleryStore + 'static) -> Arc<AppState> {
    AppState::with_store(test_config(), Arc::new(store))
}

// =========================================================================
// In-memory store
// =========================================================================

/// Answers every call with the same list, or the same failure.
///
/// Counts calls so tests can check that nothing is cached between requests.
#[derive(Debug)]
pub struct MemoryStore {
    outcome: Result<Vec<GalleryItem>, String>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_items(items: Vec<GalleryItem>) -> Self {
        Self {
            outcome: Ok(items),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails with `StoreError::Backend(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GalleryStore for MemoryStore {
    async fn list_items(&self) -> Result<Vec<GalleryItem>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(StoreError::Backend)
    }

    fn describe(&self) -> String {
        match &self.outcome {
            Ok(items) => format!("memory ({} items)", items.len()),
            Err(_) => "memory (failing)".to_string(),
        }
    }
}

// =========================================================================
// Request driver
// =========================================================================

/// Send `GET uri` through the router and decode the JSON body.
///
/// Panics if the body is not JSON.
pub async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "body of {uri} is not JSON ({e}): {}",
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_counts_calls() {
        let store = MemoryStore::with_items(vec![json!(1)]);
        store.list_items().await.unwrap();
        store.list_items().await.unwrap();
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn memory_store_failure_carries_message() {
        let store = MemoryStore::failing("timeout");
        let err = store.list_items().await.unwrap_err();
        assert_eq!(err.to_string(), "timeout");
        assert_eq!(store.describe(), "memory (failing)");
    }
}
