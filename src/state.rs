use std::sync::Arc;

use crate::config::AppConfig;
use crate::readiness::Readiness;
use crate::storage::{self, GalleryStore};

/// Shared, read-only state behind every handler.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn GalleryStore>,
    pub readiness: Readiness,
}

impl AppState {
    /// Build state from config: pick the storage backend and mount readiness.
    /// Must be called inside a tokio runtime.
    pub fn new(config: AppConfig) -> Arc<Self> {
        let store = storage::from_config(&config.storage);
        Self::with_store(config, store)
    }

    /// Same as [`AppState::new`] with an explicit storage backend.
    pub fn with_store(config: AppConfig, store: Arc<dyn GalleryStore>) -> Arc<Self> {
        let readiness = Readiness::mount(config.readiness.delay());
        Arc::new(Self {
            config,
            store,
            readiness,
        })
    }
}
