//! Gallery listing: one storage call per request, wrapped in an [`Envelope`].
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | items | 200 | `{ success: true, data, count }` |
//! | any store failure | 500 | `{ success: false, error: STORAGE_FAILURE, details }` |
//!
//! Store failures are not classified on the wire. Not-found, transport and
//! decode errors all produce the same 500 with the error's text as `details`.

use axum::http::StatusCode;
use tracing::{error, info};

use crate::envelope::Envelope;
use crate::storage::{GalleryItem, GalleryStore};

/// `error` category for every storage failure.
pub const STORAGE_FAILURE: &str = "Failed to fetch GIFs from storage";

/// Ask `store` for every item and translate the outcome into a response.
pub async fn list_gallery(store: &dyn GalleryStore) -> (StatusCode, Envelope<GalleryItem>) {
    info!("Fetching gallery items from {}", store.describe());

    match store.list_items().await {
        Ok(items) => {
            info!("Fetched {} gallery items", items.len());
            (StatusCode::OK, Envelope::success(items))
        }
        Err(e) => {
            error!("Failed to fetch gallery items: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::from_error(STORAGE_FAILURE, &e),
            )
        }
    }
}
