use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::gallery::list_gallery;
use crate::manifest::{Manifest, build_manifest};
use crate::readiness::ReadinessState;
use crate::state::AppState;

/// `GET /.well-known/farcaster.json`
pub async fn manifest_handler(State(state): State<Arc<AppState>>) -> Json<Manifest> {
    Json(build_manifest(&state.config.manifest))
}

/// `GET /api/gallery/storage`. Query parameters are ignored.
pub async fn gallery_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, envelope) = list_gallery(state.store.as_ref()).await;
    (status, Json(envelope))
}

/// `GET /api/readiness`. Always 200; a non-null `error` is advisory.
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> Json<ReadinessState> {
    Json(state.readiness.state())
}
