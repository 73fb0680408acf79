//! # GIF Gallery
//!
//! Backend for a GIF gallery Farcaster mini-app. It serves two stateless
//! HTTP routes and holds one piece of process state:
//!
//! ```text
//! GET /.well-known/farcaster.json   manifest  ← AppConfig
//! GET /api/gallery/storage          envelope  ← GalleryStore::list_items()
//! GET /api/readiness                {isReady, error} ← Readiness
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layered configuration: stock defaults → TOML file → environment |
//! | [`manifest`] | Builds the mini-app discovery document from config |
//! | [`properties`] | The "valid properties" filter that drops empty manifest values |
//! | [`storage`] | `GalleryStore` trait with file, HTTP, and in-memory backends |
//! | [`gallery`] | One-shot listing translated into a response envelope |
//! | [`envelope`] | `{success, data, count, error, details}` JSON wrapper |
//! | [`readiness`] | Pending → ready state with a disabled-integration timeout |
//! | [`server`] | Axum router, middleware, graceful shutdown |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Configuration
//!
//! Handlers never read the environment. [`config::load_config`] resolves
//! every layer once at startup into an [`config::AppConfig`], which the
//! server owns. Missing values fall back to documented defaults, so the
//! manifest route has no failure path.
//!
//! ## Pass-Through Storage
//!
//! Gallery items are opaque JSON. The listing route performs exactly one
//! backend call per request with no caching, retries, or pagination, and
//! reports every failure as the same 500 envelope.
//!
//! ## Readiness as a Watched Value
//!
//! SDK readiness is a `tokio::sync::watch` value owned by a handle. The
//! handle's timer settles it once; dropping the handle cancels the timer.

pub mod config;
pub mod envelope;
pub mod gallery;
pub mod manifest;
pub mod output;
pub mod properties;
pub mod readiness;
pub mod routes;
pub mod server;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;
