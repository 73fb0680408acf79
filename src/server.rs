//! HTTP server: router, middleware, and the serve loop.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::readiness::Phase;
use crate::routes::{gallery_handler, manifest_handler, readiness_handler};
use crate::state::AppState;

pub const MANIFEST_ROUTE: &str = "/.well-known/farcaster.json";
pub const GALLERY_ROUTE: &str = "/api/gallery/storage";
pub const READINESS_ROUTE: &str = "/api/readiness";

/// All routes over `state`, with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(MANIFEST_ROUTE, get(manifest_handler))
        .route(GALLERY_ROUTE, get(gallery_handler))
        .route(READINESS_ROUTE, get(readiness_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: AppConfig) -> std::io::Result<()> {
    info!("Initializing state...");
    let address = config.server.address();
    let state = AppState::new(config);
    info!("Gallery storage: {}", state.store.describe());

    let mut readiness = state.readiness.subscribe();
    tokio::spawn(async move {
        if let Ok(phase) = readiness.wait_for(Phase::is_ready).await {
            info!("Readiness settled: {:?}", *phase);
        }
    });

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal as unix_signal};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
