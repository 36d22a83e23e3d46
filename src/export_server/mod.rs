//! HTTP server exposing the export pipeline.
//!
//! Provides two endpoints:
//! - `/export` - runs a query and writes the result to a CSV file (POST only)
//! - `/health` - liveness probe
//!
//! Each request is served on its own task; requests share nothing but the
//! read-only configuration.

mod handlers;
mod types;

use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use log::{info, warn};

use crate::config::Config;
use handlers::{export_handler, health_handler};
pub use types::{ExportResponse, ExportState};

/// Builds the router for the export endpoints.
pub fn router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/export", any(export_handler))
        .route("/health", get(health_handler))
        .with_state(ExportState { config })
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn start_export_server(config: Config) -> Result<(), anyhow::Error> {
    let addr = config.listen_addr;
    let export_dir = config.export_dir.clone();
    let app = router(Arc::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind export server to {}: {}", addr, e))?;

    info!("Export server listening on http://{}/", addr);
    info!("  - Export: POST http://{}/export", addr);
    info!("  - Files are written to {}", export_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Export server error: {}", e))?;

    info!("Export server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, finishing in-flight exports"),
        Err(e) => {
            // Without a signal handler the server can only be stopped externally
            warn!("Failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
