//! HTTP backend.
//!
//! Exposes the WorkloadController over `GET /status` and `POST /command`
//! (plus the `/api/status` and `/api/stress` aliases older dashboards use).

pub mod api;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::workload::WorkloadController;

/// Build the complete application router with all routes and middleware.
pub fn build_router(controller: Arc<WorkloadController>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/status", get(api::status))
        .route("/command", post(api::command))
        // Legacy paths
        .route("/api/status", get(api::status))
        .route("/api/stress", post(api::command))
        // The visualizer may be served from another origin
        .layer(CorsLayer::permissive())
        .with_state(controller)
}

/// Bind `addr` and serve until `shutdown` resolves, then retire any live session.
pub async fn serve<F>(
    addr: SocketAddr,
    controller: Arc<WorkloadController>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(Arc::clone(&controller));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("[Server] Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    log::info!("[Server] Shutting down, stopping workload");
    tokio::task::spawn_blocking(move || controller.shutdown())
        .await
        .map_err(std::io::Error::other)?;
    Ok(())
}
