//! REST API over the outlook engine.
//!
//! All endpoints are GET:
//! - `/health`
//! - `/regions` - known region codes
//! - `/regions/{code}/balance`, `/mix`, `/recommendations`, `/price`
//! - `/regions/{code}/outlook` - everything above plus optional demand

mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::engine::OutlookEngine;

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `engine` - Shared engine; handlers only read from it
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(engine: Arc<OutlookEngine>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/regions", get(handlers::list_regions))
        .route("/regions/{code}/balance", get(handlers::get_balance))
        .route("/regions/{code}/mix", get(handlers::get_mix))
        .route("/regions/{code}/recommendations", get(handlers::get_recommendations))
        .route("/regions/{code}/price", get(handlers::get_price))
        .route("/regions/{code}/outlook", get(handlers::get_outlook))
        .with_state(engine)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(engine: Arc<OutlookEngine>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, router(engine)).await
}
