use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{metrics, Result, SinkError};

pub fn metrics_router() -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
}

async fn render_metrics() -> Result<String> {
    metrics::gather_text()
}

/// Serves the self metrics until the listener fails.
pub async fn serve_metrics(listener: TcpListener) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| SinkError::Internal(format!("Failed to read listener address: {}", e)))?;
    info!("Serving self metrics on {}", addr);

    axum::serve(listener, metrics_router())
        .await
        .map_err(|e| SinkError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
