//! HTTP scrape endpoint
//!
//! Serves the encoded registry on a single path. Runs until the scheduler's
//! cancellation token fires, letting in-flight scrapes complete.

use anyhow::{Context, Result, bail};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::metrics::Metrics;

/// Build the router serving `metrics` on `url_path`
///
/// # Errors
/// Returns an error if `url_path` is not an absolute path.
pub fn router(metrics: Metrics, url_path: &str) -> Result<Router> {
    if !url_path.starts_with('/') {
        bail!("metrics url path '{url_path}' must start with '/'");
    }
    Ok(Router::new()
        .route(url_path, get(handle_scrape))
        .with_state(metrics))
}

/// Bind `host:port` and serve until `shutdown` is cancelled
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run(
    host: &str,
    port: u16,
    url_path: &str,
    metrics: Metrics,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind metrics endpoint on {host}:{port}"))?;
    serve(listener, url_path, metrics, shutdown).await
}

/// Serve on an already bound listener
///
/// # Errors
/// Returns an error if the router cannot be built or the server fails.
pub async fn serve(
    listener: TcpListener,
    url_path: &str,
    metrics: Metrics,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = router(metrics, url_path)?;
    let addr = listener.local_addr().context("listener has no local address")?;
    info!(%addr, path = url_path, "Serving metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled_owned().await })
        .await
        .context("metrics server failed")?;

    info!("Metrics endpoint stopped");
    Ok(())
}

async fn handle_scrape(State(metrics): State<Metrics>) -> Response {
    match metrics.encode() {
        Ok(body) => ([(CONTENT_TYPE, metrics.content_type())], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
