//! Process-level helpers for the binary target
//!
//! Shutdown signal handling and operating mode resolution live here so the
//! entry point stays a straight sequence of startup steps.

use std::path::Path;
use tracing::{debug, error, info};

use crate::state::StateMode;

/// Wait for shutdown signal (Ctrl+C or SIGTERM on Unix)
///
/// A handler that cannot be installed is logged and never resolves, so the
/// other signal still works.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Decide where lifetime counters live
///
/// The transient feature flag wins over a configured path. Without either
/// the exporter keeps counters in memory only.
#[must_use]
pub fn resolve_state_mode(force_transient: bool, state_path: Option<&Path>) -> StateMode {
    if force_transient {
        info!("Transient state forced by feature flag, lifetime totals will not be persisted");
        return StateMode::Transient;
    }

    match state_path {
        Some(path) => {
            info!(path = %path.display(), "Using durable counter state");
            StateMode::Durable(path.to_path_buf())
        }
        None => {
            debug!("No state path configured, using transient counter state");
            StateMode::Transient
        }
    }
}
