//! Error types for the exporter
//!
//! Remote-side failures and storage failures are kept apart so callers can
//! tell a skipped poll from a failed state write. Both are non-fatal to the
//! scheduler; configuration failures surface as `anyhow` errors at startup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the qBittorrent API client
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Remote unreachable, timed out, or the request could not be built
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Remote answered with a non-success status code
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
    },

    /// Response body could not be decoded
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Login was answered without a session cookie
    #[error("login rejected: no {cookie} cookie in response")]
    MissingSessionCookie { cookie: &'static str },
}

impl ApiError {
    /// Endpoint the failed call was made against, if any
    #[must_use]
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
            Self::MissingSessionCookie { .. } => None,
        }
    }
}

/// Errors raised while reading or writing persisted counter state
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    #[error("state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    /// The blocking write task panicked or the runtime is shutting down
    #[error("state write did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}
