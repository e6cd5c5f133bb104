//! Remote data source for torrent snapshots
//!
//! The exporter only needs three read operations from qBittorrent. They are
//! expressed as the [`DataSource`] trait so polling jobs can be exercised
//! against an in-memory source in tests, and implemented for the real Web API
//! by [`QbittorrentClient`].
//!
//! Every call is fallible and none of them retry: a failed call is reported
//! to the polling job, which logs it and waits for its next tick.

mod qbittorrent;

pub use qbittorrent::{ClientOptions, QbittorrentClient};

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{Torrent, Transfer};

/// Read-only view of a torrent client
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Current torrent list
    async fn torrents(&self) -> Result<Vec<Torrent>, ApiError>;

    /// Current global transfer counters
    async fn transfer(&self) -> Result<Transfer, ApiError>;

    /// Application version string, e.g. `v4.6.2`
    async fn app_version(&self) -> Result<String, ApiError>;
}
