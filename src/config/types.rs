//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::defaults;
use crate::client::ClientOptions;
use crate::types::{Port, duration_serde};

/// Main exporter configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// qBittorrent Web API connection
    #[serde(default)]
    pub qbittorrent: QbittorrentConfig,
    /// Scrape endpoint and metric naming
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Lifetime counter storage
    #[serde(default)]
    pub state: StateConfig,
    /// Polling cadences
    #[serde(default)]
    pub polling: PollingConfig,
}

/// qBittorrent Web API connection settings
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct QbittorrentConfig {
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Per-request timeout in seconds
    #[serde(with = "duration_serde", default = "defaults::timeout")]
    pub timeout: Duration,
    /// Accept self-signed or otherwise invalid TLS certificates
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

impl Default for QbittorrentConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            username: String::new(),
            password: String::new(),
            timeout: defaults::timeout(),
            insecure_skip_verify: false,
        }
    }
}

impl fmt::Debug for QbittorrentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QbittorrentConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

impl QbittorrentConfig {
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: self.timeout,
            insecure_skip_verify: self.insecure_skip_verify,
        }
    }
}

/// Scrape endpoint settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MetricsConfig {
    #[serde(default = "defaults::host")]
    pub host: String,
    #[serde(default = "defaults::port")]
    pub port: Port,
    #[serde(default = "defaults::url_path")]
    pub url_path: String,
    /// Prepended to every metric name
    #[serde(default = "defaults::prefix")]
    pub prefix: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            url_path: defaults::url_path(),
            prefix: defaults::prefix(),
        }
    }
}

/// Lifetime counter storage settings
///
/// Without a `path` the totals live in memory only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(with = "duration_serde", default = "defaults::persist_interval")]
    pub persist_interval: Duration,
    /// Write the state file on every transfer update as well
    #[serde(default)]
    pub persist_on_update: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: None,
            persist_interval: defaults::persist_interval(),
            persist_on_update: false,
        }
    }
}

/// How often each remote endpoint is polled
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    #[serde(with = "duration_serde", default = "defaults::torrents_interval")]
    pub torrents_interval: Duration,
    #[serde(with = "duration_serde", default = "defaults::transfer_interval")]
    pub transfer_interval: Duration,
    #[serde(with = "duration_serde", default = "defaults::version_interval")]
    pub version_interval: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            torrents_interval: defaults::torrents_interval(),
            transfer_interval: defaults::transfer_interval(),
            version_interval: defaults::version_interval(),
        }
    }
}
