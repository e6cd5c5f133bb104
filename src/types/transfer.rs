//! Global transfer snapshot as returned by `/api/v2/transfer/info`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session-scoped transfer counters and limits
///
/// `dl_info_data` and `up_info_data` count bytes since the remote session
/// started and reset whenever qBittorrent restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transfer {
    /// Global download rate (bytes/s)
    pub dl_info_speed: u64,
    /// Data downloaded this session (bytes)
    pub dl_info_data: u64,
    /// Global upload rate (bytes/s)
    pub up_info_speed: u64,
    /// Data uploaded this session (bytes)
    pub up_info_data: u64,
    /// Download rate limit (bytes/s, 0 = unlimited)
    pub dl_rate_limit: u64,
    /// Upload rate limit (bytes/s, 0 = unlimited)
    pub up_rate_limit: u64,
    pub dht_nodes: u64,
    pub connection_status: ConnectionStatus,
}

/// Connection status reported by the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionStatus {
    Connected,
    Firewalled,
    #[default]
    Disconnected,
    Other(String),
}

impl ConnectionStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connected => crate::constants::api::CONNECTED,
            Self::Firewalled => "firewalled",
            Self::Disconnected => "disconnected",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl From<String> for ConnectionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "connected" => Self::Connected,
            "firewalled" => Self::Firewalled,
            "disconnected" => Self::Disconnected,
            _ => Self::Other(s),
        }
    }
}

impl From<ConnectionStatus> for String {
    fn from(status: ConnectionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
