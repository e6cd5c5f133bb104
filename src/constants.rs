//! Constants used throughout the exporter
//!
//! This module centralizes cadences, API paths and metric naming so that
//! job wiring and tests agree on the same values.

use std::time::Duration;

/// Polling cadences for the scheduled jobs
pub mod cadence {
    use super::Duration;

    /// Interval used when a job is registered without options or with a zero interval
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// How often the torrent list is fetched
    pub const TORRENTS: Duration = Duration::from_secs(30);

    /// How often the transfer counters are fetched
    pub const TRANSFER: Duration = Duration::from_secs(30);

    /// How often the application version is checked
    pub const VERSION: Duration = Duration::from_secs(10 * 60);

    /// How often the counter state is written to disk
    pub const STATE_PERSIST: Duration = Duration::from_secs(60);
}

/// qBittorrent Web API v2 endpoints
pub mod api {
    pub const AUTH_LOGIN: &str = "/api/v2/auth/login";
    pub const TORRENTS_INFO: &str = "/api/v2/torrents/info";
    pub const TRANSFER_INFO: &str = "/api/v2/transfer/info";
    pub const APP_VERSION: &str = "/api/v2/app/version";

    /// Name of the session cookie returned by a successful login
    pub const SESSION_COOKIE: &str = "SID";

    /// Connection status value reported when the client is online
    pub const CONNECTED: &str = "connected";
}

/// Metrics exposition defaults
pub mod metrics {
    /// Prefix prepended to every exported metric name
    pub const DEFAULT_PREFIX: &str = "qb_";

    /// Path the scrape endpoint is served on
    pub const DEFAULT_URL_PATH: &str = "/metrics";

    /// Default scrape port
    pub const DEFAULT_PORT: u16 = 9090;

    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
}

/// Remote client defaults
pub mod client {
    use super::Duration;

    /// Default base URL of the qBittorrent Web UI
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

    /// Overall timeout for a single API call
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
}
