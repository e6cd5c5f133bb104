//! Default values for configuration fields
//!
//! Used both by serde when a field is absent and by the `Default` impls.

use crate::constants::{cadence, client, metrics};
use crate::types::Port;
use std::time::Duration;

#[inline]
pub fn base_url() -> String {
    client::DEFAULT_BASE_URL.to_string()
}

#[inline]
pub fn timeout() -> Duration {
    client::DEFAULT_TIMEOUT
}

#[inline]
pub fn host() -> String {
    metrics::DEFAULT_HOST.to_string()
}

#[inline]
pub fn port() -> Port {
    Port::DEFAULT
}

#[inline]
pub fn url_path() -> String {
    metrics::DEFAULT_URL_PATH.to_string()
}

#[inline]
pub fn prefix() -> String {
    metrics::DEFAULT_PREFIX.to_string()
}

/// Default interval between state file writes (60s)
#[inline]
pub fn persist_interval() -> Duration {
    cadence::STATE_PERSIST
}

#[inline]
pub fn torrents_interval() -> Duration {
    cadence::TORRENTS
}

#[inline]
pub fn transfer_interval() -> Duration {
    cadence::TRANSFER
}

/// Default interval between version checks (10 minutes)
#[inline]
pub fn version_interval() -> Duration {
    cadence::VERSION
}
