//! Configuration validation
//!
//! Port non-zero is already enforced by [`crate::types::Port`]. This checks
//! the remaining semantic constraints before anything is started.

use anyhow::{Result, bail};
use reqwest::Url;
use std::time::Duration;

use super::types::Config;

impl Config {
    /// Validate configuration for correctness
    ///
    /// # Errors
    /// Returns the first constraint that does not hold.
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.qbittorrent.base_url)?;
        require_nonzero("qbittorrent.timeout", self.qbittorrent.timeout)?;

        if !self.metrics.url_path.starts_with('/') {
            bail!(
                "metrics.url_path '{}' must start with '/'",
                self.metrics.url_path
            );
        }
        if self.metrics.host.trim().is_empty() {
            bail!("metrics.host must not be empty");
        }

        require_nonzero("state.persist_interval", self.state.persist_interval)?;
        require_nonzero("polling.torrents_interval", self.polling.torrents_interval)?;
        require_nonzero("polling.transfer_interval", self.polling.transfer_interval)?;
        require_nonzero("polling.version_interval", self.polling.version_interval)?;

        if self.qbittorrent.username.is_empty() {
            tracing::warn!("qbittorrent.username is empty, login relies on Web UI bypass rules");
        }

        Ok(())
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => bail!("qbittorrent.base_url '{base_url}' is not a valid URL: {e}"),
    };
    if !matches!(url.scheme(), "http" | "https") {
        bail!("qbittorrent.base_url '{base_url}' must use http or https");
    }
    if url.host_str().is_none() {
        bail!("qbittorrent.base_url '{base_url}' has no host");
    }
    Ok(())
}

fn require_nonzero(field: &str, value: Duration) -> Result<()> {
    if value.is_zero() {
        bail!("{field} must be greater than zero");
    }
    Ok(())
}
