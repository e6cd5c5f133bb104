//! qBittorrent Web API v2 client
//!
//! Logs in once with username/password and reuses the `SID` session cookie
//! for every subsequent request.

use async_trait::async_trait;
use reqwest::header::{COOKIE, REFERER};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use super::DataSource;
use crate::constants::api;
use crate::error::ApiError;
use crate::types::{Torrent, Transfer};

/// Connection settings for [`QbittorrentClient::login`]
#[derive(Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Overall timeout for one request, connect included
    pub timeout: Duration,
    /// Accept invalid TLS certificates (self-signed Web UI setups)
    pub insecure_skip_verify: bool,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

/// Authenticated qBittorrent Web API session
pub struct QbittorrentClient {
    http: reqwest::Client,
    base_url: String,
    session: String,
}

impl fmt::Debug for QbittorrentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QbittorrentClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl QbittorrentClient {
    /// Authenticate against the Web API and keep the session cookie
    ///
    /// # Errors
    /// Fails on transport errors, non-2xx responses and logins that do not
    /// return a session cookie (wrong credentials, banned IP).
    pub async fn login(options: &ClientOptions) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(options.insecure_skip_verify)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: api::AUTH_LOGIN,
                source,
            })?;

        let base_url = options.base_url.trim_end_matches('/').to_string();
        let response = http
            .post(format!("{base_url}{}", api::AUTH_LOGIN))
            .header(REFERER, &base_url)
            .form(&[
                ("username", options.username.as_str()),
                ("password", options.password.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: api::AUTH_LOGIN,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: api::AUTH_LOGIN,
                status: status.as_u16(),
            });
        }

        let session = response
            .cookies()
            .find(|cookie| cookie.name() == api::SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(ApiError::MissingSessionCookie {
                cookie: api::SESSION_COOKIE,
            })?;

        info!(base_url = %base_url, "Logged in to qBittorrent Web API");

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &'static str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .get(format!("{}{endpoint}", self.base_url))
            .header(COOKIE, format!("{}={}", api::SESSION_COOKIE, self.session))
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ApiError> {
        let body = self
            .get(endpoint)
            .await?
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        debug!(endpoint, bytes = body.len(), "Received API response");

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[async_trait]
impl DataSource for QbittorrentClient {
    async fn torrents(&self) -> Result<Vec<Torrent>, ApiError> {
        self.get_json(api::TORRENTS_INFO).await
    }

    async fn transfer(&self) -> Result<Transfer, ApiError> {
        self.get_json(api::TRANSFER_INFO).await
    }

    async fn app_version(&self) -> Result<String, ApiError> {
        let endpoint = api::APP_VERSION;
        let body = self
            .get(endpoint)
            .await?
            .text()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        Ok(body.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_debug_redacts_password() {
        let options = ClientOptions {
            base_url: "http://localhost:8080".into(),
            username: "admin".into(),
            password: "hunter2".into(),
            timeout: Duration::from_secs(5),
            insecure_skip_verify: false,
        };
        let debug = format!("{options:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_login_unreachable_is_transport_error() {
        let options = ClientOptions {
            base_url: "http://127.0.0.1:1".into(),
            username: "admin".into(),
            password: "adminadmin".into(),
            timeout: Duration::from_secs(2),
            insecure_skip_verify: false,
        };
        let err = QbittorrentClient::login(&options).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport {
                endpoint: api::AUTH_LOGIN,
                ..
            }
        ));
    }
}
