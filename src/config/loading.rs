//! Configuration loading from files and environment variables
//!
//! Environment variables take precedence over the file so container
//! deployments can override single fields without mounting a config. Only
//! the variables in [`ENV_OVERRIDES`] are consulted.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::types::Config;
use crate::types::Port;

/// Every environment variable that overrides a configuration field
pub const ENV_OVERRIDES: &[&str] = &[
    "QBT_BASE_URL",
    "QBT_USERNAME",
    "QBT_PASSWORD",
    "QBT_TIMEOUT",
    "QBT_INSECURE_SKIP_VERIFY",
    "METRICS_HOST",
    "METRICS_PORT",
    "METRICS_URL_PATH",
    "METRICS_PREFIX",
    "STATE_PATH",
];

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file found, built-in defaults plus environment
    Defaults,
}

impl ConfigSource {
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::File(path) => format!("file {}", path.display()),
            Self::Defaults => "defaults and environment".to_string(),
        }
    }
}

/// Load configuration from a TOML file, with environment variable overrides
///
/// # Errors
/// Fails if the file cannot be read or parsed, an override cannot be parsed,
/// or the result does not validate.
pub fn load_config(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file '{}'", config_path.display()))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load the file if it exists, otherwise start from defaults
///
/// Environment overrides and validation apply either way.
///
/// # Errors
/// Same as [`load_config`], except that a missing file is not an error.
pub fn load_config_with_fallback(
    config_path: impl AsRef<Path>,
) -> Result<(Config, ConfigSource)> {
    let config_path = config_path.as_ref();
    if config_path.exists() {
        let config = load_config(config_path)?;
        return Ok((config, ConfigSource::File(config_path.to_path_buf())));
    }

    info!(
        path = %config_path.display(),
        "Config file not found, using defaults and environment"
    );
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok((config, ConfigSource::Defaults))
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    let qb = &mut config.qbittorrent;
    if let Some(value) = env_override("QBT_BASE_URL") {
        qb.base_url = value;
    }
    if let Some(value) = env_override("QBT_USERNAME") {
        qb.username = value;
    }
    if let Some(value) = env_override("QBT_PASSWORD") {
        qb.password = value;
    }
    if let Some(value) = env_override("QBT_TIMEOUT") {
        qb.timeout = Duration::from_secs(parse_env::<u64>("QBT_TIMEOUT", &value)?);
    }
    if let Some(value) = env_override("QBT_INSECURE_SKIP_VERIFY") {
        qb.insecure_skip_verify = parse_bool("QBT_INSECURE_SKIP_VERIFY", &value)?;
    }

    let metrics = &mut config.metrics;
    if let Some(value) = env_override("METRICS_HOST") {
        metrics.host = value;
    }
    if let Some(value) = env_override("METRICS_PORT") {
        metrics.port = parse_env::<Port>("METRICS_PORT", &value)?;
    }
    if let Some(value) = env_override("METRICS_URL_PATH") {
        metrics.url_path = value;
    }
    if let Some(value) = env_override("METRICS_PREFIX") {
        metrics.prefix = value;
    }

    if let Some(value) = env_override("STATE_PATH") {
        config.state.path = (!value.is_empty()).then(|| PathBuf::from(value));
    }

    Ok(())
}

/// Read one override, logging its key (never its value)
fn env_override(key: &'static str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    info!(key, "Applying environment override");
    Some(value)
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid value for {key}: {e}"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" => Ok(true),
        "0" | "f" | "false" | "no" => Ok(false),
        _ => Err(anyhow!("Invalid value for {key}: expected a boolean")),
    }
}
