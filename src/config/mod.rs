//! Configuration module
//!
//! Configuration comes from a TOML file, then a fixed set of environment
//! variables override individual fields. The result is validated once at
//! startup; any problem there is fatal.

mod defaults;
mod loading;
mod types;
mod validation;

pub use loading::{ConfigSource, ENV_OVERRIDES, load_config, load_config_with_fallback};
pub use types::{Config, MetricsConfig, PollingConfig, QbittorrentConfig, StateConfig};
