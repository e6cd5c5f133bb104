//! Prometheus exporter for qBittorrent
//!
//! Polls the qBittorrent Web API on independent schedules, publishes the
//! results as Prometheus gauges and keeps lifetime transfer totals that
//! survive restarts of both qBittorrent and the exporter.
//!
//! The pieces, bottom-up:
//! - [`scheduler`]: concurrent periodic jobs with cooperative shutdown
//! - [`state`]: restart-tolerant lifetime counters, optionally persisted
//! - [`client`]: the [`DataSource`] seam and the Web API client
//! - [`metrics`] and [`server`]: gauge registry and scrape endpoint
//! - [`exporter`]: the poll-and-publish jobs tying them together

pub mod args;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod scheduler;
pub mod server;
pub mod state;
pub mod types;

pub use client::{ClientOptions, DataSource, QbittorrentClient};
pub use config::{Config, ConfigSource, load_config, load_config_with_fallback};
pub use error::{ApiError, StateError};
pub use exporter::Exporter;
pub use metrics::Metrics;
pub use scheduler::{PeriodicTaskOptions, Scheduler};
pub use state::{CounterTracker, StateMode, TrackerOptions, TransferCounterState};
