//! Centralized logging setup
//!
//! Console output is always on, in plain text or JSON. An optional log file
//! receives the same events through a non-blocking writer; the returned
//! guard must be held by `main` so buffered lines are flushed on exit.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Console output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Default,
    /// One JSON object per event
    Json,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the event filter
///
/// `RUST_LOG` wins when set, otherwise `level` is used as the directive.
///
/// # Errors
/// Returns an error if `level` is not a valid filter directive.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))
}

/// Install the global subscriber
///
/// # Errors
/// Fails on an invalid level, or when a subscriber is already installed.
pub fn init_logging(
    level: &str,
    format: LogFormat,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(level)?;

    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    layers.push(match format {
        LogFormat::Default => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed(),
    });

    let guard = match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

fn file_writer(path: &Path) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path '{}' has no file name", path.display()))?;
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
