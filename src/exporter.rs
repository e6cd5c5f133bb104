//! Polling jobs that feed the metrics registry
//!
//! Each job is one poll-and-publish step against the [`DataSource`]. A failed
//! fetch leaves the previously published values (and the counter state) as
//! they were; the scheduler logs the error and the job runs again on its
//! next tick.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::client::DataSource;
use crate::config::{PollingConfig, StateConfig};
use crate::metrics::Metrics;
use crate::scheduler::{PeriodicTaskOptions, Scheduler};
use crate::state::CounterTracker;

/// Job names as they appear in logs
pub mod jobs {
    pub const TORRENTS: &str = "torrents";
    pub const TRANSFER: &str = "transfer";
    pub const VERSION: &str = "version";
    pub const STATE_PERSIST: &str = "state_persist";
}

/// Everything a polling job needs, cheap to clone into each job
#[derive(Clone)]
pub struct Exporter {
    source: Arc<dyn DataSource>,
    tracker: Arc<CounterTracker>,
    metrics: Metrics,
}

impl Exporter {
    #[must_use]
    pub fn new(
        source: Arc<dyn DataSource>,
        tracker: Arc<CounterTracker>,
        metrics: Metrics,
    ) -> Self {
        Self {
            source,
            tracker,
            metrics,
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &Arc<CounterTracker> {
        &self.tracker
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Fetch the torrent list and republish every per-torrent series
    ///
    /// # Errors
    /// Returns the fetch failure; metrics are left untouched.
    pub async fn poll_torrents(&self) -> Result<()> {
        let torrents = self
            .source
            .torrents()
            .await
            .context("failed to poll torrent list")?;
        self.metrics.update_torrents(&torrents);
        Ok(())
    }

    /// Fetch transfer counters, fold them into the lifetime totals and publish
    ///
    /// # Errors
    /// Returns the fetch failure; the tracker only sees successful readings.
    pub async fn poll_transfer(&self) -> Result<()> {
        let transfer = self
            .source
            .transfer()
            .await
            .context("failed to poll transfer info")?;

        let totals = self
            .tracker
            .update(transfer.dl_info_data, transfer.up_info_data)
            .await;
        self.metrics.update_transfer(&transfer, &totals);
        Ok(())
    }

    /// # Errors
    /// Returns the fetch failure.
    pub async fn poll_version(&self) -> Result<()> {
        let version = self
            .source
            .app_version()
            .await
            .context("failed to poll application version")?;
        debug!(%version, "Fetched application version");
        self.metrics.update_version(&version);
        Ok(())
    }

    /// Register all polling jobs, plus state persistence in durable mode
    pub fn register_jobs(
        &self,
        scheduler: &Scheduler,
        polling: &PollingConfig,
        state: &StateConfig,
    ) {
        let exporter = self.clone();
        scheduler.register(
            jobs::TORRENTS,
            Some(PeriodicTaskOptions::every(polling.torrents_interval).immediately()),
            move || {
                let exporter = exporter.clone();
                async move { exporter.poll_torrents().await }
            },
        );

        let exporter = self.clone();
        scheduler.register(
            jobs::TRANSFER,
            Some(PeriodicTaskOptions::every(polling.transfer_interval).immediately()),
            move || {
                let exporter = exporter.clone();
                async move { exporter.poll_transfer().await }
            },
        );

        let exporter = self.clone();
        scheduler.register(
            jobs::VERSION,
            Some(PeriodicTaskOptions::every(polling.version_interval).immediately()),
            move || {
                let exporter = exporter.clone();
                async move { exporter.poll_version().await }
            },
        );

        if !self.tracker.mode().is_durable() {
            debug!("Transient counter state, not scheduling persistence");
            return;
        }

        let tracker = Arc::clone(&self.tracker);
        scheduler.register(
            jobs::STATE_PERSIST,
            Some(PeriodicTaskOptions::every(state.persist_interval)),
            move || {
                let tracker = Arc::clone(&tracker);
                async move {
                    tracker
                        .persist()
                        .await
                        .context("failed to persist counter state")
                }
            },
        );
    }
}
