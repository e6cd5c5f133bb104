//! Prometheus exposition of torrent snapshots
//!
//! [`Metrics`] owns a private registry with every gauge family the exporter
//! publishes. Polling jobs push fresh snapshots in; the scrape endpoint pulls
//! the text encoding out. Cloning is cheap and shares the registry.
//!
//! Updates never clear a family. New values are set first and only the
//! labels missing from the new snapshot are removed afterwards, so a scrape
//! racing an update still sees every torrent that is present in both.

mod gauges;

use prometheus::{Encoder, GaugeVec, Registry, TextEncoder};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::state::TransferCounterState;
use crate::types::{Torrent, Transfer};
use gauges::{GaugeFactory, TorrentGauges, TransferGauges};

/// Shared handle to the exporter's gauges
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    torrent: TorrentGauges,
    transfer: TransferGauges,
    version: GaugeVec,
    /// `(name, state)` pairs published by the last torrent update
    published_torrents: Mutex<HashSet<(String, String)>>,
    published_version: Mutex<Option<String>>,
}

impl Metrics {
    /// Register all gauge families, each name prefixed with `prefix`
    ///
    /// # Errors
    /// Fails if the prefix produces an invalid metric name.
    pub fn new(prefix: &str) -> prometheus::Result<Self> {
        let registry = Registry::new();
        let factory = GaugeFactory::new(&registry, prefix);

        let torrent = TorrentGauges::register(&factory)?;
        let transfer = TransferGauges::register(&factory)?;
        let version = GaugeVec::new(
            prometheus::Opts::new(format!("{prefix}app_version"), "Application version"),
            &["version"],
        )?;
        registry.register(Box::new(version.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                torrent,
                transfer,
                version,
                published_torrents: Mutex::default(),
                published_version: Mutex::default(),
            }),
        })
    }

    /// Replace the per-torrent series with the given list
    pub fn update_torrents(&self, torrents: &[Torrent]) {
        let tm = &self.inner.torrent;
        let mut published = self
            .inner
            .published_torrents
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        for torrent in torrents {
            let name = torrent.name.as_str();
            tm.name.with_label_values(&[name]).set(1.0);
            tm.state
                .with_label_values(&[name, torrent.state.as_str()])
                .set(1.0);
            tm.progress.with_label_values(&[name]).set(torrent.progress);
            tm.dlspeed.with_label_values(&[name]).set(torrent.dlspeed as f64);
            tm.upspeed.with_label_values(&[name]).set(torrent.upspeed as f64);
            tm.downloaded
                .with_label_values(&[name])
                .set(torrent.downloaded as f64);
            tm.amount_left
                .with_label_values(&[name])
                .set(torrent.amount_left as f64);
            tm.ratio.with_label_values(&[name]).set(torrent.ratio);
            tm.eta.with_label_values(&[name]).set(torrent.eta as f64);
            tm.num_seeds
                .with_label_values(&[name])
                .set(torrent.num_seeds as f64);
            tm.num_leechs
                .with_label_values(&[name])
                .set(torrent.num_leechs as f64);
        }

        let current: HashSet<(String, String)> = torrents
            .iter()
            .map(|t| (t.name.clone(), t.state.clone()))
            .collect();
        let current_names: HashSet<&str> = current.iter().map(|(name, _)| name.as_str()).collect();

        let mut stale_names = HashSet::new();
        for (name, state) in published.difference(&current) {
            let _ = tm.state.remove_label_values(&[name.as_str(), state.as_str()]);
            if !current_names.contains(name.as_str()) {
                stale_names.insert(name.as_str());
            }
        }
        for name in &stale_names {
            tm.remove_name(name);
        }
        let removed = stale_names.len();
        *published = current;

        debug!(torrents = torrents.len(), removed, "Updated torrent metrics");
    }

    /// Publish session counters together with the lifetime totals
    pub fn update_transfer(&self, transfer: &Transfer, totals: &TransferCounterState) {
        let tm = &self.inner.transfer;
        let status = if transfer.connection_status.is_connected() {
            1.0
        } else {
            0.0
        };

        tm.connection_status.set(status);
        tm.dl_info_speed.set(transfer.dl_info_speed as f64);
        tm.dl_info_data.set(transfer.dl_info_data as f64);
        tm.up_info_speed.set(transfer.up_info_speed as f64);
        tm.up_info_data.set(transfer.up_info_data as f64);
        tm.dl_rate_limit.set(transfer.dl_rate_limit as f64);
        tm.up_rate_limit.set(transfer.up_rate_limit as f64);
        tm.dht_nodes.set(transfer.dht_nodes as f64);

        debug!(
            dl_info_data_total = totals.dl_info_data_total,
            up_info_data_total = totals.up_info_data_total,
            "Updated transfer metrics"
        );
        tm.dl_info_data_total.set(totals.dl_info_data_total as f64);
        tm.up_info_data_total.set(totals.up_info_data_total as f64);
    }

    /// Mark `version` as the running application version
    pub fn update_version(&self, version: &str) {
        let mut published = self
            .inner
            .published_version
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        self.inner.version.with_label_values(&[version]).set(1.0);
        if let Some(previous) = published.as_deref()
            && previous != version
        {
            let _ = self.inner.version.remove_label_values(&[previous]);
        }
        *published = Some(version.to_string());
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Render the registry in the Prometheus text format
    ///
    /// # Errors
    /// Fails only if the encoder rejects a gathered family.
    pub fn encode(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.inner.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Content type of [`Metrics::encode`] output
    #[must_use]
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}
