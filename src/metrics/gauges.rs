//! Gauge families exported by the exporter
//!
//! Every family is declared here once, registered at construction and
//! reached through a named field, so a typo in a metric name is a compile
//! error rather than a missing series at scrape time.

use prometheus::{Gauge, GaugeVec, Opts, Registry};

/// Builds prefixed gauges and registers them on one registry
pub(super) struct GaugeFactory<'a> {
    registry: &'a Registry,
    prefix: &'a str,
}

impl<'a> GaugeFactory<'a> {
    pub(super) fn new(registry: &'a Registry, prefix: &'a str) -> Self {
        Self { registry, prefix }
    }

    fn gauge(&self, name: &str, help: &str) -> prometheus::Result<Gauge> {
        let gauge = Gauge::with_opts(Opts::new(format!("{}{name}", self.prefix), help))?;
        self.registry.register(Box::new(gauge.clone()))?;
        Ok(gauge)
    }

    fn gauge_vec(&self, name: &str, help: &str, labels: &[&str]) -> prometheus::Result<GaugeVec> {
        let gauge = GaugeVec::new(Opts::new(format!("{}{name}", self.prefix), help), labels)?;
        self.registry.register(Box::new(gauge.clone()))?;
        Ok(gauge)
    }
}

/// Per-torrent gauges, labelled by torrent name
pub(super) struct TorrentGauges {
    pub name: GaugeVec,
    pub state: GaugeVec,
    pub progress: GaugeVec,
    pub dlspeed: GaugeVec,
    pub upspeed: GaugeVec,
    pub downloaded: GaugeVec,
    pub amount_left: GaugeVec,
    pub ratio: GaugeVec,
    pub eta: GaugeVec,
    pub num_seeds: GaugeVec,
    pub num_leechs: GaugeVec,
}

impl TorrentGauges {
    pub(super) fn register(factory: &GaugeFactory<'_>) -> prometheus::Result<Self> {
        let by_name = &["name"];
        Ok(Self {
            name: factory.gauge_vec("torrent_name", "Name of the torrent", by_name)?,
            state: factory.gauge_vec("torrent_state", "State of the torrent", &["name", "state"])?,
            progress: factory.gauge_vec("torrent_progress", "Progress of the torrent", by_name)?,
            dlspeed: factory.gauge_vec(
                "torrent_dlspeed",
                "Download speed of the torrent (bytes/s)",
                by_name,
            )?,
            upspeed: factory.gauge_vec(
                "torrent_upspeed",
                "Upload speed of the torrent (bytes/s)",
                by_name,
            )?,
            downloaded: factory.gauge_vec(
                "torrent_downloaded",
                "Amount of data downloaded (bytes)",
                by_name,
            )?,
            amount_left: factory.gauge_vec(
                "torrent_amount_left",
                "Amount of data left to download (bytes)",
                by_name,
            )?,
            ratio: factory.gauge_vec("torrent_ratio", "Torrent share ratio", by_name)?,
            eta: factory.gauge_vec(
                "torrent_eta",
                "Estimated time to completion (seconds)",
                by_name,
            )?,
            num_seeds: factory.gauge_vec(
                "torrent_num_seeds",
                "Number of seeds connected to",
                by_name,
            )?,
            num_leechs: factory.gauge_vec(
                "torrent_num_leechs",
                "Number of leechers connected to",
                by_name,
            )?,
        })
    }

    /// Drop every series labelled with `name` except the state family
    pub(super) fn remove_name(&self, name: &str) {
        for family in [
            &self.name,
            &self.progress,
            &self.dlspeed,
            &self.upspeed,
            &self.downloaded,
            &self.amount_left,
            &self.ratio,
            &self.eta,
            &self.num_seeds,
            &self.num_leechs,
        ] {
            // Absent labels are not an error worth reporting here.
            let _ = family.remove_label_values(&[name]);
        }
    }
}

/// Global transfer gauges
pub(super) struct TransferGauges {
    pub connection_status: Gauge,
    pub dl_info_speed: Gauge,
    pub dl_info_data: Gauge,
    pub up_info_speed: Gauge,
    pub up_info_data: Gauge,
    pub dl_rate_limit: Gauge,
    pub up_rate_limit: Gauge,
    pub dht_nodes: Gauge,
    pub dl_info_data_total: Gauge,
    pub up_info_data_total: Gauge,
}

impl TransferGauges {
    pub(super) fn register(factory: &GaugeFactory<'_>) -> prometheus::Result<Self> {
        Ok(Self {
            connection_status: factory.gauge(
                "transfer_connection_status",
                "Connection status (1 when connected)",
            )?,
            dl_info_speed: factory
                .gauge("transfer_dl_info_speed", "Global download rate (bytes/s)")?,
            dl_info_data: factory.gauge(
                "transfer_dl_info_data",
                "Data downloaded this session (bytes)",
            )?,
            up_info_speed: factory.gauge("transfer_up_info_speed", "Global upload rate (bytes/s)")?,
            up_info_data: factory
                .gauge("transfer_up_info_data", "Data uploaded this session (bytes)")?,
            dl_rate_limit: factory
                .gauge("transfer_dl_rate_limit", "Download rate limit (bytes/s)")?,
            up_rate_limit: factory.gauge("transfer_up_rate_limit", "Upload rate limit (bytes/s)")?,
            dht_nodes: factory.gauge("transfer_dht_nodes", "DHT nodes connected to")?,
            dl_info_data_total: factory.gauge(
                "transfer_dl_info_data_total",
                "Data downloaded across sessions (bytes)",
            )?,
            up_info_data_total: factory.gauge(
                "transfer_up_info_data_total",
                "Data uploaded across sessions (bytes)",
            )?,
        })
    }
}
