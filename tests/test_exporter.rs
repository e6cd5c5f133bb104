//! Poll-and-publish jobs against an in-memory data source

use async_trait::async_trait;
use qbittorrent_exporter::config::{PollingConfig, StateConfig};
use qbittorrent_exporter::types::{ConnectionStatus, Torrent, Transfer};
use qbittorrent_exporter::{
    ApiError, CounterTracker, DataSource, Exporter, Metrics, Scheduler, StateMode,
    TrackerOptions,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time;

/// Scripted remote: each call pops the next transfer reading, `None` fails
#[derive(Default)]
struct FakeSource {
    torrents: Mutex<Vec<Torrent>>,
    transfers: Mutex<VecDeque<Option<Transfer>>>,
    version: Mutex<String>,
    transfer_calls: AtomicUsize,
}

impl FakeSource {
    fn with_transfers(readings: Vec<Option<(u64, u64)>>) -> Self {
        let transfers = readings
            .into_iter()
            .map(|reading| {
                reading.map(|(dl, up)| Transfer {
                    dl_info_data: dl,
                    up_info_data: up,
                    connection_status: ConnectionStatus::Connected,
                    ..Default::default()
                })
            })
            .collect();
        Self {
            transfers: Mutex::new(transfers),
            version: Mutex::new("v4.6.2".to_string()),
            ..Default::default()
        }
    }
}

fn unavailable(endpoint: &'static str) -> ApiError {
    ApiError::Status {
        endpoint,
        status: 503,
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn torrents(&self) -> Result<Vec<Torrent>, ApiError> {
        Ok(self.torrents.lock().unwrap().clone())
    }

    async fn transfer(&self) -> Result<Transfer, ApiError> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        self.transfers
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(|| unavailable("/api/v2/transfer/info"))
    }

    async fn app_version(&self) -> Result<String, ApiError> {
        let version = self.version.lock().unwrap().clone();
        if version.is_empty() {
            return Err(unavailable("/api/v2/app/version"));
        }
        Ok(version)
    }
}

fn exporter(source: Arc<FakeSource>, tracker: Arc<CounterTracker>) -> Exporter {
    Exporter::new(source, tracker, Metrics::new("qb_").unwrap())
}

#[tokio::test]
async fn test_failed_transfer_leaves_tracker_untouched() {
    let source = Arc::new(FakeSource::with_transfers(vec![
        Some((100, 50)),
        None,
        Some((150, 80)),
    ]));
    let tracker = Arc::new(CounterTracker::transient());
    let exporter = exporter(source, Arc::clone(&tracker));

    exporter.poll_transfer().await.unwrap();
    let before = tracker.snapshot().await;

    let err = exporter.poll_transfer().await.unwrap_err();
    assert!(format!("{err:#}").contains("transfer"));
    assert_eq!(tracker.snapshot().await, before);

    exporter.poll_transfer().await.unwrap();
    let after = tracker.snapshot().await;
    assert_eq!(after.dl_info_data_total, 150);
    assert_eq!(after.up_info_data_total, 80);
}

#[tokio::test]
async fn test_transfer_totals_published() {
    let source = Arc::new(FakeSource::with_transfers(vec![
        Some((100, 50)),
        Some((150, 80)),
        Some((20, 10)),
    ]));
    let exporter = exporter(source, Arc::new(CounterTracker::transient()));

    for _ in 0..3 {
        exporter.poll_transfer().await.unwrap();
    }

    let text = exporter.metrics().encode().unwrap();
    assert!(text.contains("qb_transfer_dl_info_data 20"));
    assert!(text.contains("qb_transfer_dl_info_data_total 170"));
    assert!(text.contains("qb_transfer_up_info_data_total 90"));
    assert!(text.contains("qb_transfer_connection_status 1"));
}

#[tokio::test]
async fn test_torrents_and_version_published() {
    let source = Arc::new(FakeSource::with_transfers(vec![]));
    *source.torrents.lock().unwrap() = vec![Torrent {
        name: "debian.iso".to_string(),
        state: "uploading".to_string(),
        ratio: 2.5,
        ..Default::default()
    }];
    let exporter = exporter(Arc::clone(&source), Arc::new(CounterTracker::transient()));

    exporter.poll_torrents().await.unwrap();
    exporter.poll_version().await.unwrap();

    let text = exporter.metrics().encode().unwrap();
    assert!(text.contains(r#"qb_torrent_ratio{name="debian.iso"} 2.5"#));
    assert!(text.contains(r#"qb_app_version{version="v4.6.2"} 1"#));
}

#[tokio::test]
async fn test_failed_version_keeps_previous_value() {
    let source = Arc::new(FakeSource::with_transfers(vec![]));
    let exporter = exporter(Arc::clone(&source), Arc::new(CounterTracker::transient()));

    exporter.poll_version().await.unwrap();
    source.version.lock().unwrap().clear();
    assert!(exporter.poll_version().await.is_err());

    let text = exporter.metrics().encode().unwrap();
    assert!(text.contains(r#"qb_app_version{version="v4.6.2"} 1"#));
}

#[tokio::test(start_paused = true)]
async fn test_registered_jobs_survive_remote_failures() {
    let source = Arc::new(FakeSource::with_transfers(vec![
        None,
        Some((10, 1)),
        None,
        Some((30, 3)),
    ]));
    let tracker = Arc::new(CounterTracker::transient());
    let exporter = exporter(Arc::clone(&source), Arc::clone(&tracker));

    let scheduler = Scheduler::new();
    let polling = PollingConfig {
        torrents_interval: Duration::from_secs(30),
        transfer_interval: Duration::from_secs(10),
        version_interval: Duration::from_secs(600),
    };
    exporter.register_jobs(&scheduler, &polling, &StateConfig::default());
    assert_eq!(scheduler.running(), 3);

    // Immediate run plus ticks at 10s, 20s, 30s
    time::sleep(Duration::from_secs(35)).await;
    assert_eq!(source.transfer_calls.load(Ordering::SeqCst), 4);
    assert_eq!(tracker.snapshot().await.dl_info_data_total, 30);

    scheduler.cancel();
    scheduler.wait(std::future::pending()).await;
}

#[tokio::test(start_paused = true)]
async fn test_durable_mode_schedules_persistence() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let source = Arc::new(FakeSource::with_transfers(vec![Some((500, 250))]));
    let tracker = Arc::new(
        CounterTracker::open(StateMode::Durable(path.clone()), TrackerOptions::default()).await,
    );
    let exporter = exporter(source, Arc::clone(&tracker));

    let scheduler = Scheduler::new();
    let state = StateConfig {
        path: Some(path.clone()),
        persist_interval: Duration::from_secs(60),
        persist_on_update: false,
    };
    exporter.register_jobs(&scheduler, &PollingConfig::default(), &state);
    assert_eq!(scheduler.running(), 4);

    time::sleep(Duration::from_secs(1)).await;
    assert!(!path.exists());

    time::sleep(Duration::from_secs(60)).await;
    scheduler.cancel();
    scheduler.wait(std::future::pending()).await;

    let reopened =
        CounterTracker::open(StateMode::Durable(path), TrackerOptions::default()).await;
    assert_eq!(reopened.snapshot().await.dl_info_data_total, 500);
}
