//! Restart-tolerant lifetime transfer counters
//!
//! qBittorrent reports bytes transferred since its own session started. The
//! [`CounterTracker`] folds those readings into lifetime totals that survive
//! both remote restarts (a lower reading starts a new session) and exporter
//! restarts (totals are persisted to a JSON file in durable mode).
//!
//! All operations on a tracker share one async mutex, so an update never
//! interleaves with another update or with a write of the state file. A
//! write owns the lock until the file is closed, even when the future that
//! started it is dropped.

mod counters;
mod store;

pub use counters::{PersistedState, TransferCounterState};
pub use store::StateMode;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::error::StateError;

/// Behaviour switches for a [`CounterTracker`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Also write the state file inside every update (durable mode only)
    pub persist_on_update: bool,
}

/// Owner of the lifetime transfer totals
#[derive(Debug)]
pub struct CounterTracker {
    state: Arc<Mutex<TransferCounterState>>,
    mode: StateMode,
    options: TrackerOptions,
}

impl CounterTracker {
    /// Create a tracker, loading prior totals in durable mode
    pub async fn open(mode: StateMode, options: TrackerOptions) -> Self {
        let state = match &mode {
            StateMode::Transient => {
                debug!("Counter state is transient, starting from zero");
                TransferCounterState::default()
            }
            StateMode::Durable(path) => store::read_state(path).await,
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            mode,
            options,
        }
    }

    /// In-memory tracker starting from zero
    #[must_use]
    pub fn transient() -> Self {
        Self {
            state: Arc::new(Mutex::new(TransferCounterState::default())),
            mode: StateMode::Transient,
            options: TrackerOptions::default(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &StateMode {
        &self.mode
    }

    /// Ingest new session readings and return the updated totals
    pub async fn update(&self, downloaded: u64, uploaded: u64) -> TransferCounterState {
        let mut state = Arc::clone(&self.state).lock_owned().await;
        state.advance(downloaded, uploaded);
        let snapshot = *state;

        if self.options.persist_on_update
            && let StateMode::Durable(path) = &self.mode
            && let Err(e) = write_locked(path.clone(), state).await
        {
            warn!(error = %e, "Failed to persist counter state after update");
        }

        snapshot
    }

    /// Current totals without modifying them
    pub async fn snapshot(&self) -> TransferCounterState {
        *self.state.lock().await
    }

    /// Write the current totals to the state file
    ///
    /// A no-op in transient mode. On failure the in-memory state stays
    /// authoritative and the next call tries again.
    pub async fn persist(&self) -> Result<(), StateError> {
        let StateMode::Durable(path) = &self.mode else {
            return Ok(());
        };

        let state = Arc::clone(&self.state).lock_owned().await;
        let snapshot = *state;
        write_locked(path.clone(), state).await?;
        debug!(path = %path.display(), state = ?snapshot, "Persisted counter state");
        Ok(())
    }
}

/// Write `state` on the blocking pool, releasing the lock only once done
///
/// Dropping the returned future does not stop the write; the guard travels
/// with the blocking task, so the next writer waits for it.
async fn write_locked(
    path: PathBuf,
    state: OwnedMutexGuard<TransferCounterState>,
) -> Result<(), StateError> {
    tokio::task::spawn_blocking(move || {
        let result = store::write_state(&path, *state);
        drop(state);
        result
    })
    .await?
}
