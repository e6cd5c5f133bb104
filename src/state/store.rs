//! Reading and writing the state file

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::counters::{PersistedState, TransferCounterState};
use crate::error::StateError;

/// Where counter state lives between process restarts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateMode {
    /// Nothing is read or written; totals start from zero on every start
    Transient,
    /// State is loaded from and written to this file
    Durable(PathBuf),
}

impl StateMode {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Transient => None,
            Self::Durable(path) => Some(path),
        }
    }

    #[must_use]
    pub const fn is_durable(&self) -> bool {
        matches!(self, Self::Durable(_))
    }
}

/// Load prior state, falling back to zero on any problem
///
/// First runs and ephemeral environments have no file yet, so a missing or
/// unreadable file is never an error here.
pub(super) async fn read_state(path: &Path) -> TransferCounterState {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            info!(
                path = %path.display(),
                error = %e,
                "No state file yet, it will be created on next write"
            );
            return TransferCounterState::default();
        }
    };

    if !metadata.is_file() {
        warn!(path = %path.display(), "State path is not a regular file, using empty state");
        return TransferCounterState::default();
    }

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to read state file, using empty state"
            );
            return TransferCounterState::default();
        }
    };

    match serde_json::from_str::<PersistedState>(&content) {
        Ok(persisted) => {
            debug!(
                path = %path.display(),
                state = ?persisted.transfer_info,
                "Loaded counter state"
            );
            persisted.transfer_info
        }
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "Failed to decode state file, using empty state"
            );
            TransferCounterState::default()
        }
    }
}

/// Replace the state file with `state`
///
/// Blocking. Callers run it on the blocking pool while still holding the
/// tracker lock, so no two writes of one file ever overlap.
pub(super) fn write_state(path: &Path, state: TransferCounterState) -> Result<(), StateError> {
    let persisted = PersistedState {
        transfer_info: state,
    };
    let mut content = serde_json::to_vec_pretty(&persisted)?;
    content.push(b'\n');

    std::fs::write(path, content).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
