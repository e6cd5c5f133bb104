//! Lifetime transfer totals and the restart-aware delta rule

use serde::{Deserialize, Serialize};
use std::fmt;

/// Durable record of lifetime transfer totals
///
/// `*_info_data` hold the last session counter seen from the remote,
/// `*_info_data_total` the lifetime sums. Totals never decrease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferCounterState {
    pub dl_info_data: u64,
    pub dl_info_data_total: u64,
    pub up_info_data: u64,
    pub up_info_data_total: u64,
}

/// Top-level layout of the state file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub transfer_info: TransferCounterState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Download,
    Upload,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Download => "download",
            Self::Upload => "upload",
        })
    }
}

impl TransferCounterState {
    /// Fold new session readings into the lifetime totals
    ///
    /// A reading below the last one means the remote session restarted, in
    /// which case the whole reading counts as new traffic.
    pub fn advance(&mut self, downloaded: u64, uploaded: u64) {
        let dl_delta = session_delta(Direction::Download, downloaded, self.dl_info_data);
        let up_delta = session_delta(Direction::Upload, uploaded, self.up_info_data);

        self.dl_info_data = downloaded;
        self.dl_info_data_total = self.dl_info_data_total.saturating_add(dl_delta);
        self.up_info_data = uploaded;
        self.up_info_data_total = self.up_info_data_total.saturating_add(up_delta);
    }
}

fn session_delta(direction: Direction, current: u64, last: u64) -> u64 {
    if current >= last {
        current - last
    } else {
        tracing::info!(
            %direction,
            current,
            last,
            "Session counter is lower than the last recorded one, possible session restart"
        );
        current
    }
}
