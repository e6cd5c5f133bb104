//! Snapshot types decoded from the qBittorrent Web API
//!
//! Plus the small validated newtypes and serde helpers used by configuration.

mod duration;
mod port;
mod torrent;
mod transfer;

pub use duration::duration_serde;
pub use port::{Port, PortError};
pub use torrent::Torrent;
pub use transfer::{ConnectionStatus, Transfer};
