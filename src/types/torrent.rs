//! Torrent snapshot as returned by `/api/v2/torrents/info`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the torrent list
///
/// Every field defaults when absent so that older and newer qBittorrent
/// releases decode into the same shape. Fields this type does not know
/// about are kept in `additional_fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Torrent {
    pub added_on: i64,
    pub amount_left: i64,
    pub auto_tmm: bool,
    pub availability: f64,
    pub category: String,
    pub completed: i64,
    pub completion_on: i64,
    pub content_path: String,
    pub dl_limit: i64,
    pub dlspeed: i64,
    pub downloaded: i64,
    pub downloaded_session: i64,
    pub eta: i64,
    pub f_l_piece_prio: bool,
    pub force_start: bool,
    pub hash: String,
    #[serde(rename = "isPrivate")]
    pub is_private: bool,
    pub last_activity: i64,
    pub magnet_uri: String,
    pub max_ratio: f64,
    pub max_seeding_time: i64,
    pub name: String,
    pub num_complete: i64,
    pub num_incomplete: i64,
    pub num_leechs: i64,
    pub num_seeds: i64,
    pub priority: i64,
    pub progress: f64,
    pub ratio: f64,
    pub ratio_limit: f64,
    pub save_path: String,
    pub seeding_time: i64,
    pub seeding_time_limit: i64,
    pub seen_complete: i64,
    pub seq_dl: bool,
    pub size: i64,
    pub state: String,
    pub super_seeding: bool,
    pub tags: String,
    pub time_active: i64,
    pub total_size: i64,
    pub tracker: String,
    pub up_limit: i64,
    pub uploaded: i64,
    pub uploaded_session: i64,
    pub upspeed: i64,
    #[serde(flatten)]
    pub additional_fields: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_entry() {
        let json = r#"{
            "name": "debian-12.iso",
            "state": "uploading",
            "progress": 1.0,
            "dlspeed": 0,
            "upspeed": 5120,
            "isPrivate": true,
            "num_seeds": 3,
            "popularity": 0.5
        }"#;

        let torrent: Torrent = serde_json::from_str(json).unwrap();
        assert_eq!(torrent.name, "debian-12.iso");
        assert_eq!(torrent.state, "uploading");
        assert_eq!(torrent.upspeed, 5120);
        assert!(torrent.is_private);
        assert_eq!(torrent.num_seeds, 3);
        assert_eq!(torrent.amount_left, 0);
        assert_eq!(
            torrent.additional_fields.get("popularity"),
            Some(&serde_json::json!(0.5))
        );
    }

    #[test]
    fn test_decode_list() {
        let torrents: Vec<Torrent> =
            serde_json::from_str(r#"[{"name":"a"},{"name":"b","eta":8640000}]"#).unwrap();
        assert_eq!(torrents.len(), 2);
        assert_eq!(torrents[1].eta, 8_640_000);
    }
}
