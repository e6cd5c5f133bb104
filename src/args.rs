//! Command-line argument parsing for the exporter binary

use crate::logging::LogFormat;
use clap::Parser;
use std::path::PathBuf;

/// Prometheus exporter for qBittorrent
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Configuration file path
    ///
    /// Can be overridden with EXPORTER_CONFIG environment variable
    #[arg(short, long, default_value = "config.toml", env = "EXPORTER_CONFIG")]
    pub config: PathBuf,

    /// Log level, used when RUST_LOG is not set
    #[arg(short, long, default_value = "info", env = "EXPORTER_LOG_LEVEL")]
    pub log_level: String,

    /// Console log format
    #[arg(
        long,
        value_enum,
        default_value = "default",
        env = "EXPORTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Also write logs to this file
    #[arg(long, env = "EXPORTER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Metric name prefix (overrides config file)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Keep lifetime totals in memory only, ignoring any configured state path
    #[arg(long = "ff-transient-state", env = "FF_TRANSIENT_STATE")]
    pub transient_state: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["qbittorrent-exporter"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert_eq!(args.log_level, "info");
        assert_eq!(args.log_format, LogFormat::Default);
        assert!(args.log_file.is_none());
        assert!(args.prefix.is_none());
        assert!(!args.transient_state);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "qbittorrent-exporter",
            "--config",
            "/etc/qb/exporter.toml",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--log-file",
            "/var/log/qb.log",
            "--prefix",
            "qbt_",
            "--ff-transient-state",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("/etc/qb/exporter.toml"));
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.log_file, Some(PathBuf::from("/var/log/qb.log")));
        assert_eq!(args.prefix.as_deref(), Some("qbt_"));
        assert!(args.transient_state);
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        assert!(Args::try_parse_from(["qbittorrent-exporter", "--log-format", "xml"]).is_err());
    }
}
