use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use qbittorrent_exporter::args::Args;
use qbittorrent_exporter::logging::init_logging;
use qbittorrent_exporter::runtime::{resolve_state_mode, shutdown_signal};
use qbittorrent_exporter::{
    CounterTracker, Exporter, Metrics, QbittorrentClient, Scheduler, TrackerOptions,
    load_config_with_fallback, server,
};

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(&args.log_level, args.log_format, args.log_file.as_deref())?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let result = rt.block_on(run(args));
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "Exporter stopped with an error");
    }
    result
}

async fn run(args: Args) -> Result<()> {
    let (mut config, source) = load_config_with_fallback(&args.config)?;
    info!(source = %source.description(), "Loaded configuration");

    if let Some(prefix) = args.prefix {
        config.metrics.prefix = prefix;
    }

    let mode = resolve_state_mode(args.transient_state, config.state.path.as_deref());
    let tracker = Arc::new(
        CounterTracker::open(
            mode,
            TrackerOptions {
                persist_on_update: config.state.persist_on_update,
            },
        )
        .await,
    );

    let client = QbittorrentClient::login(&config.qbittorrent.client_options())
        .await
        .with_context(|| format!("failed to log in to {}", config.qbittorrent.base_url))?;

    let metrics = Metrics::new(&config.metrics.prefix)
        .with_context(|| format!("invalid metric prefix '{}'", config.metrics.prefix))?;
    let exporter = Exporter::new(Arc::new(client), Arc::clone(&tracker), metrics.clone());

    let scheduler = Scheduler::new();
    let metrics_config = config.metrics.clone();
    scheduler.spawn("metrics_server", move |shutdown| async move {
        server::run(
            &metrics_config.host,
            metrics_config.port.get(),
            &metrics_config.url_path,
            metrics,
            shutdown,
        )
        .await
    });
    exporter.register_jobs(&scheduler, &config.polling, &config.state);

    info!(jobs = scheduler.running(), "Exporter started");
    scheduler.wait(shutdown_signal()).await;

    tracker
        .persist()
        .await
        .context("failed to persist counter state on shutdown")?;
    info!("Exporter stopped");
    Ok(())
}
