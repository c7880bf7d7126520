//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::TailConfig;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_tail(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;

    info!(
        path = ?config.source.path,
        endpoint = %config.target.endpoint,
        topic = %config.target.topic,
        notifier = ?config.delivery.notifier,
        ingest_interval_secs = config.source.ingest_interval_secs,
        flush_interval_secs = config.delivery.flush_interval_secs,
        "Configuration loaded"
    );

    if let Some(port) = args.metrics_port {
        observability::init_metrics_only(port)?;
        info!("Metrics endpoint available on port {}", port);
    }

    let pipeline = Pipeline::new(PipelineConfig {
        tail: config,
        show_progress: !args.no_progress,
    });
    let mut running = pipeline.start().await.context("Startup failed")?;

    println!("{}", running.banner());

    tokio::select! {
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
        _ = running.wait() => {
            warn!("Pipeline task ended unexpectedly");
        }
    }

    let stats = running.stop().await;
    stats.print_summary();

    info!("chattail finished");
    Ok(())
}

/// Merge the optional configuration file with command-line values and
/// validate the result.
pub fn build_config(args: &RunArgs) -> Result<TailConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::parse_from_path(path).map_err(CliError::Config)?
        }
        None => TailConfig::default(),
    };

    apply_overrides(&mut config, args);

    ConfigLoader::validate(&config).map_err(CliError::Config)?;
    Ok(config)
}

fn apply_overrides(config: &mut TailConfig, args: &RunArgs) {
    if let Some(file) = &args.file {
        config.source.path = Some(file.clone());
    }
    if let Some(webhook) = &args.webhook {
        config.target.endpoint = webhook.clone();
    }
    if let Some(channel) = &args.channel {
        config.target.topic = channel.clone();
    }
    if let Some(secs) = args.ingest_interval {
        config.source.ingest_interval_secs = secs;
    }
    if let Some(secs) = args.flush_interval {
        config.delivery.flush_interval_secs = secs;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.source.chunk_size = chunk_size;
    }
    if let Some(notifier) = args.notifier {
        config.delivery.notifier = notifier.into();
    }
    if let Some(username) = &args.username {
        config.delivery.username = Some(username.clone());
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
