//! Pipeline orchestrator - wires the watcher and the dispatcher together.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use contracts::{ContractError, TailConfig};
use dispatcher::{create_notifier, DeliveryMetrics, Dispatcher, DispatcherConfig};
use ingestion::{handoff_queue, FileSource, IngestionMetrics, Watcher, WatcherConfig};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::PipelineStats;
use crate::error::{CliError, Result};
use crate::progress::ConsoleProgress;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated tail configuration
    pub tail: TailConfig,

    /// Draw the console spinner
    pub show_progress: bool,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Open the file, build both loops and spawn them.
    ///
    /// Every failure here is a startup failure.
    pub async fn start(self) -> Result<RunningPipeline> {
        let tail = self.config.tail;
        let path = tail
            .source
            .path
            .clone()
            .ok_or_else(|| CliError::Config(ContractError::missing_field("source.path")))?;

        let source = FileSource::open(&path).await.map_err(CliError::FileOpen)?;
        let notifier = create_notifier(&tail.delivery)?;

        let (tx, rx) = handoff_queue();

        let mut watcher =
            Watcher::start_at_end(source, WatcherConfig::from(&tail.source), tx).await?;
        if self.config.show_progress {
            watcher = watcher.with_progress(ConsoleProgress::new());
        }
        let start_offset = watcher.cursor().offset();
        let ingestion_metrics = watcher.metrics();

        let dispatcher = Dispatcher::new(
            notifier,
            tail.target.clone(),
            rx,
            DispatcherConfig::from(&tail.delivery),
        );
        let delivery_metrics = dispatcher.metrics();

        let watcher_handle = watcher.spawn();
        let dispatcher_handle = dispatcher.spawn();

        info!(
            path = %path.display(),
            start_offset,
            topic = %tail.target.topic,
            "Pipeline started"
        );

        Ok(RunningPipeline {
            path,
            topic: tail.target.topic,
            watcher_handle,
            dispatcher_handle,
            ingestion_metrics,
            delivery_metrics,
            start_offset,
            started: Instant::now(),
        })
    }
}

/// Handles to the two running loops
pub struct RunningPipeline {
    path: PathBuf,
    topic: String,
    watcher_handle: JoinHandle<()>,
    dispatcher_handle: JoinHandle<()>,
    ingestion_metrics: Arc<IngestionMetrics>,
    delivery_metrics: Arc<DeliveryMetrics>,
    start_offset: u64,
    started: Instant,
}

impl RunningPipeline {
    /// Startup line shown to the operator
    pub fn banner(&self) -> String {
        format!(
            "{} -> {}. (Press ctrl-c to stop)",
            self.path.display(),
            self.topic
        )
    }

    /// Wait until either loop finishes on its own.
    ///
    /// Both loops run for the process lifetime, so this only returns if one
    /// of them panicked or lost its queue.
    pub async fn wait(&mut self) {
        let (name, result) = tokio::select! {
            r = &mut self.watcher_handle => ("watcher", r),
            r = &mut self.dispatcher_handle => ("dispatcher", r),
        };
        if let Err(e) = result {
            error!(task = name, error = %e, "Task failed");
        }
    }

    /// Snapshot of the run so far
    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            duration: self.started.elapsed(),
            start_offset: self.start_offset,
            ingestion: self.ingestion_metrics.snapshot(),
            delivery: self.delivery_metrics.snapshot(),
        }
    }

    /// Abort both loops without draining the queue
    ///
    /// A handle already consumed by [`wait`](Self::wait) is finished and is
    /// not awaited again.
    pub async fn stop(mut self) -> PipelineStats {
        self.watcher_handle.abort();
        self.dispatcher_handle.abort();

        for (name, handle) in [
            ("watcher", &mut self.watcher_handle),
            ("dispatcher", &mut self.dispatcher_handle),
        ] {
            if handle.is_finished() {
                continue;
            }
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!(task = name, error = %e, "Task failed");
                }
            }
        }

        let stats = self.stats();
        info!(
            duration_secs = stats.duration.as_secs_f64(),
            bytes_read = stats.ingestion.bytes_read,
            delivered = stats.delivery.delivered,
            "Pipeline stopped"
        );
        stats
    }
}
