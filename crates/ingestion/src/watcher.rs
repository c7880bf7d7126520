//! Watcher - producer loop
//!
//! Polls the source at a fixed interval and pushes every non-empty read onto
//! the hand-off queue.

use std::sync::Arc;

use contracts::{Chunk, ChunkSource, ContractError};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::{IngestionMetrics, WatcherConfig};
use crate::cursor::ReadCursor;
use crate::error::Result;
use crate::progress::{Activity, NoProgress, ProgressReporter};
use crate::queue::{enqueue, ChunkSender};
use crate::reader::ChunkReader;

/// Outcome of a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The source has not grown since the last poll
    Idle,
    /// A chunk was read and enqueued
    Enqueued {
        /// Chunk sequence number
        seq: u64,
        /// Bytes read
        bytes: usize,
    },
    /// The read failed; handled as a zero-byte read
    ReadFailed,
}

impl PollOutcome {
    /// Bytes consumed by this poll
    pub fn bytes_read(&self) -> usize {
        match self {
            Self::Enqueued { bytes, .. } => *bytes,
            Self::Idle | Self::ReadFailed => 0,
        }
    }
}

/// File-growth watcher
///
/// Owns the source, the read cursor and the producer end of the queue. None
/// of these are shared with the dispatcher.
pub struct Watcher<S> {
    source: S,
    cursor: ReadCursor,
    reader: ChunkReader,
    tx: ChunkSender,
    config: WatcherConfig,
    progress: Box<dyn ProgressReporter>,
    metrics: Arc<IngestionMetrics>,
    next_seq: u64,
    total_bytes: u64,
    error_streak: u64,
}

impl<S: ChunkSource> Watcher<S> {
    /// Create a watcher positioned at the current end of `source`.
    ///
    /// Content present before startup is never read.
    ///
    /// # Errors
    /// Fails if the source size cannot be determined
    pub async fn start_at_end(
        mut source: S,
        config: WatcherConfig,
        tx: ChunkSender,
    ) -> Result<Self> {
        let len = source
            .size()
            .await
            .map_err(|e| ContractError::read(0, e))?;
        debug!(offset = len, "watcher positioned at end of source");
        Ok(Self::start_at(source, ReadCursor::at(len), config, tx))
    }

    /// Create a watcher with an explicit cursor
    pub fn start_at(source: S, cursor: ReadCursor, config: WatcherConfig, tx: ChunkSender) -> Self {
        let metrics = Arc::new(IngestionMetrics::new());
        metrics.set_offset(cursor.offset());

        Self {
            source,
            cursor,
            reader: ChunkReader::new(config.chunk_size),
            tx,
            config,
            progress: Box::new(NoProgress),
            metrics,
            next_seq: 0,
            total_bytes: 0,
            error_streak: 0,
        }
    }

    /// Attach a progress reporter
    pub fn with_progress<P: ProgressReporter + 'static>(mut self, progress: P) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Current read cursor
    pub fn cursor(&self) -> ReadCursor {
        self.cursor
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Run one poll iteration (without the trailing sleep).
    ///
    /// A read error is logged and counted, then treated as "no new data".
    ///
    /// # Errors
    /// [`IngestionError::QueueClosed`](crate::IngestionError::QueueClosed) when
    /// the dispatcher side of the queue is gone
    pub async fn poll_once(&mut self) -> Result<PollOutcome> {
        self.metrics.record_poll();

        let outcome = match self.reader.read_next(&mut self.source, &self.cursor).await {
            Ok(read) if read.is_empty() => {
                self.note_recovered();
                PollOutcome::Idle
            }
            Ok(read) => {
                self.note_recovered();
                let bytes = read.bytes_read();
                let seq = self.next_seq;
                let chunk = Chunk::new(seq, self.cursor.offset(), read.bytes);

                self.next_seq += 1;
                let offset = self.cursor.advance(bytes);
                self.total_bytes += bytes as u64;
                self.metrics.record_chunk(bytes, offset);
                observability::record_chunk_read(bytes, offset);

                let depth = enqueue(&self.tx, chunk)?;
                observability::record_queue_depth(depth);
                PollOutcome::Enqueued { seq, bytes }
            }
            Err(e) => {
                self.note_read_error(&e);
                PollOutcome::ReadFailed
            }
        };

        observability::record_poll(outcome.bytes_read());
        let activity = match outcome {
            PollOutcome::Enqueued { .. } => Activity::Reading,
            PollOutcome::Idle | PollOutcome::ReadFailed => Activity::Idle,
        };
        self.progress.report(activity, self.total_bytes);

        Ok(outcome)
    }

    /// Run the polling loop
    ///
    /// Returns only once the consumer end of the queue has been dropped.
    #[instrument(
        name = "watcher_run",
        skip(self),
        fields(offset = self.cursor.offset(), chunk_size = self.reader.chunk_size())
    )]
    pub async fn run(mut self) {
        info!(
            interval_ms = self.config.ingest_interval.as_millis() as u64,
            "Watcher started"
        );

        while !self.tx.is_closed() {
            if let Err(e) = self.poll_once().await {
                warn!(error = %e, "Watcher stopping");
                break;
            }
            tokio::time::sleep(self.config.ingest_interval).await;
        }

        info!(
            bytes_read = self.total_bytes,
            chunks = self.next_seq,
            offset = self.cursor.offset(),
            "Watcher stopped"
        );
    }

    /// Spawn the watcher as a background task
    pub fn spawn(self) -> JoinHandle<()>
    where
        S: Send + 'static,
    {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    fn note_read_error(&mut self, error: &ContractError) {
        self.error_streak += 1;
        self.metrics.record_read_error();
        observability::record_read_error();

        if self.error_streak == 1 {
            warn!(
                error = %error,
                offset = self.cursor.offset(),
                "Read failed, treating as no new data"
            );
        } else {
            debug!(error = %error, streak = self.error_streak, "Read still failing");
        }
    }

    fn note_recovered(&mut self) {
        if self.error_streak > 0 {
            info!(failed_polls = self.error_streak, "Reads recovered");
            self.error_streak = 0;
        }
    }
}
