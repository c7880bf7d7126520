//! Watcher configuration and metrics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use contracts::{SourceConfig, DEFAULT_CHUNK_SIZE};

/// Watcher configuration
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Maximum bytes consumed per poll
    pub chunk_size: usize,

    /// Sleep between polls
    pub ingest_interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            ingest_interval: Duration::from_secs(1),
        }
    }
}

impl WatcherConfig {
    /// Create new watcher configuration
    pub fn new(chunk_size: usize, ingest_interval: Duration) -> Self {
        Self {
            chunk_size,
            ingest_interval,
        }
    }
}

impl From<&SourceConfig> for WatcherConfig {
    fn from(source: &SourceConfig) -> Self {
        Self::new(source.chunk_size, source.ingest_interval())
    }
}

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Total poll iterations
    pub polls: AtomicU64,

    /// Total bytes read (equals cursor advance since startup)
    pub bytes_read: AtomicU64,

    /// Total chunks pushed onto the hand-off queue
    pub chunks_enqueued: AtomicU64,

    /// Read error count
    pub read_errors: AtomicU64,

    /// Current cursor offset
    pub offset: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one poll iteration
    pub fn record_poll(&self) {
        self.polls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an enqueued chunk and the cursor it moved to
    pub fn record_chunk(&self, bytes: usize, offset: u64) {
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
        self.chunks_enqueued.fetch_add(1, Ordering::Relaxed);
        self.offset.store(offset, Ordering::Relaxed);
    }

    /// Record read error
    pub fn record_read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Set cursor offset
    pub fn set_offset(&self, offset: u64) {
        self.offset.store(offset, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            polls: self.polls.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            chunks_enqueued: self.chunks_enqueued.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            offset: self.offset.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total poll iterations
    pub polls: u64,

    /// Total bytes read
    pub bytes_read: u64,

    /// Total chunks enqueued
    pub chunks_enqueued: u64,

    /// Read error count
    pub read_errors: u64,

    /// Current cursor offset
    pub offset: u64,
}
