//! Delivery metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use observability::{RunningStats, StatsSummary};

/// Counters shared between the dispatcher task and whoever reports on it
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    /// Successful deliveries
    delivered: AtomicU64,
    /// Failed delivery attempts (dropped, never retried)
    failed: AtomicU64,
    /// Chunks that produced no complete text
    skipped_empty: AtomicU64,
    /// Bytes of text handed to the notifier successfully
    bytes_delivered: AtomicU64,
    /// Latency of every attempt in milliseconds
    latency_ms: Mutex<RunningStats>,
}

impl DeliveryMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful delivery
    pub fn record_delivered(&self, bytes: usize, latency_ms: f64) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        self.bytes_delivered
            .fetch_add(bytes as u64, Ordering::Relaxed);
        self.push_latency(latency_ms);
    }

    /// Record a failed attempt
    pub fn record_failed(&self, latency_ms: f64) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.push_latency(latency_ms);
    }

    /// Record a chunk that had nothing to deliver
    pub fn record_skipped(&self) {
        self.skipped_empty.fetch_add(1, Ordering::Relaxed);
    }

    /// Get delivered count
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Get failure count
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> DeliverySnapshot {
        DeliverySnapshot {
            delivered: self.delivered(),
            failed: self.failed(),
            skipped_empty: self.skipped_empty.load(Ordering::Relaxed),
            bytes_delivered: self.bytes_delivered.load(Ordering::Relaxed),
            latency_ms: self
                .latency_ms
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .summary(),
        }
    }

    fn push_latency(&self, latency_ms: f64) {
        self.latency_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(latency_ms);
    }
}

/// Snapshot of delivery metrics (for reporting)
#[derive(Debug, Clone, Default)]
pub struct DeliverySnapshot {
    pub delivered: u64,
    pub failed: u64,
    pub skipped_empty: u64,
    pub bytes_delivered: u64,
    pub latency_ms: StatsSummary,
}

impl DeliverySnapshot {
    /// Delivery attempts, successful or not
    pub fn attempts(&self) -> u64 {
        self.delivered + self.failed
    }
}
