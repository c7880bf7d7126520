//! Dispatcher - consumer loop delivering chunks one at a time

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_channel::Receiver;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use contracts::{Chunk, DeliveryConfig, DispatchTarget, Notifier, DEFAULT_FLUSH_INTERVAL_SECS};

use crate::assembler::Utf8Assembler;
use crate::metrics::DeliveryMetrics;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Cooldown after every delivery attempt
    pub flush_interval: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs_f64(DEFAULT_FLUSH_INTERVAL_SECS),
        }
    }
}

impl From<&DeliveryConfig> for DispatcherConfig {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            flush_interval: config.flush_interval(),
        }
    }
}

/// What happened to one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The notifier accepted the message
    Delivered,
    /// The single attempt failed; the message is dropped
    Failed,
    /// The chunk completed no text, nothing was sent
    Skipped,
}

impl DeliveryOutcome {
    /// Whether the notifier was called
    pub fn attempted(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

/// Consumer loop: WAITING_FOR_CHUNK -> DELIVERING -> COOLDOWN
pub struct Dispatcher<N> {
    notifier: N,
    target: DispatchTarget,
    input_rx: Receiver<Chunk>,
    config: DispatcherConfig,
    assembler: Utf8Assembler,
    metrics: Arc<DeliveryMetrics>,
}

impl<N: Notifier> Dispatcher<N> {
    /// Create a new Dispatcher
    pub fn new(
        notifier: N,
        target: DispatchTarget,
        input_rx: Receiver<Chunk>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            notifier,
            target,
            input_rx,
            config,
            assembler: Utf8Assembler::new(),
            metrics: Arc::new(DeliveryMetrics::new()),
        }
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<DeliveryMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Delivery target
    pub fn target(&self) -> &DispatchTarget {
        &self.target
    }

    /// Run the dispatcher main loop
    ///
    /// Returns when the queue is closed and drained.
    #[instrument(
        name = "dispatcher_run",
        skip(self),
        fields(notifier = %self.notifier.name(), topic = %self.target.topic)
    )]
    pub async fn run(mut self) {
        info!(
            flush_interval_ms = self.config.flush_interval.as_millis() as u64,
            "Dispatcher started"
        );

        while let Ok(chunk) = self.input_rx.recv().await {
            observability::record_queue_depth(self.input_rx.len());
            let outcome = self.dispatch_chunk(&chunk).await;
            if outcome.attempted() {
                tokio::time::sleep(self.config.flush_interval).await;
            }
        }

        let rest = self.assembler.finish();
        if !rest.is_empty() {
            self.deliver(&rest, None).await;
        }

        let snapshot = self.metrics.snapshot();
        info!(
            delivered = snapshot.delivered,
            failed = snapshot.failed,
            "Dispatcher input closed, shutting down"
        );
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<()>
    where
        N: Send + 'static,
    {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Deliver one chunk without the cooldown
    pub async fn dispatch_chunk(&mut self, chunk: &Chunk) -> DeliveryOutcome {
        let text = self.assembler.push(chunk.as_bytes());
        if text.is_empty() {
            self.metrics.record_skipped();
            debug!(
                seq = chunk.seq,
                pending = self.assembler.pending_len(),
                "Chunk completed no text, nothing to deliver"
            );
            return DeliveryOutcome::Skipped;
        }

        self.deliver(&text, Some(chunk.seq)).await
    }

    async fn deliver(&mut self, text: &str, seq: Option<u64>) -> DeliveryOutcome {
        let started = Instant::now();
        let result = self.notifier.deliver(text, &self.target).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        observability::record_delivery(self.notifier.name(), result.is_ok(), text.len(), latency_ms);

        match result {
            Ok(()) => {
                self.metrics.record_delivered(text.len(), latency_ms);
                debug!(seq, bytes = text.len(), latency_ms, "Delivered");
                DeliveryOutcome::Delivered
            }
            Err(e) => {
                self.metrics.record_failed(latency_ms);
                warn!(seq, bytes = text.len(), error = %e, "Delivery failed, message dropped");
                DeliveryOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ContractError;
    use std::sync::Mutex;

    /// Notifier that records every attempt and fails on request
    #[derive(Clone, Default)]
    struct RecordingNotifier {
        attempts: Arc<Mutex<Vec<(String, Instant)>>>,
        fail_on: Vec<usize>,
    }

    impl RecordingNotifier {
        fn texts(&self) -> Vec<String> {
            self.attempts
                .lock()
                .unwrap()
                .iter()
                .map(|(text, _)| text.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(
            &mut self,
            text: &str,
            _target: &DispatchTarget,
        ) -> Result<(), ContractError> {
            let mut attempts = self.attempts.lock().unwrap();
            let index = attempts.len();
            attempts.push((text.to_string(), Instant::now()));
            if self.fail_on.contains(&index) {
                return Err(ContractError::delivery("recording", "mock failure"));
            }
            Ok(())
        }
    }

    fn target() -> DispatchTarget {
        DispatchTarget::new("http://localhost/hook", "general")
    }

    fn fast() -> DispatcherConfig {
        DispatcherConfig {
            flush_interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_delivers_in_order() {
        let (tx, rx) = async_channel::unbounded();
        let notifier = RecordingNotifier::default();
        let dispatcher = Dispatcher::new(notifier.clone(), target(), rx, fast());
        let metrics = dispatcher.metrics();
        let handle = dispatcher.spawn();

        for (i, text) in ["one\n", "two\n", "three\n"].iter().enumerate() {
            tx.send(Chunk::new(i as u64, 0, text.as_bytes().to_vec()))
                .await
                .unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        assert_eq!(notifier.texts(), vec!["one\n", "two\n", "three\n"]);
        assert_eq!(metrics.snapshot().delivered, 3);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_loop() {
        let (tx, rx) = async_channel::unbounded();
        let notifier = RecordingNotifier {
            fail_on: vec![0],
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(notifier.clone(), target(), rx, fast());
        let metrics = dispatcher.metrics();
        let handle = dispatcher.spawn();

        tx.send(Chunk::new(0, 0, &b"lost"[..])).await.unwrap();
        tx.send(Chunk::new(1, 4, &b"kept"[..])).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        // No retry of the failed message
        assert_eq!(notifier.texts(), vec!["lost", "kept"]);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.delivered, 1);
    }

    #[tokio::test]
    async fn test_cooldown_between_deliveries() {
        let (tx, rx) = async_channel::unbounded();
        let notifier = RecordingNotifier {
            fail_on: vec![1],
            ..Default::default()
        };
        let config = DispatcherConfig {
            flush_interval: Duration::from_millis(80),
        };
        let handle = Dispatcher::new(notifier.clone(), target(), rx, config).spawn();

        for i in 0..3u64 {
            tx.send(Chunk::new(i, i, &b"x"[..])).await.unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        let attempts = notifier.attempts.lock().unwrap();
        assert_eq!(attempts.len(), 3);
        for pair in attempts.windows(2) {
            // Cooldown applies after failures too
            assert!(pair[1].1.duration_since(pair[0].1) >= Duration::from_millis(75));
        }
    }

    #[tokio::test]
    async fn test_split_character_is_reassembled() {
        let (tx, rx) = async_channel::unbounded();
        let notifier = RecordingNotifier::default();
        let dispatcher = Dispatcher::new(notifier.clone(), target(), rx, fast());
        let metrics = dispatcher.metrics();
        let handle = dispatcher.spawn();

        tx.send(Chunk::new(0, 0, &b"\xE2\x82"[..])).await.unwrap();
        tx.send(Chunk::new(1, 2, &b"\xAC 5\n"[..])).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(notifier.texts(), vec!["€ 5\n"]);
        assert_eq!(metrics.snapshot().skipped_empty, 1);
    }

    #[tokio::test]
    async fn test_pending_bytes_flushed_on_close() {
        let (tx, rx) = async_channel::unbounded();
        let notifier = RecordingNotifier::default();
        let handle = Dispatcher::new(notifier.clone(), target(), rx, fast()).spawn();

        tx.send(Chunk::new(0, 0, &b"ok\xC3"[..])).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(notifier.texts(), vec!["ok", "\u{FFFD}"]);
    }

    #[tokio::test]
    async fn test_dispatch_chunk_outcomes() {
        let (_tx, rx) = async_channel::unbounded();
        let notifier = RecordingNotifier {
            fail_on: vec![1],
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(notifier, target(), rx, fast());

        let hello = Chunk::new(0, 0, &b"hello\n"[..]);
        assert_eq!(dispatcher.dispatch_chunk(&hello).await, DeliveryOutcome::Delivered);
        let again = Chunk::new(1, 6, &b"again\n"[..]);
        assert_eq!(dispatcher.dispatch_chunk(&again).await, DeliveryOutcome::Failed);
        let partial = Chunk::new(2, 12, &b"\xF0"[..]);
        assert_eq!(dispatcher.dispatch_chunk(&partial).await, DeliveryOutcome::Skipped);
        assert!(!DeliveryOutcome::Skipped.attempted());
    }

    #[test]
    fn test_config_from_delivery_config() {
        let delivery = DeliveryConfig {
            flush_interval_secs: 0.25,
            ..DeliveryConfig::default()
        };
        let config = DispatcherConfig::from(&delivery);
        assert_eq!(config.flush_interval, Duration::from_millis(250));
        assert_eq!(DispatcherConfig::default().flush_interval, Duration::from_secs(5));
    }
}
