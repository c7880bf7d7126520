//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 -> watcher / dispatcher 参数的贯通测试
//! - 内存文件 + 伪 Notifier 的 e2e 测试
//! - 真实临时文件的 e2e 测试

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::DispatcherConfig;
    use ingestion::WatcherConfig;
    use std::time::Duration;

    #[test]
    fn test_config_flows_into_both_loops() {
        let config = ConfigLoader::load_from_str(
            r##"
[source]
path = "/var/log/app.log"
chunk_size = 4096
ingest_interval_secs = 0.5

[target]
endpoint = "https://hooks.example.com/T000"
topic = "#ops"

[delivery]
flush_interval_secs = 2.0
"##,
            ConfigFormat::Toml,
        )
        .unwrap();

        let watcher = WatcherConfig::from(&config.source);
        assert_eq!(watcher.chunk_size, 4096);
        assert_eq!(watcher.ingest_interval, Duration::from_millis(500));

        let dispatcher = DispatcherConfig::from(&config.delivery);
        assert_eq!(dispatcher.flush_interval, Duration::from_secs(2));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use contracts::{ContractError, DispatchTarget, Notifier};
    use dispatcher::{Dispatcher, DispatcherConfig};
    use ingestion::{handoff_queue, FileSource, MemorySource, PollOutcome, Watcher, WatcherConfig};

    /// Fake notifier recording every attempt
    #[derive(Clone, Default)]
    struct FakeNotifier {
        deliveries: Arc<Mutex<Vec<(String, DispatchTarget)>>>,
        failures_left: Arc<Mutex<usize>>,
        delay: Duration,
    }

    impl FakeNotifier {
        fn failing_first(n: usize) -> Self {
            Self {
                failures_left: Arc::new(Mutex::new(n)),
                ..Default::default()
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay,
                ..Default::default()
            }
        }

        fn texts(&self) -> Vec<String> {
            self.deliveries
                .lock()
                .unwrap()
                .iter()
                .map(|(text, _)| text.clone())
                .collect()
        }

        fn joined(&self) -> String {
            self.texts().concat()
        }
    }

    impl Notifier for FakeNotifier {
        fn name(&self) -> &str {
            "fake"
        }

        async fn deliver(
            &mut self,
            text: &str,
            target: &DispatchTarget,
        ) -> Result<(), ContractError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.deliveries
                .lock()
                .unwrap()
                .push((text.to_string(), target.clone()));

            let mut failures_left = self.failures_left.lock().unwrap();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(ContractError::delivery("fake", "endpoint unavailable"));
            }
            Ok(())
        }
    }

    fn target() -> DispatchTarget {
        DispatchTarget::new("https://hooks.example.com/T000", "#ops")
    }

    fn watcher_config(chunk_size: usize) -> WatcherConfig {
        WatcherConfig::new(chunk_size, Duration::from_millis(5))
    }

    fn no_cooldown() -> DispatcherConfig {
        DispatcherConfig {
            flush_interval: Duration::ZERO,
        }
    }

    /// Poll until `done` holds or two seconds pass
    async fn wait_until(mut done: impl FnMut() -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !done() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// File starts empty, "hello\n" is appended, one delivery to the
    /// configured target follows.
    #[tokio::test]
    async fn test_hello_delivered_to_target() {
        let file = MemorySource::new();
        let writer = file.clone();
        let (tx, rx) = handoff_queue();

        let mut watcher = Watcher::start_at_end(file, watcher_config(1024), tx)
            .await
            .unwrap();
        let notifier = FakeNotifier::default();
        let dispatcher = Dispatcher::new(notifier.clone(), target(), rx, no_cooldown());
        let metrics = dispatcher.metrics();
        let dispatcher_handle = dispatcher.spawn();

        writer.append(b"hello\n");
        assert_eq!(
            watcher.poll_once().await.unwrap(),
            PollOutcome::Enqueued { seq: 0, bytes: 6 }
        );
        assert_eq!(watcher.cursor().offset(), 6);
        assert_eq!(watcher.poll_once().await.unwrap(), PollOutcome::Idle);

        drop(watcher);
        dispatcher_handle.await.unwrap();

        let deliveries = notifier.deliveries.lock().unwrap().clone();
        assert_eq!(deliveries, vec![("hello\n".to_string(), target())]);
        assert_eq!(metrics.snapshot().delivered, 1);
    }

    #[tokio::test]
    async fn test_appends_between_polls_coalesce() {
        let file = MemorySource::new();
        let writer = file.clone();
        let (tx, rx) = handoff_queue();

        let mut watcher = Watcher::start_at_end(file, watcher_config(1024), tx)
            .await
            .unwrap();
        let notifier = FakeNotifier::default();
        let dispatcher_handle =
            Dispatcher::new(notifier.clone(), target(), rx, no_cooldown()).spawn();

        writer.append(b"a");
        writer.append(b"b");
        watcher.poll_once().await.unwrap();

        drop(watcher);
        dispatcher_handle.await.unwrap();
        assert_eq!(notifier.texts(), vec!["ab"]);
    }

    #[tokio::test]
    async fn test_preexisting_content_is_never_sent() {
        let file = MemorySource::with_content(b"old line 1\nold line 2\n");
        let writer = file.clone();
        let (tx, rx) = handoff_queue();

        let watcher = Watcher::start_at_end(file, watcher_config(1024), tx)
            .await
            .unwrap();
        let notifier = FakeNotifier::default();
        let watcher_handle = watcher.spawn();
        let dispatcher_handle =
            Dispatcher::new(notifier.clone(), target(), rx, no_cooldown()).spawn();

        writer.append(b"new line\n");
        wait_until(|| !notifier.texts().is_empty()).await;

        watcher_handle.abort();
        dispatcher_handle.abort();
        assert_eq!(notifier.joined(), "new line\n");
    }

    /// Many small writes through a tiny chunk size and a slow endpoint
    /// arrive complete and in order.
    #[tokio::test]
    async fn test_order_preserved_through_slow_endpoint() {
        let file = MemorySource::new();
        let writer = file.clone();
        let (tx, rx) = handoff_queue();

        let watcher = Watcher::start_at_end(file, watcher_config(7), tx)
            .await
            .unwrap();
        let watcher_metrics = watcher.metrics();
        let notifier = FakeNotifier::slow(Duration::from_millis(2));
        let watcher_handle = watcher.spawn();
        let dispatcher_handle =
            Dispatcher::new(notifier.clone(), target(), rx, no_cooldown()).spawn();

        let mut expected = String::new();
        for i in 0..40 {
            let line = format!("line {i}\n");
            writer.append(line.as_bytes());
            expected.push_str(&line);
            if i % 5 == 0 {
                tokio::time::sleep(Duration::from_millis(3)).await;
            }
        }

        wait_until(|| notifier.joined().len() == expected.len()).await;
        watcher_handle.abort();
        dispatcher_handle.abort();

        assert_eq!(notifier.joined(), expected);
        assert_eq!(
            watcher_metrics.snapshot().bytes_read,
            expected.len() as u64
        );
        assert!(notifier.texts().iter().all(|text| text.len() <= 7));
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_block_next() {
        let file = MemorySource::new();
        let writer = file.clone();
        let (tx, rx) = handoff_queue();

        let mut watcher = Watcher::start_at_end(file, watcher_config(1024), tx)
            .await
            .unwrap();
        let notifier = FakeNotifier::failing_first(1);
        let dispatcher = Dispatcher::new(notifier.clone(), target(), rx, no_cooldown());
        let metrics = dispatcher.metrics();
        let dispatcher_handle = dispatcher.spawn();

        writer.append(b"first\n");
        watcher.poll_once().await.unwrap();
        writer.append(b"second\n");
        watcher.poll_once().await.unwrap();

        drop(watcher);
        dispatcher_handle.await.unwrap();

        // Attempted once each, in order, no retry
        assert_eq!(notifier.texts(), vec!["first\n", "second\n"]);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.delivered, 1);
    }

    /// The watcher keeps reading while the dispatcher is stuck in cooldown.
    #[tokio::test]
    async fn test_watcher_never_waits_for_dispatcher() {
        let file = MemorySource::new();
        let writer = file.clone();
        let (tx, rx) = handoff_queue();

        let mut watcher = Watcher::start_at_end(file, watcher_config(1024), tx)
            .await
            .unwrap();
        let notifier = FakeNotifier::default();
        let config = DispatcherConfig {
            flush_interval: Duration::from_secs(60),
        };
        let dispatcher_handle = Dispatcher::new(notifier.clone(), target(), rx, config).spawn();

        for i in 0..5 {
            writer.append(format!("burst {i}\n").as_bytes());
            let outcome = tokio::time::timeout(Duration::from_millis(500), watcher.poll_once())
                .await
                .expect("watcher blocked")
                .unwrap();
            assert!(matches!(outcome, PollOutcome::Enqueued { .. }));
        }

        wait_until(|| !notifier.texts().is_empty()).await;
        assert_eq!(watcher.metrics().snapshot().chunks_enqueued, 5);
        assert_eq!(notifier.texts(), vec!["burst 0\n"]);

        dispatcher_handle.abort();
    }

    #[tokio::test]
    async fn test_real_file_end_to_end() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"before start\n").unwrap();
        file.flush().unwrap();

        let source = FileSource::open(file.path()).await.unwrap();
        let (tx, rx) = handoff_queue();
        let watcher = Watcher::start_at_end(source, watcher_config(1024), tx)
            .await
            .unwrap();
        assert_eq!(watcher.cursor().offset(), 13);

        let notifier = FakeNotifier::default();
        let watcher_handle = watcher.spawn();
        let dispatcher_handle =
            Dispatcher::new(notifier.clone(), target(), rx, no_cooldown()).spawn();

        file.write_all("déjà vu\n".as_bytes()).unwrap();
        file.flush().unwrap();
        wait_until(|| notifier.joined() == "déjà vu\n").await;

        file.write_all(b"second\n").unwrap();
        file.flush().unwrap();
        wait_until(|| notifier.joined() == "déjà vu\nsecond\n").await;

        watcher_handle.abort();
        dispatcher_handle.abort();
        assert_eq!(notifier.joined(), "déjà vu\nsecond\n");
    }
}
