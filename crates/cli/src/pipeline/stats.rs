//! Pipeline statistics.

use std::time::Duration;

use dispatcher::DeliverySnapshot;
use ingestion::MetricsSnapshot;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total duration of the run
    pub duration: Duration,

    /// File length when tailing began
    pub start_offset: u64,

    /// Watcher counters
    pub ingestion: MetricsSnapshot,

    /// Dispatcher counters
    pub delivery: DeliverySnapshot,
}

impl PipelineStats {
    /// Chunks read but not yet handed to the notifier when the run ended
    pub fn undelivered_chunks(&self) -> u64 {
        let handled = self.delivery.attempts() + self.delivery.skipped_empty;
        self.ingestion.chunks_enqueued.saturating_sub(handled)
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════╗");
        println!("║                 Run Statistics               ║");
        println!("╚══════════════════════════════════════════════╝\n");

        println!("Watcher");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Started at offset: {}", self.start_offset);
        println!("   ├─ Bytes read: {}", self.ingestion.bytes_read);
        println!("   ├─ Chunks read: {}", self.ingestion.chunks_enqueued);
        println!("   └─ Read errors: {}", self.ingestion.read_errors);

        println!("\nDispatcher");
        println!("   ├─ Delivered: {}", self.delivery.delivered);
        println!("   ├─ Failed: {}", self.delivery.failed);
        println!("   ├─ Bytes delivered: {}", self.delivery.bytes_delivered);
        println!("   ├─ Latency (ms): {}", self.delivery.latency_ms);
        println!("   └─ Still queued at exit: {}", self.undelivered_chunks());

        println!();
    }
}
