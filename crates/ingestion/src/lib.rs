//! # Ingestion
//!
//! File tailing module (the producer half of the pipeline).
//!
//! Responsibilities:
//! - Track the read offset (`ReadCursor`)
//! - Perform bounded reads from the tailed source (`ChunkReader`)
//! - Poll at a fixed interval and hand non-empty chunks to the dispatcher
//!   through an unbounded FIFO queue (`Watcher`)
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{handoff_queue, FileSource, Watcher, WatcherConfig};
//!
//! let source = FileSource::open("/var/log/app.log").await?;
//! let (tx, rx) = handoff_queue();
//! let watcher = Watcher::start_at_end(source, WatcherConfig::default(), tx).await?;
//! let handle = watcher.spawn();
//!
//! while let Ok(chunk) = rx.recv().await {
//!     // Deliver chunk
//! }
//! ```
//!
//! ## Testing
//!
//! `MemorySource` is a shared, append-only in-memory source that can stand in
//! for the file.

mod config;
mod cursor;
mod error;
mod progress;
mod queue;
mod reader;
mod source;
mod watcher;

// Re-exports
pub use config::{IngestionMetrics, MetricsSnapshot, WatcherConfig};
pub use contracts::Chunk;
pub use cursor::ReadCursor;
pub use error::{IngestionError, Result};
pub use progress::{Activity, NoProgress, ProgressReporter, Spinner};
pub use queue::{handoff_queue, ChunkReceiver, ChunkSender};
pub use reader::{ChunkReader, ReadOutcome};
pub use source::{FileSource, MemorySource};
pub use watcher::{PollOutcome, Watcher};
