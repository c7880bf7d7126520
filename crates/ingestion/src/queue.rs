//! Hand-off queue between watcher and dispatcher
//!
//! Unbounded and FIFO: the watcher never waits on the dispatcher, the
//! dispatcher suspends only while the queue is empty. A stalled notifier
//! therefore grows the backlog without bound.

use async_channel::{unbounded, Receiver, Sender};
use contracts::Chunk;
use tracing::trace;

use crate::error::IngestionError;

/// Producer end
pub type ChunkSender = Sender<Chunk>;

/// Consumer end
pub type ChunkReceiver = Receiver<Chunk>;

/// Create the single-producer / single-consumer hand-off queue
pub fn handoff_queue() -> (ChunkSender, ChunkReceiver) {
    unbounded()
}

/// Push without waiting
///
/// An unbounded queue only refuses a chunk once the consumer is gone.
#[inline]
pub(crate) fn enqueue(tx: &ChunkSender, chunk: Chunk) -> Result<usize, IngestionError> {
    let seq = chunk.seq;
    tx.try_send(chunk)
        .map_err(|_| IngestionError::QueueClosed { seq })?;
    let depth = tx.len();
    trace!(seq, depth, "chunk enqueued");
    Ok(depth)
}
