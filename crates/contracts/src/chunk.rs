//! Chunk - Ingestion output
//!
//! The unit of hand-off between the watcher and the dispatcher.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Bytes read from the tailed file in a single poll.
///
/// A chunk is immutable once built. Ownership moves from the watcher to the
/// hand-off queue and from there to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Production index, starting at 0
    pub seq: u64,

    /// File offset of the first byte
    pub offset: u64,

    /// Exactly the bytes returned by the read (zero-copy)
    pub data: Bytes,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(seq: u64, offset: u64, data: impl Into<Bytes>) -> Self {
        Self {
            seq,
            offset,
            data: data.into(),
        }
    }

    /// Number of bytes carried
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the chunk carries no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// File offset one past the last byte
    pub fn end_offset(&self) -> u64 {
        self.offset + self.data.len() as u64
    }
}
