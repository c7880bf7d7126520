//! Bounded chunk reader

use bytes::Bytes;
use contracts::{ChunkSource, ContractError};
use tracing::trace;

use crate::cursor::ReadCursor;

/// Result of one bounded read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Exactly the bytes read; empty when the source has not grown
    pub bytes: Bytes,
}

impl ReadOutcome {
    /// Number of bytes read (0 is the steady-state no-op)
    pub fn bytes_read(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing new was available
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Performs one read of at most `chunk_size` bytes at the cursor.
///
/// The read buffer is allocated once and reused across polls. The cursor is
/// not touched; advancing it is the caller's job.
#[derive(Debug)]
pub struct ChunkReader {
    buf: Vec<u8>,
}

impl ChunkReader {
    /// Create a reader with the given maximum chunk size (clamped to at least 1)
    pub fn new(chunk_size: usize) -> Self {
        Self {
            buf: vec![0; chunk_size.max(1)],
        }
    }

    /// Maximum bytes consumed per call
    pub fn chunk_size(&self) -> usize {
        self.buf.len()
    }

    /// Read the next bounded chunk starting at `cursor`
    ///
    /// If more than one chunk's worth has accumulated, only the first
    /// `chunk_size` bytes are returned; the rest is picked up on later calls.
    ///
    /// # Errors
    /// [`ContractError::Read`] when the source fails
    pub async fn read_next<S: ChunkSource>(
        &mut self,
        source: &mut S,
        cursor: &ReadCursor,
    ) -> Result<ReadOutcome, ContractError> {
        let offset = cursor.offset();
        let n = source
            .read_at(offset, &mut self.buf)
            .await
            .map_err(|e| ContractError::read(offset, e))?;
        let n = n.min(self.buf.len());

        trace!(offset, bytes_read = n, "chunk read");
        Ok(ReadOutcome {
            bytes: Bytes::copy_from_slice(&self.buf[..n]),
        })
    }
}
