//! ChunkSource trait - readable, append-only byte source
//!
//! Abstracts the tailed file so the watcher can run against an in-memory
//! fake in tests.

use std::io;

/// Append-only byte source read by offset
#[trait_variant::make(ChunkSource: Send)]
pub trait LocalChunkSource {
    /// Current size of the source in bytes
    async fn size(&mut self) -> io::Result<u64>;

    /// Read into `buf` starting at `offset`.
    ///
    /// Fills as much of `buf` as is available; a short count means the end of
    /// the source was reached. Reading at or past the end returns `Ok(0)`.
    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;
}
