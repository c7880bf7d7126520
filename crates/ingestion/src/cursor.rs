//! Read cursor (offset tracker)

/// Byte offset marking the end of already-consumed content.
///
/// Only ever moves forward, and only by the number of bytes actually read.
/// Owned by the watcher; nothing else reads or writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadCursor {
    offset: u64,
}

impl ReadCursor {
    /// Cursor positioned at `offset`
    pub fn at(offset: u64) -> Self {
        Self { offset }
    }

    /// Current offset
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Advance by `bytes_read`, returning the new offset
    pub fn advance(&mut self, bytes_read: usize) -> u64 {
        self.offset = self.offset.saturating_add(bytes_read as u64);
        self.offset
    }
}
