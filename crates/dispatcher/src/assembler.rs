//! UTF-8 reassembly across chunk boundaries
//!
//! Chunks are cut at arbitrary byte offsets, so a multi-byte character may
//! straddle two of them. The assembler holds back an incomplete trailing
//! sequence until the following chunk completes it.

/// Incremental bytes-to-text decoder
#[derive(Debug, Default)]
pub struct Utf8Assembler {
    pending: Vec<u8>,
}

impl Utf8Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held back waiting for the rest of a character
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Append `bytes` and return all text that is now complete.
    ///
    /// Invalid sequences are replaced with U+FFFD. An incomplete sequence at
    /// the very end is kept for the next call.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let complete = self.pending.len() - incomplete_tail(&self.pending);
        let text = String::from_utf8_lossy(&self.pending[..complete]).into_owned();
        self.pending.drain(..complete);
        text
    }

    /// Flush whatever is held back, replacing it with U+FFFD.
    pub fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}

/// Length of a truncated (but so far valid) sequence at the end of `bytes`
fn incomplete_tail(bytes: &[u8]) -> usize {
    let mut start = 0;
    while start < bytes.len() {
        match std::str::from_utf8(&bytes[start..]) {
            Ok(_) => return 0,
            Err(e) => match e.error_len() {
                Some(len) => start += e.valid_up_to() + len,
                None => return bytes.len() - start - e.valid_up_to(),
            },
        }
    }
    0
}
