//! Buffer management for process output

use bytes::{Buf, BytesMut};

/// Ratio for buffer compaction strategy.
/// When buffer is full, discard oldest 1/3 and keep newest 2/3.
const DISCARD_RATIO: usize = 3;

/// Holds process output that has not been consumed by a match yet.
///
/// Matching consumes everything up to and including the match, so the text
/// returned as "before" always starts at the previous synchronization point.
pub struct BufferManager {
    buffer: BytesMut,
    max_size: usize,
}

impl BufferManager {
    /// Create a new buffer manager
    pub fn new(max_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_size),
            max_size,
        }
    }

    /// Append data to the buffer
    pub fn append(&mut self, data: &[u8]) {
        if self.buffer.len() + data.len() > self.max_size {
            self.compact(data.len());
        }

        let overflow = data.len().saturating_sub(self.max_size);
        self.buffer.extend_from_slice(&data[overflow..]);
    }

    /// Output not yet consumed by a match
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Unconsumed output as lossy UTF-8, without consuming it
    pub fn pending_lossy(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// Consume output through `end`, returning `(before, matched)` where the
    /// match occupies `start..end` of [`BufferManager::pending`].
    pub fn consume(&mut self, start: usize, end: usize) -> (String, String) {
        let end = end.min(self.buffer.len());
        let start = start.min(end);

        let before = String::from_utf8_lossy(&self.buffer[..start]).into_owned();
        let matched = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
        self.buffer.advance(end);

        (before, matched)
    }

    /// Get the current buffer length
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Make room for `incoming` bytes by dropping the oldest output.
    fn compact(&mut self, incoming: usize) {
        let discard_amount = self.max_size / DISCARD_RATIO;
        let needed = (self.buffer.len() + incoming).saturating_sub(self.max_size);
        let drop = discard_amount.max(needed).min(self.buffer.len());

        log::debug!("output buffer full, discarding {} oldest bytes", drop);
        self.buffer.advance(drop);
    }
}
