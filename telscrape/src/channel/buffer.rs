//! Accumulation buffer for one command cycle.

/// Buffer for accumulating device output during a single command cycle.
///
/// A new buffer is created for every cycle and consumed when the cycle
/// ends, so output from one command can never leak into the next.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    /// The accumulated output.
    buffer: String,

    /// Number of non-empty chunks appended.
    chunks: usize,
}

impl ResponseBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(4096),
            chunks: 0,
        }
    }

    /// Append a chunk. Empty chunks are ignored.
    ///
    /// Returns `true` if the chunk carried any text.
    pub fn extend(&mut self, chunk: &str) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.buffer.push_str(chunk);
        self.chunks += 1;
        true
    }

    /// Check whether the accumulated text contains `marker` (case-sensitive).
    pub fn contains(&self, marker: &str) -> bool {
        self.buffer.contains(marker)
    }

    /// Whether any non-empty chunk has been appended.
    pub fn received_any(&self) -> bool {
        self.chunks > 0
    }

    /// Number of non-empty chunks appended.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Get the buffer contents.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Get the current buffer length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the buffer, returning its text with surrounding whitespace
    /// removed.
    pub fn into_trimmed(self) -> String {
        self.buffer.trim().to_string()
    }
}
