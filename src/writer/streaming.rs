//! Flush configuration for long-running exports.
//!
//! [`FlushPolicy`] decides when [`CsvWriter`](super::CsvWriter) flushes its
//! sink, so that a capture exported to a file stays readable while it runs.

/// Policy for automatic flushing of the sink during an export.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FlushPolicy {
    /// Never auto-flush. The sink is only flushed on explicit `flush()` or
    /// `finish()` calls.
    #[default]
    Manual,

    /// Flush after every N chunks written.
    EveryNChunks(u64),

    /// Flush after N bytes of text have been written.
    EveryNBytes(u64),
}

impl FlushPolicy {
    /// Check if this policy requires automatic flushing.
    pub fn is_auto(&self) -> bool {
        !matches!(self, FlushPolicy::Manual)
    }
}

/// Tracks flush state of a writer.
#[derive(Debug, Default, Clone)]
pub struct FlushState {
    /// Chunks written since last flush.
    pub chunks_since_flush: u64,
    /// Bytes written since last flush.
    pub bytes_since_flush: u64,
    /// Total chunks written.
    pub total_chunks: u64,
    /// Total bytes written.
    pub total_bytes: u64,
    /// Number of flushes performed.
    pub flush_count: u64,
}

impl FlushState {
    /// Record that a chunk of `bytes` was written.
    pub fn record_write(&mut self, bytes: u64) {
        self.chunks_since_flush += 1;
        self.bytes_since_flush += bytes;
        self.total_chunks += 1;
        self.total_bytes += bytes;
    }

    /// Check if a flush should be triggered based on the policy.
    pub fn should_flush(&self, policy: &FlushPolicy) -> bool {
        match policy {
            FlushPolicy::Manual => false,
            FlushPolicy::EveryNChunks(n) => self.chunks_since_flush >= *n,
            FlushPolicy::EveryNBytes(n) => self.bytes_since_flush >= *n,
        }
    }

    /// Reset counters after a flush.
    pub fn on_flush(&mut self) {
        self.chunks_since_flush = 0;
        self.bytes_since_flush = 0;
        self.flush_count += 1;
    }
}
