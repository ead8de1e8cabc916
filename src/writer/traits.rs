//! Abstract sink traits for the CSV writer.
//!
//! This module provides traits that abstract away where produced text goes,
//! allowing the writer to work with both file-based I/O (with `std`) and
//! in-memory buffers.

use crate::Result;

/// Destination of the text chunks produced by an export session.
pub trait ChunkSink {
    /// Append a chunk of complete rows.
    fn write_chunk(&mut self, chunk: &str) -> Result<()>;

    /// Flush any buffered text.
    fn flush(&mut self) -> Result<()>;
}

/// A sink that collects all text in memory.
#[derive(Debug, Default, Clone)]
pub struct StringSink {
    buffer: String,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new sink with the given initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Consume the sink and return the collected text.
    pub fn into_inner(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl ChunkSink for StringSink {
    fn write_chunk(&mut self, chunk: &str) -> Result<()> {
        self.buffer.push_str(chunk);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(feature = "std")]
mod std_impl {
    use super::ChunkSink;
    use crate::Result;
    use std::fs::File;
    use std::io::{BufWriter, Write};

    /// A sink writing to a file through a `BufWriter`.
    pub struct FileSink {
        inner: BufWriter<File>,
    }

    impl FileSink {
        /// Create (or truncate) the file at `path` with a 64 KB buffer.
        pub fn new(path: &str) -> Result<Self> {
            Self::with_capacity(path, 64 * 1024)
        }

        /// Create the file with the specified buffer capacity.
        pub fn with_capacity(path: &str, capacity: usize) -> Result<Self> {
            let file = File::create(path)?;
            Ok(Self {
                inner: BufWriter::with_capacity(capacity, file),
            })
        }
    }

    impl ChunkSink for FileSink {
        fn write_chunk(&mut self, chunk: &str) -> Result<()> {
            self.inner.write_all(chunk.as_bytes())?;
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.inner.flush()?;
            Ok(())
        }
    }
}

#[cfg(feature = "std")]
pub use std_impl::FileSink;
