//! CSV writer: drives an [`Output`] and forwards its chunks to a sink.
//!
//! # Writing Workflow
//!
//! 1. Describe the instrument with a [`Device`]
//! 2. Create a [`CsvWriter`] for a sink and the trace kind to export
//! 3. Feed packets with [`write_packet()`](CsvWriter::write_packet) in arrival
//!    order
//! 4. Close the session with [`finish()`](CsvWriter::finish)
//!
//! # Example
//!
//! ```
//! use trace_csv::{ChannelConfig, CsvWriter, Device, OutputOptions, Result, TraceKind};
//! use trace_csv::packet::{InterleavedPacket, MetaEntry, Packet};
//! use trace_csv::writer::StringSink;
//!
//! fn export_scope() -> Result<String> {
//!     let device = Device::new("dso", vec![ChannelConfig::scope(0, "CH0", 500.0, 128)]);
//!     let mut writer = CsvWriter::new(
//!         StringSink::new(),
//!         &device,
//!         OutputOptions::new(TraceKind::Scope),
//!     )?;
//!
//!     writer.write_packet(&Packet::Meta(vec![
//!         MetaEntry::reference_min(0),
//!         MetaEntry::reference_max(255),
//!     ]))?;
//!     writer.write_packet(&Packet::Scope(InterleavedPacket::new(vec![108], 1)))?;
//!
//!     Ok(writer.finish()?.into_inner())
//! }
//!
//! assert!(export_scope().unwrap().ends_with(" CH0 (Unit: V)\n0.39216\n"));
//! ```

use log::debug;

use crate::{Device, Output, OutputOptions, Result, packet::Packet};

mod streaming;
mod traits;

pub use streaming::{FlushPolicy, FlushState};
#[cfg(feature = "std")]
pub use traits::FileSink;
pub use traits::{ChunkSink, StringSink};

/// Writer exporting a packet stream into a [`ChunkSink`].
///
/// `CsvWriter` is not thread-safe; one writer serves one destination.
pub struct CsvWriter<S: ChunkSink> {
    output: Output,
    sink: S,
    policy: FlushPolicy,
    flush_state: FlushState,
}

#[cfg(feature = "std")]
impl CsvWriter<FileSink> {
    /// Create a writer exporting to the file at `path`.
    pub fn create(path: &str, device: &Device, options: OutputOptions) -> Result<Self> {
        Self::new(FileSink::new(path)?, device, options)
    }
}

impl<S: ChunkSink> CsvWriter<S> {
    /// Initialize an export of `device` into `sink`.
    pub fn new(sink: S, device: &Device, options: OutputOptions) -> Result<Self> {
        let mut output = Output::new();
        output.init(Some(device), options)?;
        Ok(Self {
            output,
            sink,
            policy: FlushPolicy::default(),
            flush_state: FlushState::default(),
        })
    }

    /// Set the automatic flush policy.
    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Process one packet and write the text it produced, if any.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        if let Some(chunk) = self.output.receive(packet)? {
            self.sink.write_chunk(&chunk)?;
            self.flush_state.record_write(chunk.len() as u64);
            if self.flush_state.should_flush(&self.policy) {
                self.flush()?;
            }
        }
        Ok(())
    }

    /// Process packets in order, stopping at the first error.
    pub fn write_packets<'a, I>(&mut self, packets: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Packet>,
    {
        for packet in packets {
            self.write_packet(packet)?;
        }
        Ok(())
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        self.flush_state.on_flush();
        Ok(())
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn flush_state(&self) -> &FlushState {
        &self.flush_state
    }

    /// Close the session, flush the sink and hand it back.
    pub fn finish(mut self) -> Result<S> {
        self.output.cleanup();
        self.sink.flush()?;
        debug!(
            "CSV export finished: {} chunks, {} bytes",
            self.flush_state.total_chunks, self.flush_state.total_bytes
        );
        Ok(self.sink)
    }
}
