#![forbid(unsafe_code)]

//! # trace-csv
//!
//! A Rust library for exporting signal-capture streams as CSV tables.
//!
//! A capture instrument delivers a stream of packets: configuration updates
//! (sample rate, sample limit, converter reference range) interleaved with
//! raw samples in one of three layouts. This crate turns that stream into
//! rows of text, one session per destination.
//!
//! ## Features
//!
//! - **Logic traces**: packed digital samples become `time,bit,bit,...` rows,
//!   optionally dropping rows whose bits did not change
//! - **Scope traces**: interleaved oscilloscope bytes become amplitudes scaled
//!   by each channel's volts/div setting
//! - **Analog traces**: interleaved sensor bytes become amplitudes mapped onto
//!   each channel's configured physical range
//! - **Streaming**: packets are processed one at a time, nothing is buffered
//!   between them
//!
//! ## Quick Start
//!
//! ```
//! use trace_csv::{ChannelConfig, CsvWriter, Device, OutputOptions, Result, TraceKind};
//! use trace_csv::packet::{LogicPacket, MetaEntry, Packet};
//! use trace_csv::writer::StringSink;
//!
//! fn main() -> Result<()> {
//!     let device = Device::new(
//!         "DSLogic",
//!         vec![ChannelConfig::logic(0, "CLK"), ChannelConfig::logic(1, "DATA")],
//!     );
//!     let mut writer = CsvWriter::new(StringSink::new(), &device, OutputOptions::new(TraceKind::Logic))?;
//!
//!     writer.write_packet(&Packet::Meta(vec![MetaEntry::sample_rate(1_000_000)]))?;
//!     writer.write_packet(&Packet::Logic(LogicPacket::new(vec![0b01, 0b11, 0b11], 1, true)))?;
//!
//!     let csv = writer.finish()?.into_inner();
//!     assert!(csv.ends_with("Time(s), CLK, DATA\n0,1,0\n1e-06,1,1\n"));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Device, channel and option descriptions |
//! | [`packet`] | Packets of the acquisition stream |
//! | [`channel_table`] | Per-session resolved channel descriptors |
//! | [`header`] | One-time table preamble |
//! | [`encoder`] | Row encoders for logic, scope and analog samples |
//! | [`session`] | Export session state and packet dispatch |
//! | [`output`] | Init/receive/cleanup lifecycle |
//! | [`writer`] | Sinks and the [`CsvWriter`] driver |
//! | [`format`] | Number and unit formatting helpers |
//! | [`error`] | Error types and [`Result`] alias |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Errors are reported to the caller of the
//! failing call and never retried.

pub mod channel_table;
pub mod encoder;
pub mod error;
pub mod format;
pub mod header;
pub mod output;
pub mod packet;
pub mod session;
pub mod types;
pub mod writer;

// Re-export commonly used types at the crate root
pub use channel_table::{ChannelDescriptor, ChannelTable, UnitTier};
pub use error::{Error, Result};
pub use output::{Output, OutputState};
pub use session::ExportSession;
pub use types::{ChannelConfig, Device, OutputOptions, TraceKind};
pub use writer::CsvWriter;
