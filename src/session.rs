//! Export session: the mutable state of one export, from init to teardown.
//!
//! An [`ExportSession`] owns the channel table, the encoder picked for the
//! trace kind and every parameter accumulated from meta packets. It turns
//! each [`Packet`] into at most one chunk of CSV text.
//!
//! # Example
//!
//! ```
//! use trace_csv::{ChannelConfig, Device, ExportSession, OutputOptions, Result, TraceKind};
//! use trace_csv::packet::{LogicPacket, MetaEntry, Packet};
//!
//! fn export() -> Result<String> {
//!     let device = Device::new("la", vec![ChannelConfig::logic(0, "D0")]);
//!     let mut session = ExportSession::new(&device, &OutputOptions::new(TraceKind::Logic))?;
//!
//!     session.receive(&Packet::Meta(vec![MetaEntry::sample_rate(1_000_000)]))?;
//!     let chunk = session.receive(&Packet::Logic(LogicPacket::new(vec![1, 1], 1, false)))?;
//!     Ok(chunk.unwrap_or_default())
//! }
//!
//! let text = export().unwrap();
//! assert!(text.ends_with("Time(s), D0\n0,1\n1e-06,1\n"));
//! ```

use chrono::{Local, NaiveDateTime};
use log::{debug, trace, warn};

use crate::{
    Result,
    channel_table::ChannelTable,
    encoder::{EncodeParams, Encoder, ReferenceRange},
    header::{self, HeaderParams},
    packet::{ConfigKey, ConfigValue, MetaEntry, Packet},
    types::{Device, OutputOptions, TraceKind},
};

/// State of one export, exclusively owned by its caller.
///
/// Sessions share nothing; exporting the same stream to several destinations
/// takes one session per destination.
#[derive(Debug, Clone)]
pub struct ExportSession {
    table: ChannelTable,
    encoder: Encoder,
    separator: char,
    samplerate: u64,
    limit_samples: u64,
    reference: ReferenceRange,
    header_done: bool,
    generated_at: Option<NaiveDateTime>,
}

impl ExportSession {
    /// Build the channel table for `options.trace_kind` and start a session.
    ///
    /// # Errors
    /// Any error of [`ChannelTable::build`]; no session exists afterwards.
    pub fn new(device: &Device, options: &OutputOptions) -> Result<Self> {
        let table = ChannelTable::build(device, options.trace_kind)?;
        debug!(
            "export session for {} started ({} {} channels, separator {:?})",
            device.name,
            table.enabled_count(),
            options.trace_kind.as_str(),
            options.separator
        );
        Ok(Self {
            encoder: Encoder::for_kind(options.trace_kind),
            table,
            separator: options.separator,
            samplerate: 0,
            limit_samples: 0,
            reference: ReferenceRange::default(),
            header_done: false,
            generated_at: options.generated_at,
        })
    }

    /// Process one packet.
    ///
    /// Meta packets update the session and never produce text. The first data
    /// packet produces the header followed by its rows; later data packets
    /// produce only rows. `Ok(None)` means the packet yielded no text.
    ///
    /// A data packet of a kind other than the session's contributes no rows,
    /// but still counts as the first data packet for the header.
    ///
    /// # Errors
    /// Errors of the session's encoder. A failed packet leaves the session
    /// exactly as it was, header flag included.
    pub fn receive(&mut self, packet: &Packet) -> Result<Option<String>> {
        match packet {
            Packet::Meta(entries) => {
                self.apply_meta(entries);
                Ok(None)
            }
            Packet::Logic(_) | Packet::Scope(_) | Packet::Analog(_) => {
                let chunk = self.encode(packet)?;
                Ok(Some(chunk).filter(|c| !c.is_empty()))
            }
            Packet::Trigger | Packet::End | Packet::Unsupported(_) => {
                trace!("ignoring {packet:?}");
                Ok(None)
            }
        }
    }

    /// Apply meta updates in order. Only rows produced afterwards see them.
    ///
    /// Unknown keys are ignored. A known key carrying a value of the wrong
    /// type is skipped with a warning.
    pub fn apply_meta(&mut self, entries: &[MetaEntry]) {
        for entry in entries {
            match entry.key {
                ConfigKey::SampleRate => {
                    if let Some(v) = checked(entry, ConfigValue::as_u64) {
                        self.samplerate = v;
                    }
                }
                ConfigKey::LimitSamples => {
                    if let Some(v) = checked(entry, ConfigValue::as_u64) {
                        self.limit_samples = v;
                    }
                }
                ConfigKey::ReferenceMin => {
                    if let Some(v) = checked(entry, ConfigValue::as_u32) {
                        self.reference.low = v;
                    }
                }
                ConfigKey::ReferenceMax => {
                    if let Some(v) = checked(entry, ConfigValue::as_u32) {
                        self.reference.high = v;
                    }
                }
                ConfigKey::ChannelOffset(index) => {
                    if let Some(v) = checked(entry, ConfigValue::as_u16) {
                        if !self.table.set_hw_offset(index, v) {
                            debug!("no enabled channel {index} for offset update");
                        }
                    }
                }
                ConfigKey::Other(id) => trace!("ignoring meta key {id}"),
            }
        }
    }

    fn encode(&mut self, packet: &Packet) -> Result<String> {
        let mut out = if self.header_done {
            String::with_capacity(512)
        } else {
            let generated_at = self
                .generated_at
                .unwrap_or_else(|| Local::now().naive_local());
            let params = HeaderParams {
                samplerate: self.samplerate,
                limit_samples: self.limit_samples,
            };
            header::generate(&self.table, params, self.separator, generated_at)
        };

        let params = EncodeParams {
            table: &self.table,
            separator: self.separator,
            samplerate: self.samplerate,
            reference: self.reference,
        };
        match (&mut self.encoder, packet) {
            (Encoder::Logic(enc), Packet::Logic(p)) => enc.encode(&params, p, &mut out)?,
            (Encoder::Scope(enc), Packet::Scope(p)) => enc.encode(&params, p, &mut out)?,
            (Encoder::Analog(enc), Packet::Analog(p)) => enc.encode(&params, p, &mut out)?,
            (enc, _) => debug!(
                "{} session skips rows of a foreign data packet",
                enc.kind().as_str()
            ),
        }

        if !self.header_done {
            debug!("header emitted");
            self.header_done = true;
        }
        Ok(out)
    }

    pub fn trace_kind(&self) -> TraceKind {
        self.table.kind()
    }

    pub fn table(&self) -> &ChannelTable {
        &self.table
    }

    pub fn samplerate(&self) -> u64 {
        self.samplerate
    }

    pub fn limit_samples(&self) -> u64 {
        self.limit_samples
    }

    pub fn reference(&self) -> ReferenceRange {
        self.reference
    }

    /// Whether the header has been produced.
    pub fn header_emitted(&self) -> bool {
        self.header_done
    }

    /// Logic samples processed so far, suppressed ones included. Always zero
    /// for Scope and Analog sessions.
    pub fn sample_index(&self) -> u64 {
        match &self.encoder {
            Encoder::Logic(enc) => enc.sample_index(),
            _ => 0,
        }
    }
}

/// Extract a meta value of the expected type, warning on mismatch.
fn checked<T>(entry: &MetaEntry, extract: impl FnOnce(&ConfigValue) -> Option<T>) -> Option<T> {
    let value = extract(&entry.value);
    if value.is_none() {
        warn!(
            "ignoring meta {:?}: unexpected value {:?}",
            entry.key, entry.value
        );
    }
    value
}
