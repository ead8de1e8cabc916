//! Row encoders for the three raw sample layouts.
//!
//! The encoder is picked once when the session is created, from the trace
//! kind being exported. Each encoder appends complete, newline-terminated rows
//! to the output chunk. An encoder validates a packet completely before it
//! writes the first row, so a rejected packet leaves both the chunk and the
//! encoder state untouched.

mod analog;
mod logic;
mod scope;

pub use analog::AnalogEncoder;
pub use logic::LogicEncoder;
pub use scope::ScopeEncoder;

use crate::{Error, Result, channel_table::ChannelTable, types::TraceKind};

/// Raw code interval spanning the converter's full input range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceRange {
    /// Code of the lowest converter input
    pub low: u32,
    /// Code of the highest converter input
    pub high: u32,
}

impl ReferenceRange {
    /// Width of the range, used as the denominator of every amplitude.
    ///
    /// # Errors
    /// [`Error::InvalidReferenceRange`] unless `high > low`.
    pub fn span(self) -> Result<f64> {
        if self.high <= self.low {
            return Err(Error::InvalidReferenceRange {
                low: self.low,
                high: self.high,
            });
        }
        Ok((self.high - self.low) as f64)
    }
}

/// Session parameters an encoder reads while producing rows.
#[derive(Debug, Clone, Copy)]
pub struct EncodeParams<'a> {
    /// Enabled channels of the session
    pub table: &'a ChannelTable,
    /// Field separator
    pub separator: char,
    /// Samples per second, zero if not yet known
    pub samplerate: u64,
    /// Converter range used by Scope and Analog amplitudes
    pub reference: ReferenceRange,
}

/// Encoder chosen for the session's trace kind.
#[derive(Debug, Clone)]
pub enum Encoder {
    Logic(LogicEncoder),
    Scope(ScopeEncoder),
    Analog(AnalogEncoder),
}

impl Encoder {
    pub fn for_kind(kind: TraceKind) -> Self {
        match kind {
            TraceKind::Logic => Encoder::Logic(LogicEncoder::new()),
            TraceKind::Scope => Encoder::Scope(ScopeEncoder),
            TraceKind::Analog => Encoder::Analog(AnalogEncoder),
        }
    }

    pub fn kind(&self) -> TraceKind {
        match self {
            Encoder::Logic(_) => TraceKind::Logic,
            Encoder::Scope(_) => TraceKind::Scope,
            Encoder::Analog(_) => TraceKind::Analog,
        }
    }
}

/// Append `fields` as one separator-delimited row.
fn push_row<I>(out: &mut String, separator: char, fields: I)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(separator);
        }
        out.push_str(field.as_ref());
    }
    out.push('\n');
}

/// Check that an interleaved buffer covers `num_samples` samples of `stride`
/// bytes each.
fn check_interleaved(data: &[u8], num_samples: usize, stride: usize) -> Result<()> {
    let expected = num_samples
        .checked_mul(stride)
        .ok_or_else(|| Error::InvalidPacket(format!("{num_samples} samples overflow")))?;
    if data.len() < expected {
        return Err(Error::BufferTooShort {
            actual: data.len(),
            expected,
        });
    }
    Ok(())
}
