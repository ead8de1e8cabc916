//! One-time preamble of an exported table.
//!
//! The header is produced lazily together with the first data packet, since
//! the sample rate and sample count it reports usually arrive in meta packets
//! after initialization.

use chrono::NaiveDateTime;

use crate::{
    channel_table::ChannelTable,
    format::{samplecount_string, samplerate_string},
    types::TraceKind,
};

/// Name and version written into the generation line.
pub const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Column title of the synthetic logic timestamp column.
pub const TIME_COLUMN: &str = "Time(s)";

/// Acquisition parameters reported in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeaderParams {
    pub samplerate: u64,
    pub limit_samples: u64,
}

/// Render the header block.
///
/// Comment lines are prefixed with `; `; the final column header line is not.
/// The generation time is printed in `ctime` layout.
pub fn generate(
    table: &ChannelTable,
    params: HeaderParams,
    separator: char,
    generated_at: NaiveDateTime,
) -> String {
    let mut header = String::with_capacity(512);

    header.push_str(&format!(
        "; CSV, generated by {GENERATOR} on {}\n",
        generated_at.format("%a %b %e %H:%M:%S %Y")
    ));
    header.push_str(&format!(
        "; Channels ({}/{})\n",
        table.enabled_count(),
        table.total_count()
    ));
    header.push_str(&format!(
        "; Sample rate: {}\n",
        samplerate_string(params.samplerate)
    ));
    header.push_str(&format!(
        "; Sample count: {}\n",
        samplecount_string(params.limit_samples)
    ));

    let mut columns = Vec::with_capacity(table.enabled_count() + 1);
    if table.kind() == TraceKind::Logic {
        columns.push(String::from(TIME_COLUMN));
    }
    for desc in table.descriptors() {
        let column = match table.kind() {
            TraceKind::Logic => format!(" {}", desc.name),
            TraceKind::Scope => format!(" {} (Unit: {})", desc.name, desc.unit_tier.label()),
            TraceKind::Analog => format!(" {} (Unit: {})", desc.name, desc.unit),
        };
        columns.push(column);
    }
    header.push_str(&columns.join(&separator.to_string()));
    header.push('\n');

    header
}
