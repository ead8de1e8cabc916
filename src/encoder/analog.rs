// Generic analog samples to amplitude rows
use super::{EncodeParams, check_interleaved, push_row};
use crate::{Result, format::fixed5, packet::InterleavedPacket};

/// Converts interleaved analog bytes into one amplitude row per sample.
///
/// Unlike oscilloscope data, analog samples hold one byte for every physical
/// channel, disabled ones included. The encoder walks every slot and only
/// advances through the channel table on enabled slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalogEncoder;

impl AnalogEncoder {
    /// Append one row per sample of `packet` to `out`.
    ///
    /// Amplitudes are `(hw_offset - raw) * (display_max - display_min) /
    /// reference span`.
    ///
    /// # Errors
    /// * [`crate::Error::BufferTooShort`] if the buffer holds fewer than
    ///   `num_samples` samples of one byte per physical slot
    /// * [`crate::Error::InvalidReferenceRange`] if the reference range is
    ///   empty
    pub fn encode(
        &self,
        params: &EncodeParams<'_>,
        packet: &InterleavedPacket,
        out: &mut String,
    ) -> Result<()> {
        let table = params.table;
        let slots = table.slots();
        if table.enabled_count() == 0 || packet.num_samples == 0 {
            return Ok(());
        }
        check_interleaved(&packet.data, packet.num_samples, slots.len())?;
        let span = params.reference.span()?;

        for sample in packet.data.chunks_exact(slots.len()).take(packet.num_samples) {
            let mut cursor = table.descriptors().iter();
            let fields = sample
                .iter()
                .zip(slots)
                .filter(|(_, enabled)| **enabled)
                .filter_map(|(raw, _)| cursor.next().map(|desc| (raw, desc)))
                .map(|(raw, desc)| {
                    fixed5((desc.hw_offset as f64 - *raw as f64) * desc.display_range() / span)
                });
            push_row(out, params.separator, fields);
        }
        Ok(())
    }
}
