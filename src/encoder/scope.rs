// Oscilloscope samples to amplitude rows
use super::{EncodeParams, check_interleaved, push_row};
use crate::{Result, format::fixed5, packet::InterleavedPacket};

/// Converts interleaved oscilloscope bytes into one amplitude row per sample.
///
/// Samples hold one byte per enabled channel. Amplitudes are
/// `(hw_offset - raw) * scale_factor / reference span`, printed in the unit
/// chosen by each channel's unit tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeEncoder;

impl ScopeEncoder {
    /// Append one row per sample of `packet` to `out`.
    ///
    /// Without enabled channels there is nothing to print and no row is
    /// written.
    ///
    /// # Errors
    /// * [`crate::Error::BufferTooShort`] if the buffer holds fewer than
    ///   `num_samples` samples
    /// * [`crate::Error::InvalidReferenceRange`] if the reference range is
    ///   empty
    pub fn encode(
        &self,
        params: &EncodeParams<'_>,
        packet: &InterleavedPacket,
        out: &mut String,
    ) -> Result<()> {
        let descriptors = params.table.descriptors();
        let stride = descriptors.len();
        if stride == 0 || packet.num_samples == 0 {
            return Ok(());
        }
        check_interleaved(&packet.data, packet.num_samples, stride)?;
        let span = params.reference.span()?;

        for sample in packet.data.chunks_exact(stride).take(packet.num_samples) {
            push_row(
                out,
                params.separator,
                descriptors.iter().map(|desc| {
                    let raw = sample[desc.raw_offset];
                    fixed5((desc.hw_offset as f64 - raw as f64) * desc.scale_factor / span)
                }),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        channel_table::ChannelTable,
        encoder::ReferenceRange,
        types::{ChannelConfig, Device, TraceKind},
    };

    fn table() -> ChannelTable {
        let device = Device::new(
            "dso",
            vec![
                ChannelConfig::scope(0, "CH0", 500.0, 128),
                ChannelConfig::scope(1, "CH1", 500.0, 100),
            ],
        );
        ChannelTable::build(&device, TraceKind::Scope).unwrap()
    }

    fn params(table: &ChannelTable, low: u32, high: u32) -> EncodeParams<'_> {
        EncodeParams {
            table,
            separator: ',',
            samplerate: 0,
            reference: ReferenceRange { low, high },
        }
    }

    #[test]
    fn interleaved_rows() -> Result<()> {
        let table = table();
        let mut out = String::new();
        let packet = InterleavedPacket::new(vec![128, 100, 108, 151], 2);
        ScopeEncoder.encode(&params(&table, 0, 255), &packet, &mut out)?;
        assert_eq!(out, "0.00000,0.00000\n0.39216,-1.00000\n");
        Ok(())
    }

    #[test]
    fn disabled_channel_leaves_no_gap() -> Result<()> {
        let device = Device::new(
            "dso",
            vec![
                ChannelConfig::scope(0, "CH0", 500.0, 0),
                ChannelConfig::scope(1, "CH1", 500.0, 0).with_enabled(false),
                ChannelConfig::scope(2, "CH2", 500.0, 0),
            ],
        );
        let table = ChannelTable::build(&device, TraceKind::Scope)?;
        let offsets: Vec<_> = table.descriptors().iter().map(|d| d.raw_offset).collect();
        assert_eq!(offsets, [0, 1]);

        let mut out = String::new();
        let packet = InterleavedPacket::new(vec![51, 102, 153, 204], 2);
        ScopeEncoder.encode(&params(&table, 0, 255), &packet, &mut out)?;
        assert_eq!(out, "-1.00000,-2.00000\n-3.00000,-4.00000\n");
        Ok(())
    }

    #[test]
    fn reference_offset_does_not_shift_codes() -> Result<()> {
        let table = table();
        let mut out = String::new();
        let packet = InterleavedPacket::new(vec![118, 100], 1);
        ScopeEncoder.encode(&params(&table, 10, 110), &packet, &mut out)?;
        assert_eq!(out, "0.50000,0.00000\n");
        Ok(())
    }

    #[test]
    fn empty_reference_range_is_rejected() {
        let table = table();
        let mut out = String::new();
        let packet = InterleavedPacket::new(vec![1, 2], 1);
        let err = ScopeEncoder
            .encode(&params(&table, 0, 0), &packet, &mut out)
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(out.is_empty());
    }

    #[test]
    fn short_buffer_is_rejected() {
        let table = table();
        let mut out = String::new();
        let packet = InterleavedPacket::new(vec![1, 2, 3], 2);
        assert!(matches!(
            ScopeEncoder.encode(&params(&table, 0, 255), &packet, &mut out),
            Err(Error::BufferTooShort {
                actual: 3,
                expected: 4
            })
        ));
    }

    #[test]
    fn no_samples_needs_no_reference() -> Result<()> {
        let table = table();
        let mut out = String::new();
        ScopeEncoder.encode(&params(&table, 0, 0), &InterleavedPacket::new(vec![], 0), &mut out)?;
        assert!(out.is_empty());
        Ok(())
    }
}
