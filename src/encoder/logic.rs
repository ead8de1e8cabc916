// Digital samples to time-stamped bit rows
use super::EncodeParams;
use crate::{
    Error, Result,
    channel_table::ChannelDescriptor,
    format::{TIMESTAMP_PRECISION, general},
    packet::LogicPacket,
};

/// Converts packed digital samples into `time,bit,bit,...` rows.
///
/// With `suppress_unchanged` set, a sample whose channel bits equal the
/// previous sample's is not written. The sample still counts towards the
/// running index, so timestamps of later rows stay exact and a consumer holds
/// each row's values until the next row's timestamp.
#[derive(Debug, Clone, Default)]
pub struct LogicEncoder {
    /// Samples processed during the session, written or suppressed
    index: u64,
    /// Channel bits of the most recently processed sample
    previous_word: u64,
}

impl LogicEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of samples processed so far.
    pub fn sample_index(&self) -> u64 {
        self.index
    }

    /// Append the rows for `packet` to `out`.
    ///
    /// # Errors
    /// * [`Error::InvalidPacket`] if the sample size is zero or a channel bit
    ///   lies outside it
    /// * [`Error::BufferTooShort`] if the declared length exceeds the buffer
    /// * [`Error::ZeroSampleRate`] if the packet holds samples but no sample
    ///   rate is known
    pub fn encode(
        &mut self,
        params: &EncodeParams<'_>,
        packet: &LogicPacket,
        out: &mut String,
    ) -> Result<()> {
        let descriptors = params.table.descriptors();
        let samples = validate(packet, descriptors)?;
        if samples.len() == 0 {
            return Ok(());
        }
        if params.samplerate == 0 {
            return Err(Error::ZeroSampleRate);
        }
        let rate = params.samplerate as f64;

        for sample in samples {
            self.index += 1;

            let word = masked_word(sample, descriptors);
            let unchanged = self.index > 1 && word == self.previous_word;
            self.previous_word = word;
            if packet.suppress_unchanged && unchanged {
                continue;
            }

            let elapsed = (self.index - 1) as f64 / rate;
            out.push_str(&general(elapsed, TIMESTAMP_PRECISION));
            for j in 0..descriptors.len() {
                out.push(params.separator);
                out.push(if (word >> j) & 1 == 1 { '1' } else { '0' });
            }
            out.push('\n');
        }
        Ok(())
    }
}

/// Check the packet framing and return its whole samples.
///
/// Trailing bytes that do not fill a sample are ignored.
fn validate<'p>(
    packet: &'p LogicPacket,
    descriptors: &[ChannelDescriptor],
) -> Result<core::slice::ChunksExact<'p, u8>> {
    if packet.unit_size == 0 {
        return Err(Error::InvalidPacket("logic unit size is zero".into()));
    }
    let data = packet
        .data
        .get(..packet.length)
        .ok_or(Error::BufferTooShort {
            actual: packet.data.len(),
            expected: packet.length,
        })?;

    if data.len() >= packet.unit_size {
        if let Some(desc) = descriptors
            .iter()
            .find(|d| d.raw_offset / 8 >= packet.unit_size)
        {
            return Err(Error::InvalidPacket(format!(
                "channel {} at bit {} lies outside a {}-byte sample",
                desc.name, desc.raw_offset, packet.unit_size
            )));
        }
    }

    Ok(data.chunks_exact(packet.unit_size))
}

/// Gather the bit of every enabled channel into bit `j` of a word, `j` being
/// the channel's position in the table.
fn masked_word(sample: &[u8], descriptors: &[ChannelDescriptor]) -> u64 {
    descriptors
        .iter()
        .enumerate()
        .fold(0u64, |word, (j, desc)| {
            let byte = sample[desc.raw_offset / 8];
            if byte & (1 << (desc.raw_offset % 8)) != 0 {
                word | (1 << j)
            } else {
                word
            }
        })
}
