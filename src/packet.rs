//! Acquisition packets delivered by the upstream producer.
//!
//! A [`Packet`] is either configuration ([`Packet::Meta`]) or one of three raw
//! sample encodings. Packet kinds the export engine has no use for are
//! accepted and ignored.

/// Configuration key carried by a [`MetaEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Samples per second
    SampleRate,
    /// Number of samples the capture is limited to
    LimitSamples,
    /// Lowest raw code of the converter's reference range
    ReferenceMin,
    /// Highest raw code of the converter's reference range
    ReferenceMax,
    /// Refreshed hardware zero offset of one channel, by physical index
    ChannelOffset(u16),
    /// Any key the exporter does not know about
    Other(u32),
}

/// Value carried by a [`MetaEntry`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Unsigned integer value
    UInt(u64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Text value
    Text(String),
}

impl ConfigValue {
    /// Returns the value as `u64` if it is an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ConfigValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as `u32` if it is an unsigned integer that fits.
    pub fn as_u32(&self) -> Option<u32> {
        self.as_u64().and_then(|v| u32::try_from(v).ok())
    }

    /// Returns the value as `u16` if it is an unsigned integer that fits.
    pub fn as_u16(&self) -> Option<u16> {
        self.as_u64().and_then(|v| u16::try_from(v).ok())
    }
}

/// One key/value update inside a meta packet.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaEntry {
    pub key: ConfigKey,
    pub value: ConfigValue,
}

impl MetaEntry {
    /// Entry for an arbitrary key.
    pub fn new(key: ConfigKey, value: ConfigValue) -> Self {
        Self { key, value }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(rate: u64) -> Self {
        Self::new(ConfigKey::SampleRate, ConfigValue::UInt(rate))
    }

    /// Number of samples the capture is limited to.
    pub fn limit_samples(limit: u64) -> Self {
        Self::new(ConfigKey::LimitSamples, ConfigValue::UInt(limit))
    }

    /// Converter code of the lowest input.
    pub fn reference_min(code: u32) -> Self {
        Self::new(ConfigKey::ReferenceMin, ConfigValue::UInt(code as u64))
    }

    /// Converter code of the highest input.
    pub fn reference_max(code: u32) -> Self {
        Self::new(ConfigKey::ReferenceMax, ConfigValue::UInt(code as u64))
    }

    /// Hardware zero offset of the channel with physical index `channel`.
    pub fn channel_offset(channel: u16, offset: u16) -> Self {
        Self::new(
            ConfigKey::ChannelOffset(channel),
            ConfigValue::UInt(offset as u64),
        )
    }
}

/// Packed digital samples.
///
/// Each sample occupies `unit_size` bytes; bit `n` of the sample (byte
/// `n / 8`, bit `n % 8`) holds the `n`-th enabled logic channel.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicPacket {
    pub data: Vec<u8>,
    /// Bytes per sample
    pub unit_size: usize,
    /// Number of valid bytes in `data`
    pub length: usize,
    /// Omit rows whose channel values equal the previous sample's
    pub suppress_unchanged: bool,
}

impl LogicPacket {
    /// A packet whose declared length covers the whole buffer.
    pub fn new(data: Vec<u8>, unit_size: usize, suppress_unchanged: bool) -> Self {
        let length = data.len();
        Self {
            data,
            unit_size,
            length,
            suppress_unchanged,
        }
    }
}

/// Interleaved byte samples, one byte per channel slot per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct InterleavedPacket {
    pub data: Vec<u8>,
    pub num_samples: usize,
}

impl InterleavedPacket {
    pub fn new(data: Vec<u8>, num_samples: usize) -> Self {
        Self { data, num_samples }
    }
}

/// A unit of the acquisition stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Ordered configuration updates
    Meta(Vec<MetaEntry>),
    /// Digital samples
    Logic(LogicPacket),
    /// Oscilloscope samples
    Scope(InterleavedPacket),
    /// Generic analog samples
    Analog(InterleavedPacket),
    /// Trigger position marker
    Trigger,
    /// End of the acquisition
    End,
    /// A packet type this exporter does not understand
    Unsupported(u16),
}

impl Packet {
    /// Returns true for packets that carry samples.
    pub fn is_data(&self) -> bool {
        matches!(self, Packet::Logic(_) | Packet::Scope(_) | Packet::Analog(_))
    }
}
