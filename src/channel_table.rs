//! Per-session channel table.
//!
//! [`ChannelTable::build`] resolves the device's full channel list into one
//! [`ChannelDescriptor`] per enabled channel of the exported trace kind. The
//! table is built once at initialization; only the hardware zero offsets may
//! change afterwards.

use log::debug;

use crate::{
    Error, Result,
    types::{ChannelConfig, Device, TraceKind},
};

/// Number of vertical divisions on an oscilloscope screen.
pub const DSO_VDIVS: f64 = 10.0;

/// Maximum number of enabled logic channels (bits of the masked word).
pub const MAX_LOGIC_CHANNELS: usize = u64::BITS as usize;

/// Display-scale classification of an oscilloscope channel.
///
/// Spans are expressed in millivolts; the tier picks the unit in which the
/// channel's amplitudes are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitTier {
    /// Amplitudes in millivolts
    Milli,
    /// Amplitudes in volts
    Base,
    /// Amplitudes in kilovolts
    Kilo,
}

impl UnitTier {
    /// Pick the tier for a full-scale span given in millivolts.
    pub fn from_span(span: f64) -> Self {
        if span >= 5_000_000.0 {
            UnitTier::Kilo
        } else if span >= 5_000.0 {
            UnitTier::Base
        } else {
            UnitTier::Milli
        }
    }

    /// Raw units per display unit.
    pub fn divisor(self) -> f64 {
        match self {
            UnitTier::Milli => 1.0,
            UnitTier::Base => 1_000.0,
            UnitTier::Kilo => 1_000_000.0,
        }
    }

    /// Unit label used in column headers.
    pub fn label(self) -> &'static str {
        match self {
            UnitTier::Milli => "mV",
            UnitTier::Base => "V",
            UnitTier::Kilo => "kV",
        }
    }
}

/// Resolved, session-local description of one enabled channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDescriptor {
    /// Physical channel index on the device
    pub index: u16,
    /// Channel name, for the column header
    pub name: String,
    /// Position of this channel's data within a raw sample.
    ///
    /// Logic: bit number in the packed sample. Scope: position among the
    /// enabled channels of the interleave. Analog: physical slot within the
    /// interleave, disabled slots included.
    pub raw_offset: usize,
    /// Display unit of a Scope channel
    pub unit_tier: UnitTier,
    /// Physical span per raw unit, already divided by the unit tier
    pub scale_factor: f64,
    /// Raw code representing physical zero
    pub hw_offset: u16,
    /// Physical value at the bottom of the converter range (Analog)
    pub display_min: f64,
    /// Physical value at the top of the converter range (Analog)
    pub display_max: f64,
    /// Configured unit of the mapped range (Analog)
    pub unit: String,
    /// Always true for descriptors in a table
    pub enabled: bool,
}

impl ChannelDescriptor {
    fn resolve(ch: &ChannelConfig, raw_offset: usize) -> Self {
        let span = ch.vdiv * ch.vfactor * DSO_VDIVS;
        let unit_tier = UnitTier::from_span(span);
        Self {
            index: ch.index,
            name: ch.name.clone(),
            raw_offset,
            unit_tier,
            scale_factor: span / unit_tier.divisor(),
            hw_offset: ch.hw_offset,
            display_min: ch.map_min,
            display_max: ch.map_max,
            unit: ch.map_unit.clone(),
            enabled: ch.enabled,
        }
    }

    /// Width of the physical range mapped onto the converter range.
    #[inline]
    pub fn display_range(&self) -> f64 {
        self.display_max - self.display_min
    }
}

/// Ordered descriptors of every enabled channel of one trace kind.
#[derive(Debug, Clone)]
pub struct ChannelTable {
    kind: TraceKind,
    descriptors: Vec<ChannelDescriptor>,
    /// Enabled flag of every channel of `kind`, in device order
    slots: Vec<bool>,
}

impl ChannelTable {
    /// Build the table for `kind` from the device's full channel list.
    ///
    /// A kind without any matching channel yields an empty table.
    ///
    /// # Errors
    /// * [`Error::ChannelLimit`] if more than [`MAX_LOGIC_CHANNELS`] logic
    ///   channels are enabled
    /// * [`Error::Allocation`] if the descriptor storage cannot be reserved
    pub fn build(device: &Device, kind: TraceKind) -> Result<Self> {
        let slots: Vec<bool> = device.channels_of(kind).map(|ch| ch.enabled).collect();
        let enabled = slots.iter().filter(|e| **e).count();

        if kind == TraceKind::Logic && enabled > MAX_LOGIC_CHANNELS {
            return Err(Error::ChannelLimit {
                count: enabled,
                max: MAX_LOGIC_CHANNELS,
            });
        }

        let mut descriptors = Vec::new();
        descriptors
            .try_reserve_exact(enabled)
            .map_err(|_| Error::Allocation { requested: enabled })?;

        for (slot, ch) in device.channels_of(kind).enumerate() {
            if !ch.enabled {
                continue;
            }
            let raw_offset = match kind {
                TraceKind::Logic | TraceKind::Scope => descriptors.len(),
                TraceKind::Analog => slot,
            };
            descriptors.push(ChannelDescriptor::resolve(ch, raw_offset));
        }

        debug!(
            "built {} channel table: {}/{} channels enabled",
            kind.as_str(),
            descriptors.len(),
            slots.len()
        );

        Ok(Self {
            kind,
            descriptors,
            slots,
        })
    }

    pub fn kind(&self) -> TraceKind {
        self.kind
    }

    pub fn descriptors(&self) -> &[ChannelDescriptor] {
        &self.descriptors
    }

    /// Number of enabled channels.
    pub fn enabled_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Number of channels of this kind on the device, enabled or not.
    pub fn total_count(&self) -> usize {
        self.slots.len()
    }

    /// Enabled flag of every physical slot, in device order.
    pub fn slots(&self) -> &[bool] {
        &self.slots
    }

    /// Refresh the hardware zero offset of the channel with physical `index`.
    ///
    /// Returns false if no enabled channel has that index.
    pub fn set_hw_offset(&mut self, index: u16, hw_offset: u16) -> bool {
        match self.descriptors.iter_mut().find(|d| d.index == index) {
            Some(desc) => {
                desc.hw_offset = hw_offset;
                true
            }
            None => false,
        }
    }
}
