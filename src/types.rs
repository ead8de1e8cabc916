//! Device and channel descriptions supplied by the host at initialization.
//!
//! These types are a read-only snapshot of the instrument's channel list. The
//! export engine never modifies them; it derives its own per-session channel
//! table from them (see [`crate::channel_table`]).

use chrono::NaiveDateTime;

#[cfg(feature = "std")]
use crate::{Error, Result};

/// Semantic category of a channel stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TraceKind {
    /// Digital channels, one bit per channel per sample
    #[default]
    Logic,
    /// Oscilloscope channels, one byte per channel per sample
    Scope,
    /// Generic analog sensor channels, one byte per physical slot per sample
    Analog,
}

impl TraceKind {
    /// Short lowercase name, used in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            TraceKind::Logic => "logic",
            TraceKind::Scope => "scope",
            TraceKind::Analog => "analog",
        }
    }
}

/// Configuration of a single device channel.
///
/// Calibration fields that do not apply to a channel's kind are ignored:
/// `vdiv`/`vfactor` only matter for Scope channels, `map_*` only for Analog
/// channels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelConfig {
    /// Physical index of the channel on the device
    pub index: u16,
    /// Display name
    pub name: String,
    /// Kind of trace this channel produces
    pub kind: TraceKind,
    /// Whether the channel is part of the capture
    pub enabled: bool,
    /// Vertical division size in millivolts
    pub vdiv: f64,
    /// Probe attenuation factor applied to `vdiv`
    pub vfactor: f64,
    /// Raw code that represents physical zero
    pub hw_offset: u16,
    /// Physical value mapped to the bottom of the converter range
    pub map_min: f64,
    /// Physical value mapped to the top of the converter range
    pub map_max: f64,
    /// Unit label of the mapped range
    pub map_unit: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            index: 0,
            name: String::new(),
            kind: TraceKind::Logic,
            enabled: true,
            vdiv: 1000.0,
            vfactor: 1.0,
            hw_offset: 0,
            map_min: 0.0,
            map_max: 0.0,
            map_unit: String::from("V"),
        }
    }
}

impl ChannelConfig {
    /// An enabled logic channel with the given index and name.
    pub fn logic(index: u16, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            kind: TraceKind::Logic,
            ..Self::default()
        }
    }

    /// An enabled oscilloscope channel.
    ///
    /// # Arguments
    /// * `vdiv` - Vertical division size in millivolts
    /// * `hw_offset` - Raw code representing 0 V
    pub fn scope(index: u16, name: impl Into<String>, vdiv: f64, hw_offset: u16) -> Self {
        Self {
            index,
            name: name.into(),
            kind: TraceKind::Scope,
            vdiv,
            hw_offset,
            ..Self::default()
        }
    }

    /// An enabled analog channel mapping the converter range onto
    /// `map_min..map_max` in `unit`.
    pub fn analog(
        index: u16,
        name: impl Into<String>,
        map_min: f64,
        map_max: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            kind: TraceKind::Analog,
            map_min,
            map_max,
            map_unit: unit.into(),
            ..Self::default()
        }
    }

    /// Builder-style toggle of the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder-style override of the hardware zero offset.
    pub fn with_hw_offset(mut self, hw_offset: u16) -> Self {
        self.hw_offset = hw_offset;
        self
    }
}

/// The instrument whose packet stream is being exported.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Device {
    /// Device model name
    pub name: String,
    /// Full ordered channel list, all kinds
    pub channels: Vec<ChannelConfig>,
}

impl Device {
    /// Create a device description from its channel list.
    pub fn new(name: impl Into<String>, channels: Vec<ChannelConfig>) -> Self {
        Self {
            name: name.into(),
            channels,
        }
    }

    /// Iterate over the channels of one trace kind, enabled or not.
    pub fn channels_of(&self, kind: TraceKind) -> impl Iterator<Item = &ChannelConfig> {
        self.channels.iter().filter(move |ch| ch.kind == kind)
    }

    /// Parse a device description from JSON.
    ///
    /// Requires the `std` feature.
    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::ConfigParse(format!("JSON deserialization failed: {e}")))
    }

    /// Serialize this description to pretty-printed JSON.
    #[cfg(feature = "std")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigParse(format!("JSON serialization failed: {e}")))
    }

    /// Load a device description from a JSON file.
    #[cfg(feature = "std")]
    pub fn load_from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(Error::IOError)?;
        Self::from_json(&json)
    }

    /// Save this description to a JSON file.
    #[cfg(feature = "std")]
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(Error::IOError)?;
        Ok(())
    }
}

/// Initialization-time options of an export session.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    /// Which channels and packets to export
    pub trace_kind: TraceKind,
    /// Field separator of every row and of the column header
    pub separator: char,
    /// Generation time printed in the header; the local time at header
    /// emission when `None`
    pub generated_at: Option<NaiveDateTime>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            trace_kind: TraceKind::Logic,
            separator: ',',
            generated_at: None,
        }
    }
}

impl OutputOptions {
    /// Default options exporting `trace_kind`.
    pub fn new(trace_kind: TraceKind) -> Self {
        Self {
            trace_kind,
            ..Self::default()
        }
    }

    /// Use `separator` between fields instead of `,`.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Pin the header's generation time, for reproducible output.
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }
}
