//! Error types for CSV export operations.
//!
//! This module defines the [`Error`] enum which represents all possible failures
//! that can occur while building a channel table, ingesting packets or writing
//! the produced text.
//!
//! # Example
//!
//! ```
//! use trace_csv::{Device, Error, Output, OutputOptions};
//!
//! let mut output = Output::new();
//! match output.init(None::<&Device>, OutputOptions::default()) {
//!     Err(Error::MissingDevice) => {}
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use core::fmt;

/// Errors that can occur during an export session.
///
/// Every variant is fatal for the call that reported it. The engine never
/// retries internally.
#[derive(Debug)]
pub enum Error {
    /// No device (and therefore no channel list) was supplied at init.
    MissingDevice,

    /// Storage for the channel table could not be reserved.
    Allocation {
        /// Number of descriptors that were requested
        requested: usize,
    },

    /// More channels are enabled than a packed logic word can hold.
    ChannelLimit {
        /// Number of enabled channels
        count: usize,
        /// Maximum supported number of channels
        max: usize,
    },

    /// The ADC reference range is empty or inverted.
    ///
    /// Raised when a Scope or Analog row would be produced while
    /// `reference_high <= reference_low`.
    InvalidReferenceRange {
        /// Lower end of the converter's raw code range
        low: u32,
        /// Upper end of the converter's raw code range
        high: u32,
    },

    /// A logic row needs a timestamp but the sample rate is zero.
    ZeroSampleRate,

    /// A packet buffer is shorter than its declared contents.
    BufferTooShort {
        /// Actual number of bytes available
        actual: usize,
        /// Minimum number of bytes required
        expected: usize,
    },

    /// A packet carries framing values that cannot describe any sample.
    InvalidPacket(String),

    /// A packet was delivered before the output was initialized.
    NotInitialized,

    /// `init` was called on an output that already holds a session.
    AlreadyInitialized,

    /// A packet was delivered after the output was closed.
    SessionClosed,

    /// A device description could not be parsed.
    ConfigParse(String),

    /// An I/O error occurred while writing produced text.
    ///
    /// Only available with the `std` feature.
    #[cfg(feature = "std")]
    IOError(std::io::Error),
}

impl Error {
    /// Returns true for calibration/configuration problems detected while
    /// producing rows.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidReferenceRange { .. } | Error::ZeroSampleRate
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingDevice => write!(f, "No device or channel list supplied"),
            Error::Allocation { requested } => write!(
                f,
                "Failed to allocate channel table for {requested} channels"
            ),
            Error::ChannelLimit { count, max } => write!(
                f,
                "Too many enabled channels: {count} enabled, at most {max} supported"
            ),
            Error::InvalidReferenceRange { low, high } => write!(
                f,
                "Invalid ADC reference range: high ({high}) must exceed low ({low})"
            ),
            Error::ZeroSampleRate => write!(f, "Sample rate is zero, cannot compute timestamps"),
            Error::BufferTooShort { actual, expected } => write!(
                f,
                "Packet buffer too small: need at least {expected} bytes, got {actual}"
            ),
            Error::InvalidPacket(s) => write!(f, "Invalid packet: {s}"),
            Error::NotInitialized => write!(f, "Output has not been initialized"),
            Error::AlreadyInitialized => write!(f, "Output is already initialized"),
            Error::SessionClosed => write!(f, "Output session has been closed"),
            Error::ConfigParse(s) => write!(f, "Device configuration error: {s}"),
            #[cfg(feature = "std")]
            Error::IOError(e) => write!(f, "I/O error: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IOError(err)
    }
}

/// A specialized Result type for export operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_grouped() {
        assert!(Error::ZeroSampleRate.is_configuration());
        assert!(Error::InvalidReferenceRange { low: 5, high: 5 }.is_configuration());
        assert!(!Error::NotInitialized.is_configuration());
        assert!(
            !Error::BufferTooShort {
                actual: 1,
                expected: 2
            }
            .is_configuration()
        );
    }

    #[test]
    fn display_mentions_reference_values() {
        let msg = Error::InvalidReferenceRange { low: 10, high: 3 }.to_string();
        assert!(msg.contains("high (3)"));
        assert!(msg.contains("low (10)"));
    }
}
