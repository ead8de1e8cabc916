//! Output module handle with an explicit lifecycle.
//!
//! Hosts that drive the exporter through an init/receive/cleanup interface use
//! [`Output`]. It walks through
//! `Uninitialized -> Initialized -> Streaming -> Closed` and rejects calls that
//! do not fit the current state.

use log::{debug, error};

use crate::{
    Error, Result,
    packet::Packet,
    session::ExportSession,
    types::{Device, OutputOptions},
};

/// Lifecycle state of an [`Output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    /// No session yet
    Uninitialized,
    /// Channel table built, no packet received yet
    Initialized,
    /// At least one packet received
    Streaming,
    /// Session released
    Closed,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Uninitialized,
    Initialized(ExportSession),
    Streaming(ExportSession),
    Closed,
}

/// CSV output module.
///
/// ```
/// use trace_csv::{ChannelConfig, Device, Output, OutputOptions, OutputState, Result};
/// use trace_csv::packet::{MetaEntry, Packet};
///
/// fn run() -> Result<()> {
///     let device = Device::new("la", vec![ChannelConfig::logic(0, "D0")]);
///     let mut output = Output::new();
///     output.init(Some(&device), OutputOptions::default())?;
///     assert_eq!(output.state(), OutputState::Initialized);
///
///     output.receive(&Packet::Meta(vec![MetaEntry::sample_rate(1_000)]))?;
///     assert_eq!(output.state(), OutputState::Streaming);
///
///     output.cleanup();
///     assert!(output.receive(&Packet::End).is_err());
///     Ok(())
/// }
/// run().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Output {
    state: State,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session for `device`.
    ///
    /// # Errors
    /// * [`Error::MissingDevice`] if `device` is `None`
    /// * [`Error::AlreadyInitialized`] / [`Error::SessionClosed`] if the
    ///   output is past `Uninitialized`
    /// * any error of [`ExportSession::new`]; the output stays
    ///   `Uninitialized`
    pub fn init(&mut self, device: Option<&Device>, options: OutputOptions) -> Result<()> {
        match self.state {
            State::Uninitialized => {}
            State::Initialized(_) | State::Streaming(_) => return Err(Error::AlreadyInitialized),
            State::Closed => return Err(Error::SessionClosed),
        }
        let device = device.ok_or(Error::MissingDevice)?;
        let session = ExportSession::new(device, &options).inspect_err(|e| {
            error!("failed to initialize CSV output: {e}");
        })?;
        self.state = State::Initialized(session);
        Ok(())
    }

    /// Feed one packet to the session. See [`ExportSession::receive`].
    ///
    /// # Errors
    /// * [`Error::NotInitialized`] before [`init`](Self::init)
    /// * [`Error::SessionClosed`] after [`cleanup`](Self::cleanup)
    /// * any error of the session for this packet
    pub fn receive(&mut self, packet: &Packet) -> Result<Option<String>> {
        if let State::Initialized(_) = self.state {
            if let State::Initialized(session) = core::mem::take(&mut self.state) {
                self.state = State::Streaming(session);
            }
        }
        let session = match &mut self.state {
            State::Streaming(session) => session,
            State::Uninitialized | State::Initialized(_) => return Err(Error::NotInitialized),
            State::Closed => return Err(Error::SessionClosed),
        };
        session.receive(packet).inspect_err(|e| {
            error!("CSV output rejected packet: {e}");
        })
    }

    /// Release the session. Safe in every state, including before any data
    /// packet arrived.
    pub fn cleanup(&mut self) {
        if let State::Initialized(_) | State::Streaming(_) = self.state {
            debug!("CSV output closed");
        }
        self.state = State::Closed;
    }

    pub fn state(&self) -> OutputState {
        match self.state {
            State::Uninitialized => OutputState::Uninitialized,
            State::Initialized(_) => OutputState::Initialized,
            State::Streaming(_) => OutputState::Streaming,
            State::Closed => OutputState::Closed,
        }
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<&ExportSession> {
        match &self.state {
            State::Initialized(session) | State::Streaming(session) => Some(session),
            State::Uninitialized | State::Closed => None,
        }
    }
}
