//! Packet pump: sequential reads across segment boundaries.
//!
//! Each packet leaves the pump with its timestamps shifted onto the virtual
//! timeline. When the active segment runs dry the pump advances to the next
//! one, retrying a failed open a bounded number of times before giving up
//! for good.

use std::fmt;

use segcat_core::{Error, ErrorKind, Result, TIME_BASE_Q};

use crate::demuxer::ConcatDemuxer;
use crate::reader::{Packet, ReadOutcome};

/// Retries after the first failed open of the next segment.
pub const MAX_OPEN_RETRIES: u32 = 3;

/// The error that ended playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalCause {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for TerminalCause {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for TerminalCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Whether the pump can still deliver packets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PumpState {
    #[default]
    Ready,
    /// Sticky until the next executed seek.
    Exhausted(TerminalCause),
}

impl ConcatDemuxer {
    /// Read the next packet of the virtual source.
    ///
    /// Returns [`Error::EndOfSequence`] once every segment has been played
    /// or the next segment could not be opened after
    /// [`MAX_OPEN_RETRIES`] retries; every later call returns it again
    /// without touching any reader. Other reader errors are passed through
    /// and do not end playback.
    pub fn read_packet(&mut self) -> Result<Packet> {
        if let PumpState::Exhausted(cause) = &self.state {
            tracing::trace!(%cause, "read on exhausted source");
            return Err(Error::EndOfSequence);
        }

        let mut retries = 0u32;
        let mut packet = loop {
            let active = self.segments.require_active_mut()?;
            if let ReadOutcome::Packet(packet) = active.reader_mut().read_packet()? {
                active.observe(&packet);
                break packet;
            }

            match self.segments.advance_to_next() {
                Ok(()) => {}
                Err(e) if e.is_end_of_sequence() => return Err(self.exhaust(e)),
                Err(e) => {
                    retries += 1;
                    if retries > MAX_OPEN_RETRIES {
                        return Err(self.exhaust(e));
                    }
                    tracing::warn!(attempt = retries, error = %e, "opening next segment failed");
                }
            }
        };

        let active = self.segments.require_active()?;
        let time_base = active
            .reader()
            .streams()
            .get(packet.stream_index)
            .map(|s| s.time_base)
            .ok_or_else(|| {
                Error::invalid_data(format!(
                    "segment {} has no stream {}",
                    active.index(),
                    packet.stream_index
                ))
            })?;
        let delta = TIME_BASE_Q.rescale(active.offset(), time_base);
        packet.pts = packet.pts.map(|ts| ts.saturating_add(delta));
        packet.dts = packet.dts.map(|ts| ts.saturating_add(delta));
        Ok(packet)
    }

    /// Record `cause` as terminal and return the error reported for it.
    fn exhaust(&mut self, cause: Error) -> Error {
        if cause.is_end_of_sequence() {
            tracing::debug!("all segments played");
        } else {
            tracing::error!(error = %cause, "giving up on next segment");
        }
        self.state = PumpState::Exhausted(TerminalCause::from(&cause));
        Error::EndOfSequence
    }
}
