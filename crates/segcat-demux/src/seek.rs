//! Seek engine.
//!
//! A seek locates the segment holding the target on the virtual timeline,
//! opens it next to the current one, and seeks inside it. When the in-segment
//! seek fails and the window reaches into the following segment, that one is
//! tried once instead. The previous segment is only closed once a seek has
//! succeeded; on any failure it is put back untouched.

use segcat_core::{Error, Rational, Result, Rounding, TIME_BASE_Q};

use crate::demuxer::ConcatDemuxer;
use crate::pump::PumpState;
use crate::reader::SeekFlags;

/// A seek target with its acceptable window.
///
/// With `stream` set, the timestamps are in that virtual stream's time base;
/// otherwise they are microseconds. `i64::MIN` and `i64::MAX` leave the
/// window open on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekRequest {
    pub stream: Option<usize>,
    pub min_ts: i64,
    pub ts: i64,
    pub max_ts: i64,
    pub flags: SeekFlags,
}

impl SeekRequest {
    /// Seek as close as possible to `ts` microseconds, anywhere.
    pub fn to(ts: i64) -> Self {
        Self::window(i64::MIN, ts, i64::MAX)
    }

    pub fn window(min_ts: i64, ts: i64, max_ts: i64) -> Self {
        Self {
            stream: None,
            min_ts,
            ts,
            max_ts,
            flags: SeekFlags::default(),
        }
    }

    pub fn with_stream(mut self, stream: usize) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn with_flags(mut self, flags: SeekFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    min_ts: i64,
    ts: i64,
    max_ts: i64,
}

impl Window {
    fn rescale(self, from: Rational, to: Rational) -> Self {
        Self {
            min_ts: from.rescale_pass_minmax(self.min_ts, to, Rounding::Up),
            ts: from.rescale(self.ts, to),
            max_ts: from.rescale_pass_minmax(self.max_ts, to, Rounding::Down),
        }
    }

    /// Shift by `-t0`, keeping open bounds open.
    fn shift_back(self, t0: i64) -> Self {
        let shift = |v: i64| {
            if v == i64::MIN || v == i64::MAX {
                v
            } else {
                v.saturating_sub(t0)
            }
        };
        Self {
            min_ts: shift(self.min_ts),
            ts: self.ts.saturating_sub(t0),
            max_ts: shift(self.max_ts),
        }
    }
}

impl ConcatDemuxer {
    /// Seek the virtual source.
    ///
    /// Fails with [`Error::NotSupported`] on a list whose durations were not
    /// all known up front, or for byte and frame seeks; those rejections
    /// change nothing. Any seek that gets past them clears an exhausted
    /// state, whether it succeeds or not.
    pub fn seek(&mut self, request: SeekRequest) -> Result<()> {
        if !self.segments.table().is_seekable() {
            return Err(Error::not_supported("concat list is not seekable"));
        }
        if request.flags.byte || request.flags.frame {
            return Err(Error::not_supported("byte and frame seeking"));
        }

        let window = Window {
            min_ts: request.min_ts,
            ts: request.ts,
            max_ts: request.max_ts,
        };
        let window = match request.stream {
            Some(stream) => {
                let time_base = self.streams.time_base(stream).ok_or_else(|| {
                    Error::invalid_data(format!(
                        "stream {stream} out of range ({} streams)",
                        self.streams.len()
                    ))
                })?;
                window.rescale(time_base, TIME_BASE_Q)
            }
            None => window,
        };

        self.state = PumpState::Ready;
        let saved = self.segments.take_active();
        match self.seek_located(request.stream, window, request.flags) {
            Ok(index) => {
                if let Some(saved) = saved {
                    tracing::debug!(from = saved.index(), to = index, "seek committed");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, ts = window.ts, "seek failed; restoring previous segment");
                if let Some(saved) = saved {
                    self.segments.restore_active(saved);
                }
                Err(e)
            }
        }
    }

    /// Open the segment holding `window.ts` and seek inside it, falling
    /// back to the next segment once. Returns the index that took the seek.
    fn seek_located(
        &mut self,
        stream: Option<usize>,
        window: Window,
        flags: SeekFlags,
    ) -> Result<usize> {
        let index = self.segments.table().locate(window.ts)?;
        self.segments.open_segment(index)?;

        let Err(e) = self.try_seek(stream, window, flags) else {
            return Ok(index);
        };

        let next_start = self
            .segments
            .table()
            .get(index + 1)
            .and_then(|s| s.start_time);
        match next_start {
            Some(next) if next < window.max_ts => {
                tracing::debug!(index, error = %e, "seek failed inside segment; trying the next one");
                self.segments.open_segment(index + 1)?;
                self.try_seek(stream, window, flags)?;
                Ok(index + 1)
            }
            _ => Err(e),
        }
    }

    /// Seek the installed segment, translating `window` (microseconds) into
    /// its own time.
    fn try_seek(&mut self, stream: Option<usize>, window: Window, flags: SeekFlags) -> Result<()> {
        let active = self.segments.require_active_mut()?;
        let mut local = window.shift_back(active.offset());
        if let Some(stream) = stream {
            let time_base = active
                .reader()
                .streams()
                .get(stream)
                .map(|s| s.time_base)
                .ok_or_else(|| {
                    Error::reader(format!("segment {} has no stream {stream}", active.index()))
                })?;
            local = local.rescale(TIME_BASE_Q, time_base);
        }
        active
            .reader_mut()
            .seek(stream, local.min_ts, local.ts, local.max_ts, flags)
    }
}
