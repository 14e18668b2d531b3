//! The ordered segment table behind a virtual source.
//!
//! A [`SegmentTable`] is built once from a list of [`SegmentDescriptor`]s.
//! Construction runs the backfill pass: start times are folded forward from
//! zero through every known duration, stopping at the first segment whose
//! duration is unknown. Only a table whose fold reached the end is
//! seekable, since locating a timestamp needs every start time up front.
//!
//! After construction the table only changes through backfill: a segment's
//! start time when it is opened in sequence, and its duration once it has
//! been played through.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One independently openable media source.
///
/// Times are microseconds on the virtual timeline; `None` means unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub url: String,
    pub start_time: Option<i64>,
    pub duration: Option<i64>,
}

impl SegmentDescriptor {
    /// A descriptor with unknown start time and duration.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            start_time: None,
            duration: None,
        }
    }

    /// A descriptor with an explicit duration.
    pub fn with_duration(url: impl Into<String>, duration: i64) -> Self {
        Self {
            url: url.into(),
            start_time: None,
            duration: Some(duration),
        }
    }

    /// End of this segment on the virtual timeline, when both ends are known.
    pub fn end_time(&self) -> Option<i64> {
        Some(self.start_time?.saturating_add(self.duration?))
    }
}

/// Ordered, non-empty list of segments plus the derived seekability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentTable {
    segments: Vec<SegmentDescriptor>,
    seekable: bool,
    total_duration: Option<i64>,
}

impl SegmentTable {
    /// Build the table and run the backfill pass.
    ///
    /// Fails with [`Error::InvalidData`] when `segments` is empty or a
    /// duration is negative.
    pub fn new(mut segments: Vec<SegmentDescriptor>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::invalid_data("no segments in concat list"));
        }
        if let Some(segment) = segments.iter().find(|s| s.duration.is_some_and(|d| d < 0)) {
            return Err(Error::invalid_data(format!(
                "negative duration for '{}'",
                segment.url
            )));
        }

        let mut time = 0i64;
        let mut complete = true;
        for segment in segments.iter_mut() {
            match segment.start_time {
                Some(start) => time = start,
                None => segment.start_time = Some(time),
            }
            let Some(duration) = segment.duration else {
                complete = false;
                break;
            };
            time = time.saturating_add(duration);
        }

        let total_duration = complete.then_some(time);
        if complete {
            tracing::info!(
                segments = segments.len(),
                total_duration = time,
                "concat list is seekable"
            );
        } else {
            tracing::debug!(
                segments = segments.len(),
                "concat list has unknown durations; seeking disabled"
            );
        }

        Ok(Self {
            segments,
            seekable: complete,
            total_duration,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SegmentDescriptor> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentDescriptor> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[SegmentDescriptor] {
        &self.segments
    }

    /// Whether every start time and duration was known at construction.
    ///
    /// This is never re-evaluated, even after playback backfills the rest.
    pub fn is_seekable(&self) -> bool {
        self.seekable
    }

    /// Sum of all durations, known only for seekable tables.
    pub fn total_duration(&self) -> Option<i64> {
        self.total_duration
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.segments.len()
    }

    /// Start time `index` would have if it follows its predecessor directly.
    ///
    /// Returns the stored start time when already resolved, `0` for the first
    /// segment, and `None` when the predecessor's start or duration is unknown.
    pub fn inferred_start(&self, index: usize) -> Option<i64> {
        let segment = self.segments.get(index)?;
        if segment.start_time.is_some() {
            return segment.start_time;
        }
        if index == 0 {
            return Some(0);
        }
        self.segments[index - 1].end_time()
    }

    /// Resolve the start time of `index` if still unknown.
    ///
    /// Fails with [`Error::InvalidData`] when the predecessor is not yet
    /// resolved; the sequential open path always backfills it first.
    pub fn resolve_start(&mut self, index: usize) -> Result<i64> {
        let start = self.inferred_start(index).ok_or_else(|| {
            Error::invalid_data(format!(
                "start time of segment {index} depends on an unknown duration"
            ))
        })?;
        self.segments[index].start_time = Some(start);
        Ok(start)
    }

    /// Backfill the duration of `index` if it is still unknown.
    ///
    /// Returns `true` when a value was stored.
    pub fn backfill_duration(&mut self, index: usize, duration: i64) -> bool {
        match self.segments.get_mut(index) {
            Some(segment) if segment.duration.is_none() => {
                segment.duration = Some(duration);
                true
            }
            _ => false,
        }
    }

    /// Find the segment containing timestamp `ts` (microseconds).
    ///
    /// Binary search for the greatest index whose start time is `<= ts`;
    /// timestamps before the first segment resolve to index 0. Fails with
    /// [`Error::NotSupported`] on a table that is not seekable.
    pub fn locate(&self, ts: i64) -> Result<usize> {
        if !self.seekable {
            return Err(Error::not_supported(
                "seeking requires every segment duration to be known",
            ));
        }

        let (mut left, mut right) = (0usize, self.segments.len());
        while right - left > 1 {
            let mid = (left + right) / 2;
            match self.segments[mid].start_time {
                Some(start) if ts < start => right = mid,
                _ => left = mid,
            }
        }
        Ok(left)
    }
}
