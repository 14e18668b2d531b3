//! Segment lifecycle: at most one open reader, opened lazily.
//!
//! The [`SegmentManager`] owns the segment table and the single installed
//! [`ActiveSegment`]. Opening a segment never disturbs the installed one
//! until the new reader is ready; a failed open leaves everything as it was.
//! The seek path takes the installed segment out with
//! [`take_active`](SegmentManager::take_active) and either drops it or puts
//! it back with [`restore_active`](SegmentManager::restore_active).

use std::fmt;
use std::sync::Arc;

use segcat_core::{Error, Result, SegmentTable, TIME_BASE_Q};

use crate::reader::{OpenOptions, Packet, ReaderFactory, SegmentReader};
use crate::resolver::SegmentResolver;

/// The segment currently being read.
pub struct ActiveSegment {
    index: usize,
    start_time: i64,
    reader: Box<dyn SegmentReader>,
    observed_end: Option<i64>,
}

impl ActiveSegment {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Virtual start time of this segment in microseconds.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn reader(&self) -> &dyn SegmentReader {
        self.reader.as_ref()
    }

    pub fn reader_mut(&mut self) -> &mut dyn SegmentReader {
        self.reader.as_mut()
    }

    /// Largest packet end seen so far, in microseconds from the reader's
    /// start time.
    pub fn observed_end(&self) -> Option<i64> {
        self.observed_end
    }

    /// Offset between the reader's own clock and the virtual timeline,
    /// in microseconds.
    pub fn offset(&self) -> i64 {
        self.start_time
            .saturating_sub(self.reader.start_time().unwrap_or(0))
    }

    /// Track the end of `packet` (still in reader time) for duration fallback.
    pub(crate) fn observe(&mut self, packet: &Packet) {
        let Some(stream) = self.reader.streams().get(packet.stream_index) else {
            return;
        };
        let Some(ts) = packet.pts.or(packet.dts) else {
            return;
        };
        let end = ts.saturating_add(packet.duration.unwrap_or(0));
        let end = stream
            .time_base
            .rescale(end, TIME_BASE_Q)
            .saturating_sub(self.reader.start_time().unwrap_or(0));
        self.observed_end = Some(self.observed_end.map_or(end, |prev| prev.max(end)));
    }
}

impl fmt::Debug for ActiveSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSegment")
            .field("index", &self.index)
            .field("start_time", &self.start_time)
            .field("streams", &self.reader.streams().len())
            .field("observed_end", &self.observed_end)
            .finish()
    }
}

/// Owns the segment table and the one installed reader.
pub struct SegmentManager {
    table: SegmentTable,
    factory: Arc<dyn ReaderFactory>,
    resolver: Option<Arc<dyn SegmentResolver>>,
    options: OpenOptions,
    active: Option<ActiveSegment>,
}

impl SegmentManager {
    pub fn new(
        table: SegmentTable,
        factory: Arc<dyn ReaderFactory>,
        resolver: Option<Arc<dyn SegmentResolver>>,
        options: OpenOptions,
    ) -> Self {
        Self {
            table,
            factory,
            resolver,
            options,
            active: None,
        }
    }

    pub fn table(&self) -> &SegmentTable {
        &self.table
    }

    pub fn active(&self) -> Option<&ActiveSegment> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveSegment> {
        self.active.as_mut()
    }

    pub(crate) fn require_active(&self) -> Result<&ActiveSegment> {
        self.active.as_ref().ok_or_else(no_active_segment)
    }

    pub(crate) fn require_active_mut(&mut self) -> Result<&mut ActiveSegment> {
        self.active.as_mut().ok_or_else(no_active_segment)
    }

    /// Open segment `index` and install it, closing the previous reader.
    ///
    /// On failure nothing changes: the previously installed segment (if
    /// any) stays installed and the table is untouched.
    pub fn open_segment(&mut self, index: usize) -> Result<()> {
        let segment = self.open_reader(index)?;
        if let Some(previous) = self.active.replace(segment) {
            tracing::debug!(
                from = previous.index,
                to = index,
                "closing segment after transition"
            );
        }
        Ok(())
    }

    fn open_reader(&mut self, index: usize) -> Result<ActiveSegment> {
        let descriptor = self.table.get(index).ok_or_else(|| {
            Error::invalid_data(format!(
                "segment {index} out of range ({} segments)",
                self.table.len()
            ))
        })?;
        if self.table.inferred_start(index).is_none() {
            return Err(Error::invalid_data(format!(
                "start time of segment {index} depends on an unknown duration"
            )));
        }

        let override_url = self
            .resolver
            .as_ref()
            .and_then(|resolver| resolver.resolve_url(index));
        let url = override_url.as_deref().unwrap_or(&descriptor.url);
        tracing::debug!(index, url, "opening segment");

        let reader = self.factory.open(url, &self.options).map_err(|e| {
            tracing::error!(index, url = %descriptor.url, error = %e, "impossible to open segment");
            match e {
                Error::Open { .. } => e,
                other => Error::open(descriptor.url.clone(), other),
            }
        })?;

        let start_time = self.table.resolve_start(index)?;
        Ok(ActiveSegment {
            index,
            start_time,
            reader,
            observed_end: None,
        })
    }

    /// Move to the segment after the active one.
    ///
    /// Backfills the active segment's duration first when it is unknown,
    /// from the reader or else from the largest packet end observed. Fails
    /// with [`Error::EndOfSequence`] when the active segment is the last.
    pub fn advance_to_next(&mut self) -> Result<()> {
        let active = self.require_active()?;
        let index = active.index;

        let known = self.table.get(index).and_then(|s| s.duration).is_some();
        if !known {
            if let Some(duration) = active.reader.duration().or(active.observed_end) {
                if self.table.backfill_duration(index, duration) {
                    tracing::debug!(index, duration, "backfilled segment duration");
                }
            }
        }

        if self.table.is_last(index) {
            return Err(Error::EndOfSequence);
        }
        self.open_segment(index + 1)
    }

    /// Remove the installed segment without closing it.
    pub fn take_active(&mut self) -> Option<ActiveSegment> {
        self.active.take()
    }

    /// Reinstall a segment taken with [`take_active`](Self::take_active),
    /// closing whatever was installed meanwhile.
    pub fn restore_active(&mut self, saved: ActiveSegment) {
        if let Some(candidate) = self.active.replace(saved) {
            tracing::debug!(index = candidate.index, "closing abandoned seek candidate");
        }
    }
}

fn no_active_segment() -> Error {
    Error::reader("no active segment")
}
