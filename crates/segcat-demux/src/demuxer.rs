//! The virtual source and its builder.

use std::fmt;
use std::sync::Arc;

use segcat_core::{ConcatOptions, Error, Result, SegmentTable};
use segcat_script::{parse_script, SegmentListBuilder};

use crate::lifecycle::SegmentManager;
use crate::pump::{PumpState, TerminalCause};
use crate::reader::{InterruptHandle, OpenOptions, ReaderFactory};
use crate::resolver::SegmentResolver;
use crate::streams::VirtualStreamTable;

/// An ordered list of segments presented as one continuous source.
///
/// Built with [`ConcatDemuxerBuilder`]. Packets are read with
/// [`read_packet`](ConcatDemuxer::read_packet) and the source is
/// repositioned with [`seek`](ConcatDemuxer::seek). Dropping the demuxer
/// closes the open segment.
pub struct ConcatDemuxer {
    pub(crate) segments: SegmentManager,
    pub(crate) streams: VirtualStreamTable,
    pub(crate) state: PumpState,
}

impl ConcatDemuxer {
    pub fn builder(factory: Arc<dyn ReaderFactory>) -> ConcatDemuxerBuilder {
        ConcatDemuxerBuilder::new(factory)
    }

    /// Streams of the virtual source, copied from the first segment.
    pub fn streams(&self) -> &VirtualStreamTable {
        &self.streams
    }

    /// Total duration in microseconds; known only for seekable lists.
    pub fn duration(&self) -> Option<i64> {
        self.segments.table().total_duration()
    }

    pub fn table(&self) -> &SegmentTable {
        self.segments.table()
    }

    /// Index of the segment being read.
    pub fn current_index(&self) -> Option<usize> {
        self.segments.active().map(|a| a.index())
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, PumpState::Exhausted(_))
    }

    /// Why playback ended, once it has.
    pub fn terminal_cause(&self) -> Option<&TerminalCause> {
        match &self.state {
            PumpState::Exhausted(cause) => Some(cause),
            PumpState::Ready => None,
        }
    }
}

impl fmt::Debug for ConcatDemuxer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatDemuxer")
            .field("segments", &self.segments.table().len())
            .field("current", &self.segments.active())
            .field("streams", &self.streams.len())
            .field("state", &self.state)
            .finish()
    }
}

/// Configures and opens a [`ConcatDemuxer`].
///
/// The segment list comes from the resolver when it reports at least one
/// segment, otherwise from the script.
pub struct ConcatDemuxerBuilder {
    factory: Arc<dyn ReaderFactory>,
    options: ConcatOptions,
    interrupt: Option<InterruptHandle>,
    resolver: Option<Arc<dyn SegmentResolver>>,
    base: String,
    script: Option<String>,
}

impl ConcatDemuxerBuilder {
    pub fn new(factory: Arc<dyn ReaderFactory>) -> Self {
        Self {
            factory,
            options: ConcatOptions::default(),
            interrupt: None,
            resolver: None,
            base: String::new(),
            script: None,
        }
    }

    pub fn options(mut self, options: ConcatOptions) -> Self {
        self.options = options;
        self
    }

    /// Handle passed to every segment open for cooperative cancellation.
    pub fn interrupt(mut self, handle: InterruptHandle) -> Self {
        self.interrupt = Some(handle);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn SegmentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Script text and the locator it was read from; relative `file`
    /// entries resolve against `base`.
    pub fn script(mut self, base: impl Into<String>, script: impl Into<String>) -> Self {
        self.base = base.into();
        self.script = Some(script.into());
        self
    }

    /// Build the segment table, open the first segment and snapshot its
    /// streams.
    pub fn build(self) -> Result<ConcatDemuxer> {
        let table = self.build_table()?;
        let open_options = OpenOptions {
            timeout: self.options.timeout(),
            interrupt: self.interrupt,
        };

        let mut segments = SegmentManager::new(table, self.factory, self.resolver, open_options);
        segments.open_segment(0)?;
        let streams = VirtualStreamTable::from_reader(segments.require_active()?.reader());
        tracing::debug!(
            segments = segments.table().len(),
            streams = streams.len(),
            "concat source opened"
        );

        Ok(ConcatDemuxer {
            segments,
            streams,
            state: PumpState::Ready,
        })
    }

    fn build_table(&self) -> Result<SegmentTable> {
        if let Some(resolver) = &self.resolver {
            let entries = resolver.resolve_list();
            if !entries.is_empty() {
                let mut builder = SegmentListBuilder::new(self.base.as_str(), self.options.safe);
                for (index, entry) in entries.into_iter().enumerate() {
                    tracing::debug!(index, url = %entry.url, duration = entry.duration, "resolved segment");
                    builder.add_file(&entry.url)?.duration = Some(entry.duration);
                }
                return builder.build();
            }
        }

        let script = self
            .script
            .as_deref()
            .ok_or_else(|| Error::invalid_data("no concat script and no resolved segment list"))?;
        parse_script(&self.base, script, self.options.safe)
    }
}
