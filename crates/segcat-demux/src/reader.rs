//! The per-segment reader seam.
//!
//! A [`ReaderFactory`] opens one segment locator into a [`SegmentReader`].
//! The demuxer never looks inside a segment; it only reads packets, asks for
//! stream and timing information, and seeks. Dropping a reader closes it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use segcat_core::{Rational, Result};

/// Kind of elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    Video,
    Audio,
    Subtitle,
    Data,
    #[default]
    Unknown,
}

/// Codec description copied from the first segment into the virtual streams.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodecParameters {
    pub codec_name: String,
    pub media_type: MediaType,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    /// Out-of-band codec configuration (e.g. `avcC`, `AudioSpecificConfig`).
    pub extradata: Bytes,
}

/// One stream as reported by a segment reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub index: usize,
    pub codec: CodecParameters,
    /// Unit of this stream's packet timestamps.
    pub time_base: Rational,
    pub r_frame_rate: Rational,
    pub avg_frame_rate: Rational,
    pub sample_aspect_ratio: Rational,
}

impl StreamInfo {
    /// A stream with the given time base and otherwise undefined properties.
    pub fn new(index: usize, time_base: Rational) -> Self {
        Self {
            index,
            codec: CodecParameters::default(),
            time_base,
            r_frame_rate: Rational::UNDEFINED,
            avg_frame_rate: Rational::UNDEFINED,
            sample_aspect_ratio: Rational::UNDEFINED,
        }
    }
}

/// A compressed packet; timestamps are in its stream's time base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub stream_index: usize,
    pub pts: Option<i64>,
    pub dts: Option<i64>,
    pub duration: Option<i64>,
    pub keyframe: bool,
    pub data: Bytes,
}

/// Result of one read from a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Packet(Packet),
    /// The segment has no more packets.
    EndOfSegment,
}

/// Seek behavior switches.
///
/// Only `backward` and `any` are meaningful to the demuxer; `byte` and
/// `frame` seeks are rejected before any reader is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeekFlags {
    /// Prefer the position at or before the target.
    pub backward: bool,
    /// Target is a byte offset.
    pub byte: bool,
    /// Allow landing on non-keyframes.
    pub any: bool,
    /// Target is a frame number.
    pub frame: bool,
}

impl SeekFlags {
    pub fn backward() -> Self {
        Self {
            backward: true,
            ..Self::default()
        }
    }
}

/// Cooperative cancellation flag shared with every opened segment.
///
/// Cloning shares the flag; readers are expected to poll it during blocking
/// I/O and abort when it is set.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options passed unchanged to every [`ReaderFactory::open`] call.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Network I/O timeout.
    pub timeout: Option<Duration>,
    pub interrupt: Option<InterruptHandle>,
}

/// An opened segment.
///
/// Times reported by [`start_time`](SegmentReader::start_time) and
/// [`duration`](SegmentReader::duration) are microseconds; packet
/// timestamps and seek targets are in the stream's own time base, or
/// microseconds when no stream is given.
pub trait SegmentReader: Send {
    /// Streams in this segment, indexed by position.
    fn streams(&self) -> &[StreamInfo];

    /// Timestamp of the first packet, if known.
    fn start_time(&self) -> Option<i64>;

    /// Total playable duration, if known.
    fn duration(&self) -> Option<i64>;

    /// Read the next packet in file order.
    fn read_packet(&mut self) -> Result<ReadOutcome>;

    /// Seek so the next packet read lands in `[min_ts, max_ts]`, as close
    /// to `ts` as possible.
    fn seek(
        &mut self,
        stream: Option<usize>,
        min_ts: i64,
        ts: i64,
        max_ts: i64,
        flags: SeekFlags,
    ) -> Result<()>;
}

/// Opens segment locators into readers.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
pub trait ReaderFactory: Send + Sync {
    /// Open `url` and analyze its streams.
    fn open(&self, url: &str, options: &OpenOptions) -> Result<Box<dyn SegmentReader>>;
}
