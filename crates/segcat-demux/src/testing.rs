//! In-memory segment readers for tests.
//!
//! [`MemoryFactory`] serves [`MemorySegment`]s by locator and keeps open and
//! close accounting, so tests can check that at most one reader stays live
//! and that nothing leaks after a failed seek. Opens can be made to fail on
//! demand.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use segcat_core::{Error, Rational, Result, TIME_BASE_Q};

use crate::reader::{
    CodecParameters, MediaType, OpenOptions, Packet, ReadOutcome, ReaderFactory, SeekFlags,
    SegmentReader, StreamInfo,
};

/// Contents of one in-memory segment.
#[derive(Debug, Clone)]
pub struct MemorySegment {
    pub streams: Vec<StreamInfo>,
    /// Start time in microseconds.
    pub start_time: Option<i64>,
    /// Duration in microseconds.
    pub duration: Option<i64>,
    pub packets: Vec<Packet>,
    /// Fail every seek, as a reader that cannot seek to its very edge would.
    pub reject_seeks: bool,
}

impl MemorySegment {
    /// One video stream with `count` back-to-back keyframes of
    /// `packet_duration` ticks, starting at `start_time` microseconds.
    pub fn uniform(time_base: Rational, start_time: i64, count: usize, packet_duration: i64) -> Self {
        let mut stream = StreamInfo::new(0, time_base);
        stream.codec = CodecParameters {
            codec_name: "h264".into(),
            media_type: MediaType::Video,
            width: Some(1280),
            height: Some(720),
            ..CodecParameters::default()
        };
        stream.r_frame_rate = Rational::new(25, 1);
        stream.avg_frame_rate = Rational::new(25, 1);
        stream.sample_aspect_ratio = Rational::new(1, 1);

        let first = TIME_BASE_Q.rescale(start_time, time_base);
        let packets = (0..count)
            .map(|i| {
                let pts = first + i as i64 * packet_duration;
                Packet {
                    stream_index: 0,
                    pts: Some(pts),
                    dts: Some(pts),
                    duration: Some(packet_duration),
                    keyframe: true,
                    data: Bytes::from(vec![i as u8]),
                }
            })
            .collect();

        Self {
            streams: vec![stream],
            start_time: Some(start_time),
            duration: Some(time_base.rescale(count as i64 * packet_duration, TIME_BASE_Q)),
            packets,
            reject_seeks: false,
        }
    }

    /// Drop the reported duration.
    pub fn without_duration(mut self) -> Self {
        self.duration = None;
        self
    }

    pub fn rejecting_seeks(mut self) -> Self {
        self.reject_seeks = true;
        self
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    segments: HashMap<String, MemorySegment>,
    /// Remaining injected failures per locator; `None` fails forever.
    failures: HashMap<String, Option<usize>>,
    opens: Vec<String>,
    last_options: Option<OpenOptions>,
    live: usize,
    max_live: usize,
}

/// Reader factory over a shared map of [`MemorySegment`]s.
///
/// Clones share state, so a test keeps one clone for inspection and hands
/// another to the demuxer.
#[derive(Debug, Clone, Default)]
pub struct MemoryFactory {
    state: Arc<Mutex<FactoryState>>,
}

impl MemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, segment: MemorySegment) {
        self.state.lock().segments.insert(url.into(), segment);
    }

    /// Fail the next `times` opens of `url`.
    pub fn fail_opens(&self, url: impl Into<String>, times: usize) {
        self.state.lock().failures.insert(url.into(), Some(times));
    }

    /// Fail every open of `url`.
    pub fn fail_always(&self, url: impl Into<String>) {
        self.state.lock().failures.insert(url.into(), None);
    }

    /// Every locator passed to `open`, including failed attempts.
    pub fn open_log(&self) -> Vec<String> {
        self.state.lock().opens.clone()
    }

    pub fn open_count(&self, url: &str) -> usize {
        self.state.lock().opens.iter().filter(|u| *u == url).count()
    }

    /// Readers opened and not yet dropped.
    pub fn live_readers(&self) -> usize {
        self.state.lock().live
    }

    /// High-water mark of [`live_readers`](Self::live_readers).
    pub fn max_live_readers(&self) -> usize {
        self.state.lock().max_live
    }

    pub fn last_open_options(&self) -> Option<OpenOptions> {
        self.state.lock().last_options.clone()
    }
}

impl ReaderFactory for MemoryFactory {
    fn open(&self, url: &str, options: &OpenOptions) -> Result<Box<dyn SegmentReader>> {
        let mut state = self.state.lock();
        state.opens.push(url.to_string());
        state.last_options = Some(options.clone());

        if let Some(remaining) = state.failures.get_mut(url) {
            match remaining {
                None => return Err(Error::open(url, "injected failure")),
                Some(0) => {}
                Some(n) => {
                    *n -= 1;
                    return Err(Error::open(url, "injected failure"));
                }
            }
        }

        let segment = state
            .segments
            .get(url)
            .cloned()
            .ok_or_else(|| Error::open(url, "no such segment"))?;
        state.live += 1;
        state.max_live = state.max_live.max(state.live);

        Ok(Box::new(MemoryReader {
            segment,
            position: 0,
            factory: Arc::clone(&self.state),
        }))
    }
}

struct MemoryReader {
    segment: MemorySegment,
    position: usize,
    factory: Arc<Mutex<FactoryState>>,
}

impl MemoryReader {
    /// Packet timestamp expressed in the seek request's unit.
    fn seek_time(&self, packet: &Packet, stream: Option<usize>) -> Option<i64> {
        let pts = packet.pts?;
        match stream {
            Some(s) if s == packet.stream_index => Some(pts),
            Some(_) => None,
            None => {
                let time_base = self.segment.streams.get(packet.stream_index)?.time_base;
                Some(time_base.rescale(pts, TIME_BASE_Q))
            }
        }
    }
}

impl SegmentReader for MemoryReader {
    fn streams(&self) -> &[StreamInfo] {
        &self.segment.streams
    }

    fn start_time(&self) -> Option<i64> {
        self.segment.start_time
    }

    fn duration(&self) -> Option<i64> {
        self.segment.duration
    }

    fn read_packet(&mut self) -> Result<ReadOutcome> {
        match self.segment.packets.get(self.position) {
            Some(packet) => {
                self.position += 1;
                Ok(ReadOutcome::Packet(packet.clone()))
            }
            None => Ok(ReadOutcome::EndOfSegment),
        }
    }

    fn seek(
        &mut self,
        stream: Option<usize>,
        min_ts: i64,
        ts: i64,
        max_ts: i64,
        flags: SeekFlags,
    ) -> Result<()> {
        if self.segment.reject_seeks {
            return Err(Error::reader("seek rejected"));
        }

        let mut candidates = self.segment.packets.iter().enumerate().filter_map(|(i, p)| {
            let t = self.seek_time(p, stream)?;
            ((p.keyframe || flags.any) && (min_ts..=max_ts).contains(&t)).then_some((i, t))
        });
        let target = if flags.backward {
            candidates.filter(|(_, t)| *t <= ts).last()
        } else {
            candidates.find(|(_, t)| *t >= ts)
        };

        let (position, _) =
            target.ok_or_else(|| Error::reader(format!("no packet near {ts} in [{min_ts}, {max_ts}]")))?;
        self.position = position;
        Ok(())
    }
}

impl Drop for MemoryReader {
    fn drop(&mut self) {
        self.factory.lock().live -= 1;
    }
}
