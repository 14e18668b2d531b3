//! # segcat-demux
//!
//! Presents an ordered list of independently readable media segments as one
//! continuous source with a single timeline.
//!
//! The demuxer never parses media itself. Segments are opened through a
//! [`ReaderFactory`], read and sought through [`SegmentReader`], and closed
//! by dropping the reader. Only one segment is open at a time, except for
//! the short window during a seek where the previous segment is held back
//! until the new one has been positioned.
//!
//! ## Quick start
//!
//! With the `testing` feature, the in-memory factory stands in for a real
//! media reader:
//!
//! ```
//! # #[cfg(feature = "testing")]
//! # {
//! use std::sync::Arc;
//!
//! use segcat_core::Rational;
//! use segcat_demux::testing::{MemoryFactory, MemorySegment};
//! use segcat_demux::{ConcatDemuxer, SeekRequest};
//!
//! let ms = Rational::new(1, 1_000);
//! let factory = MemoryFactory::new();
//! factory.insert("/show/a.ts", MemorySegment::uniform(ms, 0, 4, 500));
//! factory.insert("/show/b.ts", MemorySegment::uniform(ms, 0, 4, 500));
//!
//! let mut demuxer = ConcatDemuxer::builder(Arc::new(factory))
//!     .script(
//!         "/show/list.ffconcat",
//!         "ffconcat version 1.0\nfile a.ts\nduration 2\nfile b.ts\nduration 2\n",
//!     )
//!     .build()
//!     .unwrap();
//!
//! demuxer.seek(SeekRequest::to(3_000_000)).unwrap();
//! let packet = demuxer.read_packet().unwrap();
//! assert_eq!(packet.pts, Some(3_000));
//! # }
//! ```

pub mod demuxer;
pub mod lifecycle;
pub mod pump;
pub mod reader;
pub mod resolver;
pub mod seek;
pub mod streams;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use demuxer::{ConcatDemuxer, ConcatDemuxerBuilder};
pub use lifecycle::{ActiveSegment, SegmentManager};
pub use pump::{PumpState, TerminalCause, MAX_OPEN_RETRIES};
pub use reader::{
    CodecParameters, InterruptHandle, MediaType, OpenOptions, Packet, ReadOutcome, ReaderFactory,
    SeekFlags, SegmentReader, StreamInfo,
};
pub use resolver::{ResolvedSegment, SegmentResolver};
pub use seek::SeekRequest;
pub use streams::VirtualStreamTable;
