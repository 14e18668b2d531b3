//! Segcat - virtual concatenation of media segments
//!
//! This library crate exposes the command-line pieces for integration
//! testing. The concat source itself lives in `segcat-demux`.

pub mod config;
pub mod inspect;

pub use segcat_core::{ConcatOptions, Error, ErrorKind, SafeMode, SegmentTable};
pub use segcat_demux::{ConcatDemuxer, ConcatDemuxerBuilder, SeekRequest};
