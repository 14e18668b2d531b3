//! Seeking through the public API.

use std::sync::Arc;

use segcat::{ConcatDemuxer, ErrorKind, SeekRequest};
use segcat_core::Rational;
use segcat_demux::testing::{MemoryFactory, MemorySegment};
use segcat_demux::SeekFlags;

const MS: Rational = Rational::new(1, 1_000);

/// Ten 3-second segments, one keyframe per second.
fn ten_segments(factory: &MemoryFactory) -> ConcatDemuxer {
    let mut script = String::from("ffconcat version 1.0\n");
    for i in 0..10 {
        factory.insert(format!("/vod/seg{i}.ts"), MemorySegment::uniform(MS, 0, 3, 1_000));
        script.push_str(&format!("file seg{i}.ts\nduration 3\n"));
    }
    ConcatDemuxer::builder(Arc::new(factory.clone()))
        .script("/vod/index.ffconcat", script)
        .build()
        .unwrap()
}

#[test]
fn every_boundary_lands_in_its_segment() {
    let factory = MemoryFactory::new();
    let mut demuxer = ten_segments(&factory);
    assert_eq!(demuxer.duration(), Some(30_000_000));

    for k in 0..10 {
        let start = demuxer.table().get(k).unwrap().start_time.unwrap();
        demuxer.seek(SeekRequest::to(start)).unwrap();
        assert_eq!(demuxer.current_index(), Some(k));
        assert_eq!(demuxer.read_packet().unwrap().pts, Some(start / 1_000));
        assert_eq!(factory.live_readers(), 1);
    }
}

#[test]
fn backward_seek_inside_segment() {
    let factory = MemoryFactory::new();
    let mut demuxer = ten_segments(&factory);

    demuxer
        .seek(SeekRequest::to(7_600_000).with_flags(SeekFlags::backward()))
        .unwrap();
    assert_eq!(demuxer.current_index(), Some(2));
    assert_eq!(demuxer.read_packet().unwrap().pts, Some(7_000));
}

#[test]
fn window_in_stream_time_base() {
    let factory = MemoryFactory::new();
    let mut demuxer = ten_segments(&factory);

    demuxer
        .seek(SeekRequest::window(20_000, 20_500, 21_500).with_stream(0))
        .unwrap();
    assert_eq!(demuxer.read_packet().unwrap().pts, Some(21_000));

    // Nothing in [20.1s, 20.9s]: rolled back to where we were.
    let err = demuxer
        .seek(SeekRequest::window(20_100, 20_500, 20_900).with_stream(0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Reader);
    assert_eq!(demuxer.read_packet().unwrap().pts, Some(22_000));
    assert_eq!(factory.live_readers(), 1);
}

#[test]
fn playback_continues_after_seek() {
    let factory = MemoryFactory::new();
    let mut demuxer = ten_segments(&factory);

    demuxer.seek(SeekRequest::to(26_000_000)).unwrap();
    let mut pts = Vec::new();
    while let Ok(packet) = demuxer.read_packet() {
        pts.push(packet.pts.unwrap());
    }
    assert_eq!(pts, vec![26_000, 27_000, 28_000, 29_000]);
    assert!(demuxer.is_exhausted());

    demuxer.seek(SeekRequest::to(0)).unwrap();
    assert_eq!(demuxer.read_packet().unwrap().pts, Some(0));
}

#[test]
fn failed_seek_leaks_no_reader() {
    let factory = MemoryFactory::new();
    let mut demuxer = ten_segments(&factory);
    factory.fail_always("/vod/seg5.ts");
    demuxer.read_packet().unwrap();

    assert!(demuxer.seek(SeekRequest::to(16_000_000)).is_err());
    assert_eq!(factory.live_readers(), 1);
    assert_eq!(demuxer.current_index(), Some(0));
    assert_eq!(demuxer.read_packet().unwrap().pts, Some(1_000));
}
