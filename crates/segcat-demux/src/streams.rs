//! Virtual stream table.
//!
//! Built once from the first opened segment. Virtual stream `i` maps to
//! stream `i` of whichever segment is active; later segments are assumed
//! to carry the same layout.

use segcat_core::Rational;

use crate::reader::{SegmentReader, StreamInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualStreamTable {
    streams: Vec<StreamInfo>,
}

impl VirtualStreamTable {
    /// Snapshot the stream list of `reader`.
    pub fn from_reader(reader: &dyn SegmentReader) -> Self {
        Self {
            streams: reader.streams().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StreamInfo> {
        self.streams.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamInfo> {
        self.streams.iter()
    }

    /// Time base of virtual stream `index`.
    pub fn time_base(&self, index: usize) -> Option<Rational> {
        self.streams.get(index).map(|s| s.time_base)
    }
}
