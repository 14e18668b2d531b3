//! segcat-core: shared errors, time arithmetic, options, and the segment table.
//!
//! This crate is the foundational dependency for the other segcat crates.
//! It holds everything that is pure data: the unified error type, rational
//! time bases with explicit rounding, the concat options, and the
//! [`SegmentTable`] with its start-time backfill and locate logic.

pub mod error;
pub mod options;
pub mod segment;
pub mod time;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, ErrorKind, Result};
pub use options::{ConcatOptions, SafeMode};
pub use segment::{SegmentDescriptor, SegmentTable};
pub use time::{Rational, Rounding, TIME_BASE, TIME_BASE_Q};
