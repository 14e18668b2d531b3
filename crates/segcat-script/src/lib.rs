//! segcat-script: the ffconcat directive script.
//!
//! Turns a line-oriented script such as
//!
//! ```text
//! ffconcat version 1.0
//! # intro
//! file intro.mp4
//! duration 00:00:12.5
//! file 'part two.mp4'
//! ```
//!
//! into a [`SegmentTable`](segcat_core::SegmentTable).
//!
//! # Quick start
//!
//! ```
//! use segcat_core::SafeMode;
//! use segcat_script::parse_script;
//!
//! let table = parse_script(
//!     "/media/show/list.ffconcat",
//!     "ffconcat version 1.0\nfile a.mp4\nduration 10\nfile b.mp4\nduration 5\n",
//!     SafeMode::Auto,
//! )
//! .unwrap();
//! assert!(table.is_seekable());
//! assert_eq!(table.get(1).unwrap().url, "/media/show/b.mp4");
//! assert_eq!(table.get(1).unwrap().start_time, Some(10_000_000));
//! ```

pub mod builder;
pub mod duration;
pub mod lexer;
pub mod locator;
pub mod probe;
pub mod safety;
pub mod token;

pub use builder::{parse_script, SegmentListBuilder};
pub use duration::{parse_duration, DurationError};
pub use lexer::{directives, next_field, Directive};
pub use locator::make_absolute;
pub use probe::{probe, PROBE_SCORE_MAX, SIGNATURE};
pub use safety::is_safe_filename;
