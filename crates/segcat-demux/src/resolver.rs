//! Optional host-supplied segment resolution.

/// One entry of a resolver-supplied segment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSegment {
    pub url: String,
    /// Duration in microseconds.
    pub duration: i64,
}

impl ResolvedSegment {
    pub fn new(url: impl Into<String>, duration: i64) -> Self {
        Self {
            url: url.into(),
            duration,
        }
    }
}

/// Supplies segment lists and per-open URL overrides.
///
/// Both methods default to "nothing to say", so an implementation only
/// overrides what it handles. A non-empty [`resolve_list`] replaces the
/// script entirely.
///
/// [`resolve_list`]: SegmentResolver::resolve_list
pub trait SegmentResolver: Send + Sync {
    /// Full segment list with explicit durations.
    fn resolve_list(&self) -> Vec<ResolvedSegment> {
        Vec::new()
    }

    /// Locator to open for segment `index` instead of the table's URL.
    ///
    /// Consulted on every open; the result is never stored in the table.
    fn resolve_url(&self, _index: usize) -> Option<String> {
        None
    }
}
