//! Segment list builder.
//!
//! [`SegmentListBuilder`] accumulates segment descriptors either from
//! script directives or from entries pushed by an external resolver, then
//! hands them to [`SegmentTable::new`] which runs the start-time backfill.
//! Any error drops the builder and everything it collected.

use segcat_core::{Error, Result, SafeMode, SegmentDescriptor, SegmentTable};

use crate::duration::parse_duration;
use crate::lexer::{directives, next_field, Directive};
use crate::locator::make_absolute;
use crate::safety::is_safe_filename;
use crate::token::get_token;

/// Collects segment descriptors for one concat source.
#[derive(Debug, Clone)]
pub struct SegmentListBuilder {
    base: String,
    safe: SafeMode,
    segments: Vec<SegmentDescriptor>,
}

impl SegmentListBuilder {
    /// Create a builder resolving relative paths against `base`, the
    /// locator of the script (or playlist) itself.
    pub fn new(base: impl Into<String>, safe: SafeMode) -> Self {
        Self {
            base: base.into(),
            safe,
            segments: Vec::new(),
        }
    }

    /// Current safe mode; `Auto` flips to `Enabled` on an `ffconcat` header.
    pub fn safe_mode(&self) -> SafeMode {
        self.safe
    }

    pub fn segments(&self) -> &[SegmentDescriptor] {
        &self.segments
    }

    /// Append a segment for `name`, resolved against the base locator.
    ///
    /// Fails with [`Error::Permission`] when safe mode is enforced and
    /// `name` is not on the whitelist.
    pub fn add_file(&mut self, name: &str) -> Result<&mut SegmentDescriptor> {
        if self.safe.is_enforced() && !is_safe_filename(name) {
            tracing::error!(file = name, "unsafe file name");
            return Err(Error::Permission(name.to_string()));
        }

        let url = make_absolute(&self.base, name);
        self.segments
            .try_reserve(1)
            .map_err(|e| Error::Allocation(e.to_string()))?;
        self.segments.push(SegmentDescriptor::new(url));
        let index = self.segments.len() - 1;
        Ok(&mut self.segments[index])
    }

    /// Parse a whole script, appending its segments.
    pub fn parse_script(&mut self, script: &str) -> Result<()> {
        for directive in directives(script) {
            self.apply(directive)?;
        }
        Ok(())
    }

    fn apply(&mut self, directive: Directive<'_>) -> Result<()> {
        let Directive {
            line,
            keyword,
            rest,
        } = directive;

        match keyword {
            "file" => {
                let (name, _) = get_token(rest);
                if name.is_empty() {
                    return Err(Error::format(line, "filename required"));
                }
                self.add_file(&name)?;
            }
            "duration" => {
                let (value, _) = next_field(rest);
                let Some(segment) = self.segments.last_mut() else {
                    return Err(Error::format(line, "duration without file"));
                };
                let duration = parse_duration(value).map_err(|e| Error::format(line, e.to_string()))?;
                if duration < 0 {
                    return Err(Error::format(line, format!("negative duration '{value}'")));
                }
                segment.duration = Some(duration);
            }
            "ffconcat" => {
                let (version_kw, rest) = next_field(rest);
                let (version, _) = next_field(rest);
                if version_kw != "version" || version != "1.0" {
                    return Err(Error::format(line, "invalid version"));
                }
                if self.safe == SafeMode::Auto {
                    self.safe = SafeMode::Enabled;
                }
            }
            other => {
                return Err(Error::format(line, format!("unknown keyword '{other}'")));
            }
        }
        Ok(())
    }

    /// Finish into a [`SegmentTable`]; fails with [`Error::InvalidData`]
    /// when no segment was added.
    pub fn build(self) -> Result<SegmentTable> {
        SegmentTable::new(self.segments)
    }
}

/// Parse `script` located at `base` into a segment table.
pub fn parse_script(base: &str, script: &str, safe: SafeMode) -> Result<SegmentTable> {
    let mut builder = SegmentListBuilder::new(base, safe);
    builder.parse_script(script)?;
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use segcat_core::ErrorKind;

    #[test]
    fn mixed_durations_backfill_known_prefix() {
        let table = parse_script(
            "/v/list.txt",
            "file a.mp4\nduration 10\nfile b.mp4\nduration 5\nfile c.mp4\n",
            SafeMode::Auto,
        )
        .unwrap();

        assert!(!table.is_seekable());
        let starts: Vec<_> = table.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![Some(0), Some(10_000_000), Some(15_000_000)]);
        assert_eq!(table.get(2).unwrap().duration, None);
        assert_eq!(table.get(0).unwrap().url, "/v/a.mp4");
    }

    #[test]
    fn header_enables_safe_mode_when_auto() {
        let mut builder = SegmentListBuilder::new("list.txt", SafeMode::Auto);
        builder.parse_script("ffconcat version 1.0\n").unwrap();
        assert_eq!(builder.safe_mode(), SafeMode::Enabled);

        let mut builder = SegmentListBuilder::new("list.txt", SafeMode::Disabled);
        builder.parse_script("ffconcat version 1.0\n").unwrap();
        assert_eq!(builder.safe_mode(), SafeMode::Disabled);
    }

    #[test]
    fn unsafe_path_rejected_only_when_enforced() {
        let err = parse_script("l.txt", "file ../../etc/passwd\n", SafeMode::Enabled).unwrap_err();
        assert_matches!(err, Error::Permission(ref name) if name == "../../etc/passwd");

        let table = parse_script("l.txt", "file ../../etc/passwd\n", SafeMode::Disabled).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().url, "../../etc/passwd");
    }

    #[test]
    fn header_then_unsafe_path_fails_in_auto_mode() {
        let err = parse_script(
            "l.txt",
            "ffconcat version 1.0\nfile /etc/passwd\n",
            SafeMode::Auto,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);
    }

    #[test]
    fn duration_without_file() {
        let err = parse_script("l.txt", "# lead\nduration 3\n", SafeMode::Auto).unwrap_err();
        assert_matches!(err, Error::Format { line: 2, .. });
    }

    #[test]
    fn bad_duration_names_line() {
        let err = parse_script("l.txt", "file a.mp4\nduration soon\n", SafeMode::Auto).unwrap_err();
        assert_matches!(err, Error::Format { line: 2, ref message } if message.contains("soon"));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = parse_script(
            "l.txt",
            "file a.ts\nduration -5\nfile b.ts\nduration 5\n",
            SafeMode::Auto,
        )
        .unwrap_err();
        assert_matches!(err, Error::Format { line: 2, ref message } if message.contains("-5"));
    }

    #[test]
    fn unknown_keyword_names_line() {
        let err = parse_script("l.txt", "file a.mp4\n\ninpoint 3\n", SafeMode::Auto).unwrap_err();
        assert_eq!(err.to_string(), "Line 3: unknown keyword 'inpoint'");
    }

    #[test]
    fn wrong_version_is_format_error() {
        for header in ["ffconcat version 2.0", "ffconcat", "ffconcat revision 1.0"] {
            let err = parse_script("l.txt", header, SafeMode::Auto).unwrap_err();
            assert_matches!(err, Error::Format { line: 1, .. });
        }
    }

    #[test]
    fn missing_filename() {
        let err = parse_script("l.txt", "file\n", SafeMode::Auto).unwrap_err();
        assert_matches!(err, Error::Format { line: 1, .. });
    }

    #[test]
    fn empty_script_is_invalid_data() {
        let err = parse_script("l.txt", "# nothing\n\n", SafeMode::Auto).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn quoted_names_resolve() {
        let table = parse_script("/v/l.txt", "file 'part two.mp4'\n", SafeMode::Disabled).unwrap();
        assert_eq!(table.get(0).unwrap().url, "/v/part two.mp4");
    }

    #[test]
    fn all_explicit_durations_seekable() {
        let table = parse_script(
            "l.txt",
            "ffconcat version 1.0\nfile a.ts\nduration 2.5\nfile b.ts\nduration 00:01\n",
            SafeMode::Auto,
        )
        .unwrap();
        assert!(table.is_seekable());
        assert_eq!(table.total_duration(), Some(3_500_000));
    }

    #[test]
    fn duration_applies_to_latest_file() {
        let table = parse_script(
            "l.txt",
            "file a.ts\nfile b.ts\nduration 4\n",
            SafeMode::Auto,
        )
        .unwrap();
        assert_eq!(table.get(0).unwrap().duration, None);
        assert_eq!(table.get(1).unwrap().duration, Some(4_000_000));
    }
}
