//! Line lexer for directive scripts.
//!
//! [`directives`] walks an immutable script buffer and yields one
//! [`Directive`] per meaningful line: the first whitespace-delimited field
//! as the keyword and everything after it (leading whitespace skipped) as
//! the remainder. Blank lines and `#` comments never reach the caller.

use std::str::Lines;

/// Field separators, matching the script format's notion of whitespace.
pub const SPACE_CHARS: &[char] = &[' ', '\t', '\r', '\n'];

/// Split off the first field of `input`.
///
/// Returns `(field, remainder)`, with whitespace skipped on both sides of
/// the field. The field is empty when `input` holds only whitespace.
pub fn next_field(input: &str) -> (&str, &str) {
    let input = input.trim_start_matches(SPACE_CHARS);
    let end = input.find(SPACE_CHARS).unwrap_or(input.len());
    let (field, rest) = input.split_at(end);
    (field, rest.trim_start_matches(SPACE_CHARS))
}

/// One non-empty, non-comment script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// 1-based line number.
    pub line: usize,
    pub keyword: &'a str,
    /// Text after the keyword, leading whitespace removed.
    pub rest: &'a str,
}

/// Iterator over the directives of a script. See [`directives`].
#[derive(Debug, Clone)]
pub struct Directives<'a> {
    lines: Lines<'a>,
    line: usize,
}

impl<'a> Iterator for Directives<'a> {
    type Item = Directive<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.lines.next()?;
            self.line += 1;
            let (keyword, rest) = next_field(raw);
            if keyword.is_empty() || keyword.starts_with('#') {
                continue;
            }
            return Some(Directive {
                line: self.line,
                keyword,
                rest,
            });
        }
    }
}

/// Lazily lex `script` into directives.
pub fn directives(script: &str) -> Directives<'_> {
    Directives {
        lines: script.strip_prefix('\u{feff}').unwrap_or(script).lines(),
        line: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_field_splits_on_whitespace_runs() {
        assert_eq!(next_field("  file \t a.mp4  "), ("file", "a.mp4  "));
        assert_eq!(next_field("duration"), ("duration", ""));
        assert_eq!(next_field("   "), ("", ""));
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let script = "ffconcat version 1.0\n\n# comment\n   #indented\nfile a.mp4\r\n";
        let got: Vec<_> = directives(script).collect();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].keyword, "ffconcat");
        assert_eq!(got[0].rest, "version 1.0");
        assert_eq!(got[0].line, 1);
        assert_eq!(got[1].keyword, "file");
        assert_eq!(got[1].rest, "a.mp4");
        assert_eq!(got[1].line, 5);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let got: Vec<_> = directives("\u{feff}file a.mp4").collect();
        assert_eq!(got[0].keyword, "file");
    }

    #[test]
    fn restartable_over_same_buffer() {
        let script = "file a\nfile b\n";
        let first: Vec<_> = directives(script).map(|d| d.rest).collect();
        let second: Vec<_> = directives(script).map(|d| d.rest).collect();
        assert_eq!(first, second);
    }
}
