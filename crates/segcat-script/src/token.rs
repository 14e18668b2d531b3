//! Quoted-token reader for directive arguments.
//!
//! A token runs until the first unescaped whitespace character. Inside it,
//! a backslash escapes the next character and single quotes delimit a
//! literal run, so `'my file.mp4'` and `my\ file.mp4` both read as
//! `my file.mp4`.

use crate::lexer::SPACE_CHARS;

/// Read one token from the start of `input`.
///
/// Returns the unescaped token and the unconsumed remainder (starting at
/// the terminating whitespace, if any).
pub fn get_token(input: &str) -> (String, &str) {
    let input = input.trim_start_matches(SPACE_CHARS);
    let mut out = String::new();
    // Length of `out` that must survive trailing-whitespace trimming.
    let mut keep = 0;
    let mut chars = input.char_indices();
    let mut consumed = input.len();

    while let Some((pos, c)) = chars.next() {
        if SPACE_CHARS.contains(&c) {
            consumed = pos;
            break;
        }
        match c {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                    keep = out.len();
                }
            }
            '\'' => {
                let mut closed = false;
                for (_, quoted) in chars.by_ref() {
                    if quoted == '\'' {
                        closed = true;
                        break;
                    }
                    out.push(quoted);
                }
                if closed {
                    keep = out.len();
                }
            }
            other => out.push(other),
        }
    }

    let trimmed = out[keep..].trim_end_matches(SPACE_CHARS).len();
    out.truncate(keep + trimmed);
    (out, &input[consumed..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_token() {
        assert_eq!(get_token("  a.mp4 trailing"), ("a.mp4".to_string(), " trailing"));
        assert_eq!(get_token("a.mp4"), ("a.mp4".to_string(), ""));
    }

    #[test]
    fn quoted_token_keeps_spaces() {
        assert_eq!(get_token("'my file.mp4'"), ("my file.mp4".to_string(), ""));
        assert_eq!(get_token("dir/'a b'.mp4 x"), ("dir/a b.mp4".to_string(), " x"));
    }

    #[test]
    fn escaped_characters() {
        assert_eq!(get_token(r"my\ file.mp4"), ("my file.mp4".to_string(), ""));
        assert_eq!(get_token(r"it\'s.mp4"), ("it's.mp4".to_string(), ""));
    }

    #[test]
    fn quoted_trailing_space_is_preserved() {
        assert_eq!(get_token("'a '"), ("a ".to_string(), ""));
    }

    #[test]
    fn unterminated_quote_reads_to_end() {
        assert_eq!(get_token("'open ended"), ("open ended".to_string(), ""));
    }

    #[test]
    fn empty_input() {
        assert_eq!(get_token("   "), (String::new(), ""));
    }
}
