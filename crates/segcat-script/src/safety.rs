//! Safe-filename whitelist for `file` directives.
//!
//! Under safe mode a segment path must be relative and made only of
//! path components whose characters are ASCII alphanumerics, `_`, `-` and
//! `.`, with no component starting with `.`. This rules out `..`, hidden
//! files, absolute paths, and anything carrying a URL scheme.

/// Check `name` against the safe-filename whitelist.
///
/// # Examples
///
/// ```
/// use segcat_script::is_safe_filename;
///
/// assert!(is_safe_filename("season1/episode-01.mkv"));
/// assert!(!is_safe_filename("../../etc/passwd"));
/// assert!(!is_safe_filename("/etc/passwd"));
/// ```
pub fn is_safe_filename(name: &str) -> bool {
    let mut component_start = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            component_start = false;
            continue;
        }
        if component_start {
            return false;
        }
        match c {
            '/' => component_start = true,
            '.' => {}
            _ => return false,
        }
    }
    true
}
