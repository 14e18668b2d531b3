//! Resolution of `file` tokens against the script's own locator.

use url::Url;

/// Resolve `target` relative to `base`, the locator of the script itself.
///
/// - `target` carrying a scheme (`http:`, `file:`, ...) is returned as-is.
/// - A URL `base` is joined with RFC 3986 reference resolution.
/// - Otherwise `base` is a filesystem path: absolute targets are kept and
///   relative ones are placed in the script's directory.
///
/// Single-letter schemes are treated as Windows drive letters, not URLs.
///
/// # Examples
///
/// ```
/// use segcat_script::make_absolute;
///
/// assert_eq!(make_absolute("/media/list.txt", "a.mp4"), "/media/a.mp4");
/// assert_eq!(
///     make_absolute("https://cdn.example/show/list.txt", "ep1/a.ts"),
///     "https://cdn.example/show/ep1/a.ts"
/// );
/// ```
pub fn make_absolute(base: &str, target: &str) -> String {
    if has_scheme(target) {
        return target.to_string();
    }

    if has_scheme(base) {
        if let Ok(joined) = Url::parse(base).and_then(|b| b.join(target)) {
            return joined.into();
        }
    }

    if target.starts_with('/') {
        return target.to_string();
    }
    match base.rfind('/') {
        Some(slash) => format!("{}{}", &base[..=slash], target),
        None => target.to_string(),
    }
}

/// Whether `s` starts with `scheme:` where the scheme is at least two
/// characters of `[A-Za-z][A-Za-z0-9+.-]*`.
fn has_scheme(s: &str) -> bool {
    let Some(colon) = s.find(':') else {
        return false;
    };
    let scheme = &s[..colon];
    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}
