//! Format detection for concat scripts.

/// The header every concat script must start with to be auto-detected.
pub const SIGNATURE: &[u8] = b"ffconcat version 1.0";

/// Score returned for a certain match.
pub const PROBE_SCORE_MAX: u8 = 100;

/// Score how likely `buf` is the start of a concat script.
///
/// Returns [`PROBE_SCORE_MAX`] when the first 20 bytes equal [`SIGNATURE`]
/// and 0 otherwise. Scripts without the header can still be opened
/// explicitly; they are just never detected.
pub fn probe(buf: &[u8]) -> u8 {
    if buf.starts_with(SIGNATURE) {
        PROBE_SCORE_MAX
    } else {
        0
    }
}
