//! Duration strings for the `duration` directive.
//!
//! Accepted forms, all optionally prefixed with `-`:
//!
//! - `[HH:]MM:SS[.frac]`, where minutes and seconds are at most two digits
//!   and at most 59;
//! - `S+[.frac]`, optionally followed by a unit suffix `s`, `ms` or `us`.
//!
//! Fractional digits past the sixth (microseconds) are accepted and dropped.
//! The result is in microseconds.

use winnow::ascii::digit1;
use winnow::combinator::{alt, eof, opt, preceded};
use winnow::prelude::*;
use winnow::token::take_while;
use winnow::ModalResult;

/// Errors from [`parse_duration`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    /// The string is not a recognized duration.
    #[error("invalid duration '{0}'")]
    Syntax(String),

    /// The duration does not fit in 64-bit microseconds.
    #[error("duration '{0}' is out of range")]
    Overflow(String),
}

/// Parse a duration string into microseconds.
///
/// # Examples
///
/// ```
/// use segcat_script::parse_duration;
///
/// assert_eq!(parse_duration("10").unwrap(), 10_000_000);
/// assert_eq!(parse_duration("01:30.25").unwrap(), 90_250_000);
/// assert_eq!(parse_duration("500ms").unwrap(), 500_000);
/// ```
pub fn parse_duration(input: &str) -> Result<i64, DurationError> {
    let (negative, seconds, fraction, unit, _) = (
        opt('-'),
        clock,
        opt(preceded('.', take_while(0.., |c: char| c.is_ascii_digit()))),
        opt(alt(("ms", "us", "s"))),
        eof,
    )
        .parse(input)
        .map_err(|_| DurationError::Syntax(input.to_string()))?;

    let mut micros = fraction.map(fraction_micros).unwrap_or(0);
    let scale = match unit {
        Some("ms") => {
            micros /= 1_000;
            1_000
        }
        Some("us") => {
            micros = 0;
            1
        }
        _ => 1_000_000,
    };

    let total = seconds
        .checked_mul(scale)
        .and_then(|t| t.checked_add(micros))
        .ok_or_else(|| DurationError::Overflow(input.to_string()))?;

    Ok(if negative.is_some() { -total } else { total })
}

/// Whole seconds from the clock part of the string.
fn clock(input: &mut &str) -> ModalResult<i64> {
    alt((
        (hours, ':', sexagesimal, ':', sexagesimal).map(|(h, _, m, _, s)| h * 3600 + m * 60 + s),
        (sexagesimal, ':', sexagesimal).map(|(m, _, s)| m * 60 + s),
        digit1.try_map(str::parse::<i64>),
    ))
    .parse_next(input)
}

fn hours(input: &mut &str) -> ModalResult<i64> {
    take_while(1..=10, |c: char| c.is_ascii_digit())
        .try_map(str::parse::<i64>)
        .parse_next(input)
}

/// A minutes or seconds field: one or two digits, at most 59.
fn sexagesimal(input: &mut &str) -> ModalResult<i64> {
    take_while(1..=2, |c: char| c.is_ascii_digit())
        .try_map(str::parse::<i64>)
        .verify(|v: &i64| *v <= 59)
        .parse_next(input)
}

/// Microseconds from the digits after the decimal point.
fn fraction_micros(digits: &str) -> i64 {
    digits
        .bytes()
        .take(6)
        .zip([100_000, 10_000, 1_000, 100, 10, 1])
        .map(|(d, weight)| i64::from(d - b'0') * weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn plain_seconds() {
        assert_eq!(parse_duration("0").unwrap(), 0);
        assert_eq!(parse_duration("10").unwrap(), 10_000_000);
        assert_eq!(parse_duration("90").unwrap(), 90_000_000);
        assert_eq!(parse_duration("3600s").unwrap(), 3_600_000_000);
    }

    #[test]
    fn fractional_seconds() {
        assert_eq!(parse_duration("12.5").unwrap(), 12_500_000);
        assert_eq!(parse_duration("0.000001").unwrap(), 1);
        assert_eq!(parse_duration("1.1234567").unwrap(), 1_123_456);
        assert_eq!(parse_duration("7.").unwrap(), 7_000_000);
    }

    #[test]
    fn clock_forms() {
        assert_eq!(parse_duration("1:30").unwrap(), 90_000_000);
        assert_eq!(parse_duration("01:02:03").unwrap(), 3_723_000_000);
        assert_eq!(parse_duration("100:00:00.5").unwrap(), 360_000_500_000);
    }

    #[test]
    fn unit_suffixes() {
        assert_eq!(parse_duration("500ms").unwrap(), 500_000);
        assert_eq!(parse_duration("1.5ms").unwrap(), 1_500);
        assert_eq!(parse_duration("250us").unwrap(), 250);
        assert_eq!(parse_duration("2.9us").unwrap(), 2);
    }

    #[test]
    fn negative_durations() {
        assert_eq!(parse_duration("-2").unwrap(), -2_000_000);
        assert_eq!(parse_duration("-00:01.5").unwrap(), -1_500_000);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "1:60", "1:2:3:4", "10 s", "5min", "1::2", "-", "100:00"] {
            assert_matches!(parse_duration(bad), Err(DurationError::Syntax(_)), "{bad}");
        }
    }

    #[test]
    fn rejects_overflow() {
        assert_matches!(
            parse_duration("9223372036854775807"),
            Err(DurationError::Overflow(_))
        );
    }
}
