//! Rational time bases and timestamp rescaling.
//!
//! The virtual timeline is counted in microseconds ([`TIME_BASE_Q`]). Each
//! segment stream carries its own time base, so every crossing between the
//! two goes through [`Rational::rescale`] or [`Rational::rescale_rnd`]. The
//! intermediate product is computed in 128 bits and saturated back to `i64`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticks per second of the virtual timeline.
pub const TIME_BASE: i64 = 1_000_000;

/// The virtual timeline's time base, `1 / TIME_BASE`.
pub const TIME_BASE_Q: Rational = Rational {
    num: 1,
    den: TIME_BASE,
};

/// A rational number used as a time base, frame rate, or aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    pub num: i64,
    pub den: i64,
}

/// Rounding applied when a rescaled value is not exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Toward zero.
    Zero,
    /// Away from zero.
    Inf,
    /// Toward negative infinity.
    Down,
    /// Toward positive infinity.
    Up,
    /// To nearest, halfway cases away from zero.
    NearInf,
}

impl Rational {
    /// The undefined rational `0/1`, used for unknown frame rates and ratios.
    pub const UNDEFINED: Rational = Rational { num: 0, den: 1 };

    pub const fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// Whether the numerator is zero.
    pub fn is_undefined(&self) -> bool {
        self.num == 0
    }

    /// Floating-point value, or `None` when the denominator is zero.
    pub fn as_f64(&self) -> Option<f64> {
        (self.den != 0).then(|| self.num as f64 / self.den as f64)
    }

    /// Rescale `value` from time base `self` to time base `to`, rounding to nearest.
    pub fn rescale(self, value: i64, to: Rational) -> i64 {
        self.rescale_rnd(value, to, Rounding::NearInf)
    }

    /// Rescale `value` from time base `self` to time base `to`.
    pub fn rescale_rnd(self, value: i64, to: Rational, rounding: Rounding) -> i64 {
        let b = self.num as i128 * to.den as i128;
        let c = self.den as i128 * to.num as i128;
        rescale_i128(value as i128, b, c, rounding)
    }

    /// Like [`Rational::rescale_rnd`] but leaves `i64::MIN` and `i64::MAX`
    /// untouched, so open-ended bounds stay open-ended.
    pub fn rescale_pass_minmax(self, value: i64, to: Rational, rounding: Rounding) -> i64 {
        if value == i64::MIN || value == i64::MAX {
            return value;
        }
        self.rescale_rnd(value, to, rounding)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Compute `a * b / c` with the given rounding.
pub fn rescale_rnd(a: i64, b: i64, c: i64, rounding: Rounding) -> i64 {
    rescale_i128(a as i128, b as i128, c as i128, rounding)
}

fn rescale_i128(a: i128, b: i128, c: i128, rounding: Rounding) -> i64 {
    let (mut num, mut den) = (a * b, c);
    if den == 0 {
        return if num < 0 { i64::MIN } else { i64::MAX };
    }
    if den < 0 {
        num = -num;
        den = -den;
    }

    let quotient = num / den;
    let remainder = num % den;
    let sign = if num < 0 { -1 } else { 1 };

    let rounded = if remainder == 0 {
        quotient
    } else {
        match rounding {
            Rounding::Zero => quotient,
            Rounding::Inf => quotient + sign,
            Rounding::Down if num < 0 => quotient - 1,
            Rounding::Down => quotient,
            Rounding::Up if num > 0 => quotient + 1,
            Rounding::Up => quotient,
            Rounding::NearInf if 2 * remainder.abs() >= den => quotient + sign,
            Rounding::NearInf => quotient,
        }
    };

    rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Render a microsecond timestamp as `[-]H:MM:SS.uuuuuu` for log output.
pub fn format_timestamp(us: i64) -> String {
    let sign = if us < 0 { "-" } else { "" };
    let abs = us.unsigned_abs();
    let secs = abs / TIME_BASE as u64;
    let frac = abs % TIME_BASE as u64;
    format!(
        "{sign}{}:{:02}:{:02}.{frac:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}
