//! Options recognized by the concat source.
//!
//! [`ConcatOptions`] deserializes from any serde format with every field
//! defaulted, so an empty table is valid.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Whether segment paths must pass the safe-filename whitelist.
///
/// Accepts the numeric form (`-1`, `0`, `1`) as well as the names
/// `"auto"`, `"disabled"` and `"enabled"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SafeModeRepr", into = "i8")]
pub enum SafeMode {
    /// Unset; becomes [`SafeMode::Enabled`] once the script declares
    /// `ffconcat version 1.0`.
    #[default]
    Auto,
    Disabled,
    Enabled,
}

impl SafeMode {
    /// Whether the whitelist is currently enforced.
    pub fn is_enforced(self) -> bool {
        self == SafeMode::Enabled
    }
}

impl From<SafeMode> for i8 {
    fn from(mode: SafeMode) -> Self {
        match mode {
            SafeMode::Auto => -1,
            SafeMode::Disabled => 0,
            SafeMode::Enabled => 1,
        }
    }
}

impl TryFrom<i64> for SafeMode {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(SafeMode::Auto),
            0 => Ok(SafeMode::Disabled),
            1 => Ok(SafeMode::Enabled),
            other => Err(format!("safe mode must be -1, 0 or 1, got {other}")),
        }
    }
}

impl std::str::FromStr for SafeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "-1" => Ok(SafeMode::Auto),
            "disabled" | "off" | "0" => Ok(SafeMode::Disabled),
            "enabled" | "on" | "1" => Ok(SafeMode::Enabled),
            other => Err(format!("unrecognized safe mode '{other}'")),
        }
    }
}

impl fmt::Display for SafeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SafeMode::Auto => "auto",
            SafeMode::Disabled => "disabled",
            SafeMode::Enabled => "enabled",
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SafeModeRepr {
    Int(i64),
    Name(String),
}

impl TryFrom<SafeModeRepr> for SafeMode {
    type Error = String;

    fn try_from(repr: SafeModeRepr) -> Result<Self, Self::Error> {
        match repr {
            SafeModeRepr::Int(v) => SafeMode::try_from(v),
            SafeModeRepr::Name(name) => name.parse(),
        }
    }
}

/// Options applied while building the segment table and opening segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatOptions {
    /// Safe-filename enforcement for `file` directives.
    pub safe: SafeMode,
    /// Network I/O timeout in microseconds, passed to every segment open.
    pub timeout_us: Option<u64>,
}

impl ConcatOptions {
    /// The network timeout as a [`Duration`].
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_us.map(Duration::from_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ConcatOptions::default();
        assert_eq!(opts.safe, SafeMode::Auto);
        assert_eq!(opts.timeout(), None);
    }

    #[test]
    fn parse_numeric_safe_mode() {
        let opts: ConcatOptions =
            serde_json::from_str(r#"{"safe": 0, "timeout_us": 5000000}"#).unwrap();
        assert_eq!(opts.safe, SafeMode::Disabled);
        assert_eq!(opts.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn parse_named_safe_mode() {
        let opts: ConcatOptions = serde_json::from_str(r#"{"safe": "enabled"}"#).unwrap();
        assert_eq!(opts.safe, SafeMode::Enabled);
        assert!(opts.safe.is_enforced());
    }

    #[test]
    fn reject_out_of_range_safe_mode() {
        let result: Result<ConcatOptions, _> = serde_json::from_str(r#"{"safe": 2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_object_uses_defaults() {
        let opts: ConcatOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ConcatOptions::default());
    }

    #[test]
    fn serializes_safe_mode_as_integer() {
        let json = serde_json::to_string(&ConcatOptions {
            safe: SafeMode::Auto,
            timeout_us: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"safe":-1,"timeout_us":null}"#);
    }

    #[test]
    fn from_str_aliases() {
        assert_eq!("on".parse::<SafeMode>().unwrap(), SafeMode::Enabled);
        assert_eq!("OFF".parse::<SafeMode>().unwrap(), SafeMode::Disabled);
        assert_eq!("-1".parse::<SafeMode>().unwrap(), SafeMode::Auto);
        assert!("maybe".parse::<SafeMode>().is_err());
    }
}
