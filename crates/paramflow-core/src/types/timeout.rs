//! Timeout values with the `1w2d3h4m5s6ms` string grammar
//!
//! Stored as milliseconds; serialized as the grammar string.

use crate::error::{CoreError, Result};
use crate::types::kind::{TargetKind, TargetTyped};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;

/// A duration written as `1w2d3h4m5s6ms`; at least one component required
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timeout {
    millis: u64,
}

impl Timeout {
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }
}

impl FromStr for Timeout {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(CoreError::InvalidTimeout(s.to_string()));
        }

        let bytes = text.as_bytes();
        let mut i = 0;
        let mut total: u64 = 0;
        while i < bytes.len() {
            let digits_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i == digits_start {
                return Err(CoreError::InvalidTimeout(s.to_string()));
            }
            let amount: u64 = text[digits_start..i]
                .parse()
                .map_err(|_| CoreError::InvalidTimeout(s.to_string()))?;

            let unit_start = i;
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }
            let multiplier = match &text[unit_start..i] {
                "w" => MS_PER_WEEK,
                "d" => MS_PER_DAY,
                "h" => MS_PER_HOUR,
                "m" => MS_PER_MINUTE,
                "s" => MS_PER_SECOND,
                "ms" => 1,
                _ => return Err(CoreError::InvalidTimeout(s.to_string())),
            };
            total = amount
                .checked_mul(multiplier)
                .and_then(|part| total.checked_add(part))
                .ok_or_else(|| CoreError::InvalidTimeout(s.to_string()))?;
        }

        Ok(Timeout { millis: total })
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis == 0 {
            return write!(f, "0s");
        }
        let mut rest = self.millis;
        for (unit, ms) in [
            ("w", MS_PER_WEEK),
            ("d", MS_PER_DAY),
            ("h", MS_PER_HOUR),
            ("m", MS_PER_MINUTE),
            ("s", MS_PER_SECOND),
            ("ms", 1),
        ] {
            let amount = rest / ms;
            if amount > 0 {
                write!(f, "{}{}", amount, unit)?;
                rest %= ms;
            }
        }
        Ok(())
    }
}

impl Serialize for Timeout {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timeout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

impl TargetTyped for Timeout {
    fn target_kind() -> TargetKind {
        TargetKind::Duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_unit() {
        assert_eq!("10m".parse::<Timeout>().unwrap().as_millis(), 600_000);
        assert_eq!("45s".parse::<Timeout>().unwrap().as_millis(), 45_000);
        assert_eq!("500ms".parse::<Timeout>().unwrap().as_millis(), 500);
        assert_eq!("1w".parse::<Timeout>().unwrap().as_millis(), 604_800_000);
    }

    #[test]
    fn test_parse_compound() {
        let timeout = "1d2h3m".parse::<Timeout>().unwrap();
        assert_eq!(
            timeout.as_millis(),
            MS_PER_DAY + 2 * MS_PER_HOUR + 3 * MS_PER_MINUTE
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Timeout>().is_err());
        assert!("10".parse::<Timeout>().is_err());
        assert!("m10".parse::<Timeout>().is_err());
        assert!("10x".parse::<Timeout>().is_err());
        assert!("10m extra".parse::<Timeout>().is_err());
        assert!("-5s".parse::<Timeout>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["10m", "1d2h3m", "45s", "500ms", "1w1ms"] {
            let timeout: Timeout = text.parse().unwrap();
            assert_eq!(timeout.to_string(), text);
        }
        assert_eq!(Timeout::from_millis(0).to_string(), "0s");
    }

    #[test]
    fn test_serde_as_string() {
        let timeout: Timeout = "2h30m".parse().unwrap();
        let json = serde_json::to_string(&timeout).unwrap();
        assert_eq!(json, "\"2h30m\"");
        let back: Timeout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timeout);
    }
}
