//! Size threshold parsing.
//!
//! Converts human size expressions such as `"10MB"`, `"512bytes"` or a bare
//! `"2"` into an exact byte count. Multipliers are powers of 1024. A literal
//! without a unit is scaled by a default unit (megabytes unless configured).
//!
//! Malformed input is always an error: `"345.5"`, `"9foo"` or `" "` never
//! turn into a plausible-looking byte count.
//!
//! # Example
//!
//! ```
//! use dupewalk::size::{parse_size, SizeUnit};
//!
//! assert_eq!(parse_size("1KB", SizeUnit::Megabytes).unwrap(), 1024);
//! assert_eq!(parse_size("2", SizeUnit::Megabytes).unwrap(), 2 * 1_048_576);
//! assert!(parse_size("345.5", SizeUnit::Megabytes).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Bytes per megabyte, as used by the report's size column.
pub const MEGABYTE: u64 = 1_048_576;

/// Unit tokens ordered longest first so `BYTES` wins over `B` and `KB` over `B`.
const UNIT_TOKENS: [(&str, SizeUnit); 6] = [
    ("BYTES", SizeUnit::Bytes),
    ("KB", SizeUnit::Kilobytes),
    ("MB", SizeUnit::Megabytes),
    ("GB", SizeUnit::Gigabytes),
    ("TB", SizeUnit::Terabytes),
    ("B", SizeUnit::Bytes),
];

/// A size unit with a fixed power-of-1024 multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// 1 byte
    Bytes,
    /// 1024 bytes
    Kilobytes,
    /// 1024^2 bytes
    #[default]
    Megabytes,
    /// 1024^3 bytes
    Gigabytes,
    /// 1024^4 bytes
    Terabytes,
}

impl SizeUnit {
    /// Number of bytes in one of this unit.
    #[must_use]
    pub fn multiplier(self) -> u64 {
        match self {
            Self::Bytes => 1,
            Self::Kilobytes => 1_024,
            Self::Megabytes => MEGABYTE,
            Self::Gigabytes => 1_073_741_824,
            Self::Terabytes => 1_099_511_627_776,
        }
    }

    /// Canonical suffix for this unit.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Bytes => "B",
            Self::Kilobytes => "KB",
            Self::Megabytes => "MB",
            Self::Gigabytes => "GB",
            Self::Terabytes => "TB",
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for SizeUnit {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        UNIT_TOKENS
            .iter()
            .find(|(token, _)| *token == upper)
            .map(|(_, unit)| *unit)
            .ok_or_else(|| SizeError::InvalidSizeExpression {
                input: s.to_string(),
                reason: "unknown size unit".to_string(),
            })
    }
}

/// Errors produced while parsing a size expression.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    /// The expression is not `<digits>[unit]`.
    #[error("invalid size expression '{input}': {reason}")]
    InvalidSizeExpression {
        /// The offending input, as given
        input: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Parse a size expression into bytes.
///
/// The expression is a non-negative integer literal optionally followed by
/// one of `BYTES`, `B`, `KB`, `MB`, `GB`, `TB` (case-insensitive). Without a
/// unit the literal is multiplied by `default_unit`.
///
/// # Errors
///
/// Returns [`SizeError::InvalidSizeExpression`] when the numeric part is
/// empty, contains anything but ASCII digits, or the result overflows `u64`.
pub fn parse_size(expr: &str, default_unit: SizeUnit) -> Result<u64, SizeError> {
    let invalid = |reason: &str| SizeError::InvalidSizeExpression {
        input: expr.to_string(),
        reason: reason.to_string(),
    };

    let upper = expr.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(invalid("expression is empty"));
    }

    let (digits, unit) = UNIT_TOKENS
        .iter()
        .find_map(|(token, unit)| upper.strip_suffix(token).map(|rest| (rest, *unit)))
        .unwrap_or((upper.as_str(), default_unit));

    if digits.is_empty() {
        return Err(invalid("missing numeric value"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("numeric value must be a non-negative integer"));
    }

    let value: u64 = digits.parse().map_err(|_| invalid("numeric value is too large"))?;
    let bytes = value
        .checked_mul(unit.multiplier())
        .ok_or_else(|| invalid("size overflows 64 bits"))?;

    log::trace!("Size expression '{}' -> {} bytes ({})", expr, bytes, unit);
    Ok(bytes)
}

/// Render a byte count as whole megabytes with a unit suffix, e.g. `"7 MB"`.
#[must_use]
pub fn format_megabytes(bytes: u64) -> String {
    format!("{} MB", bytes / MEGABYTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mb(expr: &str) -> Result<u64, SizeError> {
        parse_size(expr, SizeUnit::Megabytes)
    }

    #[test]
    fn test_parse_size_documented_values() {
        assert_eq!(mb("0").unwrap(), 0);
        assert_eq!(mb("1").unwrap(), 1_048_576);
        assert_eq!(mb("1KB").unwrap(), 1_024);
        assert_eq!(mb("1MB").unwrap(), 1_048_576);
        assert_eq!(mb("1GB").unwrap(), 1_073_741_824);
        assert_eq!(mb("1TB").unwrap(), 1_099_511_627_776);
        assert_eq!(mb("512bytes").unwrap(), 512);
    }

    #[test]
    fn test_parse_size_case_insensitive() {
        assert_eq!(mb("1kb").unwrap(), 1_024);
        assert_eq!(mb("32Kb").unwrap(), 32 * 1_024);
        assert_eq!(mb("45Bytes").unwrap(), 45);
        assert_eq!(mb("233gb").unwrap(), 250_181_844_992);
    }

    #[test]
    fn test_parse_size_single_b_suffix() {
        assert_eq!(mb("10B").unwrap(), 10);
        assert_eq!(mb("10b").unwrap(), 10);
    }

    #[test]
    fn test_parse_size_default_unit() {
        assert_eq!(mb("9").unwrap(), 9_437_184);
        assert_eq!(parse_size("9", SizeUnit::Bytes).unwrap(), 9);
        assert_eq!(parse_size("9", SizeUnit::Kilobytes).unwrap(), 9 * 1_024);
    }

    #[test]
    fn test_parse_size_surrounding_whitespace() {
        assert_eq!(mb("  2KB \n").unwrap(), 2_048);
    }

    #[test]
    fn test_parse_size_rejects_decimal() {
        let err = mb("345.5").unwrap_err();
        assert!(matches!(err, SizeError::InvalidSizeExpression { ref input, .. } if input == "345.5"));
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert!(mb("9foo").is_err());
        assert!(mb("").is_err());
        assert!(mb("   ").is_err());
        assert!(mb("-1").is_err());
        assert!(mb("KB").is_err());
        assert!(mb("1 KB").is_err());
        assert!(mb("1.5MB").is_err());
        assert!(mb("1KiB").is_err());
    }

    #[test]
    fn test_parse_size_overflow() {
        assert!(mb("99999999999999999999").is_err());
        assert!(mb("99999999TB").is_err());
    }

    #[test]
    fn test_size_unit_from_str() {
        assert_eq!("kb".parse::<SizeUnit>().unwrap(), SizeUnit::Kilobytes);
        assert_eq!("bytes".parse::<SizeUnit>().unwrap(), SizeUnit::Bytes);
        assert_eq!("B".parse::<SizeUnit>().unwrap(), SizeUnit::Bytes);
        assert!("KiB".parse::<SizeUnit>().is_err());
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0 MB");
        assert_eq!(format_megabytes(5), "0 MB");
        assert_eq!(format_megabytes(7 * MEGABYTE + 12), "7 MB");
    }

    #[test]
    fn test_size_error_display() {
        let err = mb("9foo").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid size expression '9foo': numeric value must be a non-negative integer"
        );
    }
}
