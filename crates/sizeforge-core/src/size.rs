//! Human size expressions.
//!
//! Accepts a decimal magnitude followed by an optional `KB` or `MB` unit
//! (case-insensitive). A bare number is read as whole megabytes.

use crate::error::{ForgeError, Result};
use std::fmt;
use std::str::FromStr;

/// Bytes per kilobyte
pub const KIB: u64 = 1024;

/// Bytes per megabyte
pub const MIB: u64 = 1024 * 1024;

/// Unit of a size expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    /// `KB`, 1024 bytes
    Kilobytes,
    /// `MB` or no unit, 1024 * 1024 bytes
    Megabytes,
}

impl SizeUnit {
    /// Bytes per unit
    #[must_use]
    pub const fn multiplier(self) -> u64 {
        match self {
            Self::Kilobytes => KIB,
            Self::Megabytes => MIB,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "" | "MB" => Some(Self::Megabytes),
            "KB" => Some(Self::Kilobytes),
            _ => None,
        }
    }
}

/// Parsed size expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeSpec {
    magnitude: f64,
    unit: SizeUnit,
}

impl SizeSpec {
    /// Parse a size expression such as `"150KB"`, `"2.5 mb"` or `"10"`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidSizeFormat`] if the input has no numeric
    /// prefix, an unknown unit, or a magnitude that is not positive.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason| ForgeError::InvalidSizeFormat {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty size"));
        }

        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        if number.is_empty() {
            return Err(invalid("missing numeric magnitude"));
        }
        if !number.bytes().any(|b| b.is_ascii_digit()) || number.matches('.').count() > 1 {
            return Err(invalid("malformed number"));
        }

        let unit = SizeUnit::from_token(unit.trim()).ok_or_else(|| invalid("unit must be KB or MB"))?;
        let magnitude: f64 = number.parse().map_err(|_| invalid("malformed number"))?;

        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(invalid("size must be greater than zero"));
        }

        Ok(Self { magnitude, unit })
    }

    /// Numeric part
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Unit part
    #[must_use]
    pub fn unit(&self) -> SizeUnit {
        self.unit
    }

    /// Convert to a byte count, rounded to the nearest byte (minimum 1).
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidSizeFormat`] if the byte count does not
    /// fit in a `u64`.
    pub fn to_bytes(&self) -> Result<TargetBytes> {
        let bytes = (self.magnitude * self.unit.multiplier() as f64).round();
        if !bytes.is_finite() || bytes >= u64::MAX as f64 {
            return Err(ForgeError::InvalidSizeFormat {
                input: self.to_string(),
                reason: "size too large",
            });
        }
        Ok(TargetBytes::new(bytes as u64))
    }
}

impl FromStr for SizeSpec {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            SizeUnit::Kilobytes => "KB",
            SizeUnit::Megabytes => "MB",
        };
        write!(f, "{}{unit}", self.magnitude)
    }
}

/// Target size in bytes, never zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetBytes(u64);

impl TargetBytes {
    /// Create a target, raising zero to one byte
    #[must_use]
    pub fn new(bytes: u64) -> Self {
        Self(bytes.max(1))
    }

    /// Byte count
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

/// Parse a size expression straight into a byte count.
///
/// # Errors
///
/// See [`SizeSpec::parse`] and [`SizeSpec::to_bytes`].
pub fn parse_size(input: &str) -> Result<TargetBytes> {
    SizeSpec::parse(input)?.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(input: &str) -> u64 {
        parse_size(input).unwrap().get()
    }

    #[test]
    fn test_kilobytes() {
        assert_eq!(bytes("150KB"), 153_600);
        assert_eq!(bytes("8kb"), 8192);
        assert_eq!(bytes("1Kb"), 1024);
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(bytes("2.5MB"), 2_621_440);
        assert_eq!(bytes("5mb"), 5_242_880);
        assert_eq!(bytes("0.5MB"), 524_288);
    }

    #[test]
    fn test_bare_number_is_megabytes() {
        assert_eq!(bytes("10"), 10_485_760);
        assert_eq!(bytes("1"), MIB);
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(bytes("  100 KB "), 102_400);
        assert_eq!(bytes("2.5 mb"), 2_621_440);
    }

    #[test]
    fn test_leading_dot() {
        assert_eq!(bytes(".5KB"), 512);
    }

    #[test]
    fn test_rounds_to_nearest_byte() {
        // 1.0005 KB = 1024.512 bytes
        assert_eq!(bytes("1.0005KB"), 1025);
        // 1.0004 KB = 1024.4096 bytes
        assert_eq!(bytes("1.0004KB"), 1024);
    }

    #[test]
    fn test_tiny_fraction_is_at_least_one_byte() {
        assert_eq!(bytes("0.0001KB"), 1);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(parse_size("0").is_err());
        assert!(parse_size("0.0KB").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        for input in ["", "   ", "KB", "abc", "1.2.3MB", "10GB", "10 K B", ".", "-5MB", "1e3"] {
            let err = parse_size(input).unwrap_err();
            assert!(
                matches!(err, ForgeError::InvalidSizeFormat { .. }),
                "{input:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_rejects_overflow() {
        let huge = format!("{}MB", "9".repeat(30));
        assert!(parse_size(&huge).is_err());
    }

    #[test]
    fn test_spec_accessors() {
        let spec: SizeSpec = "2.5MB".parse().unwrap();
        assert_eq!(spec.magnitude(), 2.5);
        assert_eq!(spec.unit(), SizeUnit::Megabytes);
        assert_eq!(spec.to_string(), "2.5MB");
    }

    #[test]
    fn test_target_bytes_never_zero() {
        assert_eq!(TargetBytes::new(0).get(), 1);
        assert_eq!(TargetBytes::new(42).get(), 42);
    }
}
