//! Numeric coercion of form field text.
//!
//! Year and quarter inputs are never rejected on the client. Their text is
//! coerced to a [`FieldNumber`], which may be the not-a-number sentinel, and
//! forwarded as-is.

use serde::{Serialize, Serializer};
use std::fmt;

/// A number coerced from free-form field text.
///
/// Serializes integral finite values as JSON integers, other finite values as
/// JSON floats and non-finite values (NaN, infinities) as `null`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldNumber(f64);

impl FieldNumber {
    /// The not-a-number sentinel.
    pub const NAN: Self = Self(f64::NAN);

    /// Coerces field text to a number.
    ///
    /// Surrounding whitespace is ignored and empty text is zero. Decimal
    /// literals, `0x`/`0o`/`0b` prefixed integers and `Infinity` (optionally
    /// signed) are accepted; anything else is [`FieldNumber::NAN`].
    #[must_use]
    pub fn coerce(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self(0.0);
        }
        match text {
            "Infinity" | "+Infinity" => return Self(f64::INFINITY),
            "-Infinity" => return Self(f64::NEG_INFINITY),
            _ => {}
        }
        if let Some(value) = parse_prefixed(text) {
            return Self(value);
        }
        if !is_decimal_literal(text) {
            return Self::NAN;
        }
        text.parse().map_or(Self::NAN, Self)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Returns true for the not-a-number sentinel.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    /// Returns the value as an integer when it is finite and has no fraction.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        let v = self.0;
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Some(v as i64)
        } else {
            None
        }
    }
}

impl From<i64> for FieldNumber {
    fn from(value: i64) -> Self {
        Self(value as f64)
    }
}

impl From<f64> for FieldNumber {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for FieldNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(i) => write!(f, "{i}"),
            None if self.0.is_nan() => f.write_str("NaN"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for FieldNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(i) = self.as_integer() {
            serializer.serialize_i64(i)
        } else if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_none()
        }
    }
}

fn parse_prefixed(text: &str) -> Option<f64> {
    let (radix, digits) = match text.get(..2)? {
        "0x" | "0X" => (16, &text[2..]),
        "0o" | "0O" => (8, &text[2..]),
        "0b" | "0B" => (2, &text[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(value.unwrap_or(f64::NAN))
}

/// Checks the shape `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }
    if mantissa_digits == 0 {
        return false;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_plain_years() {
        assert_eq!(FieldNumber::coerce("2024").as_integer(), Some(2024));
        assert_eq!(FieldNumber::coerce("  2019 ").as_integer(), Some(2019));
        assert_eq!(FieldNumber::coerce("2020.0").as_integer(), Some(2020));
    }

    #[test]
    fn test_coerce_empty_is_zero() {
        assert_eq!(FieldNumber::coerce("").as_integer(), Some(0));
        assert_eq!(FieldNumber::coerce("   ").as_integer(), Some(0));
    }

    #[test]
    fn test_coerce_non_numeric_is_nan() {
        assert!(FieldNumber::coerce("abc").is_nan());
        assert!(FieldNumber::coerce("20x4").is_nan());
        assert!(FieldNumber::coerce("inf").is_nan());
        assert!(FieldNumber::coerce("nan").is_nan());
        assert!(FieldNumber::coerce("1_000").is_nan());
        assert!(FieldNumber::coerce(".").is_nan());
        assert!(FieldNumber::coerce("1e").is_nan());
        assert!(FieldNumber::coerce("0x").is_nan());
        assert!(FieldNumber::coerce("-0x10").is_nan());
    }

    #[test]
    fn test_coerce_literal_forms() {
        assert_eq!(FieldNumber::coerce(".5").value(), 0.5);
        assert_eq!(FieldNumber::coerce("5.").value(), 5.0);
        assert_eq!(FieldNumber::coerce("-3").value(), -3.0);
        assert_eq!(FieldNumber::coerce("1e3").value(), 1000.0);
        assert_eq!(FieldNumber::coerce("0x10").value(), 16.0);
        assert_eq!(FieldNumber::coerce("0b101").value(), 5.0);
        assert_eq!(FieldNumber::coerce("0o17").value(), 15.0);
        assert_eq!(FieldNumber::coerce("-Infinity").value(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_serialize_matches_wire_format() {
        assert_eq!(
            serde_json::to_string(&FieldNumber::coerce("2024")).unwrap(),
            "2024"
        );
        assert_eq!(
            serde_json::to_string(&FieldNumber::coerce("2.5")).unwrap(),
            "2.5"
        );
        assert_eq!(serde_json::to_string(&FieldNumber::NAN).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&FieldNumber::coerce("Infinity")).unwrap(),
            "null"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldNumber::from(4).to_string(), "4");
        assert_eq!(FieldNumber::NAN.to_string(), "NaN");
        assert_eq!(FieldNumber::from(1.5).to_string(), "1.5");
    }
}
