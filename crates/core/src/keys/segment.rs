//! Typed key segments.
//!
//! A composite key is built from an ordered list of [`KeySegment`]s. Numbers are
//! carried as validated decimal strings so that magnitudes beyond the native
//! integer types (and their exact digits) survive encoding untouched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};

use super::error::{KeyError, Result};

/// A validated decimal number: an optional `-`, at least one digit, and at most
/// one `.` followed by at least one digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Parses a decimal string.
    ///
    /// Negative zero (`-0`, `-0.00`) is normalized to its unsigned form so that
    /// zero has exactly one representation.
    pub fn parse(input: &str) -> Result<Self> {
        let magnitude = input.strip_prefix('-').unwrap_or(input);

        let mut parts = magnitude.split('.');
        let integer = parts.next().unwrap_or_default();
        let fraction = parts.next();
        if parts.next().is_some() {
            return Err(KeyError::MultipleDecimalPoints(input.to_string()));
        }

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || fraction.is_some_and(|f| !all_digits(f)) {
            return Err(KeyError::InvalidNumber(input.to_string()));
        }

        let is_zero = magnitude.bytes().all(|b| b == b'0' || b == b'.');
        if is_zero {
            return Ok(Self(magnitude.to_string()));
        }

        Ok(Self(input.to_string()))
    }

    /// Returns the decimal representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the number is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }

    /// Returns the digits without the sign.
    pub fn magnitude(&self) -> &str {
        self.0.strip_prefix('-').unwrap_or(&self.0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Number {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

macro_rules! number_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

number_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl TryFrom<f64> for Number {
    type Error = KeyError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(KeyError::NonFinite(value.to_string()));
        }
        // `Display` for f64 never uses exponent notation.
        Self::parse(&value.to_string())
    }
}

/// One element of a composite key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySegment {
    /// Used verbatim.
    Str(String),
    /// Stringified as-is.
    Number(Number),
    /// Encoded with the lexicographic numeric encoding.
    Sortable(Number),
    /// `true` or `false`.
    Bool(bool),
    /// ISO-8601 with millisecond precision and a `Z` suffix.
    Date(DateTime<Utc>),
    /// Flattened into the parent key.
    List(Vec<KeySegment>),
}

impl KeySegment {
    /// Creates a segment that sorts numerically under plain string comparison.
    pub fn sortable(value: impl Into<Number>) -> Self {
        Self::Sortable(value.into())
    }

    /// Converts a JSON value into a segment.
    ///
    /// Strings, numbers, booleans and arrays are accepted; `null` and objects
    /// are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Ok(Self::Str(s.clone())),
            serde_json::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_json::Value::Number(n) => Ok(Self::Number(Number::parse(&n.to_string())?)),
            serde_json::Value::Array(values) => values
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Self::List),
            serde_json::Value::Null => Err(KeyError::UnsupportedSegment("null".to_string())),
            serde_json::Value::Object(_) => {
                Err(KeyError::UnsupportedSegment("object".to_string()))
            }
        }
    }

    pub(crate) fn date_to_string(date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl From<&str> for KeySegment {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for KeySegment {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for KeySegment {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for KeySegment {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for KeySegment {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<Number> for KeySegment {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<KeySegment>> for KeySegment {
    fn from(value: Vec<KeySegment>) -> Self {
        Self::List(value)
    }
}

macro_rules! segment_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for KeySegment {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

segment_from_integer!(i32, i64, i128, u32, u64, u128, usize);

impl TryFrom<f64> for KeySegment {
    type Error = KeyError;

    fn try_from(value: f64) -> Result<Self> {
        Number::try_from(value).map(Self::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_accepts_integers_and_decimals() {
        assert_eq!(Number::parse("42").unwrap().as_str(), "42");
        assert_eq!(Number::parse("-42").unwrap().as_str(), "-42");
        assert_eq!(Number::parse("3.25").unwrap().as_str(), "3.25");
        assert_eq!(Number::parse("-0.5").unwrap().as_str(), "-0.5");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(matches!(
            Number::parse("1.2.3"),
            Err(KeyError::MultipleDecimalPoints(_))
        ));
        assert!(matches!(Number::parse(""), Err(KeyError::InvalidNumber(_))));
        assert!(matches!(Number::parse("-"), Err(KeyError::InvalidNumber(_))));
        assert!(matches!(Number::parse("1."), Err(KeyError::InvalidNumber(_))));
        assert!(matches!(Number::parse(".5"), Err(KeyError::InvalidNumber(_))));
        assert!(matches!(Number::parse("1e5"), Err(KeyError::InvalidNumber(_))));
        assert!(matches!(Number::parse("+1"), Err(KeyError::InvalidNumber(_))));
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        assert_eq!(Number::parse("-0").unwrap().as_str(), "0");
        assert_eq!(Number::parse("-0.00").unwrap().as_str(), "0.00");
        assert!(!Number::parse("-0").unwrap().is_negative());
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Number::try_from(1.5).unwrap().as_str(), "1.5");
        assert_eq!(Number::try_from(5.0).unwrap().as_str(), "5");
        assert_eq!(Number::try_from(-0.0).unwrap().as_str(), "0");
        assert!(matches!(
            Number::try_from(f64::NAN),
            Err(KeyError::NonFinite(_))
        ));
        assert!(matches!(
            Number::try_from(f64::INFINITY),
            Err(KeyError::NonFinite(_))
        ));
    }

    #[test]
    fn test_magnitude_strips_sign() {
        let number = Number::from(-1234);
        assert!(number.is_negative());
        assert_eq!(number.magnitude(), "1234");
    }

    #[test]
    fn test_segment_from_json() {
        let value = serde_json::json!(["a", 1, true, ["b"]]);
        let segment = KeySegment::from_json(&value).unwrap();
        assert_eq!(
            segment,
            KeySegment::List(vec![
                KeySegment::Str("a".to_string()),
                KeySegment::Number(Number::from(1)),
                KeySegment::Bool(true),
                KeySegment::List(vec![KeySegment::Str("b".to_string())]),
            ])
        );
    }

    #[test]
    fn test_segment_from_json_rejects_null_and_objects() {
        assert!(matches!(
            KeySegment::from_json(&serde_json::Value::Null),
            Err(KeyError::UnsupportedSegment(_))
        ));
        assert!(matches!(
            KeySegment::from_json(&serde_json::json!({ "a": 1 })),
            Err(KeyError::UnsupportedSegment(_))
        ));
    }

    #[test]
    fn test_date_format_has_millis_and_z_suffix() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(KeySegment::date_to_string(&date), "2024-01-15T10:30:00.000Z");
    }
}
