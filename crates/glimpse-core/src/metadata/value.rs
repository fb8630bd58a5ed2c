//! Raw tag values as decoded from a segment.

use serde::Serialize;
use std::fmt;

/// A numerator/denominator pair, kept unreduced as stored in the file.
///
/// Both TIFF `RATIONAL` (unsigned) and `SRATIONAL` (signed) fit in `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Floating point value. Infinite or NaN when the denominator is zero.
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn is_integer(&self) -> bool {
        self.denominator != 0 && self.numerator % self.denominator == 0
    }

    /// Reduced by the greatest common divisor, with the sign on the numerator.
    pub fn reduced(&self) -> Self {
        if self.denominator == 0 {
            return *self;
        }
        let divisor = gcd(self.numerator.unsigned_abs(), self.denominator.unsigned_abs()) as i64;
        let divisor = if divisor == 0 { 1 } else { divisor };
        let sign = if self.denominator < 0 { -1 } else { 1 };
        Self {
            numerator: sign * self.numerator / divisor,
            denominator: sign * self.denominator / divisor,
        }
    }

    /// Shortest readable form: `"5"` for whole numbers, `"1/125"` for
    /// fractions, and, when `allow_decimal` is set, a short decimal such as
    /// `"2.8"` when one exists.
    pub fn to_simple_string(&self, allow_decimal: bool) -> String {
        if self.denominator == 0 {
            return self.to_string();
        }
        let reduced = self.reduced();
        if reduced.denominator == 1 {
            return reduced.numerator.to_string();
        }
        if allow_decimal {
            let decimal = reduced.to_f64().to_string();
            if decimal.len() < 5 {
                return decimal;
            }
        }
        reduced.to_string()
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// The typed raw value of one tag.
///
/// Single-component integer and rational values are stored unwrapped;
/// multi-component values keep all components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TagValue {
    Int(i64),
    Ints(Vec<i64>),
    Rational(Rational),
    Rationals(Vec<Rational>),
    Float(f64),
    Floats(Vec<f64>),
    Text(String),
    Bytes(Vec<u8>),
}

impl TagValue {
    /// Short name of the variant, used in type mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Ints(_) => "integer array",
            Self::Rational(_) => "rational",
            Self::Rationals(_) => "rational array",
            Self::Float(_) => "float",
            Self::Floats(_) => "float array",
            Self::Text(_) => "text",
            Self::Bytes(_) => "byte array",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Rational(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// True for blank text and zero-length arrays.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(v) => v.trim().is_empty(),
            Self::Ints(v) => v.is_empty(),
            Self::Rationals(v) => v.is_empty(),
            Self::Floats(v) => v.is_empty(),
            Self::Bytes(v) => v.is_empty(),
            Self::Int(_) | Self::Rational(_) | Self::Float(_) => false,
        }
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Ints(v) => join(f, v),
            Self::Rational(v) => write!(f, "{v}"),
            Self::Rationals(v) => join(f, v),
            Self::Float(v) => write!(f, "{v}"),
            Self::Floats(v) => join(f, v),
            Self::Text(v) => f.write_str(v),
            Self::Bytes(v) => join(f, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_string_integer() {
        assert_eq!(Rational::new(50, 1).to_simple_string(true), "50");
        assert_eq!(Rational::new(100, 2).to_simple_string(false), "50");
    }

    #[test]
    fn test_simple_string_decimal() {
        assert_eq!(Rational::new(28, 10).to_simple_string(true), "2.8");
        assert_eq!(Rational::new(28, 10).to_simple_string(false), "14/5");
        assert_eq!(Rational::new(-1, 2).to_simple_string(true), "-0.5");
    }

    #[test]
    fn test_simple_string_long_decimal_stays_fraction() {
        assert_eq!(Rational::new(1, 125).to_simple_string(true), "1/125");
        assert_eq!(Rational::new(10, 1250).to_simple_string(true), "1/125");
        assert_eq!(Rational::new(-2, 3).to_simple_string(true), "-2/3");
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(Rational::new(5, 0).to_simple_string(true), "5/0");
        assert!(!Rational::new(5, 0).is_integer());
    }

    #[test]
    fn test_reduced_moves_sign_to_numerator() {
        assert_eq!(Rational::new(2, -4).reduced(), Rational::new(-1, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(TagValue::Rational(Rational::new(1, 60)).to_string(), "1/60");
        assert_eq!(TagValue::Ints(vec![8, 8, 8]).to_string(), "8 8 8");
        assert_eq!(TagValue::Bytes(vec![2, 2, 0, 0]).to_string(), "2 2 0 0");
        assert_eq!(TagValue::Text("Canon".into()).to_string(), "Canon");
    }

    #[test]
    fn test_is_empty() {
        assert!(TagValue::Text("  ".into()).is_empty());
        assert!(!TagValue::Int(0).is_empty());
        assert!(TagValue::Bytes(vec![]).is_empty());
    }
}
