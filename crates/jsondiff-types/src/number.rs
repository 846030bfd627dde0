use std::fmt;

use crate::error::TypeError;

/// A JSON number.
///
/// Equality is numeric rather than textual: `1`, `1.0` and `1e0` are the
/// same number. Floats are always finite, so `Number` is `Eq`.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    /// A non-negative integer.
    PosInt(u64),
    /// A negative integer.
    NegInt(i64),
    /// A finite floating point value.
    Float(f64),
}

impl Number {
    /// Create a float number, rejecting NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self, TypeError> {
        if value.is_finite() {
            Ok(Self::Float(value))
        } else {
            Err(TypeError::NonFiniteNumber(value))
        }
    }

    /// Returns `true` if the number is stored as an integer.
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Float(_))
    }

    /// Lossy conversion to `f64`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::PosInt(n) => n as f64,
            Self::NegInt(n) => n as f64,
            Self::Float(f) => f,
        }
    }

    /// The integer value, if the number is stored as one.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::PosInt(n) => Some(i128::from(n)),
            Self::NegInt(n) => Some(i128::from(n)),
            Self::Float(_) => None,
        }
    }
}

/// Exact comparison of a float against an integer.
///
/// The float matches only when it is integral and lies inside the `i128`
/// range, so no rounding can make two different numbers compare equal.
#[allow(clippy::cast_possible_truncation)]
fn float_equals_integer(float: f64, int: i128) -> bool {
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0; // 2^127
    float.is_finite() && float.fract() == 0.0 && (-LIMIT..LIMIT).contains(&float) && float as i128 == int
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Float(f), int) | (int, Self::Float(f)) => int
                .as_i128()
                .is_some_and(|i| float_equals_integer(f, i)),
            (a, b) => a.as_i128() == b.as_i128(),
        }
    }
}

impl Eq for Number {}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PosInt(n) => write!(f, "{n}"),
            Self::NegInt(n) => write!(f, "{n}"),
            Self::Float(x) => match serde_json::Number::from_f64(x) {
                Some(n) => write!(f, "{n}"),
                None => write!(f, "{x}"),
            },
        }
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Self::PosInt(n)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        match u64::try_from(n) {
            Ok(n) => Self::PosInt(n),
            Err(_) => Self::NegInt(n),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Self::from(i64::from(n))
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Self::PosInt(u64::from(n))
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(n) = n.as_u64() {
            Self::PosInt(n)
        } else if let Some(n) = n.as_i64() {
            Self::NegInt(n)
        } else {
            // serde_json only produces finite floats.
            Self::Float(n.as_f64().unwrap_or_default())
        }
    }
}

impl From<Number> for serde_json::Value {
    fn from(n: Number) -> Self {
        match n {
            Number::PosInt(n) => serde_json::Value::Number(n.into()),
            Number::NegInt(n) => serde_json::Value::Number(n.into()),
            Number::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
        }
    }
}
