//! Argument values captured at instrumentation sites.
//!
//! Instrumented code hands the harness `(actual, expected)` pairs built from
//! ordinary Rust values. Each side is converted into an [`ArgValue`] so that
//! the guard in [`crate::Harness::register_if_match`] can compare values of
//! different integer widths or float precisions without reflection.

use std::fmt;

/// A width-agnostic argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Absent value. Never matches anything, itself included.
    Null,
    /// Any signed or unsigned integer that fits in 64 signed bits.
    Integer(i64),
    /// Any floating-point value. `value` is widened to 64 bits for guard
    /// comparison; `text` keeps the source precision for reports.
    Float { value: f64, text: String },
    /// A fixed-size integer sequence.
    IntArray(Vec<i64>),
    /// Everything else, compared by its textual form.
    Other(String),
}

impl ArgValue {
    /// Guard equality used by conditional registration.
    ///
    /// Null never matches. Integers compare after widening, floats compare
    /// with IEEE `==` after widening, integer sequences compare element-wise,
    /// and everything else compares by text. Values of different kinds never
    /// match (an integer `1` does not match a float `1.0`).
    ///
    /// `bool`, `char` and string values all land in [`ArgValue::Other`], so
    /// they compare by their text alone: `'l'` matches `"l"` and `true`
    /// matches `"true"`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float { value: a, .. }, Self::Float { value: b, .. }) => a == b,
            (Self::IntArray(a), Self::IntArray(b)) => a == b,
            (Self::Other(a), Self::Other(b)) => a == b,
            _ => false,
        }
    }

    /// Returns true for [`ArgValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float { text, .. } => f.write_str(text),
            Self::IntArray(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Self::Other(text) => f.write_str(text),
        }
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ArgValue {
                fn from(value: $ty) -> Self {
                    Self::Integer(i64::from(value))
                }
            }

            impl From<&[$ty]> for ArgValue {
                fn from(values: &[$ty]) -> Self {
                    Self::IntArray(values.iter().copied().map(i64::from).collect())
                }
            }

            impl From<Vec<$ty>> for ArgValue {
                fn from(values: Vec<$ty>) -> Self {
                    Self::from(values.as_slice())
                }
            }

            impl From<&Vec<$ty>> for ArgValue {
                fn from(values: &Vec<$ty>) -> Self {
                    Self::from(values.as_slice())
                }
            }

            impl<const N: usize> From<[$ty; N]> for ArgValue {
                fn from(values: [$ty; N]) -> Self {
                    Self::from(values.as_slice())
                }
            }

            impl<const N: usize> From<&[$ty; N]> for ArgValue {
                fn from(values: &[$ty; N]) -> Self {
                    Self::from(values.as_slice())
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ArgValue {
                fn from(value: $ty) -> Self {
                    i64::try_from(value).map_or_else(|_| Self::Other(value.to_string()), Self::Integer)
                }
            }
        )*
    };
}

impl_from_wide_integer!(u64, isize, usize);

// Debug keeps the trailing `.0` on whole floats and prints the shortest
// text that round-trips at the source width.
impl From<f32> for ArgValue {
    fn from(value: f32) -> Self {
        Self::Float {
            value: f64::from(value),
            text: format!("{value:?}"),
        }
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float {
            value,
            text: format!("{value:?}"),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Other(value.to_string())
    }
}

impl From<char> for ArgValue {
    fn from(value: char) -> Self {
        Self::Other(value.to_string())
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Other(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Other(value)
    }
}

impl From<&String> for ArgValue {
    fn from(value: &String) -> Self {
        Self::Other(value.clone())
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One `(actual, expected)` guard pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The value the instrumented method actually received.
    pub actual: ArgValue,
    /// The value that activates the expectation.
    pub expected: ArgValue,
}

impl Condition {
    /// Build a condition from any two convertible values.
    #[must_use]
    pub fn new(actual: impl Into<ArgValue>, expected: impl Into<ArgValue>) -> Self {
        Self {
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    /// True when the actual value activates this guard.
    #[must_use]
    pub fn holds(&self) -> bool {
        self.actual.matches(&self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_match_across_widths() {
        assert!(ArgValue::from(5_i8).matches(&ArgValue::from(5_i64)));
        assert!(ArgValue::from(5_u16).matches(&ArgValue::from(5_i32)));
        assert!(ArgValue::from(-3_i16).matches(&ArgValue::from(-3_i64)));
        assert!(!ArgValue::from(5_i8).matches(&ArgValue::from(6_i64)));
    }

    #[test]
    fn floats_match_across_precisions() {
        assert!(ArgValue::from(1.5_f32).matches(&ArgValue::from(1.5_f64)));
        assert!(ArgValue::from(3.0_f64).matches(&ArgValue::from(3.0_f32)));
        // 0.61 is not representable exactly in f32, so the widened value differs.
        assert!(!ArgValue::from(0.61_f32).matches(&ArgValue::from(0.61_f64)));
        assert!(!ArgValue::from(f64::NAN).matches(&ArgValue::from(f64::NAN)));
    }

    #[test]
    fn integer_never_matches_float() {
        assert!(!ArgValue::from(1_i32).matches(&ArgValue::from(1.0_f64)));
        assert!(!ArgValue::from(1.0_f32).matches(&ArgValue::from(1_i64)));
    }

    #[test]
    fn null_never_matches() {
        assert!(!ArgValue::Null.matches(&ArgValue::Null));
        assert!(!ArgValue::Null.matches(&ArgValue::from(0_i32)));
        assert!(!ArgValue::from("x").matches(&ArgValue::from(None::<&str>)));
    }

    #[test]
    fn int_arrays_compare_elementwise() {
        let a = ArgValue::from([2_i32, 2, 2]);
        assert!(a.matches(&ArgValue::from(vec![2_i64, 2, 2])));
        assert!(!a.matches(&ArgValue::from([2_i32, 2])));
        assert!(!a.matches(&ArgValue::from([2_i32, 2, 3])));
    }

    #[test]
    fn other_values_compare_by_text() {
        assert!(ArgValue::from("hello").matches(&ArgValue::from(String::from("hello"))));
        assert!(ArgValue::from('l').matches(&ArgValue::from("l")));
        assert!(ArgValue::from(true).matches(&ArgValue::from(true)));
        assert!(!ArgValue::from(true).matches(&ArgValue::from(false)));
    }

    #[test]
    fn oversized_unsigned_falls_back_to_text() {
        assert_eq!(ArgValue::from(u64::MAX), ArgValue::Other(u64::MAX.to_string()));
        assert_eq!(ArgValue::from(7_usize), ArgValue::Integer(7));
    }

    #[test]
    fn display_forms() {
        assert_eq!(ArgValue::from(57_i8).to_string(), "57");
        assert_eq!(ArgValue::from(3.0_f64).to_string(), "3.0");
        assert_eq!(ArgValue::from(1.0_f32).to_string(), "1.0");
        assert_eq!(ArgValue::from([5_i32, 7, 13, 29]).to_string(), "[5, 7, 13, 29]");
        assert_eq!(ArgValue::from(Vec::<i32>::new()).to_string(), "[]");
        assert_eq!(ArgValue::Null.to_string(), "null");
        assert_eq!(ArgValue::from("hello").to_string(), "hello");
    }

    #[test]
    fn narrow_float_displays_at_source_precision() {
        let narrow = ArgValue::from(0.61_f32);
        assert_eq!(narrow.to_string(), "0.61");
        // Comparison still uses the widened value.
        assert!(narrow.matches(&ArgValue::from(0.61_f32)));
        assert!(!narrow.matches(&ArgValue::from(0.61_f64)));
    }

    #[test]
    fn condition_holds_only_on_match() {
        assert!(Condition::new(2_i32, 2_i64).holds());
        assert!(!Condition::new(2_i32, 3_i64).holds());
        assert!(!Condition::new(None::<i32>, None::<i32>).holds());
    }
}
