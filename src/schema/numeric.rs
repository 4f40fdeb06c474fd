//! Numeric keywords: bounds and `multipleOf`.
//!
//! `minimum` and `maximum` first coerce the instance: JSON numbers are used
//! as-is and strings are parsed as an integer, then as a float. Values that do
//! not coerce skip the bound entirely and are left to the `type` keyword, so
//! `{"type": ["integer", "string"], "minimum": 1}` accepts `"10"` and rejects
//! `"0"`. Floats that overflow (`"1e999"`, `"inf"`) keep their infinite value
//! and fail the bound they exceed.
//!
//! `exclusiveMinimum`, `exclusiveMaximum` and `multipleOf` only constrain
//! JSON numbers.

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Number, Value};

use crate::error::{SchemaDefinitionError, Violation};
use crate::path::InstancePath;

use super::Keywords;

/// One numeric keyword of a schema object.
#[derive(Debug, Clone)]
pub(crate) enum NumericRule {
    Minimum(Number),
    Maximum(Number),
    ExclusiveMinimum(Number),
    ExclusiveMaximum(Number),
    MultipleOf(Number),
}

impl NumericRule {
    pub(crate) fn compile(
        keyword: &str,
        keywords: &Keywords<'_>,
    ) -> Result<Option<Self>, SchemaDefinitionError> {
        let Some(bound) = keywords.number(keyword)? else {
            return Ok(None);
        };
        let rule = match keyword {
            "minimum" => NumericRule::Minimum(bound),
            "maximum" => NumericRule::Maximum(bound),
            "exclusiveMinimum" => NumericRule::ExclusiveMinimum(bound),
            "exclusiveMaximum" => NumericRule::ExclusiveMaximum(bound),
            "multipleOf" => {
                if bound.as_f64().map(|d| d <= 0.0).unwrap_or(true) {
                    return Err(keywords.invalid("multipleOf", "must be greater than 0"));
                }
                NumericRule::MultipleOf(bound)
            }
            _ => return Ok(None),
        };
        Ok(Some(rule))
    }

    pub(crate) fn check(&self, value: &Value, path: &InstancePath) -> Option<Violation> {
        let violation = |keyword: &'static str, message: String| {
            Some(Violation::new(path.clone(), value.clone(), keyword, message))
        };

        match self {
            NumericRule::Minimum(min) => {
                let n = coerce_number(value)?;
                if n.compare(min) == Some(Ordering::Less) {
                    violation("minimum", format!("{} is less than the minimum of {}", n, min))
                } else {
                    None
                }
            }
            NumericRule::Maximum(max) => {
                let n = coerce_number(value)?;
                if n.compare(max) == Some(Ordering::Greater) {
                    violation("maximum", format!("{} is greater than the maximum of {}", n, max))
                } else {
                    None
                }
            }
            NumericRule::ExclusiveMinimum(min) => {
                let Value::Number(n) = value else {
                    return None;
                };
                if compare(n, min) != Some(Ordering::Greater) {
                    violation(
                        "exclusiveMinimum",
                        format!("{} is less than or equal to the minimum of {}", n, min),
                    )
                } else {
                    None
                }
            }
            NumericRule::ExclusiveMaximum(max) => {
                let Value::Number(n) = value else {
                    return None;
                };
                if compare(n, max) != Some(Ordering::Less) {
                    violation(
                        "exclusiveMaximum",
                        format!("{} is greater than or equal to the maximum of {}", n, max),
                    )
                } else {
                    None
                }
            }
            NumericRule::MultipleOf(divisor) => {
                let Value::Number(n) = value else {
                    return None;
                };
                if is_multiple_of(n, divisor) {
                    None
                } else {
                    violation("multipleOf", format!("{} is not a multiple of {}", n, divisor))
                }
            }
        }
    }
}

/// An instance read as a number for `minimum`/`maximum`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Coerced {
    Number(Number),
    /// A parsed float JSON cannot represent: an infinity or NaN.
    NonFinite(f64),
}

impl Coerced {
    fn compare(&self, bound: &Number) -> Option<Ordering> {
        match self {
            Coerced::Number(n) => compare(n, bound),
            Coerced::NonFinite(x) => x.partial_cmp(&bound.as_f64()?),
        }
    }
}

impl fmt::Display for Coerced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coerced::Number(n) => n.fmt(f),
            Coerced::NonFinite(x) if x.is_nan() => f.write_str("nan"),
            Coerced::NonFinite(x) => x.fmt(f),
        }
    }
}

/// Interprets a value as a number for bound checks.
///
/// Numbers are returned unchanged. Strings are trimmed and parsed as an
/// integer, then as a float. Everything else, booleans included, yields
/// `None`.
pub(crate) fn coerce_number(value: &Value) -> Option<Coerced> {
    match value {
        Value::Number(n) => Some(Coerced::Number(n.clone())),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(i) = text.parse::<i64>() {
                Some(Coerced::Number(Number::from(i)))
            } else if let Ok(u) = text.parse::<u64>() {
                Some(Coerced::Number(Number::from(u)))
            } else {
                let x = text.parse::<f64>().ok()?;
                Some(
                    Number::from_f64(x)
                        .map(Coerced::Number)
                        .unwrap_or(Coerced::NonFinite(x)),
                )
            }
        }
        _ => None,
    }
}

fn compare(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

fn is_multiple_of(n: &Number, divisor: &Number) -> bool {
    if let (Some(x), Some(d)) = (n.as_i64(), divisor.as_i64()) {
        return d != 0 && x % d == 0;
    }
    match (n.as_f64(), divisor.as_f64()) {
        (Some(x), Some(d)) => {
            let quotient = x / d;
            quotient.is_finite() && quotient.trunc() == quotient
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(n: i64) -> Coerced {
        Coerced::Number(Number::from(n))
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(5)), Some(number(5)));
        assert_eq!(coerce_number(&json!(" 10 ")), Some(number(10)));
        assert_eq!(
            coerce_number(&json!("2.5")),
            Number::from_f64(2.5).map(Coerced::Number)
        );
        assert_eq!(coerce_number(&json!("-3")), Some(number(-3)));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!(null)), None);
    }

    #[test]
    fn test_overflowing_floats_stay_infinite() {
        assert_eq!(coerce_number(&json!("inf")), Some(Coerced::NonFinite(f64::INFINITY)));
        assert_eq!(coerce_number(&json!("1e999")), Some(Coerced::NonFinite(f64::INFINITY)));
        assert_eq!(
            coerce_number(&json!("-Infinity")),
            Some(Coerced::NonFinite(f64::NEG_INFINITY))
        );
        assert_eq!(Coerced::NonFinite(f64::INFINITY).to_string(), "inf");
        assert_eq!(Coerced::NonFinite(f64::NEG_INFINITY).to_string(), "-inf");
    }

    #[test]
    fn test_compare_mixed_representations() {
        let one = Number::from(1);
        let one_and_half = Number::from_f64(1.5).unwrap();
        assert_eq!(compare(&one, &one_and_half), Some(Ordering::Less));
        assert_eq!(compare(&Number::from(u64::MAX), &one), Some(Ordering::Greater));
        assert_eq!(compare(&Number::from(-1), &Number::from(u64::MAX)), Some(Ordering::Less));
    }

    #[test]
    fn test_multiple_of() {
        assert!(is_multiple_of(&Number::from(10), &Number::from(5)));
        assert!(!is_multiple_of(&Number::from(7), &Number::from(5)));
        let half = Number::from_f64(0.5).unwrap();
        assert!(is_multiple_of(&Number::from_f64(2.5).unwrap(), &half));
        assert!(!is_multiple_of(&Number::from_f64(2.3).unwrap(), &half));
    }

    #[test]
    fn test_bound_violation_renders_coerced_value() {
        let path = InstancePath::root().push_key("size");
        let violation = NumericRule::Minimum(Number::from(1))
            .check(&json!("0"), &path)
            .unwrap();
        assert_eq!(violation.message, "0 is less than the minimum of 1");
        assert_eq!(violation.instance, json!("0"));
    }

    #[test]
    fn test_infinite_strings_fail_bounds() {
        let path = InstancePath::root();
        let maximum = NumericRule::Maximum(Number::from(10));
        let violation = maximum.check(&json!("1e999"), &path).unwrap();
        assert_eq!(violation.message, "inf is greater than the maximum of 10");

        let minimum = NumericRule::Minimum(Number::from(0));
        let violation = minimum.check(&json!("-inf"), &path).unwrap();
        assert_eq!(violation.message, "-inf is less than the minimum of 0");

        assert!(maximum.check(&json!("nan"), &path).is_none());
    }

    #[test]
    fn test_uncoercible_skips_bound() {
        let path = InstancePath::root();
        let minimum = NumericRule::Minimum(Number::from(1));
        assert!(minimum.check(&json!("abc"), &path).is_none());
        assert!(minimum.check(&json!(false), &path).is_none());
    }

    #[test]
    fn test_exclusive_bounds_only_constrain_numbers() {
        let path = InstancePath::root();
        let min = NumericRule::ExclusiveMinimum(Number::from(0));
        let violation = min.check(&json!(0), &path).unwrap();
        assert_eq!(violation.message, "0 is less than or equal to the minimum of 0");
        assert!(min.check(&json!(1), &path).is_none());
        assert!(min.check(&json!("0"), &path).is_none());

        let max = NumericRule::ExclusiveMaximum(Number::from(10));
        let violation = max.check(&json!(10), &path).unwrap();
        assert_eq!(violation.message, "10 is greater than or equal to the maximum of 10");
        assert!(max.check(&json!("10"), &path).is_none());
    }
}
