//! String keywords: length bounds, `pattern` and `format`.
//!
//! Lengths count Unicode scalar values, not bytes. `pattern` is a search,
//! not a full match: anchor it with `^...$` to constrain the whole string.

use regex::Regex;
use serde_json::Value;

use crate::error::{repr_value, SchemaDefinitionError, Violation};
use crate::format::{FormatFailure, ResolvedFormat};
use crate::path::InstancePath;

use super::Keywords;

/// One string keyword of a schema object.
#[derive(Debug, Clone)]
pub(crate) enum StringRule {
    MinLength(usize),
    MaxLength(usize),
    Pattern { regex: Regex, pattern_str: String },
    Format(ResolvedFormat),
}

impl StringRule {
    pub(crate) fn compile(
        keyword: &str,
        keywords: &Keywords<'_>,
    ) -> Result<Option<Self>, SchemaDefinitionError> {
        let rule = match keyword {
            "minLength" => keywords.non_negative_integer(keyword)?.map(StringRule::MinLength),
            "maxLength" => keywords.non_negative_integer(keyword)?.map(StringRule::MaxLength),
            "pattern" => match keywords.string(keyword)? {
                Some(pattern) => Some(StringRule::Pattern {
                    regex: compile_pattern(pattern, &keywords.child(&["pattern"]))?,
                    pattern_str: pattern.to_string(),
                }),
                None => None,
            },
            "format" => keywords.string(keyword)?.and_then(|name| {
                let format = keywords.formats().resolve(name);
                if format.is_none() {
                    tracing::trace!(
                        format = name,
                        location = keywords.location(),
                        "ignoring unknown format"
                    );
                }
                format.map(StringRule::Format)
            }),
            _ => None,
        };
        Ok(rule)
    }

    pub(crate) fn check(&self, value: &Value, path: &InstancePath) -> Option<Violation> {
        // Formats decide for themselves what to do with non-strings.
        if let StringRule::Format(format) = self {
            return match format.check(value) {
                Ok(()) => None,
                Err(FormatFailure::InvalidName { reason }) => Some(Violation::invalid_name(
                    path.clone(),
                    value.clone(),
                    format.name(),
                    reason,
                )),
                Err(FormatFailure::Mismatch) => Some(Violation::new(
                    path.clone(),
                    value.clone(),
                    "format",
                    format!("{} is not a '{}'", repr_value(value), format.name()),
                )),
            };
        }

        let s = value.as_str()?;
        let violation = |keyword: &'static str, message: String| {
            Some(Violation::new(path.clone(), value.clone(), keyword, message))
        };

        match self {
            StringRule::MinLength(min) if s.chars().count() < *min => {
                violation("minLength", format!("{} is too short", repr_value(value)))
            }
            StringRule::MaxLength(max) if s.chars().count() > *max => {
                violation("maxLength", format!("{} is too long", repr_value(value)))
            }
            StringRule::Pattern { regex, pattern_str } if !regex.is_match(s) => violation(
                "pattern",
                format!("{} does not match '{}'", repr_value(value), pattern_str),
            ),
            _ => None,
        }
    }
}

/// Compiles a schema-supplied regular expression.
pub(crate) fn compile_pattern(
    pattern: &str,
    location: &str,
) -> Result<Regex, SchemaDefinitionError> {
    Regex::new(pattern).map_err(|source| SchemaDefinitionError::InvalidPattern {
        location: location.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}
