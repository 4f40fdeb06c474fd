//! Object keywords, including lenient `additionalProperties` handling.
//!
//! Object validation threads an output value through its keywords: each
//! declared property is replaced by what its subschema accepted, so
//! stripping in nested objects shows up in the returned document.
//!
//! With [`ValidationContext::relax_additional_properties`] set, a falsy
//! `additionalProperties` (`false` or `{}`) no longer rejects undeclared
//! keys. They are dropped from the output instead, unless the schema also
//! declares `patternProperties`, in which case keys matching none of the
//! patterns are reported in a single error.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{repr_value, SchemaDefinitionError, Violation};
use crate::path::InstancePath;
use crate::validation::ValidationContext;

use super::string::compile_pattern;
use super::{Collector, Keywords, SchemaNode};

#[derive(Debug, Clone)]
pub(crate) struct PatternKey {
    pattern: String,
    regex: Regex,
}

/// The keys a schema object declares through `properties` and
/// `patternProperties`. Every other key of an instance is an additional
/// property.
#[derive(Debug, Clone, Default)]
pub(crate) struct Declared {
    names: Vec<String>,
    patterns: Vec<PatternKey>,
}

impl Declared {
    pub(crate) fn compile(keywords: &Keywords<'_>) -> Result<Self, SchemaDefinitionError> {
        let names = match keywords.get("properties") {
            Some(Value::Object(properties)) => properties.keys().cloned().collect(),
            _ => Vec::new(),
        };
        let patterns = match keywords.get("patternProperties") {
            Some(Value::Object(patterns)) => patterns
                .keys()
                .map(|pattern| {
                    let location = keywords.child(&["patternProperties", pattern.as_str()]);
                    Ok(PatternKey {
                        pattern: pattern.clone(),
                        regex: compile_pattern(pattern, &location)?,
                    })
                })
                .collect::<Result<Vec<_>, SchemaDefinitionError>>()?,
            _ => Vec::new(),
        };
        Ok(Self { names, patterns })
    }

    fn covers(&self, key: &str) -> bool {
        self.names.iter().any(|name| name == key)
            || self.patterns.iter().any(|p| p.regex.is_match(key))
    }

    /// Undeclared keys of `map`, sorted.
    fn extras<'m>(&self, map: &'m Map<String, Value>) -> Vec<&'m String> {
        let mut extras: Vec<&String> = map.keys().filter(|key| !self.covers(key)).collect();
        extras.sort();
        extras
    }

    /// Keeps keys declared in `properties` or matched, from their first
    /// character, by a `patternProperties` pattern.
    pub(crate) fn retain(&self, mut map: Map<String, Value>) -> Map<String, Value> {
        map.retain(|key, _| {
            self.names.iter().any(|name| name == key)
                || self
                    .patterns
                    .iter()
                    .any(|p| p.regex.find(key).map(|m| m.start() == 0).unwrap_or(false))
        });
        map
    }
}

/// One object keyword of a schema object.
#[derive(Debug)]
pub(crate) enum ObjectRule {
    Properties(IndexMap<String, SchemaNode>),
    PatternProperties(Vec<(PatternKey, SchemaNode)>),
    AdditionalProperties {
        schema: SchemaNode,
        /// `false` or `{}`.
        falsy: bool,
    },
    Required(Vec<String>),
    MinProperties(usize),
    MaxProperties(usize),
}

impl ObjectRule {
    pub(crate) fn compile(
        keyword: &str,
        keywords: &Keywords<'_>,
        declared: &Declared,
    ) -> Result<Option<Self>, SchemaDefinitionError> {
        let rule = match keyword {
            "properties" => Some(ObjectRule::Properties(keywords.schema_map(keyword)?)),
            "patternProperties" => {
                let schemas = keywords.schema_map(keyword)?;
                Some(ObjectRule::PatternProperties(
                    declared.patterns.iter().cloned().zip(schemas.into_values()).collect(),
                ))
            }
            "additionalProperties" => match keywords.get(keyword) {
                Some(document) => Some(ObjectRule::AdditionalProperties {
                    falsy: is_falsy(document),
                    schema: SchemaNode::compile(
                        document,
                        &keywords.child(&[keyword]),
                        keywords.formats(),
                    )?,
                }),
                None => None,
            },
            "required" => match keywords.get(keyword) {
                Some(Value::Array(names)) => Some(ObjectRule::Required(
                    names
                        .iter()
                        .map(|name| {
                            name.as_str().map(str::to_string).ok_or_else(|| {
                                keywords.invalid(keyword, "must be an array of strings")
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                )),
                Some(_) => return Err(keywords.invalid(keyword, "must be an array of strings")),
                None => None,
            },
            "minProperties" => keywords
                .non_negative_integer(keyword)?
                .map(ObjectRule::MinProperties),
            "maxProperties" => keywords
                .non_negative_integer(keyword)?
                .map(ObjectRule::MaxProperties),
            _ => None,
        };
        Ok(rule)
    }

    /// Applies the keyword to an object instance, returning the (possibly
    /// filtered) output. Non-objects pass through untouched.
    pub(crate) fn apply(
        &self,
        value: Value,
        declared: &Declared,
        path: &InstancePath,
        ctx: &ValidationContext,
        errors: &mut Collector,
    ) -> Value {
        let Value::Object(mut map) = value else {
            return value;
        };

        match self {
            ObjectRule::Properties(properties) => {
                for (name, schema) in properties {
                    let Some(child) = map.get(name) else {
                        continue;
                    };
                    let result = schema.validate(child, &path.push_key(name), ctx);
                    if let Some(accepted) = errors.absorb(result) {
                        map.insert(name.clone(), accepted);
                    }
                }
            }
            ObjectRule::PatternProperties(patterns) => {
                for (key, schema) in patterns {
                    let matching: Vec<String> = map
                        .keys()
                        .filter(|name| key.regex.is_match(name))
                        .cloned()
                        .collect();
                    for name in matching {
                        let child = &map[name.as_str()];
                        let result = schema.validate(child, &path.push_key(&name), ctx);
                        if let Some(accepted) = errors.absorb(result) {
                            map.insert(name, accepted);
                        }
                    }
                }
            }
            ObjectRule::AdditionalProperties { schema, falsy } => {
                apply_additional(schema, *falsy, &mut map, declared, path, ctx, errors);
            }
            ObjectRule::Required(names) => {
                for name in names {
                    if !map.contains_key(name) {
                        errors.push(Violation::new(
                            path.clone(),
                            Value::Object(map.clone()),
                            "required",
                            format!("'{}' is a required property", name),
                        ));
                    }
                }
            }
            ObjectRule::MinProperties(min) if map.len() < *min => {
                let instance = Value::Object(map.clone());
                let message = format!("{} does not have enough properties", instance);
                errors.push(Violation::new(path.clone(), instance, "minProperties", message));
            }
            ObjectRule::MaxProperties(max) if map.len() > *max => {
                let instance = Value::Object(map.clone());
                let message = format!("{} has too many properties", instance);
                errors.push(Violation::new(path.clone(), instance, "maxProperties", message));
            }
            ObjectRule::MinProperties(_) | ObjectRule::MaxProperties(_) => {}
        }

        Value::Object(map)
    }

    /// True unless this is an `additionalProperties` of `false` or `{}`.
    pub(crate) fn allows_additional_properties(&self) -> bool {
        !matches!(self, ObjectRule::AdditionalProperties { falsy: true, .. })
    }
}

fn apply_additional(
    schema: &SchemaNode,
    falsy: bool,
    map: &mut Map<String, Value>,
    declared: &Declared,
    path: &InstancePath,
    ctx: &ValidationContext,
    errors: &mut Collector,
) {
    let extras: Vec<String> = declared.extras(map).into_iter().cloned().collect();
    if extras.is_empty() {
        return;
    }

    if ctx.relax_additional_properties() {
        if !falsy {
            return;
        }
        if declared.patterns.is_empty() {
            tracing::debug!(path = %path, stripped = ?extras, "dropping undeclared properties");
            map.retain(|key, _| !extras.contains(key));
        } else {
            errors.push(unexpected(map, path, &extras));
        }
        return;
    }

    match schema {
        SchemaNode::Reject if declared.patterns.is_empty() => {
            errors.push(unexpected(map, path, &extras));
        }
        SchemaNode::Reject => {
            let verb = if extras.len() == 1 { "does" } else { "do" };
            let mut patterns: Vec<&str> =
                declared.patterns.iter().map(|p| p.pattern.as_str()).collect();
            patterns.sort_unstable();
            errors.push(Violation::new(
                path.clone(),
                Value::Object(map.clone()),
                "additionalProperties",
                format!(
                    "{} {} not match any of the regexes: {}",
                    quote_all(&extras),
                    verb,
                    quote_all(&patterns)
                ),
            ));
        }
        schema => {
            for key in extras {
                let result = schema.validate(&map[key.as_str()], &path.push_key(&key), ctx);
                if let Some(accepted) = errors.absorb(result) {
                    map.insert(key, accepted);
                }
            }
        }
    }
}

fn unexpected(map: &Map<String, Value>, path: &InstancePath, extras: &[String]) -> Violation {
    let verb = if extras.len() == 1 { "was" } else { "were" };
    Violation::new(
        path.clone(),
        Value::Object(map.clone()),
        "additionalProperties",
        format!(
            "Additional properties are not allowed ({} {} unexpected)",
            quote_all(extras),
            verb
        ),
    )
}

fn is_falsy(document: &Value) -> bool {
    match document {
        Value::Bool(b) => !b,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn quote_all<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| repr_value(&Value::String(item.as_ref().to_string())))
        .collect::<Vec<_>>()
        .join(", ")
}
