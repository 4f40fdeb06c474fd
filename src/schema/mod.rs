//! Compiled JSON-schema documents.
//!
//! A schema document is plain JSON. [`CompiledSchema::compile`] turns it into
//! a tree of keyword rules once, resolving `format` names against a
//! [`FormatRegistry`] and compiling every regular expression, so that a
//! malformed document is reported up front as a
//! [`SchemaDefinitionError`] and never during a request.
//!
//! Validation is a pure transform: it returns the accepted value, which may
//! differ from the input when lenient additional-properties handling strips
//! undeclared keys.
//!
//! # Example
//!
//! ```rust
//! use schemagate::format::FormatRegistry;
//! use schemagate::{CompiledSchema, ValidationContext, ValidatorConfig};
//! use serde_json::json;
//!
//! let formats = FormatRegistry::standard(&ValidatorConfig::default()).unwrap();
//! let schema = CompiledSchema::compile(
//!     &json!({
//!         "type": "object",
//!         "properties": {"size": {"type": ["integer", "string"], "minimum": 1}},
//!         "required": ["size"],
//!     }),
//!     &formats,
//! )
//! .unwrap();
//!
//! assert!(schema.validate(&json!({"size": "10"}), &ValidationContext::default()).is_success());
//! assert!(schema.validate(&json!({"size": "0"}), &ValidationContext::default()).is_failure());
//! ```

mod array;
mod combinators;
mod numeric;
mod object;
mod string;
mod types;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use stillwater::{Semigroup, Validation};

use crate::error::{repr_value, SchemaDefinitionError, Violation, Violations};
use crate::format::FormatRegistry;
use crate::path::InstancePath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use array::ArrayRule;
use combinators::Combinator;
use numeric::NumericRule;
use object::{Declared, ObjectRule};
use string::StringRule;
use types::TypeSet;

/// A schema document compiled for validation.
///
/// Compiled schemas are immutable and `Send + Sync`; compile each document
/// once at startup and share it.
#[derive(Debug)]
pub struct CompiledSchema {
    document: Value,
    root: SchemaNode,
}

impl CompiledSchema {
    /// Compiles `document`, resolving formats against `formats`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaDefinitionError`] naming the offending location if
    /// the document is not a well-formed schema.
    pub fn compile(
        document: &Value,
        formats: &FormatRegistry,
    ) -> Result<Self, SchemaDefinitionError> {
        let root = SchemaNode::compile(document, "#", formats)?;
        Ok(Self {
            document: document.clone(),
            root,
        })
    }

    /// Validates `value`, returning the accepted value or every violation in
    /// evaluation order.
    pub fn validate(&self, value: &Value, ctx: &ValidationContext) -> ValidationResult<Value> {
        self.root.validate(value, &InstancePath::root(), ctx)
    }

    /// The source document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Drops top-level keys the schema neither declares in `properties` nor
    /// matches with a `patternProperties` pattern, provided the schema allows
    /// additional properties at all.
    ///
    /// Query strings are open-ended for older API versions; this keeps
    /// unexpected parameters from reaching the handler without rejecting the
    /// request.
    pub fn strip_undeclared(&self, value: Value) -> Value {
        match (&self.root, value) {
            (SchemaNode::Rules(rules), Value::Object(map))
                if rules.allows_additional_properties() =>
            {
                Value::Object(rules.declared.retain(map))
            }
            (_, value) => value,
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<CompiledSchema>();
    assert_sync::<CompiledSchema>();
};

/// One node of a compiled schema tree.
#[derive(Debug)]
pub(crate) enum SchemaNode {
    /// `true` or `{}`.
    Accept,
    /// `false`.
    Reject,
    Rules(Box<Rules>),
}

/// One compiled keyword.
#[derive(Debug)]
enum Keyword {
    Type(TypeSet),
    Enum(Vec<Value>),
    Const(Value),
    String(StringRule),
    Numeric(NumericRule),
    Object(ObjectRule),
    Array(ArrayRule),
    Combinator(Combinator),
}

/// The keywords of a schema object, in document order.
#[derive(Debug)]
pub(crate) struct Rules {
    keywords: Vec<Keyword>,
    declared: Declared,
}

impl SchemaNode {
    pub(crate) fn compile(
        document: &Value,
        location: &str,
        formats: &FormatRegistry,
    ) -> Result<Self, SchemaDefinitionError> {
        let map = match document {
            Value::Bool(true) => return Ok(SchemaNode::Accept),
            Value::Bool(false) => return Ok(SchemaNode::Reject),
            Value::Object(map) if map.is_empty() => return Ok(SchemaNode::Accept),
            Value::Object(map) => map,
            _ => {
                return Err(SchemaDefinitionError::NotASchema {
                    location: location.to_string(),
                })
            }
        };

        let keywords = Keywords::new(map, location, formats);
        let declared = Declared::compile(&keywords)?;
        let mut compiled = Vec::with_capacity(map.len());

        for (name, document) in map {
            let keyword = match name.as_str() {
                "type" => Some(Keyword::Type(TypeSet::compile(document, location)?)),
                "enum" => match document {
                    Value::Array(values) => Some(Keyword::Enum(values.clone())),
                    _ => return Err(keywords.invalid("enum", "must be an array")),
                },
                "const" => Some(Keyword::Const(document.clone())),
                "minLength" | "maxLength" | "pattern" | "format" => {
                    StringRule::compile(name, &keywords)?.map(Keyword::String)
                }
                "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum"
                | "multipleOf" => NumericRule::compile(name, &keywords)?.map(Keyword::Numeric),
                "properties" | "patternProperties" | "additionalProperties" | "required"
                | "minProperties" | "maxProperties" => {
                    ObjectRule::compile(name, &keywords, &declared)?.map(Keyword::Object)
                }
                "prefixItems" | "items" | "additionalItems" | "minItems" | "maxItems"
                | "uniqueItems" => ArrayRule::compile(name, &keywords)?.map(Keyword::Array),
                "allOf" | "anyOf" | "oneOf" | "not" => {
                    Combinator::compile(name, &keywords)?.map(Keyword::Combinator)
                }
                _ => None,
            };
            compiled.extend(keyword);
        }

        Ok(SchemaNode::Rules(Box::new(Rules {
            keywords: compiled,
            declared,
        })))
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        path: &InstancePath,
        ctx: &ValidationContext,
    ) -> Validation<Value, Violations> {
        match self {
            SchemaNode::Accept => Validation::Success(value.clone()),
            SchemaNode::Reject => Validation::Failure(Violations::single(Violation::new(
                path.clone(),
                value.clone(),
                "false",
                format!("False schema does not allow {}", repr_value(value)),
            ))),
            SchemaNode::Rules(rules) => rules.validate(value, path, ctx),
        }
    }

    pub(crate) fn is_valid(
        &self,
        value: &Value,
        path: &InstancePath,
        ctx: &ValidationContext,
    ) -> bool {
        self.validate(value, path, ctx).is_success()
    }
}

impl Rules {
    /// Keywords run in the order the document declares them, each seeing the
    /// output of the ones before.
    fn validate(
        &self,
        value: &Value,
        path: &InstancePath,
        ctx: &ValidationContext,
    ) -> Validation<Value, Violations> {
        let mut errors = Collector::default();
        let mut output = value.clone();

        for keyword in &self.keywords {
            output = match keyword {
                Keyword::Type(types) => {
                    if !types.matches(&output) {
                        errors.push(Violation::new(
                            path.clone(),
                            output.clone(),
                            "type",
                            format!("{} is not of type {}", repr_value(&output), types.describe()),
                        ));
                    }
                    output
                }
                Keyword::Enum(allowed) => {
                    if !allowed.iter().any(|candidate| json_equal(candidate, &output)) {
                        errors.push(Violation::new(
                            path.clone(),
                            output.clone(),
                            "enum",
                            format!(
                                "{} is not one of {}",
                                repr_value(&output),
                                Value::Array(allowed.clone())
                            ),
                        ));
                    }
                    output
                }
                Keyword::Const(expected) => {
                    if !json_equal(expected, &output) {
                        errors.push(Violation::new(
                            path.clone(),
                            output.clone(),
                            "const",
                            format!("{} was expected", repr_value(expected)),
                        ));
                    }
                    output
                }
                Keyword::String(rule) => {
                    errors.extend(rule.check(&output, path));
                    output
                }
                Keyword::Numeric(rule) => {
                    errors.extend(rule.check(&output, path));
                    output
                }
                Keyword::Object(rule) => rule.apply(output, &self.declared, path, ctx, &mut errors),
                Keyword::Array(rule) => rule.apply(output, path, ctx, &mut errors),
                Keyword::Combinator(rule) => rule.apply(output, path, ctx, &mut errors),
            };
        }

        errors.finish(output)
    }

    fn allows_additional_properties(&self) -> bool {
        self.keywords.iter().all(|keyword| match keyword {
            Keyword::Object(rule) => rule.allows_additional_properties(),
            _ => true,
        })
    }
}

/// Accumulates the violations of one schema object's keywords.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    violations: Option<Violations>,
}

impl Collector {
    pub(crate) fn push(&mut self, violation: Violation) {
        self.merge(Violations::single(violation));
    }

    fn extend(&mut self, violation: Option<Violation>) {
        if let Some(violation) = violation {
            self.push(violation);
        }
    }

    fn merge(&mut self, more: Violations) {
        self.violations = Some(match self.violations.take() {
            Some(violations) => violations.combine(more),
            None => more,
        });
    }

    /// Keeps the violations of a failed child validation, returning the
    /// child's output when it succeeded.
    pub(crate) fn absorb(&mut self, result: Validation<Value, Violations>) -> Option<Value> {
        match result {
            Validation::Success(value) => Some(value),
            Validation::Failure(violations) => {
                self.merge(violations);
                None
            }
        }
    }

    fn finish(self, output: Value) -> Validation<Value, Violations> {
        match self.violations {
            Some(violations) => Validation::Failure(violations),
            None => Validation::Success(output),
        }
    }
}

/// JSON equality where numbers compare by value (`1 == 1.0`).
pub(crate) fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).map(|y| json_equal(x, y)).unwrap_or(false))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    match (x.as_i64(), y.as_i64()) {
        (Some(a), Some(b)) => a == b,
        _ => match (x.as_u64(), y.as_u64()) {
            (Some(a), Some(b)) => a == b,
            _ => x.as_f64() == y.as_f64(),
        },
    }
}

/// Read access to the keywords of one schema object during compilation.
pub(crate) struct Keywords<'a> {
    map: &'a Map<String, Value>,
    location: &'a str,
    formats: &'a FormatRegistry,
}

impl<'a> Keywords<'a> {
    fn new(map: &'a Map<String, Value>, location: &'a str, formats: &'a FormatRegistry) -> Self {
        Self {
            map,
            location,
            formats,
        }
    }

    pub(crate) fn get(&self, keyword: &str) -> Option<&'a Value> {
        self.map.get(keyword)
    }

    pub(crate) fn location(&self) -> &str {
        self.location
    }

    pub(crate) fn formats(&self) -> &FormatRegistry {
        self.formats
    }

    pub(crate) fn invalid(&self, keyword: &str, reason: &str) -> SchemaDefinitionError {
        SchemaDefinitionError::keyword(self.location, keyword, reason)
    }

    /// The pointer to a sub-location, e.g. `#/properties/size`.
    pub(crate) fn child(&self, segments: &[&str]) -> String {
        let mut location = self.location.to_string();
        for segment in segments {
            location.push('/');
            location.push_str(&segment.replace('~', "~0").replace('/', "~1"));
        }
        location
    }

    pub(crate) fn non_negative_integer(
        &self,
        keyword: &str,
    ) -> Result<Option<usize>, SchemaDefinitionError> {
        match self.get(keyword) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(keyword, "must be a non-negative integer")),
        }
    }

    pub(crate) fn number(&self, keyword: &str) -> Result<Option<Number>, SchemaDefinitionError> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n.clone())),
            Some(_) => Err(self.invalid(keyword, "must be a number")),
        }
    }

    pub(crate) fn boolean(&self, keyword: &str) -> Result<Option<bool>, SchemaDefinitionError> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(keyword, "must be a boolean")),
        }
    }

    pub(crate) fn string(&self, keyword: &str) -> Result<Option<&'a str>, SchemaDefinitionError> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(keyword, "must be a string")),
        }
    }

    pub(crate) fn schema(
        &self,
        keyword: &str,
    ) -> Result<Option<SchemaNode>, SchemaDefinitionError> {
        self.get(keyword)
            .map(|doc| SchemaNode::compile(doc, &self.child(&[keyword]), self.formats))
            .transpose()
    }

    /// A non-empty array of schemas (`allOf`, `prefixItems`, ...).
    pub(crate) fn schema_list(
        &self,
        keyword: &str,
    ) -> Result<Option<Vec<SchemaNode>>, SchemaDefinitionError> {
        match self.get(keyword) {
            None => Ok(None),
            Some(Value::Array(docs)) if !docs.is_empty() => docs
                .iter()
                .enumerate()
                .map(|(i, doc)| {
                    SchemaNode::compile(doc, &self.child(&[keyword, &i.to_string()]), self.formats)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(self.invalid(keyword, "must be a non-empty array of schemas")),
        }
    }

    /// An object mapping names to schemas (`properties`, `patternProperties`).
    pub(crate) fn schema_map(
        &self,
        keyword: &str,
    ) -> Result<IndexMap<String, SchemaNode>, SchemaDefinitionError> {
        match self.get(keyword) {
            None => Ok(IndexMap::new()),
            Some(Value::Object(docs)) => docs
                .iter()
                .map(|(name, doc)| {
                    SchemaNode::compile(doc, &self.child(&[keyword, name]), self.formats)
                        .map(|node| (name.clone(), node))
                })
                .collect(),
            Some(_) => Err(self.invalid(keyword, "must be an object of schemas")),
        }
    }
}
