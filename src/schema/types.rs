//! The `type` keyword.

use serde_json::Value;

use crate::error::SchemaDefinitionError;

/// A JSON-schema primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InstanceType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    Integer,
    String,
}

impl InstanceType {
    fn parse(name: &str, location: &str) -> Result<Self, SchemaDefinitionError> {
        match name {
            "null" => Ok(InstanceType::Null),
            "boolean" => Ok(InstanceType::Boolean),
            "object" => Ok(InstanceType::Object),
            "array" => Ok(InstanceType::Array),
            "number" => Ok(InstanceType::Number),
            "integer" => Ok(InstanceType::Integer),
            "string" => Ok(InstanceType::String),
            other => Err(SchemaDefinitionError::UnknownType {
                location: location.to_string(),
                name: other.to_string(),
            }),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            InstanceType::Null => "null",
            InstanceType::Boolean => "boolean",
            InstanceType::Object => "object",
            InstanceType::Array => "array",
            InstanceType::Number => "number",
            InstanceType::Integer => "integer",
            InstanceType::String => "string",
        }
    }

    /// Integers include floats without a fractional part (`1.0`).
    pub(crate) fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (InstanceType::Null, Value::Null) => true,
            (InstanceType::Boolean, Value::Bool(_)) => true,
            (InstanceType::Object, Value::Object(_)) => true,
            (InstanceType::Array, Value::Array(_)) => true,
            (InstanceType::Number, Value::Number(_)) => true,
            (InstanceType::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
            }
            (InstanceType::String, Value::String(_)) => true,
            _ => false,
        }
    }
}

/// The set of types a value may have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeSet(Vec<InstanceType>);

impl TypeSet {
    pub(crate) fn compile(keyword: &Value, location: &str) -> Result<Self, SchemaDefinitionError> {
        let types = match keyword {
            Value::String(name) => vec![InstanceType::parse(name, location)?],
            Value::Array(names) if !names.is_empty() => names
                .iter()
                .map(|name| match name.as_str() {
                    Some(name) => InstanceType::parse(name, location),
                    None => Err(SchemaDefinitionError::keyword(
                        location,
                        "type",
                        "entries must be strings",
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(SchemaDefinitionError::keyword(
                    location,
                    "type",
                    "must be a string or a non-empty array of strings",
                ))
            }
        };
        Ok(Self(types))
    }

    pub(crate) fn matches(&self, value: &Value) -> bool {
        self.0.iter().any(|t| t.matches(value))
    }

    /// `'integer', 'string'`
    pub(crate) fn describe(&self) -> String {
        self.0
            .iter()
            .map(|t| format!("'{}'", t.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
