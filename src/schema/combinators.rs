//! Schema composition: `allOf`, `anyOf`, `oneOf` and `not`.
//!
//! A combinator sees the value as filtered by the keywords that precede it
//! in the same schema object. `allOf` threads the output through every
//! branch; `anyOf` and `oneOf` return the output of the branch that
//! accepted.

use serde_json::Value;

use crate::error::{repr_value, SchemaDefinitionError, Violation};
use crate::path::InstancePath;
use crate::validation::ValidationContext;

use super::{Collector, Keywords, SchemaNode};

#[derive(Debug)]
pub(crate) struct Negation {
    document: Value,
    schema: SchemaNode,
}

/// One combinator keyword of a schema object.
#[derive(Debug)]
pub(crate) enum Combinator {
    AllOf(Vec<SchemaNode>),
    AnyOf(Vec<SchemaNode>),
    OneOf(Vec<SchemaNode>),
    Not(Negation),
}

impl Combinator {
    pub(crate) fn compile(
        keyword: &str,
        keywords: &Keywords<'_>,
    ) -> Result<Option<Self>, SchemaDefinitionError> {
        let combinator = match keyword {
            "allOf" => keywords.schema_list(keyword)?.map(Combinator::AllOf),
            "anyOf" => keywords.schema_list(keyword)?.map(Combinator::AnyOf),
            "oneOf" => keywords.schema_list(keyword)?.map(Combinator::OneOf),
            "not" => match (keywords.get(keyword), keywords.schema(keyword)?) {
                (Some(document), Some(schema)) => Some(Combinator::Not(Negation {
                    document: document.clone(),
                    schema,
                })),
                _ => None,
            },
            _ => None,
        };
        Ok(combinator)
    }

    pub(crate) fn apply(
        &self,
        value: Value,
        path: &InstancePath,
        ctx: &ValidationContext,
        errors: &mut Collector,
    ) -> Value {
        match self {
            Combinator::AllOf(schemas) => {
                let mut output = value;
                for schema in schemas {
                    if let Some(accepted) = errors.absorb(schema.validate(&output, path, ctx)) {
                        output = accepted;
                    }
                }
                output
            }
            Combinator::AnyOf(schemas) => {
                let accepted = schemas
                    .iter()
                    .find_map(|schema| schema.validate(&value, path, ctx).into_result().ok());
                match accepted {
                    Some(accepted) => accepted,
                    None => {
                        errors.push(no_match(&value, path, "anyOf"));
                        value
                    }
                }
            }
            Combinator::OneOf(schemas) => {
                let mut accepted: Vec<Value> = schemas
                    .iter()
                    .filter_map(|schema| schema.validate(&value, path, ctx).into_result().ok())
                    .collect();
                match accepted.len() {
                    0 => {
                        errors.push(no_match(&value, path, "oneOf"));
                        value
                    }
                    1 => accepted.remove(0),
                    n => {
                        errors.push(Violation::new(
                            path.clone(),
                            value.clone(),
                            "oneOf",
                            format!("{} is valid under each of {} schemas", repr_value(&value), n),
                        ));
                        value
                    }
                }
            }
            Combinator::Not(negation) => {
                if negation.schema.is_valid(&value, path, ctx) {
                    errors.push(Violation::new(
                        path.clone(),
                        value.clone(),
                        "not",
                        format!(
                            "{} should not be valid under {}",
                            repr_value(&value),
                            negation.document
                        ),
                    ));
                }
                value
            }
        }
    }
}

fn no_match(value: &Value, path: &InstancePath, keyword: &'static str) -> Violation {
    Violation::new(
        path.clone(),
        value.clone(),
        keyword,
        format!("{} is not valid under any of the given schemas", repr_value(value)),
    )
}
