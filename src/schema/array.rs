//! Array keywords.
//!
//! `items` holding a single schema applies to every element. A positional
//! list (`items: [..]` or `prefixItems`) applies element by element, with the
//! remainder governed by `additionalItems`, or by `items` when `prefixItems`
//! is used. Element checks are evaluated where the positional keyword sits
//! in the document.

use serde_json::Value;

use crate::error::{repr_value, SchemaDefinitionError, Violation};
use crate::path::InstancePath;
use crate::validation::ValidationContext;

use super::{json_equal, Collector, Keywords, SchemaNode};

/// One array keyword of a schema object.
#[derive(Debug)]
pub(crate) enum ArrayRule {
    Elements {
        prefix: Vec<SchemaNode>,
        rest: Option<SchemaNode>,
    },
    MinItems(usize),
    MaxItems(usize),
    UniqueItems,
}

impl ArrayRule {
    pub(crate) fn compile(
        keyword: &str,
        keywords: &Keywords<'_>,
    ) -> Result<Option<Self>, SchemaDefinitionError> {
        let rule = match keyword {
            "prefixItems" => Some(ArrayRule::Elements {
                prefix: keywords.schema_list("prefixItems")?.unwrap_or_default(),
                rest: keywords.schema("items")?,
            }),
            // Folded into `prefixItems` when both are present.
            "items" if keywords.get("prefixItems").is_some() => None,
            "items" => match keywords.get("items") {
                Some(Value::Array(_)) => Some(ArrayRule::Elements {
                    prefix: keywords.schema_list("items")?.unwrap_or_default(),
                    rest: keywords.schema("additionalItems")?,
                }),
                _ => Some(ArrayRule::Elements {
                    prefix: Vec::new(),
                    rest: keywords.schema("items")?,
                }),
            },
            "minItems" => keywords.non_negative_integer(keyword)?.map(ArrayRule::MinItems),
            "maxItems" => keywords.non_negative_integer(keyword)?.map(ArrayRule::MaxItems),
            "uniqueItems" => keywords
                .boolean(keyword)?
                .filter(|unique| *unique)
                .map(|_| ArrayRule::UniqueItems),
            _ => None,
        };
        Ok(rule)
    }

    pub(crate) fn apply(
        &self,
        value: Value,
        path: &InstancePath,
        ctx: &ValidationContext,
        errors: &mut Collector,
    ) -> Value {
        let Value::Array(mut items) = value else {
            return value;
        };

        match self {
            ArrayRule::MinItems(min) if items.len() < *min => {
                errors.push(violation(&items, path, "minItems", "is too short"));
            }
            ArrayRule::MaxItems(max) if items.len() > *max => {
                errors.push(violation(&items, path, "maxItems", "is too long"));
            }
            ArrayRule::UniqueItems if has_duplicates(&items) => {
                errors.push(violation(&items, path, "uniqueItems", "has non-unique elements"));
            }
            ArrayRule::Elements { prefix, rest } => {
                apply_elements(prefix, rest.as_ref(), &mut items, path, ctx, errors);
            }
            ArrayRule::MinItems(_) | ArrayRule::MaxItems(_) | ArrayRule::UniqueItems => {}
        }

        Value::Array(items)
    }
}

fn apply_elements(
    prefix: &[SchemaNode],
    rest: Option<&SchemaNode>,
    items: &mut [Value],
    path: &InstancePath,
    ctx: &ValidationContext,
    errors: &mut Collector,
) {
    for (index, (item, schema)) in items.iter_mut().zip(prefix).enumerate() {
        let result = schema.validate(item, &path.push_index(index), ctx);
        if let Some(accepted) = errors.absorb(result) {
            *item = accepted;
        }
    }

    let start = prefix.len().min(items.len());
    match rest {
        Some(SchemaNode::Reject) if start < items.len() && !prefix.is_empty() => {
            let extras: Vec<String> = items[start..].iter().map(repr_value).collect();
            let verb = if extras.len() == 1 { "was" } else { "were" };
            errors.push(Violation::new(
                path.clone(),
                Value::Array(items.to_vec()),
                "additionalItems",
                format!(
                    "Additional items are not allowed ({} {} unexpected)",
                    extras.join(", "),
                    verb
                ),
            ));
        }
        Some(schema) => {
            for (index, item) in items.iter_mut().enumerate().skip(start) {
                let result = schema.validate(item, &path.push_index(index), ctx);
                if let Some(accepted) = errors.absorb(result) {
                    *item = accepted;
                }
            }
        }
        None => {}
    }
}

fn violation(
    items: &[Value],
    path: &InstancePath,
    keyword: &'static str,
    problem: &str,
) -> Violation {
    let instance = Value::Array(items.to_vec());
    let message = format!("{} {}", instance, problem);
    Violation::new(path.clone(), instance, keyword, message)
}

fn has_duplicates(items: &[Value]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, a)| items[i + 1..].iter().any(|b| json_equal(a, b)))
}
