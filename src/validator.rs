//! The request-facing schema validator.
//!
//! A [`SchemaValidator`] binds a compiled schema to the settings of one
//! validation site: whether undeclared properties are stripped or rejected,
//! and whether failures are rendered for a request body or for query
//! parameters.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaDefinitionError, ValidationError, Violations};
use crate::format::FormatRegistry;
use crate::schema::CompiledSchema;
use crate::validation::ValidationContext;

/// Validates instances against one schema document.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use schemagate::format::FormatRegistry;
/// use schemagate::{SchemaValidator, ValidatorConfig};
/// use serde_json::json;
///
/// let formats = Arc::new(FormatRegistry::standard(&ValidatorConfig::default()).unwrap());
/// let schema = json!({
///     "type": "object",
///     "properties": {
///         "server": {
///             "type": "object",
///             "properties": {"name": {"type": "string"}},
///             "required": ["name"],
///         }
///     },
/// });
///
/// let validator = SchemaValidator::new(&schema, formats, false, true).unwrap();
/// let err = validator.validate(&json!({"server": {"name": 123}})).unwrap_err();
/// assert_eq!(
///     err.detail(),
///     "Invalid input for field/attribute name. Value: 123. 123 is not of type 'string'"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Arc<CompiledSchema>,
    ctx: ValidationContext,
    is_body: bool,
}

impl SchemaValidator {
    /// Compiles `schema` against `formats`.
    ///
    /// `relax_additional_properties` strips undeclared keys instead of
    /// rejecting them; `is_body` selects how failures are worded.
    pub fn new(
        schema: &Value,
        formats: Arc<FormatRegistry>,
        relax_additional_properties: bool,
        is_body: bool,
    ) -> Result<Self, SchemaDefinitionError> {
        let compiled = CompiledSchema::compile(schema, &formats)?;
        Ok(Self::from_compiled(
            Arc::new(compiled),
            relax_additional_properties,
            is_body,
        ))
    }

    /// Wraps an already compiled schema. Validators built this way share the
    /// compiled tree.
    pub fn from_compiled(
        schema: Arc<CompiledSchema>,
        relax_additional_properties: bool,
        is_body: bool,
    ) -> Self {
        Self {
            schema,
            ctx: ValidationContext::new(relax_additional_properties),
            is_body,
        }
    }

    /// Validates `instance`, returning the accepted value.
    ///
    /// In lenient mode the returned value has undeclared properties removed;
    /// `instance` itself is never modified.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] rendered from the first violation.
    pub fn validate(&self, instance: &Value) -> Result<Value, ValidationError> {
        self.violations(instance).map_err(|violations| {
            let first = violations.first().clone();
            tracing::debug!(
                path = %first.path,
                violations = violations.len(),
                "rejected instance: {}",
                first.message
            );
            ValidationError::from_violation(first, self.is_body)
        })
    }

    /// Validates `instance` and replaces it with the accepted value.
    ///
    /// On failure `instance` is left untouched.
    pub fn validate_in_place(&self, instance: &mut Value) -> Result<(), ValidationError> {
        *instance = self.validate(instance)?;
        Ok(())
    }

    /// Validates `instance`, exposing every violation in evaluation order.
    pub fn violations(&self, instance: &Value) -> Result<Value, Violations> {
        match self.schema.validate(instance, &self.ctx) {
            Validation::Success(accepted) => Ok(accepted),
            Validation::Failure(violations) => Err(violations),
        }
    }

    pub fn schema(&self) -> &CompiledSchema {
        &self.schema
    }

    pub fn relax_additional_properties(&self) -> bool {
        self.ctx.relax_additional_properties()
    }

    pub fn is_body(&self) -> bool {
        self.is_body
    }
}
