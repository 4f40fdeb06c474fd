//! Versioned schema storage for API operations.
//!
//! This module provides the [`SchemaCatalog`], which keeps, for every
//! operation and [`SchemaRole`], one compiled schema per microversion band
//! and validates requests and responses against the variant their version
//! selects.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{ConfigError, ResponseValidation, ValidatorConfig};
use crate::error::{SchemaDefinitionError, ValidationError};
use crate::format::FormatRegistry;
use crate::microversion::{ApiVersion, VersionOverlap, VersionParseError, VersionRange, Versioned};
use crate::schema::CompiledSchema;
use crate::validator::SchemaValidator;

/// What part of an exchange a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaRole {
    /// The JSON request body.
    Body,
    /// The query string, shaped as `{name: [values..]}`.
    Query,
    /// The JSON response body.
    Response,
}

impl SchemaRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaRole::Body => "body",
            SchemaRole::Query => "query",
            SchemaRole::Response => "response",
        }
    }
}

impl fmt::Display for SchemaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{role} schema for '{operation}' is invalid: {source}")]
    Definition {
        operation: String,
        role: SchemaRole,
        #[source]
        source: SchemaDefinitionError,
    },

    #[error("{role} schema for '{operation}': {source}")]
    Overlap {
        operation: String,
        role: SchemaRole,
        #[source]
        source: VersionOverlap,
    },

    #[error(transparent)]
    Version(#[from] VersionParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

type CatalogMap = Arc<RwLock<IndexMap<(String, SchemaRole), Versioned<Arc<CompiledSchema>>>>>;

/// A thread-safe catalog of versioned operation schemas.
///
/// Registration happens at startup; afterwards the catalog is only read, so
/// any number of request threads can validate concurrently. Cloning the
/// catalog shares the underlying storage.
///
/// # Example
///
/// ```rust
/// use schemagate::microversion::{ApiVersion, VersionRange};
/// use schemagate::{SchemaCatalog, SchemaRole, ValidatorConfig};
/// use serde_json::json;
///
/// let catalog = SchemaCatalog::new(&ValidatorConfig::default()).unwrap();
/// catalog
///     .register(
///         "volumes.create",
///         SchemaRole::Body,
///         VersionRange::parse("2.1", None).unwrap(),
///         &json!({
///             "type": "object",
///             "properties": {"size": {"type": ["integer", "string"], "minimum": 1}},
///             "required": ["size"],
///             "additionalProperties": false,
///         }),
///     )
///     .unwrap();
///
/// let version = ApiVersion::new(2, 1);
/// assert!(catalog.validate_body("volumes.create", version, &json!({"size": "5"}), false).is_ok());
///
/// let err = catalog
///     .validate_body("volumes.create", version, &json!({"size": "0"}), false)
///     .unwrap_err();
/// assert_eq!(
///     err.detail(),
///     "Invalid input for field/attribute size. Value: 0. 0 is less than the minimum of 1"
/// );
/// ```
#[derive(Clone)]
pub struct SchemaCatalog {
    schemas: CatalogMap,
    formats: Arc<FormatRegistry>,
    response_validation: ResponseValidation,
}

impl SchemaCatalog {
    /// Creates an empty catalog using the standard formats configured by
    /// `config`.
    pub fn new(config: &ValidatorConfig) -> Result<Self, CatalogError> {
        let formats = FormatRegistry::standard(config)?;
        Ok(Self::with_formats(
            Arc::new(formats),
            config.response_validation,
        ))
    }

    /// Creates an empty catalog around an existing format registry.
    pub fn with_formats(
        formats: Arc<FormatRegistry>,
        response_validation: ResponseValidation,
    ) -> Self {
        Self {
            schemas: Arc::new(RwLock::new(IndexMap::new())),
            formats,
            response_validation,
        }
    }

    pub fn formats(&self) -> &Arc<FormatRegistry> {
        &self.formats
    }

    pub fn response_validation(&self) -> ResponseValidation {
        self.response_validation
    }

    /// Compiles `schema` and registers it for `operation` and `role` over
    /// `range`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Definition` if the schema does not compile and
    /// `CatalogError::Overlap` if `range` intersects a range already
    /// registered for the same operation and role.
    pub fn register(
        &self,
        operation: impl Into<String>,
        role: SchemaRole,
        range: VersionRange,
        schema: &Value,
    ) -> Result<(), CatalogError> {
        let operation = operation.into();
        let compiled = CompiledSchema::compile(schema, &self.formats).map_err(|source| {
            CatalogError::Definition {
                operation: operation.clone(),
                role,
                source,
            }
        })?;

        let mut schemas = self.schemas.write();
        let variants = schemas.entry((operation.clone(), role)).or_default();
        variants
            .insert(range, Arc::new(compiled))
            .map_err(|source| CatalogError::Overlap {
                operation: operation.clone(),
                role,
                source,
            })?;

        tracing::debug!(operation = %operation, %role, %range, "registered schema");
        Ok(())
    }

    /// The schema governing `operation` and `role` at `version`, if any.
    pub fn get(
        &self,
        operation: &str,
        role: SchemaRole,
        version: ApiVersion,
    ) -> Option<Arc<CompiledSchema>> {
        self.schemas
            .read()
            .get(&(operation.to_string(), role))
            .and_then(|variants| variants.select(version))
            .cloned()
    }

    pub fn contains(&self, operation: &str, role: SchemaRole) -> bool {
        self.schemas.read().contains_key(&(operation.to_string(), role))
    }

    /// Registered operation names, in registration order, without duplicates.
    pub fn operations(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (operation, _) in self.schemas.read().keys() {
            if !names.contains(operation) {
                names.push(operation.clone());
            }
        }
        names
    }

    /// Validates a request body.
    ///
    /// `legacy_v2` requests are validated leniently: undeclared properties
    /// are dropped from the returned body instead of rejected. Bodies with no
    /// schema at `version` are returned unchanged.
    pub fn validate_body(
        &self,
        operation: &str,
        version: ApiVersion,
        body: &Value,
        legacy_v2: bool,
    ) -> Result<Value, ValidationError> {
        match self.get(operation, SchemaRole::Body, version) {
            Some(schema) => SchemaValidator::from_compiled(schema, legacy_v2, true)
                .validate(body)
                .inspect_err(|err| {
                    tracing::debug!(operation, %version, "request body rejected: {}", err)
                }),
            None => Ok(body.clone()),
        }
    }

    /// Validates query parameters given as raw `(name, value)` pairs.
    ///
    /// Repeated names collect into one list. After validation, parameters the
    /// schema does not declare are removed when the schema allows additional
    /// properties, so the returned map only holds parameters the controller
    /// knows about. Without a schema the collected map is returned as is.
    pub fn validate_query<I, K, V>(
        &self,
        operation: &str,
        version: ApiVersion,
        pairs: I,
    ) -> Result<Value, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params = query_instance(pairs);
        let Some(schema) = self.get(operation, SchemaRole::Query, version) else {
            return Ok(params);
        };

        let validator = SchemaValidator::from_compiled(Arc::clone(&schema), false, false);
        let accepted = validator.validate(&params).inspect_err(|err| {
            tracing::debug!(operation, %version, "query parameters rejected: {}", err)
        })?;
        Ok(schema.strip_undeclared(accepted))
    }

    /// Validates a response body according to the configured
    /// [`ResponseValidation`] mode.
    ///
    /// In `Warn` mode a mismatch is logged and the response passes; in
    /// `Ignore` mode nothing is checked.
    pub fn validate_response(
        &self,
        operation: &str,
        version: ApiVersion,
        body: &Value,
    ) -> Result<(), ValidationError> {
        if self.response_validation == ResponseValidation::Ignore {
            return Ok(());
        }
        let Some(schema) = self.get(operation, SchemaRole::Response, version) else {
            return Ok(());
        };

        match SchemaValidator::from_compiled(schema, false, true).validate(body) {
            Ok(_) => Ok(()),
            Err(err) if self.response_validation == ResponseValidation::Warn => {
                tracing::warn!(
                    operation,
                    %version,
                    "response does not match its schema: {}",
                    err
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for SchemaCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCatalog")
            .field("schemas", &self.schemas.read().len())
            .field("response_validation", &self.response_validation)
            .finish()
    }
}

/// Collects query pairs into `{name: [values..]}`, keeping value order.
pub fn query_instance<I, K, V>(pairs: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut params = Map::new();
    for (name, value) in pairs {
        let values = params
            .entry(name.into())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(values) = values {
            values.push(Value::String(value.into()));
        }
    }
    Value::Object(params)
}
