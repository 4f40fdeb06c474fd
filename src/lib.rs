//! # Schemagate
//!
//! Microversion-aware JSON-schema validation for API request and response
//! bodies.
//!
//! ## Overview
//!
//! Every operation of a versioned HTTP API keeps one schema per band of
//! microversions. At request time the variant governing the request's version
//! is selected and the payload is validated against it. On top of plain JSON
//! schema the validator adds the compatibility behavior older clients rely
//! on:
//!
//! - numeric bounds (`minimum`, `maximum`) accept numbers sent as strings
//!   (`"10"`);
//! - in lenient mode, undeclared properties are stripped instead of
//!   rejected;
//! - semantic `format` checks (`uuid`, `cidr`, configurable `name` policies)
//!   come from an explicit, immutable [`FormatRegistry`](format::FormatRegistry).
//!
//! Failures are reported as a single [`ValidationError`] whose message names
//! the offending field, in the wording API clients already parse.
//!
//! ## Core Types
//!
//! - [`SchemaValidator`]: validates instances against one schema
//! - [`SchemaCatalog`]: versioned schemas per operation and [`SchemaRole`]
//! - [`Violation`] / [`Violations`]: individual failures, accumulated in
//!   evaluation order
//! - [`ValidatorConfig`]: name policies and response validation mode
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use schemagate::format::FormatRegistry;
//! use schemagate::{SchemaValidator, ValidatorConfig};
//! use serde_json::json;
//!
//! let formats = Arc::new(FormatRegistry::standard(&ValidatorConfig::default()).unwrap());
//! let schema = json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}},
//!     "additionalProperties": false,
//! });
//!
//! // Legacy clients: undeclared keys are dropped.
//! let lenient = SchemaValidator::new(&schema, Arc::clone(&formats), true, true).unwrap();
//! let accepted = lenient.validate(&json!({"name": "vm", "extra": 1})).unwrap();
//! assert_eq!(accepted, json!({"name": "vm"}));
//!
//! // Everyone else: they are rejected.
//! let strict = SchemaValidator::new(&schema, formats, false, true).unwrap();
//! let err = strict.validate(&json!({"name": "vm", "extra": 1})).unwrap_err();
//! assert_eq!(
//!     err.detail(),
//!     "Additional properties are not allowed ('extra' was unexpected)"
//! );
//! ```

pub mod catalog;
pub mod compute;
pub mod config;
pub mod error;
pub mod format;
pub mod microversion;
pub mod path;
pub mod schema;
pub mod validation;
pub mod validator;

pub use catalog::{CatalogError, SchemaCatalog, SchemaRole};
pub use config::{ConfigError, NamePolicyConfig, ResponseValidation, ValidatorConfig};
pub use error::{SchemaDefinitionError, ValidationError, Violation, ViolationKind, Violations};
pub use microversion::{ApiVersion, VersionParseError, VersionRange, Versioned};
pub use path::{InstancePath, PathSegment};
pub use schema::CompiledSchema;
pub use validation::ValidationContext;
pub use validator::SchemaValidator;

/// Type alias for validation results using Violations
pub type ValidationResult<T> = stillwater::Validation<T, Violations>;
