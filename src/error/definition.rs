//! Errors raised while compiling a schema document.

use thiserror::Error;

/// A schema document that is not structurally well-formed.
///
/// Schemas ship with the service, so these errors indicate a defect in the
/// schema definitions rather than in a request. `location` is a JSON pointer
/// into the schema document (`#/properties/volume/properties/size`).
#[derive(Debug, Error)]
pub enum SchemaDefinitionError {
    #[error("{location}: schema must be an object or a boolean")]
    NotASchema { location: String },

    #[error("{location}: '{keyword}' {reason}")]
    InvalidKeyword {
        location: String,
        keyword: String,
        reason: String,
    },

    #[error("{location}: unknown type '{name}'")]
    UnknownType { location: String, name: String },

    #[error("{location}: invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        location: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl SchemaDefinitionError {
    pub(crate) fn keyword(
        location: &str,
        keyword: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SchemaDefinitionError::InvalidKeyword {
            location: location.to_string(),
            keyword: keyword.into(),
            reason: reason.into(),
        }
    }

    /// The schema location the error refers to.
    pub fn location(&self) -> &str {
        match self {
            SchemaDefinitionError::NotASchema { location }
            | SchemaDefinitionError::InvalidKeyword { location, .. }
            | SchemaDefinitionError::UnknownType { location, .. }
            | SchemaDefinitionError::InvalidPattern { location, .. } => location,
        }
    }
}
