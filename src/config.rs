//! Validator configuration.
//!
//! [`ValidatorConfig`] carries the deployment-tunable parts of validation:
//! the four name policies behind the `name`-family formats and how strictly
//! responses are checked. It deserializes from TOML, with every field
//! optional:
//!
//! ```toml
//! response_validation = "error"
//!
//! [name]
//! pattern = '^[a-z0-9-]+$'
//! reason = "lowercase letters, digits and hyphens"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::format::{
    FormatKind, NamePolicy, AZ_NAME_PATTERN, AZ_NAME_REASON, AZ_NAME_WITH_SPACES_PATTERN,
    AZ_NAME_WITH_SPACES_REASON, NAME_PATTERN, NAME_REASON, NAME_WITH_SPACES_PATTERN,
    NAME_WITH_SPACES_REASON,
};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid pattern for name policy '{policy}': {source}")]
    InvalidNamePattern {
        policy: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("format '{0}' is not a name policy")]
    NotANamePolicy(&'static str),
}

/// What to do when an outgoing response does not match its schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseValidation {
    /// Fail the response with a validation error.
    Error,
    /// Log the mismatch and send the response anyway.
    #[default]
    Warn,
    /// Skip response validation entirely.
    Ignore,
}

/// Pattern and client-facing reason for one name policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamePolicyConfig {
    pub pattern: String,
    pub reason: String,
}

impl NamePolicyConfig {
    pub fn new(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration for the format registry and the schema catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    pub name: NamePolicyConfig,
    pub name_with_leading_trailing_spaces: NamePolicyConfig,
    pub az_name: NamePolicyConfig,
    pub az_name_with_leading_trailing_spaces: NamePolicyConfig,
    pub response_validation: ResponseValidation,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            name: NamePolicyConfig::new(NAME_PATTERN, NAME_REASON),
            name_with_leading_trailing_spaces: NamePolicyConfig::new(
                NAME_WITH_SPACES_PATTERN,
                NAME_WITH_SPACES_REASON,
            ),
            az_name: NamePolicyConfig::new(AZ_NAME_PATTERN, AZ_NAME_REASON),
            az_name_with_leading_trailing_spaces: NamePolicyConfig::new(
                AZ_NAME_WITH_SPACES_PATTERN,
                AZ_NAME_WITH_SPACES_REASON,
            ),
            response_validation: ResponseValidation::default(),
        }
    }
}

impl ValidatorConfig {
    /// Parses configuration from TOML text. Missing fields keep their
    /// defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_response_validation(mut self, mode: ResponseValidation) -> Self {
        self.response_validation = mode;
        self
    }

    /// Replaces the policy behind one of the name formats.
    pub fn with_name_policy(
        mut self,
        kind: FormatKind,
        policy: NamePolicyConfig,
    ) -> Result<Self, ConfigError> {
        *self.policy_slot(kind)? = policy;
        Ok(self)
    }

    /// Compiles the policy configured for a name format.
    pub(crate) fn name_policy(&self, kind: FormatKind) -> Result<NamePolicy, ConfigError> {
        let config = match kind {
            FormatKind::Name => &self.name,
            FormatKind::NameWithLeadingTrailingSpaces => &self.name_with_leading_trailing_spaces,
            FormatKind::AzName => &self.az_name,
            FormatKind::AzNameWithLeadingTrailingSpaces => {
                &self.az_name_with_leading_trailing_spaces
            }
            other => return Err(ConfigError::NotANamePolicy(other.as_str())),
        };
        NamePolicy::new(&config.pattern, config.reason.clone()).map_err(|source| {
            ConfigError::InvalidNamePattern {
                policy: kind.as_str(),
                source,
            }
        })
    }

    fn policy_slot(&mut self, kind: FormatKind) -> Result<&mut NamePolicyConfig, ConfigError> {
        match kind {
            FormatKind::Name => Ok(&mut self.name),
            FormatKind::NameWithLeadingTrailingSpaces => {
                Ok(&mut self.name_with_leading_trailing_spaces)
            }
            FormatKind::AzName => Ok(&mut self.az_name),
            FormatKind::AzNameWithLeadingTrailingSpaces => {
                Ok(&mut self.az_name_with_leading_trailing_spaces)
            }
            other => Err(ConfigError::NotANamePolicy(other.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = ValidatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert_eq!(config.response_validation, ResponseValidation::Warn);
    }

    #[test]
    fn test_partial_override() {
        let config = ValidatorConfig::from_toml_str(
            r#"
            response_validation = "error"

            [az_name]
            pattern = '^[a-z]+$'
            reason = "lowercase letters"
            "#,
        )
        .unwrap();

        assert_eq!(config.response_validation, ResponseValidation::Error);
        assert_eq!(config.az_name.reason, "lowercase letters");
        assert_eq!(config.name, ValidatorConfig::default().name);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ValidatorConfig::from_toml_str("strictness = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_pattern_reported_at_compile() {
        let config = ValidatorConfig::default()
            .with_name_policy(FormatKind::Name, NamePolicyConfig::new("(", "broken"))
            .unwrap();
        let result = config.name_policy(FormatKind::Name);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidNamePattern { policy: "name", .. })
        ));
    }

    #[test]
    fn test_non_name_format_has_no_policy() {
        let result = ValidatorConfig::default()
            .with_name_policy(FormatKind::Uuid, NamePolicyConfig::new(".*", "any"));
        assert!(matches!(result, Err(ConfigError::NotANamePolicy("uuid"))));
    }

    #[test]
    fn test_missing_file() {
        let result = ValidatorConfig::from_file("/nonexistent/schemagate.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
