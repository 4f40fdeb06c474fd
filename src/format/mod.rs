//! Named semantic string formats.
//!
//! The [`FormatRegistry`] maps a `format` keyword value (`"uuid"`, `"cidr"`,
//! `"name"`, ...) to a [`FormatCheck`]. Registries are assembled once at
//! startup and never change afterwards; schemas resolve their formats against
//! the registry when they are compiled, not per validated value.
//!
//! # Example
//!
//! ```rust
//! use schemagate::format::{FormatCheck, FormatFailure, FormatRegistry};
//! use serde_json::json;
//!
//! let registry = FormatRegistry::builder()
//!     .register("even-length", FormatCheck::custom(|s| s.len() % 2 == 0))
//!     .build();
//!
//! assert!(registry.check("even-length", &json!("ab")).is_ok());
//! assert_eq!(
//!     registry.check("even-length", &json!("abc")),
//!     Err(FormatFailure::Mismatch)
//! );
//! // Formats only constrain strings.
//! assert!(registry.check("even-length", &json!(123)).is_ok());
//! ```

pub mod checks;
mod name;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{ConfigError, ValidatorConfig};

pub use name::NamePolicy;
pub(crate) use name::{
    AZ_NAME_PATTERN, AZ_NAME_REASON, AZ_NAME_WITH_SPACES_PATTERN, AZ_NAME_WITH_SPACES_REASON,
    NAME_PATTERN, NAME_REASON, NAME_WITH_SPACES_PATTERN, NAME_WITH_SPACES_REASON,
};

/// The formats every standard registry provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Regex,
    DateTime,
    Base64,
    Cidr,
    Uuid,
    Uri,
    Ipv4,
    Ipv6,
    Name,
    NameWithLeadingTrailingSpaces,
    AzName,
    AzNameWithLeadingTrailingSpaces,
}

impl FormatKind {
    pub const ALL: [FormatKind; 12] = [
        FormatKind::Regex,
        FormatKind::DateTime,
        FormatKind::Base64,
        FormatKind::Cidr,
        FormatKind::Uuid,
        FormatKind::Uri,
        FormatKind::Ipv4,
        FormatKind::Ipv6,
        FormatKind::Name,
        FormatKind::NameWithLeadingTrailingSpaces,
        FormatKind::AzName,
        FormatKind::AzNameWithLeadingTrailingSpaces,
    ];

    /// The canonical `format` keyword value.
    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Regex => "regex",
            FormatKind::DateTime => "date-time",
            FormatKind::Base64 => "base64",
            FormatKind::Cidr => "cidr",
            FormatKind::Uuid => "uuid",
            FormatKind::Uri => "uri",
            FormatKind::Ipv4 => "ipv4",
            FormatKind::Ipv6 => "ipv6",
            FormatKind::Name => "name",
            FormatKind::NameWithLeadingTrailingSpaces => "name_with_leading_trailing_spaces",
            FormatKind::AzName => "az_name",
            FormatKind::AzNameWithLeadingTrailingSpaces => "az_name_with_leading_trailing_spaces",
        }
    }

    /// Alternative spellings accepted in schema documents.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FormatKind::NameWithLeadingTrailingSpaces => &["name-with-leading-trailing-spaces"],
            FormatKind::AzName => &["az-name"],
            FormatKind::AzNameWithLeadingTrailingSpaces => {
                &["az-name-with-leading-trailing-spaces"]
            }
            _ => &[],
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a value failed a format check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatFailure {
    /// The value does not have the format.
    Mismatch,
    /// A name policy rejected the value; `reason` is shown to the client.
    InvalidName { reason: String },
}

type CustomPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A single registered format.
#[derive(Clone)]
pub enum FormatCheck {
    /// A plain predicate over the string value.
    Predicate(fn(&str) -> bool),
    /// A capturing predicate, for formats configured at runtime.
    Custom(CustomPredicate),
    /// A name policy; mismatches report the policy's reason.
    Name(NamePolicy),
}

impl FormatCheck {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        FormatCheck::Custom(Arc::new(predicate))
    }

    /// Checks one value. Non-string values always pass: type constraints are
    /// the business of the `type` keyword.
    pub fn check(&self, value: &Value) -> Result<(), FormatFailure> {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        match self {
            FormatCheck::Predicate(predicate) if predicate(s) => Ok(()),
            FormatCheck::Custom(predicate) if predicate(s) => Ok(()),
            FormatCheck::Name(policy) if policy.matches(s) => Ok(()),
            FormatCheck::Name(policy) => Err(FormatFailure::InvalidName {
                reason: policy.reason().to_string(),
            }),
            FormatCheck::Predicate(_) | FormatCheck::Custom(_) => Err(FormatFailure::Mismatch),
        }
    }
}

impl fmt::Debug for FormatCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatCheck::Predicate(_) => f.write_str("FormatCheck::Predicate"),
            FormatCheck::Custom(_) => f.write_str("FormatCheck::Custom"),
            FormatCheck::Name(policy) => f.debug_tuple("FormatCheck::Name").field(policy).finish(),
        }
    }
}

/// A format looked up once, at schema compile time.
#[derive(Debug, Clone)]
pub struct ResolvedFormat {
    name: String,
    check: Arc<FormatCheck>,
}

impl ResolvedFormat {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value) -> Result<(), FormatFailure> {
        self.check.check(value)
    }
}

/// An immutable set of named format checks.
///
/// Build one with [`FormatRegistry::builder`] or take the standard set with
/// [`FormatRegistry::standard`], then share it behind an `Arc` between every
/// validator in the process.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    checks: IndexMap<String, Arc<FormatCheck>>,
}

impl FormatRegistry {
    pub fn builder() -> FormatRegistryBuilder {
        FormatRegistryBuilder::default()
    }

    /// The built-in formats, with name policies taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidNamePattern` if a configured name pattern
    /// is not a valid regular expression.
    pub fn standard(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        for kind in FormatKind::ALL {
            let check = match kind {
                FormatKind::Regex => FormatCheck::Predicate(checks::is_regex),
                FormatKind::DateTime => FormatCheck::Predicate(checks::is_date_time),
                FormatKind::Base64 => FormatCheck::Predicate(checks::is_base64),
                FormatKind::Cidr => FormatCheck::Predicate(checks::is_cidr),
                FormatKind::Uuid => FormatCheck::Predicate(checks::is_uuid_like),
                FormatKind::Uri => FormatCheck::Predicate(checks::is_uri),
                FormatKind::Ipv4 => FormatCheck::Predicate(checks::is_ipv4),
                FormatKind::Ipv6 => FormatCheck::Predicate(checks::is_ipv6),
                FormatKind::Name
                | FormatKind::NameWithLeadingTrailingSpaces
                | FormatKind::AzName
                | FormatKind::AzNameWithLeadingTrailingSpaces => {
                    FormatCheck::Name(config.name_policy(kind)?)
                }
            };
            builder = builder.register_kind(kind, check);
        }
        Ok(builder.build())
    }

    /// Looks up a format by name. Unknown formats resolve to `None` and are
    /// not checked.
    pub fn resolve(&self, name: &str) -> Option<ResolvedFormat> {
        self.checks.get(name).map(|check| ResolvedFormat {
            name: name.to_string(),
            check: Arc::clone(check),
        })
    }

    /// Checks `value` against the named format. Unknown formats pass.
    pub fn check(&self, name: &str, value: &Value) -> Result<(), FormatFailure> {
        match self.checks.get(name) {
            Some(check) => check.check(value),
            None => Ok(()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Registered format names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }
}

/// Collects format checks before freezing them into a [`FormatRegistry`].
#[derive(Debug, Default)]
pub struct FormatRegistryBuilder {
    checks: IndexMap<String, Arc<FormatCheck>>,
}

impl FormatRegistryBuilder {
    /// Registers `check` under `name`, replacing any earlier registration.
    pub fn register(mut self, name: impl Into<String>, check: FormatCheck) -> Self {
        self.checks.insert(name.into(), Arc::new(check));
        self
    }

    /// Registers a built-in format under its canonical name and aliases.
    pub fn register_kind(mut self, kind: FormatKind, check: FormatCheck) -> Self {
        let check = Arc::new(check);
        self.checks.insert(kind.as_str().to_string(), Arc::clone(&check));
        for alias in kind.aliases() {
            self.checks.insert(alias.to_string(), Arc::clone(&check));
        }
        self
    }

    pub fn build(self) -> FormatRegistry {
        FormatRegistry {
            checks: self.checks,
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<FormatRegistry>();
    assert_sync::<FormatRegistry>();
};
