//! Individual validation failures and their non-empty collection.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

use crate::path::InstancePath;

/// What kind of check produced a [`Violation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A structural keyword (`type`, `required`, `minimum`, `format`, ...)
    /// rejected the value.
    Schema { keyword: &'static str },
    /// A name-policy format rejected the value. The reason is surfaced
    /// verbatim instead of the generic message.
    InvalidName { reason: String },
}

/// A single validation failure.
///
/// Carries the location of the failing value, the value itself and a
/// human-readable message in the wording API clients already know
/// (`'abc' is not of type 'integer'`).
///
/// # Example
///
/// ```rust
/// use schemagate::{InstancePath, Violation};
/// use serde_json::json;
///
/// let violation = Violation::new(
///     InstancePath::root().push_key("size"),
///     json!(0),
///     "minimum",
///     "0 is less than the minimum of 1",
/// );
///
/// assert_eq!(violation.keyword(), Some("minimum"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Where in the instance the failure occurred.
    pub path: InstancePath,
    /// The offending value.
    pub instance: Value,
    /// The message describing the failure.
    pub message: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(
        path: InstancePath,
        instance: Value,
        keyword: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path,
            instance,
            message: message.into(),
            kind: ViolationKind::Schema { keyword },
        }
    }

    /// Creates a name-policy violation carrying the configured reason.
    pub fn invalid_name(
        path: InstancePath,
        instance: Value,
        format: &str,
        reason: impl Into<String>,
    ) -> Self {
        let message = format!("{} is not a '{}'", repr_value(&instance), format);
        Self {
            path,
            instance,
            message,
            kind: ViolationKind::InvalidName {
                reason: reason.into(),
            },
        }
    }

    /// The keyword that failed, or `None` for name-policy failures.
    pub fn keyword(&self) -> Option<&'static str> {
        match self.kind {
            ViolationKind::Schema { keyword } => Some(keyword),
            ViolationKind::InvalidName { .. } => None,
        }
    }

    /// The configured reason for a name-policy failure.
    pub fn invalid_name_reason(&self) -> Option<&str> {
        match &self.kind {
            ViolationKind::InvalidName { reason } => Some(reason),
            ViolationKind::Schema { .. } => None,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for Violation {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violation>();
    assert_sync::<Violation>();
};

/// A non-empty collection of violations.
///
/// Validation of sibling keywords and properties accumulates into this type;
/// `Semigroup::combine` keeps the evaluation order, so [`Violations::first`]
/// is always the first failure encountered.
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(NonEmptyVec<Violation>);

impl Violations {
    pub fn single(violation: Violation) -> Self {
        Self(NonEmptyVec::singleton(violation))
    }

    /// Wraps a list of violations, returning `None` when the list is empty.
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        NonEmptyVec::from_vec(violations).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// The first violation in evaluation order.
    pub fn first(&self) -> &Violation {
        self.0.head()
    }

    /// All violations raised by the given keyword.
    pub fn with_keyword(&self, keyword: &str) -> Vec<&Violation> {
        self.0
            .iter()
            .filter(|v| v.keyword() == Some(keyword))
            .collect()
    }

    /// All violations located at the given path.
    pub fn at_path(&self, path: &InstancePath) -> Vec<&Violation> {
        self.0.iter().filter(|v| &v.path == path).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0.into_vec()
    }
}

impl Semigroup for Violations {
    fn combine(self, other: Self) -> Self {
        Violations(self.0.combine(other.0))
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} violation(s):", self.len())?;
        for (i, violation) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

/// Renders a value the way it appears inside a violation message: strings
/// single-quoted, everything else as compact JSON.
pub(crate) fn repr_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}

/// Renders a value for the `Value: ...` part of a client-facing detail:
/// strings bare, everything else as compact JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
