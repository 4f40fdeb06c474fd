//! Name policies: the configurable patterns behind the `name`-family formats.

use regex::Regex;

// Printable means any character outside Unicode categories C*, Zl and Zp.
// Within printable characters, whitespace is Zs.
pub(crate) const NAME_PATTERN: &str =
    r"^(?:[^\p{C}\p{Z}](?:[^\p{C}\p{Zl}\p{Zp}]*[^\p{C}\p{Z}])?)?$";
pub(crate) const NAME_REASON: &str =
    "printable characters. Can not start or end with whitespace.";

pub(crate) const NAME_WITH_SPACES_PATTERN: &str =
    r"^[^\p{C}\p{Zl}\p{Zp}]*[^\p{C}\p{Z}][^\p{C}\p{Zl}\p{Zp}]*$";
pub(crate) const NAME_WITH_SPACES_REASON: &str =
    "printable characters with at least one non space character";

pub(crate) const AZ_NAME_PATTERN: &str =
    r"^(?:[^\p{C}\p{Z}:](?:[^\p{C}\p{Zl}\p{Zp}:]*[^\p{C}\p{Z}:])?)?$";
pub(crate) const AZ_NAME_REASON: &str =
    "printable characters except :. Can not start or end with whitespace.";

pub(crate) const AZ_NAME_WITH_SPACES_PATTERN: &str =
    r"^[^\p{C}\p{Zl}\p{Zp}:]*[^\p{C}\p{Z}:][^\p{C}\p{Zl}\p{Zp}:]*$";
pub(crate) const AZ_NAME_WITH_SPACES_REASON: &str =
    "printable characters except :, with at least one non space character";

/// A compiled "valid name" rule and the reason shown to clients when a value
/// breaks it.
///
/// # Example
///
/// ```rust
/// use schemagate::format::NamePolicy;
///
/// let policy = NamePolicy::new(r"^[a-z]+$", "lowercase letters only").unwrap();
/// assert!(policy.matches("web"));
/// assert!(!policy.matches("Web"));
/// assert_eq!(policy.reason(), "lowercase letters only");
/// ```
#[derive(Debug, Clone)]
pub struct NamePolicy {
    pattern: Regex,
    reason: String,
}

impl NamePolicy {
    pub fn new(pattern: &str, reason: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            reason: reason.into(),
        })
    }

    /// True if `value` satisfies the policy. Uses search semantics, so
    /// policies that must cover the whole value anchor themselves.
    pub fn matches(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}
