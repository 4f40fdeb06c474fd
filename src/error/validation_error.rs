//! The uniform error returned to callers of the validator.

use thiserror::Error;

use super::violation::{display_value, Violation, ViolationKind};

/// A request (or response) failed validation.
///
/// Every failure is reported through this one type so that the HTTP layer can
/// turn it into a client error without inspecting the cause; the rendered
/// [`detail`](ValidationError::detail) is the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{detail}")]
pub struct ValidationError {
    detail: String,
    violation: Box<Violation>,
}

impl ValidationError {
    /// Renders the first violation of a failed validation.
    ///
    /// Body failures name the innermost key (`field/attribute`); query
    /// failures name the parameter, which is the outermost key because query
    /// values are lists.
    pub(crate) fn from_violation(violation: Violation, is_body: bool) -> Self {
        let detail = match &violation.kind {
            ViolationKind::InvalidName { reason } => format!(
                "An invalid 'name' value was provided. The name must be: {}",
                reason
            ),
            ViolationKind::Schema { .. } => {
                let segment = if is_body {
                    violation.path.last()
                } else {
                    violation.path.first()
                };
                match segment {
                    Some(segment) if is_body => format!(
                        "Invalid input for field/attribute {}. Value: {}. {}",
                        segment,
                        display_value(&violation.instance),
                        violation.message
                    ),
                    Some(segment) => format!(
                        "Invalid input for query parameters {}. Value: {}. {}",
                        segment,
                        display_value(&violation.instance),
                        violation.message
                    ),
                    None => violation.message.clone(),
                }
            }
        };
        Self {
            detail,
            violation: Box::new(violation),
        }
    }

    /// The user-facing message.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// The violation the message was rendered from.
    pub fn violation(&self) -> &Violation {
        &self.violation
    }
}
