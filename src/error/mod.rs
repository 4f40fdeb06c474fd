//! Error types for validation failures and malformed schemas.
//!
//! Validation accumulates [`Violation`]s into a non-empty [`Violations`]
//! collection. Callers only ever see the uniform [`ValidationError`], which
//! carries the rendered message for the first violation. Problems with the
//! schema document itself are reported once, at compile time, as
//! [`SchemaDefinitionError`].

mod definition;
mod validation_error;
mod violation;

pub use definition::SchemaDefinitionError;
pub use validation_error::ValidationError;
pub use violation::{Violation, ViolationKind, Violations};

pub(crate) use violation::repr_value;
