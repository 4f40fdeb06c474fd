//! Per-call validation settings threaded through the schema tree.

/// Settings that hold for one validation pass.
///
/// Compiled schemas are shared and immutable; everything that varies between
/// validators built from the same schema lives here and is passed down the
/// recursive descent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationContext {
    relax_additional_properties: bool,
}

impl ValidationContext {
    pub fn new(relax_additional_properties: bool) -> Self {
        Self {
            relax_additional_properties,
        }
    }

    /// True when undeclared properties are stripped instead of rejected.
    pub fn relax_additional_properties(&self) -> bool {
        self.relax_additional_properties
    }
}
