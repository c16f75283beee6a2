//! Attributes: named, typed metadata entries.

use crate::values::Values;

/// A CDF attribute.
///
/// Global attributes hang off the container and may carry any number of
/// entries; variable attributes are attached to their variable and carry
/// exactly one entry per variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    /// One decoded value set per attribute entry, in entry order.
    pub entries: Vec<Values>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, entries: Vec<Values>) -> Attribute {
        Attribute {
            name: name.into(),
            entries,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry, which is the only one for variable attributes.
    pub fn first(&self) -> Option<&Values> {
        self.entries.first()
    }
}
