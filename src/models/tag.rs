//! Tag model
//!
//! Tags label workshops across categories; a workshop carries at least
//! one. Same shape and id-derivation rule as [`Category`].
//!
//! [`Category`]: super::Category

use serde::{Deserialize, Serialize};

/// Tag entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Slug identifier derived from the name
    pub id: String,
    /// Display name, unique case-insensitively
    pub name: String,
}

impl Tag {
    pub fn new(id: String, name: String) -> Self {
        Self { id, name }
    }
}
