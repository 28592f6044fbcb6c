//! Category model
//!
//! A category groups workshops; every workshop references exactly one.
//! The identifier is a slug derived from the name at creation time.

use serde::{Deserialize, Serialize};

/// Category entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Slug identifier derived from the name
    pub id: String,
    /// Display name, unique case-insensitively
    pub name: String,
}

impl Category {
    pub fn new(id: String, name: String) -> Self {
        Self { id, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_new() {
        let category = Category::new("art".to_string(), "Art & Creativity".to_string());
        assert_eq!(category.id, "art");
        assert_eq!(category.name, "Art & Creativity");
    }
}
