//! Store layer
//!
//! Trait-based access to the three entity collections. The traits define
//! the same surface for any backing store:
//! - `list`, `get_by_id`, `insert`, `update`, `delete` per collection
//! - the cross-collection reads the mutation preconditions need
//!   (case-insensitive name lookups, referenced-by-workshop checks)
//!
//! The only implementation today is [`MemoryStore`], a process-local
//! collection that stands in for a persistent database. Services receive
//! `Arc<dyn ...Store>` so tests can inject their own instance; there is
//! no ambient global state.

mod memory;

pub use memory::MemoryStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Category, Tag, Workshop, WorkshopInput};

/// Workshop collection access.
#[async_trait]
pub trait WorkshopStore: Send + Sync {
    /// All workshops, unordered
    async fn list(&self) -> Result<Vec<Workshop>>;

    /// Workshop by id
    async fn get_by_id(&self, id: &str) -> Result<Option<Workshop>>;

    /// Insert with a freshly assigned id; returns the stored record
    async fn insert(&self, input: WorkshopInput) -> Result<Workshop>;

    /// Replace the record with the given id; `None` if it does not exist
    async fn update(&self, id: &str, input: WorkshopInput) -> Result<Option<Workshop>>;

    /// Remove by id; `true` if a record was removed
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Whether any workshop references the category
    async fn any_with_category(&self, category_id: &str) -> Result<bool>;

    /// Whether any workshop references the tag
    async fn any_with_tag(&self, tag_id: &str) -> Result<bool>;
}

/// Category collection access.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Category>>;

    /// Case-insensitive name lookup, used by the uniqueness precondition
    async fn get_by_name(&self, name: &str) -> Result<Option<Category>>;

    async fn insert(&self, category: Category) -> Result<Category>;

    /// Rename in place; `None` if the id does not exist
    async fn update(&self, id: &str, name: String) -> Result<Option<Category>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Tag collection access.
#[async_trait]
pub trait TagStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Tag>>;

    /// Case-insensitive name lookup, used by the uniqueness precondition
    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>>;

    async fn insert(&self, tag: Tag) -> Result<Tag>;

    /// Rename in place; `None` if the id does not exist
    async fn update(&self, id: &str, name: String) -> Result<Option<Tag>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}
