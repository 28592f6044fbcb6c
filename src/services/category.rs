//! Category service
//!
//! Business logic for category management:
//! - Create, rename, delete categories
//! - Case-insensitive name uniqueness
//! - Slug identity derived from the name
//! - Delete blocked while any workshop references the category
//!
//! Every mutation invalidates the cached category lists, and the cached
//! workshop views too, since those denormalize the category name.

use anyhow::{Context, Result};
use std::sync::Arc;
use thiserror::Error;

use crate::cache::{keys, Cache};
use crate::models::Category;
use crate::services::forms::FormSubmission;
use crate::services::slug::slugify;
use crate::services::validate::{min_len, FieldErrors};
use crate::store::{CategoryStore, WorkshopStore};

/// Error types for category service operations
#[derive(Debug, Error)]
pub enum CategoryServiceError {
    /// Field-level validation failure; recoverable by correcting input
    #[error("{0}")]
    Validation(FieldErrors),

    /// A category with the same name (case-insensitive) already exists
    #[error("Category already exists.")]
    DuplicateName(String),

    /// The category is still referenced by at least one workshop
    #[error("Cannot delete category as it is currently in use by a workshop.")]
    InUse,

    /// Category not found
    #[error("Category not found: {0}")]
    NotFound(String),

    /// Unexpected store failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
    workshops: Arc<dyn WorkshopStore>,
    cache: Arc<Cache>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        workshops: Arc<dyn WorkshopStore>,
        cache: Arc<Cache>,
    ) -> Self {
        Self {
            categories,
            workshops,
            cache,
        }
    }

    /// List all categories.
    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        let cache_key = "categories:list";
        if let Some(list) = self.cache.get::<Vec<Category>>(cache_key).await {
            return Ok(list);
        }
        let list = self.categories.list().await.context("Failed to list categories")?;
        if let Err(e) = self.cache.set(cache_key, &list).await {
            tracing::warn!("Failed to cache {cache_key}: {e}");
        }
        Ok(list)
    }

    /// Create or rename a category from a form submission.
    ///
    /// An `id` field that is present and non-empty selects the rename
    /// path; otherwise a new category is created with a slug identity
    /// derived from the name.
    pub async fn save(&self, form: &FormSubmission) -> Result<Category, CategoryServiceError> {
        let name = validate_name(form)?;

        let saved = match form.get_non_empty("id") {
            Some(id) => self.rename(id, name).await?,
            None => self.create(name).await?,
        };
        self.invalidate_views().await;
        Ok(saved)
    }

    async fn create(&self, name: String) -> Result<Category, CategoryServiceError> {
        // Uniqueness precondition, case-insensitive (distinct from
        // validation: the input is well-formed, the domain rejects it).
        if let Some(existing) = self
            .categories
            .get_by_name(&name)
            .await
            .context("Failed to check name uniqueness")?
        {
            return Err(CategoryServiceError::DuplicateName(existing.name));
        }

        let category = Category::new(slugify(&name), name);
        self.categories
            .insert(category)
            .await
            .context("Failed to create category")
            .map_err(Into::into)
    }

    async fn rename(&self, id: &str, name: String) -> Result<Category, CategoryServiceError> {
        let current = self
            .categories
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| CategoryServiceError::NotFound(id.to_string()))?;

        // Renaming to a name another category holds collides just like
        // creating would; renaming to a different casing of itself is fine.
        if !current.name.eq_ignore_ascii_case(&name) {
            if let Some(existing) = self
                .categories
                .get_by_name(&name)
                .await
                .context("Failed to check name uniqueness")?
            {
                if existing.id != id {
                    return Err(CategoryServiceError::DuplicateName(existing.name));
                }
            }
        }

        self.categories
            .update(id, name)
            .await
            .context("Failed to update category")?
            .ok_or_else(|| CategoryServiceError::NotFound(id.to_string()))
    }

    /// Delete a category.
    ///
    /// Fails with [`CategoryServiceError::InUse`] while any workshop
    /// references it.
    pub async fn delete(&self, id: &str) -> Result<(), CategoryServiceError> {
        if self
            .workshops
            .any_with_category(id)
            .await
            .context("Failed to check category references")?
        {
            return Err(CategoryServiceError::InUse);
        }

        let removed = self
            .categories
            .delete(id)
            .await
            .context("Failed to delete category")?;
        if !removed {
            return Err(CategoryServiceError::NotFound(id.to_string()));
        }
        self.invalidate_views().await;
        Ok(())
    }

    /// Category names appear denormalized in workshop views, so both
    /// prefixes go.
    async fn invalidate_views(&self) {
        self.cache.delete_prefix(keys::CATEGORIES).await;
        self.cache.delete_prefix(keys::WORKSHOPS).await;
    }
}

fn validate_name(form: &FormSubmission) -> Result<String, CategoryServiceError> {
    let mut errors = FieldErrors::new();
    let name = min_len(
        &mut errors,
        "name",
        form.get("name"),
        2,
        "Category name must be at least 2 characters",
    );
    match name {
        Some(name) if errors.is_empty() => Ok(name.to_string()),
        _ => Err(CategoryServiceError::Validation(errors)),
    }
}
