//! Tag service
//!
//! Same shape as the category service: slug identity from the name,
//! case-insensitive uniqueness, deletion blocked while referenced.

use anyhow::{Context, Result};
use std::sync::Arc;
use thiserror::Error;

use crate::cache::{keys, Cache};
use crate::models::Tag;
use crate::services::forms::FormSubmission;
use crate::services::slug::slugify;
use crate::services::validate::{min_len, FieldErrors};
use crate::store::{TagStore, WorkshopStore};

/// Error types for tag service operations
#[derive(Debug, Error)]
pub enum TagServiceError {
    /// Field-level validation failure; recoverable by correcting input
    #[error("{0}")]
    Validation(FieldErrors),

    /// A tag with the same name (case-insensitive) already exists
    #[error("Tag already exists.")]
    DuplicateName(String),

    /// The tag is still referenced by at least one workshop
    #[error("Cannot delete tag as it is currently in use by a workshop.")]
    InUse,

    /// Tag not found
    #[error("Tag not found: {0}")]
    NotFound(String),

    /// Unexpected store failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Tag service
pub struct TagService {
    tags: Arc<dyn TagStore>,
    workshops: Arc<dyn WorkshopStore>,
    cache: Arc<Cache>,
}

impl TagService {
    pub fn new(
        tags: Arc<dyn TagStore>,
        workshops: Arc<dyn WorkshopStore>,
        cache: Arc<Cache>,
    ) -> Self {
        Self {
            tags,
            workshops,
            cache,
        }
    }

    /// List all tags.
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        let cache_key = "tags:list";
        if let Some(list) = self.cache.get::<Vec<Tag>>(cache_key).await {
            return Ok(list);
        }
        let list = self.tags.list().await.context("Failed to list tags")?;
        if let Err(e) = self.cache.set(cache_key, &list).await {
            tracing::warn!("Failed to cache {cache_key}: {e}");
        }
        Ok(list)
    }

    /// Create or rename a tag from a form submission.
    pub async fn save(&self, form: &FormSubmission) -> Result<Tag, TagServiceError> {
        let name = validate_name(form)?;

        let saved = match form.get_non_empty("id") {
            Some(id) => self.rename(id, name).await?,
            None => self.create(name).await?,
        };
        self.invalidate_views().await;
        Ok(saved)
    }

    async fn create(&self, name: String) -> Result<Tag, TagServiceError> {
        if let Some(existing) = self
            .tags
            .get_by_name(&name)
            .await
            .context("Failed to check name uniqueness")?
        {
            return Err(TagServiceError::DuplicateName(existing.name));
        }

        let tag = Tag::new(slugify(&name), name);
        self.tags
            .insert(tag)
            .await
            .context("Failed to create tag")
            .map_err(Into::into)
    }

    async fn rename(&self, id: &str, name: String) -> Result<Tag, TagServiceError> {
        let current = self
            .tags
            .get_by_id(id)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| TagServiceError::NotFound(id.to_string()))?;

        if !current.name.eq_ignore_ascii_case(&name) {
            if let Some(existing) = self
                .tags
                .get_by_name(&name)
                .await
                .context("Failed to check name uniqueness")?
            {
                if existing.id != id {
                    return Err(TagServiceError::DuplicateName(existing.name));
                }
            }
        }

        self.tags
            .update(id, name)
            .await
            .context("Failed to update tag")?
            .ok_or_else(|| TagServiceError::NotFound(id.to_string()))
    }

    /// Delete a tag; blocked while any workshop carries it.
    pub async fn delete(&self, id: &str) -> Result<(), TagServiceError> {
        if self
            .workshops
            .any_with_tag(id)
            .await
            .context("Failed to check tag references")?
        {
            return Err(TagServiceError::InUse);
        }

        let removed = self
            .tags
            .delete(id)
            .await
            .context("Failed to delete tag")?;
        if !removed {
            return Err(TagServiceError::NotFound(id.to_string()));
        }
        self.invalidate_views().await;
        Ok(())
    }

    async fn invalidate_views(&self) {
        self.cache.delete_prefix(keys::TAGS).await;
        self.cache.delete_prefix(keys::WORKSHOPS).await;
    }
}

fn validate_name(form: &FormSubmission) -> Result<String, TagServiceError> {
    let mut errors = FieldErrors::new();
    let name = min_len(
        &mut errors,
        "name",
        form.get("name"),
        2,
        "Tag name must be at least 2 characters",
    );
    match name {
        Some(name) if errors.is_empty() => Ok(name.to_string()),
        _ => Err(TagServiceError::Validation(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::store::MemoryStore;

    fn service() -> TagService {
        let store = MemoryStore::seeded();
        TagService::new(
            Arc::new(store.clone()),
            Arc::new(store),
            crate::cache::create_cache(&CacheConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_create_derives_slug_identity() {
        let service = service();
        let form = FormSubmission::from_pairs(&[("name", "Hands On")]);
        let created = service.save(&form).await.unwrap();
        assert_eq!(created.id, "hands-on");
        assert_eq!(created.name, "Hands On");
    }

    #[tokio::test]
    async fn test_duplicate_name_case_insensitive() {
        let service = service();
        // Seed already holds "AI".
        let form = FormSubmission::from_pairs(&[("name", "ai")]);
        assert!(matches!(
            service.save(&form).await,
            Err(TagServiceError::DuplicateName(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_keeps_identity() {
        let service = service();
        let form = FormSubmission::from_pairs(&[("id", "react"), ("name", "React 19")]);
        let renamed = service.save(&form).await.unwrap();
        assert_eq!(renamed.id, "react");
        assert_eq!(renamed.name, "React 19");
    }

    #[tokio::test]
    async fn test_delete_referenced_tag_blocked() {
        let service = service();
        // The seed workshop carries "genai".
        assert!(matches!(
            service.delete("genai").await,
            Err(TagServiceError::InUse)
        ));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_tag() {
        let service = service();
        service.delete("react").await.unwrap();
        let ids: Vec<String> = service.list().await.unwrap().into_iter().map(|t| t.id).collect();
        assert!(!ids.contains(&"react".to_string()));
    }

    #[tokio::test]
    async fn test_delete_missing_tag_not_found() {
        let service = service();
        assert!(matches!(
            service.delete("ghost").await,
            Err(TagServiceError::NotFound(_))
        ));
    }
}
