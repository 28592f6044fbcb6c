//! Workshop service
//!
//! The mutation pipeline for the catalog's main entity, in fixed order:
//!
//! 1. parse the form submission into fields
//! 2. schema validation, accumulating every field error
//! 3. domain preconditions (referenced category and tags must exist)
//! 4. mutate the store (insert assigns the id, update keeps it)
//! 5. invalidate the cached views
//!
//! Reads produce [`WorkshopView`]s: the stored record joined with its
//! resolved category and tags, filtered and sorted for the public
//! listing.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::cache::{keys, Cache};
use crate::models::{
    Category, Price, Tag, Workshop, WorkshopInput, WorkshopQuery, WorkshopView,
};
use crate::services::forms::FormSubmission;
use crate::services::validate::{
    min_len, optional_url, required_date, required_u32, required_url, FieldErrors,
};
use crate::store::{CategoryStore, TagStore, WorkshopStore};

/// Error types for workshop service operations
#[derive(Debug, Error)]
pub enum WorkshopServiceError {
    /// Field-level validation failure; recoverable by correcting input
    #[error("{0}")]
    Validation(FieldErrors),

    /// Workshop not found
    #[error("Workshop not found: {0}")]
    NotFound(String),

    /// Unexpected store failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Dashboard summary: entity counts plus the chart breakdowns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub workshops: usize,
    /// Workshops dated today or later
    pub upcoming: usize,
    pub featured: usize,
    pub categories: usize,
    pub tags: usize,
    /// Workshop count per category, one entry per category
    pub by_category: Vec<CategoryCount>,
    pub price_split: PriceSplit,
}

/// One bar of the workshops-per-category chart.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub total: usize,
}

/// The free vs. paid split for the price chart.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSplit {
    pub free: usize,
    pub paid: usize,
}

/// Workshop service
pub struct WorkshopService {
    workshops: Arc<dyn WorkshopStore>,
    categories: Arc<dyn CategoryStore>,
    tags: Arc<dyn TagStore>,
    cache: Arc<Cache>,
}

impl WorkshopService {
    pub fn new(
        workshops: Arc<dyn WorkshopStore>,
        categories: Arc<dyn CategoryStore>,
        tags: Arc<dyn TagStore>,
        cache: Arc<Cache>,
    ) -> Self {
        Self {
            workshops,
            categories,
            tags,
            cache,
        }
    }

    /// Create or update a workshop from a form submission.
    ///
    /// A non-empty `id` field selects the update path; otherwise the
    /// store assigns a fresh id. Validation runs the full schema first so
    /// the caller gets every field error in one response, then the
    /// referenced category and tags are checked for existence.
    pub async fn save(&self, form: &FormSubmission) -> Result<Workshop, WorkshopServiceError> {
        let input = self.validate(form).await?;

        let saved = match form.get_non_empty("id") {
            Some(id) => self
                .workshops
                .update(id, input)
                .await
                .context("Failed to update workshop")?
                .ok_or_else(|| WorkshopServiceError::NotFound(id.to_string()))?,
            None => self
                .workshops
                .insert(input)
                .await
                .context("Failed to create workshop")?,
        };

        self.cache.delete_prefix(keys::WORKSHOPS).await;
        Ok(saved)
    }

    /// Delete a workshop.
    pub async fn delete(&self, id: &str) -> Result<(), WorkshopServiceError> {
        let removed = self
            .workshops
            .delete(id)
            .await
            .context("Failed to delete workshop")?;
        if !removed {
            return Err(WorkshopServiceError::NotFound(id.to_string()));
        }
        self.cache.delete_prefix(keys::WORKSHOPS).await;
        Ok(())
    }

    /// Filtered, date-ascending list of denormalized views.
    ///
    /// The unfiltered join is cached; filters apply to the cached list so
    /// every query variant shares one store read.
    pub async fn list_views(
        &self,
        query: &WorkshopQuery,
    ) -> Result<Vec<WorkshopView>, WorkshopServiceError> {
        let mut views = self.all_views().await?;
        views.retain(|view| matches_query(view, query));
        views.sort_by_key(|view| view.workshop.date);
        Ok(views)
    }

    /// One denormalized view by workshop id.
    pub async fn get_view(&self, id: &str) -> Result<WorkshopView, WorkshopServiceError> {
        let cache_key = format!("{}id:{id}", keys::WORKSHOPS);
        if let Some(view) = self.cache.get::<WorkshopView>(&cache_key).await {
            return Ok(view);
        }

        let workshop = self
            .workshops
            .get_by_id(id)
            .await
            .context("Failed to get workshop")?
            .ok_or_else(|| WorkshopServiceError::NotFound(id.to_string()))?;

        let categories = index_categories(
            self.categories.list().await.context("Failed to list categories")?,
        );
        let tags = index_tags(self.tags.list().await.context("Failed to list tags")?);
        let view = resolve_view(workshop, &categories, &tags);

        if let Err(e) = self.cache.set(&cache_key, &view).await {
            tracing::warn!("Failed to cache {cache_key}: {e}");
        }
        Ok(view)
    }

    /// Summary statistics for the admin dashboard: entity counts plus
    /// the upcoming/featured tallies and the per-category and free/paid
    /// breakdowns the dashboard charts render.
    pub async fn stats(&self) -> Result<DashboardStats, WorkshopServiceError> {
        let workshops = self.workshops.list().await.context("Failed to list workshops")?;
        let categories = self.categories.list().await.context("Failed to list categories")?;
        let tags = self.tags.list().await.context("Failed to list tags")?;

        let now = Utc::now();
        let upcoming = workshops.iter().filter(|w| w.date >= now).count();
        let featured = workshops.iter().filter(|w| w.is_featured).count();
        let free = workshops.iter().filter(|w| w.price == Price::Free).count();

        let by_category = categories
            .iter()
            .map(|category| CategoryCount {
                name: category.name.clone(),
                total: workshops
                    .iter()
                    .filter(|w| w.category_id == category.id)
                    .count(),
            })
            .collect();

        Ok(DashboardStats {
            workshops: workshops.len(),
            upcoming,
            featured,
            categories: categories.len(),
            tags: tags.len(),
            by_category,
            price_split: PriceSplit {
                free,
                paid: workshops.len() - free,
            },
        })
    }

    async fn all_views(&self) -> Result<Vec<WorkshopView>, WorkshopServiceError> {
        let cache_key = "workshops:list";
        if let Some(views) = self.cache.get::<Vec<WorkshopView>>(cache_key).await {
            return Ok(views);
        }

        let workshops = self.workshops.list().await.context("Failed to list workshops")?;
        let categories = index_categories(
            self.categories.list().await.context("Failed to list categories")?,
        );
        let tags = index_tags(self.tags.list().await.context("Failed to list tags")?);

        let views: Vec<WorkshopView> = workshops
            .into_iter()
            .map(|workshop| resolve_view(workshop, &categories, &tags))
            .collect();

        if let Err(e) = self.cache.set(cache_key, &views).await {
            tracing::warn!("Failed to cache {cache_key}: {e}");
        }
        Ok(views)
    }

    /// Run the full field schema, then the reference preconditions.
    ///
    /// Unknown category or tag ids surface as field errors alongside the
    /// schema violations rather than as a separate failure mode; the
    /// admin form renders them the same way.
    async fn validate(
        &self,
        form: &FormSubmission,
    ) -> Result<WorkshopInput, WorkshopServiceError> {
        let mut errors = FieldErrors::new();

        let title = min_len(
            &mut errors,
            "title",
            form.get("title"),
            3,
            "Title must be at least 3 characters",
        );
        let presenter = min_len(
            &mut errors,
            "presenter",
            form.get("presenter"),
            2,
            "Presenter name is required",
        );
        let description = min_len(
            &mut errors,
            "description",
            form.get("description"),
            10,
            "Description must be at least 10 characters",
        );
        let image_url = required_url(&mut errors, "imageUrl", form.get("imageUrl"));
        let session_link = required_url(&mut errors, "sessionLink", form.get("sessionLink"));
        let conductor_website =
            optional_url(&mut errors, "conductorWebsite", form.get("conductorWebsite"));
        let date = required_date(&mut errors, "date", form.get("date"));
        let duration_days = required_u32(
            &mut errors,
            "durationDays",
            form.get("durationDays"),
            1,
            "Duration must be at least 1 day",
        );

        let start_time = form.get_non_empty("startTime");
        if start_time.is_none() {
            errors.push("startTime", "Start time is required");
        }
        let end_time = form.get_non_empty("endTime");
        if end_time.is_none() {
            errors.push("endTime", "End time is required");
        }

        let price = match Price::normalize(form.get("price").unwrap_or("")) {
            Some(price) => Some(price),
            None => {
                errors.push("price", "Price must be a number or \"Free\"");
                None
            }
        };

        let category_id = match form.get_non_empty("categoryId") {
            Some(id) => {
                if self
                    .categories
                    .get_by_id(id)
                    .await
                    .context("Failed to check category reference")?
                    .is_none()
                {
                    errors.push("categoryId", "Unknown category");
                }
                Some(id.to_string())
            }
            None => {
                errors.push("categoryId", "Please select a category.");
                None
            }
        };

        let tag_ids: Vec<String> = form
            .get_all("tagIds")
            .into_iter()
            .map(str::to_string)
            .collect();
        if tag_ids.is_empty() {
            errors.push("tagIds", "At least one tag is required");
        }
        for tag_id in &tag_ids {
            if self
                .tags
                .get_by_id(tag_id)
                .await
                .context("Failed to check tag reference")?
                .is_none()
            {
                errors.push("tagIds", format!("Unknown tag: {tag_id}"));
            }
        }

        if !errors.is_empty() {
            return Err(WorkshopServiceError::Validation(errors));
        }

        // Every extractor succeeded once errors is empty.
        let (Some(title), Some(presenter), Some(description)) = (title, presenter, description)
        else {
            return Err(WorkshopServiceError::Validation(errors));
        };
        let (Some(image_url), Some(session_link), Some(date)) = (image_url, session_link, date)
        else {
            return Err(WorkshopServiceError::Validation(errors));
        };
        let (Some(duration_days), Some(price), Some(category_id)) =
            (duration_days, price, category_id)
        else {
            return Err(WorkshopServiceError::Validation(errors));
        };
        let (Some(start_time), Some(end_time)) = (start_time, end_time) else {
            return Err(WorkshopServiceError::Validation(errors));
        };

        Ok(WorkshopInput {
            title: title.to_string(),
            description: description.to_string(),
            presenter: presenter.to_string(),
            image_url,
            date,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            duration_days,
            price,
            session_link,
            conductor_website,
            category_id,
            tag_ids,
            is_featured: form.get_flag("isFeatured"),
        })
    }
}

fn index_categories(categories: Vec<Category>) -> HashMap<String, Category> {
    categories.into_iter().map(|c| (c.id.clone(), c)).collect()
}

fn index_tags(tags: Vec<Tag>) -> HashMap<String, Tag> {
    tags.into_iter().map(|t| (t.id.clone(), t)).collect()
}

/// Join one workshop with its resolved references. A dangling reference
/// resolves to a placeholder carrying the raw id; the store preconditions
/// keep that from happening, but a read must not fail over it.
fn resolve_view(
    workshop: Workshop,
    categories: &HashMap<String, Category>,
    tags: &HashMap<String, Tag>,
) -> WorkshopView {
    let category = categories
        .get(&workshop.category_id)
        .cloned()
        .unwrap_or_else(|| {
            Category::new(workshop.category_id.clone(), workshop.category_id.clone())
        });
    let resolved_tags = workshop
        .tag_ids
        .iter()
        .map(|id| {
            tags.get(id)
                .cloned()
                .unwrap_or_else(|| Tag::new(id.clone(), id.clone()))
        })
        .collect();
    WorkshopView {
        workshop,
        category,
        tags: resolved_tags,
    }
}

fn matches_query(view: &WorkshopView, query: &WorkshopQuery) -> bool {
    if let Some(category) = &query.category {
        if &view.workshop.category_id != category {
            return false;
        }
    }
    if let Some(tag) = &query.tag {
        if !view.workshop.tag_ids.iter().any(|id| id == tag) {
            return false;
        }
    }
    if let Some(featured) = query.featured {
        if view.workshop.is_featured != featured {
            return false;
        }
    }
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let workshop = &view.workshop;
        let hit = workshop.title.to_lowercase().contains(&needle)
            || workshop.presenter.to_lowercase().contains(&needle)
            || workshop.description.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }
    true
}
