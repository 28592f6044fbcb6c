//! In-memory store
//!
//! Each collection lives behind its own `RwLock`, so two requests
//! mutating the same collection serialize on the writer lock instead of
//! racing through an unguarded shared array. Preconditions (uniqueness,
//! in-use checks) still run in the service layer before the write lock is
//! taken, matching the original pipeline ordering.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Category, Price, Tag, Workshop, WorkshopInput};

use super::{CategoryStore, TagStore, WorkshopStore};

/// Process-local store holding all three collections.
///
/// Cheap to clone; clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    workshops: Arc<RwLock<Vec<Workshop>>>,
    categories: Arc<RwLock<Vec<Category>>>,
    tags: Arc<RwLock<Vec<Tag>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the catalog's seed data.
    pub fn seeded() -> Self {
        let categories = vec![
            Category::new("tech".into(), "Technology".into()),
            Category::new("art".into(), "Art & Creativity".into()),
            Category::new("wellness".into(), "Wellness".into()),
            Category::new("business".into(), "Business".into()),
        ];
        let tags = vec![
            Tag::new("beginner".into(), "Beginner".into()),
            Tag::new("advanced".into(), "Advanced".into()),
            Tag::new("monkey".into(), "Monkey".into()),
            Tag::new("react".into(), "React".into()),
            Tag::new("ai".into(), "AI".into()),
            Tag::new("genai".into(), "GenAI".into()),
        ];
        let workshops = vec![Workshop {
            id: "6".into(),
            title: "A Deep Dive into the Applied GenAI Cohort".into(),
            description: "Join us for a waitlist-exclusive session where we \
                walk through the upcoming Applied GenAI Cohort, from hands-on \
                projects to real student outcomes."
                .into(),
            presenter: "WeekendExpress Team".into(),
            image_url: "https://static.weekendexpress.dev/covers/genai-cohort.png".into(),
            date: Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).single().unwrap_or_else(Utc::now),
            start_time: "4:00 PM".into(),
            end_time: "6:00 PM".into(),
            duration_days: 1,
            price: Price::Free,
            session_link: "https://zoom.us/j/1234567890".into(),
            conductor_website: None,
            category_id: "tech".into(),
            tag_ids: vec!["genai".into(), "ai".into()],
            is_featured: true,
        }];

        Self {
            workshops: Arc::new(RwLock::new(workshops)),
            categories: Arc::new(RwLock::new(categories)),
            tags: Arc::new(RwLock::new(tags)),
        }
    }

    /// Next workshop id: highest numeric id + 1, as a decimal string.
    fn next_workshop_id(workshops: &[Workshop]) -> String {
        let max = workshops
            .iter()
            .filter_map(|w| w.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

#[async_trait]
impl WorkshopStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Workshop>> {
        Ok(self.workshops.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Workshop>> {
        Ok(self.workshops.read().await.iter().find(|w| w.id == id).cloned())
    }

    async fn insert(&self, input: WorkshopInput) -> Result<Workshop> {
        let mut workshops = self.workshops.write().await;
        let id = Self::next_workshop_id(&workshops);
        let workshop = input.into_workshop(id);
        workshops.push(workshop.clone());
        Ok(workshop)
    }

    async fn update(&self, id: &str, input: WorkshopInput) -> Result<Option<Workshop>> {
        let mut workshops = self.workshops.write().await;
        match workshops.iter_mut().find(|w| w.id == id) {
            Some(slot) => {
                *slot = input.into_workshop(id.to_string());
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut workshops = self.workshops.write().await;
        let before = workshops.len();
        workshops.retain(|w| w.id != id);
        Ok(workshops.len() < before)
    }

    async fn any_with_category(&self, category_id: &str) -> Result<bool> {
        Ok(self
            .workshops
            .read()
            .await
            .iter()
            .any(|w| w.category_id == category_id))
    }

    async fn any_with_tag(&self, tag_id: &str) -> Result<bool> {
        Ok(self
            .workshops
            .read()
            .await
            .iter()
            .any(|w| w.tag_ids.iter().any(|t| t == tag_id)))
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.categories.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Category>> {
        Ok(self.categories.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category> {
        let mut categories = self.categories.write().await;
        categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: &str, name: String) -> Result<Option<Category>> {
        let mut categories = self.categories.write().await;
        match categories.iter_mut().find(|c| c.id == id) {
            Some(category) => {
                category.name = name;
                Ok(Some(category.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut categories = self.categories.write().await;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() < before)
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Tag>> {
        Ok(self.tags.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        Ok(self
            .tags
            .read()
            .await
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn insert(&self, tag: Tag) -> Result<Tag> {
        let mut tags = self.tags.write().await;
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn update(&self, id: &str, name: String) -> Result<Option<Tag>> {
        let mut tags = self.tags.write().await;
        match tags.iter_mut().find(|t| t.id == id) {
            Some(tag) => {
                tag.name = name;
                Ok(Some(tag.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tags = self.tags.write().await;
        let before = tags.len();
        tags.retain(|t| t.id != id);
        Ok(tags.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use chrono::Utc;

    fn sample_input(title: &str) -> WorkshopInput {
        WorkshopInput {
            title: title.to_string(),
            description: "A long enough description for tests.".to_string(),
            presenter: "Presenter".to_string(),
            image_url: "https://example.com/img.png".to_string(),
            date: Utc::now(),
            start_time: "10:00 AM".to_string(),
            end_time: "12:00 PM".to_string(),
            duration_days: 1,
            price: Price::Free,
            session_link: "https://example.com/join".to_string(),
            conductor_website: None,
            category_id: "tech".to_string(),
            tag_ids: vec!["beginner".to_string()],
            is_featured: false,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_incrementing_ids() {
        let store = MemoryStore::new();
        let first = WorkshopStore::insert(&store, sample_input("First")).await.unwrap();
        let second = WorkshopStore::insert(&store, sample_input("Second")).await.unwrap();
        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
    }

    #[tokio::test]
    async fn test_id_sequence_survives_deletes() {
        let store = MemoryStore::new();
        let first = WorkshopStore::insert(&store, sample_input("First")).await.unwrap();
        let _second = WorkshopStore::insert(&store, sample_input("Second")).await.unwrap();
        assert!(WorkshopStore::delete(&store, &first.id).await.unwrap());

        // "2" is still the max, so the next id is "3", not a reused "1".
        let third = WorkshopStore::insert(&store, sample_input("Third")).await.unwrap();
        assert_eq!(third.id, "3");
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryStore::new();
        let result = WorkshopStore::update(&store, "42", sample_input("Nope")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let store = MemoryStore::new();
        assert!(!WorkshopStore::delete(&store, "42").await.unwrap());
    }

    #[tokio::test]
    async fn test_category_name_lookup_is_case_insensitive() {
        let store = MemoryStore::seeded();
        let hit = CategoryStore::get_by_name(&store, "TECHNOLOGY").await.unwrap();
        assert_eq!(hit.map(|c| c.id), Some("tech".to_string()));
    }

    #[tokio::test]
    async fn test_reference_checks_against_seed() {
        let store = MemoryStore::seeded();
        assert!(store.any_with_category("tech").await.unwrap());
        assert!(!store.any_with_category("wellness").await.unwrap());
        assert!(store.any_with_tag("genai").await.unwrap());
        assert!(!store.any_with_tag("beginner").await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_collections() {
        let store = MemoryStore::new();
        let clone = store.clone();
        WorkshopStore::insert(&store, sample_input("Shared")).await.unwrap();
        assert_eq!(WorkshopStore::list(&clone).await.unwrap().len(), 1);
    }
}
