//! Workshop model
//!
//! Defines the Workshop entity, its price representation, and the
//! denormalized view used by the public listing.
//!
//! A workshop holds foreign keys to exactly one category and at least one
//! tag. The keys are resolved into full objects only at read time through
//! [`WorkshopView`]; the stored record never embeds the referenced rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Tag};

/// Workshop price: either the literal "Free" or a non-negative amount.
///
/// Serialized exactly like the catalog UI expects: the string `"Free"` or
/// a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Price {
    /// No charge
    Free,
    /// Paid, in whole currency units
    Amount(u32),
}

impl Price {
    /// Normalize a raw form value into a price.
    ///
    /// Empty input, `"0"`, and any casing of `"free"` all collapse to
    /// [`Price::Free`]. Anything else must parse as a non-negative number.
    /// Returns `None` for unparseable input.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("free") {
            return Some(Self::Free);
        }
        match trimmed.parse::<u32>() {
            Ok(0) => Some(Self::Free),
            Ok(n) => Some(Self::Amount(n)),
            Err(_) => None,
        }
    }

    /// Whether this price is the free literal
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }
}

impl Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Free => serializer.serialize_str("Free"),
            Self::Amount(n) => serializer.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl serde::de::Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("the string \"Free\" or a non-negative number")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Price, E> {
                Price::normalize(v)
                    .ok_or_else(|| E::custom(format!("invalid price: {v:?}")))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Price, E> {
                let n = u32::try_from(v)
                    .map_err(|_| E::custom(format!("price out of range: {v}")))?;
                Ok(if n == 0 { Price::Free } else { Price::Amount(n) })
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Price, E> {
                if v < 0 {
                    return Err(E::custom(format!("price must not be negative: {v}")));
                }
                self.visit_u64(v as u64)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Workshop entity as held by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    /// Unique identifier, assigned by the store on insert
    pub id: String,
    /// Workshop title
    pub title: String,
    /// Long-form description
    pub description: String,
    /// Presenter name
    pub presenter: String,
    /// Cover image URL
    pub image_url: String,
    /// Workshop date
    pub date: DateTime<Utc>,
    /// Display start time, e.g. "4:00 PM"
    pub start_time: String,
    /// Display end time
    pub end_time: String,
    /// Duration in days
    pub duration_days: u32,
    /// Price (the literal "Free" or an amount)
    pub price: Price,
    /// Join link for the session
    pub session_link: String,
    /// Optional presenter website
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conductor_website: Option<String>,
    /// Foreign key to exactly one category
    pub category_id: String,
    /// Foreign keys to at least one tag
    pub tag_ids: Vec<String>,
    /// Highlighted on the landing page
    pub is_featured: bool,
}

/// Validated, normalized workshop fields produced by the mutation
/// pipeline. Carries everything except the identity, which the store
/// assigns on insert and the caller supplies on update.
#[derive(Debug, Clone)]
pub struct WorkshopInput {
    pub title: String,
    pub description: String,
    pub presenter: String,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub duration_days: u32,
    pub price: Price,
    pub session_link: String,
    pub conductor_website: Option<String>,
    pub category_id: String,
    pub tag_ids: Vec<String>,
    pub is_featured: bool,
}

impl WorkshopInput {
    /// Build a workshop record with the given identity.
    pub fn into_workshop(self, id: String) -> Workshop {
        Workshop {
            id,
            title: self.title,
            description: self.description,
            presenter: self.presenter,
            image_url: self.image_url,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_days: self.duration_days,
            price: self.price,
            session_link: self.session_link,
            conductor_website: self.conductor_website,
            category_id: self.category_id,
            tag_ids: self.tag_ids,
            is_featured: self.is_featured,
        }
    }
}

/// Workshop with its category and tag references resolved for display.
///
/// This is the explicit read-time join: built once from the store,
/// never recomputed through hidden accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopView {
    /// The workshop record
    #[serde(flatten)]
    pub workshop: Workshop,
    /// Resolved category
    pub category: Category,
    /// Resolved tags, in tag_ids order
    pub tags: Vec<Tag>,
}

/// Filters accepted by the public listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopQuery {
    /// Restrict to a category id
    pub category: Option<String>,
    /// Restrict to workshops carrying a tag id
    pub tag: Option<String>,
    /// Case-insensitive search over title, presenter, and description
    pub search: Option<String>,
    /// Only featured workshops
    pub featured: Option<bool>,
}
