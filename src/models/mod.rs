//! Data models
//!
//! This module contains the data structures used throughout the
//! WeekendExpress catalog:
//! - Store entities (Workshop, Category, Tag)
//! - The denormalized WorkshopView read model
//! - The admin Session

mod category;
mod session;
mod tag;
mod workshop;

pub use category::Category;
pub use session::Session;
pub use tag::Tag;
pub use workshop::{Price, Workshop, WorkshopInput, WorkshopQuery, WorkshopView};
