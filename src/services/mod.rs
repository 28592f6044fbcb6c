//! Service layer
//!
//! Business logic between the HTTP handlers and the store. Each entity
//! gets a service that owns its validation, preconditions, and cache
//! invalidation; handlers stay thin.

pub mod auth;
pub mod category;
pub mod describe;
pub mod forms;
pub mod slug;
pub mod tag;
pub mod validate;
pub mod workshop;

pub use auth::{AuthService, AuthServiceError};
pub use category::{CategoryService, CategoryServiceError};
pub use describe::{DescribeRequest, Describer};
pub use forms::FormSubmission;
pub use tag::{TagService, TagServiceError};
pub use validate::FieldErrors;
pub use workshop::{DashboardStats, WorkshopService, WorkshopServiceError};
