//! Shared API response types
//!
//! Successful mutations answer with an [`ActionResult`]. Failures travel
//! as [`ApiError`]s; validation failures carry the field-indexed error
//! map the admin forms render inline under `error.details.fields`.
//! Service errors map onto [`ApiError`] uniformly so every mutation
//! endpoint reports failures the same way.

use serde::Serialize;

use crate::api::middleware::ApiError;
use crate::services::{
    AuthServiceError, CategoryServiceError, TagServiceError, WorkshopServiceError,
};

/// Outcome of a successful admin mutation.
#[derive(Debug, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl From<WorkshopServiceError> for ApiError {
    fn from(e: WorkshopServiceError) -> Self {
        match e {
            WorkshopServiceError::Validation(errors) => ApiError::with_details(
                "VALIDATION_ERROR",
                "Validation failed",
                serde_json::json!({ "fields": errors.into_map() }),
            ),
            WorkshopServiceError::NotFound(id) => {
                ApiError::not_found(format!("Workshop not found: {id}"))
            }
            WorkshopServiceError::Internal(e) => {
                tracing::error!("Workshop operation failed: {e:#}");
                ApiError::internal_error("Internal error")
            }
        }
    }
}

impl From<CategoryServiceError> for ApiError {
    fn from(e: CategoryServiceError) -> Self {
        match e {
            CategoryServiceError::Validation(errors) => ApiError::with_details(
                "VALIDATION_ERROR",
                "Validation failed",
                serde_json::json!({ "fields": errors.into_map() }),
            ),
            CategoryServiceError::DuplicateName(_) => {
                ApiError::conflict("Category already exists.")
            }
            CategoryServiceError::InUse => ApiError::conflict(
                "Cannot delete category as it is currently in use by a workshop.",
            ),
            CategoryServiceError::NotFound(id) => {
                ApiError::not_found(format!("Category not found: {id}"))
            }
            CategoryServiceError::Internal(e) => {
                tracing::error!("Category operation failed: {e:#}");
                ApiError::internal_error("Internal error")
            }
        }
    }
}

impl From<TagServiceError> for ApiError {
    fn from(e: TagServiceError) -> Self {
        match e {
            TagServiceError::Validation(errors) => ApiError::with_details(
                "VALIDATION_ERROR",
                "Validation failed",
                serde_json::json!({ "fields": errors.into_map() }),
            ),
            TagServiceError::DuplicateName(_) => ApiError::conflict("Tag already exists."),
            TagServiceError::InUse => ApiError::conflict(
                "Cannot delete tag as it is currently in use by a workshop.",
            ),
            TagServiceError::NotFound(id) => ApiError::not_found(format!("Tag not found: {id}")),
            TagServiceError::Internal(e) => {
                tracing::error!("Tag operation failed: {e:#}");
                ApiError::internal_error("Internal error")
            }
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(e: AuthServiceError) -> Self {
        match e {
            AuthServiceError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validate::FieldErrors;

    #[test]
    fn test_action_result_serializes_success_and_message_only() {
        let json = serde_json::to_value(ActionResult::ok("Workshop created")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "Workshop created" })
        );
    }

    #[test]
    fn test_validation_error_carries_field_map_in_details() {
        let mut errors = FieldErrors::new();
        errors.push("title", "Title must be at least 3 characters");
        let api_error: ApiError = WorkshopServiceError::Validation(errors).into();
        assert_eq!(api_error.error.code, "VALIDATION_ERROR");
        let details = api_error.error.details.unwrap();
        assert_eq!(
            details["fields"]["title"][0],
            "Title must be at least 3 characters"
        );
    }
}
