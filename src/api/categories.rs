//! Category endpoints
//!
//! - GET    /api/v1/categories      - public list
//! - POST   /admin/categories       - create or rename from a form body
//! - DELETE /admin/categories/{id}  - delete (blocked while referenced)

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::ActionResult;
use crate::models::Category;
use crate::services::FormSubmission;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.category_service.list().await?;
    Ok(Json(categories))
}

/// POST /admin/categories
pub async fn save_category(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormSubmission::parse(&body);
    let updating = form.get_non_empty("id").is_some();
    let saved = state.category_service.save(&form).await?;
    tracing::info!(id = %saved.id, name = %saved.name, "Category saved");
    Ok(Json(ActionResult::ok(if updating {
        "Category updated"
    } else {
        "Category created"
    })))
}

/// DELETE /admin/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.category_service.delete(&id).await?;
    tracing::info!(id = %id, "Category deleted");
    Ok(Json(ActionResult::ok("Category deleted")))
}
