//! Tag endpoints
//!
//! - GET    /api/v1/tags      - public list
//! - POST   /admin/tags       - create or rename from a form body
//! - DELETE /admin/tags/{id}  - delete (blocked while referenced)

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::ActionResult;
use crate::models::Tag;
use crate::services::FormSubmission;

/// GET /api/v1/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = state.tag_service.list().await?;
    Ok(Json(tags))
}

/// POST /admin/tags
pub async fn save_tag(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormSubmission::parse(&body);
    let updating = form.get_non_empty("id").is_some();
    let saved = state.tag_service.save(&form).await?;
    tracing::info!(id = %saved.id, name = %saved.name, "Tag saved");
    Ok(Json(ActionResult::ok(if updating {
        "Tag updated"
    } else {
        "Tag created"
    })))
}

/// DELETE /admin/tags/{id}
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.tag_service.delete(&id).await?;
    tracing::info!(id = %id, "Tag deleted");
    Ok(Json(ActionResult::ok("Tag deleted")))
}
