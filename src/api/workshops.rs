//! Workshop endpoints
//!
//! Public catalog reads:
//! - GET /api/v1/workshops       - filtered, date-ascending listing
//! - GET /api/v1/workshops/{id}  - one denormalized view
//!
//! Admin mutations (behind the session guard):
//! - POST   /admin/workshops        - create or update from a form body
//! - DELETE /admin/workshops/{id}   - delete

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::ActionResult;
use crate::models::{WorkshopQuery, WorkshopView};
use crate::services::FormSubmission;

/// GET /api/v1/workshops
pub async fn list_workshops(
    State(state): State<AppState>,
    Query(query): Query<WorkshopQuery>,
) -> Result<Json<Vec<WorkshopView>>, ApiError> {
    let views = state.workshop_service.list_views(&query).await?;
    Ok(Json(views))
}

/// GET /api/v1/workshops/{id}
pub async fn get_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkshopView>, ApiError> {
    let view = state.workshop_service.get_view(&id).await?;
    Ok(Json(view))
}

/// POST /admin/workshops
pub async fn save_workshop(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormSubmission::parse(&body);
    let updating = form.get_non_empty("id").is_some();
    let saved = state.workshop_service.save(&form).await?;
    tracing::info!(id = %saved.id, title = %saved.title, "Workshop saved");
    Ok(Json(ActionResult::ok(if updating {
        "Workshop updated"
    } else {
        "Workshop created"
    })))
}

/// DELETE /admin/workshops/{id}
pub async fn delete_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.workshop_service.delete(&id).await?;
    tracing::info!(id = %id, "Workshop deleted");
    Ok(Json(ActionResult::ok("Workshop deleted")))
}
