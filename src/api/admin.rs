//! Admin dashboard endpoints
//!
//! - GET  /admin           - counts and chart breakdowns for the dashboard
//! - POST /admin/describe  - draft a workshop description from hints

use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState, CurrentSession};
use crate::services::{DashboardStats, DescribeRequest};

/// Dashboard payload: the stats summary plus the signed-in admin.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub admin: String,
}

/// GET /admin
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(CurrentSession(claims)): Extension<CurrentSession>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let stats = state.workshop_service.stats().await?;
    Ok(Json(DashboardResponse {
        stats,
        admin: claims.sub,
    }))
}

/// Response for a description draft.
#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// POST /admin/describe
///
/// Best-effort: a disabled or failing generator answers with an empty
/// draft rather than an error, and the admin writes the description by
/// hand.
pub async fn describe(
    State(state): State<AppState>,
    Json(request): Json<DescribeRequest>,
) -> impl IntoResponse {
    let description = state.describer.describe(&request).await;
    Json(DescribeResponse { description })
}
