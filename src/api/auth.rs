//! Authentication endpoints
//!
//! - POST /admin/login  - exchange credentials for a session cookie
//! - POST /admin/logout - clear the session cookie
//!
//! Login accepts a url-encoded form body and sets the `session` cookie
//! on success. The failure message never says which half of the
//! credentials was wrong.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum::extract::State;
use axum::Json;

use crate::api::middleware::{clear_session_cookie, set_session_cookie, ApiError, AppState};
use crate::api::responses::ActionResult;
use crate::services::FormSubmission;

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormSubmission::parse(&body);
    let email = form.get_non_empty("email");
    let password = form.get("password");

    let (email, password) = match (email, password) {
        (Some(email), Some(password)) if !password.is_empty() => (email, password),
        _ => return Err(ApiError::unauthorized("Invalid credentials")),
    };

    let session = state.auth_service.login(email, password)?;
    tracing::info!(email = %session.email, "Admin login");

    let max_age = (session.expires - chrono::Utc::now()).num_seconds().max(0);
    let mut response =
        Json(ActionResult::ok("Logged in")).into_response();
    set_session_cookie(&mut response, &session.token, max_age);
    Ok(response)
}

/// POST /admin/logout
pub async fn logout() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, clear_session_cookie());
    (StatusCode::NO_CONTENT, headers)
}
