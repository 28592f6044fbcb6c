//! API middleware
//!
//! The session guard for the admin back-office. Every request is
//! classified by path prefix before any handler runs:
//! - paths under `/admin` are protected
//! - `/admin/login` is carved out so the login form stays reachable
//! - everything else is public
//!
//! Requests hitting a protected path without a verifiable session are
//! redirected to the login page; an already-authenticated visit to the
//! login page is bounced back to the dashboard. Verification fails
//! closed: a malformed, forged, or expired token behaves exactly like a
//! missing one.
//!
//! Protected responses also refresh the session cookie with a freshly
//! signed token, sliding the expiry window on every authenticated
//! request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{Claims, TokenCodec};
use crate::cache::Cache;
use crate::services::{
    AuthService, CategoryService, Describer, TagService, WorkshopService,
};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Path of the admin login page, exempt from the guard
pub const LOGIN_PATH: &str = "/admin/login";

/// Path of the admin dashboard, the landing target after login
pub const ADMIN_PATH: &str = "/admin";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub workshop_service: Arc<WorkshopService>,
    pub category_service: Arc<CategoryService>,
    pub tag_service: Arc<TagService>,
    pub describer: Arc<Describer>,
    pub cache: Arc<Cache>,
}

/// Verified session claims attached to protected requests
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Claims);

/// Error response for API errors
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// How the guard treats a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No session required
    Public,
    /// The login page: reachable without a session, bounces an
    /// authenticated visitor back to the dashboard
    Login,
    /// Admin back-office: session required
    Protected,
}

/// Classify a request path by prefix.
///
/// `/admin` and everything under it is protected, except the login page
/// itself (including its sub-paths, so login form assets stay
/// reachable). Prefix matching is segment-aware: `/administrator` is
/// public.
pub fn classify_path(path: &str) -> RouteClass {
    if path == LOGIN_PATH || path.starts_with("/admin/login/") {
        return RouteClass::Login;
    }
    if path == ADMIN_PATH || path.starts_with("/admin/") {
        return RouteClass::Protected;
    }
    RouteClass::Public
}

/// Extract the session token from the request's cookie header.
pub fn extract_session_token(request: &Request) -> Option<String> {
    let cookie_header = request.headers().get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;
    for cookie in cookie_str.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=') {
            if name == SESSION_COOKIE {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Session guard middleware.
///
/// Applied to the whole router; the path classification decides whether
/// a session is required. On protected paths the verified claims are
/// attached to the request and the response gets a refreshed cookie.
pub async fn session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let class = classify_path(request.uri().path());
    let codec = state.auth_service.codec();
    let claims = verify_request(codec, &request);

    match (class, claims) {
        (RouteClass::Public, _) => next.run(request).await,

        (RouteClass::Login, Some(_)) => {
            // Already signed in; nothing to do on the login page.
            Redirect::temporary(ADMIN_PATH).into_response()
        }
        (RouteClass::Login, None) => next.run(request).await,

        (RouteClass::Protected, Some(claims)) => {
            // Re-sign on every authenticated request so an active admin
            // session never expires mid-use.
            let (token, refreshed) = codec.issue(&claims.sub);
            request.extensions_mut().insert(CurrentSession(claims));
            let mut response = next.run(request).await;
            set_session_cookie(&mut response, &token, refreshed.exp - refreshed.iat);
            response
        }
        (RouteClass::Protected, None) => Redirect::temporary(LOGIN_PATH).into_response(),
    }
}

/// Verify the request's session token, logging at debug level why a
/// request is treated as anonymous.
fn verify_request(codec: &TokenCodec, request: &Request) -> Option<Claims> {
    let token = match extract_session_token(request) {
        Some(token) => token,
        None => {
            tracing::debug!(path = %request.uri().path(), "No session cookie");
            return None;
        }
    };
    match codec.verify(&token) {
        Some(claims) => Some(claims),
        None => {
            tracing::debug!(
                path = %request.uri().path(),
                "Session token failed verification"
            );
            None
        }
    }
}

/// Write the session cookie on a response.
pub fn set_session_cookie(response: &mut Response, token: &str, max_age_secs: i64) {
    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
}

/// Header value that clears the session cookie.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
