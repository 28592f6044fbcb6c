//! API layer - HTTP handlers and routing
//!
//! - Public catalog reads under `/api/v1`
//! - Admin back-office under `/admin`, behind the session guard
//!
//! The guard is a single middleware over the whole router; it keys off
//! the request path, so the login carve-out and the redirect behavior
//! live in one place rather than per-route layers.

pub mod admin;
pub mod auth;
pub mod categories;
pub mod middleware;
pub mod responses;
pub mod tags;
pub mod workshops;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{classify_path, ApiError, AppState, RouteClass};
pub use responses::ActionResult;

/// Build the public catalog router.
fn public_router() -> Router<AppState> {
    Router::new()
        .route("/workshops", get(workshops::list_workshops))
        .route("/workshops/{id}", get(workshops::get_workshop))
        .route("/categories", get(categories::list_categories))
        .route("/tags", get(tags::list_tags))
}

/// Build the admin back-office router. Protection comes from the
/// session guard keyed on the `/admin` prefix, not from per-route
/// layers; `/admin/login` is the guard's only carve-out.
fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/describe", post(admin::describe))
        .route("/workshops", post(workshops::save_workshop))
        .route("/workshops/{id}", delete(workshops::delete_workshop))
        .route("/categories", post(categories::save_category))
        .route("/categories/{id}", delete(categories::delete_category))
        .route("/tags", post(tags::save_tag))
        .route("/tags/{id}", delete(tags::delete_tag))
}

/// Build the complete router with middleware.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    // CORS must allow credentials for the cookie-based session.
    let origin = cors_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true);

    Router::new()
        .nest("/api/v1", public_router())
        .nest("/admin", admin_router())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session_guard,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
