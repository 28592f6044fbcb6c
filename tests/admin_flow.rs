//! End-to-end tests for the session guard and the admin mutation flow.

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;

use weekendexpress::api::{build_router, AppState};
use weekendexpress::auth::TokenCodec;
use weekendexpress::cache::create_cache;
use weekendexpress::config::{AdminConfig, CacheConfig, DescriberConfig};
use weekendexpress::services::{
    AuthService, CategoryService, Describer, TagService, WorkshopService,
};
use weekendexpress::store::MemoryStore;

const ADMIN_EMAIL: &str = "admin@weekendexpress.dev";
const ADMIN_PASSWORD: &str = "correct horse battery staple";
const SECRET: &str = "an-integration-test-secret-of-decent-length";

fn test_server() -> TestServer {
    let store = MemoryStore::seeded();
    let cache = create_cache(&CacheConfig::default());
    let codec = TokenCodec::new(SECRET);
    let admin = AdminConfig {
        email: Some(ADMIN_EMAIL.to_string()),
        password: Some(ADMIN_PASSWORD.to_string()),
        allow_dev_credentials: false,
    };

    let workshops = Arc::new(store.clone());
    let state = AppState {
        auth_service: Arc::new(AuthService::new(admin, codec)),
        workshop_service: Arc::new(WorkshopService::new(
            workshops.clone(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            cache.clone(),
        )),
        category_service: Arc::new(CategoryService::new(
            Arc::new(store.clone()),
            workshops.clone(),
            cache.clone(),
        )),
        tag_service: Arc::new(TagService::new(
            Arc::new(store.clone()),
            workshops,
            cache.clone(),
        )),
        describer: Arc::new(Describer::new(&DescriberConfig::default())),
        cache,
    };

    TestServer::new(build_router(state, "http://localhost:3000")).unwrap()
}

fn session_cookie(email: &str) -> HeaderValue {
    let (token, _) = TokenCodec::new(SECRET).issue(email);
    HeaderValue::from_str(&format!("session={token}")).unwrap()
}

fn forged_cookie() -> HeaderValue {
    let (token, _) = TokenCodec::new("some-entirely-different-secret").issue(ADMIN_EMAIL);
    HeaderValue::from_str(&format!("session={token}")).unwrap()
}

#[tokio::test]
async fn public_catalog_needs_no_session() {
    let server = test_server();

    let response = server.get("/api/v1/workshops").await;
    response.assert_status_ok();
    let views: serde_json::Value = response.json();
    assert_eq!(views.as_array().unwrap().len(), 1);
    assert_eq!(views[0]["category"]["name"], "Technology");

    server.get("/api/v1/categories").await.assert_status_ok();
    server.get("/api/v1/tags").await.assert_status_ok();
}

#[tokio::test]
async fn protected_path_without_session_redirects_to_login() {
    let server = test_server();
    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin/login"
    );
}

#[tokio::test]
async fn forged_session_behaves_like_no_session() {
    let server = test_server();
    let response = server
        .get("/admin")
        .add_header(header::COOKIE, forged_cookie())
        .await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin/login"
    );
}

#[tokio::test]
async fn login_page_with_session_bounces_to_dashboard() {
    let server = test_server();
    let response = server
        .post("/admin/login")
        .add_header(header::COOKIE, session_cookie(ADMIN_EMAIL))
        .await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin");
}

#[tokio::test]
async fn login_sets_cookie_and_opens_the_back_office() {
    let server = test_server();

    let login = server
        .post("/admin/login")
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .await;
    login.assert_status_ok();

    let set_cookie = login
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    let cookie_pair = set_cookie.split(';').next().unwrap().to_string();
    let dashboard = server
        .get("/admin")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie_pair).unwrap())
        .await;
    dashboard.assert_status_ok();
    let body: serde_json::Value = dashboard.json();
    assert_eq!(body["workshops"], 1);
    assert_eq!(body["categories"], 4);
    assert_eq!(body["tags"], 6);
    assert_eq!(body["admin"], ADMIN_EMAIL);
    // The seeded workshop is past-dated, featured, and free.
    assert_eq!(body["upcoming"], 0);
    assert_eq!(body["featured"], 1);
    assert_eq!(body["priceSplit"]["free"], 1);
    assert_eq!(body["priceSplit"]["paid"], 0);
    let by_category = body["byCategory"].as_array().unwrap();
    assert_eq!(by_category.len(), 4);
    let tech = by_category
        .iter()
        .find(|entry| entry["name"] == "Technology")
        .unwrap();
    assert_eq!(tech["total"], 1);

    // Every authenticated response carries a refreshed cookie.
    assert!(dashboard.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let server = test_server();

    let wrong_password = server
        .post("/admin/login")
        .form(&[("email", ADMIN_EMAIL), ("password", "nope")])
        .await;
    let unknown_email = server
        .post("/admin/login")
        .form(&[("email", "stranger@example.com"), ("password", "nope")])
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.text(), unknown_email.text());
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let server = test_server();
    let response = server
        .post("/admin/logout")
        .add_header(header::COOKIE, session_cookie(ADMIN_EMAIL))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn category_mutation_flows_through_to_the_public_list() {
    let server = test_server();
    let cookie = session_cookie(ADMIN_EMAIL);

    let created = server
        .post("/admin/categories")
        .add_header(header::COOKIE, cookie.clone())
        .form(&[("name", "Machine Learning")])
        .await;
    created.assert_status_ok();

    let listed = server.get("/api/v1/categories").await;
    listed.assert_status_ok();
    let categories: serde_json::Value = listed.json();
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Machine Learning"));
}

#[tokio::test]
async fn duplicate_category_name_conflicts() {
    let server = test_server();
    let response = server
        .post("/admin/categories")
        .add_header(header::COOKIE, session_cookie(ADMIN_EMAIL))
        .form(&[("name", "TECHNOLOGY")])
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn referenced_category_cannot_be_deleted() {
    let server = test_server();
    let response = server
        .delete("/admin/categories/tech")
        .add_header(header::COOKIE, session_cookie(ADMIN_EMAIL))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn workshop_validation_errors_are_field_indexed() {
    let server = test_server();
    let response = server
        .post("/admin/workshops")
        .add_header(header::COOKIE, session_cookie(ADMIN_EMAIL))
        .form(&[("title", "Hi")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["fields"]["title"].is_array());
    assert!(body["error"]["details"]["fields"]["categoryId"].is_array());
}

#[tokio::test]
async fn workshop_create_and_filtered_listing() {
    let server = test_server();
    let created = server
        .post("/admin/workshops")
        .add_header(header::COOKIE, session_cookie(ADMIN_EMAIL))
        .form(&[
            ("title", "Rust for Web Developers"),
            ("presenter", "Jo Smith"),
            ("description", "Two days of hands-on systems programming."),
            ("imageUrl", "https://example.com/cover.png"),
            ("sessionLink", "https://example.com/join"),
            ("date", "2025-09-13"),
            ("startTime", "4:00 PM"),
            ("endTime", "6:00 PM"),
            ("durationDays", "2"),
            ("price", "free"),
            ("categoryId", "tech"),
            ("tagIds", "beginner"),
        ])
        .await;
    created.assert_status_ok();

    let all = server.get("/api/v1/workshops").await;
    let views: serde_json::Value = all.json();
    assert_eq!(views.as_array().unwrap().len(), 2);
    // Price normalization: "free" serializes as the literal.
    assert_eq!(views[1]["price"], "Free");

    let filtered = server.get("/api/v1/workshops?tag=beginner").await;
    let views: serde_json::Value = filtered.json();
    assert_eq!(views.as_array().unwrap().len(), 1);
    assert_eq!(views[0]["title"], "Rust for Web Developers");
}

#[tokio::test]
async fn describe_without_endpoint_returns_empty_draft() {
    let server = test_server();
    let response = server
        .post("/admin/describe")
        .add_header(header::COOKIE, session_cookie(ADMIN_EMAIL))
        .json(&serde_json::json!({
            "category": "Technology",
            "time": "4:00 PM - 6:00 PM",
            "presenter": "Jo Smith",
            "keywords": "rust, web"
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body.get("description").is_none() || body["description"].is_null());
}
