//! WeekendExpress - a weekend workshops catalog

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weekendexpress::{
    api::{self, AppState},
    auth::TokenCodec,
    cache::create_cache,
    config::Config,
    services::{AuthService, CategoryService, Describer, TagService, WorkshopService},
    store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weekendexpress=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting WeekendExpress catalog...");

    // Load configuration
    let config = Config::load(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    if !config.admin.is_configured() && !config.admin.allow_dev_credentials {
        tracing::warn!(
            "No admin identity configured; set ADMIN_EMAIL and ADMIN_PASSWORD \
             to enable the back-office"
        );
    }

    // Initialize the entity store and cache
    let store = MemoryStore::seeded();
    let cache = create_cache(&config.cache);
    tracing::info!("Store seeded, cache initialized");

    // Session token codec shared by login and the guard
    let codec = TokenCodec::with_ttl(
        &config.session.secret,
        chrono::Duration::seconds(config.session.ttl_seconds),
    );

    // Initialize services
    let workshops = Arc::new(store.clone());
    let auth_service = Arc::new(AuthService::new(config.admin.clone(), codec));
    let workshop_service = Arc::new(WorkshopService::new(
        workshops.clone(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        cache.clone(),
    ));
    let category_service = Arc::new(CategoryService::new(
        Arc::new(store.clone()),
        workshops.clone(),
        cache.clone(),
    ));
    let tag_service = Arc::new(TagService::new(
        Arc::new(store.clone()),
        workshops,
        cache.clone(),
    ));
    let describer = Arc::new(Describer::new(&config.describer));
    if describer.is_enabled() {
        tracing::info!("Description generator enabled");
    }

    // Build application state and router
    let state = AppState {
        auth_service,
        workshop_service,
        category_service,
        tag_service,
        describer,
        cache,
    };
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
