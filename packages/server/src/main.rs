use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::media::filesystem::FilesystemMediaStore;
use server::catalog::CatalogCache;
use server::config::AppConfig;
use server::database::init_db;
use server::state::AppState;
use server::{build_router, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db).await?;
    seed::seed_admin(&db, &config.auth).await?;

    let media_store = FilesystemMediaStore::new(config.storage.media_dir.clone())
        .await
        .context("Failed to initialize media storage")?;

    let catalog_cache = CatalogCache::new(
        config.catalog.cache_capacity,
        Duration::from_secs(config.catalog.cache_ttl_secs),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        db,
        config,
        media_store: Arc::new(media_store),
        catalog_cache: Arc::new(catalog_cache),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
