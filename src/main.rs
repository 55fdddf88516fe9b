use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinelog::{
    api::{create_router, AppState},
    config::Config,
    services::{CacheSettings, MovieStore, WatchmodeProvider},
    storage::JsonFileStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinelog=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = WatchmodeProvider::new(
        config.watchmode_api_key.clone(),
        config.watchmode_api_url.clone(),
    );
    let storage = JsonFileStorage::open(&config.storage_path);
    let store = Arc::new(MovieStore::new(
        Arc::new(provider),
        Arc::new(storage),
        CacheSettings {
            ttl: config.cache_ttl(),
            max_entries: config.cache_max_entries,
        },
    ));

    let app = create_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
