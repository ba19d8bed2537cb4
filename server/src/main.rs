use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod models;
mod provider;
mod service;
mod store;

use config::{AppConfig, StorageBackend};
use provider::TinyUrlClient;
use service::UrlService;
use store::{JsonFileStore, MappingStore, MemoryStore};

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub service: UrlService,
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent, env vars may already be set)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Initialise structured logging; RUST_LOG wins over the DEBUG toggle
    let default_filter = if config.debug {
        "shortcut=debug,tower_http=debug"
    } else {
        "shortcut=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting shortcut on {}", config.bind_addr());
    tracing::info!("Shortening provider: {}", config.shortener_api_url);

    let store: Arc<dyn MappingStore> = match config.storage_backend {
        StorageBackend::File => {
            let store = JsonFileStore::new(&config.database_path);
            tracing::info!("Mapping file: {}", store.path().display());
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory mapping store, mappings are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let shortener = TinyUrlClient::new(&config.shortener_api_url, config.shortener_timeout)?;

    let state = Arc::new(AppState {
        service: UrlService::new(store, Arc::new(shortener)),
    });

    let app = handlers::router(state);

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
