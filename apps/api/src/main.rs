mod advisory;
mod catalog;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod retry;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advisory::gate::BusyGate;
use crate::advisory::interaction_log::{InteractionLog, MemoryInteractionLog, PgInteractionLog};
use crate::catalog::normalizer::{FuzzyRoleNormalizer, LlmRoleNormalizer, RoleNormalizer};
use crate::catalog::seed::seed_if_empty;
use crate::catalog::store::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
use crate::config::{CatalogBackend, Config, RoleNormalizerKind};
use crate::db::create_pool;
use crate::llm_client::{LlmClient, TextGeneration};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job-Fit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize catalog + interaction log
    let (catalog, interactions): (Arc<dyn CatalogStore>, Arc<dyn InteractionLog>) =
        match config.catalog_backend {
            CatalogBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres catalog backend")?;
                let db = create_pool(database_url).await?;
                (
                    Arc::new(PgCatalogStore::new(db.clone())),
                    Arc::new(PgInteractionLog::new(db)),
                )
            }
            CatalogBackend::Memory => {
                warn!("Using the in-memory catalog; votes are lost on restart");
                (
                    Arc::new(MemoryCatalogStore::default()),
                    Arc::new(MemoryInteractionLog::default()),
                )
            }
        };

    if config.seed_catalog {
        seed_if_empty(catalog.as_ref(), &config.store_retry)
            .await
            .context("Failed to seed the tool catalog")?;
    }

    // Initialize LLM client
    let llm: Arc<dyn TextGeneration> = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_retry,
    ));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize role normalizer (fuzzy by default; swap via ROLE_NORMALIZER)
    let role_normalizer: Arc<dyn RoleNormalizer> = match config.role_normalizer {
        RoleNormalizerKind::Fuzzy => Arc::new(FuzzyRoleNormalizer),
        RoleNormalizerKind::Llm => Arc::new(LlmRoleNormalizer::new(Arc::clone(&llm))),
    };
    info!("Role normalizer: {}", role_normalizer.backend());

    // Build app state
    let state = AppState {
        catalog,
        interactions,
        llm,
        role_normalizer,
        busy: BusyGate::default(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
