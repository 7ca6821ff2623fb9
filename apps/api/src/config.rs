use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::retry::RetryPolicy;

/// Where the tool catalog and interaction log live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogBackend {
    Postgres,
    /// Process-local store, for local development. Lost on restart.
    Memory,
}

/// Which role normalization strategy is wired into the feedback cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleNormalizerKind {
    Fuzzy,
    Llm,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_backend: CatalogBackend,
    pub database_url: Option<String>,
    pub anthropic_api_key: String,
    pub role_normalizer: RoleNormalizerKind,
    pub llm_retry: RetryPolicy,
    pub store_retry: RetryPolicy,
    pub seed_catalog: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = optional_env("CATALOG_BACKEND").map(|v| v.to_lowercase());
        let catalog_backend = match backend.as_deref() {
            None | Some("postgres") => CatalogBackend::Postgres,
            Some("memory") => CatalogBackend::Memory,
            Some(other) => bail!("CATALOG_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = match catalog_backend {
            CatalogBackend::Postgres => Some(require_env("DATABASE_URL")?),
            CatalogBackend::Memory => optional_env("DATABASE_URL"),
        };

        let normalizer = optional_env("ROLE_NORMALIZER").map(|v| v.to_lowercase());
        let role_normalizer = match normalizer.as_deref() {
            None | Some("fuzzy") => RoleNormalizerKind::Fuzzy,
            Some("llm") => RoleNormalizerKind::Llm,
            Some(other) => bail!("ROLE_NORMALIZER must be 'fuzzy' or 'llm', got '{other}'"),
        };

        Ok(Config {
            catalog_backend,
            database_url,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            role_normalizer,
            llm_retry: RetryPolicy::new(
                parse_env("LLM_MAX_ATTEMPTS", 3)?,
                Duration::from_millis(parse_env("LLM_RETRY_BASE_MS", 1000)?),
            ),
            store_retry: RetryPolicy::new(
                parse_env("STORE_MAX_ATTEMPTS", 2)?,
                Duration::from_millis(parse_env("STORE_RETRY_BASE_MS", 2000)?),
            ),
            seed_catalog: parse_env("SEED_CATALOG", true)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
