use std::sync::Arc;

use crate::advisory::gate::BusyGate;
use crate::advisory::interaction_log::InteractionLog;
use crate::catalog::normalizer::RoleNormalizer;
use crate::catalog::store::CatalogStore;
use crate::config::Config;
use crate::llm_client::TextGeneration;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub interactions: Arc<dyn InteractionLog>,
    pub llm: Arc<dyn TextGeneration>,
    /// Pluggable role normalizer. Default: FuzzyRoleNormalizer. Swap via ROLE_NORMALIZER.
    pub role_normalizer: Arc<dyn RoleNormalizer>,
    pub busy: BusyGate,
    pub config: Config,
}
