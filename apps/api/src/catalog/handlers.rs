use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::feedback::{apply_feedback, FeedbackOutcome};
use crate::catalog::filter::{filter_catalog, list_roles, list_situations, CatalogFilter};
use crate::catalog::policy::VoteAction;
use crate::catalog::store::load_catalog;
use crate::errors::AppError;
use crate::models::catalog::{ToolRecord, ToolRecordDraft};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CatalogListResponse {
    pub tools: Vec<ToolRecord>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

#[derive(Deserialize)]
pub struct SituationsQuery {
    pub role: String,
}

#[derive(Serialize)]
pub struct SituationsResponse {
    pub role: String,
    pub situations: Vec<String>,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub action: VoteAction,
    pub draft: ToolRecordDraft,
    /// The caller's current view of the catalog; echoed back if the vote fails.
    #[serde(default)]
    pub catalog: Vec<ToolRecord>,
}

/// GET /api/v1/catalog
pub async fn handle_list_catalog(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Result<Json<CatalogListResponse>, AppError> {
    let records = load_catalog(state.catalog.as_ref(), &state.config.store_retry).await?;
    let tools: Vec<ToolRecord> = filter_catalog(&records, &filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(CatalogListResponse {
        total: tools.len(),
        tools,
    }))
}

/// GET /api/v1/catalog/roles
pub async fn handle_list_roles(
    State(state): State<AppState>,
) -> Result<Json<RolesResponse>, AppError> {
    let records = load_catalog(state.catalog.as_ref(), &state.config.store_retry).await?;
    Ok(Json(RolesResponse {
        roles: list_roles(&records),
    }))
}

/// GET /api/v1/catalog/situations?role=
pub async fn handle_list_situations(
    State(state): State<AppState>,
    Query(params): Query<SituationsQuery>,
) -> Result<Json<SituationsResponse>, AppError> {
    let records = load_catalog(state.catalog.as_ref(), &state.config.store_retry).await?;
    let situations = list_situations(&records, &params.role);
    Ok(Json(SituationsResponse {
        role: params.role,
        situations,
    }))
}

/// POST /api/v1/feedback
/// Refused while an advisory request is in flight.
pub async fn handle_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackOutcome>, AppError> {
    if state.busy.is_busy() {
        return Err(AppError::Conflict(
            "A recommendation is being generated; try again when it finishes.".to_string(),
        ));
    }

    let outcome = apply_feedback(
        state.catalog.as_ref(),
        state.role_normalizer.as_ref(),
        &state.config.store_retry,
        req.action,
        req.draft,
        req.catalog,
    )
    .await;
    Ok(Json(outcome))
}
