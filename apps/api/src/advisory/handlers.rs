use axum::{extract::State, Json};
use serde::Serialize;

use crate::advisory::{advise, AdviseRequest, AdviseResponse};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub busy: bool,
}

/// POST /api/v1/advise
/// Holds the busy gate until the answer is back.
pub async fn handle_advise(
    State(state): State<AppState>,
    Json(req): Json<AdviseRequest>,
) -> Result<Json<AdviseResponse>, AppError> {
    let _busy = state.busy.enter();
    let response = advise(
        state.llm.as_ref(),
        state.catalog.as_ref(),
        state.interactions.as_ref(),
        &state.config.store_retry,
        req,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/status
pub async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        busy: state.busy.is_busy(),
    })
}
