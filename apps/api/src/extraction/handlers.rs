use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::extract;
use crate::models::catalog::ToolRecordDraft;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub query: String,
    pub response: String,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub drafts: Vec<ToolRecordDraft>,
}

/// POST /api/v1/extract
/// Never fails on model output; an unusable answer gives an empty `drafts` list.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let drafts = extract(state.llm.as_ref(), &req.query, &req.response).await;
    Ok(Json(ExtractResponse { drafts }))
}
