//! Advisory turn: wraps the text-generation service with the curated catalog as
//! context, then records the exchange in the interaction log.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::advisory::interaction_log::{record_interaction, InteractionLog};
use crate::advisory::prompts::{
    ADVISORY_SYSTEM_TEMPLATE, ANY_OUTPUT_FORMAT, EMPTY_CATALOG_PLACEHOLDER,
};
use crate::catalog::store::{load_catalog, CatalogStore};
use crate::errors::AppError;
use crate::llm_client::{complete_with_override, ChatMessage, TextGeneration};
use crate::models::catalog::ToolRecord;
use crate::models::interaction::InteractionLogEntry;
use crate::retry::RetryPolicy;

pub mod gate;
pub mod handlers;
pub mod interaction_log;
pub mod prompts;

const CATALOG_COLUMNS: &str = "tool_name | role | situation | output | tips | price_tier | link | upvotes";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdviseRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub situation: String,
    /// Free-text question. Composed from `role` and `situation` when absent.
    #[serde(default)]
    pub query: Option<String>,
    /// Earlier turns of this conversation, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub output_formats: Vec<String>,
    /// Session credential tried before the service default.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdviseResponse {
    pub query: String,
    pub answer: String,
}

/// The question asked on the user's behalf when only role and situation are given.
pub fn compose_query(role: &str, situation: &str) -> Option<String> {
    let role = role.trim();
    let situation = situation.trim();
    if role.is_empty() || situation.is_empty() {
        return None;
    }
    Some(format!(
        "나는 '{role}'이고, 현재 '{situation}' 상황이야. 나에게 맞는 AI 툴을 추천해줘."
    ))
}

/// Catalog as a pipe-separated table. Downvote counts stay out of the prompt.
pub fn render_catalog_context(records: &[ToolRecord]) -> String {
    if records.is_empty() {
        return EMPTY_CATALOG_PLACEHOLDER.to_string();
    }

    let mut table = String::from(CATALOG_COLUMNS);
    for r in records {
        table.push_str(&format!(
            "\n{} | {} | {} | {} | {} | {} | {} | {}",
            r.tool_name, r.role, r.situation, r.output, r.tips, r.price_tier, r.link, r.upvotes
        ));
    }
    table
}

pub fn build_system_instruction(records: &[ToolRecord], output_formats: &[String]) -> String {
    let formats: Vec<&str> = output_formats
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect();
    let formats = if formats.is_empty() {
        ANY_OUTPUT_FORMAT.to_string()
    } else {
        formats.join(", ")
    };

    ADVISORY_SYSTEM_TEMPLATE
        .replace("{output_formats}", &formats)
        .replace("{catalog}", &render_catalog_context(records))
}

/// Runs one advisory turn.
///
/// An unreadable catalog degrades to an answer without catalog context; a failed
/// generation is an error. The interaction log never fails the turn.
pub async fn advise(
    llm: &dyn TextGeneration,
    catalog: &dyn CatalogStore,
    log: &dyn InteractionLog,
    store_retry: &RetryPolicy,
    request: AdviseRequest,
) -> Result<AdviseResponse, AppError> {
    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from)
        .or_else(|| compose_query(&request.role, &request.situation))
        .ok_or_else(|| {
            AppError::Validation("A question, or both role and situation, is required".to_string())
        })?;

    let records = match load_catalog(catalog, store_retry).await {
        Ok(records) => records,
        Err(e) => {
            warn!("Advising without catalog context, catalog read failed: {e}");
            Vec::new()
        }
    };
    let system = build_system_instruction(&records, &request.output_formats);

    let mut messages = request.history;
    messages.push(ChatMessage::user(query.clone()));

    let answer = complete_with_override(llm, request.api_key.as_deref(), &system, &messages)
        .await
        .map_err(|e| AppError::Llm(format!("Advisory generation failed: {e}")))?;
    info!(
        "Advisory answer generated ({} catalog tools in context, {} prior turns)",
        records.len(),
        messages.len() - 1
    );

    record_interaction(
        log,
        store_retry,
        InteractionLogEntry::now(&request.role, &request.situation, &query, &answer),
    )
    .await;

    Ok(AdviseResponse { query, answer })
}
