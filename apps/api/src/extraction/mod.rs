//! Structured Extractor: turns free-text recommendations into tool drafts.
//!
//! The contract never fails: a failed call, a non-JSON answer or an answer of the
//! wrong shape all yield an empty list. Transport failures are retried inside the
//! LLM client; a malformed answer is final for the attempt.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::extraction::prompts::{EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
use crate::llm_client::{complete_prompt, strip_json_fences, TextGeneration};
use crate::models::catalog::ToolRecordDraft;

pub mod handlers;
pub mod prompts;

/// Extracts the tools recommended in `response_text`.
pub async fn extract(
    llm: &dyn TextGeneration,
    query: &str,
    response_text: &str,
) -> Vec<ToolRecordDraft> {
    if response_text.trim().is_empty() {
        return Vec::new();
    }

    let prompt = EXTRACTION_PROMPT_TEMPLATE
        .replace("{query}", query)
        .replace("{response}", response_text);

    match complete_prompt(llm, EXTRACTION_SYSTEM, &prompt).await {
        Ok(text) => {
            let drafts = parse_drafts(&text);
            info!("Extracted {} tool drafts", drafts.len());
            drafts
        }
        Err(e) => {
            warn!("Tool extraction call failed: {e}");
            Vec::new()
        }
    }
}

/// Parses model output into sanitized drafts.
///
/// Accepts a JSON array, a single object (wrapped into a one-element list), or an
/// object carrying the array under `"tools"`. Items without a tool name are dropped,
/// as are repeats of a name already seen.
pub fn parse_drafts(text: &str) -> Vec<ToolRecordDraft> {
    let Some(value) = parse_json_value(text) else {
        warn!("Extraction output is not valid JSON");
        debug!("Raw extraction output: {text}");
        return Vec::new();
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("tools") {
            Some(Value::Array(items)) => items,
            _ => vec![Value::Object(object)],
        },
        other => {
            warn!("Extraction output has unexpected shape: {other}");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ToolRecordDraft>(item).ok())
        .filter_map(ToolRecordDraft::sanitized)
        .filter(|draft| seen.insert(draft.tool_name.clone()))
        .collect()
}

/// Parses the whole (fence-stripped) text, falling back to the first complete JSON
/// value when the model wrapped its answer in prose.
fn parse_json_value(text: &str) -> Option<Value> {
    let body = strip_json_fences(text);
    if let Ok(value) = serde_json::from_str(body) {
        return Some(value);
    }

    let start = body.find(['[', '{'])?;
    serde_json::Deserializer::from_str(&body[start..])
        .into_iter::<Value>()
        .next()?
        .ok()
}
