//! Role Normalizer: maps free-text job-role labels onto the catalog's canonical roles.
//!
//! Default: `FuzzyRoleNormalizer` (offline, deterministic).
//! Alternative: `LlmRoleNormalizer` (asks the model to classify; falls back to the
//! candidate unchanged on any failure).
//!
//! `AppState` holds an `Arc<dyn RoleNormalizer>`, swapped at startup via config.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::catalog::prompts::{ROLE_CLASSIFY_PROMPT_TEMPLATE, ROLE_CLASSIFY_SYSTEM};
use crate::catalog::similarity::closest_match;
use crate::llm_client::{complete_prompt, TextGeneration};
use crate::models::catalog::DEFAULT_ROLE;

/// Minimum similarity for a candidate to collapse onto an existing role.
pub const ROLE_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Longest answer accepted from the model as a role label, in characters.
const MAX_ROLE_LABEL_CHARS: usize = 40;

#[async_trait]
pub trait RoleNormalizer: Send + Sync {
    /// Returns an element of `known_roles`, or the trimmed candidate as a new role.
    async fn normalize(&self, candidate_role: &str, known_roles: &BTreeSet<String>) -> String;

    /// "fuzzy" | "llm": for logs.
    fn backend(&self) -> &'static str;
}

/// Deterministic similarity-based normalization. No I/O.
pub fn canonical_role(candidate_role: &str, known_roles: &BTreeSet<String>) -> String {
    let candidate = candidate_role.trim();
    if candidate.is_empty() {
        return DEFAULT_ROLE.to_string();
    }
    if known_roles.contains(candidate) {
        return candidate.to_string();
    }
    match closest_match(
        candidate,
        known_roles.iter().map(String::as_str),
        ROLE_SIMILARITY_THRESHOLD,
    ) {
        Some((role, score)) => {
            debug!("Role '{candidate}' collapsed onto '{role}' (similarity {score:.2})");
            role.to_string()
        }
        None => candidate.to_string(),
    }
}

pub struct FuzzyRoleNormalizer;

#[async_trait]
impl RoleNormalizer for FuzzyRoleNormalizer {
    async fn normalize(&self, candidate_role: &str, known_roles: &BTreeSet<String>) -> String {
        canonical_role(candidate_role, known_roles)
    }

    fn backend(&self) -> &'static str {
        "fuzzy"
    }
}

/// Model-backed classification. Exact matches never reach the model.
pub struct LlmRoleNormalizer {
    llm: Arc<dyn TextGeneration>,
}

impl LlmRoleNormalizer {
    pub fn new(llm: Arc<dyn TextGeneration>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl RoleNormalizer for LlmRoleNormalizer {
    async fn normalize(&self, candidate_role: &str, known_roles: &BTreeSet<String>) -> String {
        let candidate = candidate_role.trim();
        if candidate.is_empty() {
            return DEFAULT_ROLE.to_string();
        }
        if known_roles.contains(candidate) {
            return candidate.to_string();
        }

        let roles = known_roles.iter().cloned().collect::<Vec<_>>().join(", ");
        let prompt = ROLE_CLASSIFY_PROMPT_TEMPLATE
            .replace("{candidate}", candidate)
            .replace("{roles}", &roles);

        match complete_prompt(self.llm.as_ref(), ROLE_CLASSIFY_SYSTEM, &prompt).await {
            Ok(answer) => match clean_label(&answer) {
                Some(label) => label,
                None => {
                    warn!("Role classifier returned an unusable label {answer:?}; keeping '{candidate}'");
                    candidate.to_string()
                }
            },
            Err(e) => {
                warn!("Role classification failed: {e}; keeping '{candidate}'");
                candidate.to_string()
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Accepts a single short line, stripped of surrounding quotes.
fn clean_label(answer: &str) -> Option<String> {
    let answer = answer.trim();
    if answer.lines().count() != 1 {
        return None;
    }
    let label = answer
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.' | '*'))
        .trim();
    if label.is_empty() || label.chars().count() > MAX_ROLE_LABEL_CHARS {
        return None;
    }
    Some(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubGeneration;
    use crate::llm_client::LlmError;

    fn roles(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_returned_unchanged() {
        let known = roles(&["개발자", "마케터"]);
        assert_eq!(canonical_role("마케터", &known), "마케터");
    }

    #[test]
    fn test_whitespace_trimmed_before_matching() {
        let known = roles(&["개발자", "마케터"]);
        assert_eq!(canonical_role("  마케터 ", &known), "마케터");
    }

    #[test]
    fn test_synonym_collapses_onto_known_role() {
        let known = roles(&["개발자", "마케터"]);
        assert_eq!(canonical_role("백엔드 개발자", &known), "개발자");
    }

    #[test]
    fn test_unrelated_role_admitted_as_new() {
        let known = roles(&["개발자", "마케터"]);
        assert_eq!(canonical_role("우주비행사", &known), "우주비행사");
    }

    #[test]
    fn test_empty_candidate_gets_default_role() {
        assert_eq!(canonical_role("   ", &roles(&["개발자"])), DEFAULT_ROLE);
    }

    #[test]
    fn test_no_known_roles_keeps_candidate() {
        assert_eq!(canonical_role("디자이너", &BTreeSet::new()), "디자이너");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let known = roles(&["개발자", "마케터", "인사(HR)"]);
        for candidate in ["프론트엔드 개발자", "인사", "우주비행사", "마케터"] {
            let first = canonical_role(candidate, &known);
            assert_eq!(first, canonical_role(candidate, &known));
        }
    }

    #[tokio::test]
    async fn test_fuzzy_normalizer_delegates_to_matcher() {
        let known = roles(&["개발자", "마케터"]);
        let normalized = FuzzyRoleNormalizer.normalize("백엔드 개발자", &known).await;
        assert_eq!(normalized, "개발자");
    }

    #[tokio::test]
    async fn test_llm_normalizer_uses_model_answer() {
        let llm = StubGeneration::replying("\"개발자\"");
        let normalizer = LlmRoleNormalizer::new(Arc::new(llm.clone()));
        let known = roles(&["개발자", "마케터"]);

        assert_eq!(normalizer.normalize("서버 엔지니어", &known).await, "개발자");
        assert_eq!(llm.call_count(), 1);
        let prompt = &llm.calls()[0].messages[0].content;
        assert!(prompt.contains("서버 엔지니어"));
        assert!(prompt.contains("개발자, 마케터"));
    }

    #[tokio::test]
    async fn test_llm_normalizer_skips_call_on_exact_match() {
        let llm = StubGeneration::new(vec![]);
        let normalizer = LlmRoleNormalizer::new(Arc::new(llm.clone()));

        assert_eq!(normalizer.normalize("마케터", &roles(&["마케터"])).await, "마케터");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_llm_normalizer_keeps_candidate_on_failure() {
        let llm = StubGeneration::new(vec![Err(LlmError::RateLimited {
            status: 429,
            message: "quota".to_string(),
        })]);
        let normalizer = LlmRoleNormalizer::new(Arc::new(llm));

        assert_eq!(
            normalizer.normalize(" 우주비행사 ", &roles(&["개발자"])).await,
            "우주비행사"
        );
    }

    #[tokio::test]
    async fn test_llm_normalizer_rejects_rambling_answer() {
        let llm = StubGeneration::replying("It depends.\nProbably 개발자.");
        let normalizer = LlmRoleNormalizer::new(Arc::new(llm));

        assert_eq!(
            normalizer.normalize("서버 엔지니어", &roles(&["개발자"])).await,
            "서버 엔지니어"
        );
    }
}
