//! Catalog update cycle: one upvote/downvote applied to the durable catalog.
//!
//! Flow: validate draft → re-read latest catalog from the store → vote policy decision →
//!       role normalization (insert path only) → mutate → full overwrite → return.
//!
//! Consistency is best-effort: the re-read shrinks the lost-update window between
//! concurrent sessions but there is no lock or version check on the overwrite.

use serde::Serialize;
use tracing::{error, info};

use crate::catalog::filter::known_roles;
use crate::catalog::normalizer::RoleNormalizer;
use crate::catalog::policy::{
    apply_downvote, apply_upvote, decide, VoteAction, VoteDecision, EVICTION_THRESHOLD,
};
use crate::catalog::store::{load_catalog, persist_catalog, CatalogStore};
use crate::models::catalog::{ToolRecord, ToolRecordDraft};
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Inserted,
    Incremented,
    Decremented,
    Evicted,
    /// Downvote on a tool that was never catalogued. Callers should not show an error.
    Silent,
    Rejected,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackOutcome {
    pub success: bool,
    pub status: FeedbackStatus,
    pub message: String,
    /// The caller's new snapshot: the mutated catalog on success, the caller's own
    /// unmodified catalog otherwise.
    pub catalog: Vec<ToolRecord>,
}

impl FeedbackOutcome {
    fn unchanged(status: FeedbackStatus, message: String, catalog: Vec<ToolRecord>) -> Self {
        Self {
            success: false,
            status,
            message,
            catalog,
        }
    }
}

/// Applies one vote to the catalog held by `store`.
///
/// `catalog` is the caller's current snapshot; it is handed back untouched whenever
/// the cycle does not complete.
pub async fn apply_feedback(
    store: &dyn CatalogStore,
    normalizer: &dyn RoleNormalizer,
    retry: &RetryPolicy,
    action: VoteAction,
    draft: ToolRecordDraft,
    catalog: Vec<ToolRecord>,
) -> FeedbackOutcome {
    let Some(mut draft) = draft.sanitized() else {
        return FeedbackOutcome::unchanged(
            FeedbackStatus::Rejected,
            "A tool name is required to record feedback.".to_string(),
            catalog,
        );
    };
    let target = draft.tool_name.clone();

    // Step 1: re-read, never trust the caller's snapshot
    let mut latest = match load_catalog(store, retry).await {
        Ok(records) => records,
        Err(e) => {
            error!("Feedback on '{target}' aborted, catalog read failed: {e}");
            return FeedbackOutcome::unchanged(
                FeedbackStatus::Failed,
                format!("Could not read the catalog: {e}"),
                catalog,
            );
        }
    };

    // Step 2: exact-name lookup + policy decision
    let position = latest.iter().position(|r| r.tool_name == target);
    let decision = decide(action, position.map(|i| &latest[i]));

    // Step 3: mutate
    let (status, message) = match (decision, position) {
        (VoteDecision::Insert, _) => {
            let known = known_roles(&latest);
            let role = normalizer.normalize(&draft.role, &known).await;
            info!(
                "Role '{}' normalized to '{role}' ({})",
                draft.role,
                normalizer.backend()
            );
            draft.role = role.clone();
            latest.push(ToolRecord::first_upvote(draft));
            (
                FeedbackStatus::Inserted,
                format!("Added '{target}' to the catalog (role: {role})."),
            )
        }
        (VoteDecision::Increment, Some(i)) => {
            apply_upvote(&mut latest[i]);
            (
                FeedbackStatus::Incremented,
                format!("Upvoted '{target}' ({} upvotes).", latest[i].upvotes),
            )
        }
        (VoteDecision::Decrement, Some(i)) => {
            apply_downvote(&mut latest[i]);
            (
                FeedbackStatus::Decremented,
                format!(
                    "Downvote recorded for '{target}' ({}/{EVICTION_THRESHOLD}).",
                    latest[i].downvotes
                ),
            )
        }
        (VoteDecision::Evict, Some(i)) => {
            latest.remove(i);
            (
                FeedbackStatus::Evicted,
                format!(
                    "Removed '{target}' from the catalog after {EVICTION_THRESHOLD} downvotes."
                ),
            )
        }
        _ => {
            return FeedbackOutcome::unchanged(
                FeedbackStatus::Silent,
                format!("'{target}' is not in the catalog."),
                catalog,
            );
        }
    };

    // Step 4: full overwrite
    if let Err(e) = persist_catalog(store, retry, &latest).await {
        error!("Feedback on '{target}' not saved: {e}");
        return FeedbackOutcome::unchanged(
            FeedbackStatus::Failed,
            format!("Could not save the catalog: {e}"),
            catalog,
        );
    }

    info!("Feedback {action:?} on '{target}': {status:?}");
    FeedbackOutcome {
        success: true,
        status,
        message,
        catalog: latest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalizer::FuzzyRoleNormalizer;
    use crate::catalog::store::{MemoryCatalogStore, StoreError};
    use crate::models::catalog::PriceTier;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn draft(name: &str, role: &str) -> ToolRecordDraft {
        ToolRecordDraft {
            tool_name: name.to_string(),
            role: role.to_string(),
            situation: "image generation".to_string(),
            output: "image".to_string(),
            tips: "fast drafts".to_string(),
            price_tier: PriceTier::Free,
            link: String::new(),
        }
    }

    fn record(name: &str, role: &str, upvotes: u32, downvotes: u32) -> ToolRecord {
        ToolRecord {
            upvotes,
            downvotes,
            ..ToolRecord::first_upvote(draft(name, role))
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_millis(10))
    }

    async fn vote(
        store: &dyn CatalogStore,
        action: VoteAction,
        d: ToolRecordDraft,
    ) -> FeedbackOutcome {
        apply_feedback(store, &FuzzyRoleNormalizer, &policy(), action, d, vec![]).await
    }

    /// Wraps a memory store with injectable failures and a read counter.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryCatalogStore,
        failing_loads: AtomicUsize,
        fail_writes: bool,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl CatalogStore for FlakyStore {
        async fn load(&self) -> Result<Vec<ToolRecord>, StoreError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failing_loads.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failing_loads.store(remaining - 1, Ordering::SeqCst);
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            self.inner.load().await
        }

        async fn overwrite(&self, records: &[ToolRecord]) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Database(sqlx::Error::RowNotFound));
            }
            self.inner.overwrite(records).await
        }
    }

    #[tokio::test]
    async fn test_first_upvote_inserts_with_canonical_role() {
        let store = MemoryCatalogStore::new(vec![
            record("Gamma", "마케터", 3, 0),
            record("Cursor", "개발자", 5, 0),
        ]);

        let outcome = vote(&store, VoteAction::Upvote, draft("ExampleGen", "주니어 마케터")).await;

        assert!(outcome.success);
        assert_eq!(outcome.status, FeedbackStatus::Inserted);
        let inserted = outcome
            .catalog
            .iter()
            .find(|r| r.tool_name == "ExampleGen")
            .unwrap();
        assert_eq!(inserted.role, "마케터");
        assert_eq!((inserted.upvotes, inserted.downvotes), (1, 0));
        assert_eq!(store.load().await.unwrap(), outcome.catalog);
    }

    #[tokio::test]
    async fn test_manual_entry_placeholder_is_not_a_canonical_role() {
        let store = MemoryCatalogStore::new(vec![record("Gamma", "직접 입력", 1, 0)]);

        let outcome = vote(&store, VoteAction::Upvote, draft("Vrew", "직접 입력 ")).await;

        let inserted = outcome.catalog.iter().find(|r| r.tool_name == "Vrew").unwrap();
        // nothing to collapse onto, so the candidate itself is kept
        assert_eq!(inserted.role, "직접 입력");
    }

    #[tokio::test]
    async fn test_upvote_on_existing_heals_downvote() {
        let store = MemoryCatalogStore::new(vec![record("Gamma", "마케터", 4, 2)]);

        let outcome = vote(&store, VoteAction::Upvote, draft("Gamma", "아무 직무")).await;

        assert_eq!(outcome.status, FeedbackStatus::Incremented);
        assert_eq!(outcome.catalog.len(), 1);
        assert_eq!((outcome.catalog[0].upvotes, outcome.catalog[0].downvotes), (5, 1));
        // role of an existing row is never re-normalized
        assert_eq!(outcome.catalog[0].role, "마케터");
    }

    #[tokio::test]
    async fn test_downvote_at_zero_keeps_row() {
        let store = MemoryCatalogStore::new(vec![record("Gamma", "마케터", 1, 0)]);

        let outcome = vote(&store, VoteAction::Downvote, draft("Gamma", "")).await;

        assert_eq!(outcome.status, FeedbackStatus::Decremented);
        assert_eq!(outcome.catalog[0].downvotes, 1);
    }

    #[tokio::test]
    async fn test_downvote_at_two_evicts_row() {
        let store = MemoryCatalogStore::new(vec![
            record("Gamma", "마케터", 9, 2),
            record("DeepL", "공통", 1, 0),
        ]);

        let outcome = vote(&store, VoteAction::Downvote, draft("Gamma", "")).await;

        assert_eq!(outcome.status, FeedbackStatus::Evicted);
        assert!(outcome.catalog.iter().all(|r| r.tool_name != "Gamma"));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_downvote_on_unknown_tool_is_silent_noop() {
        let snapshot = vec![record("Gamma", "마케터", 1, 0)];
        let store = MemoryCatalogStore::new(snapshot.clone());

        let outcome = apply_feedback(
            &store,
            &FuzzyRoleNormalizer,
            &policy(),
            VoteAction::Downvote,
            draft("NeverSeen", "마케터"),
            snapshot.clone(),
        )
        .await;

        assert!(!outcome.success);
        assert_eq!(outcome.status, FeedbackStatus::Silent);
        assert_eq!(outcome.catalog, snapshot);
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.load().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_empty_tool_name_rejected_before_store_access() {
        let store = FlakyStore::default();

        let outcome = vote(&store, VoteAction::Upvote, draft("   ", "마케터")).await;

        assert_eq!(outcome.status, FeedbackStatus::Rejected);
        assert_eq!(store.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_decision_uses_store_not_caller_snapshot() {
        let store = MemoryCatalogStore::new(vec![record("Gamma", "마케터", 0, 2)]);
        // the caller's snapshot predates another session's downvotes
        let stale = vec![record("Gamma", "마케터", 0, 0)];

        let outcome = apply_feedback(
            &store,
            &FuzzyRoleNormalizer,
            &policy(),
            VoteAction::Downvote,
            draft("Gamma", ""),
            stale,
        )
        .await;

        assert_eq!(outcome.status, FeedbackStatus::Evicted);
    }

    #[tokio::test]
    async fn test_read_failure_returns_caller_catalog() {
        let store = FlakyStore {
            failing_loads: AtomicUsize::new(usize::MAX),
            ..Default::default()
        };
        let snapshot = vec![record("Gamma", "마케터", 1, 0)];

        let outcome = apply_feedback(
            &store,
            &FuzzyRoleNormalizer,
            &policy(),
            VoteAction::Upvote,
            draft("Gamma", ""),
            snapshot.clone(),
        )
        .await;

        assert!(!outcome.success);
        assert_eq!(outcome.status, FeedbackStatus::Failed);
        assert_eq!(outcome.catalog, snapshot);
        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transient_read_failure_is_retried() {
        let store = FlakyStore {
            failing_loads: AtomicUsize::new(1),
            ..Default::default()
        };

        let outcome = vote(&store, VoteAction::Upvote, draft("Gamma", "마케터")).await;

        assert_eq!(outcome.status, FeedbackStatus::Inserted);
        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_write_failure_returns_caller_catalog() {
        let snapshot = vec![record("Gamma", "마케터", 1, 0)];
        let store = FlakyStore {
            inner: MemoryCatalogStore::new(snapshot.clone()),
            fail_writes: true,
            ..Default::default()
        };

        let outcome = apply_feedback(
            &store,
            &FuzzyRoleNormalizer,
            &policy(),
            VoteAction::Upvote,
            draft("Gamma", ""),
            snapshot.clone(),
        )
        .await;

        assert_eq!(outcome.status, FeedbackStatus::Failed);
        assert_eq!(outcome.catalog, snapshot);
        assert_eq!(store.inner.load().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_tool_names_stay_unique_across_vote_sequences() {
        let store = MemoryCatalogStore::new(vec![]);
        let names = ["Gamma", "DeepL", "Gamma", "Lilys", "DeepL", "Gamma"];
        let actions = [
            VoteAction::Upvote,
            VoteAction::Upvote,
            VoteAction::Downvote,
            VoteAction::Upvote,
            VoteAction::Downvote,
            VoteAction::Downvote,
            VoteAction::Downvote,
        ];

        for step in 0..42 {
            let name = names[step % names.len()];
            let action = actions[step % actions.len()];
            let outcome = vote(&store, action, draft(name, "마케터")).await;

            let unique: HashSet<_> = outcome.catalog.iter().map(|r| &r.tool_name).collect();
            assert_eq!(unique.len(), outcome.catalog.len(), "duplicate after step {step}");
        }
    }

    #[tokio::test]
    async fn test_end_to_end_insert_upvote_then_evict() {
        let store = MemoryCatalogStore::new(vec![
            record("Gamma", "마케터", 3, 0),
            record("Cursor", "개발자", 5, 0),
        ]);
        let example = draft("ExampleGen", "주니어 마케터");

        let first = vote(&store, VoteAction::Upvote, example.clone()).await;
        assert_eq!(first.status, FeedbackStatus::Inserted);

        let second = vote(&store, VoteAction::Upvote, example.clone()).await;
        assert_eq!(second.status, FeedbackStatus::Incremented);
        let rows: Vec<_> = second
            .catalog
            .iter()
            .filter(|r| r.tool_name == "ExampleGen")
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].upvotes, 2);

        let statuses = [
            vote(&store, VoteAction::Downvote, example.clone()).await.status,
            vote(&store, VoteAction::Downvote, example.clone()).await.status,
            vote(&store, VoteAction::Downvote, example.clone()).await.status,
        ];
        assert_eq!(
            statuses,
            [
                FeedbackStatus::Decremented,
                FeedbackStatus::Decremented,
                FeedbackStatus::Evicted
            ]
        );

        let remaining = store.load().await.unwrap();
        assert!(remaining.iter().all(|r| r.tool_name != "ExampleGen"));
        assert_eq!(remaining.len(), 2);

        // a later upvote starts over as a fresh insertion
        let again = vote(&store, VoteAction::Upvote, example).await;
        assert_eq!(again.status, FeedbackStatus::Inserted);
    }
}
