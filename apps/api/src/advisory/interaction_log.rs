//! Append-only log of advisory turns. Writing to it is best-effort: a failed
//! append never reaches the user.

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog::store::StoreError;
use crate::models::interaction::InteractionLogEntry;
use crate::retry::{self, RetryPolicy};

#[async_trait]
pub trait InteractionLog: Send + Sync {
    async fn append(&self, entry: &InteractionLogEntry) -> Result<(), StoreError>;
}

/// Appends `entry`, swallowing every failure.
pub async fn record_interaction(
    log: &dyn InteractionLog,
    policy: &RetryPolicy,
    entry: InteractionLogEntry,
) {
    if let Err(e) = retry::run(policy, "Interaction log append", || log.append(&entry)).await {
        debug!("Interaction log entry {} dropped: {e}", entry.id);
    }
}

pub struct PgInteractionLog {
    pool: PgPool,
}

impl PgInteractionLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionLog for PgInteractionLog {
    async fn append(&self, entry: &InteractionLogEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO interaction_log (id, logged_at, role, situation, question, answer) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.id)
        .bind(&entry.timestamp)
        .bind(&entry.role)
        .bind(&entry.situation)
        .bind(&entry.question)
        .bind(&entry.answer)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryInteractionLog {
    entries: Mutex<Vec<InteractionLogEntry>>,
}

impl MemoryInteractionLog {
    #[cfg(test)]
    pub async fn entries(&self) -> Vec<InteractionLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl InteractionLog for MemoryInteractionLog {
    async fn append(&self, entry: &InteractionLogEntry) -> Result<(), StoreError> {
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }
}
