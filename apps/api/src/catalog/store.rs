//! Catalog Store: the durable tool table behind a repository trait.
//!
//! The store offers only whole-table reads and whole-table overwrites; there is no
//! row-level upsert. Callers re-read immediately before every mutation and write the
//! complete table back afterwards (see `catalog::feedback`).

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::catalog::{parse_count, PriceTier, ToolRecord};
use crate::retry::{self, RetryPolicy, Retryable};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Retryable for StoreError {
    fn is_retryable(&self) -> bool {
        match self {
            StoreError::Database(e) => matches!(e, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)),
        }
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every row, in stored order.
    async fn load(&self) -> Result<Vec<ToolRecord>, StoreError>;

    /// Clears the table and writes `records` in order.
    async fn overwrite(&self, records: &[ToolRecord]) -> Result<(), StoreError>;
}

/// Reads the catalog with retries. Later rows repeating an earlier `tool_name` are
/// dropped so the primary-key invariant holds even for hand-edited tables.
pub async fn load_catalog(
    store: &dyn CatalogStore,
    policy: &RetryPolicy,
) -> Result<Vec<ToolRecord>, StoreError> {
    let records = retry::run(policy, "Catalog load", || store.load()).await?;
    Ok(dedupe_by_tool_name(records))
}

/// Full-table overwrite with retries.
pub async fn persist_catalog(
    store: &dyn CatalogStore,
    policy: &RetryPolicy,
    records: &[ToolRecord],
) -> Result<(), StoreError> {
    retry::run(policy, "Catalog write", || store.overwrite(records)).await
}

fn dedupe_by_tool_name(records: Vec<ToolRecord>) -> Vec<ToolRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let first = seen.insert(record.tool_name.clone());
            if !first {
                warn!("Dropping duplicate catalog row for '{}'", record.tool_name);
            }
            first
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

/// Every cell is TEXT, mirroring the worksheet the catalog started life in.
#[derive(Debug, FromRow)]
struct CatalogRow {
    tool_name: String,
    role: String,
    situation: String,
    output: String,
    tips: String,
    price_tier: String,
    link: String,
    upvotes: String,
    downvotes: String,
}

impl From<CatalogRow> for ToolRecord {
    fn from(row: CatalogRow) -> Self {
        ToolRecord {
            tool_name: row.tool_name,
            role: row.role,
            situation: row.situation,
            output: row.output,
            tips: row.tips,
            price_tier: PriceTier::from_label(&row.price_tier),
            link: row.link,
            upvotes: parse_count(&row.upvotes),
            downvotes: parse_count(&row.downvotes),
        }
    }
}

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn load(&self) -> Result<Vec<ToolRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT tool_name, role, situation, output, tips, price_tier, link, upvotes, downvotes
            FROM tool_catalog
            ORDER BY position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ToolRecord::from).collect())
    }

    async fn overwrite(&self, records: &[ToolRecord]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Concurrent overwrites queue here; the last one to commit wins.
        sqlx::query("LOCK TABLE tool_catalog IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM tool_catalog")
            .execute(&mut *tx)
            .await?;

        for (position, record) in records.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO tool_catalog
                    (position, tool_name, role, situation, output, tips,
                     price_tier, link, upvotes, downvotes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(position as i32)
            .bind(&record.tool_name)
            .bind(&record.role)
            .bind(&record.situation)
            .bind(&record.output)
            .bind(&record.tips)
            .bind(record.price_tier.as_label())
            .bind(&record.link)
            .bind(record.upvotes.to_string())
            .bind(record.downvotes.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("Catalog overwritten with {} rows", records.len());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Process-local catalog for `CATALOG_BACKEND=memory` and tests.
#[derive(Default)]
pub struct MemoryCatalogStore {
    rows: RwLock<Vec<ToolRecord>>,
    writes: AtomicUsize,
}

impl MemoryCatalogStore {
    #[cfg(test)]
    pub fn new(records: Vec<ToolRecord>) -> Self {
        Self {
            rows: RwLock::new(records),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of overwrites performed so far.
    #[cfg(test)]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn load(&self) -> Result<Vec<ToolRecord>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn overwrite(&self, records: &[ToolRecord]) -> Result<(), StoreError> {
        *self.rows.write().await = records.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
