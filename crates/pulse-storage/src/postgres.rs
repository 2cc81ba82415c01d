//! Postgres-backed [`MetricStore`] holding one connection and one transaction.

use async_trait::async_trait;
use pulse_core::{DailyMetric, StoredMetric};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Row, Transaction};
use tracing::debug;

use crate::schema::{ENSURE_SCHEMA_STATEMENTS, SELECT_ALL_METRICS, UPSERT_METRIC};
use crate::{politicians_from_json, MetricStore, StorageError};

pub struct PgMetricStore {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgMetricStore {
    /// Open a pool capped at a single connection; statements never overlap.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool, tx: None }
    }

    /// Release the connection, rolling back anything still open.
    pub async fn close(mut self) {
        if let Some(tx) = self.tx.take() {
            if let Err(err) = tx.rollback().await {
                tracing::warn!(error = %err, "rollback during close failed");
            }
        }
        self.pool.close().await;
    }

    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, StorageError> {
        self.tx.as_mut().ok_or(StorageError::NoTransaction)
    }
}

#[async_trait]
impl MetricStore for PgMetricStore {
    async fn begin(&mut self) -> Result<(), StorageError> {
        if self.tx.is_some() {
            return Err(StorageError::TransactionOpen);
        }
        self.tx = Some(self.pool.begin().await?);
        Ok(())
    }

    async fn ensure_schema(&mut self) -> Result<(), StorageError> {
        let tx = self.tx()?;
        for statement in ENSURE_SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&mut **tx).await?;
        }
        Ok(())
    }

    async fn upsert_metric(&mut self, metric: &DailyMetric) -> Result<(), StorageError> {
        let tx = self.tx()?;
        let politicians = JsonValue::from(metric.trending_politicians.clone());
        let result = sqlx::query(UPSERT_METRIC)
            .bind(metric.snapshot_date)
            .bind(&metric.subreddit)
            .bind(metric.left_score)
            .bind(metric.right_score)
            .bind(metric.posts_count)
            .bind(&metric.vibe)
            .bind(politicians)
            .execute(&mut **tx)
            .await?;
        debug!(
            subreddit = %metric.subreddit,
            snapshot_date = %metric.snapshot_date,
            rows = result.rows_affected(),
            "upserted metric"
        );
        Ok(())
    }

    async fn fetch_all_metrics(&mut self) -> Result<Vec<StoredMetric>, StorageError> {
        let tx = self.tx()?;
        let rows = sqlx::query(SELECT_ALL_METRICS).fetch_all(&mut **tx).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let politicians: Option<JsonValue> = row.try_get("trending_politicians")?;
            out.push(StoredMetric {
                id: row.try_get("id")?,
                snapshot_date: row.try_get("snapshot_date")?,
                subreddit: row.try_get("subreddit")?,
                left_score: row.try_get("left_score")?,
                right_score: row.try_get("right_score")?,
                posts_count: row.try_get("posts_count")?,
                vibe: row.try_get("vibe")?,
                trending_politicians: politicians.map(politicians_from_json),
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            });
        }
        Ok(out)
    }

    async fn commit(&mut self) -> Result<(), StorageError> {
        let tx = self.tx.take().ok_or(StorageError::NoTransaction)?;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StorageError> {
        let tx = self.tx.take().ok_or(StorageError::NoTransaction)?;
        tx.rollback().await?;
        Ok(())
    }
}
