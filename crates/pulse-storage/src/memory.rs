//! In-process [`MetricStore`] with the same transactional contract as Postgres.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use pulse_core::{DailyMetric, StoredMetric};

use crate::{MetricStore, StorageError};

#[derive(Debug, Clone, Default)]
struct Table {
    schema_ready: bool,
    next_id: i64,
    rows: BTreeMap<(NaiveDate, String), StoredMetric>,
}

/// Writes land in a staged copy of the table that replaces the committed copy
/// on commit and is discarded on rollback.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetricStore {
    committed: Table,
    staged: Option<Table>,
    upserts_seen: usize,
    fail_upsert_at: Option<usize>,
}

impl MemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`th upsert (0-based, counted across the store's lifetime) fail.
    pub fn failing_upsert_at(mut self, n: usize) -> Self {
        self.fail_upsert_at = Some(n);
        self
    }

    /// Committed rows in export order.
    pub fn committed_rows(&self) -> Vec<StoredMetric> {
        sorted_rows(&self.committed)
    }

    pub fn in_transaction(&self) -> bool {
        self.staged.is_some()
    }

    fn staged(&mut self) -> Result<&mut Table, StorageError> {
        self.staged.as_mut().ok_or(StorageError::NoTransaction)
    }
}

fn sorted_rows(table: &Table) -> Vec<StoredMetric> {
    let mut rows = table.rows.values().cloned().collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        a.subreddit
            .cmp(&b.subreddit)
            .then(a.snapshot_date.cmp(&b.snapshot_date))
    });
    rows
}

#[async_trait]
impl MetricStore for MemoryMetricStore {
    async fn begin(&mut self) -> Result<(), StorageError> {
        if self.staged.is_some() {
            return Err(StorageError::TransactionOpen);
        }
        self.staged = Some(self.committed.clone());
        Ok(())
    }

    async fn ensure_schema(&mut self) -> Result<(), StorageError> {
        self.staged()?.schema_ready = true;
        Ok(())
    }

    async fn upsert_metric(&mut self, metric: &DailyMetric) -> Result<(), StorageError> {
        let attempt = self.upserts_seen;
        self.upserts_seen += 1;
        let fail = self.fail_upsert_at == Some(attempt);

        let table = self.staged()?;
        if !table.schema_ready {
            return Err(StorageError::Unavailable(
                "daily_subreddit_metrics does not exist".to_string(),
            ));
        }
        if fail {
            return Err(StorageError::Unavailable(format!(
                "injected failure on upsert #{attempt}"
            )));
        }

        let now = Utc::now();
        let key = (metric.snapshot_date, metric.subreddit.clone());
        match table.rows.get_mut(&key) {
            Some(row) => {
                row.left_score = metric.left_score;
                row.right_score = metric.right_score;
                row.posts_count = metric.posts_count;
                row.vibe = metric.vibe.clone();
                row.trending_politicians = Some(metric.trending_politicians.clone());
                row.updated_at = now;
            }
            None => {
                table.next_id += 1;
                let row = StoredMetric {
                    id: table.next_id,
                    snapshot_date: metric.snapshot_date,
                    subreddit: metric.subreddit.clone(),
                    left_score: metric.left_score,
                    right_score: metric.right_score,
                    posts_count: metric.posts_count,
                    vibe: metric.vibe.clone(),
                    trending_politicians: Some(metric.trending_politicians.clone()),
                    created_at: now,
                    updated_at: now,
                };
                table.rows.insert(key, row);
            }
        }
        Ok(())
    }

    async fn fetch_all_metrics(&mut self) -> Result<Vec<StoredMetric>, StorageError> {
        let table = self.staged()?;
        Ok(sorted_rows(table))
    }

    async fn commit(&mut self) -> Result<(), StorageError> {
        let staged = self.staged.take().ok_or(StorageError::NoTransaction)?;
        self.committed = staged;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StorageError> {
        self.staged.take().ok_or(StorageError::NoTransaction)?;
        Ok(())
    }
}
