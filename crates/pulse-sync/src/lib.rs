//! Sync pipeline: load the source literal, upsert every entry, and export the
//! table, all inside one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use pulse_core::{DailyMetric, ExportDocument};
use pulse_source::{load_dataset, SourceDataset, SourceError};
use pulse_storage::{write_export, MetricStore, PgMetricStore, StorageError};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

mod config;
mod export;
mod normalize;

pub use config::{
    ConfigOverrides, SyncConfig, DEFAULT_OUTPUT_PATH, DEFAULT_SOURCE_PATH, DEFAULT_YEAR,
};
pub use export::project_export;
pub use normalize::normalize_entry;

pub const CRATE_NAME: &str = "pulse-sync";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("parse error: {0}")]
    Source(#[from] SourceError),
    #[error("invalid entry {subreddit}[{index}]: {reason}")]
    InvalidEntry {
        subreddit: String,
        index: usize,
        reason: String,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What one committed transaction produced.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub processed: usize,
    pub document: ExportDocument,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncRunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub processed: usize,
    pub exported: usize,
    pub subreddits: usize,
    pub output_path: String,
    pub export_sha256: String,
    pub export_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub subreddits: usize,
    pub entries: usize,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

/// Run schema, upserts, and the export query in a single transaction.
///
/// On any failure the transaction is rolled back and the original error is
/// returned; nothing from this call is visible in the store.
pub async fn sync_store<S>(
    store: &mut S,
    dataset: &SourceDataset,
    year: i32,
) -> Result<SyncOutcome, SyncError>
where
    S: MetricStore + ?Sized,
{
    store.begin().await?;
    match apply_and_project(store, dataset, year).await {
        Ok(outcome) => {
            store.commit().await?;
            Ok(outcome)
        }
        Err(err) => {
            if let Err(rollback_err) = store.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

async fn apply_and_project<S>(
    store: &mut S,
    dataset: &SourceDataset,
    year: i32,
) -> Result<SyncOutcome, SyncError>
where
    S: MetricStore + ?Sized,
{
    store.ensure_schema().await?;
    info!("schema ensured");

    let mut processed = 0usize;
    for (subreddit, index, entry) in dataset.pairs() {
        let metric = normalize_entry(subreddit, index, entry, year)?;
        store.upsert_metric(&metric).await?;
        processed += 1;
    }
    info!(processed, "upserts applied");

    let rows = store.fetch_all_metrics().await?;
    let document = project_export(&rows, Utc::now());
    info!(
        rows = rows.len(),
        subreddits = document.political_data_map.len(),
        "export projected"
    );
    Ok(SyncOutcome {
        processed,
        document,
    })
}

pub struct SyncPipeline {
    config: SyncConfig,
}

impl SyncPipeline {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Full run against Postgres. The pool is closed whether or not the
    /// transaction commits.
    pub async fn run_once(&self) -> Result<SyncRunSummary, SyncError> {
        let run_id = Uuid::new_v4();
        let database_url = self.config.require_database_url()?;
        self.run_postgres(run_id, database_url)
            .instrument(info_span!("sync_run", %run_id))
            .await
    }

    /// Full run against any store; used where Postgres is not available.
    pub async fn run_with_store<S>(&self, store: &mut S) -> Result<SyncRunSummary, SyncError>
    where
        S: MetricStore + ?Sized,
    {
        let run_id = Uuid::new_v4();
        self.run_store(run_id, store)
            .instrument(info_span!("sync_run", %run_id))
            .await
    }

    async fn run_postgres(
        &self,
        run_id: Uuid,
        database_url: &str,
    ) -> Result<SyncRunSummary, SyncError> {
        let started_at = Utc::now();
        let dataset = self.load()?;
        let mut store = PgMetricStore::connect(database_url).await?;
        let result = sync_store(&mut store, &dataset, self.config.year).await;
        store.close().await;
        self.finish(run_id, started_at, result?).await
    }

    async fn run_store<S>(&self, run_id: Uuid, store: &mut S) -> Result<SyncRunSummary, SyncError>
    where
        S: MetricStore + ?Sized,
    {
        let started_at = Utc::now();
        let dataset = self.load()?;
        let outcome = sync_store(store, &dataset, self.config.year).await?;
        self.finish(run_id, started_at, outcome).await
    }

    /// Ensure the table and indexes exist, in a transaction of their own.
    pub async fn migrate(&self) -> Result<(), SyncError> {
        let database_url = self.config.require_database_url()?;
        let mut store = PgMetricStore::connect(database_url).await?;
        let result = migrate_store(&mut store).await;
        store.close().await;
        result
    }

    /// Parse and normalize the source without touching a database.
    pub fn check(&self) -> Result<CheckSummary, SyncError> {
        let dataset = self.load()?;
        let metrics = dataset
            .pairs()
            .map(|(subreddit, index, entry)| {
                normalize_entry(subreddit, index, entry, self.config.year)
            })
            .collect::<Result<Vec<DailyMetric>, _>>()?;

        Ok(CheckSummary {
            subreddits: dataset.subreddit_count(),
            entries: metrics.len(),
            earliest: metrics.iter().map(|m| m.snapshot_date).min(),
            latest: metrics.iter().map(|m| m.snapshot_date).max(),
        })
    }

    fn load(&self) -> Result<SourceDataset, SyncError> {
        let dataset = load_dataset(&self.config.source_path, &self.config.binding)?;
        info!(
            path = %self.config.source_path.display(),
            subreddits = dataset.subreddit_count(),
            entries = dataset.entry_count(),
            "source loaded"
        );
        Ok(dataset)
    }

    async fn finish(
        &self,
        run_id: Uuid,
        started_at: DateTime<Utc>,
        outcome: SyncOutcome,
    ) -> Result<SyncRunSummary, SyncError> {
        let written = write_export(&self.config.output_path, &outcome.document).await?;
        info!(
            path = %written.path.display(),
            bytes = written.byte_size,
            sha256 = %written.sha256,
            "export written"
        );

        Ok(SyncRunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            processed: outcome.processed,
            exported: outcome.document.record_count(),
            subreddits: outcome.document.political_data_map.len(),
            output_path: written.path.display().to_string(),
            export_sha256: written.sha256,
            export_bytes: written.byte_size,
        })
    }
}

pub async fn migrate_store<S>(store: &mut S) -> Result<(), SyncError>
where
    S: MetricStore + ?Sized,
{
    store.begin().await?;
    if let Err(err) = store.ensure_schema().await {
        if let Err(rollback_err) = store.rollback().await {
            warn!(error = %rollback_err, "rollback failed");
        }
        return Err(err.into());
    }
    store.commit().await?;
    info!("schema ensured");
    Ok(())
}
