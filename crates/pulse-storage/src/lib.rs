//! Persistence for daily subreddit metrics plus the atomic export writer.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pulse_core::{DailyMetric, ExportDocument, StoredMetric};
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

mod memory;
mod postgres;
pub mod schema;

pub use memory::MemoryMetricStore;
pub use postgres::PgMetricStore;

pub const CRATE_NAME: &str = "pulse-storage";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("no open transaction")]
    NoTransaction,
    #[error("a transaction is already open")]
    TransactionOpen,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("{action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serializing export document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    fn filesystem(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| StorageError::Filesystem {
            action,
            path,
            source,
        }
    }
}

/// Transactional access to `daily_subreddit_metrics`.
///
/// Every operation other than `begin` requires an open transaction; nothing
/// written is visible outside it until `commit`.
#[async_trait]
pub trait MetricStore: Send {
    async fn begin(&mut self) -> Result<(), StorageError>;
    async fn ensure_schema(&mut self) -> Result<(), StorageError>;
    /// Insert, or overwrite the mutable columns of the existing
    /// (snapshot_date, subreddit) row.
    async fn upsert_metric(&mut self, metric: &DailyMetric) -> Result<(), StorageError>;
    /// All rows ordered by subreddit, then snapshot_date.
    async fn fetch_all_metrics(&mut self) -> Result<Vec<StoredMetric>, StorageError>;
    async fn commit(&mut self) -> Result<(), StorageError>;
    async fn rollback(&mut self) -> Result<(), StorageError>;
}

/// Decode the stored JSONB list; non-list values read back as empty.
pub(crate) fn politicians_from_json(value: JsonValue) -> Vec<String> {
    match value {
        JsonValue::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                JsonValue::String(s) => Some(s),
                JsonValue::Number(n) => Some(n.to_string()),
                JsonValue::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct WrittenExport {
    pub path: PathBuf,
    pub sha256: String,
    pub byte_size: usize,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Serialize the document as pretty JSON and atomically replace `path`.
pub async fn write_export(
    path: &Path,
    document: &ExportDocument,
) -> Result<WrittenExport, StorageError> {
    let mut bytes = serde_json::to_vec_pretty(document)?;
    bytes.push(b'\n');
    write_atomic(path, &bytes).await?;
    Ok(WrittenExport {
        path: path.to_path_buf(),
        sha256: sha256_hex(&bytes),
        byte_size: bytes.len(),
    })
}

/// Write through a sibling temp file and rename, creating parent directories.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .await
        .map_err(StorageError::filesystem("creating directory", parent))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let temp_path = parent.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

    let write_temp = async {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)
            .await
            .map_err(StorageError::filesystem("opening temp file", &temp_path))?;
        file.write_all(bytes)
            .await
            .map_err(StorageError::filesystem("writing temp file", &temp_path))?;
        file.sync_all()
            .await
            .map_err(StorageError::filesystem("syncing temp file", &temp_path))?;
        Ok::<_, StorageError>(())
    };

    if let Err(err) = write_temp.await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(err);
    }

    if let Err(source) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::Filesystem {
            action: "renaming temp file onto",
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
