//! JSON file-based history repository.
//!
//! Stores the whole log as one JSON array in `qr_history.json`.

use async_trait::async_trait;
use std::path::PathBuf;

use qrtrail_core::history::{HistoryRecord, HistoryRepository};
use qrtrail_core::error::source;
use qrtrail_core::{QrError, Result};

use crate::paths::{QrtrailPaths, ServiceType};
use crate::storage::AtomicFile;

const HISTORY_SOURCE: &str = source::HISTORY;

/// History repository backed by a single JSON file.
///
/// File operations run on the blocking thread pool. Prepends take an
/// exclusive file lock for the whole read-modify-write.
pub struct JsonHistoryRepository {
    file: AtomicFile<Vec<HistoryRecord>>,
}

impl JsonHistoryRepository {
    /// Creates a repository at the default (or overridden) data location.
    pub fn new(paths: &QrtrailPaths) -> Result<Self> {
        let path = paths.get_path(ServiceType::History)?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::json(path),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    async fn run_blocking<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(AtomicFile<Vec<HistoryRecord>>) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(file))
            .await
            .map_err(|e| QrError::internal(format!("history file task failed: {}", e)))?
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn load(&self) -> Result<Option<Vec<HistoryRecord>>> {
        self.run_blocking(|file| {
            file.load().map_err(|e| {
                tracing::warn!("[JsonHistoryRepository] Failed to load {}: {}", file.path().display(), e);
                e.into_qr_error(HISTORY_SOURCE)
            })
        })
        .await
    }

    async fn save(&self, records: &[HistoryRecord]) -> Result<()> {
        let records = records.to_vec();
        self.run_blocking(move |file| file.save(&records).map_err(|e| e.into_qr_error(HISTORY_SOURCE)))
            .await?;
        tracing::debug!("[JsonHistoryRepository] Saved history to {}", self.path().display());
        Ok(())
    }

    async fn prepend(&self, record: HistoryRecord) -> Result<()> {
        // update() bails out on a parse failure before anything is written
        self.run_blocking(move |file| {
            file.update(move |current| {
                let mut records = current.unwrap_or_default();
                records.insert(0, record);
                records
            })
            .map_err(|e| e.into_qr_error(HISTORY_SOURCE))
        })
        .await
    }
}
