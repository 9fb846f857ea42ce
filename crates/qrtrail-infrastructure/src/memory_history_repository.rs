//! In-memory history repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use qrtrail_core::Result;
use qrtrail_core::history::{HistoryRecord, HistoryRepository};

/// Keeps the log in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryHistoryRepository {
    records: RwLock<Option<Vec<HistoryRecord>>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `records` already stored.
    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: RwLock::new(Some(records)),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn load(&self) -> Result<Option<Vec<HistoryRecord>>> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[HistoryRecord]) -> Result<()> {
        *self.records.write().await = Some(records.to_vec());
        Ok(())
    }

    async fn prepend(&self, record: HistoryRecord) -> Result<()> {
        let mut guard = self.records.write().await;
        guard.get_or_insert_with(Vec::new).insert(0, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use qrtrail_core::history::HistoryKind;

    #[tokio::test]
    async fn test_never_written_vs_empty() {
        let repo = InMemoryHistoryRepository::new();
        assert!(repo.load().await.unwrap().is_none());

        repo.save(&[]).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_prepend_on_fresh_store() {
        let repo = InMemoryHistoryRepository::new();
        let record = HistoryRecord::new("x", HistoryKind::Scanned, Utc::now());
        repo.prepend(record.clone()).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(vec![record]));
    }
}
