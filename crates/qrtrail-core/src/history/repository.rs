//! History repository trait.
//!
//! Defines the interface for history persistence operations.

use async_trait::async_trait;

use super::model::HistoryRecord;
use crate::error::Result;

/// An abstract store for the history log.
///
/// The whole log is read and written as one ordered list, mirroring a
/// single key holding a JSON array. This keeps query logic independent of
/// the storage engine (JSON file, memory, an embedded database, ...).
///
/// # Implementation Notes
///
/// - `load` must distinguish a store that was never written (`Ok(None)`)
///   from an empty one (`Ok(Some(vec![]))`); initialization relies on it.
/// - Unparseable stored data is reported as `QrError::PersistenceParse`.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Loads every stored record in storage order.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(records))`: The store exists
    /// - `Ok(None)`: Nothing has ever been saved
    /// - `Err(_)`: Read or parse failure
    async fn load(&self) -> Result<Option<Vec<HistoryRecord>>>;

    /// Replaces the stored list.
    async fn save(&self, records: &[HistoryRecord]) -> Result<()>;

    /// Puts a new record at the front of the stored list.
    ///
    /// The default is a plain load + save; stores that can lock should
    /// override it so the read-modify-write cannot interleave.
    async fn prepend(&self, record: HistoryRecord) -> Result<()> {
        let mut records = self.load().await?.unwrap_or_default();
        records.insert(0, record);
        self.save(&records).await
    }
}
