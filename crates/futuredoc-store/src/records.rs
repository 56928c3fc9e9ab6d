//! History of past analyses, stored as one JSON array under a single key.
//!
//! The whole collection is read and written as one unit, most-recent-first.
//! Storage failures never propagate: a lost history entry does not
//! invalidate the analysis that produced it.

use futuredoc_core::AnalysisRecord;
use tracing::{error, info};

use crate::{KeyValueStore, StoreError};

/// Key holding the serialized history collection.
pub const HISTORY_KEY: &str = "future_doc_db_v1";

/// Append-only history store over a [`KeyValueStore`].
pub struct RecordStore<S> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, HISTORY_KEY)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// Insert `record` at the front of the collection and write it back.
    ///
    /// Failures are logged and swallowed. A stored value that cannot be
    /// parsed is left untouched rather than overwritten.
    pub async fn append(&self, record: &AnalysisRecord) {
        match self.try_append(record).await {
            Ok(total) => info!(record_id = %record.id, total, "record saved"),
            Err(e) => error!(record_id = %record.id, error = %e, "failed to save record"),
        }
    }

    /// All stored records, newest first. Empty when nothing is stored or the
    /// stored value cannot be read.
    pub async fn list_all(&self) -> Vec<AnalysisRecord> {
        match self.read_collection().await {
            Ok(records) => records,
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to retrieve records");
                Vec::new()
            }
        }
    }

    async fn try_append(&self, record: &AnalysisRecord) -> Result<usize, StoreError> {
        let mut records = self.read_collection().await?;
        records.insert(0, record.clone());
        let blob = serde_json::to_string(&records)?;
        self.kv.set(&self.key, &blob).await?;
        Ok(records.len())
    }

    async fn read_collection(&self) -> Result<Vec<AnalysisRecord>, StoreError> {
        match self.kv.get(&self.key).await? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }
}
