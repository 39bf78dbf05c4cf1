//! In-memory record store for tests and development.

use async_trait::async_trait;
use chrono::Utc;
use karigari_core::Record;
use karigari_error::{KarigariResult, RecordError, RecordErrorKind};
use karigari_interface::RecordStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory record store backed by a `RwLock`ed map.
///
/// The write lock makes `update` an atomic read-modify-write.
pub struct MemoryRecordStore<R: Record> {
    records: Arc<RwLock<HashMap<Uuid, R>>>,
}

impl<R: Record> MemoryRecordStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<R: Record> Default for MemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Clone for MemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryRecordStore<R> {
    async fn insert(&self, record: &R) -> KarigariResult<()> {
        self.records.write().await.insert(record.id(), record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> KarigariResult<Option<R>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, patch: R::Patch) -> KarigariResult<R> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or_else(|| {
            RecordError::new(RecordErrorKind::NotFound(format!(
                "{}/{}",
                R::COLLECTION,
                id
            )))
        })?;
        record.apply(patch);
        record.touch(Utc::now());
        Ok(record.clone())
    }

    async fn list_owned(&self, owner_id: &str) -> KarigariResult<Vec<R>> {
        let records = self.records.read().await;
        let mut owned: Vec<R> = records
            .values()
            .filter(|r| r.owner_id() == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }
}
