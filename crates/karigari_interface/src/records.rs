//! Trait definition for the structured record store.

use async_trait::async_trait;
use karigari_core::Record;
use karigari_error::KarigariResult;
use uuid::Uuid;

/// Document-oriented store for one record type.
///
/// Implementations must make [`RecordStore::update`] an atomic
/// read-modify-write: the load, patch application, and write happen under
/// a single writer so racing mutations of the same record cannot lose
/// updates. `update` is also responsible for refreshing the record's
/// `updated_at` timestamp via [`Record::touch`].
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: &R) -> KarigariResult<()>;

    /// Fetch a record by id. `Ok(None)` when the record does not exist.
    async fn get(&self, id: Uuid) -> KarigariResult<Option<R>>;

    /// Atomically apply a patch and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns a record-not-found error if the id does not exist.
    async fn update(&self, id: Uuid, patch: R::Patch) -> KarigariResult<R>;

    /// All records belonging to `owner_id`, newest first.
    async fn list_owned(&self, owner_id: &str) -> KarigariResult<Vec<R>>;
}
