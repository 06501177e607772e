//! Record storage boundary.
//!
//! A `Repository<R>` owns identity assignment and versioning for one resource
//! collection. Records are never physically removed; retirement is a lifecycle
//! change written through `update`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use inventario_core::{ExpectedVersion, Lifecycle, Record, RecordId, Resource};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryRepository;
pub use postgres::{PostgresRepository, migrate};

/// Storage-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique key collision or a stale expected version.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed or returned data that could not be decoded.
    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    /// Persist a new record, assigning its id and setting `version` to 1.
    async fn insert(
        &self,
        data: R,
        lifecycle: Lifecycle,
        created_at: DateTime<Utc>,
    ) -> Result<Record<R>, StoreError>;

    async fn get(&self, id: RecordId) -> Result<Option<Record<R>>, StoreError>;

    /// Every stored record regardless of lifecycle, in ascending id order.
    async fn list(&self) -> Result<Vec<Record<R>>, StoreError>;

    /// Overwrite `data` and `lifecycle` of an existing record and bump its version.
    ///
    /// `id` and `created_at` of the passed record are ignored in favour of the stored ones.
    async fn update(
        &self,
        record: Record<R>,
        expected_version: ExpectedVersion,
    ) -> Result<Record<R>, StoreError>;

    async fn find_by_unique_key(&self, key: &str) -> Result<Option<Record<R>>, StoreError>;
}

#[async_trait]
impl<R, S> Repository<R> for Arc<S>
where
    R: Resource,
    S: Repository<R> + ?Sized,
{
    async fn insert(
        &self,
        data: R,
        lifecycle: Lifecycle,
        created_at: DateTime<Utc>,
    ) -> Result<Record<R>, StoreError> {
        (**self).insert(data, lifecycle, created_at).await
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record<R>>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Record<R>>, StoreError> {
        (**self).list().await
    }

    async fn update(
        &self,
        record: Record<R>,
        expected_version: ExpectedVersion,
    ) -> Result<Record<R>, StoreError> {
        (**self).update(record, expected_version).await
    }

    async fn find_by_unique_key(&self, key: &str) -> Result<Option<Record<R>>, StoreError> {
        (**self).find_by_unique_key(key).await
    }
}
