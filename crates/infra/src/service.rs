//! Generic CRUD orchestration shared by every resource.
//!
//! `CrudService<R>` validates input through the `Resource` impl, enforces
//! uniqueness before touching storage, and implements soft deletion as a
//! lifecycle write. It performs no cross-resource checks.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use inventario_core::{DomainError, ExpectedVersion, Record, RecordId, Resource};

use crate::repository::{InMemoryRepository, Repository, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Store(String),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(m) => ServiceError::Validation(m),
            DomainError::NotFound(m) => ServiceError::NotFound(m),
            DomainError::Conflict(m) => ServiceError::Conflict(m),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(m) => ServiceError::Conflict(m),
            StoreError::Backend(m) => ServiceError::Store(m),
        }
    }
}

pub struct CrudService<R: Resource> {
    repo: Arc<dyn Repository<R>>,
}

impl<R: Resource> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: Resource> CrudService<R> {
    pub fn new(repo: Arc<dyn Repository<R>>) -> Self {
        Self { repo }
    }

    /// Service over a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::<R>::new()))
    }

    pub async fn create(&self, draft: R::Draft) -> Result<Record<R>, ServiceError> {
        let data = R::validate(draft).inspect_err(|e| {
            warn!(resource = R::NAME, error = %e, "rejected create");
        })?;
        self.ensure_unique(&data, None).await?;

        let lifecycle = data.initial_lifecycle();
        let record = self.repo.insert(data, lifecycle, Utc::now()).await?;
        info!(resource = R::NAME, id = %record.id, "created");
        Ok(record)
    }

    /// Fetch one record by id. Retired records are still returned.
    pub async fn get(&self, id: i64) -> Result<Record<R>, ServiceError> {
        let id = RecordId::try_from(id)?;
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("{} not found with id {}", R::NAME, id)).into()
            })
    }

    /// Listed records matching `filter`, in ascending id order.
    pub async fn list(&self, filter: &R::Filter) -> Result<Vec<Record<R>>, ServiceError> {
        let records = self.repo.list().await?;
        Ok(records
            .into_iter()
            .filter(|r| R::listed(r.lifecycle) && r.data.matches(filter))
            .collect())
    }

    /// Merge `patch` into the stored record. Absent fields are left untouched.
    pub async fn update(&self, id: i64, patch: R::Patch) -> Result<Record<R>, ServiceError> {
        let current = self.get(id).await?;
        let version = current.version;

        let (data, lifecycle) = current
            .data
            .clone()
            .apply_patch(current.lifecycle, patch)
            .inspect_err(|e| {
                warn!(resource = R::NAME, id = %current.id, error = %e, "rejected update");
            })?;
        if data.unique_key() != current.data.unique_key() {
            self.ensure_unique(&data, Some(current.id)).await?;
        }

        let record = self
            .repo
            .update(current.with(data, lifecycle), ExpectedVersion::Exact(version))
            .await?;
        info!(resource = R::NAME, id = %record.id, version = record.version, "updated");
        Ok(record)
    }

    /// Retire a record. Repeating the call on a retired record succeeds and changes nothing
    /// observable besides the version.
    pub async fn soft_delete(&self, id: i64) -> Result<(), ServiceError> {
        let current = self.get(id).await?;
        let version = current.version;
        let data = current.data.clone().retire();

        let record = self
            .repo
            .update(current.with(data, R::RETIRED), ExpectedVersion::Exact(version))
            .await?;
        info!(resource = R::NAME, id = %record.id, lifecycle = record.lifecycle.as_str(), "retired");
        Ok(())
    }

    async fn ensure_unique(&self, data: &R, except: Option<RecordId>) -> Result<(), ServiceError> {
        let Some(key) = data.unique_key() else {
            return Ok(());
        };
        match self.repo.find_by_unique_key(key).await? {
            Some(existing) if Some(existing.id) != except => {
                warn!(resource = R::NAME, key, "duplicate unique key");
                Err(ServiceError::Conflict(format!(
                    "{} with {} '{}' already exists",
                    R::NAME,
                    R::UNIQUE_FIELD.unwrap_or("key"),
                    key
                )))
            }
            _ => Ok(()),
        }
    }
}
