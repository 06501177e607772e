use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use inventario_core::{ExpectedVersion, Lifecycle, Record, RecordId, Resource};

use super::{Repository, StoreError};

#[derive(Debug)]
struct State<R> {
    last_id: i64,
    records: BTreeMap<RecordId, Record<R>>,
}

/// In-memory repository for tests/dev.
///
/// Ids come from a per-collection sequence starting at 1 and are never reused.
/// `Resource::unique_key` is enforced the way a unique index would.
#[derive(Debug)]
pub struct InMemoryRepository<R> {
    inner: RwLock<State<R>>,
}

impl<R> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(State {
                last_id: 0,
                records: BTreeMap::new(),
            }),
        }
    }
}

impl<R> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

fn key_taken<R: Resource>(state: &State<R>, key: Option<&str>, except: Option<RecordId>) -> Option<StoreError> {
    let key = key?;
    let clash = state
        .records
        .values()
        .any(|r| Some(r.id) != except && r.data.unique_key() == Some(key));
    clash.then(|| {
        StoreError::Conflict(format!(
            "{} with {} '{}' already exists",
            R::NAME,
            R::UNIQUE_FIELD.unwrap_or("key"),
            key
        ))
    })
}

#[async_trait]
impl<R: Resource> Repository<R> for InMemoryRepository<R> {
    async fn insert(
        &self,
        data: R,
        lifecycle: Lifecycle,
        created_at: DateTime<Utc>,
    ) -> Result<Record<R>, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        if let Some(err) = key_taken(&state, data.unique_key(), None) {
            return Err(err);
        }

        state.last_id += 1;
        let record = Record {
            id: RecordId::new(state.last_id),
            lifecycle,
            created_at,
            version: 1,
            data,
        };
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record<R>>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.records.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Record<R>>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state.records.values().cloned().collect())
    }

    async fn update(
        &self,
        record: Record<R>,
        expected_version: ExpectedVersion,
    ) -> Result<Record<R>, StoreError> {
        let mut state = self.inner.write().map_err(|_| poisoned())?;
        let stored = state.records.get(&record.id).ok_or_else(|| {
            StoreError::Conflict(format!("{} {} does not exist", R::NAME, record.id))
        })?;
        expected_version
            .check(stored.version)
            .map_err(|e| StoreError::Conflict(e.message().to_string()))?;
        if let Some(err) = key_taken(&state, record.data.unique_key(), Some(record.id)) {
            return Err(err);
        }

        let next = Record {
            id: stored.id,
            created_at: stored.created_at,
            version: stored.version + 1,
            lifecycle: record.lifecycle,
            data: record.data,
        };
        state.records.insert(next.id, next.clone());
        Ok(next)
    }

    async fn find_by_unique_key(&self, key: &str) -> Result<Option<Record<R>>, StoreError> {
        let state = self.inner.read().map_err(|_| poisoned())?;
        Ok(state
            .records
            .values()
            .find(|r| r.data.unique_key() == Some(key))
            .cloned())
    }
}
