//! Postgres-backed repository implementation.
//!
//! Each resource collection is a table named after `Resource::COLLECTION` with
//! envelope columns (`id`, `unique_key`, `lifecycle`, `version`, `created_at`)
//! and the entity fields stored as JSONB in `data`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate SKU / order number |
//! | Database (other) | Any other | `Backend` | Check constraint, missing table, etc. |
//! | PoolClosed | N/A | `Backend` | Connection pool was closed |
//! | Other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! A guarded update that matches no row (stale `version`) is reported as `Conflict`.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use inventario_core::{ExpectedVersion, Lifecycle, Record, RecordId, Resource};

use super::{Repository, StoreError};

const SCHEMA: &str = include_str!("../../migrations/0001_inventory.sql");

/// Open a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create the resource tables if they do not exist yet.
#[instrument(skip(pool), err)]
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;
    Ok(())
}

/// Postgres repository for one resource collection.
///
/// `PgPool` is internally reference-counted, so clones share connections.
#[derive(Debug)]
pub struct PostgresRepository<R> {
    pool: PgPool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for PostgresRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

const COLUMNS: &str = "id, lifecycle, version, created_at, data";

impl<R: Resource> PostgresRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    #[instrument(skip(self, data), fields(resource = R::NAME), err)]
    pub async fn insert_record(
        &self,
        data: R,
        lifecycle: Lifecycle,
        created_at: DateTime<Utc>,
    ) -> Result<Record<R>, StoreError> {
        let sql = format!(
            "INSERT INTO {} (unique_key, lifecycle, version, created_at, data) \
             VALUES ($1, $2, 1, $3, $4) RETURNING {COLUMNS}",
            R::COLLECTION
        );
        let payload = encode(&data)?;

        let row = sqlx::query(&sql)
            .bind(data.unique_key())
            .bind(lifecycle.as_str())
            .bind(created_at)
            .bind(payload)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;

        decode_row(&row)
    }

    #[instrument(skip(self), fields(resource = R::NAME, id = %id), err)]
    pub async fn get_record(&self, id: RecordId) -> Result<Option<Record<R>>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", R::COLLECTION);

        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self), fields(resource = R::NAME), err)]
    pub async fn list_records(&self) -> Result<Vec<Record<R>>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY id ASC", R::COLLECTION);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(decode_row).collect()
    }

    #[instrument(
        skip(self, record),
        fields(resource = R::NAME, id = %record.id, expected_version = ?expected_version),
        err
    )]
    pub async fn update_record(
        &self,
        record: Record<R>,
        expected_version: ExpectedVersion,
    ) -> Result<Record<R>, StoreError> {
        let sql = format!(
            "UPDATE {} SET unique_key = $3, lifecycle = $4, data = $5, version = version + 1 \
             WHERE id = $1 AND ($2::BIGINT IS NULL OR version = $2) RETURNING {COLUMNS}",
            R::COLLECTION
        );
        let expected = match expected_version {
            ExpectedVersion::Any => None,
            ExpectedVersion::Exact(v) => Some(to_db_version(v)?),
        };
        let payload = encode(&record.data)?;

        let row = sqlx::query(&sql)
            .bind(record.id.get())
            .bind(expected)
            .bind(record.data.unique_key())
            .bind(record.lifecycle.as_str())
            .bind(payload)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        match row {
            Some(row) => decode_row(&row),
            None => Err(StoreError::Conflict(format!(
                "{} {} was modified concurrently (expected: {:?})",
                R::NAME,
                record.id,
                expected_version
            ))),
        }
    }

    #[instrument(skip(self), fields(resource = R::NAME), err)]
    pub async fn find_record_by_unique_key(&self, key: &str) -> Result<Option<Record<R>>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE unique_key = $1", R::COLLECTION);

        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_unique_key", e))?;

        row.as_ref().map(decode_row).transpose()
    }
}

#[async_trait]
impl<R: Resource> Repository<R> for PostgresRepository<R> {
    async fn insert(
        &self,
        data: R,
        lifecycle: Lifecycle,
        created_at: DateTime<Utc>,
    ) -> Result<Record<R>, StoreError> {
        self.insert_record(data, lifecycle, created_at).await
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record<R>>, StoreError> {
        self.get_record(id).await
    }

    async fn list(&self) -> Result<Vec<Record<R>>, StoreError> {
        self.list_records().await
    }

    async fn update(
        &self,
        record: Record<R>,
        expected_version: ExpectedVersion,
    ) -> Result<Record<R>, StoreError> {
        self.update_record(record, expected_version).await
    }

    async fn find_by_unique_key(&self, key: &str) -> Result<Option<Record<R>>, StoreError> {
        self.find_record_by_unique_key(key).await
    }
}

struct RecordRow {
    id: i64,
    lifecycle: String,
    version: i64,
    created_at: DateTime<Utc>,
    data: serde_json::Value,
}

impl<'r> FromRow<'r, PgRow> for RecordRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(RecordRow {
            id: row.try_get("id")?,
            lifecycle: row.try_get("lifecycle")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            data: row.try_get("data")?,
        })
    }
}

fn decode_row<R: Resource>(row: &PgRow) -> Result<Record<R>, StoreError> {
    let row = RecordRow::from_row(row).map_err(|e| map_sqlx_error("decode_row", e))?;

    let id = RecordId::try_from(row.id)
        .map_err(|e| StoreError::Backend(format!("stored id {}: {}", row.id, e.message())))?;
    let lifecycle: Lifecycle = row
        .lifecycle
        .parse()
        .map_err(|e: inventario_core::DomainError| StoreError::Backend(e.message().to_string()))?;
    let version = u64::try_from(row.version)
        .map_err(|_| StoreError::Backend(format!("stored version {} is negative", row.version)))?;
    let data: R = serde_json::from_value(row.data).map_err(|e| {
        StoreError::Backend(format!("failed to decode {} {}: {}", R::NAME, id, e))
    })?;

    Ok(Record {
        id,
        lifecycle,
        created_at: row.created_at,
        version,
        data,
    })
}

fn encode<R: Resource>(data: &R) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(data)
        .map_err(|e| StoreError::Backend(format!("failed to encode {}: {}", R::NAME, e)))
}

fn to_db_version(version: u64) -> Result<i64, StoreError> {
    i64::try_from(version).map_err(|_| StoreError::Backend(format!("version {version} out of range")))
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                // Unique violation
                Some(code) if code.as_ref() == "23505" => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
