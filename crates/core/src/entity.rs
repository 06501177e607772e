//! Stored records: identity, lifecycle and optimistic versioning around entity data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::RecordId;

/// Lifecycle of a stored record.
///
/// This is the only representation of deletion: nothing is ever physically removed.
/// Master data (warehouses, parties, products) retires to `Inactive`; transactional
/// records (purchases, sales) retire to `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Inactive,
    Cancelled,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        self == Lifecycle::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Active => "active",
            Lifecycle::Inactive => "inactive",
            Lifecycle::Cancelled => "cancelled",
        }
    }
}

impl core::str::FromStr for Lifecycle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Lifecycle::Active),
            "inactive" => Ok(Lifecycle::Inactive),
            "cancelled" => Ok(Lifecycle::Cancelled),
            other => Err(DomainError::validation(format!("unknown lifecycle: {other}"))),
        }
    }
}

/// A persisted entity: store-owned metadata wrapped around the entity's own fields.
///
/// `id` and `created_at` are assigned once by the repository on insert and are never
/// rewritten. `version` starts at 1 and is bumped by the repository on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub id: RecordId,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub version: u64,
    pub data: T,
}

impl<T> Record<T> {
    /// Replace the mutable parts of the record, keeping identity and creation stamp.
    pub fn with(self, data: T, lifecycle: Lifecycle) -> Self {
        Self {
            data,
            lifecycle,
            ..self
        }
    }
}

/// Optimistic concurrency expectation for a record write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking.
    Any,
    /// Require the stored record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "record was modified concurrently (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
