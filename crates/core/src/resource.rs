//! The contract every CRUD resource implements.
//!
//! A resource is a plain data type plus its create/update/list rules. Storage,
//! identity and soft-delete bookkeeping are handled generically by the infra layer,
//! so each domain crate only states what is specific to its entity.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::entity::Lifecycle;
use crate::error::DomainResult;

/// Status value that marks a purchase or sale as cancelled.
pub const CANCELLED_STATUS: &str = "CANCELADA";

/// Status assigned to new purchases and sales when the payload does not carry one.
pub const DEFAULT_STATUS: &str = "PENDIENTE";

pub trait Resource:
    Clone + core::fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Create payload. Required fields are `Option`s so absence can be reported.
    type Draft: DeserializeOwned + core::fmt::Debug + Send + 'static;
    /// Update payload. Every field is optional; absent fields are left untouched.
    type Patch: DeserializeOwned + core::fmt::Debug + Default + Send + 'static;
    /// List query. Every criterion is optional.
    type Filter: DeserializeOwned + core::fmt::Debug + Default + Send + Sync + 'static;

    /// Singular name used in messages and logs.
    const NAME: &'static str;
    /// Collection name: URL segment and table name.
    const COLLECTION: &'static str;
    /// Lifecycle a record moves to when soft-deleted.
    const RETIRED: Lifecycle;
    /// Field backing `unique_key`, if the resource has one.
    const UNIQUE_FIELD: Option<&'static str> = None;

    /// Check a create payload and build the entity from it.
    fn validate(draft: Self::Draft) -> DomainResult<Self>;

    /// Merge a patch onto the current value. Fails without partial effects.
    fn apply_patch(self, lifecycle: Lifecycle, patch: Self::Patch) -> DomainResult<(Self, Lifecycle)>;

    fn matches(&self, filter: &Self::Filter) -> bool;

    fn unique_key(&self) -> Option<&str> {
        None
    }

    /// Lifecycle a freshly created record starts in.
    fn initial_lifecycle(&self) -> Lifecycle {
        Lifecycle::Active
    }

    /// Field changes that accompany a soft delete.
    fn retire(self) -> Self {
        self
    }

    /// Whether records in this lifecycle appear in list results.
    fn listed(lifecycle: Lifecycle) -> bool {
        lifecycle != Lifecycle::Inactive
    }
}

/// Apply an `activo` flag from a patch to master data.
pub fn active_flag(current: Lifecycle, activo: Option<bool>) -> Lifecycle {
    match activo {
        Some(true) => Lifecycle::Active,
        Some(false) => Lifecycle::Inactive,
        None => current,
    }
}

/// Lifecycle implied by a purchase/sale status string.
pub fn status_lifecycle(status: &str) -> Lifecycle {
    if status.trim().eq_ignore_ascii_case(CANCELLED_STATUS) {
        Lifecycle::Cancelled
    } else {
        Lifecycle::Active
    }
}
