//! Wire-level field helpers shared by resource payloads.

use serde::{Deserialize, Deserializer, Serialize};

use crate::id::RecordId;

/// Reference to another record, carried on the wire as `{"id": n}`.
///
/// References are not checked against the referenced collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: RecordId,
}

impl EntityRef {
    pub fn new(id: RecordId) -> Self {
        Self { id }
    }
}

/// Deserialize an optional field so that `null` is distinguishable from absence.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Merge a nullable patch field onto an optional stored value.
pub fn merge_nullable<T>(current: Option<T>, patch: Option<Option<T>>) -> Option<T> {
    match patch {
        None => current,
        Some(next) => next,
    }
}
