//! Surrogate record identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier assigned by the store when a record is first persisted.
///
/// Always positive. Construct from untrusted input with [`RecordId::parse`] or
/// [`RecordId::try_from`]; `new` is reserved for stores handing out sequence values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a store-assigned sequence value.
    pub fn new(value: i64) -> Self {
        debug_assert!(value > 0, "record ids are positive");
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Parse a path segment into an id, rejecting zero, negatives and non-numbers.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        raw.trim().parse()
    }
}

impl TryFrom<i64> for RecordId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(DomainError::validation("id must be a positive integer"));
        }
        Ok(Self(value))
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .parse()
            .map_err(|_| DomainError::validation("id must be a positive integer"))?;
        Self::try_from(value)
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}
