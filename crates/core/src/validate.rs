//! Field validators shared by all resources.
//!
//! Create payloads use the `require_*` family (absent or invalid is an error).
//! Patches use the `patch_*` family (absent is fine, present-but-invalid is an error).

use crate::error::{DomainError, DomainResult};

pub fn require_present<T>(value: Option<T>, field: &str) -> DomainResult<T> {
    value.ok_or_else(|| DomainError::validation(format!("{field} is required")))
}

/// Required, non-blank text. The value is stored as given (not trimmed).
pub fn require_text(value: Option<String>, field: &str) -> DomainResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!("{field} is required"))),
    }
}

pub fn require_email(value: Option<String>, field: &str) -> DomainResult<String> {
    let value = require_text(value, field)?;
    check_email(&value, field)?;
    Ok(value)
}

pub fn require_positive<N>(value: N, field: &str) -> DomainResult<N>
where
    N: PartialOrd + Default + Copy,
{
    // Written as `!(v > 0)` so NaN is rejected too.
    if !(value > N::default()) {
        return Err(DomainError::validation(format!("{field} must be greater than 0")));
    }
    Ok(value)
}

pub fn require_non_negative<N>(value: N, field: &str) -> DomainResult<N>
where
    N: PartialOrd + Default + Copy,
{
    if !(value >= N::default()) {
        return Err(DomainError::validation(format!("{field} must not be negative")));
    }
    Ok(value)
}

/// Optional positive number: absent is fine, present must be > 0.
pub fn optional_positive<N>(value: Option<N>, field: &str) -> DomainResult<Option<N>>
where
    N: PartialOrd + Default + Copy,
{
    value.map(|v| require_positive(v, field)).transpose()
}

/// Patch text for a required field: absent keeps the old value, blank is rejected.
pub fn patch_text(value: Option<String>, field: &str) -> DomainResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => {
            Err(DomainError::validation(format!("{field} must not be blank")))
        }
        Some(v) => Ok(Some(v)),
    }
}

pub fn patch_email(value: Option<String>, field: &str) -> DomainResult<Option<String>> {
    let value = patch_text(value, field)?;
    if let Some(v) = &value {
        check_email(v, field)?;
    }
    Ok(value)
}

fn check_email(value: &str, field: &str) -> DomainResult<()> {
    if !value.contains('@') {
        return Err(DomainError::validation(format!("{field} must be a valid email address")));
    }
    Ok(())
}
