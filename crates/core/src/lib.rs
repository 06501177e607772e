//! Domain foundation building blocks shared by every resource crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod field;
pub mod filter;
pub mod id;
pub mod resource;
pub mod validate;

pub use entity::{ExpectedVersion, Lifecycle, Record};
pub use error::{DomainError, DomainResult};
pub use field::{EntityRef, merge_nullable, nullable};
pub use id::RecordId;
pub use resource::{CANCELLED_STATUS, DEFAULT_STATUS, Resource, active_flag, status_lifecycle};
