//! Purchasing domain module.
//!
//! Purchases record goods bought from a supplier into a warehouse. Pure domain
//! logic: validation, patch merging and list filtering. No IO.

pub mod purchase;

pub use purchase::{NewPurchase, Purchase, PurchaseFilter, PurchasePatch};
