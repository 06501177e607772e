//! Parties domain module (customers and suppliers).
//!
//! This crate contains business rules for parties, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod customer;
pub mod supplier;

pub use customer::{Customer, CustomerFilter, CustomerPatch, NewCustomer};
pub use supplier::{NewSupplier, Supplier, SupplierFilter, SupplierPatch};
