//! Inventory domain module: warehouses (stock locations).
//!
//! This crate contains business rules for warehouses, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod warehouse;

pub use warehouse::{NewWarehouse, Warehouse, WarehouseFilter, WarehousePatch};
