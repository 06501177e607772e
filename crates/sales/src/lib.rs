//! Sales domain module.
//!
//! Sales record goods shipped to a customer. Each sale carries an order number
//! that is unique across the collection.

pub mod sale;

pub use sale::{NewSale, Sale, SaleFilter, SalePatch};
