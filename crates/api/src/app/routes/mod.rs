use axum::Router;

use inventario_core::Resource;
use inventario_inventory::Warehouse;
use inventario_parties::{Customer, Supplier};
use inventario_products::Product;
use inventario_purchasing::Purchase;
use inventario_sales::Sale;

use crate::app::services::AppServices;

pub mod resource;
pub mod system;

/// Router for every resource collection, each mounted at `/<collection>`.
pub fn router(services: AppServices) -> Router {
    Router::new()
        .nest(&path::<Warehouse>(), resource::router(services.warehouses))
        .nest(&path::<Customer>(), resource::router(services.customers))
        .nest(&path::<Supplier>(), resource::router(services.suppliers))
        .nest(&path::<Product>(), resource::router(services.products))
        .nest(&path::<Purchase>(), resource::router(services.purchases))
        .nest(&path::<Sale>(), resource::router(services.sales))
}

fn path<R: Resource>() -> String {
    format!("/{}", R::COLLECTION)
}
