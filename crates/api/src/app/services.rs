use std::sync::Arc;

use sqlx::PgPool;

use inventario_infra::config::{AppConfig, StoreConfig};
use inventario_infra::repository::{self, PostgresRepository};
use inventario_infra::{CrudService, StoreError};
use inventario_inventory::Warehouse;
use inventario_parties::{Customer, Supplier};
use inventario_products::Product;
use inventario_purchasing::Purchase;
use inventario_sales::Sale;

/// One CRUD service per resource collection.
#[derive(Clone)]
pub struct AppServices {
    pub warehouses: CrudService<Warehouse>,
    pub customers: CrudService<Customer>,
    pub suppliers: CrudService<Supplier>,
    pub products: CrudService<Product>,
    pub purchases: CrudService<Purchase>,
    pub sales: CrudService<Sale>,
}

impl AppServices {
    /// In-memory wiring (dev/test). Data lives as long as the process.
    pub fn in_memory() -> Self {
        Self {
            warehouses: CrudService::in_memory(),
            customers: CrudService::in_memory(),
            suppliers: CrudService::in_memory(),
            products: CrudService::in_memory(),
            purchases: CrudService::in_memory(),
            sales: CrudService::in_memory(),
        }
    }

    /// Postgres wiring over a shared pool. The schema must already exist (see `repository::migrate`).
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            warehouses: CrudService::new(Arc::new(PostgresRepository::new(pool.clone()))),
            customers: CrudService::new(Arc::new(PostgresRepository::new(pool.clone()))),
            suppliers: CrudService::new(Arc::new(PostgresRepository::new(pool.clone()))),
            products: CrudService::new(Arc::new(PostgresRepository::new(pool.clone()))),
            purchases: CrudService::new(Arc::new(PostgresRepository::new(pool.clone()))),
            sales: CrudService::new(Arc::new(PostgresRepository::new(pool))),
        }
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    match &config.store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory stores");
            Ok(AppServices::in_memory())
        }
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = repository::postgres::connect(database_url, *max_connections).await?;
            repository::migrate(&pool).await?;
            tracing::info!(max_connections, "using postgres stores");
            Ok(AppServices::postgres(pool))
        }
    }
}
