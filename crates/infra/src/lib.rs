//! Infrastructure layer: storage, CRUD orchestration, configuration.

pub mod config;
pub mod repository;
pub mod service;

mod integration_tests;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use repository::{InMemoryRepository, PostgresRepository, Repository, StoreError};
pub use service::{CrudService, ServiceError};
