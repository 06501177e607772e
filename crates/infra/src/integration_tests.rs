//! Integration tests for the service + repository pipeline.
//!
//! Tests: CrudService → Repository (in-memory)
//!
//! Verifies:
//! - Rejected input never reaches the store
//! - Lookup failures carry the right kind for bad and unknown ids
//! - Soft delete is idempotent and keeps records retrievable by id
//! - Uniqueness and optimistic concurrency conflicts are detected
//! - Purchase/sale status picks the starting lifecycle

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use inventario_core::{CANCELLED_STATUS, ExpectedVersion, Lifecycle, Record, RecordId, Resource};
    use inventario_inventory::{NewWarehouse, Warehouse, WarehouseFilter, WarehousePatch};
    use inventario_parties::{Customer, NewCustomer, NewSupplier, Supplier};
    use inventario_products::{NewProduct, Product, ProductPatch};
    use inventario_purchasing::{NewPurchase, Purchase, PurchaseFilter, PurchasePatch};
    use inventario_sales::{NewSale, Sale};
    use inventario_core::EntityRef;

    use crate::repository::{InMemoryRepository, Repository, StoreError};
    use crate::service::{CrudService, ServiceError};

    /// Wraps the in-memory repository and counts writes.
    struct CountingRepository<R> {
        inner: InMemoryRepository<R>,
        writes: AtomicUsize,
    }

    impl<R> CountingRepository<R> {
        fn new() -> Self {
            Self {
                inner: InMemoryRepository::new(),
                writes: AtomicUsize::new(0),
            }
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<R: Resource> Repository<R> for CountingRepository<R> {
        async fn insert(
            &self,
            data: R,
            lifecycle: Lifecycle,
            created_at: DateTime<Utc>,
        ) -> Result<Record<R>, StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(data, lifecycle, created_at).await
        }

        async fn get(&self, id: RecordId) -> Result<Option<Record<R>>, StoreError> {
            self.inner.get(id).await
        }

        async fn list(&self) -> Result<Vec<Record<R>>, StoreError> {
            self.inner.list().await
        }

        async fn update(
            &self,
            record: Record<R>,
            expected_version: ExpectedVersion,
        ) -> Result<Record<R>, StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.update(record, expected_version).await
        }

        async fn find_by_unique_key(&self, key: &str) -> Result<Option<Record<R>>, StoreError> {
            self.inner.find_by_unique_key(key).await
        }
    }

    fn counted<R: Resource>() -> (CrudService<R>, Arc<CountingRepository<R>>) {
        let repo = Arc::new(CountingRepository::<R>::new());
        (CrudService::new(repo.clone()), repo)
    }

    fn warehouse(name: &str, location: &str, capacity: i32) -> NewWarehouse {
        NewWarehouse {
            name: Some(name.into()),
            location: Some(location.into()),
            max_capacity: Some(capacity),
            manager: Some("Carlos Ruiz".into()),
            ..Default::default()
        }
    }

    fn tornillo(sku: &str) -> NewProduct {
        NewProduct {
            name: Some("Tornillo M10".into()),
            sku: Some(sku.into()),
            sale_price: Some(1.25),
            total_stock: Some(100),
            ..Default::default()
        }
    }

    fn entity(id: i64) -> Option<EntityRef> {
        Some(EntityRef::new(RecordId::new(id)))
    }

    fn purchase() -> NewPurchase {
        NewPurchase {
            supplier: entity(1),
            product: entity(1),
            warehouse: entity(1),
            quantity: Some(20),
            unit_price: Some(0.9),
            purchase_date: "2024-05-10T09:00:00".parse().ok(),
            ..Default::default()
        }
    }

    fn sale(order: &str) -> NewSale {
        NewSale {
            customer: entity(1),
            product: entity(1),
            warehouse: entity(1),
            quantity: Some(3),
            unit_price: Some(1.25),
            sale_date: "2024-05-11T16:45:00".parse().ok(),
            order_number: Some(order.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_required_fields_never_write() {
        let (warehouses, repo) = counted::<Warehouse>();
        let err = warehouses
            .create(NewWarehouse { location: None, ..warehouse("Central", "Madrid", 10) })
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Validation("ubicacion is required".into()));
        assert_eq!(repo.writes(), 0);

        let (customers, repo) = counted::<Customer>();
        assert!(customers.create(NewCustomer::default()).await.is_err());
        assert_eq!(repo.writes(), 0);

        let (suppliers, repo) = counted::<Supplier>();
        let no_email = NewSupplier { name: Some("Aceros".into()), ..Default::default() };
        assert!(suppliers.create(no_email).await.is_err());
        assert_eq!(repo.writes(), 0);

        let (products, repo) = counted::<Product>();
        assert!(products.create(NewProduct { sale_price: None, ..tornillo("X") }).await.is_err());
        assert_eq!(repo.writes(), 0);

        let (purchases, repo) = counted::<Purchase>();
        assert!(purchases.create(NewPurchase { quantity: Some(0), ..purchase() }).await.is_err());
        assert_eq!(repo.writes(), 0);

        let (sales, repo) = counted::<Sale>();
        assert!(sales.create(NewSale { order_number: None, ..sale("P-1") }).await.is_err());
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn get_rejects_bad_ids_and_reports_unknown_ones() {
        let service = CrudService::<Warehouse>::in_memory();
        service.create(warehouse("Central", "Madrid", 10)).await.unwrap();

        for bad in [0, -1, i64::MIN] {
            assert!(matches!(service.get(bad).await, Err(ServiceError::Validation(_))));
        }
        assert_eq!(
            service.get(42).await.unwrap_err(),
            ServiceError::NotFound("warehouse not found with id 42".into())
        );
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = CrudService::<Warehouse>::in_memory();
        let created = service.create(warehouse("Central", "Madrid", 10_000)).await.unwrap();
        assert!(created.id.get() > 0);
        assert_eq!(created.lifecycle, Lifecycle::Active);

        let fetched = service.get(created.id.get()).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.data.name, "Central");
        assert_eq!(fetched.data.location, "Madrid");
        assert_eq!(fetched.data.max_capacity, Some(10_000));
    }

    #[tokio::test]
    async fn name_filter_is_case_insensitive_and_empty_filter_lists_active() {
        let service = CrudService::<Warehouse>::in_memory();
        service.create(warehouse("Central", "Madrid", 10_000)).await.unwrap();
        let norte = service.create(warehouse("Norte", "Bilbao", 5_000)).await.unwrap();

        let filter = WarehouseFilter { name: Some("norte".into()), ..Default::default() };
        let found = service.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, norte.id);

        assert_eq!(service.list(&WarehouseFilter::default()).await.unwrap().len(), 2);

        service.soft_delete(norte.id.get()).await.unwrap();
        let all: Vec<i64> = service
            .list(&WarehouseFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(all, vec![1]);
    }

    #[tokio::test]
    async fn updating_manager_only_keeps_other_fields() {
        let service = CrudService::<Warehouse>::in_memory();
        let created = service.create(warehouse("Central", "Madrid", 10_000)).await.unwrap();

        let patch = WarehousePatch { manager: Some(Some("Lucía Gómez".into())), ..Default::default() };
        let updated = service.update(created.id.get(), patch).await.unwrap();

        assert_eq!(updated.data.manager.as_deref(), Some("Lucía Gómez"));
        assert_eq!(updated.data.name, created.data.name);
        assert_eq!(updated.data.location, created.data.location);
        assert_eq!(updated.data.max_capacity, created.data.max_capacity);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.version, created.version + 1);
    }

    #[tokio::test]
    async fn invalid_update_writes_nothing() {
        let (service, repo) = counted::<Warehouse>();
        let created = service.create(warehouse("Central", "Madrid", 10)).await.unwrap();

        let patch = WarehousePatch { max_capacity: Some(Some(0)), ..Default::default() };
        assert!(matches!(
            service.update(created.id.get(), patch).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(repo.writes(), 1);
        assert_eq!(service.get(created.id.get()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn update_of_unknown_id_propagates_not_found() {
        let service = CrudService::<Warehouse>::in_memory();
        assert!(matches!(
            service.update(7, WarehousePatch::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(service.soft_delete(7).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn soft_delete_is_idempotent_and_record_stays_retrievable() {
        let service = CrudService::<Product>::in_memory();
        let created = service.create(tornillo("TOR-M10")).await.unwrap();

        service.soft_delete(created.id.get()).await.unwrap();
        service.soft_delete(created.id.get()).await.unwrap();

        let fetched = service.get(created.id.get()).await.unwrap();
        assert_eq!(fetched.lifecycle, Lifecycle::Inactive);
        assert_eq!(fetched.data, created.data);
    }

    #[tokio::test]
    async fn cancelled_purchases_stay_listed_with_the_sentinel_status() {
        let service = CrudService::<Purchase>::in_memory();
        let created = service.create(purchase()).await.unwrap();
        service.soft_delete(created.id.get()).await.unwrap();

        let listed = service.list(&PurchaseFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].lifecycle, Lifecycle::Cancelled);
        assert_eq!(listed[0].data.status, CANCELLED_STATUS);

        let reopen = PurchasePatch { status: Some("RECIBIDA".into()), ..Default::default() };
        let reopened = service.update(created.id.get(), reopen).await.unwrap();
        assert_eq!(reopened.lifecycle, Lifecycle::Active);
    }

    #[tokio::test]
    async fn duplicate_sku_is_a_conflict() {
        let service = CrudService::<Product>::in_memory();
        service.create(tornillo("TOR-M10")).await.unwrap();

        let err = service.create(tornillo("TOR-M10")).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Conflict("product with sku 'TOR-M10' already exists".into())
        );
    }

    #[tokio::test]
    async fn renaming_a_sku_onto_another_is_a_conflict() {
        let service = CrudService::<Product>::in_memory();
        service.create(tornillo("A")).await.unwrap();
        let b = service.create(tornillo("B")).await.unwrap();

        let patch = ProductPatch { sku: Some("A".into()), ..Default::default() };
        assert!(matches!(
            service.update(b.id.get(), patch).await,
            Err(ServiceError::Conflict(_))
        ));

        let keep = ProductPatch { sku: Some("B".into()), ..Default::default() };
        assert!(service.update(b.id.get(), keep).await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_order_number_is_a_conflict() {
        let service = CrudService::<Sale>::in_memory();
        service.create(sale("PED-1")).await.unwrap();
        assert!(matches!(
            service.create(sale("PED-1")).await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(service.create(sale("PED-2")).await.is_ok());
    }

    /// Another writer commits between every read and the caller's write.
    struct RacingRepository<R> {
        inner: InMemoryRepository<R>,
    }

    #[async_trait]
    impl<R: Resource> Repository<R> for RacingRepository<R> {
        async fn insert(
            &self,
            data: R,
            lifecycle: Lifecycle,
            created_at: DateTime<Utc>,
        ) -> Result<Record<R>, StoreError> {
            self.inner.insert(data, lifecycle, created_at).await
        }

        async fn get(&self, id: RecordId) -> Result<Option<Record<R>>, StoreError> {
            let read = self.inner.get(id).await?;
            if let Some(record) = &read {
                self.inner.update(record.clone(), ExpectedVersion::Any).await?;
            }
            Ok(read)
        }

        async fn list(&self) -> Result<Vec<Record<R>>, StoreError> {
            self.inner.list().await
        }

        async fn update(
            &self,
            record: Record<R>,
            expected_version: ExpectedVersion,
        ) -> Result<Record<R>, StoreError> {
            self.inner.update(record, expected_version).await
        }

        async fn find_by_unique_key(&self, key: &str) -> Result<Option<Record<R>>, StoreError> {
            self.inner.find_by_unique_key(key).await
        }
    }

    #[tokio::test]
    async fn stale_writes_surface_as_conflicts() {
        let repo = Arc::new(RacingRepository { inner: InMemoryRepository::<Warehouse>::new() });
        let service = CrudService::new(repo.clone());
        let created = service.create(warehouse("Central", "Madrid", 10)).await.unwrap();
        let id = created.id.get();

        let patch = WarehousePatch { manager: Some(Some("Lucía Gómez".into())), ..Default::default() };
        assert!(matches!(service.update(id, patch).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(service.soft_delete(id).await, Err(ServiceError::Conflict(_))));

        // Neither losing write landed.
        let stored = repo.inner.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.data.manager.as_deref(), Some("Carlos Ruiz"));
        assert_eq!(stored.lifecycle, Lifecycle::Active);
    }

    #[tokio::test]
    async fn purchases_and_sales_created_cancelled_start_cancelled() {
        let purchases = CrudService::<Purchase>::in_memory();
        let cancelled = NewPurchase { status: Some(CANCELLED_STATUS.into()), ..purchase() };
        let created = purchases.create(cancelled).await.unwrap();
        assert_eq!(created.lifecycle, Lifecycle::Cancelled);

        let listed = purchases.list(&PurchaseFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].lifecycle, Lifecycle::Cancelled);

        let sales = CrudService::<Sale>::in_memory();
        let created = sales
            .create(NewSale { status: Some("cancelada".into()), ..sale("PED-9") })
            .await
            .unwrap();
        assert_eq!(created.lifecycle, Lifecycle::Cancelled);
        assert_eq!(sales.create(sale("PED-10")).await.unwrap().lifecycle, Lifecycle::Active);
    }
}
