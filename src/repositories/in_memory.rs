//! In-memory repositories used as test doubles and for running the router
//! without a database. They enforce the same foreign-key and uniqueness
//! rules as the relational schema.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::{StoreError, StoreErrorKind};
use crate::models::product_batch::{ProductBatch, Report};
use crate::models::purchase_order::PurchaseOrder;
use crate::repositories::{ProductBatchRepository, PurchaseOrderRepository};

const FOREIGN_KEY_FAILED: &str = "FOREIGN KEY constraint failed";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct BatchTables {
    /// section id -> section number
    sections: BTreeMap<i32, i32>,
    products: HashSet<i32>,
    batches: BTreeMap<i32, ProductBatch>,
    next_id: i32,
}

#[derive(Debug, Default)]
pub struct InMemoryProductBatchRepository {
    tables: Mutex<BatchTables>,
}

impl InMemoryProductBatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(self, id: i32, section_number: i32) -> Self {
        lock(&self.tables).sections.insert(id, section_number);
        self
    }

    pub fn with_product(self, id: i32) -> Self {
        lock(&self.tables).products.insert(id);
        self
    }

    fn reports(tables: &BatchTables) -> Vec<Report> {
        let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
        for batch in tables.batches.values() {
            *counts.entry(batch.section_id).or_default() += 1;
        }

        counts
            .into_iter()
            .filter_map(|(section_id, count)| {
                tables
                    .sections
                    .get(&section_id)
                    .map(|number| Report::new(section_id, *number, count))
            })
            .collect()
    }
}

#[async_trait]
impl ProductBatchRepository for InMemoryProductBatchRepository {
    async fn create(&self, batch: &ProductBatch) -> Result<ProductBatch, StoreError> {
        let mut tables = lock(&self.tables);

        if !tables.products.contains(&batch.product_id)
            || !tables.sections.contains_key(&batch.section_id)
        {
            return Err(StoreError::new(
                StoreErrorKind::ForeignKeyViolation,
                FOREIGN_KEY_FAILED,
            ));
        }
        if tables
            .batches
            .values()
            .any(|existing| existing.batch_number == batch.batch_number)
        {
            return Err(StoreError::new(
                StoreErrorKind::UniqueViolation,
                "UNIQUE constraint failed: product_batches.batch_number",
            ));
        }

        tables.next_id += 1;
        let created = ProductBatch {
            id: tables.next_id,
            ..batch.clone()
        };
        tables.batches.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i32) -> Result<ProductBatch, StoreError> {
        lock(&self.tables)
            .batches
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::row_not_found(format!("no product batch row with id {}", id)))
    }

    async fn report(&self) -> Result<Vec<Report>, StoreError> {
        Ok(Self::reports(&lock(&self.tables)))
    }

    async fn report_by_id(&self, section_id: i32) -> Result<Report, StoreError> {
        Self::reports(&lock(&self.tables))
            .into_iter()
            .find(|report| report.section_id == section_id)
            .ok_or_else(|| {
                StoreError::row_not_found(format!("no report row for section {}", section_id))
            })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPurchaseOrderRepository {
    orders: Mutex<BTreeMap<i32, PurchaseOrder>>,
    insert_calls: AtomicUsize,
}

impl InMemoryPurchaseOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `create` has been invoked, successful or not.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PurchaseOrderRepository for InMemoryPurchaseOrderRepository {
    async fn create(&self, order: &PurchaseOrder) -> Result<PurchaseOrder, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let mut orders = lock(&self.orders);

        if orders
            .values()
            .any(|existing| existing.order_number == order.order_number)
        {
            return Err(StoreError::new(
                StoreErrorKind::UniqueViolation,
                "UNIQUE constraint failed: purchase_orders.order_number",
            ));
        }

        let id = orders.keys().next_back().copied().unwrap_or(0) + 1;
        let created = PurchaseOrder {
            id,
            ..order.clone()
        };
        orders.insert(id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i32) -> Result<PurchaseOrder, StoreError> {
        lock(&self.orders)
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::row_not_found(format!("no purchase order row with id {}", id)))
    }

    async fn validate_order_number(&self, order_number: &str) -> Result<bool, StoreError> {
        Ok(!lock(&self.orders)
            .values()
            .any(|existing| existing.order_number == order_number))
    }
}
