use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use std::sync::Arc;

use crate::entities::purchase_order::{self, Column};
use crate::errors::StoreError;
use crate::models::purchase_order::PurchaseOrder;
use crate::repositories::{run_statement, BaseRepository, Repository};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseOrderRepository: Send + Sync {
    async fn create(&self, order: &PurchaseOrder) -> Result<PurchaseOrder, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<PurchaseOrder, StoreError>;

    /// Returns `true` when no stored order uses `order_number`.
    async fn validate_order_number(&self, order_number: &str) -> Result<bool, StoreError>;
}

/// SeaORM-backed purchase order repository
#[derive(Debug, Clone)]
pub struct SeaOrmPurchaseOrderRepository {
    base: BaseRepository,
}

impl SeaOrmPurchaseOrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl PurchaseOrderRepository for SeaOrmPurchaseOrderRepository {
    async fn create(&self, order: &PurchaseOrder) -> Result<PurchaseOrder, StoreError> {
        let row = purchase_order::ActiveModel::from(order);
        let inserted = run_statement(
            "purchase_orders.insert",
            purchase_order::Entity::insert(row).exec(self.get_db()),
        )
        .await?;

        Ok(PurchaseOrder {
            id: inserted.last_insert_id,
            ..order.clone()
        })
    }

    async fn get_by_id(&self, id: i32) -> Result<PurchaseOrder, StoreError> {
        run_statement(
            "purchase_orders.find_by_id",
            purchase_order::Entity::find_by_id(id).one(self.get_db()),
        )
        .await?
        .map(PurchaseOrder::from)
        .ok_or_else(|| StoreError::row_not_found(format!("no purchase order row with id {}", id)))
    }

    async fn validate_order_number(&self, order_number: &str) -> Result<bool, StoreError> {
        let existing = run_statement(
            "purchase_orders.count_by_order_number",
            purchase_order::Entity::find()
                .filter(Column::OrderNumber.eq(order_number))
                .count(self.get_db()),
        )
        .await?;

        Ok(existing == 0)
    }
}

impl Repository for SeaOrmPurchaseOrderRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
