pub mod common;
pub mod product_batches;
pub mod purchase_orders;

use crate::repositories::{
    ProductBatchRepository, PurchaseOrderRepository, SeaOrmProductBatchRepository,
    SeaOrmPurchaseOrderRepository,
};
use crate::services::{ProductBatchService, PurchaseOrderService};
use sea_orm::DatabaseConnection;
use slog::Logger;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub product_batches: Arc<ProductBatchService>,
    pub purchase_orders: Arc<PurchaseOrderService>,
}

impl AppServices {
    /// Build the services over the relational store.
    pub fn new(db: Arc<DatabaseConnection>, logger: Logger) -> Self {
        Self::from_repositories(
            Arc::new(SeaOrmProductBatchRepository::new(db.clone())),
            Arc::new(SeaOrmPurchaseOrderRepository::new(db)),
            logger,
        )
    }

    /// Build the services over any repository implementations.
    pub fn from_repositories(
        product_batches: Arc<dyn ProductBatchRepository>,
        purchase_orders: Arc<dyn PurchaseOrderRepository>,
        logger: Logger,
    ) -> Self {
        let batches_logger = logger.new(slog::o!("component" => "product_batch_service"));
        let orders_logger = logger.new(slog::o!("component" => "purchase_order_service"));

        Self {
            product_batches: Arc::new(ProductBatchService::new(product_batches, batches_logger)),
            purchase_orders: Arc::new(PurchaseOrderService::new(purchase_orders, orders_logger)),
        }
    }
}
