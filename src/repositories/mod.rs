use metrics::{counter, histogram};
use sea_orm::{DatabaseConnection, DbErr};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use crate::errors::{StoreError, StoreErrorKind};

pub mod in_memory;
pub mod product_batch_repository;
pub mod purchase_order_repository;

pub use product_batch_repository::{ProductBatchRepository, SeaOrmProductBatchRepository};
pub use purchase_order_repository::{PurchaseOrderRepository, SeaOrmPurchaseOrderRepository};

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Runs one store statement, recording its latency and classifying any
/// driver failure into a [`StoreError`].
pub(crate) async fn run_statement<T, Fut>(
    operation: &'static str,
    statement: Fut,
) -> Result<T, StoreError>
where
    Fut: Future<Output = Result<T, DbErr>>,
{
    let start = Instant::now();
    debug!(operation, "Starting database operation");

    let result = statement.await.map_err(|e| {
        let err = StoreError::from(e);
        if err.kind == StoreErrorKind::Other {
            error!(operation, error = %err, "Database operation failed");
        } else {
            debug!(operation, kind = %err.kind, error = %err, "Database operation rejected");
        }
        counter!(
            "mercado_fresco_db.operation.error",
            1,
            "operation" => operation,
            "kind" => err.kind.as_ref().to_string()
        );
        err
    });

    let elapsed = start.elapsed();
    histogram!("mercado_fresco_db.operation.duration", elapsed, "operation" => operation);

    result
}
