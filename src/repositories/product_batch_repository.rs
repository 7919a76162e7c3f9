use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use std::sync::Arc;

use crate::entities::{product_batch, section};
use crate::errors::StoreError;
use crate::models::product_batch::{ProductBatch, Report};
use crate::repositories::{run_statement, BaseRepository, Repository};

/// Persistence gateway for product batches and the per-section report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductBatchRepository: Send + Sync {
    /// Inserts the batch and returns it carrying the store-assigned id.
    async fn create(&self, batch: &ProductBatch) -> Result<ProductBatch, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<ProductBatch, StoreError>;

    /// Batch counts for every section that holds at least one batch.
    async fn report(&self) -> Result<Vec<Report>, StoreError>;

    async fn report_by_id(&self, section_id: i32) -> Result<Report, StoreError>;
}

/// SeaORM-backed product batch repository
#[derive(Debug, Clone)]
pub struct SeaOrmProductBatchRepository {
    base: BaseRepository,
}

impl SeaOrmProductBatchRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn report_query() -> Select<section::Entity> {
        section::Entity::find()
            .select_only()
            .column_as(section::Column::Id, "section_id")
            .column_as(section::Column::SectionNumber, "section_number")
            .column_as(
                Expr::col((product_batch::Entity, product_batch::Column::Id)).count(),
                "products_count",
            )
            .join(JoinType::InnerJoin, section::Relation::ProductBatches.def())
            .group_by(section::Column::Id)
            .group_by(section::Column::SectionNumber)
            .order_by_asc(section::Column::Id)
    }
}

#[async_trait]
impl ProductBatchRepository for SeaOrmProductBatchRepository {
    async fn create(&self, batch: &ProductBatch) -> Result<ProductBatch, StoreError> {
        let row = product_batch::ActiveModel::from(batch);
        let inserted = run_statement(
            "product_batches.insert",
            product_batch::Entity::insert(row).exec(self.get_db()),
        )
        .await?;

        Ok(ProductBatch {
            id: inserted.last_insert_id,
            ..batch.clone()
        })
    }

    async fn get_by_id(&self, id: i32) -> Result<ProductBatch, StoreError> {
        run_statement(
            "product_batches.find_by_id",
            product_batch::Entity::find_by_id(id).one(self.get_db()),
        )
        .await?
        .map(ProductBatch::from)
        .ok_or_else(|| StoreError::row_not_found(format!("no product batch row with id {}", id)))
    }

    async fn report(&self) -> Result<Vec<Report>, StoreError> {
        run_statement(
            "product_batches.report",
            Self::report_query().into_model::<Report>().all(self.get_db()),
        )
        .await
    }

    async fn report_by_id(&self, section_id: i32) -> Result<Report, StoreError> {
        run_statement(
            "product_batches.report_by_id",
            Self::report_query()
                .filter(section::Column::Id.eq(section_id))
                .into_model::<Report>()
                .one(self.get_db()),
        )
        .await?
        .ok_or_else(|| {
            StoreError::row_not_found(format!("no report row for section {}", section_id))
        })
    }
}

impl Repository for SeaOrmProductBatchRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
