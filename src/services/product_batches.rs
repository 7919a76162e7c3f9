use slog::Logger;
use std::sync::Arc;
use tracing::instrument;

use crate::{
    errors::{ServiceError, StoreError, StoreErrorKind},
    models::product_batch::{ProductBatch, Report},
    repositories::ProductBatchRepository,
};

/// Service for registering product batches and reporting them per section
#[derive(Clone)]
pub struct ProductBatchService {
    repository: Arc<dyn ProductBatchRepository>,
    logger: Logger,
}

impl ProductBatchService {
    pub fn new(repository: Arc<dyn ProductBatchRepository>, logger: Logger) -> Self {
        Self { repository, logger }
    }

    /// Stores a new batch. Referential and uniqueness violations come back
    /// from the store unchanged.
    #[instrument(skip(self, batch), fields(batch_number = batch.batch_number))]
    pub async fn create(&self, batch: ProductBatch) -> Result<ProductBatch, ServiceError> {
        let created = self.repository.create(&batch).await.map_err(|err| {
            slog::warn!(self.logger, "product batch rejected";
                "batch_number" => batch.batch_number,
                "kind" => err.kind.as_ref());
            ServiceError::from(err)
        })?;

        slog::info!(self.logger, "product batch created";
            "id" => created.id,
            "section_id" => created.section_id);
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<ProductBatch, ServiceError> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(|err| not_found_or(err, || format!("product batch with id {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn report(&self) -> Result<Vec<Report>, ServiceError> {
        Ok(self.repository.report().await?)
    }

    /// A section without batches has no report row and is reported as missing.
    #[instrument(skip(self))]
    pub async fn report_by_id(&self, section_id: i32) -> Result<Report, ServiceError> {
        self.repository
            .report_by_id(section_id)
            .await
            .map_err(|err| {
                not_found_or(err, || format!("section with id {} not found", section_id))
            })
    }
}

/// Turns a missing row into a not-found error, leaving other failures as they are.
pub(crate) fn not_found_or(err: StoreError, message: impl FnOnce() -> String) -> ServiceError {
    match err.kind {
        StoreErrorKind::RowNotFound => ServiceError::NotFound(message()),
        _ => ServiceError::Store(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::product_batch_repository::MockProductBatchRepository;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    fn sample_batch() -> ProductBatch {
        ProductBatch {
            id: 1,
            batch_number: 111,
            current_quantity: 200,
            current_temperature: 20,
            due_date: NaiveDate::from_ymd_opt(2022, 4, 4),
            initial_quantity: 10,
            manufacturing_date: NaiveDate::from_ymd_opt(2020, 4, 4),
            manufacturing_hour: 10,
            minimum_temperature: 5,
            product_id: 1,
            section_id: 1,
        }
    }

    #[tokio::test]
    async fn create_returns_store_assigned_batch() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|batch| Ok(ProductBatch { id: 7, ..batch.clone() }));

        let service = ProductBatchService::new(Arc::new(repo), logger());
        let created = service.create(sample_batch()).await.unwrap();

        assert_eq!(created.id, 7);
        assert_eq!(created.batch_number, 111);
    }

    #[tokio::test]
    async fn create_propagates_foreign_key_violation_unchanged() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_create().returning(|_| {
            Err(StoreError::new(
                StoreErrorKind::ForeignKeyViolation,
                "FOREIGN KEY constraint failed",
            ))
        });

        let service = ProductBatchService::new(Arc::new(repo), logger());
        let err = service.create(sample_batch()).await.unwrap_err();

        assert_matches!(
            &err,
            ServiceError::Store(StoreError { kind: StoreErrorKind::ForeignKeyViolation, message })
                if message == "FOREIGN KEY constraint failed"
        );
    }

    #[tokio::test]
    async fn get_by_id_wraps_missing_row_with_id() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(StoreError::row_not_found("no rows")));

        let service = ProductBatchService::new(Arc::new(repo), logger());
        let err = service.get_by_id(42).await.unwrap_err();

        assert_matches!(err, ServiceError::NotFound(msg) if msg == "product batch with id 42 not found");
    }

    #[tokio::test]
    async fn report_by_id_without_batches_is_not_found() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_report_by_id()
            .withf(|section_id| *section_id == 9)
            .returning(|_| Err(StoreError::row_not_found("no rows")));

        let service = ProductBatchService::new(Arc::new(repo), logger());
        let err = service.report_by_id(9).await.unwrap_err();

        assert_matches!(err, ServiceError::NotFound(msg) if msg == "section with id 9 not found");
    }

    #[tokio::test]
    async fn report_propagates_store_errors() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_report()
            .returning(|| Err(StoreError::new(StoreErrorKind::Other, "disk I/O error")));

        let service = ProductBatchService::new(Arc::new(repo), logger());
        let err = service.report().await.unwrap_err();

        assert_matches!(err, ServiceError::Store(StoreError { kind: StoreErrorKind::Other, .. }));
    }
}
