use slog::Logger;
use std::sync::Arc;
use tracing::instrument;

use crate::{
    errors::{ServiceError, StoreErrorKind, DUPLICATE_ORDER_NUMBER},
    models::purchase_order::PurchaseOrder,
    repositories::PurchaseOrderRepository,
    services::product_batches::not_found_or,
};

/// Service for placing and looking up purchase orders
#[derive(Clone)]
pub struct PurchaseOrderService {
    repository: Arc<dyn PurchaseOrderRepository>,
    logger: Logger,
}

impl PurchaseOrderService {
    pub fn new(repository: Arc<dyn PurchaseOrderRepository>, logger: Logger) -> Self {
        Self { repository, logger }
    }

    /// Creates a purchase order after checking that its order number is free.
    ///
    /// The check and the insert are separate statements, so a concurrent
    /// create can slip between them; the unique index on `order_number`
    /// catches that case and it is reported with the same duplicate message.
    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    pub async fn create(&self, order: PurchaseOrder) -> Result<PurchaseOrder, ServiceError> {
        if !self
            .repository
            .validate_order_number(&order.order_number)
            .await?
        {
            slog::info!(self.logger, "duplicate order number";
                "order_number" => &order.order_number);
            return Err(ServiceError::Conflict(DUPLICATE_ORDER_NUMBER.to_string()));
        }

        match self.repository.create(&order).await {
            Ok(created) => {
                slog::info!(self.logger, "purchase order created";
                    "id" => created.id,
                    "order_number" => &created.order_number);
                Ok(created)
            }
            Err(err) if err.kind == StoreErrorKind::UniqueViolation => {
                slog::warn!(self.logger, "order number taken between check and insert";
                    "order_number" => &order.order_number);
                Err(ServiceError::Conflict(DUPLICATE_ORDER_NUMBER.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<PurchaseOrder, ServiceError> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(|err| not_found_or(err, || format!("purchase order with id {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::repositories::purchase_order_repository::MockPurchaseOrderRepository;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    fn order(order_number: &str) -> PurchaseOrder {
        PurchaseOrder {
            id: 0,
            order_number: order_number.to_string(),
            order_date: NaiveDate::from_ymd_opt(2021, 4, 4).unwrap(),
            tracking_code: "abscf123".to_string(),
            buyer_id: 1,
            product_record_id: 1,
            order_status_id: 1,
        }
    }

    #[tokio::test]
    async fn duplicate_order_number_never_reaches_insert() {
        let mut repo = MockPurchaseOrderRepository::new();
        repo.expect_validate_order_number()
            .withf(|number| number == "PO-1")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_create().never();

        let service = PurchaseOrderService::new(Arc::new(repo), logger());
        let err = service.create(order("PO-1")).await.unwrap_err();

        assert_matches!(err, ServiceError::Conflict(msg) if msg == DUPLICATE_ORDER_NUMBER);
    }

    #[tokio::test]
    async fn failing_check_is_propagated_without_insert() {
        let mut repo = MockPurchaseOrderRepository::new();
        repo.expect_validate_order_number()
            .returning(|_| Err(StoreError::new(StoreErrorKind::Other, "database is locked")));
        repo.expect_create().never();

        let service = PurchaseOrderService::new(Arc::new(repo), logger());
        let err = service.create(order("PO-1")).await.unwrap_err();

        assert_matches!(
            err,
            ServiceError::Store(StoreError { kind: StoreErrorKind::Other, message })
                if message == "database is locked"
        );
    }

    #[tokio::test]
    async fn available_order_number_is_inserted() {
        let mut repo = MockPurchaseOrderRepository::new();
        repo.expect_validate_order_number().returning(|_| Ok(true));
        repo.expect_create()
            .times(1)
            .returning(|order| Ok(PurchaseOrder { id: 3, ..order.clone() }));

        let service = PurchaseOrderService::new(Arc::new(repo), logger());
        let created = service.create(order("PO-2")).await.unwrap();

        assert_eq!(created.id, 3);
        assert_eq!(created.order_number, "PO-2");
    }

    #[tokio::test]
    async fn unique_violation_on_insert_reports_duplicate() {
        let mut repo = MockPurchaseOrderRepository::new();
        repo.expect_validate_order_number().returning(|_| Ok(true));
        repo.expect_create().returning(|_| {
            Err(StoreError::new(
                StoreErrorKind::UniqueViolation,
                "UNIQUE constraint failed: purchase_orders.order_number",
            ))
        });

        let service = PurchaseOrderService::new(Arc::new(repo), logger());
        let err = service.create(order("PO-3")).await.unwrap_err();

        assert_matches!(err, ServiceError::Conflict(msg) if msg == DUPLICATE_ORDER_NUMBER);
    }

    #[tokio::test]
    async fn get_by_id_embeds_identifier_in_not_found() {
        let mut repo = MockPurchaseOrderRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(StoreError::row_not_found("no rows")));

        let service = PurchaseOrderService::new(Arc::new(repo), logger());
        let err = service.get_by_id(5).await.unwrap_err();

        assert_matches!(err, ServiceError::NotFound(msg) if msg == "purchase order with id 5 not found");
    }
}
