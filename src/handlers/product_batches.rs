use super::common::{
    created_response, map_json_rejection, map_path_rejection, map_query_rejection, non_zero,
    success_response, validate_input, RequiredFields,
};
use crate::{
    errors::ServiceError,
    handlers::AppState,
    models::product_batch::{ProductBatch, Report},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductBatchRequest {
    /// Ignored; the store assigns the identifier.
    pub id: Option<i32>,
    #[validate(required, custom = "non_zero")]
    pub batch_number: Option<i32>,
    #[serde(default)]
    pub current_quantity: i32,
    #[serde(default)]
    pub current_temperature: i32,
    #[schema(value_type = Option<String>, format = Date, example = "2022-04-04")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub initial_quantity: i32,
    #[schema(value_type = Option<String>, format = Date, example = "2020-04-04")]
    pub manufacturing_date: Option<NaiveDate>,
    #[serde(default)]
    pub manufacturing_hour: i32,
    #[serde(default)]
    pub minimum_temperature: i32,
    #[validate(required, custom = "non_zero")]
    pub product_id: Option<i32>,
    #[validate(required, custom = "non_zero")]
    pub section_id: Option<i32>,
}

impl RequiredFields for CreateProductBatchRequest {
    const TYPE_NAME: &'static str = "ProductBatches";
    const FIELDS: &'static [&'static str] = &["batch_number", "product_id", "section_id"];
}

impl CreateProductBatchRequest {
    fn into_batch(self) -> ProductBatch {
        ProductBatch {
            id: 0,
            batch_number: self.batch_number.unwrap_or_default(),
            current_quantity: self.current_quantity,
            current_temperature: self.current_temperature,
            due_date: self.due_date,
            initial_quantity: self.initial_quantity,
            manufacturing_date: self.manufacturing_date,
            manufacturing_hour: self.manufacturing_hour,
            minimum_temperature: self.minimum_temperature,
            product_id: self.product_id.unwrap_or_default(),
            section_id: self.section_id.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportParams {
    /// Restrict the report to one section
    pub id: Option<i32>,
}

/// Register a product batch
#[utoipa::path(
    post,
    path = "/api/v1/productBatches",
    request_body = CreateProductBatchRequest,
    responses(
        (status = 201, description = "Product batch created", body = ProductBatch),
        (status = 409, description = "Unknown product or section, or repeated batch number", body = crate::errors::ErrorResponse),
        (status = 422, description = "Missing required fields", body = crate::errors::ErrorResponse)
    ),
    tag = "product-batches"
)]
pub async fn create_product_batch(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductBatchRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(payload) = payload.map_err(map_json_rejection)?;
    validate_input(&payload)?;

    let created = state
        .services
        .product_batches
        .create(payload.into_batch())
        .await?;

    info!("Product batch created: {}", created.id);

    Ok(created_response(created))
}

/// Get a product batch by ID
#[utoipa::path(
    get,
    path = "/api/v1/productBatches/{id}",
    params(
        ("id" = i32, Path, description = "Product batch ID")
    ),
    responses(
        (status = 200, description = "Product batch fetched", body = ProductBatch),
        (status = 404, description = "Product batch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "product-batches"
)]
pub async fn get_product_batch(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ServiceError> {
    let Path(id) = id.map_err(map_path_rejection)?;
    let batch = state.services.product_batches.get_by_id(id).await?;

    Ok(success_response(batch))
}

/// Count product batches per section
#[utoipa::path(
    get,
    path = "/api/v1/sections/reportProducts",
    params(ReportParams),
    responses(
        (status = 200, description = "Batch counts per section, or one section when `id` is given", body = [Report]),
        (status = 400, description = "Store failure", body = crate::errors::ErrorResponse),
        (status = 404, description = "Section has no batches", body = crate::errors::ErrorResponse)
    ),
    tag = "product-batches"
)]
pub async fn report_products(
    State(state): State<AppState>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Response, ServiceError> {
    let Query(params) = params.map_err(map_query_rejection)?;
    let service = &state.services.product_batches;

    match params.id {
        Some(section_id) => Ok(success_response(service.report_by_id(section_id).await?)),
        None => Ok(success_response(service.report().await?)),
    }
}

pub fn product_batch_routes() -> Router<AppState> {
    Router::new()
        .route("/productBatches", post(create_product_batch))
        .route("/productBatches/:id", get(get_product_batch))
        .route("/sections/reportProducts", get(report_products))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{StoreError, StoreErrorKind};
    use crate::repositories::{
        in_memory::InMemoryPurchaseOrderRepository,
        product_batch_repository::MockProductBatchRepository,
    };
    use crate::{config::AppConfig, handlers::AppServices};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use rstest::rstest;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(repo: MockProductBatchRepository) -> Router {
        let services = AppServices::from_repositories(
            Arc::new(repo),
            Arc::new(InMemoryPurchaseOrderRepository::new()),
            slog::Logger::root(slog::Discard, slog::o!()),
        );
        let state = AppState {
            db: Arc::new(sea_orm::DatabaseConnection::Disconnected),
            config: AppConfig::new("sqlite::memory:".into(), "127.0.0.1".into(), 0, "test".into()),
            services,
        };
        Router::new()
            .nest("/api/v1", product_batch_routes())
            .with_state(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::post("/api/v1/productBatches")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn report_returns_store_rows_verbatim() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_report().times(1).returning(|| {
            Ok(vec![
                Report::new(1, 22, 5),
                Report::new(3, 483, 28),
                Report::new(5, 7843, 90),
            ])
        });

        let request = Request::get("/api/v1/sections/reportProducts")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(repo), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "code": 200,
                "data": [
                    {"section_id": 1, "section_number": 22, "products_count": 5},
                    {"section_id": 3, "section_number": 483, "products_count": 28},
                    {"section_id": 5, "section_number": 7843, "products_count": 90}
                ]
            })
        );
    }

    #[tokio::test]
    async fn report_store_failure_is_bad_request() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_report()
            .returning(|| Err(StoreError::new(StoreErrorKind::Other, "no such table: section")));

        let request = Request::get("/api/v1/sections/reportProducts")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(repo), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"code": 400, "error": "database error"}));
    }

    #[tokio::test]
    async fn report_by_id_passes_section_through() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_report_by_id()
            .withf(|id| *id == 3)
            .returning(|_| Ok(Report::new(3, 483, 28)));

        let request = Request::get("/api/v1/sections/reportProducts?id=3")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(repo), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!({"section_id": 3, "section_number": 483, "products_count": 28})
        );
    }

    #[tokio::test]
    async fn report_by_id_rejects_non_numeric_id() {
        let repo = MockProductBatchRepository::new();
        let request = Request::get("/api/v1/sections/reportProducts?id=abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(repo), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn foreign_key_conflict_relays_store_message() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_create().returning(|_| {
            Err(StoreError::new(
                StoreErrorKind::ForeignKeyViolation,
                "insert or update on table \"product_batches\" violates foreign key constraint \"fk_product_batches_section\"",
            ))
        });

        let (status, body) = send(
            app(repo),
            post_json(json!({"batch_number": 111, "product_id": 1, "section_id": 99})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body,
            json!({
                "code": 409,
                "error": "insert or update on table \"product_batches\" violates foreign key constraint \"fk_product_batches_section\""
            })
        );
    }

    #[tokio::test]
    async fn insert_without_affected_rows_is_bad_request() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(StoreError::not_affected()));

        let (status, body) = send(
            app(repo),
            post_json(json!({"batch_number": 111, "product_id": 1, "section_id": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"code": 400, "error": "no rows affected"}));
    }

    #[rstest]
    #[case::batch_number(json!({"product_id": 1, "section_id": 1}), "BatchNumber")]
    #[case::product_id(json!({"batch_number": 111, "section_id": 1}), "ProductId")]
    #[case::section_id(json!({"batch_number": 111, "product_id": 1}), "SectionId")]
    #[case::zero_section(json!({"batch_number": 111, "product_id": 1, "section_id": 0}), "SectionId")]
    #[tokio::test]
    async fn missing_required_field_is_unprocessable(#[case] body: Value, #[case] field: &str) {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_create().never();

        let (status, response) = send(app(repo), post_json(body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response["error"],
            format!(
                "Key: 'ProductBatches.{field}' Error:Field validation for '{field}' failed on the 'required' tag"
            )
        );
    }

    #[tokio::test]
    async fn every_missing_field_is_listed_in_order() {
        let mut repo = MockProductBatchRepository::new();
        repo.expect_create().never();

        let (status, response) = send(app(repo), post_json(json!({"current_quantity": 5}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response["error"],
            "Key: 'ProductBatches.BatchNumber' Error:Field validation for 'BatchNumber' failed on the 'required' tag\n\
             Key: 'ProductBatches.ProductId' Error:Field validation for 'ProductId' failed on the 'required' tag\n\
             Key: 'ProductBatches.SectionId' Error:Field validation for 'SectionId' failed on the 'required' tag"
        );
    }

    #[tokio::test]
    async fn mistyped_field_is_unprocessable_and_non_json_is_bad_request() {
        let (status, body) = send(
            app(MockProductBatchRepository::new()),
            post_json(json!({"batch_number": "abc", "product_id": 1, "section_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], 422);

        let request = Request::post("/api/v1/productBatches")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(app(MockProductBatchRepository::new()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }
}
