use super::common::{
    created_response, map_json_rejection, map_path_rejection, non_zero, success_response,
    validate_input, RequiredFields,
};
use crate::{errors::ServiceError, handlers::AppState, models::purchase_order::PurchaseOrder};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Json, Path, State,
    },
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    /// Ignored; the store assigns the identifier.
    pub id: Option<i32>,
    #[validate(required, length(min = 1, code = "required"))]
    pub order_number: Option<String>,
    #[validate(required)]
    #[schema(value_type = Option<String>, format = Date, example = "2021-04-04")]
    pub order_date: Option<NaiveDate>,
    #[validate(required, length(min = 1, code = "required"))]
    pub tracking_code: Option<String>,
    #[validate(required, custom = "non_zero")]
    pub buyer_id: Option<i32>,
    #[validate(required, custom = "non_zero")]
    pub product_record_id: Option<i32>,
    #[validate(required, custom = "non_zero")]
    pub order_status_id: Option<i32>,
}

impl RequiredFields for CreatePurchaseOrderRequest {
    const TYPE_NAME: &'static str = "PurchaseOrders";
    const FIELDS: &'static [&'static str] = &[
        "order_number",
        "order_date",
        "tracking_code",
        "buyer_id",
        "product_record_id",
        "order_status_id",
    ];
}

impl CreatePurchaseOrderRequest {
    fn into_order(self) -> PurchaseOrder {
        PurchaseOrder {
            id: 0,
            order_number: self.order_number.unwrap_or_default(),
            order_date: self.order_date.unwrap_or(NaiveDate::MIN),
            tracking_code: self.tracking_code.unwrap_or_default(),
            buyer_id: self.buyer_id.unwrap_or_default(),
            product_record_id: self.product_record_id.unwrap_or_default(),
            order_status_id: self.order_status_id.unwrap_or_default(),
        }
    }
}

/// Place a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = PurchaseOrder),
        (status = 409, description = "Order number already in use", body = crate::errors::ErrorResponse),
        (status = 422, description = "Missing required fields", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    payload: Result<Json<CreatePurchaseOrderRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(payload) = payload.map_err(map_json_rejection)?;
    validate_input(&payload)?;

    let created = state
        .services
        .purchase_orders
        .create(payload.into_order())
        .await?;

    info!(
        "Purchase order created: {} ({})",
        created.id, created.order_number
    );

    Ok(created_response(created))
}

/// Get a purchase order by ID
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(
        ("id" = i32, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Purchase order fetched", body = PurchaseOrder),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, ServiceError> {
    let Path(id) = id.map_err(map_path_rejection)?;
    let order = state.services.purchase_orders.get_by_id(id).await?;

    Ok(success_response(order))
}

pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/purchase-orders", post(create_purchase_order))
        .route("/purchase-orders/", post(create_purchase_order))
        .route("/purchase-orders/:id", get(get_purchase_order))
}
