use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An order placed by a buyer for a product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrder {
    pub id: i32,
    pub order_number: String,
    #[schema(value_type = String, format = Date, example = "2021-04-04")]
    pub order_date: NaiveDate,
    pub tracking_code: String,
    pub buyer_id: i32,
    pub product_record_id: i32,
    pub order_status_id: i32,
}
