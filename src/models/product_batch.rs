use chrono::NaiveDate;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A received batch of a product, stored in a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductBatch {
    pub id: i32,
    pub batch_number: i32,
    pub current_quantity: i32,
    pub current_temperature: i32,
    #[schema(value_type = Option<String>, format = Date, example = "2022-04-04")]
    pub due_date: Option<NaiveDate>,
    pub initial_quantity: i32,
    #[schema(value_type = Option<String>, format = Date, example = "2020-04-04")]
    pub manufacturing_date: Option<NaiveDate>,
    pub manufacturing_hour: i32,
    pub minimum_temperature: i32,
    pub product_id: i32,
    pub section_id: i32,
}

/// Number of batches held by one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct Report {
    pub section_id: i32,
    pub section_number: i32,
    pub products_count: i64,
}

impl Report {
    pub fn new(section_id: i32, section_number: i32, products_count: i64) -> Self {
        Self {
            section_id,
            section_number,
            products_count,
        }
    }
}
