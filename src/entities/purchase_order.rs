use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::models::purchase_order::PurchaseOrder;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub order_number: String,
    pub order_date: NaiveDate,
    pub tracking_code: String,
    pub buyer_id: i32,
    pub product_record_id: i32,
    pub order_status_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PurchaseOrder {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            order_date: model.order_date,
            tracking_code: model.tracking_code,
            buyer_id: model.buyer_id,
            product_record_id: model.product_record_id,
            order_status_id: model.order_status_id,
        }
    }
}

impl From<&PurchaseOrder> for ActiveModel {
    fn from(order: &PurchaseOrder) -> Self {
        Self {
            order_number: Set(order.order_number.clone()),
            order_date: Set(order.order_date),
            tracking_code: Set(order.tracking_code.clone()),
            buyer_id: Set(order.buyer_id),
            product_record_id: Set(order.product_record_id),
            order_status_id: Set(order.order_status_id),
            ..Default::default()
        }
    }
}
