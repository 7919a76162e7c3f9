use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::models::product_batch::ProductBatch;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub batch_number: i32,
    pub current_quantity: i32,
    pub current_temperature: i32,
    pub due_date: Option<NaiveDate>,
    pub initial_quantity: i32,
    pub manufacturing_date: Option<NaiveDate>,
    pub manufacturing_hour: i32,
    pub minimum_temperature: i32,
    pub product_id: i32,
    pub section_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id"
    )]
    Section,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductBatch {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            batch_number: model.batch_number,
            current_quantity: model.current_quantity,
            current_temperature: model.current_temperature,
            due_date: model.due_date,
            initial_quantity: model.initial_quantity,
            manufacturing_date: model.manufacturing_date,
            manufacturing_hour: model.manufacturing_hour,
            minimum_temperature: model.minimum_temperature,
            product_id: model.product_id,
            section_id: model.section_id,
        }
    }
}

/// Builds an insertable row; the id is left for the store to assign.
impl From<&ProductBatch> for ActiveModel {
    fn from(batch: &ProductBatch) -> Self {
        Self {
            batch_number: Set(batch.batch_number),
            current_quantity: Set(batch.current_quantity),
            current_temperature: Set(batch.current_temperature),
            due_date: Set(batch.due_date),
            initial_quantity: Set(batch.initial_quantity),
            manufacturing_date: Set(batch.manufacturing_date),
            manufacturing_hour: Set(batch.manufacturing_hour),
            minimum_temperature: Set(batch.minimum_temperature),
            product_id: Set(batch.product_id),
            section_id: Set(batch.section_id),
            ..Default::default()
        }
    }
}
