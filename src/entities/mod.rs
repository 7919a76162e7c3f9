//! SeaORM entities backing the relational schema.

pub mod product;
pub mod product_batch;
pub mod purchase_order;
pub mod section;
