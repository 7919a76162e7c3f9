//! Domain types shared by the repositories, services and handlers.

pub mod product_batch;
pub mod purchase_order;
