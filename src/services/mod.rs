// Domain services, one per slice
pub mod product_batches;
pub mod purchase_orders;

pub use product_batches::ProductBatchService;
pub use purchase_orders::PurchaseOrderService;
