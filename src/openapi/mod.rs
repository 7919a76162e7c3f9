use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mercado Fresco API",
        version = "1.0.0",
        description = r#"
# Mercado Fresco Inventory API

Registers product batches into warehouse sections, reports how many batches
each section holds, and takes purchase orders.

## Responses

Successful calls wrap their payload with the HTTP status code:

```json
{ "code": 201, "data": { "id": 1 } }
```

Failures carry a message instead:

```json
{ "code": 409, "error": "the order number must be unique" }
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "product-batches", description = "Product batch registration and section reports"),
        (name = "purchase-orders", description = "Purchase order intake")
    ),
    paths(
        crate::handlers::product_batches::create_product_batch,
        crate::handlers::product_batches::get_product_batch,
        crate::handlers::product_batches::report_products,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::get_purchase_order,
    ),
    components(
        schemas(
            crate::models::product_batch::ProductBatch,
            crate::models::product_batch::Report,
            crate::models::purchase_order::PurchaseOrder,
            crate::handlers::product_batches::CreateProductBatchRequest,
            crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
