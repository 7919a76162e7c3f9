use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use mercado_fresco_api::{
    api_v1_routes,
    config::AppConfig,
    db,
    entities::{product, section},
    handlers::AppServices,
    AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tower::ServiceExt;

/// Sections seeded into every test database as `(id, section_number)`.
#[allow(dead_code)]
pub const SECTIONS: [(i32, i32); 4] = [(1, 22), (3, 483), (5, 7843), (7, 12)];

/// Products seeded into every test database.
#[allow(dead_code)]
pub const PRODUCT_IDS: [i32; 2] = [1, 2];

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single pooled connection keeps the in-memory database alive.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        for (id, number) in SECTIONS {
            section::ActiveModel {
                id: Set(id),
                section_number: Set(number),
            }
            .insert(&pool)
            .await
            .expect("seed section");
        }
        for id in PRODUCT_IDS {
            product::ActiveModel {
                id: Set(id),
                product_code: Set(format!("PRD-{id:03}")),
                description: Set(None),
            }
            .insert(&pool)
            .await
            .expect("seed product");
        }

        let db_arc = Arc::new(pool);
        let services = AppServices::new(
            db_arc.clone(),
            slog::Logger::root(slog::Discard, slog::o!()),
        );

        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", api_v1_routes())
            .with_state(state.clone());

        Self { router, state }
    }

    /// Issue a request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router response");

        let status = response.status();
        (status, response_json(response.into_body()).await)
    }
}

/// Helper to deserialize a JSON response body.
pub async fn response_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
