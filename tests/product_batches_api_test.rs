mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

fn sample_batch() -> Value {
    json!({
        "batch_number": 111,
        "current_quantity": 200,
        "current_temperature": 20,
        "due_date": "2022-04-04",
        "initial_quantity": 10,
        "manufacturing_date": "2020-04-04",
        "manufacturing_hour": 10,
        "minimum_temperature": 5,
        "product_id": 1,
        "section_id": 1
    })
}

#[tokio::test]
async fn creating_the_sample_batch_returns_created_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::POST, "/api/v1/productBatches", Some(sample_batch()))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let mut expected = sample_batch();
    expected["id"] = json!(1);
    assert_eq!(body, json!({"code": 201, "data": expected}));
}

#[tokio::test]
async fn stored_batch_reads_back_with_the_same_fields() {
    let app = TestApp::new().await;
    let mut request = sample_batch();
    request["id"] = json!(999);
    request["section_id"] = json!(3);

    let (_, created) = app
        .request(Method::POST, "/api/v1/productBatches", Some(request))
        .await;
    let id = created["data"]["id"].as_i64().expect("assigned id");
    assert_ne!(id, 999);

    let (status, fetched) = app
        .request(Method::GET, &format!("/api/v1/productBatches/{id}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);
    assert_eq!(fetched["data"]["section_id"], 3);
    assert_eq!(fetched["data"]["due_date"], "2022-04-04");
}

#[tokio::test]
async fn unknown_section_is_a_conflict_with_store_message() {
    let app = TestApp::new().await;
    let mut request = sample_batch();
    request["section_id"] = json!(404);

    let (status, body) = app
        .request(Method::POST, "/api/v1/productBatches", Some(request))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
    assert!(
        body["error"].as_str().unwrap_or_default().contains("FOREIGN KEY"),
        "unexpected error: {body}"
    );
}

#[tokio::test]
async fn unknown_product_is_a_conflict() {
    let app = TestApp::new().await;
    let mut request = sample_batch();
    request["product_id"] = json!(77);

    let (status, body) = app
        .request(Method::POST, "/api/v1/productBatches", Some(request))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn repeated_batch_number_is_a_conflict() {
    let app = TestApp::new().await;
    app.request(Method::POST, "/api/v1/productBatches", Some(sample_batch()))
        .await;

    let (status, body) = app
        .request(Method::POST, "/api/v1/productBatches", Some(sample_batch()))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["error"].as_str().unwrap_or_default().contains("UNIQUE"),
        "unexpected error: {body}"
    );
}

#[tokio::test]
async fn missing_required_fields_are_listed_in_declaration_order() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/productBatches",
            Some(json!({"product_id": 1, "current_quantity": 3})),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({
            "code": 422,
            "error": "Key: 'ProductBatches.BatchNumber' Error:Field validation for 'BatchNumber' failed on the 'required' tag\nKey: 'ProductBatches.SectionId' Error:Field validation for 'SectionId' failed on the 'required' tag"
        })
    );
}

#[tokio::test]
async fn unknown_batch_id_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::GET, "/api/v1/productBatches/12", None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"code": 404, "error": "product batch with id 12 not found"})
    );
}
