//! Health, banner and middleware integration tests.

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn health_reports_store_backend() {
    let app = setup_test_app();

    let response = app.client().get("/api/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["store"], "memory");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn ping_reports_environment() {
    let app = setup_test_app();

    let response = app.client().get("/api/test").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn banner_lists_upload_endpoints() {
    let app = setup_test_app();

    let body: serde_json::Value = app.client().get("/").await.json();

    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "POST /api/uploads/multiple"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app();

    let body: serde_json::Value = app.client().get("/api/openapi.json").await.json();

    assert!(body["paths"]["/api/uploads/single"].is_object());
    assert_eq!(body["components"]["schemas"]["PublishedAsset"]["type"], "object");
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let app = setup_test_app();

    let response = app.client().get("/api/nope").await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/api/health")
        .add_header("X-Request-ID", "req-123")
        .await;

    assert_eq!(response.header("x-request-id"), "req-123");
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/api/health")
        .add_header("Origin", "http://localhost:5173")
        .await;

    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://localhost:5173"
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}
