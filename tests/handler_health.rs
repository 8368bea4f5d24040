mod common;

use async_trait::async_trait;
use axum_test::TestServer;
use seqlink::domain::repositories::CounterRepository;
use seqlink::error::AppError;
use seqlink::infrastructure::memory::MemoryMappingRepository;
use seqlink::routes::app_router;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct UnreachableCounter;

/// Accepts the connection but never answers.
struct StalledCounter;

#[async_trait]
impl CounterRepository for StalledCounter {
    async fn increment_and_fetch(&self, _name: &str) -> Result<u64, AppError> {
        std::future::pending().await
    }

    async fn health_check(&self) -> bool {
        std::future::pending().await
    }
}

#[async_trait]
impl CounterRepository for UnreachableCounter {
    async fn increment_and_fetch(&self, _name: &str) -> Result<u64, AppError> {
        Err(AppError::store_unavailable("connection refused", json!({})))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

#[tokio::test]
async fn test_health_ok() {
    let app = common::create_test_app();

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["worker"], 0);
    assert_eq!(body["checks"]["mapping_store"]["status"], "ok");
    assert_eq!(body["checks"]["counter_store"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_counter_unreachable() {
    let state = common::create_test_state(
        Arc::new(MemoryMappingRepository::new()),
        Arc::new(UnreachableCounter),
    );
    let server = TestServer::new(app_router(state)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["mapping_store"]["status"], "ok");
    assert_eq!(body["checks"]["counter_store"]["status"], "error");
}

#[tokio::test]
async fn test_health_probe_is_bounded_by_store_timeout() {
    let state = common::create_test_state_with_timeout(
        Arc::new(MemoryMappingRepository::new()),
        Arc::new(StalledCounter),
        Duration::from_millis(100),
    );
    let server = TestServer::new(app_router(state)).unwrap();

    let started = Instant::now();
    let response = server.get("/health").await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(response.status_code(), 503);

    let body: Value = response.json();
    assert_eq!(body["checks"]["mapping_store"]["status"], "ok");
    assert_eq!(body["checks"]["counter_store"]["status"], "error");
}

#[tokio::test]
async fn test_shorten_hides_store_details() {
    let state = common::create_test_state(
        Arc::new(MemoryMappingRepository::new()),
        Arc::new(UnreachableCounter),
    );
    let server = TestServer::new(app_router(state)).unwrap();

    let response = server
        .post("/api/url/shorten")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 500);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "store_unavailable");
    assert_eq!(body["error"]["message"], "Server error");
    assert_eq!(body["error"]["details"], json!({}));
}
