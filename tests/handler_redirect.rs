mod common;

use serde_json::{Value, json};

async fn shorten(app: &common::TestApp, url: &str) -> Value {
    app.server
        .post("/api/url/shorten")
        .json(&json!({ "originalUrl": url }))
        .await
        .json()
}

#[tokio::test]
async fn test_redirect_success() {
    let app = common::create_test_app();
    let created = shorten(&app, "https://example.com/target").await;
    let code = created["code"].as_str().unwrap();

    let response = app.server.get(&format!("/{code}")).await;

    assert_eq!(response.status_code(), 301);

    let location = response.header("location");
    assert_eq!(location, "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_counts_clicks() {
    let app = common::create_test_app();
    let created = shorten(&app, "https://example.com/popular").await;
    let code = created["code"].as_str().unwrap();

    for _ in 0..3 {
        app.server.get(&format!("/{code}")).await;
    }

    let again = shorten(&app, "https://example.com/popular").await;
    assert_eq!(again["clicks"], 3);
    assert_eq!(again["code"], code);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::create_test_app();

    let response = app.server.get("/zzz").await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_invalid_code() {
    let app = common::create_test_app();

    for bad in ["ab-c", "a_b", "%F0%9F%98%80"] {
        let response = app.server.get(&format!("/{bad}")).await;

        assert_eq!(response.status_code(), 400, "accepted {bad:?}");
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "invalid_code");
    }
}

#[tokio::test]
async fn test_redirect_overlong_code_is_unknown() {
    let app = common::create_test_app();
    shorten(&app, "https://example.com/a").await;

    for code in ["doesNotExist".to_string(), "a".repeat(10_000)] {
        let response = app.server.get(&format!("/{code}")).await;

        assert_eq!(response.status_code(), 404);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "not_found");
    }
}

#[tokio::test]
async fn test_redirect_does_not_touch_counter() {
    let app = common::create_test_app();
    let created = shorten(&app, "https://example.com/once").await;
    let code = created["code"].as_str().unwrap();

    app.server.get(&format!("/{code}")).await;
    app.server.get("/missing").await;

    assert_eq!(app.counters.current(common::COUNTER_NAME), 1);
}

#[tokio::test]
async fn test_mapping_lookup_does_not_count_click() {
    let app = common::create_test_app();
    let created = shorten(&app, "https://example.com/inspect").await;
    let code = created["code"].as_str().unwrap();

    app.server.get(&format!("/{code}")).await;

    let response = app.server.get(&format!("/api/url/{code}")).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["clicks"], 1);
    assert_eq!(body["originalUrl"], "https://example.com/inspect");

    let body: Value = app.server.get(&format!("/api/url/{code}")).await.json();
    assert_eq!(body["clicks"], 1);
}

#[tokio::test]
async fn test_mapping_lookup_errors() {
    let app = common::create_test_app();

    assert_eq!(app.server.get("/api/url/nope").await.status_code(), 404);
    assert_eq!(app.server.get("/api/url/no-pe").await.status_code(), 400);
}
