mod common;

use serde_json::{Value, json};

#[tokio::test]
async fn test_shorten_success() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/api/url/shorten")
        .json(&json!({ "originalUrl": "https://example.com/some/long/path" }))
        .await;

    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["id"], 1);
    assert_eq!(body["code"], "1");
    assert_eq!(body["originalUrl"], "https://example.com/some/long/path");
    assert_eq!(body["shortUrl"], "http://localhost:5000/1");
    assert_eq!(body["clicks"], 0);
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_shorten_assigns_sequential_codes() {
    let app = common::create_test_app();

    for (expected, url) in ["1", "2", "3"]
        .iter()
        .zip(["https://a.test", "https://b.test", "https://c.test"])
    {
        let response = app
            .server
            .post("/api/url/shorten")
            .json(&json!({ "originalUrl": url }))
            .await;

        let body: Value = response.json();
        assert_eq!(body["code"], *expected);
    }

    assert_eq!(app.counters.current(common::COUNTER_NAME), 3);
}

#[tokio::test]
async fn test_shorten_same_url_twice_is_idempotent() {
    let app = common::create_test_app();
    let payload = json!({ "originalUrl": "https://example.com/dup" });

    let first: Value = app
        .server
        .post("/api/url/shorten")
        .json(&payload)
        .await
        .json();
    let second: Value = app
        .server
        .post("/api/url/shorten")
        .json(&payload)
        .await
        .json();

    assert_eq!(first, second);
    assert_eq!(app.counters.current(common::COUNTER_NAME), 1);
    assert_eq!(app.mappings.len(), 1);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let app = common::create_test_app();

    for bad in ["not a url", "ftp://example.com/file", "https://", ""] {
        let response = app
            .server
            .post("/api/url/shorten")
            .json(&json!({ "originalUrl": bad }))
            .await;

        assert_eq!(response.status_code(), 400, "accepted {bad:?}");

        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "invalid_url");
    }

    assert_eq!(app.counters.current(common::COUNTER_NAME), 0);
    assert!(app.mappings.is_empty());
}

#[tokio::test]
async fn test_shorten_url_too_long() {
    let app = common::create_test_app();
    let long_url = format!("https://example.com/{}", "a".repeat(2100));

    let response = app
        .server
        .post("/api/url/shorten")
        .json(&json!({ "originalUrl": long_url }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.counters.current(common::COUNTER_NAME), 0);
}

#[tokio::test]
async fn test_shorten_malformed_body() {
    let app = common::create_test_app();

    let response = app
        .server
        .post("/api/url/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_url");

    let response = app
        .server
        .post("/api/url/shorten")
        .text("https://example.com")
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.counters.current(common::COUNTER_NAME), 0);
}
