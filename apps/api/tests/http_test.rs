//! Integration tests for the HTTP surface
//!
//! Drives the assembled router with `tower::ServiceExt::oneshot`.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn post_graphql(router: Router, body: Value) -> Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_graphql_post_executes_query() {
    let app = TestApp::new();
    let user = seed_user(&app.repos, "http").await;

    let response = post_graphql(
        app.router(false),
        json!({
            "query": "query ($id: UUID!) { user(id: $id) { name } }",
            "variables": { "id": user.id },
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "data": { "user": { "name": "http" } } })
    );
}

#[tokio::test]
async fn test_graphql_post_reports_depth_violation() {
    let app = TestApp::new();

    let response = post_graphql(
        app.router(false),
        json!({
            "query": "{ users { profile { user { profile { user { profile { id } } } } } } }",
        }),
    )
    .await;

    let body = body_json(response).await;
    assert!(body["data"].is_null());
    assert_eq!(body["errors"][0]["extensions"]["code"], "QUERY_TOO_DEEP");
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_each_http_request_gets_fresh_loaders() {
    let app = TestApp::new();
    let user = seed_user(&app.repos, "fresh").await;
    app.store.clear_calls();
    let body = json!({
        "query": "query ($id: UUID!) { user(id: $id) { id } }",
        "variables": { "id": user.id },
    });

    post_graphql(app.router(false), body.clone()).await;
    post_graphql(app.router(false), body).await;

    assert_eq!(app.store.calls_to("users", "find_many").len(), 2);
}

#[tokio::test]
async fn test_playground_disabled_is_not_found() {
    let app = TestApp::new();

    let response = get(app.router(false), "/graphql").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_playground_enabled_serves_html() {
    let app = TestApp::new();

    let response = get(app.router(true), "/graphql").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_simple_health_check() {
    let app = TestApp::new();

    let response = get(app.router(false), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let response = get(app.router(false), "/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "alive");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_readiness_probe_with_seeded_store() {
    let app = TestApp::new();

    let response = get(app.router(false), "/health/ready").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["storage"], "memory");
    assert_eq!(json["memberTypes"], 2);
}

#[tokio::test]
async fn test_readiness_probe_with_unavailable_store() {
    let app = TestApp::new();
    app.store.fail("member_types", "find_many");

    let response = get(app.router(false), "/health/ready").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DATABASE_UNAVAILABLE");
}
