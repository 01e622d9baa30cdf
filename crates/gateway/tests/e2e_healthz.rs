// crates/gateway/tests/e2e_healthz.rs
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

mod helpers;
use helpers::{make_router, MockBackend};

#[tokio::test]
async fn healthz_ok() {
    let app = make_router(Arc::new(MockBackend::new()));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = make_router(Arc::new(MockBackend::new()));
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/1.1/statuses/home_timeline.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}
