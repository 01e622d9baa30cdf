// crates/gateway/tests/trends_http.rs
use std::sync::Arc;

use axum::http::StatusCode;
use bridge_core::backend::TrendingTopic;
use gateway::config::BridgeConfig;

mod helpers;
use helpers::{get_json, make_router, make_router_with_config, MockBackend};

fn topic(name: &str) -> TrendingTopic {
    TrendingTopic {
        topic: name.to_string(),
        display_name: None,
        description: None,
        link: format!("/search?q={name}"),
    }
}

#[tokio::test]
async fn trends_keep_backend_order() {
    let mut mock = MockBackend::new();
    mock.trends.topics = vec![topic("Super Bowl"), topic("rust"), topic("C++")];
    let mock = Arc::new(mock);

    let (status, v) = get_json(make_router(mock.clone()), "/1/trends/1.json", None).await;
    assert_eq!(status, StatusCode::OK);

    let body = &v;
    let trends = body["trends"].as_array().unwrap();
    assert_eq!(trends.len(), 3);
    assert_eq!(trends[0]["name"], "Super Bowl");
    assert_eq!(trends[0]["query"], "Super+Bowl");
    assert_eq!(trends[0]["url"], "https://twitter.com/search?q=Super+Bowl");
    assert_eq!(trends[2]["query"], "C%2B%2B");
    assert!(trends.iter().all(|t| t["tweet_volume"] == 1337));
    assert!(trends[1]["promoted_content"].is_null());

    assert_eq!(body["locations"][0]["name"], "Worldwide");
    assert_eq!(body["locations"][0]["woeid"], 1);
    assert_eq!(body["as_of"], body["created_at"]);
    assert_eq!(mock.total_calls(), 1);
}

#[tokio::test]
async fn woeid_is_ignored() {
    let mock = Arc::new(MockBackend::new());
    let (status, v) = get_json(make_router(mock.clone()), "/1/trends/23424977", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["trends"].as_array().unwrap().len(), 0);
    assert_eq!(v["locations"][0]["woeid"], 1);
}

#[tokio::test]
async fn trends_can_require_credential() {
    let cfg = BridgeConfig {
        anonymous_surfaces: vec!["search".into()],
        ..BridgeConfig::default()
    };
    let mock = Arc::new(MockBackend::new());
    let (status, v) = get_json(make_router_with_config(mock.clone(), cfg), "/1/trends/1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(v["errors"][0]["code"], 215);
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn trends_backend_failure() {
    let mock = Arc::new(MockBackend::new().failing("app.bsky.unspecced.getTrendingTopics"));
    let (status, v) = get_json(make_router(mock), "/1/trends/1", Some("tok")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v["errors"][0]["code"], 131);
}
