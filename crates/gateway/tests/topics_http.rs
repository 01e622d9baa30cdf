// crates/gateway/tests/topics_http.rs
use std::sync::Arc;

use axum::http::StatusCode;
use bridge_core::id::legacy_user_id;
use bridge_core::TopicCatalog;
use gateway::config::BridgeConfig;
use gateway::http_api::{router, AppState};

mod helpers;
use helpers::{get_json, make_router, profile, MockBackend};

fn topic_backend() -> MockBackend {
    let mut mock = MockBackend::new();
    mock.suggested = vec![profile("did:plc:dev1", "dev1.test"), profile("did:plc:dev2", "dev2.test")];
    mock.profiles = mock.suggested.clone();
    mock
}

#[tokio::test]
async fn catalog_lists_every_topic_without_backend() {
    let mock = Arc::new(MockBackend::new());
    let (status, v) = get_json(make_router(mock.clone()), "/1/users/suggestions.json", None).await;
    assert_eq!(status, StatusCode::OK);

    let list = v.as_array().unwrap();
    assert_eq!(list.len(), TopicCatalog::builtin().len());
    assert_eq!(list[0]["slug"], "animals");
    assert!(list.iter().any(|t| t["slug"] == "dev" && t["name"] == "Software Dev"));
    assert!(list.iter().all(|t| t["size"] == 20));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn unknown_slug_is_a_client_error_with_no_backend_call() {
    let mock = Arc::new(topic_backend());
    let (status, v) =
        get_json(make_router(mock.clone()), "/1/users/suggestions/invalid-topic", Some("tok")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["errors"][0]["code"], 195);
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn suggested_users_require_credential() {
    let mock = Arc::new(topic_backend());
    let (status, v) = get_json(make_router(mock.clone()), "/1/users/suggestions/dev", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(v["errors"][0]["code"], 215);
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn suggested_users_resolve_full_profiles() {
    let mock = Arc::new(topic_backend());
    let (status, v) =
        get_json(make_router(mock.clone()), "/1/users/suggestions/dev.json?limit=5", Some("tok")).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(v["name"], "Software Dev");
    assert_eq!(v["slug"], "dev");
    assert_eq!(v["size"], 2);
    let users = v["users"].as_array().unwrap();
    assert_eq!(users[0]["screen_name"], "dev1.test");
    assert_eq!(users[0]["id"], legacy_user_id("did:plc:dev1"));
    assert_eq!(users[0]["followers_count"], 10);
    assert_eq!(users[1]["statuses_count"], 42);

    let suggested = mock.calls_to("app.bsky.unspecced.getSuggestedUsers");
    assert_eq!(suggested[0].args, vec!["dev".to_string(), "5".to_string()]);
    let profiles = mock.calls_to("app.bsky.actor.getProfiles");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].args, vec!["did:plc:dev1".to_string(), "did:plc:dev2".to_string()]);
    assert_eq!(profiles[0].use_cache, Some(true));
}

#[tokio::test]
async fn limit_is_clamped_and_validated() {
    let mock = Arc::new(topic_backend());
    let (status, _) =
        get_json(make_router(mock.clone()), "/1/users/suggestions/dev?limit=9000", Some("tok")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mock.calls_to("app.bsky.unspecced.getSuggestedUsers")[0].args[1], "50");

    let mock = Arc::new(topic_backend());
    let (status, v) =
        get_json(make_router(mock.clone()), "/1/users/suggestions/dev?limit=many", Some("tok")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["errors"][0]["code"], 195);
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn catalog_can_be_replaced() {
    let mock = Arc::new(topic_backend());
    let state = AppState::new(BridgeConfig::default(), mock.clone())
        .with_topics(TopicCatalog::from_pairs([("rust", "Rustaceans")]));
    let app = router(state);

    let (status, v) = get_json(app.clone(), "/1/users/suggestions/rust", Some("tok")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["name"], "Rustaceans");

    let (status, _) = get_json(app, "/1/users/suggestions/dev", Some("tok")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
