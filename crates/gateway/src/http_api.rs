// crates/gateway/src/http_api.rs
use std::sync::Arc;

use axum::http::HeaderMap;
use axum::{routing::get, Json, Router};
use bridge_core::TopicCatalog;
use serde_json::{json, Value};

use crate::adapters::{discovery, search, topics, trends};
use crate::backend::{Backend, Session};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::session::{AuthPolicy, Surface};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub cfg: Arc<BridgeConfig>,
    pub topics: Arc<TopicCatalog>,
    pub auth: Arc<AuthPolicy>,
}

impl AppState {
    pub fn new(cfg: BridgeConfig, backend: Arc<dyn Backend>) -> Self {
        let auth = cfg.auth_policy();
        Self {
            backend,
            topics: Arc::new(TopicCatalog::builtin().clone()),
            auth: Arc::new(auth),
            cfg: Arc::new(cfg),
        }
    }

    pub fn with_topics(mut self, topics: TopicCatalog) -> Self {
        self.topics = Arc::new(topics);
        self
    }

    pub fn session(&self, surface: Surface, headers: &HeaderMap) -> Result<Session, BridgeError> {
        self.auth.session_for(surface, headers, &self.cfg.backend_url)
    }
}

pub fn router(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/healthz", get(healthz))
        .route("/i/search.json", get(search::search))
        .route("/i/discovery.json", get(discovery::discovery))
        .route("/1/trends/:woeid", get(trends::trends))
        .route("/1/users/suggestions.json", get(topics::catalog))
        .route("/1/users/suggestions/:slug", get(topics::suggested_users))
        .with_state(state)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
