// crates/gateway/tests/helpers.rs
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bridge_core::backend::{PostView, ProfileView, ThreadViewPost, TrendingTopics};
use gateway::backend::{Backend, BackendError, SearchQuery, Session};
use gateway::config::BridgeConfig;
use gateway::http_api::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const DEFAULT_ENDPOINT: &str = "https://public.api.bsky.app";

#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub session: Session,
    /// URIs, actors, slug... whatever list the call was made with.
    pub args: Vec<String>,
    pub query: Option<SearchQuery>,
    /// Only set for profile lookups.
    pub use_cache: Option<bool>,
}

/// Scripted backend that records every call it receives.
#[derive(Default)]
pub struct MockBackend {
    pub search_results: Vec<PostView>,
    pub posts: Vec<PostView>,
    pub profiles: Vec<ProfileView>,
    pub trends: TrendingTopics,
    pub suggested: Vec<ProfileView>,
    pub thread: Option<ThreadViewPost>,
    pub failing: HashSet<&'static str>,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, method: &'static str) -> Self {
        self.failing.insert(method);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(
        &self,
        method: &'static str,
        session: &Session,
        args: Vec<String>,
        query: Option<SearchQuery>,
    ) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(Call {
            method,
            session: session.clone(),
            args,
            query,
            use_cache: None,
        });
        if self.failing.contains(method) {
            return Err(BackendError::Status {
                method,
                status: 502,
                error: "UpstreamFailure".into(),
                message: format!("{method} exploded"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn search_posts(
        &self,
        session: &Session,
        query: &SearchQuery,
    ) -> Result<Vec<PostView>, BackendError> {
        self.record(
            "app.bsky.feed.searchPosts",
            session,
            vec![query.q.clone()],
            Some(query.clone()),
        )?;
        Ok(self.search_results.clone())
    }

    async fn get_posts(
        &self,
        session: &Session,
        uris: &[String],
    ) -> Result<Vec<PostView>, BackendError> {
        self.record("app.bsky.feed.getPosts", session, uris.to_vec(), None)?;
        Ok(self
            .posts
            .iter()
            .filter(|p| uris.contains(&p.uri))
            .cloned()
            .collect())
    }

    async fn get_profiles(
        &self,
        session: &Session,
        actors: &[String],
        use_cache: bool,
    ) -> Result<Vec<ProfileView>, BackendError> {
        let recorded = self.record("app.bsky.actor.getProfiles", session, actors.to_vec(), None);
        if let Some(last) = self.calls.lock().unwrap().last_mut() {
            last.use_cache = Some(use_cache);
        }
        recorded?;
        Ok(actors
            .iter()
            .filter_map(|a| self.profiles.iter().find(|p| &p.did == a).cloned())
            .collect())
    }

    async fn get_trending_topics(&self, session: &Session) -> Result<TrendingTopics, BackendError> {
        self.record("app.bsky.unspecced.getTrendingTopics", session, vec![], None)?;
        Ok(self.trends.clone())
    }

    async fn get_topic_suggested_users(
        &self,
        session: &Session,
        limit: usize,
        slug: &str,
    ) -> Result<Vec<ProfileView>, BackendError> {
        self.record(
            "app.bsky.unspecced.getSuggestedUsers",
            session,
            vec![slug.to_string(), limit.to_string()],
            None,
        )?;
        Ok(self.suggested.iter().take(limit).cloned().collect())
    }

    async fn get_post_thread(
        &self,
        session: &Session,
        uri: &str,
        _depth: u32,
        _parent_height: u32,
    ) -> Result<ThreadViewPost, BackendError> {
        self.record("app.bsky.feed.getPostThread", session, vec![uri.to_string()], None)?;
        self.thread.clone().ok_or_else(|| BackendError::Status {
            method: "app.bsky.feed.getPostThread",
            status: 400,
            error: "NotFound".into(),
            message: "Post not found".into(),
        })
    }
}

// --- fixtures ---

pub fn post_uri(did: &str, rkey: &str) -> String {
    format!("at://{did}/app.bsky.feed.post/{rkey}")
}

/// Post by `did` indexed at `indexed_at`, optionally replying to `parent`.
pub fn post(uri: &str, did: &str, handle: &str, text: &str, indexed_at: &str, parent: Option<&str>) -> PostView {
    let mut record = json!({
        "$type": "app.bsky.feed.post",
        "text": text,
        "createdAt": indexed_at,
    });
    if let Some(parent) = parent {
        record["reply"] = json!({
            "root": { "uri": parent, "cid": "bafyroot" },
            "parent": { "uri": parent, "cid": "bafyparent" },
        });
    }
    serde_json::from_value(json!({
        "uri": uri,
        "cid": "bafypost",
        "author": { "did": did, "handle": handle, "displayName": handle },
        "record": record,
        "replyCount": 0,
        "repostCount": 2,
        "likeCount": 5,
        "indexedAt": indexed_at,
    }))
    .unwrap()
}

pub fn profile(did: &str, handle: &str) -> ProfileView {
    serde_json::from_value(json!({
        "did": did,
        "handle": handle,
        "displayName": handle.split('.').next().unwrap_or(handle),
        "description": format!("hi, I'm {handle}"),
        "followersCount": 10,
        "followsCount": 3,
        "postsCount": 42,
    }))
    .unwrap()
}

// --- router ---

pub fn make_router_with_config(backend: Arc<MockBackend>, cfg: BridgeConfig) -> Router {
    router(AppState::new(cfg, backend))
}

pub fn make_router(backend: Arc<MockBackend>) -> Router {
    make_router_with_config(backend, BridgeConfig::default())
}

pub async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder().uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    (status, v)
}
