// crates/gateway/src/backend/mod.rs
//! Boundary to the modern backend. Handlers and the enrichment pipeline only
//! see the [`Backend`] trait; [`XrpcBackend`] is the HTTP implementation.

use std::fmt;

use async_trait::async_trait;
use bridge_core::backend::{PostView, ProfileView, ThreadViewPost, TrendingTopics};
use bridge_core::CursorBounds;
use thiserror::Error;

pub mod cache;
pub mod xrpc;

pub use xrpc::XrpcBackend;

pub mod methods {
    pub const SEARCH_POSTS: &str = "app.bsky.feed.searchPosts";
    pub const GET_POSTS: &str = "app.bsky.feed.getPosts";
    pub const GET_POST_THREAD: &str = "app.bsky.feed.getPostThread";
    pub const GET_PROFILES: &str = "app.bsky.actor.getProfiles";
    pub const GET_TRENDING_TOPICS: &str = "app.bsky.unspecced.getTrendingTopics";
    pub const GET_SUGGESTED_USERS: &str = "app.bsky.unspecced.getSuggestedUsers";
}

/// Opaque access token. Empty means anonymous.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn anonymous() -> Self {
        Self(String::new())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            f.write_str("Credential(anonymous)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

/// Credential + endpoint pair every backend call is made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub endpoint: String,
    pub credential: Credential,
}

impl Session {
    pub fn new(endpoint: impl Into<String>, credential: Credential) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential,
        }
    }

    pub fn anonymous(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, Credential::anonymous())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    /// Both sides exclusive.
    pub bounds: CursorBounds,
    pub limit: usize,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{method}: HTTP {status} {error}: {message}")]
    Status {
        method: &'static str,
        status: u16,
        error: String,
        message: String,
    },
    #[error("{method}: {source}")]
    Network {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method}: bad response: {message}")]
    Decode {
        method: &'static str,
        message: String,
    },
}

impl BackendError {
    pub fn method(&self) -> &'static str {
        match self {
            BackendError::Status { method, .. }
            | BackendError::Network { method, .. }
            | BackendError::Decode { method, .. } => method,
        }
    }

    /// HTTP status the backend answered with, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            BackendError::Network { source, .. } => source.status().map(|s| s.as_u16()),
            BackendError::Decode { .. } => None,
        }
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn search_posts(
        &self,
        session: &Session,
        query: &SearchQuery,
    ) -> Result<Vec<PostView>, BackendError>;

    /// One logical call for the whole list; splitting into request-sized
    /// chunks is up to the implementation.
    async fn get_posts(
        &self,
        session: &Session,
        uris: &[String],
    ) -> Result<Vec<PostView>, BackendError>;

    /// Profiles in request order; unknown actors are skipped. With
    /// `use_cache` cached profiles are served without a round trip; fetched
    /// profiles are always written back to the cache.
    async fn get_profiles(
        &self,
        session: &Session,
        actors: &[String],
        use_cache: bool,
    ) -> Result<Vec<ProfileView>, BackendError>;

    async fn get_trending_topics(&self, session: &Session) -> Result<TrendingTopics, BackendError>;

    async fn get_topic_suggested_users(
        &self,
        session: &Session,
        limit: usize,
        slug: &str,
    ) -> Result<Vec<ProfileView>, BackendError>;

    async fn get_post_thread(
        &self,
        session: &Session,
        uri: &str,
        depth: u32,
        parent_height: u32,
    ) -> Result<ThreadViewPost, BackendError>;
}
