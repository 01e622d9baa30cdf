// crates/gateway/src/config.rs
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::session::{AuthPolicy, Surface};

#[derive(Clone, Debug, Deserialize)]
pub struct BridgeConfig {
    pub addr: String,
    /// Backend endpoint every session talks to.
    pub backend_url: String,
    #[serde(default = "default_backend_timeout_ms")]
    pub backend_timeout_ms: u64,
    #[serde(default = "default_profile_cache_ttl_secs")]
    pub profile_cache_ttl_secs: u64,
    /// Page size for search requests sent to the backend.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    /// Surfaces that degrade to an anonymous session instead of failing
    /// when the request carries no usable credential.
    #[serde(default = "default_anonymous_surfaces")]
    pub anonymous_surfaces: Vec<String>,
    /// Post featured on the discovery feed.
    #[serde(default = "default_discovery_post")]
    pub discovery_post: String,
}

fn default_addr() -> String { "0.0.0.0:8080".into() }
fn default_backend_url() -> String { "https://public.api.bsky.app".into() }
fn default_backend_timeout_ms() -> u64 { 10_000 }
fn default_profile_cache_ttl_secs() -> u64 { 300 }
fn default_search_limit() -> usize { 25 }
fn default_anonymous_surfaces() -> Vec<String> {
    vec!["search".into(), "discovery".into(), "trends".into()]
}
fn default_discovery_post() -> String {
    "at://did:plc:khcyntihpu7snjszuojjgjc4/app.bsky.feed.post/3lfgrcq4di22c".into()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            backend_url: default_backend_url(),
            backend_timeout_ms: default_backend_timeout_ms(),
            profile_cache_ttl_secs: default_profile_cache_ttl_secs(),
            search_limit: default_search_limit(),
            anonymous_surfaces: default_anonymous_surfaces(),
            discovery_post: default_discovery_post(),
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        let addr = std::env::var("BRIDGE_ADDR").unwrap_or_else(|_| default_addr());
        let backend_url = std::env::var("BRIDGE_BACKEND_URL").unwrap_or_else(|_| default_backend_url());
        let backend_timeout_ms = std::env::var("BRIDGE_BACKEND_TIMEOUT_MS").ok().and_then(|s| s.parse().ok()).unwrap_or(default_backend_timeout_ms());
        let profile_cache_ttl_secs = std::env::var("BRIDGE_PROFILE_CACHE_TTL_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(default_profile_cache_ttl_secs());
        let search_limit = std::env::var("BRIDGE_SEARCH_LIMIT").ok().and_then(|s| s.parse::<usize>().ok()).filter(|n| *n > 0).unwrap_or(default_search_limit());
        let anonymous_surfaces = std::env::var("BRIDGE_ANONYMOUS_SURFACES")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|_| default_anonymous_surfaces());
        let discovery_post = std::env::var("BRIDGE_DISCOVERY_POST").unwrap_or_else(|_| default_discovery_post());

        Self { addr, backend_url, backend_timeout_ms, profile_cache_ttl_secs, search_limit, anonymous_surfaces, discovery_post }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }

    pub fn profile_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.profile_cache_ttl_secs)
    }

    /// Unknown surface names are logged and ignored.
    pub fn auth_policy(&self) -> AuthPolicy {
        let mut surfaces = Vec::new();
        for name in &self.anonymous_surfaces {
            match Surface::from_name(name) {
                Some(s) => surfaces.push(s),
                None => warn!(surface = %name, "unknown surface in anonymous list"),
            }
        }
        AuthPolicy::anonymous_for(surfaces)
    }
}
