// crates/gateway/src/backend/xrpc.rs
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bridge_core::backend::{PostView, ProfileView, ThreadNode, ThreadViewPost, TrendingTopics};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::cache::ProfileCache;
use super::methods::*;
use super::{Backend, BackendError, SearchQuery, Session};

/// Max items per `getPosts` / `getProfiles` request.
pub const BATCH_LIMIT: usize = 25;

#[derive(Deserialize)]
struct XrpcErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct SearchPostsOutput {
    #[serde(default)]
    posts: Vec<PostView>,
}

#[derive(Deserialize)]
struct PostsOutput {
    #[serde(default)]
    posts: Vec<PostView>,
}

#[derive(Deserialize)]
struct ProfilesOutput {
    #[serde(default)]
    profiles: Vec<ProfileView>,
}

#[derive(Deserialize)]
struct SuggestedUsersOutput {
    #[serde(default)]
    actors: Vec<ProfileView>,
}

#[derive(Deserialize)]
struct ThreadOutput {
    thread: ThreadNode,
}

/// `GET {endpoint}/xrpc/{method}` client for the modern backend.
pub struct XrpcBackend {
    http: reqwest::Client,
    profiles: ProfileCache,
}

impl XrpcBackend {
    pub fn new(timeout: Duration, profile_ttl: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bridge-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            profiles: ProfileCache::new(profile_ttl),
        })
    }

    pub fn profile_cache(&self) -> &ProfileCache {
        &self.profiles
    }

    async fn call<R: DeserializeOwned>(
        &self,
        session: &Session,
        method: &'static str,
        params: &[(&str, String)],
    ) -> Result<R, BackendError> {
        let url = format!(
            "{}/xrpc/{}",
            session.endpoint.trim_end_matches('/'),
            method
        );
        let mut req = self.http.get(&url).query(params);
        if !session.credential.is_anonymous() {
            req = req.bearer_auth(session.credential.expose());
        }
        debug!(method, params = params.len(), "xrpc call");

        let resp = req
            .send()
            .await
            .map_err(|source| BackendError::Network { method, source })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<XrpcErrorBody>(&body).unwrap_or(XrpcErrorBody {
                error: String::new(),
                message: body,
            });
            let error = if parsed.error.is_empty() {
                status.canonical_reason().unwrap_or("Error").to_string()
            } else {
                parsed.error
            };
            return Err(BackendError::Status {
                method,
                status: status.as_u16(),
                error,
                message: parsed.message,
            });
        }
        resp.json::<R>().await.map_err(|e| BackendError::Decode {
            method,
            message: e.to_string(),
        })
    }

    async fn fetch_profiles(
        &self,
        session: &Session,
        actors: &[String],
    ) -> Result<Vec<ProfileView>, BackendError> {
        let mut out = Vec::with_capacity(actors.len());
        for chunk in actors.chunks(BATCH_LIMIT) {
            let params: Vec<(&str, String)> = chunk.iter().map(|a| ("actors", a.clone())).collect();
            let resp: ProfilesOutput = self.call(session, GET_PROFILES, &params).await?;
            out.extend(resp.profiles);
        }
        Ok(out)
    }
}

/// Backend `since` is inclusive; legacy `since_id` is not.
fn exclusive_since(since: DateTime<Utc>) -> String {
    (since + chrono::Duration::microseconds(1)).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("q", query.q.clone()), ("limit", query.limit.to_string())];
    if let Some(since) = query.bounds.since {
        params.push(("since", exclusive_since(since)));
    }
    if let Some(until) = query.bounds.until {
        params.push(("until", until.to_rfc3339_opts(SecondsFormat::Micros, true)));
    }
    params
}

#[async_trait]
impl Backend for XrpcBackend {
    async fn search_posts(
        &self,
        session: &Session,
        query: &SearchQuery,
    ) -> Result<Vec<PostView>, BackendError> {
        let resp: SearchPostsOutput = self.call(session, SEARCH_POSTS, &search_params(query)).await?;
        Ok(resp.posts)
    }

    async fn get_posts(
        &self,
        session: &Session,
        uris: &[String],
    ) -> Result<Vec<PostView>, BackendError> {
        let mut out = Vec::with_capacity(uris.len());
        for chunk in uris.chunks(BATCH_LIMIT) {
            let params: Vec<(&str, String)> = chunk.iter().map(|u| ("uris", u.clone())).collect();
            let resp: PostsOutput = self.call(session, GET_POSTS, &params).await?;
            out.extend(resp.posts);
        }
        Ok(out)
    }

    async fn get_profiles(
        &self,
        session: &Session,
        actors: &[String],
        use_cache: bool,
    ) -> Result<Vec<ProfileView>, BackendError> {
        let (mut known, misses) = if use_cache {
            self.profiles.partition(actors)
        } else {
            (HashMap::new(), actors.to_vec())
        };

        if !misses.is_empty() {
            let fetched = self.fetch_profiles(session, &misses).await?;
            self.profiles.insert_many(&fetched);
            for p in fetched {
                known.insert(p.did.clone(), p);
            }
        }
        debug!(requested = actors.len(), fetched = misses.len(), "profiles resolved");

        // Handles are accepted as actors too, so match on either.
        let mut ordered = Vec::with_capacity(known.len());
        for actor in actors {
            let found = known
                .remove(actor)
                .or_else(|| {
                    let did = known.values().find(|p| &p.handle == actor)?.did.clone();
                    known.remove(&did)
                });
            if let Some(p) = found {
                ordered.push(p);
            }
        }
        Ok(ordered)
    }

    async fn get_trending_topics(&self, session: &Session) -> Result<TrendingTopics, BackendError> {
        self.call(session, GET_TRENDING_TOPICS, &[]).await
    }

    async fn get_topic_suggested_users(
        &self,
        session: &Session,
        limit: usize,
        slug: &str,
    ) -> Result<Vec<ProfileView>, BackendError> {
        let params = [("category", slug.to_string()), ("limit", limit.to_string())];
        let resp: SuggestedUsersOutput = self.call(session, GET_SUGGESTED_USERS, &params).await?;
        Ok(resp.actors)
    }

    async fn get_post_thread(
        &self,
        session: &Session,
        uri: &str,
        depth: u32,
        parent_height: u32,
    ) -> Result<ThreadViewPost, BackendError> {
        let params = [
            ("uri", uri.to_string()),
            ("depth", depth.to_string()),
            ("parentHeight", parent_height.to_string()),
        ];
        let resp: ThreadOutput = self.call(session, GET_POST_THREAD, &params).await?;
        match resp.thread {
            ThreadNode::Post(thread) => Ok(thread),
            ThreadNode::Unavailable => {
                warn!(uri, "thread root unavailable");
                Err(BackendError::Status {
                    method: GET_POST_THREAD,
                    status: 404,
                    error: "NotFound".to_string(),
                    message: format!("post {uri} is not available"),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::CursorBounds;
    use chrono::TimeZone;

    #[test]
    fn search_params_shift_since_only() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let q = SearchQuery {
            q: "cats".into(),
            bounds: CursorBounds {
                since: Some(t),
                until: Some(t),
            },
            limit: 25,
        };
        let params = search_params(&q);
        assert_eq!(params[0], ("q", "cats".to_string()));
        assert_eq!(params[1], ("limit", "25".to_string()));
        assert_eq!(params[2], ("since", "2024-03-01T12:00:00.000001Z".to_string()));
        assert_eq!(params[3], ("until", "2024-03-01T12:00:00.000000Z".to_string()));
    }

    #[test]
    fn search_params_without_cursors() {
        let params = search_params(&SearchQuery {
            q: "x".into(),
            bounds: CursorBounds::default(),
            limit: 10,
        });
        assert_eq!(params.len(), 2);
    }
}
