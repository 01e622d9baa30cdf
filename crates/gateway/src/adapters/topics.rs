// crates/gateway/src/adapters/topics.rs
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use bridge_core::legacy::{TopicSuggestion, TopicUserSuggestions};
use bridge_core::translate::translate_profile;
use serde::Deserialize;
use tracing::info;

use super::strip_json_suffix;
use crate::error::BridgeError;
use crate::http_api::AppState;
use crate::session::Surface;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<String>,
}

/// Absent or empty means the default; out-of-range values are clamped.
pub fn parse_limit(raw: Option<&str>) -> Result<usize, BridgeError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_LIMIT),
        Some(s) => s
            .parse::<i64>()
            .map(|n| n.clamp(1, MAX_LIMIT as i64) as usize)
            .map_err(|_| BridgeError::InvalidParameter(format!("Invalid limit: {s}"))),
    }
}

/// `GET /1/users/suggestions.json`
pub async fn catalog(State(st): State<AppState>) -> Json<Vec<TopicSuggestion>> {
    Json(st.topics.suggestions())
}

/// `GET /1/users/suggestions/{slug}?limit=`
pub async fn suggested_users(
    State(st): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Json<TopicUserSuggestions>, BridgeError> {
    let limit = parse_limit(params.limit.as_deref())?;
    let slug = strip_json_suffix(&slug);
    if slug.is_empty() {
        return Err(BridgeError::InvalidParameter("Missing topic slug".to_string()));
    }
    let name = st
        .topics
        .name_for(slug)
        .ok_or_else(|| BridgeError::UnknownSlug(slug.to_string()))?
        .to_string();
    let session = st.session(Surface::TopicUsers, &headers)?;

    let suggested = st
        .backend
        .get_topic_suggested_users(&session, limit, slug)
        .await?;
    let dids: Vec<String> = suggested.into_iter().map(|p| p.did).collect();
    let profiles = if dids.is_empty() {
        Vec::new()
    } else {
        st.backend.get_profiles(&session, &dids, true).await?
    };
    let users: Vec<_> = profiles.iter().map(translate_profile).collect();

    info!(slug, users = users.len(), "topic suggestions served");
    Ok(Json(TopicUserSuggestions {
        name,
        slug: slug.to_string(),
        size: users.len(),
        users,
    }))
}
