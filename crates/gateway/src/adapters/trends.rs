// crates/gateway/src/adapters/trends.rs
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use bridge_core::legacy::{TrendLocation, Trends};
use bridge_core::translate::translate_trend;
use chrono::Utc;
use tracing::{debug, info};

use super::strip_json_suffix;
use crate::error::BridgeError;
use crate::http_api::AppState;
use crate::session::Surface;

/// Backend trends are global, so every location resolves to this.
pub const WORLDWIDE_WOEID: u32 = 1;

/// `GET /1/trends/{woeid}`. The location is accepted and ignored.
pub async fn trends(
    State(st): State<AppState>,
    headers: HeaderMap,
    Path(woeid): Path<String>,
) -> Result<Json<Trends>, BridgeError> {
    debug!(woeid = strip_json_suffix(&woeid), "trends requested");
    let session = st.session(Surface::Trends, &headers)?;
    let topics = st.backend.get_trending_topics(&session).await?;

    let now = Utc::now();
    let trends: Vec<_> = topics.topics.iter().map(translate_trend).collect();
    info!(trends = trends.len(), "trends served");
    Ok(Json(Trends {
        created_at: now,
        as_of: now,
        trends,
        locations: vec![TrendLocation {
            name: "Worldwide".to_string(),
            woeid: WORLDWIDE_WOEID,
        }],
    }))
}
