// crates/gateway/src/adapters/search.rs
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use bridge_core::bounds_from_cursor;
use bridge_core::legacy::SearchResults;
use serde::Deserialize;
use tracing::info;

use crate::backend::SearchQuery;
use crate::enrich::enrich;
use crate::error::BridgeError;
use crate::http_api::AppState;
use crate::session::Surface;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub max_id: Option<String>,
    pub since_id: Option<String>,
}

/// `GET /i/search.json?q=&max_id=&since_id=`
pub async fn search(
    State(st): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, BridgeError> {
    let bounds = bounds_from_cursor(params.max_id.as_deref(), params.since_id.as_deref())?;
    let session = st.session(Surface::Search, &headers)?;

    let query = SearchQuery {
        q: params.q,
        bounds,
        limit: st.cfg.search_limit,
    };
    let posts = st.backend.search_posts(&session, &query).await?;
    let statuses = enrich(st.backend.as_ref(), &session, &posts).await?;

    info!(q = %query.q, results = statuses.len(), "search served");
    Ok(Json(SearchResults { statuses }))
}
