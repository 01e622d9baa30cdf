// crates/gateway/src/adapters/discovery.rs
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use bridge_core::legacy::{
    Discovery, LegacyTweet, NewsArticle, ReferencedBy, RelatedQuery, SocialProof, Story,
    StoryData, StoryMedia, StoryUrl,
};
use bridge_core::translate::translate_post;
use bridge_core::ReplyTarget;
use tracing::info;

use crate::error::BridgeError;
use crate::http_api::AppState;
use crate::session::Surface;

const STORY_TITLE: &str = "Thanks for using the legacy bridge!";
const STORY_DISPLAY_URL: &str = "bsky.app";
const STORY_URL: &str = "https://bsky.app";
const STORY_IMAGE: &str = "https://bsky.app/static/social-card-default-gradient.png";
const RELATED_QUERIES: [&str; 2] = ["Bluesky", "Legacy bridge"];

/// `GET /i/discovery.json`: the featured post plus one promotional story.
pub async fn discovery(
    State(st): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Discovery>, BridgeError> {
    let session = st.session(Surface::Discovery, &headers)?;
    let thread = st
        .backend
        .get_post_thread(&session, &st.cfg.discovery_post, 0, 1)
        .await?;

    // parent context is all or nothing; its date is when the parent was written
    let reply = thread.parent_post().map(|parent| ReplyTarget {
        date: parent.record.created_at,
        ..ReplyTarget::from_post(parent)
    });
    let featured = translate_post(&thread.post, reply.as_ref());

    info!(featured = %thread.post.uri, "discovery served");
    Ok(Json(discovery_envelope(featured)))
}

pub fn discovery_envelope(featured: LegacyTweet) -> Discovery {
    let story = Story {
        kind: "news".to_string(),
        score: 0.92,
        data: StoryData {
            title: STORY_TITLE.to_string(),
            articles: vec![NewsArticle {
                title: STORY_TITLE.to_string(),
                url: StoryUrl {
                    display_url: STORY_DISPLAY_URL.to_string(),
                    expanded_url: STORY_URL.to_string(),
                },
                tweet_count: 1500,
                media: vec![StoryMedia {
                    kind: "image".to_string(),
                    media_url: STORY_IMAGE.to_string(),
                    width: 1920,
                    height: 1080,
                }],
            }],
        },
        social_proof: SocialProof {
            kind: "social".to_string(),
            referenced_by: ReferencedBy {
                global_count: 2500,
                statuses: vec![featured.clone()],
            },
        },
    };

    Discovery {
        statuses: vec![featured],
        stories: vec![story],
        related_queries: RELATED_QUERIES
            .iter()
            .map(|q| RelatedQuery { query: q.to_string() })
            .collect(),
        spelling_corrections: Vec::new(),
    }
}
