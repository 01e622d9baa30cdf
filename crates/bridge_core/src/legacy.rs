// crates/bridge_core/src/legacy.rs
//! Wire shapes of the legacy microblog API. Field order and names follow
//! what legacy clients parse; serde emits them in declaration order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `Wed Aug 27 13:08:45 +0000 2008`
pub mod legacy_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub fn format(at: &DateTime<Utc>) -> String {
        at.format(FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_str(&raw, FORMAT)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyUser {
    pub id: i64,
    pub id_str: String,
    pub name: String,
    pub screen_name: String,
    pub location: String,
    pub description: String,
    pub url: Option<String>,
    pub protected: bool,
    pub followers_count: u64,
    pub friends_count: u64,
    pub listed_count: u64,
    #[serde(with = "legacy_date")]
    pub created_at: DateTime<Utc>,
    pub favourites_count: u64,
    pub verified: bool,
    pub statuses_count: u64,
    pub lang: String,
    pub profile_image_url: String,
    pub profile_image_url_https: String,
    pub profile_banner_url: Option<String>,
    pub default_profile_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagEntity {
    pub text: String,
    pub indices: [usize; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    pub url: String,
    pub expanded_url: String,
    pub display_url: String,
    pub indices: [usize; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEntity {
    pub screen_name: String,
    pub name: String,
    pub id: i64,
    pub id_str: String,
    pub indices: [usize; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSize {
    pub w: u32,
    pub h: u32,
    pub resize: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSizes {
    pub large: MediaSize,
    pub thumb: MediaSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntity {
    pub id: i64,
    pub id_str: String,
    pub indices: [usize; 2],
    pub media_url: String,
    pub media_url_https: String,
    pub url: String,
    pub display_url: String,
    pub expanded_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sizes: MediaSizes,
    pub ext_alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub hashtags: Vec<HashtagEntity>,
    pub urls: Vec<UrlEntity>,
    pub user_mentions: Vec<MentionEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTweet {
    #[serde(with = "legacy_date")]
    pub created_at: DateTime<Utc>,
    pub id: i64,
    pub id_str: String,
    pub text: String,
    pub source: String,
    pub truncated: bool,
    pub in_reply_to_status_id: Option<i64>,
    pub in_reply_to_status_id_str: Option<String>,
    pub in_reply_to_user_id: Option<i64>,
    pub in_reply_to_user_id_str: Option<String>,
    pub in_reply_to_screen_name: Option<String>,
    pub user: LegacyUser,
    pub retweet_count: u64,
    pub favorite_count: u64,
    pub favorited: bool,
    pub retweeted: bool,
    pub possibly_sensitive: bool,
    pub lang: Option<String>,
    pub entities: Entities,
}

impl LegacyTweet {
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_status_id.is_some()
    }

    /// True when the reply fields are either all set or all empty.
    pub fn reply_is_consistent(&self) -> bool {
        let set = [
            self.in_reply_to_status_id.is_some(),
            self.in_reply_to_status_id_str.is_some(),
            self.in_reply_to_user_id.is_some(),
            self.in_reply_to_user_id_str.is_some(),
            self.in_reply_to_screen_name.is_some(),
        ];
        set.iter().all(|&s| s) || set.iter().all(|&s| !s)
    }
}

// --- envelopes ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub statuses: Vec<LegacyTweet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub name: String,
    pub url: String,
    pub promoted_content: Option<String>,
    pub query: String,
    pub tweet_volume: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendLocation {
    pub name: String,
    pub woeid: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub created_at: DateTime<Utc>,
    pub as_of: DateTime<Utc>,
    pub trends: Vec<Trend>,
    pub locations: Vec<TrendLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryUrl {
    pub display_url: String,
    pub expanded_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMedia {
    #[serde(rename = "type")]
    pub kind: String,
    pub media_url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: StoryUrl,
    pub tweet_count: u64,
    pub media: Vec<StoryMedia>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryData {
    pub title: String,
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencedBy {
    pub global_count: u64,
    pub statuses: Vec<LegacyTweet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialProof {
    #[serde(rename = "type")]
    pub kind: String,
    pub referenced_by: ReferencedBy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(rename = "type")]
    pub kind: String,
    pub score: f64,
    pub data: StoryData,
    pub social_proof: SocialProof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedQuery {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellingCorrection {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    pub statuses: Vec<LegacyTweet>,
    pub stories: Vec<Story>,
    pub related_queries: Vec<RelatedQuery>,
    pub spelling_corrections: Vec<SpellingCorrection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSuggestion {
    pub name: String,
    pub slug: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicUserSuggestions {
    pub name: String,
    pub slug: String,
    pub size: usize,
    pub users: Vec<LegacyUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub message: String,
    pub code: u32,
}

/// `{"errors":[{"message":"...","code":195}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorEntry>,
}

impl ErrorEnvelope {
    pub fn single(message: impl Into<String>, code: u32) -> Self {
        Self {
            errors: vec![ErrorEntry {
                message: message.into(),
                code,
            }],
        }
    }
}
