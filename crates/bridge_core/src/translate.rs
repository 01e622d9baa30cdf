// crates/bridge_core/src/translate.rs
//! Backend record -> legacy object. Pure data shaping: everything a
//! translation needs is passed in already resolved, nothing here can fail.

use chrono::{DateTime, Utc};

use crate::backend::{FacetFeature, PostView, ProfileView, ProfileViewBasic, TrendingTopic};
use crate::id::{legacy_user_id, stable_id, LegacyId};
use crate::legacy::{
    Entities, HashtagEntity, LegacyTweet, LegacyUser, MediaEntity, MediaSize, MediaSizes,
    MentionEntity, Trend, UrlEntity,
};

/// Attribution shown as the tweet `source`.
pub const SOURCE: &str = r#"<a href="https://bsky.app" rel="nofollow">Bluesky</a>"#;

/// The backend has no per-topic volume; every trend reports this constant.
pub const TREND_TWEET_VOLUME: u64 = 1337;

pub const DEFAULT_AVATAR: &str =
    "https://abs.twimg.com/sticky/default_profile_images/default_profile_normal.png";

const SENSITIVE_LABELS: &[&str] = &["porn", "sexual", "nudity", "graphic-media"];
const DISPLAY_URL_MAX: usize = 26;

/// Resolved reply parent. Built only when every field is known, so a
/// translated tweet carries either a whole reply context or none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub uri: String,
    pub author_did: String,
    pub author_handle: String,
    pub date: DateTime<Utc>,
}

impl ReplyTarget {
    pub fn from_post(parent: &PostView) -> Self {
        Self {
            uri: parent.uri.clone(),
            author_did: parent.author.did.clone(),
            author_handle: parent.author.handle.clone(),
            date: parent.indexed_at,
        }
    }

    pub fn legacy_id(&self) -> LegacyId {
        LegacyId::for_post(&self.uri, self.date)
    }
}

pub fn translate_post(post: &PostView, reply: Option<&ReplyTarget>) -> LegacyTweet {
    let id = LegacyId::for_post(&post.uri, post.indexed_at);
    let viewer = post.viewer.clone().unwrap_or_default();

    let reply_status = reply.map(ReplyTarget::legacy_id);
    let reply_user = reply.map(|r| legacy_user_id(&r.author_did));

    LegacyTweet {
        created_at: post.record.created_at,
        id: id.get(),
        id_str: id.to_string(),
        text: post.record.text.clone(),
        source: SOURCE.to_string(),
        truncated: false,
        in_reply_to_status_id: reply_status.map(LegacyId::get),
        in_reply_to_status_id_str: reply_status.map(|i| i.to_string()),
        in_reply_to_user_id: reply_user,
        in_reply_to_user_id_str: reply_user.map(|i| i.to_string()),
        in_reply_to_screen_name: reply.map(|r| r.author_handle.clone()),
        user: translate_author(&post.author),
        retweet_count: post.repost_count.unwrap_or(0),
        favorite_count: post.like_count.unwrap_or(0),
        favorited: viewer.like.is_some(),
        retweeted: viewer.repost.is_some(),
        possibly_sensitive: post
            .labels
            .iter()
            .any(|l| SENSITIVE_LABELS.contains(&l.val.as_str())),
        lang: post.record.langs.first().cloned(),
        entities: entities(post, id),
    }
}

/// Author as embedded in a post. Counts are not part of the basic view.
pub fn translate_author(author: &ProfileViewBasic) -> LegacyUser {
    let mut user = base_user(&author.did, &author.handle, author.display_name.as_deref());
    if let Some(avatar) = &author.avatar {
        set_avatar(&mut user, avatar);
    }
    if let Some(created) = author.created_at {
        user.created_at = created;
    }
    user
}

/// Full profile, as used for user suggestions.
pub fn translate_profile(profile: &ProfileView) -> LegacyUser {
    let mut user = base_user(&profile.did, &profile.handle, profile.display_name.as_deref());
    if let Some(avatar) = &profile.avatar {
        set_avatar(&mut user, avatar);
    }
    user.description = profile.description.clone().unwrap_or_default();
    user.profile_banner_url = profile.banner.clone();
    user.followers_count = profile.followers_count.unwrap_or(0);
    user.friends_count = profile.follows_count.unwrap_or(0);
    user.statuses_count = profile.posts_count.unwrap_or(0);
    if let Some(created) = profile.created_at.or(profile.indexed_at) {
        user.created_at = created;
    }
    user
}

fn base_user(did: &str, handle: &str, display_name: Option<&str>) -> LegacyUser {
    let id = legacy_user_id(did);
    let name = display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(handle)
        .to_string();
    LegacyUser {
        id,
        id_str: id.to_string(),
        name,
        screen_name: handle.to_string(),
        location: String::new(),
        description: String::new(),
        url: Some(format!("https://bsky.app/profile/{handle}")),
        protected: false,
        followers_count: 0,
        friends_count: 0,
        listed_count: 0,
        created_at: DateTime::<Utc>::default(),
        favourites_count: 0,
        verified: false,
        statuses_count: 0,
        lang: "en".to_string(),
        profile_image_url: DEFAULT_AVATAR.to_string(),
        profile_image_url_https: DEFAULT_AVATAR.to_string(),
        profile_banner_url: None,
        default_profile_image: true,
    }
}

fn set_avatar(user: &mut LegacyUser, avatar: &str) {
    user.profile_image_url = avatar.to_string();
    user.profile_image_url_https = avatar.to_string();
    user.default_profile_image = false;
}

pub fn translate_trend(topic: &TrendingTopic) -> Trend {
    let query = search_query(&topic.topic);
    Trend {
        name: topic.topic.clone(),
        url: format!("https://twitter.com/search?q={query}"),
        promoted_content: None,
        query,
        tweet_volume: TREND_TWEET_VOLUME,
    }
}

/// Form-encodes a topic for the legacy search URL: spaces become `+`, never `%20`.
pub fn search_query(topic: &str) -> String {
    url::form_urlencoded::byte_serialize(topic.as_bytes())
        .collect::<String>()
        .replace("%20", "+")
}

// --- entities ---

fn entities(post: &PostView, id: LegacyId) -> Entities {
    let text = post.record.text.as_str();
    let mut out = Entities::default();

    for facet in &post.record.facets {
        let start = char_index(text, facet.index.byte_start);
        let end = char_index(text, facet.index.byte_end);
        if start > end {
            continue;
        }
        let indices = [start, end];
        for feature in &facet.features {
            match feature {
                FacetFeature::Tag { tag } => out.hashtags.push(HashtagEntity {
                    text: tag.clone(),
                    indices,
                }),
                FacetFeature::Link { uri } => out.urls.push(UrlEntity {
                    url: uri.clone(),
                    expanded_url: uri.clone(),
                    display_url: display_url(uri),
                    indices,
                }),
                FacetFeature::Mention { did } => {
                    let handle = text
                        .get(facet.index.byte_start..facet.index.byte_end)
                        .unwrap_or_default()
                        .trim_start_matches('@')
                        .to_string();
                    let uid = legacy_user_id(did);
                    out.user_mentions.push(MentionEntity {
                        screen_name: handle.clone(),
                        name: handle,
                        id: uid,
                        id_str: uid.to_string(),
                        indices,
                    });
                }
                FacetFeature::Unknown => {}
            }
        }
    }

    if let Some(embed) = &post.embed {
        let tail = text.chars().count();
        for image in embed.images() {
            let media_id = stable_id(&image.fullsize);
            let (w, h) = image
                .aspect_ratio
                .map(|r| (r.width, r.height))
                .unwrap_or((1000, 1000));
            out.media.push(MediaEntity {
                id: media_id,
                id_str: media_id.to_string(),
                indices: [tail, tail],
                media_url: image.fullsize.clone(),
                media_url_https: image.fullsize.clone(),
                url: image.fullsize.clone(),
                display_url: display_url(&image.fullsize),
                expanded_url: format!(
                    "https://bsky.app/profile/{}/post/{}",
                    post.author.handle,
                    id.to_record_key()
                ),
                kind: "photo".to_string(),
                sizes: MediaSizes {
                    large: MediaSize { w, h, resize: "fit".to_string() },
                    thumb: MediaSize { w: 150, h: 150, resize: "crop".to_string() },
                },
                ext_alt_text: Some(image.alt.clone()).filter(|a| !a.is_empty()),
            });
        }
    }

    out
}

/// Facets index UTF-8 bytes; legacy entities index characters.
fn char_index(text: &str, byte: usize) -> usize {
    let mut b = byte.min(text.len());
    while !text.is_char_boundary(b) {
        b -= 1;
    }
    text[..b].chars().count()
}

fn display_url(url: &str) -> String {
    let bare = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    if bare.chars().count() <= DISPLAY_URL_MAX {
        return bare.to_string();
    }
    let mut short: String = bare.chars().take(DISPLAY_URL_MAX).collect();
    short.push('…');
    short
}
