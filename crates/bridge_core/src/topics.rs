// crates/bridge_core/src/topics.rs
use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::legacy::TopicSuggestion;

/// Size advertised for every catalog topic. The backend does not cap
/// suggestion lists, so the value legacy clients expect is reported as-is.
pub const TOPIC_SIZE: usize = 20;

static BUILTIN: Lazy<TopicCatalog> = Lazy::new(|| {
    TopicCatalog::from_pairs([
        ("animals", "Animals"),
        ("art", "Art"),
        ("books", "Books"),
        ("comedy", "Comedy"),
        ("comics", "Comics"),
        ("culture", "Culture"),
        ("dev", "Software Dev"),
        ("education", "Education"),
        ("food", "Food"),
        ("gaming", "Video Games"),
        ("journalism", "Journalism"),
        ("movies", "Movies"),
        ("music", "Music"),
        ("nature", "Nature"),
        ("news", "News"),
        ("pets", "Pets"),
        ("photography", "Photography"),
        ("politics", "Politics"),
        ("science", "Science"),
        ("sports", "Sports"),
        ("tech", "Tech"),
        ("tv", "TV"),
        ("writers", "Writers"),
    ])
});

/// Slug -> display name. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCatalog {
    entries: BTreeMap<String, String>,
}

impl TopicCatalog {
    /// The backend's suggestion categories.
    pub fn builtin() -> &'static TopicCatalog {
        &BUILTIN
    }

    pub fn from_pairs<S, N>(pairs: impl IntoIterator<Item = (S, N)>) -> Self
    where
        S: Into<String>,
        N: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(s, n)| (s.into(), n.into()))
                .collect(),
        }
    }

    pub fn name_for(&self, slug: &str) -> Option<&str> {
        self.entries.get(slug).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, n)| (s.as_str(), n.as_str()))
    }

    /// Every topic as a legacy suggestion category, sorted by slug.
    pub fn suggestions(&self) -> Vec<TopicSuggestion> {
        self.iter()
            .map(|(slug, name)| TopicSuggestion {
                name: name.to_string(),
                slug: slug.to_string(),
                size: TOPIC_SIZE,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let cat = TopicCatalog::builtin();
        assert_eq!(cat.len(), 23);
        assert_eq!(cat.name_for("dev"), Some("Software Dev"));
        assert_eq!(cat.name_for("invalid-topic"), None);
    }

    #[test]
    fn suggestions_are_sorted_and_sized() {
        let s = TopicCatalog::from_pairs([("tv", "TV"), ("art", "Art")]).suggestions();
        assert_eq!(s[0].slug, "art");
        assert_eq!(s[1].name, "TV");
        assert!(s.iter().all(|t| t.size == TOPIC_SIZE));
    }
}
