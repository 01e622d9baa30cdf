// crates/gateway/src/enrich/resolver.rs
use std::collections::{HashMap, HashSet};

use bridge_core::backend::PostView;
use bridge_core::ReplyTarget;
use tracing::debug;

use crate::backend::{Backend, BackendError, Session};

/// Reply parents keyed by URI. A post whose parent is missing here gets no
/// reply context at all.
#[derive(Debug, Clone, Default)]
pub struct ReplyContext {
    parents: HashMap<String, ReplyTarget>,
}

impl ReplyContext {
    pub fn from_parents(parents: &[PostView]) -> Self {
        Self {
            parents: parents
                .iter()
                .map(|p| (p.uri.clone(), ReplyTarget::from_post(p)))
                .collect(),
        }
    }

    pub fn target_for(&self, item: &PostView) -> Option<&ReplyTarget> {
        self.parents.get(item.reply_parent_uri()?)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Outcome of the author prefetch. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefetch {
    Skipped,
    Warmed(usize),
    Failed,
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Batch-fetches what a set of posts references: at most one parent lookup
/// and one author prefetch per call, run concurrently. Posts that reply to
/// nothing cost no backend calls at all.
pub struct ReferenceResolver<'a> {
    backend: &'a dyn Backend,
    session: &'a Session,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(backend: &'a dyn Backend, session: &'a Session) -> Self {
        Self { backend, session }
    }

    pub async fn resolve(&self, items: &[PostView]) -> Result<ReplyContext, BackendError> {
        let parent_uris = distinct(items.iter().filter_map(PostView::reply_parent_uri));
        if parent_uris.is_empty() {
            return Ok(ReplyContext::default());
        }
        let author_dids = distinct(items.iter().map(|p| p.author.did.as_str()));

        let (parents, prefetch) = tokio::join!(
            self.fetch_parents(&parent_uris),
            self.warm_author_cache(&author_dids),
        );
        let parents = parents?;

        let ctx = ReplyContext::from_parents(&parents);
        debug!(
            items = items.len(),
            wanted = parent_uris.len(),
            found = ctx.len(),
            ?prefetch,
            "references resolved"
        );
        Ok(ctx)
    }

    async fn fetch_parents(&self, uris: &[String]) -> Result<Vec<PostView>, BackendError> {
        self.backend.get_posts(self.session, uris).await
    }

    /// Attempt, ignore outcome. Always refetches so the backend's profile
    /// cache holds fresh entries for cached lookups such as topic users
    /// (`get_profiles(.., true)`). Nothing in this request reads the result.
    async fn warm_author_cache(&self, dids: &[String]) -> Prefetch {
        if dids.is_empty() {
            return Prefetch::Skipped;
        }
        match self.backend.get_profiles(self.session, dids, false).await {
            Ok(profiles) => Prefetch::Warmed(profiles.len()),
            Err(e) => {
                debug!(error = %e, "author prefetch failed");
                Prefetch::Failed
            }
        }
    }
}
