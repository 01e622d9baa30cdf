// crates/gateway/src/enrich/mod.rs
//! Backend posts -> ordered legacy tweets with reply context attached.

use bridge_core::backend::PostView;
use bridge_core::legacy::LegacyTweet;
use bridge_core::translate::translate_post;

use crate::backend::{Backend, Session};
use crate::error::BridgeError;

pub mod resolver;

pub use resolver::{Prefetch, ReferenceResolver, ReplyContext};

/// Output follows input order one-to-one. A failed parent lookup fails the
/// whole batch; a missing parent only drops that item's reply context.
pub async fn enrich(
    backend: &dyn Backend,
    session: &Session,
    items: &[PostView],
) -> Result<Vec<LegacyTweet>, BridgeError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let ctx = ReferenceResolver::new(backend, session).resolve(items).await?;
    Ok(items
        .iter()
        .map(|item| translate_post(item, ctx.target_for(item)))
        .collect())
}
