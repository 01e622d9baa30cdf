//! Core of the legacy microblog bridge: id codec, record models on both
//! sides of the bridge, and the translation between them. No I/O here.

pub mod backend;
pub mod id;
pub mod legacy;
pub mod topics;
pub mod translate;

pub use id::{bounds_from_cursor, CursorBounds, CursorError, IdError, LegacyId};
pub use topics::TopicCatalog;
pub use translate::ReplyTarget;
