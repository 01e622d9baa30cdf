// crates/gateway/src/adapters/mod.rs
//! One handler per legacy endpoint. Each validates its parameters before
//! touching the backend.

pub mod discovery;
pub mod search;
pub mod topics;
pub mod trends;

/// Legacy paths may carry a `.json` suffix on the last segment.
pub(crate) fn strip_json_suffix(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_optional() {
        assert_eq!(strip_json_suffix("1.json"), "1");
        assert_eq!(strip_json_suffix("tech"), "tech");
        assert_eq!(strip_json_suffix(".json"), "");
    }
}
