// crates/gateway/src/session.rs
//! Turning request headers into a backend [`Session`], and which endpoints
//! may fall back to an anonymous one.

use std::collections::HashSet;

use axum::http::{header, HeaderMap};
use tracing::debug;

use crate::backend::{Credential, Session};
use crate::error::BridgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Search,
    Discovery,
    Trends,
    TopicCatalog,
    TopicUsers,
}

impl Surface {
    pub const ALL: [Surface; 5] = [
        Surface::Search,
        Surface::Discovery,
        Surface::Trends,
        Surface::TopicCatalog,
        Surface::TopicUsers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Surface::Search => "search",
            Surface::Discovery => "discovery",
            Surface::Trends => "trends",
            Surface::TopicCatalog => "topic_catalog",
            Surface::TopicUsers => "topic_users",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthPolicy {
    anonymous: HashSet<Surface>,
}

impl AuthPolicy {
    pub fn anonymous_for(surfaces: impl IntoIterator<Item = Surface>) -> Self {
        Self {
            anonymous: surfaces.into_iter().collect(),
        }
    }

    pub fn allows_anonymous(&self, surface: Surface) -> bool {
        self.anonymous.contains(&surface)
    }

    /// Session for `surface`: the request's bearer token if it has one,
    /// else anonymous where allowed, else `AuthRequired`.
    pub fn session_for(
        &self,
        surface: Surface,
        headers: &HeaderMap,
        endpoint: &str,
    ) -> Result<Session, BridgeError> {
        match bearer_credential(headers) {
            Some(credential) => Ok(Session::new(endpoint, credential)),
            None if self.allows_anonymous(surface) => {
                debug!(surface = surface.name(), "no credential, continuing anonymously");
                Ok(Session::anonymous(endpoint))
            }
            None => Err(BridgeError::AuthRequired),
        }
    }
}

/// `Authorization: Bearer <token>`; anything else counts as no credential.
pub fn bearer_credential(headers: &HeaderMap) -> Option<Credential> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| Credential::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        h
    }

    #[test]
    fn parses_bearer_only() {
        assert_eq!(
            bearer_credential(&headers("Bearer abc.def")).map(|c| c.expose().to_string()),
            Some("abc.def".to_string())
        );
        assert!(bearer_credential(&headers("bearer  tok ")).is_some());
        assert!(bearer_credential(&headers("Basic dXNlcg==")).is_none());
        assert!(bearer_credential(&headers("Bearer ")).is_none());
        assert!(bearer_credential(&HeaderMap::new()).is_none());
    }

    #[test]
    fn anonymous_fallback_follows_policy() {
        let policy = AuthPolicy::anonymous_for([Surface::Search]);
        let none = HeaderMap::new();

        let s = policy.session_for(Surface::Search, &none, "https://x").unwrap();
        assert!(s.credential.is_anonymous());
        assert_eq!(s.endpoint, "https://x");

        let err = policy.session_for(Surface::TopicUsers, &none, "https://x").unwrap_err();
        assert!(matches!(err, BridgeError::AuthRequired));

        let s = policy
            .session_for(Surface::TopicUsers, &headers("Bearer t"), "https://x")
            .unwrap();
        assert_eq!(s.credential.expose(), "t");
    }

    #[test]
    fn surface_names_round_trip() {
        for s in Surface::ALL {
            assert_eq!(Surface::from_name(s.name()), Some(s));
        }
        assert_eq!(Surface::from_name("timeline"), None);
    }
}
