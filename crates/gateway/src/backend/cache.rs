// crates/gateway/src/backend/cache.rs
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use bridge_core::backend::ProfileView;

struct Entry {
    stored: Instant,
    profile: ProfileView,
}

/// DID -> profile, entries expire after `ttl`. Shared by all requests;
/// only the backend client writes to it.
pub struct ProfileCache {
    ttl: Duration,
    inner: RwLock<HashMap<String, Entry>>,
}

impl ProfileCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, did: &str) -> Option<ProfileView> {
        let g = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        g.get(did)
            .filter(|e| e.stored.elapsed() < self.ttl)
            .map(|e| e.profile.clone())
    }

    /// Splits `dids` into cached profiles and the DIDs still to fetch.
    pub fn partition(&self, dids: &[String]) -> (HashMap<String, ProfileView>, Vec<String>) {
        let mut hits = HashMap::new();
        let mut misses = Vec::new();
        for did in dids {
            match self.get(did) {
                Some(p) => {
                    hits.insert(did.clone(), p);
                }
                None => misses.push(did.clone()),
            }
        }
        (hits, misses)
    }

    pub fn insert_many(&self, profiles: &[ProfileView]) {
        let now = Instant::now();
        let mut g = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        g.retain(|_, e| now.duration_since(e.stored) < self.ttl);
        for p in profiles {
            g.insert(
                p.did.clone(),
                Entry {
                    stored: now,
                    profile: p.clone(),
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
