// crates/bridge_core/src/id.rs
//! Legacy numeric ids <-> backend temporal addressing.
//!
//! Post record keys on the backend are TIDs: 53 bits of microseconds since
//! the Unix epoch followed by a 10-bit clock id, written as 13 characters of
//! base32-sortable. A [`LegacyId`] is that same integer, so sorting legacy ids
//! sorts posts chronologically and every id we hand out maps back to the
//! record key (and, given the author DID, the post URI) it came from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

const CLOCK_BITS: u32 = 10;
const CLOCK_MASK: i64 = (1 << CLOCK_BITS) - 1;
const MAX_MICROS: i64 = (1 << 53) - 1;

pub const MAX_CLOCK_ID: u16 = (1 << CLOCK_BITS) - 1;

const TID_ALPHABET: &[u8; 32] = b"234567abcdefghijklmnopqrstuvwxyz";
const TID_LEN: usize = 13;

pub const POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("identifier is not a 64-bit integer: {0:?}")]
    NotNumeric(String),
    #[error("identifier must not be negative: {0}")]
    Negative(i64),
    #[error("timestamp outside the encodable range: {0}")]
    OutOfRange(String),
    #[error("clock id {0} does not fit in 10 bits")]
    ClockOutOfRange(u16),
    #[error("not a record key: {0:?}")]
    BadRecordKey(String),
}

/// Numeric status id as seen by legacy clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct LegacyId(i64);

impl LegacyId {
    /// Monotonic in `at` for a fixed `clock_id`.
    pub fn encode(at: DateTime<Utc>, clock_id: u16) -> Result<Self, IdError> {
        if clock_id > MAX_CLOCK_ID {
            return Err(IdError::ClockOutOfRange(clock_id));
        }
        let micros = at.timestamp_micros();
        if !(0..=MAX_MICROS).contains(&micros) {
            return Err(IdError::OutOfRange(at.to_rfc3339()));
        }
        Ok(Self((micros << CLOCK_BITS) | i64::from(clock_id)))
    }

    pub fn from_raw(raw: i64) -> Result<Self, IdError> {
        if raw < 0 {
            return Err(IdError::Negative(raw));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn clock_id(self) -> u16 {
        (self.0 & CLOCK_MASK) as u16
    }

    /// The backend timestamp this id was minted from, at microsecond precision.
    pub fn decode_to_bound(self) -> DateTime<Utc> {
        let micros = self.0 >> CLOCK_BITS;
        let secs = micros.div_euclid(1_000_000);
        let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
        // non-negative ids stay well inside chrono's range
        Utc.timestamp_opt(secs, nanos).single().unwrap_or_default()
    }

    pub fn to_record_key(self) -> String {
        let mut v = self.0 as u64;
        let mut out = [TID_ALPHABET[0]; TID_LEN];
        for slot in out.iter_mut().rev() {
            *slot = TID_ALPHABET[(v & 31) as usize];
            v >>= 5;
        }
        out.iter().map(|&b| b as char).collect()
    }

    pub fn from_record_key(key: &str) -> Result<Self, IdError> {
        let bad = || IdError::BadRecordKey(key.to_string());
        if key.len() != TID_LEN {
            return Err(bad());
        }
        let mut v: u64 = 0;
        for (i, ch) in key.bytes().enumerate() {
            let digit = TID_ALPHABET.iter().position(|&a| a == ch).ok_or_else(bad)? as u64;
            // 13 * 5 = 65 bits; the leading digit must leave the sign bit clear
            if i == 0 && digit >= 8 {
                return Err(bad());
            }
            v = (v << 5) | digit;
        }
        Self::from_raw(v as i64)
    }

    pub fn post_uri(self, did: &str) -> String {
        format!("at://{did}/{POST_COLLECTION}/{}", self.to_record_key())
    }

    /// Id for a backend post. Uses the record key when it is a TID, otherwise
    /// mints one from `fallback` with a clock id taken from the URI hash.
    pub fn for_post(uri: &str, fallback: DateTime<Utc>) -> Self {
        if let Some(id) = record_key(uri).and_then(|k| Self::from_record_key(k).ok()) {
            return id;
        }
        let clock = (xxh3_64(uri.as_bytes()) % (u64::from(MAX_CLOCK_ID) + 1)) as u16;
        Self::encode(fallback, clock).unwrap_or(Self(stable_id(uri)))
    }
}

impl fmt::Display for LegacyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LegacyId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| IdError::NotNumeric(s.to_string()))?;
        Self::from_raw(raw)
    }
}

impl TryFrom<i64> for LegacyId {
    type Error = IdError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<LegacyId> for i64 {
    fn from(id: LegacyId) -> Self {
        id.0
    }
}

/// Last path segment of an `at://` URI.
pub fn record_key(uri: &str) -> Option<&str> {
    uri.strip_prefix("at://")?.rsplit('/').next().filter(|k| !k.is_empty())
}

/// One-way, stable, non-negative numeric id for any backend key.
pub fn stable_id(key: &str) -> i64 {
    (xxh3_64(key.as_bytes()) & i64::MAX as u64) as i64
}

/// Legacy user id for an account DID. Not reversible.
pub fn legacy_user_id(did: &str) -> i64 {
    stable_id(did)
}

/// Exclusive temporal window derived from legacy pagination cursors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorBounds {
    /// Results strictly newer than this.
    pub since: Option<DateTime<Utc>>,
    /// Results strictly older than this.
    pub until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("An invalid {param} has been specified")]
pub struct CursorError {
    pub param: &'static str,
    #[source]
    pub source: IdError,
}

/// `max_id` bounds from above, `since_id` from below. Empty values count as
/// absent; anything else that does not decode fails the whole window.
pub fn bounds_from_cursor(
    max_id: Option<&str>,
    since_id: Option<&str>,
) -> Result<CursorBounds, CursorError> {
    Ok(CursorBounds {
        until: decode_cursor("max_id", max_id)?,
        since: decode_cursor("since_id", since_id)?,
    })
}

fn decode_cursor(
    param: &'static str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, CursorError> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<LegacyId>()
            .map(|id| Some(id.decode_to_bound()))
            .map_err(|source| CursorError { param, source }),
    }
}
