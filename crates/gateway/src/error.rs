// crates/gateway/src/error.rs
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bridge_core::legacy::ErrorEnvelope;
use bridge_core::CursorError;
use thiserror::Error;
use tracing::warn;

use crate::backend::BackendError;

/// Numeric codes legacy clients switch on.
pub mod legacy_code {
    /// Bad parameter / malformed id.
    pub const INVALID_PARAMETER: u32 = 195;
    /// Request needs a user context.
    pub const BAD_AUTHENTICATION: u32 = 215;
    /// Backend rejected the token.
    pub const INVALID_TOKEN: u32 = 89;
    pub const RATE_LIMITED: u32 = 88;
    pub const INTERNAL: u32 = 131;
}

/// Everything a legacy endpoint can answer with besides success.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    InvalidIdentifier(#[from] CursorError),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("Bad Authentication data.")]
    AuthRequired,

    #[error("Unknown topic: {0}")]
    UnknownSlug(String),

    /// A mandatory backend call failed; message is the backend's text.
    #[error(transparent)]
    DependencyFetchFailed(#[from] BackendError),
}

impl BridgeError {
    pub fn legacy_code(&self) -> u32 {
        match self {
            BridgeError::InvalidIdentifier(_)
            | BridgeError::InvalidParameter(_)
            | BridgeError::UnknownSlug(_) => legacy_code::INVALID_PARAMETER,
            BridgeError::AuthRequired => legacy_code::BAD_AUTHENTICATION,
            BridgeError::DependencyFetchFailed(e) => match e.status() {
                Some(401) => legacy_code::INVALID_TOKEN,
                Some(429) => legacy_code::RATE_LIMITED,
                _ => legacy_code::INTERNAL,
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::InvalidIdentifier(_)
            | BridgeError::InvalidParameter(_)
            | BridgeError::UnknownSlug(_) => StatusCode::BAD_REQUEST,
            BridgeError::AuthRequired => StatusCode::UNAUTHORIZED,
            BridgeError::DependencyFetchFailed(e) => match e.status() {
                Some(401) => StatusCode::UNAUTHORIZED,
                Some(429) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        if let BridgeError::DependencyFetchFailed(e) = &self {
            warn!(method = e.method(), error = %e, "backend call failed");
        }
        let status = self.status_code();
        let body = ErrorEnvelope::single(self.to_string(), self.legacy_code());
        (status, Json(body)).into_response()
    }
}
