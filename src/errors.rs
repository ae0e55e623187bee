//! Error handling for the facade.
//!
//! Every error surfaces as a short machine-readable kind plus a
//! bounded-length human detail string. Internal details (transport errors,
//! upstream bodies) are logged with `tracing` but never sent to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;

/// Upper bound on the diagnostic string forwarded to clients.
const MAX_DETAIL_LEN: usize = 200;

#[derive(Debug)]
pub enum ApiError {
    /// 500 — the backing store is unreachable or unconfigured. A deployment
    /// defect, not a request defect.
    Config { missing: Vec<String> },

    /// 400 — a required path identifier contained no digits after cleaning.
    InvalidIdentifier,

    /// 400 — the store rejected the configured credentials (401/403
    /// upstream). Distinguished from generic upstream failures because it
    /// points at the deployment, not the network.
    UpstreamAuth,

    /// 400 — any other store-call failure, carrying a truncated diagnostic.
    Upstream { detail: String },
}

impl ApiError {
    /// Create an upstream error with the diagnostic cut to a bounded length.
    pub fn upstream(detail: impl Into<String>) -> Self {
        Self::Upstream {
            detail: truncate_chars(&detail.into(), MAX_DETAIL_LEN),
        }
    }

    /// Short machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config_error",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::UpstreamAuth => "upstream_auth_error",
            Self::Upstream { .. } => "upstream_error",
        }
    }

    const fn status_code(&self) -> StatusCode {
        match self {
            Self::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidIdentifier | Self::UpstreamAuth | Self::Upstream { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn user_detail(&self) -> String {
        match self {
            Self::Config { missing } => {
                if missing.is_empty() {
                    "backing store is not configured".to_string()
                } else {
                    format!("missing configuration: {}", missing.join(", "))
                }
            }
            Self::InvalidIdentifier => "identifier must contain at least one digit".to_string(),
            Self::UpstreamAuth => "store rejected the configured credentials (401/403)".to_string(),
            Self::Upstream { detail } => detail.clone(),
        }
    }

    /// Log internal error details; not sent to the client.
    fn log_internal(&self) {
        match self {
            Self::Config { missing } => {
                tracing::error!(missing = ?missing, "backing store not configured");
            }
            Self::Upstream { detail } => {
                tracing::error!(detail = %detail, "store call failed");
            }
            Self::UpstreamAuth => {
                tracing::error!("store rejected credentials");
            }
            Self::InvalidIdentifier => {
                tracing::debug!("rejected malformed identifier");
            }
        }
    }
}

/// Sanitized error body sent to clients.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let body = ErrorBody {
            error: self.kind(),
            detail: self.user_detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.user_detail())
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Auth => Self::UpstreamAuth,
            StoreError::Request { detail } => Self::upstream(detail),
        }
    }
}

/// Truncate on a character boundary.
fn truncate_chars(input: &str, max: usize) -> String {
    input.chars().take(max).collect()
}
