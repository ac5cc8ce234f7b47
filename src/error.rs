//! Error taxonomy shared by every layer of the backend.
//!
//! Each variant maps to exactly one HTTP status in [`IntoResponse`], so
//! handlers can simply return [`Res`](crate::Res) and let `?` do the rest.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Missing or malformed bearer header.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Session credential is past its `exp` claim.
    #[error("Session expired")]
    ExpiredCredential,

    /// Session credential failed signature or structural checks.
    #[error("Invalid token")]
    InvalidCredential,

    /// OAuth `state` missing on callback or not matching the login nonce.
    #[error("OAuth state mismatch")]
    InvalidState,

    /// Query string or body could not be extracted.
    #[error("{0}")]
    BadRequest(String),

    #[error("Token exchange failed")]
    ExchangeFailed,

    #[error("Token refresh failed")]
    RefreshFailed,

    /// Provider data fetch failed; the message is surfaced to the client.
    #[error("{0}")]
    Upstream(String),

    #[error("Failed to sign session token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::ExpiredCredential | Self::InvalidCredential => {
                StatusCode::UNAUTHORIZED
            }
            Self::InvalidState
            | Self::BadRequest(_)
            | Self::ExchangeFailed
            | Self::RefreshFailed => {
                StatusCode::BAD_REQUEST
            }
            Self::Upstream(_)
            | Self::Signing(_)
            | Self::Config(_)
            | Self::Http(_)
            | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
