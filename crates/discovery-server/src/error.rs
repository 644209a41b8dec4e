//! Server error types and their HTTP mapping

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use discovery_core::DiscoveryError;
use thiserror::Error;
use tracing::warn;

use crate::handlers::Envelope;

/// Errors raised while configuring or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid dataset: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("failed to parse address '{address}': {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },
}

/// A request-scoped failure rendered as an error envelope.
#[derive(Debug)]
pub struct ApiError(pub DiscoveryError);

impl From<DiscoveryError> for ApiError {
    fn from(err: DiscoveryError) -> Self {
        Self(err)
    }
}

// Malformed bodies and query strings are caller errors like any other.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DiscoveryError::InvalidArgument(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(DiscoveryError::InvalidArgument(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DiscoveryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DiscoveryError::NotFound(_) => StatusCode::NOT_FOUND,
            DiscoveryError::DependencyUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), kind = self.0.kind(), error = %self.0, "Request failed");
        (status, Json(Envelope::<()>::failure(&self.0))).into_response()
    }
}
