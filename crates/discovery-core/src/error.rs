//! Discovery error types

use thiserror::Error;

/// Errors surfaced by the search index and the recommendation engine.
///
/// None of these are retried inside the engine; any collaborator failure
/// aborts the whole call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscoveryError {
    /// A referenced user id does not resolve
    #[error("user not found: {0}")]
    NotFound(String),

    /// A collaborator call failed (store, network, cache rebuild)
    #[error("{collaborator} unavailable: {message}")]
    DependencyUnavailable {
        collaborator: &'static str,
        message: String,
    },

    /// Caller supplied an argument outside the accepted domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl DiscoveryError {
    pub fn unavailable(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::DependencyUnavailable {
            collaborator,
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::DependencyUnavailable { .. } => "dependency_unavailable",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Convert a caller-supplied limit into a `usize`, rejecting negatives.
pub fn checked_limit(raw: i64) -> Result<usize> {
    usize::try_from(raw)
        .map_err(|_| DiscoveryError::InvalidArgument(format!("limit must be >= 0, got {}", raw)))
}
