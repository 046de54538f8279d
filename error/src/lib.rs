//! Error types for the Bushfire Analysis database layer.
//!
//! Every database operation reports failure through [`DatabaseError`], so
//! callers see one policy regardless of whether the failure happened while
//! connecting, building the engine or running a query.

use thiserror::Error;

/// Database-related errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timed out after {0}s")]
    Timeout(u64),

    #[error("Engine construction failed: {0}")]
    EngineFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),
}

impl DatabaseError {
    /// True when the backend could not be reached or rejected the login.
    pub fn is_connect_failure(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout(_))
    }

    /// The underlying cause without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidConfig(msg)
            | Self::ConnectionFailed(msg)
            | Self::EngineFailed(msg)
            | Self::QueryFailed(msg)
            | Self::UnexpectedResult(msg) => msg.clone(),
            Self::Timeout(secs) => format!("timed out after {secs}s"),
        }
    }
}

/// Result type alias using DatabaseError.
pub type Result<T> = std::result::Result<T, DatabaseError>;
