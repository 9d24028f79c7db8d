//! Engine error type
//!
//! Every variant is a programmer or configuration error. Nothing here is
//! retryable: operations are deterministic over the state they are given.

/// Error type for progression operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown badge: {0}")]
    UnknownBadge(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ProgressionError>;
