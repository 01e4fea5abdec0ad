//! Error types for the landing zone core.

/// Core error type for landing zone configuration and identifiers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Invalid AWS account ID format.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),

    /// Unknown AWS partition name.
    #[error("unknown AWS partition: {0}")]
    InvalidPartition(String),

    /// Unknown execution phase name.
    #[error("unknown execution phase: {0} (expected `synth` or `deploy`)")]
    InvalidPhase(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Resolved configuration document could not be decoded.
    #[error("invalid configuration document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
