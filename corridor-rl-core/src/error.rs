//! Error types for the corridor RL crates

use thiserror::Error;

/// Core error type for environment operations
#[derive(Error, Debug)]
pub enum EnvError {
    /// Environment-related errors
    #[error("Environment error: {0}")]
    Environment(String),

    /// Invalid action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// A glyph placement that the board cannot accept
    #[error("Invalid placement at ({row}, {col}): {reason}")]
    InvalidPlacement {
        /// Target row
        row: usize,
        /// Target column
        col: usize,
        /// Why the placement was rejected
        reason: String,
    },

    /// Board art that violates the shape or border invariants
    #[error("Malformed board art: {0}")]
    MalformedArt(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for environment operations
pub type Result<T> = std::result::Result<T, EnvError>;
