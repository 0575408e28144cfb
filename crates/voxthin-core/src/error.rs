//! Error types for voxthin.

use glam::IVec3;
use thiserror::Error;

/// The main error type for voxthin operations.
#[derive(Error, Debug)]
pub enum ThinningError {
    /// The point is not a member of the digital object (or lies outside its domain).
    #[error("invalid point {0}: not a member of the digital object")]
    InvalidPoint(IVec3),

    /// A lookup table is malformed or was queried outside its domain.
    #[error("malformed lookup table: {0}")]
    MalformedTable(String),

    /// The domain bounds are inverted on at least one axis, or the box is
    /// too large to index.
    #[error("invalid domain: [{lower}, {upper}] is inverted or too large")]
    InvalidDomain { lower: IVec3, upper: IVec3 },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Run options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for voxthin operations.
pub type Result<T> = std::result::Result<T, ThinningError>;
