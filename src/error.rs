//! Error types for the stegscan engine.
//!
//! Collaborator failures are normally absorbed into the report as status
//! fields; the variants here describe what the adapters catch and what is
//! left to propagate as a genuinely fatal condition.

use thiserror::Error;

/// Main error type for stegscan operations.
#[derive(Debug, Error)]
pub enum StegError {
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Operator configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// External operation exceeded its time box
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// An external collaborator ran but produced an error
    #[error("{tool} failed: {message}")]
    Collaborator { tool: String, message: String },

    /// Image decoding failed or produced an empty raster
    #[error("Image decode error: {0}")]
    Decode(String),
}

/// Result type alias for stegscan operations
pub type Result<T> = std::result::Result<T, StegError>;

impl StegError {
    pub(crate) fn collaborator(tool: impl Into<String>, message: impl Into<String>) -> Self {
        StegError::Collaborator {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
