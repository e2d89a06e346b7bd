//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur while configuring the editor.
///
/// Interactive operations never fail: unknown ids and rejected bound boxes
/// are absorbed silently. Only configuration can be invalid.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Canvas dimensions must be finite and positive.
    #[error("Invalid canvas bounds: {width}x{height}")]
    InvalidBounds {
        /// Rejected width.
        width: f32,
        /// Rejected height.
        height: f32,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
