//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while loading images or exporting.
///
/// None of these are fatal to the editor: a failed image simply stays
/// undrawn and a failed export leaves the scene untouched.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Image source could not be read.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Rasterization or encoding failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Asynchronous loading needs a running tokio runtime.
    #[error("No async runtime available for image loading")]
    NoRuntime,
}
