//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::bounds::CanvasBounds;
use crate::error::{EditorError, EditorResult};

/// Defaults applied when elements are created, plus the canvas size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas size shared by every constraint and composer call.
    pub bounds: CanvasBounds,
    /// Position of newly added elements.
    pub default_position: (f32, f32),
    /// Font size of newly added text elements.
    pub text_font_size: f32,
    /// Size of newly added image elements.
    pub image_size: (f32, f32),
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            bounds: CanvasBounds::default(),
            default_position: (50.0, 50.0),
            text_font_size: 30.0,
            image_size: (100.0, 100.0),
        }
    }
}

impl EditorConfig {
    /// Use a different canvas size.
    #[must_use]
    pub fn with_bounds(mut self, bounds: CanvasBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that sizes are positive and the default position is finite.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> EditorResult<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.text_font_size) {
            return Err(EditorError::InvalidConfig(format!(
                "text_font_size must be positive, got {}",
                self.text_font_size
            )));
        }
        let (w, h) = self.image_size;
        if !positive(w) || !positive(h) {
            return Err(EditorError::InvalidConfig(format!(
                "image_size must be positive, got {w}x{h}"
            )));
        }
        let (x, y) = self.default_position;
        if !x.is_finite() || !y.is_finite() {
            return Err(EditorError::InvalidConfig(
                "default_position must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
