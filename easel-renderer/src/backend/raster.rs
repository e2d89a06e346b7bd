//! Software surface backed by a tiny-skia pixmap.

use crate::error::RenderResult;
use crate::export::{rasterize_frame, ExportConfig, Pass, RasterImage};
use crate::frame::Frame;

use super::RenderSurface;

/// Surface that rasterizes every presented frame and keeps the result.
#[derive(Debug, Default)]
pub struct RasterSurface {
    config: ExportConfig,
    last: Option<RasterImage>,
}

impl RasterSurface {
    /// Create a surface with the given rasterization settings.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config, last: None }
    }

    /// The most recently presented raster.
    #[must_use]
    pub fn last_raster(&self) -> Option<&RasterImage> {
        self.last.as_ref()
    }
}

impl RenderSurface for RasterSurface {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn present(&mut self, frame: &Frame) -> RenderResult<()> {
        let raster = rasterize_frame(frame, &self.config, Pass::Screen)?;
        tracing::trace!(
            width = raster.width(),
            height = raster.height(),
            "raster surface updated"
        );
        self.last = Some(raster);
        Ok(())
    }
}
