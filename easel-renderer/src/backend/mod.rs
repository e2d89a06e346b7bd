//! Render surfaces that present composed frames.

pub mod raster;
pub mod trace;

use crate::error::RenderResult;
use crate::frame::Frame;

pub use raster::RasterSurface;
pub use trace::TraceSurface;

/// Something a frame can be presented to.
pub trait RenderSurface {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Draw a frame as the user should see it.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    fn present(&mut self, frame: &Frame) -> RenderResult<()>;
}
