//! Surface that logs draw commands instead of drawing.
//!
//! Useful headless and in tests: every presented primitive is emitted as a
//! `trace` event.

use crate::error::RenderResult;
use crate::frame::{DrawCommand, Frame};

use super::RenderSurface;

/// Logging-only surface.
#[derive(Debug, Default)]
pub struct TraceSurface {
    frames: u64,
    last_drawn: usize,
}

impl TraceSurface {
    /// Create a new trace surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of primitives drawn in the last frame.
    #[must_use]
    pub fn last_drawn(&self) -> usize {
        self.last_drawn
    }

    fn describe(command: &DrawCommand) -> (&'static str, String) {
        match command {
            DrawCommand::Text {
                text, font_size, ..
            } => ("text", format!(" content='{text}' font={font_size}")),
            DrawCommand::Image {
                width,
                height,
                image,
                ..
            } => (
                "image",
                format!(" size={width}x{height} src={}", image.src),
            ),
        }
    }

    fn position(command: &DrawCommand) -> (f32, f32, f32) {
        match command {
            DrawCommand::Text { x, y, rotation, .. } | DrawCommand::Image { x, y, rotation, .. } => {
                (*x, *y, *rotation)
            }
        }
    }
}

impl RenderSurface for TraceSurface {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn present(&mut self, frame: &Frame) -> RenderResult<()> {
        tracing::trace!(
            "Trace present: {} commands, canvas {}x{}",
            frame.commands.len(),
            frame.bounds.width(),
            frame.bounds.height()
        );

        let mut drawn = 0;
        for command in frame.commands.iter().filter(|c| c.on_screen()) {
            let (kind, details) = Self::describe(command);
            let (x, y, rotation) = Self::position(command);
            tracing::trace!("Draw {kind} {} at ({x}, {y}) rot {rotation}{details}", command.id());
            drawn += 1;
        }
        if let Some(chrome) = &frame.handle {
            tracing::trace!("Handle {} around {}", chrome.handle, chrome.element_id);
        }
        if let Some(overlay) = &frame.edit_overlay {
            tracing::trace!(
                "Edit overlay for {} at ({}, {})",
                overlay.element_id,
                overlay.x,
                overlay.y
            );
        }

        self.frames += 1;
        self.last_drawn = drawn;
        Ok(())
    }
}
