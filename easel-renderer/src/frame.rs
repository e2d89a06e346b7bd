//! Draw primitives produced by the scene composer.

use std::sync::Arc;

use easel_core::{BoundBox, CanvasBounds, EditOverlay, ElementId, HandleId};

use crate::image::LoadedImage;

/// Font used for every text primitive.
pub const TEXT_FONT_FAMILY: &str = "Arial";

/// One primitive, in canvas coordinates.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// A text run anchored at its top-left corner.
    Text {
        /// Element the glyphs belong to.
        id: ElementId,
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Rotation in degrees around `(x, y)`.
        rotation: f32,
        /// Content; may span several lines.
        text: String,
        /// Font size in canvas units.
        font_size: f32,
        /// Font family.
        font_family: &'static str,
        /// Hidden on screen while the edit overlay replaces it.
        superseded: bool,
    },
    /// A decoded image stretched to its box.
    Image {
        /// Element the pixels belong to.
        id: ElementId,
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Drawn width, including any in-flight resize.
        width: f32,
        /// Drawn height, including any in-flight resize.
        height: f32,
        /// Rotation in degrees around `(x, y)`.
        rotation: f32,
        /// Pixels to draw.
        image: Arc<LoadedImage>,
    },
}

impl DrawCommand {
    /// Element this command draws.
    #[must_use]
    pub fn id(&self) -> &ElementId {
        match self {
            Self::Text { id, .. } | Self::Image { id, .. } => id,
        }
    }

    /// Whether the command is visible on screen.
    #[must_use]
    pub fn on_screen(&self) -> bool {
        !matches!(self, Self::Text { superseded: true, .. })
    }
}

/// Resize/rotate handle outline around the selected image.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleChrome {
    /// Handle being drawn.
    pub handle: HandleId,
    /// Element it is attached to.
    pub element_id: ElementId,
    /// Outline in canvas coordinates.
    pub bbox: BoundBox,
}

/// Everything needed to draw the canvas once.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Canvas size.
    pub bounds: CanvasBounds,
    /// Primitives in paint order.
    pub commands: Vec<DrawCommand>,
    /// Handle chrome, when an image is selected.
    pub handle: Option<HandleChrome>,
    /// Edit overlay, while a text element is being edited.
    pub edit_overlay: Option<EditOverlay>,
}

impl Frame {
    /// An empty frame of the given size.
    #[must_use]
    pub fn empty(bounds: CanvasBounds) -> Self {
        Self {
            bounds,
            commands: Vec::new(),
            handle: None,
            edit_overlay: None,
        }
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The command drawing `id`.
    #[must_use]
    pub fn command(&self, id: &ElementId) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.id() == id)
    }
}
