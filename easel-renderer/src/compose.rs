//! Scene composition: editor state in, draw primitives out.

use easel_core::{CanvasBounds, Editor, ElementKind};

use crate::cache::ImageCache;
use crate::error::RenderResult;
use crate::export::{rasterize_frame, ExportConfig, Pass, RasterImage};
use crate::frame::{DrawCommand, Frame, HandleChrome, TEXT_FONT_FAMILY};

/// Turns the editor's scene into frames and exports them.
///
/// Owns the image cache: every `src` is loaded at most once for the
/// composer's lifetime.
#[derive(Debug)]
pub struct SceneComposer {
    bounds: CanvasBounds,
    images: ImageCache,
    export: ExportConfig,
    last_settled: Option<Frame>,
}

impl SceneComposer {
    /// Create a composer for a canvas of the given size.
    #[must_use]
    pub fn new(bounds: CanvasBounds) -> Self {
        Self::with_cache(bounds, ImageCache::new())
    }

    /// Create a composer that loads images through `images`.
    #[must_use]
    pub fn with_cache(bounds: CanvasBounds, images: ImageCache) -> Self {
        Self {
            bounds,
            images,
            export: ExportConfig::default(),
            last_settled: None,
        }
    }

    /// Replace the export settings.
    #[must_use]
    pub fn with_export_config(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Canvas size.
    #[must_use]
    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    /// The image cache.
    #[must_use]
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Build the frame for the editor's current state.
    ///
    /// Uses live node geometry so in-flight gestures show. Images that are
    /// not loaded yet are requested and left out until ready. The canvas
    /// size always comes from the editor.
    pub fn compose(&mut self, editor: &Editor) -> Frame {
        let bounds = editor.bounds();
        if bounds != self.bounds {
            tracing::warn!(
                composer = ?self.bounds,
                editor = ?bounds,
                "composer bounds differ from editor; using editor bounds"
            );
            self.bounds = bounds;
        }
        let scene = editor.scene();
        let editing = editor.text_editor().editing();
        let mut frame = Frame::empty(bounds);

        for element in scene.elements() {
            let Some(node) = editor.node(&element.id) else {
                continue;
            };
            match &element.kind {
                ElementKind::Text { text, font_size } => frame.commands.push(DrawCommand::Text {
                    id: element.id.clone(),
                    x: node.x,
                    y: node.y,
                    rotation: node.rotation,
                    text: text.clone(),
                    font_size: *font_size,
                    font_family: TEXT_FONT_FAMILY,
                    superseded: editing == Some(&element.id),
                }),
                ElementKind::Image { src, .. } => {
                    self.images.request(src);
                    if let Some(image) = self.images.get(src) {
                        frame.commands.push(DrawCommand::Image {
                            id: element.id.clone(),
                            x: node.x,
                            y: node.y,
                            width: node.width * node.scale_x,
                            height: node.height * node.scale_y,
                            rotation: node.rotation,
                            image,
                        });
                    }
                }
            }
        }

        frame.handle = editor.handle().and_then(|handle| {
            editor.node(handle.node()).map(|node| HandleChrome {
                handle: handle.id(),
                element_id: node.id.clone(),
                bbox: node.bounding_box(),
            })
        });
        frame.edit_overlay = editor.edit_overlay();

        tracing::trace!(
            commands = frame.commands.len(),
            handle = frame.handle.is_some(),
            editing = frame.edit_overlay.is_some(),
            "composed frame"
        );

        if !editor.gesture_active() {
            self.last_settled = Some(frame.clone());
        }
        frame
    }

    /// Apply completed image loads. Returns `true` when a redraw is due.
    pub fn poll_images(&mut self) -> bool {
        self.images.poll_loaded()
    }

    /// Wait for the next image load to complete.
    ///
    /// Returns `true` when a redraw is due, `false` if nothing is loading.
    pub async fn next_image_event(&mut self) -> bool {
        self.images.next_event().await
    }

    /// The last frame composed outside of a drag or transform gesture.
    #[must_use]
    pub fn settled_frame(&self) -> Option<&Frame> {
        self.last_settled.as_ref()
    }

    /// Rasterize the last settled frame, or a blank canvas if none.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization fails.
    pub fn rasterize(&self) -> RenderResult<RasterImage> {
        let blank;
        let frame = match &self.last_settled {
            Some(frame) => frame,
            None => {
                blank = Frame::empty(self.bounds);
                &blank
            }
        };
        tracing::debug!(commands = frame.commands.len(), "rasterizing canvas");
        rasterize_frame(frame, &self.export, Pass::Export)
    }

    /// Rasterize and encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or encoding fails.
    pub fn export_png(&self) -> RenderResult<Vec<u8>> {
        self.rasterize()?.encode_png()
    }
}
