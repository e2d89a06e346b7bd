//! Frame rasterization.
//!
//! Frames are rendered through an SVG intermediate representation and the
//! resvg/tiny-skia pipeline, then optionally encoded as PNG.

use std::fmt::Write;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::frame::{DrawCommand, Frame, HandleChrome};

/// File name hosts should offer when saving an export.
pub const DEFAULT_EXPORT_FILENAME: &str = "canvas.png";

/// Stroke color of the handle outline on screen.
const HANDLE_STROKE: &str = "#0096ff";

/// Rasterization settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    /// Background color as RGBA bytes. Transparent by default.
    pub background: [u8; 4],
    /// Output pixels per canvas unit (e.g. 2.0 for retina).
    pub pixel_ratio: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: [0, 0, 0, 0],
            pixel_ratio: 1.0,
        }
    }
}

/// Which view of a frame to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// What the user sees: handle chrome drawn, text under edit hidden.
    Screen,
    /// The exported image: no chrome, committed text always drawn.
    Export,
}

/// A rendered RGBA raster.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixmap: tiny_skia::Pixmap,
}

impl RasterImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha RGBA of one pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixmap.data().chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Premultiplied RGBA bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }
}

/// Output raster size for a frame.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn output_dimensions(frame: &Frame, config: &ExportConfig) -> (u32, u32) {
    let ratio = if config.pixel_ratio.is_finite() && config.pixel_ratio > 0.0 {
        config.pixel_ratio
    } else {
        1.0
    };
    let out_w = (frame.bounds.width() * ratio).round().max(1.0) as u32;
    let out_h = (frame.bounds.height() * ratio).round().max(1.0) as u32;
    (out_w, out_h)
}

/// Render a frame as an SVG document.
#[must_use]
pub fn frame_to_svg(frame: &Frame, config: &ExportConfig, pass: Pass) -> String {
    let (out_w, out_h) = output_dimensions(frame, config);
    let view_w = frame.bounds.width();
    let view_h = frame.bounds.height();

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
    );

    let bg = &config.background;
    if bg[3] > 0 {
        let bg_alpha = f32::from(bg[3]) / 255.0;
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"rgb({},{},{})\" fill-opacity=\"{bg_alpha}\"/>",
            bg[0], bg[1], bg[2],
        );
    }

    for command in &frame.commands {
        if pass == Pass::Screen && !command.on_screen() {
            continue;
        }
        render_command_svg(&mut svg, command);
    }

    if pass == Pass::Screen {
        if let Some(chrome) = &frame.handle {
            render_handle_svg(&mut svg, chrome);
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Rasterize a frame.
///
/// # Errors
///
/// Returns an error if the intermediate SVG cannot be parsed or the pixmap
/// cannot be allocated.
pub fn rasterize_frame(frame: &Frame, config: &ExportConfig, pass: Pass) -> RenderResult<RasterImage> {
    let svg = frame_to_svg(frame, config, pass);
    rasterize_svg(&svg)
}

/// Rasterize an SVG string.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rasterize_svg(svg_string: &str) -> RenderResult<RasterImage> {
    let mut opt = usvg::Options::default();
    opt.fontdb = font_database();
    let tree = usvg::Tree::from_str(svg_string, &opt)
        .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

    let px_w = tree.size().width().round() as u32;
    let px_h = tree.size().height().round() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(RasterImage { pixmap })
}

/// System fonts, loaded once per process.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    Arc::clone(FONTS.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    }))
}

fn render_command_svg(svg: &mut String, command: &DrawCommand) {
    match command {
        DrawCommand::Text {
            x,
            y,
            rotation,
            text,
            font_size,
            font_family,
            ..
        } => {
            let _ = write!(
                svg,
                "<g transform=\"rotate({rotation} {x} {y})\" font-size=\"{font_size}\" font-family=\"{font_family}\" fill=\"#000000\">",
            );
            let mut baseline = *y;
            for line in text.split('\n') {
                baseline += font_size;
                let escaped = escape_xml(line);
                let _ = write!(svg, "<text x=\"{x}\" y=\"{baseline}\">{escaped}</text>");
            }
            svg.push_str("</g>");
        }

        DrawCommand::Image {
            x,
            y,
            width,
            height,
            rotation,
            image,
            ..
        } => {
            let _ = write!(
                svg,
                "<image x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"none\" transform=\"rotate({rotation} {x} {y})\" xlink:href=\"{}\"/>",
                image.data_uri,
            );
        }
    }
}

fn render_handle_svg(svg: &mut String, chrome: &HandleChrome) {
    let b = &chrome.bbox;
    let _ = write!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{HANDLE_STROKE}\" stroke-width=\"1\" transform=\"rotate({} {} {})\"/>",
        b.x, b.y, b.width, b.height, b.rotation, b.x, b.y,
    );
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use easel_core::{CanvasBounds, Editor, ElementId, PointerTarget, StageEvent};

    use super::*;
    use crate::frame::TEXT_FONT_FAMILY;
    use crate::image::{encode_png_data_uri, ImageFormat, LoadedImage, TextureData};

    fn bounds(w: f32, h: f32) -> CanvasBounds {
        CanvasBounds::new(w, h).expect("bounds")
    }

    fn text(content: &str, superseded: bool) -> DrawCommand {
        DrawCommand::Text {
            id: ElementId::from("text-1"),
            x: 10.0,
            y: 20.0,
            rotation: 0.0,
            text: content.to_string(),
            font_size: 16.0,
            font_family: TEXT_FONT_FAMILY,
            superseded,
        }
    }

    fn green_image(x: f32, y: f32, size: f32) -> DrawCommand {
        let texture = TextureData {
            width: 4,
            height: 4,
            data: [0u8, 255, 0, 255].repeat(16),
            format: ImageFormat::Png,
        };
        let uri = encode_png_data_uri(&texture).expect("encode");
        let bytes = crate::image::decode_data_uri(&uri).expect("decode");
        DrawCommand::Image {
            id: ElementId::from("image-2"),
            x,
            y,
            width: size,
            height: size,
            rotation: 0.0,
            image: LoadedImage::decode(uri, &bytes).expect("image"),
        }
    }

    #[test]
    fn test_svg_for_empty_frame() {
        let frame = Frame::empty(bounds(600.0, 600.0));
        let svg = frame_to_svg(&frame, &ExportConfig::default(), Pass::Export);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"600\""));
        assert!(svg.contains("height=\"600\""));
        // Transparent background emits no rect.
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_svg_text_baseline_and_escaping() {
        let mut frame = Frame::empty(bounds(200.0, 100.0));
        frame.commands.push(text("A < B & C", false));
        let svg = frame_to_svg(&frame, &ExportConfig::default(), Pass::Export);
        assert!(svg.contains("A &lt; B &amp; C"));
        assert!(svg.contains("y=\"36\""));
        assert!(svg.contains("font-family=\"Arial\""));
    }

    #[test]
    fn test_multiline_text_emits_one_run_per_line() {
        let mut frame = Frame::empty(bounds(200.0, 100.0));
        frame.commands.push(text("one\ntwo", false));
        let svg = frame_to_svg(&frame, &ExportConfig::default(), Pass::Export);
        assert_eq!(svg.matches("<text").count(), 2);
        assert!(svg.contains("y=\"52\""));
    }

    #[test]
    fn test_superseded_text_only_hidden_on_screen() {
        let mut frame = Frame::empty(bounds(200.0, 100.0));
        frame.commands.push(text("Hello", true));

        let screen = frame_to_svg(&frame, &ExportConfig::default(), Pass::Screen);
        assert!(!screen.contains("Hello"));
        let export = frame_to_svg(&frame, &ExportConfig::default(), Pass::Export);
        assert!(export.contains("Hello"));
    }

    #[test]
    fn test_handle_chrome_only_on_screen() {
        let mut editor = Editor::default();
        let id = editor.add_image("cat.png");
        editor.process_event(StageEvent::Tap {
            target: PointerTarget::Element(id.clone()),
        });
        let handle = editor.handle().expect("handle");

        let mut frame = Frame::empty(editor.bounds());
        frame.handle = Some(HandleChrome {
            handle: handle.id(),
            element_id: id.clone(),
            bbox: editor.node(&id).expect("node").bounding_box(),
        });

        let screen = frame_to_svg(&frame, &ExportConfig::default(), Pass::Screen);
        assert!(screen.contains(HANDLE_STROKE));
        let export = frame_to_svg(&frame, &ExportConfig::default(), Pass::Export);
        assert!(!export.contains(HANDLE_STROKE));
    }

    #[test]
    fn test_empty_frame_rasterizes_blank() {
        let frame = Frame::empty(bounds(60.0, 40.0));
        let raster = rasterize_frame(&frame, &ExportConfig::default(), Pass::Export).expect("raster");
        assert_eq!((raster.width(), raster.height()), (60, 40));
        assert!(raster.is_blank());

        let png = raster.encode_png().expect("png");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_background_fill() {
        let frame = Frame::empty(bounds(10.0, 10.0));
        let config = ExportConfig {
            background: [255, 255, 255, 255],
            ..ExportConfig::default()
        };
        let raster = rasterize_frame(&frame, &config, Pass::Export).expect("raster");
        assert_eq!(raster.pixel(5, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_pixel_ratio_scales_output() {
        let frame = Frame::empty(bounds(100.0, 50.0));
        let config = ExportConfig {
            pixel_ratio: 2.0,
            ..ExportConfig::default()
        };
        let svg = frame_to_svg(&frame, &config, Pass::Export);
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("viewBox=\"0 0 100 50\""));

        let raster = rasterize_frame(&frame, &config, Pass::Export).expect("raster");
        assert_eq!((raster.width(), raster.height()), (200, 100));
    }

    #[test]
    fn test_image_pixels_land_in_box() {
        let mut frame = Frame::empty(bounds(100.0, 100.0));
        frame.commands.push(green_image(20.0, 20.0, 40.0));

        let raster = rasterize_frame(&frame, &ExportConfig::default(), Pass::Export).expect("raster");
        assert_eq!(raster.pixel(40, 40), Some([0, 255, 0, 255]));
        assert_eq!(raster.pixel(5, 5).map(|p| p[3]), Some(0));
        assert_eq!(raster.pixel(80, 80).map(|p| p[3]), Some(0));
    }
}
