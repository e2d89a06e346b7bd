//! Image loading utilities.
//!
//! Image elements reference their pixels by `src`: either a `data:` URI or a
//! filesystem path. Sources are fetched by an [`ImageLoader`] and decoded to
//! RGBA with the `image` crate.

use std::sync::Arc;

use base64::Engine;
use futures::future::BoxFuture;
use image::ImageEncoder;

use crate::error::{RenderError, RenderResult};

/// Decoded RGBA pixels.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pub data: Vec<u8>,
    /// Encoded format the pixels were decoded from.
    pub format: ImageFormat,
}

/// Encoded formats recognised by their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Self::Png
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Self::WebP
        } else {
            Self::Unknown
        }
    }
}

/// A decoded image ready to be drawn.
#[derive(Debug)]
pub struct LoadedImage {
    /// Source it was loaded from.
    pub src: String,
    /// Decoded pixels.
    pub texture: TextureData,
    /// The pixels re-encoded as a PNG `data:` URI for SVG embedding.
    pub data_uri: String,
}

impl LoadedImage {
    /// Decode `bytes` fetched from `src`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a decodable image.
    pub fn decode(src: impl Into<String>, bytes: &[u8]) -> RenderResult<Arc<Self>> {
        let texture = load_image_from_bytes(bytes)?;
        let data_uri = encode_png_data_uri(&texture)?;
        Ok(Arc::new(Self {
            src: src.into(),
            texture,
            data_uri,
        }))
    }
}

/// Decode raw image bytes to RGBA.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn load_image_from_bytes(data: &[u8]) -> RenderResult<TextureData> {
    let format = ImageFormat::from_magic_bytes(data);

    let img = image::load_from_memory(data).map_err(|e| RenderError::Decode(e.to_string()))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureData {
        width,
        height,
        data: rgba.into_raw(),
        format,
    })
}

/// Extract the payload of a `data:` URI.
///
/// Supports base64 (`data:image/png;base64,...`) and percent-encoded payloads.
///
/// # Errors
///
/// Returns an error if the URI is malformed.
pub fn decode_data_uri(uri: &str) -> RenderResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    if metadata.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))
    } else {
        percent_decode(payload)
    }
}

fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid URL encoding".to_string()))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Encode RGBA pixels as a PNG `data:` URI.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn encode_png_data_uri(texture: &TextureData) -> RenderResult<String> {
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(
            &texture.data,
            texture.width,
            texture.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(format!("data:image/png;base64,{encoded}"))
}

/// Fetches the raw bytes behind an image `src`.
pub trait ImageLoader: Send + Sync {
    /// Start fetching `src`. The future runs on the tokio runtime.
    fn fetch(&self, src: &str) -> BoxFuture<'static, RenderResult<Vec<u8>>>;
}

/// Loads `data:` URIs inline and everything else from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImageLoader;

impl ImageLoader for DefaultImageLoader {
    fn fetch(&self, src: &str) -> BoxFuture<'static, RenderResult<Vec<u8>>> {
        let src = src.to_string();
        Box::pin(async move {
            if src.starts_with("data:") {
                decode_data_uri(&src)
            } else {
                tokio::fs::read(&src)
                    .await
                    .map_err(|e| RenderError::Resource(format!("{src}: {e}")))
            }
        })
    }
}
