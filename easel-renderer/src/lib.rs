//! # Easel Renderer
//!
//! Scene composer for the Easel editor: turns editor state into draw
//! primitives, loads image resources in the background, and exports the
//! canvas as a raster.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────┐  compose   ┌─────────┐  present   ┌─────────────────┐
//! │   Editor   │ ─────────▶ │  Frame  │ ─────────▶ │  RenderSurface  │
//! └────────────┘            └─────────┘            │  raster / trace │
//!       ▲                        │                 └─────────────────┘
//!       │ redraw                 │ rasterize
//! ┌────────────┐            ┌─────────────┐
//! │ ImageCache │ ◀─ tokio   │ SVG → resvg │ ─▶ PNG
//! └────────────┘            └─────────────┘
//! ```
//!
//! Image loads run as tokio tasks; completions are drained on the caller's
//! thread with [`SceneComposer::poll_images`] or
//! [`SceneComposer::next_image_event`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod cache;
pub mod compose;
pub mod error;
pub mod export;
pub mod frame;
pub mod image;

pub use backend::{RasterSurface, RenderSurface, TraceSurface};
pub use cache::{CacheStats, ImageCache, ImageState, LoadEvent};
pub use compose::SceneComposer;
pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, Pass, RasterImage, DEFAULT_EXPORT_FILENAME};
pub use frame::{DrawCommand, Frame, HandleChrome, TEXT_FONT_FAMILY};
pub use crate::image::{DefaultImageLoader, ImageLoader, LoadedImage, TextureData};

/// Easel renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
