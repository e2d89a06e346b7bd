//! # Easel Core
//!
//! Scene-graph core of an interactive 2D canvas editor: text and image
//! elements on a fixed-size canvas that can be selected, dragged,
//! resized/rotated through a handle, and edited inline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├──────────────────────┬──────────────────────┤
//! │  Selection           │  Inline Text Editor  │
//! │  - single selection  │  - Idle / Editing    │
//! │  - transform handle  │  - commit on blur    │
//! ├──────────────────────┴──────────────────────┤
//! │  Boundary Constraints (pure)                │
//! │  - drag clamp        - bound-box rejection  │
//! ├─────────────────────────────────────────────┤
//! │  Element Model       │  Render Nodes        │
//! │  - copy-on-write     │  - live gesture      │
//! │    scene snapshots   │    geometry          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering lives in `easel-renderer`; this crate never draws.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bounds;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod handle;
pub mod node;
pub mod scene;
pub mod selection;
pub mod text_edit;

pub use bounds::{clamp_position, constrain_bound_box, BoundBox, CanvasBounds};
pub use config::EditorConfig;
pub use editor::Editor;
pub use element::{Element, ElementId, ElementKind, ElementPatch};
pub use error::{EditorError, EditorResult};
pub use event::{KeyModifiers, PointerTarget, StageEvent};
pub use handle::{HandleId, TransformHandle};
pub use node::{ApproxTextMeasure, NodeTree, RenderNode, TextMeasure};
pub use scene::{ElementModel, Scene};
pub use selection::SelectionController;
pub use text_edit::{EditOverlay, EditState, InlineTextEditor};

/// Easel core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
