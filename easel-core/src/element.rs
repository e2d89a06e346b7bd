//! Canvas elements - the placed text and image objects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for an element, of the form `"<type>-<n>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Build the id for the `n`-th created element of the given kind tag.
    #[must_use]
    pub fn generate(tag: &str, n: u64) -> Self {
        Self(format!("{tag}-{n}"))
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text label.
    Text {
        /// Text content.
        text: String,
        /// Font size in canvas units.
        #[serde(rename = "fontSize")]
        font_size: f32,
    },

    /// A raster image.
    Image {
        /// Image source: a filesystem path or a `data:` URI.
        src: String,
        /// Width in canvas units.
        width: f32,
        /// Height in canvas units.
        height: f32,
    },
}

impl ElementKind {
    /// Tag used in generated ids (`"text"` or `"image"`).
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
        }
    }
}

/// A placed element. Insertion order in the scene is paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Stable unique identifier.
    pub id: ElementId,
    /// Left edge in canvas units.
    pub x: f32,
    /// Top edge in canvas units.
    pub y: f32,
    /// Rotation in degrees, clockwise around `(x, y)`.
    #[serde(default)]
    pub rotation: f32,
    /// Always true for elements created by the editor.
    pub draggable: bool,
    /// Content.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create a text element.
    #[must_use]
    pub fn text(id: ElementId, x: f32, y: f32, text: impl Into<String>, font_size: f32) -> Self {
        Self {
            id,
            x,
            y,
            rotation: 0.0,
            draggable: true,
            kind: ElementKind::Text {
                text: text.into(),
                font_size,
            },
        }
    }

    /// Create an image element.
    #[must_use]
    pub fn image(
        id: ElementId,
        x: f32,
        y: f32,
        src: impl Into<String>,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            id,
            x,
            y,
            rotation: 0.0,
            draggable: true,
            kind: ElementKind::Image {
                src: src.into(),
                width,
                height,
            },
        }
    }

    /// Whether this is a text element.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text { .. })
    }

    /// Whether this is an image element.
    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image { .. })
    }

    /// Text content, if this is a text element.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { text, .. } => Some(text),
            ElementKind::Image { .. } => None,
        }
    }

    /// Merge the set fields of `patch` into this element.
    ///
    /// Fields that do not apply to the element's kind are ignored.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }

        match &mut self.kind {
            ElementKind::Text { text, font_size } => {
                if let Some(new_text) = &patch.text {
                    text.clone_from(new_text);
                }
                if let Some(size) = patch.font_size {
                    *font_size = size;
                }
            }
            ElementKind::Image { src, width, height } => {
                if let Some(new_src) = &patch.src {
                    src.clone_from(new_src);
                }
                if let Some(w) = patch.width {
                    *width = w;
                }
                if let Some(h) = patch.height {
                    *height = h;
                }
            }
        }
    }
}

/// A partial set of element attributes to merge by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    /// New left edge.
    pub x: Option<f32>,
    /// New top edge.
    pub y: Option<f32>,
    /// New rotation in degrees.
    pub rotation: Option<f32>,
    /// New text content (text elements only).
    pub text: Option<String>,
    /// New font size (text elements only).
    pub font_size: Option<f32>,
    /// New source (image elements only).
    pub src: Option<String>,
    /// New width (image elements only).
    pub width: Option<f32>,
    /// New height (image elements only).
    pub height: Option<f32>,
}

impl ElementPatch {
    /// A patch that moves the element.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// A patch that replaces the text content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Whether the patch sets no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
