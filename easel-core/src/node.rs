//! Rendered node geometry.
//!
//! A [`RenderNode`] is the on-canvas counterpart of an element: the geometry a
//! rendering surface resolves for it, including the transient drag offset and
//! handle scale of an in-flight gesture. The element model only sees the
//! result once the gesture ends.

use crate::bounds::BoundBox;
use crate::element::{Element, ElementId, ElementKind};

/// Measures the extent of a text element.
pub trait TextMeasure {
    /// Width and height of `text` set at `font_size`.
    fn measure(&self, text: &str, font_size: f32) -> (f32, f32);
}

/// Approximate metrics: 0.6 em per character on the widest line, one
/// `font_size` per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

/// Average advance of a sans-serif glyph, in em.
const AVERAGE_ADVANCE_EM: f32 = 0.6;

impl TextMeasure for ApproxTextMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font_size: f32) -> (f32, f32) {
        let widest = text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.split('\n').count().max(1);
        (
            widest as f32 * font_size * AVERAGE_ADVANCE_EM,
            lines as f32 * font_size,
        )
    }
}

/// Resolved geometry of one rendered element.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    /// Element this node renders.
    pub id: ElementId,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Unscaled width.
    pub width: f32,
    /// Unscaled height.
    pub height: f32,
    /// Horizontal scale applied by the transform handle.
    pub scale_x: f32,
    /// Vertical scale applied by the transform handle.
    pub scale_y: f32,
    /// Rotation in degrees around `(x, y)`.
    pub rotation: f32,
}

impl RenderNode {
    /// Resolve a node for `element` at scale 1.
    #[must_use]
    pub fn from_element(element: &Element, measure: &dyn TextMeasure) -> Self {
        let (width, height) = match &element.kind {
            ElementKind::Text { text, font_size } => measure.measure(text, *font_size),
            ElementKind::Image { width, height, .. } => (*width, *height),
        };
        Self {
            id: element.id.clone(),
            x: element.x,
            y: element.y,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: element.rotation,
        }
    }

    /// Rendered box, scale included.
    #[must_use]
    pub fn bounding_box(&self) -> BoundBox {
        BoundBox {
            x: self.x,
            y: self.y,
            width: self.width * self.scale_x,
            height: self.height * self.scale_y,
            rotation: self.rotation,
        }
    }

    /// Take on an accepted handle box: position and rotation are copied, size
    /// is expressed as scale over the unscaled width/height.
    pub fn apply_box(&mut self, bbox: &BoundBox) {
        self.x = bbox.x;
        self.y = bbox.y;
        self.rotation = bbox.rotation;
        if self.width > 0.0 {
            self.scale_x = bbox.width / self.width;
        }
        if self.height > 0.0 {
            self.scale_y = bbox.height / self.height;
        }
    }

    /// Whether the canvas point lies on the node, rotation included.
    #[must_use]
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let (dx, dy) = (px - self.x, py - self.y);
        let local_x = dx * cos + dy * sin;
        let local_y = dy * cos - dx * sin;
        let bbox = self.bounding_box();
        (0.0..=bbox.width).contains(&local_x) && (0.0..=bbox.height).contains(&local_y)
    }
}

/// Rendered nodes in paint order.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<RenderNode>,
}

impl NodeTree {
    /// Rebuild the node for `element`, appending it if new.
    ///
    /// Any in-flight scale or drag offset on that node is discarded.
    pub fn refresh(&mut self, element: &Element, measure: &dyn TextMeasure) {
        let node = RenderNode::from_element(element, measure);
        match self.nodes.iter_mut().find(|n| n.id == element.id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    /// Get a node by element id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Get a mutable node by element id.
    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut RenderNode> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// Nodes in paint order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RenderNode> {
        self.nodes.iter()
    }

    /// Topmost node under the point.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&RenderNode> {
        self.nodes.iter().rev().find(|n| n.contains_point(x, y))
    }
}
