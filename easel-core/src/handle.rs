//! Resize/rotate handle overlay bound to one rendered node.

use std::fmt;

use crate::bounds::{constrain_bound_box, BoundBox, CanvasBounds};
use crate::element::ElementId;

/// Identity of one attached handle. A fresh id is issued on every attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

impl HandleId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// A transform handle overlay attached to a single node.
///
/// Owned by the selection controller; never rebound to a different node.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformHandle {
    id: HandleId,
    node: ElementId,
    bounds: CanvasBounds,
    /// Last accepted box of the gesture in progress.
    gesture: Option<BoundBox>,
}

impl TransformHandle {
    pub(crate) fn attach(id: HandleId, node: ElementId, bounds: CanvasBounds) -> Self {
        Self {
            id,
            node,
            bounds,
            gesture: None,
        }
    }

    /// This handle's identity.
    #[must_use]
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// The node this handle is bound to.
    #[must_use]
    pub fn node(&self) -> &ElementId {
        &self.node
    }

    /// Whether a resize/rotate gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start a gesture from the node's current box.
    pub fn begin_gesture(&mut self, start: BoundBox) {
        self.gesture = Some(start);
    }

    /// Run a proposed box through the bound-box constraint.
    ///
    /// Returns the box to display: `proposed` if it stays on the canvas,
    /// otherwise the previously accepted box. `None` when no gesture is open.
    pub fn propose(&mut self, proposed: BoundBox) -> Option<BoundBox> {
        let previous = self.gesture?;
        let accepted = constrain_bound_box(self.bounds, previous, proposed);
        self.gesture = Some(accepted);
        Some(accepted)
    }

    /// Finish the gesture, returning its last accepted box.
    pub fn end_gesture(&mut self) -> Option<BoundBox> {
        self.gesture.take()
    }
}
