//! Input events delivered by the rendering surface.

use serde::{Deserialize, Serialize};

use crate::bounds::BoundBox;
use crate::ElementId;

/// What a pointer event landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PointerTarget {
    /// The empty canvas background itself.
    Stage,
    /// A rendered element.
    Element(ElementId),
}

impl PointerTarget {
    /// The element id, unless the target is the stage.
    #[must_use]
    pub fn element(&self) -> Option<&ElementId> {
        match self {
            Self::Stage => None,
            Self::Element(id) => Some(id),
        }
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

/// All events the editor reacts to.
///
/// Gesture events for one element arrive in order
/// (start, move..., end); nothing is guaranteed across elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StageEvent {
    /// Pointer pressed.
    PointerDown {
        /// Direct target of the press.
        target: PointerTarget,
    },

    /// Click or touch tap.
    Tap {
        /// Tapped target.
        target: PointerTarget,
    },

    /// Double click or double tap.
    DoubleClick {
        /// Double-clicked target.
        target: PointerTarget,
    },

    /// A drag started on an element.
    DragStart {
        /// Dragged element.
        id: ElementId,
    },

    /// The dragged node moved to a new, unclamped top-left.
    DragMove {
        /// Dragged element.
        id: ElementId,
        /// Node left edge.
        x: f32,
        /// Node top edge.
        y: f32,
    },

    /// The drag was released.
    DragEnd {
        /// Dragged element.
        id: ElementId,
    },

    /// A handle gesture started.
    TransformStart {
        /// Transformed element.
        id: ElementId,
    },

    /// The handle proposes a new box for this frame.
    TransformMove {
        /// Transformed element.
        id: ElementId,
        /// Box proposed by the handle.
        proposed: BoundBox,
    },

    /// The handle gesture was released.
    TransformEnd {
        /// Transformed element.
        id: ElementId,
    },

    /// The edit overlay's value changed.
    TextInput {
        /// Full current value of the overlay.
        value: String,
    },

    /// A key was pressed.
    Key {
        /// Key name, e.g. `"Enter"`.
        key: String,
        /// Active modifier keys.
        #[serde(default)]
        modifiers: KeyModifiers,
    },

    /// The edit overlay lost focus.
    Blur,
}

impl StageEvent {
    /// Key press without modifiers.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key {
            key: key.into(),
            modifiers: KeyModifiers::default(),
        }
    }

    /// Whether this event is part of a drag or transform gesture.
    #[must_use]
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            Self::DragStart { .. }
                | Self::DragMove { .. }
                | Self::DragEnd { .. }
                | Self::TransformStart { .. }
                | Self::TransformMove { .. }
                | Self::TransformEnd { .. }
        )
    }
}
