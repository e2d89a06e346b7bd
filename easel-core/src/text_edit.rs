//! Inline text editing.
//!
//! Double-clicking a text element swaps its glyphs for an input overlay at the
//! same position and size. The overlay is a controlled buffer: every input
//! event replaces the draft with the overlay's full value. Blur or Enter
//! commits the draft into the element model. There is no cancel path.

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementKind, ElementPatch};
use crate::scene::ElementModel;

/// Font family of the edit overlay.
pub const OVERLAY_FONT_FAMILY: &str = "Arial";

/// Inner padding of the edit overlay, in canvas units.
pub const OVERLAY_PADDING: f32 = 4.0;

/// State of the inline editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    /// No edit in progress.
    #[default]
    Idle,
    /// An element's text is being edited.
    Editing {
        /// Element being edited.
        element_id: ElementId,
        /// Uncommitted text.
        draft: String,
    },
}

/// Where and how a host should place the editable text input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditOverlay {
    /// Element being edited.
    pub element_id: ElementId,
    /// Left edge, the element's `x`.
    pub x: f32,
    /// Top edge, the element's `y`.
    pub y: f32,
    /// The element's font size.
    pub font_size: f32,
    /// Overlay font family.
    pub font_family: String,
    /// Overlay inner padding.
    pub padding: f32,
    /// Current draft text.
    pub value: String,
}

/// Two-state inline text editor.
#[derive(Debug, Clone, Default)]
pub struct InlineTextEditor {
    state: EditState,
}

impl InlineTextEditor {
    /// Create an idle editor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Whether an edit is in progress.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// The element being edited, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&ElementId> {
        match &self.state {
            EditState::Editing { element_id, .. } => Some(element_id),
            EditState::Idle => None,
        }
    }

    /// The uncommitted text, if editing.
    #[must_use]
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    /// Start editing `id` with its current text as the draft.
    ///
    /// Only text elements can be edited; anything else leaves the editor as
    /// it was. An edit already in progress is committed first.
    pub fn begin(&mut self, model: &mut ElementModel, id: &ElementId) -> bool {
        let Some(text) = model.get(id).and_then(|e| e.text_content()).map(str::to_owned) else {
            return false;
        };
        if self.is_editing() {
            self.commit(model);
        }
        tracing::debug!(%id, "text edit started");
        self.state = EditState::Editing {
            element_id: id.clone(),
            draft: text,
        };
        true
    }

    /// Replace the draft with the overlay's current value.
    pub fn input(&mut self, value: impl Into<String>) {
        if let EditState::Editing { draft, .. } = &mut self.state {
            *draft = value.into();
        }
    }

    /// Write the draft into the element and return to idle.
    ///
    /// Commits even when the draft is unchanged or empty. If the element no
    /// longer exists the write is a no-op. Returns whether an edit was open.
    pub fn commit(&mut self, model: &mut ElementModel) -> bool {
        match std::mem::take(&mut self.state) {
            EditState::Editing { element_id, draft } => {
                tracing::debug!(id = %element_id, "text edit committed");
                model.update_element(&element_id, &ElementPatch::text(draft));
                true
            }
            EditState::Idle => false,
        }
    }

    /// Overlay placement for the element being edited.
    #[must_use]
    pub fn overlay(&self, model: &ElementModel) -> Option<EditOverlay> {
        let EditState::Editing { element_id, draft } = &self.state else {
            return None;
        };
        let element = model.get(element_id)?;
        let ElementKind::Text { font_size, .. } = element.kind else {
            return None;
        };
        Some(EditOverlay {
            element_id: element_id.clone(),
            x: element.x,
            y: element.y,
            font_size,
            font_family: OVERLAY_FONT_FAMILY.to_string(),
            padding: OVERLAY_PADDING,
            value: draft.clone(),
        })
    }
}
