//! The editor: element model, rendered nodes, selection, and inline text
//! editing behind a single event entry point.

use crate::bounds::CanvasBounds;
use crate::config::EditorConfig;
use crate::element::{ElementId, ElementPatch};
use crate::event::{PointerTarget, StageEvent};
use crate::handle::TransformHandle;
use crate::node::{ApproxTextMeasure, NodeTree, RenderNode, TextMeasure};
use crate::scene::{ElementModel, Scene};
use crate::selection::SelectionController;
use crate::text_edit::{EditOverlay, InlineTextEditor};

/// Key that commits an inline text edit.
pub const COMMIT_KEY: &str = "Enter";

/// Complete editor state.
///
/// All transitions run synchronously on the caller's thread, one event at a
/// time.
pub struct Editor {
    config: EditorConfig,
    model: ElementModel,
    nodes: NodeTree,
    selection: SelectionController,
    text: InlineTextEditor,
    measure: Box<dyn TextMeasure>,
    dragging: Option<ElementId>,
}

impl Editor {
    /// Create an empty editor with approximate text metrics.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_measure(config, ApproxTextMeasure)
    }

    /// Create an empty editor with the given text metrics.
    #[must_use]
    pub fn with_measure(config: EditorConfig, measure: impl TextMeasure + 'static) -> Self {
        Self {
            model: ElementModel::new(config.clone()),
            nodes: NodeTree::default(),
            selection: SelectionController::new(config.bounds),
            text: InlineTextEditor::new(),
            measure: Box::new(measure),
            dragging: None,
            config,
        }
    }

    /// Editor configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Canvas size.
    #[must_use]
    pub fn bounds(&self) -> CanvasBounds {
        self.config.bounds
    }

    /// Current scene snapshot.
    #[must_use]
    pub fn scene(&self) -> Scene {
        self.model.scene()
    }

    /// The element model.
    #[must_use]
    pub fn model(&self) -> &ElementModel {
        &self.model
    }

    /// Append a text element.
    pub fn add_text(&mut self, content: impl Into<String>) -> ElementId {
        let id = self.model.add_text(content);
        self.sync(&id);
        id
    }

    /// Append an image element.
    pub fn add_image(&mut self, src: impl Into<String>) -> ElementId {
        let id = self.model.add_image(src);
        self.sync(&id);
        id
    }

    /// Merge `patch` into an element. Unknown ids are a no-op.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let updated = self.model.update_element(id, patch);
        self.sync(id);
        updated
    }

    /// Rendered node for an element.
    #[must_use]
    pub fn node(&self, id: &ElementId) -> Option<&RenderNode> {
        self.nodes.get(id)
    }

    /// All rendered nodes in paint order.
    #[must_use]
    pub fn nodes(&self) -> &NodeTree {
        &self.nodes
    }

    /// The selected element.
    #[must_use]
    pub fn selected(&self) -> Option<&ElementId> {
        self.selection.selected()
    }

    /// The selection controller.
    #[must_use]
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// The attached transform handle.
    #[must_use]
    pub fn handle(&self) -> Option<&TransformHandle> {
        self.selection.handle()
    }

    /// The inline text editor.
    #[must_use]
    pub fn text_editor(&self) -> &InlineTextEditor {
        &self.text
    }

    /// Placement of the edit overlay, while editing.
    #[must_use]
    pub fn edit_overlay(&self) -> Option<EditOverlay> {
        self.text.overlay(&self.model)
    }

    /// Whether a drag or transform gesture is in flight.
    #[must_use]
    pub fn gesture_active(&self) -> bool {
        self.dragging.is_some() || self.selection.is_transforming()
    }

    /// What a pointer at canvas coordinates would hit.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> PointerTarget {
        self.nodes
            .hit_test(x, y)
            .map_or(PointerTarget::Stage, |n| PointerTarget::Element(n.id.clone()))
    }

    /// Apply one event. Returns whether anything visible changed.
    pub fn process_event(&mut self, event: StageEvent) -> bool {
        tracing::trace!(?event, "stage event");
        match event {
            StageEvent::PointerDown { target } | StageEvent::Tap { target } => {
                // A press anywhere takes focus away from the edit overlay.
                let committed = self.commit_edit();
                self.point_at(&target) || committed
            }
            StageEvent::DoubleClick { target } => match target {
                PointerTarget::Element(id) => self.begin_edit(&id),
                PointerTarget::Stage => false,
            },
            StageEvent::DragStart { id } => {
                if self.nodes.get(&id).is_none() {
                    return false;
                }
                self.dragging = Some(id);
                false
            }
            StageEvent::DragMove { id, x, y } => match self.nodes.get_mut(&id) {
                Some(node) => {
                    node.x = x;
                    node.y = y;
                    // A move without a start still opens the gesture.
                    self.dragging = Some(id);
                    true
                }
                None => false,
            },
            StageEvent::DragEnd { id } => {
                if self.dragging.as_ref() == Some(&id) {
                    self.dragging = None;
                }
                let Some(node) = self.nodes.get(&id).cloned() else {
                    return false;
                };
                self.selection.on_drag_end(&mut self.model, &node);
                self.sync(&id);
                true
            }
            StageEvent::TransformStart { id } => self
                .nodes
                .get(&id)
                .is_some_and(|node| self.selection.begin_transform(node)),
            StageEvent::TransformMove { id, proposed } => {
                let Some(node) = self.nodes.get_mut(&id) else {
                    return false;
                };
                self.selection.transform(node, proposed).is_some()
            }
            StageEvent::TransformEnd { id } => {
                let Some(node) = self.nodes.get_mut(&id) else {
                    return false;
                };
                let baked = self.selection.on_transform_end(&mut self.model, node);
                self.sync(&id);
                baked
            }
            StageEvent::TextInput { value } => {
                if !self.text.is_editing() {
                    return false;
                }
                self.text.input(value);
                true
            }
            StageEvent::Key { key, .. } => key == COMMIT_KEY && self.commit_edit(),
            StageEvent::Blur => self.commit_edit(),
        }
    }

    fn point_at(&mut self, target: &PointerTarget) -> bool {
        match target {
            PointerTarget::Stage => {
                let had = self.selection.selected().is_some();
                self.selection.clear();
                had
            }
            PointerTarget::Element(id) => {
                let was = self.selection.selected().cloned();
                self.selection.select(id, self.model.scene_ref());
                was.as_ref() != self.selection.selected()
            }
        }
    }

    fn begin_edit(&mut self, id: &ElementId) -> bool {
        if !self.model.get(id).is_some_and(crate::Element::is_text) {
            return false;
        }
        self.commit_edit();
        self.text.begin(&mut self.model, id)
    }

    fn commit_edit(&mut self) -> bool {
        let Some(id) = self.text.editing().cloned() else {
            return false;
        };
        self.text.commit(&mut self.model);
        self.sync(&id);
        true
    }

    /// Rebuild the node for `id` after a write and drop a dangling selection.
    fn sync(&mut self, id: &ElementId) {
        if let Some(element) = self.model.get(id) {
            self.nodes.refresh(element, self.measure.as_ref());
        }
        self.selection.retain(self.model.scene_ref());
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
