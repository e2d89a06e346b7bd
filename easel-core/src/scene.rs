//! Scene snapshots and the element model that owns them.

use std::sync::Arc;

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, ElementPatch};

/// An immutable, ordered snapshot of all elements.
///
/// Insertion order is paint order. Cloning is cheap and a snapshot never
/// changes after it has been handed out: every write produces a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    elements: Arc<Vec<Element>>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in paint order.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements.iter()
    }

    /// Get an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Whether an element with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the scene has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether both handles point at the same snapshot.
    #[must_use]
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements)
    }

    fn appended(&self, element: Element) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend(self.elements.iter().cloned());
        elements.push(element);
        Self {
            elements: Arc::new(elements),
        }
    }

    fn patched(&self, index: usize, patch: &ElementPatch) -> Self {
        let mut elements: Vec<Element> = self.elements.as_ref().clone();
        elements[index].apply(patch);
        Self {
            elements: Arc::new(elements),
        }
    }
}

/// The single source of truth for element state.
///
/// Elements are only ever appended or patched by id; there is no removal.
#[derive(Debug, Clone)]
pub struct ElementModel {
    scene: Scene,
    created: u64,
    config: EditorConfig,
}

impl ElementModel {
    /// Create an empty model using the given defaults.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(),
            created: 0,
            config,
        }
    }

    /// The current scene snapshot.
    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene.clone()
    }

    /// Borrow the current scene snapshot.
    #[must_use]
    pub fn scene_ref(&self) -> &Scene {
        &self.scene
    }

    /// Get an element by id.
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.scene.get(id)
    }

    /// Append a text element at the default position.
    pub fn add_text(&mut self, content: impl Into<String>) -> ElementId {
        let (x, y) = self.config.default_position;
        let kind = ElementKind::Text {
            text: content.into(),
            font_size: self.config.text_font_size,
        };
        self.append(x, y, kind)
    }

    /// Append an image element at the default position and size.
    pub fn add_image(&mut self, src: impl Into<String>) -> ElementId {
        let (x, y) = self.config.default_position;
        let (width, height) = self.config.image_size;
        let kind = ElementKind::Image {
            src: src.into(),
            width,
            height,
        };
        self.append(x, y, kind)
    }

    fn append(&mut self, x: f32, y: f32, kind: ElementKind) -> ElementId {
        self.created += 1;
        let id = ElementId::generate(kind.tag(), self.created);
        let element = Element {
            id: id.clone(),
            x,
            y,
            rotation: 0.0,
            draggable: true,
            kind,
        };
        tracing::debug!(%id, "element added");
        self.scene = self.scene.appended(element);
        id
    }

    /// Merge `patch` into the element with this id.
    ///
    /// Returns `false` and leaves the scene untouched when no element has
    /// that id; the event that produced the patch may be stale.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(index) = self.scene.elements.iter().position(|e| &e.id == id) else {
            tracing::debug!(%id, "update for unknown element ignored");
            return false;
        };
        self.scene = self.scene.patched(index, patch);
        true
    }
}

impl Default for ElementModel {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
