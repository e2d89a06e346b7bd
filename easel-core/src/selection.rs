//! Single selection and the transform handle protocol.
//!
//! At most one element is selected. Selecting an image attaches a freshly
//! created [`TransformHandle`] to its node; deselecting detaches it. Handle
//! gestures are constrained to the canvas every frame and baked into the
//! element model (width/height, not scale) when released.

use crate::bounds::{clamp_position, BoundBox, CanvasBounds};
use crate::element::{ElementId, ElementPatch};
use crate::handle::{HandleId, TransformHandle};
use crate::node::RenderNode;
use crate::scene::{ElementModel, Scene};

/// Tracks the selected element and owns its transform handle.
#[derive(Debug, Clone)]
pub struct SelectionController {
    bounds: CanvasBounds,
    selected: Option<ElementId>,
    handle: Option<TransformHandle>,
    handles_issued: u64,
}

impl SelectionController {
    /// Create a controller with nothing selected.
    #[must_use]
    pub fn new(bounds: CanvasBounds) -> Self {
        Self {
            bounds,
            selected: None,
            handle: None,
            handles_issued: 0,
        }
    }

    /// The selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    /// Whether `id` is the selected element.
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// The attached transform handle, if any.
    #[must_use]
    pub fn handle(&self) -> Option<&TransformHandle> {
        self.handle.as_ref()
    }

    /// Select `id`. Unknown ids are ignored.
    ///
    /// Re-selecting the current element keeps its handle. Selecting a
    /// different element detaches the old handle before an image gets a new
    /// one; text elements never get a handle.
    pub fn select(&mut self, id: &ElementId, scene: &Scene) -> bool {
        let Some(element) = scene.get(id) else {
            tracing::debug!(%id, "select of unknown element ignored");
            return false;
        };
        if self.is_selected(id) {
            return true;
        }

        self.detach_handle();
        self.selected = Some(id.clone());
        if element.is_image() {
            self.attach_handle(id.clone());
        }
        tracing::debug!(%id, "selected");
        true
    }

    /// Clear the selection and detach the handle.
    pub fn clear(&mut self) {
        if let Some(id) = self.selected.take() {
            tracing::debug!(%id, "deselected");
        }
        self.detach_handle();
    }

    /// Attach a new handle to `node`, detaching any existing one first.
    pub fn attach_handle(&mut self, node: ElementId) -> HandleId {
        self.detach_handle();
        self.handles_issued += 1;
        let id = HandleId::new(self.handles_issued);
        tracing::trace!(%id, %node, "handle attached");
        self.handle = Some(TransformHandle::attach(id, node, self.bounds));
        id
    }

    /// Detach and return the current handle.
    pub fn detach_handle(&mut self) -> Option<TransformHandle> {
        let handle = self.handle.take();
        if let Some(h) = &handle {
            tracing::trace!(id = %h.id(), node = %h.node(), "handle detached");
        }
        handle
    }

    /// Drop the selection if its element is no longer in `scene`.
    pub fn retain(&mut self, scene: &Scene) {
        if self.selected.as_ref().is_some_and(|id| !scene.contains(id)) {
            self.clear();
        }
    }

    /// Whether a resize/rotate gesture is in progress.
    #[must_use]
    pub fn is_transforming(&self) -> bool {
        self.handle.as_ref().is_some_and(TransformHandle::is_active)
    }

    /// Commit a released drag: clamp the node's position with its rendered
    /// size and write it back.
    pub fn on_drag_end(&self, model: &mut ElementModel, node: &RenderNode) -> bool {
        let bbox = node.bounding_box();
        let (x, y) = clamp_position(self.bounds, node.x, node.y, bbox.width, bbox.height);
        model.update_element(&node.id, &ElementPatch::position(x, y))
    }

    fn handle_for(&mut self, node: &ElementId) -> Option<&mut TransformHandle> {
        self.handle.as_mut().filter(|h| h.node() == node)
    }

    /// Start a resize/rotate gesture on `node`. Ignored unless the handle is
    /// attached to it.
    pub fn begin_transform(&mut self, node: &RenderNode) -> bool {
        let start = node.bounding_box();
        match self.handle_for(&node.id) {
            Some(handle) => {
                handle.begin_gesture(start);
                true
            }
            None => false,
        }
    }

    /// Feed one frame of a resize/rotate gesture. The accepted box is applied
    /// to the node and returned. A frame with no open gesture starts one from
    /// the node's current box.
    pub fn transform(&mut self, node: &mut RenderNode, proposed: BoundBox) -> Option<BoundBox> {
        let current = node.bounding_box();
        let handle = self.handle_for(&node.id)?;
        if !handle.is_active() {
            handle.begin_gesture(current);
        }
        let accepted = handle.propose(proposed)?;
        node.apply_box(&accepted);
        Some(accepted)
    }

    /// Finish a resize/rotate gesture: reset the node's scale to 1 and bake it
    /// into the element's width/height along with position and rotation.
    pub fn on_transform_end(&mut self, model: &mut ElementModel, node: &mut RenderNode) -> bool {
        let Some(handle) = self.handle_for(&node.id) else {
            return false;
        };
        handle.end_gesture();

        let (scale_x, scale_y) = (node.scale_x, node.scale_y);
        node.scale_x = 1.0;
        node.scale_y = 1.0;
        node.width *= scale_x;
        node.height *= scale_y;

        let patch = ElementPatch {
            x: Some(node.x),
            y: Some(node.y),
            width: Some(node.width),
            height: Some(node.height),
            rotation: Some(node.rotation),
            ..ElementPatch::default()
        };
        model.update_element(&node.id, &patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::node::ApproxTextMeasure;

    fn setup() -> (ElementModel, SelectionController, ElementId, ElementId) {
        let mut model = ElementModel::default();
        let text = model.add_text("Hi");
        let image = model.add_image("cat.png");
        (model, SelectionController::new(CanvasBounds::default()), text, image)
    }

    fn node(model: &ElementModel, id: &ElementId) -> RenderNode {
        RenderNode::from_element(model.get(id).expect("exists"), &ApproxTextMeasure)
    }

    fn image_size(model: &ElementModel, id: &ElementId) -> (f32, f32) {
        match model.get(id).map(|e| &e.kind) {
            Some(ElementKind::Image { width, height, .. }) => (*width, *height),
            _ => panic!("not an image"),
        }
    }

    #[test]
    fn test_select_image_attaches_handle() {
        let (model, mut sel, _, image) = setup();
        assert!(sel.select(&image, model.scene_ref()));
        assert_eq!(sel.handle().map(TransformHandle::node), Some(&image));
    }

    #[test]
    fn test_select_text_has_no_handle() {
        let (model, mut sel, text, _) = setup();
        assert!(sel.select(&text, model.scene_ref()));
        assert!(sel.handle().is_none());
        assert!(sel.is_selected(&text));
    }

    #[test]
    fn test_handle_recreated_per_selection() {
        let (mut model, mut sel, text, image) = setup();
        let other = model.add_image("dog.png");

        sel.select(&image, model.scene_ref());
        let first = sel.handle().map(TransformHandle::id);
        sel.select(&text, model.scene_ref());
        assert!(sel.handle().is_none());
        sel.select(&image, model.scene_ref());
        let second = sel.handle().map(TransformHandle::id);
        sel.select(&other, model.scene_ref());
        let third = sel.handle().map(TransformHandle::id);

        assert!(first.is_some());
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(sel.handle().map(TransformHandle::node), Some(&other));
    }

    #[test]
    fn test_reselect_keeps_handle() {
        let (model, mut sel, _, image) = setup();
        sel.select(&image, model.scene_ref());
        let first = sel.handle().map(TransformHandle::id);
        sel.select(&image, model.scene_ref());
        assert_eq!(sel.handle().map(TransformHandle::id), first);
    }

    #[test]
    fn test_select_unknown_is_ignored() {
        let (model, mut sel, text, _) = setup();
        sel.select(&text, model.scene_ref());
        assert!(!sel.select(&"image-42".into(), model.scene_ref()));
        assert!(sel.is_selected(&text));
    }

    #[test]
    fn test_clear_detaches() {
        let (model, mut sel, _, image) = setup();
        sel.select(&image, model.scene_ref());
        sel.clear();
        assert!(sel.selected().is_none());
        assert!(sel.handle().is_none());
    }

    #[test]
    fn test_retain_clears_missing_selection() {
        let (model, mut sel, _, image) = setup();
        sel.select(&image, model.scene_ref());

        sel.retain(model.scene_ref());
        assert!(sel.is_selected(&image));

        sel.retain(&Scene::new());
        assert!(sel.selected().is_none());
        assert!(sel.handle().is_none());
    }

    #[test]
    fn test_drag_end_clamps() {
        let (mut model, sel, _, image) = setup();
        let mut n = node(&model, &image);
        n.x = 650.0;
        n.y = 40.0;

        assert!(sel.on_drag_end(&mut model, &n));
        let el = model.get(&image).expect("exists");
        assert!((el.x - 500.0).abs() < f32::EPSILON);
        assert!((el.y - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_drag_end_text_uses_measured_size() {
        let (mut model, sel, text, _) = setup();
        let mut n = node(&model, &text);
        n.x = 590.0;
        n.y = 590.0;

        sel.on_drag_end(&mut model, &n);
        let el = model.get(&text).expect("exists");
        // "Hi" at 30pt measures 36 x 30.
        assert!((el.x - 564.0).abs() < 1e-4);
        assert!((el.y - 570.0).abs() < 1e-4);
    }

    #[test]
    fn test_transform_bake_resets_scale() {
        let (mut model, mut sel, _, image) = setup();
        sel.select(&image, model.scene_ref());
        let mut n = node(&model, &image);

        assert!(sel.begin_transform(&n));
        sel.transform(&mut n, BoundBox::new(40.0, 40.0, 200.0, 150.0).with_rotation(30.0));
        assert!(sel.is_transforming());
        assert!(sel.on_transform_end(&mut model, &mut n));
        assert!(!sel.is_transforming());

        assert!((n.scale_x - 1.0).abs() < f32::EPSILON);
        assert!((n.scale_y - 1.0).abs() < f32::EPSILON);
        assert_eq!(image_size(&model, &image), (200.0, 150.0));
        let el = model.get(&image).expect("exists");
        assert!((el.x - 40.0).abs() < f32::EPSILON);
        assert!((el.rotation - 30.0).abs() < f32::EPSILON);

        // A second release at scale 1 does not compound.
        sel.begin_transform(&n);
        assert!(sel.on_transform_end(&mut model, &mut n));
        assert_eq!(image_size(&model, &image), (200.0, 150.0));
    }

    #[test]
    fn test_transform_rejects_out_of_bounds_frame() {
        let (model, mut sel, _, image) = setup();
        sel.select(&image, model.scene_ref());
        let mut n = node(&model, &image);

        sel.begin_transform(&n);
        let ok = BoundBox::new(50.0, 50.0, 300.0, 300.0);
        assert_eq!(sel.transform(&mut n, ok), Some(ok));
        let bad = BoundBox::new(50.0, 50.0, 600.0, 300.0);
        assert_eq!(sel.transform(&mut n, bad), Some(ok));
        assert_eq!(n.bounding_box(), ok);
    }

    #[test]
    fn test_transform_without_begin_rejects_out_of_bounds_frame() {
        let (mut model, mut sel, _, image) = setup();
        sel.select(&image, model.scene_ref());
        let mut n = node(&model, &image);
        let start = n.bounding_box();

        let bad = BoundBox::new(-100.0, 50.0, 900.0, 100.0);
        assert_eq!(sel.transform(&mut n, bad), Some(start));
        assert!(sel.is_transforming());
        assert!(sel.on_transform_end(&mut model, &mut n));

        let el = model.get(&image).expect("exists");
        assert!(el.x >= 0.0);
        assert_eq!(image_size(&model, &image), (100.0, 100.0));
    }

    #[test]
    fn test_transform_ignored_without_handle() {
        let (mut model, mut sel, text, _) = setup();
        sel.select(&text, model.scene_ref());
        let mut n = node(&model, &text);
        let before = model.scene();

        assert!(!sel.begin_transform(&n));
        assert!(sel.transform(&mut n, BoundBox::new(0.0, 0.0, 10.0, 10.0)).is_none());
        assert!(!sel.on_transform_end(&mut model, &mut n));
        assert!(model.scene().same_snapshot(&before));
    }
}
