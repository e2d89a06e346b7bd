//! Boundary constraints keeping elements inside the canvas.
//!
//! Two distinct rules apply:
//!
//! - [`clamp_position`] runs once when a drag is released and clamps each axis
//!   independently. While the drag is in flight the node may leave the canvas.
//! - [`constrain_bound_box`] runs on every frame of a resize/rotate gesture and
//!   rejects the whole proposal (returning the previous box) as soon as any edge
//!   crosses the canvas boundary.
//!
//! Both are pure and take the canvas dimensions explicitly.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};

/// Default canvas width in canvas units.
pub const DEFAULT_CANVAS_WIDTH: f32 = 600.0;

/// Default canvas height in canvas units.
pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

/// Fixed logical size of the drawing surface: `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct CanvasBounds {
    width: f32,
    height: f32,
}

#[derive(Deserialize)]
struct RawBounds {
    width: f32,
    height: f32,
}

impl TryFrom<RawBounds> for CanvasBounds {
    type Error = EditorError;

    fn try_from(raw: RawBounds) -> EditorResult<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl CanvasBounds {
    /// Create canvas bounds.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidBounds`] unless both dimensions are
    /// finite and strictly positive.
    pub fn new(width: f32, height: f32) -> EditorResult<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(EditorError::InvalidBounds { width, height })
        }
    }

    /// Canvas width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether `bbox` lies entirely inside the canvas.
    #[must_use]
    pub fn contains(&self, bbox: &BoundBox) -> bool {
        bbox.x >= 0.0
            && bbox.y >= 0.0
            && bbox.x + bbox.width <= self.width
            && bbox.y + bbox.height <= self.height
    }
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

/// An element's placement and extent during a resize/rotate gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
}

impl BoundBox {
    /// Create an unrotated box.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Set the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Clamp a proposed top-left position so a `width` x `height` node stays on
/// the canvas.
///
/// Each axis is clamped to `[0, bound - size]`. A node larger than the canvas
/// is pinned to 0 on that axis.
#[must_use]
pub fn clamp_position(bounds: CanvasBounds, x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    (
        clamp_axis(x, bounds.width - width),
        clamp_axis(y, bounds.height - height),
    )
}

// Upper bound first, then lower: `f32::clamp` panics when max < min.
fn clamp_axis(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}

/// Accept `new` if it lies inside the canvas, otherwise return `old` unchanged.
#[must_use]
pub fn constrain_bound_box(bounds: CanvasBounds, old: BoundBox, new: BoundBox) -> BoundBox {
    if bounds.contains(&new) {
        new
    } else {
        tracing::trace!(?new, ?old, "bound box rejected");
        old
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CanvasBounds {
        CanvasBounds::new(600.0, 600.0).expect("valid bounds")
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(CanvasBounds::new(0.0, 600.0).is_err());
        assert!(CanvasBounds::new(600.0, -1.0).is_err());
        assert!(CanvasBounds::new(f32::NAN, 600.0).is_err());
        assert!(CanvasBounds::new(f32::INFINITY, 600.0).is_err());
    }

    #[test]
    fn test_clamp_right_overflow() {
        assert_eq!(clamp_position(canvas(), 650.0, 40.0, 100.0, 100.0), (500.0, 40.0));
    }

    #[test]
    fn test_clamp_negative() {
        assert_eq!(clamp_position(canvas(), -20.0, -5.0, 100.0, 100.0), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_in_bounds_is_noop() {
        for &(x, y, w, h) in &[
            (0.0, 0.0, 100.0, 100.0),
            (500.0, 500.0, 100.0, 100.0),
            (123.5, 42.25, 60.0, 30.0),
            (0.0, 0.0, 600.0, 600.0),
        ] {
            assert_eq!(clamp_position(canvas(), x, y, w, h), (x, y));
        }
    }

    #[test]
    fn test_clamp_idempotent() {
        let samples = [
            (-300.0, 900.0, 100.0, 40.0),
            (650.0, 40.0, 100.0, 100.0),
            (250.0, -1.0, 10.0, 600.0),
            (599.0, 599.0, 1.0, 1.0),
        ];
        for &(x, y, w, h) in &samples {
            let once = clamp_position(canvas(), x, y, w, h);
            let twice = clamp_position(canvas(), once.0, once.1, w, h);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_clamp_oversized_node_pins_to_origin() {
        assert_eq!(clamp_position(canvas(), 30.0, 30.0, 800.0, 700.0), (0.0, 0.0));
    }

    #[test]
    fn test_bound_box_accepts_inside() {
        let old = BoundBox::new(50.0, 50.0, 100.0, 100.0);
        let new = BoundBox::new(40.0, 40.0, 200.0, 200.0).with_rotation(15.0);
        assert_eq!(constrain_bound_box(canvas(), old, new), new);
    }

    #[test]
    fn test_bound_box_rejects_each_edge() {
        let old = BoundBox::new(50.0, 50.0, 100.0, 100.0);
        let outside = [
            BoundBox::new(-0.5, 50.0, 100.0, 100.0),
            BoundBox::new(50.0, -3.0, 100.0, 100.0),
            BoundBox::new(550.0, 50.0, 51.0, 100.0),
            BoundBox::new(50.0, 500.0, 100.0, 100.5),
        ];
        for new in outside {
            assert_eq!(constrain_bound_box(canvas(), old, new), old);
        }
    }

    #[test]
    fn test_bound_box_touching_edges_is_inside() {
        let old = BoundBox::new(50.0, 50.0, 100.0, 100.0);
        let new = BoundBox::new(0.0, 0.0, 600.0, 600.0);
        assert_eq!(constrain_bound_box(canvas(), old, new), new);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_canvas() -> impl Strategy<Value = CanvasBounds> {
            (1.0f32..2000.0f32, 1.0f32..2000.0f32)
                .prop_map(|(w, h)| CanvasBounds::new(w, h).expect("positive bounds"))
        }

        fn arb_box() -> impl Strategy<Value = BoundBox> {
            (
                -1000.0f32..3000.0f32,
                -1000.0f32..3000.0f32,
                0.0f32..2500.0f32,
                0.0f32..2500.0f32,
                -360.0f32..360.0f32,
            )
                .prop_map(|(x, y, w, h, r)| BoundBox::new(x, y, w, h).with_rotation(r))
        }

        proptest! {
            #[test]
            fn prop_clamp_is_idempotent(
                bounds in arb_canvas(),
                x in -3000.0f32..3000.0f32,
                y in -3000.0f32..3000.0f32,
                w in 0.0f32..2500.0f32,
                h in 0.0f32..2500.0f32,
            ) {
                let once = clamp_position(bounds, x, y, w, h);
                let twice = clamp_position(bounds, once.0, once.1, w, h);
                prop_assert_eq!(once, twice);
                prop_assert!(once.0 >= 0.0 && once.1 >= 0.0);
            }

            #[test]
            fn prop_clamp_in_bounds_is_noop(
                bounds in arb_canvas(),
                fx in 0.0f32..=1.0f32,
                fy in 0.0f32..=1.0f32,
                fw in 0.0f32..=1.0f32,
                fh in 0.0f32..=1.0f32,
            ) {
                let w = bounds.width() * fw;
                let h = bounds.height() * fh;
                let x = (bounds.width() - w) * fx;
                let y = (bounds.height() - h) * fy;
                prop_assume!(x <= bounds.width() - w && y <= bounds.height() - h);

                prop_assert_eq!(clamp_position(bounds, x, y, w, h), (x, y));
            }

            #[test]
            fn prop_bound_box_accepts_only_inside(
                bounds in arb_canvas(),
                old in arb_box(),
                new in arb_box(),
            ) {
                let result = constrain_bound_box(bounds, old, new);
                if bounds.contains(&new) {
                    prop_assert_eq!(result, new);
                } else {
                    prop_assert_eq!(result, old);
                }
            }
        }
    }

    #[test]
    fn test_bounds_deserialize_validates() {
        let ok: CanvasBounds = serde_json::from_str(r#"{"width":800,"height":400}"#).expect("ok");
        assert!((ok.width() - 800.0).abs() < f32::EPSILON);
        assert!(serde_json::from_str::<CanvasBounds>(r#"{"width":0,"height":400}"#).is_err());
    }
}
