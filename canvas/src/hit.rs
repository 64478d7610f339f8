//! Hit-testing in product space.
//!
//! The selected object's frame is checked first so its knob and handle win
//! even where they overlap another object. Then visible objects are tested
//! top-down: text above image. Object bodies are tested in their own rotated
//! frame, so a click in the empty corner of a rotated image's bounding box
//! misses.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::Point;
use crate::object::{ObjectKind, Scene, TextMeasurer};
use crate::overlay::{OverlayLayout, SelectionFrame};

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// The object itself or its frame: starts a drag.
    Body,
    /// Bottom-right handle: starts a resize.
    ResizeHandle,
    /// Knob above the frame: starts a rotation.
    RotateKnob,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub kind: ObjectKind,
    pub part: HitPart,
}

/// Test what lies under `p` (product space).
#[must_use]
pub fn hit_test(
    p: Point,
    scene: &Scene,
    frame: Option<&SelectionFrame>,
    layout: &OverlayLayout,
    measurer: &dyn TextMeasurer,
) -> Option<Hit> {
    if let Some(frame) = frame {
        if scene.is_shown(frame.kind) {
            if let Some(part) = frame.hit(p, layout) {
                return Some(Hit { kind: frame.kind, part });
            }
        }
    }

    [ObjectKind::Text, ObjectKind::Image]
        .into_iter()
        .find(|&kind| body_contains(p, scene, kind, measurer))
        .map(|kind| Hit { kind, part: HitPart::Body })
}

fn body_contains(p: Point, scene: &Scene, kind: ObjectKind, measurer: &dyn TextMeasurer) -> bool {
    let Some(object) = scene.object(kind).filter(|o| o.visible) else {
        return false;
    };
    let Some(bounds) = scene.product_box(kind, measurer) else {
        return false;
    };
    // Undo the object's rotation about its center, then test the upright box.
    let c = bounds.center();
    let rad = (-object.rotation).to_radians();
    let (sin, cos) = rad.sin_cos();
    let (dx, dy) = (p.x - c.x, p.y - c.y);
    let local = Point::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos);
    bounds.contains(local)
}
