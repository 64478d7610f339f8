//! Drag gesture: press on an object, track the pointer, release.
//!
//! Deltas are measured in container space, so the caller must convert
//! viewport points through [`crate::geometry::ContainerGeometry`] first; a
//! visually scaled ancestor would otherwise inflate or shrink every move.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::geometry::{Offset, Point, Size};
use crate::object::{ObjectId, ObjectKind, TextMeasurer, TransformableObject};
use crate::snap::{Guides, SnapEngine};

/// State captured at pointer-down for a move.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub kind: ObjectKind,
    pub id: ObjectId,
    /// Pointer position at press, in container space.
    pub press: Point,
    /// Object offset at press.
    pub start_offset: Offset,
}

impl DragGesture {
    #[must_use]
    pub fn begin(object: &TransformableObject, press: Point) -> Self {
        log::debug!("drag: begin {:?}", object.kind);
        Self { kind: object.kind, id: object.id, press, start_offset: object.offset }
    }

    /// Move `object` to follow `pointer`, then clamp and snap it.
    ///
    /// Returns the guides to show for this move.
    pub fn update(
        &self,
        object: &mut TransformableObject,
        pointer: Point,
        container: Size,
        snap: &SnapEngine,
        measurer: &dyn TextMeasurer,
    ) -> Guides {
        let delta = Offset::new(pointer.x - self.press.x, pointer.y - self.press.y);
        let proposed = self.start_offset + delta;
        if !proposed.is_finite() {
            return Guides::default();
        }
        object.offset = proposed;
        object.clamp_into(container, measurer);

        let snapped = snap.snap(object.constraint_box(container, measurer), container);
        object.translate(snapped.delta);
        object.clamp_into(container, measurer);
        snapped.guides
    }
}
