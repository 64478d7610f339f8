//! Rotate gesture: drag the knob above the selection frame.

#[cfg(test)]
#[path = "rotate_test.rs"]
mod rotate_test;

use crate::geometry::{Point, angle_deg};
use crate::object::{ObjectId, ObjectKind, TransformableObject};

/// State captured at pointer-down on the knob.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateGesture {
    pub kind: ObjectKind,
    pub id: ObjectId,
    /// Rotation pivot: the object's live center.
    pub center: Point,
    /// Pointer angle around `center` at press, in degrees.
    pub start_angle: f64,
    /// Object rotation at press.
    pub start_rotation: f64,
}

impl RotateGesture {
    /// `center` and `press` must share a coordinate space.
    #[must_use]
    pub fn begin(object: &TransformableObject, center: Point, press: Point) -> Self {
        log::debug!("rotate: begin {:?} at {:.1}deg", object.kind, object.rotation);
        Self {
            kind: object.kind,
            id: object.id,
            center,
            start_angle: angle_deg(center, press),
            start_rotation: object.rotation,
        }
    }

    /// Rotate by the angle swept since press. The result is normalized.
    pub fn update(&self, object: &mut TransformableObject, pointer: Point) {
        if !(pointer.x.is_finite() && pointer.y.is_finite()) {
            return;
        }
        let swept = angle_deg(self.center, pointer) - self.start_angle;
        object.set_rotation(self.start_rotation + swept);
    }
}

/// Double activation on the knob: back to upright.
pub fn reset_rotation(object: &mut TransformableObject) {
    object.rotation = 0.0;
}
