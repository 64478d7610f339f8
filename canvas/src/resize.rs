//! Resize gesture: drag the bottom-right handle to scale an object.
//!
//! The two kinds follow different laws:
//!
//! - **Text** scales about a pivot fixed at the box's top-left at press
//!   time. The scale factor is the ratio of the pointer's current distance
//!   from the pivot to its distance at press. The font metric is rescaled,
//!   the top-left stays on the pivot, and the box is clamped into the
//!   container afterwards.
//! - **Image** adds a signed linear delta to its starting scale:
//!   `max(|dx|, |dy|)`, signed by `dx + dy`, divided by a sensitivity. The
//!   travel is measured in on-screen pixels, so a container shrunk by an
//!   ancestor transform resizes at the same rate per pixel dragged. The
//!   scale applies around the image center, which does not move.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use crate::geometry::{Offset, Point, Size};
use crate::object::{ObjectId, ObjectKind, TextMeasurer, TransformableObject};

/// How pointer travel maps to scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeStrategy {
    /// Distance ratio about a fixed pivot.
    PivotRatio {
        /// Fixed top-left corner, in container space.
        pivot: Point,
        /// Pointer distance from the pivot at press. Never zero.
        initial_distance: f64,
    },
    /// Signed max-axis delta over a sensitivity.
    SignedDelta {
        /// On-screen pointer travel that adds 1.0 to the scale.
        sensitivity: f64,
        /// Screen pixels per container pixel on each axis, at press.
        screen_scale: (f64, f64),
    },
}

/// State captured at pointer-down on the resize handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    pub kind: ObjectKind,
    pub id: ObjectId,
    /// Pointer at press, in container space.
    pub press: Point,
    pub start_scale: f64,
    pub strategy: ResizeStrategy,
}

impl ResizeGesture {
    /// Start resizing `object`. `press` is in container space.
    #[must_use]
    pub fn begin(
        object: &TransformableObject,
        press: Point,
        container: Size,
        sensitivity: f64,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let strategy = match object.kind {
            ObjectKind::Text => {
                let pivot = object.live_box(container, measurer).origin();
                let distance = press.distance(pivot);
                ResizeStrategy::PivotRatio {
                    pivot,
                    initial_distance: if distance > f64::EPSILON { distance } else { 1.0 },
                }
            }
            ObjectKind::Image => ResizeStrategy::SignedDelta {
                sensitivity: if sensitivity > 0.0 { sensitivity } else { 1.0 },
                screen_scale: (1.0, 1.0),
            },
        };
        log::debug!("resize: begin {:?}", object.kind);
        Self { kind: object.kind, id: object.id, press, start_scale: object.scale, strategy }
    }

    /// Measure image travel in on-screen pixels, given the ancestor scale
    /// at press. Text resizing is a ratio and ignores it.
    #[must_use]
    pub fn with_screen_scale(mut self, scale: (f64, f64)) -> Self {
        if let ResizeStrategy::SignedDelta { screen_scale, .. } = &mut self.strategy {
            *screen_scale = scale;
        }
        self
    }

    /// Rescale `object` for the pointer at `pointer` (container space).
    pub fn update(
        &self,
        object: &mut TransformableObject,
        pointer: Point,
        container: Size,
        measurer: &dyn TextMeasurer,
    ) {
        if !(pointer.x.is_finite() && pointer.y.is_finite()) {
            return;
        }
        match self.strategy {
            ResizeStrategy::PivotRatio { pivot, initial_distance } => {
                let ratio = pointer.distance(pivot) / initial_distance;
                object.set_scale(self.start_scale * ratio);
                object.offset = Offset::new(pivot.x, pivot.y);
                object.clamp_into(container, measurer);
            }
            ResizeStrategy::SignedDelta { sensitivity, screen_scale } => {
                let dx = (pointer.x - self.press.x) * screen_scale.0;
                let dy = (pointer.y - self.press.y) * screen_scale.1;
                let delta = dx.abs().max(dy.abs());
                let sign = if dx + dy >= 0.0 { 1.0 } else { -1.0 };
                object.set_scale(self.start_scale + sign * delta / sensitivity);
            }
        }
    }
}
