//! Snap engine: pulls a dragged box onto container edges and midlines.
//!
//! Each axis is handled independently. The candidates, in order, are the
//! box's leading edge to 0, its center to the container midpoint, and its
//! trailing edge to the container extent. The nearest candidate within the
//! threshold wins; ties keep the earlier candidate.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::geometry::{Offset, Rect, Size};

/// Visible guide lines, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Guides {
    /// X of a vertical guide line.
    pub vertical: Option<f64>,
    /// Y of a horizontal guide line.
    pub horizontal: Option<f64>,
}

impl Guides {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Correction and guides produced by one snap pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapResult {
    /// Offset to add to the object so the chosen alignments hold exactly.
    pub delta: Offset,
    pub guides: Guides,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    /// Largest distance, in container pixels, that still snaps.
    pub threshold: f64,
}

impl SnapEngine {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Snap `bounds` against a container of `container` size.
    #[must_use]
    pub fn snap(&self, bounds: Rect, container: Size) -> SnapResult {
        let x = snap_axis(bounds.x, bounds.width, container.width, self.threshold);
        let y = snap_axis(bounds.y, bounds.height, container.height, self.threshold);
        SnapResult {
            delta: Offset::new(x.map_or(0.0, |(_, d)| d), y.map_or(0.0, |(_, d)| d)),
            guides: Guides { vertical: x.map(|(at, _)| at), horizontal: y.map(|(at, _)| at) },
        }
    }
}

/// Best `(target, delta)` for one axis, if any candidate is within `threshold`.
fn snap_axis(start: f64, len: f64, extent: f64, threshold: f64) -> Option<(f64, f64)> {
    let candidates = [(start, 0.0), (start + len / 2.0, extent / 2.0), (start + len, extent)];
    let mut best: Option<(f64, f64)> = None;
    let mut best_dist = f64::INFINITY;
    for (value, target) in candidates {
        let dist = (target - value).abs();
        if dist <= threshold && dist < best_dist {
            best_dist = dist;
            best = Some((target, target - value));
        }
    }
    best
}
