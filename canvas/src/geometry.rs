//! Geometry: points, boxes, and conversions between coordinate spaces.
//!
//! Three spaces are in play:
//!
//! - **viewport**: client pixels as reported by pointer events, relative to
//!   the stage element's bounding rect.
//! - **product**: CSS pixels of the product mockup at layout size. Ancestor
//!   elements may scale the stage visually (a responsive preview), so a
//!   viewport distance must be divided by the ancestor scale to land here.
//! - **container**: product space shifted so the design area's top-left is
//!   the origin. All object offsets, clamps, and snaps live here.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in viewport, product, or container space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self { width: self.width * factor, height: self.height * factor }
    }
}

/// A translation in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    #[must_use]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Whether both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

impl std::ops::Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

/// An axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Box of `size` centered on `center`.
    #[must_use]
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(center.x - size.width / 2.0, center.y - size.height / 2.0, size.width, size.height)
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow the box outward by `pad` on every side.
    #[must_use]
    pub fn inflate(&self, pad: f64) -> Self {
        Self::new(self.x - pad, self.y - pad, self.width + pad * 2.0, self.height + pad * 2.0)
    }

    /// Shift the box by `offset`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether `p` lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when `min > max` the range has
/// collapsed and `min` wins.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value > max {
        if max < min { min } else { max }
    } else if value < min {
        min
    } else {
        value
    }
}

/// Clamp a box origin so a box of `size` stays inside `[0, extent]`.
///
/// When the box is larger than the extent the allowed range collapses to
/// zero and the box is pinned at the origin.
#[must_use]
pub fn clamp_box_origin(origin: Point, size: Size, extent: Size) -> Point {
    Point::new(
        clamp(origin.x, 0.0, (extent.width - size.width).max(0.0)),
        clamp(origin.y, 0.0, (extent.height - size.height).max(0.0)),
    )
}

/// Normalize an angle in degrees into `[-180, 180)`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Angle of the vector from `center` to `p`, in degrees.
#[must_use]
pub fn angle_deg(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x).to_degrees()
}

/// Axis-aligned bounds of a `size` box centered on `center` and rotated by `degrees`.
#[must_use]
pub fn rotated_bounds(center: Point, size: Size, degrees: f64) -> Rect {
    let rad = degrees.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let w = size.width * cos + size.height * sin;
    let h = size.width * sin + size.height * cos;
    Rect::centered(center, Size::new(w, h))
}

/// Compose the CSS transform applied to a positioned image.
///
/// The order is fixed: center on the anchor, translate by the offset, rotate,
/// then scale. Export reproduces the same chain on the raster surface.
#[must_use]
pub fn compose_transform(dx: f64, dy: f64, rotation_deg: f64, scale: f64) -> String {
    format!("translate(-50%, -50%) translate({dx}px, {dy}px) rotate({rotation_deg}deg) scale({scale})")
}

/// Placement of a container inside the stage, plus the stage's visual scale.
///
/// `origin` is the container's top-left in product space. `layout` is the
/// stage's unscaled size and `rendered` its on-screen size; their ratio is
/// the ancestor scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerGeometry {
    pub origin: Point,
    pub layout: Size,
    pub rendered: Size,
}

impl ContainerGeometry {
    /// Unscaled geometry with the container at `origin`.
    #[must_use]
    pub fn unscaled(origin: Point, layout: Size) -> Self {
        Self { origin, layout, rendered: layout }
    }

    /// Per-axis ancestor scale (`rendered / layout`). Degenerate axes scale by 1.
    #[must_use]
    pub fn ancestor_scale(&self) -> (f64, f64) {
        let axis = |rendered: f64, layout: f64| {
            if layout > 0.0 && rendered > 0.0 { rendered / layout } else { 1.0 }
        };
        (axis(self.rendered.width, self.layout.width), axis(self.rendered.height, self.layout.height))
    }

    /// Convert a stage-relative viewport point into container space.
    #[must_use]
    pub fn viewport_to_container(&self, p: Point) -> Point {
        let product = self.viewport_to_product(p);
        Point::new(product.x - self.origin.x, product.y - self.origin.y)
    }

    /// Convert a stage-relative viewport point into product space.
    #[must_use]
    pub fn viewport_to_product(&self, p: Point) -> Point {
        let (sx, sy) = self.ancestor_scale();
        Point::new(p.x / sx, p.y / sy)
    }

    /// Convert a container-space point back to stage-relative viewport pixels.
    #[must_use]
    pub fn container_to_viewport(&self, p: Point) -> Point {
        let (sx, sy) = self.ancestor_scale();
        Point::new((p.x + self.origin.x) * sx, (p.y + self.origin.y) * sy)
    }

    /// Convert a viewport delta into a container delta.
    #[must_use]
    pub fn viewport_delta_to_container(&self, dx: f64, dy: f64) -> Offset {
        let (sx, sy) = self.ancestor_scale();
        Offset::new(dx / sx, dy / sy)
    }
}
