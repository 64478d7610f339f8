//! Flattening: composite the scene onto a raster surface.
//!
//! [`draw_scene`] is the one routine that turns a [`Scene`] into pixels. The
//! live stage and the PNG export both call it, so the exported raster
//! reproduces the on-screen transform chain exactly: each layer is
//! translated to its box center, rotated, and drawn centered on the origin.
//!
//! Draw order, each layer optional:
//!
//! 1. background variant image, stretched to the product viewport;
//! 2. overlay image at its live (scaled) size;
//! 3. text with its effective font, fill color, and uppercase transform.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::Serialize;

use crate::error::EngineError;
use crate::geometry::{Point, Rect, Size};
use crate::object::{ObjectKind, Scene, TextMeasurer};

/// A 2D drawing target. Coordinates are CSS pixels after any `scale`.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    /// # Errors
    /// Fails if the underlying context rejects the transform.
    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), EngineError>;
    /// # Errors
    /// Fails if the underlying context rejects the transform.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), EngineError>;
    /// # Errors
    /// Fails if the underlying context rejects the transform.
    fn rotate(&mut self, radians: f64) -> Result<(), EngineError>;
    fn clear(&mut self, rect: Rect);
    /// Whether an image for `source` is loaded and drawable.
    fn has_image(&self, source: &str) -> bool;
    /// # Errors
    /// Fails if the image cannot be drawn.
    fn draw_image(&mut self, source: &str, rect: Rect) -> Result<(), EngineError>;
    fn set_font(&mut self, font: &str);
    fn set_fill(&mut self, color: &str);
    /// Center text horizontally and vertically on its anchor.
    fn set_text_centered(&mut self);
    /// # Errors
    /// Fails if the context rejects the text.
    fn fill_text(&mut self, text: &str, at: Point) -> Result<(), EngineError>;
    fn fill_rect(&mut self, rect: Rect);
    fn set_stroke(&mut self, color: &str, width: f64);
    /// # Errors
    /// Fails if the context rejects the dash pattern.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), EngineError>;
    fn stroke_rect(&mut self, rect: Rect);
    fn stroke_line(&mut self, from: Point, to: Point);
    /// # Errors
    /// Fails if the arc is invalid.
    fn fill_circle(&mut self, center: Point, radius: f64) -> Result<(), EngineError>;
}

/// Draw background, image, and text in CSS pixels.
///
/// # Errors
///
/// Returns the first surface error encountered.
pub fn draw_scene(surface: &mut dyn Surface, scene: &Scene, measurer: &dyn TextMeasurer) -> Result<(), EngineError> {
    let viewport = Rect::new(0.0, 0.0, scene.product.width, scene.product.height);

    // Layer 1: background.
    match scene.background.as_deref() {
        Some(bg) if surface.has_image(bg) => {
            surface.clear(viewport);
            surface.draw_image(bg, viewport)?;
        }
        _ => surface.clear(viewport),
    }

    // Layer 2: overlay image.
    if let (Some(image), Some(bounds)) = (
        scene.image.as_ref().filter(|i| i.visible),
        scene.product_box(ObjectKind::Image, measurer),
    ) {
        if let Some(content) = image.image().filter(|c| surface.has_image(&c.source)) {
            surface.save();
            centered_on(surface, bounds, image.rotation)?;
            surface.draw_image(&content.source, Rect::centered(Point::default(), bounds.size()))?;
            surface.restore();
        }
    }

    // Layer 3: text.
    if let (Some(text), Some(bounds)) = (
        scene.text.as_ref().filter(|t| t.visible),
        scene.product_box(ObjectKind::Text, measurer),
    ) {
        if let Some(content) = text.text().filter(|c| !c.value.is_empty()) {
            surface.save();
            centered_on(surface, bounds, text.rotation)?;
            surface.set_font(&content.style.font(text.effective_font_px()));
            surface.set_fill(&content.style.color);
            surface.set_text_centered();
            surface.fill_text(&content.display_text(), Point::default())?;
            surface.restore();
        }
    }

    Ok(())
}

fn centered_on(surface: &mut dyn Surface, bounds: Rect, rotation_deg: f64) -> Result<(), EngineError> {
    let c = bounds.center();
    surface.translate(c.x, c.y)?;
    surface.rotate(rotation_deg.to_radians())
}

/// Raster dimensions for an export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPlan {
    /// Product viewport in CSS pixels.
    pub css: Size,
    /// Integer device pixel ratio, at least 1.
    pub dpr: f64,
}

impl ExportPlan {
    #[must_use]
    pub fn new(css: Size, device_pixel_ratio: f64) -> Self {
        let dpr = if device_pixel_ratio.is_finite() { device_pixel_ratio.round().max(1.0) } else { 1.0 };
        Self { css, dpr }
    }

    /// Backing raster size in device pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn raster(&self) -> (u32, u32) {
        (
            (self.css.width * self.dpr).round().max(0.0) as u32,
            (self.css.height * self.dpr).round().max(0.0) as u32,
        )
    }
}

/// Scale `surface` to CSS pixels and flatten the scene onto it.
///
/// # Errors
///
/// Returns the first surface error encountered.
pub fn export_scene(
    surface: &mut dyn Surface,
    scene: &Scene,
    plan: &ExportPlan,
    measurer: &dyn TextMeasurer,
) -> Result<(), EngineError> {
    surface.save();
    surface.scale(plan.dpr, plan.dpr)?;
    draw_scene(surface, scene, measurer)?;
    surface.restore();
    Ok(())
}

/// Local wall-clock time of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// `customizer-YYYY-MM-DD-HH-MM-SS.png`
#[must_use]
pub fn export_filename(ts: Timestamp) -> String {
    format!(
        "customizer-{:04}-{:02}-{:02}-{:02}-{:02}-{:02}.png",
        ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second
    )
}

/// Text style flags in the parameter summary.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleParams {
    pub bold: bool,
    pub italic: bool,
    pub uppercase: bool,
}

/// Text layer in the parameter summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParams {
    pub color: String,
    pub size_px: i64,
    pub rotation_deg: i64,
    pub style: StyleParams,
    pub font_family: String,
    pub value: String,
}

/// Image layer in the parameter summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParams {
    pub size_percent: i64,
    pub rotation_deg: i64,
}

/// Diagnostic summary logged alongside an export. Absent layers are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bag_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageParams>,
}

impl ExportParams {
    /// Summarize `scene`.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let text = scene.text.as_ref().filter(|t| t.visible).and_then(|t| {
            let content = t.text().filter(|c| !c.value.is_empty())?;
            Some(TextParams {
                color: content.style.color.clone(),
                size_px: round(t.effective_font_px()),
                rotation_deg: round(t.rotation),
                style: StyleParams {
                    bold: content.style.bold,
                    italic: content.style.italic,
                    uppercase: content.style.uppercase,
                },
                font_family: content.style.font_family.clone(),
                value: content.value.clone(),
            })
        });
        let image = scene
            .image
            .as_ref()
            .filter(|i| i.visible)
            .map(|i| ImageParams { size_percent: round(i.scale * 100.0), rotation_deg: round(i.rotation) });
        Self {
            bag_color: scene.bag_color.map(|c| c.as_str().to_owned()),
            text,
            image,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round(v: f64) -> i64 {
    v.round() as i64
}
