//! Rendering: the live stage and the browser-backed [`Surface`].
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! [`draw_stage`] is generic over [`Surface`]: it composites the scene with
//! [`draw_scene`] (the same routine the export uses) and then paints the
//! editing affordances on top. It receives read-only views of engine state
//! and never mutates it.
//!
//! The stage canvas is sized to the product's *rendered* box, so drawing is
//! scaled by the ancestor scale as well as the device pixel ratio. Frames and
//! guides are laid out in product space and therefore never drift from the
//! objects they decorate.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::error::EngineError;
use crate::export::{Surface, draw_scene};
use crate::geometry::{ContainerGeometry, Point, Rect};
use crate::object::{AverageAdvance, Scene, TextMeasurer};
use crate::overlay::{OverlayLayout, SelectionFrame};
use crate::snap::Guides;

/// Selection dash segment length in product pixels.
const SELECTION_DASH_PX: f64 = 4.0;

const SELECTION_COLOR: &str = "#1E90FF";
const GUIDE_COLOR: &str = "rgba(110, 168, 254, 0.9)";
const PRINT_AREA_COLOR: &str = "#00AEEF";
const PRINT_AREA_DASH_PX: f64 = 6.0;

/// Read-only view of everything the stage paints.
#[derive(Debug, Clone, Copy)]
pub struct StageView<'a> {
    pub scene: &'a Scene,
    /// Frame of the selected object, if any.
    pub frame: Option<&'a SelectionFrame>,
    /// Guides of the object being dragged, in container space.
    pub guides: Guides,
    pub geometry: ContainerGeometry,
    pub dpr: f64,
    pub layout: OverlayLayout,
}

/// Draw the full stage: scene, print-area outline, guides, and frame.
///
/// # Errors
///
/// Returns the first surface error encountered.
pub fn draw_stage(
    surface: &mut dyn Surface,
    view: &StageView<'_>,
    measurer: &dyn TextMeasurer,
) -> Result<(), EngineError> {
    let (sx, sy) = view.geometry.ancestor_scale();
    let dpr = if view.dpr.is_finite() && view.dpr > 0.0 { view.dpr } else { 1.0 };

    surface.save();
    surface.scale(dpr * sx, dpr * sy)?;

    // Layer 1: the flattened scene.
    draw_scene(surface, view.scene, measurer)?;

    // Layer 2: print area outline (preview only, never exported).
    if let Some(area) = view.scene.design_area {
        draw_print_area(surface, area)?;
    }

    // Layer 3: snap guides.
    draw_guides(surface, view.scene.container_rect(), view.guides)?;

    // Layer 4: selection frame and handles.
    if let Some(frame) = view.frame {
        draw_frame(surface, frame, &view.layout)?;
    }

    surface.restore();
    Ok(())
}

// =============================================================
// Affordances
// =============================================================

fn draw_print_area(surface: &mut dyn Surface, area: Rect) -> Result<(), EngineError> {
    surface.save();
    surface.set_stroke(PRINT_AREA_COLOR, 1.0);
    surface.set_line_dash(&[PRINT_AREA_DASH_PX, PRINT_AREA_DASH_PX])?;
    surface.stroke_rect(area);
    surface.restore();
    Ok(())
}

fn draw_guides(surface: &mut dyn Surface, container: Rect, guides: Guides) -> Result<(), EngineError> {
    if guides.is_empty() {
        return Ok(());
    }
    surface.save();
    surface.set_stroke(GUIDE_COLOR, 1.0);
    surface.set_line_dash(&[])?;
    if let Some(x) = guides.vertical {
        let x = container.x + x;
        surface.stroke_line(Point::new(x, container.y), Point::new(x, container.bottom()));
    }
    if let Some(y) = guides.horizontal {
        let y = container.y + y;
        surface.stroke_line(Point::new(container.x, y), Point::new(container.right(), y));
    }
    surface.restore();
    Ok(())
}

fn draw_frame(surface: &mut dyn Surface, frame: &SelectionFrame, layout: &OverlayLayout) -> Result<(), EngineError> {
    surface.save();

    // Dashed frame.
    surface.set_stroke(SELECTION_COLOR, 1.0);
    surface.set_line_dash(&[SELECTION_DASH_PX, SELECTION_DASH_PX])?;
    surface.stroke_rect(frame.frame);
    surface.set_line_dash(&[])?;

    // Resize handle.
    let half = layout.handle_half;
    let handle = Rect::new(frame.handle.x - half, frame.handle.y - half, half * 2.0, half * 2.0);
    surface.set_fill("#fff");
    surface.fill_rect(handle);
    surface.stroke_rect(handle);

    // Rotate knob on its stem.
    let (from, to) = frame.knob_stem();
    surface.stroke_line(from, to);
    surface.set_fill(SELECTION_COLOR);
    surface.fill_circle(frame.knob, layout.knob_half)?;

    surface.restore();
    Ok(())
}

// =============================================================
// Browser surface
// =============================================================

/// [`Surface`] over a 2D context. Images are looked up by URL in `images`.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    images: &'a HashMap<String, HtmlImageElement>,
}

impl<'a> CanvasSurface<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d, images: &'a HashMap<String, HtmlImageElement>) -> Self {
        Self { ctx, images }
    }

    fn decoded(&self, source: &str) -> Option<&HtmlImageElement> {
        self.images.get(source).filter(|img| img.complete() && img.natural_width() > 0)
    }
}

impl Surface for CanvasSurface<'_> {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), EngineError> {
        Ok(self.ctx.scale(sx, sy)?)
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), EngineError> {
        Ok(self.ctx.translate(x, y)?)
    }

    fn rotate(&mut self, radians: f64) -> Result<(), EngineError> {
        Ok(self.ctx.rotate(radians)?)
    }

    fn clear(&mut self, rect: Rect) {
        self.ctx.clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn has_image(&self, source: &str) -> bool {
        self.decoded(source).is_some()
    }

    fn draw_image(&mut self, source: &str, rect: Rect) -> Result<(), EngineError> {
        let Some(img) = self.decoded(source) else {
            return Ok(());
        };
        Ok(self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(img, rect.x, rect.y, rect.width, rect.height)?)
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_text_centered(&mut self) {
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
    }

    fn fill_text(&mut self, text: &str, at: Point) -> Result<(), EngineError> {
        Ok(self.ctx.fill_text(text, at.x, at.y)?)
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), EngineError> {
        let dash = js_sys::Array::new();
        for s in segments {
            dash.push(&(*s).into());
        }
        Ok(self.ctx.set_line_dash(&dash)?)
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke_line(&mut self, from: Point, to: Point) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Point, radius: f64) -> Result<(), EngineError> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI)?;
        self.ctx.fill();
        Ok(())
    }
}

/// Measures text with the stage's 2D context.
pub struct CanvasMeasurer {
    ctx: CanvasRenderingContext2d,
    fallback: AverageAdvance,
}

impl CanvasMeasurer {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, fallback: AverageAdvance::default() }
    }
}

impl TextMeasurer for CanvasMeasurer {
    fn text_width(&self, text: &str, font: &str) -> f64 {
        self.ctx.save();
        self.ctx.set_font(font);
        let width = match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => self.fallback.text_width(text, font),
        };
        self.ctx.restore();
        width
    }
}
