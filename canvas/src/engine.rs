//! Top-level engine: owns the scene, the selection bus, the gesture state,
//! and the overlays, and turns host events into [`Action`]s.
//!
//! [`EngineCore`] holds every piece of logic that does not need a canvas
//! element, so it can be driven from host tests. [`Engine`] wraps it with
//! the stage canvas, its 2D context, and the decoded image cache.
//!
//! Every geometry mutation ends in [`EngineCore::layout_changed`]: the bus
//! marks frames stale, the host is told to resync its controls, and one
//! animation frame is requested. Frames are repositioned in
//! [`EngineCore::frame_tick`], at most once per animation frame.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::assets::{Commit, ObjectUrlLedger};
use crate::bus::{SelectionBus, SelectionKind};
use crate::config::EngineConfig;
use crate::controls::{
    SliderState, StyleToggle, base_font_for_effective, image_percent_to_scale, normalize_hex_color, round_px,
    text_size_control_value,
};
use crate::drag::DragGesture;
use crate::error::EngineError;
use crate::export::{ExportParams, ExportPlan, export_scene};
use crate::geometry::{ContainerGeometry, Point, Rect, Size, rotated_bounds};
use crate::hit::{HitPart, hit_test};
use crate::input::{Button, InputState, Key};
use crate::object::{AverageAdvance, ObjectId, ObjectKind, Scene, TextMeasurer, TextStyle};
use crate::overlay::{Affordances, FrameScheduler, OverlayLayout, SelectionFrame};
use crate::render::{CanvasMeasurer, CanvasSurface, StageView, draw_stage};
use crate::resize::ResizeGesture;
use crate::rotate::{RotateGesture, reset_rotation};
use crate::snap::SnapEngine;
use crate::variant::{BagColor, VariantKey, VariantRequest, VariantSwitcher, View};

const KINDS: [ObjectKind; 2] = [ObjectKind::Text, ObjectKind::Image];

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Schedule one animation frame, then call `frame_tick` and `render`.
    RenderNeeded,
    /// Object geometry changed; resync size controls.
    LayoutChanged,
    SetCursor(String),
    SelectionChanged(SelectionKind),
    /// Load a variant background and report back with its request id.
    LoadBackground(VariantRequest),
    /// Revoke this object URL. It will not be referenced again.
    ReleaseObjectUrl(String),
    /// Suppress page scrolling and text selection while a gesture is active.
    LockPageScroll(bool),
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub scene: Scene,
    pub config: EngineConfig,
    pub bus: SelectionBus,
    pub affordances: Affordances,
    pub input: InputState,
    /// Current values of the text style controls.
    pub text_style: TextStyle,
    /// On-screen size of the stage, for the ancestor scale.
    pub stage_rendered: Size,
    pub dpr: f64,
    layout: OverlayLayout,
    scheduler: FrameScheduler,
    variants: VariantSwitcher,
    assets: ObjectUrlLedger,
    cursor: &'static str,
    measurer: Box<dyn TextMeasurer>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_measurer(config, Box::new(AverageAdvance::default()))
    }

    /// Build a core that measures text with `measurer`.
    #[must_use]
    pub fn with_measurer(config: EngineConfig, measurer: Box<dyn TextMeasurer>) -> Self {
        let bus = SelectionBus::new();
        let affordances = Affordances::attach(&bus);
        let mut scene = Scene::new(config.product_size());
        scene.design_area = Some(scene.variant.view.design_area());
        Self {
            stage_rendered: scene.product,
            scene,
            layout: OverlayLayout::from_config(&config),
            variants: VariantSwitcher::new(config.asset_base.clone()),
            config,
            bus,
            affordances,
            input: InputState::default(),
            text_style: TextStyle::default(),
            dpr: 1.0,
            scheduler: FrameScheduler::default(),
            assets: ObjectUrlLedger::new(),
            cursor: "default",
            measurer,
        }
    }

    /// Text measurer shared by layout, hit-testing, and export.
    #[must_use]
    pub fn measurer(&self) -> &dyn TextMeasurer {
        &*self.measurer
    }

    /// Current stage geometry: container origin plus ancestor scale.
    #[must_use]
    pub fn geometry(&self) -> ContainerGeometry {
        ContainerGeometry {
            origin: self.scene.container_rect().origin(),
            layout: self.scene.product,
            rendered: self.stage_rendered,
        }
    }

    // --- Viewport ---

    /// The stage was laid out again. Hides guides.
    pub fn set_viewport(&mut self, rendered: Size, dpr: f64) -> Vec<Action> {
        self.stage_rendered = rendered;
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.affordances.clear_guides();
        let mut actions = Vec::new();
        self.layout_changed(&mut actions);
        actions
    }

    // --- Pointer input ---

    /// Pointer pressed at `screen_pt` (relative to the stage's client rect).
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let geo = self.geometry();
        let frame = self.affordances.active_frame(self.bus.selected());
        let hit = hit_test(
            geo.viewport_to_product(screen_pt),
            &self.scene,
            frame.as_ref(),
            &self.layout,
            &*self.measurer,
        );
        let Some(hit) = hit else {
            // Click outside every object dismisses the selection.
            return self.deselect();
        };

        let mut actions = self.select(hit.kind);
        let container = self.scene.container();
        let press = geo.viewport_to_container(screen_pt);
        let Some(object) = self.scene.object(hit.kind) else {
            return actions;
        };
        self.input = match hit.part {
            HitPart::Body => InputState::Dragging(DragGesture::begin(object, press)),
            HitPart::ResizeHandle => InputState::Resizing(
                ResizeGesture::begin(object, press, container, self.config.resize_sensitivity, &*self.measurer)
                    .with_screen_scale(geo.ancestor_scale()),
            ),
            HitPart::RotateKnob => {
                let center = object.live_box(container, &*self.measurer).center();
                InputState::Rotating(RotateGesture::begin(object, center, press))
            }
        };
        actions.push(Action::LockPageScroll(true));
        self.set_cursor(cursor_for(Some(hit.part), true), &mut actions);
        actions
    }

    /// Pointer moved. Drives the active gesture, or updates the hover cursor.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some((kind, id)) = self.input.target() else {
            self.hover(screen_pt, &mut actions);
            return actions;
        };

        let pointer = self.geometry().viewport_to_container(screen_pt);
        let container = self.scene.container();
        let snap = self.snap_engine(kind);
        let Some(object) = self.scene.live_mut(kind, id).filter(|o| o.visible) else {
            log::debug!("gesture: target {kind:?} vanished, back to idle");
            return self.end_gesture();
        };
        let measurer = &*self.measurer;

        match &self.input {
            InputState::Dragging(g) => {
                let guides = g.update(object, pointer, container, &snap, measurer);
                self.affordances.with(kind, |o| o.guides = guides);
            }
            InputState::Resizing(g) => g.update(object, pointer, container, measurer),
            InputState::Rotating(g) => g.update(object, pointer),
            InputState::Idle => {}
        }
        self.layout_changed(&mut actions);
        actions
    }

    /// Pointer released.
    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = self.end_gesture();
        self.hover(screen_pt, &mut actions);
        actions
    }

    /// Pointer capture lost or the gesture was cancelled by the platform.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    /// Double activation: on the rotate knob, resets rotation to upright.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let frame = self.affordances.active_frame(self.bus.selected());
        let p = self.geometry().viewport_to_product(screen_pt);
        let Some(hit) = hit_test(p, &self.scene, frame.as_ref(), &self.layout, &*self.measurer) else {
            return Vec::new();
        };
        if hit.part != HitPart::RotateKnob {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if let Some(object) = self.scene.object_mut(hit.kind) {
            reset_rotation(object);
            log::debug!("rotate: reset {:?}", hit.kind);
            self.layout_changed(&mut actions);
        }
        actions
    }

    /// Key pressed while the stage has focus.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if !key.is_escape() {
            return Vec::new();
        }
        let mut actions = self.end_gesture();
        actions.extend(self.deselect());
        actions
    }

    fn end_gesture(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some((kind, _)) = self.input.target() {
            log::debug!("gesture: end {kind:?}");
            actions.push(Action::LockPageScroll(false));
        }
        self.input = InputState::Idle;
        self.affordances.clear_guides();
        self.request_render(&mut actions);
        actions
    }

    fn hover(&mut self, screen_pt: Point, actions: &mut Vec<Action>) {
        let frame = self.affordances.active_frame(self.bus.selected());
        let p = self.geometry().viewport_to_product(screen_pt);
        let hit = hit_test(p, &self.scene, frame.as_ref(), &self.layout, &*self.measurer);
        self.set_cursor(cursor_for(hit.map(|h| h.part), false), actions);
    }

    fn set_cursor(&mut self, cursor: &'static str, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor.to_owned()));
        }
    }

    fn snap_engine(&self, kind: ObjectKind) -> SnapEngine {
        SnapEngine::new(match kind {
            ObjectKind::Text => self.config.text_snap_threshold,
            ObjectKind::Image => self.config.image_snap_threshold,
        })
    }

    // --- Selection ---

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> SelectionKind {
        self.bus.selected()
    }

    /// Make `kind` the sole selection and build its frame.
    pub fn select(&mut self, kind: ObjectKind) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.scene.is_shown(kind) {
            return actions;
        }
        let selected = SelectionKind::from(kind);
        if self.bus.selected() != selected {
            self.bus.announce(selected);
            actions.push(Action::SelectionChanged(selected));
        }
        if let Some((id, bounds)) = self.frame_bounds(kind) {
            let layout = self.layout;
            self.affordances.with(kind, |o| {
                if o.frame.as_ref().is_none_or(|f| f.id != id) {
                    o.frame = Some(SelectionFrame::new(kind, id, bounds, &layout));
                }
            });
        }
        self.request_render(&mut actions);
        actions
    }

    /// Drop the selection and every frame.
    pub fn deselect(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.bus.selected() != SelectionKind::None {
            self.bus.announce(SelectionKind::None);
            actions.push(Action::SelectionChanged(SelectionKind::None));
        }
        self.request_render(&mut actions);
        actions
    }

    /// Id and on-screen bounding box of a shown object, in product space.
    fn frame_bounds(&self, kind: ObjectKind) -> Option<(ObjectId, Rect)> {
        let object = self.scene.object(kind).filter(|o| o.visible)?;
        let live = self.scene.product_box(kind, &*self.measurer)?;
        Some((object.id, rotated_bounds(live.center(), live.size(), object.rotation)))
    }

    // --- Frame scheduling ---

    /// Announce a geometry change and request a frame.
    pub fn layout_changed(&mut self, actions: &mut Vec<Action>) {
        self.bus.notify_layout_changed();
        actions.push(Action::LayoutChanged);
        self.request_render(actions);
    }

    fn request_render(&mut self, actions: &mut Vec<Action>) {
        if self.scheduler.request() {
            actions.push(Action::RenderNeeded);
        }
    }

    /// Animation frame callback: reposition stale frames in place and drop
    /// frames whose object is gone. Returns whether a frame was pending.
    pub fn frame_tick(&mut self) -> bool {
        if !self.scheduler.run() {
            return false;
        }
        let layout = self.layout;
        for kind in KINDS {
            let bounds = self.frame_bounds(kind);
            self.affordances.with(kind, |o| {
                match bounds {
                    Some((id, b)) if o.frame.as_ref().is_some_and(|f| f.id == id) => {
                        if let Some(frame) = o.frame.as_mut().filter(|_| o.stale) {
                            frame.reposition(b, &layout);
                        }
                    }
                    _ if o.frame.is_some() => o.teardown(),
                    _ => {}
                }
                o.stale = false;
            });
        }
        true
    }

    /// Frame of the selected object, if any.
    #[must_use]
    pub fn active_frame(&self) -> Option<SelectionFrame> {
        self.affordances.active_frame(self.bus.selected())
    }

    // --- Text controls ---

    /// Text input changed.
    pub fn set_text_value(&mut self, raw: &str) -> Vec<Action> {
        let visible = self.scene.set_text_value(raw, &self.text_style, &*self.measurer);
        let mut actions = Vec::new();
        if visible {
            self.clamp_text();
        } else if self.bus.selected() == SelectionKind::Text {
            actions.extend(self.deselect());
        }
        self.layout_changed(&mut actions);
        actions
    }

    /// Font family select changed. Blank input is ignored.
    pub fn set_font_family(&mut self, family: &str) -> Vec<Action> {
        let family = family.trim();
        if family.is_empty() {
            return Vec::new();
        }
        self.update_text_style(|style| style.font_family = family.to_owned())
    }

    /// Color picker changed. Unparseable input keeps the current color.
    pub fn set_text_color(&mut self, raw: &str) -> Vec<Action> {
        let color = normalize_hex_color(raw, &self.text_style.color);
        self.update_text_style(|style| style.color = color.clone())
    }

    /// A style button was activated.
    pub fn toggle_style(&mut self, toggle: StyleToggle) -> Vec<Action> {
        let pressed = toggle.apply(&mut self.text_style);
        self.update_text_style(|style| match toggle {
            StyleToggle::Bold => style.bold = pressed,
            StyleToggle::Italic => style.italic = pressed,
            StyleToggle::Uppercase => style.uppercase = pressed,
        })
    }

    /// Text size control changed. `effective_px` is the on-screen font size,
    /// so the base size absorbs the current resize scale.
    pub fn set_text_size(&mut self, effective_px: f64) -> Vec<Action> {
        let scale = self.scene.text.as_ref().map_or(1.0, |t| t.scale);
        let base = base_font_for_effective(effective_px, scale);
        self.update_text_style(|style| style.base_font_px = base)
    }

    /// Value for the text size control: the effective font size.
    #[must_use]
    pub fn text_size_value(&self) -> u32 {
        match self.scene.text.as_ref() {
            Some(text) => text_size_control_value(text),
            None => round_px(self.text_style.base_font_px),
        }
    }

    fn update_text_style(&mut self, mut edit: impl FnMut(&mut TextStyle)) -> Vec<Action> {
        edit(&mut self.text_style);
        if let Some(content) = self.scene.text.as_mut().and_then(|t| t.text_mut()) {
            edit(&mut content.style);
        }
        self.clamp_text();
        let mut actions = Vec::new();
        self.layout_changed(&mut actions);
        actions
    }

    fn clamp_text(&mut self) {
        let container = self.scene.container();
        if let Some(text) = self.scene.text.as_mut().filter(|t| t.visible) {
            text.clamp_into(container, &*self.measurer);
        }
    }

    // --- Image lifecycle ---

    /// A file was chosen and turned into `url`. The current image stays up
    /// until the new one decodes.
    pub fn begin_image_upload(&mut self, url: &str) -> Vec<Action> {
        log::debug!("image: uploading {url}");
        self.assets.stage(url).into_iter().map(Action::ReleaseObjectUrl).collect()
    }

    /// `url` decoded with `natural` pixel dimensions.
    pub fn on_image_loaded(&mut self, url: &str, natural: Size) -> Vec<Action> {
        let released = match self.assets.commit(url) {
            Commit::Stale => return Vec::new(),
            Commit::Applied { released } => released,
        };
        self.scene.place_image(url.to_owned(), natural, &*self.measurer);
        let mut actions: Vec<Action> = released.into_iter().map(Action::ReleaseObjectUrl).collect();
        actions.extend(self.select(ObjectKind::Image));
        self.layout_changed(&mut actions);
        actions
    }

    /// `url` failed to load. The image layer is dropped.
    pub fn on_image_failed(&mut self, url: &str, reason: &str) -> Vec<Action> {
        let released = self.assets.fail(url);
        if released.is_empty() {
            return Vec::new();
        }
        log::error!("{}", EngineError::ResourceLoad { url: url.to_owned(), reason: reason.to_owned() });
        let mut actions = self.remove_image();
        actions.extend(released.into_iter().map(Action::ReleaseObjectUrl));
        actions
    }

    /// Delete button pressed. An upload still decoding is dropped with it.
    pub fn delete_image(&mut self) -> Vec<Action> {
        let mut actions = self.remove_image();
        actions.extend(self.assets.drain().into_iter().map(Action::ReleaseObjectUrl));
        actions
    }

    fn remove_image(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.scene.remove_image().is_none() {
            return actions;
        }
        if self.input.target().is_some_and(|(kind, _)| kind == ObjectKind::Image) {
            actions.extend(self.end_gesture());
        }
        if self.bus.selected() == SelectionKind::Image {
            actions.extend(self.deselect());
        }
        self.affordances.with(ObjectKind::Image, |o| o.teardown());
        self.layout_changed(&mut actions);
        actions
    }

    /// Image size slider moved. Scales about the image center.
    pub fn set_image_size_percent(&mut self, percent: f64) -> Vec<Action> {
        let Some(image) = self.scene.image.as_mut() else {
            return Vec::new();
        };
        image.set_scale(image_percent_to_scale(percent));
        let mut actions = Vec::new();
        self.layout_changed(&mut actions);
        actions
    }

    /// State of the image size slider.
    #[must_use]
    pub fn image_slider(&self) -> SliderState {
        SliderState::for_image(self.scene.image.as_ref())
    }

    // --- Variants ---

    pub fn set_color(&mut self, color: BagColor) -> Vec<Action> {
        self.scene.bag_color = Some(color);
        let key = VariantKey { color, ..self.scene.variant.clone() };
        self.request_variant(key)
    }

    pub fn set_strap(&mut self, strap: &str) -> Vec<Action> {
        let strap = strap.trim();
        if strap.is_empty() {
            return Vec::new();
        }
        let key = VariantKey { strap: strap.to_owned(), ..self.scene.variant.clone() };
        self.request_variant(key)
    }

    /// Switch view. The print area follows the view, so objects are clamped into it.
    pub fn set_view(&mut self, view: View) -> Vec<Action> {
        let key = VariantKey { view, ..self.scene.variant.clone() };
        let mut actions = self.request_variant(key);
        self.scene.design_area = Some(view.design_area());
        let container = self.scene.container();
        for kind in KINDS {
            if let Some(object) = self.scene.object_mut(kind).filter(|o| o.visible) {
                object.clamp_into(container, &*self.measurer);
            }
        }
        self.layout_changed(&mut actions);
        actions
    }

    /// First variant shown at mount. `swatch_color` is the page's selected
    /// color swatch, or `None` when the page offers no color choice.
    pub fn start_variant(&mut self, key: VariantKey, swatch_color: Option<BagColor>) -> Vec<Action> {
        self.scene.bag_color = swatch_color;
        self.request_variant(key)
    }

    /// Start loading the background for `key`, superseding earlier loads.
    pub fn request_variant(&mut self, key: VariantKey) -> Vec<Action> {
        let request = self.variants.request(key.clone());
        log::debug!("variant: request {} -> {}", request.id, request.url);
        self.scene.variant = key;
        vec![Action::LoadBackground(request)]
    }

    /// A background load finished. Only the latest request applies.
    pub fn on_background_loaded(&mut self, id: u64, result: Result<String, EngineError>) -> Vec<Action> {
        let Some(result) = self.variants.complete(id, result) else {
            return Vec::new();
        };
        match result {
            Ok(url) => self.scene.background = Some(url),
            Err(err) => {
                log::error!("{err}");
                self.scene.background = None;
            }
        }
        let mut actions = Vec::new();
        self.request_render(&mut actions);
        actions
    }

    // --- Export / teardown ---

    /// Parameter summary of the current scene.
    #[must_use]
    pub fn export_params(&self) -> ExportParams {
        ExportParams::from_scene(&self.scene)
    }

    /// Page teardown: every object URL still held.
    pub fn teardown(&mut self) -> Vec<Action> {
        self.assets.drain().into_iter().map(Action::ReleaseObjectUrl).collect()
    }
}

fn cursor_for(part: Option<HitPart>, active: bool) -> &'static str {
    match (part, active) {
        (Some(HitPart::Body), _) => "move",
        (Some(HitPart::ResizeHandle), _) => "nwse-resize",
        (Some(HitPart::RotateKnob), true) => "grabbing",
        (Some(HitPart::RotateKnob), false) => "grab",
        (None, _) => "default",
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given stage canvas.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoContext`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: EngineConfig) -> Result<Self, EngineError> {
        let ctx = context_2d(&canvas)?;
        let core = EngineCore::with_measurer(config, Box::new(CanvasMeasurer::new(ctx.clone())));
        Ok(Self { canvas, ctx, images: HashMap::new(), core })
    }

    /// Resize the backing store to `rendered × dpr` and update the core.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, rendered: Size, dpr: f64) -> Vec<Action> {
        let actions = self.core.set_viewport(rendered, dpr);
        self.canvas.set_width((rendered.width * self.core.dpr).round().max(1.0) as u32);
        self.canvas.set_height((rendered.height * self.core.dpr).round().max(1.0) as u32);
        actions
    }

    /// Register a decoded image under `url`.
    pub fn insert_image(&mut self, url: &str, image: HtmlImageElement) {
        self.images.insert(url.to_owned(), image);
    }

    /// Whether `url` already has a decoded image.
    #[must_use]
    pub fn has_image(&self, url: &str) -> bool {
        self.images.contains_key(url)
    }

    /// Forget the image for a released URL.
    pub fn evict_image(&mut self, url: &str) {
        self.images.remove(url);
    }

    /// Animation frame: reposition frames, then draw the stage.
    ///
    /// # Errors
    ///
    /// Returns the first 2D context error.
    pub fn render(&mut self) -> Result<(), EngineError> {
        self.core.frame_tick();
        let frame = self.core.active_frame();
        let guides = frame
            .as_ref()
            .map(|f| self.core.affordances.get(f.kind).guides)
            .unwrap_or_default();
        let view = StageView {
            scene: &self.core.scene,
            frame: frame.as_ref(),
            guides,
            geometry: self.core.geometry(),
            dpr: self.core.dpr,
            layout: OverlayLayout::from_config(&self.core.config),
        };
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        let mut surface = CanvasSurface::new(&self.ctx, &self.images);
        draw_stage(&mut surface, &view, self.core.measurer())
    }

    /// Flatten the scene into `target` and encode it as a PNG data URL.
    ///
    /// # Errors
    ///
    /// Fails if `target` has no 2D context or encoding fails.
    pub fn export_png(
        &self,
        target: &HtmlCanvasElement,
        device_pixel_ratio: f64,
    ) -> Result<(String, ExportParams), EngineError> {
        let plan = ExportPlan::new(self.core.scene.product, device_pixel_ratio);
        let (width, height) = plan.raster();
        target.set_width(width);
        target.set_height(height);
        let ctx = context_2d(target)?;
        let mut surface = CanvasSurface::new(&ctx, &self.images);
        export_scene(&mut surface, &self.core.scene, &plan, self.core.measurer())?;
        let data_url = target.to_data_url_with_type("image/png")?;
        Ok((data_url, self.core.export_params()))
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, EngineError> {
    canvas
        .get_context("2d")?
        .ok_or(EngineError::NoContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| EngineError::NoContext)
}
