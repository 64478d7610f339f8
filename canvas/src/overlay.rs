//! Selection frame, handles, and snap guides bound to the selected object.
//!
//! Each object kind owns a [`KindOverlay`] that subscribes to the
//! [`SelectionBus`]. When a different kind is announced the overlay drops
//! its frame and guides outright rather than hiding them, so nothing stale
//! can intercept the next pointer-down.
//!
//! While visible, a frame is repositioned in place (never rebuilt) at most
//! once per animation frame. [`FrameScheduler`] coalesces requests.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::bus::{BusEvent, SelectionBus, SelectionKind, Subscription};
use crate::config::EngineConfig;
use crate::consts::HANDLE_HALF_SIZE_PX;
use crate::geometry::{Point, Rect};
use crate::hit::HitPart;
use crate::object::{ObjectId, ObjectKind};
use crate::snap::Guides;

/// Frame and handle dimensions, in product pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub padding: f64,
    pub knob_offset: f64,
    pub knob_half: f64,
    pub handle_half: f64,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl OverlayLayout {
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            padding: config.frame_padding,
            knob_offset: config.knob_offset,
            knob_half: config.knob_half_size,
            handle_half: HANDLE_HALF_SIZE_PX,
        }
    }
}

/// The frame drawn around the selected object.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionFrame {
    pub kind: ObjectKind,
    /// Object the frame was built for.
    pub id: ObjectId,
    /// Object bounds plus padding, in product space.
    pub frame: Rect,
    /// Resize handle center (bottom-right corner).
    pub handle: Point,
    /// Rotate knob center, above the top edge.
    pub knob: Point,
}

impl SelectionFrame {
    /// Build a frame around `bounds` (the object's on-screen bounding box).
    #[must_use]
    pub fn new(kind: ObjectKind, id: ObjectId, bounds: Rect, layout: &OverlayLayout) -> Self {
        let mut frame = Self { kind, id, frame: bounds, handle: Point::default(), knob: Point::default() };
        frame.reposition(bounds, layout);
        frame
    }

    /// Track the object's new bounds.
    pub fn reposition(&mut self, bounds: Rect, layout: &OverlayLayout) {
        self.frame = bounds.inflate(layout.padding);
        self.handle = Point::new(self.frame.right(), self.frame.bottom());
        self.knob = Point::new(self.frame.center().x, self.frame.y - layout.knob_offset);
    }

    /// The line from the frame's top edge up to the knob.
    #[must_use]
    pub fn knob_stem(&self) -> (Point, Point) {
        (Point::new(self.knob.x, self.frame.y), self.knob)
    }

    /// Which part of the frame is under `p`. Handles win over the body.
    #[must_use]
    pub fn hit(&self, p: Point, layout: &OverlayLayout) -> Option<HitPart> {
        if square(self.knob, layout.knob_half).contains(p) {
            return Some(HitPart::RotateKnob);
        }
        if square(self.handle, layout.handle_half).contains(p) {
            return Some(HitPart::ResizeHandle);
        }
        if self.frame.contains(p) {
            return Some(HitPart::Body);
        }
        None
    }
}

fn square(center: Point, half: f64) -> Rect {
    Rect::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
}

/// Coalesces overlay repositioning to one pass per animation frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    /// Ask for a frame. Returns `true` only if the caller must schedule one.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume the pending request. Returns whether one was pending.
    pub fn run(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Visual affordances owned by one object kind.
#[derive(Debug, Clone)]
pub struct KindOverlay {
    pub kind: ObjectKind,
    pub frame: Option<SelectionFrame>,
    pub guides: Guides,
    /// Set by layout notifications; cleared once the frame is repositioned.
    pub stale: bool,
}

impl KindOverlay {
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self { kind, frame: None, guides: Guides::default(), stale: false }
    }

    /// Drop the frame and guides.
    pub fn teardown(&mut self) {
        if self.frame.is_some() {
            log::debug!("overlay: teardown {:?}", self.kind);
        }
        self.frame = None;
        self.guides.clear();
        self.stale = false;
    }

    fn on_bus(&mut self, event: &BusEvent) {
        match *event {
            BusEvent::Selected(kind) if kind != SelectionKind::from(self.kind) => self.teardown(),
            BusEvent::Selected(_) => {}
            BusEvent::LayoutChanged => self.stale = self.frame.is_some(),
        }
    }
}

/// The text and image overlays, each subscribed to the bus.
pub struct Affordances {
    text: Rc<RefCell<KindOverlay>>,
    image: Rc<RefCell<KindOverlay>>,
    _subscriptions: [Subscription; 2],
}

impl std::fmt::Debug for Affordances {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Affordances")
            .field("text", &self.text.borrow())
            .field("image", &self.image.borrow())
            .finish()
    }
}

impl Affordances {
    /// Create both overlays and subscribe them to `bus`.
    #[must_use]
    pub fn attach(bus: &SelectionBus) -> Self {
        let text = Rc::new(RefCell::new(KindOverlay::new(ObjectKind::Text)));
        let image = Rc::new(RefCell::new(KindOverlay::new(ObjectKind::Image)));
        let subscriptions = [subscribe(bus, &text), subscribe(bus, &image)];
        Self { text, image, _subscriptions: subscriptions }
    }

    fn slot(&self, kind: ObjectKind) -> &Rc<RefCell<KindOverlay>> {
        match kind {
            ObjectKind::Text => &self.text,
            ObjectKind::Image => &self.image,
        }
    }

    /// Snapshot of `kind`'s overlay.
    #[must_use]
    pub fn get(&self, kind: ObjectKind) -> KindOverlay {
        self.slot(kind).borrow().clone()
    }

    /// Run `f` against `kind`'s overlay.
    pub fn with<R>(&self, kind: ObjectKind, f: impl FnOnce(&mut KindOverlay) -> R) -> R {
        f(&mut self.slot(kind).borrow_mut())
    }

    /// Frame of the `selected` kind, if it has one. Frames of other kinds
    /// are never returned, even before their teardown lands.
    #[must_use]
    pub fn active_frame(&self, selected: SelectionKind) -> Option<SelectionFrame> {
        let kind = selected.object_kind()?;
        self.slot(kind).borrow().frame.clone()
    }

    /// Hide guides of every kind.
    pub fn clear_guides(&self) {
        for kind in [ObjectKind::Text, ObjectKind::Image] {
            self.with(kind, |o| o.guides.clear());
        }
    }
}

fn subscribe(bus: &SelectionBus, overlay: &Rc<RefCell<KindOverlay>>) -> Subscription {
    let weak = Rc::downgrade(overlay);
    bus.subscribe(move |event| {
        if let Some(overlay) = weak.upgrade() {
            overlay.borrow_mut().on_bus(event);
        }
    })
}
