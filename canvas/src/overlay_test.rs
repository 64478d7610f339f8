#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn layout() -> OverlayLayout {
    OverlayLayout::default()
}

fn frame_around(bounds: Rect) -> SelectionFrame {
    SelectionFrame::new(ObjectKind::Image, Uuid::new_v4(), bounds, &layout())
}

// =============================================================
// SelectionFrame geometry
// =============================================================

#[test]
fn frame_pads_bounds() {
    let f = frame_around(Rect::new(100.0, 100.0, 50.0, 40.0));
    assert_eq!(f.frame, Rect::new(92.0, 92.0, 66.0, 56.0));
}

#[test]
fn handle_sits_on_bottom_right() {
    let f = frame_around(Rect::new(100.0, 100.0, 50.0, 40.0));
    assert_eq!(f.handle, Point::new(158.0, 148.0));
}

#[test]
fn knob_is_centered_above_top_edge() {
    let f = frame_around(Rect::new(100.0, 100.0, 50.0, 40.0));
    assert_eq!(f.knob, Point::new(125.0, 92.0 - 34.0));
    assert_eq!(f.knob_stem(), (Point::new(125.0, 92.0), f.knob));
}

#[test]
fn reposition_updates_in_place() {
    let mut f = frame_around(Rect::new(0.0, 0.0, 10.0, 10.0));
    let id = f.id;
    f.reposition(Rect::new(50.0, 60.0, 10.0, 10.0), &layout());
    assert_eq!(f.id, id);
    assert_eq!(f.frame.x, 42.0);
    assert_eq!(f.knob.y, 52.0 - 34.0);
}

#[test]
fn hit_prefers_handles_over_body() {
    let f = frame_around(Rect::new(100.0, 100.0, 50.0, 40.0));
    assert_eq!(f.hit(f.knob, &layout()), Some(HitPart::RotateKnob));
    assert_eq!(f.hit(Point::new(156.0, 146.0), &layout()), Some(HitPart::ResizeHandle));
    assert_eq!(f.hit(Point::new(95.0, 95.0), &layout()), Some(HitPart::Body));
    assert_eq!(f.hit(Point::new(0.0, 0.0), &layout()), None);
}

// =============================================================
// FrameScheduler
// =============================================================

#[test]
fn scheduler_coalesces_requests() {
    let mut s = FrameScheduler::default();
    assert!(s.request());
    assert!(!s.request());
    assert!(!s.request());
    assert!(s.is_pending());
    assert!(s.run());
    assert!(!s.run());
    assert!(s.request());
}

// =============================================================
// Bus-driven teardown
// =============================================================

fn with_frames(bus: &SelectionBus) -> Affordances {
    let aff = Affordances::attach(bus);
    for kind in [ObjectKind::Text, ObjectKind::Image] {
        aff.with(kind, |o| {
            o.frame = Some(SelectionFrame::new(kind, Uuid::new_v4(), Rect::new(0.0, 0.0, 10.0, 10.0), &layout()));
            o.guides.vertical = Some(1.0);
        });
    }
    aff
}

#[test]
fn announcing_other_kind_tears_down() {
    let bus = SelectionBus::new();
    let aff = with_frames(&bus);
    bus.announce(SelectionKind::Image);
    let text = aff.get(ObjectKind::Text);
    assert!(text.frame.is_none());
    assert!(text.guides.is_empty());
    assert!(aff.get(ObjectKind::Image).frame.is_some());
}

#[test]
fn announcing_none_tears_down_everything() {
    let bus = SelectionBus::new();
    let aff = with_frames(&bus);
    bus.announce(SelectionKind::None);
    assert!(aff.active_frame(SelectionKind::Text).is_none());
    assert!(aff.active_frame(SelectionKind::Image).is_none());
}

#[test]
fn active_frame_belongs_to_selected_kind() {
    let bus = SelectionBus::new();
    let aff = with_frames(&bus);
    // Both overlays still hold a frame; only the selected one counts.
    assert_eq!(aff.active_frame(SelectionKind::Image).map(|f| f.kind), Some(ObjectKind::Image));
    assert_eq!(aff.active_frame(SelectionKind::Text).map(|f| f.kind), Some(ObjectKind::Text));
    assert!(aff.active_frame(SelectionKind::None).is_none());
}

#[test]
fn layout_change_marks_frames_stale() {
    let bus = SelectionBus::new();
    let aff = Affordances::attach(&bus);
    aff.with(ObjectKind::Image, |o| {
        o.frame = Some(SelectionFrame::new(ObjectKind::Image, Uuid::new_v4(), Rect::default(), &layout()));
    });
    bus.notify_layout_changed();
    assert!(aff.get(ObjectKind::Image).stale);
    assert!(!aff.get(ObjectKind::Text).stale, "no frame, nothing to reposition");
}

#[test]
fn dropping_affordances_unsubscribes() {
    let bus = SelectionBus::new();
    let aff = Affordances::attach(&bus);
    assert_eq!(bus.subscriber_count(), 2);
    drop(aff);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn clear_guides_hits_both_kinds() {
    let bus = SelectionBus::new();
    let aff = with_frames(&bus);
    aff.clear_guides();
    assert!(aff.get(ObjectKind::Text).guides.is_empty());
    assert!(aff.get(ObjectKind::Image).guides.is_empty());
    assert!(aff.get(ObjectKind::Text).frame.is_some());
}
