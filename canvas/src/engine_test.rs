#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::Offset;

// =============================================================
// Helpers
// =============================================================

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Default core: 800x500 product, front print area at (280, 200) 210x230.
fn core() -> EngineCore {
    EngineCore::default()
}

fn core_with_image() -> EngineCore {
    let mut core = core();
    core.begin_image_upload("blob:1");
    core.on_image_loaded("blob:1", Size::new(100.0, 40.0));
    core.on_pointer_up(pt(0.0, 0.0));
    core.frame_tick();
    core
}

fn core_with_text(value: &str) -> EngineCore {
    let mut core = core();
    core.set_text_value(value);
    core.frame_tick();
    core
}

fn product_box(core: &EngineCore, kind: ObjectKind) -> Rect {
    core.scene.product_box(kind, core.measurer()).unwrap()
}

fn container_box(core: &EngineCore, kind: ObjectKind) -> Rect {
    let object = core.scene.object(kind).unwrap();
    object.constraint_box(core.scene.container(), core.measurer())
}

fn press(core: &mut EngineCore, p: Point) -> Vec<Action> {
    core.on_pointer_down(p, Button::Primary)
}

fn drag(core: &mut EngineCore, from: Point, to: Point) -> Vec<Action> {
    press(core, from);
    core.on_pointer_move(to)
}

fn load_request(actions: &[Action]) -> VariantRequest {
    actions
        .iter()
        .find_map(|a| match a {
            Action::LoadBackground(r) => Some(r.clone()),
            _ => None,
        })
        .unwrap()
}

fn released(actions: &[Action]) -> Vec<String> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::ReleaseObjectUrl(url) => Some(url.clone()),
            _ => None,
        })
        .collect()
}

fn assert_within_container(core: &EngineCore, kind: ObjectKind) {
    let b = container_box(core, kind);
    let c = core.scene.container();
    let fits_x = b.width <= c.width;
    let fits_y = b.height <= c.height;
    assert!(b.x >= -EPSILON, "left edge {b:?}");
    assert!(b.y >= -EPSILON, "top edge {b:?}");
    assert!(!fits_x || b.right() <= c.width + EPSILON, "right edge {b:?}");
    assert!(!fits_y || b.bottom() <= c.height + EPSILON, "bottom edge {b:?}");
}

// =============================================================
// Typing text
// =============================================================

#[test]
fn typing_shows_and_centers_text() {
    let mut core = core();
    core.set_text_color("#FF0000");
    core.set_font_family("Georgia, serif");
    let actions = core.set_text_value("HELLO");
    assert!(actions.contains(&Action::LayoutChanged));

    let text = core.scene.text.as_ref().unwrap();
    assert!(text.visible);
    let content = text.text().unwrap();
    assert_eq!(content.value, "HELLO");
    assert_eq!(content.style.color, "#ff0000");
    assert_eq!(content.style.font_family, "Georgia, serif");
    assert_eq!(text.effective_font_px(), 32.0);

    // 5 glyphs * 32px * 0.6 = 96 wide, 38.4 tall, centered in 210x230.
    assert!(approx_eq(text.offset.dx, 57.0));
    assert!(approx_eq(text.offset.dy, 95.8));
}

#[test]
fn typing_trims_input() {
    let mut core = core();
    core.set_text_value("  HI  ");
    assert_eq!(core.scene.text.as_ref().unwrap().text().unwrap().value, "HI");
}

#[test]
fn later_edits_keep_position() {
    let mut core = core_with_text("HELLO");
    let before = core.scene.text.as_ref().unwrap().offset;
    core.set_text_value("HELLO!");
    assert_eq!(core.scene.text.as_ref().unwrap().offset, before);
}

#[test]
fn clearing_text_hides_and_rearms_centering() {
    let mut core = core_with_text("HELLO");
    core.select(ObjectKind::Text);
    core.scene.text.as_mut().unwrap().offset = Offset::new(0.0, 0.0);

    let actions = core.set_text_value("   ");
    assert!(actions.contains(&Action::SelectionChanged(SelectionKind::None)));
    let text = core.scene.text.as_ref().unwrap();
    assert!(!text.visible);
    assert!(!text.has_placed_once);

    core.set_text_value("HELLO");
    assert!(approx_eq(core.scene.text.as_ref().unwrap().offset.dx, 57.0));
}

// =============================================================
// Drag snaps to the left edge
// =============================================================

#[test]
fn drag_near_left_edge_snaps_to_zero() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    // Image box starts at container x = 55; move it to x = 7.
    drag(&mut core, center, pt(center.x - 48.0, center.y));

    let guides = core.affordances.get(ObjectKind::Image).guides;
    assert_eq!(guides.vertical, Some(0.0));
    assert_eq!(container_box(&core, ObjectKind::Image).x, 0.0);
    assert_eq!(product_box(&core, ObjectKind::Image).x, 280.0);

    core.on_pointer_up(pt(center.x - 48.0, center.y));
    assert!(core.affordances.get(ObjectKind::Image).guides.is_empty());
    assert!(!core.input.is_active());
}

#[test]
fn drag_away_from_targets_moves_exactly() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    drag(&mut core, center, pt(center.x + 20.0, center.y + 30.0));
    let image = core.scene.image.as_ref().unwrap();
    assert_eq!(image.offset, Offset::new(20.0, 30.0));
    assert_eq!(core.affordances.get(ObjectKind::Image).guides.vertical, None);
}

#[test]
fn drag_converts_through_ancestor_scale() {
    let mut core = core_with_image();
    core.set_viewport(Size::new(400.0, 250.0), 1.0);
    let center = product_box(&core, ObjectKind::Image).center();
    let screen = pt(center.x / 2.0, center.y / 2.0);
    drag(&mut core, screen, pt(screen.x + 10.0, screen.y));
    assert_eq!(core.scene.image.as_ref().unwrap().offset.dx, 20.0);
}

#[test]
fn drag_never_leaves_container() {
    for delta in [(-5000.0, 0.0), (5000.0, 5000.0), (0.0, -5000.0), (123.4, -987.6), (-77.7, 9999.0)] {
        let mut core = core_with_image();
        let center = product_box(&core, ObjectKind::Image).center();
        drag(&mut core, center, pt(center.x + delta.0, center.y + delta.1));
        assert_within_container(&core, ObjectKind::Image);
    }
}

#[test]
fn rotated_image_is_clamped_by_its_rotated_bounds() {
    let mut core = core_with_image();
    core.scene.image.as_mut().unwrap().set_rotation(45.0);
    core.frame_tick();
    let center = product_box(&core, ObjectKind::Image).center();
    drag(&mut core, center, pt(center.x + 5000.0, center.y));
    let b = container_box(&core, ObjectKind::Image);
    assert!(approx_eq(b.right(), core.scene.container().width));
}

#[test]
fn text_drag_is_clamped() {
    let mut core = core_with_text("HELLO");
    let center = product_box(&core, ObjectKind::Text).center();
    drag(&mut core, center, pt(center.x - 5000.0, center.y + 5000.0));
    assert_within_container(&core, ObjectKind::Text);
    let text = core.scene.text.as_ref().unwrap();
    assert_eq!(text.offset.dx, 0.0);
}

#[test]
fn press_locks_and_release_unlocks_page_scroll() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    assert!(press(&mut core, center).contains(&Action::LockPageScroll(true)));
    assert!(core.on_pointer_up(center).contains(&Action::LockPageScroll(false)));
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    assert!(core.on_pointer_down(center, Button::Secondary).is_empty());
    assert!(!core.input.is_active());
}

// =============================================================
// Image size slider
// =============================================================

#[test]
fn slider_scales_image() {
    let mut core = core_with_image();
    let actions = core.set_image_size_percent(150.0);
    assert!(actions.contains(&Action::LayoutChanged));
    let image = core.scene.image.as_ref().unwrap();
    assert_eq!(image.scale, 1.5);
    assert_eq!(product_box(&core, ObjectKind::Image).width, 150.0);
    assert_eq!(core.image_slider(), SliderState { value: 150, disabled: false });
}

#[test]
fn slider_clamps_out_of_range() {
    let mut core = core_with_image();
    core.set_image_size_percent(1000.0);
    assert_eq!(core.scene.image.as_ref().unwrap().scale, 2.0);
    core.set_image_size_percent(f64::NAN);
    assert_eq!(core.scene.image.as_ref().unwrap().scale, 1.0);
}

#[test]
fn slider_without_image_is_disabled() {
    let mut core = core();
    assert!(core.set_image_size_percent(150.0).is_empty());
    assert_eq!(core.image_slider(), SliderState { value: 100, disabled: true });
}

// =============================================================
// Export summary
// =============================================================

#[test]
fn export_params_without_image() {
    let mut core = core_with_text("SALE");
    core.set_text_color("#ff3366");
    core.scene.text.as_mut().unwrap().set_rotation(30.0);
    let requested = load_request(&core.set_color(BagColor::Red));
    core.on_background_loaded(requested.id, Ok(requested.url));

    let json = serde_json::to_value(core.export_params()).unwrap();
    assert_eq!(json["bagColor"], "red");
    assert_eq!(json["text"]["value"], "SALE");
    assert_eq!(json["text"]["color"], "#ff3366");
    assert_eq!(json["text"]["rotationDeg"], 30);
    assert!(json.get("image").is_none());
}

// =============================================================
// Resize
// =============================================================

fn press_handle(core: &mut EngineCore, kind: ObjectKind) {
    core.select(kind);
    let frame = core.active_frame().unwrap();
    assert_eq!(frame.kind, kind);
    press(core, frame.handle);
    assert!(matches!(core.input, InputState::Resizing(_)));
}

#[test]
fn text_resize_scale_is_bounded() {
    let mut core = core_with_text("HELLO");
    let pivot = product_box(&core, ObjectKind::Text).origin();
    press_handle(&mut core, ObjectKind::Text);
    core.on_pointer_move(pt(5000.0, 5000.0));
    assert_eq!(core.scene.text.as_ref().unwrap().scale, 6.0);

    // The pivot is fixed at press, even after clamping moved the box.
    core.on_pointer_move(pt(pivot.x + 0.5, pivot.y + 0.5));
    assert_eq!(core.scene.text.as_ref().unwrap().scale, 0.3);
}

#[test]
fn text_resize_keeps_top_left_on_pivot() {
    let mut core = core_with_text("HI");
    let origin = core.scene.text.as_ref().unwrap().offset;
    press_handle(&mut core, ObjectKind::Text);
    let frame = core.active_frame().unwrap();
    // Pull the handle a little further out along the diagonal.
    core.on_pointer_move(pt(frame.handle.x + 10.0, frame.handle.y + 10.0));
    let text = core.scene.text.as_ref().unwrap();
    assert!(text.scale > 1.0);
    assert_eq!(text.offset, origin);
}

#[test]
fn image_resize_scale_is_bounded_and_centered() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    press_handle(&mut core, ObjectKind::Image);
    let handle = core.active_frame().unwrap().handle;

    core.on_pointer_move(pt(handle.x + 5000.0, handle.y));
    assert_eq!(core.scene.image.as_ref().unwrap().scale, 2.0);
    assert_eq!(product_box(&core, ObjectKind::Image).center(), center);

    core.on_pointer_move(pt(handle.x - 5000.0, handle.y - 5000.0));
    assert_eq!(core.scene.image.as_ref().unwrap().scale, 0.1);
}

#[test]
fn image_resize_follows_signed_delta() {
    let mut core = core_with_image();
    press_handle(&mut core, ObjectKind::Image);
    let handle = core.active_frame().unwrap().handle;
    core.on_pointer_move(pt(handle.x + 40.0, handle.y - 10.0));
    assert!(approx_eq(core.scene.image.as_ref().unwrap().scale, 1.2));
    assert_eq!(core.image_slider().value, 120);
}

#[test]
fn image_resize_measures_screen_pixels_under_ancestor_scale() {
    let mut core = core_with_image();
    core.set_viewport(Size::new(400.0, 250.0), 1.0);
    core.select(ObjectKind::Image);
    let handle = core.active_frame().unwrap().handle;
    // Ancestor scale is 0.5: the handle sits at half its product position.
    let screen = pt(handle.x / 2.0, handle.y / 2.0);
    press(&mut core, screen);
    assert!(matches!(core.input, InputState::Resizing(_)));
    core.on_pointer_move(pt(screen.x + 40.0, screen.y));
    assert!(approx_eq(core.scene.image.as_ref().unwrap().scale, 1.2));
}

// =============================================================
// Rotate
// =============================================================

fn press_knob(core: &mut EngineCore, kind: ObjectKind) {
    core.select(kind);
    let frame = core.active_frame().unwrap();
    press(core, frame.knob);
    assert!(matches!(core.input, InputState::Rotating(_)));
}

#[test]
fn knob_drag_rotates_by_swept_angle() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    press_knob(&mut core, ObjectKind::Image);
    // Knob is straight above the center; move straight right: +90 degrees.
    core.on_pointer_move(pt(center.x + 100.0, center.y));
    assert!(approx_eq(core.scene.image.as_ref().unwrap().rotation, 90.0));
}

#[test]
fn multi_revolution_rotation_stays_normalized() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    press_knob(&mut core, ObjectKind::Image);
    for step in 0..(3 * 24) {
        let angle = f64::from(step) * 15.0_f64.to_radians() - std::f64::consts::FRAC_PI_2;
        core.on_pointer_move(pt(center.x + 80.0 * angle.cos(), center.y + 80.0 * angle.sin()));
        let r = core.scene.image.as_ref().unwrap().rotation;
        assert!((-180.0..180.0).contains(&r), "rotation {r}");
    }
}

#[test]
fn double_click_on_knob_resets_rotation() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    press_knob(&mut core, ObjectKind::Image);
    core.on_pointer_move(pt(center.x + 100.0, center.y + 37.0));
    core.on_pointer_up(pt(center.x + 100.0, center.y + 37.0));
    core.frame_tick();

    let knob = core.active_frame().unwrap().knob;
    let actions = core.on_double_click(knob);
    assert!(actions.contains(&Action::LayoutChanged));
    assert_eq!(core.scene.image.as_ref().unwrap().rotation, 0.0);
}

#[test]
fn double_click_on_body_keeps_rotation() {
    let mut core = core_with_image();
    core.scene.image.as_mut().unwrap().set_rotation(20.0);
    let center = product_box(&core, ObjectKind::Image).center();
    assert!(core.on_double_click(center).is_empty());
    assert_eq!(core.scene.image.as_ref().unwrap().rotation, 20.0);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selecting_other_kind_removes_frame_before_next_frame() {
    let mut core = core_with_image();
    core.set_text_value("HELLO");
    core.select(ObjectKind::Text);
    assert!(core.affordances.get(ObjectKind::Text).frame.is_some());

    let actions = core.select(ObjectKind::Image);
    assert!(actions.contains(&Action::SelectionChanged(SelectionKind::Image)));
    // No frame_tick in between.
    assert!(core.affordances.get(ObjectKind::Text).frame.is_none());
    assert_eq!(core.active_frame().map(|f| f.kind), Some(ObjectKind::Image));
}

#[test]
fn click_outside_deselects() {
    let mut core = core_with_image();
    assert_eq!(core.selection(), SelectionKind::Image);
    let actions = press(&mut core, pt(5.0, 5.0));
    assert!(actions.contains(&Action::SelectionChanged(SelectionKind::None)));
    assert!(core.active_frame().is_none());
    assert!(!core.input.is_active());
}

#[test]
fn escape_deselects_and_cancels() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    press(&mut core, center);
    let actions = core.on_key_down(&Key("Escape".to_owned()));
    assert!(actions.contains(&Action::LockPageScroll(false)));
    assert_eq!(core.selection(), SelectionKind::None);
    assert!(core.active_frame().is_none());
    assert!(!core.input.is_active());
}

#[test]
fn other_keys_do_nothing() {
    let mut core = core_with_image();
    assert!(core.on_key_down(&Key("a".to_owned())).is_empty());
    assert_eq!(core.selection(), SelectionKind::Image);
}

#[test]
fn frame_tracks_object_after_tick() {
    let mut core = core_with_image();
    let before = core.active_frame().unwrap().frame;
    let center = product_box(&core, ObjectKind::Image).center();
    drag(&mut core, center, pt(center.x + 20.0, center.y + 30.0));
    assert!(core.affordances.get(ObjectKind::Image).stale);
    assert!(core.frame_tick());
    let after = core.active_frame().unwrap().frame;
    assert_eq!(after, before.translate(20.0, 30.0));
    assert!(!core.affordances.get(ObjectKind::Image).stale);
}

#[test]
fn hover_sets_cursor_once() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    let actions = core.on_pointer_move(center);
    assert!(actions.contains(&Action::SetCursor("move".to_owned())));
    assert!(core.on_pointer_move(pt(center.x + 1.0, center.y)).is_empty());
    let away = core.on_pointer_move(pt(5.0, 5.0));
    assert!(away.contains(&Action::SetCursor("default".to_owned())));
}

// =============================================================
// Liveness and scheduling
// =============================================================

#[test]
fn gesture_on_removed_object_falls_back_to_idle() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    press(&mut core, center);
    core.scene.image = None;
    let actions = core.on_pointer_move(pt(center.x + 10.0, center.y));
    assert!(actions.contains(&Action::LockPageScroll(false)));
    assert!(!core.input.is_active());
}

#[test]
fn gesture_on_replaced_object_is_stale() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    press(&mut core, center);
    core.scene.image.as_mut().unwrap().id = uuid::Uuid::new_v4();
    core.on_pointer_move(pt(center.x + 10.0, center.y));
    assert_eq!(core.scene.image.as_ref().unwrap().offset, Offset::default());
    assert!(!core.input.is_active());
}

#[test]
fn render_requests_coalesce_until_frame() {
    let mut core = core_with_text("A");
    assert!(core.set_text_value("AB").contains(&Action::RenderNeeded));
    assert!(!core.set_text_value("ABC").contains(&Action::RenderNeeded));
    assert!(core.frame_tick());
    assert!(!core.frame_tick());
    assert!(core.set_text_value("ABCD").contains(&Action::RenderNeeded));
}

#[test]
fn viewport_resize_hides_guides() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    drag(&mut core, center, pt(center.x - 48.0, center.y));
    assert!(!core.affordances.get(ObjectKind::Image).guides.is_empty());
    core.set_viewport(Size::new(800.0, 500.0), 2.0);
    assert!(core.affordances.get(ObjectKind::Image).guides.is_empty());
    assert_eq!(core.dpr, 2.0);
}

// =============================================================
// Text controls
// =============================================================

#[test]
fn size_control_absorbs_resize_scale() {
    let mut core = core_with_text("HELLO");
    core.scene.text.as_mut().unwrap().set_scale(1.5);
    core.set_text_size(60.0);
    let text = core.scene.text.as_ref().unwrap();
    assert_eq!(text.text().unwrap().style.base_font_px, 40.0);
    assert_eq!(text.effective_font_px(), 60.0);
    assert_eq!(core.text_size_value(), 60);
}

#[test]
fn style_toggles_reach_object_and_controls() {
    let mut core = core_with_text("hello");
    core.toggle_style(StyleToggle::Bold);
    core.toggle_style(StyleToggle::Uppercase);
    assert!(core.text_style.bold && core.text_style.uppercase);
    let content = core.scene.text.as_ref().unwrap().text().unwrap();
    assert!(content.style.bold);
    assert_eq!(content.display_text(), "HELLO");
    core.toggle_style(StyleToggle::Bold);
    assert!(!core.scene.text.as_ref().unwrap().text().unwrap().style.bold);
}

#[test]
fn bad_color_keeps_current() {
    let mut core = core_with_text("HELLO");
    core.set_text_color("#00ff00");
    core.set_text_color("chartreuse");
    assert_eq!(core.scene.text.as_ref().unwrap().text().unwrap().style.color, "#00ff00");
}

#[test]
fn growing_text_stays_inside() {
    let mut core = core_with_text("HELLO");
    core.set_text_size(60.0);
    assert_within_container(&core, ObjectKind::Text);
}

// =============================================================
// Image lifecycle
// =============================================================

#[test]
fn replacement_releases_old_url_after_load() {
    let mut core = core_with_image();
    let id = core.scene.image.as_ref().unwrap().id;
    core.set_image_size_percent(80.0);

    assert!(released(&core.begin_image_upload("blob:2")).is_empty());
    assert_eq!(core.scene.image.as_ref().unwrap().image().unwrap().source, "blob:1");

    let actions = core.on_image_loaded("blob:2", Size::new(50.0, 50.0));
    assert_eq!(released(&actions), vec!["blob:1".to_owned()]);
    let image = core.scene.image.as_ref().unwrap();
    assert_eq!(image.image().unwrap().source, "blob:2");
    assert_eq!(image.id, id);
    assert_eq!(image.scale, 0.8);
}

#[test]
fn failed_upload_drops_layer_and_releases_both() {
    let mut core = core_with_image();
    core.begin_image_upload("blob:2");
    let actions = core.on_image_failed("blob:2", "decode error");
    let mut urls = released(&actions);
    urls.sort();
    assert_eq!(urls, vec!["blob:1".to_owned(), "blob:2".to_owned()]);
    assert!(core.scene.image.is_none());
    assert_eq!(core.selection(), SelectionKind::None);
    assert!(core.teardown().is_empty());
}

#[test]
fn superseded_upload_is_ignored() {
    let mut core = core();
    core.begin_image_upload("blob:1");
    assert_eq!(released(&core.begin_image_upload("blob:2")), vec!["blob:1".to_owned()]);
    assert!(core.on_image_loaded("blob:1", Size::new(10.0, 10.0)).is_empty());
    assert!(core.scene.image.is_none());
}

#[test]
fn delete_image_tears_everything_down() {
    let mut core = core_with_image();
    let actions = core.delete_image();
    assert_eq!(released(&actions), vec!["blob:1".to_owned()]);
    assert!(actions.contains(&Action::SelectionChanged(SelectionKind::None)));
    assert!(core.scene.image.is_none());
    assert!(core.affordances.get(ObjectKind::Image).frame.is_none());
    assert!(core.image_slider().disabled);
    assert!(core.delete_image().is_empty());
}

#[test]
fn delete_cancels_upload_in_flight() {
    let mut core = core_with_image();
    core.begin_image_upload("blob:2");
    let actions = core.delete_image();
    assert_eq!(released(&actions), vec!["blob:1".to_owned(), "blob:2".to_owned()]);

    assert!(core.on_image_loaded("blob:2", Size::new(50.0, 50.0)).is_empty());
    assert!(core.scene.image.is_none());
    assert!(core.on_image_failed("blob:2", "late").is_empty());
}

#[test]
fn teardown_drains_urls() {
    let mut core = core_with_image();
    core.begin_image_upload("blob:2");
    let mut urls = released(&core.teardown());
    urls.sort();
    assert_eq!(urls, vec!["blob:1".to_owned(), "blob:2".to_owned()]);
}

// =============================================================
// Variants
// =============================================================

#[test]
fn only_latest_variant_applies() {
    let mut core = core();
    let r1 = load_request(&core.set_color(BagColor::Red));
    let r2 = load_request(&core.set_color(BagColor::Blue));
    assert_eq!(r2.url, "assets/img/bag_front_black_blue.png");

    assert!(!core.on_background_loaded(r2.id, Ok(r2.url.clone())).is_empty());
    assert!(core.on_background_loaded(r1.id, Ok(r1.url.clone())).is_empty());
    assert_eq!(core.scene.background.as_deref(), Some(r2.url.as_str()));
}

#[test]
fn failed_background_hides_layer() {
    let mut core = core();
    let r1 = load_request(&core.set_color(BagColor::Grey));
    core.on_background_loaded(r1.id, Ok(r1.url.clone()));
    let r2 = load_request(&core.set_strap("red"));
    let err = EngineError::ResourceLoad { url: r2.url.clone(), reason: "404".to_owned() };
    core.on_background_loaded(r2.id, Err(err));
    assert!(core.scene.background.is_none());
    // The chosen swatch is still reported.
    assert_eq!(ExportParams::from_scene(&core.scene).bag_color.as_deref(), Some("grey"));
}

#[test]
fn bag_color_follows_page_swatches() {
    let mut plain = core();
    let request = load_request(&plain.start_variant(VariantKey::default(), None));
    plain.on_background_loaded(request.id, Ok(request.url));
    assert!(plain.scene.background.is_some());
    assert!(ExportParams::from_scene(&plain.scene).bag_color.is_none());

    let mut picked = core();
    let key = VariantKey { color: BagColor::Blue, ..VariantKey::default() };
    let request = load_request(&picked.start_variant(key, Some(BagColor::Blue)));
    assert_eq!(request.url, "assets/img/bag_front_black_blue.png");
    assert_eq!(ExportParams::from_scene(&picked.scene).bag_color.as_deref(), Some("blue"));
}

#[test]
fn side_view_switches_print_area_and_clamps() {
    let mut core = core_with_image();
    let center = product_box(&core, ObjectKind::Image).center();
    drag(&mut core, center, pt(center.x + 5000.0, center.y + 5000.0));
    core.on_pointer_up(center);

    let actions = core.set_view(View::Side);
    assert_eq!(load_request(&actions).url, "assets/img/bag_side_black_black.png");
    assert_eq!(core.scene.design_area, Some(Rect::new(180.0, 210.0, 410.0, 220.0)));
    assert_within_container(&core, ObjectKind::Image);
}

#[test]
fn blank_strap_is_ignored() {
    let mut core = core();
    assert!(core.set_strap("  ").is_empty());
    assert_eq!(core.scene.variant.strap, "black");
}
