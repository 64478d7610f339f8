use super::*;
use crate::geometry::{Point, Size};
use crate::object::{AverageAdvance, ImageContent, TextStyle, TransformableObject};

fn image() -> TransformableObject {
    let content = ImageContent::new("blob:a".to_owned(), Size::new(100.0, 40.0), Size::new(800.0, 500.0));
    TransformableObject::new_image(content)
}

// =============================================================
// Key
// =============================================================

#[test]
fn escape_names() {
    assert!(Key("Escape".to_owned()).is_escape());
    assert!(Key("Esc".to_owned()).is_escape());
    assert!(!Key("Enter".to_owned()).is_escape());
}

#[test]
fn activation_keys() {
    assert!(Key("Enter".to_owned()).is_activation());
    assert!(Key(" ".to_owned()).is_activation());
    assert!(Key("Spacebar".to_owned()).is_activation());
    assert!(!Key("Tab".to_owned()).is_activation());
    assert!(!Key("Escape".to_owned()).is_activation());
}

// =============================================================
// InputState
// =============================================================

#[test]
fn default_is_idle() {
    let state = InputState::default();
    assert!(matches!(state, InputState::Idle));
    assert!(!state.is_active());
    assert_eq!(state.target(), None);
}

#[test]
fn drag_targets_object() {
    let object = image();
    let state = InputState::Dragging(DragGesture::begin(&object, Point::new(10.0, 10.0)));
    assert!(state.is_active());
    assert_eq!(state.target(), Some((ObjectKind::Image, object.id)));
}

#[test]
fn resize_targets_object() {
    let object = TransformableObject::new_text(TextStyle::default());
    let gesture = ResizeGesture::begin(
        &object,
        Point::new(30.0, 30.0),
        Size::new(210.0, 230.0),
        200.0,
        &AverageAdvance::default(),
    );
    let state = InputState::Resizing(gesture);
    assert_eq!(state.target(), Some((ObjectKind::Text, object.id)));
}

#[test]
fn rotate_targets_object() {
    let object = image();
    let gesture = RotateGesture::begin(&object, Point::new(0.0, 0.0), Point::new(0.0, -10.0));
    let state = InputState::Rotating(gesture);
    assert!(state.is_active());
    assert_eq!(state.target().map(|(_, id)| id), Some(object.id));
}

#[test]
fn buttons_are_distinct() {
    assert_ne!(Button::Primary, Button::Middle);
    assert_ne!(Button::Primary, Button::Secondary);
}
