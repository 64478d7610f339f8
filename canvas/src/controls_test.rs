#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::Size;
use crate::object::ImageContent;

fn image_at(scale: f64) -> TransformableObject {
    let content = ImageContent::new("blob:a".to_owned(), Size::new(100.0, 100.0), Size::new(800.0, 500.0));
    let mut image = TransformableObject::new_image(content);
    image.set_scale(scale);
    image
}

// =============================================================
// Image size slider
// =============================================================

#[test]
fn percent_maps_to_scale() {
    assert_eq!(image_percent_to_scale(150.0), 1.5);
    assert_eq!(image_percent_to_scale(100.0), 1.0);
}

#[test]
fn percent_is_clamped() {
    assert_eq!(image_percent_to_scale(5.0), 0.1);
    assert_eq!(image_percent_to_scale(900.0), 2.0);
    assert_eq!(image_percent_to_scale(-40.0), 0.1);
}

#[test]
fn nonsense_percent_means_hundred() {
    assert_eq!(image_percent_to_scale(0.0), 1.0);
    assert_eq!(image_percent_to_scale(f64::NAN), 1.0);
    assert_eq!(image_percent_to_scale(f64::INFINITY), 1.0);
}

#[test]
fn scale_reads_back_as_rounded_percent() {
    assert_eq!(image_scale_to_percent(1.234), 123);
    assert_eq!(image_scale_to_percent(0.1), 10);
}

#[test]
fn slider_disabled_at_rest_without_image() {
    assert_eq!(SliderState::for_image(None), SliderState { value: 100, disabled: true });
}

#[test]
fn slider_follows_image_scale() {
    let image = image_at(0.75);
    assert_eq!(SliderState::for_image(Some(&image)), SliderState { value: 75, disabled: false });
}

// =============================================================
// Text size
// =============================================================

#[test]
fn base_font_divides_out_scale() {
    assert_eq!(base_font_for_effective(48.0, 1.5), 32.0);
    assert_eq!(base_font_for_effective(48.0, 0.0), 48.0);
}

#[test]
fn base_font_never_below_one() {
    assert_eq!(base_font_for_effective(0.5, 2.0), 1.0);
    assert_eq!(base_font_for_effective(f64::NAN, 1.0), 1.0);
}

#[test]
fn size_control_shows_effective_font() {
    let mut text = TransformableObject::new_text(TextStyle::default());
    text.set_scale(1.5);
    assert_eq!(text_size_control_value(&text), 48);
}

// =============================================================
// Style toggles
// =============================================================

#[test]
fn toggle_flips_and_reports() {
    let mut style = TextStyle::default();
    assert!(StyleToggle::Bold.apply(&mut style));
    assert!(style.bold);
    assert!(!StyleToggle::Bold.apply(&mut style));
    assert!(!style.bold);
    assert!(StyleToggle::Uppercase.apply(&mut style));
    assert!(style.uppercase && !style.italic);
}

#[test]
fn toggle_reads_back_state() {
    let mut style = TextStyle::default();
    StyleToggle::Italic.apply(&mut style);
    assert!(StyleToggle::Italic.is_on(&style));
    assert!(!StyleToggle::Bold.is_on(&style));
}

#[test]
fn toggle_parses_data_attribute() {
    assert_eq!(StyleToggle::parse("italic"), Some(StyleToggle::Italic));
    assert_eq!(StyleToggle::parse(" bold "), Some(StyleToggle::Bold));
    assert_eq!(StyleToggle::parse("underline"), None);
}

// =============================================================
// Colors
// =============================================================

#[test]
fn parses_short_and_long_hex() {
    assert_eq!(parse_hex_rgb("#fff"), Some((255, 255, 255)));
    assert_eq!(parse_hex_rgb("#FF3366"), Some((255, 51, 102)));
    assert_eq!(parse_hex_rgb("ff3366"), None);
    assert_eq!(parse_hex_rgb("#12345"), None);
    assert_eq!(parse_hex_rgb("#zzz"), None);
}

#[test]
fn normalizes_to_lowercase_six_digits() {
    assert_eq!(normalize_hex_color("#ABC", "#000000"), "#aabbcc");
    assert_eq!(normalize_hex_color("red", "#112233"), "#112233");
    assert_eq!(normalize_hex_color("red", "nope"), "#ffffff");
}

#[test]
fn round_px_handles_garbage() {
    assert_eq!(round_px(31.6), 32);
    assert_eq!(round_px(-3.0), 0);
    assert_eq!(round_px(f64::NAN), 0);
}
