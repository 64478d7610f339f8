//! Style and size controls: mapping between control values and object state.
//!
//! Controls and gestures both write the same object fields, so every mapping
//! here is two-way. The image size slider reads back from the scale after a
//! handle resize, and the text size input reads back the effective font size
//! after a pivot resize.

#[cfg(test)]
#[path = "controls_test.rs"]
mod controls_test;

use crate::consts::{IMAGE_SCALE_MAX, IMAGE_SCALE_MIN};
use crate::geometry::clamp;
use crate::object::{TextStyle, TransformableObject};

/// Slider value shown when there is no image.
pub const SLIDER_REST_PERCENT: u32 = 100;

/// Image scale for a slider percentage. Zero and non-finite input mean 100%.
#[must_use]
pub fn image_percent_to_scale(percent: f64) -> f64 {
    let percent = if percent.is_finite() && percent != 0.0 { percent } else { 100.0 };
    clamp(percent / 100.0, IMAGE_SCALE_MIN, IMAGE_SCALE_MAX)
}

/// Slider percentage for an image scale, rounded.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn image_scale_to_percent(scale: f64) -> u32 {
    (scale * 100.0).round().max(0.0) as u32
}

/// State of the image size slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderState {
    pub value: u32,
    pub disabled: bool,
}

impl SliderState {
    /// Slider for the current image, disabled at rest when there is none.
    #[must_use]
    pub fn for_image(image: Option<&TransformableObject>) -> Self {
        match image.filter(|i| i.visible) {
            Some(image) => Self { value: image_scale_to_percent(image.scale), disabled: false },
            None => Self { value: SLIDER_REST_PERCENT, disabled: true },
        }
    }
}

/// Base font size that yields `effective_px` at `scale`. Never below 1px.
#[must_use]
pub fn base_font_for_effective(effective_px: f64, scale: f64) -> f64 {
    if !effective_px.is_finite() {
        return 1.0;
    }
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    (effective_px / scale).max(1.0)
}

/// Text size control value: the effective font size, rounded.
#[must_use]
pub fn text_size_control_value(text: &TransformableObject) -> u32 {
    round_px(text.effective_font_px())
}

/// A font size as a whole control value.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_px(px: f64) -> u32 {
    if px.is_finite() { px.round().max(0.0) as u32 } else { 0 }
}

/// A style toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleToggle {
    Bold,
    Italic,
    Uppercase,
}

impl StyleToggle {
    /// Parse a button's `data-style` attribute.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "uppercase" => Some(Self::Uppercase),
            _ => None,
        }
    }

    /// Flip the flag on `style`. Returns the new state (the button's `aria-pressed`).
    pub fn apply(self, style: &mut TextStyle) -> bool {
        let flag = match self {
            Self::Bold => &mut style.bold,
            Self::Italic => &mut style.italic,
            Self::Uppercase => &mut style.uppercase,
        };
        *flag = !*flag;
        *flag
    }

    /// Whether the flag is set on `style`.
    #[must_use]
    pub fn is_on(self, style: &TextStyle) -> bool {
        match self {
            Self::Bold => style.bold,
            Self::Italic => style.italic,
            Self::Uppercase => style.uppercase,
        }
    }
}

/// Parse `#RGB` or `#RRGGBB` into channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => Some((
            hex_byte(&hex[0..1].repeat(2))?,
            hex_byte(&hex[1..2].repeat(2))?,
            hex_byte(&hex[2..3].repeat(2))?,
        )),
        6 => Some((hex_byte(&hex[0..2])?, hex_byte(&hex[2..4])?, hex_byte(&hex[4..6])?)),
        _ => None,
    }
}

fn hex_byte(pair: &str) -> Option<u8> {
    match u8::from_str_radix(pair, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

/// Canonical lowercase `#rrggbb`, or `fallback` when `value` does not parse.
#[must_use]
pub fn normalize_hex_color(value: &str, fallback: &str) -> String {
    let (r, g, b) = parse_hex_rgb(value).or_else(|| parse_hex_rgb(fallback)).unwrap_or((255, 255, 255));
    format!("#{r:02x}{g:02x}{b:02x}")
}
