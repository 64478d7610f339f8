//! Mapping from raw DOM event data to engine input.

#[cfg(test)]
#[path = "input_map_test.rs"]
mod input_map_test;

use canvas::engine::{Action, EngineCore};
use canvas::geometry::Point;
use canvas::input::Button;
use canvas::variant::{BagColor, View};

pub fn map_button(button: i16) -> Button {
    match button {
        1 => Button::Middle,
        2 => Button::Secondary,
        _ => Button::Primary,
    }
}

/// Client coordinates relative to the stage's client rect at (`left`, `top`).
pub fn client_to_stage(client_x: f64, client_y: f64, left: f64, top: f64) -> Point {
    Point::new(client_x - left, client_y - top)
}

/// A variant swatch or view button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Swatch {
    Color(BagColor),
    Strap(String),
    View(View),
}

impl Swatch {
    /// Read a swatch from its `data-color`, `data-strap`, or `data-view`
    /// attribute, in that order. Unknown or blank values yield `None`.
    pub fn from_attrs(color: Option<&str>, strap: Option<&str>, view: Option<&str>) -> Option<Self> {
        if let Some(raw) = color {
            return BagColor::parse(raw).map(Self::Color);
        }
        if let Some(raw) = strap {
            let raw = raw.trim();
            return (!raw.is_empty()).then(|| Self::Strap(raw.to_owned()));
        }
        view.and_then(View::parse).map(Self::View)
    }
}

/// Ask the engine for the variant behind `swatch`.
pub fn apply_swatch(core: &mut EngineCore, swatch: &Swatch) -> Vec<Action> {
    match swatch {
        Swatch::Color(color) => core.set_color(*color),
        Swatch::Strap(strap) => core.set_strap(strap),
        Swatch::View(view) => core.set_view(*view),
    }
}
