//! Product variants: bag color, strap, and view, plus background switching.
//!
//! Switching is fire-and-forget from the user's point of view, but each
//! switch starts an async image load. Rapid clicks overlap, so every request
//! carries a generation id and only the latest generation may apply.

#[cfg(test)]
#[path = "variant_test.rs"]
mod variant_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Bag color swatches. Names match the asset file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BagColor {
    #[default]
    Black,
    Red,
    Green,
    Blue,
    /// Asset files spell this swatch `ping`.
    #[serde(rename = "ping")]
    Pink,
    Grey,
}

impl BagColor {
    pub const ALL: [BagColor; 6] = [Self::Black, Self::Red, Self::Green, Self::Blue, Self::Pink, Self::Grey];

    /// Asset name of the swatch.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Pink => "ping",
            Self::Grey => "grey",
        }
    }

    /// Parse a swatch's `data-color` attribute.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw.trim())
    }
}

/// Which side of the product is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Front,
    Side,
}

impl View {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Side => "side",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "front" => Some(Self::Front),
            "side" => Some(Self::Side),
            _ => None,
        }
    }

    /// Print area of this view in product space.
    #[must_use]
    pub fn design_area(self) -> Rect {
        match self {
            Self::Front => Rect::new(280.0, 200.0, 210.0, 230.0),
            Self::Side => Rect::new(180.0, 210.0, 410.0, 220.0),
        }
    }
}

/// A full variant selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantKey {
    pub color: BagColor,
    /// Strap swatch name, as found in asset file names.
    pub strap: String,
    pub view: View,
}

impl Default for VariantKey {
    fn default() -> Self {
        Self { color: BagColor::default(), strap: "black".to_owned(), view: View::default() }
    }
}

impl VariantKey {
    /// Background image URL under `base`.
    #[must_use]
    pub fn url(&self, base: &str) -> String {
        format!(
            "{}/bag_{}_{}_{}.png",
            base.trim_end_matches('/'),
            self.view.as_str(),
            self.strap,
            self.color.as_str()
        )
    }
}

/// An in-flight background load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRequest {
    pub id: u64,
    pub key: VariantKey,
    pub url: String,
}

/// Issues background load requests and discards superseded responses.
#[derive(Debug, Clone)]
pub struct VariantSwitcher {
    base: String,
    latest: u64,
}

impl VariantSwitcher {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into(), latest: 0 }
    }

    /// Start a load for `key`, superseding every earlier request.
    pub fn request(&mut self, key: VariantKey) -> VariantRequest {
        self.latest += 1;
        let url = key.url(&self.base);
        VariantRequest { id: self.latest, key, url }
    }

    /// Whether `id` is the most recent request.
    #[must_use]
    pub fn is_current(&self, id: u64) -> bool {
        id == self.latest
    }

    /// Pass `result` through only if `id` is still the latest request.
    pub fn complete<T>(&self, id: u64, result: T) -> Option<T> {
        if self.is_current(id) {
            Some(result)
        } else {
            log::debug!("variant: dropping stale response {id} (latest {})", self.latest);
            None
        }
    }
}
