//! Engine configuration.
//!
//! The host passes an optional JSON object (camelCase keys). Every field has
//! a default, so `{}` and a missing config are both valid.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    FRAME_PADDING_PX, IMAGE_SNAP_THRESHOLD_PX, KNOB_HALF_SIZE_PX, KNOB_OFFSET_PX, PRODUCT_HEIGHT_PX,
    PRODUCT_WIDTH_PX, RESIZE_SENSITIVITY_PX, TEXT_SNAP_THRESHOLD_PX,
};
use crate::error::EngineError;
use crate::geometry::Size;

/// Tunables for gestures, overlay layout, and asset lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Snap distance for the text object, in container pixels.
    pub text_snap_threshold: f64,
    /// Snap distance for the image object, in container pixels.
    pub image_snap_threshold: f64,
    /// Gap between an object's box and its selection frame.
    pub frame_padding: f64,
    /// Distance from the frame's top edge to the rotate knob.
    pub knob_offset: f64,
    /// Half the rotate knob's hit size.
    pub knob_half_size: f64,
    /// Pointer travel that adds 1.0 to an image's scale.
    pub resize_sensitivity: f64,
    /// Product viewport width at layout scale.
    pub product_width: f64,
    /// Product viewport height at layout scale.
    pub product_height: f64,
    /// Base path for variant background images.
    pub asset_base: String,
    /// Minimum log level for the console logger.
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            text_snap_threshold: TEXT_SNAP_THRESHOLD_PX,
            image_snap_threshold: IMAGE_SNAP_THRESHOLD_PX,
            frame_padding: FRAME_PADDING_PX,
            knob_offset: KNOB_OFFSET_PX,
            knob_half_size: KNOB_HALF_SIZE_PX,
            resize_sensitivity: RESIZE_SENSITIVITY_PX,
            product_width: PRODUCT_WIDTH_PX,
            product_height: PRODUCT_HEIGHT_PX,
            asset_base: "assets/img".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the JSON is malformed.
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Product viewport size at layout scale.
    #[must_use]
    pub fn product_size(&self) -> Size {
        Size::new(self.product_width, self.product_height)
    }

    /// Parsed log level, falling back to `Info` for unknown names.
    #[must_use]
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
