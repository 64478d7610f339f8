//! Shared numeric constants for the canvas crate.

// ── Scale limits ────────────────────────────────────────────────

/// Smallest text scale (effective font size / base font size).
pub const TEXT_SCALE_MIN: f64 = 0.3;

/// Largest text scale.
pub const TEXT_SCALE_MAX: f64 = 6.0;

/// Smallest image scale.
pub const IMAGE_SCALE_MIN: f64 = 0.1;

/// Largest image scale.
pub const IMAGE_SCALE_MAX: f64 = 2.0;

/// Pointer travel in CSS pixels that adds 1.0 to an image's scale.
pub const RESIZE_SENSITIVITY_PX: f64 = 200.0;

// ── Overlay ─────────────────────────────────────────────────────

/// Padding between an object's live box and its selection frame.
pub const FRAME_PADDING_PX: f64 = 8.0;

/// Distance from the frame's top edge to the rotate knob center.
pub const KNOB_OFFSET_PX: f64 = 34.0;

/// Half the side length of the rotate knob's hit square.
pub const KNOB_HALF_SIZE_PX: f64 = 11.0;

/// Half the side length of the resize handle's hit square.
pub const HANDLE_HALF_SIZE_PX: f64 = 8.0;

// ── Snapping ────────────────────────────────────────────────────

/// Default snap threshold for text, in container pixels.
pub const TEXT_SNAP_THRESHOLD_PX: f64 = 8.0;

/// Default snap threshold for images, in container pixels.
pub const IMAGE_SNAP_THRESHOLD_PX: f64 = 10.0;


// ── Object defaults ─────────────────────────────────────────────

/// Initial image width as a fraction of the product width.
pub const IMAGE_DEFAULT_WIDTH_RATIO: f64 = 0.2;

/// Largest initial image height as a fraction of the product height.
pub const IMAGE_MAX_HEIGHT_RATIO: f64 = 0.9;

/// Base font size of a freshly created text object.
pub const DEFAULT_FONT_PX: f64 = 32.0;

/// Line box height as a multiple of the effective font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;

/// Product viewport size at layout scale.
pub const PRODUCT_WIDTH_PX: f64 = 800.0;

/// Product viewport size at layout scale.
pub const PRODUCT_HEIGHT_PX: f64 = 500.0;
