//! Engine error taxonomy.

use wasm_bindgen::JsValue;

/// Errors surfaced by the engine and its browser bridge.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A required DOM anchor is absent; the engine refuses to activate.
    #[error("required element #{id} is missing")]
    MissingElement { id: String },

    /// An image failed to load or decode. The affected layer is hidden.
    #[error("failed to load {url}: {reason}")]
    ResourceLoad { url: String, reason: String },

    /// A 2D context call failed.
    #[error("surface error: {0}")]
    Surface(String),

    /// The stage canvas has no 2D context.
    #[error("2d context unavailable")]
    NoContext,

    /// Engine configuration JSON was malformed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether the engine must refuse to start.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingElement { .. } | Self::NoContext)
    }
}

impl From<JsValue> for EngineError {
    fn from(value: JsValue) -> Self {
        Self::Surface(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
