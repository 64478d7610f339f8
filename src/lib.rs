//! Browser bridge for the bag customizer.
//!
//! ARCHITECTURE
//! ============
//! The `canvas` crate owns every transform, snap, and export rule. This crate
//! finds the page's anchors, forwards DOM events into `canvas::engine::Engine`,
//! and carries out the [`canvas::engine::Action`]s it returns: animation
//! frames, image loads, object URL release, and control resync.

mod dom;
mod download;
mod host;
mod input_map;
mod loader;

use canvas::config::EngineConfig;
use canvas::error::EngineError;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Document;

/// Module entry point. Boots now, or once the document has parsed.
///
/// # Errors
///
/// Returns the boot error when a required anchor is missing.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| EngineError::MissingElement { id: "document".to_owned() })?;

    if document.ready_state() == "loading" {
        let deferred = Closure::once_into_js(move || {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                if let Err(err) = boot(&document) {
                    web_sys::console::error_1(&JsValue::from(err));
                }
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", deferred.unchecked_ref())?;
        return Ok(());
    }
    Ok(boot(&document)?)
}

fn boot(document: &Document) -> Result<(), EngineError> {
    let raw = dom::config_attribute(document);
    let parsed = EngineConfig::from_json(&raw);
    let level = parsed.as_ref().map_or(log::Level::Info, EngineConfig::log_level);
    if let Err(err) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already set: {err}")));
    }
    let config = parsed.unwrap_or_else(|err| {
        log::warn!("{err}; falling back to defaults");
        EngineConfig::default()
    });

    host::mount(document, config).inspect_err(|err| {
        if err.is_fatal() {
            log::error!("customizer disabled: {err}");
        }
    })
}
