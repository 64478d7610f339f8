//! PNG export download.

use canvas::error::EngineError;
use canvas::export::{Timestamp, export_filename};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAnchorElement, HtmlCanvasElement};

use crate::host::Shared;

/// Flatten the scene once fonts are ready and download it as a PNG.
pub async fn export_png(state: Shared) {
    if let Err(err) = run(&state).await {
        log::error!("export failed: {err}");
    }
}

async fn run(state: &Shared) -> Result<(), EngineError> {
    let document = &state.dom.document;
    JsFuture::from(document.fonts().ready()?).await?;

    let target: HtmlCanvasElement = document.create_element("canvas")?.dyn_into().map_err(JsValue::from)?;
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let (data_url, params) = state.engine.borrow().export_png(&target, dpr)?;

    let filename = export_filename(now());
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into().map_err(JsValue::from)?;
    anchor.set_href(&data_url);
    anchor.set_download(&filename);
    anchor.click();

    match serde_json::to_string(&params) {
        Ok(summary) => log::info!("exported {filename}: {summary}"),
        Err(err) => log::warn!("exported {filename}; summary unavailable: {err}"),
    }
    Ok(())
}

fn now() -> Timestamp {
    let date = js_sys::Date::new_0();
    Timestamp {
        year: date.get_full_year(),
        month: date.get_month() + 1,
        day: date.get_date(),
        hour: date.get_hours(),
        minute: date.get_minutes(),
        second: date.get_seconds(),
    }
}
