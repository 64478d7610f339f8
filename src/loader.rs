//! Image decoding for backgrounds and uploads.

use std::rc::Rc;

use canvas::error::EngineError;
use canvas::geometry::Size;
use canvas::variant::VariantRequest;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlImageElement;

use crate::host::{Shared, apply};

/// Decode `url` into an image element and its natural size.
///
/// # Errors
///
/// [`EngineError::ResourceLoad`] when the element cannot be built or the
/// decode promise rejects.
pub async fn load_image(url: &str) -> Result<(HtmlImageElement, Size), EngineError> {
    let load_error = |err: JsValue| EngineError::ResourceLoad { url: url.to_owned(), reason: describe(&err) };
    let img = HtmlImageElement::new().map_err(load_error)?;
    img.set_src(url);
    JsFuture::from(img.decode()).await.map_err(load_error)?;
    let natural = Size::new(f64::from(img.natural_width()), f64::from(img.natural_height()));
    Ok((img, natural))
}

/// Readable reason for a rejected promise.
pub fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| js_sys::Reflect::get(err, &JsValue::from_str("message")).ok()?.as_string())
        .unwrap_or_else(|| "decode failed".to_owned())
}

/// Load the background for `request` and hand the result to the engine.
/// Backgrounds seen before are served from the engine's image cache.
pub fn spawn_background(state: &Shared, request: VariantRequest) {
    if state.engine.borrow().has_image(&request.url) {
        let actions = state.engine.borrow_mut().core.on_background_loaded(request.id, Ok(request.url));
        apply(state, actions);
        return;
    }
    let state = Rc::clone(state);
    spawn_local(async move {
        let result = match load_image(&request.url).await {
            Ok((img, _)) => {
                state.engine.borrow_mut().insert_image(&request.url, img);
                Ok(request.url)
            }
            Err(err) => Err(err),
        };
        let actions = state.engine.borrow_mut().core.on_background_loaded(request.id, result);
        apply(&state, actions);
    });
}

/// Decode an uploaded object URL and place it as the image layer.
pub fn spawn_upload(state: &Shared, url: String) {
    let state = Rc::clone(state);
    spawn_local(async move {
        let actions = match load_image(&url).await {
            Ok((img, natural)) => {
                let mut engine = state.engine.borrow_mut();
                engine.insert_image(&url, img);
                let actions = engine.core.on_image_loaded(&url, natural);
                // Superseded by a newer upload; its URL is already released.
                if actions.is_empty() {
                    engine.evict_image(&url);
                }
                actions
            }
            Err(EngineError::ResourceLoad { reason, .. }) => {
                state.engine.borrow_mut().core.on_image_failed(&url, &reason)
            }
            Err(err) => state.engine.borrow_mut().core.on_image_failed(&url, &err.to_string()),
        };
        apply(&state, actions);
    });
}
