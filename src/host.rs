//! Mounts the engine on the page and carries out its actions.
//!
//! Every handler borrows the engine only long enough to collect its
//! actions, then releases the borrow before [`apply`] runs them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use canvas::config::EngineConfig;
use canvas::engine::{Action, Engine};
use canvas::error::EngineError;
use canvas::geometry::{Point, Size};
use canvas::input::Key;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, KeyboardEvent, MouseEvent, Node, PointerEvent, Url};

use crate::dom::{self, Dom};
use crate::download;
use crate::input_map::{Swatch, apply_swatch, client_to_stage, map_button};
use crate::loader;

/// Engine plus the page it is mounted on.
pub struct HostState {
    pub engine: RefCell<Engine>,
    pub dom: Dom,
    raf_pending: Cell<bool>,
}

pub type Shared = Rc<HostState>;

/// Resolve the page, start the engine, and wire every listener.
///
/// # Errors
///
/// Fails when a required anchor is missing or the stage has no 2D context.
pub fn mount(document: &Document, config: EngineConfig) -> Result<(), EngineError> {
    let dom = Dom::lookup(document)?;
    let engine = Engine::new(dom.stage.clone(), config)?;
    let state: Shared = Rc::new(HostState { engine: RefCell::new(engine), dom, raf_pending: Cell::new(false) });

    wire_stage(&state);
    wire_document(&state);
    wire_controls(&state);
    wire_swatches(&state);
    wire_window(&state);

    sync_viewport(&state);
    // Layout may not have settled on the first pass.
    let deferred = Rc::clone(&state);
    Timeout::new(0, move || sync_viewport(&deferred)).forget();

    let (initial, color) = (state.dom.initial_variant(), state.dom.initial_color());
    let actions = state.engine.borrow_mut().core.start_variant(initial, color);
    apply(&state, actions);
    apply_initial_controls(&state);
    sync_controls(&state);
    log::info!("customizer mounted on #{}", dom::PRODUCT_ID);
    Ok(())
}

/// Carry out engine actions.
pub fn apply(state: &Shared, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::RenderNeeded => request_frame(state),
            Action::LayoutChanged => sync_controls(state),
            Action::SetCursor(cursor) => dom::set_style(&state.dom.stage, "cursor", &cursor),
            Action::SelectionChanged(kind) => dom::set_attr(&state.dom.product, "data-selected", kind.as_str()),
            Action::LoadBackground(request) => loader::spawn_background(state, request),
            Action::ReleaseObjectUrl(url) => release_url(state, &url),
            Action::LockPageScroll(lock) => lock_page_scroll(state, lock),
        }
    }
}

fn render(state: &Shared) {
    if let Err(err) = state.engine.borrow_mut().render() {
        log::warn!("render: {err}");
    }
}

fn request_frame(state: &Shared) {
    if state.raf_pending.replace(true) {
        return;
    }

    let Some(window) = web_sys::window() else {
        state.raf_pending.set(false);
        render(state);
        return;
    };

    let state_for_cb = Rc::clone(state);
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        state_for_cb.raf_pending.set(false);
        render(&state_for_cb);
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        *holder.borrow_mut() = Some(cb);
    } else {
        state.raf_pending.set(false);
        render(state);
    }
}

fn sync_viewport(state: &Shared) {
    let rect = state.dom.product.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let actions = state.engine.borrow_mut().set_viewport(Size::new(rect.width(), rect.height()), dpr);
    apply(state, actions);
}

/// Push engine state back into the size controls.
fn sync_controls(state: &Shared) {
    let (slider, text_size) = {
        let engine = state.engine.borrow();
        (engine.core.image_slider(), engine.core.text_size_value())
    };
    if let Some(input) = &state.dom.image_size {
        input.set_value(&slider.value.to_string());
        input.set_disabled(slider.disabled);
    }
    if let Some(input) = &state.dom.font_size {
        input.set_value(&text_size.to_string());
    }
}

/// Feed the controls' markup values to the engine once at mount.
fn apply_initial_controls(state: &Shared) {
    let mut actions = Vec::new();
    {
        let mut engine = state.engine.borrow_mut();
        if let Some(select) = &state.dom.font_family {
            actions.extend(engine.core.set_font_family(&select.value()));
        }
        if let Some(input) = &state.dom.font_color {
            actions.extend(engine.core.set_text_color(&input.value()));
        }
        actions.extend(engine.core.set_text_value(&state.dom.text_input.value()));
    }
    apply(state, actions);
}

fn release_url(state: &Shared, url: &str) {
    if let Err(err) = Url::revoke_object_url(url) {
        log::warn!("revoke {url}: {err:?}");
    }
    state.engine.borrow_mut().evict_image(url);
}

fn lock_page_scroll(state: &Shared, lock: bool) {
    let Some(body) = state.dom.document.body() else {
        return;
    };
    for name in ["user-select", "touch-action"] {
        if lock {
            dom::set_style(&body, name, "none");
        } else {
            dom::clear_style(&body, name);
        }
    }
}

fn stage_point(state: &Shared, ev: &MouseEvent) -> Point {
    let rect = state.dom.stage.get_bounding_client_rect();
    client_to_stage(f64::from(ev.client_x()), f64::from(ev.client_y()), rect.left(), rect.top())
}

/// Attach `handler` for `event` on `target` for the life of the page.
fn listen<E, F>(target: &EventTarget, event: &str, state: &Shared, handler: F)
where
    E: JsCast + 'static,
    F: Fn(&Shared, E) + 'static,
{
    let state = Rc::clone(state);
    let name = event.to_owned();
    let cb = Closure::<dyn FnMut(Event)>::new(move |ev: Event| match ev.dyn_into::<E>() {
        Ok(ev) => handler(&state, ev),
        Err(_) => log::debug!("{name}: unexpected event type"),
    });
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        log::warn!("listen {event}: {err:?}");
    }
    cb.forget();
}

// =============================================================
// Stage
// =============================================================

fn wire_stage(state: &Shared) {
    let stage = state.dom.stage.clone();

    listen(&stage, "pointerdown", state, |state, ev: PointerEvent| {
        sync_viewport(state);
        let point = stage_point(state, &ev);
        let actions = state.engine.borrow_mut().core.on_pointer_down(point, map_button(ev.button()));
        if actions.contains(&Action::LockPageScroll(true)) {
            ev.prevent_default();
            if let Err(err) = state.dom.stage.set_pointer_capture(ev.pointer_id()) {
                log::debug!("pointer capture: {err:?}");
            }
        }
        apply(state, actions);
    });

    listen(&stage, "pointermove", state, |state, ev: PointerEvent| {
        let point = stage_point(state, &ev);
        let actions = state.engine.borrow_mut().core.on_pointer_move(point);
        apply(state, actions);
    });

    listen(&stage, "pointerup", state, |state, ev: PointerEvent| {
        let point = stage_point(state, &ev);
        let actions = state.engine.borrow_mut().core.on_pointer_up(point);
        apply(state, actions);
    });

    for event in ["pointercancel", "lostpointercapture"] {
        listen(&stage, event, state, |state, _ev: PointerEvent| {
            let active = state.engine.borrow().core.input.is_active();
            if active {
                let actions = state.engine.borrow_mut().core.on_pointer_cancel();
                apply(state, actions);
            }
        });
    }

    listen(&stage, "dblclick", state, |state, ev: MouseEvent| {
        let point = stage_point(state, &ev);
        let actions = state.engine.borrow_mut().core.on_double_click(point);
        apply(state, actions);
    });
}

fn wire_document(state: &Shared) {
    let document = state.dom.document.clone();

    listen(&document, "keydown", state, |state, ev: KeyboardEvent| {
        let actions = state.engine.borrow_mut().core.on_key_down(&Key(ev.key()));
        apply(state, actions);
    });

    // Presses anywhere off the product deselect.
    listen(&document, "pointerdown", state, |state, ev: PointerEvent| {
        let inside = ev
            .target()
            .and_then(|t| t.dyn_into::<Node>().ok())
            .is_some_and(|node| state.dom.product.contains(Some(&node)));
        if !inside {
            let actions = state.engine.borrow_mut().core.deselect();
            apply(state, actions);
        }
    });
}

fn wire_window(state: &Shared) {
    let Some(window) = web_sys::window() else {
        return;
    };

    listen(&window, "resize", state, |state, _ev: Event| sync_viewport(state));

    listen(&window, "beforeunload", state, |state, _ev: Event| {
        let actions = state.engine.borrow_mut().core.teardown();
        apply(state, actions);
    });
}

// =============================================================
// Controls
// =============================================================

fn wire_controls(state: &Shared) {
    let text_input = state.dom.text_input.clone();
    listen(&text_input, "input", state, |state, _ev: Event| {
        let value = state.dom.text_input.value();
        let actions = state.engine.borrow_mut().core.set_text_value(&value);
        apply(state, actions);
    });

    if let Some(select) = state.dom.font_family.clone() {
        listen(&select.clone(), "change", state, move |state, _ev: Event| {
            let actions = state.engine.borrow_mut().core.set_font_family(&select.value());
            apply(state, actions);
        });
    }

    if let Some(input) = state.dom.font_color.clone() {
        listen(&input.clone(), "input", state, move |state, _ev: Event| {
            let actions = state.engine.borrow_mut().core.set_text_color(&input.value());
            apply(state, actions);
        });
    }

    if let Some(input) = state.dom.font_size.clone() {
        listen(&input.clone(), "input", state, move |state, _ev: Event| {
            let px = input.value_as_number();
            if px.is_finite() {
                let actions = state.engine.borrow_mut().core.set_text_size(px);
                apply(state, actions);
            }
        });
    }

    for (toggle, button) in &state.dom.style_buttons {
        let (toggle, target) = (*toggle, button.clone());
        listen(button, "click", state, move |state, ev: Event| {
            ev.prevent_default();
            let actions = state.engine.borrow_mut().core.toggle_style(toggle);
            let on = toggle.is_on(&state.engine.borrow().core.text_style);
            dom::set_attr(&target, "aria-pressed", if on { "true" } else { "false" });
            dom::toggle_class(&target, "is-active", on);
            apply(state, actions);
        });
    }

    if let Some(input) = state.dom.file_input.clone() {
        listen(&input.clone(), "change", state, move |state, _ev: Event| {
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let url = match Url::create_object_url_with_blob(&file) {
                Ok(url) => url,
                Err(err) => {
                    log::error!("object url for {}: {err:?}", file.name());
                    return;
                }
            };
            let actions = state.engine.borrow_mut().core.begin_image_upload(&url);
            apply(state, actions);
            loader::spawn_upload(state, url);
        });
    }

    if let Some(button) = state.dom.delete_button.clone() {
        listen(&button, "click", state, |state, _ev: Event| {
            let actions = state.engine.borrow_mut().core.delete_image();
            if let Some(input) = &state.dom.file_input {
                input.set_value("");
            }
            apply(state, actions);
        });
    }

    if let Some(input) = state.dom.image_size.clone() {
        listen(&input.clone(), "input", state, move |state, _ev: Event| {
            let actions = state.engine.borrow_mut().core.set_image_size_percent(input.value_as_number());
            apply(state, actions);
        });
    }

    if let Some(button) = state.dom.export_button.clone() {
        listen(&button, "click", state, |state, ev: Event| {
            ev.prevent_default();
            spawn_local(download::export_png(Rc::clone(state)));
        });
    }
}

// =============================================================
// Swatches
// =============================================================

fn wire_swatches(state: &Shared) {
    for (group, selector) in [
        (state.dom.color_swatches.clone(), "[data-color]"),
        (state.dom.strap_swatches.clone(), "[data-strap]"),
    ] {
        let Some(group) = group else {
            continue;
        };
        listen(&group, "click", state, move |state, ev: MouseEvent| {
            if let Some(el) = swatch_target(&ev, selector) {
                activate_swatch(state, &el);
            }
        });
        listen(&group, "keydown", state, move |state, ev: KeyboardEvent| {
            if !Key(ev.key()).is_activation() {
                return;
            }
            if let Some(el) = swatch_target(&ev, selector) {
                ev.prevent_default();
                activate_swatch(state, &el);
            }
        });
    }

    for button in &state.dom.view_buttons {
        let target = button.clone();
        listen(button, "click", state, move |state, _ev: Event| activate_swatch(state, &target));
    }
}

fn swatch_target(ev: &Event, selector: &str) -> Option<Element> {
    ev.target()?.dyn_into::<Element>().ok()?.closest(selector).ok().flatten()
}

fn activate_swatch(state: &Shared, el: &Element) {
    let attr = |name: &str| el.get_attribute(name);
    let Some(swatch) = Swatch::from_attrs(
        attr("data-color").as_deref(),
        attr("data-strap").as_deref(),
        attr("data-view").as_deref(),
    ) else {
        log::debug!("swatch without a known variant");
        return;
    };
    dom::mark_selected(el);
    let actions = apply_swatch(&mut state.engine.borrow_mut().core, &swatch);
    apply(state, actions);
}
