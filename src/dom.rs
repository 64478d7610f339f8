//! Page anchors the bridge needs.
//!
//! `#product` and `#presetText` are required; without them the customizer
//! refuses to start. Every other control is optional and simply not wired
//! when absent.

use canvas::controls::StyleToggle;
use canvas::error::EngineError;
use canvas::variant::{BagColor, VariantKey, View};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement, HtmlSelectElement};

pub const PRODUCT_ID: &str = "product";
const TEXT_INPUT_ID: &str = "presetText";
const STAGE_ID: &str = "stageCanvas";

/// Element lookups resolved once at mount.
pub struct Dom {
    pub document: Document,
    /// Product mockup; its on-screen box is the stage's rendered size.
    pub product: HtmlElement,
    /// Stage canvas layered over the product.
    pub stage: HtmlCanvasElement,
    pub text_input: HtmlInputElement,
    pub font_family: Option<HtmlSelectElement>,
    pub font_color: Option<HtmlInputElement>,
    pub font_size: Option<HtmlInputElement>,
    pub style_buttons: Vec<(StyleToggle, Element)>,
    pub file_input: Option<HtmlInputElement>,
    pub delete_button: Option<Element>,
    pub image_size: Option<HtmlInputElement>,
    pub export_button: Option<Element>,
    pub color_swatches: Option<Element>,
    pub strap_swatches: Option<Element>,
    pub view_buttons: Vec<Element>,
}

impl Dom {
    /// Resolve every anchor, creating the stage canvas if the page has none.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingElement`] when a required anchor is absent.
    pub fn lookup(document: &Document) -> Result<Self, EngineError> {
        let product: HtmlElement = required(document, PRODUCT_ID)?;
        let text_input: HtmlInputElement = required(document, TEXT_INPUT_ID)?;
        let stage = match by_id::<HtmlCanvasElement>(document, STAGE_ID) {
            Some(stage) => stage,
            None => create_stage(document, &product)?,
        };
        // The stage paints the bag itself.
        if let Some(img) = by_id::<HtmlElement>(document, "productImg") {
            set_style(&img, "visibility", "hidden");
        }

        let style_buttons = [
            (StyleToggle::Bold, "#styleBold, [data-style=\"bold\"]"),
            (StyleToggle::Italic, "#styleItalic, [data-style=\"italic\"]"),
            (StyleToggle::Uppercase, "#styleUppercase, [data-style=\"uppercase\"]"),
        ]
        .into_iter()
        .filter_map(|(toggle, selector)| select(document, selector).map(|el| (toggle, el)))
        .collect();

        Ok(Self {
            document: document.clone(),
            product,
            stage,
            text_input,
            font_family: by_id(document, "fontFamily"),
            font_color: by_id(document, "fontColor"),
            font_size: by_id(document, "fontSize"),
            style_buttons,
            file_input: by_id(document, "productFile"),
            delete_button: by_id(document, "deleteImageBtn"),
            image_size: by_id(document, "imageSize"),
            export_button: by_id(document, "exportPNGBtn"),
            color_swatches: by_id(document, "colorSwatches"),
            strap_swatches: by_id(document, "strapSwatches"),
            view_buttons: select_all(document, "[data-view]"),
        })
    }

    /// Color of the selected (or first) color swatch. `None` when the page
    /// has no color swatches.
    #[must_use]
    pub fn initial_color(&self) -> Option<BagColor> {
        initial_attr(self.color_swatches.as_ref(), "data-color").and_then(|raw| BagColor::parse(&raw))
    }

    /// Variant picked by the page's markup: the selected (or first) swatch
    /// of each group, front view.
    #[must_use]
    pub fn initial_variant(&self) -> VariantKey {
        let defaults = VariantKey::default();
        let color = self.initial_color().unwrap_or(defaults.color);
        let strap = initial_attr(self.strap_swatches.as_ref(), "data-strap")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.strap);
        VariantKey { color, strap, view: View::Front }
    }
}

/// The `data-config` JSON on the product element, or empty.
#[must_use]
pub fn config_attribute(document: &Document) -> String {
    document
        .get_element_by_id(PRODUCT_ID)
        .and_then(|el| el.get_attribute("data-config"))
        .unwrap_or_default()
}

fn required<T: JsCast>(document: &Document, id: &str) -> Result<T, EngineError> {
    by_id(document, id).ok_or_else(|| EngineError::MissingElement { id: id.to_owned() })
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id).and_then(|el| el.dyn_into::<T>().ok())
}

fn select(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn initial_attr(container: Option<&Element>, attr: &str) -> Option<String> {
    let container = container?;
    let chosen = select_in(container, ".is-selected").or_else(|| select_in(container, &format!("[{attr}]")))?;
    chosen.get_attribute(attr)
}

fn select_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

fn create_stage(document: &Document, product: &HtmlElement) -> Result<HtmlCanvasElement, EngineError> {
    let stage: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| EngineError::NoContext)?;
    stage.set_id(STAGE_ID);
    for (name, value) in [
        ("position", "absolute"),
        ("inset", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("touch-action", "none"),
    ] {
        set_style(&stage, name, value);
    }
    product.append_child(&stage)?;
    Ok(stage)
}

/// Set one inline style property, logging failures.
pub fn set_style(el: &HtmlElement, name: &str, value: &str) {
    if let Err(err) = el.style().set_property(name, value) {
        log::warn!("style {name}: {err:?}");
    }
}

/// Remove one inline style property, logging failures.
pub fn clear_style(el: &HtmlElement, name: &str) {
    if let Err(err) = el.style().remove_property(name) {
        log::warn!("style {name}: {err:?}");
    }
}

/// Move the `is-selected` mark within `el`'s group onto `el`.
pub fn mark_selected(el: &Element) {
    if let Some(group) = el.parent_element() {
        if let Ok(marked) = group.query_selector_all(".is-selected") {
            for node in (0..marked.length()).filter_map(|i| marked.item(i)) {
                if let Ok(other) = node.dyn_into::<Element>() {
                    toggle_class(&other, "is-selected", false);
                    set_attr(&other, "aria-selected", "false");
                }
            }
        }
    }
    toggle_class(el, "is-selected", true);
    set_attr(el, "aria-selected", "true");
}

/// Force a class on or off, logging failures.
pub fn toggle_class(el: &Element, class: &str, on: bool) {
    if let Err(err) = el.class_list().toggle_with_force(class, on) {
        log::warn!("class {class}: {err:?}");
    }
}

/// Set an attribute, logging failures.
pub fn set_attr(el: &Element, name: &str, value: &str) {
    if let Err(err) = el.set_attribute(name, value) {
        log::warn!("attribute {name}: {err:?}");
    }
}
