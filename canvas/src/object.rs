//! Object model: the placed text and image, and the scene that owns them.
//!
//! A [`TransformableObject`] is polymorphic over [`ObjectKind`]. The parts
//! that legitimately differ between kinds are:
//!
//! - **position**: an image is centered on the container center and shifted
//!   by its offset (a translate); text sits at its offset as a layout
//!   position of its top-left corner.
//! - **scale**: an image carries a multiplicative visual scale; text scale
//!   rescales the font metric directly, so its box is always measured at the
//!   effective font size rather than transformed.
//! - **bounds**: image clamping and snapping use the rotated, scaled
//!   bounding box; text uses its unrotated layout box.
//!
//! The [`Scene`] is the single context object holding at most one text and
//! one image plus the product and design-area geometry.

#[cfg(test)]
#[path = "object_test.rs"]
mod object_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_FONT_PX, IMAGE_DEFAULT_WIDTH_RATIO, IMAGE_MAX_HEIGHT_RATIO, IMAGE_SCALE_MAX, IMAGE_SCALE_MIN,
    TEXT_LINE_HEIGHT, TEXT_SCALE_MAX, TEXT_SCALE_MIN,
};
use crate::geometry::{Offset, Point, Rect, Size, clamp, clamp_box_origin, normalize_degrees, rotated_bounds};
use crate::variant::{BagColor, VariantKey};

/// Unique identifier for a placed object. Used as a liveness token by gestures.
pub type ObjectId = Uuid;

/// The kind of a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// The text label.
    Text,
    /// The uploaded overlay image.
    Image,
}

impl ObjectKind {
    /// Inclusive `(min, max)` scale range for this kind.
    #[must_use]
    pub fn scale_range(self) -> (f64, f64) {
        match self {
            Self::Text => (TEXT_SCALE_MIN, TEXT_SCALE_MAX),
            Self::Image => (IMAGE_SCALE_MIN, IMAGE_SCALE_MAX),
        }
    }
}

/// Measures rendered text. Implemented over the browser's 2D context and by
/// fixed-advance doubles in tests.
pub trait TextMeasurer {
    /// Width in CSS pixels of `text` drawn with the CSS `font` shorthand.
    fn text_width(&self, text: &str, font: &str) -> f64;
}

/// Estimates text width from an average glyph advance, as a fraction of the
/// font size. Stands in where no 2D context is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageAdvance {
    pub em_ratio: f64,
}

impl Default for AverageAdvance {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl TextMeasurer for AverageAdvance {
    fn text_width(&self, text: &str, font: &str) -> f64 {
        let glyphs = text.chars().count();
        #[allow(clippy::cast_precision_loss)]
        let glyphs = glyphs as f64;
        glyphs * font_px(font) * self.em_ratio
    }
}

/// Pixel size named in a CSS font shorthand, or 0 if none.
#[must_use]
pub fn font_px(font: &str) -> f64 {
    let Some(raw) = font.split_whitespace().find_map(|part| part.strip_suffix("px")) else {
        return 0.0;
    };
    raw.parse::<f64>().unwrap_or(0.0)
}

/// Style attributes of the text label.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// CSS font-family list.
    pub font_family: String,
    /// Fill color as `#rrggbb`.
    pub color: String,
    /// Base font size before scale.
    pub base_font_px: f64,
    /// Weight 800 when set, 400 otherwise.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Uppercase text transform.
    pub uppercase: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Montserrat, system-ui, Arial".to_owned(),
            color: "#ffffff".to_owned(),
            base_font_px: DEFAULT_FONT_PX,
            bold: false,
            italic: false,
            uppercase: false,
        }
    }
}

impl TextStyle {
    /// Numeric font weight.
    #[must_use]
    pub fn weight(&self) -> u16 {
        if self.bold { 800 } else { 400 }
    }

    /// CSS font shorthand at `size_px`. Normal style and weight are omitted.
    #[must_use]
    pub fn font(&self, size_px: f64) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.italic {
            parts.push("italic".to_owned());
        }
        if self.bold {
            parts.push(self.weight().to_string());
        }
        parts.push(format!("{}px", size_px.round()));
        parts.push(self.font_family.clone());
        parts.join(" ")
    }
}

/// Content of the text label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    /// Trimmed user input.
    pub value: String,
    pub style: TextStyle,
}

impl TextContent {
    /// The string as drawn, with the uppercase transform applied.
    #[must_use]
    pub fn display_text(&self) -> String {
        if self.style.uppercase { self.value.to_uppercase() } else { self.value.clone() }
    }
}

/// Content of the overlay image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    /// URL the pixels were decoded from (usually an object URL).
    pub source: String,
    /// Decoded pixel dimensions.
    pub natural: Size,
    /// Unscaled on-product size.
    pub layout: Size,
}

impl ImageContent {
    /// Build image content, fitting the natural size into the default box
    /// for a product of `product` size.
    #[must_use]
    pub fn new(source: String, natural: Size, product: Size) -> Self {
        Self { source, natural, layout: default_image_layout(natural, product) }
    }
}

/// Initial on-product size for an image: its natural size, shrunk (never
/// grown) so the width fits the default width ratio and the height fits the
/// max height ratio. Aspect ratio is preserved.
#[must_use]
pub fn default_image_layout(natural: Size, product: Size) -> Size {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return Size::default();
    }
    let max_w = product.width * IMAGE_DEFAULT_WIDTH_RATIO;
    let max_h = product.height * IMAGE_MAX_HEIGHT_RATIO;
    let fit = (max_w / natural.width).min(max_h / natural.height).min(1.0);
    natural.scaled(fit)
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(TextContent),
    Image(ImageContent),
}

/// A placed text label or image.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformableObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Image: center offset from the container center. Text: top-left layout offset.
    pub offset: Offset,
    /// Always within [`ObjectKind::scale_range`].
    pub scale: f64,
    /// Degrees in `[-180, 180)`.
    pub rotation: f64,
    pub content: Content,
    /// Hidden text is kept, not destroyed.
    pub visible: bool,
    /// Set once the object has been centered on first appearance.
    pub has_placed_once: bool,
}

impl TransformableObject {
    /// A new hidden, empty text label.
    #[must_use]
    pub fn new_text(style: TextStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ObjectKind::Text,
            offset: Offset::default(),
            scale: 1.0,
            rotation: 0.0,
            content: Content::Text(TextContent { value: String::new(), style }),
            visible: false,
            has_placed_once: false,
        }
    }

    /// A new visible image centered in its container.
    #[must_use]
    pub fn new_image(content: ImageContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ObjectKind::Image,
            offset: Offset::default(),
            scale: 1.0,
            rotation: 0.0,
            content: Content::Image(content),
            visible: true,
            has_placed_once: true,
        }
    }

    /// Set the scale, clamped to this kind's range. Non-finite input is ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if !scale.is_finite() {
            return;
        }
        let (min, max) = self.kind.scale_range();
        self.scale = clamp(scale, min, max);
    }

    /// Set the rotation, normalized into `[-180, 180)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Shift the offset. Non-finite deltas are ignored.
    pub fn translate(&mut self, delta: Offset) {
        let next = self.offset + delta;
        if next.is_finite() {
            self.offset = next;
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&TextContent> {
        match &self.content {
            Content::Text(t) => Some(t),
            Content::Image(_) => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.content {
            Content::Text(t) => Some(t),
            Content::Image(_) => None,
        }
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageContent> {
        match &self.content {
            Content::Image(i) => Some(i),
            Content::Text(_) => None,
        }
    }

    /// Text font size after scale. Zero for images.
    #[must_use]
    pub fn effective_font_px(&self) -> f64 {
        self.text().map_or(0.0, |t| t.style.base_font_px * self.scale)
    }

    /// Unrotated on-screen size: measured text at its effective font, or the
    /// image layout size times scale.
    #[must_use]
    pub fn live_size(&self, measurer: &dyn TextMeasurer) -> Size {
        match &self.content {
            Content::Text(t) => {
                let px = self.effective_font_px();
                let width = measurer.text_width(&t.display_text(), &t.style.font(px));
                Size::new(width, px * TEXT_LINE_HEIGHT)
            }
            Content::Image(i) => i.layout.scaled(self.scale),
        }
    }

    /// Unrotated live box in container space.
    #[must_use]
    pub fn live_box(&self, container: Size, measurer: &dyn TextMeasurer) -> Rect {
        let size = self.live_size(measurer);
        match self.kind {
            ObjectKind::Text => Rect::new(self.offset.dx, self.offset.dy, size.width, size.height),
            ObjectKind::Image => Rect::centered(
                Point::new(container.width / 2.0 + self.offset.dx, container.height / 2.0 + self.offset.dy),
                size,
            ),
        }
    }

    /// Box used for clamping and snapping, in container space.
    #[must_use]
    pub fn constraint_box(&self, container: Size, measurer: &dyn TextMeasurer) -> Rect {
        let live = self.live_box(container, measurer);
        match self.kind {
            ObjectKind::Text => live,
            ObjectKind::Image => rotated_bounds(live.center(), live.size(), self.rotation),
        }
    }

    /// Move the object so its constraint box lies within `container`.
    pub fn clamp_into(&mut self, container: Size, measurer: &dyn TextMeasurer) {
        let bounds = self.constraint_box(container, measurer);
        let clamped = clamp_box_origin(bounds.origin(), bounds.size(), container);
        self.translate(Offset::new(clamped.x - bounds.x, clamped.y - bounds.y));
    }
}

/// The editable scene: product geometry plus the two placeable objects.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Product viewport at layout scale.
    pub product: Size,
    /// Print area in product space. Objects are confined to it when present.
    pub design_area: Option<Rect>,
    pub text: Option<TransformableObject>,
    pub image: Option<TransformableObject>,
    /// URL of the current variant background.
    pub background: Option<String>,
    pub variant: VariantKey,
    /// Color picked on the page's swatches. `None` when the page has none.
    pub bag_color: Option<BagColor>,
}

impl Scene {
    #[must_use]
    pub fn new(product: Size) -> Self {
        Self {
            product,
            design_area: None,
            text: None,
            image: None,
            background: None,
            variant: VariantKey::default(),
            bag_color: None,
        }
    }

    /// The bounding container in product space.
    #[must_use]
    pub fn container_rect(&self) -> Rect {
        self.design_area
            .unwrap_or_else(|| Rect::new(0.0, 0.0, self.product.width, self.product.height))
    }

    /// Container size.
    #[must_use]
    pub fn container(&self) -> Size {
        self.container_rect().size()
    }

    #[must_use]
    pub fn object(&self, kind: ObjectKind) -> Option<&TransformableObject> {
        match kind {
            ObjectKind::Text => self.text.as_ref(),
            ObjectKind::Image => self.image.as_ref(),
        }
    }

    pub fn object_mut(&mut self, kind: ObjectKind) -> Option<&mut TransformableObject> {
        match kind {
            ObjectKind::Text => self.text.as_mut(),
            ObjectKind::Image => self.image.as_mut(),
        }
    }

    /// Look up an object by kind, only if it is still the instance `id`.
    pub fn live_mut(&mut self, kind: ObjectKind, id: ObjectId) -> Option<&mut TransformableObject> {
        self.object_mut(kind).filter(|obj| obj.id == id)
    }

    /// Whether an object of `kind` is present and visible.
    #[must_use]
    pub fn is_shown(&self, kind: ObjectKind) -> bool {
        self.object(kind).is_some_and(|o| o.visible)
    }

    /// Live box of `kind` in product space.
    #[must_use]
    pub fn product_box(&self, kind: ObjectKind, measurer: &dyn TextMeasurer) -> Option<Rect> {
        let container = self.container_rect();
        self.object(kind)
            .map(|o| o.live_box(container.size(), measurer).translate(container.x, container.y))
    }

    /// Apply typed text. Returns whether the text is visible afterwards.
    ///
    /// Input is trimmed. When the label appears it takes the current control
    /// `style`; the first non-empty value centers it in its container. An
    /// empty value hides it and re-arms centering.
    pub fn set_text_value(&mut self, raw: &str, style: &TextStyle, measurer: &dyn TextMeasurer) -> bool {
        let value = raw.trim();
        let container = self.container();
        let text = self.text.get_or_insert_with(|| TransformableObject::new_text(style.clone()));
        let appearing = !text.visible;
        let Some(content) = text.text_mut() else {
            return false;
        };
        content.value = value.to_owned();
        if appearing {
            content.style = style.clone();
        }

        if value.is_empty() {
            text.visible = false;
            text.has_placed_once = false;
            return false;
        }

        text.visible = true;
        if !text.has_placed_once {
            let size = text.live_size(measurer);
            text.offset = Offset::new(
                ((container.width - size.width) / 2.0).max(0.0),
                ((container.height - size.height) / 2.0).max(0.0),
            );
            text.has_placed_once = true;
        }
        true
    }

    /// Install an image, replacing any current one's pixels but keeping its
    /// transform. Returns the new object's id.
    pub fn place_image(&mut self, source: String, natural: Size, measurer: &dyn TextMeasurer) -> ObjectId {
        let content = ImageContent::new(source, natural, self.product);
        let container = self.container();
        let image = match self.image.take() {
            Some(mut existing) => {
                existing.content = Content::Image(content);
                existing.visible = true;
                existing
            }
            None => TransformableObject::new_image(content),
        };
        let id = image.id;
        let image = self.image.insert(image);
        image.clamp_into(container, measurer);
        id
    }

    /// Remove the image entirely.
    pub fn remove_image(&mut self) -> Option<TransformableObject> {
        self.image.take()
    }
}
