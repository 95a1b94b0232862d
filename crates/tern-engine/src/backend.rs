//! The host backend interface.
//!
//! The engine never draws, fetches or measures anything itself: every
//! such capability comes from the embedding application through
//! [`DocumentContainer`]. All callbacks are synchronous and must not
//! re-enter the document. Failures are reported through sentinel values
//! (null font handle, zero image size, empty CSS) and the engine
//! degrades to placeholder geometry.

use tern_css::keywords::{BackgroundAttachment, BackgroundRepeat, BorderStyle, FontStyle, ListStyleType, TextTransform};
use tern_css::{Color, MediaFeatures};

use crate::geometry::{Position, Size};

/// Opaque host font handle; 0 means "no font".
pub type FontHandle = usize;

/// Opaque drawing-surface handle threaded through all draw calls.
pub type DrawHandle = usize;

/// Text decoration bit: underline.
pub const FONT_DECORATION_UNDERLINE: u32 = 0x01;
/// Text decoration bit: line-through.
pub const FONT_DECORATION_LINETHROUGH: u32 = 0x02;
/// Text decoration bit: overline.
pub const FONT_DECORATION_OVERLINE: u32 = 0x04;

/// Metrics the host reports for a created font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct FontMetrics {
    /// Total line height of the font.
    pub height: i32,
    /// Ascent above the baseline.
    pub ascent: i32,
    /// Descent below the baseline.
    pub descent: i32,
    /// Height of a lower-case 'x'.
    pub x_height: i32,
    /// Whether whitespace glyphs must be drawn (e.g. underlined links).
    pub draw_spaces: bool,
}

impl FontMetrics {
    /// Distance from the bottom of the line to the baseline.
    #[must_use]
    pub fn baseline(&self) -> i32 {
        self.descent
    }
}

/// One side of a border as handed to the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderPaint {
    /// Used width in px.
    pub width: i32,
    /// Line style.
    pub style: BorderStyle,
    /// Resolved color.
    pub color: Color,
}

/// Corner radii in px, one X/Y pair per corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderRadii {
    /// Top-left X radius.
    pub top_left_x: i32,
    /// Top-left Y radius.
    pub top_left_y: i32,
    /// Top-right X radius.
    pub top_right_x: i32,
    /// Top-right Y radius.
    pub top_right_y: i32,
    /// Bottom-right X radius.
    pub bottom_right_x: i32,
    /// Bottom-right Y radius.
    pub bottom_right_y: i32,
    /// Bottom-left X radius.
    pub bottom_left_x: i32,
    /// Bottom-left Y radius.
    pub bottom_left_y: i32,
}

impl BorderRadii {
    /// True when every radius is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.top_left_x == 0
            && self.top_left_y == 0
            && self.top_right_x == 0
            && self.top_right_y == 0
            && self.bottom_right_x == 0
            && self.bottom_right_y == 0
            && self.bottom_left_x == 0
            && self.bottom_left_y == 0
    }

    /// Shrink every radius by the given per-side amounts (moving from
    /// the border box to an inner box), clamping at zero.
    #[must_use]
    pub fn shrunk_by(&self, left: i32, top: i32, right: i32, bottom: i32) -> BorderRadii {
        BorderRadii {
            top_left_x: (self.top_left_x - left).max(0),
            top_left_y: (self.top_left_y - top).max(0),
            top_right_x: (self.top_right_x - right).max(0),
            top_right_y: (self.top_right_y - top).max(0),
            bottom_right_x: (self.bottom_right_x - right).max(0),
            bottom_right_y: (self.bottom_right_y - bottom).max(0),
            bottom_left_x: (self.bottom_left_x - left).max(0),
            bottom_left_y: (self.bottom_left_y - bottom).max(0),
        }
    }
}

/// Complete border description for one element box.
#[derive(Debug, Clone, Copy, Default)]
pub struct Borders {
    /// Top border.
    pub top: BorderPaint,
    /// Right border.
    pub right: BorderPaint,
    /// Bottom border.
    pub bottom: BorderPaint,
    /// Left border.
    pub left: BorderPaint,
    /// Corner radii.
    pub radii: BorderRadii,
}

impl Borders {
    /// True when no side would paint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let side_visible = |b: &BorderPaint| {
            b.width > 0 && b.style != BorderStyle::None && b.style != BorderStyle::Hidden
        };
        !side_visible(&self.top)
            && !side_visible(&self.right)
            && !side_visible(&self.bottom)
            && !side_visible(&self.left)
    }
}

/// Everything the backend needs to paint one element background.
#[derive(Debug, Clone, Default)]
pub struct BackgroundPaint {
    /// Background color (may be transparent).
    pub color: Color,
    /// Resolved image URL; empty when there is no image.
    pub image: String,
    /// Tiling mode.
    pub repeat: BackgroundRepeat,
    /// Scroll/fixed attachment.
    pub attachment: BackgroundAttachment,
    /// The box painting is clipped to (per `background-clip`).
    pub clip_box: Position,
    /// The box the image is positioned within (per `background-origin`).
    pub origin_box: Position,
    /// The border box (for radii clipping).
    pub border_box: Position,
    /// Corner radii of the border box.
    pub border_radii: BorderRadii,
    /// The image's size after `background-size` resolution.
    pub image_size: Size,
    /// Image X position in document coordinates.
    pub position_x: i32,
    /// Image Y position in document coordinates.
    pub position_y: i32,
    /// True when painting the root canvas background.
    pub is_root: bool,
}

/// A list-item marker the backend draws (glyph types) or that the
/// engine renders as text (numeric types).
#[derive(Debug, Clone, Default)]
pub struct ListMarker {
    /// Marker image URL; empty for generated markers.
    pub image: String,
    /// Base URL the image resolves against.
    pub baseurl: String,
    /// The marker type (disc/circle/square/... for glyph markers).
    pub marker_type: ListStyleType,
    /// Marker color (the element's text color).
    pub color: Color,
    /// Marker rectangle in document coordinates.
    pub pos: Position,
    /// 1-based list index; -1 for glyph markers.
    pub index: i32,
    /// Font for text markers.
    pub font: FontHandle,
}

/// The capabilities a host must provide.
///
/// Most methods have neutral default implementations so test doubles
/// and minimal hosts only implement what they exercise; fonts and text
/// measurement are the two capabilities layout genuinely cannot fake.
pub trait DocumentContainer {
    /// Create a font and fill in its metrics. Returns 0 on failure.
    fn create_font(
        &mut self,
        family: &str,
        size: i32,
        weight: i32,
        style: FontStyle,
        decoration: u32,
        metrics: &mut FontMetrics,
    ) -> FontHandle;

    /// Release a font created by [`DocumentContainer::create_font`].
    fn delete_font(&mut self, font: FontHandle);

    /// Measure the advance width of `text` in px.
    fn text_width(&mut self, text: &str, font: FontHandle) -> i32;

    /// Draw `text` with its baseline inside `pos`.
    fn draw_text(&mut self, hdc: DrawHandle, text: &str, font: FontHandle, color: Color, pos: Position);

    /// Convert points to pixels (72pt = 1in).
    fn pt_to_px(&self, pt: i32) -> i32 {
        (pt as f32 * 96.0 / 72.0).round() as i32
    }

    /// The default document font size in px.
    fn default_font_size(&self) -> i32 {
        16
    }

    /// The default font family name.
    fn default_font_name(&self) -> String {
        "serif".to_string()
    }

    /// Begin (or schedule) loading an image. Fire-and-forget; layout
    /// treats unresolved images as zero-sized.
    fn load_image(&mut self, _url: &str, _redraw_on_ready: bool) {}

    /// Intrinsic size of a loaded image; (0,0) when unresolved.
    fn get_image_size(&mut self, _url: &str) -> Size {
        Size::default()
    }

    /// Paint an element background (color and optional image).
    fn draw_background(&mut self, _hdc: DrawHandle, _paint: &BackgroundPaint) {}

    /// Paint the borders of a box.
    fn draw_borders(&mut self, _hdc: DrawHandle, _borders: &Borders, _draw_pos: Position, _root: bool) {}

    /// Paint a glyph list marker (disc/circle/square or image).
    fn draw_list_marker(&mut self, _hdc: DrawHandle, _marker: &ListMarker) {}

    /// Push a clip rectangle (with optional radii).
    fn set_clip(&mut self, _pos: Position, _radii: &BorderRadii, _valid_x: bool, _valid_y: bool) {}

    /// Pop the most recent clip rectangle.
    fn del_clip(&mut self) {}

    /// The viewport rectangle.
    fn get_client_rect(&self) -> Position {
        Position::new(0, 0, 1280, 720)
    }

    /// Current media features (viewport, device, resolution).
    fn get_media_features(&self) -> MediaFeatures {
        let client = self.get_client_rect();
        MediaFeatures {
            media_type: tern_css::MediaType::Screen,
            width: client.width,
            height: client.height,
            device_width: client.width,
            device_height: client.height,
            color: 8,
            resolution: 96,
            ..MediaFeatures::default()
        }
    }

    /// Host language and culture for `:lang()` matching.
    fn get_language(&self) -> (String, String) {
        ("en".to_string(), String::new())
    }

    /// Fetch the text of an imported stylesheet. `baseurl` is the URL
    /// of the referencing sheet/document.
    fn import_css(&mut self, _url: &str, _baseurl: &str) -> String {
        String::new()
    }

    /// Notification that a `<link>` element was seen.
    fn link(&mut self, _rel: &str, _href: &str) {}

    /// An anchor was activated.
    fn on_anchor_click(&mut self, _url: &str) {}

    /// Update the mouse cursor (a CSS cursor keyword).
    fn set_cursor(&mut self, _cursor: &str) {}

    /// Apply a `text-transform` to a run of text.
    fn transform_text(&mut self, text: &str, transform: TextTransform) -> String {
        match transform {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Capitalize => {
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for c in text.chars() {
                    if at_word_start {
                        out.extend(c.to_uppercase());
                    } else {
                        out.push(c);
                    }
                    at_word_start = c.is_whitespace();
                }
                out
            }
        }
    }

    /// The document title changed.
    fn set_caption(&mut self, _caption: &str) {}
}
