//! The headless `DocumentContainer`: fontdue text on a tiny-skia
//! surface, image decoding through the `image` crate, resource fetch
//! through `tern-common::net`.
//!
//! The container owns the pixel surface; the engine's opaque draw
//! handle is ignored (there is exactly one surface per container).

use std::collections::HashMap;
use std::rc::Rc;

use fontdue::{Font, FontSettings};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Transform};
use url::Url;

use tern_css::keywords::{BackgroundRepeat, FontStyle};
use tern_css::Color;
use tern_engine::backend::{
    BackgroundPaint, BorderRadii, Borders, DocumentContainer, DrawHandle, FontHandle, FontMetrics,
    ListMarker, FONT_DECORATION_LINETHROUGH, FONT_DECORATION_OVERLINE, FONT_DECORATION_UNDERLINE,
};
use tern_engine::geometry::{Position, Size};

/// Common system font paths, searched in order for the regular face.
const FONT_SEARCH_PATHS: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// Bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// One created font: a face at a size plus decoration flags.
struct LoadedFont {
    font: Rc<Font>,
    size: f32,
    decoration: u32,
}

/// A decoded image with premultiplied-free RGBA pixels.
struct CachedImage {
    data: image::RgbaImage,
}

/// Headless backend rendering onto an in-memory RGBA surface.
pub struct HeadlessContainer {
    pixmap: Pixmap,
    viewport: Size,
    base_url: Option<Url>,
    regular: Option<Rc<Font>>,
    bold: Option<Rc<Font>>,
    italic: Option<Rc<Font>>,
    bold_italic: Option<Rc<Font>>,
    fonts: Vec<LoadedFont>,
    images: HashMap<String, CachedImage>,
    clip_stack: Vec<Position>,
    /// The last cursor keyword the engine requested.
    pub cursor: String,
    /// The last document title the engine reported.
    pub caption: String,
}

impl HeadlessContainer {
    /// Create a container with a white surface of the given size.
    pub fn new(width: u32, height: u32) -> anyhow::Result<Self> {
        let mut pixmap = Pixmap::new(width.max(1), height.max(1))
            .ok_or_else(|| anyhow::anyhow!("cannot allocate {width}x{height} surface"))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let regular = load_font_from(FONT_SEARCH_PATHS);
        if regular.is_none() {
            tracing::warn!(target: "tern", "no system font found; text will not render");
        }

        Ok(Self {
            pixmap,
            viewport: Size::new(width as i32, height as i32),
            base_url: None,
            regular,
            bold: load_font_from(FONT_BOLD_SEARCH_PATHS),
            italic: load_font_from(FONT_ITALIC_SEARCH_PATHS),
            bold_italic: load_font_from(FONT_BOLD_ITALIC_SEARCH_PATHS),
            fonts: Vec::new(),
            images: HashMap::new(),
            clip_stack: Vec::new(),
            cursor: "auto".to_string(),
            caption: String::new(),
        })
    }

    /// Set the base URL used to resolve fetches.
    pub fn set_base_url(&mut self, url: Option<Url>) {
        self.base_url = url;
    }

    /// The rendered surface.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Resize the surface (e.g. to the rendered document height),
    /// clearing it to white.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if let Some(mut pixmap) = Pixmap::new(width.max(1), height.max(1)) {
            pixmap.fill(tiny_skia::Color::WHITE);
            self.pixmap = pixmap;
        }
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> anyhow::Result<Vec<u8>> {
        Ok(self.pixmap.encode_png()?)
    }

    fn font(&self, handle: FontHandle) -> Option<&LoadedFont> {
        handle.checked_sub(1).and_then(|i| self.fonts.get(i))
    }

    /// The intersection of the current clip stack.
    fn effective_clip(&self) -> Option<Position> {
        let mut clip: Option<Position> = None;
        for c in &self.clip_stack {
            clip = Some(match clip {
                None => *c,
                Some(prev) => intersect(&prev, c),
            });
        }
        clip
    }

    /// Fill a rectangle with a color, honouring the clip stack.
    fn fill_rect(&mut self, rect: Position, color: Color) {
        if color.is_transparent() || rect.width <= 0 || rect.height <= 0 {
            return;
        }
        let rect = match self.effective_clip() {
            Some(clip) => intersect(&rect, &clip),
            None => rect,
        };
        if rect.width <= 0 || rect.height <= 0 {
            return;
        }
        let Some(skia_rect) = Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        self.pixmap
            .fill_rect(skia_rect, &paint, Transform::identity(), None);
    }

    /// Blend one coverage value of `color` at (x, y).
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if coverage == 0 || x < 0 || y < 0 {
            return;
        }
        if let Some(clip) = self.effective_clip() {
            if !clip.is_point_inside(x, y) {
                return;
            }
        }
        let (w, h) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        if x >= w || y >= h {
            return;
        }
        let alpha = u32::from(coverage) * u32::from(color.a) / 255;
        if alpha == 0 {
            return;
        }
        let idx = ((y * w + x) * 4) as usize;
        let data = self.pixmap.data_mut();
        let inv = 255 - alpha;
        data[idx] = ((u32::from(color.r) * alpha + u32::from(data[idx]) * inv) / 255) as u8;
        data[idx + 1] = ((u32::from(color.g) * alpha + u32::from(data[idx + 1]) * inv) / 255) as u8;
        data[idx + 2] = ((u32::from(color.b) * alpha + u32::from(data[idx + 2]) * inv) / 255) as u8;
        data[idx + 3] = (alpha + u32::from(data[idx + 3]) * inv / 255).min(255) as u8;
    }

    fn blit_image(&mut self, image_key: &str, x: i32, y: i32, size: Size) {
        let Some(cached) = self.images.get(image_key) else {
            return;
        };
        let src = &cached.data;
        if size.width <= 0 || size.height <= 0 || src.width() == 0 || src.height() == 0 {
            return;
        }
        let scaled;
        let pixels = if size.width as u32 == src.width() && size.height as u32 == src.height() {
            src.clone()
        } else {
            scaled = image::imageops::resize(
                src,
                size.width as u32,
                size.height as u32,
                image::imageops::FilterType::Triangle,
            );
            scaled
        };
        let pixel_rows: Vec<(i32, i32, Color)> = pixels
            .enumerate_pixels()
            .map(|(px, py, p)| {
                (
                    x + px as i32,
                    y + py as i32,
                    Color::rgba(p[0], p[1], p[2], p[3]),
                )
            })
            .collect();
        for (px, py, color) in pixel_rows {
            self.blend_pixel(px, py, color, 255);
        }
    }

    fn resolve(&self, reference: &str) -> Option<Url> {
        tern_common::urlutil::resolve(self.base_url.as_ref(), reference)
    }
}

fn load_font_from(paths: &[&str]) -> Option<Rc<Font>> {
    for path in paths {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = Font::from_bytes(data, FontSettings::default()) {
                tracing::debug!(target: "tern", path, "loaded font");
                return Some(Rc::new(font));
            }
        }
    }
    None
}

fn intersect(a: &Position, b: &Position) -> Position {
    let left = a.left().max(b.left());
    let top = a.top().max(b.top());
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    Position::new(left, top, (right - left).max(0), (bottom - top).max(0))
}

impl DocumentContainer for HeadlessContainer {
    fn create_font(
        &mut self,
        _family: &str,
        size: i32,
        weight: i32,
        style: FontStyle,
        decoration: u32,
        metrics: &mut FontMetrics,
    ) -> FontHandle {
        let italic = style != FontStyle::Normal;
        let bold = weight >= 600;
        let face = match (bold, italic) {
            (true, true) => self
                .bold_italic
                .clone()
                .or_else(|| self.bold.clone())
                .or_else(|| self.italic.clone())
                .or_else(|| self.regular.clone()),
            (true, false) => self.bold.clone().or_else(|| self.regular.clone()),
            (false, true) => self.italic.clone().or_else(|| self.regular.clone()),
            (false, false) => self.regular.clone(),
        };
        let Some(face) = face else {
            return 0;
        };

        let px = size.max(1) as f32;
        let line = face.horizontal_line_metrics(px);
        let (ascent, descent) = match line {
            Some(lm) => (lm.ascent.ceil() as i32, (-lm.descent).ceil() as i32),
            None => ((px * 0.8) as i32, (px * 0.2) as i32),
        };
        let x_height = {
            let m = face.metrics('x', px);
            if m.height > 0 {
                m.height as i32
            } else {
                (px / 2.0) as i32
            }
        };
        *metrics = FontMetrics {
            height: ascent + descent,
            ascent,
            descent,
            x_height,
            draw_spaces: decoration != 0,
        };

        self.fonts.push(LoadedFont {
            font: face,
            size: px,
            decoration,
        });
        self.fonts.len()
    }

    fn delete_font(&mut self, _font: FontHandle) {
        // Fonts share Rc'd faces; per-handle state is dropped with the
        // container.
    }

    fn text_width(&mut self, text: &str, font: FontHandle) -> i32 {
        let Some(loaded) = self.font(font) else {
            return 0;
        };
        let mut width = 0.0f32;
        for c in text.chars() {
            width += loaded.font.metrics(c, loaded.size).advance_width;
        }
        width.ceil() as i32
    }

    fn draw_text(&mut self, _hdc: DrawHandle, text: &str, font: FontHandle, color: Color, pos: Position) {
        let Some(loaded) = self.font(font) else {
            return;
        };
        let face = Rc::clone(&loaded.font);
        let size = loaded.size;
        let decoration = loaded.decoration;

        let baseline = pos.y
            + face
                .horizontal_line_metrics(size)
                .map_or(pos.height as f32 * 0.8, |lm| lm.ascent)
                .round() as i32;

        let mut pen_x = pos.x as f32;
        for c in text.chars() {
            let (metrics, bitmap) = face.rasterize(c, size);
            let glyph_x = pen_x as i32 + metrics.xmin;
            let glyph_y = baseline - metrics.ymin - metrics.height as i32;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let coverage = bitmap[row * metrics.width + col];
                    self.blend_pixel(
                        glyph_x + col as i32,
                        glyph_y + row as i32,
                        color,
                        coverage,
                    );
                }
            }
            pen_x += metrics.advance_width;
        }

        let width = (pen_x as i32 - pos.x).max(0);
        if decoration & FONT_DECORATION_UNDERLINE != 0 {
            self.fill_rect(Position::new(pos.x, baseline + 1, width, 1), color);
        }
        if decoration & FONT_DECORATION_LINETHROUGH != 0 {
            let mid = baseline - (size * 0.3) as i32;
            self.fill_rect(Position::new(pos.x, mid, width, 1), color);
        }
        if decoration & FONT_DECORATION_OVERLINE != 0 {
            let top = baseline - (size * 0.9) as i32;
            self.fill_rect(Position::new(pos.x, top, width, 1), color);
        }
    }

    fn load_image(&mut self, url: &str, _redraw_on_ready: bool) {
        if self.images.contains_key(url) {
            return;
        }
        let Some(resolved) = self.resolve(url) else {
            return;
        };
        match tern_common::net::fetch(&resolved) {
            Ok(bytes) => match image::load_from_memory(&bytes) {
                Ok(decoded) => {
                    self.images.insert(
                        url.to_string(),
                        CachedImage {
                            data: decoded.to_rgba8(),
                        },
                    );
                }
                Err(err) => {
                    tern_common::warn_once("image", &format!("cannot decode '{url}': {err}"));
                }
            },
            Err(err) => {
                tern_common::warn_once("image", &format!("cannot fetch '{url}': {err}"));
            }
        }
    }

    fn get_image_size(&mut self, url: &str) -> Size {
        // Synchronous host: resolve on demand so first layout sees the
        // intrinsic size.
        if !self.images.contains_key(url) {
            self.load_image(url, false);
        }
        self.images.get(url).map_or_else(Size::default, |img| {
            Size::new(img.data.width() as i32, img.data.height() as i32)
        })
    }

    fn draw_background(&mut self, _hdc: DrawHandle, paint: &BackgroundPaint) {
        if !paint.color.is_transparent() {
            let rect = if paint.is_root {
                Position::new(
                    0,
                    0,
                    self.pixmap.width() as i32,
                    self.pixmap.height() as i32,
                )
            } else {
                paint.clip_box
            };
            self.fill_rect(rect, paint.color);
        }

        if !paint.image.is_empty() && paint.image_size.width > 0 && paint.image_size.height > 0 {
            self.clip_stack.push(paint.clip_box);
            let (w, h) = (paint.image_size.width, paint.image_size.height);
            let (start_x, start_y) = (paint.position_x, paint.position_y);
            let clip = paint.clip_box;

            let xs: Vec<i32> = match paint.repeat {
                BackgroundRepeat::Repeat | BackgroundRepeat::RepeatX => {
                    tile_positions(start_x, w, clip.left(), clip.right())
                }
                _ => vec![start_x],
            };
            let ys: Vec<i32> = match paint.repeat {
                BackgroundRepeat::Repeat | BackgroundRepeat::RepeatY => {
                    tile_positions(start_y, h, clip.top(), clip.bottom())
                }
                _ => vec![start_y],
            };
            let image = paint.image.clone();
            for &ty in &ys {
                for &tx in &xs {
                    self.blit_image(&image, tx, ty, paint.image_size);
                }
            }
            self.clip_stack.pop();
        }
    }

    fn draw_borders(&mut self, _hdc: DrawHandle, borders: &Borders, pos: Position, _root: bool) {
        // Solid strips per side; line styles beyond solid render as
        // solid (headless output only needs the geometry).
        if borders.top.width > 0 {
            self.fill_rect(
                Position::new(pos.x, pos.y, pos.width, borders.top.width),
                borders.top.color,
            );
        }
        if borders.bottom.width > 0 {
            self.fill_rect(
                Position::new(
                    pos.x,
                    pos.bottom() - borders.bottom.width,
                    pos.width,
                    borders.bottom.width,
                ),
                borders.bottom.color,
            );
        }
        if borders.left.width > 0 {
            self.fill_rect(
                Position::new(pos.x, pos.y, borders.left.width, pos.height),
                borders.left.color,
            );
        }
        if borders.right.width > 0 {
            self.fill_rect(
                Position::new(
                    pos.right() - borders.right.width,
                    pos.y,
                    borders.right.width,
                    pos.height,
                ),
                borders.right.color,
            );
        }
    }

    fn draw_list_marker(&mut self, _hdc: DrawHandle, marker: &ListMarker) {
        if !marker.image.is_empty() {
            let image = marker.image.clone();
            if let Some(url) = self.resolve(&image) {
                let key = url.to_string();
                self.load_image(&key, false);
                self.blit_image(
                    &key,
                    marker.pos.x,
                    marker.pos.y,
                    Size::new(marker.pos.width, marker.pos.height),
                );
                return;
            }
        }

        use tern_css::keywords::ListStyleType;
        match marker.marker_type {
            ListStyleType::Square => {
                self.fill_rect(marker.pos, marker.color);
            }
            _ => {
                let cx = marker.pos.x as f32 + marker.pos.width as f32 / 2.0;
                let cy = marker.pos.y as f32 + marker.pos.height as f32 / 2.0;
                let radius = (marker.pos.width.min(marker.pos.height) as f32 / 2.0).max(1.0);
                let mut builder = PathBuilder::new();
                builder.push_circle(cx, cy, radius);
                let Some(path) = builder.finish() else { return };
                let mut paint = Paint::default();
                paint.set_color_rgba8(
                    marker.color.r,
                    marker.color.g,
                    marker.color.b,
                    marker.color.a,
                );
                if marker.marker_type == ListStyleType::Circle {
                    let stroke = tiny_skia::Stroke {
                        width: 1.0,
                        ..tiny_skia::Stroke::default()
                    };
                    self.pixmap
                        .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                } else {
                    self.pixmap.fill_path(
                        &path,
                        &paint,
                        tiny_skia::FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
        }
    }

    fn set_clip(&mut self, pos: Position, _radii: &BorderRadii, _valid_x: bool, _valid_y: bool) {
        self.clip_stack.push(pos);
    }

    fn del_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn get_client_rect(&self) -> Position {
        Position::new(0, 0, self.viewport.width, self.viewport.height)
    }

    fn import_css(&mut self, url: &str, _baseurl: &str) -> String {
        let Some(resolved) = self.resolve(url) else {
            return String::new();
        };
        match tern_common::net::fetch_text(&resolved) {
            Ok(text) => text,
            Err(err) => {
                tern_common::warn_once("css", &format!("cannot fetch '{url}': {err}"));
                String::new()
            }
        }
    }

    fn set_cursor(&mut self, cursor: &str) {
        self.cursor = cursor.to_string();
    }

    fn set_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
    }
}

/// Tile origins covering `[from, to)` for a tile of `size` anchored at
/// `start`.
fn tile_positions(start: i32, size: i32, from: i32, to: i32) -> Vec<i32> {
    if size <= 0 {
        return vec![start];
    }
    let mut first = start;
    while first > from {
        first -= size;
    }
    let mut out = Vec::new();
    let mut x = first;
    while x < to {
        out.push(x);
        x += size;
    }
    out
}
