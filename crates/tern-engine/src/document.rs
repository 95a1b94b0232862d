//! The document: element tree + stylesheets + fonts + render state.
//!
//! A [`Document`] is created per page from a pre-parsed `tern-dom`
//! tree. Creation runs the full style pipeline (master sheet, author
//! sheets, inline styles, computed values); [`Document::render`] lays
//! the tree out for a containing width and [`Document::draw`] issues
//! paint primitives to the host backend. All operations are
//! single-threaded and run to completion.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tern_css::keywords::{
    value_index, Display, ElementFloat, ElementPosition, FontStyle, Overflow, Visibility,
    WhiteSpace, FONT_WEIGHT_KEYWORDS,
};
use tern_css::{CssLength, CssProperty, CssUnit, CssValue, MediaFeatures, MediaQueryList, Stylesheet};
use tern_dom::{NodeId, NodeKind, Tree};
use url::Url;

use crate::backend::{
    DocumentContainer, DrawHandle, FontHandle, FontMetrics, FONT_DECORATION_LINETHROUGH,
    FONT_DECORATION_OVERLINE, FONT_DECORATION_UNDERLINE,
};
use crate::element::ElementState;
use crate::geometry::{Position, Size};
use crate::master_css::MASTER_CSS;

/// Shared handle to the host backend.
pub type ContainerRef = Rc<RefCell<dyn DocumentContainer>>;

/// A cached font with its metrics.
struct FontItem {
    font: FontHandle,
    metrics: FontMetrics,
}

/// Options for document creation.
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    /// Replacement user-agent stylesheet (defaults to the built-in one).
    pub master_css: Option<String>,
    /// The document base URL; `<base href>` overrides it.
    pub base_url: Option<Url>,
}

/// A rendered page: tree, styles, fonts and layout results.
pub struct Document {
    pub(crate) container: ContainerRef,
    pub(crate) tree: Tree,
    pub(crate) root: NodeId,
    pub(crate) states: Vec<ElementState>,
    pub(crate) master: Stylesheet,
    pub(crate) sheets: Vec<Stylesheet>,
    pub(crate) media_lists: Vec<tern_css::MediaQueryListRef>,
    pub(crate) base_url: Option<Url>,
    pub(crate) language: String,
    pub(crate) culture: String,
    pub(crate) media: MediaFeatures,
    pub(crate) over_element: Option<NodeId>,
    pub(crate) size: Size,
    pub(crate) next_box_id: u32,
    fonts: HashMap<String, FontItem>,
}

impl Document {
    /// Build a document from a pre-parsed element tree.
    ///
    /// `root` is the root element (typically `<html>`). Stylesheet
    /// sources are collected from the tree (`<style>`, `<link
    /// rel=stylesheet>` through the host `import_css`), the master
    /// sheet is applied below them, and every element's computed style
    /// is resolved. The document is ready to [`Document::render`].
    pub fn from_tree(
        container: ContainerRef,
        tree: Tree,
        root: NodeId,
        options: DocumentOptions,
    ) -> Self {
        let master_text = options
            .master_css
            .unwrap_or_else(|| MASTER_CSS.to_string());
        let master = Stylesheet::parse(&master_text, "", None);

        let (language, culture) = container.borrow().get_language();
        let media = container.borrow().get_media_features();

        let mut states = Vec::with_capacity(tree.len());
        states.resize_with(tree.len(), ElementState::default);

        let mut doc = Self {
            container,
            tree,
            root,
            states,
            master,
            sheets: Vec::new(),
            media_lists: Vec::new(),
            base_url: options.base_url,
            language,
            culture,
            media,
            over_element: None,
            size: Size::default(),
            next_box_id: 0,
            fonts: HashMap::new(),
        };

        doc.collect_document_resources();
        doc.collect_media_lists();
        doc.update_media_lists();
        doc.apply_all_styles();
        doc.parse_styles_subtree(doc.root);
        doc
    }

    // ── resource collection ────────────────────────────────────────

    /// Walk the tree once for `<title>`, `<base>`, `<link>`, `<style>`
    /// and `<img>` side effects, collecting author stylesheets in
    /// document order.
    fn collect_document_resources(&mut self) {
        let mut sheet_sources: Vec<(String, String, String)> = Vec::new(); // (text, baseurl, media)
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(element) = self.tree.as_element(id) {
                let tag = element.tag.clone();
                match tag.as_str() {
                    "title" => {
                        let caption = self.tree.text_content(id);
                        self.container.borrow_mut().set_caption(caption.trim());
                    }
                    "base" => {
                        let href = self.tree.attr(id, "href").map(str::to_string);
                        if let Some(href) = href {
                            if let Some(url) =
                                tern_common::urlutil::resolve(self.base_url.as_ref(), &href)
                            {
                                self.base_url = Some(url);
                            }
                        }
                    }
                    "link" => {
                        let rel = self.tree.attr(id, "rel").unwrap_or("").to_string();
                        let href = self.tree.attr(id, "href").unwrap_or("").to_string();
                        let media = self.tree.attr(id, "media").unwrap_or("").to_string();
                        self.container.borrow_mut().link(&rel, &href);
                        if rel.eq_ignore_ascii_case("stylesheet") && !href.is_empty() {
                            let resolved = tern_common::urlutil::resolve(
                                self.base_url.as_ref(),
                                &href,
                            );
                            let url_text = resolved
                                .as_ref()
                                .map(Url::to_string)
                                .unwrap_or_else(|| href.clone());
                            let base_text = self
                                .base_url
                                .as_ref()
                                .map(Url::to_string)
                                .unwrap_or_default();
                            let css = self
                                .container
                                .borrow_mut()
                                .import_css(&url_text, &base_text);
                            if !css.is_empty() {
                                sheet_sources.push((css, url_text, media));
                            }
                        }
                    }
                    "style" => {
                        let css = self.tree.text_content(id);
                        if !css.trim().is_empty() {
                            let media = self.tree.attr(id, "media").unwrap_or("").to_string();
                            let base_text = self
                                .base_url
                                .as_ref()
                                .map(Url::to_string)
                                .unwrap_or_default();
                            sheet_sources.push((css, base_text, media));
                        }
                    }
                    "img" => {
                        if let Some(src) = self.tree.attr(id, "src") {
                            if let Some(url) =
                                tern_common::urlutil::resolve(self.base_url.as_ref(), src)
                            {
                                self.container.borrow_mut().load_image(url.as_str(), false);
                            }
                        }
                    }
                    _ => {}
                }
            }
            // Children pushed in reverse so the walk stays in document
            // order (stylesheet order is observable through the
            // cascade).
            for &child in self.tree.children(id).iter().rev() {
                stack.push(child);
            }
        }

        for (text, baseurl, media_attr) in sheet_sources {
            self.add_stylesheet(&text, &baseurl, &media_attr, 0);
        }
    }

    /// Parse stylesheet text and register it, fetching `@import`s
    /// through the host first (so imported rules cascade earlier).
    pub fn add_stylesheet(&mut self, text: &str, baseurl: &str, media_attr: &str, depth: u32) {
        let media = if media_attr.trim().is_empty() {
            None
        } else {
            MediaQueryList::parse(media_attr)
        };
        let sheet = Stylesheet::parse(text, baseurl, media);

        if depth < 8 {
            for import in sheet.imports.clone() {
                let base = Url::parse(baseurl).ok();
                let resolved = tern_common::urlutil::resolve(base.as_ref(), &import.url);
                let url_text = resolved
                    .as_ref()
                    .map(Url::to_string)
                    .unwrap_or(import.url);
                let css = self.container.borrow_mut().import_css(&url_text, baseurl);
                if !css.is_empty() {
                    self.add_stylesheet(&css, &url_text, &import.media, depth + 1);
                }
            }
        }

        self.sheets.push(sheet);
    }

    fn collect_media_lists(&mut self) {
        self.media_lists.clear();
        for list in &self.master.media_lists {
            self.media_lists.push(Rc::clone(list));
        }
        for sheet in &self.sheets {
            for list in &sheet.media_lists {
                self.media_lists.push(Rc::clone(list));
            }
        }
    }

    /// Re-evaluate every media query list; true when any flipped.
    pub(crate) fn update_media_lists(&mut self) -> bool {
        let mut changed = false;
        for list in &self.media_lists {
            if list.borrow_mut().apply_media_features(&self.media) {
                changed = true;
            }
        }
        changed
    }

    /// Re-read media features from the host; restyle when any media
    /// query list flips. Returns true when styles changed.
    pub fn media_changed(&mut self) -> bool {
        if self.media_lists.is_empty() {
            return false;
        }
        self.media = self.container.borrow().get_media_features();
        if self.update_media_lists() {
            self.restyle_subtree(self.root);
            return true;
        }
        false
    }

    // ── state accessors ────────────────────────────────────────────

    pub(crate) fn st(&self, id: NodeId) -> &ElementState {
        &self.states[id.index()]
    }

    pub(crate) fn st_mut(&mut self, id: NodeId) -> &mut ElementState {
        &mut self.states[id.index()]
    }

    /// Allocate state slots for nodes created after construction
    /// (generated content).
    pub(crate) fn sync_states(&mut self) {
        if self.states.len() < self.tree.len() {
            self.states.resize_with(self.tree.len(), ElementState::default);
        }
    }

    pub(crate) fn alloc_box_id(&mut self) -> u32 {
        self.next_box_id += 1;
        self.next_box_id
    }

    // ── element predicates & geometry (litehtml box arithmetic) ────

    pub(crate) fn have_parent(&self, id: NodeId) -> bool {
        self.tree.parent(id).is_some()
    }

    pub(crate) fn is_body(&self, id: NodeId) -> bool {
        self.tree.as_element(id).is_some_and(|e| e.tag == "body")
    }

    pub(crate) fn is_break(&self, id: NodeId) -> bool {
        self.tree.as_element(id).is_some_and(|e| e.tag == "br")
    }

    pub(crate) fn is_replaced(&self, id: NodeId) -> bool {
        self.tree.as_element(id).is_some_and(|e| e.tag == "img")
    }

    /// Collapsible whitespace node (in `pre`/`pre-wrap` modes the run
    /// is real text).
    pub(crate) fn is_white_space(&self, id: NodeId) -> bool {
        matches!(self.tree.get(id).kind, NodeKind::Whitespace(_))
            && matches!(
                self.st(id).white_space,
                WhiteSpace::Normal | WhiteSpace::Nowrap | WhiteSpace::PreLine
            )
    }

    pub(crate) fn is_inline_box(&self, id: NodeId) -> bool {
        self.st(id).display.is_inline_level()
    }

    pub(crate) fn is_positioned(&self, id: NodeId) -> bool {
        self.st(id).el_position.is_positioned()
    }

    pub(crate) fn is_visible(&self, id: NodeId) -> bool {
        !self.st(id).skip
            && self.st(id).display != Display::None
            && !matches!(
                self.st(id).visibility,
                Visibility::Hidden | Visibility::Collapse
            )
    }

    /// A floats-holder answers line-left/line-right queries and owns
    /// float lists: the root, out-of-flow elements, inline-block /
    /// table-cell containers and clipping boxes.
    pub(crate) fn is_floats_holder(&self, id: NodeId) -> bool {
        let st = self.st(id);
        !self.have_parent(id)
            || st.display == Display::InlineBlock
            || st.display == Display::TableCell
            || st.float != ElementFloat::None
            || matches!(
                st.el_position,
                ElementPosition::Absolute | ElementPosition::Fixed
            )
            || st.overflow > Overflow::Visible
    }

    pub(crate) fn content_margins_left(&self, id: NodeId) -> i32 {
        let st = self.st(id);
        st.margins.left + st.padding.left + st.borders.left
    }

    pub(crate) fn content_margins_right(&self, id: NodeId) -> i32 {
        let st = self.st(id);
        st.margins.right + st.padding.right + st.borders.right
    }

    pub(crate) fn content_margins_top(&self, id: NodeId) -> i32 {
        let st = self.st(id);
        st.margins.top + st.padding.top + st.borders.top
    }

    pub(crate) fn content_margins_bottom(&self, id: NodeId) -> i32 {
        let st = self.st(id);
        st.margins.bottom + st.padding.bottom + st.borders.bottom
    }

    /// Outer (margin-box) width.
    pub(crate) fn el_width(&self, id: NodeId) -> i32 {
        self.st(id).pos.width + self.content_margins_left(id) + self.content_margins_right(id)
    }

    /// Outer (margin-box) height.
    pub(crate) fn el_height(&self, id: NodeId) -> i32 {
        self.st(id).pos.height + self.content_margins_top(id) + self.content_margins_bottom(id)
    }

    /// Margin-box left edge relative to the parent content box.
    pub(crate) fn el_left(&self, id: NodeId) -> i32 {
        self.st(id).pos.x - self.content_margins_left(id)
    }

    pub(crate) fn el_right(&self, id: NodeId) -> i32 {
        self.el_left(id) + self.el_width(id)
    }

    pub(crate) fn el_top(&self, id: NodeId) -> i32 {
        self.st(id).pos.y - self.content_margins_top(id)
    }

    pub(crate) fn el_bottom(&self, id: NodeId) -> i32 {
        self.el_top(id) + self.el_height(id)
    }

    /// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// Top margins collapse through a box with no top border/padding
    /// that stays in the normal flow.
    pub(crate) fn collapse_top_margin(&self, id: NodeId) -> bool {
        let st = self.st(id);
        st.borders.top == 0
            && st.padding.top == 0
            && self.have_parent(id)
            && st.float == ElementFloat::None
            && !matches!(
                st.el_position,
                ElementPosition::Absolute | ElementPosition::Fixed
            )
    }

    pub(crate) fn collapse_bottom_margin(&self, id: NodeId) -> bool {
        let st = self.st(id);
        st.borders.bottom == 0
            && st.padding.bottom == 0
            && self.have_parent(id)
            && st.float == ElementFloat::None
            && !matches!(
                st.el_position,
                ElementPosition::Absolute | ElementPosition::Fixed
            )
    }

    // ── style value resolution ─────────────────────────────────────

    /// Resolve a property on an element, walking the inheritance rules:
    /// the element's declared value unless it is the literal `inherit`;
    /// the parent's resolved value for `inherit` and for undeclared
    /// inherited properties; the table default otherwise.
    pub(crate) fn resolve_value(&self, id: NodeId, property: CssProperty) -> CssValue {
        let mut current = Some(id);
        while let Some(node) = current {
            match self.st(node).style.get(property) {
                Some(value) if value.is_inherit() => {
                    current = self.tree.parent(node);
                }
                Some(value) => return value.clone(),
                None => {
                    if property.inherited() {
                        current = self.tree.parent(node);
                    } else {
                        break;
                    }
                }
            }
        }
        CssValue::default_for(property)
    }

    /// String form of a resolved property.
    pub(crate) fn style_string(&self, id: NodeId, property: CssProperty) -> String {
        self.resolve_value(id, property).string().to_string()
    }

    // ── units ──────────────────────────────────────────────────────

    /// Convert a length to px, normalizing absolute units in place.
    ///
    /// `%` resolves against `base`; `em` against `font_size`; `rem`
    /// against the root font size; physical units through the host
    /// `pt_to_px`; viewport units against the media width/height.
    /// Predefined keywords resolve to 0 — callers interpret them.
    pub(crate) fn cvt_units(&self, value: &mut CssLength, font_size: i32, base: i32) -> i32 {
        if value.is_predefined() {
            return 0;
        }
        let container = self.container.borrow();
        let px = match value.units() {
            CssUnit::Percent => value.calc_percent(base),
            CssUnit::Em => {
                let px = (value.val() * font_size as f32).round() as i32;
                value.set_value(px as f32, CssUnit::Px);
                px
            }
            CssUnit::Ex => {
                let px = (value.val() * font_size as f32 / 2.0).round() as i32;
                value.set_value(px as f32, CssUnit::Px);
                px
            }
            CssUnit::Pt => {
                let px = container.pt_to_px(value.val() as i32);
                value.set_value(px as f32, CssUnit::Px);
                px
            }
            CssUnit::Pc => {
                let px = container.pt_to_px((value.val() * 12.0) as i32);
                value.set_value(px as f32, CssUnit::Px);
                px
            }
            CssUnit::In => {
                let px = container.pt_to_px((value.val() * 72.0) as i32);
                value.set_value(px as f32, CssUnit::Px);
                px
            }
            CssUnit::Cm => {
                let px = container.pt_to_px((value.val() * 0.3937 * 72.0) as i32);
                value.set_value(px as f32, CssUnit::Px);
                px
            }
            CssUnit::Mm => {
                let px = container.pt_to_px((value.val() * 0.3937 * 72.0) as i32 / 10);
                value.set_value(px as f32, CssUnit::Px);
                px
            }
            CssUnit::Vw => (f64::from(self.media.width) * f64::from(value.val()) / 100.0) as i32,
            CssUnit::Vh => (f64::from(self.media.height) * f64::from(value.val()) / 100.0) as i32,
            CssUnit::Vmin => {
                (f64::from(self.media.width.min(self.media.height)) * f64::from(value.val())
                    / 100.0) as i32
            }
            CssUnit::Vmax => {
                (f64::from(self.media.width.max(self.media.height)) * f64::from(value.val())
                    / 100.0) as i32
            }
            CssUnit::Rem => {
                let root_size = self.st(self.root).font_size.max(1);
                let px = (value.val() * root_size as f32).round() as i32;
                value.set_value(px as f32, CssUnit::Px);
                px
            }
            CssUnit::None | CssUnit::Px => value.val() as i32,
        };
        px
    }

    // ── fonts ──────────────────────────────────────────────────────

    /// Get (creating and caching on miss) a font for the given
    /// computed properties. Keyed by family:size:weight:style:decoration.
    pub(crate) fn get_font(
        &mut self,
        family: &str,
        size: i32,
        weight: &str,
        style: &str,
        decoration: &str,
    ) -> (FontHandle, FontMetrics) {
        let container = Rc::clone(&self.container);
        let family = if family.is_empty() || family.eq_ignore_ascii_case("inherit") {
            container.borrow().default_font_name()
        } else {
            family.to_string()
        };
        let size = if size > 0 {
            size
        } else {
            container.borrow().default_font_size()
        };

        let key = format!("{family}:{size}:{weight}:{style}:{decoration}");
        if let Some(item) = self.fonts.get(&key) {
            return (item.font, item.metrics);
        }

        let font_style = FontStyle::from_index(value_index(
            style,
            tern_css::keywords::FONT_STYLE_KEYWORDS,
        ));
        let numeric_weight = parse_font_weight(weight);
        let decoration_bits = parse_decoration(decoration);

        let mut metrics = FontMetrics::default();
        let font = container.borrow_mut().create_font(
            &family,
            size,
            numeric_weight,
            font_style,
            decoration_bits,
            &mut metrics,
        );
        self.fonts.insert(key, FontItem { font, metrics });
        (font, metrics)
    }

    // ── public surface ─────────────────────────────────────────────

    /// The element tree.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Rendered document width (after [`Document::render`]).
    #[must_use]
    pub fn width(&self) -> i32 {
        self.size.width
    }

    /// Rendered document height.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.size.height
    }

    /// Lay out the document for a containing width; returns the used
    /// width.
    pub fn render(&mut self, max_width: i32) -> i32 {
        let ret = self.render_element(self.root, 0, 0, max_width, false);
        self.fetch_positioned(self.root);
        self.render_positioned_pass(self.root);
        let mut size = Size::default();
        self.calc_document_size(self.root, &mut size, 0, 0);
        self.size = size;
        ret
    }

    /// Paint the document onto the host surface.
    pub fn draw(&mut self, hdc: DrawHandle, x: i32, y: i32, clip: Option<&Position>) {
        self.draw_element(self.root, hdc, x, y, clip);
        self.draw_stacking_context(self.root, hdc, x, y, clip, true);
    }

    /// The topmost element whose border box contains the point, in
    /// reverse paint order.
    #[must_use]
    pub fn element_at(&self, x: i32, y: i32, client_x: i32, client_y: i32) -> Option<NodeId> {
        self.get_element_by_point(self.root, x, y, client_x, client_y)
    }

    /// Resolved `color` for an element (test/inspection hook).
    #[must_use]
    pub fn computed_color(&self, id: NodeId) -> tern_css::Color {
        self.resolve_value(id, CssProperty::Color).color()
    }

    /// Resolved value for any property, applying the inheritance rules
    /// (inspection hook).
    #[must_use]
    pub fn resolved_property(&self, id: NodeId, property: CssProperty) -> CssValue {
        self.resolve_value(id, property)
    }

    /// The content-box rectangle computed for `id`, relative to its
    /// parent's content box.
    #[must_use]
    pub fn element_position(&self, id: NodeId) -> Position {
        self.st(id).pos
    }

    /// Used margin/padding/border widths for `id`.
    #[must_use]
    pub fn element_box_edges(&self, id: NodeId) -> (crate::geometry::Margins, crate::geometry::Margins, crate::geometry::Margins) {
        let st = self.st(id);
        (st.margins, st.padding, st.borders)
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        // Fonts were created through the host; release them the same
        // way.
        let mut container = self.container.borrow_mut();
        for item in self.fonts.values() {
            if item.font != 0 {
                container.delete_font(item.font);
            }
        }
    }
}

/// Numeric weight from a `font-weight` value: named keywords map to
/// the classic scale, numbers pass through, anything else is 400.
fn parse_font_weight(weight: &str) -> i32 {
    match value_index(weight, FONT_WEIGHT_KEYWORDS) {
        0 => 400,
        1 => 700,
        2 => 600,
        3 => 300,
        _ => {
            let parsed = weight.trim().parse::<i32>().unwrap_or(400);
            if parsed < 100 {
                400
            } else {
                parsed
            }
        }
    }
}

/// Decoration bits from a `text-decoration` value.
fn parse_decoration(decoration: &str) -> u32 {
    let mut bits = 0;
    for token in decoration.split_whitespace() {
        if token.eq_ignore_ascii_case("underline") {
            bits |= FONT_DECORATION_UNDERLINE;
        } else if token.eq_ignore_ascii_case("line-through") {
            bits |= FONT_DECORATION_LINETHROUGH;
        } else if token.eq_ignore_ascii_case("overline") {
            bits |= FONT_DECORATION_OVERLINE;
        }
    }
    bits
}
