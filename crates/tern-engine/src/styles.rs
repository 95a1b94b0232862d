//! Style application: selector matching, cascade merge, generated
//! content and per-element computed values.
//!
//! The cascade runs per element, sheet by sheet: the master sheet
//! first, author sheets in document order, the inline `style`
//! attribute last. Within one sheet, selectors are applied in ascending
//! (specificity, source order), so the final write for a property is
//! the highest-priority one; `!important` is enforced by the store's
//! collision rule.
//!
//! Selectors are matched twice: once with dynamic pseudo-classes
//! deferred (the result records a pseudo-conditional match) and — for
//! those — once honouring them. The candidate list is retained per
//! element so hover refresh can detect match-state changes.

use std::rc::Rc;

use tern_css::keywords::{
    value_index, BackgroundAttachment, BackgroundBox, BackgroundRepeat, BorderCollapse,
    BorderStyle, BoxSizing, Display, ElementClear, ElementFloat, ElementPosition,
    ListStylePosition, ListStyleType, Overflow, TextAlign, TextTransform, VerticalAlign,
    Visibility, WhiteSpace, FONT_SIZE_KEYWORDS,
};
use tern_css::keywords::FontSizeKeyword;
use tern_css::{
    parse_css_url, select, CssLength, CssProperty, CssUnit, MatchContext, MatchFlags, Selector,
};
use tern_dom::{ElementData, GeneratedContent, NodeId, NodeKind};
use url::Url;

use crate::document::Document;
use crate::element::{BackgroundSizeMode, UsedSelector};
use crate::geometry::Size;

/// Pixel sizes for `xx-small`…`xx-large`, parameterized by the default
/// document font size (9–16 px rows).
///
/// [CSS 2.1 § 15.7](https://www.w3.org/TR/CSS2/fonts.html#font-size-props)
const FONT_SIZE_TABLE: [[i32; 7]; 8] = [
    [9, 9, 9, 9, 11, 14, 18],
    [9, 9, 9, 10, 12, 15, 20],
    [9, 9, 9, 11, 13, 17, 22],
    [9, 9, 10, 12, 14, 18, 24],
    [9, 9, 10, 13, 16, 18, 26],
    [9, 9, 11, 14, 17, 20, 28],
    [9, 10, 12, 15, 17, 23, 30],
    [9, 10, 13, 16, 18, 24, 32],
];

impl Document {
    // ── cascade ────────────────────────────────────────────────────

    /// Per-sheet selector lists sorted ascending by (specificity,
    /// source order); the master sheet comes first so author rules
    /// override it with later writes.
    fn sorted_sheet_selectors(&self) -> Vec<Vec<Rc<Selector>>> {
        let mut out = Vec::with_capacity(self.sheets.len() + 1);
        let mut collect = |sheet: &tern_css::Stylesheet| {
            let mut sorted: Vec<Rc<Selector>> = sheet.selectors.to_vec();
            sorted.sort_by(|a, b| (a.specificity, a.order).cmp(&(b.specificity, b.order)));
            out.push(sorted);
        };
        collect(&self.master);
        for sheet in &self.sheets {
            collect(sheet);
        }
        out
    }

    /// Run the full selector cascade over the whole tree.
    pub(crate) fn apply_all_styles(&mut self) {
        let sheets = self.sorted_sheet_selectors();
        self.apply_styles_walk(self.root, &sheets);
    }

    fn apply_styles_walk(&mut self, id: NodeId, sheets: &[Vec<Rc<Selector>>]) {
        if self.tree.as_element(id).is_some() {
            self.apply_styles_to_element(id, sheets);
        }
        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        for child in children {
            self.apply_styles_walk(child, sheets);
        }
    }

    /// Apply every sheet's selectors to one element, routing
    /// `::before`/`::after` matches to synthesized children and
    /// recording the candidate list for interactive refresh.
    fn apply_styles_to_element(&mut self, id: NodeId, sheets: &[Vec<Rc<Selector>>]) {
        // Generated elements receive style through their host.
        if self
            .tree
            .as_element(id)
            .is_some_and(|e| e.generated.is_some())
        {
            return;
        }

        for sorted in sheets {
            for selector in sorted {
                self.apply_selector_to_element(id, selector);
            }
        }
    }

    fn apply_selector_to_element(&mut self, id: NodeId, selector: &Rc<Selector>) {
        if !selector.is_media_valid() {
            return;
        }

        let apply = {
            let ctx = MatchContext {
                tree: &self.tree,
                honour_pseudo: false,
                language: &self.language,
                culture: &self.culture,
            };
            select(&selector.chain, &ctx, id)
        };
        if !apply.is_match() {
            return;
        }

        let mut used = false;
        if apply.contains(MatchFlags::PSEUDO_CLASS) {
            let full = {
                let ctx = MatchContext {
                    tree: &self.tree,
                    honour_pseudo: true,
                    language: &self.language,
                    culture: &self.culture,
                };
                select(&selector.chain, &ctx, id)
            };
            if full.is_match() {
                if apply.contains(MatchFlags::WITH_AFTER) {
                    let after = self.get_element_after(id);
                    self.st_mut(after).style.combine(&selector.style);
                } else if apply.contains(MatchFlags::WITH_BEFORE) {
                    let before = self.get_element_before(id);
                    self.st_mut(before).style.combine(&selector.style);
                } else {
                    let style = Rc::clone(&selector.style);
                    self.st_mut(id).style.combine(&style);
                    used = true;
                }
            }
        } else if apply.contains(MatchFlags::WITH_AFTER) {
            let after = self.get_element_after(id);
            self.st_mut(after).style.combine(&selector.style);
        } else if apply.contains(MatchFlags::WITH_BEFORE) {
            let before = self.get_element_before(id);
            self.st_mut(before).style.combine(&selector.style);
        } else {
            let style = Rc::clone(&selector.style);
            self.st_mut(id).style.combine(&style);
            used = true;
        }

        self.st_mut(id).used_styles.push(UsedSelector {
            selector: Rc::clone(selector),
            used,
        });
    }

    // ── generated content ──────────────────────────────────────────

    /// The `::before` child of `host`, synthesized on first use.
    pub(crate) fn get_element_before(&mut self, host: NodeId) -> NodeId {
        if let Some(&first) = self.tree.children(host).first() {
            if self
                .tree
                .as_element(first)
                .is_some_and(|e| e.generated == Some(GeneratedContent::Before))
            {
                return first;
            }
        }
        let mut data = ElementData::new("::before");
        data.generated = Some(GeneratedContent::Before);
        let el = self.tree.alloc(NodeKind::Element(data));
        self.tree.prepend_child(host, el);
        self.sync_states();
        el
    }

    /// The `::after` child of `host`, synthesized on first use.
    pub(crate) fn get_element_after(&mut self, host: NodeId) -> NodeId {
        if let Some(&last) = self.tree.children(host).last() {
            if self
                .tree
                .as_element(last)
                .is_some_and(|e| e.generated == Some(GeneratedContent::After))
            {
                return last;
            }
        }
        let mut data = ElementData::new("::after");
        data.generated = Some(GeneratedContent::After);
        let el = self.tree.alloc(NodeKind::Element(data));
        self.tree.append_child(host, el);
        self.sync_states();
        el
    }

    /// Remove generated children again (restyle path).
    fn remove_before_after(&mut self, host: NodeId) {
        let mut to_remove = Vec::new();
        for &child in self.tree.children(host) {
            if self
                .tree
                .as_element(child)
                .is_some_and(|e| e.generated.is_some())
            {
                to_remove.push(child);
            }
        }
        for child in to_remove {
            self.tree.remove_child(host, child);
        }
    }

    /// Build the inline content of a generated element from its
    /// `content` property: string literals, `attr(name)` and `url()`.
    fn build_generated_content(&mut self, id: NodeId) {
        if !self.tree.children(id).is_empty() {
            return;
        }
        let content = self.style_string(id, CssProperty::Content);
        let content = content.trim().to_string();
        if content.is_empty()
            || content.eq_ignore_ascii_case("none")
            || content.eq_ignore_ascii_case("normal")
        {
            return;
        }

        let host = self.tree.parent(id);
        for token in split_content_tokens(&content) {
            match token {
                ContentToken::Text(text) => {
                    self.tree.append_text(id, &text);
                }
                ContentToken::Attr(name) => {
                    let value = host
                        .and_then(|h| self.tree.attr(h, &name.to_ascii_lowercase()))
                        .unwrap_or("")
                        .to_string();
                    if !value.is_empty() {
                        self.tree.append_text(id, &value);
                    }
                }
                ContentToken::Url(url) => {
                    let img = self.tree.alloc(NodeKind::Element({
                        let mut data = ElementData::new("img");
                        data.generated = self
                            .tree
                            .as_element(id)
                            .and_then(|e| e.generated);
                        data
                    }));
                    self.tree.append_child(id, img);
                    self.tree.set_attr(img, "src", &url);
                }
            }
        }
        self.sync_states();
    }

    // ── restyle (media change / hover refresh) ─────────────────────

    /// Drop and recompute all style state for a subtree.
    pub(crate) fn restyle_subtree(&mut self, id: NodeId) {
        self.clear_styles_walk(id);
        let sheets = self.sorted_sheet_selectors();
        self.apply_styles_walk(id, &sheets);
        self.parse_styles_subtree(id);
    }

    fn clear_styles_walk(&mut self, id: NodeId) {
        if self.tree.as_element(id).is_some() {
            self.remove_before_after(id);
            let st = self.st_mut(id);
            st.style.clear();
            st.used_styles.clear();
        }
        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        for child in children {
            self.clear_styles_walk(child);
        }
    }

    /// Re-check every candidate selector with dynamic pseudo-classes
    /// honoured; collect repaint rectangles for elements whose match
    /// state flipped and restyle them.
    ///
    /// `x`,`y` accumulate document coordinates (fixed subtrees reset
    /// to their own coordinates).
    pub(crate) fn find_styles_changes(
        &mut self,
        id: NodeId,
        redraw_boxes: &mut Vec<crate::geometry::Position>,
        x: i32,
        y: i32,
    ) -> bool {
        if self.st(id).display == Display::InlineText {
            return false;
        }

        let mut ret = false;
        let mut apply = false;
        for used in self.st(id).used_styles.clone() {
            if !used.selector.is_media_valid() {
                continue;
            }
            let res = {
                let ctx = MatchContext {
                    tree: &self.tree,
                    honour_pseudo: true,
                    language: &self.language,
                    culture: &self.culture,
                };
                select(&used.selector.chain, &ctx, id)
            };
            let matches_now = res.is_match();
            if (!matches_now && used.used) || (matches_now && !used.used) {
                apply = true;
                break;
            }
        }

        if apply {
            if self.st(id).display == Display::Inline {
                let mut fragments = Vec::new();
                self.get_inline_boxes(id, &mut fragments);
                for mut frag in fragments {
                    frag.x += x;
                    frag.y += y;
                    redraw_boxes.push(frag);
                }
            } else {
                let mut pos = self.st(id).pos;
                if self.st(id).el_position != ElementPosition::Fixed {
                    pos.x += x;
                    pos.y += y;
                }
                pos.expand(&self.st(id).padding);
                let borders = self.st(id).borders;
                pos.expand(&borders);
                redraw_boxes.push(pos);
            }
            ret = true;
            self.restyle_subtree(id);
        }

        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        let pos = self.st(id).pos;
        let fixed = self.st(id).el_position == ElementPosition::Fixed;
        for child in children {
            if self.st(child).skip {
                continue;
            }
            let changed = if fixed {
                self.find_styles_changes(child, redraw_boxes, pos.x, pos.y)
            } else {
                self.find_styles_changes(child, redraw_boxes, x + pos.x, y + pos.y)
            };
            if changed {
                ret = true;
            }
        }
        ret
    }

    // ── computed values ────────────────────────────────────────────

    /// Resolve computed values for a subtree, top-down (children need
    /// the parent's resolved font).
    pub(crate) fn parse_styles_subtree(&mut self, id: NodeId) {
        self.parse_styles_element(id);
        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        for child in children {
            self.parse_styles_subtree(child);
        }
    }

    fn parse_styles_element(&mut self, id: NodeId) {
        if self.tree.as_element(id).is_some() {
            self.parse_element_styles(id);
        } else if matches!(
            self.tree.get(id).kind,
            NodeKind::Text(_) | NodeKind::Whitespace(_)
        ) {
            self.parse_text_styles(id);
        } else {
            self.st_mut(id).display = Display::None;
        }
    }

    /// Text runs inherit everything observable from their parent
    /// element; they carry no declarations of their own.
    fn parse_text_styles(&mut self, id: NodeId) {
        let Some(parent) = self.tree.parent(id) else {
            return;
        };
        let (font, metrics, font_size, line_height, lh_predefined, white_space, transform) = {
            let p = self.st(parent);
            (
                p.font,
                p.font_metrics,
                p.font_size,
                p.line_height,
                p.lh_predefined,
                p.white_space,
                p.text_transform,
            )
        };
        let transformed = if transform != TextTransform::None {
            if let NodeKind::Text(text) = &self.tree.get(id).kind {
                let text = text.clone();
                Some(self.container.borrow_mut().transform_text(&text, transform))
            } else {
                None
            }
        } else {
            None
        };

        let st = self.st_mut(id);
        st.display = Display::InlineText;
        st.font = font;
        st.font_metrics = metrics;
        st.font_size = font_size;
        st.line_height = line_height;
        st.lh_predefined = lh_predefined;
        st.white_space = white_space;
        st.vertical_align = VerticalAlign::Baseline;
        st.transformed_text = transformed;
    }

    fn parse_element_styles(&mut self, id: NodeId) {
        // The inline style attribute enters the cascade last.
        if let Some(style_attr) = self.tree.attr(id, "style").map(str::to_string) {
            let baseurl = self
                .base_url
                .as_ref()
                .map(Url::to_string)
                .unwrap_or_default();
            self.st_mut(id).style.parse(&style_attr, &baseurl);
        }

        self.init_font(id);
        let font_size = self.st(id).font_size;

        let keyword = |doc: &Self, prop: CssProperty| doc.resolve_value(id, prop).keyword();

        let mut display = Display::from_index(keyword(self, CssProperty::Display));
        let el_position = ElementPosition::from_index(keyword(self, CssProperty::Position));
        let float = ElementFloat::from_index(keyword(self, CssProperty::Float));

        // Floating and out-of-flow inline boxes compute to block.
        if float != ElementFloat::None {
            if display != Display::None {
                display = Display::Block;
            }
        } else if display.is_inline_level()
            && display != Display::InlineText
            && matches!(
                el_position,
                ElementPosition::Absolute | ElementPosition::Fixed
            )
        {
            display = Display::Block;
        }

        // Replaced elements participate in line layout as atomic boxes.
        if self.is_replaced(id) && display == Display::Inline {
            display = Display::InlineBlock;
        }

        let z_index = {
            let v = self.resolve_value(id, CssProperty::ZIndex);
            if el_position.is_positioned() && !v.length().is_predefined() {
                v.length().val() as i32
            } else {
                0
            }
        };

        {
            let st = self.st_mut(id);
            st.display = display;
            st.el_position = el_position;
            st.float = float;
            st.z_index = z_index;
        }

        let clear = ElementClear::from_index(keyword(self, CssProperty::Clear));
        let overflow = Overflow::from_index(keyword(self, CssProperty::Overflow));
        let visibility = Visibility::from_index(keyword(self, CssProperty::Visibility));
        let white_space = WhiteSpace::from_index(keyword(self, CssProperty::WhiteSpace));
        let text_align = TextAlign::from_index(keyword(self, CssProperty::TextAlign));
        let vertical_align =
            VerticalAlign::from_index(keyword(self, CssProperty::VerticalAlign));
        let box_sizing = BoxSizing::from_index(keyword(self, CssProperty::BoxSizing));
        let border_collapse =
            BorderCollapse::from_index(keyword(self, CssProperty::BorderCollapse));
        let text_transform =
            TextTransform::from_index(keyword(self, CssProperty::TextTransform));
        let font_style = tern_css::keywords::FontStyle::from_index(keyword(
            self,
            CssProperty::FontStyle,
        ));

        {
            let st = self.st_mut(id);
            st.clear = clear;
            st.overflow = overflow;
            st.visibility = visibility;
            st.white_space = white_space;
            st.text_align = text_align;
            st.vertical_align = vertical_align;
            st.box_sizing = box_sizing;
            st.border_collapse = border_collapse;
            st.text_transform = text_transform;
            st.font_style = font_style;
        }

        // Box lengths; absolute units normalize to px here, percents
        // stay percents for layout-time resolution.
        let len = |doc: &mut Self, prop: CssProperty| -> CssLength {
            let mut value = doc.resolve_value(id, prop).length();
            doc.cvt_units(&mut value, font_size, 0);
            value
        };

        let css_width = len(self, CssProperty::Width);
        let css_height = len(self, CssProperty::Height);
        let css_min_width = len(self, CssProperty::MinWidth);
        let css_min_height = len(self, CssProperty::MinHeight);
        let css_max_width = len(self, CssProperty::MaxWidth);
        let css_max_height = len(self, CssProperty::MaxHeight);
        let css_text_indent = len(self, CssProperty::TextIndent);

        let offsets = crate::element::OffsetLengths {
            left: len(self, CssProperty::Left),
            top: len(self, CssProperty::Top),
            right: len(self, CssProperty::Right),
            bottom: len(self, CssProperty::Bottom),
        };
        let margins = crate::element::LengthBox {
            left: len(self, CssProperty::MarginLeft),
            top: len(self, CssProperty::MarginTop),
            right: len(self, CssProperty::MarginRight),
            bottom: len(self, CssProperty::MarginBottom),
        };
        let padding = crate::element::LengthBox {
            left: len(self, CssProperty::PaddingLeft),
            top: len(self, CssProperty::PaddingTop),
            right: len(self, CssProperty::PaddingRight),
            bottom: len(self, CssProperty::PaddingBottom),
        };

        let mut borders = crate::element::CssBorders::default();
        for (side, width_p, style_p, color_p) in [
            (
                0,
                CssProperty::BorderLeftWidth,
                CssProperty::BorderLeftStyle,
                CssProperty::BorderLeftColor,
            ),
            (
                1,
                CssProperty::BorderTopWidth,
                CssProperty::BorderTopStyle,
                CssProperty::BorderTopColor,
            ),
            (
                2,
                CssProperty::BorderRightWidth,
                CssProperty::BorderRightStyle,
                CssProperty::BorderRightColor,
            ),
            (
                3,
                CssProperty::BorderBottomWidth,
                CssProperty::BorderBottomStyle,
                CssProperty::BorderBottomColor,
            ),
        ] {
            let style = BorderStyle::from_index(self.resolve_value(id, style_p).keyword());
            // A none/hidden style suppresses the side entirely.
            let width = if matches!(style, BorderStyle::None | BorderStyle::Hidden) {
                CssLength::px(0.0)
            } else {
                let mut w = self.resolve_value(id, width_p).length();
                if w.is_predefined() {
                    // thin/medium/thick map to 1/3/5 px.
                    let px = match w.predef() {
                        0 => 1,
                        2 => 5,
                        _ => 3,
                    };
                    w = CssLength::px(px as f32);
                } else {
                    self.cvt_units(&mut w, font_size, 0);
                }
                w
            };
            let color_value = self.resolve_value(id, color_p);
            let color = if color_value.raw.eq_ignore_ascii_case("currentcolor") {
                self.resolve_value(id, CssProperty::Color).color()
            } else {
                color_value.color()
            };
            let data = crate::element::CssBorderSide {
                width,
                style,
                color,
            };
            match side {
                0 => borders.left = data,
                1 => borders.top = data,
                2 => borders.right = data,
                _ => borders.bottom = data,
            }
        }
        borders.radius_top_left_x = len(self, CssProperty::TernBorderTopLeftRadiusX);
        borders.radius_top_left_y = len(self, CssProperty::TernBorderTopLeftRadiusY);
        borders.radius_top_right_x = len(self, CssProperty::TernBorderTopRightRadiusX);
        borders.radius_top_right_y = len(self, CssProperty::TernBorderTopRightRadiusY);
        borders.radius_bottom_right_x = len(self, CssProperty::TernBorderBottomRightRadiusX);
        borders.radius_bottom_right_y = len(self, CssProperty::TernBorderBottomRightRadiusY);
        borders.radius_bottom_left_x = len(self, CssProperty::TernBorderBottomLeftRadiusX);
        borders.radius_bottom_left_y = len(self, CssProperty::TernBorderBottomLeftRadiusY);

        let mut spacing_x = self.resolve_value(id, CssProperty::TernBorderSpacingX).length();
        let mut spacing_y = self.resolve_value(id, CssProperty::TernBorderSpacingY).length();
        let border_spacing_x = self.cvt_units(&mut spacing_x, font_size, 0);
        let border_spacing_y = self.cvt_units(&mut spacing_y, font_size, 0);

        // Line height: `normal` uses the font's natural height,
        // unit-less numbers multiply the font size.
        let lh_value = self.resolve_value(id, CssProperty::LineHeight).length();
        let (line_height, lh_predefined) = if lh_value.is_predefined() {
            (self.st(id).font_metrics.height, true)
        } else if lh_value.units() == CssUnit::None {
            ((lh_value.val() * font_size as f32).round() as i32, false)
        } else {
            let mut v = lh_value;
            (self.cvt_units(&mut v, font_size, font_size), false)
        };

        let cursor = self.style_string(id, CssProperty::Cursor);

        {
            let st = self.st_mut(id);
            st.css_width = css_width;
            st.css_height = css_height;
            st.css_min_width = css_min_width;
            st.css_min_height = css_min_height;
            st.css_max_width = css_max_width;
            st.css_max_height = css_max_height;
            st.css_text_indent = css_text_indent;
            st.css_offsets = offsets;
            st.css_margins = margins;
            st.css_padding = padding;
            st.css_borders = borders;
            st.border_spacing_x = border_spacing_x;
            st.border_spacing_y = border_spacing_y;
            st.line_height = line_height;
            st.lh_predefined = lh_predefined;
            st.cursor = cursor;
        }

        if display == Display::ListItem {
            let list_style_type =
                ListStyleType::from_index(keyword(self, CssProperty::ListStyleType));
            let list_style_position =
                ListStylePosition::from_index(keyword(self, CssProperty::ListStylePosition));
            let list_index = self.compute_list_index(id);
            let st = self.st_mut(id);
            st.list_style_type = list_style_type;
            st.list_style_position = list_style_position;
            st.list_index = list_index;
        }

        self.parse_background(id);

        // Replaced elements: kick off the image load so the intrinsic
        // size is available to layout when the host resolves quickly.
        if self.is_replaced(id) {
            if let Some(src) = self.tree.attr(id, "src").map(str::to_string) {
                if let Some(url) = tern_common::urlutil::resolve(self.base_url.as_ref(), &src) {
                    self.container.borrow_mut().load_image(url.as_str(), true);
                }
            }
        }

        // Generated elements materialize their `content` children now;
        // the subtree walk will compute their styles next.
        if self
            .tree
            .as_element(id)
            .is_some_and(|e| e.generated.is_some())
        {
            self.build_generated_content(id);
        }
    }

    /// [CSS 2.1 § 15.7](https://www.w3.org/TR/CSS2/fonts.html#propdef-font-size)
    ///
    /// Resolve `font-size` (keyword table, percent-of-parent, em) and
    /// create the computed font through the document cache.
    fn init_font(&mut self, id: NodeId) {
        let doc_font_size = self.container.borrow().default_font_size();
        let parent_size = self
            .tree
            .parent(id)
            .map_or(doc_font_size, |p| self.st(p).font_size);

        let size_value = self.resolve_value(id, CssProperty::FontSize);
        let sz = CssLength::parse(&size_value.raw, FONT_SIZE_KEYWORDS, -1);

        let font_size = if sz.is_predefined() {
            match FontSizeKeyword::from_index(sz.predef()) {
                Some(FontSizeKeyword::Smaller) => (parent_size * 5) / 6,
                Some(FontSizeKeyword::Larger) => (parent_size * 6) / 5,
                Some(kw) => {
                    let row = doc_font_size - 9;
                    if (0..8).contains(&row) {
                        FONT_SIZE_TABLE[row as usize][kw as usize]
                    } else {
                        match kw {
                            FontSizeKeyword::XxSmall => doc_font_size * 3 / 5,
                            FontSizeKeyword::XSmall => doc_font_size * 3 / 4,
                            FontSizeKeyword::Small => doc_font_size * 8 / 9,
                            FontSizeKeyword::Medium => doc_font_size,
                            FontSizeKeyword::Large => doc_font_size * 6 / 5,
                            FontSizeKeyword::XLarge => doc_font_size * 3 / 2,
                            FontSizeKeyword::XxLarge => doc_font_size * 2,
                            _ => doc_font_size,
                        }
                    }
                }
                None => doc_font_size,
            }
        } else {
            match sz.units() {
                CssUnit::Percent => sz.calc_percent(parent_size),
                CssUnit::None => parent_size,
                CssUnit::Em => (sz.val() * parent_size as f32).round() as i32,
                _ => {
                    let mut v = sz;
                    self.cvt_units(&mut v, parent_size, parent_size)
                }
            }
        };

        let family = self.style_string(id, CssProperty::FontFamily);
        let weight = self.style_string(id, CssProperty::FontWeight);
        let style = self.style_string(id, CssProperty::FontStyle);
        let decoration = self.style_string(id, CssProperty::TextDecoration);

        let (font, metrics) = self.get_font(&family, font_size, &weight, &style, &decoration);
        let st = self.st_mut(id);
        st.font = font;
        st.font_metrics = metrics;
        st.font_size = font_size;
    }

    /// 1-based index of a list item among its `li` siblings.
    fn compute_list_index(&self, id: NodeId) -> i32 {
        let Some(parent) = self.tree.parent(id) else {
            return 1;
        };
        let mut index = 1;
        for &child in self.tree.children(parent) {
            if child == id {
                break;
            }
            if self.tree.as_element(child).is_some_and(|e| e.tag == "li") {
                index += 1;
            }
        }
        index
    }

    /// Collect background paint inputs from the longhand values.
    fn parse_background(&mut self, id: NodeId) {
        let color = self.resolve_value(id, CssProperty::BackgroundColor).color();
        let image = parse_css_url(
            self.resolve_value(id, CssProperty::BackgroundImage).string(),
        );
        let baseurl = self
            .resolve_value(id, CssProperty::TernBackgroundImageBaseurl)
            .string()
            .to_string();
        let attachment = BackgroundAttachment::from_index(
            self.resolve_value(id, CssProperty::BackgroundAttachment).keyword(),
        );
        let repeat = BackgroundRepeat::from_index(
            self.resolve_value(id, CssProperty::BackgroundRepeat).keyword(),
        );
        let clip = BackgroundBox::from_index(
            self.resolve_value(id, CssProperty::BackgroundClip).keyword(),
        );
        let origin = {
            // The origin default index differs from the clip default,
            // both share one keyword table.
            let v = self.resolve_value(id, CssProperty::BackgroundOrigin);
            BackgroundBox::from_index(v.keyword().max(0))
        };

        let (position_x, position_y) = parse_background_position(
            self.resolve_value(id, CssProperty::BackgroundPosition).string(),
        );
        let (size_mode, size_width, size_height) = parse_background_size(
            self.resolve_value(id, CssProperty::BackgroundSize).string(),
        );

        // Start the image fetch now; sizing happens at paint time.
        if !image.is_empty() {
            let base = Url::parse(&baseurl)
                .ok()
                .or_else(|| self.base_url.clone());
            if let Some(url) = tern_common::urlutil::resolve(base.as_ref(), &image) {
                self.container.borrow_mut().load_image(url.as_str(), true);
            }
        }

        let st = self.st_mut(id);
        st.bg.color = color;
        st.bg.image = image;
        st.bg.baseurl = baseurl;
        st.bg.attachment = attachment;
        st.bg.repeat = repeat;
        st.bg.clip = clip;
        st.bg.origin = origin;
        st.bg.position_x = position_x;
        st.bg.position_y = position_y;
        st.bg.size_mode = size_mode;
        st.bg.size_width = size_width;
        st.bg.size_height = size_height;
    }

    /// Resolved intrinsic size of a replaced element's image.
    pub(crate) fn replaced_size(&self, id: NodeId) -> Size {
        let Some(src) = self.tree.attr(id, "src") else {
            return Size::default();
        };
        let Some(url) = tern_common::urlutil::resolve(self.base_url.as_ref(), src) else {
            return Size::default();
        };
        self.container.borrow_mut().get_image_size(url.as_str())
    }
}

/// One token of a `content` property value.
enum ContentToken {
    Text(String),
    Attr(String),
    Url(String),
}

fn split_content_tokens(content: &str) -> Vec<ContentToken> {
    let mut out = Vec::new();
    let chars: Vec<char> = content.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '"' || c == '\'' {
            let mut text = String::new();
            i += 1;
            while i < chars.len() && chars[i] != c {
                text.push(chars[i]);
                i += 1;
            }
            i += 1;
            out.push(ContentToken::Text(text));
        } else if c.is_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i] != '(' && !chars[i].is_whitespace() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if chars.get(i) == Some(&'(') {
                let mut arg = String::new();
                i += 1;
                while i < chars.len() && chars[i] != ')' {
                    arg.push(chars[i]);
                    i += 1;
                }
                i += 1;
                let arg = arg.trim().trim_matches(|q| q == '"' || q == '\'').to_string();
                if word.eq_ignore_ascii_case("attr") {
                    out.push(ContentToken::Attr(arg));
                } else if word.eq_ignore_ascii_case("url") {
                    out.push(ContentToken::Url(arg));
                }
            }
        } else {
            i += 1;
        }
    }
    out
}

/// Parse `background-position`: one or two tokens of keywords,
/// percentages or lengths. Keywords map onto percentages; a single
/// token centers the other axis.
fn parse_background_position(text: &str) -> (CssLength, CssLength) {
    let keyword_percent = |token: &str, vertical: bool| -> Option<CssLength> {
        let pct = match token {
            "left" if !vertical => 0.0,
            "right" if !vertical => 100.0,
            "top" if vertical => 0.0,
            "bottom" if vertical => 100.0,
            "center" => 50.0,
            _ => return None,
        };
        Some(CssLength::new(pct, CssUnit::Percent))
    };

    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.len() {
        0 => (
            CssLength::new(0.0, CssUnit::Percent),
            CssLength::new(0.0, CssUnit::Percent),
        ),
        1 => {
            let t = tokens[0];
            if let Some(y) = keyword_percent(t, true) {
                if value_index(t, &["top", "bottom"]) >= 0 {
                    return (CssLength::new(50.0, CssUnit::Percent), y);
                }
            }
            let x = keyword_percent(t, false).unwrap_or_else(|| CssLength::parse(t, &[], 0));
            (x, CssLength::new(50.0, CssUnit::Percent))
        }
        _ => {
            let x = keyword_percent(tokens[0], false)
                .unwrap_or_else(|| CssLength::parse(tokens[0], &[], 0));
            let y = keyword_percent(tokens[1], true)
                .unwrap_or_else(|| CssLength::parse(tokens[1], &[], 0));
            (x, y)
        }
    }
}

/// Parse `background-size`: `auto`, `cover`, `contain` or 1-2 lengths.
fn parse_background_size(text: &str) -> (BackgroundSizeMode, CssLength, CssLength) {
    let text = text.trim();
    if text.eq_ignore_ascii_case("cover") {
        return (BackgroundSizeMode::Cover, CssLength::default(), CssLength::default());
    }
    if text.eq_ignore_ascii_case("contain") {
        return (
            BackgroundSizeMode::Contain,
            CssLength::default(),
            CssLength::default(),
        );
    }
    if text.is_empty() || text.eq_ignore_ascii_case("auto") {
        return (
            BackgroundSizeMode::Auto,
            CssLength::predefined(0),
            CssLength::predefined(0),
        );
    }
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let parse_one = |t: &str| CssLength::parse(t, &["auto"], 0);
    let w = parse_one(tokens[0]);
    let h = tokens.get(1).map_or(CssLength::predefined(0), |t| parse_one(t));
    (BackgroundSizeMode::Auto, w, h)
}
