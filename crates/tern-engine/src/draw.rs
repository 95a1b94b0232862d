//! Painting: tree traversal issuing primitives to the host backend.
//!
//! [CSS 2.1 Appendix E — Elaborate description of stacking contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! Paint order per stacking context: negative-z positioned descendants
//! (ascending), block backgrounds/borders, floats (each its own
//! mini-context), inlines (inline-blocks as mini-contexts), zero-z
//! positioned, positive-z positioned (ascending). This order is the
//! only ordering the backend observes.

use tern_css::keywords::{
    BackgroundBox, Display, ElementFloat, ListStylePosition, ListStyleType, Overflow,
};
use tern_css::CssProperty;
use tern_dom::{NodeId, NodeKind};
use url::Url;

use crate::backend::{BackgroundPaint, BorderPaint, BorderRadii, Borders, DrawHandle, ListMarker};
use crate::document::Document;
use crate::element::BackgroundSizeMode;
use crate::geometry::Position;
use crate::layout::list::list_marker_text;

/// Which child class a paint (or hit-test) pass selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawFlag {
    Positioned,
    Block,
    Floats,
    Inlines,
}

impl Document {
    /// Paint one element: its background, borders and list marker (text
    /// runs draw their glyphs instead).
    pub(crate) fn draw_element(
        &self,
        id: NodeId,
        hdc: DrawHandle,
        x: i32,
        y: i32,
        clip: Option<&Position>,
    ) {
        match &self.tree.get(id).kind {
            NodeKind::Text(text) => {
                if self.st(id).skip {
                    return;
                }
                let text = self
                    .st(id)
                    .transformed_text
                    .clone()
                    .unwrap_or_else(|| text.clone());
                let mut pos = self.st(id).pos;
                pos.x += x;
                pos.y += y;
                if let Some(clip) = clip {
                    if pos.bottom() < clip.top() || pos.top() > clip.bottom() {
                        return;
                    }
                }
                let color = self.resolve_value(id, CssProperty::Color).color();
                let font = self.st(id).font;
                self.container
                    .borrow_mut()
                    .draw_text(hdc, &text, font, color, pos);
            }
            NodeKind::Whitespace(run) => {
                // Spaces only paint when the font decorates them
                // (underlined links).
                if self.st(id).skip || !self.st(id).font_metrics.draw_spaces {
                    return;
                }
                let run = run.clone();
                let mut pos = self.st(id).pos;
                pos.x += x;
                pos.y += y;
                let color = self.resolve_value(id, CssProperty::Color).color();
                let font = self.st(id).font;
                self.container
                    .borrow_mut()
                    .draw_text(hdc, &run, font, color, pos);
            }
            NodeKind::Element(_) => {
                self.draw_background_and_borders(id, hdc, x, y, clip);

                if self.st(id).display == Display::ListItem
                    && self.st(id).list_style_type != ListStyleType::None
                {
                    let mut pos = self.st(id).pos;
                    pos.x += x;
                    pos.y += y;
                    let clipped = self.st(id).overflow > Overflow::Visible;
                    if clipped {
                        let radii = self.calc_border_radii(id);
                        self.container.borrow_mut().set_clip(pos, &radii, true, true);
                    }
                    self.draw_list_marker(id, hdc, &pos);
                    if clipped {
                        self.container.borrow_mut().del_clip();
                    }
                }
            }
            NodeKind::Comment(_) => {}
        }
    }

    /// Resolve corner radii against the border box.
    fn calc_border_radii(&self, id: NodeId) -> BorderRadii {
        let st = self.st(id);
        let border_w = st.pos.width + st.padding.width() + st.borders.width();
        let border_h = st.pos.height + st.padding.height() + st.borders.height();
        let b = &st.css_borders;
        BorderRadii {
            top_left_x: b.radius_top_left_x.calc_percent(border_w),
            top_left_y: b.radius_top_left_y.calc_percent(border_h),
            top_right_x: b.radius_top_right_x.calc_percent(border_w),
            top_right_y: b.radius_top_right_y.calc_percent(border_h),
            bottom_right_x: b.radius_bottom_right_x.calc_percent(border_w),
            bottom_right_y: b.radius_bottom_right_y.calc_percent(border_h),
            bottom_left_x: b.radius_bottom_left_x.calc_percent(border_w),
            bottom_left_y: b.radius_bottom_left_y.calc_percent(border_h),
        }
    }

    /// The background that actually paints for `id`: the root borrows
    /// the body's background when it has none of its own, and the body
    /// skips its own when the root will draw it.
    fn effective_background(&self, id: NodeId) -> Option<NodeId> {
        let own_empty = self.st(id).bg.is_empty();

        if !self.have_parent(id) {
            if !own_empty {
                return Some(id);
            }
            // Root canvas: borrow the body background.
            return self
                .tree
                .children(id)
                .iter()
                .copied()
                .find(|&c| self.is_body(c) && !self.st(c).bg.is_empty());
        }

        if self.is_body(id) {
            if let Some(root) = self.tree.parent(id) {
                if self.st(root).bg.is_empty() {
                    // The root already painted this background.
                    return None;
                }
            }
        }

        if own_empty {
            None
        } else {
            Some(id)
        }
    }

    fn draw_background_and_borders(
        &self,
        id: NodeId,
        hdc: DrawHandle,
        x: i32,
        y: i32,
        _clip: Option<&Position>,
    ) {
        if self.st(id).display == Display::Inline {
            self.draw_inline_fragments(id, hdc, x, y);
            return;
        }

        let mut content_box = self.st(id).pos;
        content_box.x += x;
        content_box.y += y;

        let mut padding_box = content_box;
        padding_box.expand(&self.st(id).padding);
        let mut border_box = padding_box;
        border_box.expand(&self.st(id).borders);

        let radii = self.calc_border_radii(id);

        if let Some(bg_el) = self.effective_background(id) {
            let bg = self.st(bg_el).bg.clone();

            let clip_box = match bg.clip {
                BackgroundBox::PaddingBox => padding_box,
                BackgroundBox::ContentBox => content_box,
                BackgroundBox::BorderBox => border_box,
            };
            let origin_box = match bg.origin {
                BackgroundBox::BorderBox => border_box,
                BackgroundBox::ContentBox => content_box,
                BackgroundBox::PaddingBox => padding_box,
            };

            let mut paint = BackgroundPaint {
                color: bg.color,
                repeat: bg.repeat,
                attachment: bg.attachment,
                clip_box,
                origin_box,
                border_box,
                border_radii: radii,
                is_root: !self.have_parent(id),
                ..BackgroundPaint::default()
            };

            if !bg.image.is_empty() {
                let base = Url::parse(&bg.baseurl).ok().or_else(|| self.base_url.clone());
                if let Some(url) = tern_common::urlutil::resolve(base.as_ref(), &bg.image) {
                    paint.image = url.to_string();
                    let intrinsic = self
                        .container
                        .borrow_mut()
                        .get_image_size(paint.image.as_str());
                    if intrinsic.width > 0 && intrinsic.height > 0 {
                        let mut size = intrinsic;
                        match bg.size_mode {
                            BackgroundSizeMode::Contain | BackgroundSizeMode::Cover => {
                                let scale_w =
                                    f64::from(origin_box.width) / f64::from(intrinsic.width);
                                let scale_h =
                                    f64::from(origin_box.height) / f64::from(intrinsic.height);
                                let scale = if bg.size_mode == BackgroundSizeMode::Contain {
                                    scale_w.min(scale_h)
                                } else {
                                    scale_w.max(scale_h)
                                };
                                size.width = (f64::from(intrinsic.width) * scale) as i32;
                                size.height = (f64::from(intrinsic.height) * scale) as i32;
                            }
                            BackgroundSizeMode::Auto => {
                                let w_set = !bg.size_width.is_predefined();
                                let h_set = !bg.size_height.is_predefined();
                                if w_set {
                                    size.width = bg.size_width.calc_percent(origin_box.width);
                                    size.height = if h_set {
                                        bg.size_height.calc_percent(origin_box.height)
                                    } else {
                                        (i64::from(size.width) * i64::from(intrinsic.height)
                                            / i64::from(intrinsic.width))
                                            as i32
                                    };
                                } else if h_set {
                                    size.height = bg.size_height.calc_percent(origin_box.height);
                                    size.width = (i64::from(size.height)
                                        * i64::from(intrinsic.width)
                                        / i64::from(intrinsic.height))
                                        as i32;
                                }
                            }
                        }
                        paint.image_size = size;
                        // Position resolves against the free space.
                        paint.position_x = origin_box.x
                            + bg.position_x.calc_percent(origin_box.width - size.width);
                        paint.position_y = origin_box.y
                            + bg.position_y.calc_percent(origin_box.height - size.height);
                    }
                }
            }

            if !paint.color.is_transparent() || !paint.image.is_empty() {
                self.container.borrow_mut().draw_background(hdc, &paint);
            }
        }

        let borders = self.build_borders(id, radii);
        if !borders.is_empty() {
            let is_root = !self.have_parent(id);
            self.container
                .borrow_mut()
                .draw_borders(hdc, &borders, border_box, is_root);
        }
    }

    fn build_borders(&self, id: NodeId, radii: BorderRadii) -> Borders {
        let st = self.st(id);
        Borders {
            top: BorderPaint {
                width: st.borders.top,
                style: st.css_borders.top.style,
                color: st.css_borders.top.color,
            },
            right: BorderPaint {
                width: st.borders.right,
                style: st.css_borders.right.style,
                color: st.css_borders.right.color,
            },
            bottom: BorderPaint {
                width: st.borders.bottom,
                style: st.css_borders.bottom.style,
                color: st.css_borders.bottom.color,
            },
            left: BorderPaint {
                width: st.borders.left,
                style: st.css_borders.left.style,
                color: st.css_borders.left.color,
            },
            radii,
        }
    }

    /// Inline elements paint per line-box fragment.
    fn draw_inline_fragments(&self, id: NodeId, hdc: DrawHandle, x: i32, y: i32) {
        if self.st(id).bg.is_empty() && self.build_borders(id, BorderRadii::default()).is_empty()
        {
            return;
        }
        let mut fragments = Vec::new();
        self.get_inline_boxes(id, &mut fragments);
        let radii = self.calc_border_radii(id);
        for mut fragment in fragments {
            fragment.x += x;
            fragment.y += y;

            let bg = self.st(id).bg.clone();
            if !bg.color.is_transparent() {
                let paint = BackgroundPaint {
                    color: bg.color,
                    repeat: bg.repeat,
                    attachment: bg.attachment,
                    clip_box: fragment,
                    origin_box: fragment,
                    border_box: fragment,
                    border_radii: radii,
                    ..BackgroundPaint::default()
                };
                self.container.borrow_mut().draw_background(hdc, &paint);
            }
            let borders = self.build_borders(id, radii);
            if !borders.is_empty() {
                self.container
                    .borrow_mut()
                    .draw_borders(hdc, &borders, fragment, false);
            }
        }
    }

    /// [CSS Lists](https://www.w3.org/TR/css-lists-3/#markers)
    ///
    /// Numeric types render generated text right-aligned in the gutter;
    /// glyph types and marker images go to the host.
    fn draw_list_marker(&self, id: NodeId, hdc: DrawHandle, pos: &Position) {
        let list_image = self.style_string(id, CssProperty::ListStyleImage);
        let mut marker = ListMarker {
            marker_type: self.st(id).list_style_type,
            color: self.resolve_value(id, CssProperty::Color).color(),
            font: self.st(id).font,
            index: -1,
            ..ListMarker::default()
        };

        let mut image_size = crate::geometry::Size::default();
        if !list_image.trim().is_empty() && !list_image.eq_ignore_ascii_case("none") {
            marker.image = tern_css::parse_css_url(&list_image);
            marker.baseurl = self
                .resolve_value(id, CssProperty::TernListStyleImageBaseurl)
                .string()
                .to_string();
            let base = Url::parse(&marker.baseurl)
                .ok()
                .or_else(|| self.base_url.clone());
            if let Some(url) = tern_common::urlutil::resolve(base.as_ref(), &marker.image) {
                image_size = self.container.borrow_mut().get_image_size(url.as_str());
            }
        }

        let line_height = self.st(id).line_height;
        let font_size = self.st(id).font_size;
        let numeric = self.st(id).list_style_type.is_numeric();

        marker.pos.x = pos.x;
        marker.pos.width = font_size - font_size * 2 / 3;
        if numeric {
            marker.pos.y = pos.y;
            marker.pos.height = pos.height;
            marker.index = self.st(id).list_index;
        } else {
            marker.pos.height = font_size - font_size * 2 / 3;
            marker.pos.y = pos.y + line_height / 2 - marker.pos.height / 2;
        }

        if image_size.width > 0 && image_size.height > 0 {
            if marker.pos.y + image_size.height > pos.y + pos.height {
                marker.pos.y = pos.y + pos.height - image_size.height;
            }
            if image_size.width > marker.pos.width {
                marker.pos.x -= image_size.width - marker.pos.width;
            }
            marker.pos.width = image_size.width;
            marker.pos.height = image_size.height;
        }

        if self.st(id).list_style_position == ListStylePosition::Outside {
            if numeric {
                let space_width = self
                    .container
                    .borrow_mut()
                    .text_width(" ", marker.font);
                marker.pos.x = pos.x - space_width * 2;
                marker.pos.width = space_width;
            } else {
                marker.pos.x -= font_size;
            }
        }

        if numeric {
            let text = list_marker_text(self.st(id).list_style_type, marker.index);
            marker.pos.height = line_height;
            if text.is_empty() {
                self.container.borrow_mut().draw_list_marker(hdc, &marker);
            } else {
                let text = format!("{text}.");
                let text_width = self
                    .container
                    .borrow_mut()
                    .text_width(&text, marker.font);
                let mut text_pos = marker.pos;
                text_pos.move_to(marker.pos.right() - text_width, marker.pos.y);
                text_pos.width = text_width;
                self.container
                    .borrow_mut()
                    .draw_text(hdc, &text, marker.font, marker.color, text_pos);
            }
        } else {
            self.container.borrow_mut().draw_list_marker(hdc, &marker);
        }
    }

    /// [Appendix E](https://www.w3.org/TR/CSS2/zindex.html) painting
    /// order for one stacking context.
    pub(crate) fn draw_stacking_context(
        &self,
        id: NodeId,
        hdc: DrawHandle,
        x: i32,
        y: i32,
        clip: Option<&Position>,
        with_positioned: bool,
    ) {
        if !self.is_visible(id) {
            return;
        }

        let mut zindexes: Vec<i32> = Vec::new();
        if with_positioned {
            for &el in &self.st(id).positioned {
                let z = self.st(el).z_index;
                if !zindexes.contains(&z) {
                    zindexes.push(z);
                }
            }
            zindexes.sort_unstable();
            for &z in zindexes.iter().filter(|&&z| z < 0) {
                self.draw_children(id, hdc, x, y, clip, DrawFlag::Positioned, z);
            }
        }
        self.draw_children(id, hdc, x, y, clip, DrawFlag::Block, 0);
        self.draw_children(id, hdc, x, y, clip, DrawFlag::Floats, 0);
        self.draw_children(id, hdc, x, y, clip, DrawFlag::Inlines, 0);
        if with_positioned {
            for &z in zindexes.iter().filter(|&&z| z == 0) {
                self.draw_children(id, hdc, x, y, clip, DrawFlag::Positioned, z);
            }
            for &z in zindexes.iter().filter(|&&z| z > 0) {
                self.draw_children(id, hdc, x, y, clip, DrawFlag::Positioned, z);
            }
        }
    }

    fn draw_children(
        &self,
        id: NodeId,
        hdc: DrawHandle,
        x: i32,
        y: i32,
        clip: Option<&Position>,
        flag: DrawFlag,
        zindex: i32,
    ) {
        let mut pos = self.st(id).pos;
        pos.x += x;
        pos.y += y;

        let clipped = self.st(id).overflow > Overflow::Visible;
        if clipped {
            let mut border_box = pos;
            border_box.expand(&self.st(id).padding);
            let borders = self.st(id).borders;
            border_box.expand(&borders);
            let radii = self.calc_border_radii(id);
            self.container
                .borrow_mut()
                .set_clip(border_box, &radii, true, true);
        }

        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        for child in children {
            if !self.is_visible(child) {
                continue;
            }

            let mut descend = true;
            match flag {
                DrawFlag::Positioned => {
                    if self.is_positioned(child) && self.st(child).z_index == zindex {
                        self.draw_element(child, hdc, pos.x, pos.y, clip);
                        self.draw_stacking_context(child, hdc, pos.x, pos.y, clip, true);
                        descend = false;
                    }
                }
                DrawFlag::Block => {
                    if !self.is_inline_box(child)
                        && self.st(child).float == ElementFloat::None
                        && !self.is_positioned(child)
                    {
                        self.draw_element(child, hdc, pos.x, pos.y, clip);
                    }
                }
                DrawFlag::Floats => {
                    if self.st(child).float != ElementFloat::None && !self.is_positioned(child) {
                        // A float paints as its own mini stacking
                        // context, without positioned descendants.
                        self.draw_element(child, hdc, pos.x, pos.y, clip);
                        self.draw_stacking_context(child, hdc, pos.x, pos.y, clip, false);
                        descend = false;
                    }
                }
                DrawFlag::Inlines => {
                    if self.is_inline_box(child)
                        && self.st(child).float == ElementFloat::None
                        && !self.is_positioned(child)
                    {
                        self.draw_element(child, hdc, pos.x, pos.y, clip);
                        if self.st(child).display == Display::InlineBlock
                            || self.st(child).display == Display::InlineTable
                        {
                            self.draw_stacking_context(child, hdc, pos.x, pos.y, clip, false);
                            descend = false;
                        }
                    }
                }
            }

            if descend && !self.is_positioned(child) {
                let can_descend = flag == DrawFlag::Positioned
                    || (self.st(child).float == ElementFloat::None
                        && !matches!(
                            self.st(child).display,
                            Display::InlineBlock | Display::InlineTable
                        ));
                if can_descend {
                    self.draw_children(child, hdc, pos.x, pos.y, clip, flag, zindex);
                }
            }
        }

        if clipped {
            self.container.borrow_mut().del_clip();
        }
    }
}
