//! The layout engine: normal block/inline flow with line boxing,
//! floats, positioned elements and CSS tables.
//!
//! [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//! [§ 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//!
//! The engine runs top-down from the root with a fixed container
//! width. `render_element(el, x, y, max_width, second_pass)` places the
//! element, computes its outer size and returns the effective width
//! consumed; parents use the return value to decide whether a
//! shrink-to-fit second pass is needed (bounded: `second_pass` is a
//! boolean, never a recursion).

pub(crate) mod boxes;
pub(crate) mod list;
pub(crate) mod table;

use tern_css::keywords::{
    Display, ElementClear, ElementFloat, ElementPosition, ListStylePosition, ListStyleType,
    Overflow, WhiteSpace,
};
use tern_css::CssUnit;
use tern_dom::{NodeId, NodeKind};

use crate::document::Document;
use crate::geometry::{Position, Size};

use boxes::{BlockBox, LayoutBox, LineBox};

/// Working state for the box currently being filled.
#[derive(Debug, Clone, Copy)]
struct LineContext {
    top: i32,
    left: i32,
    right: i32,
    calculated_top: i32,
}

impl LineContext {
    fn new(top: i32, left: i32, right: i32) -> Self {
        Self {
            top,
            left,
            right,
            calculated_top: top,
        }
    }

    fn fix_top(&mut self) {
        self.calculated_top = self.top;
    }

    fn width(&self) -> i32 {
        self.right - self.left
    }
}

impl Document {
    /// Place an element at `(x, y)` within `max_width`; returns the
    /// effective width consumed.
    pub(crate) fn render_element(
        &mut self,
        id: NodeId,
        x: i32,
        y: i32,
        max_width: i32,
        second_pass: bool,
    ) -> i32 {
        match self.st(id).display {
            Display::Table | Display::InlineTable => {
                self.render_table(id, x, y, max_width, second_pass)
            }
            Display::InlineText => 0,
            _ => self.render_box(id, x, y, max_width, second_pass),
        }
    }

    /// [§ 10.3 Calculating widths and margins](https://www.w3.org/TR/CSS2/visudet.html#Computing_widths_and_margins)
    ///
    /// Normal block layout: resolve edges and width, place each child
    /// through the box model, finish the last box, collapse margins,
    /// clamp to min/max constraints and re-render shrink-to-fit boxes.
    fn render_box(&mut self, id: NodeId, x: i32, y: i32, mut max_width: i32, second_pass: bool) -> i32 {
        let parent_width = max_width;

        self.calc_outlines(id, parent_width);

        {
            let cml = self.content_margins_left(id);
            let cmt = self.content_margins_top(id);
            let st = self.st_mut(id);
            st.pos.clear();
            st.pos.move_to(x + cml, y + cmt);
        }

        let mut ret_width = 0;
        let mut block_width: Option<i32> = None;

        if self.st(id).display != Display::TableCell && !self.st(id).css_width.is_predefined() {
            let mut w = self.calc_width(id, parent_width);
            if self.st(id).box_sizing == tern_css::keywords::BoxSizing::BorderBox {
                w -= self.st(id).padding.width() + self.st(id).borders.width();
            }
            block_width = Some(w);
            ret_width = w;
            max_width = w;
        } else if max_width != 0 {
            max_width -= self.content_margins_left(id) + self.content_margins_right(id);
        }

        // max-width clamps the available width on the first pass only.
        if !self.st(id).css_max_width.is_predefined() && !second_pass {
            let mut mw_len = self.st(id).css_max_width;
            let font_size = self.st(id).font_size;
            let mut mw = self.cvt_units(&mut mw_len, font_size, parent_width);
            if mw_len.units() == CssUnit::Percent {
                mw = mw_len.calc_percent(parent_width);
            }
            if self.st(id).box_sizing == tern_css::keywords::BoxSizing::BorderBox {
                mw -= self.st(id).padding.width() + self.st(id).borders.width();
            }
            if max_width > mw {
                max_width = mw;
            }
        }

        self.st_mut(id).reset_layout();
        let mut boxes: Vec<LayoutBox> = Vec::new();

        self.st_mut(id).pos.height = 0;
        if let Some(h) = self.predefined_height(id) {
            self.st_mut(id).pos.height = h;
        }

        // Collapse duplicate whitespace before building boxes; in
        // pre/pre-wrap modes every run is content.
        let ws = self.st(id).white_space;
        let skip_spaces = matches!(
            ws,
            WhiteSpace::Normal | WhiteSpace::Nowrap | WhiteSpace::PreLine
        );

        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        let mut was_space = false;
        for child in children {
            if second_pass
                && matches!(
                    self.st(child).el_position,
                    ElementPosition::Absolute | ElementPosition::Fixed
                )
            {
                continue;
            }

            if skip_spaces {
                if matches!(self.tree.get(child).kind, NodeKind::Whitespace(_)) {
                    if was_space {
                        self.st_mut(child).skip = true;
                        continue;
                    }
                    was_space = true;
                } else {
                    was_space = false;
                }
            }

            let rw = self.place_element(id, child, max_width, &mut boxes);
            if rw > ret_width {
                ret_width = rw;
            }
        }

        self.finish_last_box(true, &mut boxes);

        if block_width.is_none() && self.is_inline_box(id) {
            self.st_mut(id).pos.width = ret_width;
        } else {
            self.st_mut(id).pos.width = max_width;
        }
        self.calc_auto_margins(id, parent_width);

        // [§ 8.3.1](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
        //
        // Parent/first-child and parent/last-child margin collapsing;
        // a grown top margin shifts anchored floats retroactively.
        if !boxes.is_empty() {
            if self.collapse_top_margin(id) {
                let old_top = self.st(id).margins.top;
                let first_margin = self.box_top_margin(&boxes[0]);
                let new_top = old_top.max(first_margin);
                self.st_mut(id).margins.top = new_top;
                if new_top != old_top {
                    self.update_floats(id, new_top - old_top, id);
                }
            }
            let last = boxes.len() - 1;
            if self.collapse_bottom_margin(id) {
                let bottom_margin = self.box_bottom_margin(&boxes[last]);
                let new_bottom = self.st(id).margins.bottom.max(bottom_margin);
                self.st_mut(id).margins.bottom = new_bottom;
                self.st_mut(id).pos.height =
                    self.box_bottom(&boxes[last]) - self.box_bottom_margin(&boxes[last]);
            } else {
                self.st_mut(id).pos.height = self.box_bottom(&boxes[last]);
            }
        }

        // Floats extend their holder's height.
        if self.is_floats_holder(id) {
            let floats_height = self.get_floats_height(id, ElementFloat::None);
            if floats_height > self.st(id).pos.height {
                self.st_mut(id).pos.height = floats_height;
            }
        }

        {
            let cml = self.content_margins_left(id);
            let cmt = self.content_margins_top(id);
            let st = self.st_mut(id);
            st.pos.move_to(x + cml, y + cmt);
        }

        if let Some(h) = self.predefined_height(id) {
            self.st_mut(id).pos.height = h;
        }

        // min-height / min-width clamps.
        let mut min_height = 0;
        let min_h = self.st(id).css_min_height;
        if !min_h.is_predefined() {
            if min_h.units() == CssUnit::Percent {
                if let Some(parent) = self.tree.parent(id) {
                    if let Some(ph) = self.predefined_height(parent) {
                        min_height = min_h.calc_percent(ph);
                    }
                }
            } else {
                min_height = min_h.val() as i32;
            }
        }
        if min_height != 0 && self.st(id).box_sizing == tern_css::keywords::BoxSizing::BorderBox {
            min_height -= self.st(id).padding.height() + self.st(id).borders.height();
            min_height = min_height.max(0);
        }
        if self.st(id).display == Display::ListItem {
            // A marker image can force the item taller.
            let image = self.style_string(id, tern_css::CssProperty::ListStyleImage);
            if !image.trim().is_empty() && !image.eq_ignore_ascii_case("none") {
                let url = tern_css::parse_css_url(&image);
                let sz = self.container.borrow_mut().get_image_size(&url);
                min_height = min_height.max(sz.height);
            }
        }
        if min_height > self.st(id).pos.height {
            self.st_mut(id).pos.height = min_height;
        }

        let mut min_width = self.st(id).css_min_width.calc_percent(parent_width);
        if min_width != 0 && self.st(id).box_sizing == tern_css::keywords::BoxSizing::BorderBox {
            min_width -= self.st(id).padding.width() + self.st(id).borders.width();
            min_width = min_width.max(0);
        }
        if min_width != 0 {
            if min_width > self.st(id).pos.width {
                self.st_mut(id).pos.width = min_width;
            }
            if min_width > ret_width {
                ret_width = min_width;
            }
        }

        ret_width += self.content_margins_left(id) + self.content_margins_right(id);

        self.st_mut(id).boxes = boxes;

        // Shrink-to-fit: inline-blocks, auto-width floats, tables and
        // out-of-flow boxes re-render once at the consumed width.
        if ret_width < max_width && !second_pass && self.have_parent(id) {
            let st = self.st(id);
            let shrink = st.display == Display::InlineBlock
                || (st.css_width.is_predefined()
                    && (st.float != ElementFloat::None
                        || st.display == Display::Table
                        || matches!(
                            st.el_position,
                            ElementPosition::Absolute | ElementPosition::Fixed
                        )));
            if shrink {
                self.render_element(id, x, y, ret_width, true);
                let cml = self.content_margins_left(id);
                let cmr = self.content_margins_right(id);
                self.st_mut(id).pos.width = ret_width - (cml + cmr);
            }
        }

        ret_width
    }

    /// [§ 9.2.2 Inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    ///
    /// A non-replaced inline element's children participate directly in
    /// the container's inline formatting context.
    fn render_inline(
        &mut self,
        container: NodeId,
        id: NodeId,
        max_width: i32,
        boxes: &mut Vec<LayoutBox>,
    ) -> i32 {
        // The inline box itself contributes only its edges (through the
        // inline shifts); its children join the container's flow, so
        // descendant coordinates stay in the container's space.
        self.calc_outlines(id, max_width);
        self.st_mut(id).pos.clear();

        let ws = self.st(id).white_space;
        let skip_spaces = matches!(
            ws,
            WhiteSpace::Normal | WhiteSpace::Nowrap | WhiteSpace::PreLine
        );

        let mut ret_width = 0;
        let mut was_space = false;
        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        for child in children {
            if skip_spaces {
                if matches!(self.tree.get(child).kind, NodeKind::Whitespace(_)) {
                    if was_space {
                        self.st_mut(child).skip = true;
                        continue;
                    }
                    was_space = true;
                } else {
                    was_space = false;
                }
            }
            let rw = self.place_element(container, child, max_width, boxes);
            if rw > ret_width {
                ret_width = rw;
            }
        }
        ret_width
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats) +
    /// [§ 9.4 Normal flow](https://www.w3.org/TR/CSS2/visuren.html#normal-flow)
    ///
    /// Route one child into the container's rendering flow.
    fn place_element(
        &mut self,
        container: NodeId,
        el: NodeId,
        max_width: i32,
        boxes: &mut Vec<LayoutBox>,
    ) -> i32 {
        match self.st(el).display {
            Display::None => return 0,
            Display::Inline => return self.render_inline(container, el, max_width, boxes),
            _ => {}
        }

        let el_position = self.st(el).el_position;
        if matches!(
            el_position,
            ElementPosition::Absolute | ElementPosition::Fixed
        ) {
            // Out-of-flow: rendered at the current flow position now,
            // then repositioned by the positioned pass.
            let line_top = match boxes.last() {
                Some(b @ LayoutBox::Line(_)) => {
                    let mut top = b.box_top();
                    if !self.box_is_empty(b) {
                        top += self.st(container).line_height;
                    }
                    top
                }
                Some(b) => self.box_bottom(b),
                None => 0,
            };
            self.render_element(el, 0, line_top, max_width, false);
            let cml = self.content_margins_left(el);
            let cmt = self.content_margins_top(el);
            self.st_mut(el).pos.x += cml;
            self.st_mut(el).pos.y += cmt;
            return 0;
        }

        let mut ret_width = 0;

        match self.st(el).float {
            ElementFloat::Left => {
                let line_top = match boxes.last() {
                    Some(b @ LayoutBox::Line(_)) => b.box_top(),
                    Some(b) => self.box_bottom(b),
                    None => 0,
                };
                let line_top = self.get_cleared_top(container, el, line_top);
                let (line_left, line_right) =
                    self.get_line_left_right(container, line_top, max_width);

                self.render_element(el, line_left, line_top, line_right, false);
                if self.el_right(el) > line_right {
                    let new_top =
                        self.find_next_line_top(container, self.el_top(el), self.el_width(el), max_width);
                    let new_left = self.get_line_left(container, new_top);
                    let cml = self.content_margins_left(el);
                    let cmt = self.content_margins_top(el);
                    self.st_mut(el).pos.x = new_left + cml;
                    self.st_mut(el).pos.y = new_top + cmt;
                }
                self.add_float(container, el, 0, 0);
                ret_width = self.fix_line_width(container, max_width, ElementFloat::Left, boxes);
                if ret_width == 0 {
                    ret_width = self.el_right(el);
                }
            }
            ElementFloat::Right => {
                let line_top = match boxes.last() {
                    Some(b @ LayoutBox::Line(_)) => b.box_top(),
                    Some(b) => self.box_bottom(b),
                    None => 0,
                };
                let line_top = self.get_cleared_top(container, el, line_top);
                let (line_left, line_right) =
                    self.get_line_left_right(container, line_top, max_width);

                self.render_element(el, 0, line_top, line_right, false);

                if line_left + self.el_width(el) > line_right {
                    let new_top =
                        self.find_next_line_top(container, self.el_top(el), self.el_width(el), max_width);
                    let right_edge = self.get_line_right(container, new_top, max_width);
                    let cml = self.content_margins_left(el);
                    let cmt = self.content_margins_top(el);
                    let width = self.el_width(el);
                    self.st_mut(el).pos.x = right_edge - width + cml;
                    self.st_mut(el).pos.y = new_top + cmt;
                } else {
                    let cml = self.content_margins_left(el);
                    let width = self.el_width(el);
                    self.st_mut(el).pos.x = line_right - width + cml;
                }
                self.add_float(container, el, 0, 0);
                ret_width = self.fix_line_width(container, max_width, ElementFloat::Right, boxes);

                if ret_width == 0 {
                    let (_, line_right) =
                        self.get_line_left_right(container, line_top, max_width);
                    ret_width = max_width - line_right;
                }
            }
            ElementFloat::None => {
                let mut line_ctx = LineContext::new(
                    boxes.last().map_or(0, LayoutBox::box_top),
                    0,
                    max_width,
                );
                line_ctx.fix_top();
                let (l, r) = self.get_line_left_right(container, line_ctx.top, max_width);
                line_ctx.left = l;
                line_ctx.right = r;

                // Pre-size pass for the box-selection width test.
                match self.st(el).display {
                    Display::InlineBlock | Display::InlineTable => {
                        ret_width =
                            self.render_element(el, line_ctx.left, line_ctx.top, line_ctx.right, false);
                    }
                    Display::Block => {
                        if self.is_replaced(el) || self.is_floats_holder(el) {
                            let parent_height = self
                                .tree
                                .parent(el)
                                .map_or(0, |p| self.st(p).pos.height);
                            let w = self.st(el).css_width.calc_percent(line_ctx.width());
                            let h = self.st(el).css_height.calc_percent(parent_height);
                            self.st_mut(el).pos.width = w;
                            self.st_mut(el).pos.height = h;
                        }
                        self.calc_outlines(el, line_ctx.width());
                    }
                    Display::InlineText => {
                        let sz = self.content_size(el, line_ctx.right);
                        self.st_mut(el).pos.width = sz.width;
                        self.st_mut(el).pos.height = sz.height;
                    }
                    _ => {}
                }

                // Box selection: join the current box or start a new
                // one (with clearance applied).
                let ws = self.st(container).white_space;
                let add_box = match boxes.last() {
                    Some(b) => !self.box_can_hold(b, el, ws),
                    None => true,
                };
                if add_box {
                    line_ctx.top = self.new_box(container, el, max_width, &mut line_ctx, boxes);
                } else if let Some(b) = boxes.last() {
                    line_ctx.top = b.box_top();
                }

                if line_ctx.top != line_ctx.calculated_top {
                    line_ctx.fix_top();
                    let (l, r) = self.get_line_left_right(container, line_ctx.top, max_width);
                    line_ctx.left = l;
                    line_ctx.right = r;
                }

                // Adjacent-sibling vertical margin collapse, applied as
                // a retroactive shift on the current box.
                if !self.is_inline_box(el) {
                    if boxes.len() == 1 {
                        if self.collapse_top_margin(container) {
                            let shift = self.st(el).margins.top;
                            if shift >= 0 {
                                line_ctx.top -= shift;
                                if let Some(b) = boxes.last_mut() {
                                    let mut b_taken = std::mem::replace(
                                        b,
                                        LayoutBox::Block(BlockBox {
                                            id: 0,
                                            box_top: 0,
                                            box_left: 0,
                                            box_right: 0,
                                            element: None,
                                        }),
                                    );
                                    self.box_y_shift(&mut b_taken, -shift);
                                    *b = b_taken;
                                }
                            }
                        }
                    } else if boxes.len() >= 2 {
                        let prev_margin = self.box_bottom_margin(&boxes[boxes.len() - 2]);
                        let shift = prev_margin.min(self.st(el).margins.top);
                        if shift >= 0 {
                            line_ctx.top -= shift;
                            if let Some(b) = boxes.last_mut() {
                                let mut b_taken = std::mem::replace(
                                    b,
                                    LayoutBox::Block(BlockBox {
                                        id: 0,
                                        box_top: 0,
                                        box_left: 0,
                                        box_right: 0,
                                        element: None,
                                    }),
                                );
                                self.box_y_shift(&mut b_taken, -shift);
                                *b = b_taken;
                            }
                        }
                    }
                }

                // The real render at the final line position.
                match self.st(el).display {
                    Display::Table | Display::ListItem => {
                        ret_width =
                            self.render_element(el, line_ctx.left, line_ctx.top, line_ctx.width(), false);
                    }
                    Display::Block
                    | Display::TableCell
                    | Display::TableCaption
                    | Display::TableRow => {
                        if self.is_replaced(el) || self.is_floats_holder(el) {
                            ret_width = self
                                .render_element(el, line_ctx.left, line_ctx.top, line_ctx.width(), false)
                                + line_ctx.left
                                + (max_width - line_ctx.right);
                        } else {
                            ret_width = self.render_element(el, 0, line_ctx.top, max_width, false);
                        }
                    }
                    _ => {}
                }

                if let Some(b) = boxes.last_mut() {
                    let mut b_taken = std::mem::replace(
                        b,
                        LayoutBox::Block(BlockBox {
                            id: 0,
                            box_top: 0,
                            box_left: 0,
                            box_right: 0,
                            element: None,
                        }),
                    );
                    self.box_add_element(&mut b_taken, el);
                    *b = b_taken;
                }

                if self.is_inline_box(el) && !self.st(el).skip {
                    ret_width = self.el_right(el) + (max_width - line_ctx.right);
                }
            }
        }

        ret_width
    }

    /// Finish the trailing box; returns the top for the next one.
    fn finish_last_box(&mut self, end_of_render: bool, boxes: &mut Vec<LayoutBox>) -> i32 {
        let mut line_top = 0;
        if let Some(mut last) = boxes.pop() {
            self.box_finish(&mut last, end_of_render);
            if self.box_is_empty(&last) {
                line_top = last.box_top();
            } else {
                boxes.push(last);
            }
            if let Some(last) = boxes.last() {
                line_top = self.box_bottom(last);
            }
        }
        line_top
    }

    /// Open a new box for `el`, applying clearance and float bounds.
    fn new_box(
        &mut self,
        container: NodeId,
        el: NodeId,
        max_width: i32,
        line_ctx: &mut LineContext,
        boxes: &mut Vec<LayoutBox>,
    ) -> i32 {
        let finished_top = self.finish_last_box(false, boxes);
        line_ctx.top = self.get_cleared_top(container, el, finished_top);

        line_ctx.fix_top();
        let (l, r) = self.get_line_left_right(container, line_ctx.top, max_width);
        line_ctx.left = l;
        line_ctx.right = r;

        if self.is_inline_box(el) || self.is_floats_holder(el) {
            let el_width = self.el_width(el);
            if el_width > line_ctx.right - line_ctx.left {
                line_ctx.top =
                    self.find_next_line_top(container, line_ctx.top, el_width, max_width);
                line_ctx.fix_top();
                let (l, r) = self.get_line_left_right(container, line_ctx.top, max_width);
                line_ctx.left = l;
                line_ctx.right = r;
            }
        }

        // An inside list marker reserves space on the first line.
        let first_line_margin = if boxes.is_empty()
            && self.st(container).list_style_type != ListStyleType::None
            && self.st(container).list_style_position == ListStylePosition::Inside
        {
            self.st(container).font_size
        } else {
            0
        };

        if self.is_inline_box(el) {
            // text-indent applies to the first line box only.
            let text_indent = if self.st(container).css_text_indent.val() != 0.0
                && !boxes.iter().any(LayoutBox::is_line)
            {
                self.st(container).css_text_indent.calc_percent(max_width)
            } else {
                0
            };

            let id = self.alloc_box_id();
            let st = self.st(container);
            boxes.push(LayoutBox::Line(LineBox {
                id,
                box_top: line_ctx.top,
                box_left: line_ctx.left + first_line_margin + text_indent,
                box_right: line_ctx.right,
                width: 0,
                height: 0,
                baseline: 0,
                line_height: st.line_height,
                font_metrics: st.font_metrics,
                text_align: st.text_align,
                items: Vec::new(),
            }));
        } else {
            let id = self.alloc_box_id();
            boxes.push(LayoutBox::Block(BlockBox {
                id,
                box_top: line_ctx.top,
                box_left: line_ctx.left,
                box_right: line_ctx.right,
                element: None,
            }));
        }

        line_ctx.top
    }

    /// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ///
    /// Raise `line_top` past the floats the element must clear.
    fn get_cleared_top(&mut self, container: NodeId, el: NodeId, mut line_top: i32) -> i32 {
        match self.st(el).clear {
            ElementClear::Left => {
                let fh = self.get_left_floats_height(container);
                if fh != 0 && fh > line_top {
                    line_top = fh;
                }
            }
            ElementClear::Right => {
                let fh = self.get_right_floats_height(container);
                if fh != 0 && fh > line_top {
                    line_top = fh;
                }
            }
            ElementClear::Both => {
                let fh = self.get_floats_height(container, ElementFloat::None);
                if fh != 0 && fh > line_top {
                    line_top = fh;
                }
            }
            ElementClear::None => {
                let float = self.st(el).float;
                if float != ElementFloat::None {
                    let fh = self.get_floats_height(container, float);
                    if fh != 0 && fh > line_top {
                        line_top = fh;
                    }
                }
            }
        }
        line_top
    }

    // ── float bookkeeping ──────────────────────────────────────────

    /// Height covered by floats (filtered by the clear requirement of
    /// a new float of side `float_mode`); forwarded to the holder.
    pub(crate) fn get_floats_height(&self, id: NodeId, float_mode: ElementFloat) -> i32 {
        if self.is_floats_holder(id) {
            let mut h = 0;
            let consider = |fb: &crate::element::FloatedBox| match float_mode {
                ElementFloat::None => true,
                ElementFloat::Left => {
                    matches!(fb.clear, ElementClear::Left | ElementClear::Both)
                }
                ElementFloat::Right => {
                    matches!(fb.clear, ElementClear::Right | ElementClear::Both)
                }
            };
            for fb in self.st(id).floats_left.iter().chain(&self.st(id).floats_right) {
                if consider(fb) {
                    h = h.max(if float_mode == ElementFloat::None {
                        fb.pos.bottom()
                    } else {
                        fb.pos.top()
                    });
                }
            }
            return h;
        }
        match self.tree.parent(id) {
            Some(parent) => self.get_floats_height(parent, float_mode) - self.st(id).pos.y,
            None => 0,
        }
    }

    fn get_left_floats_height(&self, id: NodeId) -> i32 {
        if self.is_floats_holder(id) {
            return self
                .st(id)
                .floats_left
                .iter()
                .map(|fb| fb.pos.bottom())
                .max()
                .unwrap_or(0);
        }
        match self.tree.parent(id) {
            Some(parent) => self.get_left_floats_height(parent) - self.st(id).pos.y,
            None => 0,
        }
    }

    fn get_right_floats_height(&self, id: NodeId) -> i32 {
        if self.is_floats_holder(id) {
            return self
                .st(id)
                .floats_right
                .iter()
                .map(|fb| fb.pos.bottom())
                .max()
                .unwrap_or(0);
        }
        match self.tree.parent(id) {
            Some(parent) => self.get_right_floats_height(parent) - self.st(id).pos.y,
            None => 0,
        }
    }

    /// Left line bound at `y` (after left floats), in `id`'s space.
    pub(crate) fn get_line_left(&mut self, id: NodeId, y: i32) -> i32 {
        if self.is_floats_holder(id) {
            if self.st(id).cache_line_left.is_valid && self.st(id).cache_line_left.y == y {
                return self.st(id).cache_line_left.value;
            }
            let mut w = 0;
            for fb in &self.st(id).floats_left {
                if y >= fb.pos.top() && y < fb.pos.bottom() {
                    w = w.max(fb.pos.right());
                }
            }
            self.st_mut(id).cache_line_left.set(y, w);
            return w;
        }
        match self.tree.parent(id) {
            Some(parent) => {
                let w = self.get_line_left(parent, y + self.st(id).pos.y).max(0);
                if w == 0 {
                    0
                } else {
                    (w - self.st(id).pos.x).max(0)
                }
            }
            None => 0,
        }
    }

    /// Right line bound at `y` (before right floats), in `id`'s space.
    pub(crate) fn get_line_right(&mut self, id: NodeId, y: i32, def_right: i32) -> i32 {
        if self.is_floats_holder(id) {
            if self.st(id).cache_line_right.is_valid && self.st(id).cache_line_right.y == y {
                if self.st(id).cache_line_right.is_default {
                    return def_right;
                }
                return self.st(id).cache_line_right.value.min(def_right);
            }
            let mut w = def_right;
            let mut is_default = true;
            for fb in &self.st(id).floats_right {
                if y >= fb.pos.top() && y < fb.pos.bottom() && fb.pos.left() < w {
                    w = fb.pos.left();
                    is_default = false;
                }
            }
            self.st_mut(id).cache_line_right.set(y, w);
            self.st_mut(id).cache_line_right.is_default = is_default;
            return w;
        }
        match self.tree.parent(id) {
            Some(parent) => {
                let w = self.get_line_right(
                    parent,
                    y + self.st(id).pos.y,
                    def_right + self.st(id).pos.x,
                );
                w - self.st(id).pos.x
            }
            None => def_right,
        }
    }

    /// Both line bounds at once.
    pub(crate) fn get_line_left_right(
        &mut self,
        id: NodeId,
        y: i32,
        def_right: i32,
    ) -> (i32, i32) {
        let left = self.get_line_left(id, y);
        let right = self.get_line_right(id, y, def_right);
        (left, right)
    }

    /// [§ 9.5.1 float placement](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Register a float with its holder (forwarding upward with
    /// coordinate translation). Left floats sort by decreasing right
    /// edge, right floats by increasing left edge.
    fn add_float(&mut self, id: NodeId, el: NodeId, x: i32, y: i32) {
        if self.is_floats_holder(id) {
            let fb = crate::element::FloatedBox {
                pos: Position::new(
                    self.el_left(el) + x,
                    self.el_top(el) + y,
                    self.el_width(el),
                    self.el_height(el),
                ),
                float_side: self.st(el).float,
                clear: self.st(el).clear,
                el,
            };

            match fb.float_side {
                ElementFloat::Left => {
                    let insert_at = self
                        .st(id)
                        .floats_left
                        .iter()
                        .position(|other| fb.pos.right() > other.pos.right())
                        .unwrap_or(self.st(id).floats_left.len());
                    self.st_mut(id).floats_left.insert(insert_at, fb);
                    self.st_mut(id).cache_line_left.invalidate();
                }
                ElementFloat::Right => {
                    let insert_at = self
                        .st(id)
                        .floats_right
                        .iter()
                        .position(|other| fb.pos.left() < other.pos.left())
                        .unwrap_or(self.st(id).floats_right.len());
                    self.st_mut(id).floats_right.insert(insert_at, fb);
                    self.st_mut(id).cache_line_right.invalidate();
                }
                ElementFloat::None => {}
            }
        } else if let Some(parent) = self.tree.parent(id) {
            let px = self.st(id).pos.x;
            let py = self.st(id).pos.y;
            self.add_float(parent, el, x + px, y + py);
        }
    }

    /// Shift floats anchored under `parent_el` by `dy` (retroactive
    /// margin collapse).
    fn update_floats(&mut self, id: NodeId, dy: i32, parent_el: NodeId) {
        if self.is_floats_holder(id) {
            let mut reset_left = false;
            let mut reset_right = false;
            let lefts: Vec<usize> = (0..self.st(id).floats_left.len()).collect();
            for i in lefts {
                let el = self.st(id).floats_left[i].el;
                if self.tree.is_ancestor(el, parent_el) || el == parent_el {
                    self.st_mut(id).floats_left[i].pos.y += dy;
                    reset_left = true;
                }
            }
            let rights: Vec<usize> = (0..self.st(id).floats_right.len()).collect();
            for i in rights {
                let el = self.st(id).floats_right[i].el;
                if self.tree.is_ancestor(el, parent_el) || el == parent_el {
                    self.st_mut(id).floats_right[i].pos.y += dy;
                    reset_right = true;
                }
            }
            if reset_left {
                self.st_mut(id).cache_line_left.invalidate();
            }
            if reset_right {
                self.st_mut(id).cache_line_right.invalidate();
            }
        } else if let Some(parent) = self.tree.parent(id) {
            self.update_floats(parent, dy, parent_el);
        }
    }

    /// The lowest y ≥ `top` at which a box of `width` fits between the
    /// float bounds; scans float top/bottom edges.
    fn find_next_line_top(&mut self, id: NodeId, top: i32, width: i32, def_right: i32) -> i32 {
        if self.is_floats_holder(id) {
            let mut points: Vec<i32> = Vec::new();
            {
                let st = self.st(id);
                for fb in st.floats_left.iter().chain(&st.floats_right) {
                    for edge in [fb.pos.top(), fb.pos.bottom()] {
                        if edge >= top && !points.contains(&edge) {
                            points.push(edge);
                        }
                    }
                }
            }
            if points.is_empty() {
                return top;
            }
            points.sort_unstable();
            let mut new_top = *points.last().unwrap_or(&top);
            for pt in points {
                let (left, right) = self.get_line_left_right(id, pt, def_right);
                if right - left >= width {
                    new_top = pt;
                    break;
                }
            }
            return new_top;
        }
        match self.tree.parent(id) {
            Some(parent) => {
                let new_top = self.find_next_line_top(
                    parent,
                    top + self.st(id).pos.y,
                    width,
                    def_right + self.st(id).pos.x,
                );
                new_top - self.st(id).pos.y
            }
            None => 0,
        }
    }

    /// After a float lands, re-fix the current box: a cleared first
    /// child keeps the box (re-shaped in place), otherwise the box is
    /// dissolved and its elements re-placed.
    fn fix_line_width(
        &mut self,
        container: NodeId,
        max_width: i32,
        float_side: ElementFloat,
        boxes: &mut Vec<LayoutBox>,
    ) -> i32 {
        let mut ret_width = 0;
        let Some(last) = boxes.last() else {
            return 0;
        };

        let mut els: Vec<NodeId> = Vec::new();
        self.box_get_elements(last, &mut els);

        let was_cleared = match els.first() {
            Some(&first) => match self.st(first).clear {
                ElementClear::None => false,
                ElementClear::Both => true,
                ElementClear::Left => float_side == ElementFloat::Left,
                ElementClear::Right => float_side == ElementFloat::Right,
            },
            None => false,
        };

        if !was_cleared {
            boxes.pop();
            for el in els {
                let rw = self.place_element(container, el, max_width, boxes);
                if rw > ret_width {
                    ret_width = rw;
                }
            }
        } else {
            let line_top = match boxes.last() {
                Some(b @ LayoutBox::Line(_)) => b.box_top(),
                Some(b) => self.box_bottom(b),
                None => 0,
            };
            let (mut line_left, line_right) =
                self.get_line_left_right(container, line_top, max_width);

            if boxes.last().is_some_and(LayoutBox::is_line) {
                if boxes.len() == 1
                    && self.st(container).list_style_type != ListStyleType::None
                    && self.st(container).list_style_position == ListStylePosition::Inside
                {
                    line_left += self.st(container).font_size;
                }
                if self.st(container).css_text_indent.val() != 0.0 {
                    let has_line = boxes[..boxes.len() - 1].iter().any(LayoutBox::is_line);
                    if !has_line {
                        line_left += self
                            .st(container)
                            .css_text_indent
                            .calc_percent(max_width);
                    }
                }
            }

            let mut overflow = Vec::new();
            if let Some(b) = boxes.last_mut() {
                let mut b_taken = std::mem::replace(
                    b,
                    LayoutBox::Block(BlockBox {
                        id: 0,
                        box_top: 0,
                        box_left: 0,
                        box_right: 0,
                        element: None,
                    }),
                );
                self.box_new_width(&mut b_taken, line_left, line_right, &mut overflow);
                *b = b_taken;
            }
            for el in overflow {
                let rw = self.place_element(container, el, max_width, boxes);
                if rw > ret_width {
                    ret_width = rw;
                }
            }
        }

        ret_width
    }

    // ── widths, heights, margins ───────────────────────────────────

    /// Resolve used margins/paddings/border widths against the parent
    /// width (percentages included).
    pub(crate) fn calc_outlines(&mut self, id: NodeId, parent_width: i32) {
        let css_margins = self.st(id).css_margins;
        let css_padding = self.st(id).css_padding;
        let css_borders = self.st(id).css_borders;
        let st = self.st_mut(id);
        st.margins.left = css_margins.left.calc_percent(parent_width);
        st.margins.right = css_margins.right.calc_percent(parent_width);
        st.margins.top = css_margins.top.calc_percent(parent_width);
        st.margins.bottom = css_margins.bottom.calc_percent(parent_width);

        st.padding.left = css_padding.left.calc_percent(parent_width);
        st.padding.right = css_padding.right.calc_percent(parent_width);
        st.padding.top = css_padding.top.calc_percent(parent_width);
        st.padding.bottom = css_padding.bottom.calc_percent(parent_width);

        st.borders.left = css_borders.left.width.calc_percent(parent_width);
        st.borders.right = css_borders.right.width.calc_percent(parent_width);
        st.borders.top = css_borders.top.width.calc_percent(parent_width);
        st.borders.bottom = css_borders.bottom.width.calc_percent(parent_width);
    }

    /// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// Auto horizontal margins center a sized block.
    pub(crate) fn calc_auto_margins(&mut self, id: NodeId, parent_width: i32) {
        if matches!(
            self.st(id).el_position,
            ElementPosition::Absolute | ElementPosition::Fixed
        ) {
            return;
        }
        if !matches!(self.st(id).display, Display::Block | Display::Table) {
            return;
        }

        let left_auto = self.st(id).css_margins.left.is_predefined();
        let right_auto = self.st(id).css_margins.right.is_predefined();
        let st = self.st(id);
        let box_width =
            st.pos.width + st.borders.width() + st.padding.width();

        if left_auto && right_auto {
            if box_width <= parent_width {
                let space = parent_width - box_width;
                self.st_mut(id).margins.left = space / 2;
                self.st_mut(id).margins.right = space - space / 2;
            } else {
                self.st_mut(id).margins.left = 0;
                self.st_mut(id).margins.right = 0;
            }
        } else if left_auto {
            let el_width = box_width + self.st(id).margins.right;
            self.st_mut(id).margins.left = (parent_width - el_width).max(0);
        } else if right_auto {
            let el_width = box_width + self.st(id).margins.left;
            self.st_mut(id).margins.right = (parent_width - el_width).max(0);
        }
    }

    /// Used content width for a sized element.
    pub(crate) fn calc_width(&self, id: NodeId, parent_width: i32) -> i32 {
        let w = self.st(id).css_width;
        if w.is_predefined() {
            return parent_width;
        }
        if w.units() == CssUnit::Percent && !self.have_parent(id) {
            let client = self.container.borrow().get_client_rect();
            return w.calc_percent(client.width);
        }
        w.calc_percent(parent_width)
    }

    /// The height when it does not depend on content.
    pub(crate) fn predefined_height(&self, id: NodeId) -> Option<i32> {
        let h = self.st(id).css_height;
        if h.is_predefined() {
            return None;
        }
        if h.units() == CssUnit::Percent {
            return match self.tree.parent(id) {
                None => {
                    let client = self.container.borrow().get_client_rect();
                    Some(h.calc_percent(client.height))
                }
                Some(parent) => self
                    .predefined_height(parent)
                    .map(|ph| h.calc_percent(ph)),
            };
        }
        Some(h.val() as i32)
    }

    /// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    ///
    /// Offset a relatively positioned box after normal placement.
    pub(crate) fn apply_relative_shift(&mut self, id: NodeId, parent_width: i32) {
        if self.st(id).el_position != ElementPosition::Relative {
            return;
        }
        let offsets = self.st(id).css_offsets;
        if !offsets.left.is_predefined() {
            self.st_mut(id).pos.x += offsets.left.calc_percent(parent_width);
        } else if !offsets.right.is_predefined() {
            self.st_mut(id).pos.x -= offsets.right.calc_percent(parent_width);
        }
        if !offsets.top.is_predefined() {
            let shift = offsets.top.calc_percent(self.st(id).pos.height);
            self.st_mut(id).pos.y += shift;
        } else if !offsets.bottom.is_predefined() {
            let shift = offsets.bottom.calc_percent(self.st(id).pos.height);
            self.st_mut(id).pos.y -= shift;
        }
    }

    /// Distance from the element bottom to its last baseline.
    pub(crate) fn element_baseline(&self, id: NodeId) -> i32 {
        if self.is_replaced(id) {
            return 0;
        }
        match self.st(id).boxes.last() {
            Some(b) => self.box_baseline(b) + self.content_margins_bottom(id),
            None => 0,
        }
    }

    /// Intrinsic content size for text runs and replaced elements.
    pub(crate) fn content_size(&mut self, id: NodeId, max_width: i32) -> Size {
        match &self.tree.get(id).kind {
            NodeKind::Text(text) => {
                let text = self
                    .st(id)
                    .transformed_text
                    .clone()
                    .unwrap_or_else(|| text.clone());
                let font = self.st(id).font;
                let width = self.container.borrow_mut().text_width(&text, font);
                Size::new(width, self.st(id).font_metrics.height)
            }
            NodeKind::Whitespace(run) => {
                let font = self.st(id).font;
                let measured = if matches!(
                    self.st(id).white_space,
                    WhiteSpace::Pre | WhiteSpace::PreWrap
                ) {
                    run.clone()
                } else {
                    " ".to_string()
                };
                let width = self.container.borrow_mut().text_width(&measured, font);
                Size::new(width, self.st(id).font_metrics.height)
            }
            NodeKind::Element(_) if self.is_replaced(id) => {
                let intrinsic = self.replaced_size(id);
                let mut size = intrinsic;
                let css_w = self.st(id).css_width;
                let css_h = self.st(id).css_height;
                if !css_w.is_predefined() {
                    size.width = css_w.calc_percent(max_width);
                    if !css_h.is_predefined() {
                        size.height = css_h.calc_percent(0);
                    } else if intrinsic.width > 0 {
                        // Preserve the aspect ratio.
                        size.height =
                            (i64::from(size.width) * i64::from(intrinsic.height)
                                / i64::from(intrinsic.width)) as i32;
                    }
                } else if !css_h.is_predefined() {
                    size.height = css_h.calc_percent(0);
                    if intrinsic.height > 0 {
                        size.width = (i64::from(size.height) * i64::from(intrinsic.width)
                            / i64::from(intrinsic.height)) as i32;
                    }
                }
                size
            }
            _ => Size::default(),
        }
    }

    // ── positioned pass ────────────────────────────────────────────

    /// Collect every non-static descendant onto its containing
    /// block's list (the nearest positioned ancestor, or the root);
    /// returns true when any absolute/fixed descendant exists.
    pub(crate) fn fetch_positioned(&mut self, id: NodeId) -> bool {
        self.clear_positioned(id);
        self.collect_positioned(id)
    }

    fn clear_positioned(&mut self, id: NodeId) {
        self.st_mut(id).positioned.clear();
        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        for child in children {
            self.clear_positioned(child);
        }
    }

    fn collect_positioned(&mut self, id: NodeId) -> bool {
        let mut ret = false;
        let children: Vec<NodeId> = self.tree.children(id).to_vec();
        for child in children {
            let pos = self.st(child).el_position;
            if pos.is_positioned() {
                self.add_positioned(id, child);
            }
            if matches!(pos, ElementPosition::Absolute | ElementPosition::Fixed) {
                ret = true;
            }
            if self.collect_positioned(child) {
                ret = true;
            }
        }
        ret
    }

    /// Register `el` with the nearest positioned ancestor at or above
    /// `start` (the root when there is none).
    fn add_positioned(&mut self, start: NodeId, el: NodeId) {
        let mut holder = start;
        while self.have_parent(holder) && !self.st(holder).el_position.is_positioned() {
            holder = self.tree.parent(holder).unwrap_or(holder);
        }
        self.st_mut(holder).positioned.push(el);
    }

    /// [§ 10.3.7 / § 10.6.4 Absolutely positioned elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
    ///
    /// Resolve {left,right,top,bottom} against the containing block
    /// (viewport for `fixed`): one offset translates, both stretch
    /// (explicit width/height wins), then the subtree re-renders.
    pub(crate) fn render_positioned_pass(&mut self, id: NodeId) {
        let client = self.container.borrow().get_client_rect();

        let positioned: Vec<NodeId> = self.st(id).positioned.clone();
        for el in positioned {
            let el_position = self.st(el).el_position;
            if self.st(el).display == Display::None {
                self.render_positioned_pass(el);
                continue;
            }
            if !matches!(
                el_position,
                ElementPosition::Absolute | ElementPosition::Fixed
            ) {
                self.render_positioned_pass(el);
                continue;
            }

            let (parent_width, parent_height) = if el_position == ElementPosition::Fixed {
                (client.width, client.height)
            } else {
                match self.tree.parent(el) {
                    Some(p) => (self.st(p).pos.width, self.st(p).pos.height),
                    None => (0, 0),
                }
            };

            let offsets = self.st(el).css_offsets;
            let css_w = self.st(el).css_width;
            let css_h = self.st(el).css_height;

            let mut need_render = false;
            let mut new_width = -1;
            let mut new_height = -1;
            if css_w.units() == CssUnit::Percent && parent_width != 0 {
                new_width = css_w.calc_percent(parent_width);
                if self.st(el).pos.width != new_width {
                    need_render = true;
                    self.st_mut(el).pos.width = new_width;
                }
            }
            if css_h.units() == CssUnit::Percent && parent_height != 0 {
                new_height = css_h.calc_percent(parent_height);
                if self.st(el).pos.height != new_height {
                    need_render = true;
                    self.st_mut(el).pos.height = new_height;
                }
            }

            let cml = self.content_margins_left(el);
            let cmr = self.content_margins_right(el);
            let cmt = self.content_margins_top(el);
            let cmb = self.content_margins_bottom(el);
            let (pad_left, pad_right, pad_top, pad_bottom) = {
                let st = self.st(id);
                (
                    st.padding.left,
                    st.padding.right,
                    st.padding.top,
                    st.padding.bottom,
                )
            };

            let mut cvt_x = false;
            let mut cvt_y = false;

            if el_position == ElementPosition::Fixed {
                if !offsets.left.is_predefined() || !offsets.right.is_predefined() {
                    if !offsets.left.is_predefined() && offsets.right.is_predefined() {
                        self.st_mut(el).pos.x = offsets.left.calc_percent(parent_width) + cml;
                    } else if offsets.left.is_predefined() && !offsets.right.is_predefined() {
                        let w = self.st(el).pos.width;
                        self.st_mut(el).pos.x =
                            parent_width - offsets.right.calc_percent(parent_width) - w - cmr;
                    } else {
                        let x = offsets.left.calc_percent(parent_width) + cml;
                        let w = parent_width
                            - offsets.left.calc_percent(parent_width)
                            - offsets.right.calc_percent(parent_width)
                            - (cml + cmr);
                        self.st_mut(el).pos.x = x;
                        self.st_mut(el).pos.width = w;
                        need_render = true;
                    }
                }
                if !offsets.top.is_predefined() || !offsets.bottom.is_predefined() {
                    if !offsets.top.is_predefined() && offsets.bottom.is_predefined() {
                        self.st_mut(el).pos.y = offsets.top.calc_percent(parent_height) + cmt;
                    } else if offsets.top.is_predefined() && !offsets.bottom.is_predefined() {
                        let h = self.st(el).pos.height;
                        self.st_mut(el).pos.y =
                            parent_height - offsets.bottom.calc_percent(parent_height) - h - cmb;
                    } else {
                        let y = offsets.top.calc_percent(parent_height) + cmt;
                        let h = parent_height
                            - offsets.top.calc_percent(parent_height)
                            - offsets.bottom.calc_percent(parent_height)
                            - (cmt + cmb);
                        self.st_mut(el).pos.y = y;
                        self.st_mut(el).pos.height = h;
                        need_render = true;
                    }
                }
            } else {
                // The containing block is this element's padding box.
                let (self_width, self_height) = {
                    let st = self.st(id);
                    (st.pos.width, st.pos.height)
                };
                if !offsets.left.is_predefined() || !offsets.right.is_predefined() {
                    if !offsets.left.is_predefined() && offsets.right.is_predefined() {
                        self.st_mut(el).pos.x =
                            offsets.left.calc_percent(parent_width) + cml - pad_left;
                    } else if offsets.left.is_predefined() && !offsets.right.is_predefined() {
                        let w = self.st(el).pos.width;
                        self.st_mut(el).pos.x = self_width + pad_right
                            - offsets.right.calc_percent(parent_width)
                            - w
                            - cmr;
                    } else {
                        let x = offsets.left.calc_percent(parent_width) + cml - pad_left;
                        let mut w = self_width + pad_left + pad_right
                            - offsets.left.calc_percent(parent_width)
                            - offsets.right.calc_percent(parent_width)
                            - (cml + cmr);
                        if new_width != -1 {
                            self.st_mut(el).pos.x = x + (w - new_width) / 2;
                            w = new_width;
                        } else {
                            self.st_mut(el).pos.x = x;
                        }
                        self.st_mut(el).pos.width = w;
                        need_render = true;
                    }
                    cvt_x = true;
                }
                if !offsets.top.is_predefined() || !offsets.bottom.is_predefined() {
                    if !offsets.top.is_predefined() && offsets.bottom.is_predefined() {
                        self.st_mut(el).pos.y =
                            offsets.top.calc_percent(parent_height) + cmt - pad_top;
                    } else if offsets.top.is_predefined() && !offsets.bottom.is_predefined() {
                        let h = self.st(el).pos.height;
                        self.st_mut(el).pos.y = self_height + pad_bottom
                            - offsets.bottom.calc_percent(parent_height)
                            - h
                            - cmb;
                    } else {
                        let y = offsets.top.calc_percent(parent_height) + cmt - pad_top;
                        let mut h = self_height + pad_top + pad_bottom
                            - offsets.top.calc_percent(parent_height)
                            - offsets.bottom.calc_percent(parent_height)
                            - (cmt + cmb);
                        if new_height != -1 {
                            self.st_mut(el).pos.y = y + (h - new_height) / 2;
                            h = new_height;
                        } else {
                            self.st_mut(el).pos.y = y;
                        }
                        self.st_mut(el).pos.height = h;
                        need_render = true;
                    }
                    cvt_y = true;
                }
            }

            // Offsets were computed against the containing block;
            // translate through intermediate ancestors back into the
            // parent's coordinate space.
            if cvt_x || cvt_y {
                let mut offset_x = 0;
                let mut offset_y = 0;
                let mut cursor = self.tree.parent(el);
                while let Some(current) = cursor {
                    if current == id {
                        break;
                    }
                    offset_x += self.st(current).pos.x;
                    offset_y += self.st(current).pos.y;
                    cursor = self.tree.parent(current);
                }
                if cvt_x {
                    self.st_mut(el).pos.x -= offset_x;
                }
                if cvt_y {
                    self.st_mut(el).pos.y -= offset_y;
                }
            }

            if need_render {
                let pos = self.st(el).pos;
                self.render_element(el, self.el_left(el), self.el_top(el), self.el_width(el), true);
                self.st_mut(el).pos = pos;
            }

            self.render_positioned_pass(el);
        }

        // Paint and hit-test walk the positioned list by stack level.
        let mut positioned = std::mem::take(&mut self.st_mut(id).positioned);
        positioned.sort_by_key(|&el| self.st(el).z_index);
        self.st_mut(id).positioned = positioned;
    }

    /// Accumulate the visible document extent; the root stretches to
    /// the client rectangle.
    pub(crate) fn calc_document_size(&mut self, id: NodeId, sz: &mut Size, x: i32, y: i32) {
        if !self.is_visible(id) || self.st(id).el_position == ElementPosition::Fixed {
            return;
        }

        sz.width = sz.width.max(x + self.el_right(id));
        sz.height = sz.height.max(y + self.el_bottom(id));

        if self.st(id).overflow == Overflow::Visible {
            let pos = self.st(id).pos;
            let children: Vec<NodeId> = self.tree.children(id).to_vec();
            for child in children {
                self.calc_document_size(child, sz, x + pos.x, y + pos.y);
            }
        }

        if !self.have_parent(id) {
            let client = self.container.borrow().get_client_rect();
            let cmt = self.content_margins_top(id);
            let cmb = self.content_margins_bottom(id);
            let cml = self.content_margins_left(id);
            let cmr = self.content_margins_right(id);
            let st = self.st_mut(id);
            st.pos.height = sz.height.max(client.height) - cmt - cmb;
            st.pos.width = sz.width.max(client.width) - cml - cmr;
        }
    }
}
