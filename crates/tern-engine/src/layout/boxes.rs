//! Block and line boxes.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! A block container partitions its children into an ordered box
//! sequence: a block box holds exactly one non-inline child, a line box
//! holds consecutive inline items until the line overflows (or the
//! white-space mode forbids wrapping). Boxes are transient per render
//! call; element positions are written through them.

use tern_css::keywords::{Display, TextAlign, VerticalAlign, WhiteSpace};
use tern_dom::NodeId;

use crate::backend::FontMetrics;
use crate::document::Document;

/// A box holding exactly one non-inline element.
#[derive(Debug, Clone)]
pub(crate) struct BlockBox {
    /// Identity for fragment grouping.
    pub id: u32,
    pub box_top: i32,
    pub box_left: i32,
    pub box_right: i32,
    pub element: Option<NodeId>,
}

/// A horizontal strip of inline items forming one visual line.
#[derive(Debug, Clone)]
pub(crate) struct LineBox {
    /// Identity for fragment grouping.
    pub id: u32,
    pub box_top: i32,
    pub box_left: i32,
    pub box_right: i32,
    /// Accumulated width of the items on the line.
    pub width: i32,
    /// Final height after [`Document::box_finish`].
    pub height: i32,
    /// Baseline offset from the line top after finish.
    pub baseline: i32,
    /// The container's declared line height.
    pub line_height: i32,
    /// The container's font metrics (default baseline).
    pub font_metrics: FontMetrics,
    pub text_align: TextAlign,
    pub items: Vec<NodeId>,
}

/// One box of a block container.
#[derive(Debug, Clone)]
pub(crate) enum LayoutBox {
    Block(BlockBox),
    Line(LineBox),
}

impl LayoutBox {
    pub fn is_line(&self) -> bool {
        matches!(self, LayoutBox::Line(_))
    }

    pub fn id(&self) -> u32 {
        match self {
            LayoutBox::Block(b) => b.id,
            LayoutBox::Line(l) => l.id,
        }
    }

    pub fn box_top(&self) -> i32 {
        match self {
            LayoutBox::Block(b) => b.box_top,
            LayoutBox::Line(l) => l.box_top,
        }
    }

    pub fn box_left(&self) -> i32 {
        match self {
            LayoutBox::Block(b) => b.box_left,
            LayoutBox::Line(l) => l.box_left,
        }
    }

    pub fn box_right(&self) -> i32 {
        match self {
            LayoutBox::Block(b) => b.box_right,
            LayoutBox::Line(l) => l.box_right,
        }
    }
}

impl Document {
    /// Accumulated left edge (margin+border+padding) of inline
    /// ancestors for which `el` opens the rendered content.
    ///
    /// Inline elements do not form boxes of their own: their children
    /// land directly in the container's line boxes and the wrapper's
    /// horizontal edges are carried by its first and last items.
    pub(crate) fn inline_shift_left(&self, el: NodeId) -> i32 {
        let mut shift = 0;
        let mut child = el;
        while let Some(parent) = self.tree.parent(child) {
            if self.st(parent).display != Display::Inline {
                break;
            }
            let first = self
                .tree
                .children(parent)
                .iter()
                .copied()
                .find(|&c| self.st(c).display != Display::None);
            if first != Some(child) {
                break;
            }
            shift += self.content_margins_left(parent);
            child = parent;
        }
        shift
    }

    /// Mirror of [`Document::inline_shift_left`] for the closing edge.
    pub(crate) fn inline_shift_right(&self, el: NodeId) -> i32 {
        let mut shift = 0;
        let mut child = el;
        while let Some(parent) = self.tree.parent(child) {
            if self.st(parent).display != Display::Inline {
                break;
            }
            let last = self
                .tree
                .children(parent)
                .iter()
                .rev()
                .copied()
                .find(|&c| self.st(c).display != Display::None);
            if last != Some(child) {
                break;
            }
            shift += self.content_margins_right(parent);
            child = parent;
        }
        shift
    }

    /// Bottom edge of a box (block: element margin box; line: height).
    pub(crate) fn box_bottom(&self, b: &LayoutBox) -> i32 {
        match b {
            LayoutBox::Block(bb) => {
                bb.box_top + bb.element.map_or(0, |el| self.el_height(el))
            }
            LayoutBox::Line(lb) => lb.box_top + lb.height,
        }
    }

    /// Whether `el` can join box `b` without starting a new one.
    pub(crate) fn box_can_hold(&self, b: &LayoutBox, el: NodeId, ws: WhiteSpace) -> bool {
        match b {
            // "A block box holds exactly one non-inline child."
            LayoutBox::Block(bb) => bb.element.is_none() && !self.is_inline_box(el),
            LayoutBox::Line(lb) => {
                if !self.is_inline_box(el) || self.is_break(el) {
                    return false;
                }
                if matches!(ws, WhiteSpace::Nowrap | WhiteSpace::Pre) {
                    return true;
                }
                lb.box_left
                    + lb.width
                    + self.el_width(el)
                    + self.inline_shift_left(el)
                    + self.inline_shift_right(el)
                    <= lb.box_right
            }
        }
    }

    /// Add `el` to box `b`, assigning its preliminary position.
    pub(crate) fn box_add_element(&mut self, b: &mut LayoutBox, el: NodeId) {
        match b {
            LayoutBox::Block(bb) => {
                bb.element = Some(el);
                self.st_mut(el).box_id = Some(bb.id);
            }
            LayoutBox::Line(lb) => {
                self.st_mut(el).skip = false;
                self.st_mut(el).box_id = None;

                let mut add = true;
                if (lb.items.is_empty() && self.is_white_space(el)) || self.is_break(el) {
                    // Leading whitespace and hard breaks take no space.
                    self.st_mut(el).skip = true;
                } else if self.is_white_space(el) && self.line_has_last_space(lb) {
                    add = false;
                    self.st_mut(el).skip = true;
                }

                if add {
                    self.st_mut(el).box_id = Some(lb.id);
                    lb.items.push(el);

                    if !self.st(el).skip {
                        let shift_left = self.inline_shift_left(el);
                        let shift_right = self.inline_shift_right(el);
                        let x = lb.box_left + lb.width + shift_left + self.content_margins_left(el);
                        let y = lb.box_top + self.content_margins_top(el);
                        self.st_mut(el).pos.x = x;
                        self.st_mut(el).pos.y = y;
                        lb.width += self.el_width(el) + shift_left + shift_right;
                    }
                }
            }
        }
    }

    fn line_has_last_space(&self, lb: &LineBox) -> bool {
        for &item in lb.items.iter().rev() {
            if self.is_white_space(item) || self.is_break(item) {
                return true;
            }
            break;
        }
        false
    }

    /// True when the box contributes no content.
    pub(crate) fn box_is_empty(&self, b: &LayoutBox) -> bool {
        match b {
            LayoutBox::Block(bb) => bb.element.is_none(),
            LayoutBox::Line(lb) => {
                lb.items.is_empty()
                    || lb
                        .items
                        .iter()
                        .all(|&el| self.st(el).skip && !self.is_break(el))
            }
        }
    }

    fn line_is_break_only(&self, lb: &LineBox) -> bool {
        match lb.items.first() {
            None => true,
            Some(&first) => {
                self.is_break(first) && lb.items.iter().all(|&el| self.st(el).skip)
            }
        }
    }

    /// Distance from the box bottom to the text baseline.
    pub(crate) fn box_baseline(&self, b: &LayoutBox) -> i32 {
        match b {
            LayoutBox::Block(bb) => bb.element.map_or(0, |el| self.element_baseline(el)),
            LayoutBox::Line(lb) => lb.baseline,
        }
    }

    /// The collapsible top margin a box exposes to its container.
    pub(crate) fn box_top_margin(&self, b: &LayoutBox) -> i32 {
        match b {
            LayoutBox::Block(bb) => bb
                .element
                .filter(|&el| self.collapse_top_margin(el))
                .map_or(0, |el| self.st(el).margins.top),
            LayoutBox::Line(_) => 0,
        }
    }

    /// The collapsible bottom margin a box exposes to its container.
    pub(crate) fn box_bottom_margin(&self, b: &LayoutBox) -> i32 {
        match b {
            LayoutBox::Block(bb) => bb
                .element
                .filter(|&el| self.collapse_bottom_margin(el))
                .map_or(0, |el| self.st(el).margins.bottom),
            LayoutBox::Line(_) => 0,
        }
    }

    /// Shift a box (and its content) vertically; used for retroactive
    /// margin-collapse adjustments.
    pub(crate) fn box_y_shift(&mut self, b: &mut LayoutBox, shift: i32) {
        match b {
            LayoutBox::Block(bb) => {
                bb.box_top += shift;
                if let Some(el) = bb.element {
                    self.st_mut(el).pos.y += shift;
                }
            }
            LayoutBox::Line(lb) => {
                lb.box_top += shift;
                for &el in &lb.items {
                    self.st_mut(el).pos.y += shift;
                }
            }
        }
    }

    /// Elements held by a box, in order.
    pub(crate) fn box_get_elements(&self, b: &LayoutBox, out: &mut Vec<NodeId>) {
        match b {
            LayoutBox::Block(bb) => {
                if let Some(el) = bb.element {
                    out.push(el);
                }
            }
            LayoutBox::Line(lb) => out.extend(lb.items.iter().copied()),
        }
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Finalize a box. For line boxes this trims trailing whitespace,
    /// computes the baseline and line height, applies text-align and
    /// vertical-align, then shifts everything to the final `box_top`.
    pub(crate) fn box_finish(&mut self, b: &mut LayoutBox, last_box: bool) {
        match b {
            LayoutBox::Block(bb) => {
                if let Some(el) = bb.element {
                    self.apply_relative_shift(el, bb.box_right - bb.box_left);
                }
            }
            LayoutBox::Line(lb) => {
                if self.box_is_empty_line(lb) || (last_box && self.line_is_break_only(lb)) {
                    lb.height = 0;
                    return;
                }

                // STEP 1: trailing whitespace and break elements do not
                // contribute width.
                for i in (0..lb.items.len()).rev() {
                    let el = lb.items[i];
                    if self.is_white_space(el) || self.is_break(el) {
                        if !self.st(el).skip {
                            self.st_mut(el).skip = true;
                            lb.width -= self.el_width(el);
                        }
                    } else {
                        break;
                    }
                }

                let mut baseline = lb.font_metrics.baseline();
                let mut line_height = lb.line_height;

                // STEP 2: text-align shifts the whole run.
                let add_x = match lb.text_align {
                    TextAlign::Right => (lb.box_right - lb.box_left - lb.width).max(0),
                    TextAlign::Center => ((lb.box_right - lb.box_left - lb.width) / 2).max(0),
                    // `justify` computes as left at this layer.
                    TextAlign::Left | TextAlign::Justify => 0,
                };

                // STEP 3: line height and baseline from text items.
                let mut text_height = 0;
                for &el in &lb.items {
                    if self.st(el).display == Display::InlineText {
                        let fm = self.st(el).font_metrics;
                        baseline = baseline.max(fm.baseline());
                        line_height = line_height.max(self.st(el).line_height);
                        text_height = text_height.max(fm.height);
                    }
                    self.st_mut(el).pos.x += add_x;
                }

                if text_height != 0 {
                    baseline += (line_height - text_height) / 2;
                }
                let height = line_height;

                // STEP 4: vertical-align each item; top/bottom expand
                // the effective extent.
                let mut y1 = 0;
                let mut y2 = height;
                for &el in &lb.items.clone() {
                    if self.st(el).display == Display::InlineText {
                        let fm = self.st(el).font_metrics;
                        self.st_mut(el).pos.y = height - baseline - fm.ascent;
                    } else {
                        let cmt = self.content_margins_top(el);
                        let el_height = self.el_height(el);
                        let y = match self.st(el).vertical_align {
                            VerticalAlign::Baseline
                            | VerticalAlign::Sub
                            | VerticalAlign::Super => {
                                height - baseline - el_height + self.element_baseline(el) + cmt
                            }
                            VerticalAlign::Top => y1 + cmt,
                            VerticalAlign::TextTop => {
                                height - baseline - lb.font_metrics.ascent + cmt
                            }
                            VerticalAlign::Middle => {
                                height - baseline - lb.font_metrics.x_height / 2 - el_height / 2
                                    + cmt
                            }
                            VerticalAlign::Bottom => y2 - el_height + cmt,
                            VerticalAlign::TextBottom => {
                                height - baseline + lb.font_metrics.descent - el_height + cmt
                            }
                        };
                        self.st_mut(el).pos.y = y;
                        y1 = y1.min(self.el_top(el));
                        y2 = y2.max(self.el_bottom(el));
                    }
                }

                // STEP 5: shift onto the final line-box top.
                for &el in &lb.items.clone() {
                    self.st_mut(el).pos.y -= y1;
                    self.st_mut(el).pos.y += lb.box_top;
                    if self.st(el).display != Display::InlineText {
                        match self.st(el).vertical_align {
                            VerticalAlign::Top => {
                                let y = lb.box_top + self.content_margins_top(el);
                                self.st_mut(el).pos.y = y;
                            }
                            VerticalAlign::Bottom => {
                                let y = lb.box_top + (y2 - y1) - self.el_height(el)
                                    + self.content_margins_top(el);
                                self.st_mut(el).pos.y = y;
                            }
                            _ => {}
                        }
                    }
                    self.apply_relative_shift(el, lb.box_right - lb.box_left);
                }

                lb.height = y2 - y1;
                lb.baseline = (baseline - y1) - (lb.height - line_height);
            }
        }
    }

    fn box_is_empty_line(&self, lb: &LineBox) -> bool {
        lb.items.is_empty()
            || lb
                .items
                .iter()
                .all(|&el| self.st(el).skip && !self.is_break(el))
    }

    /// Re-shape an in-progress line box after a float landed: items
    /// that no longer fit are returned for re-placement.
    pub(crate) fn box_new_width(
        &mut self,
        b: &mut LayoutBox,
        left: i32,
        right: i32,
        overflow: &mut Vec<NodeId>,
    ) {
        let LayoutBox::Line(lb) = b else {
            return;
        };
        let add = left - lb.box_left;
        if add == 0 {
            return;
        }
        lb.box_left = left;
        lb.box_right = right;
        lb.width = 0;

        let mut remove_from = lb.items.len();
        for i in 1..lb.items.len() {
            let el = lb.items[i];
            if self.st(el).skip {
                continue;
            }
            let el_width = self.el_width(el)
                + self.inline_shift_left(el)
                + self.inline_shift_right(el);
            if lb.box_left + lb.width + el_width > lb.box_right {
                remove_from = i;
                break;
            }
            self.st_mut(el).pos.x += add;
            lb.width += el_width;
        }

        if remove_from < lb.items.len() {
            for &el in &lb.items[remove_from..] {
                overflow.push(el);
                self.st_mut(el).box_id = None;
            }
            lb.items.truncate(remove_from);
        }
    }
}
