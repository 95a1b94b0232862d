//! Hit-testing and dynamic pseudo-class refresh.
//!
//! [`Document::element_at`] walks the tree in reverse paint order:
//! positive-z positioned, zero-z positioned, inlines, floats, blocks,
//! negative-z positioned. Fixed elements are tested in client
//! coordinates, everything else in document coordinates.
//!
//! The mouse handlers toggle `:hover`/`:active` up the ancestor chain
//! and return the union of repaint rectangles for elements whose
//! selector match state changed.

use tern_css::keywords::{Display, ElementFloat, ElementPosition, Overflow};
use tern_dom::NodeId;

use crate::document::Document;
use crate::draw::DrawFlag;
use crate::geometry::Position;

impl Document {
    /// Border-box containment test in the element's own coordinates.
    fn is_point_inside(&self, id: NodeId, x: i32, y: i32) -> bool {
        if self.st(id).display == Display::Inline {
            let mut fragments = Vec::new();
            self.get_inline_boxes(id, &mut fragments);
            return fragments.iter().any(|f| f.is_point_inside(x, y));
        }
        let mut pos = self.st(id).pos;
        pos.expand(&self.st(id).padding);
        let borders = self.st(id).borders;
        pos.expand(&borders);
        pos.is_point_inside(x, y)
    }

    /// Reverse-paint-order point query rooted at `id`.
    pub(crate) fn get_element_by_point(
        &self,
        id: NodeId,
        x: i32,
        y: i32,
        client_x: i32,
        client_y: i32,
    ) -> Option<NodeId> {
        if !self.is_visible(id) {
            return None;
        }

        let mut zindexes: Vec<i32> = Vec::new();
        for &el in &self.st(id).positioned {
            let z = self.st(el).z_index;
            if !zindexes.contains(&z) {
                zindexes.push(z);
            }
        }
        zindexes.sort_unstable();

        for &z in zindexes.iter().rev().filter(|&&z| z > 0) {
            if let Some(found) =
                self.get_child_by_point(id, x, y, client_x, client_y, DrawFlag::Positioned, z)
            {
                return Some(found);
            }
        }
        for &z in zindexes.iter().filter(|&&z| z == 0) {
            if let Some(found) =
                self.get_child_by_point(id, x, y, client_x, client_y, DrawFlag::Positioned, z)
            {
                return Some(found);
            }
        }
        if let Some(found) =
            self.get_child_by_point(id, x, y, client_x, client_y, DrawFlag::Inlines, 0)
        {
            return Some(found);
        }
        if let Some(found) =
            self.get_child_by_point(id, x, y, client_x, client_y, DrawFlag::Floats, 0)
        {
            return Some(found);
        }
        if let Some(found) =
            self.get_child_by_point(id, x, y, client_x, client_y, DrawFlag::Block, 0)
        {
            return Some(found);
        }
        for &z in zindexes.iter().rev().filter(|&&z| z < 0) {
            if let Some(found) =
                self.get_child_by_point(id, x, y, client_x, client_y, DrawFlag::Positioned, z)
            {
                return Some(found);
            }
        }

        if self.st(id).el_position == ElementPosition::Fixed {
            if self.is_point_inside(id, client_x, client_y) {
                return Some(id);
            }
        } else if self.is_point_inside(id, x, y) {
            return Some(id);
        }
        None
    }

    /// One child class of the reverse paint order.
    fn get_child_by_point(
        &self,
        id: NodeId,
        x: i32,
        y: i32,
        client_x: i32,
        client_y: i32,
        flag: DrawFlag,
        zindex: i32,
    ) -> Option<NodeId> {
        // Clipped subtrees are gated by the container's own box.
        if self.st(id).overflow > Overflow::Visible && !self.is_point_inside(id, x, y) {
            return None;
        }

        let pos = self.st(id).pos;
        let local_x = x - pos.x;
        let local_y = y - pos.y;

        for &child in self.tree.children(id).iter().rev() {
            if !self.is_visible(child) || self.st(child).display == Display::InlineText {
                continue;
            }

            // A direct hit on the child may be overridden by a deeper
            // descendant found during the recursion below.
            let mut hit: Option<NodeId> = None;
            let mut descend = true;

            match flag {
                DrawFlag::Positioned => {
                    if self.is_positioned(child) && self.st(child).z_index == zindex {
                        let found = if self.st(child).el_position == ElementPosition::Fixed {
                            self.get_element_by_point(
                                child, client_x, client_y, client_x, client_y,
                            )
                            .or_else(|| {
                                self.is_point_inside(child, client_x, client_y)
                                    .then_some(child)
                            })
                        } else {
                            self.get_element_by_point(
                                child, local_x, local_y, client_x, client_y,
                            )
                            .or_else(|| {
                                self.is_point_inside(child, local_x, local_y).then_some(child)
                            })
                        };
                        if found.is_some() {
                            return found;
                        }
                        descend = false;
                    }
                }
                DrawFlag::Block => {
                    if !self.is_inline_box(child)
                        && self.st(child).float == ElementFloat::None
                        && !self.is_positioned(child)
                        && self.is_point_inside(child, local_x, local_y)
                    {
                        hit = Some(child);
                    }
                }
                DrawFlag::Floats => {
                    if self.st(child).float != ElementFloat::None && !self.is_positioned(child) {
                        let found = self
                            .get_element_by_point(child, local_x, local_y, client_x, client_y)
                            .or_else(|| {
                                self.is_point_inside(child, local_x, local_y).then_some(child)
                            });
                        if found.is_some() {
                            return found;
                        }
                        descend = false;
                    }
                }
                DrawFlag::Inlines => {
                    if self.is_inline_box(child)
                        && self.st(child).float == ElementFloat::None
                        && !self.is_positioned(child)
                    {
                        if matches!(
                            self.st(child).display,
                            Display::InlineBlock | Display::InlineTable
                        ) {
                            let found = self.get_element_by_point(
                                child, local_x, local_y, client_x, client_y,
                            );
                            if found.is_some() {
                                return found;
                            }
                            descend = false;
                        } else if self.is_point_inside(child, local_x, local_y) {
                            hit = Some(child);
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
                    if let Some(deeper) = self.get_child_by_point(
                        child, local_x, local_y, client_x, client_y, flag, zindex,
                    ) {
                        hit = Some(deeper);
                    }
                }
            }

            if hit.is_some() {
                return hit;
            }
        }

        None
    }

    /// Line-box fragments of an inline element, in the coordinate space
    /// of the block container's content box.
    ///
    /// Consecutive children on the same line box merge into one
    /// fragment; the element's own padding/border edges extend the
    /// first and last fragments.
    pub(crate) fn get_inline_boxes(&self, id: NodeId, boxes: &mut Vec<Position>) {
        let mut current_box: Option<u32> = None;
        let mut pos = Position::default();

        let padding = self.st(id).padding;
        let borders = self.st(id).borders;

        for &child in self.tree.children(id) {
            if self.st(child).skip {
                continue;
            }
            if let Some(box_id) = self.st(child).box_id {
                if current_box != Some(box_id) {
                    if current_box.is_some() && (pos.width != 0 || pos.height != 0) {
                        if boxes.is_empty() {
                            pos.x -= padding.left + borders.left;
                            pos.width += padding.left + borders.left;
                        }
                        boxes.push(pos);
                    }
                    current_box = Some(box_id);
                    pos = Position::default();
                    pos.x = self.el_left(child) + self.st(child).margins.left;
                    pos.y = self.el_top(child) - padding.top - borders.top;
                }
                pos.width = self.el_right(child)
                    - pos.x
                    - self.st(child).margins.right
                    - self.st(child).margins.left;
                pos.height = pos.height.max(
                    self.el_height(child) + padding.height() + borders.height(),
                );
            } else if self.st(child).display == Display::Inline {
                let mut sub_boxes = Vec::new();
                self.get_inline_boxes(child, &mut sub_boxes);
                if !sub_boxes.is_empty() {
                    if boxes.is_empty() && padding.left + borders.left > 0 {
                        let mut edge = sub_boxes[0];
                        edge.x -= padding.left + borders.left;
                        edge.width = padding.left + borders.left;
                        boxes.push(edge);
                    }
                    boxes.append(&mut sub_boxes);
                }
            }
        }

        if pos.width != 0 || pos.height != 0 {
            if boxes.is_empty() {
                pos.x -= padding.left + borders.left;
                pos.width += padding.left + borders.left;
            }
            boxes.push(pos);
        }
        if let Some(last) = boxes.last_mut() {
            if padding.right + borders.right > 0 {
                last.width += padding.right + borders.right;
            }
        }
    }

    // ── mouse events ───────────────────────────────────────────────

    /// Walk up from `id`, toggling a pseudo-class on every ancestor.
    fn set_pseudo_chain(&mut self, id: NodeId, hover: Option<bool>, active: Option<bool>) -> bool {
        let mut changed = false;
        let mut current = Some(id);
        while let Some(el) = current {
            if self.tree.as_element(el).is_some() && self.tree.set_pseudo_class(el, hover, active)
            {
                changed = true;
            }
            current = self.tree.parent(el);
        }
        changed
    }

    /// Mouse moved to `(x, y)`; returns repaint rectangles when hover
    /// state changed any styles.
    pub fn on_mouse_over(
        &mut self,
        x: i32,
        y: i32,
        client_x: i32,
        client_y: i32,
        redraw_boxes: &mut Vec<Position>,
    ) -> bool {
        let over = self.element_at(x, y, client_x, client_y);

        let mut state_changed = false;
        if over != self.over_element {
            if let Some(old) = self.over_element {
                if self.set_pseudo_chain(old, Some(false), Some(false)) {
                    state_changed = true;
                }
            }
            self.over_element = over;
        }

        let mut cursor = "auto".to_string();
        if let Some(over) = self.over_element {
            if self.set_pseudo_chain(over, Some(true), None) {
                state_changed = true;
            }
            let c = self.st(over).cursor.clone();
            if !c.is_empty() {
                cursor = c;
            }
        }
        self.container.borrow_mut().set_cursor(&cursor);

        if state_changed {
            return self.find_styles_changes(self.root, redraw_boxes, 0, 0);
        }
        false
    }

    /// Mouse left the document.
    pub fn on_mouse_leave(&mut self, redraw_boxes: &mut Vec<Position>) -> bool {
        if let Some(old) = self.over_element.take() {
            if self.set_pseudo_chain(old, Some(false), Some(false)) {
                return self.find_styles_changes(self.root, redraw_boxes, 0, 0);
            }
        }
        false
    }

    /// Primary button pressed at `(x, y)`.
    pub fn on_lbutton_down(
        &mut self,
        x: i32,
        y: i32,
        client_x: i32,
        client_y: i32,
        redraw_boxes: &mut Vec<Position>,
    ) -> bool {
        let over = self.element_at(x, y, client_x, client_y);

        let mut state_changed = false;
        if over != self.over_element {
            if let Some(old) = self.over_element {
                if self.set_pseudo_chain(old, Some(false), Some(false)) {
                    state_changed = true;
                }
            }
            self.over_element = over;
            if let Some(over) = self.over_element {
                if self.set_pseudo_chain(over, Some(true), None) {
                    state_changed = true;
                }
            }
        }

        if let Some(over) = self.over_element {
            if self.set_pseudo_chain(over, None, Some(true)) {
                state_changed = true;
            }
        }

        if state_changed {
            return self.find_styles_changes(self.root, redraw_boxes, 0, 0);
        }
        false
    }

    /// Primary button released; fires anchor navigation.
    pub fn on_lbutton_up(&mut self, redraw_boxes: &mut Vec<Position>) -> bool {
        let Some(over) = self.over_element else {
            return false;
        };

        // An anchor (or anchor ancestor) activates on release.
        let mut current = Some(over);
        while let Some(el) = current {
            let href = self
                .tree
                .as_element(el)
                .filter(|e| e.tag == "a")
                .and_then(|_| self.tree.attr(el, "href"))
                .map(str::to_string);
            if let Some(href) = href {
                let resolved = tern_common::urlutil::resolve(self.base_url.as_ref(), &href)
                    .map_or(href.clone(), |u| u.to_string());
                self.container.borrow_mut().on_anchor_click(&resolved);
                break;
            }
            current = self.tree.parent(el);
        }

        if self.set_pseudo_chain(over, None, Some(false)) {
            return self.find_styles_changes(self.root, redraw_boxes, 0, 0);
        }
        false
    }
}
