//! Per-node engine state: computed style inputs and layout results.
//!
//! The element tree itself lives in `tern-dom`; everything the engine
//! derives for a node — resolved style properties, the used box edges,
//! the computed position, the node's boxes, floats and positioned
//! descendants — is stored in one [`ElementState`] per node, indexed by
//! `NodeId`, and rebuilt by the style/layout passes.

use std::rc::Rc;

use tern_css::keywords::{
    BackgroundAttachment, BackgroundBox, BackgroundRepeat, BorderCollapse, BorderStyle, BoxSizing,
    Display, ElementClear, ElementFloat, ElementPosition, FontStyle, ListStylePosition,
    ListStyleType, Overflow, TextAlign, TextTransform, VerticalAlign, Visibility, WhiteSpace,
};
use tern_css::{Color, CssLength, Selector};
use tern_dom::NodeId;

use crate::backend::{FontHandle, FontMetrics};
use crate::geometry::{Margins, Position};
use crate::layout::boxes::LayoutBox;
use crate::layout::table::TableGrid;

/// A selector that was a candidate for this element during the
/// cascade, with its current match state (for hover refresh).
#[derive(Debug, Clone)]
pub(crate) struct UsedSelector {
    /// The selector (shared with the stylesheet).
    pub selector: Rc<Selector>,
    /// Whether the selector currently applies (unconditionally).
    pub used: bool,
}

/// Lengths for the four offsets of a positioned element.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct OffsetLengths {
    pub left: CssLength,
    pub top: CssLength,
    pub right: CssLength,
    pub bottom: CssLength,
}

/// Lengths for the four sides of a box property.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LengthBox {
    pub left: CssLength,
    pub top: CssLength,
    pub right: CssLength,
    pub bottom: CssLength,
}

/// One computed border side.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CssBorderSide {
    pub width: CssLength,
    pub style: BorderStyle,
    pub color: Color,
}

/// Computed border inputs, including the eight radius lengths.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CssBorders {
    pub left: CssBorderSide,
    pub top: CssBorderSide,
    pub right: CssBorderSide,
    pub bottom: CssBorderSide,
    pub radius_top_left_x: CssLength,
    pub radius_top_left_y: CssLength,
    pub radius_top_right_x: CssLength,
    pub radius_top_right_y: CssLength,
    pub radius_bottom_right_x: CssLength,
    pub radius_bottom_right_y: CssLength,
    pub radius_bottom_left_x: CssLength,
    pub radius_bottom_left_y: CssLength,
}

/// Computed background inputs (resolved at paint time against the
/// element's boxes).
#[derive(Debug, Clone, Default)]
pub(crate) struct Background {
    pub color: Color,
    /// `url(...)` contents of `background-image` (unresolved).
    pub image: String,
    /// Base URL the image resolves against.
    pub baseurl: String,
    pub attachment: BackgroundAttachment,
    pub repeat: BackgroundRepeat,
    pub clip: BackgroundBox,
    pub origin: BackgroundBox,
    pub position_x: CssLength,
    pub position_y: CssLength,
    pub size_width: CssLength,
    pub size_height: CssLength,
    /// `cover` / `contain` / `auto` keyword from `background-size`.
    pub size_mode: BackgroundSizeMode,
}

/// `background-size` keyword modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum BackgroundSizeMode {
    /// Use the intrinsic size (or the explicit lengths).
    #[default]
    Auto,
    /// Scale to fit inside the origin box.
    Contain,
    /// Scale to cover the origin box.
    Cover,
}

impl Background {
    /// True when neither color nor image would paint.
    pub fn is_empty(&self) -> bool {
        self.image.is_empty() && self.color.is_transparent()
    }
}

/// A float registered with its floats-holder, in holder coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FloatedBox {
    pub pos: Position,
    pub float_side: ElementFloat,
    pub clear: ElementClear,
    pub el: NodeId,
}

/// One-entry cache for line-left/line-right queries, keyed by y.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LineQueryCache {
    pub y: i32,
    pub value: i32,
    pub is_valid: bool,
    pub is_default: bool,
}

impl LineQueryCache {
    pub fn invalidate(&mut self) {
        self.is_valid = false;
    }

    pub fn set(&mut self, y: i32, value: i32) {
        self.y = y;
        self.value = value;
        self.is_valid = true;
    }
}

/// Everything the engine tracks per node.
#[derive(Debug, Default)]
pub(crate) struct ElementState {
    // ── style storage ──────────────────────────────────────────────
    /// The cascaded declaration store for this node.
    pub style: tern_css::Style,
    /// Candidate selectors and their match state (hover refresh).
    pub used_styles: Vec<UsedSelector>,

    // ── computed values ────────────────────────────────────────────
    pub font: FontHandle,
    pub font_metrics: FontMetrics,
    pub font_size: i32,
    pub display: Display,
    pub el_position: ElementPosition,
    pub float: ElementFloat,
    pub clear: ElementClear,
    pub overflow: Overflow,
    pub visibility: Visibility,
    pub white_space: WhiteSpace,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub box_sizing: BoxSizing,
    pub border_collapse: BorderCollapse,
    pub text_transform: TextTransform,
    pub font_style: FontStyle,
    pub z_index: i32,

    pub css_width: CssLength,
    pub css_height: CssLength,
    pub css_min_width: CssLength,
    pub css_min_height: CssLength,
    pub css_max_width: CssLength,
    pub css_max_height: CssLength,
    pub css_offsets: OffsetLengths,
    pub css_margins: LengthBox,
    pub css_padding: LengthBox,
    pub css_borders: CssBorders,
    pub css_text_indent: CssLength,
    pub border_spacing_x: i32,
    pub border_spacing_y: i32,

    pub line_height: i32,
    pub lh_predefined: bool,
    pub list_style_type: ListStyleType,
    pub list_style_position: ListStylePosition,
    /// 1-based index among `li` siblings (list items only).
    pub list_index: i32,
    pub bg: Background,
    pub cursor: String,

    /// Transformed text for text nodes (after `text-transform`).
    pub transformed_text: Option<String>,

    // ── layout state ───────────────────────────────────────────────
    /// The content box, relative to the parent's content box.
    pub pos: Position,
    /// Used margins in px (after % resolution and collapsing).
    pub margins: Margins,
    /// Used padding in px.
    pub padding: Margins,
    /// Used border widths in px.
    pub borders: Margins,
    /// Skipped by line layout (collapsed whitespace, trailing space).
    pub skip: bool,
    /// Id of the box (block or line) currently holding this element.
    pub box_id: Option<u32>,
    /// This block container's boxes after layout.
    pub boxes: Vec<LayoutBox>,
    /// Left floats registered with this holder.
    pub floats_left: Vec<FloatedBox>,
    /// Right floats registered with this holder.
    pub floats_right: Vec<FloatedBox>,
    pub cache_line_left: LineQueryCache,
    pub cache_line_right: LineQueryCache,
    /// Positioned children collected by `fetch_positioned`.
    pub positioned: Vec<NodeId>,
    /// The table grid (table/inline-table elements only).
    pub grid: Option<TableGrid>,
}

impl ElementState {
    /// Reset the per-render layout results, keeping computed styles.
    pub fn reset_layout(&mut self) {
        self.boxes.clear();
        self.floats_left.clear();
        self.floats_right.clear();
        self.cache_line_left.invalidate();
        self.cache_line_right.invalidate();
        self.box_id = None;
    }
}
