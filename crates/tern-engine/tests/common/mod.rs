#![allow(dead_code)]
//! Shared test scaffolding: a deterministic fake backend and tree
//! construction helpers.
//!
//! The fake container makes layout font-independent: every glyph
//! advances 8px, a font of size N is N px tall with a 3:1
//! ascent/descent split. Tests assert against those numbers.

use std::cell::RefCell;
use std::rc::Rc;

use tern_css::keywords::FontStyle;
use tern_css::Color;
use tern_dom::{NodeId, Tree};
use tern_engine::backend::{DocumentContainer, DrawHandle, FontHandle, FontMetrics};
use tern_engine::{ContainerRef, Document, DocumentOptions, Position};

/// Fixed advance width per glyph.
pub const CHAR_WIDTH: i32 = 8;

/// A recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Text { text: String, color: Color, pos: Position },
    Background { color: Color, clip_box: Position },
    Borders { pos: Position },
    ListMarker { pos: Position },
}

/// Deterministic backend with recorded draw calls.
#[derive(Default)]
pub struct FakeContainer {
    pub calls: Vec<DrawCall>,
    pub cursor: String,
    pub caption: String,
    fonts: Vec<i32>,
}

impl FakeContainer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentContainer for FakeContainer {
    fn create_font(
        &mut self,
        _family: &str,
        size: i32,
        _weight: i32,
        _style: FontStyle,
        decoration: u32,
        metrics: &mut FontMetrics,
    ) -> FontHandle {
        let size = size.max(1);
        *metrics = FontMetrics {
            height: size,
            ascent: size * 3 / 4,
            descent: size - size * 3 / 4,
            x_height: size / 2,
            draw_spaces: decoration != 0,
        };
        self.fonts.push(size);
        self.fonts.len()
    }

    fn delete_font(&mut self, _font: FontHandle) {}

    fn text_width(&mut self, text: &str, _font: FontHandle) -> i32 {
        text.chars().count() as i32 * CHAR_WIDTH
    }

    fn draw_text(&mut self, _hdc: DrawHandle, text: &str, _font: FontHandle, color: Color, pos: Position) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            color,
            pos,
        });
    }

    fn draw_background(&mut self, _hdc: DrawHandle, paint: &tern_engine::BackgroundPaint) {
        self.calls.push(DrawCall::Background {
            color: paint.color,
            clip_box: paint.clip_box,
        });
    }

    fn draw_borders(
        &mut self,
        _hdc: DrawHandle,
        _borders: &tern_engine::Borders,
        pos: Position,
        _root: bool,
    ) {
        self.calls.push(DrawCall::Borders { pos });
    }

    fn draw_list_marker(&mut self, _hdc: DrawHandle, marker: &tern_engine::ListMarker) {
        self.calls.push(DrawCall::ListMarker { pos: marker.pos });
    }

    fn get_client_rect(&self) -> Position {
        Position::new(0, 0, 800, 600)
    }

    fn set_cursor(&mut self, cursor: &str) {
        self.cursor = cursor.to_string();
    }

    fn set_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
    }
}

/// A master sheet giving tests full control: block display for the
/// usual containers, hidden heads, no default margins.
pub const TEST_MASTER: &str = "
html, body, div, p, h1, ul, ol { display: block; }
li { display: list-item; }
head, style, title { display: none; }
table { display: table; border-spacing: 0; }
tr { display: table-row; }
td, th { display: table-cell; }
";

/// Build a document over `tree` with the test master sheet.
pub fn make_document(tree: Tree, root: NodeId) -> (Document, Rc<RefCell<FakeContainer>>) {
    make_document_with_master(tree, root, TEST_MASTER)
}

/// Build a document with an explicit master sheet.
pub fn make_document_with_master(
    tree: Tree,
    root: NodeId,
    master: &str,
) -> (Document, Rc<RefCell<FakeContainer>>) {
    let concrete = Rc::new(RefCell::new(FakeContainer::new()));
    let container: ContainerRef = concrete.clone();
    let document = Document::from_tree(
        container,
        tree,
        root,
        DocumentOptions {
            master_css: Some(master.to_string()),
            base_url: None,
        },
    );
    (document, concrete)
}

/// Append a child element with an optional `style` attribute.
pub fn el(tree: &mut Tree, parent: NodeId, tag: &str, style: &str) -> NodeId {
    let id = tree.alloc_element(tag);
    if !style.is_empty() {
        tree.set_attr(id, "style", style);
    }
    tree.append_child(parent, id);
    id
}

/// A `<html><body>` skeleton with no body margin.
pub fn skeleton() -> (Tree, NodeId, NodeId) {
    let mut tree = Tree::new();
    let html = tree.alloc_element("html");
    let body = el(&mut tree, html, "body", "margin: 0");
    (tree, html, body)
}
