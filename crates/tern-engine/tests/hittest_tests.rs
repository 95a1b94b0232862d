//! Hit-testing and hover/active refresh tests.

mod common;

use common::{el, make_document, skeleton};
use tern_css::Color;
use tern_dom::NodeKind;

#[test]
fn point_hits_the_topmost_block() {
    let (mut tree, html, body) = skeleton();
    let outer = el(&mut tree, body, "div", "width: 100px; height: 100px");
    let inner = el(&mut tree, outer, "div", "width: 50px; height: 50px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(200);

    assert_eq!(doc.element_at(25, 25, 25, 25), Some(inner));
    assert_eq!(doc.element_at(75, 75, 75, 75), Some(outer));
    assert_eq!(doc.element_at(150, 10, 150, 10), Some(body));
}

#[test]
fn positive_z_positioned_wins_over_flow_content() {
    let (mut tree, html, body) = skeleton();
    let block = el(&mut tree, body, "div", "width: 100px; height: 100px");
    let over = el(
        &mut tree,
        body,
        "div",
        "position: absolute; left: 0; top: 0; width: 100px; height: 100px; z-index: 5",
    );

    let (mut doc, _) = make_document(tree, html);
    doc.render(200);

    let _ = block;
    assert_eq!(doc.element_at(10, 10, 10, 10), Some(over));
}

#[test]
fn floats_hit_before_blocks() {
    let (mut tree, html, body) = skeleton();
    let wrap = el(&mut tree, body, "div", "width: 200px; height: 50px; overflow: hidden");
    let float = el(&mut tree, wrap, "div", "float: left; width: 50px; height: 50px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    assert_eq!(doc.element_at(10, 10, 10, 10), Some(float));
    assert_eq!(doc.element_at(100, 10, 100, 10), Some(wrap));
}

#[test]
fn inline_text_hits_report_the_inline_element() {
    let (mut tree, html, body) = skeleton();
    let p = el(&mut tree, body, "p", "font-size: 10px");
    let a = el(&mut tree, p, "a", "");
    tree.set_attr(a, "href", "#");
    tree.append_text(a, "link");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    // The 4-glyph word spans 32px on the first line.
    assert_eq!(doc.element_at(10, 5, 10, 5), Some(a));
}

#[test]
fn hover_refresh_returns_repaint_box_and_recolors() {
    // `a:hover{color:red}`: entering the anchor repaints its fragment
    // and the resolved color flips.
    let (mut tree, html, body) = skeleton();
    let head = el(&mut tree, html, "head", "");
    let style_el = el(&mut tree, head, "style", "");
    let css = tree.alloc(NodeKind::Text(
        "a { color: #0000ff } a:hover { color: #ff0000 }".to_string(),
    ));
    tree.append_child(style_el, css);
    let p = el(&mut tree, body, "p", "font-size: 10px");
    let a = el(&mut tree, p, "a", "");
    tree.set_attr(a, "href", "#");
    tree.append_text(a, "link");

    let (mut doc, container) = make_document(tree, html);
    doc.render(400);

    assert_eq!(doc.computed_color(a), Color::rgb(0, 0, 255));

    let mut redraw = Vec::new();
    let changed = doc.on_mouse_over(10, 5, 10, 5, &mut redraw);
    assert!(changed);
    assert!(!redraw.is_empty());
    assert_eq!(doc.computed_color(a), Color::rgb(255, 0, 0));

    // The anchor's cursor (from the default `auto`) reached the host.
    assert!(!container.borrow().cursor.is_empty());

    // Leaving reverts the color.
    let mut redraw = Vec::new();
    let changed = doc.on_mouse_leave(&mut redraw);
    assert!(changed);
    assert_eq!(doc.computed_color(a), Color::rgb(0, 0, 255));
}

#[test]
fn active_state_toggles_on_button_events() {
    let (mut tree, html, body) = skeleton();
    let head = el(&mut tree, html, "head", "");
    let style_el = el(&mut tree, head, "style", "");
    let css = tree.alloc(NodeKind::Text(
        "div:active { color: #ff0000 }".to_string(),
    ));
    tree.append_child(style_el, css);
    let d = el(&mut tree, body, "div", "width: 100px; height: 40px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    let mut redraw = Vec::new();
    let changed = doc.on_lbutton_down(10, 10, 10, 10, &mut redraw);
    assert!(changed);
    assert_eq!(doc.computed_color(d), Color::rgb(255, 0, 0));

    let mut redraw = Vec::new();
    doc.on_lbutton_up(&mut redraw);
    assert_eq!(doc.computed_color(d), Color::black());
}

#[test]
fn anchor_click_reaches_the_host() {
    // Clicking an anchor reports the resolved href on button-up.
    struct ClickContainer {
        inner: common::FakeContainer,
        clicked: std::rc::Rc<std::cell::RefCell<Option<String>>>,
    }
    impl tern_engine::DocumentContainer for ClickContainer {
        fn create_font(
            &mut self,
            family: &str,
            size: i32,
            weight: i32,
            style: tern_css::keywords::FontStyle,
            decoration: u32,
            metrics: &mut tern_engine::FontMetrics,
        ) -> tern_engine::FontHandle {
            self.inner
                .create_font(family, size, weight, style, decoration, metrics)
        }
        fn delete_font(&mut self, font: tern_engine::FontHandle) {
            self.inner.delete_font(font);
        }
        fn text_width(&mut self, text: &str, font: tern_engine::FontHandle) -> i32 {
            self.inner.text_width(text, font)
        }
        fn draw_text(
            &mut self,
            hdc: tern_engine::DrawHandle,
            text: &str,
            font: tern_engine::FontHandle,
            color: Color,
            pos: tern_engine::Position,
        ) {
            self.inner.draw_text(hdc, text, font, color, pos);
        }
        fn on_anchor_click(&mut self, url: &str) {
            *self.clicked.borrow_mut() = Some(url.to_string());
        }
    }

    let (mut tree, html, body) = skeleton();
    let p = el(&mut tree, body, "p", "font-size: 10px");
    let a = el(&mut tree, p, "a", "");
    tree.set_attr(a, "href", "https://example.com/next");
    tree.append_text(a, "go");

    let clicked = std::rc::Rc::new(std::cell::RefCell::new(None));
    let container: tern_engine::ContainerRef =
        std::rc::Rc::new(std::cell::RefCell::new(ClickContainer {
            inner: common::FakeContainer::new(),
            clicked: clicked.clone(),
        }));
    let mut doc = tern_engine::Document::from_tree(
        container,
        tree,
        html,
        tern_engine::DocumentOptions {
            master_css: Some(common::TEST_MASTER.to_string()),
            base_url: None,
        },
    );
    doc.render(400);

    let mut redraw = Vec::new();
    doc.on_lbutton_down(5, 5, 5, 5, &mut redraw);
    doc.on_lbutton_up(&mut redraw);

    assert_eq!(
        clicked.borrow().as_deref(),
        Some("https://example.com/next")
    );
}
