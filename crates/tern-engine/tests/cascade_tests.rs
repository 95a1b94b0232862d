//! Engine-level cascade, inheritance and length-resolution tests.

mod common;

use common::{el, make_document, skeleton};
use tern_css::{Color, CssProperty};
use tern_dom::NodeKind;

#[test]
fn margin_shorthand_expands_through_the_pipeline() {
    // `body{margin:5px 10px}` → top 5, right 10, bottom 5, left 10.
    let (mut tree, html, _) = skeleton();
    // Replace the skeleton body style with the shorthand under test.
    let body = tree.children(html)[0];
    tree.set_attr(body, "style", "margin: 5px 10px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    let (margins, _, _) = doc.element_box_edges(body);
    assert_eq!(
        (margins.top, margins.right, margins.bottom, margins.left),
        (5, 10, 5, 10)
    );
}

#[test]
fn inherited_properties_flow_down() {
    let (mut tree, html, body) = skeleton();
    tree.set_attr(body, "style", "margin:0; color: #112233; font-size: 20px");
    let p = el(&mut tree, body, "p", "");
    let span = el(&mut tree, p, "span", "");

    let (doc, _) = make_document(tree, html);

    // color and font-size are inherited...
    assert_eq!(doc.computed_color(span), Color::rgb(0x11, 0x22, 0x33));
    assert_eq!(
        doc.resolved_property(span, CssProperty::FontSize).raw,
        "20px"
    );
    // ...background-color is not: the span reports the default.
    assert!(doc
        .resolved_property(span, CssProperty::BackgroundColor)
        .color()
        .is_transparent());
    // Undeclared non-inherited property → the table default.
    assert_eq!(
        doc.resolved_property(p, CssProperty::Width).raw,
        "auto"
    );
}

#[test]
fn explicit_inherit_reaches_the_parent_value() {
    let (mut tree, html, body) = skeleton();
    let outer = el(&mut tree, body, "div", "background-color: #ff0000");
    let inner = el(&mut tree, outer, "div", "background-color: inherit");

    let (doc, _) = make_document(tree, html);
    assert_eq!(
        doc.resolved_property(inner, CssProperty::BackgroundColor).color(),
        Color::rgb(255, 0, 0)
    );
}

#[test]
fn later_sheet_rule_wins_at_equal_specificity() {
    // Two author rules, same specificity: source order decides; an
    // earlier !important rule survives a later plain one.
    let (mut tree, html, body) = skeleton();
    let head = el(&mut tree, html, "head", "");
    let style_el = el(&mut tree, head, "style", "");
    let css = tree.alloc(NodeKind::Text(
        "p { color: #0000ff } p { color: #00ff00 } \
         div { width: 1px !important } div { width: 2px }"
            .to_string(),
    ));
    tree.append_child(style_el, css);
    let p = el(&mut tree, body, "p", "");
    let d = el(&mut tree, body, "div", "");

    let (doc, _) = make_document(tree, html);
    assert_eq!(doc.computed_color(p), Color::rgb(0, 255, 0));
    assert_eq!(doc.resolved_property(d, CssProperty::Width).raw, "1px");
}

#[test]
fn higher_specificity_wins_regardless_of_order() {
    let (mut tree, html, body) = skeleton();
    let head = el(&mut tree, html, "head", "");
    let style_el = el(&mut tree, head, "style", "");
    let css = tree.alloc(NodeKind::Text(
        ".note { color: #00ff00 } p { color: #0000ff }".to_string(),
    ));
    tree.append_child(style_el, css);
    let p = el(&mut tree, body, "p", "");
    tree.set_attr(p, "class", "note");

    let (doc, _) = make_document(tree, html);
    assert_eq!(doc.computed_color(p), Color::rgb(0, 255, 0));
}

#[test]
fn inline_style_attribute_wins_over_sheets() {
    let (mut tree, html, body) = skeleton();
    let head = el(&mut tree, html, "head", "");
    let style_el = el(&mut tree, head, "style", "");
    let css = tree.alloc(NodeKind::Text("#x { color: #0000ff }".to_string()));
    tree.append_child(style_el, css);
    let p = el(&mut tree, body, "p", "color: #ff0000");
    tree.set_attr(p, "id", "x");

    let (doc, _) = make_document(tree, html);
    assert_eq!(doc.computed_color(p), Color::rgb(255, 0, 0));
}

#[test]
fn background_shorthand_through_the_pipeline() {
    // `div{background:red url(bg.png) no-repeat 0% 0%}`
    let (mut tree, html, body) = skeleton();
    let d = el(
        &mut tree,
        body,
        "div",
        "background: red url(bg.png) no-repeat 0% 0%",
    );

    let (doc, _) = make_document(tree, html);
    assert_eq!(
        doc.resolved_property(d, CssProperty::BackgroundColor).color(),
        Color::rgb(255, 0, 0)
    );
    assert_eq!(
        tern_css::parse_css_url(
            doc.resolved_property(d, CssProperty::BackgroundImage).string()
        ),
        "bg.png"
    );
    assert_eq!(
        doc.resolved_property(d, CssProperty::BackgroundRepeat).raw,
        "no-repeat"
    );
    assert_eq!(
        doc.resolved_property(d, CssProperty::BackgroundPosition).raw,
        "0% 0%"
    );
}

#[test]
fn em_and_percent_lengths_resolve_against_font_size() {
    // cvt_units: 1em == the font size; % of the containing width.
    let (mut tree, html, body) = skeleton();
    let outer = el(&mut tree, body, "div", "font-size: 20px");
    let padded = el(&mut tree, outer, "div", "padding-left: 2em; width: 50%");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    let (_, padding, _) = doc.element_box_edges(padded);
    assert_eq!(padding.left, 40); // 2em at inherited 20px
    assert_eq!(doc.element_position(padded).width, 200); // 50% of 400
}

#[test]
fn before_content_synthesizes_a_child() {
    let (mut tree, html, body) = skeleton();
    let head = el(&mut tree, html, "head", "");
    let style_el = el(&mut tree, head, "style", "");
    let css = tree.alloc(NodeKind::Text(
        "p::before { content: \"note: \" }".to_string(),
    ));
    tree.append_child(style_el, css);
    let p = el(&mut tree, body, "p", "");
    tree.append_text(p, "body");

    let (doc, _) = make_document(tree, html);
    let first = doc.tree().children(p)[0];
    let data = doc.tree().as_element(first).expect("generated element");
    assert!(data.generated.is_some());
    assert_eq!(doc.tree().text_content(first), "note: ");
}

#[test]
fn media_query_gates_rules_by_viewport() {
    // The fake client rect is 800x600: min-width 700 applies,
    // min-width 900 does not.
    let (mut tree, html, body) = skeleton();
    let head = el(&mut tree, html, "head", "");
    let style_el = el(&mut tree, head, "style", "");
    let css = tree.alloc(NodeKind::Text(
        "@media (min-width: 700px) { p { color: #ff0000 } } \
         @media (min-width: 900px) { p { color: #00ff00 } }"
            .to_string(),
    ));
    tree.append_child(style_el, css);
    let p = el(&mut tree, body, "p", "");

    let (doc, _) = make_document(tree, html);
    assert_eq!(doc.computed_color(p), Color::rgb(255, 0, 0));
}

#[test]
fn document_title_reaches_the_host() {
    let (mut tree, html, _) = skeleton();
    let head = el(&mut tree, html, "head", "");
    let title = el(&mut tree, head, "title", "");
    tree.append_text(title, "Hello");

    let (_doc, container) = make_document(tree, html);
    assert_eq!(container.borrow().caption, "Hello");
}
