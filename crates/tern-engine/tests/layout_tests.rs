//! Layout engine tests: line boxes, block flow, floats, margins,
//! positioned elements.
//!
//! All numbers derive from the fake backend: 8px per glyph, a font of
//! size N is N px tall (3:1 ascent/descent).

mod common;

use common::{el, make_document, skeleton, CHAR_WIDTH};
use tern_dom::NodeKind;

#[test]
fn paragraph_produces_one_line_of_words() {
    // `<p>hello world</p>` with font-size 10: one line box, two words,
    // line height = font height.
    let (mut tree, html, body) = skeleton();
    let p = el(&mut tree, body, "p", "font-size: 10px");
    tree.append_text(p, "hello world");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    let kids: Vec<_> = doc.tree().children(p).to_vec();
    assert_eq!(kids.len(), 3); // hello, space, world

    let hello = doc.element_position(kids[0]);
    let world = doc.element_position(kids[2]);

    assert_eq!(hello.width, 5 * CHAR_WIDTH);
    assert_eq!(world.width, 5 * CHAR_WIDTH);
    // Words flow left to right with the collapsed space between.
    assert_eq!(hello.x, 0);
    assert_eq!(world.x, 6 * CHAR_WIDTH);
    assert_eq!(hello.y, world.y);
    // The paragraph is one line tall (the 10px font height).
    assert_eq!(doc.element_position(p).height, 10);
}

#[test]
fn long_line_wraps_at_the_container_edge() {
    let (mut tree, html, body) = skeleton();
    let p = el(&mut tree, body, "p", "font-size: 10px");
    tree.append_text(p, "aaaa bbbb cccc");

    let (mut doc, _) = make_document(tree, html);
    // Two words (4*8=32 plus a space 8) fit in 80px; the third wraps.
    doc.render(80);

    let kids: Vec<_> = doc.tree().children(p).to_vec();
    let first = doc.element_position(kids[0]);
    let third = doc.element_position(kids[4]);
    assert_eq!(first.y, third.y - 10);
    assert_eq!(third.x, 0);
    assert_eq!(doc.element_position(p).height, 20);
}

#[test]
fn nowrap_keeps_everything_on_one_line() {
    let (mut tree, html, body) = skeleton();
    let p = el(&mut tree, body, "p", "font-size: 10px; white-space: nowrap");
    tree.append_text(p, "aaaa bbbb cccc");

    let (mut doc, _) = make_document(tree, html);
    doc.render(40);
    assert_eq!(doc.element_position(p).height, 10);
}

#[test]
fn blocks_stack_vertically() {
    let (mut tree, html, body) = skeleton();
    let a = el(&mut tree, body, "div", "height: 30px");
    let b = el(&mut tree, body, "div", "height: 20px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(200);

    assert_eq!(doc.element_position(a).y, 0);
    assert_eq!(doc.element_position(b).y, 30);
    assert_eq!(doc.element_position(a).width, 200);
}

#[test]
fn sibling_margins_collapse_to_the_larger() {
    let (mut tree, html, body) = skeleton();
    let a = el(&mut tree, body, "div", "height: 10px; margin-bottom: 20px");
    let b = el(&mut tree, body, "div", "height: 10px; margin-top: 12px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(200);

    // The 12px top margin collapses into the 20px bottom margin.
    assert_eq!(doc.element_position(a).y, 0);
    assert_eq!(doc.element_position(b).y, 30);
}

#[test]
fn auto_margins_center_a_sized_block() {
    let (mut tree, html, body) = skeleton();
    let d = el(&mut tree, body, "div", "width: 100px; margin: 0 auto");

    let (mut doc, _) = make_document(tree, html);
    doc.render(300);

    let (margins, _, _) = doc.element_box_edges(d);
    assert_eq!(margins.left, 100);
    assert_eq!(margins.right, 100);
}

#[test]
fn two_floats_sit_side_by_side_third_drops() {
    // Two 50px left floats in a 100px container share y=0; the third
    // settles below them.
    let (mut tree, html, body) = skeleton();
    let wrap = el(&mut tree, body, "div", "width: 100px; overflow: hidden");
    let styles = "float: left; width: 50px; height: 10px";
    let f1 = el(&mut tree, wrap, "div", styles);
    let f2 = el(&mut tree, wrap, "div", styles);
    let f3 = el(&mut tree, wrap, "div", styles);

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    assert_eq!(doc.element_position(f1).x, 0);
    assert_eq!(doc.element_position(f1).y, 0);
    assert_eq!(doc.element_position(f2).x, 50);
    assert_eq!(doc.element_position(f2).y, 0);
    assert_eq!(doc.element_position(f3).x, 0);
    assert_eq!(doc.element_position(f3).y, 10);

    // The holder grows to cover its floats.
    assert_eq!(doc.element_position(wrap).height, 20);
}

#[test]
fn floats_never_overlap() {
    // Property: float margin boxes are pairwise disjoint and stay
    // within the containing width.
    let (mut tree, html, body) = skeleton();
    let wrap = el(&mut tree, body, "div", "width: 120px; overflow: hidden");
    let mut floats = Vec::new();
    for (side, w) in [("left", 40), ("right", 50), ("left", 60), ("right", 30)] {
        floats.push(el(
            &mut tree,
            wrap,
            "div",
            &format!("float: {side}; width: {w}px; height: 10px"),
        ));
    }

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    let rects: Vec<_> = floats.iter().map(|&f| doc.element_position(f)).collect();
    for (i, a) in rects.iter().enumerate() {
        assert!(a.x >= 0 && a.x + a.width <= 120, "float {i} escapes: {a:?}");
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            let disjoint = a.x + a.width <= b.x
                || b.x + b.width <= a.x
                || a.y + a.height <= b.y
                || b.y + b.height <= a.y;
            assert!(disjoint, "floats {i} and {j} overlap: {a:?} vs {b:?}");
        }
    }
}

#[test]
fn clear_moves_below_floats() {
    let (mut tree, html, body) = skeleton();
    let wrap = el(&mut tree, body, "div", "width: 100px; overflow: hidden");
    let _f = el(&mut tree, wrap, "div", "float: left; width: 40px; height: 25px");
    let cleared = el(&mut tree, wrap, "div", "clear: left; height: 10px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    assert_eq!(doc.element_position(cleared).y, 25);
}

#[test]
fn text_flows_beside_a_float() {
    let (mut tree, html, body) = skeleton();
    let wrap = el(&mut tree, body, "div", "width: 200px; overflow: hidden; font-size: 10px");
    let _f = el(&mut tree, wrap, "div", "float: left; width: 50px; height: 40px");
    tree.append_text(wrap, "word");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    let text = *doc.tree().children(wrap).last().unwrap();
    assert!(matches!(doc.tree().get(text).kind, NodeKind::Text(_)));
    // The line starts at the float's right edge.
    assert_eq!(doc.element_position(text).x, 50);
}

#[test]
fn inline_block_shrinks_to_fit() {
    let (mut tree, html, body) = skeleton();
    let ib = el(&mut tree, body, "div", "display: inline-block; font-size: 10px");
    tree.append_text(ib, "abc");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    assert_eq!(doc.element_position(ib).width, 3 * CHAR_WIDTH);
}

#[test]
fn text_align_center_shifts_the_line() {
    let (mut tree, html, body) = skeleton();
    let p = el(&mut tree, body, "p", "text-align: center; font-size: 10px");
    tree.append_text(p, "abcd");

    let (mut doc, _) = make_document(tree, html);
    doc.render(100);

    // 100px line, 32px word → centered at 34.
    assert_eq!(doc.element_position(doc.tree().children(p)[0]).x, 34);
}

#[test]
fn relative_position_offsets_after_flow() {
    let (mut tree, html, body) = skeleton();
    let a = el(&mut tree, body, "div", "height: 10px");
    let b = el(
        &mut tree,
        body,
        "div",
        "position: relative; left: 15px; top: 5px; height: 10px",
    );
    let c = el(&mut tree, body, "div", "height: 10px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(200);

    let _ = a;
    assert_eq!(doc.element_position(b).x, 15);
    assert_eq!(doc.element_position(b).y, 15);
    // Relative offsets do not move the following sibling.
    assert_eq!(doc.element_position(c).y, 20);
}

#[test]
fn absolute_offsets_against_positioned_ancestor() {
    let (mut tree, html, body) = skeleton();
    let holder = el(
        &mut tree,
        body,
        "div",
        "position: relative; width: 200px; height: 100px",
    );
    let abs = el(
        &mut tree,
        holder,
        "div",
        "position: absolute; left: 20px; top: 30px; width: 40px; height: 10px",
    );

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    let pos = doc.element_position(abs);
    assert_eq!((pos.x, pos.y), (20, 30));
}

#[test]
fn absolute_both_offsets_stretch() {
    let (mut tree, html, body) = skeleton();
    let holder = el(
        &mut tree,
        body,
        "div",
        "position: relative; width: 200px; height: 100px",
    );
    let abs = el(
        &mut tree,
        holder,
        "div",
        "position: absolute; left: 10px; right: 10px; top: 0",
    );

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    assert_eq!(doc.element_position(abs).width, 180);
}

#[test]
fn list_items_draw_markers_with_indices() {
    let (mut tree, html, body) = skeleton();
    let ol = el(
        &mut tree,
        body,
        "ol",
        "list-style-type: decimal; font-size: 10px; padding-left: 40px",
    );
    for word in ["one", "two"] {
        let li = el(&mut tree, ol, "li", "");
        tree.append_text(li, word);
    }

    let (mut doc, container) = make_document(tree, html);
    doc.render(400);
    doc.draw(0, 0, 0, None);

    // Numeric markers render as text "1." / "2.".
    let texts: Vec<String> = container
        .borrow()
        .calls
        .iter()
        .filter_map(|c| match c {
            common::DrawCall::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert!(texts.contains(&"1.".to_string()), "marker texts: {texts:?}");
    assert!(texts.contains(&"2.".to_string()));
}

#[test]
fn display_none_subtree_is_skipped() {
    let (mut tree, html, body) = skeleton();
    let hidden = el(&mut tree, body, "div", "display: none; height: 50px");
    let shown = el(&mut tree, body, "div", "height: 10px");

    let (mut doc, _) = make_document(tree, html);
    doc.render(200);

    let _ = hidden;
    assert_eq!(doc.element_position(shown).y, 0);
}
