//! Table layout tests: grid building, column widths, spans, spacing.

mod common;

use common::{el, make_document, skeleton};

fn cell(tree: &mut tern_dom::Tree, row: tern_dom::NodeId, style: &str, text: &str) -> tern_dom::NodeId {
    let td = el(tree, row, "td", style);
    if !text.is_empty() {
        tree.append_text(td, text);
    }
    td
}

#[test]
fn fixed_width_columns_position_cells() {
    let (mut tree, html, body) = skeleton();
    let table = el(&mut tree, body, "table", "");
    let r1 = el(&mut tree, table, "tr", "");
    let a = cell(&mut tree, r1, "width: 30px; height: 10px", "");
    let b = cell(&mut tree, r1, "width: 50px; height: 10px", "");
    let r2 = el(&mut tree, table, "tr", "");
    let c = cell(&mut tree, r2, "width: 30px; height: 10px", "");
    let d = cell(&mut tree, r2, "width: 50px; height: 10px", "");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    // Cells are positioned relative to their row.
    assert_eq!(doc.element_position(a).x, 0);
    assert_eq!(doc.element_position(b).x, 30);
    assert_eq!(doc.element_position(c).x, 0);
    assert_eq!(doc.element_position(d).x, 30);

    // Rows stack relative to the table.
    assert_eq!(doc.element_position(r1).y, 0);
    assert_eq!(doc.element_position(r2).y, 10);

    // The table shrinks to the column sum.
    assert_eq!(doc.element_position(table).width, 80);
    assert_eq!(doc.element_position(table).height, 20);
}

#[test]
fn auto_table_sizes_columns_from_content() {
    let (mut tree, html, body) = skeleton();
    let table = el(&mut tree, body, "table", "font-size: 10px");
    let r = el(&mut tree, table, "tr", "");
    let short = cell(&mut tree, r, "", "ab");
    let long = cell(&mut tree, r, "", "abcdef");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    // 8px per glyph: 16 and 48.
    assert_eq!(doc.element_position(short).width, 16);
    assert_eq!(doc.element_position(long).width, 48);
    assert_eq!(doc.element_position(table).width, 64);
}

#[test]
fn declared_table_width_distributes_extra_space() {
    let (mut tree, html, body) = skeleton();
    let table = el(&mut tree, body, "table", "width: 100px");
    let r = el(&mut tree, table, "tr", "");
    let a = cell(&mut tree, r, "height: 10px", "");
    let b = cell(&mut tree, r, "height: 10px", "");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    assert_eq!(doc.element_position(table).width, 100);
    let wa = doc.element_position(a).width;
    let wb = doc.element_position(b).width;
    assert_eq!(wa + wb, 100);
}

#[test]
fn colspan_cells_span_their_columns() {
    let (mut tree, html, body) = skeleton();
    let table = el(&mut tree, body, "table", "");
    let r1 = el(&mut tree, table, "tr", "");
    let wide = cell(&mut tree, r1, "height: 10px", "");
    tree.set_attr(wide, "colspan", "2");
    let r2 = el(&mut tree, table, "tr", "");
    let a = cell(&mut tree, r2, "width: 30px; height: 10px", "");
    let b = cell(&mut tree, r2, "width: 40px; height: 10px", "");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    let _ = (a, b);
    assert_eq!(doc.element_position(wide).width, 70);
}

#[test]
fn rowspan_grows_the_last_spanned_row() {
    let (mut tree, html, body) = skeleton();
    let table = el(&mut tree, body, "table", "");
    let r1 = el(&mut tree, table, "tr", "");
    let tall = cell(&mut tree, r1, "width: 20px; height: 50px", "");
    tree.set_attr(tall, "rowspan", "2");
    let _short1 = cell(&mut tree, r1, "width: 20px; height: 10px", "");
    let r2 = el(&mut tree, table, "tr", "");
    let short2 = cell(&mut tree, r2, "width: 20px; height: 10px", "");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    // Row 1 keeps its 10px; row 2 grows to cover the 50px span.
    assert_eq!(doc.element_position(r1).height, 10);
    assert_eq!(doc.element_position(r2).height, 40);
    // The second-row cell lands in the second column.
    assert_eq!(doc.element_position(short2).x, 20);
}

#[test]
fn border_spacing_separates_cells() {
    let (mut tree, html, body) = skeleton();
    let table = el(&mut tree, body, "table", "border-spacing: 4px");
    let r = el(&mut tree, table, "tr", "");
    let a = cell(&mut tree, r, "width: 20px; height: 10px", "");
    let b = cell(&mut tree, r, "width: 20px; height: 10px", "");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    // The row starts after the leading gap; cells are row-relative.
    assert_eq!(doc.element_position(r).y, 4);
    assert_eq!(doc.element_position(r).x, 4);
    assert_eq!(doc.element_position(a).x, 0);
    assert_eq!(doc.element_position(b).x, 24);
    // 3 gaps of 4px + 2 × 20px columns.
    assert_eq!(doc.element_position(table).width, 52);
}

#[test]
fn row_groups_are_transparent() {
    let (mut tree, html, body) = skeleton();
    let table = el(&mut tree, body, "table", "");
    let tbody = el(&mut tree, table, "tbody", "");
    let r = el(&mut tree, tbody, "tr", "");
    let a = cell(&mut tree, r, "width: 25px; height: 10px", "");

    let (mut doc, _) = make_document(tree, html);
    doc.render(400);

    assert_eq!(doc.element_position(a).x, 0);
    assert_eq!(doc.element_position(table).width, 25);
}

#[test]
fn caption_sits_above_the_grid() {
    let (mut tree, html, body) = skeleton();
    let table = el(&mut tree, body, "table", "font-size: 10px");
    let caption = el(&mut tree, table, "caption", "");
    tree.append_text(caption, "cap");
    let r = el(&mut tree, table, "tr", "");
    let _a = cell(&mut tree, r, "width: 50px; height: 10px", "");

    // The test master has no `caption` rule; make it a block.
    let mut master = common::TEST_MASTER.to_string();
    master.push_str("caption { display: table-caption; }");
    let (mut doc, _) = common::make_document_with_master(tree, html, &master);
    doc.render(400);

    assert_eq!(doc.element_position(caption).y, 0);
    assert_eq!(doc.element_position(r).y, 10);
}
