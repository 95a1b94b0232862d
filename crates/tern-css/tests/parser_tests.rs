//! Parser integration tests per [CSS Syntax § 5](https://www.w3.org/TR/css-syntax-3/#parsing).

use tern_css::{parse_declarations_from_text, parse_rules_from_text, CssProperty, Rule, Stylesheet};

#[test]
fn stylesheet_with_two_rules() {
    let rules = parse_rules_from_text("p { color: red } div.x { margin: 0 }");
    assert_eq!(rules.len(), 2);
    let Rule::Qualified(first) = &rules[0] else {
        panic!("expected qualified rule");
    };
    assert_eq!(first.selector_strings(), vec!["p"]);
    assert_eq!(first.declarations.len(), 1);
    assert_eq!(first.declarations[0].name, "color");
    assert_eq!(first.declarations[0].value_text(), "red");
}

#[test]
fn malformed_rule_skipped_to_balanced_block() {
    // The bad rule swallows its own block; the following rule survives.
    let rules = parse_rules_from_text("@#$% { nested { } junk } p { color: red }");
    let qualified: Vec<_> = rules
        .iter()
        .filter(|r| matches!(r, Rule::Qualified(q) if q.selector_strings() == vec!["p"]))
        .collect();
    assert_eq!(qualified.len(), 1);
}

#[test]
fn declaration_without_colon_is_dropped() {
    let decls = parse_declarations_from_text("color red; width: 5px; ; ;");
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].name, "width");
}

#[test]
fn important_with_spaces() {
    let decls = parse_declarations_from_text("color: red ! important");
    assert_eq!(decls.len(), 1);
    assert!(decls[0].important);
    assert_eq!(decls[0].value_text(), "red");
}

#[test]
fn functions_and_blocks_nest() {
    let decls = parse_declarations_from_text("background: url(a.png) rgb(1, 2, 3)");
    assert_eq!(decls[0].value_text(), "url(a.png) rgb(1, 2, 3)");
}

#[test]
fn cdo_cdc_ignored_at_top_level() {
    let rules = parse_rules_from_text("<!-- p { color: red } -->");
    assert_eq!(rules.len(), 1);
}

// Property: for every byte string, parsing terminates and returns a
// stylesheet; no input may panic.
#[test]
fn parser_is_total() {
    let inputs = [
        "",
        "}",
        "{",
        "p {",
        "p } q {",
        "@media (",
        "a { b: url( ; }",
        ":;:;{}{}()[]",
        "p { color: } q { width: 1px }",
        "\u{80}\u{FFFD} { x: y }",
        "p { a: \"unterminated }",
        "@import ;;; @media {}{}",
    ];
    for input in inputs {
        let _ = parse_rules_from_text(input);
        let _ = Stylesheet::parse(input, "", None);
    }
}

#[test]
fn stylesheet_orders_selectors_across_rules() {
    let sheet = Stylesheet::parse("a { color: red } b, c { color: blue } d { color: green }", "", None);
    let orders: Vec<u32> = sheet.selectors.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
}

#[test]
fn url_values_keep_their_baseurl() {
    let sheet = Stylesheet::parse(
        "div { background-image: url(bg.png) }",
        "http://example.com/css/site.css",
        None,
    );
    let style = &sheet.selectors[0].style;
    assert_eq!(
        style
            .get(CssProperty::TernBackgroundImageBaseurl)
            .unwrap()
            .string(),
        "http://example.com/css/site.css"
    );
}
