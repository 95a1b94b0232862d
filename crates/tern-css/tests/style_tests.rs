//! Style store and shorthand expansion tests.

use tern_css::keywords::{BackgroundRepeat, Display, ListStyleType};
use tern_css::{Color, CssProperty, CssUnit, Style};

#[test]
fn longhand_color_and_length() {
    let style = Style::from_text("color: #2563eb; width: 120px", "");
    assert_eq!(
        style.get(CssProperty::Color).unwrap().color(),
        Color::rgb(0x25, 0x63, 0xeb)
    );
    let width = style.get(CssProperty::Width).unwrap().length();
    assert_eq!(width.val(), 120.0);
    assert_eq!(width.units(), CssUnit::Px);
}

#[test]
fn keyword_values_store_table_indices() {
    let style = Style::from_text("display: table-cell; background-repeat: no-repeat", "");
    assert_eq!(
        Display::from_index(style.get(CssProperty::Display).unwrap().keyword()),
        Display::TableCell
    );
    assert_eq!(
        BackgroundRepeat::from_index(
            style.get(CssProperty::BackgroundRepeat).unwrap().keyword()
        ),
        BackgroundRepeat::NoRepeat
    );
}

#[test]
fn margin_trbl_rules() {
    for (text, expected) in [
        ("margin: 1px", ["1px", "1px", "1px", "1px"]),
        ("margin: 1px 2px", ["1px", "2px", "1px", "2px"]),
        ("margin: 1px 2px 3px", ["1px", "2px", "3px", "2px"]),
        ("margin: 1px 2px 3px 4px", ["1px", "2px", "3px", "4px"]),
    ] {
        let style = Style::from_text(text, "");
        let got = [
            style.get(CssProperty::MarginTop).unwrap().raw.clone(),
            style.get(CssProperty::MarginRight).unwrap().raw.clone(),
            style.get(CssProperty::MarginBottom).unwrap().raw.clone(),
            style.get(CssProperty::MarginLeft).unwrap().raw.clone(),
        ];
        assert_eq!(got, expected, "for {text:?}");
    }
}

#[test]
fn border_side_shorthand() {
    let style = Style::from_text("border-left: 2px dashed blue", "");
    assert_eq!(style.get(CssProperty::BorderLeftWidth).unwrap().raw, "2px");
    assert_eq!(style.get(CssProperty::BorderLeftStyle).unwrap().raw, "dashed");
    assert_eq!(
        style.get(CssProperty::BorderLeftColor).unwrap().color(),
        Color::rgb(0, 0, 255)
    );
    // Other sides stay untouched.
    assert!(style.get(CssProperty::BorderTopWidth).is_none());
}

#[test]
fn border_radius_corners() {
    let style = Style::from_text("border-radius: 1px 2px / 3px", "");
    assert_eq!(
        style.get(CssProperty::TernBorderTopLeftRadiusX).unwrap().raw,
        "1px"
    );
    assert_eq!(
        style.get(CssProperty::TernBorderTopRightRadiusX).unwrap().raw,
        "2px"
    );
    assert_eq!(
        style.get(CssProperty::TernBorderBottomRightRadiusX).unwrap().raw,
        "1px"
    );
    assert_eq!(
        style.get(CssProperty::TernBorderTopLeftRadiusY).unwrap().raw,
        "3px"
    );
}

#[test]
fn background_shorthand_resets_then_sets() {
    // First declaration sets a color; the shorthand must reset it.
    let mut style = Style::from_text("background-color: red", "");
    style.parse("background: url(x.png) no-repeat", "");
    assert!(style.get(CssProperty::BackgroundColor).unwrap().color().is_transparent());
    assert_eq!(
        tern_css::parse_css_url(style.get(CssProperty::BackgroundImage).unwrap().string()),
        "x.png"
    );
}

#[test]
fn background_position_tokens() {
    let style = Style::from_text("background: blue no-repeat 0% 0%", "");
    assert_eq!(style.get(CssProperty::BackgroundPosition).unwrap().raw, "0% 0%");

    let style = Style::from_text("background: blue center", "");
    assert_eq!(style.get(CssProperty::BackgroundPosition).unwrap().raw, "center");
}

#[test]
fn list_style_type_values() {
    let style = Style::from_text("list-style-type: lower-roman", "");
    assert_eq!(
        ListStyleType::from_index(style.get(CssProperty::ListStyleType).unwrap().keyword()),
        ListStyleType::LowerRoman
    );
}

#[test]
fn combine_respects_importance() {
    let mut base = Style::from_text("color: red !important; width: 1px", "");
    let over = Style::from_text("color: blue; width: 2px", "");
    base.combine(&over);
    assert_eq!(base.get(CssProperty::Color).unwrap().raw, "red");
    assert_eq!(base.get(CssProperty::Width).unwrap().raw, "2px");

    let important_over = Style::from_text("color: green !important", "");
    base.combine(&important_over);
    assert_eq!(base.get(CssProperty::Color).unwrap().raw, "green");
}

#[test]
fn unknown_property_is_ignored() {
    let style = Style::from_text("frobnicate: 12px; color: red", "");
    assert_eq!(style.len(), 1);
    assert!(style.get(CssProperty::Color).is_some());
}

#[test]
fn inherit_is_preserved_on_raw_value() {
    let style = Style::from_text("color: inherit", "");
    assert!(style.get(CssProperty::Color).unwrap().is_inherit());
}
