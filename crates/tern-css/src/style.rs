//! The style store: per-property typed values with shorthand expansion.
//!
//! Shorthands are expanded at declaration-insertion time so the cascade
//! only ever sees longhand values; selector matching stays orthogonal
//! to property syntax. The collision rule implements importance:
//! an incoming declaration replaces an existing one unless the existing
//! value is `!important` and the incoming one is not.

use std::collections::HashMap;

use crate::color::Color;
use crate::keywords::{
    value_index, BACKGROUND_ATTACHMENT_KEYWORDS, BACKGROUND_BOX_KEYWORDS,
    BACKGROUND_REPEAT_KEYWORDS, BORDER_STYLE_KEYWORDS, BORDER_WIDTH_KEYWORDS,
    FONT_SIZE_KEYWORDS, FONT_STYLE_KEYWORDS, FONT_VARIANT_KEYWORDS, FONT_WEIGHT_KEYWORDS,
    LIST_STYLE_POSITION_KEYWORDS, LIST_STYLE_TYPE_KEYWORDS,
};
use crate::parser::parse_declarations_from_text;
use crate::property::CssProperty;
use crate::value::CssValue;
use tern_common::warn_once;

/// Extract the URL from a `url(...)` component string.
///
/// Handles both quoted and unquoted forms; input without the function
/// wrapper is returned trimmed of quotes.
#[must_use]
pub fn parse_css_url(text: &str) -> String {
    let text = text.trim();
    let inner = text
        .strip_prefix("url(")
        .or_else(|| text.strip_prefix("URL("))
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(text);
    inner.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// Split a declaration value on whitespace, keeping `(...)` groups and
/// quoted strings intact.
fn split_value_tokens(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;
    let mut quote: Option<char> = None;

    for c in value.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                c if c.is_whitespace() && depth == 0 => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            },
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// True when a token looks like a border width (length or keyword).
fn is_border_width(token: &str) -> bool {
    if value_index(token, BORDER_WIDTH_KEYWORDS) >= 0 {
        return true;
    }
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+')
}

/// A per-element (or per-rule-block) property → value store.
#[derive(Debug, Clone, Default)]
pub struct Style {
    properties: HashMap<CssProperty, CssValue>,
}

impl Style {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration block (e.g. a `style` attribute) into this
    /// store.
    pub fn parse(&mut self, text: &str, baseurl: &str) {
        for decl in parse_declarations_from_text(text) {
            self.add_declaration(&decl.name, &decl.value_text(), baseurl, decl.important);
        }
    }

    /// Build a store from a declaration block.
    #[must_use]
    pub fn from_text(text: &str, baseurl: &str) -> Self {
        let mut style = Self::new();
        style.parse(text, baseurl);
        style
    }

    /// Add a declaration by property name, expanding shorthands.
    pub fn add_declaration(&mut self, name: &str, value: &str, baseurl: &str, important: bool) {
        match CssProperty::from_name(name) {
            Some(property) => self.add_property(property, value, baseurl, important),
            None => warn_once("css", &format!("unknown property '{name}'")),
        }
    }

    /// Add a declaration for a known property, expanding shorthands.
    pub fn add_property(&mut self, property: CssProperty, value: &str, baseurl: &str, important: bool) {
        let value = value.trim();
        match property {
            // margin/padding: 1-4 values -> top, right, bottom, left.
            CssProperty::Margin => self.expand_trbl(
                value,
                important,
                [
                    CssProperty::MarginTop,
                    CssProperty::MarginRight,
                    CssProperty::MarginBottom,
                    CssProperty::MarginLeft,
                ],
            ),
            CssProperty::Padding => self.expand_trbl(
                value,
                important,
                [
                    CssProperty::PaddingTop,
                    CssProperty::PaddingRight,
                    CssProperty::PaddingBottom,
                    CssProperty::PaddingLeft,
                ],
            ),

            CssProperty::Border => {
                self.expand_border_sides(value, important, &ALL_SIDES);
            }
            CssProperty::BorderTop => self.expand_border_sides(value, important, &[Side::Top]),
            CssProperty::BorderRight => self.expand_border_sides(value, important, &[Side::Right]),
            CssProperty::BorderBottom => {
                self.expand_border_sides(value, important, &[Side::Bottom]);
            }
            CssProperty::BorderLeft => self.expand_border_sides(value, important, &[Side::Left]),

            CssProperty::BorderWidth => self.expand_trbl(
                value,
                important,
                [
                    CssProperty::BorderTopWidth,
                    CssProperty::BorderRightWidth,
                    CssProperty::BorderBottomWidth,
                    CssProperty::BorderLeftWidth,
                ],
            ),
            CssProperty::BorderStyle => self.expand_trbl(
                value,
                important,
                [
                    CssProperty::BorderTopStyle,
                    CssProperty::BorderRightStyle,
                    CssProperty::BorderBottomStyle,
                    CssProperty::BorderLeftStyle,
                ],
            ),
            CssProperty::BorderColor => self.expand_trbl(
                value,
                important,
                [
                    CssProperty::BorderTopColor,
                    CssProperty::BorderRightColor,
                    CssProperty::BorderBottomColor,
                    CssProperty::BorderLeftColor,
                ],
            ),

            CssProperty::BorderRadius => self.expand_border_radius(value, important),
            CssProperty::TernBorderRadiusX => self.expand_radius_axis(value, important, Axis::X),
            CssProperty::TernBorderRadiusY => self.expand_radius_axis(value, important, Axis::Y),
            CssProperty::BorderTopLeftRadius => self.expand_corner_radius(
                value,
                important,
                CssProperty::TernBorderTopLeftRadiusX,
                CssProperty::TernBorderTopLeftRadiusY,
            ),
            CssProperty::BorderTopRightRadius => self.expand_corner_radius(
                value,
                important,
                CssProperty::TernBorderTopRightRadiusX,
                CssProperty::TernBorderTopRightRadiusY,
            ),
            CssProperty::BorderBottomRightRadius => self.expand_corner_radius(
                value,
                important,
                CssProperty::TernBorderBottomRightRadiusX,
                CssProperty::TernBorderBottomRightRadiusY,
            ),
            CssProperty::BorderBottomLeftRadius => self.expand_corner_radius(
                value,
                important,
                CssProperty::TernBorderBottomLeftRadiusX,
                CssProperty::TernBorderBottomLeftRadiusY,
            ),

            CssProperty::Background => self.expand_background(value, baseurl, important),
            CssProperty::BackgroundImage => {
                self.add_parsed(CssProperty::BackgroundImage, value, important);
                if !baseurl.is_empty() {
                    self.add_parsed(CssProperty::TernBackgroundImageBaseurl, baseurl, important);
                }
            }

            CssProperty::Font => self.expand_font(value, important),

            CssProperty::ListStyle => self.expand_list_style(value, baseurl, important),
            CssProperty::ListStyleImage => {
                self.add_parsed(CssProperty::ListStyleImage, value, important);
                if !baseurl.is_empty() {
                    self.add_parsed(CssProperty::TernListStyleImageBaseurl, baseurl, important);
                }
            }

            CssProperty::BorderSpacing => {
                let tokens = split_value_tokens(value);
                match tokens.len() {
                    1 => {
                        self.add_parsed(CssProperty::TernBorderSpacingX, &tokens[0], important);
                        self.add_parsed(CssProperty::TernBorderSpacingY, &tokens[0], important);
                    }
                    2 => {
                        self.add_parsed(CssProperty::TernBorderSpacingX, &tokens[0], important);
                        self.add_parsed(CssProperty::TernBorderSpacingY, &tokens[1], important);
                    }
                    _ => {}
                }
            }

            _ => self.add_parsed(property, value, important),
        }
    }

    /// Insert a longhand value, honouring the importance collision rule.
    ///
    /// "important" overrides "non-important" regardless of where the
    /// declarations came from; at equal importance the last write wins.
    pub fn add_parsed(&mut self, property: CssProperty, value: &str, important: bool) {
        let incoming = CssValue::factory(property, value, important);
        match self.properties.get(&property) {
            Some(existing) if existing.important && !important => {}
            _ => {
                self.properties.insert(property, incoming);
            }
        }
    }

    /// Merge another style block into this one (cascade step).
    pub fn combine(&mut self, other: &Style) {
        let mut entries: Vec<(&CssProperty, &CssValue)> = other.properties.iter().collect();
        // Deterministic merge order; within one block the property map
        // already holds the block's final value per property.
        entries.sort_by_key(|(p, _)| **p);
        for (property, value) in entries {
            let incoming = value.clone();
            match self.properties.get(property) {
                Some(existing) if existing.important && !incoming.important => {}
                _ => {
                    self.properties.insert(*property, incoming);
                }
            }
        }
    }

    /// Look up a stored value.
    #[must_use]
    pub fn get(&self, property: CssProperty) -> Option<&CssValue> {
        self.properties.get(&property)
    }

    /// Number of stored longhand values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Remove everything (used when styles are refreshed).
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    // ── shorthand expansion ────────────────────────────────────────────

    /// The CSS TRBL rule: 1-4 values fan out to top/right/bottom/left.
    fn expand_trbl(&mut self, value: &str, important: bool, props: [CssProperty; 4]) {
        let tokens = split_value_tokens(value);
        let [top, right, bottom, left] = props;
        match tokens.len() {
            1 => {
                for p in props {
                    self.add_parsed(p, &tokens[0], important);
                }
            }
            2 => {
                self.add_parsed(top, &tokens[0], important);
                self.add_parsed(bottom, &tokens[0], important);
                self.add_parsed(right, &tokens[1], important);
                self.add_parsed(left, &tokens[1], important);
            }
            3 => {
                self.add_parsed(top, &tokens[0], important);
                self.add_parsed(right, &tokens[1], important);
                self.add_parsed(left, &tokens[1], important);
                self.add_parsed(bottom, &tokens[2], important);
            }
            4 => {
                self.add_parsed(top, &tokens[0], important);
                self.add_parsed(right, &tokens[1], important);
                self.add_parsed(bottom, &tokens[2], important);
                self.add_parsed(left, &tokens[3], important);
            }
            _ => {}
        }
    }

    /// `border[-side]: width || style || color`, order-free, each part
    /// optional.
    fn expand_border_sides(&mut self, value: &str, important: bool, sides: &[Side]) {
        let tokens = split_value_tokens(value);
        for token in &tokens {
            if value_index(token, BORDER_STYLE_KEYWORDS) >= 0 {
                for side in sides {
                    self.add_parsed(side.style_property(), token, important);
                }
            } else if is_border_width(token) {
                for side in sides {
                    self.add_parsed(side.width_property(), token, important);
                }
            } else if Color::parse(token).is_some() || token.eq_ignore_ascii_case("currentcolor") {
                for side in sides {
                    self.add_parsed(side.color_property(), token, important);
                }
            }
        }
    }

    /// `border-radius: x1 [x2 [x3 [x4]]] [/ y1 ...]`.
    fn expand_border_radius(&mut self, value: &str, important: bool) {
        let mut parts = value.splitn(2, '/');
        let x = parts.next().unwrap_or("").trim().to_string();
        let y = parts.next().map(|s| s.trim().to_string());
        if !x.is_empty() {
            self.expand_radius_axis(&x, important, Axis::X);
            self.expand_radius_axis(y.as_deref().unwrap_or(&x), important, Axis::Y);
        }
    }

    /// One axis of the radius shorthand across the four corners.
    fn expand_radius_axis(&mut self, value: &str, important: bool, axis: Axis) {
        let tokens = split_value_tokens(value);
        let corners = axis.corner_properties();
        let [tl, tr, br, bl] = corners;
        match tokens.len() {
            1 => {
                for p in corners {
                    self.add_parsed(p, &tokens[0], important);
                }
            }
            2 => {
                self.add_parsed(tl, &tokens[0], important);
                self.add_parsed(br, &tokens[0], important);
                self.add_parsed(tr, &tokens[1], important);
                self.add_parsed(bl, &tokens[1], important);
            }
            3 => {
                self.add_parsed(tl, &tokens[0], important);
                self.add_parsed(tr, &tokens[1], important);
                self.add_parsed(bl, &tokens[1], important);
                self.add_parsed(br, &tokens[2], important);
            }
            4 => {
                self.add_parsed(tl, &tokens[0], important);
                self.add_parsed(tr, &tokens[1], important);
                self.add_parsed(br, &tokens[2], important);
                self.add_parsed(bl, &tokens[3], important);
            }
            _ => {}
        }
    }

    /// `border-<corner>-radius: x [y]`.
    fn expand_corner_radius(
        &mut self,
        value: &str,
        important: bool,
        x_prop: CssProperty,
        y_prop: CssProperty,
    ) {
        let tokens = split_value_tokens(value);
        match tokens.len() {
            1 => {
                self.add_parsed(x_prop, &tokens[0], important);
                self.add_parsed(y_prop, &tokens[0], important);
            }
            2 => {
                self.add_parsed(x_prop, &tokens[0], important);
                self.add_parsed(y_prop, &tokens[1], important);
            }
            _ => {}
        }
    }

    /// `background: color || url() || repeat || attachment || origin
    /// clip || position`. All longhands reset to their defaults first.
    fn expand_background(&mut self, value: &str, baseurl: &str, important: bool) {
        self.add_parsed(CssProperty::BackgroundColor, "transparent", important);
        self.add_parsed(CssProperty::BackgroundImage, "", important);
        self.add_parsed(CssProperty::TernBackgroundImageBaseurl, "", important);
        self.add_parsed(CssProperty::BackgroundRepeat, "repeat", important);
        self.add_parsed(CssProperty::BackgroundOrigin, "padding-box", important);
        self.add_parsed(CssProperty::BackgroundClip, "border-box", important);
        self.add_parsed(CssProperty::BackgroundAttachment, "scroll", important);
        self.add_parsed(CssProperty::BackgroundPosition, "0% 0%", important);

        if value.eq_ignore_ascii_case("none") {
            return;
        }

        let mut position_tokens: Vec<String> = Vec::new();
        let mut origin_seen = false;

        for token in split_value_tokens(value) {
            let lower = token.to_ascii_lowercase();
            if lower.starts_with("url(") {
                self.add_parsed(CssProperty::BackgroundImage, &token, important);
                if !baseurl.is_empty() {
                    self.add_parsed(CssProperty::TernBackgroundImageBaseurl, baseurl, important);
                }
            } else if value_index(&lower, BACKGROUND_REPEAT_KEYWORDS) >= 0 {
                self.add_parsed(CssProperty::BackgroundRepeat, &lower, important);
            } else if value_index(&lower, BACKGROUND_ATTACHMENT_KEYWORDS) >= 0 {
                self.add_parsed(CssProperty::BackgroundAttachment, &lower, important);
            } else if value_index(&lower, BACKGROUND_BOX_KEYWORDS) >= 0 {
                if origin_seen {
                    self.add_parsed(CssProperty::BackgroundClip, &lower, important);
                } else {
                    self.add_parsed(CssProperty::BackgroundOrigin, &lower, important);
                    origin_seen = true;
                }
            } else if Color::parse(&lower).is_some() {
                self.add_parsed(CssProperty::BackgroundColor, &lower, important);
            } else if is_position_token(&lower) {
                position_tokens.push(lower);
            }
        }

        if !position_tokens.is_empty() {
            let position = position_tokens.join(" ");
            self.add_parsed(CssProperty::BackgroundPosition, &position, important);
        }
    }

    /// `font: style || variant || weight || size[/line-height] family`.
    fn expand_font(&mut self, value: &str, important: bool) {
        self.add_parsed(CssProperty::FontStyle, "normal", important);
        self.add_parsed(CssProperty::FontVariant, "normal", important);
        self.add_parsed(CssProperty::FontWeight, "normal", important);
        self.add_parsed(CssProperty::FontSize, "medium", important);
        self.add_parsed(CssProperty::LineHeight, "normal", important);

        let tokens = split_value_tokens(value);
        let mut family_from = None;

        for (i, token) in tokens.iter().enumerate() {
            let lower = token.to_ascii_lowercase();
            if lower == "normal" {
                continue;
            }
            if value_index(&lower, FONT_STYLE_KEYWORDS) > 0 {
                self.add_parsed(CssProperty::FontStyle, &lower, important);
            } else if value_index(&lower, FONT_VARIANT_KEYWORDS) > 0 {
                self.add_parsed(CssProperty::FontVariant, &lower, important);
            } else if value_index(&lower, FONT_WEIGHT_KEYWORDS) >= 0
                || lower.parse::<u32>().map(|w| (100..=900).contains(&w)) == Ok(true)
            {
                self.add_parsed(CssProperty::FontWeight, &lower, important);
            } else if is_font_size_token(&lower) {
                // size, optionally with "/line-height" attached.
                match lower.split_once('/') {
                    Some((size, lh)) => {
                        self.add_parsed(CssProperty::FontSize, size, important);
                        self.add_parsed(CssProperty::LineHeight, lh, important);
                    }
                    None => self.add_parsed(CssProperty::FontSize, &lower, important),
                }
                family_from = Some(i + 1);
                break;
            }
        }

        if let Some(from) = family_from {
            if from < tokens.len() {
                let family = tokens[from..].join(" ");
                self.add_parsed(CssProperty::FontFamily, &family, important);
            }
        }
    }

    /// `list-style: type || position || image`.
    fn expand_list_style(&mut self, value: &str, baseurl: &str, important: bool) {
        self.add_parsed(CssProperty::ListStyleType, "disc", important);
        self.add_parsed(CssProperty::ListStylePosition, "outside", important);
        self.add_parsed(CssProperty::ListStyleImage, "", important);
        self.add_parsed(CssProperty::TernListStyleImageBaseurl, "", important);

        for token in split_value_tokens(value) {
            let lower = token.to_ascii_lowercase();
            if value_index(&lower, LIST_STYLE_TYPE_KEYWORDS) >= 0 {
                self.add_parsed(CssProperty::ListStyleType, &lower, important);
            } else if value_index(&lower, LIST_STYLE_POSITION_KEYWORDS) >= 0 {
                self.add_parsed(CssProperty::ListStylePosition, &lower, important);
            } else if lower.starts_with("url(") {
                self.add_parsed(CssProperty::ListStyleImage, &token, important);
                if !baseurl.is_empty() {
                    self.add_parsed(CssProperty::TernListStyleImageBaseurl, baseurl, important);
                }
            }
        }
    }
}

/// Position keywords plus anything that parses as a length/percentage.
fn is_position_token(token: &str) -> bool {
    matches!(token, "left" | "right" | "center" | "top" | "bottom")
        || token
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+')
}

/// Font-size keywords plus lengths/percentages (with optional
/// `/line-height` suffix).
fn is_font_size_token(token: &str) -> bool {
    let size = token.split('/').next().unwrap_or(token);
    value_index(size, FONT_SIZE_KEYWORDS) >= 0
        || size
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
}

/// A box side; maps to the side-specific border longhands.
#[derive(Debug, Clone, Copy)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

const ALL_SIDES: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

impl Side {
    fn width_property(self) -> CssProperty {
        match self {
            Side::Top => CssProperty::BorderTopWidth,
            Side::Right => CssProperty::BorderRightWidth,
            Side::Bottom => CssProperty::BorderBottomWidth,
            Side::Left => CssProperty::BorderLeftWidth,
        }
    }

    fn style_property(self) -> CssProperty {
        match self {
            Side::Top => CssProperty::BorderTopStyle,
            Side::Right => CssProperty::BorderRightStyle,
            Side::Bottom => CssProperty::BorderBottomStyle,
            Side::Left => CssProperty::BorderLeftStyle,
        }
    }

    fn color_property(self) -> CssProperty {
        match self {
            Side::Top => CssProperty::BorderTopColor,
            Side::Right => CssProperty::BorderRightColor,
            Side::Bottom => CssProperty::BorderBottomColor,
            Side::Left => CssProperty::BorderLeftColor,
        }
    }
}

/// A radius axis; maps to the per-corner internal longhands.
#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn corner_properties(self) -> [CssProperty; 4] {
        match self {
            Axis::X => [
                CssProperty::TernBorderTopLeftRadiusX,
                CssProperty::TernBorderTopRightRadiusX,
                CssProperty::TernBorderBottomRightRadiusX,
                CssProperty::TernBorderBottomLeftRadiusX,
            ],
            Axis::Y => [
                CssProperty::TernBorderTopLeftRadiusY,
                CssProperty::TernBorderTopRightRadiusY,
                CssProperty::TernBorderBottomRightRadiusY,
                CssProperty::TernBorderBottomLeftRadiusY,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_shorthand_two_values() {
        // `body{margin:5px 10px}` expands per the TRBL rule.
        let style = Style::from_text("margin: 5px 10px", "");
        assert_eq!(style.get(CssProperty::MarginTop).unwrap().raw, "5px");
        assert_eq!(style.get(CssProperty::MarginRight).unwrap().raw, "10px");
        assert_eq!(style.get(CssProperty::MarginBottom).unwrap().raw, "5px");
        assert_eq!(style.get(CssProperty::MarginLeft).unwrap().raw, "10px");
    }

    #[test]
    fn border_shorthand_fans_out() {
        let style = Style::from_text("border: 1px solid #ddd", "");
        assert_eq!(style.get(CssProperty::BorderTopWidth).unwrap().raw, "1px");
        assert_eq!(style.get(CssProperty::BorderLeftStyle).unwrap().raw, "solid");
        assert_eq!(
            style.get(CssProperty::BorderBottomColor).unwrap().color(),
            Color::rgb(0xdd, 0xdd, 0xdd)
        );
    }

    #[test]
    fn background_shorthand() {
        let style = Style::from_text(
            "background: red url(bg.png) no-repeat 0% 0%",
            "http://example.com/style.css",
        );
        assert_eq!(
            style.get(CssProperty::BackgroundColor).unwrap().color(),
            Color::rgb(255, 0, 0)
        );
        assert_eq!(
            parse_css_url(style.get(CssProperty::BackgroundImage).unwrap().string()),
            "bg.png"
        );
        assert_eq!(
            style.get(CssProperty::TernBackgroundImageBaseurl).unwrap().string(),
            "http://example.com/style.css"
        );
        assert_eq!(
            style.get(CssProperty::BackgroundRepeat).unwrap().raw,
            "no-repeat"
        );
        assert_eq!(
            style.get(CssProperty::BackgroundPosition).unwrap().raw,
            "0% 0%"
        );
    }

    #[test]
    fn font_shorthand() {
        let style = Style::from_text("font: italic bold 12px/1.5 Arial sans-serif", "");
        assert_eq!(style.get(CssProperty::FontStyle).unwrap().raw, "italic");
        assert_eq!(style.get(CssProperty::FontWeight).unwrap().raw, "bold");
        assert_eq!(style.get(CssProperty::FontSize).unwrap().raw, "12px");
        assert_eq!(style.get(CssProperty::LineHeight).unwrap().raw, "1.5");
        assert_eq!(
            style.get(CssProperty::FontFamily).unwrap().raw,
            "Arial sans-serif"
        );
    }

    #[test]
    fn important_beats_later_normal() {
        let mut style = Style::new();
        style.add_declaration("color", "red", "", true);
        style.add_declaration("color", "blue", "", false);
        assert_eq!(style.get(CssProperty::Color).unwrap().raw, "red");

        style.add_declaration("color", "green", "", true);
        assert_eq!(style.get(CssProperty::Color).unwrap().raw, "green");
    }

    #[test]
    fn border_spacing_expands_to_axes() {
        let style = Style::from_text("border-spacing: 2px 4px", "");
        assert_eq!(style.get(CssProperty::TernBorderSpacingX).unwrap().raw, "2px");
        assert_eq!(style.get(CssProperty::TernBorderSpacingY).unwrap().raw, "4px");
    }

    #[test]
    fn list_style_shorthand() {
        let style = Style::from_text("list-style: square inside", "");
        assert_eq!(style.get(CssProperty::ListStyleType).unwrap().raw, "square");
        assert_eq!(
            style.get(CssProperty::ListStylePosition).unwrap().raw,
            "inside"
        );
    }
}
