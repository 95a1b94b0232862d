//! The CSS property enumeration and its metadata table.
//!
//! Every property the engine understands is described once, in the
//! [`css_properties!`] invocation below: canonical name, value type,
//! inherited flag, default value string and keyword table. Everything
//! else — name lookup, default typed values, cascade inheritance —
//! derives from this single table.
//!
//! Properties prefixed `Tern` are internal longhands produced by
//! shorthand expansion (`border-spacing` → X/Y, `background-image`
//! base URL tracking); they are never matched against author text.

use crate::keywords::{
    AUTO_KEYWORDS, BACKGROUND_ATTACHMENT_KEYWORDS, BACKGROUND_BOX_KEYWORDS,
    BACKGROUND_REPEAT_KEYWORDS, BORDER_COLLAPSE_KEYWORDS, BORDER_STYLE_KEYWORDS,
    BORDER_WIDTH_KEYWORDS, BOX_SIZING_KEYWORDS, CLEAR_KEYWORDS, DISPLAY_KEYWORDS,
    FLOAT_KEYWORDS, FONT_SIZE_KEYWORDS, FONT_STYLE_KEYWORDS, FONT_VARIANT_KEYWORDS,
    LIST_STYLE_POSITION_KEYWORDS, LIST_STYLE_TYPE_KEYWORDS, NONE_KEYWORDS, NORMAL_KEYWORDS,
    OVERFLOW_KEYWORDS, POSITION_KEYWORDS, TEXT_ALIGN_KEYWORDS, TEXT_TRANSFORM_KEYWORDS,
    VERTICAL_ALIGN_KEYWORDS, VISIBILITY_KEYWORDS, WHITE_SPACE_KEYWORDS,
};

/// How a property's value is represented in the style store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Free-form string (font-family, text-decoration, URLs, ...).
    String,
    /// An RGBA color.
    Color,
    /// An index into the property's keyword table.
    Keyword,
    /// A [`crate::CssLength`], possibly a predefined keyword.
    Length,
}

/// Static metadata for one property.
#[derive(Debug, Clone, Copy)]
pub struct PropertyMeta {
    /// Canonical lower-case property name.
    pub name: &'static str,
    /// Default (initial) value string; empty when unspecified.
    pub default: &'static str,
    /// Whether the property inherits when undeclared.
    pub inherited: bool,
    /// Value representation in the store.
    pub value_type: ValueType,
    /// Keyword table (enumerated values or length predefineds).
    pub keywords: &'static [&'static str],
}

macro_rules! css_properties {
    (
        $(
            $variant:ident => $name:literal, $vt:ident, inherited: $inh:literal,
            default: $default:literal, keywords: $kw:expr;
        )+
    ) => {
        /// A CSS property the engine understands.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[allow(missing_docs)]
        pub enum CssProperty {
            $($variant,)+
        }

        impl CssProperty {
            /// All properties, in declaration-table order.
            pub const ALL: &'static [CssProperty] = &[$(CssProperty::$variant,)+];

            /// Look a property up by its canonical (lower-case) name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(CssProperty::$variant),)+
                    _ => None,
                }
            }

            /// The property's metadata row.
            #[must_use]
            pub fn meta(self) -> PropertyMeta {
                match self {
                    $(
                        CssProperty::$variant => PropertyMeta {
                            name: $name,
                            default: $default,
                            inherited: $inh,
                            value_type: ValueType::$vt,
                            keywords: $kw,
                        },
                    )+
                }
            }

            /// Canonical property name.
            #[must_use]
            pub fn name(self) -> &'static str {
                self.meta().name
            }

            /// Whether the property inherits when undeclared.
            #[must_use]
            pub fn inherited(self) -> bool {
                self.meta().inherited
            }
        }
    };
}

const NO_KEYWORDS: &[&str] = &[];

css_properties! {
    // Background
    Background => "background", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BackgroundAttachment => "background-attachment", Keyword, inherited: false, default: "scroll", keywords: BACKGROUND_ATTACHMENT_KEYWORDS;
    BackgroundClip => "background-clip", Keyword, inherited: false, default: "border-box", keywords: BACKGROUND_BOX_KEYWORDS;
    BackgroundColor => "background-color", Color, inherited: false, default: "transparent", keywords: NO_KEYWORDS;
    BackgroundImage => "background-image", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    TernBackgroundImageBaseurl => "-tern-background-image-baseurl", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BackgroundOrigin => "background-origin", Keyword, inherited: false, default: "padding-box", keywords: BACKGROUND_BOX_KEYWORDS;
    BackgroundPosition => "background-position", String, inherited: false, default: "0% 0%", keywords: NO_KEYWORDS;
    BackgroundRepeat => "background-repeat", Keyword, inherited: false, default: "repeat", keywords: BACKGROUND_REPEAT_KEYWORDS;
    BackgroundSize => "background-size", String, inherited: false, default: "auto", keywords: NO_KEYWORDS;

    // Borders
    Border => "border", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BorderBottom => "border-bottom", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BorderBottomColor => "border-bottom-color", Color, inherited: false, default: "currentcolor", keywords: NO_KEYWORDS;
    BorderBottomLeftRadius => "border-bottom-left-radius", String, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderBottomLeftRadiusX => "-tern-border-bottom-left-radius-x", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderBottomLeftRadiusY => "-tern-border-bottom-left-radius-y", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    BorderBottomRightRadius => "border-bottom-right-radius", String, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderBottomRightRadiusX => "-tern-border-bottom-right-radius-x", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderBottomRightRadiusY => "-tern-border-bottom-right-radius-y", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    BorderBottomStyle => "border-bottom-style", Keyword, inherited: false, default: "none", keywords: BORDER_STYLE_KEYWORDS;
    BorderBottomWidth => "border-bottom-width", Length, inherited: false, default: "medium", keywords: BORDER_WIDTH_KEYWORDS;
    BorderCollapse => "border-collapse", Keyword, inherited: true, default: "separate", keywords: BORDER_COLLAPSE_KEYWORDS;
    BorderColor => "border-color", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BorderLeft => "border-left", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BorderLeftColor => "border-left-color", Color, inherited: false, default: "currentcolor", keywords: NO_KEYWORDS;
    BorderLeftStyle => "border-left-style", Keyword, inherited: false, default: "none", keywords: BORDER_STYLE_KEYWORDS;
    BorderLeftWidth => "border-left-width", Length, inherited: false, default: "medium", keywords: BORDER_WIDTH_KEYWORDS;
    BorderRadius => "border-radius", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    TernBorderRadiusX => "-tern-border-radius-x", String, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderRadiusY => "-tern-border-radius-y", String, inherited: false, default: "0", keywords: NO_KEYWORDS;
    BorderRight => "border-right", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BorderRightColor => "border-right-color", Color, inherited: false, default: "currentcolor", keywords: NO_KEYWORDS;
    BorderRightStyle => "border-right-style", Keyword, inherited: false, default: "none", keywords: BORDER_STYLE_KEYWORDS;
    BorderRightWidth => "border-right-width", Length, inherited: false, default: "medium", keywords: BORDER_WIDTH_KEYWORDS;
    BorderSpacing => "border-spacing", String, inherited: true, default: "0", keywords: NO_KEYWORDS;
    TernBorderSpacingX => "-tern-border-spacing-x", Length, inherited: true, default: "0px", keywords: NO_KEYWORDS;
    TernBorderSpacingY => "-tern-border-spacing-y", Length, inherited: true, default: "0px", keywords: NO_KEYWORDS;
    BorderStyle => "border-style", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BorderTop => "border-top", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    BorderTopColor => "border-top-color", Color, inherited: false, default: "currentcolor", keywords: NO_KEYWORDS;
    BorderTopLeftRadius => "border-top-left-radius", String, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderTopLeftRadiusX => "-tern-border-top-left-radius-x", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderTopLeftRadiusY => "-tern-border-top-left-radius-y", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    BorderTopRightRadius => "border-top-right-radius", String, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderTopRightRadiusX => "-tern-border-top-right-radius-x", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    TernBorderTopRightRadiusY => "-tern-border-top-right-radius-y", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    BorderTopStyle => "border-top-style", Keyword, inherited: false, default: "none", keywords: BORDER_STYLE_KEYWORDS;
    BorderTopWidth => "border-top-width", Length, inherited: false, default: "medium", keywords: BORDER_WIDTH_KEYWORDS;
    BorderWidth => "border-width", String, inherited: false, default: "", keywords: NO_KEYWORDS;

    // Box model
    Bottom => "bottom", Length, inherited: false, default: "auto", keywords: AUTO_KEYWORDS;
    BoxSizing => "box-sizing", Keyword, inherited: false, default: "content-box", keywords: BOX_SIZING_KEYWORDS;
    Clear => "clear", Keyword, inherited: false, default: "none", keywords: CLEAR_KEYWORDS;
    Color => "color", Color, inherited: true, default: "black", keywords: NO_KEYWORDS;
    Content => "content", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    Cursor => "cursor", String, inherited: true, default: "auto", keywords: NO_KEYWORDS;
    Display => "display", Keyword, inherited: false, default: "inline", keywords: DISPLAY_KEYWORDS;
    Float => "float", Keyword, inherited: false, default: "none", keywords: FLOAT_KEYWORDS;

    // Font
    Font => "font", String, inherited: true, default: "", keywords: NO_KEYWORDS;
    FontFamily => "font-family", String, inherited: true, default: "inherit", keywords: NO_KEYWORDS;
    FontSize => "font-size", Length, inherited: true, default: "medium", keywords: FONT_SIZE_KEYWORDS;
    FontStyle => "font-style", Keyword, inherited: true, default: "normal", keywords: FONT_STYLE_KEYWORDS;
    FontVariant => "font-variant", Keyword, inherited: true, default: "normal", keywords: FONT_VARIANT_KEYWORDS;
    FontWeight => "font-weight", String, inherited: true, default: "normal", keywords: NO_KEYWORDS;

    Height => "height", Length, inherited: false, default: "auto", keywords: AUTO_KEYWORDS;
    Left => "left", Length, inherited: false, default: "auto", keywords: AUTO_KEYWORDS;
    LineHeight => "line-height", Length, inherited: true, default: "normal", keywords: NORMAL_KEYWORDS;

    // Lists
    ListStyle => "list-style", String, inherited: true, default: "", keywords: NO_KEYWORDS;
    ListStyleImage => "list-style-image", String, inherited: true, default: "", keywords: NO_KEYWORDS;
    TernListStyleImageBaseurl => "-tern-list-style-image-baseurl", String, inherited: true, default: "", keywords: NO_KEYWORDS;
    ListStylePosition => "list-style-position", Keyword, inherited: true, default: "outside", keywords: LIST_STYLE_POSITION_KEYWORDS;
    ListStyleType => "list-style-type", Keyword, inherited: true, default: "disc", keywords: LIST_STYLE_TYPE_KEYWORDS;

    Margin => "margin", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    MarginBottom => "margin-bottom", Length, inherited: false, default: "0", keywords: AUTO_KEYWORDS;
    MarginLeft => "margin-left", Length, inherited: false, default: "0", keywords: AUTO_KEYWORDS;
    MarginRight => "margin-right", Length, inherited: false, default: "0", keywords: AUTO_KEYWORDS;
    MarginTop => "margin-top", Length, inherited: false, default: "0", keywords: AUTO_KEYWORDS;
    MaxHeight => "max-height", Length, inherited: false, default: "none", keywords: NONE_KEYWORDS;
    MaxWidth => "max-width", Length, inherited: false, default: "none", keywords: NONE_KEYWORDS;
    MinHeight => "min-height", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    MinWidth => "min-width", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    Overflow => "overflow", Keyword, inherited: false, default: "visible", keywords: OVERFLOW_KEYWORDS;
    Padding => "padding", String, inherited: false, default: "", keywords: NO_KEYWORDS;
    PaddingBottom => "padding-bottom", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    PaddingLeft => "padding-left", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    PaddingRight => "padding-right", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    PaddingTop => "padding-top", Length, inherited: false, default: "0", keywords: NO_KEYWORDS;
    Position => "position", Keyword, inherited: false, default: "static", keywords: POSITION_KEYWORDS;
    Right => "right", Length, inherited: false, default: "auto", keywords: AUTO_KEYWORDS;

    // Text
    TextAlign => "text-align", Keyword, inherited: true, default: "left", keywords: TEXT_ALIGN_KEYWORDS;
    TextDecoration => "text-decoration", String, inherited: false, default: "none", keywords: NO_KEYWORDS;
    TextIndent => "text-indent", Length, inherited: true, default: "0", keywords: NO_KEYWORDS;
    TextShadow => "text-shadow", String, inherited: true, default: "none", keywords: NO_KEYWORDS;
    TextTransform => "text-transform", Keyword, inherited: true, default: "none", keywords: TEXT_TRANSFORM_KEYWORDS;

    Top => "top", Length, inherited: false, default: "auto", keywords: AUTO_KEYWORDS;
    VerticalAlign => "vertical-align", Keyword, inherited: false, default: "baseline", keywords: VERTICAL_ALIGN_KEYWORDS;
    Visibility => "visibility", Keyword, inherited: true, default: "visible", keywords: VISIBILITY_KEYWORDS;
    WhiteSpace => "white-space", Keyword, inherited: true, default: "normal", keywords: WHITE_SPACE_KEYWORDS;
    Width => "width", Length, inherited: false, default: "auto", keywords: AUTO_KEYWORDS;
    ZIndex => "z-index", Length, inherited: false, default: "auto", keywords: AUTO_KEYWORDS;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trip() {
        for &prop in CssProperty::ALL {
            assert_eq!(CssProperty::from_name(prop.name()), Some(prop));
        }
    }

    #[test]
    fn inherited_flags() {
        assert!(CssProperty::Color.inherited());
        assert!(CssProperty::FontSize.inherited());
        assert!(CssProperty::WhiteSpace.inherited());
        assert!(!CssProperty::BackgroundColor.inherited());
        assert!(!CssProperty::MarginTop.inherited());
        assert!(!CssProperty::Display.inherited());
    }

    #[test]
    fn metadata_shapes() {
        let meta = CssProperty::Display.meta();
        assert_eq!(meta.value_type, ValueType::Keyword);
        assert_eq!(meta.default, "inline");
        assert!(!meta.keywords.is_empty());

        let meta = CssProperty::Width.meta();
        assert_eq!(meta.value_type, ValueType::Length);
        assert_eq!(meta.default, "auto");
    }
}
