//! Typed keyword values for enumerated CSS properties.
//!
//! Each enumerated property carries a keyword table (ordered string
//! list); the style store records the matched index and the engine
//! recovers the typed value through `from_index`. Table order is
//! therefore part of the contract: enum discriminants equal table
//! positions.

/// Find `value` in a keyword table, case-insensitively.
///
/// Returns -1 when absent (the caller substitutes the property
/// default).
#[must_use]
pub fn value_index(value: &str, table: &[&str]) -> i32 {
    table
        .iter()
        .position(|k| k.eq_ignore_ascii_case(value))
        .map_or(-1, |i| i as i32)
}

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident / $table:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
        #[repr(i32)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        /// Keyword table for the property; order defines discriminants.
        pub const $table: &[&str] = &[$($text),+];

        impl $name {
            /// Recover the typed keyword from a table index, falling
            /// back to the first table entry for out-of-range input.
            #[must_use]
            pub fn from_index(index: i32) -> Self {
                const VARIANTS: &[$name] = &[$($name::$variant),+];
                VARIANTS
                    .get(index.max(0) as usize)
                    .copied()
                    .unwrap_or(VARIANTS[0])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::from_index(0)
            }
        }
    };
}

keyword_enum! {
    /// [CSS 2.1 § 9.2.4 'display'](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
    ///
    /// `InlineText` is an internal value assigned to text and whitespace
    /// nodes; it never appears in author CSS.
    Display / DISPLAY_KEYWORDS {
        None => "none",
        Block => "block",
        Inline => "inline",
        InlineBlock => "inline-block",
        InlineTable => "inline-table",
        ListItem => "list-item",
        Table => "table",
        TableCaption => "table-caption",
        TableCell => "table-cell",
        TableColumn => "table-column",
        TableColumnGroup => "table-column-group",
        TableFooterGroup => "table-footer-group",
        TableHeaderGroup => "table-header-group",
        TableRow => "table-row",
        TableRowGroup => "table-row-group",
        /// Internal: text runs and whitespace runs.
        InlineText => "inline-text",
    }
}

impl Display {
    /// [§ 9.2.2 Inline-level elements](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    ///
    /// True for boxes that participate in an inline formatting context.
    #[must_use]
    pub fn is_inline_level(self) -> bool {
        matches!(
            self,
            Display::Inline | Display::InlineBlock | Display::InlineTable | Display::InlineText
        )
    }

    /// True for the table-internal display values that the table grid
    /// builder interprets.
    #[must_use]
    pub fn is_table_internal(self) -> bool {
        matches!(
            self,
            Display::TableCaption
                | Display::TableCell
                | Display::TableColumn
                | Display::TableColumnGroup
                | Display::TableFooterGroup
                | Display::TableHeaderGroup
                | Display::TableRow
                | Display::TableRowGroup
        )
    }
}

keyword_enum! {
    /// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
    ElementPosition / POSITION_KEYWORDS {
        Static => "static",
        Relative => "relative",
        Absolute => "absolute",
        Fixed => "fixed",
    }
}

impl ElementPosition {
    /// True for any non-static position.
    #[must_use]
    pub fn is_positioned(self) -> bool {
        self != ElementPosition::Static
    }
}

keyword_enum! {
    /// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ElementFloat / FLOAT_KEYWORDS {
        None => "none",
        Left => "left",
        Right => "right",
    }
}

keyword_enum! {
    /// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ElementClear / CLEAR_KEYWORDS {
        None => "none",
        Left => "left",
        Right => "right",
        Both => "both",
    }
}

keyword_enum! {
    /// [§ 11.1.1 'overflow'](https://www.w3.org/TR/CSS2/visufx.html#overflow)
    Overflow / OVERFLOW_KEYWORDS {
        Visible => "visible",
        Hidden => "hidden",
        Scroll => "scroll",
        Auto => "auto",
    }
}

keyword_enum! {
    /// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    Visibility / VISIBILITY_KEYWORDS {
        Visible => "visible",
        Hidden => "hidden",
        Collapse => "collapse",
    }
}

keyword_enum! {
    /// [§ 16.6 'white-space'](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
    WhiteSpace / WHITE_SPACE_KEYWORDS {
        Normal => "normal",
        Nowrap => "nowrap",
        Pre => "pre",
        PreLine => "pre-line",
        PreWrap => "pre-wrap",
    }
}

keyword_enum! {
    /// [§ 16.2 'text-align'](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
    TextAlign / TEXT_ALIGN_KEYWORDS {
        Left => "left",
        Right => "right",
        Center => "center",
        /// Recognized; computed as `left` during line finalization.
        Justify => "justify",
    }
}

keyword_enum! {
    /// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
    VerticalAlign / VERTICAL_ALIGN_KEYWORDS {
        Baseline => "baseline",
        Sub => "sub",
        Super => "super",
        Top => "top",
        TextTop => "text-top",
        Middle => "middle",
        Bottom => "bottom",
        TextBottom => "text-bottom",
    }
}

keyword_enum! {
    /// [§ 8.5.3 border style](https://www.w3.org/TR/CSS2/box.html#border-style-properties)
    BorderStyle / BORDER_STYLE_KEYWORDS {
        None => "none",
        Hidden => "hidden",
        Dotted => "dotted",
        Dashed => "dashed",
        Solid => "solid",
        Double => "double",
        Groove => "groove",
        Ridge => "ridge",
        Inset => "inset",
        Outset => "outset",
    }
}

keyword_enum! {
    /// [CSS Basic UI 'box-sizing'](https://www.w3.org/TR/css-ui-3/#box-sizing)
    BoxSizing / BOX_SIZING_KEYWORDS {
        ContentBox => "content-box",
        BorderBox => "border-box",
    }
}

keyword_enum! {
    /// [§ 17.6 'border-collapse'](https://www.w3.org/TR/CSS2/tables.html#borders)
    BorderCollapse / BORDER_COLLAPSE_KEYWORDS {
        Separate => "separate",
        Collapse => "collapse",
    }
}

keyword_enum! {
    /// [CSS Lists 'list-style-type'](https://www.w3.org/TR/css-lists-3/#text-markers)
    ///
    /// Marker-glyph types come first; `Decimal` and above produce
    /// generated text through the numbering converters.
    ListStyleType / LIST_STYLE_TYPE_KEYWORDS {
        None => "none",
        Circle => "circle",
        Disc => "disc",
        Square => "square",
        Decimal => "decimal",
        DecimalLeadingZero => "decimal-leading-zero",
        LowerAlpha => "lower-alpha",
        LowerGreek => "lower-greek",
        LowerLatin => "lower-latin",
        LowerRoman => "lower-roman",
        UpperAlpha => "upper-alpha",
        UpperLatin => "upper-latin",
        UpperRoman => "upper-roman",
        Armenian => "armenian",
        CjkIdeographic => "cjk-ideographic",
        Georgian => "georgian",
        Hebrew => "hebrew",
        Hiragana => "hiragana",
        HiraganaIroha => "hiragana-iroha",
        Katakana => "katakana",
        KatakanaIroha => "katakana-iroha",
    }
}

impl ListStyleType {
    /// True for types rendered as generated text rather than a glyph.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self >= ListStyleType::Decimal && self <= ListStyleType::UpperRoman
    }
}

keyword_enum! {
    /// [CSS Lists 'list-style-position'](https://www.w3.org/TR/css-lists-3/#list-style-position-property)
    ListStylePosition / LIST_STYLE_POSITION_KEYWORDS {
        Outside => "outside",
        Inside => "inside",
    }
}

keyword_enum! {
    /// [§ 16.5 'text-transform'](https://www.w3.org/TR/CSS2/text.html#caps-prop)
    TextTransform / TEXT_TRANSFORM_KEYWORDS {
        None => "none",
        Capitalize => "capitalize",
        Uppercase => "uppercase",
        Lowercase => "lowercase",
    }
}

keyword_enum! {
    /// [CSS Backgrounds 'background-attachment'](https://www.w3.org/TR/css-backgrounds-3/#the-background-attachment)
    BackgroundAttachment / BACKGROUND_ATTACHMENT_KEYWORDS {
        Scroll => "scroll",
        Fixed => "fixed",
    }
}

keyword_enum! {
    /// [CSS Backgrounds 'background-repeat'](https://www.w3.org/TR/css-backgrounds-3/#the-background-repeat)
    BackgroundRepeat / BACKGROUND_REPEAT_KEYWORDS {
        Repeat => "repeat",
        RepeatX => "repeat-x",
        RepeatY => "repeat-y",
        NoRepeat => "no-repeat",
    }
}

keyword_enum! {
    /// [CSS Backgrounds box values](https://www.w3.org/TR/css-backgrounds-3/#the-background-clip)
    ///
    /// Shared by `background-clip` and `background-origin`.
    BackgroundBox / BACKGROUND_BOX_KEYWORDS {
        BorderBox => "border-box",
        PaddingBox => "padding-box",
        ContentBox => "content-box",
    }
}

keyword_enum! {
    /// [CSS Fonts 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
    FontStyle / FONT_STYLE_KEYWORDS {
        Normal => "normal",
        Italic => "italic",
        Oblique => "oblique",
    }
}

keyword_enum! {
    /// [CSS Fonts 'font-variant'](https://www.w3.org/TR/css-fonts-4/#font-variant-prop)
    FontVariant / FONT_VARIANT_KEYWORDS {
        Normal => "normal",
        SmallCaps => "small-caps",
    }
}

/// Predefined keywords for `width`/`height`/margins/offsets/`z-index`.
pub const AUTO_KEYWORDS: &[&str] = &["auto"];

/// Index of `auto` in [`AUTO_KEYWORDS`].
pub const KEYWORD_AUTO: i32 = 0;

/// Predefined keywords for `max-width`/`max-height`.
pub const NONE_KEYWORDS: &[&str] = &["none"];

/// Predefined keywords for `line-height`.
pub const NORMAL_KEYWORDS: &[&str] = &["normal"];

/// Index of `normal` in [`NORMAL_KEYWORDS`].
pub const KEYWORD_NORMAL: i32 = 0;

/// Predefined keywords for border widths.
pub const BORDER_WIDTH_KEYWORDS: &[&str] = &["thin", "medium", "thick"];

/// Predefined keywords for `font-size`.
pub const FONT_SIZE_KEYWORDS: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller", "larger",
];

/// Typed view of the `font-size` predefined keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSizeKeyword {
    /// 3/5 of the default document font size.
    XxSmall,
    /// 3/4 of the default size.
    XSmall,
    /// 8/9 of the default size.
    Small,
    /// The default document font size.
    Medium,
    /// 6/5 of the default size.
    Large,
    /// 3/2 of the default size.
    XLarge,
    /// Twice the default size.
    XxLarge,
    /// One step smaller than the parent.
    Smaller,
    /// One step larger than the parent.
    Larger,
}

impl FontSizeKeyword {
    /// Recover the typed keyword from a [`FONT_SIZE_KEYWORDS`] index.
    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        use FontSizeKeyword::*;
        Some(match index {
            0 => XxSmall,
            1 => XSmall,
            2 => Small,
            3 => Medium,
            4 => Large,
            5 => XLarge,
            6 => XxLarge,
            7 => Smaller,
            8 => Larger,
            _ => return None,
        })
    }
}

/// Named `font-weight` keywords (numeric weights parse separately).
pub const FONT_WEIGHT_KEYWORDS: &[&str] = &["normal", "bold", "bolder", "lighter"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_index_is_case_insensitive() {
        assert_eq!(value_index("BLOCK", DISPLAY_KEYWORDS), 1);
        assert_eq!(value_index("inline", DISPLAY_KEYWORDS), 2);
        assert_eq!(value_index("nope", DISPLAY_KEYWORDS), -1);
    }

    #[test]
    fn from_index_round_trips() {
        let idx = value_index("table-cell", DISPLAY_KEYWORDS);
        assert_eq!(Display::from_index(idx), Display::TableCell);
        assert_eq!(
            ElementClear::from_index(value_index("both", CLEAR_KEYWORDS)),
            ElementClear::Both
        );
    }

    #[test]
    fn numeric_list_types() {
        assert!(ListStyleType::Decimal.is_numeric());
        assert!(ListStyleType::UpperRoman.is_numeric());
        assert!(!ListStyleType::Disc.is_numeric());
        assert!(!ListStyleType::Hebrew.is_numeric());
    }
}
