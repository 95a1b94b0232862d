//! Typed property values.
//!
//! Every stored value keeps both its typed form (color, keyword index,
//! length) and the raw text it was built from. Inheritance works at the
//! text level (`inherit` is detected on the raw string before the typed
//! value is consulted), so the typed payload never needs an "inherit"
//! variant.

use serde::Serialize;

use crate::color::Color;
use crate::keywords::value_index;
use crate::length::CssLength;
use crate::property::{CssProperty, ValueType};

/// The typed payload of a [`CssValue`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CssValueKind {
    /// Free-form string.
    String(String),
    /// An RGBA color.
    Color(Color),
    /// An index into the owning property's keyword table (-1 when the
    /// text matched nothing; the default then applies downstream).
    Keyword(i32),
    /// A length, possibly a predefined keyword.
    Length(CssLength),
}

/// A property value with its importance flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssValue {
    /// The typed payload.
    pub kind: CssValueKind,
    /// The raw declaration text the value was built from.
    pub raw: String,
    /// `!important` flag; consulted during cascade merge.
    pub important: bool,
}

impl CssValue {
    /// Build a typed value for `property` from declaration text.
    ///
    /// The property's metadata row decides the representation:
    /// colors parse through [`Color::parse`] (falling back to
    /// transparent on failure), keywords through the property's keyword
    /// table, lengths through [`CssLength::parse`] with the table as
    /// predefined keywords.
    #[must_use]
    pub fn factory(property: CssProperty, text: &str, important: bool) -> Self {
        let meta = property.meta();
        let text = text.trim();
        let kind = match meta.value_type {
            ValueType::String => CssValueKind::String(text.to_string()),
            ValueType::Color => {
                CssValueKind::Color(Color::parse(text).unwrap_or_else(Color::transparent))
            }
            ValueType::Keyword => CssValueKind::Keyword(value_index(text, meta.keywords)),
            ValueType::Length => {
                CssValueKind::Length(CssLength::parse(text, meta.keywords, 0))
            }
        };
        Self {
            kind,
            raw: text.to_string(),
            important,
        }
    }

    /// The default typed value for `property` (from its metadata row).
    #[must_use]
    pub fn default_for(property: CssProperty) -> Self {
        Self::factory(property, property.meta().default, false)
    }

    /// True when the raw text is the literal `inherit`.
    #[must_use]
    pub fn is_inherit(&self) -> bool {
        self.raw.eq_ignore_ascii_case("inherit")
    }

    /// The string payload, or the raw text for non-string values.
    #[must_use]
    pub fn string(&self) -> &str {
        match &self.kind {
            CssValueKind::String(s) => s,
            _ => &self.raw,
        }
    }

    /// The color payload (transparent for non-color values).
    #[must_use]
    pub fn color(&self) -> Color {
        match &self.kind {
            CssValueKind::Color(c) => *c,
            _ => Color::transparent(),
        }
    }

    /// The keyword index payload (-1 for non-keyword values).
    #[must_use]
    pub fn keyword(&self) -> i32 {
        match &self.kind {
            CssValueKind::Keyword(k) => *k,
            _ => -1,
        }
    }

    /// The length payload (default length for non-length values).
    #[must_use]
    pub fn length(&self) -> CssLength {
        match &self.kind {
            CssValueKind::Length(l) => *l,
            _ => CssLength::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::Display;

    #[test]
    fn factory_respects_value_type() {
        let v = CssValue::factory(CssProperty::Color, "#ff0000", false);
        assert_eq!(v.color(), Color::rgb(255, 0, 0));

        let v = CssValue::factory(CssProperty::Display, "block", false);
        assert_eq!(Display::from_index(v.keyword()), Display::Block);

        let v = CssValue::factory(CssProperty::Width, "50%", true);
        assert!(v.important);
        assert_eq!(v.length().calc_percent(200), 100);
    }

    #[test]
    fn inherit_is_detected_on_raw_text() {
        let v = CssValue::factory(CssProperty::Color, "inherit", false);
        assert!(v.is_inherit());
    }

    #[test]
    fn defaults_come_from_the_table() {
        let v = CssValue::default_for(CssProperty::BackgroundColor);
        assert!(v.color().is_transparent());
        let v = CssValue::default_for(CssProperty::Width);
        assert!(v.length().is_predefined());
    }
}
