//! CSS length values per [CSS Values and Units](https://www.w3.org/TR/css-values-4/#lengths).
//!
//! A [`CssLength`] is either a concrete `(value, unit)` pair or a
//! predefined keyword (an index into the owning property's keyword
//! table: `auto`, `none`, `normal`, `medium`, `xx-small`, ...). Unit
//! conversion to pixels happens in the document (`cvt_units`), which
//! has access to font sizes, the viewport and the host's `pt_to_px`.

use serde::Serialize;

/// Units a length value can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CssUnit {
    /// Unit-less number (line-height multipliers, z-index).
    #[default]
    None,
    /// Percentage of a context-dependent base.
    Percent,
    /// Inches; 1in = 72pt.
    In,
    /// Centimetres; 1in = 2.54cm.
    Cm,
    /// Millimetres; 10mm = 1cm.
    Mm,
    /// Relative to the element's font size.
    Em,
    /// Relative to the font's x-height (approximated as 0.5em).
    Ex,
    /// Points; converted through the host `pt_to_px`.
    Pt,
    /// Picas; 1pc = 12pt.
    Pc,
    /// CSS pixels.
    Px,
    /// 1% of the viewport width.
    Vw,
    /// 1% of the viewport height.
    Vh,
    /// 1% of min(viewport width, height).
    Vmin,
    /// 1% of max(viewport width, height).
    Vmax,
    /// Relative to the root element's font size.
    Rem,
}

/// Unit suffixes, longest first so `rem` wins over `em` and `vmin`/`vmax`
/// over `vw`/`vh` during suffix matching.
const UNIT_SUFFIXES: &[(&str, CssUnit)] = &[
    ("vmin", CssUnit::Vmin),
    ("vmax", CssUnit::Vmax),
    ("rem", CssUnit::Rem),
    ("in", CssUnit::In),
    ("cm", CssUnit::Cm),
    ("mm", CssUnit::Mm),
    ("em", CssUnit::Em),
    ("ex", CssUnit::Ex),
    ("pt", CssUnit::Pt),
    ("pc", CssUnit::Pc),
    ("px", CssUnit::Px),
    ("vw", CssUnit::Vw),
    ("vh", CssUnit::Vh),
    ("%", CssUnit::Percent),
];

/// A CSS length: a `(value, unit)` pair or a predefined keyword.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CssLength {
    value: f32,
    unit: CssUnit,
    /// Keyword index when predefined (meaning depends on the property's
    /// keyword table).
    predef: i32,
    is_predefined: bool,
}

impl Default for CssLength {
    fn default() -> Self {
        Self {
            value: 0.0,
            unit: CssUnit::None,
            predef: 0,
            is_predefined: false,
        }
    }
}

impl CssLength {
    /// A concrete value with a unit.
    #[must_use]
    pub fn new(value: f32, unit: CssUnit) -> Self {
        Self {
            value,
            unit,
            predef: 0,
            is_predefined: false,
        }
    }

    /// A predefined keyword (index into the property's keyword table).
    #[must_use]
    pub fn predefined(keyword: i32) -> Self {
        Self {
            value: 0.0,
            unit: CssUnit::None,
            predef: keyword,
            is_predefined: true,
        }
    }

    /// Convenience pixel constructor.
    #[must_use]
    pub fn px(value: f32) -> Self {
        Self::new(value, CssUnit::Px)
    }

    /// True when this length is a predefined keyword.
    #[must_use]
    pub fn is_predefined(&self) -> bool {
        self.is_predefined
    }

    /// The keyword index (0 when not predefined).
    #[must_use]
    pub fn predef(&self) -> i32 {
        if self.is_predefined {
            self.predef
        } else {
            0
        }
    }

    /// The numeric value (0 when predefined).
    #[must_use]
    pub fn val(&self) -> f32 {
        if self.is_predefined {
            0.0
        } else {
            self.value
        }
    }

    /// The unit.
    #[must_use]
    pub fn units(&self) -> CssUnit {
        self.unit
    }

    /// Replace this length with a concrete value.
    pub fn set_value(&mut self, value: f32, unit: CssUnit) {
        self.value = value;
        self.unit = unit;
        self.is_predefined = false;
    }

    /// Percent-of-base resolution: `%` lengths scale `base`, any other
    /// concrete length contributes its raw value, predefined keywords
    /// contribute 0.
    #[must_use]
    pub fn calc_percent(&self, base: i32) -> i32 {
        if self.is_predefined {
            return 0;
        }
        if self.unit == CssUnit::Percent {
            (f64::from(base) * f64::from(self.value) / 100.0) as i32
        } else {
            self.val() as i32
        }
    }

    /// Parse a length from its textual form.
    ///
    /// `keywords` is the owning property's keyword table; a full-string
    /// match yields a predefined length. Otherwise the longest matching
    /// unit suffix is stripped and the remainder parsed as a number; a
    /// bare number is unit-less. Unparsable input falls back to the
    /// `default_keyword` predefined value.
    #[must_use]
    pub fn parse(text: &str, keywords: &[&str], default_keyword: i32) -> Self {
        let text = text.trim();

        if let Some(idx) = keywords
            .iter()
            .position(|k| k.eq_ignore_ascii_case(text))
        {
            return Self::predefined(idx as i32);
        }

        for (suffix, unit) in UNIT_SUFFIXES {
            if let Some(number) = text
                .strip_suffix(suffix)
                .or_else(|| strip_suffix_ignore_case(text, suffix))
            {
                if let Ok(value) = number.trim().parse::<f32>() {
                    return Self::new(value, *unit);
                }
            }
        }

        if let Ok(value) = text.parse::<f32>() {
            return Self::new(value, CssUnit::None);
        }

        Self::predefined(default_keyword)
    }
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    if text.len() < suffix.len() {
        return None;
    }
    let (head, tail) = text.split_at(text.len() - suffix.len());
    if tail.eq_ignore_ascii_case(suffix) {
        Some(head)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        let len = CssLength::parse("12px", &[], 0);
        assert_eq!(len.val(), 12.0);
        assert_eq!(len.units(), CssUnit::Px);

        let len = CssLength::parse("50%", &[], 0);
        assert_eq!(len.units(), CssUnit::Percent);
        assert_eq!(len.calc_percent(200), 100);

        let len = CssLength::parse("1.5em", &[], 0);
        assert_eq!(len.units(), CssUnit::Em);
        assert!((len.val() - 1.5).abs() < f32::EPSILON);

        let len = CssLength::parse("2rem", &[], 0);
        assert_eq!(len.units(), CssUnit::Rem);
    }

    #[test]
    fn bare_number_is_unitless() {
        let len = CssLength::parse("1.6", &[], 0);
        assert_eq!(len.units(), CssUnit::None);
        assert!((len.val() - 1.6).abs() < f32::EPSILON);
    }

    #[test]
    fn keyword_becomes_predefined() {
        let len = CssLength::parse("auto", &["auto"], 0);
        assert!(len.is_predefined());
        assert_eq!(len.predef(), 0);
        assert_eq!(len.calc_percent(500), 0);
    }

    #[test]
    fn garbage_falls_back_to_default_keyword() {
        let len = CssLength::parse("garbage", &["auto", "none"], 1);
        assert!(len.is_predefined());
        assert_eq!(len.predef(), 1);
    }
}
