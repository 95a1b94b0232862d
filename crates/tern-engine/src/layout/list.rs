//! List-item markers.
//!
//! [CSS Lists](https://www.w3.org/TR/css-lists-3/)
//!
//! Numeric marker types generate text through the converters below;
//! everything else falls through to the host's `draw_list_marker`
//! glyph (disc, circle, square — and any numbering system the engine
//! does not generate).

use tern_css::keywords::ListStyleType;

/// Generated marker text for a 1-based index, without the trailing
/// period. Empty for glyph types and unimplemented numbering systems.
pub(crate) fn list_marker_text(list_type: ListStyleType, index: i32) -> String {
    match list_type {
        ListStyleType::Decimal => index.to_string(),
        ListStyleType::DecimalLeadingZero => {
            let text = index.to_string();
            if text.len() == 1 {
                format!("0{text}")
            } else {
                text
            }
        }
        ListStyleType::LowerAlpha | ListStyleType::LowerLatin => to_latin(index, b'a'),
        ListStyleType::UpperAlpha | ListStyleType::UpperLatin => to_latin(index, b'A'),
        ListStyleType::LowerRoman => to_roman(index, false),
        ListStyleType::UpperRoman => to_roman(index, true),
        ListStyleType::LowerGreek => to_greek(index),
        _ => String::new(),
    }
}

/// Bijective base-26: 1 → a, 26 → z, 27 → aa.
fn to_latin(mut index: i32, base: u8) -> String {
    if index <= 0 {
        return index.to_string();
    }
    let mut out = Vec::new();
    while index > 0 {
        index -= 1;
        out.push(base + (index % 26) as u8);
        index /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Additive roman numerals; out-of-range values fall back to decimal.
fn to_roman(index: i32, upper: bool) -> String {
    if !(1..=3999).contains(&index) {
        return index.to_string();
    }
    const TABLE: &[(i32, &str)] = &[
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut remaining = index;
    let mut out = String::new();
    for &(value, digits) in TABLE {
        while remaining >= value {
            out.push_str(digits);
            remaining -= value;
        }
    }
    if upper {
        out.to_uppercase()
    } else {
        out
    }
}

/// Greek letters alpha–omega, cycling for large indices.
fn to_greek(index: i32) -> String {
    const LETTERS: [char; 24] = [
        'α', 'β', 'γ', 'δ', 'ε', 'ζ', 'η', 'θ', 'ι', 'κ', 'λ', 'μ', 'ν', 'ξ', 'ο', 'π', 'ρ',
        'σ', 'τ', 'υ', 'φ', 'χ', 'ψ', 'ω',
    ];
    if index <= 0 {
        return index.to_string();
    }
    let mut out = String::new();
    let mut remaining = index - 1;
    loop {
        out.insert(0, LETTERS[(remaining % 24) as usize]);
        remaining /= 24;
        if remaining == 0 {
            break;
        }
        remaining -= 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_markers() {
        assert_eq!(list_marker_text(ListStyleType::Decimal, 7), "7");
        assert_eq!(list_marker_text(ListStyleType::DecimalLeadingZero, 7), "07");
        assert_eq!(list_marker_text(ListStyleType::DecimalLeadingZero, 12), "12");
    }

    #[test]
    fn latin_markers() {
        assert_eq!(list_marker_text(ListStyleType::LowerAlpha, 1), "a");
        assert_eq!(list_marker_text(ListStyleType::LowerAlpha, 26), "z");
        assert_eq!(list_marker_text(ListStyleType::LowerLatin, 27), "aa");
        assert_eq!(list_marker_text(ListStyleType::UpperAlpha, 2), "B");
    }

    #[test]
    fn roman_markers() {
        assert_eq!(list_marker_text(ListStyleType::LowerRoman, 4), "iv");
        assert_eq!(list_marker_text(ListStyleType::UpperRoman, 1994), "MCMXCIV");
        assert_eq!(list_marker_text(ListStyleType::LowerRoman, 9), "ix");
    }

    #[test]
    fn greek_markers() {
        assert_eq!(list_marker_text(ListStyleType::LowerGreek, 1), "α");
        assert_eq!(list_marker_text(ListStyleType::LowerGreek, 24), "ω");
        assert_eq!(list_marker_text(ListStyleType::LowerGreek, 25), "αα");
    }

    #[test]
    fn glyph_types_generate_nothing() {
        assert_eq!(list_marker_text(ListStyleType::Disc, 3), "");
        assert_eq!(list_marker_text(ListStyleType::Hebrew, 3), "");
    }
}
