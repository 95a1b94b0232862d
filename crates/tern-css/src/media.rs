//! Media queries per [Media Queries Level 3](https://www.w3.org/TR/css3-mediaqueries/).
//!
//! A media query list gates the selectors parsed from a `@media` block
//! (or a `media=` attribute). Lists are shared between selectors and
//! re-evaluated against host-reported [`MediaFeatures`] when the
//! environment changes; a flipped result drives a restyle.

use std::cell::RefCell;
use std::rc::Rc;

/// Host-reported media features (viewport + device capabilities).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaFeatures {
    /// Media type the host renders for.
    pub media_type: MediaType,
    /// Viewport width in px.
    pub width: i32,
    /// Viewport height in px.
    pub height: i32,
    /// Device (screen) width in px.
    pub device_width: i32,
    /// Device (screen) height in px.
    pub device_height: i32,
    /// Bits per color component; 0 for monochrome devices.
    pub color: i32,
    /// Palette size for indexed devices; 0 otherwise.
    pub color_index: i32,
    /// Bits per pixel on monochrome devices; 0 otherwise.
    pub monochrome: i32,
    /// Resolution in dpi.
    pub resolution: i32,
}

/// Media types per [§ 7 Media types](https://www.w3.org/TR/CSS2/media.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    /// Matches every device.
    #[default]
    All,
    /// Color computer screens.
    Screen,
    /// Paged output.
    Print,
    /// Speech synthesizers.
    Speech,
    /// Any type the parser does not recognize (never matches).
    Unknown,
}

impl MediaType {
    fn parse(text: &str) -> Self {
        match text {
            "all" => MediaType::All,
            "screen" => MediaType::Screen,
            "print" => MediaType::Print,
            "speech" | "aural" => MediaType::Speech,
            _ => MediaType::Unknown,
        }
    }
}

/// A feature the expression syntax can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feature {
    Width,
    Height,
    DeviceWidth,
    DeviceHeight,
    Color,
    ColorIndex,
    Monochrome,
    Resolution,
    Orientation,
}

/// Comparison carried by a `min-`/`max-` prefix (or none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Range {
    Min,
    Max,
    Exact,
}

/// One `(feature: value)` term.
#[derive(Debug, Clone)]
struct Expression {
    feature: Feature,
    range: Range,
    /// Parsed numeric value; for `orientation`, 0 = portrait,
    /// 1 = landscape. -1 means "no value" (bare feature test).
    value: i32,
}

impl Expression {
    fn check(&self, features: &MediaFeatures) -> bool {
        let actual = match self.feature {
            Feature::Width => features.width,
            Feature::Height => features.height,
            Feature::DeviceWidth => features.device_width,
            Feature::DeviceHeight => features.device_height,
            Feature::Color => features.color,
            Feature::ColorIndex => features.color_index,
            Feature::Monochrome => features.monochrome,
            Feature::Resolution => features.resolution,
            Feature::Orientation => i32::from(features.width >= features.height),
        };
        if self.value < 0 {
            // Bare feature test: true for a non-zero value.
            return actual != 0;
        }
        match self.range {
            Range::Min => actual >= self.value,
            Range::Max => actual <= self.value,
            Range::Exact => actual == self.value,
        }
    }
}

/// One media query: optional negation, a media type, `and`-joined
/// feature expressions.
#[derive(Debug, Clone)]
pub struct MediaQuery {
    not: bool,
    media_type: MediaType,
    expressions: Vec<Expression>,
}

impl MediaQuery {
    /// Parse a single query, e.g. `screen and (min-width: 600px)`.
    ///
    /// Returns `None` for completely empty input; unknown features make
    /// the query never match (rather than being dropped), matching the
    /// "unknown ⇒ not applicable" error handling rule.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_ascii_lowercase();
        if text.is_empty() {
            return None;
        }

        let mut not = false;
        let mut media_type = MediaType::All;
        let mut expressions = Vec::new();

        for (i, raw_term) in text.split(" and ").enumerate() {
            let mut term = raw_term.trim();
            if i == 0 {
                if let Some(rest) = term.strip_prefix("not ") {
                    not = true;
                    term = rest.trim();
                } else if let Some(rest) = term.strip_prefix("only ") {
                    term = rest.trim();
                }
            }

            if term.starts_with('(') {
                let inner = term.trim_start_matches('(').trim_end_matches(')');
                expressions.push(parse_expression(inner));
            } else if !term.is_empty() {
                media_type = MediaType::parse(term);
            }
        }

        Some(Self {
            not,
            media_type,
            expressions,
        })
    }

    /// Evaluate this query against the current features.
    #[must_use]
    pub fn check(&self, features: &MediaFeatures) -> bool {
        let type_matches = match self.media_type {
            MediaType::All => true,
            MediaType::Unknown => false,
            t => t == features.media_type,
        };
        let result = type_matches && self.expressions.iter().all(|e| e.check(features));
        if self.not {
            !result
        } else {
            result
        }
    }
}

fn parse_expression(inner: &str) -> Expression {
    let (name, value_text) = match inner.split_once(':') {
        Some((n, v)) => (n.trim(), Some(v.trim())),
        None => (inner.trim(), None),
    };

    let (range, feature_name) = if let Some(rest) = name.strip_prefix("min-") {
        (Range::Min, rest)
    } else if let Some(rest) = name.strip_prefix("max-") {
        (Range::Max, rest)
    } else {
        (Range::Exact, name)
    };

    let feature = match feature_name {
        "width" => Feature::Width,
        "height" => Feature::Height,
        "device-width" => Feature::DeviceWidth,
        "device-height" => Feature::DeviceHeight,
        "color" => Feature::Color,
        "color-index" => Feature::ColorIndex,
        "monochrome" => Feature::Monochrome,
        "resolution" => Feature::Resolution,
        "orientation" => Feature::Orientation,
        _ => {
            // Unknown feature: an impossible exact test.
            return Expression {
                feature: Feature::Width,
                range: Range::Exact,
                value: i32::MIN + 1,
            };
        }
    };

    let value = match value_text {
        None => -1,
        Some(v) if feature == Feature::Orientation => i32::from(v == "landscape"),
        Some(v) => parse_feature_value(v),
    };

    Expression { feature, range, value }
}

/// Parse `600px`, `96dpi`, `8` — the numeric prefix of the value.
fn parse_feature_value(text: &str) -> i32 {
    let digits: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f32>().map_or(0, |v| v as i32)
}

/// A comma-separated list of media queries with its current used flag.
#[derive(Debug, Clone, Default)]
pub struct MediaQueryList {
    queries: Vec<MediaQuery>,
    is_used: bool,
}

/// Shared handle: one list is referenced by every selector parsed from
/// the same `@media` block and re-evaluated by the document.
pub type MediaQueryListRef = Rc<RefCell<MediaQueryList>>;

impl MediaQueryList {
    /// Parse a comma-separated media query list.
    ///
    /// Returns `None` when no query survives parsing (the caller then
    /// treats the styles as unconditional).
    #[must_use]
    pub fn parse(text: &str) -> Option<MediaQueryListRef> {
        let queries: Vec<MediaQuery> = text
            .split(',')
            .filter_map(MediaQuery::parse)
            .collect();
        if queries.is_empty() {
            return None;
        }
        Some(Rc::new(RefCell::new(Self {
            queries,
            is_used: false,
        })))
    }

    /// Re-evaluate against `features`; returns true when the used flag
    /// flipped (the document then re-runs the cascade).
    pub fn apply_media_features(&mut self, features: &MediaFeatures) -> bool {
        let apply = self.queries.iter().any(|q| q.check(features));
        let changed = apply != self.is_used;
        self.is_used = apply;
        changed
    }

    /// Whether the list currently applies.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.is_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(width: i32, height: i32) -> MediaFeatures {
        MediaFeatures {
            media_type: MediaType::Screen,
            width,
            height,
            device_width: width,
            device_height: height,
            color: 8,
            resolution: 96,
            ..Default::default()
        }
    }

    #[test]
    fn min_width_query() {
        let list = MediaQueryList::parse("screen and (min-width: 600px)").unwrap();
        assert!(list.borrow_mut().apply_media_features(&features(800, 600)));
        assert!(list.borrow().is_used());
        assert!(list.borrow_mut().apply_media_features(&features(320, 480)));
        assert!(!list.borrow().is_used());
    }

    #[test]
    fn media_type_mismatch() {
        let list = MediaQueryList::parse("print").unwrap();
        list.borrow_mut().apply_media_features(&features(800, 600));
        assert!(!list.borrow().is_used());
    }

    #[test]
    fn negated_query() {
        let list = MediaQueryList::parse("not print").unwrap();
        list.borrow_mut().apply_media_features(&features(800, 600));
        assert!(list.borrow().is_used());
    }

    #[test]
    fn orientation() {
        let list = MediaQueryList::parse("(orientation: landscape)").unwrap();
        list.borrow_mut().apply_media_features(&features(800, 600));
        assert!(list.borrow().is_used());
        list.borrow_mut().apply_media_features(&features(600, 800));
        assert!(!list.borrow().is_used());
    }

    #[test]
    fn unknown_feature_never_matches() {
        let list = MediaQueryList::parse("(hover: hover)").unwrap();
        list.borrow_mut().apply_media_features(&features(800, 600));
        assert!(!list.borrow().is_used());
    }
}
