//! Stylesheet assembly: rules → selectors bound to shared style blocks.
//!
//! The parser produces raw rules; this layer expands each qualified
//! rule into one [`Selector`] per comma-separated selector, all sharing
//! one parsed [`Style`] block, assigns source order, threads `@media`
//! lists through nested rule lists and surfaces `@import` preludes to
//! the document.

use std::rc::Rc;

use tern_common::warn_once;

use crate::media::{MediaQueryList, MediaQueryListRef};
use crate::parser::{parse_rules_from_text, parse_rules_from_tokens, Rule};
use crate::selector::{Selector, SelectorChain};
use crate::style::{parse_css_url, Style};

/// An `@import` surfaced to the document for host-side fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRule {
    /// The referenced stylesheet URL (relative to the sheet's base).
    pub url: String,
    /// The raw media text following the URL (may be empty).
    pub media: String,
}

/// A parsed stylesheet: flat selector list plus its media query lists.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// All selectors, in source order, each bound to its style block.
    pub selectors: Vec<Rc<Selector>>,
    /// Every media query list seen in this sheet (for re-evaluation).
    pub media_lists: Vec<MediaQueryListRef>,
    /// `@import` rules, in source order.
    pub imports: Vec<ImportRule>,
}

impl Stylesheet {
    /// Parse stylesheet text.
    ///
    /// `baseurl` resolves `url()` references inside declarations;
    /// `media` optionally gates the whole sheet (a `<link media=...>`
    /// or `<style media=...>` attribute).
    #[must_use]
    pub fn parse(text: &str, baseurl: &str, media: Option<MediaQueryListRef>) -> Self {
        let mut sheet = Self::default();
        if let Some(list) = &media {
            sheet.media_lists.push(Rc::clone(list));
        }
        let rules = parse_rules_from_text(text);
        let mut order = 0u32;
        sheet.add_rules(&rules, baseurl, media.as_ref(), &mut order);
        sheet
    }

    fn add_rules(
        &mut self,
        rules: &[Rule],
        baseurl: &str,
        media: Option<&MediaQueryListRef>,
        order: &mut u32,
    ) {
        for rule in rules {
            match rule {
                Rule::Qualified(qrule) => {
                    let mut style = Style::new();
                    for decl in &qrule.declarations {
                        style.add_declaration(
                            &decl.name,
                            &decl.value_text(),
                            baseurl,
                            decl.important,
                        );
                    }
                    let style = Rc::new(style);

                    for text in qrule.selector_strings() {
                        match SelectorChain::parse(&text) {
                            Some(chain) => {
                                let specificity = chain.calc_specificity();
                                self.selectors.push(Rc::new(Selector {
                                    chain,
                                    specificity,
                                    order: *order,
                                    style: Rc::clone(&style),
                                    media: media.map(Rc::clone),
                                }));
                                *order += 1;
                            }
                            None => {
                                warn_once("css", &format!("dropped selector '{text}'"));
                            }
                        }
                    }
                }
                Rule::At(at) => match at.name.as_str() {
                    "media" => {
                        let list = MediaQueryList::parse(&at.prelude_text());
                        // An unparsable prelude leaves the inner rules
                        // unconditional.
                        let inner_media = list.or_else(|| media.map(Rc::clone));
                        if let Some(list) = &inner_media {
                            if !self.media_lists.iter().any(|m| Rc::ptr_eq(m, list)) {
                                self.media_lists.push(Rc::clone(list));
                            }
                        }
                        if let Some(block) = &at.block {
                            let inner = parse_rules_from_tokens(block);
                            self.add_rules(&inner, baseurl, inner_media.as_ref(), order);
                        }
                    }
                    "import" => {
                        let prelude = at.prelude_text();
                        let mut parts = prelude.splitn(2, char::is_whitespace);
                        let url_part = parts.next().unwrap_or("");
                        let media_part = parts.next().unwrap_or("").trim().to_string();
                        let url = parse_css_url(url_part);
                        if !url.is_empty() {
                            self.imports.push(ImportRule {
                                url,
                                media: media_part,
                            });
                        }
                    }
                    other => {
                        warn_once("css", &format!("unsupported at-rule '@{other}'"));
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::CssProperty;

    #[test]
    fn selectors_share_one_style_block() {
        let sheet = Stylesheet::parse("h1, h2 { color: red }", "", None);
        assert_eq!(sheet.selectors.len(), 2);
        assert!(Rc::ptr_eq(
            &sheet.selectors[0].style,
            &sheet.selectors[1].style
        ));
        assert!(sheet.selectors[0]
            .style
            .get(CssProperty::Color)
            .is_some());
        assert_eq!(sheet.selectors[0].order, 0);
        assert_eq!(sheet.selectors[1].order, 1);
    }

    #[test]
    fn media_block_gates_inner_selectors() {
        let sheet = Stylesheet::parse(
            "@media screen and (min-width: 100px) { p { color: red } } div { color: blue }",
            "",
            None,
        );
        assert_eq!(sheet.selectors.len(), 2);
        assert!(sheet.selectors[0].media.is_some());
        assert!(sheet.selectors[1].media.is_none());
        assert_eq!(sheet.media_lists.len(), 1);
    }

    #[test]
    fn imports_are_surfaced() {
        let sheet = Stylesheet::parse("@import url(\"extra.css\") screen;", "", None);
        assert_eq!(
            sheet.imports,
            vec![ImportRule {
                url: "extra.css".to_string(),
                media: "screen".to_string()
            }]
        );
    }
}
