//! CSS front end for the tern rendering engine.
//!
//! # Scope
//!
//! - **Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)) —
//!   table-driven ASCII classification, the full token set minus
//!   dimension/percentage tokens (units trail as idents), no exponent
//!   parsing.
//! - **Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)) —
//!   rules, at-rules, declarations, component values; total on any
//!   input.
//! - **Selectors** ([Selectors L4](https://www.w3.org/TR/selectors-4/)) —
//!   compound chains with combinators, specificity, bitmask matching
//!   with deferred dynamic pseudo-classes and ::before/::after routing.
//! - **Property table** — one declarative description of every
//!   property: name, default, inherited flag, value type, keywords.
//! - **Style store** — longhand-only typed values; shorthands expand at
//!   insertion; importance-aware merge.
//! - **Media queries** — evaluated against host-reported features.
//!
//! Layout and painting live in `tern-engine`; this crate is pure data
//! transformation over the `tern-dom` tree.

pub mod color;
pub mod keywords;
pub mod length;
pub mod media;
pub mod parser;
pub mod property;
pub mod selector;
pub mod style;
pub mod stylesheet;
pub mod tokenizer;
pub mod value;

pub use color::Color;
pub use length::{CssLength, CssUnit};
pub use media::{MediaFeatures, MediaQuery, MediaQueryList, MediaQueryListRef, MediaType};
pub use parser::{
    parse_declarations_from_text, parse_rules_from_text, regenerate, ComponentValue, Declaration,
    Rule,
};
pub use property::{CssProperty, PropertyMeta, ValueType};
pub use selector::{
    select, select_component, MatchContext, MatchFlags, Selector, SelectorChain,
    SelectorComponent, Specificity,
};
pub use style::{parse_css_url, Style};
pub use stylesheet::{ImportRule, Stylesheet};
pub use tokenizer::{tokenize, CssToken};
pub use value::{CssValue, CssValueKind};
