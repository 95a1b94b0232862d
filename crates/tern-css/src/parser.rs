//! CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the
//! tokenization stage." The parser groups tokens into rules and
//! declarations; it never fails — malformed declarations are dropped
//! and malformed rules are skipped to the next balanced block.
//!
//! Declaration values and rule preludes are kept as raw material
//! (component values / token slices) and regenerated into canonical
//! strings where the style store and selector parser expect text.

use crate::tokenizer::{tokenize, CssToken};

/// [§ 5.3.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-a-component-value)
///
/// A component value is a preserved token, a `{}`/`[]`/`()` block, or a
/// function with argument component values.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(CssToken),
    /// A simple block with its opening character.
    Block {
        /// The opening token character: `{`, `[` or `(`.
        open: char,
        /// The block contents.
        values: Vec<ComponentValue>,
    },
    /// A function and its argument component values.
    Function {
        /// The function name (without the parenthesis).
        name: String,
        /// The argument component values.
        values: Vec<ComponentValue>,
    },
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A property declaration, e.g. `color: red !important`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, lower-cased.
    pub name: String,
    /// The value component values (with `!important` stripped).
    pub value: Vec<ComponentValue>,
    /// Whether the declaration carried `!important`.
    pub important: bool,
}

impl Declaration {
    /// Regenerate the declaration value into a canonical string.
    #[must_use]
    pub fn value_text(&self) -> String {
        regenerate(&self.value)
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRule {
    /// The raw prelude tokens (the selector list).
    pub prelude: Vec<CssToken>,
    /// The declarations of the rule block.
    pub declarations: Vec<Declaration>,
}

impl QualifiedRule {
    /// Split the prelude on top-level commas into selector strings.
    #[must_use]
    pub fn selector_strings(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut current = String::new();
        for token in &self.prelude {
            if matches!(token, CssToken::Comma) {
                let text = current.trim().to_string();
                if !text.is_empty() {
                    out.push(text);
                }
                current.clear();
            } else {
                token.write_canonical(&mut current);
            }
        }
        let text = current.trim().to_string();
        if !text.is_empty() {
            out.push(text);
        }
        out
    }
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword name without the `@`, lower-cased.
    pub name: String,
    /// The prelude tokens.
    pub prelude: Vec<CssToken>,
    /// The raw block tokens (nesting preserved), when a block followed.
    pub block: Option<Vec<CssToken>>,
}

impl AtRule {
    /// Regenerate the prelude into a canonical string.
    #[must_use]
    pub fn prelude_text(&self) -> String {
        let mut out = String::new();
        for token in &self.prelude {
            token.write_canonical(&mut out);
        }
        out.trim().to_string()
    }
}

/// A rule: qualified (selectors + declarations) or at-rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A style rule.
    Qualified(QualifiedRule),
    /// An at-rule (`@media`, `@import`, ...).
    At(AtRule),
}

/// Parse a stylesheet's rule list from text.
#[must_use]
pub fn parse_rules_from_text(text: &str) -> Vec<Rule> {
    let tokens = tokenize(text);
    Parser::new(&tokens).consume_rules(true)
}

/// Parse a list of rules from raw tokens (used for `@media` blocks).
#[must_use]
pub fn parse_rules_from_tokens(tokens: &[CssToken]) -> Vec<Rule> {
    Parser::new(tokens).consume_rules(false)
}

/// Parse a declaration list from text (`style="..."` attributes).
#[must_use]
pub fn parse_declarations_from_text(text: &str) -> Vec<Declaration> {
    let tokens = tokenize(text);
    Parser::new(&tokens).consume_declaration_list()
}

/// Regenerate component values into a canonical string.
///
/// Numbers re-print without trailing zeros, whitespace runs collapse to
/// one space, functions and blocks re-balance. This bridges the token
/// world to the string-keyed style store.
#[must_use]
pub fn regenerate(values: &[ComponentValue]) -> String {
    let mut out = String::new();
    write_components(values, &mut out);
    out.trim().to_string()
}

fn write_components(values: &[ComponentValue], out: &mut String) {
    for value in values {
        match value {
            ComponentValue::Token(token) => token.write_canonical(out),
            ComponentValue::Block { open, values } => {
                let (open_c, close_c) = match open {
                    '[' => ('[', ']'),
                    '(' => ('(', ')'),
                    _ => ('{', '}'),
                };
                out.push(open_c);
                write_components(values, out);
                out.push(close_c);
            }
            ComponentValue::Function { name, values } => {
                out.push_str(name);
                out.push('(');
                write_components(values, out);
                out.push(')');
            }
        }
    }
}

struct Parser<'a> {
    tokens: &'a [CssToken],
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CssToken]) -> Self {
        Self { tokens, position: 0 }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_rules(&mut self, top_level: bool) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            match self.peek() {
                None | Some(CssToken::Eof) => return rules,
                Some(CssToken::Whitespace) => {
                    self.consume();
                }
                // "<CDO-token>/<CDC-token>: if the top-level flag is set,
                // do nothing; otherwise reconsume and consume a
                // qualified rule."
                Some(CssToken::Cdo | CssToken::Cdc) => {
                    if top_level {
                        self.consume();
                    } else if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Qualified(rule));
                    }
                }
                Some(CssToken::AtKeyword(_)) => {
                    if let Some(rule) = self.consume_at_rule() {
                        rules.push(Rule::At(rule));
                    }
                }
                Some(CssToken::RightBrace) => {
                    // Stray close brace inside a nested rule list ends it.
                    if top_level {
                        self.consume();
                    } else {
                        return rules;
                    }
                }
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Qualified(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Option<AtRule> {
        let name = match self.consume() {
            Some(CssToken::AtKeyword(name)) => name.to_ascii_lowercase(),
            _ => return None,
        };

        let mut prelude = Vec::new();
        loop {
            match self.peek() {
                Some(CssToken::Semicolon) => {
                    self.consume();
                    return Some(AtRule { name, prelude, block: None });
                }
                None | Some(CssToken::Eof) => {
                    return Some(AtRule { name, prelude, block: None });
                }
                Some(CssToken::LeftBrace) => {
                    let block = self.consume_raw_block();
                    return Some(AtRule {
                        name,
                        prelude,
                        block: Some(block),
                    });
                }
                Some(_) => {
                    prelude.push(self.consume().unwrap().clone());
                }
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Option<QualifiedRule> {
        let mut prelude = Vec::new();
        loop {
            match self.peek() {
                // Parse error: EOF before a block; the rule is dropped.
                None | Some(CssToken::Eof) => return None,
                Some(CssToken::LeftBrace) => {
                    self.consume();
                    let declarations = self.consume_declaration_list();
                    if self.peek() == Some(&CssToken::RightBrace) {
                        self.consume();
                    }
                    return Some(QualifiedRule { prelude, declarations });
                }
                Some(_) => {
                    prelude.push(self.consume().unwrap().clone());
                }
            }
        }
    }

    /// Consume a `{}` block keeping the raw token stream (nesting
    /// preserved, outer braces stripped). At-rule blocks are re-parsed
    /// later by the stylesheet layer.
    fn consume_raw_block(&mut self) -> Vec<CssToken> {
        debug_assert_eq!(self.peek(), Some(&CssToken::LeftBrace));
        self.consume();
        let mut depth = 1usize;
        let mut out = Vec::new();
        loop {
            match self.consume() {
                None | Some(CssToken::Eof) => return out,
                Some(CssToken::LeftBrace) => {
                    depth += 1;
                    out.push(CssToken::LeftBrace);
                }
                Some(CssToken::RightBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        return out;
                    }
                    out.push(CssToken::RightBrace);
                }
                Some(token) => out.push(token.clone()),
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    fn consume_declaration_list(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            match self.peek() {
                Some(CssToken::Whitespace | CssToken::Semicolon) => {
                    self.consume();
                }
                None | Some(CssToken::Eof) | Some(CssToken::RightBrace) => {
                    return declarations;
                }
                // At-rules inside declaration lists are consumed and
                // discarded.
                Some(CssToken::AtKeyword(_)) => {
                    let _ = self.consume_at_rule();
                }
                Some(CssToken::Ident(_)) => {
                    if let Some(decl) = self.consume_declaration() {
                        declarations.push(decl);
                    }
                }
                // Parse error: discard component values up to the next
                // semicolon or block end.
                Some(_) => {
                    self.consume();
                    while !matches!(
                        self.peek(),
                        None | Some(CssToken::Eof)
                            | Some(CssToken::Semicolon)
                            | Some(CssToken::RightBrace)
                    ) {
                        let _ = self.consume_component_value();
                    }
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Option<Declaration> {
        let name = match self.consume() {
            Some(CssToken::Ident(name)) => name.to_ascii_lowercase(),
            _ => return None,
        };

        while self.peek() == Some(&CssToken::Whitespace) {
            self.consume();
        }
        // "If the next input token is anything other than a
        // <colon-token>, this is a parse error. Return nothing."
        if self.peek() != Some(&CssToken::Colon) {
            self.skip_to_declaration_end();
            return None;
        }
        self.consume();
        while self.peek() == Some(&CssToken::Whitespace) {
            self.consume();
        }

        let mut value = Vec::new();
        while !matches!(
            self.peek(),
            None | Some(CssToken::Eof) | Some(CssToken::Semicolon) | Some(CssToken::RightBrace)
        ) {
            if let Some(v) = self.consume_component_value() {
                value.push(v);
            }
        }

        let important = strip_important(&mut value);
        trim_trailing_whitespace(&mut value);
        if value.is_empty() {
            return None;
        }

        Some(Declaration { name, value, important })
    }

    fn skip_to_declaration_end(&mut self) {
        while !matches!(
            self.peek(),
            None | Some(CssToken::Eof) | Some(CssToken::Semicolon) | Some(CssToken::RightBrace)
        ) {
            let _ = self.consume_component_value();
        }
    }

    /// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> Option<ComponentValue> {
        match self.peek() {
            Some(CssToken::LeftBrace | CssToken::LeftBracket | CssToken::LeftParen) => {
                let open = match self.peek() {
                    Some(CssToken::LeftBracket) => '[',
                    Some(CssToken::LeftParen) => '(',
                    _ => '{',
                };
                let values = self.consume_simple_block();
                Some(ComponentValue::Block { open, values })
            }
            Some(CssToken::Function(_)) => {
                let name = match self.consume() {
                    Some(CssToken::Function(name)) => name.clone(),
                    _ => return None,
                };
                let mut values = Vec::new();
                loop {
                    match self.peek() {
                        Some(CssToken::RightParen) => {
                            self.consume();
                            break;
                        }
                        None | Some(CssToken::Eof) => break,
                        Some(_) => {
                            if let Some(v) = self.consume_component_value() {
                                values.push(v);
                            }
                        }
                    }
                }
                Some(ComponentValue::Function { name, values })
            }
            Some(_) => {
                let token = self.consume()?.clone();
                Some(ComponentValue::Token(token))
            }
            None => None,
        }
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    fn consume_simple_block(&mut self) -> Vec<ComponentValue> {
        let closing = match self.consume() {
            Some(CssToken::LeftBrace) => CssToken::RightBrace,
            Some(CssToken::LeftBracket) => CssToken::RightBracket,
            Some(CssToken::LeftParen) => CssToken::RightParen,
            _ => return Vec::new(),
        };
        let mut values = Vec::new();
        loop {
            match self.peek() {
                Some(token) if *token == closing => {
                    self.consume();
                    return values;
                }
                None | Some(CssToken::Eof) => return values,
                Some(_) => {
                    if let Some(v) = self.consume_component_value() {
                        values.push(v);
                    }
                }
            }
        }
    }

    fn consume(&mut self) -> Option<&CssToken> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn peek(&self) -> Option<&CssToken> {
        self.tokens.get(self.position)
    }
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if the last two (non-whitespace)
/// tokens in its value are a <delim-token> with the value `!` followed
/// by an <ident-token> matching `important`." Strips the annotation
/// when found.
fn strip_important(value: &mut Vec<ComponentValue>) -> bool {
    trim_trailing_whitespace(value);

    let important_at = match value.last() {
        Some(ComponentValue::Token(CssToken::Ident(s))) if s.eq_ignore_ascii_case("important") => {
            value.len() - 1
        }
        _ => return false,
    };

    // Look backwards over optional whitespace for the `!` delim.
    let mut i = important_at;
    while i > 0 {
        i -= 1;
        match &value[i] {
            ComponentValue::Token(CssToken::Whitespace) => continue,
            ComponentValue::Token(CssToken::Delim('!')) => {
                value.truncate(i);
                trim_trailing_whitespace(value);
                return true;
            }
            _ => return false,
        }
    }
    false
}

fn trim_trailing_whitespace(value: &mut Vec<ComponentValue>) {
    while matches!(
        value.last(),
        Some(ComponentValue::Token(CssToken::Whitespace))
    ) {
        value.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_with_important() {
        let decls = parse_declarations_from_text("color: red !important; width: 10px");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "color");
        assert!(decls[0].important);
        assert_eq!(decls[0].value_text(), "red");
        assert!(!decls[1].important);
        assert_eq!(decls[1].value_text(), "10px");
    }

    #[test]
    fn malformed_declaration_is_dropped() {
        let decls = parse_declarations_from_text("color red; background: blue");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "background");
    }

    #[test]
    fn selector_strings_split_on_commas() {
        let rules = parse_rules_from_text("h1, h2 > em { color: red }");
        let Rule::Qualified(rule) = &rules[0] else {
            panic!("expected qualified rule");
        };
        assert_eq!(rule.selector_strings(), vec!["h1", "h2 > em"]);
    }

    #[test]
    fn at_rule_block_is_raw_tokens() {
        let rules = parse_rules_from_text("@media screen { p { color: red } }");
        let Rule::At(at) = &rules[0] else {
            panic!("expected at-rule");
        };
        assert_eq!(at.name, "media");
        assert_eq!(at.prelude_text(), "screen");
        let inner = parse_rules_from_tokens(at.block.as_ref().unwrap());
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn unbalanced_rule_recovers() {
        let rules = parse_rules_from_text("p { color: red; } } div { width: 1px }");
        assert_eq!(rules.len(), 2);
    }
}
