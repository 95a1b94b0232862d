//! CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! The token set is the subset the engine consumes: there are no
//! dimension or percentage tokens — a unit trails its number as a
//! separate ident token and `%` as a delim — and the `<hash-token>`
//! type flag is omitted (recorded but never used upstream).

use core::fmt;

/// A CSS token.
#[derive(Debug, Clone, PartialEq)]
pub enum CssToken {
    /// "<whitespace-token>" — one or more whitespace code points.
    Whitespace,
    /// "<ident-token>"
    Ident(String),
    /// "<function-token>" — an ident immediately followed by `(`.
    Function(String),
    /// "<at-keyword-token>" — `@` followed by an ident sequence.
    AtKeyword(String),
    /// "<hash-token>" — `#` followed by name code points.
    Hash(String),
    /// "<string-token>"
    String(String),
    /// "<bad-string-token>" — a string with a raw newline inside.
    BadString,
    /// "<url-token>" — the unquoted `url(...)` form.
    Url(String),
    /// "<bad-url-token>"
    BadUrl,
    /// "<number-token>" with an integer-vs-real type flag.
    Number {
        /// The numeric value.
        value: f32,
        /// True when the source had no fractional part.
        integer: bool,
    },
    /// "<delim-token>" — a single code point.
    Delim(char),
    /// "<comma-token>"
    Comma,
    /// "<colon-token>"
    Colon,
    /// "<semicolon-token>"
    Semicolon,
    /// "<CDO-token>" — `<!--`.
    Cdo,
    /// "<CDC-token>" — `-->`.
    Cdc,
    /// "<[-token>"
    LeftBracket,
    /// "<]-token>"
    RightBracket,
    /// "<{-token>"
    LeftBrace,
    /// "<}-token>"
    RightBrace,
    /// "<(-token>"
    LeftParen,
    /// "<)-token>"
    RightParen,
    /// End of input. Always the final token of a tokenizer run.
    Eof,
}

impl CssToken {
    /// True for the EOF token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, CssToken::Eof)
    }

    /// True for the whitespace token.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self, CssToken::Whitespace)
    }

    /// Serialize this token back to a canonical textual form.
    ///
    /// Used to regenerate declaration values and selector preludes into
    /// the string form the style store and selector parser consume.
    /// Whitespace runs collapse to a single space.
    pub fn write_canonical(&self, out: &mut String) {
        match self {
            CssToken::Whitespace => out.push(' '),
            CssToken::Ident(v) => out.push_str(v),
            CssToken::Function(v) => {
                out.push_str(v);
                out.push('(');
            }
            CssToken::AtKeyword(v) => {
                out.push('@');
                out.push_str(v);
            }
            CssToken::Hash(v) => {
                out.push('#');
                out.push_str(v);
            }
            CssToken::String(v) => {
                out.push('"');
                out.push_str(v);
                out.push('"');
            }
            CssToken::BadString | CssToken::BadUrl | CssToken::Eof => {}
            CssToken::Url(v) => {
                out.push_str("url(");
                out.push_str(v);
                out.push(')');
            }
            CssToken::Number { value, integer } => {
                if *integer {
                    out.push_str(&format!("{}", *value as i64));
                } else {
                    out.push_str(&format_number(*value));
                }
            }
            CssToken::Delim(c) => out.push(*c),
            CssToken::Comma => out.push(','),
            CssToken::Colon => out.push(':'),
            CssToken::Semicolon => out.push(';'),
            CssToken::Cdo => out.push_str("<!--"),
            CssToken::Cdc => out.push_str("-->"),
            CssToken::LeftBracket => out.push('['),
            CssToken::RightBracket => out.push(']'),
            CssToken::LeftBrace => out.push('{'),
            CssToken::RightBrace => out.push('}'),
            CssToken::LeftParen => out.push('('),
            CssToken::RightParen => out.push(')'),
        }
    }
}

/// Format a real number without a trailing `.0` and without exponents.
fn format_number(value: f32) -> String {
    let s = format!("{value}");
    if let Some(stripped) = s.strip_suffix(".0") {
        stripped.to_string()
    } else {
        s
    }
}

impl fmt::Display for CssToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.write_canonical(&mut s);
        match self {
            CssToken::Whitespace => write!(f, "<whitespace>"),
            CssToken::BadString => write!(f, "<bad-string>"),
            CssToken::BadUrl => write!(f, "<bad-url>"),
            CssToken::Eof => write!(f, "<eof>"),
            _ => write!(f, "{s}"),
        }
    }
}
