//! CSS tokenizer per [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms).
//!
//! The tokenizer walks the input with one or two code points of
//! lookahead and no backtracking. ASCII classification is table-driven:
//! each character class is a 128-entry bit lookup packed into four
//! `u32` words; non-ASCII code points are accepted as name characters.
//!
//! Deliberate limitations, preserved from the reference implementation:
//! numbers carry no exponent part, and escape sequences take the next
//! code point literally (no hex form) — input is never dropped.

use super::token::CssToken;

/// Test a 128-entry bit table against an ASCII code point.
///
/// Bit `c` of the table (word `c >> 5`, bit `c & 31`) is set when the
/// character belongs to the class.
fn lookup(table: &[u32; 4], c: char) -> bool {
    let c = c as u32;
    if c >= 128 {
        return false;
    }
    table[(c >> 5) as usize] & (1 << (c & 31)) != 0
}

/// [§ 4.2 digit](https://www.w3.org/TR/css-syntax-3/#digit) — `0`–`9`.
const DIGIT_LOOKUP: [u32; 4] = [0x0000_0000, 0x03FF_0000, 0x0000_0000, 0x0000_0000];

/// [§ 4.2 hex digit](https://www.w3.org/TR/css-syntax-3/#hex-digit) —
/// digits plus `A`–`F`, `a`–`f`.
const HEX_LOOKUP: [u32; 4] = [0x0000_0000, 0x03FF_0000, 0x0000_007E, 0x0000_007E];

/// [§ 4.2 newline](https://www.w3.org/TR/css-syntax-3/#newline) —
/// LF, FF, CR.
const NEWLINE_LOOKUP: [u32; 4] = [0x0000_3400, 0x0000_0000, 0x0000_0000, 0x0000_0000];

/// [§ 4.2 whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace) —
/// newline, TAB, SPACE.
const WHITESPACE_LOOKUP: [u32; 4] = [0x0000_3600, 0x0000_0001, 0x0000_0000, 0x0000_0000];

/// [§ 4.2 name-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point) —
/// letters and `_` (non-ASCII handled separately).
const NAME_START_LOOKUP: [u32; 4] = [0x0000_0000, 0x0000_0000, 0x87FF_FFFE, 0x07FF_FFFE];

/// [§ 4.2 name code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point) —
/// name-start plus digits and `-`.
const NAME_LOOKUP: [u32; 4] = [0x0000_0000, 0x03FF_2000, 0x87FF_FFFE, 0x07FF_FFFE];

/// [§ 4.2 non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point).
const NON_PRINTABLE_LOOKUP: [u32; 4] = [0xFFFF_C9FF, 0x0000_0000, 0x0000_0000, 0x8000_0000];

/// True for a digit code point.
pub(crate) fn is_digit(c: char) -> bool {
    lookup(&DIGIT_LOOKUP, c)
}

/// True for a hex digit code point.
///
/// Not consulted by the literal-form escape path.
#[allow(dead_code)]
pub(crate) fn is_hex_digit(c: char) -> bool {
    lookup(&HEX_LOOKUP, c)
}

/// True for a newline code point.
pub(crate) fn is_newline(c: char) -> bool {
    lookup(&NEWLINE_LOOKUP, c)
}

/// True for a whitespace code point.
pub(crate) fn is_whitespace(c: char) -> bool {
    lookup(&WHITESPACE_LOOKUP, c)
}

/// True for a name-start code point (non-ASCII included).
pub(crate) fn is_name_start(c: char) -> bool {
    !c.is_ascii() || lookup(&NAME_START_LOOKUP, c)
}

/// True for a name code point (non-ASCII included).
pub(crate) fn is_name(c: char) -> bool {
    !c.is_ascii() || lookup(&NAME_LOOKUP, c)
}

/// True for a non-printable code point.
pub(crate) fn is_non_printable(c: char) -> bool {
    lookup(&NON_PRINTABLE_LOOKUP, c)
}

/// Tokenize `text` into a token stream ending in [`CssToken::Eof`].
///
/// Pure function of the input: no configuration, no state carried
/// between calls.
#[must_use]
pub fn tokenize(text: &str) -> Vec<CssToken> {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.consume_token();
        let eof = token.is_eof();
        tokens.push(token);
        if eof {
            break;
        }
    }
    tokens
}

/// The tokenizer state: input code points and a cursor.
struct Tokenizer {
    input: Vec<char>,
    position: usize,
}

impl Tokenizer {
    fn new(text: &str) -> Self {
        Self {
            input: text.chars().collect(),
            position: 0,
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CssToken {
        // "Consume comments."
        self.consume_comments();

        let c = match self.consume() {
            Some(c) => c,
            None => return CssToken::Eof,
        };

        match c {
            // "Consume as much whitespace as possible."
            c if is_whitespace(c) => {
                while self.peek().is_some_and(is_whitespace) {
                    self.consume();
                }
                CssToken::Whitespace
            }

            '"' | '\'' => self.consume_string_token(c),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                if self.peek().is_some_and(is_name) || self.is_valid_escape(self.peek(), self.peek_at(1)) {
                    // The hash type flag ("id" vs "unrestricted") is
                    // never consulted downstream and is not recorded.
                    let value = self.consume_name();
                    CssToken::Hash(value)
                } else {
                    CssToken::Delim('#')
                }
            }

            '(' => CssToken::LeftParen,
            ')' => CssToken::RightParen,
            '[' => CssToken::LeftBracket,
            ']' => CssToken::RightBracket,
            '{' => CssToken::LeftBrace,
            '}' => CssToken::RightBrace,
            ',' => CssToken::Comma,
            ':' => CssToken::Colon,
            ';' => CssToken::Semicolon,

            // "U+002B PLUS SIGN (+)"
            '+' => {
                if self.would_start_number(Some('+')) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CssToken::Delim('+')
                }
            }

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if self.would_start_number(Some('-')) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    self.consume();
                    self.consume();
                    CssToken::Cdc
                } else if self.would_start_ident(Some('-')) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CssToken::Delim('-')
                }
            }

            // "U+002E FULL STOP (.)"
            '.' => {
                if self.would_start_number(Some('.')) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CssToken::Delim('.')
                }
            }

            // "U+003C LESS-THAN SIGN (<)"
            '<' => {
                if self.peek() == Some('!') && self.peek_at(1) == Some('-') && self.peek_at(2) == Some('-') {
                    self.consume();
                    self.consume();
                    self.consume();
                    CssToken::Cdo
                } else {
                    CssToken::Delim('<')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                if self.would_start_ident(self.peek()) {
                    let value = self.consume_name();
                    CssToken::AtKeyword(value)
                } else {
                    CssToken::Delim('@')
                }
            }

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                if self.is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    // Parse error; the backslash becomes a delim.
                    CssToken::Delim('\\')
                }
            }

            c if is_digit(c) => {
                self.reconsume();
                self.consume_numeric_token()
            }

            c if is_name_start(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            c => CssToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.consume();
            self.consume();
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        self.consume();
                        break;
                    }
                    Some(_) => {}
                    None => break,
                }
            }
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Strings terminate at the opening quote character. A raw newline
    /// is a parse error and yields `<bad-string-token>`. `\` followed by
    /// a newline continues the string; any other escaped code point is
    /// taken literally.
    fn consume_string_token(&mut self, quote: char) -> CssToken {
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == quote => return CssToken::String(value),
                None => return CssToken::String(value),
                Some(c) if is_newline(c) => {
                    self.reconsume();
                    return CssToken::BadString;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some(c) if is_newline(c) => {
                        self.consume();
                    }
                    Some(c) => {
                        self.consume();
                        value.push(c);
                    }
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CssToken {
        let (value, integer) = self.consume_number();
        CssToken::Number { value, integer }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Sign, digits, optional fraction. The exponent branch of the spec
    /// is intentionally absent.
    fn consume_number(&mut self) -> (f32, bool) {
        let mut repr = String::new();
        let mut integer = true;

        if matches!(self.peek(), Some('+' | '-')) {
            repr.push(self.consume().unwrap());
        }
        while self.peek().is_some_and(is_digit) {
            repr.push(self.consume().unwrap());
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(is_digit) {
            repr.push(self.consume().unwrap());
            repr.push(self.consume().unwrap());
            integer = false;
            while self.peek().is_some_and(is_digit) {
                repr.push(self.consume().unwrap());
            }
        }

        // NOTE: no exponent parsing ("1e3" tokenizes as number 1,
        // ident "e3").

        (repr.parse().unwrap_or(0.0), integer)
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CssToken {
        let name = self.consume_name();

        if name.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            self.consume();
            while self.peek().is_some_and(is_whitespace) {
                self.consume();
            }
            // A quoted argument keeps the function form; the style store
            // reads the string component value from inside it.
            if matches!(self.peek(), Some('"' | '\'')) {
                CssToken::Function(name)
            } else {
                self.consume_url_token()
            }
        } else if self.peek() == Some('(') {
            self.consume();
            CssToken::Function(name)
        } else {
            CssToken::Ident(name)
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CssToken {
        let mut value = String::new();
        while self.peek().is_some_and(is_whitespace) {
            self.consume();
        }
        loop {
            match self.consume() {
                Some(')') | None => return CssToken::Url(value),
                Some(c) if is_whitespace(c) => {
                    while self.peek().is_some_and(is_whitespace) {
                        self.consume();
                    }
                    match self.peek() {
                        Some(')') => {
                            self.consume();
                            return CssToken::Url(value);
                        }
                        None => return CssToken::Url(value),
                        _ => {
                            self.consume_bad_url_remnants();
                            return CssToken::BadUrl;
                        }
                    }
                }
                Some(c) if c == '"' || c == '\'' || c == '(' || is_non_printable(c) => {
                    self.consume_bad_url_remnants();
                    return CssToken::BadUrl;
                }
                Some('\\') => {
                    if self.is_valid_escape(Some('\\'), self.peek()) {
                        if let Some(c) = self.consume() {
                            value.push(c);
                        }
                    } else {
                        self.consume_bad_url_remnants();
                        return CssToken::BadUrl;
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') => {
                    if self.is_valid_escape(Some('\\'), self.peek()) {
                        self.consume();
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// Escaped code points are taken literally: `\:` contributes `:`.
    fn consume_name(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.consume() {
                Some(c) if is_name(c) => result.push(c),
                Some('\\') if self.is_valid_escape(Some('\\'), self.peek()) => {
                    if let Some(c) = self.consume() {
                        result.push(c);
                    }
                }
                Some(_) => {
                    self.reconsume();
                    return result;
                }
                None => return result,
            }
        }
    }

    /// [§ 4.3.8 Valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn is_valid_escape(&self, first: Option<char>, second: Option<char>) -> bool {
        if first != Some('\\') {
            return false;
        }
        match second {
            Some(c) => !is_newline(c),
            None => false,
        }
    }

    /// [§ 4.3.9 Would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    ///
    /// `first` is the code point under consideration; lookahead starts
    /// at the current cursor.
    fn would_start_ident(&self, first: Option<char>) -> bool {
        match first {
            Some('-') => {
                let second = self.peek();
                second.is_some_and(is_name_start)
                    || second == Some('-')
                    || self.is_valid_escape(second, self.peek_at(1))
            }
            Some(c) if is_name_start(c) => true,
            Some('\\') => self.is_valid_escape(Some('\\'), self.peek()),
            _ => false,
        }
    }

    /// [§ 4.3.10 Would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    ///
    /// `first` is the already-consumed code point; lookahead starts at
    /// the current cursor.
    fn would_start_number(&self, first: Option<char>) -> bool {
        match first {
            Some('+' | '-') => {
                if self.peek().is_some_and(is_digit) {
                    return true;
                }
                self.peek() == Some('.') && self.peek_at(1).is_some_and(is_digit)
            }
            Some('.') => self.peek().is_some_and(is_digit),
            Some(c) if is_digit(c) => true,
            _ => false,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_tables_match_char_methods() {
        for c in (0u8..128).map(char::from) {
            assert_eq!(is_digit(c), c.is_ascii_digit(), "digit {c:?}");
            assert_eq!(is_hex_digit(c), c.is_ascii_hexdigit(), "hex {c:?}");
            assert_eq!(
                is_name_start(c),
                c.is_ascii_alphabetic() || c == '_',
                "name-start {c:?}"
            );
            assert_eq!(
                is_name(c),
                c.is_ascii_alphanumeric() || c == '_' || c == '-',
                "name {c:?}"
            );
            assert_eq!(
                is_whitespace(c),
                matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C'),
                "whitespace {c:?}"
            );
        }
    }

    #[test]
    fn no_exponent_parsing() {
        let tokens = tokenize("1e3");
        assert_eq!(
            tokens,
            vec![
                CssToken::Number { value: 1.0, integer: true },
                CssToken::Ident("e3".to_string()),
                CssToken::Eof,
            ]
        );
    }
}
