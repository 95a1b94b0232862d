//! Tokenizer integration tests per [CSS Syntax § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).

use tern_css::{tokenize, CssToken};

fn types_of(tokens: &[CssToken]) -> Vec<&'static str> {
    tokens
        .iter()
        .map(|t| match t {
            CssToken::Whitespace => "ws",
            CssToken::Ident(_) => "ident",
            CssToken::Function(_) => "function",
            CssToken::AtKeyword(_) => "at",
            CssToken::Hash(_) => "hash",
            CssToken::String(_) => "string",
            CssToken::BadString => "bad-string",
            CssToken::Url(_) => "url",
            CssToken::BadUrl => "bad-url",
            CssToken::Number { .. } => "number",
            CssToken::Delim(_) => "delim",
            CssToken::Comma => "comma",
            CssToken::Colon => "colon",
            CssToken::Semicolon => "semicolon",
            CssToken::Cdo => "cdo",
            CssToken::Cdc => "cdc",
            CssToken::LeftBracket => "[",
            CssToken::RightBracket => "]",
            CssToken::LeftBrace => "{",
            CssToken::RightBrace => "}",
            CssToken::LeftParen => "(",
            CssToken::RightParen => ")",
            CssToken::Eof => "eof",
        })
        .collect()
}

#[test]
fn simple_rule() {
    let tokens = tokenize("p { color: red; }");
    assert_eq!(
        types_of(&tokens),
        vec![
            "ident", "ws", "{", "ws", "ident", "colon", "ws", "ident", "semicolon", "ws", "}",
            "eof"
        ]
    );
}

#[test]
fn stream_always_ends_with_eof() {
    for input in ["", "   ", "p", "/* comment", "\"unterminated", "url(open"] {
        let tokens = tokenize(input);
        assert_eq!(tokens.last(), Some(&CssToken::Eof), "input {input:?}");
    }
}

#[test]
fn comments_are_discarded() {
    let tokens = tokenize("a/* comment */b");
    assert_eq!(
        tokens,
        vec![
            CssToken::Ident("a".to_string()),
            CssToken::Ident("b".to_string()),
            CssToken::Eof
        ]
    );
}

#[test]
fn numbers_keep_integer_flag() {
    let tokens = tokenize("10 2.5 -3 +4 .5");
    let numbers: Vec<(f32, bool)> = tokens
        .iter()
        .filter_map(|t| match t {
            CssToken::Number { value, integer } => Some((*value, *integer)),
            _ => None,
        })
        .collect();
    assert_eq!(
        numbers,
        vec![
            (10.0, true),
            (2.5, false),
            (-3.0, true),
            (4.0, true),
            (0.5, false)
        ]
    );
}

#[test]
fn dimension_is_number_plus_ident() {
    // No dimension tokens: the unit trails as an ident, `%` as a delim.
    let tokens = tokenize("10px 50%");
    assert_eq!(
        tokens,
        vec![
            CssToken::Number { value: 10.0, integer: true },
            CssToken::Ident("px".to_string()),
            CssToken::Whitespace,
            CssToken::Number { value: 50.0, integer: true },
            CssToken::Delim('%'),
            CssToken::Eof
        ]
    );
}

#[test]
fn hash_token() {
    let tokens = tokenize("#ff0000 #-x #");
    assert_eq!(tokens[0], CssToken::Hash("ff0000".to_string()));
    assert_eq!(tokens[2], CssToken::Hash("-x".to_string()));
    assert_eq!(tokens[4], CssToken::Delim('#'));
}

#[test]
fn strings_and_bad_strings() {
    assert_eq!(
        tokenize("\"hello\"")[0],
        CssToken::String("hello".to_string())
    );
    assert_eq!(tokenize("'it\\'s'")[0], CssToken::String("it's".to_string()));
    // Raw newline inside a string is a parse error.
    assert_eq!(tokenize("\"broken\nrest\"")[0], CssToken::BadString);
    // Escaped newline continues the string.
    assert_eq!(
        tokenize("\"two\\\nlines\"")[0],
        CssToken::String("twolines".to_string())
    );
}

#[test]
fn url_forms() {
    // Unquoted: a plain <url-token>.
    assert_eq!(
        tokenize("url(img/bg.png)")[0],
        CssToken::Url("img/bg.png".to_string())
    );
    // Surrounding whitespace is not part of the value.
    assert_eq!(
        tokenize("url(  spaced.png  )")[0],
        CssToken::Url("spaced.png".to_string())
    );
    // Quoted: function form, the string is a separate token.
    let tokens = tokenize("url(\"q.png\")");
    assert_eq!(tokens[0], CssToken::Function("url".to_string()));
    assert_eq!(tokens[1], CssToken::String("q.png".to_string()));
    // Interior whitespace followed by junk: bad URL.
    assert_eq!(tokenize("url(a b)")[0], CssToken::BadUrl);
}

#[test]
fn cdo_cdc() {
    let tokens = tokenize("<!-- p{} -->");
    assert_eq!(tokens[0], CssToken::Cdo);
    assert_eq!(tokens[tokens.len() - 2], CssToken::Cdc);
}

#[test]
fn at_keyword_and_function() {
    let tokens = tokenize("@media calc(1)");
    assert_eq!(tokens[0], CssToken::AtKeyword("media".to_string()));
    assert_eq!(tokens[2], CssToken::Function("calc".to_string()));
}

#[test]
fn ident_with_escape_keeps_input() {
    // Literal-form escape: the escaped code point is taken as-is.
    assert_eq!(tokenize("fo\\:o")[0], CssToken::Ident("fo:o".to_string()));
}

#[test]
fn negative_ident_and_cdc_disambiguation() {
    assert_eq!(tokenize("-moz-x")[0], CssToken::Ident("-moz-x".to_string()));
    assert_eq!(tokenize("-->")[0], CssToken::Cdc);
    assert_eq!(tokenize("- x")[0], CssToken::Delim('-'));
}

// Property: re-tokenizing a token's canonical form reproduces a token
// of identical type and value (modulo whitespace runs).
#[test]
fn canonical_form_round_trips() {
    let inputs = [
        "p .cls #id 10 2.5 50% \"str\" url(x.png) @media f( ) [ ] { } , : ; <!-- --> *",
        "div>span+em~i { margin: 1px 2px 3px 4px !important }",
    ];
    for input in inputs {
        let first = tokenize(input);
        let mut canonical = String::new();
        for token in &first {
            token.write_canonical(&mut canonical);
            canonical.push(' ');
        }
        let second = tokenize(&canonical);
        let a: Vec<&CssToken> = first.iter().filter(|t| !t.is_whitespace()).collect();
        let b: Vec<&CssToken> = second.iter().filter(|t| !t.is_whitespace()).collect();
        assert_eq!(a, b, "round trip failed for {input:?}");
    }
}
