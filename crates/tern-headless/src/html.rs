//! A host-side tag-soup HTML reader.
//!
//! The engine treats HTML parsing as an external collaborator: its only
//! requirement is a producer of nodes with tag names and an attribute
//! map in insertion order. This reader covers the documents the
//! headless driver renders — nesting by tag, void elements, comments,
//! raw text inside `<script>`/`<style>`, attribute quoting and a small
//! entity table. It is not a WHATWG parser and does not try to be.

use tern_dom::{NodeKind, NodeId, Tree};

/// Elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text up to the matching close tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "title", "textarea"];

/// Elements auto-closed by an opening tag of the same name.
const SELF_NESTING_CLOSERS: &[&str] = &["li", "p", "tr", "td", "th", "option", "dt", "dd"];

/// Parse an HTML string into an element tree; returns the tree and the
/// root element (an `<html>` element, synthesized when absent).
#[must_use]
pub fn parse_html(input: &str) -> (Tree, NodeId) {
    let mut tree = Tree::new();
    let root = tree.alloc_element("html");

    let chars: Vec<char> = input.chars().collect();
    let mut i = 0usize;
    let mut stack: Vec<NodeId> = vec![root];
    let mut saw_html = false;

    while i < chars.len() {
        if chars[i] == '<' {
            // Comment?
            if chars[i + 1..].starts_with(&['!', '-', '-']) {
                let start = (i + 4).min(chars.len());
                let end = find_seq(&chars, start, &['-', '-', '>']).unwrap_or(chars.len());
                let text: String = chars[start..end].iter().collect();
                let comment = tree.alloc(NodeKind::Comment(text));
                tree.append_child(*stack.last().unwrap(), comment);
                i = (end + 3).min(chars.len());
                continue;
            }
            // Doctype / processing instruction: skip to '>'.
            if chars.get(i + 1) == Some(&'!') || chars.get(i + 1) == Some(&'?') {
                i = find_char(&chars, i, '>').map_or(chars.len(), |p| p + 1);
                continue;
            }
            // Close tag.
            if chars.get(i + 1) == Some(&'/') {
                let end = find_char(&chars, i, '>').unwrap_or(chars.len());
                let name: String = chars[i + 2..end.min(chars.len())]
                    .iter()
                    .collect::<String>()
                    .trim()
                    .to_ascii_lowercase();
                // Pop to the matching open element, tolerating strays.
                if let Some(depth) = stack.iter().rposition(|&id| {
                    tree.as_element(id).is_some_and(|e| e.tag == name)
                }) {
                    if depth > 0 {
                        stack.truncate(depth);
                    }
                }
                i = end + 1;
                continue;
            }

            // Open tag.
            let (name, attrs, self_closed, next) = parse_open_tag(&chars, i);
            if name.is_empty() {
                // Stray '<': literal text.
                push_text(&mut tree, *stack.last().unwrap(), "<");
                i += 1;
                continue;
            }
            i = next;

            if name == "html" && saw_html {
                continue;
            }
            let el = if name == "html" {
                saw_html = true;
                for (k, v) in attrs {
                    tree.set_attr(root, &k, &v);
                }
                stack.truncate(1);
                continue;
            } else {
                // Auto-close a same-name sibling scope (li, p, td, ...).
                if SELF_NESTING_CLOSERS.contains(&name.as_str()) {
                    if let Some(depth) = stack.iter().rposition(|&id| {
                        tree.as_element(id).is_some_and(|e| e.tag == name)
                    }) {
                        if depth > 0 {
                            stack.truncate(depth);
                        }
                    }
                }
                let el = tree.alloc_element(&name);
                for (k, v) in attrs {
                    tree.set_attr(el, &k, &v);
                }
                tree.append_child(*stack.last().unwrap(), el);
                el
            };

            let void = VOID_ELEMENTS.contains(&name.as_str()) || self_closed;
            if !void {
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    // Raw text up to the close tag.
                    let close: Vec<char> = format!("</{name}").chars().collect();
                    let end = find_seq(&chars, i, &close).unwrap_or(chars.len());
                    let raw: String = chars[i..end].iter().collect();
                    if !raw.is_empty() {
                        let text = tree.alloc(NodeKind::Text(raw));
                        tree.append_child(el, text);
                    }
                    i = find_char(&chars, end, '>').map_or(chars.len(), |p| p + 1);
                } else {
                    stack.push(el);
                }
            }
        } else {
            let end = find_char(&chars, i, '<').unwrap_or(chars.len());
            let text: String = chars[i..end].iter().collect();
            push_text(&mut tree, *stack.last().unwrap(), &text);
            i = end;
        }
    }

    (tree, root)
}

fn push_text(tree: &mut Tree, parent: NodeId, raw: &str) {
    let decoded = decode_entities(raw);
    if !decoded.is_empty() {
        tree.append_text(parent, &decoded);
    }
}

fn find_char(chars: &[char], from: usize, needle: char) -> Option<usize> {
    chars[from..].iter().position(|&c| c == needle).map(|p| from + p)
}

fn find_seq(chars: &[char], from: usize, needle: &[char]) -> Option<usize> {
    if needle.is_empty() || chars.len() < needle.len() {
        return None;
    }
    (from..=chars.len() - needle.len()).find(|&p| {
        chars[p..p + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}

/// Parse `<name attr="v" ...>` starting at the `<`; returns
/// (name, attrs, self_closed, index-past-`>`).
fn parse_open_tag(chars: &[char], open: usize) -> (String, Vec<(String, String)>, bool, usize) {
    let mut i = open + 1;
    let mut name = String::new();
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '-') {
        name.push(chars[i].to_ascii_lowercase());
        i += 1;
    }
    if name.is_empty() {
        return (String::new(), Vec::new(), false, open + 1);
    }

    let mut attrs = Vec::new();
    let mut self_closed = false;
    loop {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        match chars.get(i) {
            None => break,
            Some('>') => {
                i += 1;
                break;
            }
            Some('/') => {
                self_closed = true;
                i += 1;
            }
            Some(_) => {
                let mut key = String::new();
                while i < chars.len()
                    && !chars[i].is_whitespace()
                    && chars[i] != '='
                    && chars[i] != '>'
                    && chars[i] != '/'
                {
                    key.push(chars[i]);
                    i += 1;
                }
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                let mut value = String::new();
                if chars.get(i) == Some(&'=') {
                    i += 1;
                    while i < chars.len() && chars[i].is_whitespace() {
                        i += 1;
                    }
                    match chars.get(i) {
                        Some(&q) if q == '"' || q == '\'' => {
                            i += 1;
                            while i < chars.len() && chars[i] != q {
                                value.push(chars[i]);
                                i += 1;
                            }
                            i += 1;
                        }
                        _ => {
                            while i < chars.len()
                                && !chars[i].is_whitespace()
                                && chars[i] != '>'
                            {
                                value.push(chars[i]);
                                i += 1;
                            }
                        }
                    }
                }
                if !key.is_empty() {
                    attrs.push((key, decode_entities(&value)));
                }
            }
        }
    }
    (name, attrs, self_closed, i)
}

/// The handful of entities real pages actually use, plus numeric forms.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '&' {
            if let Some(semi) = chars[i + 1..].iter().take(10).position(|&c| c == ';') {
                let entity: String = chars[i + 1..i + 1 + semi].iter().collect();
                let decoded = match entity.as_str() {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    "copy" => Some('©'),
                    "mdash" => Some('—'),
                    "ndash" => Some('–'),
                    _ => entity
                        .strip_prefix("#x")
                        .or_else(|| entity.strip_prefix("#X"))
                        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                        .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                        .and_then(char::from_u32),
                };
                if let Some(c) = decoded {
                    out.push(c);
                    i += semi + 2;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_structure() {
        let (tree, root) = parse_html("<html><body><p id=\"x\">hi</p></body></html>");
        assert_eq!(tree.as_element(root).unwrap().tag, "html");
        let body = tree.children(root)[0];
        assert_eq!(tree.as_element(body).unwrap().tag, "body");
        let p = tree.children(body)[0];
        assert_eq!(tree.attr(p, "id"), Some("x"));
        assert_eq!(tree.text_content(p), "hi");
    }

    #[test]
    fn void_and_self_closing() {
        let (tree, root) = parse_html("<body><br><img src=a.png/><p>t</p></body>");
        let body = tree.children(root)[0];
        let kids = tree.children(body);
        assert_eq!(tree.as_element(kids[0]).unwrap().tag, "br");
        assert_eq!(tree.as_element(kids[1]).unwrap().tag, "img");
        assert_eq!(tree.as_element(kids[2]).unwrap().tag, "p");
    }

    #[test]
    fn li_auto_close() {
        let (tree, root) = parse_html("<ul><li>a<li>b<li>c</ul>");
        let ul = tree.children(root)[0];
        let lis: Vec<_> = tree
            .children(ul)
            .iter()
            .filter(|&&c| tree.as_element(c).is_some())
            .collect();
        assert_eq!(lis.len(), 3);
    }

    #[test]
    fn style_is_raw_text() {
        let (tree, root) = parse_html("<style>p > a { color: red }</style>");
        let style = tree.children(root)[0];
        assert_eq!(tree.text_content(style), "p > a { color: red }");
    }

    #[test]
    fn entities_decode() {
        let (tree, root) = parse_html("<p>a &amp; b &#65;</p>");
        let p = tree.children(root)[0];
        assert_eq!(tree.text_content(p), "a & b A");
    }
}
