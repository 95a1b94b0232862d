//! CSS selectors: model, string parser, specificity and matching.
//!
//! A full selector is a left-linked chain of compound selectors joined
//! by combinators. Matching walks the chain right-to-left against the
//! element tree and returns a bitmask: besides plain match/no-match it
//! reports "matches only if dynamic pseudo-classes hold" (the cascade
//! runs once ignoring them and once honouring them) and "the subject is
//! the generated ::before/::after child".

use std::rc::Rc;

use tern_dom::{NodeId, Tree};

use crate::media::MediaQueryListRef;
use crate::style::Style;

/// A predicate attached to a compound selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// `[attr]` — the attribute exists.
    Exists,
    /// `[attr=v]`, `.class` (class-list aware), `#id`.
    Equal,
    /// `[attr~=v]`, `[attr*=v]` — token/substring containment.
    ContainStr,
    /// `[attr|=v]`, `[attr^=v]` — prefix match.
    StartStr,
    /// `[attr$=v]` — suffix match.
    EndStr,
    /// `:name` or `:name(args)`.
    PseudoClass,
    /// `::before` / `::after` (and the legacy one-colon forms).
    PseudoElement,
}

/// One attribute/pseudo predicate of a compound selector.
#[derive(Debug, Clone)]
pub struct AttributeCondition {
    /// Attribute name (`class`, `id`, `pseudo`, ...), lower-case.
    pub attribute: String,
    /// The predicate kind.
    pub condition: Condition,
    /// The comparison value (pseudo name + arguments for pseudos).
    pub value: String,
    /// For `class` equality: the value split on whitespace.
    pub class_list: Vec<String>,
}

/// [Compound selector](https://www.w3.org/TR/selectors-4/#compound):
/// a tag (empty or `*` matches any) plus predicates.
#[derive(Debug, Clone, Default)]
pub struct SelectorComponent {
    /// Lower-case tag name; empty or `*` matches any element.
    pub tag: String,
    /// The predicates, in source order.
    pub conditions: Vec<AttributeCondition>,
}

/// Combinators joining compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// Whitespace: any ancestor.
    #[default]
    Descendant,
    /// `>`: the parent.
    Child,
    /// `+`: the nearest preceding element sibling.
    AdjacentSibling,
    /// `~`: any preceding element sibling.
    GeneralSibling,
}

/// Specificity `(a, b, c, d)`, compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    /// Reserved for style-attribute origin; always 0 for sheet rules.
    pub a: u32,
    /// Number of ID predicates.
    pub b: u32,
    /// Class tokens + other attribute predicates + pseudo-classes.
    pub c: u32,
    /// Non-wildcard type components.
    pub d: u32,
}

/// A left-linked chain of compound selectors.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    /// The right-most compound selector (the subject).
    pub right: SelectorComponent,
    /// The rest of the chain, when a combinator precedes the subject.
    pub left: Option<Box<SelectorChain>>,
    /// The combinator joining `left` to `right`.
    pub combinator: Combinator,
}

/// A parsed selector bound to its rule block.
#[derive(Debug, Clone)]
pub struct Selector {
    /// The compound-selector chain.
    pub chain: SelectorChain,
    /// Specificity of the whole chain.
    pub specificity: Specificity,
    /// Source order across the stylesheet list (tie-breaker).
    pub order: u32,
    /// The declaration block this selector guards.
    pub style: Rc<Style>,
    /// Media query list gating the rule, when inside `@media`.
    pub media: Option<MediaQueryListRef>,
}

impl Selector {
    /// True when no media list gates this selector or the list
    /// currently applies.
    #[must_use]
    pub fn is_media_valid(&self) -> bool {
        self.media
            .as_ref()
            .map_or(true, |m| m.borrow().is_used())
    }
}

// ── match result ─────────────────────────────────────────────────────

/// Bitmask result of matching a selector against an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchFlags(u8);

impl MatchFlags {
    /// The selector does not apply.
    pub const NO_MATCH: MatchFlags = MatchFlags(0);
    /// The selector applies.
    pub const MATCH: MatchFlags = MatchFlags(1);
    /// Applies only when dynamic pseudo-classes are also satisfied.
    pub const PSEUDO_CLASS: MatchFlags = MatchFlags(2);
    /// The subject is the element's `::before` child.
    pub const WITH_BEFORE: MatchFlags = MatchFlags(4);
    /// The subject is the element's `::after` child.
    pub const WITH_AFTER: MatchFlags = MatchFlags(8);

    /// True when any bit is set.
    #[must_use]
    pub fn is_match(self) -> bool {
        self != Self::NO_MATCH
    }

    /// True when `flag` is set.
    #[must_use]
    pub fn contains(self, flag: MatchFlags) -> bool {
        self.0 & flag.0 != 0
    }

    /// Set `flag`.
    pub fn insert(&mut self, flag: MatchFlags) {
        self.0 |= flag.0;
    }
}

/// Context the matcher runs in.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// The element tree.
    pub tree: &'a Tree,
    /// Evaluate pseudo-classes (`true` on the interactive pass) or
    /// report them as [`MatchFlags::PSEUDO_CLASS`] (`false` on the
    /// baseline cascade pass).
    pub honour_pseudo: bool,
    /// Host language for `:lang()` (e.g. `en`).
    pub language: &'a str,
    /// Host language-culture pair for `:lang()` (e.g. `en-US`).
    pub culture: &'a str,
}

// ── parsing ──────────────────────────────────────────────────────────

fn find_close_bracket(text: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in text.iter().enumerate().skip(open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl SelectorComponent {
    /// Parse one compound selector (`div.note#x[role=main]:hover`).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let chars: Vec<char> = text.trim().chars().collect();
        let mut component = SelectorComponent::default();

        let first_sentinel = chars
            .iter()
            .position(|c| matches!(c, '.' | '#' | '[' | ':'))
            .unwrap_or(chars.len());
        component.tag = chars[..first_sentinel]
            .iter()
            .collect::<String>()
            .to_ascii_lowercase();

        let mut i = first_sentinel;
        while i < chars.len() {
            match chars[i] {
                '.' => {
                    let end = next_sentinel(&chars, i + 1);
                    let value: String = chars[i + 1..end].iter().collect();
                    let class_list =
                        value.split_whitespace().map(str::to_string).collect();
                    component.conditions.push(AttributeCondition {
                        attribute: "class".to_string(),
                        condition: Condition::Equal,
                        value,
                        class_list,
                    });
                    i = end;
                }
                '#' => {
                    let end = next_sentinel(&chars, i + 1);
                    component.conditions.push(AttributeCondition {
                        attribute: "id".to_string(),
                        condition: Condition::Equal,
                        value: chars[i + 1..end].iter().collect(),
                        class_list: Vec::new(),
                    });
                    i = end;
                }
                ':' => {
                    if chars.get(i + 1) == Some(&':') {
                        let end = next_sentinel(&chars, i + 2);
                        let value: String =
                            chars[i + 2..end].iter().collect::<String>().to_ascii_lowercase();
                        component.conditions.push(AttributeCondition {
                            attribute: "pseudo-el".to_string(),
                            condition: Condition::PseudoElement,
                            value,
                            class_list: Vec::new(),
                        });
                        i = end;
                    } else {
                        // Pseudo-class; may carry a (...) argument.
                        let mut end = next_sentinel_or_paren(&chars, i + 1);
                        if chars.get(end) == Some(&'(') {
                            match find_close_bracket(&chars, end) {
                                Some(close) => end = close + 1,
                                None => end = chars.len(),
                            }
                        }
                        let value: String =
                            chars[i + 1..end].iter().collect::<String>().to_ascii_lowercase();
                        // Legacy one-colon pseudo-element forms.
                        let condition = if value == "before" || value == "after" {
                            Condition::PseudoElement
                        } else {
                            Condition::PseudoClass
                        };
                        component.conditions.push(AttributeCondition {
                            attribute: "pseudo".to_string(),
                            condition,
                            value,
                            class_list: Vec::new(),
                        });
                        i = end;
                    }
                }
                '[' => {
                    i = parse_attribute_block(&chars, i, &mut component);
                }
                _ => i += 1,
            }
        }

        component
    }
}

fn next_sentinel(chars: &[char], from: usize) -> usize {
    chars[from..]
        .iter()
        .position(|c| matches!(c, '.' | '#' | '[' | ':'))
        .map_or(chars.len(), |p| from + p)
}

fn next_sentinel_or_paren(chars: &[char], from: usize) -> usize {
    chars[from..]
        .iter()
        .position(|c| matches!(c, '.' | '#' | '[' | ':' | '('))
        .map_or(chars.len(), |p| from + p)
}

/// Parse `[attr]` / `[attr op value]` starting at the `[`; returns the
/// index just past the `]`.
fn parse_attribute_block(chars: &[char], open: usize, component: &mut SelectorComponent) -> usize {
    let mut i = open + 1;
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    let name_start = i;
    while chars
        .get(i)
        .is_some_and(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
    {
        i += 1;
    }
    let attribute: String = chars[name_start..i]
        .iter()
        .collect::<String>()
        .to_ascii_lowercase();
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }

    let condition = match chars.get(i) {
        Some(']') | None => {
            component.conditions.push(AttributeCondition {
                attribute,
                condition: Condition::Exists,
                value: String::new(),
                class_list: Vec::new(),
            });
            return i + 1;
        }
        Some('=') => {
            i += 1;
            Condition::Equal
        }
        Some('~') | Some('*') => {
            i += 2;
            Condition::ContainStr
        }
        Some('|') | Some('^') => {
            i += 2;
            Condition::StartStr
        }
        Some('$') => {
            i += 2;
            Condition::EndStr
        }
        Some(_) => {
            i += 1;
            Condition::Exists
        }
    };

    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }

    let mut value = String::new();
    match chars.get(i) {
        Some(&q) if q == '"' || q == '\'' => {
            i += 1;
            while let Some(&c) = chars.get(i) {
                i += 1;
                if c == q {
                    break;
                }
                value.push(c);
            }
        }
        _ => {
            while let Some(&c) = chars.get(i) {
                if c == ']' {
                    break;
                }
                value.push(c);
                i += 1;
            }
            value = value.trim().to_string();
        }
    }
    while chars.get(i).is_some_and(|&c| c != ']') {
        i += 1;
    }

    let class_list = if attribute == "class" {
        value.split_whitespace().map(str::to_string).collect()
    } else {
        Vec::new()
    };
    component.conditions.push(AttributeCondition {
        attribute,
        condition,
        value,
        class_list,
    });
    i + 1
}

impl SelectorChain {
    /// Parse a complex selector (`div > ul.nav li a:hover`).
    ///
    /// Returns `None` for empty input. The chain is built right-to-left:
    /// the subject is the right-most compound selector.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let tokens = split_selector_tokens(text);
        Self::parse_tokens(&tokens)
    }

    fn parse_tokens(tokens: &[SelToken]) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }

        let SelToken::Compound(right_text) = tokens.last()? else {
            return None;
        };
        let right = SelectorComponent::parse(right_text);

        // Walk back over the combinator run; an explicit combinator
        // wins over plain whitespace.
        let mut i = tokens.len() - 1;
        let mut combinator = Combinator::Descendant;
        let mut saw_combinator = false;
        while i > 0 {
            match &tokens[i - 1] {
                SelToken::Combinator(c) => {
                    if *c != Combinator::Descendant || !saw_combinator {
                        if *c != Combinator::Descendant {
                            combinator = *c;
                        }
                        saw_combinator = true;
                    }
                    i -= 1;
                }
                SelToken::Compound(_) => break,
            }
        }

        let left = if i > 0 && saw_combinator {
            Self::parse_tokens(&tokens[..i]).map(Box::new)
        } else {
            None
        };

        Some(Self {
            right,
            left,
            combinator,
        })
    }

    /// [§ 17 Calculating specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// IDs count into `b`, class tokens (individually) and other
    /// attribute predicates and pseudo-classes into `c`, concrete tags
    /// into `d`.
    #[must_use]
    pub fn calc_specificity(&self) -> Specificity {
        let mut spec = Specificity::default();
        let mut chain = Some(self);
        while let Some(link) = chain {
            if !link.right.tag.is_empty() && link.right.tag != "*" {
                spec.d += 1;
            }
            for cond in &link.right.conditions {
                match cond.condition {
                    Condition::PseudoElement => {}
                    _ if cond.attribute == "id" => spec.b += 1,
                    _ if cond.attribute == "class" => {
                        spec.c += cond.class_list.len().max(1) as u32;
                    }
                    _ => spec.c += 1,
                }
            }
            chain = link.left.as_deref();
        }
        spec
    }
}

/// A token of the complex-selector grammar.
#[derive(Debug, Clone, PartialEq)]
enum SelToken {
    Compound(String),
    Combinator(Combinator),
}

/// Split a selector string into compounds and combinators, keeping
/// `[...]` and `(...)` groups intact.
fn split_selector_tokens(text: &str) -> Vec<SelToken> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    let flush = |current: &mut String, tokens: &mut Vec<SelToken>| {
        if !current.trim().is_empty() {
            tokens.push(SelToken::Compound(current.trim().to_string()));
        }
        current.clear();
    };

    for c in text.chars() {
        match c {
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth -= 1;
                current.push(c);
            }
            c if depth == 0 && c.is_whitespace() => {
                flush(&mut current, &mut tokens);
                if tokens.last() == Some(&SelToken::Combinator(Combinator::Descendant)) {
                    continue;
                }
                if matches!(tokens.last(), Some(SelToken::Compound(_))) {
                    tokens.push(SelToken::Combinator(Combinator::Descendant));
                }
            }
            '>' | '+' | '~' if depth == 0 => {
                flush(&mut current, &mut tokens);
                let combinator = match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::AdjacentSibling,
                    _ => Combinator::GeneralSibling,
                };
                // Replace a pending descendant combinator (the
                // whitespace before an explicit one is not meaningful).
                if tokens.last() == Some(&SelToken::Combinator(Combinator::Descendant)) {
                    tokens.pop();
                }
                tokens.push(SelToken::Combinator(combinator));
            }
            c => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);
    // Trailing combinators are malformed; drop them.
    while matches!(tokens.last(), Some(SelToken::Combinator(_))) {
        tokens.pop();
    }
    tokens
}

// ── matching ─────────────────────────────────────────────────────────

/// Match a selector chain against the element at `id` (right-to-left).
#[must_use]
pub fn select(chain: &SelectorChain, ctx: &MatchContext<'_>, id: NodeId) -> MatchFlags {
    let mut right_res = select_component(&chain.right, ctx, id);
    if !right_res.is_match() {
        return MatchFlags::NO_MATCH;
    }

    if let Some(left) = &chain.left {
        let Some(parent) = ctx.tree.parent(id) else {
            return MatchFlags::NO_MATCH;
        };
        match chain.combinator {
            Combinator::Descendant => match find_ancestor(left, ctx, id) {
                Some(pseudo) => {
                    if pseudo {
                        right_res.insert(MatchFlags::PSEUDO_CLASS);
                    }
                }
                None => return MatchFlags::NO_MATCH,
            },
            Combinator::Child => {
                let res = select(left, ctx, parent);
                if !res.is_match() {
                    return MatchFlags::NO_MATCH;
                }
                if res.contains(MatchFlags::PSEUDO_CLASS) {
                    right_res.insert(MatchFlags::PSEUDO_CLASS);
                }
            }
            Combinator::AdjacentSibling => {
                match find_adjacent_sibling(left, ctx, id) {
                    Some(pseudo) => {
                        if pseudo {
                            right_res.insert(MatchFlags::PSEUDO_CLASS);
                        }
                    }
                    None => return MatchFlags::NO_MATCH,
                }
            }
            Combinator::GeneralSibling => match find_sibling(left, ctx, id) {
                Some(pseudo) => {
                    if pseudo {
                        right_res.insert(MatchFlags::PSEUDO_CLASS);
                    }
                }
                None => return MatchFlags::NO_MATCH,
            },
        }
    }

    right_res
}

/// Climb ancestors looking for a chain match; `Some(pseudo_flag)` on
/// success.
fn find_ancestor(chain: &SelectorChain, ctx: &MatchContext<'_>, id: NodeId) -> Option<bool> {
    for ancestor in ctx.tree.ancestors(id) {
        if ctx.tree.as_element(ancestor).is_none() {
            continue;
        }
        let res = select(chain, ctx, ancestor);
        if res.is_match() {
            return Some(res.contains(MatchFlags::PSEUDO_CLASS));
        }
    }
    None
}

/// True when a node participates in sibling arithmetic: a real element,
/// not generated content.
fn is_countable_element(tree: &Tree, id: NodeId) -> bool {
    tree.as_element(id).is_some_and(|e| e.generated.is_none())
}

/// The nearest preceding element sibling must match the chain.
fn find_adjacent_sibling(
    chain: &SelectorChain,
    ctx: &MatchContext<'_>,
    id: NodeId,
) -> Option<bool> {
    let prev = ctx
        .tree
        .preceding_siblings(id)
        .find(|&s| is_countable_element(ctx.tree, s))?;
    let res = select(chain, ctx, prev);
    if res.is_match() {
        Some(res.contains(MatchFlags::PSEUDO_CLASS))
    } else {
        None
    }
}

/// Any preceding element sibling may match the chain.
fn find_sibling(chain: &SelectorChain, ctx: &MatchContext<'_>, id: NodeId) -> Option<bool> {
    for sibling in ctx.tree.preceding_siblings(id) {
        if !is_countable_element(ctx.tree, sibling) {
            continue;
        }
        let res = select(chain, ctx, sibling);
        if res.is_match() {
            return Some(res.contains(MatchFlags::PSEUDO_CLASS));
        }
    }
    None
}

/// Match one compound selector against the element at `id`.
#[must_use]
pub fn select_component(
    component: &SelectorComponent,
    ctx: &MatchContext<'_>,
    id: NodeId,
) -> MatchFlags {
    let Some(element) = ctx.tree.as_element(id) else {
        return MatchFlags::NO_MATCH;
    };

    if !component.tag.is_empty() && component.tag != "*" && component.tag != element.tag {
        return MatchFlags::NO_MATCH;
    }

    let mut result = MatchFlags::MATCH;

    for cond in &component.conditions {
        match cond.condition {
            Condition::Exists => {
                if !element.attrs.contains_key(&cond.attribute) {
                    return MatchFlags::NO_MATCH;
                }
            }
            Condition::Equal => {
                if cond.attribute == "class" {
                    // Every token of the selector's class list must be
                    // present on the element.
                    let all_present = cond.class_list.iter().all(|want| {
                        element
                            .classes
                            .iter()
                            .any(|have| have.eq_ignore_ascii_case(want))
                    });
                    if !all_present {
                        return MatchFlags::NO_MATCH;
                    }
                } else {
                    match element.attrs.get(&cond.attribute) {
                        Some(v) if v.eq_ignore_ascii_case(&cond.value) => {}
                        _ => return MatchFlags::NO_MATCH,
                    }
                }
            }
            Condition::ContainStr => match element.attrs.get(&cond.attribute) {
                Some(v) if v.contains(cond.value.as_str()) => {}
                _ => return MatchFlags::NO_MATCH,
            },
            Condition::StartStr => match element.attrs.get(&cond.attribute) {
                Some(v) if v.starts_with(cond.value.as_str()) => {}
                _ => return MatchFlags::NO_MATCH,
            },
            Condition::EndStr => match element.attrs.get(&cond.attribute) {
                Some(v) if v.ends_with(cond.value.as_str()) => {}
                _ => return MatchFlags::NO_MATCH,
            },
            Condition::PseudoElement => match cond.value.as_str() {
                "after" => result.insert(MatchFlags::WITH_AFTER),
                "before" => result.insert(MatchFlags::WITH_BEFORE),
                _ => return MatchFlags::NO_MATCH,
            },
            Condition::PseudoClass => {
                if ctx.honour_pseudo {
                    if !pseudo_class_matches(&cond.value, ctx, id) {
                        return MatchFlags::NO_MATCH;
                    }
                } else {
                    result.insert(MatchFlags::PSEUDO_CLASS);
                }
            }
        }
    }

    result
}

/// Evaluate a pseudo-class (name plus optional `(args)`).
fn pseudo_class_matches(value: &str, ctx: &MatchContext<'_>, id: NodeId) -> bool {
    let (name, param) = match value.find('(') {
        Some(open) => {
            let close = value.rfind(')').unwrap_or(value.len());
            (
                value[..open].trim(),
                value[open + 1..close].trim().to_string(),
            )
        }
        None => (value.trim(), String::new()),
    };

    let tree = ctx.tree;
    let Some(parent) = tree.parent(id) else {
        return false;
    };

    match name {
        "only-child" => is_only_child(tree, parent, id, false),
        "only-of-type" => is_only_child(tree, parent, id, true),
        "first-child" => is_nth_child(tree, parent, id, 0, 1, false),
        "first-of-type" => is_nth_child(tree, parent, id, 0, 1, true),
        "last-child" => is_nth_last_child(tree, parent, id, 0, 1, false),
        "last-of-type" => is_nth_last_child(tree, parent, id, 0, 1, true),
        "nth-child" | "nth-of-type" | "nth-last-child" | "nth-last-of-type" => {
            if param.is_empty() {
                return false;
            }
            let (num, off) = parse_nth_child_params(&param);
            if num == 0 && off == 0 {
                return false;
            }
            let of_type = name.ends_with("of-type");
            if name.starts_with("nth-last") {
                is_nth_last_child(tree, parent, id, num, off, of_type)
            } else {
                is_nth_child(tree, parent, id, num, off, of_type)
            }
        }
        "not" => {
            let inner = SelectorComponent::parse(&param);
            !select_component(&inner, ctx, id).is_match()
        }
        "lang" => {
            let want = param.to_ascii_lowercase();
            !want.is_empty()
                && (ctx.language.to_ascii_lowercase().starts_with(&want)
                    || ctx.culture.to_ascii_lowercase().starts_with(&want))
        }
        "hover" => tree.get(id).pseudo.hover,
        "active" => tree.get(id).pseudo.active,
        "link" => {
            tree.as_element(id)
                .is_some_and(|e| e.tag == "a" && e.attrs.contains_key("href"))
        }
        // Unknown pseudo-class: the compound never matches.
        _ => false,
    }
}

/// Parse an `An+B` argument: `odd` → (2,1), `even` → (2,0), else the
/// `(step, offset)` pair; a bare integer is (0, n).
#[must_use]
pub fn parse_nth_child_params(param: &str) -> (i32, i32) {
    let param = param.trim().to_ascii_lowercase();
    match param.as_str() {
        "odd" => return (2, 1),
        "even" => return (2, 0),
        _ => {}
    }

    match param.find('n') {
        None => (0, param.parse().unwrap_or(0)),
        Some(pos) => {
            let step_text = param[..pos].trim();
            let step = match step_text {
                "" | "+" => 1,
                "-" => -1,
                s => s.parse().unwrap_or(0),
            };
            let offset_text = param[pos + 1..].replace(char::is_whitespace, "");
            let offset = if offset_text.is_empty() {
                0
            } else {
                offset_text.parse().unwrap_or(0)
            };
            (step, offset)
        }
    }
}

/// Child-index test counting element siblings only.
fn is_nth_child(
    tree: &Tree,
    parent: NodeId,
    el: NodeId,
    num: i32,
    off: i32,
    of_type: bool,
) -> bool {
    let el_tag = tree.as_element(el).map(|e| e.tag.clone()).unwrap_or_default();
    let mut idx = 1i32;
    for &child in tree.children(parent) {
        if !is_countable_element(tree, child) {
            continue;
        }
        let same_type = !of_type
            || tree
                .as_element(child)
                .is_some_and(|e| e.tag == el_tag);
        if same_type {
            if child == el {
                return nth_matches(idx, num, off);
            }
            idx += 1;
        }
        if child == el {
            break;
        }
    }
    false
}

/// Child-index test from the end.
fn is_nth_last_child(
    tree: &Tree,
    parent: NodeId,
    el: NodeId,
    num: i32,
    off: i32,
    of_type: bool,
) -> bool {
    let el_tag = tree.as_element(el).map(|e| e.tag.clone()).unwrap_or_default();
    let mut idx = 1i32;
    for &child in tree.children(parent).iter().rev() {
        if !is_countable_element(tree, child) {
            continue;
        }
        let same_type = !of_type
            || tree
                .as_element(child)
                .is_some_and(|e| e.tag == el_tag);
        if same_type {
            if child == el {
                return nth_matches(idx, num, off);
            }
            idx += 1;
        }
        if child == el {
            break;
        }
    }
    false
}

fn nth_matches(idx: i32, num: i32, off: i32) -> bool {
    if num == 0 {
        return idx == off;
    }
    let delta = idx - off;
    delta % num == 0 && delta / num >= 0
}

fn is_only_child(tree: &Tree, parent: NodeId, el: NodeId, of_type: bool) -> bool {
    let el_tag = tree.as_element(el).map(|e| e.tag.clone()).unwrap_or_default();
    let mut count = 0;
    for &child in tree.children(parent) {
        if !is_countable_element(tree, child) {
            continue;
        }
        if !of_type
            || tree
                .as_element(child)
                .is_some_and(|e| e.tag == el_tag)
        {
            count += 1;
        }
        if count > 1 {
            return false;
        }
    }
    count == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compound() {
        let comp = SelectorComponent::parse("div.note#main[role=banner]:hover");
        assert_eq!(comp.tag, "div");
        assert_eq!(comp.conditions.len(), 4);
        assert_eq!(comp.conditions[0].attribute, "class");
        assert_eq!(comp.conditions[1].attribute, "id");
        assert_eq!(comp.conditions[2].attribute, "role");
        assert_eq!(comp.conditions[3].condition, Condition::PseudoClass);
    }

    #[test]
    fn parse_chain_with_combinators() {
        let chain = SelectorChain::parse("div > ul.nav li").unwrap();
        assert_eq!(chain.right.tag, "li");
        assert_eq!(chain.combinator, Combinator::Descendant);
        let left = chain.left.as_ref().unwrap();
        assert_eq!(left.right.tag, "ul");
        assert_eq!(left.combinator, Combinator::Child);
        let leftmost = left.left.as_ref().unwrap();
        assert_eq!(leftmost.right.tag, "div");
    }

    #[test]
    fn specificity_counts() {
        // `ul li:nth-child(2n+1)` → (0,0,1,2).
        let chain = SelectorChain::parse("ul li:nth-child(2n+1)").unwrap();
        let spec = chain.calc_specificity();
        assert_eq!((spec.a, spec.b, spec.c, spec.d), (0, 0, 1, 2));

        // N class tokens in one predicate each count into c.
        let chain = SelectorChain::parse("[class=\"a b c\"]").unwrap();
        assert_eq!(chain.calc_specificity().c, 3);

        let chain = SelectorChain::parse("#x.y z").unwrap();
        let spec = chain.calc_specificity();
        assert_eq!((spec.b, spec.c, spec.d), (1, 1, 1));
    }

    #[test]
    fn nth_params() {
        assert_eq!(parse_nth_child_params("odd"), (2, 1));
        assert_eq!(parse_nth_child_params("even"), (2, 0));
        assert_eq!(parse_nth_child_params("2n+1"), (2, 1));
        assert_eq!(parse_nth_child_params("3"), (0, 3));
        assert_eq!(parse_nth_child_params("-n+2"), (-1, 2));
        assert_eq!(parse_nth_child_params("n"), (1, 0));
    }

    #[test]
    fn pseudo_element_flags() {
        let chain = SelectorChain::parse("p::before").unwrap();
        assert_eq!(chain.right.conditions[0].condition, Condition::PseudoElement);
        let chain = SelectorChain::parse("p:after").unwrap();
        assert_eq!(chain.right.conditions[0].condition, Condition::PseudoElement);
    }
}
