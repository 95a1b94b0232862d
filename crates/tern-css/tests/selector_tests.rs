//! Selector matching integration tests per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).

use tern_css::{select, select_component, MatchContext, MatchFlags, SelectorChain, SelectorComponent};
use tern_dom::{NodeId, Tree};

fn ctx(tree: &Tree) -> MatchContext<'_> {
    MatchContext {
        tree,
        honour_pseudo: true,
        language: "en",
        culture: "en-US",
    }
}

fn baseline_ctx(tree: &Tree) -> MatchContext<'_> {
    MatchContext {
        tree,
        honour_pseudo: false,
        language: "en",
        culture: "en-US",
    }
}

/// `<body><ul><li/><li class="x"/><li/></ul><p id="p"/></body>`
fn fixture() -> (Tree, NodeId, NodeId, Vec<NodeId>, NodeId) {
    let mut tree = Tree::new();
    let body = tree.alloc_element("body");
    let ul = tree.alloc_element("ul");
    tree.append_child(body, ul);
    let mut lis = Vec::new();
    for i in 0..3 {
        let li = tree.alloc_element("li");
        if i == 1 {
            tree.set_attr(li, "class", "x");
        }
        tree.append_child(ul, li);
        lis.push(li);
    }
    let p = tree.alloc_element("p");
    tree.set_attr(p, "id", "p");
    tree.append_child(body, p);
    (tree, body, ul, lis, p)
}

#[test]
fn type_and_universal() {
    let (tree, _, ul, lis, _) = fixture();
    let chain = SelectorChain::parse("ul").unwrap();
    assert!(select(&chain, &ctx(&tree), ul).is_match());
    assert!(!select(&chain, &ctx(&tree), lis[0]).is_match());

    let chain = SelectorChain::parse("*").unwrap();
    assert!(select(&chain, &ctx(&tree), lis[2]).is_match());
}

#[test]
fn class_and_id() {
    let (tree, _, _, lis, p) = fixture();
    let chain = SelectorChain::parse("li.x").unwrap();
    assert!(select(&chain, &ctx(&tree), lis[1]).is_match());
    assert!(!select(&chain, &ctx(&tree), lis[0]).is_match());

    let chain = SelectorChain::parse("#p").unwrap();
    assert!(select(&chain, &ctx(&tree), p).is_match());
}

#[test]
fn descendant_and_child_combinators() {
    let (tree, _, _, lis, p) = fixture();
    let chain = SelectorChain::parse("body li").unwrap();
    assert!(select(&chain, &ctx(&tree), lis[0]).is_match());

    let chain = SelectorChain::parse("body > li").unwrap();
    assert!(!select(&chain, &ctx(&tree), lis[0]).is_match());

    let chain = SelectorChain::parse("ul > li").unwrap();
    assert!(select(&chain, &ctx(&tree), lis[0]).is_match());

    let chain = SelectorChain::parse("ul p").unwrap();
    assert!(!select(&chain, &ctx(&tree), p).is_match());
}

#[test]
fn sibling_combinators() {
    let (tree, _, ul, lis, p) = fixture();
    let chain = SelectorChain::parse("li + li").unwrap();
    assert!(select(&chain, &ctx(&tree), lis[1]).is_match());
    assert!(!select(&chain, &ctx(&tree), lis[0]).is_match());

    let chain = SelectorChain::parse("ul + p").unwrap();
    assert!(select(&chain, &ctx(&tree), p).is_match());

    let chain = SelectorChain::parse("li.x ~ li").unwrap();
    assert!(select(&chain, &ctx(&tree), lis[2]).is_match());
    assert!(!select(&chain, &ctx(&tree), lis[0]).is_match());
    let _ = ul;
}

#[test]
fn nth_child_odd() {
    // `ul li:nth-child(2n+1)` matches the 1st and 3rd li.
    let (tree, _, _, lis, _) = fixture();
    let chain = SelectorChain::parse("ul li:nth-child(2n+1)").unwrap();
    assert!(select(&chain, &ctx(&tree), lis[0]).is_match());
    assert!(!select(&chain, &ctx(&tree), lis[1]).is_match());
    assert!(select(&chain, &ctx(&tree), lis[2]).is_match());

    let spec = chain.calc_specificity();
    assert_eq!((spec.a, spec.b, spec.c, spec.d), (0, 0, 1, 2));
}

#[test]
fn structural_pseudo_classes() {
    let (tree, _, _, lis, p) = fixture();
    let c = ctx(&tree);

    assert!(select(&SelectorChain::parse("li:first-child").unwrap(), &c, lis[0]).is_match());
    assert!(!select(&SelectorChain::parse("li:first-child").unwrap(), &c, lis[1]).is_match());
    assert!(select(&SelectorChain::parse("li:last-child").unwrap(), &c, lis[2]).is_match());
    assert!(select(&SelectorChain::parse("p:last-of-type").unwrap(), &c, p).is_match());
    assert!(select(&SelectorChain::parse("p:only-of-type").unwrap(), &c, p).is_match());
    assert!(!select(&SelectorChain::parse("li:only-child").unwrap(), &c, lis[0]).is_match());
    assert!(select(&SelectorChain::parse("li:nth-last-child(1)").unwrap(), &c, lis[2]).is_match());
}

#[test]
fn not_pseudo_class() {
    let (tree, _, _, lis, _) = fixture();
    let chain = SelectorChain::parse("li:not(.x)").unwrap();
    assert!(select(&chain, &ctx(&tree), lis[0]).is_match());
    assert!(!select(&chain, &ctx(&tree), lis[1]).is_match());
}

#[test]
fn attribute_conditions() {
    let mut tree = Tree::new();
    let a = tree.alloc_element("a");
    tree.set_attr(a, "href", "https://example.com/page.html");
    tree.set_attr(a, "data-kind", "x y z");

    let c = ctx(&tree);
    assert!(select(&SelectorChain::parse("a[href]").unwrap(), &c, a).is_match());
    assert!(select(&SelectorChain::parse("a[href^=https]").unwrap(), &c, a).is_match());
    assert!(select(&SelectorChain::parse("a[href$=\".html\"]").unwrap(), &c, a).is_match());
    assert!(select(&SelectorChain::parse("a[href*=example]").unwrap(), &c, a).is_match());
    assert!(select(&SelectorChain::parse("a[data-kind~=y]").unwrap(), &c, a).is_match());
    assert!(!select(&SelectorChain::parse("a[rel]").unwrap(), &c, a).is_match());
}

#[test]
fn dynamic_pseudo_is_deferred_on_baseline_pass() {
    let mut tree = Tree::new();
    let a = tree.alloc_element("a");
    tree.set_attr(a, "href", "#");

    let chain = SelectorChain::parse("a:hover").unwrap();

    // Baseline pass: reported as pseudo-conditional, not evaluated.
    let res = select(&chain, &baseline_ctx(&tree), a);
    assert!(res.is_match());
    assert!(res.contains(MatchFlags::PSEUDO_CLASS));

    // Interactive pass without hover state: no match.
    assert!(!select(&chain, &ctx(&tree), a).is_match());

    // With hover state set: match.
    tree.set_pseudo_class(a, Some(true), None);
    assert!(select(&chain, &ctx(&tree), a).is_match());
}

#[test]
fn link_pseudo_class() {
    let mut tree = Tree::new();
    let a = tree.alloc_element("a");
    tree.set_attr(a, "href", "#");
    let plain = tree.alloc_element("a");

    let chain = SelectorChain::parse("a:link").unwrap();
    assert!(select(&chain, &ctx(&tree), a).is_match());
    assert!(!select(&chain, &ctx(&tree), plain).is_match());
}

#[test]
fn lang_pseudo_class() {
    let mut tree = Tree::new();
    let p = tree.alloc_element("p");
    let c = ctx(&tree);
    assert!(select(&SelectorChain::parse("p:lang(en)").unwrap(), &c, p).is_match());
    assert!(!select(&SelectorChain::parse("p:lang(fr)").unwrap(), &c, p).is_match());
}

#[test]
fn unknown_pseudo_never_matches_and_never_errors() {
    let (tree, _, _, lis, _) = fixture();
    let chain = SelectorChain::parse("li:wobbly(2)").unwrap();
    assert!(!select(&chain, &ctx(&tree), lis[0]).is_match());
}

#[test]
fn before_after_flags() {
    let (tree, _, _, lis, _) = fixture();
    let comp = SelectorComponent::parse("li::before");
    let res = select_component(&comp, &ctx(&tree), lis[0]);
    assert!(res.contains(MatchFlags::WITH_BEFORE));

    let comp = SelectorComponent::parse("li:after");
    let res = select_component(&comp, &ctx(&tree), lis[0]);
    assert!(res.contains(MatchFlags::WITH_AFTER));
}
