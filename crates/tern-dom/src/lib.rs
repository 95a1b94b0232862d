//! Arena element tree for the tern rendering engine.
//!
//! The tree stores every node in a contiguous vector and uses [`NodeId`]
//! indices for all relationships, giving O(1) access and traversal in
//! any direction without ownership cycles: children are owned by the
//! arena, parent links are plain indices.
//!
//! # Node variants
//!
//! Unlike a general-purpose DOM, the tree is pre-digested for layout:
//! raw text is split into alternating [`NodeKind::Text`] (one
//! indivisible word) and [`NodeKind::Whitespace`] runs at insertion
//! time, so the renderer never re-scans strings for break opportunities.
//! Generated `::before`/`::after` children are ordinary elements with a
//! [`GeneratedContent`] marker.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
///
/// Keys are lower-case ASCII; [`Tree::set_attr`] enforces this.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the element tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Index of this node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which generated pseudo-element an element materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedContent {
    /// A `::before` child (always the first child of its host).
    Before,
    /// An `::after` child (always the last child of its host).
    After,
}

/// Dynamic pseudo-class state toggled by mouse interaction.
///
/// Stored per element so the selector matcher can honour `:hover` and
/// `:active` during interactive refresh while ignoring them in the
/// baseline cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PseudoClassState {
    /// `:hover` is set on the element and its ancestors while the mouse
    /// is over the element.
    pub hover: bool,
    /// `:active` is set between button-down and button-up.
    pub active: bool,
}

/// Element-specific data.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-case tag name.
    pub tag: String,
    /// Attribute map with lower-case ASCII keys.
    pub attrs: AttributesMap,
    /// The `class` attribute pre-tokenized on whitespace.
    pub classes: Vec<String>,
    /// Set when this element is a synthesized `::before`/`::after` child.
    pub generated: Option<GeneratedContent>,
}

impl ElementData {
    /// Create element data for `tag` (lower-cased here).
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: AttributesMap::new(),
            classes: Vec::new(),
            generated: None,
        }
    }

    /// The `id` attribute value, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }
}

/// The payload of a tree node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// An element with tag, attributes and children.
    Element(ElementData),
    /// One indivisible run of non-whitespace text (typically a word).
    Text(String),
    /// A run of whitespace between words.
    Whitespace(String),
    /// A comment; never rendered, kept for tree fidelity.
    Comment(String),
}

impl NodeKind {
    /// True for [`NodeKind::Text`] and [`NodeKind::Whitespace`].
    #[must_use]
    pub fn is_textual(&self) -> bool {
        matches!(self, NodeKind::Text(_) | NodeKind::Whitespace(_))
    }
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node payload.
    pub kind: NodeKind,
    /// Parent link (None only for the root).
    pub parent: Option<NodeId>,
    /// Children in source order.
    pub children: Vec<NodeId>,
    /// Sibling immediately before this node under the same parent.
    pub prev_sibling: Option<NodeId>,
    /// Sibling immediately after this node under the same parent.
    pub next_sibling: Option<NodeId>,
    /// Dynamic pseudo-class state (meaningful for elements).
    pub pseudo: PseudoClassState,
}

/// Arena element tree.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its id.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
            next_sibling: None,
            pseudo: PseudoClassState::default(),
        });
        id
    }

    /// Allocate an element node for `tag`.
    pub fn alloc_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    /// Append `child` as the last child of `parent`, fixing sibling links.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        if let Some(prev) = prev_last {
            self.nodes[prev.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev);
        }
    }

    /// Insert `child` as the first child of `parent`, fixing sibling links.
    ///
    /// Used for `::before` synthesis; child order otherwise mirrors
    /// source order.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        let old_first = self.nodes[parent.0].children.first().copied();
        self.nodes[parent.0].children.insert(0, child);
        self.nodes[child.0].parent = Some(parent);
        if let Some(first) = old_first {
            self.nodes[first.0].prev_sibling = Some(child);
            self.nodes[child.0].next_sibling = Some(first);
        }
    }

    /// Split raw text into word/whitespace nodes appended under `parent`.
    ///
    /// Each text node contains a single indivisible string (a word), so
    /// the line builder can treat every node as an unbreakable item and
    /// whitespace collapsing becomes a per-node skip decision.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let mut run = String::new();
        let mut run_is_space = false;

        for c in text.chars() {
            let is_space = c.is_whitespace();
            if !run.is_empty() && is_space != run_is_space {
                let kind = if run_is_space {
                    NodeKind::Whitespace(std::mem::take(&mut run))
                } else {
                    NodeKind::Text(std::mem::take(&mut run))
                };
                let id = self.alloc(kind);
                self.append_child(parent, id);
            }
            run.push(c);
            run_is_space = is_space;
        }

        if !run.is_empty() {
            let kind = if run_is_space {
                NodeKind::Whitespace(run)
            } else {
                NodeKind::Text(run)
            };
            let id = self.alloc(kind);
            self.append_child(parent, id);
        }
    }

    /// Detach `child` from `parent`, fixing sibling links.
    ///
    /// The node stays allocated in the arena (ids remain stable) but no
    /// longer participates in traversal. Used to drop generated
    /// `::before`/`::after` children on restyle.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(index) = self.nodes[parent.0].children.iter().position(|&c| c == child) else {
            return;
        };
        self.nodes[parent.0].children.remove(index);
        let prev = self.nodes[child.0].prev_sibling;
        let next = self.nodes[child.0].next_sibling;
        if let Some(p) = prev {
            self.nodes[p.0].next_sibling = next;
        }
        if let Some(n) = next {
            self.nodes[n.0].prev_sibling = prev;
        }
        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Set an attribute on an element, lower-casing the key.
    ///
    /// The `class` attribute is additionally tokenized into the class
    /// list used by selector matching.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        if let NodeKind::Element(data) = &mut self.nodes[id.0].kind {
            if key == "class" {
                data.classes = value.split_whitespace().map(str::to_string).collect();
            }
            data.attrs.insert(key, value.to_string());
        }
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Get a node mutably by id.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of a node in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev_sibling
    }

    /// Next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_sibling
    }

    /// Element data if `id` is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Element data, mutable.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Text content if `id` is a text or whitespace node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(s) | NodeKind::Whitespace(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attribute value on an element.
    #[must_use]
    pub fn attr<'a>(&'a self, id: NodeId, name: &str) -> Option<&'a str> {
        self.as_element(id)
            .and_then(|e| e.attrs.get(name).map(String::as_str))
    }

    /// Concatenated text content of a subtree (document order).
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(s) | NodeKind::Whitespace(s) => out.push_str(s),
            NodeKind::Comment(_) => {}
            NodeKind::Element(_) => {
                for &child in &self.nodes[id.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Toggle a dynamic pseudo-class on an element.
    ///
    /// Returns true when the state actually changed (drives interactive
    /// restyle).
    pub fn set_pseudo_class(&mut self, id: NodeId, hover: Option<bool>, active: Option<bool>) -> bool {
        let node = &mut self.nodes[id.0];
        let mut changed = false;
        if let Some(h) = hover {
            if node.pseudo.hover != h {
                node.pseudo.hover = h;
                changed = true;
            }
        }
        if let Some(a) = active {
            if node.pseudo.active != a {
                node.pseudo.active = a;
                changed = true;
            }
        }
        changed
    }

    /// Iterator over ancestors, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterator over preceding siblings, nearest first.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblings<'_> {
        PrecedingSiblings {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// True when `ancestor` appears on `id`'s parent chain.
    #[must_use]
    pub fn is_ancestor(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }
}

/// Iterator over the ancestors of a node.
pub struct Ancestors<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over the preceding siblings of a node.
pub struct PrecedingSiblings<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_text_splits_words_and_spaces() {
        let mut tree = Tree::new();
        let p = tree.alloc_element("p");
        tree.append_text(p, "hello  world ");

        let kids = tree.children(p);
        assert_eq!(kids.len(), 4);
        assert!(matches!(tree.get(kids[0]).kind, NodeKind::Text(ref s) if s == "hello"));
        assert!(matches!(tree.get(kids[1]).kind, NodeKind::Whitespace(ref s) if s == "  "));
        assert!(matches!(tree.get(kids[2]).kind, NodeKind::Text(ref s) if s == "world"));
        assert!(matches!(tree.get(kids[3]).kind, NodeKind::Whitespace(_)));
    }

    #[test]
    fn sibling_links_follow_source_order() {
        let mut tree = Tree::new();
        let ul = tree.alloc_element("ul");
        let a = tree.alloc_element("li");
        let b = tree.alloc_element("li");
        tree.append_child(ul, a);
        tree.append_child(ul, b);

        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.parent(a), Some(ul));
    }

    #[test]
    fn prepend_child_becomes_first() {
        let mut tree = Tree::new();
        let host = tree.alloc_element("div");
        let child = tree.alloc_element("span");
        tree.append_child(host, child);
        let before = tree.alloc_element("span");
        tree.prepend_child(host, before);

        assert_eq!(tree.children(host)[0], before);
        assert_eq!(tree.next_sibling(before), Some(child));
    }

    #[test]
    fn attrs_are_lowercased_and_classes_tokenized() {
        let mut tree = Tree::new();
        let div = tree.alloc_element("div");
        tree.set_attr(div, "CLASS", "btn  active");
        let data = tree.as_element(div).unwrap();
        assert_eq!(data.classes, vec!["btn", "active"]);
        assert!(data.attrs.contains_key("class"));
    }

    #[test]
    fn pseudo_class_toggle_reports_change() {
        let mut tree = Tree::new();
        let a = tree.alloc_element("a");
        assert!(tree.set_pseudo_class(a, Some(true), None));
        assert!(!tree.set_pseudo_class(a, Some(true), None));
        assert!(tree.set_pseudo_class(a, Some(false), Some(true)));
    }
}
