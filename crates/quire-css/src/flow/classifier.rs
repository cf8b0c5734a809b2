//! The flow classifier: one depth-first pass over the element tree.

use quire_dom::{DomTree, NodeId, NodeType};

use super::attributes::resolve_attributes;
use super::{FlowDirection, FlowItem};
use crate::style::Property;

/// Tags that start block flow for themselves and, by default, for the
/// siblings that follow them.
pub const BLOCK_TAGS: &[&str] = &[
    "body",
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "canvas",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "noscript",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tfoot",
    "thead",
    "tbody",
    "tr",
    "td",
    "th",
    "ul",
    "video",
];

/// Tags that force inline flow.
pub const INLINE_TAGS: &[&str] = &[
    "b", "big", "i", "small", "tt", "abbr", "acronym", "cite", "code", "dfn", "em", "kbd",
    "strong", "samp", "var", "a", "bdo", "img", "map", "object", "q", "script", "span", "sub",
    "sup", "button", "input", "label", "select", "textarea",
];

/// Classify the subtree at `node`.
///
/// The result is always an anonymous vertical root (empty tag). Starting at
/// the document node, its children become the root's children; starting at
/// any other node, that node becomes the root's only child.
#[must_use]
pub fn classify(tree: &DomTree, node: NodeId) -> FlowItem {
    let mut classifier = Classifier {
        tree,
        preserve_whitespace: vec![false],
    };
    let mut root = FlowItem::element("", FlowDirection::Vertical);
    match tree.get(node).map(|n| &n.node_type) {
        Some(NodeType::Document) => {
            classifier.classify_siblings(tree.first_child(node), FlowDirection::Vertical, &mut root);
        }
        Some(_) => classifier.classify_node(node, FlowDirection::Vertical, &mut root),
        None => {}
    }
    root
}

struct Classifier<'a> {
    tree: &'a DomTree,
    /// One entry per open element; the innermost decides.
    preserve_whitespace: Vec<bool>,
}

impl Classifier<'_> {
    /// Walk a sibling chain. `direction` is the direction of the parent;
    /// the running direction changes as block and inline siblings go by.
    fn classify_siblings(&mut self, first: Option<NodeId>, direction: FlowDirection, parent: &mut FlowItem) {
        let mut running = direction;
        let mut current = first;
        while let Some(id) = current {
            running = self.classify_one(id, running, parent);
            current = self.tree.next_sibling(id);
        }
    }

    fn classify_node(&mut self, id: NodeId, direction: FlowDirection, parent: &mut FlowItem) {
        let _ = self.classify_one(id, direction, parent);
    }

    /// Classify one node into `parent` and return the running direction for
    /// the siblings after it.
    fn classify_one(&mut self, id: NodeId, running: FlowDirection, parent: &mut FlowItem) -> FlowDirection {
        let Some(node) = self.tree.get(id) else {
            return running;
        };
        match &node.node_type {
            NodeType::Text(data) => {
                let preserve = self.preserve_whitespace.last().copied().unwrap_or(false);
                let blank = data.chars().all(char::is_whitespace);
                let text = if preserve {
                    data.clone()
                } else if blank {
                    " ".to_string()
                } else {
                    collapse_whitespace(data)
                };
                if !text.is_empty() {
                    parent.children.push(FlowItem::text(&text));
                }
                // Real text under block flow switches the remaining siblings
                // to inline flow, giving mixed content.
                if blank {
                    running
                } else {
                    FlowDirection::Horizontal
                }
            }
            NodeType::Element(element) => {
                let tag = element.tag_name.to_ascii_lowercase();
                let dir = if BLOCK_TAGS.contains(&tag.as_str()) {
                    FlowDirection::Vertical
                } else if INLINE_TAGS.contains(&tag.as_str()) {
                    FlowDirection::Horizontal
                } else {
                    running
                };

                let (attributes, declarations) = resolve_attributes(element);
                let mut preserve = self.preserve_whitespace.last().copied().unwrap_or(false);
                if let Some(ws) = declarations
                    .iter()
                    .rev()
                    .find(|d| d.property == Property::WhiteSpace)
                {
                    preserve = matches!(
                        ws.value.trim().to_ascii_lowercase().as_str(),
                        "pre" | "pre-wrap" | "break-spaces"
                    );
                }

                let mut item = FlowItem {
                    attributes,
                    declarations,
                    ..FlowItem::element(&tag, dir)
                };
                self.preserve_whitespace.push(preserve);
                self.classify_siblings(self.tree.first_child(id), dir, &mut item);
                let _ = self.preserve_whitespace.pop();

                parent.children.push(item);
                dir
            }
            NodeType::Document | NodeType::Comment(_) | NodeType::Other(_) => running,
        }
    }
}

/// Collapse whitespace the way `white-space: normal` does at this stage.
///
/// Every run of whitespace becomes one space, except that a single
/// whitespace character other than a newline is kept as written.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    let flush = |run: &mut String, out: &mut String| {
        let mut chars = run.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c != '\n' => out.push(c),
            (Some(_), _) => out.push(' '),
            (None, _) => {}
        }
        run.clear();
    };
    for c in text.chars() {
        if c.is_whitespace() {
            run.push(c);
        } else {
            flush(&mut run, &mut out);
            out.push(c);
        }
    }
    flush(&mut run, &mut out);
    out
}
