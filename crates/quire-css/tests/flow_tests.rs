//! Integration tests for the flow classifier.

use quire_css::flow::{FlowDirection, FlowKind, classify, collapse_whitespace};
use quire_css::style::{Property, StyleDeclaration};
use quire_dom::{DomTree, ElementData, NodeId};

#[test]
fn test_block_and_inline_directions() {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, ElementData::new("p"));
    let _ = tree.append_text(p, "Hello ");
    let b = tree.append_element(p, ElementData::new("b"));
    let _ = tree.append_text(b, "World");

    let root = classify(&tree, NodeId::ROOT);
    assert_eq!(root.tag, "");
    assert_eq!(root.dir, FlowDirection::Vertical);
    assert_eq!(root.children.len(), 1);

    let p = &root.children[0];
    assert_eq!(p.tag, "p");
    assert_eq!(p.dir, FlowDirection::Vertical);
    assert_eq!(p.children[0].kind, FlowKind::Text);
    assert_eq!(p.children[0].text, "Hello ");
    assert_eq!(p.children[1].tag, "b");
    assert_eq!(p.children[1].dir, FlowDirection::Horizontal);
}

#[test]
fn test_classify_single_node_wraps_it_in_root() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
    let span = tree.append_element(div, ElementData::new("span"));
    let _ = tree.append_text(span, "x");

    let root = classify(&tree, span);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].tag, "span");
}

#[test]
fn test_unknown_tags_inherit_running_direction() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
    let _ = tree.append_element(div, ElementData::new("p"));
    let custom = tree.append_element(div, ElementData::new("x-note"));
    let _ = tree.append_text(custom, "note");
    let _ = tree.append_text(div, "tail");
    let after = tree.append_element(div, ElementData::new("x-other"));
    let _ = tree.append_text(after, "other");

    let root = classify(&tree, NodeId::ROOT);
    let div = &root.children[0];
    // After a block sibling the running direction is vertical...
    assert_eq!(div.children[1].dir, FlowDirection::Vertical);
    // ...and real text switches it to horizontal.
    assert_eq!(div.children[2].kind, FlowKind::Text);
    assert_eq!(div.children[3].dir, FlowDirection::Horizontal);
}

#[test]
fn test_blank_text_collapses_to_one_space() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
    let _ = tree.append_element(div, ElementData::new("p"));
    let _ = tree.append_text(div, "\n    \n  ");
    let _ = tree.append_element(div, ElementData::new("p"));

    let root = classify(&tree, NodeId::ROOT);
    let div = &root.children[0];
    assert_eq!(div.children[1].text, " ");
    // Blank text does not change the running direction.
    assert_eq!(div.children[2].dir, FlowDirection::Vertical);
}

#[test]
fn test_pre_keeps_whitespace() {
    let mut tree = DomTree::new();
    let pre = tree.append_element(NodeId::ROOT, ElementData::new("pre"));
    let _ = tree.append_text(pre, "  a\n   b  ");
    let div = tree.append_element(
        NodeId::ROOT,
        ElementData::new("div").with_attr("style", "white-space: pre"),
    );
    let _ = tree.append_text(div, "\n\n");
    let p = tree.append_element(NodeId::ROOT, ElementData::new("p"));
    let _ = tree.append_text(p, "  a\n   b  ");

    let root = classify(&tree, NodeId::ROOT);
    assert_eq!(root.children[0].children[0].text, "  a\n   b  ");
    assert_eq!(root.children[1].children[0].text, "\n\n");
    assert_eq!(root.children[2].children[0].text, " a b ");
}

#[test]
fn test_collapse_whitespace() {
    assert_eq!(collapse_whitespace("a \n\n b"), "a b");
    assert_eq!(collapse_whitespace("a\tb"), "a\tb");
    assert_eq!(collapse_whitespace("a\nb"), "a b");
    assert_eq!(collapse_whitespace("no-space"), "no-space");
}

#[test]
fn test_declaration_order_hints_then_cascade_then_style() {
    let mut tree = DomTree::new();
    let b = tree.append_element(
        NodeId::ROOT,
        ElementData::new("b")
            .with_declaration("color", "red")
            .with_attr("style", "font-weight: normal"),
    );
    let _ = tree.append_text(b, "x");

    let root = classify(&tree, NodeId::ROOT);
    assert_eq!(
        root.children[0].declarations,
        vec![
            StyleDeclaration::new(Property::FontWeight, "bold"),
            StyleDeclaration::new(Property::Color, "red"),
            StyleDeclaration::new(Property::FontWeight, "normal"),
        ]
    );
    assert_eq!(root.children[0].attr("style"), None);
}

#[test]
fn test_width_attribute_only_without_declaration() {
    let mut tree = DomTree::new();
    let _ = tree.append_element(
        NodeId::ROOT,
        ElementData::new("img").with_attr("width", "120"),
    );
    let _ = tree.append_element(
        NodeId::ROOT,
        ElementData::new("img")
            .with_attr("width", "120")
            .with_attr("style", "width: 2in"),
    );

    let root = classify(&tree, NodeId::ROOT);
    assert_eq!(
        root.children[0].declarations,
        vec![StyleDeclaration::new(Property::Width, "120px")]
    );
    assert_eq!(
        root.children[1].declarations,
        vec![StyleDeclaration::new(Property::Width, "2in")]
    );
    assert_eq!(root.children[1].attr("width"), Some("120"));
}

#[test]
fn test_comments_are_skipped() {
    let json = r#"[{ "type": "element", "tag": "p", "children": [
        { "type": "comment", "text": "hidden" },
        { "type": "text", "text": "shown" }
    ] }]"#;
    let specs: Vec<quire_dom::NodeSpec> = serde_json::from_str(json).unwrap();
    let tree = DomTree::from_specs(&specs);
    let root = classify(&tree, NodeId::ROOT);
    assert_eq!(root.children[0].children.len(), 1);
    assert_eq!(root.children[0].children[0].text, "shown");
}
