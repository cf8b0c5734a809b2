//! Integration tests for the element tree.

use quire_dom::{Declaration, DomTree, ElementData, NodeId, NodeSpec, NodeType};

#[test]
fn test_append_links_siblings() {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, ElementData::new("P"));
    let a = tree.append_text(p, "Hello ");
    let b = tree.append_element(p, ElementData::new("b"));

    assert_eq!(tree.first_child(p), Some(a));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.parent(b), Some(p));
    assert_eq!(tree.as_element(p).map(|e| e.tag_name.as_str()), Some("p"));
    assert_eq!(tree.document_element(), Some(p));
}

#[test]
fn test_parse_declaration_block() {
    let decls = Declaration::parse_block("Margin-Top: 1em; content: \"a;b\" ;; color:red");
    assert_eq!(
        decls,
        vec![
            Declaration::new("margin-top", "1em"),
            Declaration::new("content", "\"a;b\""),
            Declaration::new("color", "red"),
        ]
    );
}

#[test]
fn test_parse_declaration_block_skips_garbage() {
    assert!(Declaration::parse_block("").is_empty());
    assert!(Declaration::parse_block("nonsense; : value").is_empty());
}

#[test]
fn test_tree_from_json_specs() {
    let json = r#"[
        { "type": "comment", "text": "generated" },
        { "type": "element", "tag": "p", "style": "margin-top: 1em",
          "attrs": { "ID": "intro" },
          "children": [
            { "type": "text", "text": "Hello " },
            { "type": "element", "tag": "b", "children": [ { "type": "text", "text": "World" } ] }
          ] }
    ]"#;
    let specs: Vec<NodeSpec> = serde_json::from_str(json).expect("valid job");
    let tree = DomTree::from_specs(&specs);

    let roots = tree.children(NodeId::ROOT);
    assert_eq!(roots.len(), 2);
    assert!(matches!(
        tree.get(roots[0]).map(|n| &n.node_type),
        Some(NodeType::Comment(_))
    ));

    let p = tree.as_element(roots[1]).expect("p element");
    assert_eq!(p.attrs.get("id").map(String::as_str), Some("intro"));
    assert_eq!(p.declarations, vec![Declaration::new("margin-top", "1em")]);

    let texts: Vec<_> = tree
        .children(roots[1])
        .iter()
        .filter_map(|&id| tree.as_text(id))
        .collect();
    assert_eq!(texts, vec!["Hello "]);
}
