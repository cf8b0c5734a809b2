//! Integration tests for the layout assembler.

use quire_css::LayoutError;
use quire_css::flow::classify;
use quire_css::layout::{
    ApproximateTypesetter, BlockBox, InlineBox, InlineItem, LayoutAssembler, LayoutBox,
    LayoutContext, Spacer, SpacerOrigin,
};
use quire_css::style::Indent;
use quire_dom::{DomTree, ElementData, NodeId};

const WIDTH: f32 = 400.0;

fn layout_with(backend: &ApproximateTypesetter, tree: &DomTree) -> Result<LayoutBox, LayoutError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut assembler = LayoutAssembler::new(backend, LayoutContext::default());
    assembler.layout(&classify(tree, NodeId::ROOT), WIDTH)
}

fn layout(tree: &DomTree) -> LayoutBox {
    layout_with(&ApproximateTypesetter::new(), tree).expect("layout succeeds")
}

fn block(layout_box: &LayoutBox) -> &BlockBox {
    match layout_box {
        LayoutBox::Block(b) => b,
        other => panic!("expected a block, got {other:?}"),
    }
}

fn inline(layout_box: &LayoutBox) -> &InlineBox {
    match layout_box {
        LayoutBox::Inline(b) => b,
        other => panic!("expected a paragraph, got {other:?}"),
    }
}

fn spacer(height: f32, origin: SpacerOrigin) -> LayoutBox {
    LayoutBox::Spacer(Spacer { height, origin })
}

fn element(tree: &mut DomTree, parent: NodeId, tag: &str, style: &str) -> NodeId {
    let mut data = ElementData::new(tag);
    if !style.is_empty() {
        data = data.with_attr("style", style);
    }
    tree.append_element(parent, data)
}

fn text_element(tree: &mut DomTree, parent: NodeId, tag: &str, style: &str, text: &str) -> NodeId {
    let id = element(tree, parent, tag, style);
    let _ = tree.append_text(id, text);
    id
}

#[test]
fn test_paragraph_with_bold_run() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p", "margin-top:1em");
    let _ = tree.append_text(p, "Hello ");
    let _ = text_element(&mut tree, p, "b", "", "World");

    let root = layout(&tree);
    let root = block(&root);
    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0], spacer(10.0, SpacerOrigin::CollapsedMargin));

    let p = inline(&root.children[1]);
    assert_eq!(p.tag, "p");
    let segments: Vec<_> = p.run.segments().collect();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].text, "Hello ");
    assert!(!segments[0].style.is_bold());
    assert_eq!(segments[1].text, "World");
    assert!(segments[1].style.is_bold());
}

#[test]
fn test_adjacent_margins_collapse_to_the_larger() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div", "");
    let _ = text_element(&mut tree, div, "p", "margin-bottom: 10pt", "A");
    let _ = text_element(&mut tree, div, "p", "margin-top: 14pt", "B");

    let root = layout(&tree);
    let div = block(&block(&root).children[0]);
    assert_eq!(div.children.len(), 3);
    assert_eq!(inline(&div.children[0]).run.text(), "A");
    assert_eq!(div.children[1], spacer(14.0, SpacerOrigin::CollapsedMargin));
    assert_eq!(inline(&div.children[2]).run.text(), "B");
}

#[test]
fn test_last_bottom_margin_becomes_trailing_spacer() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div", "");
    let _ = text_element(&mut tree, div, "p", "margin-bottom: 8pt", "A");

    let root = layout(&tree);
    let div = block(&block(&root).children[0]);
    assert_eq!(div.children[1], spacer(8.0, SpacerOrigin::TrailingMargin));
}

fn list_tree(hidden_second: bool) -> DomTree {
    let mut tree = DomTree::new();
    let ol = element(&mut tree, NodeId::ROOT, "ol", "");
    let _ = text_element(&mut tree, ol, "li", "", "one");
    let second_style = if hidden_second { "display: none" } else { "" };
    let li = text_element(&mut tree, ol, "li", second_style, "two");
    let nested = element(&mut tree, li, "ol", "");
    let _ = text_element(&mut tree, nested, "li", "", "a");
    let _ = text_element(&mut tree, nested, "li", "", "b");
    let _ = tree.append_text(ol, "\n  ");
    let _ = text_element(&mut tree, ol, "li", "", "three");
    tree
}

fn marker(layout_box: &LayoutBox) -> Option<&str> {
    match layout_box {
        LayoutBox::Inline(b) => b.marker.as_ref().map(|m| m.text.as_str()),
        LayoutBox::Block(b) => b.marker.as_ref().map(|m| m.text.as_str()),
        _ => None,
    }
}

#[test]
fn test_ordered_list_counts_only_its_own_items() {
    let root = layout(&list_tree(false));
    let ol = block(&block(&root).children[0]);
    let markers: Vec<_> = ol.children.iter().filter_map(marker).collect();
    assert_eq!(markers, vec!["1.", "2.", "3."]);

    let second = block(&ol.children[1]);
    assert_eq!(inline(&second.children[0]).run.text(), "two");
    let nested = block(&second.children[1]);
    let nested_markers: Vec<_> = nested.children.iter().filter_map(marker).collect();
    assert_eq!(nested_markers, vec!["1.", "2."]);
}

#[test]
fn test_hidden_list_item_still_uses_a_number() {
    let root = layout(&list_tree(true));
    let ol = block(&block(&root).children[0]);
    let markers: Vec<_> = ol.children.iter().filter_map(marker).collect();
    assert_eq!(markers, vec!["1.", "3."]);
}

#[test]
fn test_ol_start_and_unordered_markers() {
    let mut tree = DomTree::new();
    let ol = tree.append_element(NodeId::ROOT, ElementData::new("ol").with_attr("start", "4"));
    let _ = text_element(&mut tree, ol, "li", "", "four");
    let ul = element(&mut tree, NodeId::ROOT, "ul", "");
    let _ = text_element(&mut tree, ul, "li", "", "dot");
    let roman = element(&mut tree, NodeId::ROOT, "ol", "list-style-type: upper-roman");
    for _ in 0..4 {
        let _ = text_element(&mut tree, roman, "li", "", "x");
    }

    let root = layout(&tree);
    let root = block(&root);
    assert_eq!(marker(&block(&root.children[0]).children[0]), Some("4."));
    assert_eq!(marker(&block(&root.children[1]).children[0]), Some("•"));
    assert_eq!(marker(&block(&root.children[2]).children[3]), Some("IV."));
}

#[test]
fn test_list_counter_stops_at_its_largest_value() {
    let mut tree = DomTree::new();
    let ol = tree.append_element(
        NodeId::ROOT,
        ElementData::new("ol").with_attr("start", "4294967295"),
    );
    let _ = text_element(&mut tree, ol, "li", "", "last");
    let _ = text_element(&mut tree, ol, "li", "", "past");

    let root = layout(&tree);
    let ol = block(&block(&root).children[0]);
    let markers: Vec<_> = ol.children.iter().filter_map(marker).collect();
    assert_eq!(markers, vec!["4294967295.", "4294967295."]);
}

#[test]
fn test_list_item_padding_becomes_hanging_indent() {
    let mut tree = DomTree::new();
    let ul = element(&mut tree, NodeId::ROOT, "ul", "");
    let _ = text_element(&mut tree, ul, "li", "padding-left: 20pt", "item");

    let root = layout(&tree);
    let li = inline(&block(&block(&root).children[0]).children[0]);
    assert_eq!(li.run.settings.indent, Indent { amount: 20.0, rows: -1 });
    assert!(li.decoration.padding.left.abs() < f32::EPSILON);
    assert!((li.width - WIDTH).abs() < 0.001);
}

#[test]
fn test_display_none_produces_nothing() {
    let mut tree = DomTree::new();
    let _ = text_element(&mut tree, NodeId::ROOT, "p", "display: none; margin-top: 20pt", "gone");
    let _ = text_element(&mut tree, NodeId::ROOT, "p", "", "kept");

    let root = layout(&tree);
    let root = block(&root);
    assert_eq!(root.children.len(), 1);
    assert_eq!(inline(&root.children[0]).run.text(), "kept");
}

#[test]
fn test_mixed_content_gets_anonymous_paragraphs() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div", "border: 1pt solid black");
    let _ = tree.append_text(div, "intro ");
    let _ = text_element(&mut tree, div, "p", "", "para");
    let _ = tree.append_text(div, " outro");

    let root = layout(&tree);
    let div = block(&block(&root).children[0]);
    assert!((div.decoration.border.top - 1.0).abs() < 0.001);
    let texts: Vec<_> = div
        .children
        .iter()
        .map(|c| (c.tag().to_string(), inline(c).run.text()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (String::new(), "intro".to_string()),
            ("p".to_string(), "para".to_string()),
            (String::new(), "outro".to_string()),
        ]
    );
    assert!(!inline(&div.children[0]).decoration.has_box());
}

#[test]
fn test_content_width_excludes_decoration() {
    let mut tree = DomTree::new();
    let _ = text_element(
        &mut tree,
        NodeId::ROOT,
        "p",
        "margin: 0 10pt; padding: 5pt; border-left: 2pt solid red",
        "x",
    );
    let _ = text_element(&mut tree, NodeId::ROOT, "p", "width: 50%", "y");

    let root = layout(&tree);
    let root = block(&root);
    assert!((inline(&root.children[0]).width - (WIDTH - 20.0 - 10.0 - 2.0)).abs() < 0.001);
    assert!((inline(&root.children[1]).width - WIDTH / 2.0).abs() < 0.001);
}

#[test]
fn test_root_font_size_from_html() {
    let mut tree = DomTree::new();
    let html = element(&mut tree, NodeId::ROOT, "html", "font-size: 12pt");
    let body = element(&mut tree, html, "body", "");
    let _ = text_element(&mut tree, body, "p", "margin-top: 2rem", "x");

    let root = layout(&tree);
    let html = block(&block(&root).children[0]);
    let body = block(&html.children[0]);
    assert_eq!(body.children[0], spacer(24.0, SpacerOrigin::CollapsedMargin));
    assert!((inline(&body.children[1]).run.segments().next().unwrap().style.font_size - 12.0).abs() < 0.001);
}

#[test]
fn test_unknown_font_is_fatal() {
    let mut tree = DomTree::new();
    let _ = text_element(&mut tree, NodeId::ROOT, "p", "font-family: Nope", "x");
    let err = layout_with(&ApproximateTypesetter::new(), &tree).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MissingFont {
            tag: "p".to_string(),
            family: "Nope".to_string(),
        }
    );
}

#[test]
fn test_font_list_falls_back() {
    let mut backend = ApproximateTypesetter::new();
    let mono = backend.register_family("monospace");
    let mut tree = DomTree::new();
    let _ = text_element(&mut tree, NodeId::ROOT, "p", "font-family: Nope, 'Monospace'", "x");

    let root = layout_with(&backend, &tree).unwrap();
    let p = inline(&block(&root).children[0]);
    assert_eq!(p.run.segments().next().unwrap().style.font_family, mono);
}

#[test]
fn test_images_and_links() {
    let mut backend = ApproximateTypesetter::new();
    backend.register_image("logo.png", 100.0, 50.0);
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p", "");
    let a = tree.append_element(p, ElementData::new("a").with_attr("href", "https://example.com"));
    let _ = tree.append_text(a, "home ");
    let _ = tree.append_element(
        a,
        ElementData::new("img")
            .with_attr("src", "logo.png")
            .with_attr("width", "40"),
    );

    let root = layout_with(&backend, &tree).unwrap();
    let p = inline(&block(&root).children[0]);
    match &p.run.items[..] {
        [InlineItem::Text(seg), InlineItem::Image(img)] => {
            assert_eq!(seg.href.as_deref(), Some("https://example.com"));
            assert_eq!(img.href.as_deref(), Some("https://example.com"));
            assert!((img.width - 30.0).abs() < 0.001);
            assert!((img.height - 15.0).abs() < 0.001);
        }
        other => panic!("unexpected run {other:?}"),
    }
}

#[test]
fn test_missing_image_is_fatal() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p", "");
    let _ = tree.append_element(p, ElementData::new("img").with_attr("src", "nope.png"));
    let err = layout_with(&ApproximateTypesetter::new(), &tree).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MissingImage {
            src: "nope.png".to_string()
        }
    );
}

#[test]
fn test_br_inside_inline_is_a_forced_break() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p", "");
    let span = element(&mut tree, p, "span", "");
    let _ = tree.append_text(span, "a");
    let _ = tree.append_element(span, ElementData::new("br"));
    let _ = tree.append_text(span, "b");

    let root = layout(&tree);
    let p = inline(&block(&root).children[0]);
    assert!(matches!(p.run.items[1], InlineItem::LineBreak));
}

#[test]
fn test_blank_paragraph_is_empty() {
    let mut tree = DomTree::new();
    let _ = text_element(&mut tree, NodeId::ROOT, "p", "", "   ");
    let root = layout(&tree);
    assert!(block(&root).children.is_empty());
}
