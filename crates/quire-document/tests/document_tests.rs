//! Integration tests for page sequencing and document assembly.

use quire_css::layout::ApproximateTypesetter;
use quire_css::{DisplayCommand, LayoutError, PageRule, PageSelector};
use quire_document::{Document, DocumentDefaults, DocumentError, FileTypesetter};
use quire_dom::{DomTree, ElementData, NodeId};

fn document() -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    Document::new(DocumentDefaults::default(), Box::new(ApproximateTypesetter::new()))
}

fn paragraph(text: &str, style: &str) -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, ElementData::new("p").with_attr("style", style));
    let _ = tree.append_text(p, text);
    (tree, p)
}

fn area(content: &str) -> std::collections::BTreeMap<String, String> {
    std::collections::BTreeMap::from([("content".to_string(), content.to_string())])
}

#[test]
fn test_output_opens_a_page() {
    let mut doc = document();
    let (tree, p) = paragraph("Hello", "");
    let content = doc.content_area().unwrap();
    let height = doc.output_at(&tree, p, content.width, content.x, content.y).unwrap();
    assert!((height - 12.0).abs() < 0.001);

    let finished = doc.finish().unwrap();
    assert_eq!(finished.pages.len(), 1);
    let page = &finished.pages[0];
    assert_eq!(page.number, 1);
    assert_eq!(page.selector, PageSelector::Default);
    assert_eq!(page.display_list.texts(), vec!["Hello"]);
}

#[test]
fn test_pages_follow_their_rules() {
    let mut doc = document();
    doc.add_page_rule(PageRule {
        size: Some("a5".to_string()),
        ..PageRule::new(PageSelector::First)
    });
    doc.add_page_rule(PageRule {
        margin_left: Some("3cm".to_string()),
        ..PageRule::new(PageSelector::Left)
    });
    let a4 = doc.page_size().unwrap();
    assert!(a4.width < 400.0, "first page is a5");

    let (tree, p) = paragraph("x", "");
    let _ = doc.output_at(&tree, p, 100.0, 50.0, 50.0).unwrap();
    doc.new_page().unwrap();
    let second = doc.page_master().unwrap().clone();
    assert_eq!(second.selector, PageSelector::Left);
    doc.new_page().unwrap();
    assert_eq!(doc.page_count(), 2);

    let finished = doc.finish().unwrap();
    let selectors: Vec<_> = finished.pages.iter().map(|p| p.selector).collect();
    assert_eq!(
        selectors,
        vec![PageSelector::First, PageSelector::Left, PageSelector::Default]
    );
    assert!(finished.pages[1].content.x > finished.pages[2].content.x);
}

#[test]
fn test_page_is_finalized_with_background_and_margin_boxes() {
    let mut page = PageRule::default();
    let _ = page
        .properties
        .insert("background-color".to_string(), "white".to_string());
    let _ = page.areas.insert("bottom-center".to_string(), area("'Folio ' counter(page)"));
    let defaults = DocumentDefaults {
        page,
        ..DocumentDefaults::default()
    };
    let mut doc = Document::new(defaults, Box::new(ApproximateTypesetter::new()));
    let (tree, p) = paragraph("Body", "");
    let _ = doc.output_at(&tree, p, 300.0, 40.0, 40.0).unwrap();

    let finished = doc.finish().unwrap();
    let list = &finished.pages[0].display_list;
    assert!(matches!(list.commands()[0], DisplayCommand::FillRect { .. }));
    assert_eq!(list.texts(), vec!["Body", "Folio"]);
}

#[test]
fn test_body_font_carries_over_to_later_output_and_margin_boxes() {
    let mut page = PageRule::default();
    let _ = page.areas.insert("top-center".to_string(), area("'Head'"));
    let defaults = DocumentDefaults {
        page,
        ..DocumentDefaults::default()
    };
    let mut doc = Document::new(defaults, Box::new(ApproximateTypesetter::new()));

    let mut tree = DomTree::new();
    let body = tree.append_element(
        NodeId::ROOT,
        ElementData::new("body").with_attr("style", "font-size: 20pt"),
    );
    let _ = tree.append_text(body, "Body");
    let _ = doc.output_at(&tree, body, 300.0, 40.0, 40.0).unwrap();
    assert_eq!(doc.layout_context().root_font_size, Some(20.0));

    let (tree, p) = paragraph("Rem", "font-size: 1rem");
    let _ = doc.output_at(&tree, p, 300.0, 40.0, 100.0).unwrap();

    let finished = doc.finish().unwrap();
    let sizes: Vec<(String, f32)> = finished.pages[0]
        .display_list
        .commands()
        .iter()
        .filter_map(|command| match command {
            DisplayCommand::DrawText { text, style, .. } => Some((text.clone(), style.font_size)),
            _ => None,
        })
        .collect();
    assert_eq!(
        sizes,
        vec![
            ("Body".to_string(), 20.0),
            ("Rem".to_string(), 20.0),
            ("Head".to_string(), 20.0),
        ]
    );
}

#[test]
fn test_measure_keeps_document_defaults() {
    let doc = document();
    let mut tree = DomTree::new();
    let body = tree.append_element(
        NodeId::ROOT,
        ElementData::new("body").with_attr("style", "font-size: 20pt"),
    );
    let _ = tree.append_text(body, "Body");
    let _ = doc.measure(&tree, body, 300.0).unwrap();
    assert_eq!(doc.layout_context().root_font_size, None);
}

#[test]
fn test_end_page_needs_an_open_page() {
    let mut doc = document();
    assert!(matches!(doc.end_page(), Err(DocumentError::NoActivePage)));
}

#[test]
fn test_unknown_node() {
    let mut doc = document();
    let (tree, _) = paragraph("x", "");
    let err = doc.output_at(&tree, NodeId(99), 100.0, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, DocumentError::Layout(LayoutError::UnknownNode(99))));
}

#[test]
fn test_failed_output_leaves_no_page() {
    let mut doc = document();
    let (tree, p) = paragraph("x", "font-family: Missing");
    let err = doc.output_at(&tree, p, 100.0, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, DocumentError::Layout(LayoutError::MissingFont { .. })));
    assert!(doc.finish().unwrap().pages.is_empty());
}

#[test]
fn test_measure_places_nothing() {
    let mut doc = document();
    let (tree, p) = paragraph("aaa bbb ccc", "margin-top: 6pt");
    let height = doc.measure(&tree, p, 60.0).unwrap();
    assert!((height - 30.0).abs() < 0.001);
    assert!(doc.finish().unwrap().pages.is_empty());
}

#[test]
fn test_metadata_is_carried_to_the_output() {
    let mut doc = document();
    doc.set_title("Report");
    doc.set_author("A. Writer");
    doc.set_keywords("layout, pages");
    doc.set_creator("quire");
    doc.set_subject("Testing");
    let finished = doc.finish().unwrap();
    assert_eq!(finished.metadata.title.as_deref(), Some("Report"));
    assert_eq!(finished.metadata.author.as_deref(), Some("A. Writer"));
    assert_eq!(finished.metadata.keywords.as_deref(), Some("layout, pages"));
    assert_eq!(finished.metadata.creator.as_deref(), Some("quire"));
    assert_eq!(finished.metadata.subject.as_deref(), Some("Testing"));
}

#[test]
fn test_defaults_from_json() {
    let defaults: DocumentDefaults = serde_json::from_str(
        r#"{ "font-family": "monospace", "font-size": 12, "page": { "size": "letter" } }"#,
    )
    .unwrap();
    assert_eq!(defaults.layout.font_family, "monospace");
    assert!((defaults.layout.font_size - 12.0).abs() < 0.001);
    assert!((defaults.layout.line_height - 1.2).abs() < 0.001);
    assert_eq!(defaults.page.size.as_deref(), Some("letter"));
}

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("quire-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_file_images_are_measured_in_points() {
    let dir = scratch_dir("images");
    image::RgbaImage::new(96, 48).save(dir.join("pixel.png")).unwrap();

    let mut tree = DomTree::new();
    let p = tree.append_element(NodeId::ROOT, ElementData::new("p"));
    let _ = tree.append_element(p, ElementData::new("img").with_attr("src", "pixel.png"));

    let mut backend = FileTypesetter::new(&dir);
    assert_eq!(backend.load_images(&tree, NodeId::ROOT).unwrap(), 1);

    let mut doc = Document::new(DocumentDefaults::default(), Box::new(backend));
    let height = doc.output_at(&tree, p, 200.0, 0.0, 0.0).unwrap();
    assert!((height - 36.0).abs() < 0.001);
    let finished = doc.finish().unwrap();
    assert!(finished.pages[0].display_list.commands().iter().any(|c| matches!(
        c,
        DisplayCommand::DrawImage { width, .. } if (*width - 72.0).abs() < 0.001
    )));
}

#[test]
fn test_missing_image_file_reports_its_path() {
    let dir = scratch_dir("missing");
    let mut backend = FileTypesetter::new(&dir);
    match backend.load_image("nope.png") {
        Err(DocumentError::Image { path, .. }) => assert_eq!(path, dir.join("nope.png")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_new_document_reports_warnings_again() {
    quire_common::warning::warn_once("document-test", "seen by an earlier document");
    let _ = document();
    assert!(!quire_common::warning::was_warned(
        "document-test",
        "seen by an earlier document"
    ));
}
