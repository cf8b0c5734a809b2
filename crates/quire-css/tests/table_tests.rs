//! Integration tests for table layout.

use quire_css::LayoutError;
use quire_css::flow::classify;
use quire_css::layout::{
    ApproximateTypesetter, LayoutAssembler, LayoutBox, LayoutContext, RowGroup, TableBox,
    TableGrid, Typesetter,
};
use quire_css::layout::table::{MAX_COLSPAN, MAX_ROWSPAN};
use quire_dom::{DomTree, ElementData, NodeId};

fn layout(tree: &DomTree) -> Result<TableBox, LayoutError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = ApproximateTypesetter::new();
    let mut assembler = LayoutAssembler::new(&backend, LayoutContext::default());
    let root = assembler.layout(&classify(tree, NodeId::ROOT), 400.0)?;
    let LayoutBox::Block(root) = root else {
        panic!("root is not a block");
    };
    match root.children.into_iter().next() {
        Some(LayoutBox::Table(table)) => Ok(table),
        other => panic!("expected a table, got {other:?}"),
    }
}

fn cell(tree: &mut DomTree, row: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) {
    let mut data = ElementData::new(tag);
    for (name, value) in attrs {
        data = data.with_attr(name, value);
    }
    let id = tree.append_element(row, data);
    let _ = tree.append_text(id, text);
}

fn simple_table(cell_attrs: &[(&str, &str)]) -> DomTree {
    let mut tree = DomTree::new();
    let table = tree.append_element(NodeId::ROOT, ElementData::new("table"));
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", cell_attrs, "cell");
    tree
}

#[test]
fn test_rowspan_becomes_extra_rows() {
    let table = layout(&simple_table(&[("rowspan", "3")])).unwrap();
    assert_eq!(table.rows[0].cells[0].extra_rowspan, 2);
    assert_eq!(table.rows[0].cells[0].extra_colspan, 0);

    let table = layout(&simple_table(&[])).unwrap();
    assert_eq!(table.rows[0].cells[0].extra_rowspan, 0);
}

#[test]
fn test_zero_span_counts_as_one() {
    let table = layout(&simple_table(&[("colspan", "0")])).unwrap();
    assert_eq!(table.rows[0].cells[0].col_span(), 1);
}

#[test]
fn test_non_numeric_span_is_an_error() {
    let err = layout(&simple_table(&[("rowspan", "abc")])).unwrap_err();
    assert_eq!(
        err,
        LayoutError::InvalidSpan {
            tag: "td".to_string(),
            attribute: "rowspan".to_string(),
            value: "abc".to_string(),
        }
    );
}

#[test]
fn test_cell_border_style_none_removes_width() {
    let table = layout(&simple_table(&[("style", "border-top: 2pt; border-style: none")])).unwrap();
    assert!(table.rows[0].cells[0].decoration.border.top.abs() < f32::EPSILON);

    let table = layout(&simple_table(&[("style", "border-top: 2pt solid black")])).unwrap();
    assert!((table.rows[0].cells[0].decoration.border.top - 2.0).abs() < 0.001);
}

#[test]
fn test_percentage_width_stretches() {
    let mut tree = DomTree::new();
    let table = tree.append_element(
        NodeId::ROOT,
        ElementData::new("table").with_attr("style", "width: 50%"),
    );
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[], "a");
    cell(&mut tree, tr, "td", &[], "b");

    let table = layout(&tree).unwrap();
    assert!(table.stretch);
    assert!((table.max_width - 200.0).abs() < 0.001);

    let columns = ApproximateTypesetter::new().table_columns(&table, table.max_width);
    assert_eq!(columns.len(), 2);
    assert!((columns.iter().sum::<f32>() - 200.0).abs() < 0.01);
}

#[test]
fn test_percentage_width_ignores_table_margin() {
    let mut tree = DomTree::new();
    let table = tree.append_element(
        NodeId::ROOT,
        ElementData::new("table").with_attr("style", "width: 50%; margin-left: 40pt"),
    );
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[], "a");

    let table = layout(&tree).unwrap();
    assert!(table.stretch);
    assert!((table.max_width - 200.0).abs() < 0.001);
}

#[test]
fn test_huge_spans_are_clamped() {
    let table = layout(&simple_table(&[
        ("colspan", "4294967295"),
        ("rowspan", "4294967295"),
    ]))
    .unwrap();
    let cell = &table.rows[0].cells[0];
    assert_eq!(cell.extra_colspan, MAX_COLSPAN - 1);
    assert_eq!(cell.extra_rowspan, MAX_ROWSPAN - 1);

    let grid = TableGrid::build(&table);
    assert_eq!(grid.rows, 1);
    assert_eq!(grid.columns, MAX_COLSPAN as usize);
}

#[test]
fn test_fixed_width_is_a_maximum() {
    let mut tree = DomTree::new();
    let table = tree.append_element(
        NodeId::ROOT,
        ElementData::new("table").with_attr("style", "width: 600pt"),
    );
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[], "a");

    let table = layout(&tree).unwrap();
    assert!(!table.stretch);
    assert!((table.max_width - 400.0).abs() < 0.001);

    let columns = ApproximateTypesetter::new().table_columns(&table, table.max_width);
    assert!((columns[0] - 6.0).abs() < 0.001);
}

#[test]
fn test_row_groups_and_header_cells() {
    let mut tree = DomTree::new();
    let table = tree.append_element(NodeId::ROOT, ElementData::new("table"));
    for (group, tag) in [("thead", "th"), ("tbody", "td"), ("tfoot", "td")] {
        let section = tree.append_element(table, ElementData::new(group));
        let tr = tree.append_element(section, ElementData::new("tr"));
        cell(&mut tree, tr, tag, &[], group);
    }
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[], "loose");

    let table = layout(&tree).unwrap();
    let groups: Vec<_> = table.rows.iter().map(|r| r.group).collect();
    assert_eq!(
        groups,
        vec![RowGroup::Head, RowGroup::Body, RowGroup::Foot, RowGroup::Direct]
    );
    assert!(table.rows[0].cells[0].header);
    assert!(table.rows[0].cells[0].contents[0].tag().is_empty());
    assert!(!table.rows[1].cells[0].header);
}

#[test]
fn test_hidden_row_is_skipped() {
    let mut tree = DomTree::new();
    let table = tree.append_element(NodeId::ROOT, ElementData::new("table"));
    let tr = tree.append_element(table, ElementData::new("tr").with_attr("style", "display: none"));
    cell(&mut tree, tr, "td", &[], "gone");
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[], "kept");

    let table = layout(&tree).unwrap();
    assert_eq!(table.rows.len(), 1);
}

#[test]
fn test_grid_places_cells_around_spans() {
    // +---+---+---+
    // | a     | b |
    // +---+---+   |
    // | c | d |   |
    // +---+---+---+
    let mut tree = DomTree::new();
    let table = tree.append_element(NodeId::ROOT, ElementData::new("table"));
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[("colspan", "2")], "a");
    cell(&mut tree, tr, "td", &[("rowspan", "5")], "b");
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[], "c");
    cell(&mut tree, tr, "td", &[], "d");

    let table = layout(&tree).unwrap();
    let grid = TableGrid::build(&table);
    assert_eq!(grid.columns, 3);
    assert_eq!(grid.rows, 2);
    let spots: Vec<_> = grid
        .placements
        .iter()
        .map(|p| (p.row, p.column, p.row_span, p.col_span))
        .collect();
    assert_eq!(
        spots,
        vec![(0, 0, 1, 2), (0, 2, 2, 1), (1, 0, 1, 1), (1, 1, 1, 1)]
    );
}

#[test]
fn test_spanning_cell_widens_its_columns() {
    let mut tree = DomTree::new();
    let table = tree.append_element(NodeId::ROOT, ElementData::new("table"));
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[("colspan", "2")], "abcdefghij");
    let tr = tree.append_element(table, ElementData::new("tr"));
    cell(&mut tree, tr, "td", &[], "a");
    cell(&mut tree, tr, "td", &[], "abc");

    let table = layout(&tree).unwrap();
    let columns = ApproximateTypesetter::new().table_columns(&table, table.max_width);
    // Natural widths 6 and 18; the 60pt spanning cell adds 18 to each.
    assert!((columns[0] - 24.0).abs() < 0.001);
    assert!((columns[1] - 36.0).abs() < 0.001);
}
