//! Table assembly.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! The assembler builds the logical grid only: rows in source order, cells
//! with resolved decoration, alignment and spans, and each cell's content
//! laid out as ordinary boxes. Column widths and final geometry belong to
//! the backend ([`super::backend::Typesetter::table_columns`]) and the
//! placer.
//!
//! - `<thead>`, `<tbody>`, `<tfoot>` and direct `<tr>` children are row
//!   sources, concatenated in document order
//! - `rowspan`/`colspan` are stored as the extra span (declared minus one)
//! - `<caption>`, `<colgroup>` and `border-collapse` are not supported

use quire_common::warning::warn_once;
use serde::Serialize;
use strum_macros::Display;

use super::assembler::LayoutAssembler;
use super::box_tree::{Decoration, LayoutBox};
use super::box_model::EdgeSizes;
use crate::error::LayoutError;
use crate::flow::FlowItem;
use crate::style::{StyleStack, TextAlign, VerticalAlign, resolve_width};

/// Largest `colspan` a cell keeps.
pub const MAX_COLSPAN: u32 = 1000;

/// Largest `rowspan` a cell keeps.
pub const MAX_ROWSPAN: u32 = 65534;

/// Which row group a row came from.
///
/// [§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RowGroup {
    /// `<thead>`
    Head,
    /// `<tbody>`
    Body,
    /// `<tfoot>`
    Foot,
    /// A `<tr>` directly inside `<table>`.
    Direct,
}

/// One cell of the logical grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    /// True for `<th>`.
    pub header: bool,
    /// Padding, border widths, colors, styles and background. Margins are
    /// always zero.
    pub decoration: Decoration,
    /// Vertical alignment of the content inside the row.
    pub vertical_align: VerticalAlign,
    /// Horizontal alignment of the content.
    pub text_align: TextAlign,
    /// Rows spanned beyond the first.
    pub extra_rowspan: u32,
    /// Columns spanned beyond the first.
    pub extra_colspan: u32,
    /// Cell content, laid out at the table's maximum width.
    pub contents: Vec<LayoutBox>,
}

impl TableCell {
    /// Declared row span.
    #[must_use]
    pub const fn row_span(&self) -> usize {
        self.extra_rowspan as usize + 1
    }

    /// Declared column span.
    #[must_use]
    pub const fn col_span(&self) -> usize {
        self.extra_colspan as usize + 1
    }

    /// Width of the widest content box as measured by `measure`, plus
    /// padding and borders.
    #[must_use]
    pub fn contents_width(&self, measure: impl Fn(&LayoutBox) -> f32) -> f32 {
        self.contents.iter().map(measure).fold(0.0, f32::max) + self.decoration.horizontal()
    }
}

/// A row of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Source row group.
    pub group: RowGroup,
    /// Cells in source order.
    pub cells: Vec<TableCell>,
}

/// A table box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBox {
    /// Generating tag.
    pub tag: String,
    /// Rows of every group, in document order.
    pub rows: Vec<TableRow>,
    /// Box decoration of the table itself.
    pub decoration: Decoration,
    /// Width the columns are distributed into.
    pub max_width: f32,
    /// Columns fill `max_width` exactly (`width: N%`).
    pub stretch: bool,
}

/// Where a cell sits in the grid, after spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellPlacement {
    /// Row index, also the index into [`TableBox::rows`].
    pub row: usize,
    /// First column.
    pub column: usize,
    /// Rows covered, at least one, clipped to the table.
    pub row_span: usize,
    /// Columns covered, at least one.
    pub col_span: usize,
    /// Index into the row's cells.
    pub cell: usize,
}

/// [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout)
///
/// "Cells may span several rows or columns." A cell is placed in the first
/// column of its row not covered by a cell spanning down from a row above.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableGrid {
    /// Number of columns.
    pub columns: usize,
    /// Number of rows.
    pub rows: usize,
    /// One placement per cell, in row order.
    pub placements: Vec<CellPlacement>,
}

impl TableGrid {
    /// Place every cell of `table`.
    #[must_use]
    pub fn build(table: &TableBox) -> Self {
        let rows = table.rows.len();
        let mut occupied: Vec<Vec<bool>> = vec![Vec::new(); rows];
        let mut grid = Self {
            columns: 0,
            rows,
            placements: Vec::new(),
        };

        for (r, row) in table.rows.iter().enumerate() {
            let mut column = 0;
            for (index, cell) in row.cells.iter().enumerate() {
                while occupied[r].get(column).copied().unwrap_or(false) {
                    column += 1;
                }
                let row_span = cell.row_span().min(rows - r);
                let col_span = cell.col_span();
                for covered in &mut occupied[r..r + row_span] {
                    if covered.len() < column + col_span {
                        covered.resize(column + col_span, false);
                    }
                    covered[column..column + col_span].fill(true);
                }
                grid.placements.push(CellPlacement {
                    row: r,
                    column,
                    row_span,
                    col_span,
                    cell: index,
                });
                column += col_span;
            }
        }
        grid.columns = occupied.iter().map(Vec::len).max().unwrap_or(0);
        grid
    }
}

impl LayoutAssembler<'_> {
    /// Build a table box. The table's own frame is the top of `stack`.
    pub(super) fn layout_table(
        &mut self,
        item: &FlowItem,
        max_width: f32,
        stack: &mut StyleStack,
    ) -> Result<LayoutBox, LayoutError> {
        let frame = stack.top().cloned().unwrap_or_default();
        let decoration = Decoration::from_frame(&frame);

        // "width: N%" makes the table fill that share of the width it was
        // given; anything else is a maximum.
        let available = max_width - decoration.horizontal();
        let declared = frame.width.as_deref().unwrap_or("auto");
        let stretch = declared.trim().ends_with('%');
        let basis = if stretch { max_width } else { available };
        let target = resolve_width(declared, basis, frame.font_size, self.root_font_size())
            .map_err(|err| LayoutError::from_value(err, &item.tag, "width"))?
            .map_or(available, |w| if stretch { w } else { w.min(available) })
            .max(0.0);

        let mut rows = Vec::new();
        for child in item.children.iter().filter(|c| c.is_element()) {
            let group = match child.tag.as_str() {
                "thead" => RowGroup::Head,
                "tbody" => RowGroup::Body,
                "tfoot" => RowGroup::Foot,
                "tr" => {
                    if let Some(row) = self.layout_row(child, RowGroup::Direct, target, stack)? {
                        rows.push(row);
                    }
                    continue;
                }
                other => {
                    warn_once("table", &format!("ignoring <{other}> inside <table>"));
                    continue;
                }
            };
            let mut guard = stack.push();
            guard
                .frame_mut()
                .apply(&child.declarations, &child.tag, self.root_font_size())?;
            if guard.frame().hidden {
                continue;
            }
            for tr in child.children_tagged("tr") {
                if let Some(row) = self.layout_row(tr, group, target, &mut guard)? {
                    rows.push(row);
                }
            }
        }

        Ok(LayoutBox::Table(TableBox {
            tag: item.tag.clone(),
            rows,
            decoration,
            max_width: target,
            stretch,
        }))
    }

    fn layout_row(
        &mut self,
        item: &FlowItem,
        group: RowGroup,
        max_width: f32,
        stack: &mut StyleStack,
    ) -> Result<Option<TableRow>, LayoutError> {
        let mut guard = stack.push();
        guard
            .frame_mut()
            .apply(&item.declarations, &item.tag, self.root_font_size())?;
        if guard.frame().hidden {
            return Ok(None);
        }
        let mut cells = Vec::new();
        for cell in item
            .children
            .iter()
            .filter(|c| c.is_element() && matches!(c.tag.as_str(), "td" | "th"))
        {
            if let Some(cell) = self.layout_cell(cell, max_width, &mut guard)? {
                cells.push(cell);
            }
        }
        Ok(Some(TableRow { group, cells }))
    }

    fn layout_cell(
        &mut self,
        item: &FlowItem,
        max_width: f32,
        stack: &mut StyleStack,
    ) -> Result<Option<TableCell>, LayoutError> {
        let extra_rowspan = extra_span(item, "rowspan")?;
        let extra_colspan = extra_span(item, "colspan")?;

        let mut guard = stack.push();
        guard
            .frame_mut()
            .apply(&item.declarations, &item.tag, self.root_font_size())?;
        if guard.frame().hidden {
            return Ok(None);
        }
        let frame = guard.frame();
        let decoration = Decoration {
            margin: EdgeSizes::default(),
            ..Decoration::from_frame(frame)
        };
        let vertical_align = frame.vertical_align;
        let text_align = frame.text_align;

        let width = (max_width - decoration.horizontal()).max(0.0);
        let contents = self.layout_children(&item.children, &item.tag, width, &mut guard)?;
        Ok(Some(TableCell {
            header: item.tag == "th",
            decoration,
            vertical_align,
            text_align,
            extra_rowspan,
            extra_colspan,
            contents,
        }))
    }
}

/// [§ 4.9.11 Attributes common to td and th elements](https://html.spec.whatwg.org/multipage/tables.html#attributes-common-to-td-and-th-elements)
///
/// Parse a span attribute into the extra span. A missing attribute is zero
/// extra; a zero span is treated as one.
///
/// "If parsing that value failed or if the attribute is absent, then let
/// colspan be 1, instead. If colspan is greater than 1000, let it be 1000
/// instead." Row spans stop at 65534 the same way.
fn extra_span(item: &FlowItem, attribute: &str) -> Result<u32, LayoutError> {
    let Some(value) = item.attr(attribute) else {
        return Ok(0);
    };
    let span: u32 = value.trim().parse().map_err(|_| LayoutError::InvalidSpan {
        tag: item.tag.clone(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    })?;
    if span == 0 {
        warn_once("table", &format!("{attribute}=\"0\" on <{}> treated as 1", item.tag));
    }
    let limit = if attribute == "colspan" {
        MAX_COLSPAN
    } else {
        MAX_ROWSPAN
    };
    if span > limit {
        warn_once(
            "table",
            &format!("{attribute}=\"{span}\" on <{}> clamped to {limit}", item.tag),
        );
    }
    Ok(span.min(limit).saturating_sub(1))
}
