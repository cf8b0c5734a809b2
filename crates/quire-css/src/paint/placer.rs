//! Placement: a box tree at absolute page coordinates.
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! Boxes stack top to bottom. Vertical margins are already spacers in the
//! tree; the placer applies left margins, draws background and border
//! behind each box's content, asks the backend to break paragraphs and to
//! size table columns, and emits the resulting lines.

use super::{DisplayCommand, DisplayList};
use crate::layout::{
    BlockBox, Decoration, FragmentContent, InlineBox, LayoutBox, Marker, TableBox, TableGrid,
    Typesetter,
};
use crate::style::VerticalAlign;

/// Gap between a list marker and the item's text, as a fraction of the
/// marker's font size.
const MARKER_GAP: f32 = 0.5;

/// Places box trees through a typesetting backend.
pub struct Placer<'a> {
    backend: &'a dyn Typesetter,
}

impl<'a> Placer<'a> {
    /// A placer using `backend` for line breaking and column widths.
    #[must_use]
    pub fn new(backend: &'a dyn Typesetter) -> Self {
        Self { backend }
    }

    /// Paint `layout_box` with its top-left corner at `(x, y)` into at most
    /// `width` points, returning the display list and the height used.
    #[must_use]
    pub fn paint(&self, layout_box: &LayoutBox, x: f32, y: f32, width: f32) -> (DisplayList, f32) {
        let mut list = DisplayList::new();
        let height = self.place(layout_box, x, y, width, &mut list);
        (list, height)
    }

    /// Place one box, appending its commands to `list`. Returns the height
    /// of its border box (or spacer).
    pub fn place(
        &self,
        layout_box: &LayoutBox,
        x: f32,
        y: f32,
        available: f32,
        list: &mut DisplayList,
    ) -> f32 {
        match layout_box {
            LayoutBox::Spacer(spacer) => spacer.height,
            LayoutBox::Empty => 0.0,
            LayoutBox::Inline(b) => self.place_paragraph(b, x, y, available, list),
            LayoutBox::Block(b) => self.place_block(b, x, y, available, list),
            LayoutBox::Table(t) => self.place_table(t, x, y, available, list),
        }
    }

    fn place_paragraph(
        &self,
        b: &InlineBox,
        x: f32,
        y: f32,
        available: f32,
        list: &mut DisplayList,
    ) -> f32 {
        let width = b.width.min(available - b.decoration.horizontal()).max(0.0);
        decorate(&b.decoration, x, y, width, list, |out, cx, cy| {
            let layout = self.backend.format_paragraph(&b.run, width);
            if let Some(marker) = &b.marker {
                let baseline = layout
                    .lines
                    .first()
                    .map_or(marker.style.font_size, |l| l.bounds.y + l.baseline);
                self.place_marker(marker, cx + b.run.settings.indent.amount, cy + baseline, out);
            }
            for line in &layout.lines {
                let baseline = cy + line.bounds.y + line.baseline;
                for fragment in &line.fragments {
                    out.push(match &fragment.content {
                        FragmentContent::Text(seg) => DisplayCommand::DrawText {
                            x: cx + fragment.x,
                            y: baseline,
                            text: seg.text.clone(),
                            style: seg.style.clone(),
                            href: seg.href.clone(),
                        },
                        FragmentContent::Image(img) => DisplayCommand::DrawImage {
                            x: cx + fragment.x,
                            y: baseline - img.height,
                            width: img.width,
                            height: img.height,
                            src: img.src.clone(),
                            href: img.href.clone(),
                        },
                    });
                }
            }
            layout.height
        })
    }

    fn place_block(
        &self,
        b: &BlockBox,
        x: f32,
        y: f32,
        available: f32,
        list: &mut DisplayList,
    ) -> f32 {
        let width = b.width.min(available - b.decoration.horizontal()).max(0.0);
        decorate(&b.decoration, x, y, width, list, |out, cx, cy| {
            if let Some(marker) = &b.marker {
                self.place_marker(marker, cx, cy + marker.style.font_size, out);
            }
            let mut height = 0.0;
            for child in &b.children {
                height += self.place(child, cx, cy + height, width, out);
            }
            height
        })
    }

    /// Hang a marker so that it ends a small gap before `right`.
    fn place_marker(&self, marker: &Marker, right: f32, baseline: f32, out: &mut DisplayList) {
        let width = self.backend.text_width(&marker.text, &marker.style);
        out.push(DisplayCommand::DrawText {
            x: right - marker.style.font_size * MARKER_GAP - width,
            y: baseline,
            text: marker.text.clone(),
            style: marker.style.clone(),
            href: None,
        });
    }

    /// [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)
    ///
    /// A row is as tall as its tallest single-row cell. A cell spanning
    /// several rows that still does not fit adds the difference to the last
    /// row it spans.
    fn place_table(
        &self,
        t: &TableBox,
        x: f32,
        y: f32,
        available: f32,
        list: &mut DisplayList,
    ) -> f32 {
        let limit = t.max_width.min(available - t.decoration.horizontal()).max(0.0);
        let columns = self.backend.table_columns(t, limit);
        let grid = TableGrid::build(t);
        let width: f32 = columns.iter().sum();

        decorate(&t.decoration, x, y, width, list, |out, cx, cy| {
            let column_x: Vec<f32> = columns
                .iter()
                .scan(0.0, |acc, w| {
                    let start = *acc;
                    *acc += w;
                    Some(start)
                })
                .collect();

            // Lay every cell's content out at the origin first to learn its
            // height.
            let mut contents = Vec::with_capacity(grid.placements.len());
            for p in &grid.placements {
                let cell = &t.rows[p.row].cells[p.cell];
                let cell_width: f32 = columns[p.column..p.column + p.col_span].iter().sum();
                let inner = (cell_width - cell.decoration.horizontal()).max(0.0);
                let mut cell_list = DisplayList::new();
                let mut height = 0.0;
                for child in &cell.contents {
                    height += self.place(child, 0.0, height, inner, &mut cell_list);
                }
                contents.push((cell_list, height, cell_width));
            }

            let mut row_heights = vec![0.0_f32; grid.rows];
            for (p, (_, height, _)) in grid.placements.iter().zip(&contents) {
                let needed = height + t.rows[p.row].cells[p.cell].decoration.inner_vertical();
                if p.row_span == 1 {
                    row_heights[p.row] = row_heights[p.row].max(needed);
                }
            }
            for (p, (_, height, _)) in grid.placements.iter().zip(&contents) {
                let needed = height + t.rows[p.row].cells[p.cell].decoration.inner_vertical();
                let spanned = p.row..p.row + p.row_span;
                let have: f32 = row_heights[spanned.clone()].iter().sum();
                if p.row_span > 1 && needed > have {
                    row_heights[spanned.end - 1] += needed - have;
                }
            }
            let row_y: Vec<f32> = row_heights
                .iter()
                .scan(0.0, |acc, h| {
                    let start = *acc;
                    *acc += h;
                    Some(start)
                })
                .collect();

            for (p, (mut cell_list, content_height, cell_width)) in
                grid.placements.iter().zip(contents)
            {
                let cell = &t.rows[p.row].cells[p.cell];
                let cell_height: f32 = row_heights[p.row..p.row + p.row_span].iter().sum();
                let free = (cell_height - cell.decoration.inner_vertical() - content_height).max(0.0);
                let offset = match cell.vertical_align {
                    VerticalAlign::Top => 0.0,
                    VerticalAlign::Middle => free / 2.0,
                    VerticalAlign::Bottom => free,
                };
                let inner_width = (cell_width - cell.decoration.horizontal()).max(0.0);
                let _ = decorate(
                    &cell.decoration,
                    cx + column_x[p.column],
                    cy + row_y[p.row],
                    inner_width,
                    out,
                    |cell_out, inner_x, inner_y| {
                        cell_list.translate(inner_x, inner_y + offset);
                        cell_out.extend(cell_list);
                        cell_height - cell.decoration.inner_vertical()
                    },
                );
            }
            row_heights.iter().sum()
        })
    }
}

/// [§ 8.1 Box dimensions](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
///
/// Draw the background and border of a box around content produced by
/// `content`, which receives the content origin and returns the content
/// height. The background goes under the padding box, the border outside
/// it; both are painted before the content. Returns the border box height.
pub fn decorate(
    decoration: &Decoration,
    x: f32,
    y: f32,
    content_width: f32,
    list: &mut DisplayList,
    content: impl FnOnce(&mut DisplayList, f32, f32) -> f32,
) -> f32 {
    let border = &decoration.border;
    let padding = &decoration.padding;
    let left = x + decoration.margin.left;
    let content_x = left + border.left + padding.left;
    let content_y = y + border.top + padding.top;

    let mut inner = DisplayList::new();
    let content_height = content(&mut inner, content_x, content_y);

    let padding_width = content_width + padding.horizontal();
    let padding_height = content_height + padding.vertical();
    if let Some(color) = decoration.background {
        list.push(DisplayCommand::FillRect {
            x: left + border.left,
            y: y + border.top,
            width: padding_width,
            height: padding_height,
            color,
            radii: decoration.radii,
        });
    }
    if border.horizontal() + border.vertical() > 0.0 {
        list.push(DisplayCommand::StrokeBorder {
            x: left,
            y,
            width: padding_width + border.horizontal(),
            height: padding_height + border.vertical(),
            widths: *border,
            colors: decoration.border_colors,
            styles: decoration.border_styles,
            radii: decoration.radii,
        });
    }
    list.extend(inner);
    padding_height + border.vertical()
}
