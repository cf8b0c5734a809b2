//! The typesetting backend seam.
//!
//! Line breaking, font metrics, image measurement and table column
//! distribution are not done by the assembler. They sit behind
//! [`Typesetter`], which a PDF backend implements with real fonts.
//! [`ApproximateTypesetter`] is the reference implementation used by the
//! command line and in tests.

use std::collections::HashMap;

use serde::Serialize;

use super::box_tree::LayoutBox;
use super::inline::{
    FragmentContent, ImageItem, InlineItem, InlineRun, LineBox, LineFragment, ParagraphLayout,
    RunStyle, TextSegment,
};
use super::box_model::Rect;
use super::table::{TableBox, TableGrid};
use crate::style::TextAlign;

/// A font family known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FontFamilyId(pub usize);

/// Services the layout stage needs from a typesetting backend.
pub trait Typesetter {
    /// Look up one font family by name (no lists, no quotes).
    fn find_font_family(&self, name: &str) -> Option<FontFamilyId>;

    /// Intrinsic size of an image in points, `None` if it cannot be loaded.
    fn image_size(&self, src: &str) -> Option<(f32, f32)>;

    /// Advance width of `text` set in `style`.
    fn text_width(&self, text: &str, style: &RunStyle) -> f32;

    /// Break a run into lines no wider than `width`.
    fn format_paragraph(&self, run: &InlineRun, width: f32) -> ParagraphLayout;

    /// Column widths for a table laid out into at most `width` points.
    ///
    /// Stretch tables fill `width` exactly; others take their natural width,
    /// shrunk to `width` if needed.
    fn table_columns(&self, table: &TableBox, width: f32) -> Vec<f32>;
}

/// Approximate font metrics using fixed ratios.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// Without access to font data, every glyph is 0.6× the font size wide
/// (typical for Latin body text). Lines break greedily at spaces;
/// `justify` is set flush left and font expansion is not applied.
#[derive(Debug, Clone)]
pub struct ApproximateTypesetter {
    families: HashMap<String, FontFamilyId>,
    images: HashMap<String, (f32, f32)>,
}

impl Default for ApproximateTypesetter {
    fn default() -> Self {
        Self::new()
    }
}

/// Average advance width as a fraction of the font size.
const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Baseline position as a fraction of the line height.
const BASELINE_RATIO: f32 = 0.8;

impl ApproximateTypesetter {
    /// A typesetter with the generic `serif`, `sans-serif` and `monospace`
    /// families.
    #[must_use]
    pub fn new() -> Self {
        let mut typesetter = Self {
            families: HashMap::new(),
            images: HashMap::new(),
        };
        for name in ["serif", "sans-serif", "monospace"] {
            let _ = typesetter.register_family(name);
        }
        typesetter
    }

    /// Make a family name resolvable, returning its id.
    pub fn register_family(&mut self, name: &str) -> FontFamilyId {
        let next = FontFamilyId(self.families.len());
        *self
            .families
            .entry(name.trim().to_ascii_lowercase())
            .or_insert(next)
    }

    /// Register the intrinsic size of an image, in points.
    pub fn register_image(&mut self, src: &str, width: f32, height: f32) {
        let _ = self.images.insert(src.to_string(), (width, height));
    }

    /// Widest unbreakable content of a box, used for column widths.
    fn max_content(&self, layout_box: &LayoutBox) -> f32 {
        match layout_box {
            LayoutBox::Spacer(_) | LayoutBox::Empty => 0.0,
            LayoutBox::Inline(b) => {
                let mut widest = 0.0_f32;
                let mut line = 0.0_f32;
                for item in &b.run.items {
                    match item {
                        InlineItem::Text(seg) => line += self.text_width(&seg.text, &seg.style),
                        InlineItem::Image(img) => line += img.width,
                        InlineItem::LineBreak => {
                            widest = widest.max(line);
                            line = 0.0;
                        }
                    }
                }
                widest.max(line) + b.run.settings.indent.amount + b.decoration.horizontal()
            }
            LayoutBox::Block(b) => {
                b.children
                    .iter()
                    .map(|c| self.max_content(c))
                    .fold(0.0, f32::max)
                    + b.decoration.horizontal()
            }
            LayoutBox::Table(t) => {
                self.table_columns(t, f32::INFINITY).iter().sum::<f32>() + t.decoration.horizontal()
            }
        }
    }
}

impl Typesetter for ApproximateTypesetter {
    fn find_font_family(&self, name: &str) -> Option<FontFamilyId> {
        self.families.get(&name.trim().to_ascii_lowercase()).copied()
    }

    fn image_size(&self, src: &str) -> Option<(f32, f32)> {
        self.images.get(src).copied()
    }

    fn text_width(&self, text: &str, style: &RunStyle) -> f32 {
        let columns: usize = text
            .chars()
            .map(|c| if c == '\t' { style.tab_size as usize } else { 1 })
            .sum();
        columns as f32 * style.font_size * CHAR_WIDTH_RATIO
    }

    fn format_paragraph(&self, run: &InlineRun, width: f32) -> ParagraphLayout {
        let mut breaker = LineBreaker::new(self, run, width);
        for item in &run.items {
            match item {
                InlineItem::Text(seg) => breaker.push_segment(seg),
                InlineItem::Image(img) => breaker.push_image(img),
                InlineItem::LineBreak => breaker.break_line(true),
            }
        }
        breaker.finish()
    }

    fn table_columns(&self, table: &TableBox, width: f32) -> Vec<f32> {
        let grid = TableGrid::build(table);
        let mut columns = vec![0.0_f32; grid.columns];
        if columns.is_empty() {
            return columns;
        }

        let cell_width = |row: usize, cell: usize| {
            table.rows[row].cells[cell].contents_width(|b| self.max_content(b))
        };

        // Single-column cells set the natural widths; spanning cells then
        // widen their columns evenly if they still do not fit.
        for p in grid.placements.iter().filter(|p| p.col_span == 1) {
            columns[p.column] = columns[p.column].max(cell_width(p.row, p.cell));
        }
        for p in grid.placements.iter().filter(|p| p.col_span > 1) {
            let spanned = p.column..p.column + p.col_span;
            let have: f32 = columns[spanned.clone()].iter().sum();
            let need = cell_width(p.row, p.cell);
            if need > have {
                let extra = (need - have) / p.col_span as f32;
                for c in &mut columns[spanned] {
                    *c += extra;
                }
            }
        }

        let natural: f32 = columns.iter().sum();
        if width.is_finite() && (table.stretch || natural > width) {
            if natural > 0.0 {
                let scale = width / natural;
                for c in &mut columns {
                    *c *= scale;
                }
            } else {
                let each = width / columns.len() as f32;
                columns.fill(each);
            }
        }
        columns
    }
}

/// Greedy line breaking over one run.
struct LineBreaker<'a> {
    typesetter: &'a ApproximateTypesetter,
    run: &'a InlineRun,
    width: f32,
    lines: Vec<LineBox>,
    fragments: Vec<LineFragment>,
    /// Collapsible space waiting for the next word on the same line.
    pending_space: Option<(TextSegment, f32)>,
    x: f32,
    line_height: f32,
    overflow: bool,
}

impl<'a> LineBreaker<'a> {
    fn new(typesetter: &'a ApproximateTypesetter, run: &'a InlineRun, width: f32) -> Self {
        Self {
            typesetter,
            run,
            width,
            lines: Vec::new(),
            fragments: Vec::new(),
            pending_space: None,
            x: 0.0,
            line_height: run.settings.line_height,
            overflow: false,
        }
    }

    fn indent(&self) -> f32 {
        let indent = self.run.settings.indent;
        if indent.applies_to(self.lines.len()) {
            indent.amount
        } else {
            0.0
        }
    }

    fn available(&self) -> f32 {
        (self.width - self.indent()).max(0.0)
    }

    fn push_segment(&mut self, seg: &TextSegment) {
        if seg.style.preserve_whitespace {
            for (i, line) in seg.text.split('\n').enumerate() {
                if i > 0 {
                    self.break_line(true);
                }
                for word in split_keeping_spaces(line) {
                    self.place_text(seg, word, true);
                }
            }
            return;
        }
        for word in split_keeping_spaces(&seg.text) {
            if word.chars().all(char::is_whitespace) {
                let width = self.typesetter.text_width(" ", &seg.style);
                if !self.fragments.is_empty() {
                    self.pending_space = Some((segment_with(seg, " "), width));
                }
            } else {
                self.place_text(seg, word, false);
            }
        }
    }

    fn place_text(&mut self, seg: &TextSegment, word: &str, preserve: bool) {
        let width = self.typesetter.text_width(word, &seg.style);
        if preserve {
            self.overflow |= self.x + width > self.available();
        } else {
            self.make_room(width);
        }
        self.line_height = self.line_height.max(seg.style.font_size * 1.2);
        if !preserve {
            self.flush_pending_space();
        }
        self.append(FragmentContent::Text(segment_with(seg, word)), width);
    }

    fn push_image(&mut self, img: &ImageItem) {
        self.make_room(img.width);
        self.flush_pending_space();
        self.line_height = self.line_height.max(img.height);
        self.append(FragmentContent::Image(img.clone()), img.width);
    }

    /// Start a new line if `width` more does not fit on a non-empty line.
    fn make_room(&mut self, width: f32) {
        let space = self.pending_space.as_ref().map_or(0.0, |(_, w)| *w);
        if !self.fragments.is_empty() && self.x + space + width > self.available() {
            self.break_line(false);
        }
        if self.fragments.is_empty() && width > self.available() {
            self.overflow = true;
        }
    }

    fn flush_pending_space(&mut self) {
        if let Some((space, width)) = self.pending_space.take() {
            self.append(FragmentContent::Text(space), width);
        }
    }

    fn append(&mut self, content: FragmentContent, width: f32) {
        if let (Some(last), FragmentContent::Text(next)) = (self.fragments.last_mut(), &content)
            && let FragmentContent::Text(prev) = &mut last.content
            && prev.style == next.style
            && prev.href == next.href
        {
            prev.text.push_str(&next.text);
            last.width += width;
            self.x += width;
            return;
        }
        self.fragments.push(LineFragment {
            x: self.x,
            width,
            content,
        });
        self.x += width;
    }

    /// Close the current line. Forced breaks close empty lines too.
    fn break_line(&mut self, forced: bool) {
        self.pending_space = None;
        if self.fragments.is_empty() && !forced {
            return;
        }
        let used = self.x;
        let offset = self.indent()
            + match self.run.settings.text_align {
                TextAlign::Left | TextAlign::Justify => 0.0,
                TextAlign::Right => (self.available() - used).max(0.0),
                TextAlign::Center => ((self.available() - used) / 2.0).max(0.0),
            };
        let mut fragments = std::mem::take(&mut self.fragments);
        let mut hang = 0.0;
        if self.run.settings.hanging_punctuation
            && let Some(LineFragment {
                content: FragmentContent::Text(first),
                ..
            }) = fragments.first()
            && let Some(c) = first.text.chars().next()
            && "\"'“‘«(".contains(c)
        {
            hang = self.typesetter.text_width(&c.to_string(), &first.style);
        }
        for fragment in &mut fragments {
            fragment.x += offset - hang;
        }
        let top = self.lines.last().map_or(0.0, |l| l.bounds.y + l.bounds.height);
        self.lines.push(LineBox {
            bounds: Rect::new(offset - hang, top, used, self.line_height),
            baseline: self.line_height * BASELINE_RATIO,
            fragments,
        });
        self.x = 0.0;
        self.line_height = self.run.settings.line_height;
    }

    fn finish(mut self) -> ParagraphLayout {
        if !self.fragments.is_empty() {
            self.break_line(false);
        }
        let height = self.lines.last().map_or(0.0, |l| l.bounds.y + l.bounds.height);
        let width = self
            .lines
            .iter()
            .map(|l| l.bounds.x + l.bounds.width)
            .fold(0.0, f32::max);
        ParagraphLayout {
            lines: self.lines,
            height,
            width,
            overflow: self.overflow,
        }
    }
}

fn segment_with(seg: &TextSegment, text: &str) -> TextSegment {
    TextSegment {
        text: text.to_string(),
        style: seg.style.clone(),
        href: seg.href.clone(),
    }
}

/// Split into alternating words and whitespace runs, dropping nothing.
fn split_keeping_spaces(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            parts.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}
