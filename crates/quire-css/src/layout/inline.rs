//! Inline runs: the input of the paragraph formatter.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! An [`InlineRun`] is the flattened content of one paragraph: styled text
//! segments, images and forced breaks, plus the paragraph-wide settings.
//! Nested inline elements are gone by the time a run exists; their style
//! lives on in each segment's [`RunStyle`]. Breaking a run into lines is the
//! backend's job and produces a [`ParagraphLayout`].

use serde::Serialize;

use super::backend::FontFamilyId;
use super::box_model::Rect;
use crate::style::{ColorValue, FontStyle, Indent, TextAlign, VerticalAlign};

/// The per-segment style handed to the formatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStyle {
    /// Resolved font family.
    pub font_family: FontFamilyId,
    /// Font size in points.
    pub font_size: f32,
    /// Numeric weight.
    pub font_weight: u16,
    /// Upright or italic.
    pub font_style: FontStyle,
    /// Text color.
    pub color: ColorValue,
    /// OpenType features.
    pub features: Vec<String>,
    /// Spaces and newlines are kept as written.
    pub preserve_whitespace: bool,
    /// Tab width in spaces.
    pub tab_size: u32,
}

impl RunStyle {
    /// True for weights of 600 and above.
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }
}

/// A styled run of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSegment {
    /// Character data.
    pub text: String,
    /// Style for every character of `text`.
    pub style: RunStyle,
    /// Link target when inside `<a href>`.
    pub href: Option<String>,
}

/// [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageItem {
    /// Image source.
    pub src: String,
    /// Used width in points.
    pub width: f32,
    /// Used height in points.
    pub height: f32,
    /// Link target when inside `<a href>`.
    pub href: Option<String>,
}

/// One element of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "item", rename_all = "kebab-case")]
pub enum InlineItem {
    /// Styled text.
    Text(TextSegment),
    /// An inline image.
    Image(ImageItem),
    /// A forced line break (`<br>`).
    LineBreak,
}

/// Settings that apply to the whole paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphSettings {
    /// Horizontal alignment of lines.
    pub text_align: TextAlign,
    /// Vertical alignment inside a fixed-height area.
    pub vertical_align: VerticalAlign,
    /// Distance between baselines, in points.
    pub line_height: f32,
    /// Hanging indent.
    pub indent: Indent,
    /// Font expansion factor for justification.
    pub font_expansion: f32,
    /// Allow punctuation to hang into the margin.
    pub hanging_punctuation: bool,
}

impl Default for ParagraphSettings {
    fn default() -> Self {
        Self {
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            line_height: 12.0,
            indent: Indent::default(),
            font_expansion: 1.0,
            hanging_punctuation: false,
        }
    }
}

/// The flattened content of one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineRun {
    /// Paragraph-wide settings.
    pub settings: ParagraphSettings,
    /// Content in document order.
    pub items: Vec<InlineItem>,
}

impl InlineRun {
    /// True when the run has no text other than collapsible spaces and no
    /// images.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.items.iter().all(|item| match item {
            InlineItem::Text(seg) => {
                !seg.style.preserve_whitespace && seg.text.trim().is_empty()
            }
            InlineItem::Image(_) => false,
            InlineItem::LineBreak => true,
        })
    }

    /// The text segments of the run.
    pub fn segments(&self) -> impl Iterator<Item = &TextSegment> {
        self.items.iter().filter_map(|item| match item {
            InlineItem::Text(seg) => Some(seg),
            _ => None,
        })
    }

    /// All text, concatenated.
    #[must_use]
    pub fn text(&self) -> String {
        self.segments().map(|s| s.text.as_str()).collect()
    }
}

/// Accumulates the items of one run.
///
/// Adjacent text with identical style and link is merged into one segment.
#[derive(Debug)]
pub struct InlineRunBuilder {
    settings: ParagraphSettings,
    items: Vec<InlineItem>,
}

impl InlineRunBuilder {
    /// Start an empty run.
    #[must_use]
    pub const fn new(settings: ParagraphSettings) -> Self {
        Self {
            settings,
            items: Vec::new(),
        }
    }

    /// Append styled text.
    pub fn push_text(&mut self, text: &str, style: RunStyle, href: Option<String>) {
        if text.is_empty() {
            return;
        }
        if let Some(InlineItem::Text(last)) = self.items.last_mut()
            && last.style == style
            && last.href == href
        {
            last.text.push_str(text);
            return;
        }
        self.items.push(InlineItem::Text(TextSegment {
            text: text.to_string(),
            style,
            href,
        }));
    }

    /// Append an image.
    pub fn push_image(&mut self, image: ImageItem) {
        self.items.push(InlineItem::Image(image));
    }

    /// Append a forced break.
    pub fn push_break(&mut self) {
        self.items.push(InlineItem::LineBreak);
    }

    /// True if nothing has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finish the run, trimming collapsible spaces at both ends.
    #[must_use]
    pub fn finish(mut self) -> InlineRun {
        trim_collapsible(&mut self.items, End::Start);
        trim_collapsible(&mut self.items, End::End);
        InlineRun {
            settings: self.settings,
            items: self.items,
        }
    }
}

#[derive(Clone, Copy)]
enum End {
    Start,
    End,
}

/// [§ 4.1.2 Phase II: Trimming and Positioning](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
///
/// "A sequence of collapsible spaces at the beginning of a line is removed."
fn trim_collapsible(items: &mut Vec<InlineItem>, end: End) {
    loop {
        let index = match end {
            End::Start => 0,
            End::End => match items.len().checked_sub(1) {
                Some(i) => i,
                None => return,
            },
        };
        let Some(InlineItem::Text(seg)) = items.get_mut(index) else {
            return;
        };
        if seg.style.preserve_whitespace {
            return;
        }
        seg.text = match end {
            End::Start => seg.text.trim_start().to_string(),
            End::End => seg.text.trim_end().to_string(),
        };
        if !seg.text.is_empty() {
            return;
        }
        let _ = items.remove(index);
    }
}

/// A line produced by the paragraph formatter.
///
/// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
/// "The rectangular area that contains the boxes that form a line is called
/// a line box."
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBox {
    /// Bounds relative to the paragraph's top-left corner.
    pub bounds: Rect,
    /// Baseline offset from the top of the line.
    pub baseline: f32,
    /// Content placed on this line.
    pub fragments: Vec<LineFragment>,
}

/// A piece of a run placed on a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFragment {
    /// Horizontal offset from the line start.
    pub x: f32,
    /// Advance width.
    pub width: f32,
    /// What to draw.
    pub content: FragmentContent,
}

/// The content of a line fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "fragment", rename_all = "kebab-case")]
pub enum FragmentContent {
    /// Styled text.
    Text(TextSegment),
    /// An image.
    Image(ImageItem),
}

/// The formatter's answer for one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParagraphLayout {
    /// Lines, top to bottom.
    pub lines: Vec<LineBox>,
    /// Total height in points.
    pub height: f32,
    /// Width of the widest line.
    pub width: f32,
    /// True if some content did not fit the available width.
    pub overflow: bool,
}
