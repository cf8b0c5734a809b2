//! The layout assembler: classified flow items in, box tree out.
//!
//! [§ 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! One recursive pass. Each element pushes a style frame on entry and pops
//! it on exit (through [`crate::style::StyleGuard`]), resolves its
//! declarations against the inherited frame, and becomes one of:
//!
//! - nothing, for `display: none`
//! - a table, handed to [`LayoutAssembler::layout_table`]
//! - a block box, when any child is block-level; maximal runs of inline
//!   children become anonymous paragraphs between the block children
//! - a paragraph (inline box), when every child is inline-level
//!
//! Vertical margins between adjacent blocks collapse into a single
//! [`Spacer`].

use std::collections::HashMap;

use quire_common::warning::warn_once;
use serde::{Deserialize, Serialize};

use super::backend::{FontFamilyId, Typesetter};
use super::box_tree::{BlockBox, Decoration, InlineBox, LayoutBox, Marker, Spacer, SpacerOrigin};
use super::inline::{ImageItem, InlineRunBuilder, ParagraphSettings, RunStyle};
use super::marker::marker_text;
use crate::error::LayoutError;
use crate::flow::{FlowItem, FlowKind};
use crate::style::frame::strip_quotes;
use crate::style::{Indent, LineHeight, StyleFrame, StyleStack, resolve_width};

/// Document-wide defaults for a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutContext {
    /// Font family of the base frame.
    pub font_family: String,
    /// Font size of the base frame, in points.
    pub font_size: f32,
    /// Line height of the base frame, as a factor of the font size.
    pub line_height: f32,
    /// Size `rem` refers to. Set by `<html>`/`<body>`; `None` until then.
    pub root_font_size: Option<f32>,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self {
            font_family: "serif".to_string(),
            font_size: 10.0,
            line_height: 1.2,
            root_font_size: None,
        }
    }
}

impl LayoutContext {
    /// The frame every layout pass starts from.
    #[must_use]
    pub fn base_frame(&self) -> StyleFrame {
        StyleFrame {
            line_height: LineHeight::Factor(self.line_height),
            ..StyleFrame::base(&self.font_family, self.font_size)
        }
    }
}

/// Builds box trees for one document.
///
/// The assembler keeps the document-wide defaults captured from `<html>`
/// and `<body>` and a cache of resolved font families between calls; style
/// frames live only for the duration of one [`LayoutAssembler::layout`].
pub struct LayoutAssembler<'a> {
    backend: &'a dyn Typesetter,
    context: LayoutContext,
    fonts: HashMap<String, FontFamilyId>,
}

impl<'a> LayoutAssembler<'a> {
    /// An assembler resolving fonts and images through `backend`.
    #[must_use]
    pub fn new(backend: &'a dyn Typesetter, context: LayoutContext) -> Self {
        Self {
            backend,
            context,
            fonts: HashMap::new(),
        }
    }

    /// Current document defaults.
    #[must_use]
    pub const fn context(&self) -> &LayoutContext {
        &self.context
    }

    /// The typesetting backend.
    #[must_use]
    pub fn backend(&self) -> &'a dyn Typesetter {
        self.backend
    }

    pub(super) const fn root_font_size(&self) -> Option<f32> {
        self.context.root_font_size
    }

    /// Lay out a classified item into `width` points.
    ///
    /// The result is always a block: the anonymous root produced by
    /// [`crate::flow::classify`] holds the item's boxes with collapsed
    /// margins between them.
    ///
    /// # Errors
    ///
    /// Malformed values, unknown font families, missing images and invalid
    /// table spans abort the layout.
    pub fn layout(&mut self, item: &FlowItem, width: f32) -> Result<LayoutBox, LayoutError> {
        let mut stack = StyleStack::new();
        let result = self.layout_with_stack(item, width, &mut stack);
        debug_assert!(stack.is_empty(), "style stack left unbalanced");
        result
    }

    /// [`LayoutAssembler::layout`] on a caller-owned stack.
    ///
    /// The base frame is pushed on top of whatever `stack` holds and popped
    /// again before returning, on success and on error.
    ///
    /// # Errors
    ///
    /// See [`LayoutAssembler::layout`].
    pub fn layout_with_stack(
        &mut self,
        item: &FlowItem,
        width: f32,
        stack: &mut StyleStack,
    ) -> Result<LayoutBox, LayoutError> {
        let mut guard = stack.push_frame(self.context.base_frame());
        let children = if item.is_element() && item.tag.is_empty() {
            item.children.as_slice()
        } else {
            std::slice::from_ref(item)
        };
        let children = self.layout_children(children, &item.tag, width, &mut guard)?;
        Ok(LayoutBox::Block(BlockBox {
            children,
            width,
            ..BlockBox::default()
        }))
    }

    /// Lay out one element. Pushes and pops its frame.
    fn layout_element(
        &mut self,
        item: &FlowItem,
        available: f32,
        stack: &mut StyleStack,
    ) -> Result<LayoutBox, LayoutError> {
        #[cfg(feature = "layout-trace")]
        log::trace!(target: "quire::layout", "<{}> depth={} available={available}", item.tag, stack.depth());

        let mut guard = stack.push();

        // [CSS Lists § 4.4 The list-item counter](https://www.w3.org/TR/css-lists-3/#list-item-counter)
        //
        // The counter lives on the list's frame. The item bumps it before its
        // own declarations are looked at, so a hidden item still uses up a
        // number.
        if item.tag == "li" {
            let ordinal = match guard.parent_mut() {
                Some(parent) => {
                    parent.list_counter = parent.list_counter.saturating_add(1);
                    parent.list_counter
                }
                None => 1,
            };
            guard.frame_mut().list_counter = ordinal;
        }

        let root = self.root_font_size();
        guard.frame_mut().apply(&item.declarations, &item.tag, root)?;
        if guard.frame().hidden {
            return Ok(LayoutBox::Empty);
        }

        match item.tag.as_str() {
            "html" | "body" => {
                let frame = guard.frame();
                self.context.root_font_size = Some(frame.font_size);
                self.context.font_family.clone_from(&frame.font_family);
            }
            "ol" => {
                let start = match item.attr("start").map(|s| s.trim().parse::<u32>()) {
                    None => 1,
                    Some(Ok(n)) => n,
                    Some(Err(_)) => {
                        warn_once("layout", "ignoring non-numeric <ol start>");
                        1
                    }
                };
                guard.frame_mut().list_counter = start.saturating_sub(1);
            }
            "ul" => guard.frame_mut().list_counter = 0,
            "table" => return self.layout_table(item, available, &mut guard),
            _ => {}
        }

        let frame = guard.frame().clone();
        let mut decoration = Decoration::from_frame(&frame);
        let marker = if item.tag == "li" {
            self.marker(&frame, &item.tag)?
        } else {
            None
        };

        let declared = frame.width.as_deref().unwrap_or("auto");
        let mut width = resolve_width(declared, available, frame.font_size, root)
            .map_err(|err| LayoutError::from_value(err, &item.tag, "width"))?
            .unwrap_or(available - decoration.horizontal())
            .max(0.0);

        if item.children.iter().any(FlowItem::is_block) {
            let children = self.layout_children(&item.children, &item.tag, width, &mut guard)?;
            return Ok(LayoutBox::Block(BlockBox {
                tag: item.tag.clone(),
                children,
                decoration,
                width,
                marker,
            }));
        }

        let mut settings = paragraph_settings(&frame);
        if marker.is_some() {
            // The item's start padding becomes a one-line hanging indent:
            // the first line starts after the marker gutter, the rest run
            // back to the border edge.
            settings.indent = Indent {
                amount: decoration.padding.left,
                rows: -1,
            };
            width += decoration.padding.left;
            decoration.padding.left = 0.0;
        }
        let mut builder = InlineRunBuilder::new(settings);
        for child in &item.children {
            self.collect_inline(child, &item.tag, &mut builder, None, &mut guard)?;
        }
        let run = builder.finish();
        if run.is_blank() && !decoration.has_box() && marker.is_none() {
            return Ok(LayoutBox::Empty);
        }
        Ok(LayoutBox::Inline(InlineBox {
            tag: item.tag.clone(),
            run,
            decoration,
            width,
            marker,
        }))
    }

    /// Lay out a sequence of siblings into a vertical stack.
    ///
    /// Runs of inline siblings become anonymous paragraphs. Collapsible
    /// space at the start of a run is trimmed, so the separator between a
    /// block and the following text never opens a line.
    pub(super) fn layout_children(
        &mut self,
        children: &[FlowItem],
        parent_tag: &str,
        width: f32,
        stack: &mut StyleStack,
    ) -> Result<Vec<LayoutBox>, LayoutError> {
        let settings = stack.top().map(paragraph_settings).unwrap_or_default();
        let mut stacker = Stacker::default();
        let mut run: Option<InlineRunBuilder> = None;

        for child in children {
            if child.is_block() {
                if let Some(builder) = run.take() {
                    stacker.push_run(builder, width);
                }
                let layout_box = self.layout_element(child, width, stack)?;
                stacker.push(layout_box);
            } else {
                let builder =
                    run.get_or_insert_with(|| InlineRunBuilder::new(settings.clone()));
                self.collect_inline(child, parent_tag, builder, None, stack)?;
            }
        }
        if let Some(builder) = run.take() {
            stacker.push_run(builder, width);
        }
        Ok(stacker.finish())
    }

    /// Flatten an inline item into `builder`.
    fn collect_inline(
        &mut self,
        item: &FlowItem,
        parent_tag: &str,
        builder: &mut InlineRunBuilder,
        href: Option<&str>,
        stack: &mut StyleStack,
    ) -> Result<(), LayoutError> {
        if item.kind == FlowKind::Text {
            let frame = stack.top().cloned().unwrap_or_default();
            let style = self.run_style(&frame, parent_tag)?;
            builder.push_text(&item.text, style, href.map(str::to_string));
            return Ok(());
        }

        let mut guard = stack.push();
        let root = self.root_font_size();
        guard.frame_mut().apply(&item.declarations, &item.tag, root)?;
        if guard.frame().hidden {
            return Ok(());
        }

        match item.tag.as_str() {
            "br" => builder.push_break(),
            "img" => {
                let mut image = self.image(item, guard.frame())?;
                image.href = href.map(str::to_string);
                builder.push_image(image);
            }
            _ => {
                let href = if item.tag == "a" {
                    item.attr("href").or(href)
                } else {
                    href
                };
                // A block nested inside inline content starts a new line.
                if item.is_block() && !builder.is_empty() {
                    builder.push_break();
                }
                for child in &item.children {
                    self.collect_inline(child, &item.tag, builder, href, &mut guard)?;
                }
            }
        }
        Ok(())
    }

    /// [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
    ///
    /// Intrinsic size from the backend, scaled by `width`/`height`. With only
    /// one of them set the aspect ratio is kept; percentages refer to the
    /// intrinsic size.
    fn image(&self, item: &FlowItem, frame: &StyleFrame) -> Result<ImageItem, LayoutError> {
        let src = item.attr("src").unwrap_or_default();
        let (natural_width, natural_height) =
            self.backend
                .image_size(src)
                .ok_or_else(|| LayoutError::MissingImage {
                    src: src.to_string(),
                })?;
        let root = self.root_font_size();
        let resolve = |value: Option<&String>, natural: f32, property: &str| {
            value.map_or(Ok(None), |v| {
                resolve_width(v, natural, frame.font_size, root)
                    .map_err(|err| LayoutError::from_value(err, &item.tag, property))
            })
        };
        let width = resolve(frame.width.as_ref(), natural_width, "width")?;
        let height = resolve(frame.height.as_ref(), natural_height, "height")?;
        let (width, height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) if natural_width > 0.0 => (w, natural_height * w / natural_width),
            (None, Some(h)) if natural_height > 0.0 => (natural_width * h / natural_height, h),
            (Some(w), None) => (w, natural_height),
            (None, Some(h)) => (natural_width, h),
            (None, None) => (natural_width, natural_height),
        };
        Ok(ImageItem {
            src: src.to_string(),
            width,
            height,
            href: None,
        })
    }

    /// [CSS Lists § 3.1](https://www.w3.org/TR/css-lists-3/#marker-pseudo)
    fn marker(&mut self, frame: &StyleFrame, tag: &str) -> Result<Option<Marker>, LayoutError> {
        let Some(text) = marker_text(&frame.list_style_type, frame.list_counter) else {
            return Ok(None);
        };
        Ok(Some(Marker {
            text,
            style: self.run_style(frame, tag)?,
        }))
    }

    /// The run style for text set in `frame`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::MissingFont`] if no family of the font list is known.
    pub fn run_style(&mut self, frame: &StyleFrame, tag: &str) -> Result<RunStyle, LayoutError> {
        Ok(RunStyle {
            font_family: self.font_family(&frame.font_family, tag)?,
            font_size: frame.font_size,
            font_weight: frame.font_weight,
            font_style: frame.font_style,
            color: frame.color,
            features: frame.font_features.clone(),
            preserve_whitespace: frame.preserve_whitespace,
            tab_size: frame.tab_size,
        })
    }

    /// [§ 5.1 font-family](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
    ///
    /// "a prioritized list of font family names"; the first name the
    /// backend knows wins.
    fn font_family(&mut self, list: &str, tag: &str) -> Result<FontFamilyId, LayoutError> {
        if let Some(id) = self.fonts.get(list) {
            return Ok(*id);
        }
        let found = list
            .split(',')
            .map(|name| strip_quotes(name).unwrap_or(name).trim())
            .filter(|name| !name.is_empty())
            .find_map(|name| self.backend.find_font_family(name));
        let Some(id) = found else {
            return Err(LayoutError::MissingFont {
                tag: tag.to_string(),
                family: list.to_string(),
            });
        };
        let _ = self.fonts.insert(list.to_string(), id);
        Ok(id)
    }
}

/// Paragraph-wide settings taken from a block's frame.
#[must_use]
pub fn paragraph_settings(frame: &StyleFrame) -> ParagraphSettings {
    ParagraphSettings {
        text_align: frame.text_align,
        vertical_align: frame.vertical_align,
        line_height: frame.used_line_height(),
        indent: frame.text_indent,
        font_expansion: frame.font_expansion,
        hanging_punctuation: frame.hanging_punctuation,
    }
}

/// Stacks sibling boxes, collapsing the margins between them.
#[derive(Default)]
struct Stacker {
    boxes: Vec<LayoutBox>,
    previous_margin: f32,
}

impl Stacker {
    /// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// "Adjoining vertical margins collapse" into one spacer as tall as the
    /// larger of the two.
    fn push(&mut self, layout_box: LayoutBox) {
        if layout_box.is_empty() {
            return;
        }
        let gap = self.previous_margin.max(layout_box.margin_top());
        if gap > 0.0 {
            self.boxes.push(LayoutBox::Spacer(Spacer {
                height: gap,
                origin: SpacerOrigin::CollapsedMargin,
            }));
        }
        self.previous_margin = layout_box.margin_bottom();
        self.boxes.push(layout_box);
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// Wrap an inline run that sits between blocks. Blank runs vanish.
    fn push_run(&mut self, builder: InlineRunBuilder, width: f32) {
        let run = builder.finish();
        if run.is_blank() {
            return;
        }
        self.push(LayoutBox::Inline(InlineBox {
            tag: String::new(),
            run,
            decoration: Decoration::default(),
            width,
            marker: None,
        }));
    }

    fn finish(mut self) -> Vec<LayoutBox> {
        if self.previous_margin > 0.0 {
            self.boxes.push(LayoutBox::Spacer(Spacer {
                height: self.previous_margin,
                origin: SpacerOrigin::TrailingMargin,
            }));
        }
        self.boxes
    }
}
