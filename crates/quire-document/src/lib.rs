//! Document assembly for the Quire layout engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Page sequencing** - opening pages on demand, selecting their page
//!   master, finishing them in order
//! - **Content placement** - laying out a subtree and placing it at
//!   absolute page coordinates
//! - **Page finalization** - page background and margin boxes around the
//!   placed content
//! - **Metadata** - title, author, keywords, creator, subject
//! - **Images** - [`FileTypesetter`] reads intrinsic sizes from disk
//!
//! # Not Yet Implemented
//!
//! - Automatic page breaks inside a subtree (callers measure and decide)
//! - Serialization to PDF or any other output format

mod defaults;
mod error;
mod images;

pub use defaults::DocumentDefaults;
pub use error::DocumentError;
pub use images::FileTypesetter;

use log::debug;
use quire_common::warning::clear_warnings;
use quire_css::layout::{LayoutBox, LayoutContext, Rect};
use quire_css::paged::{PageSize, paint_margin_boxes, paint_page_background};
use quire_css::{
    DisplayList, LayoutAssembler, LayoutError, PageMaster, PageMasters, PageRule, PageSelector,
    Placer, Typesetter, classify,
};
use quire_dom::{DomTree, NodeId};
use serde::{Deserialize, Serialize};

/// Descriptive document information, carried through to the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Search keywords.
    pub keywords: Option<String>,
    /// Application that produced the content.
    pub creator: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
}

/// A page that has been finalized.
#[derive(Debug, Clone, Serialize)]
pub struct FinishedPage {
    /// One-based page number.
    pub number: usize,
    /// The page rule the page was made from.
    pub selector: PageSelector,
    /// Sheet size in points.
    pub size: PageSize,
    /// Where content was meant to go.
    pub content: Rect,
    /// Background first, then content, then margin boxes.
    pub display_list: DisplayList,
}

/// The result of [`Document::finish`].
#[derive(Debug, Clone, Serialize)]
pub struct FinishedDocument {
    /// Document information.
    pub metadata: Metadata,
    /// Pages in order.
    pub pages: Vec<FinishedPage>,
}

struct OpenPage {
    master: PageMaster,
    content: DisplayList,
}

/// A paged document under construction.
///
/// Content is sent with [`Document::output_at`] at absolute coordinates on
/// the current page. A page is opened by the first output after the
/// previous one was finished, and finished by [`Document::new_page`],
/// [`Document::end_page`] or [`Document::finish`].
pub struct Document {
    metadata: Metadata,
    defaults: DocumentDefaults,
    backend: Box<dyn Typesetter>,
    masters: PageMasters,
    /// Defaults carried between outputs, including what `<html>` and
    /// `<body>` captured.
    context: LayoutContext,
    current: Option<OpenPage>,
    finished: Vec<FinishedPage>,
}

impl Document {
    /// An empty document. Warnings already reported for an earlier
    /// document are reported again for this one.
    #[must_use]
    pub fn new(defaults: DocumentDefaults, backend: Box<dyn Typesetter>) -> Self {
        clear_warnings();
        let mut masters = PageMasters::new();
        masters.add_rule(defaults.page_rule());
        Self {
            metadata: Metadata::default(),
            context: defaults.layout.clone(),
            defaults,
            backend,
            masters,
            current: None,
            finished: Vec::new(),
        }
    }

    /// Document information so far.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Some(title.into());
    }

    /// Set the author.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = Some(author.into());
    }

    /// Set the keywords.
    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.metadata.keywords = Some(keywords.into());
    }

    /// Set the creator.
    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.metadata.creator = Some(creator.into());
    }

    /// Set the subject.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.metadata.subject = Some(subject.into());
    }

    /// Add an `@page` rule. It takes effect from the next page opened.
    pub fn add_page_rule(&mut self, rule: PageRule) {
        self.masters.add_rule(rule);
    }

    /// Number of pages finished so far.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.finished.len()
    }

    /// The master of the open page, or of the page that would open next.
    ///
    /// # Errors
    ///
    /// A page rule with a malformed size or margin.
    pub fn page_master(&mut self) -> Result<&PageMaster, DocumentError> {
        if let Some(page) = &self.current {
            return Ok(&page.master);
        }
        Ok(self.masters.master(self.finished.len(), &self.context)?)
    }

    /// Size of the current (or next) page.
    ///
    /// # Errors
    ///
    /// See [`Document::page_master`].
    pub fn page_size(&mut self) -> Result<PageSize, DocumentError> {
        Ok(self.page_master()?.size)
    }

    /// Content rectangle of the current (or next) page.
    ///
    /// # Errors
    ///
    /// See [`Document::page_master`].
    pub fn content_area(&mut self) -> Result<Rect, DocumentError> {
        Ok(self.page_master()?.content)
    }

    /// Lay out the subtree at `node` into `width` points without placing it.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownNode`] if `node` is not in `tree`, or any
    /// layout error of the content.
    pub fn layout(
        &self,
        tree: &DomTree,
        node: NodeId,
        width: f32,
    ) -> Result<LayoutBox, DocumentError> {
        let (layout, _) = self.assemble(tree, node, width)?;
        Ok(layout)
    }

    /// Document defaults as of now: the configured ones, updated by every
    /// `<html>` or `<body>` output so far.
    #[must_use]
    pub const fn layout_context(&self) -> &LayoutContext {
        &self.context
    }

    /// Lay out a subtree, returning the box tree and the defaults as the
    /// layout left them.
    fn assemble(
        &self,
        tree: &DomTree,
        node: NodeId,
        width: f32,
    ) -> Result<(LayoutBox, LayoutContext), DocumentError> {
        if tree.get(node).is_none() {
            return Err(LayoutError::UnknownNode(node.0).into());
        }
        let item = classify(tree, node);
        let mut assembler = LayoutAssembler::new(self.backend.as_ref(), self.context.clone());
        let layout = assembler.layout(&item, width)?;
        Ok((layout, assembler.context().clone()))
    }

    /// Height the subtree at `node` would take at `width`.
    ///
    /// # Errors
    ///
    /// As for [`Document::layout`].
    pub fn measure(&self, tree: &DomTree, node: NodeId, width: f32) -> Result<f32, DocumentError> {
        let layout = self.layout(tree, node, width)?;
        let (_, height) = Placer::new(self.backend.as_ref()).paint(&layout, 0.0, 0.0, width);
        Ok(height)
    }

    /// Lay out the subtree at `node` into `width` points and place its top
    /// left corner at (`x`, `y`) on the current page, opening one if
    /// needed. Returns the height used.
    ///
    /// A layout error leaves the page as it was. A successful one keeps the
    /// font size and family captured from `<html>` or `<body>` for later
    /// outputs and for the margin boxes.
    ///
    /// # Errors
    ///
    /// As for [`Document::layout`], plus page rule errors when a page is
    /// opened.
    pub fn output_at(
        &mut self,
        tree: &DomTree,
        node: NodeId,
        width: f32,
        x: f32,
        y: f32,
    ) -> Result<f32, DocumentError> {
        let (layout, context) = self.assemble(tree, node, width)?;
        self.open_page()?;
        self.context = context;
        let (list, height) = Placer::new(self.backend.as_ref()).paint(&layout, x, y, width);
        let page = self.current.as_mut().ok_or(DocumentError::NoActivePage)?;
        page.content.extend(list);
        Ok(height)
    }

    /// Finish the open page, if any, and open the next one.
    ///
    /// # Errors
    ///
    /// Margin box layout errors of the finished page, and page rule errors
    /// of the new one.
    pub fn new_page(&mut self) -> Result<(), DocumentError> {
        if self.current.is_some() {
            self.end_page()?;
        }
        self.open_page()
    }

    /// Finish the open page: paint its background and margin boxes around
    /// the content.
    ///
    /// # Errors
    ///
    /// [`DocumentError::NoActivePage`] if no page is open, or a margin box
    /// layout error.
    pub fn end_page(&mut self) -> Result<(), DocumentError> {
        let page = self.current.take().ok_or(DocumentError::NoActivePage)?;
        let master = page.master;

        let mut assembler = LayoutAssembler::new(self.backend.as_ref(), self.context.clone());
        let placer = Placer::new(self.backend.as_ref());
        let margin_boxes = paint_margin_boxes(&master, &mut assembler, &placer)?;

        let mut display_list = paint_page_background(&master);
        display_list.extend(page.content);
        display_list.extend(margin_boxes);

        let number = self.finished.len() + 1;
        debug!(
            target: "quire::document",
            "finished page {number} (:{}) with {} commands",
            master.selector,
            display_list.len()
        );
        self.finished.push(FinishedPage {
            number,
            selector: master.selector,
            size: master.size,
            content: master.content,
            display_list,
        });
        Ok(())
    }

    /// Finish the open page and hand back every page.
    ///
    /// # Errors
    ///
    /// Margin box layout errors of the last page.
    pub fn finish(mut self) -> Result<FinishedDocument, DocumentError> {
        if self.current.is_some() {
            self.end_page()?;
        }
        Ok(FinishedDocument {
            metadata: self.metadata,
            pages: self.finished,
        })
    }

    fn open_page(&mut self) -> Result<(), DocumentError> {
        if self.current.is_none() {
            let master = self
                .masters
                .master(self.finished.len(), &self.context)?
                .clone();
            self.current = Some(OpenPage {
                master,
                content: DisplayList::new(),
            });
        }
        Ok(())
    }
}
