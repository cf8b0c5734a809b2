//! Job files: everything needed to produce one document.
//!
//! ```json
//! {
//!   "metadata": { "title": "Report" },
//!   "defaults": { "font-size": 11, "page": { "size": "a4" } },
//!   "pages": [ { "selector": "first", "margin-top": "4cm" } ],
//!   "fonts": [ "Helvetica" ],
//!   "content": [ { "type": "element", "tag": "p", "children": [] } ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use quire_css::{LayoutBox, PageRule};
use quire_document::{Document, DocumentDefaults, FileTypesetter, FinishedDocument, Metadata};
use quire_dom::{DomTree, NodeId, NodeSpec};
use serde::Deserialize;

/// A parsed job file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Job {
    /// Document information.
    pub metadata: Metadata,
    /// Base font and default page.
    pub defaults: DocumentDefaults,
    /// Additional `@page` rules.
    pub pages: Vec<PageRule>,
    /// Font families the backend should know besides the generic ones.
    pub fonts: Vec<String>,
    /// Top-level content nodes, laid out one after another.
    pub content: Vec<NodeSpec>,
    /// Content width in points; the page's content width when absent.
    pub width: Option<f32>,
}

impl Job {
    /// Parse a job from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("job is not valid JSON")
    }

    /// Build the element tree and a document ready to receive it. Images
    /// are resolved against `base`.
    pub fn prepare(&self, base: &Path) -> Result<(DomTree, Document)> {
        let tree = DomTree::from_specs(&self.content);

        let mut backend = FileTypesetter::new(base);
        for family in &self.fonts {
            let _ = backend.register_family(family);
        }
        let images = backend
            .load_images(&tree, NodeId::ROOT)
            .context("loading images")?;
        debug!(target: "quire::cli", "{} nodes, {images} images", tree.len());

        let mut document = Document::new(self.defaults.clone(), Box::new(backend));
        let metadata = &self.metadata;
        if let Some(title) = &metadata.title {
            document.set_title(title.as_str());
        }
        if let Some(author) = &metadata.author {
            document.set_author(author.as_str());
        }
        if let Some(keywords) = &metadata.keywords {
            document.set_keywords(keywords.as_str());
        }
        if let Some(creator) = &metadata.creator {
            document.set_creator(creator.as_str());
        }
        if let Some(subject) = &metadata.subject {
            document.set_subject(subject.as_str());
        }
        for rule in &self.pages {
            document.add_page_rule(rule.clone());
        }
        Ok((tree, document))
    }

    /// The box tree of every top-level node, without placing anything.
    pub fn boxes(&self, base: &Path, width: Option<f32>) -> Result<Vec<LayoutBox>> {
        let (tree, mut document) = self.prepare(base)?;
        let width = match width.or(self.width) {
            Some(width) => width,
            None => document.content_area()?.width,
        };
        tree.children(NodeId::ROOT)
            .iter()
            .map(|&node| {
                document
                    .layout(&tree, node, width)
                    .with_context(|| format!("laying out node {}", node.0))
            })
            .collect()
    }

    /// Lay out the content top to bottom, starting a new page whenever the
    /// next top-level node does not fit below the previous one.
    pub fn typeset(&self, base: &Path, width: Option<f32>) -> Result<FinishedDocument> {
        let (tree, mut document) = self.prepare(base)?;
        let mut cursor: Option<f32> = None;
        for &node in tree.children(NodeId::ROOT) {
            let mut area = document.content_area()?;
            let width = width.or(self.width).unwrap_or(area.width);
            let height = document
                .measure(&tree, node, width)
                .with_context(|| format!("laying out node {}", node.0))?;

            let mut y = cursor.unwrap_or(area.y);
            if y > area.y && y + height > area.y + area.height {
                document.new_page()?;
                area = document.content_area()?;
                y = area.y;
            }
            let used = document.output_at(&tree, node, width, area.x, y)?;
            cursor = Some(y + used);
        }
        Ok(document.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(paragraphs: usize) -> Job {
        let content: Vec<_> = (0..paragraphs)
            .map(|i| {
                serde_json::json!({
                    "type": "element",
                    "tag": "p",
                    "style": "margin-top: 100pt",
                    "children": [ { "type": "text", "text": format!("paragraph {i}") } ]
                })
            })
            .collect();
        Job::parse(
            &serde_json::json!({
                "metadata": { "title": "Sample" },
                "pages": [ { "selector": "first", "size": "a5" } ],
                "content": content,
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_job_defaults() {
        let job = Job::parse("{}").unwrap();
        assert!(job.content.is_empty());
        assert!(job.width.is_none());
        assert!(job.pages.is_empty());
    }

    #[test]
    fn test_content_flows_onto_new_pages() {
        let finished = job(12).typeset(Path::new("."), None).unwrap();
        assert_eq!(finished.metadata.title.as_deref(), Some("Sample"));
        assert!(finished.pages.len() > 1);
        let texts: usize = finished
            .pages
            .iter()
            .map(|page| page.display_list.texts().len())
            .sum();
        assert_eq!(texts, 12);
        for page in &finished.pages {
            let bottom = page.content.y + page.content.height;
            for command in page.display_list.commands() {
                if let quire_css::DisplayCommand::DrawText { y, .. } = command {
                    assert!(*y <= bottom);
                }
            }
        }
    }

    #[test]
    fn test_boxes_use_the_requested_width() {
        let boxes = job(2).boxes(Path::new("."), Some(123.0)).unwrap();
        assert_eq!(boxes.len(), 2);
        match &boxes[0] {
            LayoutBox::Block(root) => assert!((root.width - 123.0).abs() < 0.001),
            other => panic!("unexpected {other:?}"),
        }
    }
}
