//! A typesetter that reads image sizes from disk.
//!
//! [§ 4.8.3 The img element](https://html.spec.whatwg.org/multipage/embedded-content.html#the-img-element)
//!
//! Text metrics come from [`ApproximateTypesetter`]. Image sources are
//! resolved against a base directory and only the header is read: layout
//! needs the intrinsic size, not the pixels.

use std::path::{Path, PathBuf};

use quire_common::warning::warn_once;
use quire_css::layout::{
    ApproximateTypesetter, FontFamilyId, InlineRun, ParagraphLayout, RunStyle, TableBox,
    Typesetter,
};
use quire_css::style::length::PT_PER_PX;
use quire_dom::{DomTree, NodeId};

use crate::DocumentError;

/// [`ApproximateTypesetter`] with images loaded from a directory.
#[derive(Debug, Clone)]
pub struct FileTypesetter {
    inner: ApproximateTypesetter,
    base: PathBuf,
}

impl FileTypesetter {
    /// Resolve image sources relative to `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            inner: ApproximateTypesetter::new(),
            base: base.into(),
        }
    }

    /// Make a font family name resolvable.
    pub fn register_family(&mut self, name: &str) -> FontFamilyId {
        self.inner.register_family(name)
    }

    /// The file an image source refers to.
    #[must_use]
    pub fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }

    /// Read the size of one image and remember it, in points.
    ///
    /// Pixels are CSS pixels: 96 to the inch.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Image`] if the file cannot be opened or its format
    /// is not recognized.
    pub fn load_image(&mut self, src: &str) -> Result<(f32, f32), DocumentError> {
        let path = self.resolve(src);
        let (width, height) = image::image_dimensions(&path)
            .map_err(|source| DocumentError::Image { path, source })?;
        let size = (width as f32 * PT_PER_PX, height as f32 * PT_PER_PX);
        self.inner.register_image(src, size.0, size.1);
        Ok(size)
    }

    /// Load every `<img src>` below `node`, so that a broken file is
    /// reported with its path before layout starts.
    ///
    /// # Errors
    ///
    /// The first image that fails to load.
    pub fn load_images(&mut self, tree: &DomTree, node: NodeId) -> Result<usize, DocumentError> {
        let mut loaded = 0;
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(element) = tree.as_element(id)
                && element.tag_name == "img"
            {
                match element.attrs.get("src") {
                    Some(src) => {
                        let _ = self.load_image(src)?;
                        loaded += 1;
                    }
                    None => warn_once("image", "<img> without src"),
                }
            }
            pending.extend(tree.children(id).iter().rev());
        }
        Ok(loaded)
    }
}

impl Typesetter for FileTypesetter {
    fn find_font_family(&self, name: &str) -> Option<FontFamilyId> {
        self.inner.find_font_family(name)
    }

    fn image_size(&self, src: &str) -> Option<(f32, f32)> {
        self.inner.image_size(src).or_else(|| {
            image::image_dimensions(self.resolve(src))
                .ok()
                .map(|(w, h)| (w as f32 * PT_PER_PX, h as f32 * PT_PER_PX))
        })
    }

    fn text_width(&self, text: &str, style: &RunStyle) -> f32 {
        self.inner.text_width(text, style)
    }

    fn format_paragraph(&self, run: &InlineRun, width: f32) -> ParagraphLayout {
        self.inner.format_paragraph(run, width)
    }

    fn table_columns(&self, table: &TableBox, width: f32) -> Vec<f32> {
        self.inner.table_columns(table, width)
    }
}
