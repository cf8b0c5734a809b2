//! Errors raised while assembling a document.

use std::path::PathBuf;

use quire_css::LayoutError;
use thiserror::Error;

/// Everything that can stop a document from being produced.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Layout of the content or of a margin box failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Content was sent after the document was finished.
    #[error("no page is open")]
    NoActivePage,

    /// An image file could not be read or decoded.
    #[error("could not read image {}: {source}", path.display())]
    Image {
        /// The file that was read.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: image::ImageError,
    },
}
