//! Error types for the sidediff library.

use std::io;
use thiserror::Error;

/// Result type alias for sidediff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while computing or rendering a comparison.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The text-extraction backend failed or returned unparseable output.
    #[error("text extraction failed for document {document}: {message}")]
    Extraction {
        /// Which document (0 = left, 1 = right).
        document: u8,
        /// Backend diagnostic.
        message: String,
    },

    /// The rasterization backend failed for a page.
    #[error("rasterization failed for document {document} page {page}: {message}")]
    Rasterize {
        /// Which document (0 = left, 1 = right).
        document: u8,
        /// 1-based page number.
        page: u32,
        /// Backend diagnostic.
        message: String,
    },

    /// The documents have no text differences; there is nothing to render.
    #[error("there are no text differences")]
    EmptyDiff,

    /// Malformed style, margin, or format configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error decoding or encoding a raster image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error reading or writing the JSON change-list format.
    #[error("change list error: {0}")]
    Json(#[from] serde_json::Error),
}
