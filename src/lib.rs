//! # sidediff
//!
//! Visual comparison of PDF documents.
//!
//! This library extracts the text of two PDFs with word-level bounding
//! boxes, diffs the text, and renders a side-by-side image of the two
//! documents with every changed word marked in red.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sidediff::{diff_files, DiffOptions, RenderOptions};
//!
//! fn main() -> sidediff::Result<()> {
//!     let image = diff_files(
//!         "before.pdf",
//!         "after.pdf",
//!         &DiffOptions::default(),
//!         &RenderOptions::default(),
//!     )?;
//!     image.save("changes.png")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction**: word boxes via poppler's `pdftotext -bbox`
//! - **Diffing**: character-level comparison mapped back onto word boxes
//! - **Interchange**: the change list serializes to a JSON array, so the
//!   compare and render stages can run as separate processes
//! - **Rendering**: pages rasterized with `pdftoppm`, split and regrouped
//!   so matching content lines up, marked, cropped, and stacked
//!
//! Extraction and rasterization sit behind the [`TextExtractor`] and
//! [`PageRasterizer`] traits, so the poppler tools can be swapped out.

pub mod diff;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use diff::{diff_text, reconcile, simplify, DiffOp, Hunk};
pub use error::{Error, Result};
pub use extract::{
    extract_fragments, DiffOptions, PopplerExtractor, RawBox, TextExtractor,
};
pub use model::{DocumentRef, Fragment, Marker, PageInfo};
pub use render::{
    render_changes, render_changes_with, MarkStyle, PageRasterizer, PopplerRasterizer,
    RenderOptions,
};

use std::io::Read;
use std::path::Path;

/// Compute the change list for two PDF files using poppler.
///
/// The result alternates between changed fragments and `*` boundary
/// markers separating unchanged stretches; it is the input to
/// [`render_changes`] and serializes with [`markers_to_json`].
pub fn compute_changes(
    left: impl AsRef<Path>,
    right: impl AsRef<Path>,
    options: &DiffOptions,
) -> Result<Vec<Marker>> {
    compute_changes_with(&PopplerExtractor::new(), left, right, options)
}

/// Compute the change list with a caller-supplied extractor.
pub fn compute_changes_with(
    extractor: &dyn TextExtractor,
    left: impl AsRef<Path>,
    right: impl AsRef<Path>,
    options: &DiffOptions,
) -> Result<Vec<Marker>> {
    options.validate()?;

    let left = DocumentRef::new(0, left.as_ref());
    let right = DocumentRef::new(1, right.as_ref());

    let (left_fragments, left_text) = extract_fragments(extractor, left, options)?;
    let (right_fragments, right_text) = extract_fragments(extractor, right, options)?;

    let hunks = diff_text(&left_text, &right_text);
    Ok(reconcile(&hunks, [&left_fragments, &right_fragments]))
}

/// Compare two PDF files and render the marked side-by-side image.
pub fn diff_files(
    left: impl AsRef<Path>,
    right: impl AsRef<Path>,
    diff_options: &DiffOptions,
    render_options: &RenderOptions,
) -> Result<image::RgbaImage> {
    let markers = compute_changes(left, right, diff_options)?;
    render_changes(&markers, render_options)
}

/// Serialize a change list to the JSON interchange format.
pub fn markers_to_json(markers: &[Marker]) -> Result<String> {
    Ok(serde_json::to_string(markers)?)
}

/// Parse a change list from the JSON interchange format.
pub fn markers_from_json(json: &str) -> Result<Vec<Marker>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a change list from a reader, e.g. standard input.
pub fn markers_from_reader(mut reader: impl Read) -> Result<Vec<Marker>> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    markers_from_json(&buffer)
}
