//! Positioned-text extraction.
//!
//! Provides a trait-based interface for the external text-extraction
//! service, isolating the concrete backend (poppler's `pdftotext`) from
//! the diff pipeline, plus the margin pre-filter, end-of-line hyphen
//! normalizer, and fragment serializer.

mod hyphen;
mod serialize;

pub use hyphen::mark_eol_hyphens;
pub use serialize::{serialize_boxes, SOFT_HYPHEN};

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};
use crate::model::{DocumentRef, Fragment, PageInfo};

/// A raw positioned word before trimming and serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBox {
    /// Page the word sits on.
    pub page: PageInfo,
    /// Left edge, document units.
    pub x: f32,
    /// Top edge, document units.
    pub y: f32,
    /// Box width, document units.
    pub width: f32,
    /// Box height, document units.
    pub height: f32,
    /// Raw word text.
    pub text: String,
}

/// Abstract interface to the text-extraction service.
///
/// Implementations return every positioned word of the document in reading
/// order, with page-relative bounding boxes and page dimensions.
pub trait TextExtractor {
    fn extract_boxes(&self, doc: &DocumentRef) -> Result<Vec<RawBox>>;
}

/// Margin configuration for the comparison, as percentages of page height.
///
/// Fragments fully above the top cutoff or fully below the bottom cutoff
/// are discarded before serialization. The defaults (0, 100) keep the
/// whole page.
#[derive(Debug, Clone, Copy)]
pub struct DiffOptions {
    /// Top margin end in percent of page height.
    pub top_margin: f32,
    /// Bottom margin begin in percent of page height.
    pub bottom_margin: f32,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both margins.
    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.top_margin = top;
        self.bottom_margin = bottom;
        self
    }

    /// Check the margins before any expensive work.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.top_margin)
            || !(0.0..=100.0).contains(&self.bottom_margin)
        {
            return Err(Error::InvalidConfig(format!(
                "margins must be between 0 and 100, got top {} bottom {}",
                self.top_margin, self.bottom_margin
            )));
        }
        if self.top_margin >= self.bottom_margin {
            return Err(Error::InvalidConfig(format!(
                "top margin {} must be above bottom margin {}",
                self.top_margin, self.bottom_margin
            )));
        }
        Ok(())
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            top_margin: 0.0,
            bottom_margin: 100.0,
        }
    }
}

/// Extract, normalize, and serialize one document.
///
/// Returns the fragment list and the flat text string; the concatenation
/// of the fragments' `text` equals the flat string exactly.
pub fn extract_fragments(
    extractor: &dyn TextExtractor,
    doc: DocumentRef,
    options: &DiffOptions,
) -> Result<(Vec<Fragment>, String)> {
    let mut boxes = extractor.extract_boxes(&doc)?;

    // Drop words entirely inside the ignored margins.
    boxes.retain(|b| {
        let top_cutoff = options.top_margin / 100.0 * b.page.height;
        let bottom_cutoff = options.bottom_margin / 100.0 * b.page.height;
        b.y + b.height >= top_cutoff && b.y <= bottom_cutoff
    });

    mark_eol_hyphens(&mut boxes);

    let (fragments, flat) = serialize_boxes(&doc, boxes);
    debug!(
        "document {}: serialized {} fragments, {} chars",
        doc.index,
        fragments.len(),
        flat.chars().count()
    );
    Ok((fragments, flat))
}

// ---------------------------------------------------------------------------
// PopplerExtractor — concrete implementation backed by pdftotext
// ---------------------------------------------------------------------------

/// Concrete [`TextExtractor`] that shells out to poppler's `pdftotext`.
///
/// Runs `pdftotext -bbox <file> -` and parses the XHTML bounding-box
/// output. The call is synchronous and side-effect-free.
#[derive(Debug, Default)]
pub struct PopplerExtractor;

impl PopplerExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PopplerExtractor {
    fn extract_boxes(&self, doc: &DocumentRef) -> Result<Vec<RawBox>> {
        let output = Command::new("pdftotext")
            .arg("-bbox")
            .arg(&doc.file)
            .arg("-")
            .output()
            .map_err(|e| extraction_error(doc, &doc.file, e))?;

        if !output.status.success() {
            return Err(Error::Extraction {
                document: doc.index,
                message: format!(
                    "pdftotext exited with {} for {}: {}",
                    output.status,
                    doc.file.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let xml = sanitize_xml(&output.stdout);
        parse_bbox_xml(&xml, doc)
    }
}

fn extraction_error(doc: &DocumentRef, file: &Path, err: std::io::Error) -> Error {
    Error::Extraction {
        document: doc.index,
        message: format!("failed to run pdftotext on {}: {}", file.display(), err),
    }
}

/// Strip control bytes that are illegal in XML PCDATA. Tab, LF, and CR
/// are kept.
fn sanitize_xml(bytes: &[u8]) -> String {
    let cleaned: Vec<u8> = bytes
        .iter()
        .copied()
        .filter(|&b| b >= 0x20 || b == b'\t' || b == b'\n' || b == b'\r')
        .collect();
    String::from_utf8_lossy(&cleaned).into_owned()
}

/// Parse `pdftotext -bbox` XHTML output into raw boxes.
///
/// Pages are numbered by position in the document; words carry
/// xMin/yMin/xMax/yMax attributes in page units. Words with no text are
/// skipped.
pub(crate) fn parse_bbox_xml(xml: &str, doc: &DocumentRef) -> Result<Vec<RawBox>> {
    let tree = roxmltree::Document::parse(xml).map_err(|e| Error::Extraction {
        document: doc.index,
        message: format!("unparseable pdftotext output: {e}"),
    })?;

    let attr = |node: roxmltree::Node<'_, '_>, name: &str| -> Result<f32> {
        node.attribute(name)
            .and_then(|v| v.parse::<f32>().ok())
            .ok_or_else(|| Error::Extraction {
                document: doc.index,
                message: format!("missing or invalid attribute {name:?} in pdftotext output"),
            })
    };

    let mut boxes = Vec::new();
    let mut page_number = 0u32;
    for page_node in tree
        .descendants()
        .filter(|n| n.tag_name().name() == "page")
    {
        page_number += 1;
        let page = PageInfo::new(
            page_number,
            attr(page_node, "width")?,
            attr(page_node, "height")?,
        );
        for word in page_node
            .children()
            .filter(|n| n.tag_name().name() == "word")
        {
            let Some(text) = word.text() else { continue };
            let x_min = attr(word, "xMin")?;
            let y_min = attr(word, "yMin")?;
            let x_max = attr(word, "xMax")?;
            let y_max = attr(word, "yMax")?;
            boxes.push(RawBox {
                page,
                x: x_min,
                y: y_min,
                width: x_max - x_min,
                height: y_max - y_min,
                text: text.to_string(),
            });
        }
    }
    Ok(boxes)
}
