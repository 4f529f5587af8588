//! Page rasterization.
//!
//! Trait-based interface to the external rasterization service plus the
//! page cache. Rasterization calls are independent per (document, page)
//! and fan out through rayon when enabled.

use std::collections::HashMap;
use std::process::Command;

use image::RgbaImage;
use log::debug;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{DocumentRef, Marker};

/// Cache key: (document side, 1-based page number).
pub type PageKey = (u8, u32);

/// Abstract interface to the rasterization service.
///
/// Implementations render one page of a document to a bitmap scaled to
/// the target width. Calls are synchronous, idempotent, and
/// side-effect-free, so they may run concurrently.
pub trait PageRasterizer: Sync {
    fn rasterize(&self, doc: &DocumentRef, page: u32, width: u32) -> Result<RgbaImage>;
}

/// Rasterize every page referenced by a changed-fragment marker, once per
/// (document, page) pair.
pub fn rasterize_pages(
    rasterizer: &dyn PageRasterizer,
    markers: &[Marker],
    width: u32,
    parallel: bool,
) -> Result<HashMap<PageKey, RgbaImage>> {
    // Unique keys in first-reference order.
    let mut keys: Vec<(PageKey, DocumentRef)> = Vec::new();
    for fragment in markers.iter().filter_map(Marker::as_changed) {
        let key = (fragment.doc.index, fragment.page.number);
        if !keys.iter().any(|(k, _)| *k == key) {
            keys.push((key, fragment.doc.clone()));
        }
    }
    debug!("rasterizing {} page(s) at width {}", keys.len(), width);

    if parallel {
        keys.par_iter()
            .map(|((doc_index, page), doc)| {
                let image = rasterizer.rasterize(doc, *page, width)?;
                Ok(((*doc_index, *page), image))
            })
            .collect()
    } else {
        keys.iter()
            .map(|((doc_index, page), doc)| {
                let image = rasterizer.rasterize(doc, *page, width)?;
                Ok(((*doc_index, *page), image))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// PopplerRasterizer — concrete implementation backed by pdftoppm
// ---------------------------------------------------------------------------

/// Concrete [`PageRasterizer`] that shells out to poppler's `pdftoppm`.
#[derive(Debug, Default)]
pub struct PopplerRasterizer;

impl PopplerRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn rasterize(&self, doc: &DocumentRef, page: u32, width: u32) -> Result<RgbaImage> {
        let output = Command::new("pdftoppm")
            .args(["-f", &page.to_string(), "-l", &page.to_string()])
            .args(["-scale-to", &width.to_string()])
            .arg("-png")
            .arg(&doc.file)
            .output()
            .map_err(|e| Error::Rasterize {
                document: doc.index,
                page,
                message: format!("failed to run pdftoppm on {}: {}", doc.file.display(), e),
            })?;

        if !output.status.success() {
            return Err(Error::Rasterize {
                document: doc.index,
                page,
                message: format!(
                    "pdftoppm exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let image = image::load_from_memory(&output.stdout).map_err(|e| Error::Rasterize {
            document: doc.index,
            page,
            message: format!("undecodable pdftoppm output: {e}"),
        })?;
        Ok(image.to_rgba8())
    }
}
