//! Positioned text fragments, the atomic unit of change marking.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identifies one of the two documents being compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Document side: 0 = left, 1 = right.
    pub index: u8,
    /// Path to the source file.
    pub file: PathBuf,
}

impl DocumentRef {
    /// Create a reference to one comparison side.
    pub fn new(index: u8, file: impl Into<PathBuf>) -> Self {
        Self {
            index,
            file: file.into(),
        }
    }
}

/// Dimensions of the page a fragment sits on, in document units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in document units
    pub width: f32,
    /// Page height in document units
    pub height: f32,
}

impl PageInfo {
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
        }
    }
}

/// A contiguous run of text on one page of one document.
///
/// Fragments within a document are strictly ordered by `start_index`,
/// non-overlapping, and their concatenated `text` equals the document's
/// flat string exactly. `start_index` and `length` are counted in
/// characters, matching the character-level diff.
///
/// Field names follow the stable JSON interchange format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Monotonic sequence id within the document.
    pub index: u32,

    /// Owning document.
    #[serde(rename = "pdf")]
    pub doc: DocumentRef,

    /// Page the fragment sits on.
    pub page: PageInfo,

    /// Left edge, document units.
    pub x: f32,
    /// Top edge, document units.
    pub y: f32,
    /// Box width, document units.
    pub width: f32,
    /// Box height, document units.
    pub height: f32,

    /// Fragment text, possibly ending in a soft-hyphen marker.
    pub text: String,

    /// Character offset of this fragment in the document's flat string.
    #[serde(rename = "startIndex", default)]
    pub start_index: usize,

    /// Character length of `text`.
    #[serde(rename = "textLength", default)]
    pub length: usize,
}

impl Fragment {
    /// One-past-the-end character offset in the flat string.
    pub fn end_index(&self) -> usize {
        self.start_index + self.length
    }

    /// Bottom edge in document units.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge in document units.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}
