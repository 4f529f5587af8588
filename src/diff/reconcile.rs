//! Diff reconciliation: correlate diff hunks with positioned fragments.
//!
//! Walks the hunk sequence while advancing one character offset per
//! document, draining each document's fragment list through an advancing
//! cursor. Fragments are atomic: any overlap with a changed range marks
//! the whole fragment. A fragment is visited at most once and its
//! classification is final, which holds because the diff yields hunks in
//! non-decreasing offset order.

use log::debug;

use crate::model::{Fragment, Marker};

use super::{DiffOp, Hunk};

/// Advancing cursor over an immutable, `start_index`-ordered fragment
/// slice. Replaces the pop-from-front queue: the position only moves
/// forward, so each fragment is classified exactly once.
struct FragmentCursor<'a> {
    fragments: &'a [Fragment],
    pos: usize,
}

impl<'a> FragmentCursor<'a> {
    fn new(fragments: &'a [Fragment]) -> Self {
        Self { fragments, pos: 0 }
    }

    /// Mark every fragment overlapping `[offset, offset + hunk_len)` as
    /// changed.
    ///
    /// First skips fragments ending at or before `offset`, then emits
    /// fragments starting before `offset + hunk_len`. The offset is
    /// signed so a probe at `offset - 1` from position 0 compares as -1
    /// and matches nothing. Zero-length probes rely on the strict
    /// less-than comparison to avoid matching a fragment that starts
    /// exactly at the boundary.
    fn mark_range(&mut self, hunk_len: i64, offset: i64, out: &mut Vec<Marker>) {
        while let Some(f) = self.fragments.get(self.pos) {
            if f.end_index() as i64 <= offset {
                self.pos += 1;
            } else {
                break;
            }
        }
        while let Some(f) = self.fragments.get(self.pos) {
            if (f.start_index as i64) < offset + hunk_len {
                out.push(Marker::Changed(f.clone()));
                self.pos += 1;
            } else {
                break;
            }
        }
    }
}

/// Produce the ordered marker sequence for a hunk stream and the two
/// documents' fragment lists.
///
/// Equal hunks advance both offsets and record a boundary (deduplicated,
/// never leading or trailing). A delete or insert hunk marks the
/// overlapping fragments in the owning document, then probes the other
/// document — one fragment immediately before the current position and a
/// zero-length probe at it — so the spot where the missing text would
/// have appeared is flagged even though no character there changed.
pub fn reconcile(hunks: &[Hunk], fragments: [&[Fragment]; 2]) -> Vec<Marker> {
    let mut cursors = [
        FragmentCursor::new(fragments[0]),
        FragmentCursor::new(fragments[1]),
    ];
    let mut offsets = [0i64; 2];
    let mut out: Vec<Marker> = Vec::new();

    for hunk in hunks {
        match hunk.op {
            DiffOp::Equal => {
                offsets[0] += hunk.len as i64;
                offsets[1] += hunk.len as i64;
                if !out.is_empty() && !matches!(out.last(), Some(Marker::Boundary)) {
                    out.push(Marker::Boundary);
                }
            }
            DiffOp::Delete | DiffOp::Insert => {
                let idx = if hunk.op == DiffOp::Delete { 0 } else { 1 };
                let other = 1 - idx;

                cursors[idx].mark_range(hunk.len as i64, offsets[idx], &mut out);
                offsets[idx] += hunk.len as i64;

                cursors[other].mark_range(1, offsets[other] - 1, &mut out);
                cursors[other].mark_range(0, offsets[other], &mut out);
            }
        }
    }

    if matches!(out.last(), Some(Marker::Boundary)) {
        out.pop();
    }

    debug!(
        "reconciled {} hunks into {} markers ({} changed)",
        hunks.len(),
        out.len(),
        out.iter().filter(|m| !m.is_boundary()).count()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentRef, PageInfo};

    /// Build space-terminated word fragments laid out left to right on one
    /// page.
    fn word_fragments(doc_index: u8, words: &[&str]) -> Vec<Fragment> {
        let doc = DocumentRef::new(doc_index, format!("doc{doc_index}.pdf"));
        let page = PageInfo::new(1, 600.0, 800.0);
        let mut offset = 0usize;
        words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let text = format!("{w} ");
                let length = text.chars().count();
                let f = Fragment {
                    index: i as u32,
                    doc: doc.clone(),
                    page,
                    x: 50.0 * i as f32,
                    y: 100.0,
                    width: 48.0,
                    height: 10.0,
                    text,
                    start_index: offset,
                    length,
                };
                offset += length;
                f
            })
            .collect()
    }

    fn changed_texts(markers: &[Marker], doc_index: u8) -> Vec<String> {
        markers
            .iter()
            .filter_map(Marker::as_changed)
            .filter(|f| f.doc.index == doc_index)
            .map(|f| f.text.clone())
            .collect()
    }

    #[test]
    fn test_identical_documents_yield_no_markers() {
        let left = word_fragments(0, &["hello", "world"]);
        let right = word_fragments(1, &["hello", "world"]);
        let hunks = [Hunk::new(DiffOp::Equal, 12)];
        let markers = reconcile(&hunks, [&left, &right]);
        assert!(markers.is_empty());
    }

    #[test]
    fn test_hello_world_vs_hello_there() {
        let left = word_fragments(0, &["hello", "world"]);
        let right = word_fragments(1, &["hello", "there"]);
        let hunks = [
            Hunk::new(DiffOp::Equal, 6),
            Hunk::new(DiffOp::Delete, 6),
            Hunk::new(DiffOp::Insert, 6),
        ];
        let markers = reconcile(&hunks, [&left, &right]);

        // Document 0: the deleted word. Document 1: the inserted word,
        // plus the fragment just before the insertion point flagged by
        // the probe.
        assert_eq!(changed_texts(&markers, 0), vec!["world "]);
        assert_eq!(changed_texts(&markers, 1), vec!["hello ", "there "]);

        // No boundary survives: the only equal hunk came first, and
        // leading boundaries are suppressed.
        assert!(markers.iter().all(|m| !m.is_boundary()));
    }

    #[test]
    fn test_boundary_between_changes() {
        let left = word_fragments(0, &["aa", "bb", "cc"]);
        let right = word_fragments(1, &["xx", "bb", "yy"]);
        let hunks = [
            Hunk::new(DiffOp::Delete, 3),
            Hunk::new(DiffOp::Insert, 3),
            Hunk::new(DiffOp::Equal, 3),
            Hunk::new(DiffOp::Delete, 3),
            Hunk::new(DiffOp::Insert, 3),
        ];
        let markers = reconcile(&hunks, [&left, &right]);

        let boundaries = markers.iter().filter(|m| m.is_boundary()).count();
        assert_eq!(boundaries, 1);
        assert_eq!(changed_texts(&markers, 0), vec!["aa ", "cc "]);
        // The probe for the second delete also flags "bb" on the right,
        // the fragment just before the deletion point.
        assert_eq!(changed_texts(&markers, 1), vec!["xx ", "bb ", "yy "]);
    }

    #[test]
    fn test_no_consecutive_boundaries() {
        let left = word_fragments(0, &["aa", "bb", "cc"]);
        let right = word_fragments(1, &["aa", "bb", "cc"]);
        // Two equal hunks in a row must not produce two boundaries.
        let hunks = [
            Hunk::new(DiffOp::Equal, 3),
            Hunk::new(DiffOp::Equal, 3),
            Hunk::new(DiffOp::Delete, 3),
        ];
        let markers = reconcile(&hunks, [&left, &right]);
        let mut prev_boundary = false;
        for m in &markers {
            if m.is_boundary() {
                assert!(!prev_boundary, "consecutive boundaries");
                prev_boundary = true;
            } else {
                prev_boundary = false;
            }
        }
    }

    #[test]
    fn test_trailing_boundary_dropped() {
        let left = word_fragments(0, &["aa", "bb"]);
        let right = word_fragments(1, &["xx", "bb"]);
        let hunks = [
            Hunk::new(DiffOp::Delete, 3),
            Hunk::new(DiffOp::Insert, 3),
            Hunk::new(DiffOp::Equal, 3),
        ];
        let markers = reconcile(&hunks, [&left, &right]);
        assert!(!markers.last().unwrap().is_boundary());
    }

    #[test]
    fn test_no_fragment_marked_twice() {
        let left = word_fragments(0, &["aa", "bb", "cc", "dd"]);
        let right = word_fragments(1, &["aa", "xx", "yy", "dd"]);
        let hunks = [
            Hunk::new(DiffOp::Equal, 3),
            Hunk::new(DiffOp::Delete, 6),
            Hunk::new(DiffOp::Insert, 6),
            Hunk::new(DiffOp::Equal, 3),
        ];
        let markers = reconcile(&hunks, [&left, &right]);
        for doc in 0..2u8 {
            let mut indexes: Vec<u32> = markers
                .iter()
                .filter_map(Marker::as_changed)
                .filter(|f| f.doc.index == doc)
                .map(|f| f.index)
                .collect();
            let before = indexes.len();
            indexes.dedup();
            assert_eq!(indexes.len(), before, "fragment emitted twice");
        }
    }

    #[test]
    fn test_every_overlapping_fragment_marked() {
        // A delete spanning parts of two fragments marks both whole.
        let left = word_fragments(0, &["abcd", "efgh"]);
        let right = word_fragments(1, &["abzh"]);
        // "abcd efgh " vs "abzh ": deleting chars 2..8 covers the tail of
        // the first fragment and the head of the second.
        let hunks = [
            Hunk::new(DiffOp::Equal, 2),
            Hunk::new(DiffOp::Delete, 6),
            Hunk::new(DiffOp::Insert, 1),
            Hunk::new(DiffOp::Equal, 2),
        ];
        let markers = reconcile(&hunks, [&left, &right]);
        assert_eq!(changed_texts(&markers, 0), vec!["abcd ", "efgh "]);
    }

    #[test]
    fn test_probe_at_document_start() {
        // Insert before any text in document 1: the offset-1 probe
        // compares as -1 and must mark nothing extra in document 0.
        let left = word_fragments(0, &["bb"]);
        let right = word_fragments(1, &["aa", "bb"]);
        let hunks = [Hunk::new(DiffOp::Insert, 3), Hunk::new(DiffOp::Equal, 3)];
        let markers = reconcile(&hunks, [&left, &right]);
        assert_eq!(changed_texts(&markers, 1), vec!["aa "]);
        // The zero-length probe at offset 0 must not mark the fragment
        // starting exactly there.
        assert_eq!(changed_texts(&markers, 0), Vec::<String>::new());
    }

    #[test]
    fn test_zero_length_probe_strictness() {
        // After an equal run the zero-length probe sits exactly on the
        // next fragment's start; the strict comparison must not mark it.
        let left = word_fragments(0, &["aa", "bb", "cc"]);
        let right = word_fragments(1, &["aa", "bb", "cc", "dd"]);
        let hunks = [Hunk::new(DiffOp::Equal, 9), Hunk::new(DiffOp::Insert, 3)];
        let markers = reconcile(&hunks, [&left, &right]);
        // Probe marks only the fragment before offset 9 in document 0.
        assert_eq!(changed_texts(&markers, 0), vec!["cc "]);
        assert_eq!(changed_texts(&markers, 1), vec!["dd "]);
    }
}
