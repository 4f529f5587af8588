//! Change simplification: coalesce adjacent changed fragments.
//!
//! Marking happens word by word, so a changed phrase shows up as a run of
//! neighboring boxes that would render as disjoint rectangles. Merging
//! runs that sit on the same visual line keeps one box per change.

use crate::model::Marker;

/// Merge a changed marker into the previous one when both are changed
/// fragments of the same document and page, share vertical position and
/// height, and were originally adjacent (`index` exactly one greater).
///
/// The merged marker widens to the new fragment's right edge, takes over
/// its `index` so the run can keep extending, and concatenates text.
/// Every changed fragment is represented exactly once in the output,
/// standalone or absorbed. Idempotent: a second pass merges nothing.
pub fn simplify(markers: &[Marker]) -> Vec<Marker> {
    let mut out: Vec<Marker> = Vec::with_capacity(markers.len());
    for marker in markers {
        let mut merged = false;
        if let Marker::Changed(f) = marker {
            if let Some(Marker::Changed(prev)) = out.last_mut() {
                if prev.doc.index == f.doc.index
                    && prev.page.number == f.page.number
                    && prev.index + 1 == f.index
                    && prev.y == f.y
                    && prev.height == f.height
                {
                    prev.width = f.right() - prev.x;
                    prev.text.push_str(&f.text);
                    prev.index += 1;
                    merged = true;
                }
            }
        }
        if !merged {
            out.push(marker.clone());
        }
    }
    out
}
