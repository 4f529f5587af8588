//! End-of-line hyphen normalization.
//!
//! `pdftotext` reports a hyphenated word split across lines as two words,
//! the first ending in a plain hyphen. Replacing that hyphen with a soft
//! hyphen lets the serializer join the halves without a space, so the word
//! diffs as one token. Finding the end of a line is a heuristic; justified
//! text with irregular spacing can defeat it.

use super::{serialize::SOFT_HYPHEN, RawBox};

/// Single-pass, one-box-lookahead scan replacing trailing hyphens of
/// line-ending boxes with the soft-hyphen marker.
///
/// A box is classified as last on its visual line when the next box sits
/// on a different page, or its top edge is at or below the midpoint of the
/// current box's vertical extent. The final box is always line-ending.
pub fn mark_eol_hyphens(boxes: &mut [RawBox]) {
    for i in 0..boxes.len() {
        let line_end = match boxes.get(i + 1) {
            None => true,
            Some(next) => {
                next.page.number != boxes[i].page.number
                    || next.y >= boxes[i].y + boxes[i].height / 2.0
            }
        };
        if line_end {
            mark_eol_hyphen(&mut boxes[i]);
        }
    }
}

fn mark_eol_hyphen(b: &mut RawBox) {
    if b.text.ends_with('-') {
        b.text.pop();
        b.text.push(SOFT_HYPHEN);
    }
}
