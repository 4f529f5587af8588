//! Character-level diff hunks.

use log::debug;
use similar::TextDiff;

/// One diff operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    /// Text present in both documents.
    Equal,
    /// Text present only in document 0.
    Delete,
    /// Text present only in document 1.
    Insert,
}

/// One operation with a character length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunk {
    pub op: DiffOp,
    pub len: usize,
}

impl Hunk {
    pub fn new(op: DiffOp, len: usize) -> Self {
        Self { op, len }
    }
}

/// Compute the character-level diff of the two flat strings as an ordered
/// hunk sequence.
///
/// A `Replace` from the underlying diff is folded into a delete hunk
/// followed by an insert hunk, so the reconciler only ever sees the three
/// primitive operations. The sum of equal+delete lengths equals the left
/// string's character count, and equal+insert the right's.
pub fn diff_text(left: &str, right: &str) -> Vec<Hunk> {
    let diff = TextDiff::from_chars(left, right);
    let mut hunks = Vec::new();
    let push = |hunks: &mut Vec<Hunk>, op: DiffOp, len: usize| {
        if len > 0 {
            hunks.push(Hunk::new(op, len));
        }
    };
    for op in diff.ops() {
        match *op {
            similar::DiffOp::Equal { len, .. } => push(&mut hunks, DiffOp::Equal, len),
            similar::DiffOp::Delete { old_len, .. } => push(&mut hunks, DiffOp::Delete, old_len),
            similar::DiffOp::Insert { new_len, .. } => push(&mut hunks, DiffOp::Insert, new_len),
            similar::DiffOp::Replace {
                old_len, new_len, ..
            } => {
                push(&mut hunks, DiffOp::Delete, old_len);
                push(&mut hunks, DiffOp::Insert, new_len);
            }
        }
    }
    debug!("diff produced {} hunks", hunks.len());
    hunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length_sums(hunks: &[Hunk]) -> (usize, usize) {
        let left = hunks
            .iter()
            .filter(|h| h.op != DiffOp::Insert)
            .map(|h| h.len)
            .sum();
        let right = hunks
            .iter()
            .filter(|h| h.op != DiffOp::Delete)
            .map(|h| h.len)
            .sum();
        (left, right)
    }

    #[test]
    fn test_identical_strings() {
        let hunks = diff_text("same text ", "same text ");
        assert_eq!(hunks, vec![Hunk::new(DiffOp::Equal, 10)]);
    }

    #[test]
    fn test_length_sums_cover_both_sides() {
        let a = "hello world ";
        let b = "hello there ";
        let hunks = diff_text(a, b);
        let (left, right) = length_sums(&hunks);
        assert_eq!(left, a.chars().count());
        assert_eq!(right, b.chars().count());
    }

    #[test]
    fn test_length_sums_multibyte() {
        let a = "naïve approach ";
        let b = "naïve idea ";
        let hunks = diff_text(a, b);
        let (left, right) = length_sums(&hunks);
        assert_eq!(left, a.chars().count());
        assert_eq!(right, b.chars().count());
    }

    #[test]
    fn test_pure_insert_and_delete() {
        let hunks = diff_text("", "abc");
        assert_eq!(hunks, vec![Hunk::new(DiffOp::Insert, 3)]);

        let hunks = diff_text("abc", "");
        assert_eq!(hunks, vec![Hunk::new(DiffOp::Delete, 3)]);
    }

    #[test]
    fn test_no_zero_length_hunks() {
        let hunks = diff_text("abc def ", "abc xyz ");
        assert!(hunks.iter().all(|h| h.len > 0));
    }
}
