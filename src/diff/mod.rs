//! Diffing and reconciliation.
//!
//! `hunks` computes the character-level diff of the two flat strings;
//! `reconcile` correlates the hunk stream with both documents' fragment
//! lists into the ordered marker sequence; `simplify` coalesces runs of
//! adjacent changed fragments.

mod hunks;
mod reconcile;
mod simplify;

pub use hunks::{diff_text, DiffOp, Hunk};
pub use reconcile::reconcile;
pub use simplify::simplify;
