//! Data model for the comparison pipeline.
//!
//! Fragments are the atomic unit of geometric change marking; markers are
//! the mixed boundary / changed-fragment sequence the reconciler produces
//! and the renderer consumes. Both serialize to the stable JSON
//! interchange format, so a change list can be computed once and rendered
//! elsewhere.

mod fragment;
mod marker;

pub use fragment::{DocumentRef, Fragment, PageInfo};
pub use marker::Marker;
