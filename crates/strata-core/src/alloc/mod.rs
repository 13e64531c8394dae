//! Collections used across Strata.
//!
//! Hash maps and sets use AHash; component, layer and frame storage uses the
//! generational [`SparseSet`].

pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
pub use sparse_set::{IndexSlot, SparseSet};
