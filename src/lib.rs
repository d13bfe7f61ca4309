//! Intrusive red-black tree algorithms.
//!
//! Nothing here owns a node. Callers keep their records wherever they like (the bundled
//! [`arena::Arena`] is one option), describe how to reach the embedded links through
//! [`NodeTraits`], and call into [`RbTreeAlgorithms`] with a header node that anchors each
//! tree.
#![forbid(unsafe_code)]

// link access
pub mod node_traits;
pub mod augment;

// algorithms
pub mod bstree;
pub mod rbtree;

// storage
pub mod arena;

#[cfg(test)]
mod test_support;

pub use augment::{Augmentation, Augmented, CopyOnly, NoAugment, RecomputeOnly};
pub use bstree::{BstreeAlgorithms, DataForRebalance, InsertCommitData, UniqueCheck};
pub use node_traits::{CopyData, NodeTraits, RecomputeData};
pub use rbtree::{InvariantViolation, RbTreeAlgorithms};
