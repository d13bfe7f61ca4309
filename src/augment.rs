//! Selection of the optional augmented-data hooks.
//!
//! The red-black engine is generic over an [`Augmentation`] strategy picked once, as a type
//! parameter, when the caller names `RbTreeAlgorithms<N, A>`. A strategy without a hook
//! compiles that hook down to an empty inlined function, so trees without aggregates pay
//! nothing: there is no runtime "does this node type support it" check.

use crate::bstree::BstreeAlgorithms;
use crate::node_traits::{CopyData, NodeTraits, RecomputeData};

pub trait Augmentation<N: NodeTraits> {
    /// Recompute `node`'s aggregate from its children.
    fn recompute_data(ctx: &mut N, node: N::NodePtr);

    /// Copy the aggregate of `src` into `dest` (used when cloning).
    fn copy_data(ctx: &mut N, dest: N::NodePtr, src: N::NodePtr);

    /// Recompute `start` and every ancestor of it, stopping before the header.
    fn recompute_data_ancestors(ctx: &mut N, start: N::NodePtr) {
        let end = BstreeAlgorithms::get_header(ctx, start);
        let mut node = start;
        while node != end {
            Self::recompute_data(ctx, node);
            match ctx.parent(node) {
                Some(parent) => node = parent,
                None => break,
            }
        }
    }
}

/// No hooks: every augmentation step is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAugment;

impl<N: NodeTraits> Augmentation<N> for NoAugment {
    #[inline(always)]
    fn recompute_data(_ctx: &mut N, _node: N::NodePtr) {}

    #[inline(always)]
    fn copy_data(_ctx: &mut N, _dest: N::NodePtr, _src: N::NodePtr) {}

    #[inline(always)]
    fn recompute_data_ancestors(_ctx: &mut N, _start: N::NodePtr) {}
}

/// Only `recompute_data` is provided; clones start with whatever the cloner produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecomputeOnly;

impl<N: RecomputeData> Augmentation<N> for RecomputeOnly {
    #[inline]
    fn recompute_data(ctx: &mut N, node: N::NodePtr) {
        ctx.recompute_data(node)
    }

    #[inline(always)]
    fn copy_data(_ctx: &mut N, _dest: N::NodePtr, _src: N::NodePtr) {}
}

/// Only `copy_data` is provided.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOnly;

impl<N: CopyData> Augmentation<N> for CopyOnly {
    #[inline(always)]
    fn recompute_data(_ctx: &mut N, _node: N::NodePtr) {}

    #[inline]
    fn copy_data(ctx: &mut N, dest: N::NodePtr, src: N::NodePtr) {
        ctx.copy_data(dest, src)
    }

    #[inline(always)]
    fn recompute_data_ancestors(_ctx: &mut N, _start: N::NodePtr) {}
}

/// Both hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Augmented;

impl<N: RecomputeData + CopyData> Augmentation<N> for Augmented {
    #[inline]
    fn recompute_data(ctx: &mut N, node: N::NodePtr) {
        ctx.recompute_data(node)
    }

    #[inline]
    fn copy_data(ctx: &mut N, dest: N::NodePtr, src: N::NodePtr) {
        ctx.copy_data(dest, src)
    }
}
