use std::cmp::Ordering;

use super::{Bst, RbTreeAlgorithms};
use crate::augment::Augmentation;
use crate::node_traits::NodeTraits;

/// The first broken invariant [`RbTreeAlgorithms::verify`] ran into.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation<P> {
    #[error("header {header:?} is not red")]
    HeaderNotRed { header: P },
    #[error("root {root:?} is red")]
    RedRoot { root: P },
    #[error("red node {node:?} has a red child {child:?}")]
    RedChildOfRed { node: P, child: P },
    #[error("node {node:?} has {left} black nodes below it on the left but {right} on the right")]
    BlackHeightMismatch { node: P, left: usize, right: usize },
    #[error("node {node:?} doesn't point back to its parent {parent:?}")]
    BrokenParentLink { node: P, parent: P },
    #[error("header caches {cached:?} as its {side} node instead of {actual:?}")]
    StaleBounds { side: &'static str, cached: Option<P>, actual: P },
    #[error("node {next:?} is ordered before its predecessor {prev:?}")]
    OutOfOrder { prev: P, next: P },
}

impl<N: NodeTraits, A: Augmentation<N>> RbTreeAlgorithms<N, A> {
    /// Checks the structure and coloring of the whole tree. O(n).
    ///
    /// Returns the black height: the number of black nodes on every path from the root down
    /// to a missing child (0 for an empty tree).
    pub fn verify(ctx: &N, header: N::NodePtr) -> Result<usize, InvariantViolation<N::NodePtr>> {
        if ctx.color(header) != N::RED {
            return Err(InvariantViolation::HeaderNotRed { header });
        }

        let Some(root) = ctx.parent(header) else {
            for (side, cached) in [("leftmost", ctx.left(header)), ("rightmost", ctx.right(header))] {
                if cached != Some(header) {
                    return Err(InvariantViolation::StaleBounds { side, cached, actual: header });
                }
            }
            return Ok(0);
        };

        if ctx.parent(root) != Some(header) {
            return Err(InvariantViolation::BrokenParentLink { node: root, parent: header });
        }
        if ctx.color(root) != N::BLACK {
            return Err(InvariantViolation::RedRoot { root });
        }

        let black_height = Self::verify_subtree(ctx, root)?;

        let leftmost = Bst::minimum(ctx, root);
        if ctx.left(header) != Some(leftmost) {
            return Err(InvariantViolation::StaleBounds { side: "leftmost", cached: ctx.left(header), actual: leftmost });
        }
        let rightmost = Bst::maximum(ctx, root);
        if ctx.right(header) != Some(rightmost) {
            return Err(InvariantViolation::StaleBounds { side: "rightmost", cached: ctx.right(header), actual: rightmost });
        }

        Ok(black_height)
    }

    fn verify_subtree(ctx: &N, node: N::NodePtr) -> Result<usize, InvariantViolation<N::NodePtr>> {
        let is_red = ctx.color(node) == N::RED;
        let mut heights = [0; 2];

        for (height, child) in heights.iter_mut().zip([ctx.left(node), ctx.right(node)]) {
            let Some(child) = child else { continue };
            if ctx.parent(child) != Some(node) {
                return Err(InvariantViolation::BrokenParentLink { node: child, parent: node });
            }
            if is_red && ctx.color(child) == N::RED {
                return Err(InvariantViolation::RedChildOfRed { node, child });
            }
            *height = Self::verify_subtree(ctx, child)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { node, left, right });
        }
        Ok(left + usize::from(!is_red))
    }

    /// Checks that an in-order walk never goes down according to `cmp`.
    pub fn verify_order<C>(ctx: &N, header: N::NodePtr, mut cmp: C) -> Result<(), InvariantViolation<N::NodePtr>>
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        let mut prev = Bst::begin_node(ctx, header);
        if prev == header {
            return Ok(());
        }
        let mut next = Bst::next_node(ctx, prev);
        while next != header {
            if cmp(ctx, prev, next) == Ordering::Greater {
                return Err(InvariantViolation::OutOfOrder { prev, next });
            }
            prev = next;
            next = Bst::next_node(ctx, next);
        }
        Ok(())
    }

    /// Panics (after logging) if [`Self::verify`] fails.
    #[cfg(feature = "verify-invariants")]
    pub(crate) fn assert_valid(ctx: &N, header: N::NodePtr) {
        if let Err(violation) = Self::verify(ctx, header) {
            log::error!("red-black invariant broken: {violation}");
            panic!("red-black invariant broken: {violation}");
        }
    }
}
