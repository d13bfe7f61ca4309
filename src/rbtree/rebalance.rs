use log::trace;

use super::{Bst, RbTreeAlgorithms};
use crate::augment::Augmentation;
use crate::node_traits::NodeTraits;

/// Missing children count as black.
#[inline]
fn is_black<N: NodeTraits>(ctx: &N, node: Option<N::NodePtr>) -> bool {
    node.is_none_or(|n| ctx.color(n) == N::BLACK)
}

impl<N: NodeTraits, A: Augmentation<N>> RbTreeAlgorithms<N, A> {
    /// Primitive left rotation at `p`, then recomputes `p` and its new parent, the only two
    /// nodes whose children changed.
    pub fn rotate_left(ctx: &mut N, p: N::NodePtr, header: N::NodePtr) {
        Bst::rotate_left(ctx, p, header);
        A::recompute_data(ctx, p);
        let new_parent = Bst::parent_of(ctx, p);
        A::recompute_data(ctx, new_parent);
    }

    /// Mirror image of [`Self::rotate_left`].
    pub fn rotate_right(ctx: &mut N, p: N::NodePtr, header: N::NodePtr) {
        Bst::rotate_right(ctx, p, header);
        A::recompute_data(ctx, p);
        let new_parent = Bst::parent_of(ctx, p);
        A::recompute_data(ctx, new_parent);
    }

    /// Restores the invariants after `p` was linked in as a leaf.
    pub(crate) fn rebalance_after_insertion(ctx: &mut N, header: N::NodePtr, mut p: N::NodePtr) {
        A::recompute_data_ancestors(ctx, p);
        ctx.set_color(p, N::RED);

        while ctx.parent(header) != Some(p) {
            let p_parent = Bst::parent_of(ctx, p);
            if ctx.color(p_parent) != N::RED {
                break;
            }
            // a red parent is never the root, so the grandparent is a real (black) node
            let p_grandparent = Bst::parent_of(ctx, p_parent);

            if Bst::is_left_child(ctx, p_parent) {
                let uncle = ctx.right(p_grandparent);
                if !is_black(ctx, uncle) {
                    trace!("insert {p:?}: red uncle, recoloring below {p_grandparent:?}");
                    ctx.set_color(p_parent, N::BLACK);
                    ctx.set_color(p_grandparent, N::RED);
                    if let Some(uncle) = uncle {
                        ctx.set_color(uncle, N::BLACK);
                    }
                    p = p_grandparent;
                    continue;
                }
                if !Bst::is_left_child(ctx, p) {
                    trace!("insert {p:?}: inner child, rotating left at {p_parent:?}");
                    p = p_parent;
                    Self::rotate_left(ctx, p, header);
                }
                let new_parent = Bst::parent_of(ctx, p);
                let new_grandparent = Bst::parent_of(ctx, new_parent);
                trace!("insert {p:?}: rotating right at {new_grandparent:?}");
                ctx.set_color(new_parent, N::BLACK);
                ctx.set_color(new_grandparent, N::RED);
                Self::rotate_right(ctx, new_grandparent, header);
            } else {
                let uncle = ctx.left(p_grandparent);
                if !is_black(ctx, uncle) {
                    trace!("insert {p:?}: red uncle, recoloring below {p_grandparent:?}");
                    ctx.set_color(p_parent, N::BLACK);
                    ctx.set_color(p_grandparent, N::RED);
                    if let Some(uncle) = uncle {
                        ctx.set_color(uncle, N::BLACK);
                    }
                    p = p_grandparent;
                    continue;
                }
                if Bst::is_left_child(ctx, p) {
                    trace!("insert {p:?}: inner child, rotating right at {p_parent:?}");
                    p = p_parent;
                    Self::rotate_right(ctx, p, header);
                }
                let new_parent = Bst::parent_of(ctx, p);
                let new_grandparent = Bst::parent_of(ctx, new_parent);
                trace!("insert {p:?}: rotating left at {new_grandparent:?}");
                ctx.set_color(new_parent, N::BLACK);
                ctx.set_color(new_grandparent, N::RED);
                Self::rotate_left(ctx, new_grandparent, header);
            }
            break;
        }

        let root = ctx.parent(header).expect("tree can't be empty right after an insertion");
        ctx.set_color(root, N::BLACK);

        #[cfg(feature = "verify-invariants")]
        Self::assert_valid(ctx, header);
    }

    /// Restores the black height after a black position was removed. `x` is the node that
    /// took its place (possibly none) and `x_parent` its parent.
    pub(crate) fn rebalance_after_erasure(
        ctx: &mut N,
        header: N::NodePtr,
        mut x: Option<N::NodePtr>,
        mut x_parent: N::NodePtr,
    ) {
        while x != ctx.parent(header) && is_black(ctx, x) {
            // `x` is short one black on its side of `x_parent`, so its sibling `w` exists
            if x == ctx.left(x_parent) {
                let mut w = ctx.right(x_parent).expect("sibling of a black-deficient node");
                if ctx.color(w) == N::RED {
                    trace!("erase below {x_parent:?}: red sibling {w:?}, rotating left");
                    ctx.set_color(w, N::BLACK);
                    ctx.set_color(x_parent, N::RED);
                    Self::rotate_left(ctx, x_parent, header);
                    w = ctx.right(x_parent).expect("sibling of a black-deficient node");
                }
                if is_black(ctx, ctx.left(w)) && is_black(ctx, ctx.right(w)) {
                    trace!("erase below {x_parent:?}: black nephews, moving up");
                    ctx.set_color(w, N::RED);
                    x = Some(x_parent);
                    x_parent = Bst::parent_of(ctx, x_parent);
                    continue;
                }
                if is_black(ctx, ctx.right(w)) {
                    // near nephew is red, turn it into the far one
                    trace!("erase below {x_parent:?}: red near nephew, rotating right at {w:?}");
                    if let Some(near) = ctx.left(w) {
                        ctx.set_color(near, N::BLACK);
                    }
                    ctx.set_color(w, N::RED);
                    Self::rotate_right(ctx, w, header);
                    w = ctx.right(x_parent).expect("sibling of a black-deficient node");
                }
                trace!("erase below {x_parent:?}: red far nephew, rotating left");
                let parent_color = ctx.color(x_parent);
                ctx.set_color(w, parent_color);
                ctx.set_color(x_parent, N::BLACK);
                if let Some(far) = ctx.right(w) {
                    ctx.set_color(far, N::BLACK);
                }
                Self::rotate_left(ctx, x_parent, header);
                break;
            } else {
                let mut w = ctx.left(x_parent).expect("sibling of a black-deficient node");
                if ctx.color(w) == N::RED {
                    trace!("erase below {x_parent:?}: red sibling {w:?}, rotating right");
                    ctx.set_color(w, N::BLACK);
                    ctx.set_color(x_parent, N::RED);
                    Self::rotate_right(ctx, x_parent, header);
                    w = ctx.left(x_parent).expect("sibling of a black-deficient node");
                }
                if is_black(ctx, ctx.right(w)) && is_black(ctx, ctx.left(w)) {
                    trace!("erase below {x_parent:?}: black nephews, moving up");
                    ctx.set_color(w, N::RED);
                    x = Some(x_parent);
                    x_parent = Bst::parent_of(ctx, x_parent);
                    continue;
                }
                if is_black(ctx, ctx.left(w)) {
                    trace!("erase below {x_parent:?}: red near nephew, rotating left at {w:?}");
                    if let Some(near) = ctx.right(w) {
                        ctx.set_color(near, N::BLACK);
                    }
                    ctx.set_color(w, N::RED);
                    Self::rotate_left(ctx, w, header);
                    w = ctx.left(x_parent).expect("sibling of a black-deficient node");
                }
                trace!("erase below {x_parent:?}: red far nephew, rotating right");
                let parent_color = ctx.color(x_parent);
                ctx.set_color(w, parent_color);
                ctx.set_color(x_parent, N::BLACK);
                if let Some(far) = ctx.left(w) {
                    ctx.set_color(far, N::BLACK);
                }
                Self::rotate_right(ctx, x_parent, header);
                break;
            }
        }
        if let Some(x) = x {
            ctx.set_color(x, N::BLACK);
        }
    }
}
