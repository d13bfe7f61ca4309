//! Unbalanced binary-search-tree primitives over a [`NodeTraits`] context.
//!
//! Everything here is pure pointer surgery: nothing looks at colors or cached data. The
//! header node closes a cycle with the root (`parent(header) == root`,
//! `parent(root) == header`) and caches the leftmost and rightmost nodes.

use std::marker::PhantomData;

use crate::node_traits::NodeTraits;

mod erase;
mod insert;
mod search;

pub use erase::DataForRebalance;
pub use insert::{InsertCommitData, UniqueCheck};

/// Namespace for the primitive algorithms, never instantiated.
pub struct BstreeAlgorithms<N>(PhantomData<fn() -> N>);

impl<N: NodeTraits> BstreeAlgorithms<N> {
    /// Parent of a node that is known to be linked (or the header of a non-empty tree).
    #[inline]
    pub(crate) fn parent_of(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        ctx.parent(node).expect("linked node has a parent")
    }

    /// Marks `node` as not being part of any tree.
    pub fn init(ctx: &mut N, node: N::NodePtr) {
        ctx.set_parent(node, None);
        ctx.set_left(node, None);
        ctx.set_right(node, None);
    }

    /// Turns `header` into the header of an empty tree.
    pub fn init_header(ctx: &mut N, header: N::NodePtr) {
        ctx.set_parent(header, None);
        ctx.set_left(header, Some(header));
        ctx.set_right(header, Some(header));
    }

    /// `true` for a node that isn't linked, or for the header of an empty tree.
    pub fn unique(ctx: &N, node: N::NodePtr) -> bool {
        ctx.parent(node).is_none()
    }

    /// Structural header test.
    ///
    /// The header has no parent when the tree is empty; otherwise its leftmost and rightmost
    /// links don't both point back at it as a parent would.
    pub fn is_header(ctx: &N, node: N::NodePtr) -> bool {
        if ctx.parent(node).is_none() {
            return true;
        }
        match (ctx.left(node), ctx.right(node)) {
            (Some(l), Some(r)) => {
                l == r || ctx.parent(l) != Some(node) || ctx.parent(r) != Some(node)
            }
            _ => false,
        }
    }

    /// Finds the header of the tree `node` belongs to by climbing to the root/header cycle.
    ///
    /// An unlinked node is returned as is.
    pub fn get_header(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        let Some(mut p) = ctx.parent(node) else {
            return node;
        };
        let mut n = node;
        let mut pp = ctx.parent(p);
        if pp != Some(n) {
            while pp != Some(n) {
                n = p;
                p = pp.expect("linked node has a parent");
                pp = ctx.parent(p);
            }
            p
        } else if Self::is_header(ctx, n) {
            n
        } else {
            p
        }
    }

    pub fn root_node(ctx: &N, header: N::NodePtr) -> Option<N::NodePtr> {
        ctx.parent(header)
    }

    /// The leftmost node, or `header` when the tree is empty.
    pub fn begin_node(ctx: &N, header: N::NodePtr) -> N::NodePtr {
        ctx.left(header).unwrap_or(header)
    }

    pub fn end_node(_ctx: &N, header: N::NodePtr) -> N::NodePtr {
        header
    }

    pub fn minimum(ctx: &N, mut node: N::NodePtr) -> N::NodePtr {
        while let Some(l) = ctx.left(node) {
            node = l;
        }
        node
    }

    pub fn maximum(ctx: &N, mut node: N::NodePtr) -> N::NodePtr {
        while let Some(r) = ctx.right(node) {
            node = r;
        }
        node
    }

    pub fn is_left_child(ctx: &N, node: N::NodePtr) -> bool {
        ctx.left(Self::parent_of(ctx, node)) == Some(node)
    }

    /// In-order successor. The successor of the rightmost node is the header.
    pub fn next_node(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        if let Some(r) = ctx.right(node) {
            return Self::minimum(ctx, r);
        }
        let mut x = node;
        let mut y = Self::parent_of(ctx, x);
        while ctx.right(y) == Some(x) {
            x = y;
            y = Self::parent_of(ctx, y);
        }
        // coming up from the root of a tree whose root is also the rightmost node
        if ctx.right(x) != Some(y) { y } else { x }
    }

    /// In-order predecessor. The predecessor of the header is the rightmost node.
    pub fn prev_node(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        if Self::is_header(ctx, node) {
            return ctx.right(node).unwrap_or(node);
        }
        if let Some(l) = ctx.left(node) {
            return Self::maximum(ctx, l);
        }
        let mut x = node;
        let mut y = Self::parent_of(ctx, x);
        while ctx.left(y) == Some(x) {
            x = y;
            y = Self::parent_of(ctx, y);
        }
        y
    }

    /// Number of nodes in the tree. O(n).
    pub fn size(ctx: &N, header: N::NodePtr) -> usize {
        let mut len = 0;
        let mut node = Self::begin_node(ctx, header);
        while node != header {
            len += 1;
            node = Self::next_node(ctx, node);
        }
        len
    }

    /// ```text
    ///     p                x
    ///    / \              / \
    ///   a   x     =>     p   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    pub fn rotate_left(ctx: &mut N, p: N::NodePtr, header: N::NodePtr) {
        let x = ctx.right(p).expect("rotate_left needs a right child");
        let x_left = ctx.left(x);
        ctx.set_right(p, x_left);
        if let Some(b) = x_left {
            ctx.set_parent(b, Some(p));
        }
        let p_parent = Self::parent_of(ctx, p);
        ctx.set_parent(x, Some(p_parent));
        Self::replace_child_link(ctx, p, p_parent, Some(x), header);
        ctx.set_left(x, Some(p));
        ctx.set_parent(p, Some(x));
    }

    /// Mirror image of [`Self::rotate_left`].
    pub fn rotate_right(ctx: &mut N, p: N::NodePtr, header: N::NodePtr) {
        let x = ctx.left(p).expect("rotate_right needs a left child");
        let x_right = ctx.right(x);
        ctx.set_left(p, x_right);
        if let Some(b) = x_right {
            ctx.set_parent(b, Some(p));
        }
        let p_parent = Self::parent_of(ctx, p);
        ctx.set_parent(x, Some(p_parent));
        Self::replace_child_link(ctx, p, p_parent, Some(x), header);
        ctx.set_right(x, Some(p));
        ctx.set_parent(p, Some(x));
    }

    /// Points whatever link of `parent` referred to `own` (the root link, when `parent` is
    /// the header) at `with` instead.
    fn replace_child_link(
        ctx: &mut N,
        own: N::NodePtr,
        parent: N::NodePtr,
        with: Option<N::NodePtr>,
        header: N::NodePtr,
    ) {
        if parent == header {
            ctx.set_parent(header, with);
        } else if ctx.left(parent) == Some(own) {
            ctx.set_left(parent, with);
        } else {
            ctx.set_right(parent, with);
        }
    }

    /// Exchanges the contents of two headers, moving whole trees between them.
    pub fn swap_tree(ctx: &mut N, header1: N::NodePtr, header2: N::NodePtr) {
        if header1 == header2 {
            return;
        }

        let (l1, r1, p1) = (ctx.left(header1), ctx.right(header1), ctx.parent(header1));
        let (l2, r2, p2) = (ctx.left(header2), ctx.right(header2), ctx.parent(header2));

        // an empty header points at itself, not at the other one
        let retarget = |link: Option<N::NodePtr>, from: N::NodePtr, to: N::NodePtr| {
            if link == Some(from) { Some(to) } else { link }
        };
        ctx.set_left(header1, retarget(l2, header2, header1));
        ctx.set_right(header1, retarget(r2, header2, header1));
        ctx.set_parent(header1, p2);
        ctx.set_left(header2, retarget(l1, header1, header2));
        ctx.set_right(header2, retarget(r1, header1, header2));
        ctx.set_parent(header2, p1);

        if let Some(root) = ctx.parent(header1) {
            ctx.set_parent(root, Some(header1));
        }
        if let Some(root) = ctx.parent(header2) {
            ctx.set_parent(root, Some(header2));
        }
    }

    /// Exchanges the positions of two nodes, which may belong to different trees and may be
    /// adjacent to each other. Neither may be a header.
    pub fn swap_nodes(
        ctx: &mut N,
        node1: N::NodePtr,
        header1: N::NodePtr,
        node2: N::NodePtr,
        header2: N::NodePtr,
    ) {
        if node1 == node2 {
            return;
        }

        if header1 != header2 {
            if ctx.left(header1) == Some(node1) {
                ctx.set_left(header1, Some(node2));
            }
            if ctx.right(header1) == Some(node1) {
                ctx.set_right(header1, Some(node2));
            }
            if ctx.parent(header1) == Some(node1) {
                ctx.set_parent(header1, Some(node2));
            }

            if ctx.left(header2) == Some(node2) {
                ctx.set_left(header2, Some(node1));
            }
            if ctx.right(header2) == Some(node2) {
                ctx.set_right(header2, Some(node1));
            }
            if ctx.parent(header2) == Some(node2) {
                ctx.set_parent(header2, Some(node1));
            }
        } else {
            if ctx.left(header1) == Some(node1) {
                ctx.set_left(header1, Some(node2));
            } else if ctx.left(header2) == Some(node2) {
                ctx.set_left(header2, Some(node1));
            }

            if ctx.right(header1) == Some(node1) {
                ctx.set_right(header1, Some(node2));
            } else if ctx.right(header2) == Some(node2) {
                ctx.set_right(header2, Some(node1));
            }

            if ctx.parent(header1) == Some(node1) {
                ctx.set_parent(header1, Some(node2));
            } else if ctx.parent(header2) == Some(node2) {
                ctx.set_parent(header2, Some(node1));
            }

            // Adjacent nodes: turn the shared link into a self link so the plain exchange
            // below ends up pointing each node at the other.
            if ctx.parent(node2) == Some(node1) {
                ctx.set_parent(node2, Some(node2));
                if ctx.right(node1) == Some(node2) {
                    ctx.set_right(node1, Some(node1));
                } else {
                    ctx.set_left(node1, Some(node1));
                }
            } else if ctx.parent(node1) == Some(node2) {
                ctx.set_parent(node1, Some(node1));
                if ctx.right(node2) == Some(node1) {
                    ctx.set_right(node2, Some(node2));
                } else {
                    ctx.set_left(node2, Some(node2));
                }
            }
        }

        let (l1, l2) = (ctx.left(node1), ctx.left(node2));
        ctx.set_left(node1, l2);
        ctx.set_left(node2, l1);
        let (r1, r2) = (ctx.right(node1), ctx.right(node2));
        ctx.set_right(node1, r2);
        ctx.set_right(node2, r1);
        let (p1, p2) = (ctx.parent(node1), ctx.parent(node2));
        ctx.set_parent(node1, p2);
        ctx.set_parent(node2, p1);

        Self::adopt(ctx, node1, node2, header2);
        Self::adopt(ctx, node2, node1, header1);
    }

    /// After `node` took over `previous`'s links, point its neighbours back at it. The
    /// header of the tree it moved into has already been updated.
    fn adopt(ctx: &mut N, node: N::NodePtr, previous: N::NodePtr, header: N::NodePtr) {
        if let Some(l) = ctx.left(node) {
            ctx.set_parent(l, Some(node));
        }
        if let Some(r) = ctx.right(node) {
            ctx.set_parent(r, Some(node));
        }
        let Some(p) = ctx.parent(node) else { return };
        if p == header {
            return;
        }
        if ctx.left(p) == Some(previous) {
            ctx.set_left(p, Some(node));
        }
        if ctx.right(p) == Some(previous) {
            ctx.set_right(p, Some(node));
        }
    }

    /// Puts the unlinked `new_node` in the exact position of `node_to_be_replaced`.
    pub fn replace_node(
        ctx: &mut N,
        node_to_be_replaced: N::NodePtr,
        header: N::NodePtr,
        new_node: N::NodePtr,
    ) {
        if node_to_be_replaced == new_node {
            return;
        }

        if ctx.left(header) == Some(node_to_be_replaced) {
            ctx.set_left(header, Some(new_node));
        }
        if ctx.right(header) == Some(node_to_be_replaced) {
            ctx.set_right(header, Some(new_node));
        }
        if ctx.parent(header) == Some(node_to_be_replaced) {
            ctx.set_parent(header, Some(new_node));
        }

        let (l, r, p) = (
            ctx.left(node_to_be_replaced),
            ctx.right(node_to_be_replaced),
            ctx.parent(node_to_be_replaced),
        );
        ctx.set_left(new_node, l);
        ctx.set_right(new_node, r);
        ctx.set_parent(new_node, p);

        Self::adopt(ctx, new_node, node_to_be_replaced, header);
    }

    /// Detaches the leftmost node without keeping the tree balanced, for destructive
    /// traversals. Returns `None` once the tree is empty.
    pub fn unlink_leftmost_without_rebalance(ctx: &mut N, header: N::NodePtr) -> Option<N::NodePtr> {
        let leftmost = Self::begin_node(ctx, header);
        if leftmost == header {
            return None;
        }
        let leftmost_parent = Self::parent_of(ctx, leftmost);
        let leftmost_right = ctx.right(leftmost);
        let is_root = leftmost_parent == header;

        if let Some(r) = leftmost_right {
            ctx.set_parent(r, Some(leftmost_parent));
            let new_leftmost = Self::minimum(ctx, r);
            ctx.set_left(header, Some(new_leftmost));
            if is_root {
                ctx.set_parent(header, Some(r));
            } else {
                ctx.set_left(leftmost_parent, Some(r));
            }
        } else if is_root {
            Self::init_header(ctx, header);
        } else {
            ctx.set_left(leftmost_parent, None);
            ctx.set_left(header, Some(leftmost_parent));
        }
        Some(leftmost)
    }
}
