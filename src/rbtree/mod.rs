//! Red-black balancing on top of [`BstreeAlgorithms`].
//!
//! Every mutating entry point runs the matching primitive first and then restores the
//! color invariants (and, through the [`Augmentation`] strategy `A`, the cached aggregates):
//!
//! - no red node has a red child,
//! - every path from a node down to a missing child crosses the same number of black nodes,
//! - the header is red, which is what tells it apart from a real node in [`RbTreeAlgorithms::is_header`].
//!
//! Read-only queries are forwarded to the primitive layer unchanged; see
//! [`BstreeAlgorithms`] for their details.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::marker::PhantomData;

use crate::augment::{Augmentation, NoAugment};
use crate::bstree::{BstreeAlgorithms, InsertCommitData, UniqueCheck};
use crate::node_traits::NodeTraits;

mod rebalance;
mod verify;


pub use verify::InvariantViolation;

/// Namespace for the red-black algorithms over context `N` with augmentation strategy `A`.
pub struct RbTreeAlgorithms<N, A = NoAugment>(PhantomData<fn() -> (N, A)>);

type Bst<N> = BstreeAlgorithms<N>;

fn swap_colors<N: NodeTraits>(ctx: &mut N, a: N::NodePtr, b: N::NodePtr) {
    let (ca, cb) = (ctx.color(a), ctx.color(b));
    ctx.set_color(a, cb);
    ctx.set_color(b, ca);
}

impl<N: NodeTraits, A: Augmentation<N>> RbTreeAlgorithms<N, A> {
    /// Turns `header` into the (red) header of an empty tree.
    pub fn init_header(ctx: &mut N, header: N::NodePtr) {
        Bst::init_header(ctx, header);
        ctx.set_color(header, N::RED);
    }

    /// A node is a header if it is red and structurally looks like one.
    pub fn is_header(ctx: &N, node: N::NodePtr) -> bool {
        ctx.color(node) == N::RED && Bst::is_header(ctx, node)
    }

    /// Header of the tree `node` is linked into.
    pub fn get_header(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        Bst::get_header(ctx, node)
    }

    /// Resets `node` to the unlinked state.
    pub fn init(ctx: &mut N, node: N::NodePtr) {
        Bst::init(ctx, node)
    }

    /// `true` for an unlinked node or the header of an empty tree.
    pub fn unique(ctx: &N, node: N::NodePtr) -> bool {
        Bst::unique(ctx, node)
    }

    /// The root, or `None` for an empty tree.
    pub fn root_node(ctx: &N, header: N::NodePtr) -> Option<N::NodePtr> {
        Bst::root_node(ctx, header)
    }

    /// The leftmost node, or `header` when empty.
    pub fn begin_node(ctx: &N, header: N::NodePtr) -> N::NodePtr {
        Bst::begin_node(ctx, header)
    }

    /// The past-the-end position, i.e. `header`.
    pub fn end_node(ctx: &N, header: N::NodePtr) -> N::NodePtr {
        Bst::end_node(ctx, header)
    }

    /// In-order successor. The successor of the rightmost node is the header.
    pub fn next_node(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        Bst::next_node(ctx, node)
    }

    /// In-order predecessor. The predecessor of the header is the rightmost node.
    pub fn prev_node(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        Bst::prev_node(ctx, node)
    }

    /// Leftmost node of the subtree rooted at `node`.
    pub fn minimum(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        Bst::minimum(ctx, node)
    }

    /// Rightmost node of the subtree rooted at `node`.
    pub fn maximum(ctx: &N, node: N::NodePtr) -> N::NodePtr {
        Bst::maximum(ctx, node)
    }

    /// Number of nodes, counted by walking the tree.
    pub fn size(ctx: &N, header: N::NodePtr) -> usize {
        Bst::size(ctx, header)
    }

    /// Exchanges the contents of two trees by swapping their headers' links.
    pub fn swap_tree(ctx: &mut N, header1: N::NodePtr, header2: N::NodePtr) {
        Bst::swap_tree(ctx, header1, header2)
    }

    /// See [`BstreeAlgorithms::unlink_leftmost_without_rebalance`]. Colors and aggregates of
    /// what's left are not maintained; this is for tearing a tree down.
    pub fn unlink_leftmost_without_rebalance(ctx: &mut N, header: N::NodePtr) -> Option<N::NodePtr> {
        Bst::unlink_leftmost_without_rebalance(ctx, header)
    }

    /// First node not ordered before `key`, or `header`.
    pub fn lower_bound<K, C>(ctx: &N, header: N::NodePtr, key: &K, cmp: C) -> N::NodePtr
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Bst::lower_bound(ctx, header, key, cmp)
    }

    /// First node ordered after `key`, or `header`.
    pub fn upper_bound<K, C>(ctx: &N, header: N::NodePtr, key: &K, cmp: C) -> N::NodePtr
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Bst::upper_bound(ctx, header, key, cmp)
    }

    /// Some node equal to `key`.
    pub fn find<K, C>(ctx: &N, header: N::NodePtr, key: &K, cmp: C) -> Option<N::NodePtr>
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Bst::find(ctx, header, key, cmp)
    }

    /// `(lower_bound, upper_bound)` of `key`.
    pub fn equal_range<K, C>(ctx: &N, header: N::NodePtr, key: &K, cmp: C) -> (N::NodePtr, N::NodePtr)
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Bst::equal_range(ctx, header, key, cmp)
    }

    /// Nodes between `lower_key` and `upper_key`, each end open or closed.
    pub fn bounded_range<K, C>(
        ctx: &N,
        header: N::NodePtr,
        lower_key: &K,
        upper_key: &K,
        cmp: C,
        left_closed: bool,
        right_closed: bool,
    ) -> (N::NodePtr, N::NodePtr)
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Bst::bounded_range(ctx, header, lower_key, upper_key, cmp, left_closed, right_closed)
    }

    /// Number of nodes equal to `key`.
    pub fn count<K, C>(ctx: &N, header: N::NodePtr, key: &K, cmp: C) -> usize
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Bst::count(ctx, header, key, cmp)
    }

    /// First half of a unique insertion: finds where `key` would go, or the node already holding it.
    pub fn insert_unique_check<K, C>(ctx: &N, header: N::NodePtr, key: &K, cmp: C) -> UniqueCheck<N::NodePtr>
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Bst::insert_unique_check(ctx, header, key, cmp)
    }

    /// [`Self::insert_unique_check`], trying the position right before `hint` first.
    pub fn insert_unique_check_hint<K, C>(
        ctx: &N,
        header: N::NodePtr,
        hint: N::NodePtr,
        key: &K,
        cmp: C,
    ) -> UniqueCheck<N::NodePtr>
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Bst::insert_unique_check_hint(ctx, header, hint, key, cmp)
    }

    /// Second half of a unique insertion: links `new_node` where the check said and
    /// rebalances.
    pub fn insert_unique_commit(
        ctx: &mut N,
        header: N::NodePtr,
        new_node: N::NodePtr,
        commit: InsertCommitData<N::NodePtr>,
    ) {
        Bst::insert_unique_commit(ctx, header, new_node, commit);
        Self::rebalance_after_insertion(ctx, header, new_node);
    }

    pub fn insert_equal_upper_bound<C>(ctx: &mut N, header: N::NodePtr, new_node: N::NodePtr, cmp: C) -> N::NodePtr
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        Bst::insert_equal_upper_bound(ctx, header, new_node, cmp);
        Self::rebalance_after_insertion(ctx, header, new_node);
        new_node
    }

    pub fn insert_equal_lower_bound<C>(ctx: &mut N, header: N::NodePtr, new_node: N::NodePtr, cmp: C) -> N::NodePtr
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        Bst::insert_equal_lower_bound(ctx, header, new_node, cmp);
        Self::rebalance_after_insertion(ctx, header, new_node);
        new_node
    }

    pub fn insert_equal<C>(
        ctx: &mut N,
        header: N::NodePtr,
        hint: N::NodePtr,
        new_node: N::NodePtr,
        cmp: C,
    ) -> N::NodePtr
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        Bst::insert_equal(ctx, header, hint, new_node, cmp);
        Self::rebalance_after_insertion(ctx, header, new_node);
        new_node
    }

    pub fn insert_before(ctx: &mut N, header: N::NodePtr, pos: N::NodePtr, new_node: N::NodePtr) -> N::NodePtr {
        Bst::insert_before(ctx, header, pos, new_node);
        Self::rebalance_after_insertion(ctx, header, new_node);
        new_node
    }

    pub fn push_back(ctx: &mut N, header: N::NodePtr, new_node: N::NodePtr) {
        Bst::push_back(ctx, header, new_node);
        Self::rebalance_after_insertion(ctx, header, new_node);
    }

    pub fn push_front(ctx: &mut N, header: N::NodePtr, new_node: N::NodePtr) {
        Bst::push_front(ctx, header, new_node);
        Self::rebalance_after_insertion(ctx, header, new_node);
    }

    /// Unlinks `z` from the tree under `header` and rebalances. Returns `z`.
    pub fn erase(ctx: &mut N, header: N::NodePtr, z: N::NodePtr) -> N::NodePtr {
        // When z's successor takes its place, the successor also takes its color, and z
        // carries away the color of the position that actually disappeared.
        let info = Bst::erase(ctx, header, z, swap_colors::<N>);
        A::recompute_data_ancestors(ctx, info.x_parent);
        if ctx.color(z) != N::RED {
            Self::rebalance_after_erasure(ctx, header, info.x, info.x_parent);
        }
        #[cfg(feature = "verify-invariants")]
        Self::assert_valid(ctx, header);
        z
    }

    /// Erases `node` from whatever tree it is in. Does nothing for a node without parent.
    pub fn unlink(ctx: &mut N, node: N::NodePtr) {
        let Some(mut x) = ctx.parent(node) else { return };
        while !Self::is_header(ctx, x) {
            x = Bst::parent_of(ctx, x);
        }
        Self::erase(ctx, x, node);
    }

    /// Copies the tree under `source_header` into `target_header`, nodes produced by `cloner`
    /// inheriting the color (and, with a copying strategy, the cached data) of their source.
    pub fn try_clone<E, C, D>(
        ctx: &mut N,
        source_header: N::NodePtr,
        target_header: N::NodePtr,
        mut cloner: C,
        disposer: D,
    ) -> Result<(), E>
    where
        C: FnMut(&mut N, N::NodePtr) -> Result<N::NodePtr, E>,
        D: FnMut(&mut N, N::NodePtr),
    {
        Bst::try_clone(
            ctx,
            source_header,
            target_header,
            |ctx: &mut N, src: N::NodePtr| -> Result<N::NodePtr, E> {
                let copy = cloner(ctx, src)?;
                let color = ctx.color(src);
                ctx.set_color(copy, color);
                A::copy_data(ctx, copy, src);
                Ok(copy)
            },
            disposer,
        )
    }

    pub fn clone<C, D>(ctx: &mut N, source_header: N::NodePtr, target_header: N::NodePtr, mut cloner: C, disposer: D)
    where
        C: FnMut(&mut N, N::NodePtr) -> N::NodePtr,
        D: FnMut(&mut N, N::NodePtr),
    {
        let result = Self::try_clone(
            ctx,
            source_header,
            target_header,
            |ctx, node| Ok::<_, Infallible>(cloner(ctx, node)),
            disposer,
        );
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Hands every node to `disposer` and leaves `header` as an empty (still red) header.
    pub fn clear_and_dispose<D>(ctx: &mut N, header: N::NodePtr, disposer: D)
    where
        D: FnMut(&mut N, N::NodePtr),
    {
        Bst::clear_and_dispose(ctx, header, disposer)
    }

    /// Exchanges the positions (and colors) of two nodes, possibly of different trees.
    pub fn swap_nodes(ctx: &mut N, node1: N::NodePtr, node2: N::NodePtr) {
        if node1 == node2 {
            return;
        }
        let header1 = Bst::get_header(ctx, node1);
        let header2 = Bst::get_header(ctx, node2);
        Self::swap_nodes_with_headers(ctx, node1, header1, node2, header2);
        A::recompute_data_ancestors(ctx, node1);
        A::recompute_data_ancestors(ctx, node2);
    }

    /// [`Self::swap_nodes`] with known headers. Cached data is left alone.
    pub fn swap_nodes_with_headers(
        ctx: &mut N,
        node1: N::NodePtr,
        header1: N::NodePtr,
        node2: N::NodePtr,
        header2: N::NodePtr,
    ) {
        if node1 == node2 {
            return;
        }
        Bst::swap_nodes(ctx, node1, header1, node2, header2);
        swap_colors(ctx, node1, node2);
    }

    /// Puts the unlinked `new_node` in place of `node_to_be_replaced`, color included.
    pub fn replace_node(ctx: &mut N, node_to_be_replaced: N::NodePtr, new_node: N::NodePtr) {
        if node_to_be_replaced == new_node {
            return;
        }
        let header = Bst::get_header(ctx, node_to_be_replaced);
        Self::replace_node_with_header(ctx, node_to_be_replaced, header, new_node);
        A::recompute_data_ancestors(ctx, new_node);
    }

    /// [`Self::replace_node`] with a known header. Cached data is left alone.
    pub fn replace_node_with_header(
        ctx: &mut N,
        node_to_be_replaced: N::NodePtr,
        header: N::NodePtr,
        new_node: N::NodePtr,
    ) {
        if node_to_be_replaced == new_node {
            return;
        }
        Bst::replace_node(ctx, node_to_be_replaced, header, new_node);
        let color = ctx.color(node_to_be_replaced);
        ctx.set_color(new_node, color);
    }
}
