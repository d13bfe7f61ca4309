use std::cmp::Ordering;

use super::BstreeAlgorithms;
use crate::node_traits::NodeTraits;

/// Where a checked insertion will link the new node: as the left or right child of `node`
/// (or as the root, when `node` is the header).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertCommitData<P> {
    pub link_left: bool,
    pub node: P,
}

/// Outcome of the first phase of a unique insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueCheck<P> {
    /// No equivalent key; pass the data to `insert_unique_commit`.
    Vacant(InsertCommitData<P>),
    /// A node with an equivalent key is already linked.
    Occupied(P),
}

// Comparators passed to the insertion functions order two nodes (`cmp(ctx, a, b)` is `a`
// relative to `b`); comparators passed to the unique checks order a node against a key.
impl<N: NodeTraits> BstreeAlgorithms<N> {
    /// Position after every node equivalent to `new_node`.
    pub fn insert_equal_upper_bound_check<C>(
        ctx: &N,
        header: N::NodePtr,
        new_node: N::NodePtr,
        mut cmp: C,
    ) -> InsertCommitData<N::NodePtr>
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        let mut y = header;
        let mut x = ctx.parent(header);
        while let Some(n) = x {
            y = n;
            x = if cmp(ctx, new_node, n) == Ordering::Less { ctx.left(n) } else { ctx.right(n) };
        }
        InsertCommitData {
            link_left: y == header || cmp(ctx, new_node, y) == Ordering::Less,
            node: y,
        }
    }

    /// Position before every node equivalent to `new_node`.
    pub fn insert_equal_lower_bound_check<C>(
        ctx: &N,
        header: N::NodePtr,
        new_node: N::NodePtr,
        mut cmp: C,
    ) -> InsertCommitData<N::NodePtr>
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        let mut y = header;
        let mut x = ctx.parent(header);
        while let Some(n) = x {
            y = n;
            x = if cmp(ctx, n, new_node) != Ordering::Less { ctx.left(n) } else { ctx.right(n) };
        }
        InsertCommitData {
            link_left: y == header || cmp(ctx, y, new_node) != Ordering::Less,
            node: y,
        }
    }

    /// Uses `hint` if `new_node` can go right before it, otherwise falls back to a full
    /// upper- or lower-bound search.
    pub fn insert_equal_check<C>(
        ctx: &N,
        header: N::NodePtr,
        hint: N::NodePtr,
        new_node: N::NodePtr,
        mut cmp: C,
    ) -> InsertCommitData<N::NodePtr>
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        if hint == header || cmp(ctx, hint, new_node) != Ordering::Less {
            let at_begin = hint == Self::begin_node(ctx, header);
            let prev = if at_begin { hint } else { Self::prev_node(ctx, hint) };
            if at_begin || cmp(ctx, new_node, prev) != Ordering::Less {
                let link_left = Self::unique(ctx, header) || ctx.left(hint).is_none();
                return InsertCommitData { link_left, node: if link_left { hint } else { prev } };
            }
            Self::insert_equal_upper_bound_check(ctx, header, new_node, cmp)
        } else {
            Self::insert_equal_lower_bound_check(ctx, header, new_node, cmp)
        }
    }

    /// Position immediately before `pos` (which may be the header, meaning "at the end").
    pub fn insert_before_check(ctx: &N, header: N::NodePtr, pos: N::NodePtr) -> InsertCommitData<N::NodePtr> {
        let prev = if pos != Self::begin_node(ctx, header) { Self::prev_node(ctx, pos) } else { pos };
        let link_left = Self::unique(ctx, header) || ctx.left(pos).is_none();
        InsertCommitData { link_left, node: if link_left { pos } else { prev } }
    }

    pub fn push_back_check(ctx: &N, header: N::NodePtr) -> InsertCommitData<N::NodePtr> {
        let rightmost = ctx.right(header).unwrap_or(header);
        InsertCommitData { link_left: false, node: rightmost }
    }

    pub fn push_front_check(ctx: &N, header: N::NodePtr) -> InsertCommitData<N::NodePtr> {
        InsertCommitData { link_left: true, node: Self::begin_node(ctx, header) }
    }

    /// Looks for `key`; if it isn't there, returns where a node with that key would go.
    pub fn insert_unique_check<K, C>(
        ctx: &N,
        header: N::NodePtr,
        key: &K,
        mut cmp: C,
    ) -> UniqueCheck<N::NodePtr>
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        let mut y = header;
        let mut x = ctx.parent(header);
        let mut prev = None;
        let mut left_child = true;
        while let Some(n) = x {
            y = n;
            left_child = cmp(ctx, n, key) == Ordering::Greater;
            x = if left_child {
                ctx.left(n)
            } else {
                prev = Some(n);
                ctx.right(n)
            };
        }
        match prev {
            // `prev` is the greatest node not greater than `key`
            Some(p) if cmp(ctx, p, key) != Ordering::Less => UniqueCheck::Occupied(p),
            _ => UniqueCheck::Vacant(InsertCommitData { link_left: left_child, node: y }),
        }
    }

    /// Like [`Self::insert_unique_check`], but tries to place the key right before `hint`
    /// first.
    pub fn insert_unique_check_hint<K, C>(
        ctx: &N,
        header: N::NodePtr,
        hint: N::NodePtr,
        key: &K,
        mut cmp: C,
    ) -> UniqueCheck<N::NodePtr>
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        if hint == header || cmp(ctx, hint, key) == Ordering::Greater {
            let at_begin = hint == Self::begin_node(ctx, header);
            let prev = if at_begin { hint } else { Self::prev_node(ctx, hint) };
            if at_begin || cmp(ctx, prev, key) == Ordering::Less {
                let link_left = Self::unique(ctx, header) || ctx.left(hint).is_none();
                return UniqueCheck::Vacant(InsertCommitData {
                    link_left,
                    node: if link_left { hint } else { prev },
                });
            }
        }
        Self::insert_unique_check(ctx, header, key, cmp)
    }

    /// Links `new_node` at a position computed by one of the `*_check` functions. The tree
    /// must not have been modified in between.
    pub fn insert_commit(
        ctx: &mut N,
        header: N::NodePtr,
        new_node: N::NodePtr,
        commit: InsertCommitData<N::NodePtr>,
    ) {
        let parent = commit.node;
        if parent == header {
            ctx.set_parent(header, Some(new_node));
            ctx.set_left(header, Some(new_node));
            ctx.set_right(header, Some(new_node));
        } else if commit.link_left {
            ctx.set_left(parent, Some(new_node));
            if ctx.left(header) == Some(parent) {
                ctx.set_left(header, Some(new_node));
            }
        } else {
            ctx.set_right(parent, Some(new_node));
            if ctx.right(header) == Some(parent) {
                ctx.set_right(header, Some(new_node));
            }
        }
        ctx.set_parent(new_node, Some(parent));
        ctx.set_left(new_node, None);
        ctx.set_right(new_node, None);
    }

    pub fn insert_unique_commit(
        ctx: &mut N,
        header: N::NodePtr,
        new_node: N::NodePtr,
        commit: InsertCommitData<N::NodePtr>,
    ) {
        Self::insert_commit(ctx, header, new_node, commit)
    }

    pub fn insert_equal_upper_bound<C>(ctx: &mut N, header: N::NodePtr, new_node: N::NodePtr, cmp: C) -> N::NodePtr
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        let commit = Self::insert_equal_upper_bound_check(ctx, header, new_node, cmp);
        Self::insert_commit(ctx, header, new_node, commit);
        new_node
    }

    pub fn insert_equal_lower_bound<C>(ctx: &mut N, header: N::NodePtr, new_node: N::NodePtr, cmp: C) -> N::NodePtr
    where
        C: FnMut(&N, N::NodePtr, N::NodePtr) -> Ordering,
    {
        let commit = Self::insert_equal_lower_bound_check(ctx, header, new_node, cmp);
        Self::insert_commit(ctx, header, new_node, commit);
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
        let commit = Self::insert_equal_check(ctx, header, hint, new_node, cmp);
        Self::insert_commit(ctx, header, new_node, commit);
        new_node
    }

    /// Links `new_node` right before `pos` without looking at keys. The caller keeps the
    /// order intact.
    pub fn insert_before(ctx: &mut N, header: N::NodePtr, pos: N::NodePtr, new_node: N::NodePtr) -> N::NodePtr {
        let commit = Self::insert_before_check(ctx, header, pos);
        Self::insert_commit(ctx, header, new_node, commit);
        new_node
    }

    pub fn push_back(ctx: &mut N, header: N::NodePtr, new_node: N::NodePtr) {
        let commit = Self::push_back_check(ctx, header);
        Self::insert_commit(ctx, header, new_node, commit);
    }

    pub fn push_front(ctx: &mut N, header: N::NodePtr, new_node: N::NodePtr) {
        let commit = Self::push_front_check(ctx, header);
        Self::insert_commit(ctx, header, new_node, commit);
    }
}
