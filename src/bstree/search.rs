use std::cmp::Ordering;

use super::BstreeAlgorithms;
use crate::node_traits::NodeTraits;

// `cmp(ctx, node, key)` orders `node` relative to `key`. Positions are returned with the
// header standing for "past the end".
impl<N: NodeTraits> BstreeAlgorithms<N> {
    fn lower_bound_loop<K, C>(ctx: &N, mut x: Option<N::NodePtr>, mut y: N::NodePtr, key: &K, cmp: &mut C) -> N::NodePtr
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        while let Some(n) = x {
            if cmp(ctx, n, key) != Ordering::Less {
                y = n;
                x = ctx.left(n);
            } else {
                x = ctx.right(n);
            }
        }
        y
    }

    fn upper_bound_loop<K, C>(ctx: &N, mut x: Option<N::NodePtr>, mut y: N::NodePtr, key: &K, cmp: &mut C) -> N::NodePtr
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        while let Some(n) = x {
            if cmp(ctx, n, key) == Ordering::Greater {
                y = n;
                x = ctx.left(n);
            } else {
                x = ctx.right(n);
            }
        }
        y
    }

    /// First node not less than `key`.
    pub fn lower_bound<K, C>(ctx: &N, header: N::NodePtr, key: &K, mut cmp: C) -> N::NodePtr
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Self::lower_bound_loop(ctx, ctx.parent(header), header, key, &mut cmp)
    }

    /// First node greater than `key`.
    pub fn upper_bound<K, C>(ctx: &N, header: N::NodePtr, key: &K, mut cmp: C) -> N::NodePtr
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Self::upper_bound_loop(ctx, ctx.parent(header), header, key, &mut cmp)
    }

    /// First node equivalent to `key`.
    pub fn find<K, C>(ctx: &N, header: N::NodePtr, key: &K, mut cmp: C) -> Option<N::NodePtr>
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        let y = Self::lower_bound_loop(ctx, ctx.parent(header), header, key, &mut cmp);
        if y == header || cmp(ctx, y, key) == Ordering::Greater {
            None
        } else {
            Some(y)
        }
    }

    /// `(lower_bound, upper_bound)` of `key`.
    pub fn equal_range<K, C>(ctx: &N, header: N::NodePtr, key: &K, cmp: C) -> (N::NodePtr, N::NodePtr)
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        Self::bounded_range(ctx, header, key, key, cmp, true, true)
    }

    /// The half-open position range of nodes between `lower_key` and `upper_key`, each end
    /// inclusive or exclusive. Shares the descent until the two bounds split.
    pub fn bounded_range<K, C>(
        ctx: &N,
        header: N::NodePtr,
        lower_key: &K,
        upper_key: &K,
        mut cmp: C,
        left_closed: bool,
        right_closed: bool,
    ) -> (N::NodePtr, N::NodePtr)
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        let mut y = header;
        let mut x = ctx.parent(header);

        while let Some(n) = x {
            if cmp(ctx, n, lower_key) == Ordering::Less {
                x = ctx.right(n);
            } else if cmp(ctx, n, upper_key) == Ordering::Greater {
                y = n;
                x = ctx.left(n);
            } else {
                // lower_key <= n <= upper_key
                let lower = if left_closed {
                    Self::lower_bound_loop(ctx, ctx.left(n), n, lower_key, &mut cmp)
                } else {
                    Self::upper_bound_loop(ctx, Some(n), y, lower_key, &mut cmp)
                };
                let upper = if right_closed {
                    Self::upper_bound_loop(ctx, ctx.right(n), y, upper_key, &mut cmp)
                } else {
                    Self::lower_bound_loop(ctx, Some(n), y, upper_key, &mut cmp)
                };
                return (lower, upper);
            }
        }
        (y, y)
    }

    pub fn count<K, C>(ctx: &N, header: N::NodePtr, key: &K, cmp: C) -> usize
    where
        K: ?Sized,
        C: FnMut(&N, N::NodePtr, &K) -> Ordering,
    {
        let (mut node, end) = Self::equal_range(ctx, header, key, cmp);
        let mut n = 0;
        while node != end {
            n += 1;
            node = Self::next_node(ctx, node);
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Arena, NodeId};
    use crate::bstree::UniqueCheck;
    use crate::test_support::{Fixture, Item, by_key, node_vs_key};

    type Bst = BstreeAlgorithms<Arena<Item>>;

    fn bst_with(keys: &[i32]) -> (Fixture, Vec<NodeId>) {
        let mut t = Fixture::new();
        Bst::init_header(&mut t.arena, t.header);
        let nodes = keys
            .iter()
            .map(|&k| {
                let n = t.alloc(k);
                Bst::insert_equal_upper_bound(&mut t.arena, t.header, n, by_key);
                n
            })
            .collect();
        (t, nodes)
    }

    fn key_at(t: &Fixture, n: NodeId) -> Option<i32> {
        (n != t.header).then(|| t.arena[n].key)
    }

    #[test]
    fn bounds() {
        let (t, _) = bst_with(&[10, 20, 20, 30]);
        let a = &t.arena;
        assert_eq!(key_at(&t, Bst::lower_bound(a, t.header, &20, node_vs_key)), Some(20));
        assert_eq!(key_at(&t, Bst::upper_bound(a, t.header, &20, node_vs_key)), Some(30));
        assert_eq!(key_at(&t, Bst::lower_bound(a, t.header, &31, node_vs_key)), None);
        assert_eq!(key_at(&t, Bst::upper_bound(a, t.header, &5, node_vs_key)), Some(10));
        assert_eq!(Bst::count(a, t.header, &20, node_vs_key), 2);
        assert_eq!(Bst::count(a, t.header, &25, node_vs_key), 0);
    }

    #[test]
    fn find_present_and_missing() {
        let (t, nodes) = bst_with(&[10, 20, 30]);
        assert_eq!(Bst::find(&t.arena, t.header, &20, node_vs_key), Some(nodes[1]));
        assert_eq!(Bst::find(&t.arena, t.header, &25, node_vs_key), None);
        assert_eq!(Bst::find(&t.arena, t.header, &40, node_vs_key), None);
    }

    #[test]
    fn bounded_ranges() {
        let (t, _) = bst_with(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let a = &t.arena;
        let keys = |(mut b, e): (NodeId, NodeId)| {
            let mut out = vec![];
            while b != e {
                out.push(a[b].key);
                b = Bst::next_node(a, b);
            }
            out
        };
        assert_eq!(keys(Bst::bounded_range(a, t.header, &3, &6, node_vs_key, true, true)), vec![3, 4, 5, 6]);
        assert_eq!(keys(Bst::bounded_range(a, t.header, &3, &6, node_vs_key, false, true)), vec![4, 5, 6]);
        assert_eq!(keys(Bst::bounded_range(a, t.header, &3, &6, node_vs_key, true, false)), vec![3, 4, 5]);
        assert_eq!(keys(Bst::bounded_range(a, t.header, &3, &6, node_vs_key, false, false)), vec![4, 5]);
        assert_eq!(keys(Bst::bounded_range(a, t.header, &9, &12, node_vs_key, true, true)), Vec::<i32>::new());
        assert_eq!(keys(Bst::equal_range(a, t.header, &8, node_vs_key)), vec![8]);
    }

    #[test]
    fn unique_check_then_commit() {
        let (mut t, nodes) = bst_with(&[10, 30]);
        assert_eq!(
            Bst::insert_unique_check(&t.arena, t.header, &30, node_vs_key),
            UniqueCheck::Occupied(nodes[1])
        );

        let UniqueCheck::Vacant(commit) = Bst::insert_unique_check(&t.arena, t.header, &20, node_vs_key) else {
            panic!("20 is not in the tree");
        };
        let n = t.alloc(20);
        Bst::insert_unique_commit(&mut t.arena, t.header, n, commit);
        assert_eq!(t.keys(), vec![10, 20, 30]);

        // hint right after the spot
        let hinted = Bst::insert_unique_check_hint(&t.arena, t.header, nodes[1], &25, node_vs_key);
        assert!(matches!(hinted, UniqueCheck::Vacant(_)));
        let hinted = Bst::insert_unique_check_hint(&t.arena, t.header, nodes[1], &10, node_vs_key);
        assert_eq!(hinted, UniqueCheck::Occupied(nodes[0]));
    }
}
