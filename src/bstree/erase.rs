use std::convert::Infallible;

use log::debug;

use super::BstreeAlgorithms;
use crate::node_traits::NodeTraits;

/// What a balancing layer needs to know after [`BstreeAlgorithms::erase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataForRebalance<P> {
    /// The node that moved into the vacated position, if any.
    pub x: Option<P>,
    /// `x`'s parent after the erase (possibly the header). Every changed subtree hangs
    /// below it.
    pub x_parent: P,
    /// The node that was physically taken out of its position: `z` itself, or `z`'s
    /// successor when `z` had two children.
    pub y: P,
}

impl<N: NodeTraits> BstreeAlgorithms<N> {
    /// Unlinks `z`.
    ///
    /// When `z` has two children its successor is relinked into `z`'s position, and
    /// `successor_fixup(ctx, z, successor)` runs once the successor is in place so that a
    /// balancing layer can swap per-node state between the two.
    pub fn erase<F>(
        ctx: &mut N,
        header: N::NodePtr,
        z: N::NodePtr,
        mut successor_fixup: F,
    ) -> DataForRebalance<N::NodePtr>
    where
        F: FnMut(&mut N, N::NodePtr, N::NodePtr),
    {
        let z_left = ctx.left(z);
        let z_right = ctx.right(z);

        let (Some(z_left), Some(z_right)) = (z_left, z_right) else {
            // at most one child: splice it into z's place
            let x = z_left.or(z_right);
            let x_parent = Self::parent_of(ctx, z);
            if let Some(x) = x {
                ctx.set_parent(x, Some(x_parent));
            }
            Self::replace_child_link(ctx, z, x_parent, x, header);

            if ctx.left(header) == Some(z) {
                let leftmost = match x {
                    // z's left is empty too here, so x hangs on the right
                    Some(x) if z_right.is_some() => Self::minimum(ctx, x),
                    _ => x_parent,
                };
                ctx.set_left(header, Some(leftmost));
            }
            if ctx.right(header) == Some(z) {
                let rightmost = match x {
                    Some(x) if z_left.is_some() => Self::maximum(ctx, x),
                    _ => x_parent,
                };
                ctx.set_right(header, Some(rightmost));
            }
            return DataForRebalance { x, x_parent, y: z };
        };

        let y = Self::minimum(ctx, z_right);
        let x = ctx.right(y);

        ctx.set_parent(z_left, Some(y));
        ctx.set_left(y, Some(z_left));
        let x_parent = if y != z_right {
            let x_parent = Self::parent_of(ctx, y);
            if let Some(x) = x {
                ctx.set_parent(x, Some(x_parent));
            }
            // y was the leftmost node of z's right subtree
            ctx.set_left(x_parent, x);
            ctx.set_right(y, Some(z_right));
            ctx.set_parent(z_right, Some(y));
            x_parent
        } else {
            y
        };

        let z_parent = Self::parent_of(ctx, z);
        Self::replace_child_link(ctx, z, z_parent, Some(y), header);
        ctx.set_parent(y, Some(z_parent));
        successor_fixup(ctx, z, y);

        DataForRebalance { x, x_parent, y }
    }

    /// Makes the tree under `target_header` a copy of the one under `source_header`.
    ///
    /// Nodes already in the target are disposed first. The copy is built without recursion
    /// and keeps the exact shape of the source. `cloner(ctx, source_node)` returns a fresh,
    /// unlinked node; if it fails, every node cloned so far is handed to `disposer`, the
    /// target is left empty, and the error is returned.
    pub fn try_clone<E, C, D>(
        ctx: &mut N,
        source_header: N::NodePtr,
        target_header: N::NodePtr,
        mut cloner: C,
        mut disposer: D,
    ) -> Result<(), E>
    where
        C: FnMut(&mut N, N::NodePtr) -> Result<N::NodePtr, E>,
        D: FnMut(&mut N, N::NodePtr),
    {
        if !Self::unique(ctx, target_header) {
            Self::clear_and_dispose(ctx, target_header, &mut disposer);
        }
        let Some(source_root) = ctx.parent(source_header) else {
            Self::init_header(ctx, target_header);
            return Ok(());
        };

        let root_copy = cloner(ctx, source_root)?;
        Self::init(ctx, root_copy);
        ctx.set_parent(root_copy, Some(target_header));

        let mut leftmost = root_copy;
        let mut rightmost = root_copy;
        let mut current = source_root;
        let mut insertion_point = root_copy;
        let mut cloned = 1usize;

        loop {
            let go_left = match (ctx.left(current), ctx.left(insertion_point)) {
                (Some(l), None) => Some(l),
                _ => None,
            };
            let go_right = match (ctx.right(current), ctx.right(insertion_point)) {
                (Some(r), None) => Some(r),
                _ => None,
            };

            if let Some(next) = go_left.or(go_right) {
                current = next;
                let copy = match cloner(ctx, current) {
                    Ok(copy) => copy,
                    Err(e) => {
                        debug!("clone failed after {cloned} nodes, disposing the partial copy");
                        Self::dispose_subtree(ctx, root_copy, &mut disposer);
                        Self::init_header(ctx, target_header);
                        return Err(e);
                    }
                };
                cloned += 1;
                Self::init(ctx, copy);
                ctx.set_parent(copy, Some(insertion_point));
                if go_left.is_some() {
                    ctx.set_left(insertion_point, Some(copy));
                    // bounds only move along the outer spines
                    if insertion_point == leftmost {
                        leftmost = copy;
                    }
                } else {
                    ctx.set_right(insertion_point, Some(copy));
                    if insertion_point == rightmost {
                        rightmost = copy;
                    }
                }
                insertion_point = copy;
            } else if current == source_root {
                break;
            } else {
                current = Self::parent_of(ctx, current);
                insertion_point = Self::parent_of(ctx, insertion_point);
            }
        }

        ctx.set_parent(target_header, Some(root_copy));
        ctx.set_left(target_header, Some(leftmost));
        ctx.set_right(target_header, Some(rightmost));
        debug!("cloned {cloned} nodes");
        Ok(())
    }

    /// Infallible [`Self::try_clone`].
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

    /// Hands every node of the tree to `disposer` (already unlinked) and leaves the header
    /// empty.
    pub fn clear_and_dispose<D>(ctx: &mut N, header: N::NodePtr, disposer: D)
    where
        D: FnMut(&mut N, N::NodePtr),
    {
        let Some(root) = ctx.parent(header) else { return };
        let disposed = Self::dispose_subtree(ctx, root, disposer);
        Self::init_header(ctx, header);
        debug!("disposed {disposed} nodes");
    }

    /// Disposes `root` and everything below it in O(1) extra space, by rotating left
    /// children up until the current node has none. Returns the number of disposed nodes.
    pub fn dispose_subtree<D>(ctx: &mut N, root: N::NodePtr, mut disposer: D) -> usize
    where
        D: FnMut(&mut N, N::NodePtr),
    {
        let mut disposed = 0;
        let mut x = Some(root);
        while let Some(n) = x {
            x = match ctx.left(n) {
                Some(l) => {
                    let l_right = ctx.right(l);
                    ctx.set_left(n, l_right);
                    ctx.set_right(l, Some(n));
                    Some(l)
                }
                None => {
                    let r = ctx.right(n);
                    Self::init(ctx, n);
                    disposer(ctx, n);
                    disposed += 1;
                    r
                }
            };
        }
        disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{Arena, NodeId};
    use crate::test_support::{Fixture, Item, by_key};

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

    #[test]
    fn erase_leaf_updates_bounds() {
        let (mut t, nodes) = bst_with(&[2, 1, 3]);
        let info = Bst::erase(&mut t.arena, t.header, nodes[1], |_, _, _| panic!("no successor"));
        assert_eq!(info, DataForRebalance { x: None, x_parent: nodes[0], y: nodes[1] });
        assert_eq!(Bst::begin_node(&t.arena, t.header), nodes[0]);
        assert_eq!(t.keys(), vec![2, 3]);
    }

    #[test]
    fn erase_with_two_children_relinks_successor() {
        let (mut t, nodes) = bst_with(&[5, 3, 8, 7, 9, 6]);
        let mut fixups = vec![];
        let info = Bst::erase(&mut t.arena, t.header, nodes[0], |_, z, y| fixups.push((z, y)));

        // successor of 5 is 6, which had no right child
        assert_eq!(fixups, vec![(nodes[0], nodes[5])]);
        assert_eq!(info.y, nodes[5]);
        assert_eq!(info.x, None);
        assert_eq!(info.x_parent, nodes[3]);
        assert_eq!(Bst::root_node(&t.arena, t.header), Some(nodes[5]));
        assert_eq!(t.keys(), vec![3, 6, 7, 8, 9]);
    }

    #[test]
    fn erase_last_node_empties_header() {
        let (mut t, nodes) = bst_with(&[1]);
        let info = Bst::erase(&mut t.arena, t.header, nodes[0], |_, _, _| {});
        assert_eq!(info.x_parent, t.header);
        assert!(Bst::unique(&t.arena, t.header));
        assert_eq!(Bst::begin_node(&t.arena, t.header), t.header);
        assert_eq!(t.arena.right(t.header), Some(t.header));
    }

    #[test]
    fn clone_copies_shape() {
        let (mut t, _) = bst_with(&[4, 2, 6, 1, 3, 5, 7]);
        let target = t.alloc(0);
        Bst::init_header(&mut t.arena, target);

        Bst::clone(
            &mut t.arena,
            t.header,
            target,
            |arena, src| {
                let key = arena[src].key;
                arena.insert(Item::new(key))
            },
            |_, _| {},
        );

        assert_eq!(t.keys_of(target), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(t.arena[Bst::begin_node(&t.arena, target)].key, 1);
        assert_eq!(t.arena[t.arena.right(target).unwrap()].key, 7);
        let root = Bst::root_node(&t.arena, target).unwrap();
        assert_eq!(t.arena[root].key, 4);
        assert_eq!(Bst::get_header(&t.arena, root), target);
    }

    #[test]
    fn clone_of_lopsided_tree_caches_true_bounds() {
        // 4 has only a left child, whose right child 3 is not the maximum;
        // 6 has only a right child, whose left child 5 is not the minimum
        for keys in [&[4, 2, 3][..], &[6, 8, 7][..]] {
            let (mut t, _) = bst_with(keys);
            let target = t.alloc(0);
            Bst::init_header(&mut t.arena, target);

            Bst::clone(
                &mut t.arena,
                t.header,
                target,
                |arena, src| {
                    let key = arena[src].key;
                    arena.insert(Item::new(key))
                },
                |_, _| {},
            );

            let key_at = |n: Option<NodeId>| t.arena[n.unwrap()].key;
            assert_eq!(key_at(t.arena.left(target)), key_at(t.arena.left(t.header)));
            assert_eq!(key_at(t.arena.right(target)), key_at(t.arena.right(t.header)));
            let last = Bst::prev_node(&t.arena, target);
            assert_eq!(t.arena[last].key, *keys.iter().max().unwrap());

            // appending relies on the cached rightmost
            let n = t.alloc(100);
            Bst::push_back(&mut t.arena, target, n);
            let mut expected = keys.to_vec();
            expected.sort();
            expected.push(100);
            assert_eq!(t.keys_of(target), expected);
        }
    }

    #[test]
    fn failed_clone_disposes_partial_copy() {
        let (mut t, _) = bst_with(&[4, 2, 6, 1, 3, 5, 7]);
        let target = t.alloc(0);
        Bst::init_header(&mut t.arena, target);

        let mut budget = 3;
        let mut disposed = vec![];
        let result = Bst::try_clone(
            &mut t.arena,
            t.header,
            target,
            |arena, src| {
                if budget == 0 {
                    return Err("out of nodes");
                }
                budget -= 1;
                let key = arena[src].key;
                Ok(arena.insert(Item::new(key)))
            },
            |_, n| disposed.push(n),
        );

        assert_eq!(result, Err("out of nodes"));
        assert_eq!(disposed.len(), 3);
        assert!(Bst::unique(&t.arena, target));
        assert_eq!(t.keys(), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn dispose_visits_every_node_once() {
        let (mut t, mut nodes) = bst_with(&[4, 2, 6, 1, 3, 5, 7]);
        let mut disposed = vec![];
        Bst::clear_and_dispose(&mut t.arena, t.header, |arena: &mut Arena<Item>, n| {
            assert!(Bst::unique(arena, n));
            disposed.push(n);
        });
        disposed.sort();
        nodes.sort();
        assert_eq!(disposed, nodes);
        assert_eq!(Bst::size(&t.arena, t.header), 0);
    }
}
