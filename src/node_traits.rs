use std::fmt::Debug;

/// Access to the links and color of nodes that live in storage the tree doesn't own.
///
/// Every tree algorithm takes the context (`&Self` for reads, `&mut Self` for writes)
/// alongside the node handles, so an implementation can be an arena, a slab, or anything
/// else that can resolve a handle to its embedded links.
///
/// A missing link is `None`. The header's `parent` is the root, and its `left`/`right`
/// cache the leftmost and rightmost nodes (the header itself when the tree is empty).
pub trait NodeTraits {
    type NodePtr: Copy + Eq + Debug;
    type Color: Copy + Eq + Debug;

    const RED: Self::Color;
    const BLACK: Self::Color;

    fn parent(&self, node: Self::NodePtr) -> Option<Self::NodePtr>;
    fn set_parent(&mut self, node: Self::NodePtr, parent: Option<Self::NodePtr>);

    fn left(&self, node: Self::NodePtr) -> Option<Self::NodePtr>;
    fn set_left(&mut self, node: Self::NodePtr, left: Option<Self::NodePtr>);

    fn right(&self, node: Self::NodePtr) -> Option<Self::NodePtr>;
    fn set_right(&mut self, node: Self::NodePtr, right: Option<Self::NodePtr>);

    fn color(&self, node: Self::NodePtr) -> Self::Color;
    fn set_color(&mut self, node: Self::NodePtr, color: Self::Color);
}

/// Nodes that cache an aggregate of their subtree.
///
/// `recompute_data` rebuilds `node`'s aggregate from its direct children, which are
/// assumed to be up to date already.
pub trait RecomputeData: NodeTraits {
    fn recompute_data(&mut self, node: Self::NodePtr);
}

/// Nodes whose cached aggregate has to follow them into a clone.
pub trait CopyData: NodeTraits {
    fn copy_data(&mut self, dest: Self::NodePtr, src: Self::NodePtr);
}
