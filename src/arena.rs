//! Index-addressed node storage.
//!
//! Records embed an [`RbLinks`] and are stored in an [`Arena`], which resolves [`NodeId`]s
//! to those links for the tree algorithms. The header of a tree is just another slot.
//! Handing the algorithms an id that was never returned by [`Arena::insert`] panics
//! instead of touching memory it shouldn't.

use std::ops::{Index, IndexMut};

use crate::node_traits::{CopyData, NodeTraits, RecomputeData};

/// Index into an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// The tree linkage a record carries around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RbLinks {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub color: Color,
}

impl RbLinks {
    pub const fn new() -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            color: Color::Black,
        }
    }
}

impl Default for RbLinks {
    fn default() -> Self {
        Self::new()
    }
}

/// A record with embedded [`RbLinks`].
pub trait Linked {
    fn links(&self) -> &RbLinks;
    fn links_mut(&mut self) -> &mut RbLinks;
}

/// A record that caches an aggregate of its subtree.
///
/// `summarize` computes what this record's cached value should be, given the (already
/// correct) cached values of its children.
pub trait Aggregate: Linked {
    type Data: Clone;

    fn data(&self) -> &Self::Data;
    fn data_mut(&mut self) -> &mut Self::Data;
    fn summarize(&self, left: Option<&Self::Data>, right: Option<&Self::Data>) -> Self::Data;
}

/// Append-only storage of linked records.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<T>,
}

impl<T> Arena<T> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity) }
    }

    /// Stores `value` and returns its id. Ids are never reused.
    pub fn insert(&mut self, value: T) -> NodeId {
        let id = u32::try_from(self.slots.len()).expect("arena holds at most u32::MAX nodes");
        self.slots.push(value);
        NodeId(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.slots.iter().enumerate().map(|(i, v)| (NodeId(i as u32), v))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;
    fn index(&self, id: NodeId) -> &T {
        &self.slots[id.index()]
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.slots[id.index()]
    }
}

impl<T: Linked> NodeTraits for Arena<T> {
    type NodePtr = NodeId;
    type Color = Color;

    const RED: Color = Color::Red;
    const BLACK: Color = Color::Black;

    #[inline]
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self[node].links().parent
    }

    #[inline]
    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) {
        self[node].links_mut().parent = parent;
    }

    #[inline]
    fn left(&self, node: NodeId) -> Option<NodeId> {
        self[node].links().left
    }

    #[inline]
    fn set_left(&mut self, node: NodeId, left: Option<NodeId>) {
        self[node].links_mut().left = left;
    }

    #[inline]
    fn right(&self, node: NodeId) -> Option<NodeId> {
        self[node].links().right
    }

    #[inline]
    fn set_right(&mut self, node: NodeId, right: Option<NodeId>) {
        self[node].links_mut().right = right;
    }

    #[inline]
    fn color(&self, node: NodeId) -> Color {
        self[node].links().color
    }

    #[inline]
    fn set_color(&mut self, node: NodeId, color: Color) {
        self[node].links_mut().color = color;
    }
}

impl<T: Aggregate> RecomputeData for Arena<T> {
    fn recompute_data(&mut self, node: NodeId) {
        let record = &self[node];
        let links = record.links();
        let left = links.left.map(|l| self[l].data());
        let right = links.right.map(|r| self[r].data());
        let data = record.summarize(left, right);
        *self[node].data_mut() = data;
    }
}

impl<T: Aggregate> CopyData for Arena<T> {
    fn copy_data(&mut self, dest: NodeId, src: NodeId) {
        let data = self[src].data().clone();
        *self[dest].data_mut() = data;
    }
}
