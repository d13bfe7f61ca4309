//! Shared fixtures for the unit tests.

use std::cell::Cell;
use std::cmp::Ordering;

use crate::arena::{Aggregate, Arena, Linked, NodeId, RbLinks};
use crate::bstree::BstreeAlgorithms;

thread_local! {
    static RECOMPUTES: Cell<usize> = const { Cell::new(0) };
}

/// How many times `Item::summarize` ran on this test's thread.
pub fn recompute_count() -> usize {
    RECOMPUTES.with(Cell::get)
}

pub fn init_logging() {
    use simplelog::*;
    // every test calls this, only the first one gets to install the logger
    let _ = TermLogger::init(LevelFilter::Warn, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}

/// A keyed record caching the size of its subtree.
#[derive(Debug, Clone)]
pub struct Item {
    pub links: RbLinks,
    pub key: i32,
    pub size: usize,
}

impl Item {
    pub fn new(key: i32) -> Self {
        Self { links: RbLinks::new(), key, size: 1 }
    }
}

impl Linked for Item {
    fn links(&self) -> &RbLinks {
        &self.links
    }
    fn links_mut(&mut self) -> &mut RbLinks {
        &mut self.links
    }
}

impl Aggregate for Item {
    type Data = usize;

    fn data(&self) -> &usize {
        &self.size
    }
    fn data_mut(&mut self) -> &mut usize {
        &mut self.size
    }
    fn summarize(&self, left: Option<&usize>, right: Option<&usize>) -> usize {
        RECOMPUTES.with(|c| c.set(c.get() + 1));
        1 + left.copied().unwrap_or(0) + right.copied().unwrap_or(0)
    }
}

pub fn by_key(ctx: &Arena<Item>, a: NodeId, b: NodeId) -> Ordering {
    ctx[a].key.cmp(&ctx[b].key)
}

pub fn node_vs_key(ctx: &Arena<Item>, node: NodeId, key: &i32) -> Ordering {
    ctx[node].key.cmp(key)
}

/// An arena with one (uninitialized) header slot.
pub struct Fixture {
    pub arena: Arena<Item>,
    pub header: NodeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let header = arena.insert(Item::new(i32::MIN));
        Self { arena, header }
    }

    pub fn alloc(&mut self, key: i32) -> NodeId {
        self.arena.insert(Item::new(key))
    }

    pub fn keys(&self) -> Vec<i32> {
        self.keys_of(self.header)
    }

    /// In-order keys of the tree under `header`.
    pub fn keys_of(&self, header: NodeId) -> Vec<i32> {
        type Bst = BstreeAlgorithms<Arena<Item>>;
        let mut keys = vec![];
        let mut node = Bst::begin_node(&self.arena, header);
        while node != header {
            keys.push(self.arena[node].key);
            node = Bst::next_node(&self.arena, node);
        }
        keys
    }

    /// Links, colors and cached sizes of every slot, for before/after comparisons.
    pub fn snapshot(&self) -> Vec<(RbLinks, usize)> {
        self.arena.iter().map(|(_, item)| (item.links, item.size)).collect()
    }
}
