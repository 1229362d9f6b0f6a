//! Ternary nodes and the arena that owns them.
//!
//! Nodes never hold references to each other. Every link is a 32-bit [`Ptr`]
//! into the arena's backing `Vec`, so dropping a trie is a flat `Vec` drop no
//! matter how deep the tree has grown.

use std::cmp::Ordering;

/// Handle into a [`NodeArena`].
///
/// - `0..=u32::MAX - 1`: index of a live node
/// - Special: `u32::MAX` = NULL (empty child slot)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Ptr(u32);

impl Ptr {
    pub(crate) const NULL: Ptr = Ptr(u32::MAX);

    /// Largest number of nodes an arena can address.
    pub(crate) const MAX_NODES: usize = u32::MAX as usize;

    #[inline]
    pub(crate) fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    #[inline]
    fn idx(self) -> usize {
        debug_assert!(!self.is_null());
        self.0 as usize
    }
}

/// Which of a node's three links to follow.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Link {
    Left,
    Mid,
    Right,
}

impl Link {
    /// Link to follow for a key byte `c` at a node holding `node_c`.
    #[inline]
    pub(crate) fn for_cmp(c: u8, node_c: u8) -> Link {
        match c.cmp(&node_c) {
            Ordering::Less => Link::Left,
            Ordering::Greater => Link::Right,
            Ordering::Equal => Link::Mid,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    pub(crate) c: u8,
    pub(crate) left: Ptr,
    pub(crate) mid: Ptr,
    pub(crate) right: Ptr,
    /// Set only on the node where some key's final character (in its
    /// traversal order) landed.
    pub(crate) value: Option<V>,
}

impl<V> Node<V> {
    fn new(c: u8) -> Self {
        Self {
            c,
            left: Ptr::NULL,
            mid: Ptr::NULL,
            right: Ptr::NULL,
            value: None,
        }
    }

    #[inline]
    pub(crate) fn child(&self, link: Link) -> Ptr {
        match link {
            Link::Left => self.left,
            Link::Mid => self.mid,
            Link::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, link: Link) -> &mut Ptr {
        match link {
            Link::Left => &mut self.left,
            Link::Mid => &mut self.mid,
            Link::Right => &mut self.right,
        }
    }
}

/// Flat storage for every node of one trie. Nodes are only ever appended.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<V> {
    nodes: Vec<Node<V>>,
    /// Allocation ceiling, at most [`Ptr::MAX_NODES`].
    max_nodes: usize,
}

impl<V> NodeArena<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self::with_limit(capacity, Ptr::MAX_NODES)
    }

    pub(crate) fn with_limit(capacity: usize, max_nodes: usize) -> Self {
        let max_nodes = max_nodes.min(Ptr::MAX_NODES);
        Self {
            nodes: Vec::with_capacity(capacity.min(max_nodes)),
            max_nodes,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes that can still be allocated before handles run out.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.max_nodes - self.nodes.len()
    }

    pub(crate) fn capacity_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node<V>>()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Appends a fresh node for character `c`.
    ///
    /// Callers must have checked [`remaining`](Self::remaining).
    pub(crate) fn alloc(&mut self, c: u8) -> Ptr {
        debug_assert!(self.remaining() > 0);
        let ptr = Ptr(self.nodes.len() as u32);
        self.nodes.push(Node::new(c));
        tracing::trace!(c, ptr = ptr.0, "allocated node");
        ptr
    }

    #[inline]
    pub(crate) fn get(&self, ptr: Ptr) -> &Node<V> {
        &self.nodes[ptr.idx()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, ptr: Ptr) -> &mut Node<V> {
        &mut self.nodes[ptr.idx()]
    }

    /// Returns the child of `parent` along `link`, allocating a node holding
    /// `c` there first if the slot is empty.
    pub(crate) fn child_or_alloc(&mut self, parent: Ptr, link: Link, c: u8) -> Ptr {
        let existing = self.get(parent).child(link);
        if !existing.is_null() {
            return existing;
        }
        let child = self.alloc(c);
        *self.get_mut(parent).child_mut(link) = child;
        child
    }
}
