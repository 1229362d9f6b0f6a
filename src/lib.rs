//! # tst-rs
//!
//! An ordered symbol table over byte-string keys, stored as a ternary search
//! trie (TST).
//!
//! Every node holds one byte and three links: keys whose byte at that depth
//! is smaller go left, larger go right, and equal advance to the next byte
//! through the middle link. Besides exact lookup the trie answers
//! shortest-prefix queries, and every operation has a reversed form that
//! consumes keys from their last byte, which turns suffix matching (domain
//! names, file extensions) into prefix matching.
//!
//! ## Example
//!
//! ```rust
//! use tst_rs::Tst;
//!
//! let mut tst: Tst<&str> = Tst::new();
//! tst.put("com", "com");
//! tst.put("com.example", "example");
//!
//! assert_eq!(tst.get("com.example"), Some(&"example"));
//! assert_eq!(tst.get_shortest_prefix("com.google"), Some(&"com"));
//! assert_eq!(tst.get_shortest_prefix("coo"), None);
//!
//! let mut suffixes: Tst<u32> = Tst::new();
//! suffixes.put_reversed(".org", 1);
//! assert_eq!(suffixes.get_shortest_prefix_reversed("www.rust-lang.org"), Some(&1));
//! ```
//!
//! Keys are raw bytes; a multi-byte UTF-8 character is simply several
//! independent characters.

mod config;
mod direction;
mod error;
mod node;

pub use config::Config;
pub use direction::Direction;
pub use error::{Error, Result};

use node::{Link, NodeArena, Ptr};

// =============================================================================
// Tst
// =============================================================================

/// A ternary search trie mapping byte-string keys to values of type `V`.
///
/// The shape of the tree depends on insertion order; nothing is rebalanced.
/// Keys are never removed.
#[derive(Clone)]
pub struct Tst<V> {
    nodes: NodeArena<V>,
    root: Ptr,
    /// Incremented by every successful put, including overwrites.
    count: usize,
}

impl<V> Tst<V> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            nodes: NodeArena::with_capacity(config.node_capacity),
            root: Ptr::NULL,
            count: 0,
        }
    }

    /// Creates an empty trie with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self::with_config(Config::new().with_node_capacity(nodes))
    }

    #[cfg(test)]
    fn with_node_limit(max_nodes: usize) -> Self {
        Self {
            nodes: NodeArena::with_limit(max_nodes, max_nodes),
            root: Ptr::NULL,
            count: 0,
        }
    }

    /// Number of non-empty-key puts performed so far.
    ///
    /// Overwriting an existing key counts again, so this is not the number of
    /// distinct keys once a key has been put twice.
    #[inline]
    pub fn size(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Number of allocated nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Heap bytes reserved by the node arena.
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity_bytes()
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
        tracing::debug!(nodes = self.nodes.len(), "shrunk node arena");
    }

    /// Drops every key and value and resets [`size`](Self::size) to zero.
    pub fn clear(&mut self) {
        tracing::debug!(nodes = self.nodes.len(), count = self.count, "clearing trie");
        self.nodes.clear();
        self.root = Ptr::NULL;
        self.count = 0;
    }
}

// =============================================================================
// Insertion
// =============================================================================

impl<V> Tst<V> {
    /// Associates `value` with `key`, replacing any previous value.
    ///
    /// An empty key is ignored.
    ///
    /// # Panics
    ///
    /// Panics if the node arena cannot address the nodes `key` may need.
    /// Use [`try_put_in`](Self::try_put_in) to handle that case.
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: V) {
        self.put_in(Direction::Forward, key, value)
    }

    /// Like [`put`](Self::put), but consumes `key` from its last byte.
    pub fn put_reversed(&mut self, key: impl AsRef<[u8]>, value: V) {
        self.put_in(Direction::Reversed, key, value)
    }

    /// [`put`](Self::put) in the given direction.
    pub fn put_in(&mut self, dir: Direction, key: impl AsRef<[u8]>, value: V) {
        match self.try_put_in(dir, key, value) {
            Ok(()) | Err(Error::EmptyKey) => {}
            Err(err) => panic!("{err}"),
        }
    }

    /// Checked form of [`put_in`](Self::put_in).
    ///
    /// On error nothing is modified: no node is allocated and the size is
    /// unchanged.
    pub fn try_put_in(&mut self, dir: Direction, key: impl AsRef<[u8]>, value: V) -> Result<()> {
        let key = key.as_ref();
        let Some(mut cur) = dir.cursor(key) else {
            tracing::debug!(%dir, "ignoring put with empty key");
            return Err(Error::EmptyKey);
        };
        // At most one new node per key byte.
        if self.nodes.remaining() < key.len() {
            let nodes = self.nodes.len();
            tracing::warn!(nodes, key_len = key.len(), "node arena exhausted");
            return Err(Error::ArenaExhausted { nodes });
        }

        self.count += 1;
        if self.root.is_null() {
            self.root = self.nodes.alloc(cur.byte());
        }

        let mut ptr = self.root;
        loop {
            let link = Link::for_cmp(cur.byte(), self.nodes.get(ptr).c);
            if link == Link::Mid {
                if cur.is_last() {
                    self.nodes.get_mut(ptr).value = Some(value);
                    return Ok(());
                }
                cur.advance();
            }
            ptr = self.nodes.child_or_alloc(ptr, link, cur.byte());
        }
    }
}

// =============================================================================
// Lookup
// =============================================================================

impl<V> Tst<V> {
    /// Walks `key` and returns the node its final byte lands on, or NULL if
    /// the walk falls off the tree.
    fn find(&self, dir: Direction, key: &[u8]) -> Ptr {
        let Some(mut cur) = dir.cursor(key) else {
            return Ptr::NULL;
        };

        let mut ptr = self.root;
        while !ptr.is_null() {
            let node = self.nodes.get(ptr);
            let link = Link::for_cmp(cur.byte(), node.c);
            if link == Link::Mid {
                if cur.is_last() {
                    return ptr;
                }
                cur.advance();
            }
            ptr = node.child(link);
        }
        Ptr::NULL
    }

    /// Returns the value stored under `key`.
    ///
    /// `None` means the key was never put; a stored value is always returned
    /// as `Some`, even when `V` is itself an `Option` holding `None`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        self.get_in(Direction::Forward, key)
    }

    /// Like [`get`](Self::get), but consumes `key` from its last byte.
    pub fn get_reversed(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        self.get_in(Direction::Reversed, key)
    }

    /// [`get`](Self::get) in the given direction.
    pub fn get_in(&self, dir: Direction, key: impl AsRef<[u8]>) -> Option<&V> {
        let ptr = self.find(dir, key.as_ref());
        if ptr.is_null() {
            return None;
        }
        self.nodes.get(ptr).value.as_ref()
    }

    /// Mutable form of [`get`](Self::get).
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut V> {
        self.get_mut_in(Direction::Forward, key)
    }

    /// Like [`get_mut`](Self::get_mut), but consumes `key` from its last byte.
    pub fn get_mut_reversed(&mut self, key: impl AsRef<[u8]>) -> Option<&mut V> {
        self.get_mut_in(Direction::Reversed, key)
    }

    /// [`get_mut`](Self::get_mut) in the given direction.
    pub fn get_mut_in(&mut self, dir: Direction, key: impl AsRef<[u8]>) -> Option<&mut V> {
        let ptr = self.find(dir, key.as_ref());
        if ptr.is_null() {
            return None;
        }
        self.nodes.get_mut(ptr).value.as_mut()
    }

    /// True if a value is stored under `key`.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Like [`contains_key`](Self::contains_key), but consumes `key` from its last byte.
    pub fn contains_key_reversed(&self, key: impl AsRef<[u8]>) -> bool {
        self.get_reversed(key).is_some()
    }

    /// [`contains_key`](Self::contains_key) in the given direction.
    pub fn contains_key_in(&self, dir: Direction, key: impl AsRef<[u8]>) -> bool {
        self.get_in(dir, key).is_some()
    }
}

// =============================================================================
// Shortest prefix
// =============================================================================

impl<V> Tst<V> {
    /// Returns the value of the shortest stored key that is a prefix of `key`
    /// (`key` itself included).
    ///
    /// With `"com"` and `"com.example"` stored, `"com.google"` and
    /// `"com.example.www"` both resolve to the value of `"com"`.
    pub fn get_shortest_prefix(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        self.get_shortest_prefix_in(Direction::Forward, key)
    }

    /// Shortest stored suffix of `key`, where suffixes were put with
    /// [`put_reversed`](Self::put_reversed).
    pub fn get_shortest_prefix_reversed(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        self.get_shortest_prefix_in(Direction::Reversed, key)
    }

    /// [`get_shortest_prefix`](Self::get_shortest_prefix) in the given direction.
    ///
    /// Any stored value ends the walk, including a `None` stored in an
    /// `Option` payload. Membership decides, not the payload's contents.
    pub fn get_shortest_prefix_in(&self, dir: Direction, key: impl AsRef<[u8]>) -> Option<&V> {
        let mut cur = dir.cursor(key.as_ref())?;

        let mut ptr = self.root;
        while !ptr.is_null() {
            let node = self.nodes.get(ptr);
            let link = Link::for_cmp(cur.byte(), node.c);
            if link == Link::Mid {
                // First value on the matched path wins.
                if let Some(value) = node.value.as_ref() {
                    tracing::trace!(depth = cur.depth() + 1, "shortest prefix found");
                    return Some(value);
                }
                if cur.is_last() {
                    return None;
                }
                cur.advance();
            }
            ptr = node.child(link);
        }
        None
    }
}

// =============================================================================
// Iteration & std traits
// =============================================================================

impl<V> Tst<V> {
    /// Iterates over stored values in byte-wise order of their tree paths.
    ///
    /// Keys are spelled in traversal order, so a key put with
    /// [`put_reversed`](Self::put_reversed) comes back reversed.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut stack = Vec::new();
        if !self.root.is_null() {
            stack.push(Step::Visit(self.root, 0));
        }
        Iter {
            tst: self,
            stack,
            key: Vec::new(),
        }
    }
}

impl<V> Default for Tst<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Tst<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for Tst<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for Tst<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tst = Tst::new();
        tst.extend(iter);
        tst
    }
}

impl<'a, V> IntoIterator for &'a Tst<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Copy)]
enum Step {
    /// Whole subtree rooted here; `usize` is the key length above it.
    Visit(Ptr, usize),
    /// The node's own byte, between its left and mid subtrees.
    Here(Ptr, usize),
}

pub struct Iter<'a, V> {
    tst: &'a Tst<V>,
    stack: Vec<Step>,
    /// Path bytes of the node last entered.
    key: Vec<u8>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tst: &'a Tst<V> = self.tst;
        let nodes = &tst.nodes;
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Visit(ptr, depth) => {
                    let node = nodes.get(ptr);
                    if !node.right.is_null() {
                        self.stack.push(Step::Visit(node.right, depth));
                    }
                    if !node.mid.is_null() {
                        self.stack.push(Step::Visit(node.mid, depth + 1));
                    }
                    self.stack.push(Step::Here(ptr, depth));
                    if !node.left.is_null() {
                        self.stack.push(Step::Visit(node.left, depth));
                    }
                }
                Step::Here(ptr, depth) => {
                    let node = nodes.get(ptr);
                    self.key.truncate(depth);
                    self.key.push(node.c);
                    if let Some(value) = node.value.as_ref() {
                        return Some((self.key.clone(), value));
                    }
                }
            }
        }
        None
    }
}


#[cfg(test)]
mod proptests;
