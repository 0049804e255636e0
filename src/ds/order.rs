//! Recency ordering for a single cache set.
//!
//! Keeps the set's keys in insert/update order with O(1) append, O(1)
//! move-to-newest and O(1) removal by key. Nodes live in a slab (`Vec` with
//! a free list) and are linked through slot indices; a side map resolves a
//! key to its slot, so no operation ever scans the list.
//!
//! ```text
//!   index: {B:1, A:0, C:2}          slots
//!                                   ┌───────────────────────────┐
//!   oldest ──► [A] ◄──► [B] ◄──► [C] ◄── newest
//!              first    then      last
//!              inserted updated   touched
//! ```
//!
//! The read-only surface (`oldest`, `newest`, `iter`, `len`) is what eviction
//! policies see; a `&RecencyOrder<K>` cannot be mutated, which makes
//! `select_victim` a pure function of the snapshot.

use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Ordered sequence of a set's keys, oldest to newest.
///
/// "Newest" means most recently inserted or updated; reads do not reposition
/// keys unless the owning set was configured to touch on read.
///
/// # Example
///
/// ```
/// use setcache::ds::RecencyOrder;
///
/// let mut order = RecencyOrder::new();
/// order.push_newest("a");
/// order.push_newest("b");
/// order.push_newest("c");
///
/// assert_eq!(order.oldest(), Some(&"a"));
/// assert_eq!(order.newest(), Some(&"c"));
///
/// // Updating "a" moves it to the newest end.
/// order.touch(&"a");
/// assert_eq!(order.oldest(), Some(&"b"));
/// assert_eq!(order.newest(), Some(&"a"));
/// ```
#[derive(Debug)]
pub struct RecencyOrder<K> {
    slots: Vec<Option<Node<K>>>,
    free_list: Vec<usize>,
    index: FxHashMap<K, usize>,
    oldest: Option<usize>,
    newest: Option<usize>,
}

impl<K> RecencyOrder<K> {
    /// Creates an empty order.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            index: FxHashMap::default(),
            oldest: None,
            newest: None,
        }
    }

    /// Creates an empty order with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            oldest: None,
            newest: None,
        }
    }

    /// Returns the number of keys in the order.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the order holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the least recently inserted/updated key.
    pub fn oldest(&self) -> Option<&K> {
        self.oldest.and_then(|idx| self.node(idx)).map(|n| &n.key)
    }

    /// Returns the most recently inserted/updated key.
    pub fn newest(&self) -> Option<&K> {
        self.newest.and_then(|idx| self.node(idx)).map(|n| &n.key)
    }

    /// Iterates the keys from oldest to newest.
    pub fn iter(&self) -> RecencyIter<'_, K> {
        RecencyIter {
            order: self,
            current: self.oldest,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K>> {
        self.slots.get(idx).and_then(|slot| slot.as_ref())
    }
}

impl<K> RecencyOrder<K>
where
    K: Clone + Eq + Hash,
{
    /// Returns `true` if `key` is present in the order.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Appends a key at the newest end.
    ///
    /// The key must not already be present; the owning set inserts a key
    /// here exactly once, when its entry is created.
    pub fn push_newest(&mut self, key: K) {
        debug_assert!(
            !self.index.contains_key(&key),
            "key pushed onto recency order twice"
        );
        let idx = self.alloc(Node {
            key: key.clone(),
            prev: self.newest,
            next: None,
        });
        self.index.insert(key, idx);
        self.attach_newest_links(idx);
    }

    /// Moves an existing key to the newest end; returns `false` if absent.
    pub fn touch(&mut self, key: &K) -> bool {
        let Some(&idx) = self.index.get(key) else {
            return false;
        };
        if self.newest == Some(idx) {
            return true;
        }
        self.detach(idx);
        // idx was not the newest node, so detach left `newest` in place.
        let old_newest = self.newest;
        if let Some(node) = self.node_mut(idx) {
            node.prev = old_newest;
            node.next = None;
        }
        self.attach_newest_links(idx);
        true
    }

    /// Removes a key from the order; returns `false` if absent.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(idx) = self.index.remove(key) else {
            return false;
        };
        self.detach(idx);
        let _ = self.release(idx);
        true
    }

    /// Removes and returns the oldest key.
    pub fn pop_oldest(&mut self) -> Option<K> {
        let idx = self.oldest?;
        self.detach(idx);
        let node = self.release(idx)?;
        self.index.remove(&node.key);
        Some(node.key)
    }

    /// Drops every key.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.index.clear();
        self.oldest = None;
        self.newest = None;
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K>> {
        self.slots.get_mut(idx).and_then(|slot| slot.as_mut())
    }

    fn alloc(&mut self, node: Node<K>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn release(&mut self, idx: usize) -> Option<Node<K>> {
        let node = self.slots.get_mut(idx)?.take()?;
        self.free_list.push(idx);
        Some(node)
    }

    /// Unlinks `idx` from its neighbours without freeing the slot.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.node_mut(prev_idx) {
                    prev_node.next = next;
                }
            },
            None => self.oldest = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.node_mut(next_idx) {
                    next_node.prev = prev;
                }
            },
            None => self.newest = prev,
        }
    }

    /// Wires `idx` in as the new newest node. The node's own links must
    /// already point at (old newest, None).
    fn attach_newest_links(&mut self, idx: usize) {
        if let Some(old_newest) = self.newest {
            if let Some(node) = self.node_mut(old_newest) {
                node.next = Some(idx);
            }
        } else {
            self.oldest = Some(idx);
        }
        self.newest = Some(idx);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.oldest.is_none() || self.newest.is_none() {
            assert!(self.oldest.is_none());
            assert!(self.newest.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.oldest;

        while let Some(idx) = current {
            let node = self.node(idx).expect("linked slot is vacant");
            assert_eq!(node.prev, prev);
            assert_eq!(self.index.get(&node.key), Some(&idx));
            if node.next.is_none() {
                assert_eq!(self.newest, Some(idx));
            }

            prev = Some(idx);
            current = node.next;
            count += 1;
            assert!(count <= self.len(), "cycle in recency order");
        }

        assert_eq!(count, self.len());
    }
}

impl<K> Default for RecencyOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the keys of a [`RecencyOrder`], oldest to newest.
pub struct RecencyIter<'a, K> {
    order: &'a RecencyOrder<K>,
    current: Option<usize>,
}

impl<'a, K> Iterator for RecencyIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current?;
        let node = self.order.node(idx)?;
        self.current = node.next;
        Some(&node.key)
    }
}
