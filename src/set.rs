//! One bounded partition of the cache.
//!
//! A `CacheSet` owns up to `capacity` entries (the cache's associativity)
//! and the recency order over their keys. When a new key arrives at full
//! capacity, the set hands a read-only snapshot of the order to its eviction
//! policy and discards the victim the policy names.
//!
//! ## Operation flow
//!
//! ```text
//!   put(key, value)
//!   ═══════════════════════════════════════════════════════════════
//!
//!   key present?  ── yes ─► replace value, bump metadata,
//!        │                  move key to newest.  size unchanged
//!        no
//!        │
//!   at capacity?  ── yes ─► policy.select_victim(&order)
//!        │                  remove victim from entries + order
//!        ▼
//!   insert fresh entry (access_count = 1), append key at newest
//!
//!   get(key)   ── read only (unless touch-on-read was enabled)
//!   peek(key)  ── read only, always
//!   remove(key)── drops entry + order slot; never consults the policy
//! ```
//!
//! Two structures, one membership: every key in `entries` appears exactly
//! once in `order` and vice versa. `debug_validate_invariants` checks this
//! in debug builds.
//!
//! ## Thread Safety
//!
//! `CacheSet` is single-threaded; the `concurrency` feature wraps each set
//! in its own lock (see [`ConcurrentCache`](crate::concurrent::ConcurrentCache)).

use std::collections::hash_map;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ds::RecencyOrder;
use crate::entry::CacheEntry;
#[cfg(feature = "metrics")]
use crate::metrics::SetMetrics;
use crate::policy::EvictionPolicy;

/// A fixed-capacity set: entry map + recency order + shared policy.
///
/// # Type Parameters
///
/// - `K`: key type, `Clone + Eq + Hash`
/// - `V`: value type, unconstrained
/// - `P`: eviction policy, shared read-only with the rest of the cache
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use setcache::policy::LruPolicy;
/// use setcache::set::CacheSet;
///
/// let mut set = CacheSet::new(2, Arc::new(LruPolicy));
/// set.put("a", 1);
/// set.put("b", 2);
/// set.put("c", 3); // evicts "a", the least recently put
///
/// assert!(!set.contains(&"a"));
/// assert_eq!(set.get(&"b"), Some(&2));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug)]
pub struct CacheSet<K, V, P> {
    capacity: usize,
    entries: FxHashMap<K, CacheEntry<V>>,
    order: RecencyOrder<K>,
    policy: Arc<P>,
    touch_on_read: bool,
    #[cfg(feature = "metrics")]
    metrics: SetMetrics,
}

impl<K, V, P> CacheSet<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K>,
{
    /// Creates a set holding at most `capacity` entries.
    ///
    /// A capacity of 0 accepts no entries (all puts are no-ops);
    /// [`SetAssociativeCache`](crate::cache::SetAssociativeCache) validates
    /// its geometry and never builds such a set.
    pub fn new(capacity: usize, policy: Arc<P>) -> Self {
        Self::configured(capacity, policy, false)
    }

    pub(crate) fn configured(capacity: usize, policy: Arc<P>, touch_on_read: bool) -> Self {
        Self {
            capacity,
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: RecencyOrder::with_capacity(capacity),
            policy,
            touch_on_read,
            #[cfg(feature = "metrics")]
            metrics: SetMetrics::default(),
        }
    }

    /// Inserts or updates `key`, returning the previous value on update.
    ///
    /// An update replaces the value in place, bumps the entry's metadata and
    /// moves the key to the newest end of the order; the set's size is
    /// unchanged. A new key at full capacity first evicts the policy's
    /// victim, so the capacity bound holds before the insert ever happens.
    ///
    /// After `put` returns, `key` is resident and maps to `value`.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(entry) = self.entries.get_mut(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = entry.update(value);
            self.order.touch(&key);
            return Some(previous);
        }

        // Zero capacity never stores anything.
        if self.capacity == 0 {
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.entries.len() >= self.capacity {
            self.evict_victim();
        }

        self.order.push_newest(key.clone());
        self.entries.insert(key, CacheEntry::new(value));
        None
    }

    /// Returns the value for `key`, if resident.
    ///
    /// Leaves the recency order and entry metadata untouched unless the set
    /// was configured with touch-on-read, in which case a hit counts as an
    /// access and moves the key to the newest end.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.touch_on_read {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.record_access();
                self.order.touch(key);

                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();

                return Some(entry.value());
            }

            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();

            return None;
        }

        match self.entries.get(key) {
            Some(entry) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();

                Some(entry.value())
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();

                None
            },
        }
    }

    /// Returns the value for `key` without any side effects, ever.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(CacheEntry::value)
    }

    /// Returns the full entry (value + metadata) for `key`, read-only.
    pub fn entry(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is resident. No side effects.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, returning its value if it was resident.
    ///
    /// Never consults the eviction policy.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.entries.remove(key) {
            Some(entry) => {
                self.order.remove(key);

                #[cfg(feature = "metrics")]
                self.metrics.record_remove_hit();

                Some(entry.into_value())
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_remove_miss();

                None
            },
        }
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries (the associativity).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Iterates the resident `(key, entry)` pairs in unspecified order.
    pub fn iter(&self) -> hash_map::Iter<'_, K, CacheEntry<V>> {
        self.entries.iter()
    }

    /// Returns this set's operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> &SetMetrics {
        &self.metrics
    }

    /// Asks the policy for a victim and discards it from both structures.
    ///
    /// Only called at full capacity, so the order is non-empty; anything
    /// else is a broken size invariant and panics.
    fn evict_victim(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();

        let victim = match self.policy.select_victim(&self.order) {
            Ok(key) => key.clone(),
            Err(err) => panic!("{err}; set size bookkeeping is broken"),
        };
        self.order.remove(&victim);
        self.entries
            .remove(&victim)
            .expect("policy returned a key absent from the recency order");
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.capacity > 0 {
            assert!(self.entries.len() <= self.capacity);
        }
        assert_eq!(self.entries.len(), self.order.len());
        for key in self.order.iter() {
            assert!(self.entries.contains_key(key));
        }
        self.order.debug_validate_invariants();
    }
}
