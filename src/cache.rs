//! The n-way set-associative cache.
//!
//! ## Architecture
//!
//! ```text
//!   put/get/remove/contains(key)
//!            │
//!            ▼
//!   ┌─────────────────────────────┐
//!   │ SetSelector                 │   hash(seed, key) % set_count
//!   └──────────────┬──────────────┘
//!                  ▼
//!   ┌─────────┬─────────┬─────────┬─────────┐
//!   │  set 0  │  set 1  │   ...   │ set n-1 │   ≤ associativity entries each
//!   └─────────┴─────────┴─────────┴─────────┘
//!        materialized lazily, on first insert into that index
//! ```
//!
//! Sets are fully independent: no operation on one set can change another's
//! contents or ordering. They share only the selector and one read-only
//! policy value. `contains`/`get`/`remove` look at exactly the owning set;
//! the selector makes scanning unnecessary.
//!
//! ## Key Components
//!
//! | Component               | Description                                  |
//! |-------------------------|----------------------------------------------|
//! | `SetAssociativeCache`   | Routing + lazily materialized `CacheSet`s    |
//! | `EntryView` / `Entries` | Read-only introspection over every entry     |
//!
//! ## Example
//!
//! ```
//! use setcache::cache::SetAssociativeCache;
//! use setcache::policy::LruPolicy;
//!
//! let mut cache = SetAssociativeCache::try_new(8, 2, LruPolicy).unwrap();
//! cache.put("alpha", 1);
//! cache.put("beta", 2);
//!
//! assert_eq!(cache.get(&"alpha"), Some(&1));
//! assert!(cache.contains(&"beta"));
//! assert_eq!(cache.remove(&"beta"), Some(2));
//! assert_eq!(cache.len(), 1);
//! ```

use std::collections::hash_map;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::builder::CacheBuilder;
use crate::ds::SetSelector;
use crate::entry::CacheEntry;
use crate::error::ConfigError;
#[cfg(feature = "metrics")]
use crate::metrics::CacheMetricsSnapshot;
use crate::policy::EvictionPolicy;
use crate::set::CacheSet;

/// Fixed-geometry cache: `set_count` independent sets of `associativity`
/// entries each, routed by key hash.
///
/// # Type Parameters
///
/// - `K`: key type, `Clone + Eq + Hash`
/// - `V`: value type, unconstrained
/// - `P`: eviction policy, shared read-only by every set
pub struct SetAssociativeCache<K, V, P> {
    selector: SetSelector,
    associativity: usize,
    touch_on_read: bool,
    policy: Arc<P>,
    sets: FxHashMap<usize, CacheSet<K, V, P>>,
}

impl<K, V, P> SetAssociativeCache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K>,
{
    /// Creates a cache with the given geometry and default options.
    ///
    /// Fails with [`ConfigError`] if `set_count` or `associativity` is zero.
    /// Use [`CacheBuilder`] for the seed and touch-on-read options.
    pub fn try_new(set_count: usize, associativity: usize, policy: P) -> Result<Self, ConfigError> {
        CacheBuilder::new(set_count, associativity).try_build(policy)
    }

    pub(crate) fn from_parts(
        selector: SetSelector,
        associativity: usize,
        touch_on_read: bool,
        policy: Arc<P>,
    ) -> Self {
        Self {
            selector,
            associativity,
            touch_on_read,
            policy,
            sets: FxHashMap::default(),
        }
    }

    /// Inserts or updates `key` in its owning set, returning the previous
    /// value on update. May evict that set's policy victim; other sets are
    /// untouched.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let index = self.selector.set_for_key(&key);
        self.set_mut(index).put(key, value)
    }

    /// Returns the value for `key` from its owning set.
    ///
    /// Read-only unless the cache was built with
    /// [`touch_on_read`](CacheBuilder::touch_on_read).
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = self.selector.set_for_key(key);
        self.sets.get_mut(&index)?.get(key)
    }

    /// Returns the value for `key` with no side effects, ever.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let index = self.selector.set_for_key(key);
        self.sets.get(&index)?.peek(key)
    }

    /// Returns the full entry (value + metadata) for `key`, read-only.
    pub fn entry(&self, key: &K) -> Option<&CacheEntry<V>> {
        let index = self.selector.set_for_key(key);
        self.sets.get(&index)?.entry(key)
    }

    /// Returns `true` if `key` is resident in its owning set.
    ///
    /// Checks only that one set; keys cannot live anywhere else.
    pub fn contains(&self, key: &K) -> bool {
        let index = self.selector.set_for_key(key);
        self.sets
            .get(&index)
            .is_some_and(|set| set.contains(key))
    }

    /// Removes `key` from its owning set, returning its value if resident.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.selector.set_for_key(key);
        self.sets.get_mut(&index)?.remove(key)
    }

    /// Returns the total number of resident entries across all sets.
    pub fn len(&self) -> usize {
        self.sets.values().map(CacheSet::len).sum()
    }

    /// Returns `true` if no set holds any entry.
    pub fn is_empty(&self) -> bool {
        self.sets.values().all(CacheSet::is_empty)
    }

    /// Returns the number of sets keys are routed across.
    pub fn set_count(&self) -> usize {
        self.selector.set_count()
    }

    /// Returns the per-set capacity.
    pub fn associativity(&self) -> usize {
        self.associativity
    }

    /// Returns the total capacity (`set_count * associativity`).
    pub fn capacity(&self) -> usize {
        self.set_count() * self.associativity
    }

    /// Returns whether reads count as accesses for the eviction order.
    pub fn touch_on_read(&self) -> bool {
        self.touch_on_read
    }

    /// Returns the set index owning `key`. Stable for the cache's lifetime.
    pub fn set_for_key(&self, key: &K) -> usize {
        self.selector.set_for_key(key)
    }

    /// Returns how many sets have been materialized so far.
    ///
    /// A set index that no key ever hashed to stays unallocated; it behaves
    /// exactly like an empty set.
    pub fn materialized_sets(&self) -> usize {
        self.sets.len()
    }

    /// Drops every entry and every materialized set.
    pub fn clear(&mut self) {
        self.sets.clear();
    }

    /// Iterates a read-only [`EntryView`] of every resident entry, across
    /// all materialized sets, in unspecified order.
    ///
    /// This is the debug/reporting surface: it never mutates the cache.
    pub fn entries(&self) -> Entries<'_, K, V, P> {
        Entries {
            outer: self.sets.iter(),
            current: None,
        }
    }

    /// Folds every materialized set's counters into one snapshot.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        let mut snapshot = CacheMetricsSnapshot::default();
        for set in self.sets.values() {
            snapshot.accumulate(set.metrics());
        }
        snapshot
    }

    /// Returns the set for `index`, materializing it on first use.
    fn set_mut(&mut self, index: usize) -> &mut CacheSet<K, V, P> {
        self.sets.entry(index).or_insert_with(|| {
            CacheSet::configured(
                self.associativity,
                Arc::clone(&self.policy),
                self.touch_on_read,
            )
        })
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.sets.len() <= self.set_count());
        for (index, set) in &self.sets {
            assert!(*index < self.set_count());
            set.debug_validate_invariants();
        }
    }
}

/// One row of the introspection surface: where an entry lives and what its
/// metadata says.
#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a, K, V> {
    pub set_index: usize,
    pub key: &'a K,
    pub value: &'a V,
    pub created_at: Instant,
    pub last_accessed_at: Instant,
    pub access_count: u64,
}

/// Iterator over every resident entry of a cache. See
/// [`SetAssociativeCache::entries`].
pub struct Entries<'a, K, V, P> {
    outer: hash_map::Iter<'a, usize, CacheSet<K, V, P>>,
    current: Option<(usize, hash_map::Iter<'a, K, CacheEntry<V>>)>,
}

impl<'a, K, V, P> Iterator for Entries<'a, K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K>,
{
    type Item = EntryView<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((set_index, inner)) = &mut self.current {
                if let Some((key, entry)) = inner.next() {
                    return Some(EntryView {
                        set_index: *set_index,
                        key,
                        value: entry.value(),
                        created_at: entry.created_at(),
                        last_accessed_at: entry.last_accessed_at(),
                        access_count: entry.access_count(),
                    });
                }
            }
            let (set_index, set) = self.outer.next()?;
            self.current = Some((*set_index, set.iter()));
        }
    }
}
