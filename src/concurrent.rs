//! Thread-safe cache with one lock per set.
//!
//! Sets are fully independent, so each gets its own `parking_lot::Mutex`:
//! contention is bounded to keys that hash to the same set, and the policy's
//! `select_victim` always runs while the owning set's lock is held. The
//! policy itself is a stateless shared value and needs no synchronization.
//!
//! Values are stored as `Arc<V>` so lookups can hand back an owned handle
//! without holding the lock: `get`/`peek`/`remove` return `Arc<V>` clones,
//! `put` wraps, and [`put_arc`](ConcurrentCache::put_arc) accepts a
//! pre-wrapped value. Callers may keep the `Arc` as long as they like, even
//! after the entry is evicted.
//!
//! The mutex table is sized at construction (one slot per set index), but
//! the `CacheSet` behind each mutex is still created on first insert into
//! that index.
//!
//! ## Example
//!
//! ```
//! use setcache::concurrent::ConcurrentCache;
//! use setcache::policy::LruPolicy;
//!
//! let cache = ConcurrentCache::try_new(8, 2, LruPolicy).unwrap();
//! cache.put(1_u64, "one".to_string());
//!
//! let value = cache.get(&1).unwrap();
//! assert_eq!(value.as_str(), "one");
//! ```

use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::builder::CacheBuilder;
use crate::ds::SetSelector;
use crate::error::ConfigError;
#[cfg(feature = "metrics")]
use crate::metrics::CacheMetricsSnapshot;
use crate::policy::EvictionPolicy;
use crate::set::CacheSet;

/// Lock-per-set cache for shared use across threads.
///
/// All methods take `&self`; cloning the surrounding `Arc<ConcurrentCache>`
/// is the intended sharing pattern.
pub struct ConcurrentCache<K, V, P> {
    selector: SetSelector,
    associativity: usize,
    touch_on_read: bool,
    policy: Arc<P>,
    sets: Vec<Mutex<Option<CacheSet<K, Arc<V>, P>>>>,
}

impl<K, V, P> ConcurrentCache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K>,
{
    /// Creates a concurrent cache with the given geometry and default
    /// options. Fails with [`ConfigError`] if either parameter is zero.
    pub fn try_new(set_count: usize, associativity: usize, policy: P) -> Result<Self, ConfigError> {
        CacheBuilder::new(set_count, associativity).try_build_concurrent(policy)
    }

    pub(crate) fn from_parts(
        selector: SetSelector,
        associativity: usize,
        touch_on_read: bool,
        policy: Arc<P>,
    ) -> Self {
        let sets = (0..selector.set_count()).map(|_| Mutex::new(None)).collect();
        Self {
            selector,
            associativity,
            touch_on_read,
            policy,
            sets,
        }
    }

    /// Inserts or updates `key`, returning the previous value on update.
    pub fn put(&self, key: K, value: V) -> Option<Arc<V>> {
        self.put_arc(key, Arc::new(value))
    }

    /// Inserts a pre-wrapped value, avoiding a fresh allocation.
    pub fn put_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let index = self.selector.set_for_key(&key);
        self.with_set(index, move |set| set.put(key, value))
    }

    /// Returns an owned handle to the value for `key`.
    ///
    /// Read-only unless the cache was built with touch-on-read.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let index = self.selector.set_for_key(key);
        self.with_existing_set(index, |set| set.get(key).cloned())?
    }

    /// Returns an owned handle with no side effects, ever.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let index = self.selector.set_for_key(key);
        self.with_existing_set(index, |set| set.peek(key).cloned())?
    }

    /// Returns `true` if `key` is resident in its owning set.
    pub fn contains(&self, key: &K) -> bool {
        let index = self.selector.set_for_key(key);
        self.with_existing_set(index, |set| set.contains(key))
            .unwrap_or(false)
    }

    /// Removes `key`, returning its value handle if it was resident.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let index = self.selector.set_for_key(key);
        self.with_existing_set(index, |set| set.remove(key))?
    }

    /// Returns the total number of resident entries.
    ///
    /// Locks each set in turn; the count is a point-in-time aggregate, not
    /// an atomic snapshot of the whole cache.
    pub fn len(&self) -> usize {
        self.sets
            .iter()
            .map(|slot| slot.lock().as_ref().map_or(0, CacheSet::len))
            .sum()
    }

    /// Returns `true` if no set holds any entry.
    pub fn is_empty(&self) -> bool {
        self.sets
            .iter()
            .all(|slot| slot.lock().as_ref().map_or(true, CacheSet::is_empty))
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

    /// Returns the set index owning `key`. Stable for the cache's lifetime.
    pub fn set_for_key(&self, key: &K) -> usize {
        self.selector.set_for_key(key)
    }

    /// Drops every entry and every materialized set.
    pub fn clear(&self) {
        for slot in &self.sets {
            *slot.lock() = None;
        }
    }

    /// Collects a read-only row per resident entry, set by set.
    ///
    /// Each set is locked only while its rows are copied out; the result is
    /// consistent per set, not across sets.
    pub fn snapshot(&self) -> Vec<EntrySnapshot<K, V>> {
        let mut rows = Vec::new();
        for (set_index, slot) in self.sets.iter().enumerate() {
            let guard = slot.lock();
            if let Some(set) = guard.as_ref() {
                for (key, entry) in set.iter() {
                    rows.push(EntrySnapshot {
                        set_index,
                        key: key.clone(),
                        value: Arc::clone(entry.value()),
                        created_at: entry.created_at(),
                        last_accessed_at: entry.last_accessed_at(),
                        access_count: entry.access_count(),
                    });
                }
            }
        }
        rows
    }

    /// Folds every materialized set's counters into one snapshot.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        let mut snapshot = CacheMetricsSnapshot::default();
        for slot in &self.sets {
            if let Some(set) = slot.lock().as_ref() {
                snapshot.accumulate(set.metrics());
            }
        }
        snapshot
    }

    /// Runs `f` on the set at `index`, materializing it first if needed.
    fn with_set<R>(&self, index: usize, f: impl FnOnce(&mut CacheSet<K, Arc<V>, P>) -> R) -> R {
        let mut guard = self.sets[index].lock();
        let set = guard.get_or_insert_with(|| {
            CacheSet::configured(
                self.associativity,
                Arc::clone(&self.policy),
                self.touch_on_read,
            )
        });
        f(set)
    }

    /// Runs `f` on the set at `index` if it has been materialized.
    fn with_existing_set<R>(
        &self,
        index: usize,
        f: impl FnOnce(&mut CacheSet<K, Arc<V>, P>) -> R,
    ) -> Option<R> {
        let mut guard = self.sets[index].lock();
        guard.as_mut().map(f)
    }
}

/// Owned introspection row: the concurrent counterpart of
/// [`EntryView`](crate::cache::EntryView).
#[derive(Debug, Clone)]
pub struct EntrySnapshot<K, V> {
    pub set_index: usize,
    pub key: K,
    pub value: Arc<V>,
    pub created_at: Instant,
    pub last_accessed_at: Instant,
    pub access_count: u64,
}
