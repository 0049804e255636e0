//! Deterministic key-to-set routing.
//!
//! Maps any `Hash`able key to a set index in `[0, set_count)` with a seeded
//! hash. The same `(key, seed, set_count)` tuple always yields the same
//! index, so a key's owning set never changes for its lifetime; the cache
//! relies on this to look at exactly one set per operation.
//!
//! Properties
//! ──────────
//! • Deterministic: same (key, seed, set_count) always yields the same index
//! • Uniform: keys spread evenly across sets (given a good `Hash` impl)
//! • Seed isolation: different seeds produce different distributions

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeded hash router from keys to set indices.
///
/// # Example
///
/// ```
/// use setcache::ds::SetSelector;
///
/// let selector = SetSelector::new(4, 0);
///
/// let index = selector.set_for_key(&"user:alice");
/// assert!(index < 4);
///
/// // Same key, same set, always.
/// assert_eq!(selector.set_for_key(&"user:alice"), index);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSelector {
    set_count: usize,
    seed: u64,
}

impl SetSelector {
    /// Creates a selector routing to `set_count` sets with the given `seed`.
    ///
    /// The set count is clamped to at least 1 so the selector is always
    /// usable on its own; [`CacheBuilder`](crate::builder::CacheBuilder)
    /// rejects a zero set count before one is ever built.
    pub fn new(set_count: usize, seed: u64) -> Self {
        Self {
            set_count: set_count.max(1),
            seed,
        }
    }

    /// Returns the number of sets keys are routed across.
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Maps a key to its owning set index in `[0, set_count)`.
    pub fn set_for_key<K: Hash + ?Sized>(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.set_count
    }
}

impl Default for SetSelector {
    /// Creates a single-set selector with seed 0.
    fn default() -> Self {
        Self::new(1, 0)
    }
}
