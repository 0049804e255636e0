//! Builder for cache geometry and options.
//!
//! Validates `set_count` and `associativity` before any cache state exists
//! and carries the two optional knobs: the routing seed and touch-on-read.
//!
//! ## Example
//!
//! ```
//! use setcache::builder::CacheBuilder;
//! use setcache::policy::LruPolicy;
//!
//! let mut cache = CacheBuilder::new(8, 4)
//!     .seed(42)
//!     .touch_on_read(true)
//!     .try_build::<u64, String, _>(LruPolicy)
//!     .unwrap();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;
use std::sync::Arc;

use crate::cache::SetAssociativeCache;
#[cfg(feature = "concurrency")]
use crate::concurrent::ConcurrentCache;
use crate::ds::SetSelector;
use crate::error::ConfigError;
use crate::policy::EvictionPolicy;

/// Configures and validates a cache before construction.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    set_count: usize,
    associativity: usize,
    seed: u64,
    touch_on_read: bool,
}

impl CacheBuilder {
    /// Starts a builder for `set_count` sets of `associativity` entries.
    pub fn new(set_count: usize, associativity: usize) -> Self {
        Self {
            set_count,
            associativity,
            seed: 0,
            touch_on_read: false,
        }
    }

    /// Sets the routing seed (default 0).
    ///
    /// Different seeds distribute the same keys differently across sets;
    /// useful for sidestepping a pathological key population.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Makes `get` count as an access: bumps the entry's metadata and moves
    /// the key to the newest end of its set's order (default off).
    ///
    /// Off, the order reflects inserts and updates only, so LRU really means
    /// "least recently put".
    pub fn touch_on_read(mut self, enabled: bool) -> Self {
        self.touch_on_read = enabled;
        self
    }

    /// Builds a single-threaded cache, validating the geometry first.
    pub fn try_build<K, V, P>(self, policy: P) -> Result<SetAssociativeCache<K, V, P>, ConfigError>
    where
        K: Clone + Eq + Hash,
        P: EvictionPolicy<K>,
    {
        self.validate()?;
        Ok(SetAssociativeCache::from_parts(
            SetSelector::new(self.set_count, self.seed),
            self.associativity,
            self.touch_on_read,
            Arc::new(policy),
        ))
    }

    /// Builds a lock-per-set concurrent cache, validating the geometry first.
    #[cfg(feature = "concurrency")]
    pub fn try_build_concurrent<K, V, P>(
        self,
        policy: P,
    ) -> Result<ConcurrentCache<K, V, P>, ConfigError>
    where
        K: Clone + Eq + Hash,
        P: EvictionPolicy<K>,
    {
        self.validate()?;
        Ok(ConcurrentCache::from_parts(
            SetSelector::new(self.set_count, self.seed),
            self.associativity,
            self.touch_on_read,
            Arc::new(policy),
        ))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.set_count == 0 {
            return Err(ConfigError::ZeroSetCount);
        }
        if self.associativity == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        Ok(())
    }
}
