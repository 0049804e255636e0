//! Eviction policies: the rule that picks a victim when a set is full.
//!
//! A policy is a stateless strategy value shared read-only by every set in a
//! cache. It sees a snapshot of one set's recency order (`&RecencyOrder<K>`
//! exposes only the read surface, so `select_victim` is a pure function of
//! the snapshot) and must hand back a key that is present in it.
//!
//! [`LruPolicy`] and [`MruPolicy`] are provided; any deterministic selection
//! over the ordered keys is a valid strategy.
//!
//! ## Implementing a custom policy
//!
//! ```
//! use setcache::ds::RecencyOrder;
//! use setcache::error::EmptyOrderError;
//! use setcache::policy::EvictionPolicy;
//!
//! /// Spares the coldest key and evicts its neighbour instead.
//! struct SecondOldest;
//!
//! impl<K> EvictionPolicy<K> for SecondOldest {
//!     fn select_victim<'a>(
//!         &self,
//!         order: &'a RecencyOrder<K>,
//!     ) -> Result<&'a K, EmptyOrderError> {
//!         let mut keys = order.iter();
//!         let oldest = keys.next().ok_or(EmptyOrderError::new())?;
//!         Ok(keys.next().unwrap_or(oldest))
//!     }
//! }
//! ```

use crate::ds::RecencyOrder;
use crate::error::EmptyOrderError;

pub mod lru;
pub mod mru;

pub use lru::LruPolicy;
pub use mru::MruPolicy;

/// Strategy choosing which resident key a full set discards.
///
/// # Contract
///
/// - Must be a pure function of the `order` snapshot: no interior mutability,
///   no per-call state. Policies are shared by every set of a cache (and, in
///   the concurrent build, across threads) without synchronization.
/// - Must return a key currently present in `order`.
/// - Returns [`EmptyOrderError`] for an empty order. Sets only ask for a
///   victim at full capacity, so inside the engine this case is a
///   bookkeeping bug and escalates to a panic.
pub trait EvictionPolicy<K> {
    /// Picks the key to evict from a snapshot of one set's recency order.
    fn select_victim<'a>(&self, order: &'a RecencyOrder<K>) -> Result<&'a K, EmptyOrderError>;
}
