//! Error types for the setcache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache geometry parameters are invalid
//!   (zero set count or zero associativity).
//! - [`EmptyOrderError`]: Returned by an eviction policy asked to pick a
//!   victim from an empty recency order. Inside the engine this means the
//!   set's size bookkeeping is broken and is escalated to a panic rather
//!   than handled.
//!
//! ## Example Usage
//!
//! ```
//! use setcache::cache::SetAssociativeCache;
//! use setcache::error::ConfigError;
//! use setcache::policy::LruPolicy;
//!
//! // Fallible constructor for user-configurable geometry
//! let cache: Result<SetAssociativeCache<u64, String, _>, ConfigError> =
//!     SetAssociativeCache::try_new(8, 4, LruPolicy);
//! assert!(cache.is_ok());
//!
//! // Invalid geometry is caught without panicking
//! let bad = SetAssociativeCache::<u64, String, _>::try_new(0, 4, LruPolicy);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache geometry parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`SetAssociativeCache::try_new`](crate::cache::SetAssociativeCache::try_new)
/// and [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build)
/// before any cache state is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The cache was configured with `set_count == 0`.
    ZeroSetCount,
    /// The cache was configured with `associativity == 0`.
    ZeroAssociativity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroSetCount => f.write_str("set_count must be greater than zero"),
            ConfigError::ZeroAssociativity => {
                f.write_str("associativity must be greater than zero")
            },
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// EmptyOrderError
// ---------------------------------------------------------------------------

/// Error returned when a victim is requested from an empty recency order.
///
/// A [`CacheSet`](crate::set::CacheSet) only consults its policy when it is
/// at full capacity, which implies a non-empty order; seeing this error means
/// the set's size bookkeeping no longer matches its recency order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyOrderError;

impl EmptyOrderError {
    /// Creates a new `EmptyOrderError`.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl fmt::Display for EmptyOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("eviction victim requested from an empty recency order")
    }
}

impl std::error::Error for EmptyOrderError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
