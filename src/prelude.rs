pub use crate::builder::CacheBuilder;
pub use crate::cache::{Entries, EntryView, SetAssociativeCache};
pub use crate::ds::{RecencyOrder, SetSelector};
pub use crate::entry::CacheEntry;
pub use crate::error::{ConfigError, EmptyOrderError};
pub use crate::policy::{EvictionPolicy, LruPolicy, MruPolicy};
pub use crate::set::CacheSet;

#[cfg(feature = "concurrency")]
pub use crate::concurrent::{ConcurrentCache, EntrySnapshot};
#[cfg(feature = "metrics")]
pub use crate::metrics::{CacheMetricsSnapshot, SetMetrics};
