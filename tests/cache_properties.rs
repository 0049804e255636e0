// ==============================================
// CACHE BEHAVIOR TESTS (integration)
// ==============================================
//
// End-to-end checks of the set-associative cache through its public
// surface: routing, per-set eviction under LRU and MRU, update-in-place
// semantics, side-effect-free probes, and the introspection view.

use setcache::builder::CacheBuilder;
use setcache::cache::SetAssociativeCache;
use setcache::policy::{EvictionPolicy, LruPolicy, MruPolicy};

/// First `n` u64 keys that the cache routes to the same set as key 0.
///
/// Scenarios that need a full set probe the selector instead of assuming
/// anything about the hash layout.
fn colliding_keys<V, P>(cache: &SetAssociativeCache<u64, V, P>, n: usize) -> Vec<u64>
where
    P: EvictionPolicy<u64>,
{
    let target = cache.set_for_key(&0);
    (0..).filter(|k| cache.set_for_key(k) == target).take(n).collect()
}

/// Some u64 key routed to a different set than `not_with`.
fn key_in_other_set<V, P>(cache: &SetAssociativeCache<u64, V, P>, not_with: u64) -> u64
where
    P: EvictionPolicy<u64>,
{
    let avoid = cache.set_for_key(&not_with);
    (0..)
        .find(|k| cache.set_for_key(k) != avoid)
        .expect("more than one set index is reachable")
}

// ==============================================
// Geometry & Key Types
// ==============================================

#[test]
fn configuration_is_observable() {
    let cache: SetAssociativeCache<u64, u64, _> =
        SetAssociativeCache::try_new(10, 10, LruPolicy).unwrap();

    assert_eq!(cache.set_count(), 10);
    assert_eq!(cache.associativity(), 10);
    assert_eq!(cache.capacity(), 100);
}

#[test]
fn any_hashable_key_and_value_types_work() {
    let mut strings: SetAssociativeCache<String, f64, _> =
        SetAssociativeCache::try_new(4, 4, LruPolicy).unwrap();
    strings.put("pi".to_string(), 3.14159);
    assert_eq!(strings.get(&"pi".to_string()), Some(&3.14159));

    let mut tuples: SetAssociativeCache<(u32, &str), Vec<u8>, _> =
        SetAssociativeCache::try_new(4, 4, LruPolicy).unwrap();
    tuples.put((1, "a"), vec![1, 2]);
    assert_eq!(tuples.remove(&(1, "a")), Some(vec![1, 2]));
    assert!(!tuples.contains(&(1, "a")));
}

// ==============================================
// Scenario A: LRU eviction in a full set
// ==============================================
//
// set_count=2, associativity=2. Fill one set with two keys, keep two more
// keys elsewhere, then push a fifth key into the full set: the least
// recently put resident must go, and only that key.

#[test]
fn lru_evicts_least_recently_put_resident() {
    let mut cache: SetAssociativeCache<u64, String, _> =
        SetAssociativeCache::try_new(2, 2, LruPolicy).unwrap();

    let same_set = colliding_keys(&cache, 3);
    let elsewhere = key_in_other_set(&cache, same_set[0]);

    cache.put(same_set[0], "first".into());
    cache.put(same_set[1], "second".into());
    cache.put(elsewhere, "other".into());
    cache.put(same_set[2], "third".into());

    assert!(
        !cache.contains(&same_set[0]),
        "least recently put key should be evicted"
    );
    assert!(cache.contains(&same_set[1]));
    assert!(cache.contains(&same_set[2]));
    assert!(cache.contains(&elsewhere));
}

// ==============================================
// Scenario B: MRU eviction in a full set
// ==============================================

#[test]
fn mru_evicts_most_recently_put_resident() {
    let mut cache: SetAssociativeCache<u64, String, _> =
        SetAssociativeCache::try_new(2, 2, MruPolicy).unwrap();

    let same_set = colliding_keys(&cache, 3);
    let elsewhere = key_in_other_set(&cache, same_set[0]);

    cache.put(same_set[0], "first".into());
    cache.put(same_set[1], "second".into());
    cache.put(elsewhere, "other".into());
    cache.put(same_set[2], "third".into());

    assert!(cache.contains(&same_set[0]));
    assert!(
        !cache.contains(&same_set[1]),
        "most recently put resident should be evicted"
    );
    assert!(cache.contains(&same_set[2]));
    assert!(cache.contains(&elsewhere));
}

// ==============================================
// Scenario C: update in place
// ==============================================

#[test]
fn repeated_put_updates_in_place() {
    let mut cache: SetAssociativeCache<&str, u32, _> =
        SetAssociativeCache::try_new(2, 2, LruPolicy).unwrap();

    assert_eq!(cache.put("a", 1), None);
    assert_eq!(cache.put("a", 2), Some(1));

    assert_eq!(cache.get(&"a"), Some(&2));
    assert_eq!(cache.entry(&"a").unwrap().access_count(), 2);
    assert_eq!(cache.len(), 1);
}

// ==============================================
// Set Independence
// ==============================================

#[test]
fn operations_on_one_set_never_touch_another() {
    let mut cache: SetAssociativeCache<u64, String, _> =
        SetAssociativeCache::try_new(2, 2, LruPolicy).unwrap();

    let same_set = colliding_keys(&cache, 4);
    let elsewhere = key_in_other_set(&cache, same_set[0]);
    cache.put(elsewhere, "stable".into());
    let before = cache.entry(&elsewhere).unwrap().access_count();

    // Churn the other set well past its capacity.
    for (i, &k) in same_set.iter().enumerate() {
        cache.put(k, format!("v{i}"));
        cache.put(k, format!("v{i}'"));
        cache.remove(&k);
        cache.put(k, format!("v{i}''"));
    }

    assert_eq!(cache.peek(&elsewhere).map(String::as_str), Some("stable"));
    assert_eq!(cache.entry(&elsewhere).unwrap().access_count(), before);
}

// ==============================================
// Read Idempotence
// ==============================================

#[test]
fn get_and_contains_are_idempotent_probes() {
    let mut cache: SetAssociativeCache<u64, String, _> =
        SetAssociativeCache::try_new(2, 2, LruPolicy).unwrap();
    let keys = colliding_keys(&cache, 3);

    cache.put(keys[0], "oldest".into());
    cache.put(keys[1], "newer".into());

    for _ in 0..10 {
        assert_eq!(cache.get(&keys[0]).map(String::as_str), Some("oldest"));
        assert!(cache.contains(&keys[0]));
    }
    assert_eq!(cache.entry(&keys[0]).unwrap().access_count(), 1);

    // Despite all those reads, keys[0] is still the LRU victim.
    cache.put(keys[2], "newest".into());
    assert!(!cache.contains(&keys[0]));
}

#[test]
fn touch_on_read_makes_reads_count() {
    let mut cache: SetAssociativeCache<u64, String, _> = CacheBuilder::new(2, 2)
        .touch_on_read(true)
        .try_build(LruPolicy)
        .unwrap();
    let keys = colliding_keys(&cache, 3);

    cache.put(keys[0], "read-often".into());
    cache.put(keys[1], "read-never".into());

    cache.get(&keys[0]); // keys[1] becomes the coldest
    assert_eq!(cache.entry(&keys[0]).unwrap().access_count(), 2);

    cache.put(keys[2], "newest".into());
    assert!(cache.contains(&keys[0]));
    assert!(!cache.contains(&keys[1]));
}

// ==============================================
// Round-trip & Removal
// ==============================================

#[test]
fn put_then_get_returns_the_value() {
    let mut cache: SetAssociativeCache<u64, Vec<u8>, _> =
        SetAssociativeCache::try_new(8, 2, LruPolicy).unwrap();

    for k in 0..16 {
        cache.put(k, vec![k as u8; 3]);
        // Immediately after a put, the key is resident (its own insertion
        // cannot have evicted it).
        assert_eq!(cache.get(&k), Some(&vec![k as u8; 3]));
    }
}

#[test]
fn remove_clears_residency_and_misses_are_inert() {
    let mut cache: SetAssociativeCache<u64, String, _> =
        SetAssociativeCache::try_new(4, 2, LruPolicy).unwrap();

    cache.put(7, "seven".into());
    assert_eq!(cache.remove(&7).as_deref(), Some("seven"));
    assert!(!cache.contains(&7));

    // Removing an absent key reports None and changes nothing.
    let len_before = cache.len();
    assert_eq!(cache.remove(&7), None);
    assert_eq!(cache.remove(&12345), None);
    assert_eq!(cache.len(), len_before);
}

// ==============================================
// Introspection
// ==============================================

#[test]
fn entry_views_expose_placement_and_metadata() {
    let mut cache: SetAssociativeCache<u64, String, _> =
        SetAssociativeCache::try_new(4, 8, LruPolicy).unwrap();

    for k in 0..5 {
        cache.put(k, format!("v{k}"));
    }
    cache.put(0, "v0-rewritten".into());

    let views: Vec<_> = cache.entries().collect();
    assert_eq!(views.len(), 5);

    for view in &views {
        assert_eq!(view.set_index, cache.set_for_key(view.key));
        assert!(view.created_at <= view.last_accessed_at);
        if *view.key == 0 {
            assert_eq!(view.value.as_str(), "v0-rewritten");
            assert_eq!(view.access_count, 2);
        } else {
            assert_eq!(view.access_count, 1);
        }
    }
}

// ==============================================
// Custom Policy (extension seam)
// ==============================================

/// Evicts the lexicographically largest key: deterministic over the
/// snapshot, ignores recency entirely.
struct LargestKey;

impl<K: Ord> EvictionPolicy<K> for LargestKey {
    fn select_victim<'a>(
        &self,
        order: &'a setcache::ds::RecencyOrder<K>,
    ) -> Result<&'a K, setcache::error::EmptyOrderError> {
        order
            .iter()
            .max()
            .ok_or(setcache::error::EmptyOrderError::new())
    }
}

#[test]
fn custom_policies_plug_into_the_same_seam() {
    let mut cache: SetAssociativeCache<u64, &str, _> =
        SetAssociativeCache::try_new(2, 2, LargestKey).unwrap();
    let keys = colliding_keys(&cache, 3);
    let largest = *keys.iter().take(2).max().unwrap();

    cache.put(keys[0], "a");
    cache.put(keys[1], "b");
    cache.put(keys[2], "c");

    assert!(!cache.contains(&largest));
    assert_eq!(cache.len(), 2);
}
