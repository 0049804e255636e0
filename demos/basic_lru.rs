//! Walkthrough of the set-associative cache with the LRU policy.
//!
//! Run with: cargo run --example basic_lru

use setcache::cache::SetAssociativeCache;
use setcache::policy::LruPolicy;

fn main() {
    println!("=== Set-Associative LRU Cache ===\n");

    // 4 sets, 2 entries each.
    let mut cache: SetAssociativeCache<u64, String, _> =
        SetAssociativeCache::try_new(4, 2, LruPolicy).expect("valid geometry");

    println!(
        "Created cache: {} sets x {} ways = capacity {}\n",
        cache.set_count(),
        cache.associativity(),
        cache.capacity()
    );

    // Every key hashes to exactly one set, forever.
    for key in 0..6_u64 {
        let set = cache.set_for_key(&key);
        cache.put(key, format!("value-{key}"));
        println!("put key {key} -> set {set}");
    }
    println!("\nlen: {} (sets materialized: {})", cache.len(), cache.materialized_sets());

    // Overflow one set on purpose: find three keys sharing a set.
    let target = cache.set_for_key(&0);
    let colliders: Vec<u64> = (100..)
        .filter(|k| cache.set_for_key(k) == target)
        .take(3)
        .collect();

    println!("\nkeys {colliders:?} all hash to set {target}");
    for &k in &colliders {
        cache.put(k, format!("collider-{k}"));
    }
    println!(
        "after three inserts into a 2-way set, the coldest collider is gone: contains {} -> {}",
        colliders[0],
        cache.contains(&colliders[0])
    );

    // Updates refresh recency; reads do not (by default).
    let (a, b) = (colliders[1], colliders[2]);
    cache.get(&a); // read-only: does not protect `a`
    cache.put(b, "refreshed".to_string()); // update: `b` is now the newest

    println!("\nIntrospection view:");
    for view in cache.entries() {
        println!(
            "  set {:>2}  key {:>4}  value {:<16} accesses {}",
            view.set_index, view.key, view.value, view.access_count
        );
    }
}
