//! Walkthrough of the set-associative cache with the MRU policy.
//!
//! MRU evicts the *most* recently put key in the full set, the opposite of
//! LRU, occasionally right for cyclic access patterns and wrong for almost
//! everything else.
//!
//! Run with: cargo run --example basic_mru

use setcache::cache::SetAssociativeCache;
use setcache::policy::MruPolicy;

fn main() {
    println!("=== Set-Associative MRU Cache ===\n");

    let mut cache: SetAssociativeCache<u64, String, _> =
        SetAssociativeCache::try_new(2, 2, MruPolicy).expect("valid geometry");

    // Find three keys that share a set, so the third insert must evict.
    let target = cache.set_for_key(&0);
    let colliders: Vec<u64> = (0..)
        .filter(|k| cache.set_for_key(k) == target)
        .take(3)
        .collect();
    println!("keys {colliders:?} all hash to set {target}\n");

    cache.put(colliders[0], "first".to_string());
    cache.put(colliders[1], "second".to_string());
    println!("put {} (oldest) and {} (newest); set is full", colliders[0], colliders[1]);

    cache.put(colliders[2], "third".to_string());
    println!("put {} -> MRU evicts the newest resident, {}\n", colliders[2], colliders[1]);

    for &k in &colliders {
        println!("  contains {k}? {}", cache.contains(&k));
    }

    println!(
        "\nThe oldest key {} survives under MRU; LRU would have evicted it instead.",
        colliders[0]
    );
}
