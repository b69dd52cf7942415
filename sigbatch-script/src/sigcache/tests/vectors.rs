//! Fixed test vectors for the signature cache.

use std::{sync::Arc, thread};

use sigbatch_chain::{primitives::schnorr::XOnlyPubKey, SigHash};
use sigbatch_test::vectors::{EcdsaVector, SchnorrVector};

use super::super::*;

fn schnorr_entry(seed: u32) -> CacheEntry {
    let vector = SchnorrVector::valid(seed);

    CacheEntry::schnorr(
        &SigHash(vector.sighash),
        &vector.sig,
        &XOnlyPubKey(vector.pubkey),
    )
}

#[test]
fn schnorr_and_ecdsa_entries_are_domain_separated() {
    let _init_guard = sigbatch_test::init();

    let sighash = SigHash([7; 32]);
    let sig = [1; 64];
    let pubkey = [2; 32];

    assert_ne!(
        CacheEntry::schnorr(&sighash, &sig, &XOnlyPubKey(pubkey)),
        CacheEntry::ecdsa(&sighash, &sig, &pubkey),
    );
}

#[test]
fn entries_for_different_checks_differ() {
    let _init_guard = sigbatch_test::init();

    let schnorr = SchnorrVector::valid(1);
    let ecdsa = EcdsaVector::valid(1);

    let schnorr_check = CacheEntry::schnorr(
        &SigHash(schnorr.sighash),
        &schnorr.sig,
        &XOnlyPubKey(schnorr.pubkey),
    );
    let ecdsa_check = CacheEntry::ecdsa(&SigHash(ecdsa.sighash), &ecdsa.sig, &ecdsa.pubkey);

    assert_ne!(schnorr_check, ecdsa_check);
    assert_ne!(schnorr_check, schnorr_entry(2));
}

#[test]
fn get_without_erase_keeps_the_entry() {
    let _init_guard = sigbatch_test::init();

    let cache = InMemorySignatureCache::new(16);
    let entry = schnorr_entry(0);

    assert!(!cache.get(&entry, false));

    cache.set(entry);
    assert!(cache.get(&entry, false));
    assert!(cache.get(&entry, false));
    assert_eq!(cache.len(), 1);
}

#[test]
fn get_with_erase_removes_the_entry() {
    let _init_guard = sigbatch_test::init();

    let cache = InMemorySignatureCache::new(16);
    let entry = schnorr_entry(0);

    cache.set(entry);
    assert!(cache.get(&entry, true));
    assert!(!cache.get(&entry, false));
    assert!(cache.is_empty());

    // Erasing a missing entry is a miss, not an error.
    assert!(!cache.get(&entry, true));
}

#[test]
fn repeated_set_is_harmless() {
    let _init_guard = sigbatch_test::init();

    let cache = InMemorySignatureCache::new(16);
    let entry = schnorr_entry(0);

    cache.set(entry);
    cache.set(entry);

    assert_eq!(cache.len(), 1);
}

#[test]
fn full_cache_evicts_one_entry() {
    let _init_guard = sigbatch_test::init();

    let cache = InMemorySignatureCache::new(4);
    for seed in 0..4 {
        cache.set(schnorr_entry(seed));
    }
    assert_eq!(cache.len(), cache.max_entries());

    let newest = schnorr_entry(4);
    cache.set(newest);

    assert_eq!(cache.len(), 4);
    assert!(cache.get(&newest, false));
    let survivors = (0..4)
        .filter(|seed| cache.get(&schnorr_entry(*seed), false))
        .count();
    assert_eq!(survivors, 3);
}

#[test]
fn zero_sized_cache_stores_nothing() {
    let _init_guard = sigbatch_test::init();

    let cache = InMemorySignatureCache::new(0);
    let entry = schnorr_entry(0);

    cache.set(entry);

    assert!(cache.is_empty());
    assert!(!cache.get(&entry, false));
}

#[test]
fn concurrent_sets_are_all_visible() {
    let _init_guard = sigbatch_test::init();

    let cache = Arc::new(InMemorySignatureCache::new(1024));

    let handles: Vec<_> = (0..4u32)
        .map(|thread_index| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for seed in 0..8 {
                    cache.set(CacheEntry([(thread_index * 8 + seed) as u8; 32]));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("cache writer threads do not panic");
    }

    assert_eq!(cache.len(), 32);
    for value in 0..32u8 {
        assert!(cache.get(&CacheEntry([value; 32]), false));
    }
}
