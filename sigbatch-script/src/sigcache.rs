//! A cache of signatures that are already known to be valid.
//!
//! Blocks mostly contain transactions that were already verified when they
//! entered the mempool. Caching successful signature checks, keyed by a
//! fingerprint of the signature, its key, and its digest, avoids verifying
//! them a second time.

use std::{fmt, sync::RwLock};

use indexmap::IndexSet;
use rand::Rng;
use sha2::{Digest, Sha256};

use sigbatch_chain::{primitives::schnorr::XOnlyPubKey, SigHash};

#[cfg(test)]
mod tests;

/// Domain separation for ECDSA cache entries.
const ECDSA_PADDING: [u8; 32] = padding(b'E');

/// Domain separation for Schnorr cache entries.
const SCHNORR_PADDING: [u8; 32] = padding(b'S');

const fn padding(tag: u8) -> [u8; 32] {
    let mut padding = [0; 32];
    padding[0] = tag;
    padding
}

/// The fingerprint of a signature check, used as a signature cache key.
///
/// Entries are a SHA-256 digest of the check's inputs. They do not depend on
/// any per-process state, so the same inputs give the same entry everywhere.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct CacheEntry(pub [u8; 32]);

impl CacheEntry {
    /// Returns the cache entry for a Schnorr signature check.
    pub fn schnorr(sighash: &SigHash, sig: &[u8], pubkey: &XOnlyPubKey) -> Self {
        Self::compute(&SCHNORR_PADDING, sighash, pubkey.as_ref(), sig)
    }

    /// Returns the cache entry for an ECDSA signature check.
    pub fn ecdsa(sighash: &SigHash, sig: &[u8], pubkey: &[u8]) -> Self {
        Self::compute(&ECDSA_PADDING, sighash, pubkey, sig)
    }

    fn compute(padding: &[u8; 32], sighash: &SigHash, pubkey: &[u8], sig: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(padding);
        hasher.update(sighash);
        hasher.update(pubkey);
        hasher.update(sig);

        Self(hasher.finalize().into())
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("CacheEntry")
            .field(&hex::encode(self.0))
            .finish()
    }
}

/// A concurrent store of signature checks that are known to be valid.
///
/// Implementations must be safe to call from many validation threads at once,
/// and must never call back into a batch verifier.
pub trait SignatureCache: fmt::Debug + Send + Sync {
    /// Returns `true` if `entry` is in the cache.
    ///
    /// If `erase` is set and the entry is found, it is removed. Callers erase
    /// entries they will not need again, such as signatures checked for the
    /// last time when their block is connected.
    fn get(&self, entry: &CacheEntry, erase: bool) -> bool;

    /// Adds `entry` to the cache. Adding an entry that is already present has
    /// no effect.
    fn set(&self, entry: CacheEntry);
}

/// A bounded in-memory [`SignatureCache`].
///
/// When the cache is full, inserting a new entry evicts a random existing one.
#[derive(Debug)]
pub struct InMemorySignatureCache {
    entries: RwLock<IndexSet<CacheEntry>>,

    /// The cache never holds more entries than this.
    /// A limit of zero disables the cache.
    max_entries: usize,
}

impl InMemorySignatureCache {
    /// Creates an empty cache that holds up to `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(IndexSet::new()),
            max_entries,
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("signature cache lock should be unpoisoned")
            .len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries this cache holds.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl SignatureCache for InMemorySignatureCache {
    fn get(&self, entry: &CacheEntry, erase: bool) -> bool {
        if erase {
            self.entries
                .write()
                .expect("signature cache lock should be unpoisoned")
                .swap_remove(entry)
        } else {
            self.entries
                .read()
                .expect("signature cache lock should be unpoisoned")
                .contains(entry)
        }
    }

    fn set(&self, entry: CacheEntry) {
        if self.max_entries == 0 {
            return;
        }

        let mut entries = self
            .entries
            .write()
            .expect("signature cache lock should be unpoisoned");

        if entries.contains(&entry) {
            return;
        }

        if entries.len() >= self.max_entries {
            let evicted = rand::thread_rng().gen_range(0..entries.len());
            entries.swap_remove_index(evicted);
        }

        entries.insert(entry);
    }
}
