//! A shared accumulator for batched Schnorr signature verification.
//!
//! Validation threads add signatures to a [`BatchSchnorrVerifier`] instead of
//! verifying them one by one. Each added signature comes with a
//! [`SigCacheCallback`], which writes the signature's cache entry once the
//! batch containing it has been verified.
//!
//! Batches are verified in two ways:
//! - explicitly, by calling [`BatchSchnorrVerifier::verify`], and
//! - implicitly, by the backend, when a signature is added to a full batch.
//!
//! Signatures that are still queued when the verifier is dropped are never
//! cached.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use rand::Rng;

use sigbatch_chain::{
    primitives::schnorr::{
        batch::{BatchBackend, Secp256k1Batch, MAX_BATCH_SIZE},
        XOnlyPubKey,
    },
    SigHash,
};

use crate::sigcache::{CacheEntry, SignatureCache};


/// Commits one signature's cache entry after its batch has been verified.
#[derive(Debug)]
pub struct SigCacheCallback {
    cache: Arc<dyn SignatureCache>,
    entry: CacheEntry,
}

impl SigCacheCallback {
    /// Returns a callback that adds `entry` to `cache` when invoked.
    pub fn new(cache: Arc<dyn SignatureCache>, entry: CacheEntry) -> Self {
        Self { cache, entry }
    }

    /// Returns the cache entry this callback commits.
    pub fn entry(&self) -> CacheEntry {
        self.entry
    }

    /// Adds the entry to the cache, consuming the callback.
    pub fn invoke(self) {
        self.cache.set(self.entry);
    }
}

/// The backend context and the callbacks for the signatures it holds.
///
/// Only reachable through the verifier's mutex.
struct Batch<B> {
    backend: B,

    /// In the order their signatures were added.
    callbacks: Vec<SigCacheCallback>,
}

impl<B> Batch<B> {
    /// Invokes every pending callback in order, then clears them.
    fn execute_callbacks(&mut self) {
        let committed = self.callbacks.len();

        for callback in self.callbacks.drain(..) {
            callback.invoke();
        }

        tracing::debug!(committed, "committed verified schnorr signatures to the cache");
        metrics::counter!("signatures.schnorr.batch.committed").increment(committed as u64);
    }
}

/// A batch verification context for Schnorr signatures, shared between
/// validation threads.
///
/// `add` and `verify` each hold an exclusive lock for their whole duration.
/// The lock protects the backend context and the pending callbacks together,
/// so every add sees a queue length that matches the backend's batch.
pub struct BatchSchnorrVerifier<B = Secp256k1Batch> {
    inner: Mutex<Batch<B>>,

    /// The backend verifies and resets its batch when a signature is added
    /// while it holds this many.
    capacity: usize,
}

impl BatchSchnorrVerifier<Secp256k1Batch> {
    /// Creates a verifier using the `secp256k1` backend, sized to
    /// [`MAX_BATCH_SIZE`].
    pub fn new() -> Self {
        Self::with_capacity(MAX_BATCH_SIZE)
    }
}

impl Default for BatchSchnorrVerifier<Secp256k1Batch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BatchBackend> BatchSchnorrVerifier<B> {
    /// Creates a verifier whose backend batch holds `capacity` signatures.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "batch capacity must be positive");

        let blinding: [u8; 32] = rand::thread_rng().gen();
        let backend = B::create(capacity, blinding);

        Self {
            inner: Mutex::new(Batch {
                backend,
                callbacks: Vec::with_capacity(capacity),
            }),
            capacity,
        }
    }

    /// Returns the maximum number of pending signatures.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of signatures waiting for verification.
    pub fn pending_len(&self) -> usize {
        self.lock().callbacks.len()
    }

    /// Queues a Schnorr signature for batch verification.
    ///
    /// Returns `false` if the signature was not queued: the backend is
    /// unusable, `pubkey` is malformed, or the backend rejected the signature.
    /// The caller must verify the signature another way.
    ///
    /// Returns `true` if the signature was queued. It is *not* verified yet:
    /// `callback` runs after a later batch verification succeeds.
    pub fn add(
        &self,
        sig: &[u8],
        pubkey: &XOnlyPubKey,
        sighash: &SigHash,
        callback: SigCacheCallback,
    ) -> bool {
        let mut batch = self.lock();

        if !batch.backend.is_usable() {
            tracing::error!("schnorr batch verifier backend is unusable");
            return false;
        }

        let Some(pubkey) = batch.backend.parse_xonly_pubkey(pubkey) else {
            tracing::trace!(?pubkey, "rejected malformed x-only public key");
            return false;
        };

        if !batch.backend.add_schnorr(sig, sighash, &pubkey) {
            tracing::trace!(?sighash, "schnorr batch backend rejected signature");
            metrics::counter!("signatures.schnorr.batch.rejected").increment(1);
            return false;
        }

        // Correctness: a full queue means the backend verified and cleared the
        // whole batch before it accepted this signature.
        if batch.callbacks.len() == self.capacity {
            batch.execute_callbacks();
        }

        batch.callbacks.push(callback);

        tracing::trace!(pending = batch.callbacks.len(), "queued schnorr signature");
        metrics::counter!("signatures.schnorr.batch.queued").increment(1);

        true
    }

    /// Verifies every queued signature.
    ///
    /// On success, commits all pending cache entries and returns `true`.
    ///
    /// On failure, returns `false` and leaves the pending callbacks in place.
    /// At least one queued signature is invalid, so the caller must not trust
    /// any signature it queued since the last successful verification.
    pub fn verify(&self) -> bool {
        let mut batch = self.lock();

        if batch.backend.verify() {
            batch.execute_callbacks();
            true
        } else {
            tracing::debug!(
                pending = batch.callbacks.len(),
                "schnorr batch verification failed"
            );
            metrics::counter!("signatures.schnorr.batch.invalid_batch").increment(1);
            false
        }
    }

    fn lock(&self) -> MutexGuard<'_, Batch<B>> {
        self.inner
            .lock()
            .expect("batch verifier mutex should be unpoisoned")
    }
}

impl<B> fmt::Debug for BatchSchnorrVerifier<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchSchnorrVerifier")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<B> Drop for BatchSchnorrVerifier<B> {
    fn drop(&mut self) {
        // Pending callbacks are discarded without verifying their batch.
        if let Ok(batch) = self.inner.get_mut() {
            if !batch.callbacks.is_empty() {
                tracing::debug!(
                    discarded = batch.callbacks.len(),
                    "dropped schnorr batch verifier with unverified signatures"
                );
            }
        }
    }
}
