//! Signature checkers used by script validation.
//!
//! Each checker answers one question per signature: is this signature valid
//! for this transaction input? The checkers are layered decorators around
//! [`TransactionSignatureChecker`], which does the actual cryptography.

use std::{fmt, sync::Arc};

use once_cell::sync::Lazy;

use sigbatch_chain::{
    primitives::{
        schnorr::{
            batch::{BatchBackend, Secp256k1Batch},
            XOnlyPubKey,
        },
        secp256k1::{self, ecdsa, schnorr, Message, PublicKey, Secp256k1, VerifyOnly},
    },
    Amount, PrecomputedTxData, SigHash,
};

use crate::{
    batch::{BatchSchnorrVerifier, SigCacheCallback},
    sigcache::{CacheEntry, SignatureCache},
};

#[cfg(test)]
mod tests;

/// A verification context shared by every synchronous checker.
static SECP: Lazy<Secp256k1<VerifyOnly>> = Lazy::new(Secp256k1::verification_only);

/// The signature checks a script interpreter needs.
pub trait SignatureChecker {
    /// Returns `true` if `sig` is a valid ECDSA signature over `sighash`,
    /// for the SEC1-encoded `pubkey`.
    ///
    /// `sig` is DER encoded, without a trailing sighash type byte.
    fn verify_ecdsa_signature(&self, sig: &[u8], pubkey: &[u8], sighash: &SigHash) -> bool;

    /// Returns `true` if `sig` is a valid BIP-340 Schnorr signature over
    /// `sighash`, for `pubkey`.
    ///
    /// Some checkers return `true` before the signature is verified: see
    /// [`BatchingCachingSignatureChecker`].
    fn verify_schnorr_signature(&self, sig: &[u8], pubkey: &XOnlyPubKey, sighash: &SigHash)
        -> bool;
}

/// Verifies the signatures of one transaction input, one at a time.
#[derive(Debug)]
pub struct TransactionSignatureChecker<'a, T: ?Sized> {
    transaction: &'a T,
    input_index: usize,
    amount: Amount,
    txdata: &'a PrecomputedTxData,
}

impl<'a, T: ?Sized> TransactionSignatureChecker<'a, T> {
    /// Returns a checker for the input at `input_index` in `transaction`,
    /// which spends `amount`.
    ///
    /// `txdata` is the signing data precomputed for `transaction`.
    pub fn new(
        transaction: &'a T,
        input_index: usize,
        amount: Amount,
        txdata: &'a PrecomputedTxData,
    ) -> Self {
        Self {
            transaction,
            input_index,
            amount,
            txdata,
        }
    }

    /// Returns the transaction being checked.
    pub fn transaction(&self) -> &'a T {
        self.transaction
    }

    /// Returns the index of the input being checked.
    pub fn input_index(&self) -> usize {
        self.input_index
    }

    /// Returns the amount spent by the input being checked.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the signing data precomputed for the transaction.
    pub fn txdata(&self) -> &'a PrecomputedTxData {
        self.txdata
    }
}

impl<T: ?Sized> SignatureChecker for TransactionSignatureChecker<'_, T> {
    fn verify_ecdsa_signature(&self, sig: &[u8], pubkey: &[u8], sighash: &SigHash) -> bool {
        let Ok(mut sig) = ecdsa::Signature::from_der_lax(sig) else {
            return false;
        };
        let Ok(pubkey) = PublicKey::from_slice(pubkey) else {
            return false;
        };

        // libsecp256k1 only accepts lower-S signatures
        sig.normalize_s();

        SECP.verify_ecdsa(&Message::from_digest(sighash.0), &sig, &pubkey)
            .is_ok()
    }

    fn verify_schnorr_signature(
        &self,
        sig: &[u8],
        pubkey: &XOnlyPubKey,
        sighash: &SigHash,
    ) -> bool {
        let Ok(sig) = schnorr::Signature::from_slice(sig) else {
            return false;
        };
        let Ok(pubkey) = secp256k1::XOnlyPublicKey::from_slice(pubkey.as_bytes()) else {
            return false;
        };

        SECP.verify_schnorr(&sig, &Message::from_digest(sighash.0), &pubkey)
            .is_ok()
    }
}

/// Checks signatures against a shared [`SignatureCache`] before verifying them.
pub struct CachingSignatureChecker<'a, T: ?Sized> {
    base: TransactionSignatureChecker<'a, T>,

    /// If set, successful checks are added to the cache, and cache hits are
    /// kept. Otherwise cache hits are erased.
    store: bool,

    cache: Arc<dyn SignatureCache>,
}

impl<'a, T: ?Sized> CachingSignatureChecker<'a, T> {
    /// Returns a caching checker for the input at `input_index` in
    /// `transaction`, which spends `amount`.
    pub fn new(
        transaction: &'a T,
        input_index: usize,
        amount: Amount,
        store: bool,
        txdata: &'a PrecomputedTxData,
        cache: Arc<dyn SignatureCache>,
    ) -> Self {
        Self {
            base: TransactionSignatureChecker::new(transaction, input_index, amount, txdata),
            store,
            cache,
        }
    }

    /// Returns the uncached checker.
    pub fn base(&self) -> &TransactionSignatureChecker<'a, T> {
        &self.base
    }

    /// Returns `true` if successful checks are stored in the cache.
    pub fn store(&self) -> bool {
        self.store
    }

    /// Returns the shared signature cache.
    pub fn cache(&self) -> &Arc<dyn SignatureCache> {
        &self.cache
    }

    /// Looks `entry` up, erasing it unless this checker stores entries.
    fn is_cached(&self, entry: &CacheEntry) -> bool {
        self.cache.get(entry, !self.store)
    }

    fn cache_if_valid(&self, entry: CacheEntry, is_valid: bool) -> bool {
        if is_valid && self.store {
            self.cache.set(entry);
        }

        is_valid
    }
}

impl<T: ?Sized> SignatureChecker for CachingSignatureChecker<'_, T> {
    fn verify_ecdsa_signature(&self, sig: &[u8], pubkey: &[u8], sighash: &SigHash) -> bool {
        let entry = CacheEntry::ecdsa(sighash, sig, pubkey);
        if self.is_cached(&entry) {
            return true;
        }

        let is_valid = self.base.verify_ecdsa_signature(sig, pubkey, sighash);
        self.cache_if_valid(entry, is_valid)
    }

    fn verify_schnorr_signature(
        &self,
        sig: &[u8],
        pubkey: &XOnlyPubKey,
        sighash: &SigHash,
    ) -> bool {
        let entry = CacheEntry::schnorr(sighash, sig, pubkey);
        if self.is_cached(&entry) {
            return true;
        }

        let is_valid = self.base.verify_schnorr_signature(sig, pubkey, sighash);
        self.cache_if_valid(entry, is_valid)
    }
}

impl<T: ?Sized> fmt::Debug for CachingSignatureChecker<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingSignatureChecker")
            .field("input_index", &self.base.input_index)
            .field("amount", &self.base.amount)
            .field("store", &self.store)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// A caching checker that queues Schnorr signatures into a shared
/// [`BatchSchnorrVerifier`] when they miss the cache.
///
/// # Correctness
///
/// A `true` result from [`verify_schnorr_signature`] can mean the signature
/// was only queued. It is valid only if the verifier's next
/// [`BatchSchnorrVerifier::verify`] also succeeds.
///
/// ECDSA signatures are still verified synchronously.
///
/// [`verify_schnorr_signature`]: SignatureChecker::verify_schnorr_signature
pub struct BatchingCachingSignatureChecker<'a, T: ?Sized, B = Secp256k1Batch> {
    caching: CachingSignatureChecker<'a, T>,
    batch: &'a BatchSchnorrVerifier<B>,
}

impl<'a, T: ?Sized, B: BatchBackend> BatchingCachingSignatureChecker<'a, T, B> {
    /// Returns a batching checker for the input at `input_index` in
    /// `transaction`, which spends `amount`.
    pub fn new(
        transaction: &'a T,
        input_index: usize,
        amount: Amount,
        store: bool,
        txdata: &'a PrecomputedTxData,
        cache: Arc<dyn SignatureCache>,
        batch: &'a BatchSchnorrVerifier<B>,
    ) -> Self {
        Self {
            caching: CachingSignatureChecker::new(
                transaction,
                input_index,
                amount,
                store,
                txdata,
                cache,
            ),
            batch,
        }
    }

    /// Returns the caching checker used for cache lookups and ECDSA.
    pub fn caching(&self) -> &CachingSignatureChecker<'a, T> {
        &self.caching
    }

    /// Returns the shared batch verifier.
    pub fn batch(&self) -> &'a BatchSchnorrVerifier<B> {
        self.batch
    }
}

impl<T: ?Sized, B: BatchBackend> SignatureChecker for BatchingCachingSignatureChecker<'_, T, B> {
    fn verify_ecdsa_signature(&self, sig: &[u8], pubkey: &[u8], sighash: &SigHash) -> bool {
        self.caching.verify_ecdsa_signature(sig, pubkey, sighash)
    }

    fn verify_schnorr_signature(
        &self,
        sig: &[u8],
        pubkey: &XOnlyPubKey,
        sighash: &SigHash,
    ) -> bool {
        let entry = CacheEntry::schnorr(sighash, sig, pubkey);
        if self.caching.is_cached(&entry) {
            tracing::trace!(?entry, "schnorr signature found in cache");
            metrics::counter!("signatures.schnorr.cache.hit").increment(1);
            return true;
        }

        let callback = SigCacheCallback::new(self.caching.cache.clone(), entry);
        self.batch.add(sig, pubkey, sighash, callback)
    }
}

impl<T: ?Sized, B> fmt::Debug for BatchingCachingSignatureChecker<'_, T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchingCachingSignatureChecker")
            .field("caching", &self.caching)
            .field("batch", &self.batch)
            .finish()
    }
}
