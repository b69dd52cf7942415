//! Signature validation passes.

use std::{fmt, sync::Arc};

use tracing::instrument;

use sigbatch_chain::{primitives::schnorr::XOnlyPubKey, Amount, PrecomputedTxData, SigHash};
use sigbatch_script::{
    BatchSchnorrVerifier, BatchingCachingSignatureChecker, CachingSignatureChecker,
    SignatureCache, SignatureChecker,
};

use crate::{error::BatchError, Config};

#[cfg(test)]
mod tests;

/// The signature checks of one unit of work, such as a block.
///
/// Checkers handed out by [`checker`] can be used from many threads at once.
/// Once every signature has been checked, call [`finish`] to verify any
/// signatures that are still waiting in the batch.
///
/// Dropping a pass without finishing it discards the waiting signatures,
/// without verifying or caching them.
///
/// [`checker`]: SignatureValidationPass::checker
/// [`finish`]: SignatureValidationPass::finish
pub struct SignatureValidationPass {
    cache: Arc<dyn SignatureCache>,

    /// `None` if Schnorr batching is disabled.
    batch: Option<BatchSchnorrVerifier>,
}

impl SignatureValidationPass {
    /// Starts a pass that checks signatures against `cache`.
    pub fn new(config: &Config, cache: Arc<dyn SignatureCache>) -> Self {
        let batch = config.batch_schnorr.then(BatchSchnorrVerifier::new);

        Self { cache, batch }
    }

    /// Returns `true` if this pass queues Schnorr signatures for batch
    /// verification.
    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    /// Returns the signature cache used by this pass.
    pub fn cache(&self) -> &Arc<dyn SignatureCache> {
        &self.cache
    }

    /// Returns the number of Schnorr signatures waiting for batch
    /// verification.
    pub fn pending_len(&self) -> usize {
        self.batch.as_ref().map_or(0, BatchSchnorrVerifier::pending_len)
    }

    /// Returns a checker for the input at `input_index` in `transaction`,
    /// which spends `amount`. `txdata` is the signing data precomputed for
    /// `transaction`.
    ///
    /// If `store` is set, successful checks are added to the cache.
    /// Otherwise, cache hits are erased.
    pub fn checker<'a, T: ?Sized>(
        &'a self,
        transaction: &'a T,
        input_index: usize,
        amount: Amount,
        store: bool,
        txdata: &'a PrecomputedTxData,
    ) -> PassChecker<'a, T> {
        let cache = self.cache.clone();

        match &self.batch {
            Some(batch) => PassChecker::Batching(BatchingCachingSignatureChecker::new(
                transaction,
                input_index,
                amount,
                store,
                txdata,
                cache,
                batch,
            )),
            None => PassChecker::Caching(CachingSignatureChecker::new(
                transaction,
                input_index,
                amount,
                store,
                txdata,
                cache,
            )),
        }
    }

    /// Verifies every signature that is still waiting in the batch, and
    /// caches them if they are all valid.
    ///
    /// Returns an error if any Schnorr signature accepted during this pass is
    /// invalid. Passes without batching always succeed.
    #[instrument(skip(self), fields(batching = self.is_batching()))]
    pub fn finish(self) -> Result<(), BatchError> {
        let Some(batch) = &self.batch else {
            return Ok(());
        };

        let pending = batch.pending_len();
        if batch.verify() {
            tracing::debug!(pending, "finished signature validation pass");
            Ok(())
        } else {
            Err(BatchError::InvalidBatch { pending })
        }
    }
}

impl fmt::Debug for SignatureValidationPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureValidationPass")
            .field("cache", &self.cache)
            .field("batch", &self.batch)
            .finish()
    }
}

/// A signature checker for one input, handed out by a
/// [`SignatureValidationPass`].
#[derive(Debug)]
pub enum PassChecker<'a, T: ?Sized> {
    /// Queues Schnorr signatures that miss the cache into the pass's batch.
    Batching(BatchingCachingSignatureChecker<'a, T>),

    /// Verifies signatures that miss the cache immediately.
    Caching(CachingSignatureChecker<'a, T>),
}

impl<T: ?Sized> SignatureChecker for PassChecker<'_, T> {
    fn verify_ecdsa_signature(&self, sig: &[u8], pubkey: &[u8], sighash: &SigHash) -> bool {
        match self {
            PassChecker::Batching(checker) => checker.verify_ecdsa_signature(sig, pubkey, sighash),
            PassChecker::Caching(checker) => checker.verify_ecdsa_signature(sig, pubkey, sighash),
        }
    }

    fn verify_schnorr_signature(
        &self,
        sig: &[u8],
        pubkey: &XOnlyPubKey,
        sighash: &SigHash,
    ) -> bool {
        match self {
            PassChecker::Batching(checker) => {
                checker.verify_schnorr_signature(sig, pubkey, sighash)
            }
            PassChecker::Caching(checker) => checker.verify_schnorr_signature(sig, pubkey, sighash),
        }
    }
}
