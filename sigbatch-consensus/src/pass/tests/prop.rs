//! Randomised property tests for signature validation passes.

use std::sync::Arc;

use proptest::prelude::*;
use rayon::prelude::*;

use sigbatch_chain::{primitives::schnorr::XOnlyPubKey, Amount, PrecomputedTxData, SigHash};
use sigbatch_script::{CacheEntry, InMemorySignatureCache, SignatureCache, SignatureChecker};
use sigbatch_test::vectors::SchnorrVector;

use super::super::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A batching pass succeeds exactly when every signature is valid, and
    /// then caches all of them.
    #[test]
    fn batching_pass_agrees_with_individual_verification(
        validity in prop::collection::vec(any::<bool>(), 1..32),
    ) {
        let _init_guard = sigbatch_test::init();

        let vectors: Vec<_> = validity
            .iter()
            .zip(0..)
            .map(|(&valid, seed)| {
                if valid {
                    SchnorrVector::valid(seed)
                } else {
                    SchnorrVector::invalid(seed)
                }
            })
            .collect();

        let txdata = PrecomputedTxData::new(vec![Amount::zero(); vectors.len()]);
        let cache = Arc::new(InMemorySignatureCache::new(64));
        let pass = SignatureValidationPass::new(&Config::default(), cache.clone());

        let accepted = vectors
            .par_iter()
            .enumerate()
            .filter(|&(input_index, vector)| {
                pass.checker("a transaction", input_index, Amount::zero(), true, &txdata)
                    .verify_schnorr_signature(
                        &vector.sig,
                        &XOnlyPubKey(vector.pubkey),
                        &SigHash(vector.sighash),
                    )
            })
            .count();
        prop_assert_eq!(accepted, vectors.len());

        let all_valid = validity.iter().all(|valid| *valid);
        prop_assert_eq!(pass.finish().is_ok(), all_valid);

        for vector in &vectors {
            let entry = CacheEntry::schnorr(
                &SigHash(vector.sighash),
                &vector.sig,
                &XOnlyPubKey(vector.pubkey),
            );
            prop_assert_eq!(cache.get(&entry, false), all_valid);
        }
    }
}
