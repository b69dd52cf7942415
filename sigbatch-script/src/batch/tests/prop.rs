//! Randomised property tests for the Schnorr batch accumulator.

use proptest::prelude::*;

use sigbatch_chain::{primitives::schnorr::XOnlyPubKey, SigHash};

use crate::sigcache::CacheEntry;

use super::super::*;
use super::{callback, MockBatch, RecordingCache};

/// An operation on a shared accumulator.
#[derive(Copy, Clone, Debug)]
enum Op {
    AddValid,
    AddInvalid,
    AddMalformed,
    Verify,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => Just(Op::AddValid),
        1 => Just(Op::AddInvalid),
        1 => Just(Op::AddMalformed),
        2 => Just(Op::Verify),
    ]
}

/// The expected state of an accumulator and its backend.
#[derive(Debug, Default)]
struct Model {
    /// Validity of each queued signature, paired with its callback id.
    pending: Vec<(u8, bool)>,
    committed: Vec<u8>,
    usable: bool,
}

impl Model {
    fn new() -> Self {
        Self {
            usable: true,
            ..Self::default()
        }
    }

    fn flush(&mut self) -> bool {
        if self.pending.iter().all(|(_, valid)| *valid) {
            self.committed.extend(self.pending.drain(..).map(|(id, _)| id));
            true
        } else {
            self.usable = false;
            false
        }
    }

    fn add(&mut self, id: u8, valid: bool, capacity: usize) -> bool {
        if !self.usable {
            return false;
        }

        if self.pending.len() == capacity && !self.flush() {
            return false;
        }

        self.pending.push((id, valid));
        true
    }

    fn verify(&mut self) -> bool {
        self.usable && self.flush()
    }
}

proptest! {
    /// The accumulator commits exactly the signatures of successfully
    /// verified batches, in order, and never more than once.
    #[test]
    fn accumulator_matches_model(
        capacity in 1..8usize,
        ops in prop::collection::vec(op(), 0..64),
    ) {
        let _init_guard = sigbatch_test::init();

        let cache = RecordingCache::new();
        let verifier = BatchSchnorrVerifier::<MockBatch>::with_capacity(capacity);
        let mut model = Model::new();
        let sighash = SigHash([7; 32]);
        let pubkey = XOnlyPubKey([2; 32]);

        for (id, op) in ops.into_iter().enumerate() {
            let id = u8::try_from(id).expect("fewer than 256 operations");

            match op {
                Op::AddValid => {
                    let sig = MockBatch::valid_sig();
                    let added = verifier.add(&sig, &pubkey, &sighash, callback(&cache, id));
                    prop_assert_eq!(added, model.add(id, true, capacity));
                }
                Op::AddInvalid => {
                    let sig = MockBatch::invalid_sig();
                    let added = verifier.add(&sig, &pubkey, &sighash, callback(&cache, id));
                    prop_assert_eq!(added, model.add(id, false, capacity));
                }
                Op::AddMalformed => {
                    prop_assert!(!verifier.add(
                        &MockBatch::valid_sig(),
                        &MockBatch::MALFORMED_PUBKEY,
                        &sighash,
                        callback(&cache, id),
                    ));
                }
                Op::Verify => {
                    prop_assert_eq!(verifier.verify(), model.verify());
                }
            }

            prop_assert!(verifier.pending_len() <= capacity);
            prop_assert_eq!(verifier.pending_len(), model.pending.len());
        }

        let expected: Vec<_> = model.committed.iter().map(|id| CacheEntry([*id; 32])).collect();
        prop_assert_eq!(cache.sets(), expected);
    }
}
