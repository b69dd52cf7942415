use sigbatch_test::vectors::{SchnorrVector, MALFORMED_XONLY_PUBKEY};

use crate::SigHash;

use super::super::{batch::*, XOnlyPubKey};

fn blinding() -> [u8; 32] {
    rand::random()
}

/// Adds `vector` to `batch`, panicking if its public key does not parse.
fn add(batch: &mut Secp256k1Batch, vector: &SchnorrVector) -> bool {
    let pubkey = batch
        .parse_xonly_pubkey(&XOnlyPubKey(vector.pubkey))
        .expect("vector keys are valid x-only keys");

    batch.add_schnorr(&vector.sig, &SigHash(vector.sighash), &pubkey)
}

#[test]
fn batch_verify() {
    let _init_guard = sigbatch_test::init();

    let mut batch = Secp256k1Batch::create(MAX_BATCH_SIZE, blinding());
    for seed in 0..32 {
        assert!(add(&mut batch, &SchnorrVector::valid(seed)));
    }

    assert_eq!(batch.len(), 32);
    assert!(batch.verify());
    assert!(batch.is_empty());
    assert!(batch.is_usable());
}

#[test]
fn empty_batch_verifies() {
    let _init_guard = sigbatch_test::init();

    let mut batch = Secp256k1Batch::create(3, blinding());

    assert!(batch.verify());
    assert!(batch.is_usable());
}

#[test]
fn bad_batch_verify_is_sticky() {
    let _init_guard = sigbatch_test::init();

    let mut batch = Secp256k1Batch::create(MAX_BATCH_SIZE, blinding());
    for seed in 0..8 {
        let vector = if seed == 4 {
            SchnorrVector::invalid(seed)
        } else {
            SchnorrVector::valid(seed)
        };
        assert!(add(&mut batch, &vector));
    }

    assert!(!batch.verify());
    assert!(!batch.is_usable());
    assert!(batch.is_empty());

    // No recovery, even for valid signatures.
    assert!(!add(&mut batch, &SchnorrVector::valid(100)));
    assert!(!batch.verify());
}

#[test]
fn full_batch_verifies_and_resets_on_add() {
    let _init_guard = sigbatch_test::init();

    let mut batch = Secp256k1Batch::create(3, blinding());
    for seed in 0..3 {
        assert!(add(&mut batch, &SchnorrVector::valid(seed)));
    }
    assert_eq!(batch.len(), batch.capacity());

    assert!(add(&mut batch, &SchnorrVector::valid(3)));
    assert_eq!(batch.len(), 1);
    assert!(batch.is_usable());
}

#[test]
fn full_bad_batch_fails_the_next_add() {
    let _init_guard = sigbatch_test::init();

    let mut batch = Secp256k1Batch::create(3, blinding());
    assert!(add(&mut batch, &SchnorrVector::valid(0)));
    assert!(add(&mut batch, &SchnorrVector::invalid(1)));
    assert!(add(&mut batch, &SchnorrVector::valid(2)));

    assert!(!add(&mut batch, &SchnorrVector::valid(3)));
    assert!(!batch.is_usable());
}

#[test]
fn malformed_inputs_are_rejected_without_state_change() {
    let _init_guard = sigbatch_test::init();

    let mut batch = Secp256k1Batch::create(3, blinding());
    assert!(batch
        .parse_xonly_pubkey(&XOnlyPubKey(MALFORMED_XONLY_PUBKEY))
        .is_none());

    let vector = SchnorrVector::valid(0);
    let pubkey = batch
        .parse_xonly_pubkey(&XOnlyPubKey(vector.pubkey))
        .expect("vector keys are valid x-only keys");

    assert!(!batch.add_schnorr(&vector.sig[..63], &SigHash(vector.sighash), &pubkey));
    assert!(batch.is_empty());
    assert!(batch.is_usable());

    assert!(batch.add_schnorr(&vector.sig, &SigHash(vector.sighash), &pubkey));
    assert!(batch.verify());
}
