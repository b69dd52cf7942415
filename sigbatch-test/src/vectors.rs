//! Signature test vectors.
//!
//! Keys and digests are derived from a small integer seed, so every vector is
//! deterministic and cheap to regenerate.

#![allow(missing_docs)]

use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use secp256k1::{All, Keypair, Message, PublicKey, Secp256k1, SecretKey};

/// A signing context shared by all vectors.
static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

lazy_static! {
    /// Valid Schnorr signatures, each under a different key and digest.
    pub static ref VALID_SCHNORR: Vec<SchnorrVector> =
        (0..16).map(SchnorrVector::valid).collect();

    /// Structurally well-formed Schnorr signatures that fail verification.
    pub static ref INVALID_SCHNORR: Vec<SchnorrVector> =
        (0..16).map(SchnorrVector::invalid).collect();
}

/// X-only public key bytes that are larger than the field size, so they never
/// parse as a curve point.
pub const MALFORMED_XONLY_PUBKEY: [u8; 32] = [0xff; 32];

/// A BIP-340 Schnorr signature, the x-only key it verifies under, and the
/// digest it commits to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchnorrVector {
    pub sig: [u8; 64],
    pub pubkey: [u8; 32],
    pub sighash: [u8; 32],
}

impl SchnorrVector {
    /// A valid signature derived from `seed`.
    pub fn valid(seed: u32) -> Self {
        let sighash = sighash(seed);
        Self::sign(seed, sighash, sighash)
    }

    /// A signature derived from `seed` over a different digest than the one
    /// it claims to commit to.
    pub fn invalid(seed: u32) -> Self {
        let sighash = sighash(seed);
        let mut signed = sighash;
        signed[31] ^= 0x01;

        Self::sign(seed, signed, sighash)
    }

    fn sign(seed: u32, signed: [u8; 32], sighash: [u8; 32]) -> Self {
        let keypair = Keypair::from_secret_key(&SECP, &secret_key(seed));
        let sig = SECP.sign_schnorr_no_aux_rand(&Message::from_digest(signed), &keypair);
        let (pubkey, _parity) = keypair.x_only_public_key();

        Self {
            sig: sig.serialize(),
            pubkey: pubkey.serialize(),
            sighash,
        }
    }
}

/// A DER-encoded ECDSA signature, the compressed public key it verifies under,
/// and the digest it commits to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EcdsaVector {
    pub sig: Vec<u8>,
    pub pubkey: Vec<u8>,
    pub sighash: [u8; 32],
}

impl EcdsaVector {
    /// A valid signature derived from `seed`.
    pub fn valid(seed: u32) -> Self {
        let sighash = sighash(seed);
        Self::sign(seed, sighash, sighash)
    }

    /// A signature derived from `seed` over a different digest than the one
    /// it claims to commit to.
    pub fn invalid(seed: u32) -> Self {
        let sighash = sighash(seed);
        let mut signed = sighash;
        signed[0] ^= 0x80;

        Self::sign(seed, signed, sighash)
    }

    fn sign(seed: u32, signed: [u8; 32], sighash: [u8; 32]) -> Self {
        let secret = secret_key(seed);
        let sig = SECP.sign_ecdsa(&Message::from_digest(signed), &secret);

        Self {
            sig: sig.serialize_der().to_vec(),
            pubkey: PublicKey::from_secret_key(&SECP, &secret).serialize().to_vec(),
            sighash,
        }
    }
}

/// Returns a non-zero secret key below the curve order.
fn secret_key(seed: u32) -> SecretKey {
    let mut bytes = [0x11; 32];
    bytes[28..].copy_from_slice(&seed.to_be_bytes());

    SecretKey::from_slice(&bytes).expect("seeded bytes are a valid secret key")
}

fn sighash(seed: u32) -> [u8; 32] {
    let mut bytes = [0x5a; 32];
    bytes[..4].copy_from_slice(&seed.to_be_bytes());
    bytes
}
