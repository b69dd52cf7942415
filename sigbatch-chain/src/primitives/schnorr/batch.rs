//! Batch verification contexts for BIP-340 Schnorr signatures.
//!
//! Batch verification asks whether *all* signatures in some set are valid,
//! rather than asking whether *each* of them is valid. This allows sharing
//! computations among all signature verifications, performing less work overall
//! at the cost of higher latency (the entire batch must complete), complexity of
//! caller code (which must assemble a batch of signatures across work-items),
//! and loss of the ability to easily pinpoint failing signatures.
//!
//! A context has a fixed capacity. Adding a signature to a full context first
//! verifies and resets everything it holds, so callers can keep adding without
//! ever checking the length themselves. Once any verification fails, the
//! context is permanently unusable.

use std::fmt;

use secp256k1::{schnorr, Message, Secp256k1, VerifyOnly, XOnlyPublicKey};

use super::XOnlyPubKey;
use crate::SigHash;

/// The maximum number of scalar-point pairs in a batch for which Strauss'
/// multi-scalar multiplication algorithm is still faster per signature than
/// verifying each signature on its own.
pub const MAX_BATCH_SIZE: usize = 106;

/// An opaque batch verification context supplied by a cryptographic backend.
///
/// Implementations are destroyed exactly once, when they are dropped.
pub trait BatchBackend: Send + Sized {
    /// The backend-native form of a parsed x-only public key.
    type PublicKey;

    /// Creates an empty context that holds at most `capacity` signatures,
    /// blinded with the per-instance random value `blinding`.
    fn create(capacity: usize, blinding: [u8; 32]) -> Self;

    /// Returns `false` once a verification in this context has failed.
    ///
    /// An unusable context never becomes usable again.
    fn is_usable(&self) -> bool;

    /// Parses `pubkey` into its backend-native form, or returns `None` if it is
    /// not a valid x-only public key.
    fn parse_xonly_pubkey(&self, pubkey: &XOnlyPubKey) -> Option<Self::PublicKey>;

    /// Includes a `(sig, sighash, pubkey)` triple in the batch.
    ///
    /// If the context is already full, everything accumulated so far is
    /// verified and cleared first. Returns `false` if the signature is
    /// structurally malformed, the context is unusable, or that implicit
    /// verification failed.
    fn add_schnorr(&mut self, sig: &[u8], sighash: &SigHash, pubkey: &Self::PublicKey) -> bool;

    /// Verifies and clears every accumulated signature.
    ///
    /// Returns `true` if all of them are valid. On failure the context becomes
    /// unusable.
    fn verify(&mut self) -> bool;
}

/// A parsed signature, message, and public key, waiting in a batch.
#[derive(Clone, Debug)]
struct Item {
    sig: schnorr::Signature,
    msg: Message,
    pubkey: XOnlyPublicKey,
}

impl Item {
    fn is_valid(&self, secp: &Secp256k1<VerifyOnly>) -> bool {
        secp.verify_schnorr(&self.sig, &self.msg, &self.pubkey).is_ok()
    }
}

/// A [`BatchBackend`] over the `secp256k1` library.
///
/// The `secp256k1` bindings do not expose the upstream batch module, so
/// queued signatures are checked one by one inside a single [`verify`] call,
/// using a context that is randomized with the blinding value.
///
/// [`verify`]: BatchBackend::verify
pub struct Secp256k1Batch {
    /// A verification context, blinded at creation.
    secp: Secp256k1<VerifyOnly>,

    /// Signatures waiting for the next verification, at most `capacity` of them.
    items: Vec<Item>,

    capacity: usize,

    /// Cleared by the first failed verification.
    usable: bool,
}

impl Secp256k1Batch {
    /// Returns the number of signatures waiting in this batch.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no signatures are waiting in this batch.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the maximum number of signatures this batch holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Debug for Secp256k1Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Batch")
            .field("len", &self.items.len())
            .field("capacity", &self.capacity)
            .field("usable", &self.usable)
            .finish()
    }
}

impl BatchBackend for Secp256k1Batch {
    type PublicKey = XOnlyPublicKey;

    fn create(capacity: usize, blinding: [u8; 32]) -> Self {
        let mut secp = Secp256k1::verification_only();
        secp.seeded_randomize(&blinding);

        Self {
            secp,
            items: Vec::with_capacity(capacity),
            capacity,
            usable: true,
        }
    }

    fn is_usable(&self) -> bool {
        self.usable
    }

    fn parse_xonly_pubkey(&self, pubkey: &XOnlyPubKey) -> Option<XOnlyPublicKey> {
        XOnlyPublicKey::from_slice(pubkey.as_bytes()).ok()
    }

    fn add_schnorr(&mut self, sig: &[u8], sighash: &SigHash, pubkey: &XOnlyPublicKey) -> bool {
        if !self.usable {
            return false;
        }

        let Ok(sig) = schnorr::Signature::from_slice(sig) else {
            return false;
        };

        if self.items.len() == self.capacity && !self.verify() {
            return false;
        }

        self.items.push(Item {
            sig,
            msg: Message::from_digest(sighash.0),
            pubkey: *pubkey,
        });

        true
    }

    fn verify(&mut self) -> bool {
        if !self.usable {
            return false;
        }

        let batch_size = self.items.len();
        let secp = &self.secp;
        self.usable = self.items.drain(..).all(|item| item.is_valid(secp));

        tracing::trace!(batch_size, valid = self.usable, "verified secp256k1 schnorr batch");

        self.usable
    }
}
