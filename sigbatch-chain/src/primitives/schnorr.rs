//! BIP-340 Schnorr signature primitives over secp256k1.

use std::fmt;

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

pub mod batch;


/// The length of a BIP-340 Schnorr signature, in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// A refinement type for `[u8; 32]` indicating that the bytes are meant to be
/// a BIP-340 x-only public key.
///
/// The bytes are not validated: parsing them into a curve point happens in the
/// verification backend, and may fail.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub struct XOnlyPubKey(pub [u8; 32]);

impl XOnlyPubKey {
    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for XOnlyPubKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<XOnlyPubKey> for [u8; 32] {
    fn from(pubkey: XOnlyPubKey) -> Self {
        pubkey.0
    }
}

impl From<secp256k1::XOnlyPublicKey> for XOnlyPubKey {
    fn from(pubkey: secp256k1::XOnlyPublicKey) -> Self {
        Self(pubkey.serialize())
    }
}

impl AsRef<[u8]> for XOnlyPubKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for XOnlyPubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("XOnlyPubKey")
            .field(&hex::encode(self.0))
            .finish()
    }
}
