//! External primitives used in signature verification.
//!
//! This contains re-exports of libraries used in the public API, as well as
//! refinement types for key material whose functionality is implemented
//! elsewhere.

pub mod schnorr;

pub use secp256k1;
