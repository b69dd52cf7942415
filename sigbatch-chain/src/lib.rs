//! Core data types and cryptographic primitives for batched signature verification.
//!
//! The wire formats of blocks and transactions live elsewhere. This crate only
//! holds the small, strongly typed values that signature verification consumes:
//! digests, amounts, per-transaction signing data, and public keys. It also
//! holds the batch verification backend that wraps `secp256k1`.

#![doc(html_root_url = "https://docs.rs/sigbatch_chain")]
// Standard lints
#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![deny(clippy::await_holding_lock)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate serde;

pub mod amount;
pub mod primitives;
pub mod sighash;
pub mod txdata;

pub use amount::Amount;
pub use sighash::SigHash;
pub use txdata::PrecomputedTxData;
