//! Signature validation passes for blocks and transactions.
//!
//! A validation pass checks every signature of one unit of work, usually a
//! block, using many worker threads. When Schnorr batching is enabled, the
//! pass owns one shared [`BatchSchnorrVerifier`], and Schnorr signatures that
//! are not already cached are queued into it instead of being verified one by
//! one.
//!
//! ## Correctness
//!
//! While batching, a signature check that returns `true` has only been
//! *accepted*. The whole pass is valid only if
//! [`SignatureValidationPass::finish`] also succeeds. If it fails, the
//! caller must discard every result of the pass, and re-verify its
//! signatures without batching to find the invalid ones.
//!
//! [`BatchSchnorrVerifier`]: sigbatch_script::BatchSchnorrVerifier

#![doc(html_root_url = "https://docs.rs/sigbatch_consensus")]
// Standard lints
#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![deny(clippy::await_holding_lock)]
#![forbid(unsafe_code)]

mod config;
mod pass;

pub mod error;

pub use config::Config;
pub use error::BatchError;
pub use pass::{PassChecker, SignatureValidationPass};
