//! Transaction signature checkers with batched Schnorr verification.
//!
//! Script validation asks a [`SignatureChecker`] to verify each signature it
//! finds. This crate provides three layered checkers:
//!
//! - [`TransactionSignatureChecker`] verifies every signature synchronously;
//! - [`CachingSignatureChecker`] consults a shared [`SignatureCache`] first, and
//!   records successful checks in it;
//! - [`BatchingCachingSignatureChecker`] also consults the cache, but queues
//!   Schnorr signatures that miss it into a shared [`BatchSchnorrVerifier`]
//!   instead of verifying them immediately.
//!
//! ## Correctness
//!
//! A `true` result from the batching checker's Schnorr path only means the
//! signature was *queued*. The owner of the [`BatchSchnorrVerifier`] must call
//! [`BatchSchnorrVerifier::verify`] once validation is complete, and must
//! treat validation as failed if it returns `false`. Until then, nothing from
//! the batch is written to the cache.

#![doc(html_root_url = "https://docs.rs/sigbatch_script")]
// Standard lints
#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![deny(clippy::await_holding_lock)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod checker;
pub mod sigcache;

pub use batch::{BatchSchnorrVerifier, SigCacheCallback};
pub use checker::{
    BatchingCachingSignatureChecker, CachingSignatureChecker, SignatureChecker,
    TransactionSignatureChecker,
};
pub use sigcache::{CacheEntry, InMemorySignatureCache, SignatureCache};
