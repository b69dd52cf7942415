//! Errors that can occur when finishing a signature validation pass.

use thiserror::Error;

/// A batch of signatures failed verification.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum BatchError {
    /// At least one Schnorr signature accepted during the pass is invalid.
    ///
    /// The batch does not say which one, so every signature accepted during
    /// the pass must be treated as unverified.
    #[error("schnorr batch verification failed with {pending} signatures pending")]
    InvalidBatch {
        /// The number of signatures waiting in the failed batch.
        pending: usize,
    },
}
