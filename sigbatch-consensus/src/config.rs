//! Configuration for signature validation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sigbatch_script::InMemorySignatureCache;

#[cfg(test)]
mod tests;

/// The default number of entries in the signature cache.
const DEFAULT_SIG_CACHE_MAX_ENTRIES: usize = 1 << 20;

/// Configuration for signature validation passes.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Should Schnorr signatures be verified in batches?
    ///
    /// # Details
    ///
    /// This option is `true` by default. Batch verification is faster, but a
    /// failed batch does not say which signature is invalid, so failing
    /// passes must be repeated without batching.
    ///
    /// ECDSA signatures are always verified one at a time.
    pub batch_schnorr: bool,

    /// The maximum number of entries in the signature cache.
    ///
    /// When the cache is full, new entries replace random old ones.
    /// Setting this to zero disables caching.
    pub sig_cache_max_entries: usize,
}

impl Config {
    /// Returns a new, empty signature cache sized by this config.
    pub fn signature_cache(&self) -> Arc<InMemorySignatureCache> {
        Arc::new(InMemorySignatureCache::new(self.sig_cache_max_entries))
    }
}

// we like our default configs to be explicit
#[allow(unknown_lints)]
#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Self {
            batch_schnorr: true,
            sig_cache_max_entries: DEFAULT_SIG_CACHE_MAX_ENTRIES,
        }
    }
}
