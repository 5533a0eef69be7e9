//! Rate store.
//!
//! Persists calculator rate parameters in a storage backend, one key per
//! parameter under `loan/params/`, each value a JSON number. This is the
//! backing store of the content service's `getLoanCalculatorParams`.

use std::sync::Arc;

use aurum_storage::StorageBackend;
use tracing::{debug, info, warn};

use crate::error::RateStoreError;
use crate::params::{self, RateParameters};

/// Storage prefix for all rate parameters.
const PARAMS_PREFIX: &str = "loan/params/";

/// Typed access to rate parameters in a storage backend.
pub struct RateStore {
    storage: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for RateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateStore").finish_non_exhaustive()
    }
}

impl RateStore {
    /// Create a rate store over the given backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    fn param_key(name: &str) -> String {
        format!("{PARAMS_PREFIX}{name}")
    }

    /// Write each parameter that is not already stored.
    ///
    /// Values already present are left alone, so parameters changed at
    /// runtime survive a restart against persistent storage. Returns the
    /// number of keys written.
    ///
    /// # Errors
    ///
    /// Returns [`RateStoreError::Storage`] if the backend fails.
    pub async fn seed(&self, defaults: &RateParameters) -> Result<usize, RateStoreError> {
        let mut written = 0;
        for (name, value) in defaults.to_pairs() {
            let key = Self::param_key(&name);
            if self.storage.exists(&key).await? {
                debug!(key = %name, "rate parameter already stored, not seeding");
                continue;
            }
            self.storage.put(&key, &encode(&name, value)?).await?;
            written += 1;
        }
        if written > 0 {
            info!(written, "seeded rate parameters");
        }
        Ok(written)
    }

    /// All stored parameters as `(key, value)` pairs, sorted by key.
    ///
    /// Values that do not decode as a number are skipped with a warning, so
    /// one corrupt entry never hides the others.
    ///
    /// # Errors
    ///
    /// Returns [`RateStoreError::Storage`] if the backend fails.
    pub async fn pairs(&self) -> Result<Vec<(String, f64)>, RateStoreError> {
        let keys = self.storage.list(PARAMS_PREFIX).await?;
        let mut pairs = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(name) = key.strip_prefix(PARAMS_PREFIX) else {
                continue;
            };
            // A key can vanish between list and get; skip it.
            let Some(raw) = self.storage.get(&key).await? else {
                continue;
            };
            match decode(name, &raw) {
                Ok(value) => pairs.push((name.to_owned(), value)),
                Err(e) => warn!(error = %e, "skipping undecodable rate parameter"),
            }
        }
        Ok(pairs)
    }

    /// Rates currently in effect, with defaults for anything not stored.
    ///
    /// # Errors
    ///
    /// Same as [`pairs`](Self::pairs).
    pub async fn current(&self) -> Result<RateParameters, RateStoreError> {
        Ok(RateParameters::from_pairs(&self.pairs().await?))
    }

    /// Store a new value for a known parameter.
    ///
    /// # Errors
    ///
    /// Returns [`RateStoreError::UnknownKey`] for keys the calculator does not
    /// use, [`RateStoreError::Invalid`] for out-of-range values, and
    /// [`RateStoreError::Storage`] if the backend fails.
    pub async fn set(&self, name: &str, value: f64) -> Result<(), RateStoreError> {
        let value = params::validate_for_key(name, value)
            .ok_or_else(|| RateStoreError::UnknownKey {
                key: name.to_owned(),
            })?
            .map_err(|source| RateStoreError::Invalid {
                key: name.to_owned(),
                source,
            })?;

        self.storage
            .put(&Self::param_key(name), &encode(name, value)?)
            .await?;
        info!(key = %name, value, "rate parameter updated");
        Ok(())
    }
}

fn encode(name: &str, value: f64) -> Result<Vec<u8>, RateStoreError> {
    serde_json::to_vec(&value).map_err(|e| RateStoreError::Encoding {
        key: name.to_owned(),
        reason: e.to_string(),
    })
}

fn decode(name: &str, raw: &[u8]) -> Result<f64, RateStoreError> {
    serde_json::from_slice(raw).map_err(|e| RateStoreError::Encoding {
        key: name.to_owned(),
        reason: e.to_string(),
    })
}
