//! Storage boundary for memoized canonicalizations and validations.
//!
//! Keys combine the printed expression with the active feature flags, so one
//! text validated under two flag sets never shares an entry.

use crate::canonicalizer::CanonicalStep;
use crate::config::FeatureFlags;
use crate::term::Term;
use crate::UcumResult;
use moka::sync::Cache;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Outcome of a validation, failures included
pub type ValidationResult = UcumResult<Term>;

/// A backend failure, as opposed to a miss
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("persistence backend unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt entry for key '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Key for `expression` validated or canonicalized under `flags`
pub fn cache_key(expression: &str, flags: &FeatureFlags) -> String {
    format!("{}::cfg={}", expression, flags.bitmask())
}

/// A store for memoized results.
///
/// `get_*` returns `Ok(None)` on a miss and `Err` when the store could not be
/// read, so callers can tell the two apart.
pub trait PersistenceProvider: Send + Sync {
    fn save_canonical(&self, key: &str, step: &CanonicalStep) -> Result<(), PersistenceError>;

    fn get_canonical(&self, key: &str) -> Result<Option<CanonicalStep>, PersistenceError>;

    fn save_validated(&self, key: &str, result: &ValidationResult) -> Result<(), PersistenceError>;

    fn get_validated(&self, key: &str) -> Result<Option<ValidationResult>, PersistenceError>;
}

/// Bounded in-process store. Concurrent writers to one key: the latest wins.
pub struct InMemoryPersistence {
    canonical: Cache<String, CanonicalStep>,
    validated: Cache<String, ValidationResult>,
}

impl InMemoryPersistence {
    pub fn new(capacity: u64) -> Self {
        Self {
            canonical: Cache::new(capacity),
            validated: Cache::new(capacity),
        }
    }
}

impl PersistenceProvider for InMemoryPersistence {
    fn save_canonical(&self, key: &str, step: &CanonicalStep) -> Result<(), PersistenceError> {
        self.canonical.insert(key.to_string(), step.clone());
        Ok(())
    }

    fn get_canonical(&self, key: &str) -> Result<Option<CanonicalStep>, PersistenceError> {
        Ok(self.canonical.get(key))
    }

    fn save_validated(&self, key: &str, result: &ValidationResult) -> Result<(), PersistenceError> {
        self.validated.insert(key.to_string(), result.clone());
        Ok(())
    }

    fn get_validated(&self, key: &str) -> Result<Option<ValidationResult>, PersistenceError> {
        Ok(self.validated.get(key))
    }
}

/// Ordered set of providers. Reads stop at the first hit; writes go to all.
///
/// A provider that fails is logged and skipped, so the caller falls back to
/// computing the result.
#[derive(Clone, Default)]
pub struct PersistenceRegistry {
    providers: Vec<Arc<dyn PersistenceProvider>>,
}

impl PersistenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn PersistenceProvider>) {
        self.providers.push(provider);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn get_canonical(&self, key: &str) -> Option<CanonicalStep> {
        self.read(key, |provider| provider.get_canonical(key))
    }

    pub fn get_validated(&self, key: &str) -> Option<ValidationResult> {
        self.read(key, |provider| provider.get_validated(key))
    }

    pub fn save_canonical(&self, key: &str, step: &CanonicalStep) {
        for provider in &self.providers {
            if let Err(e) = provider.save_canonical(key, step) {
                warn!(key, "failed to save canonical form: {}", e);
            }
        }
    }

    pub fn save_validated(&self, key: &str, result: &ValidationResult) {
        for provider in &self.providers {
            if let Err(e) = provider.save_validated(key, result) {
                warn!(key, "failed to save validation: {}", e);
            }
        }
    }

    fn read<T>(
        &self,
        key: &str,
        get: impl Fn(&dyn PersistenceProvider) -> Result<Option<T>, PersistenceError>,
    ) -> Option<T> {
        for provider in &self.providers {
            match get(provider.as_ref()) {
                Ok(Some(value)) => {
                    debug!(key, "cache hit");
                    return Some(value);
                }
                Ok(None) => {}
                Err(e) => warn!(key, "cache read failed, computing instead: {}", e),
            }
        }
        debug!(key, "cache miss");
        None
    }
}
