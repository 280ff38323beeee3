use crate::canonicalizer::{CanonicalStep, Canonicalizer};
use crate::config::{Configuration, FeatureFlags};
use crate::converter::{Conversion, Converted, Converter};
use crate::decimal::Decimal;
use crate::dimension::{analyze, DimensionVector};
use crate::error::UcumError;
use crate::flattener::{flatten, AlphabeticalSorter, Sorter};
use crate::persistence::{cache_key, InMemoryPersistence, PersistenceRegistry};
use crate::printer::PrintStyle;
use crate::registry::{EssenceRegistry, Registry, SpecialFunction};
use crate::relation::{relate, Relation};
use crate::resource_limits::ResourceLimits;
use crate::special::SpecialFunctions;
use crate::term::Term;
use crate::validator::Validator;
use crate::UcumResult;
use moka::sync::Cache;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Molar masses (grams per mole) of named substances
pub trait MolarMassProvider: Send + Sync {
    fn molar_mass(&self, substance: &str) -> Option<Decimal>;
}

/// A term reduced to base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Canonicalized {
    /// Flattened canonical term, units in order of first occurrence
    pub term: Term,
    /// Sorted UCUM code of `term`, equal for equal units
    pub code: String,
    pub magnitude: Decimal,
    pub cf_prefix: Decimal,
    pub special: Option<SpecialFunction>,
    pub dimension: DimensionVector,
}

/// The UCUM engine.
///
/// Validates, canonicalizes and converts unit expressions against one
/// registry and configuration. Results are memoized through the persistence
/// providers, keyed by expression and feature flags.
pub struct Engine {
    registry: Arc<dyn Registry>,
    functions: SpecialFunctions,
    config: Configuration,
    persistence: PersistenceRegistry,
    definitions: Cache<String, Term>,
    molar_masses: Option<Arc<dyn MolarMassProvider>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(Configuration::default())
    }
}

impl Engine {
    /// Engine on the bundled registry with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine on the bundled registry with a custom configuration
    pub fn with_config(config: Configuration) -> Self {
        Self::from_parts(EssenceRegistry::shared(), SpecialFunctions::standard(), config)
    }

    /// Engine on any registry and function table. Caches in memory.
    pub fn from_parts(registry: Arc<dyn Registry>, functions: SpecialFunctions, config: Configuration) -> Self {
        let mut persistence = PersistenceRegistry::new();
        persistence.register(Arc::new(InMemoryPersistence::new(config.cache_capacity)));
        Self {
            registry,
            functions,
            definitions: Cache::new(config.cache_capacity),
            config,
            persistence,
            molar_masses: None,
        }
    }

    /// Replace the persistence providers. An empty registry disables caching.
    pub fn with_persistence(mut self, persistence: PersistenceRegistry) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn with_molar_mass_provider(mut self, provider: Arc<dyn MolarMassProvider>) -> Self {
        self.molar_masses = Some(provider);
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.config.flags
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.config.limits
    }

    pub fn registry(&self) -> &dyn Registry {
        self.registry.as_ref()
    }

    /// Parse and validate an expression
    pub fn validate(&self, input: &str) -> UcumResult<Term> {
        self.config.limits.check(input)?;
        let key = cache_key(input, &self.config.flags);
        if let Some(result) = self.persistence.get_validated(&key) {
            return result;
        }
        let result = Validator::new(self.registry.as_ref(), &self.config.flags, &self.config.limits).validate(input);
        self.persistence.save_validated(&key, &result);
        result
    }

    /// Validate many expressions in parallel. Output order follows input order.
    pub fn validate_batch<S: AsRef<str> + Sync>(&self, inputs: &[S]) -> Vec<UcumResult<Term>> {
        inputs.par_iter().map(|input| self.validate(input.as_ref())).collect()
    }

    pub fn canonicalize(&self, term: &Term) -> UcumResult<Canonicalized> {
        let step = self.canonical_step(term)?;
        let flat = flatten(&step.term)?;
        let code = Term::from(flat.clone().sorted(&AlphabeticalSorter).to_term()).to_string();
        Ok(Canonicalized {
            term: Term::from(flat.to_term()),
            code,
            magnitude: step.factor()?,
            cf_prefix: step.cf_prefix,
            special: step.special,
            dimension: analyze(&step.term)?,
        })
    }

    /// Sorted, flattened UCUM code of the canonical form
    pub fn canonical_code(&self, term: &Term) -> UcumResult<String> {
        self.canonical_code_with(term, &AlphabeticalSorter)
    }

    pub fn canonical_code_with(&self, term: &Term, sorter: &dyn Sorter) -> UcumResult<String> {
        let step = self.canonical_step(term)?;
        Ok(Term::from(flatten(&step.term)?.sorted(sorter).to_term()).to_string())
    }

    /// Express `factor` units of `from` in `to`
    pub fn convert(&self, factor: &Decimal, from: &Term, to: &Term) -> UcumResult<Converted> {
        let from_step = self.canonical_step(from)?;
        let to_step = self.canonical_step(to)?;
        let value = self
            .converter()
            .convert_steps(factor, from, &from_step, to, &to_step)?;
        Ok(Converted {
            factor: factor.clone(),
            from: from.clone(),
            to: to.clone(),
            value,
        })
    }

    /// Convert with `mol` standing for `coefficient` grams.
    ///
    /// Bypasses the cache: the canonical form depends on the coefficient.
    pub fn convert_with_molar_mass(
        &self,
        factor: &Decimal,
        from: &Term,
        to: &Term,
        coefficient: &Decimal,
    ) -> UcumResult<Converted> {
        let conversion = Conversion::new(factor.clone(), from.clone());
        self.converter()
            .with_molar_mass(coefficient.clone())
            .convert(&conversion, to)
    }

    /// Convert with the molar mass of `substance` from the configured provider
    pub fn convert_substance(&self, factor: &Decimal, from: &Term, to: &Term, substance: &str) -> UcumResult<Converted> {
        let coefficient = self
            .molar_masses
            .as_ref()
            .and_then(|provider| provider.molar_mass(substance))
            .ok_or_else(|| UcumError::MissingMolarMass {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        debug!(substance, %coefficient, "molar mass");
        self.convert_with_molar_mass(factor, from, to, &coefficient)
    }

    pub fn relation(&self, left: &Term, right: &Term) -> UcumResult<Relation> {
        let left_step = self.canonical_step(left)?;
        let right_step = self.canonical_step(right)?;
        relate(left, &left_step, right, &right_step)
    }

    pub fn check_commensurable(&self, left: &Term, right: &Term) -> UcumResult<bool> {
        Ok(self.relation(left, right)?.is_commensurable())
    }

    pub fn print(&self, term: &Term, style: PrintStyle) -> String {
        term.print(style)
    }

    /// Validate and canonicalize `codes` so later calls hit the cache.
    /// Returns how many succeeded; failures are logged.
    pub fn preheat<S: AsRef<str> + Sync>(&self, codes: &[S]) -> usize {
        codes
            .par_iter()
            .filter(|code| {
                let code: &str = code.as_ref();
                match self.validate(code).and_then(|term| self.canonical_step(&term)) {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(code, "preheat failed: {}", e);
                        false
                    }
                }
            })
            .count()
    }

    fn canonical_step(&self, term: &Term) -> UcumResult<CanonicalStep> {
        let key = cache_key(&term.to_string(), &self.config.flags);
        if let Some(step) = self.persistence.get_canonical(&key) {
            return Ok(step);
        }
        let step = Canonicalizer::new(self.registry.as_ref(), &self.functions)
            .with_definition_cache(&self.definitions)
            .with_limits(self.config.limits.clone())
            .canonicalize(term)?;
        self.persistence.save_canonical(&key, &step);
        Ok(step)
    }

    fn converter(&self) -> Converter<'_> {
        Converter::new(self.registry.as_ref(), &self.functions, &self.config.flags)
            .with_definition_cache(&self.definitions)
            .with_limits(self.config.limits.clone())
    }
}
