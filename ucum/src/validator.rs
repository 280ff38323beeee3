use crate::canonicalizer::check_special_usage;
use crate::config::FeatureFlags;
use crate::parser;
use crate::registry::Registry;
use crate::resource_limits::ResourceLimits;
use crate::term::Term;
use crate::UcumResult;
use tracing::debug;

/// Validates expressions: parsing, symbol resolution and the special unit
/// restrictions, without computing any magnitude.
///
/// Arbitrary units such as `[IU]` are valid here; they only fail once a
/// conversion needs their relation to base units.
pub struct Validator<'a> {
    registry: &'a dyn Registry,
    flags: &'a FeatureFlags,
    limits: &'a ResourceLimits,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a dyn Registry, flags: &'a FeatureFlags, limits: &'a ResourceLimits) -> Self {
        Self {
            registry,
            flags,
            limits,
        }
    }

    pub fn validate(&self, input: &str) -> UcumResult<Term> {
        let term = parser::parse(input, self.registry, self.flags, self.limits)?;
        check_special_usage(&term.to_mixed())?;
        debug!(input, canonical = term.is_canonical(), "validated");
        Ok(term)
    }
}
