use crate::canonicalizer::{CanonicalStep, Canonicalizer, Direction};
use crate::config::FeatureFlags;
use crate::decimal::Decimal;
use crate::dimension::analyze;
use crate::error::UcumError;
use crate::registry::Registry;
use crate::resource_limits::ResourceLimits;
use crate::special::SpecialFunctions;
use crate::term::Term;
use crate::UcumResult;
use moka::sync::Cache;
use serde::Serialize;
use tracing::{debug, warn};

/// A value expressed in a unit, waiting to be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub factor: Decimal,
    pub from: Term,
}

impl Conversion {
    pub fn new(factor: Decimal, from: Term) -> Self {
        Self { factor, from }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Converted {
    pub factor: Decimal,
    pub from: Term,
    pub to: Term,
    /// `factor` expressed in `to`
    pub value: Decimal,
}

/// Computes conversion factors between commensurable terms
pub struct Converter<'a> {
    registry: &'a dyn Registry,
    functions: &'a SpecialFunctions,
    definitions: Option<&'a Cache<String, Term>>,
    flags: &'a FeatureFlags,
    molar_mass: Option<Decimal>,
    limits: ResourceLimits,
}

impl<'a> Converter<'a> {
    pub fn new(registry: &'a dyn Registry, functions: &'a SpecialFunctions, flags: &'a FeatureFlags) -> Self {
        Self {
            registry,
            functions,
            definitions: None,
            flags,
            molar_mass: None,
            limits: ResourceLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_definition_cache(mut self, cache: &'a Cache<String, Term>) -> Self {
        self.definitions = Some(cache);
        self
    }

    /// Convert between mass and amount of substance through this coefficient
    /// (grams per mole). Ignored unless molar mass conversion is enabled.
    pub fn with_molar_mass(mut self, coefficient: Decimal) -> Self {
        if self.flags.mol_mass_conversion {
            self.molar_mass = Some(coefficient);
        } else {
            warn!(%coefficient, "molar mass conversion is disabled, ignoring coefficient");
        }
        self
    }

    pub fn convert(&self, conversion: &Conversion, to: &Term) -> UcumResult<Converted> {
        let canonicalizer = self.canonicalizer(self.molar_mass.clone());
        let from_step = canonicalizer.canonicalize(&conversion.from)?;
        let to_step = canonicalizer.canonicalize(to)?;
        let value = self.convert_steps(&conversion.factor, &conversion.from, &from_step, to, &to_step)?;
        Ok(Converted {
            factor: conversion.factor.clone(),
            from: conversion.from.clone(),
            to: to.clone(),
            value,
        })
    }

    /// Convert using steps canonicalized beforehand, e.g. taken from a cache
    pub fn convert_steps(
        &self,
        factor: &Decimal,
        from: &Term,
        from_step: &CanonicalStep,
        to: &Term,
        to_step: &CanonicalStep,
    ) -> UcumResult<Decimal> {
        let from_dimension = analyze(&from_step.term)?;
        let to_dimension = analyze(&to_step.term)?;
        if from_dimension != to_dimension {
            if self.needs_molar_mass(from, to) {
                return Err(UcumError::MissingMolarMass {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
            return Err(UcumError::NotCommensurable {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.check_special_context(from, from_step)?;
        self.check_special_context(to, to_step)?;

        let canonical = from_step.apply(factor, Direction::From, self.functions)?;
        let value = to_step.apply(&canonical, Direction::To, self.functions)?;
        debug!(%factor, from = %from, to = %to, %value, "converted");
        Ok(value)
    }

    fn canonicalizer(&self, molar_mass: Option<Decimal>) -> Canonicalizer<'a> {
        let canonicalizer = Canonicalizer::new(self.registry, self.functions).with_limits(self.limits.clone());
        let canonicalizer = match self.definitions {
            Some(cache) => canonicalizer.with_definition_cache(cache),
            None => canonicalizer,
        };
        match molar_mass {
            Some(coefficient) => canonicalizer.with_molar_mass(coefficient),
            None => canonicalizer,
        }
    }

    /// A special unit must stand alone: multiplied with anything that changes
    /// its dimension, the function no longer applies to a single quantity.
    fn check_special_context(&self, term: &Term, step: &CanonicalStep) -> UcumResult<()> {
        let Some(special) = &step.special else {
            return Ok(());
        };
        let function_unit = self.canonicalizer(None).canonicalize_definition(&special.unit)?;
        if analyze(&function_unit.term)? != analyze(&step.term)? {
            return Err(UcumError::AmbiguousSpecialUnitConversion(format!(
                "'{}' uses the special function '{}' inside a larger expression",
                term, special.name
            )));
        }
        Ok(())
    }

    /// True when the terms differ only by mole versus gram
    fn needs_molar_mass(&self, from: &Term, to: &Term) -> bool {
        if !self.flags.mol_mass_conversion || self.molar_mass.is_some() {
            return false;
        }
        let with_mass = self.canonicalizer(Some(Decimal::one()));
        match (with_mass.canonicalize(from), with_mass.canonicalize(to)) {
            (Ok(from), Ok(to)) => matches!(
                (analyze(&from.term), analyze(&to.term)),
                (Ok(a), Ok(b)) if a == b
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::registry::EssenceRegistry;
    use crate::resource_limits::ResourceLimits;

    fn term(input: &str) -> Term {
        parser::parse(
            input,
            EssenceRegistry::shared().as_ref(),
            &FeatureFlags::permissive(),
            &ResourceLimits::default(),
        )
        .unwrap()
    }

    fn convert_with(flags: &FeatureFlags, factor: &str, from: &str, to: &str, molar_mass: Option<i64>) -> UcumResult<Decimal> {
        let registry = EssenceRegistry::shared();
        let functions = SpecialFunctions::standard();
        let converter = Converter::new(registry.as_ref(), &functions, flags);
        let converter = match molar_mass {
            Some(m) => converter.with_molar_mass(Decimal::from(m)),
            None => converter,
        };
        let conversion = Conversion::new(factor.parse().unwrap(), term(from));
        converter.convert(&conversion, &term(to)).map(|c| c.value)
    }

    fn convert(factor: &str, from: &str, to: &str) -> UcumResult<Decimal> {
        convert_with(&FeatureFlags::default(), factor, from, to, None)
    }

    #[test]
    fn test_inch_to_meter() {
        assert_eq!(convert("1", "[in_i]", "m").unwrap().to_string(), "0.0254");
        assert_eq!(convert("1", "[in_i]2", "cm2").unwrap().to_string(), "6.4516");
    }

    #[test]
    fn test_celsius_to_kelvin() {
        assert_eq!(convert("1", "Cel", "K").unwrap().to_string(), "274.15");
        assert_eq!(convert("5", "Cel", "K").unwrap().to_string(), "278.15");
        assert_eq!(convert("274.15", "K", "Cel").unwrap().to_string(), "1");
    }

    #[test]
    fn test_between_special_units() {
        assert_eq!(convert("100", "Cel", "[degF]").unwrap().to_string(), "212");
        assert_eq!(convert("212", "[degF]", "Cel").unwrap().to_string(), "100");
        assert_eq!(convert("32", "[degF]", "Cel").unwrap().to_string(), "0");
        assert_eq!(convert("0", "[degRe]", "[degF]").unwrap().to_string(), "32");
    }

    #[test]
    fn test_not_commensurable() {
        assert!(matches!(convert("1", "m", "s"), Err(UcumError::NotCommensurable { .. })));
    }

    #[test]
    fn test_special_unit_in_product_is_ambiguous() {
        assert!(matches!(
            convert("1", "Cel.m", "K.m"),
            Err(UcumError::AmbiguousSpecialUnitConversion(_))
        ));
    }

    #[test]
    fn test_molar_mass() {
        let flags = FeatureFlags::default();
        assert_eq!(convert_with(&flags, "1", "mol", "g", Some(5)).unwrap().to_string(), "5");
        assert_eq!(convert_with(&flags, "1", "g", "mol", Some(5)).unwrap().to_string(), "0.2");
        assert!(matches!(
            convert_with(&flags, "1", "mol", "g", None),
            Err(UcumError::MissingMolarMass { .. })
        ));
        assert_eq!(
            convert("1", "mol", "1").unwrap().to_string(),
            "602214076000000000000000"
        );
    }

    #[test]
    fn test_molar_mass_ignored_when_disabled() {
        let flags = FeatureFlags {
            mol_mass_conversion: false,
            ..FeatureFlags::default()
        };
        assert!(matches!(
            convert_with(&flags, "1", "mol", "g", Some(5)),
            Err(UcumError::NotCommensurable { .. })
        ));
    }

    #[test]
    fn test_prefixed_non_metric() {
        assert_eq!(convert("1", "M[in_i]", "cm").unwrap().to_string(), "2540000");
    }
}
