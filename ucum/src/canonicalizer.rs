//! Reduction of terms to base units
//!
//! Canonicalizing a term:
//! 1. Replaces every defined unit by its base form, recursively
//! 2. Folds prefixes, integer factors and unit magnitudes into one magnitude
//! 3. Records the conversion function of a special unit, if one is present
//!
//! The result keeps the structure of the input (no flattening). Parentheses
//! and annotations are display-only and are dropped.

use crate::decimal::Decimal;
use crate::error::UcumError;
use crate::parser;
use crate::registry::{DefinedUnit, Registry, SpecialFunction, UnitClass, UnitDefinition};
use crate::resource_limits::ResourceLimits;
use crate::special::SpecialFunctions;
use crate::term::{CanonicalTerm, Component, MixedTerm, Operator, Term, TermNode, UnitNode};
use crate::UcumResult;
use moka::sync::Cache;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// Definitions may refer to definitions; anything deeper than this is cyclic
const MAX_DEFINITION_DEPTH: usize = 32;

/// Code of the unit that is replaced by grams during a molar mass conversion
pub(crate) const MOLE: &str = "mol";

/// Which way a value flows through a special unit's function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Value in the unit to a canonical value
    From,
    /// Canonical value to a value in the unit
    To,
}

/// Result of canonicalizing a term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalStep {
    pub term: CanonicalTerm,
    /// Factor from the unit to its canonical form, or for a special unit the
    /// factor applied after its function. Divided by `divisor`.
    pub magnitude: Decimal,
    /// Kept apart from `magnitude` so quotients like `K/9` stay exact
    pub divisor: Decimal,
    /// Factor applied before a special unit's function
    pub cf_prefix: Decimal,
    pub special: Option<SpecialFunction>,
}

impl CanonicalStep {
    fn linear(term: CanonicalTerm, magnitude: Decimal) -> Self {
        Self::ratio(term, magnitude, Decimal::one())
    }

    fn ratio(term: CanonicalTerm, magnitude: Decimal, divisor: Decimal) -> Self {
        Self {
            term,
            magnitude,
            divisor,
            cf_prefix: Decimal::one(),
            special: None,
        }
    }

    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }

    /// `magnitude / divisor`, rounded only when the quotient does not terminate
    pub fn factor(&self) -> UcumResult<Decimal> {
        divide(&self.magnitude, &self.divisor)
    }

    /// Same overall factor and prefix factor, compared without dividing
    pub fn same_scale(&self, other: &Self) -> bool {
        (&self.magnitude * &other.divisor)
            .compare(&(&other.magnitude * &self.divisor))
            .is_eq()
            && self.cf_prefix.compare(&other.cf_prefix).is_eq()
    }

    /// Raise to an integer power, multiplying every exponent of the term
    fn raise(self, exponent: i32, limits: &ResourceLimits) -> UcumResult<Self> {
        if exponent == 1 {
            return Ok(self);
        }
        limits.check_exponent(exponent)?;
        if let Some(special) = &self.special {
            return Err(UcumError::InvalidSpecialUnitUsage(format!(
                "special unit based on '{}' cannot be raised to power {}",
                special.name, exponent
            )));
        }
        let term = raise_to_power(self.term, exponent)?;
        let power = absolute(exponent)?;
        let (magnitude, divisor) = if exponent < 0 {
            (self.divisor, self.magnitude)
        } else {
            (self.magnitude, self.divisor)
        };
        Ok(Self::ratio(term, magnitude.pow(power)?, divisor.pow(power)?))
    }

    /// Push `value` through this step.
    ///
    /// `From`: `magnitude × f(value × cf_prefix) / divisor` for a special
    /// unit, else `value × magnitude / divisor`. `To` applies the inverse.
    /// Multiplications come first so that terminating quotients stay exact.
    pub fn apply(
        &self,
        value: &Decimal,
        direction: Direction,
        functions: &SpecialFunctions,
    ) -> UcumResult<Decimal> {
        match (&self.special, direction) {
            (None, Direction::From) => divide(&multiply(value, &self.magnitude), &self.divisor),
            (None, Direction::To) => divide(&multiply(value, &self.divisor), &self.magnitude),
            (Some(special), Direction::From) => {
                let function = functions.lookup(&special.name)?;
                let canonical = function.to_canonical(&(value * &self.cf_prefix))?;
                divide(&multiply(&canonical, &self.magnitude), &self.divisor)
            }
            (Some(special), Direction::To) => {
                let function = functions.lookup(&special.name)?;
                let unscaled = divide(&multiply(value, &self.divisor), &self.magnitude)?;
                let scaled = function.from_canonical(&unscaled)?;
                divide(&scaled, &self.cf_prefix)
            }
        }
    }
}

/// Reject special units that carry an exponent or sit inside a division.
///
/// Their functions are non-linear, so neither has a defined meaning.
pub fn check_special_usage(term: &MixedTerm) -> UcumResult<()> {
    let mut violation = None;
    term.for_each_component(&mut |component, in_division| {
        if violation.is_some() {
            return;
        }
        let unit = match component.unit() {
            UnitNode::NoPrefix(unit) | UnitNode::Prefixed(_, unit) => unit,
            UnitNode::Integer(_) => return,
        };
        if !unit.is_special() {
            return;
        }
        if component.exponent() != 1 {
            violation = Some(format!(
                "'{}' cannot carry exponent {}",
                unit.code(),
                component.exponent()
            ));
        } else if in_division {
            violation = Some(format!("'{}' cannot be used inside a division", unit.code()));
        }
    });
    match violation {
        Some(message) => Err(UcumError::InvalidSpecialUnitUsage(message)),
        None => Ok(()),
    }
}

/// Canonicalizes terms against one registry and function table
pub struct Canonicalizer<'a> {
    registry: &'a dyn Registry,
    functions: &'a SpecialFunctions,
    definitions: Option<&'a Cache<String, Term>>,
    molar_mass: Option<Decimal>,
    limits: ResourceLimits,
}

impl<'a> Canonicalizer<'a> {
    pub fn new(registry: &'a dyn Registry, functions: &'a SpecialFunctions) -> Self {
        Self {
            registry,
            functions,
            definitions: None,
            molar_mass: None,
            limits: ResourceLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Reuse parsed base forms across calls
    pub fn with_definition_cache(mut self, cache: &'a Cache<String, Term>) -> Self {
        self.definitions = Some(cache);
        self
    }

    /// Treat `mol` as `coefficient` grams
    pub fn with_molar_mass(mut self, coefficient: Decimal) -> Self {
        self.molar_mass = Some(coefficient);
        self
    }

    pub fn canonicalize(&self, term: &Term) -> UcumResult<CanonicalStep> {
        let mixed = term.to_mixed();
        check_special_usage(&mixed)?;
        self.step(&mixed, 0)
    }

    /// Canonicalize a base form as written in the registry, e.g. `K/9`
    pub fn canonicalize_definition(&self, form: &str) -> UcumResult<CanonicalStep> {
        self.step(&self.base_form(form)?, 0)
    }

    /// Canonicalize then push `factor` through the result
    pub fn canonicalize_value(
        &self,
        term: &Term,
        factor: &Decimal,
        direction: Direction,
    ) -> UcumResult<(CanonicalStep, Decimal)> {
        let step = self.canonicalize(term)?;
        let value = step.apply(factor, direction, self.functions)?;
        Ok((step, value))
    }

    fn step(&self, term: &MixedTerm, depth: usize) -> UcumResult<CanonicalStep> {
        match term {
            TermNode::Component(component) => self.component(component, depth),
            TermNode::Annot(inner, _) | TermNode::Paren(inner) => self.step(inner, depth),
            TermNode::AnnotOnly(_) => Ok(CanonicalStep::linear(TermNode::unity(), Decimal::one())),
            TermNode::UnaryDiv(inner) => {
                let inner = self.step(inner, depth)?;
                if inner.is_special() {
                    return Err(UcumError::InvalidSpecialUnitUsage(
                        "special unit cannot be used inside a division".to_string(),
                    ));
                }
                Ok(CanonicalStep::ratio(
                    TermNode::unary_div(inner.term),
                    inner.divisor,
                    inner.magnitude,
                ))
            }
            TermNode::Binary(left, op, right) => {
                let left = self.step(left, depth)?;
                let right = self.step(right, depth)?;
                combine(left, *op, right)
            }
        }
    }

    fn component(&self, component: &Component<UnitDefinition>, depth: usize) -> UcumResult<CanonicalStep> {
        let exponent = component.exponent();
        self.limits.check_exponent(exponent)?;
        let (prefix, unit) = match component.unit() {
            UnitNode::Integer(n) => {
                let power = Decimal::from(*n).pow(absolute(exponent)?)?;
                return Ok(if exponent < 0 {
                    CanonicalStep::ratio(TermNode::unity(), Decimal::one(), power)
                } else {
                    CanonicalStep::linear(TermNode::unity(), power)
                });
            }
            UnitNode::NoPrefix(unit) => (None, unit),
            UnitNode::Prefixed(prefix, unit) => (Some(prefix), unit),
        };

        let step = match unit {
            UnitDefinition::Base(base) => {
                CanonicalStep::linear(TermNode::unit(UnitNode::NoPrefix(Arc::clone(base))), Decimal::one())
            }
            UnitDefinition::Defined(defined) => self.definition(defined, depth)?,
        };

        let step = match prefix {
            None => step,
            Some(prefix) if step.is_special() => CanonicalStep {
                cf_prefix: &step.cf_prefix * &prefix.value,
                ..step
            },
            Some(prefix) => CanonicalStep {
                magnitude: &step.magnitude * &prefix.value,
                ..step
            },
        };
        step.raise(exponent, &self.limits)
    }

    fn definition(&self, unit: &Arc<DefinedUnit>, depth: usize) -> UcumResult<CanonicalStep> {
        if depth >= MAX_DEFINITION_DEPTH {
            return Err(UcumError::ResourceLimitExceeded {
                limit_name: "definition_depth".to_string(),
                limit_value: MAX_DEFINITION_DEPTH.to_string(),
                actual_value: format!("more while resolving '{}'", unit.code),
            });
        }
        trace!(unit = %unit.code, base_form = %unit.base_form, depth, "resolving definition");

        if unit.code == MOLE {
            if let Some(coefficient) = &self.molar_mass {
                let gram = self.resolve_code("g")?;
                let inner = self.step(&gram, depth + 1)?;
                return Ok(CanonicalStep::ratio(
                    inner.term,
                    &inner.magnitude * coefficient,
                    inner.divisor,
                ));
            }
        }

        match &unit.class {
            UnitClass::Arbitrary => Err(UcumError::ArbitraryUnit(unit.code.clone())),
            UnitClass::Special(function) => {
                // fail early for functions the table lacks
                self.functions.lookup(&function.name)?;
                let base_form = self.base_form(&function.unit)?;
                let inner = self.step(&base_form, depth + 1)?;
                if inner.is_special() {
                    return Err(UcumError::AmbiguousSpecialUnitConversion(format!(
                        "'{}' is defined on another special unit",
                        unit.code
                    )));
                }
                Ok(CanonicalStep {
                    term: inner.term,
                    magnitude: &inner.magnitude * &function.value,
                    divisor: inner.divisor,
                    cf_prefix: Decimal::one(),
                    special: Some(function.clone()),
                })
            }
            UnitClass::Derived | UnitClass::Dimless => {
                let base_form = self.base_form(&unit.base_form)?;
                let inner = self.step(&base_form, depth + 1)?;
                Ok(CanonicalStep {
                    magnitude: &inner.magnitude * &unit.magnitude,
                    ..inner
                })
            }
        }
    }

    fn base_form(&self, form: &str) -> UcumResult<MixedTerm> {
        let term = match self.definitions {
            Some(cache) => match cache.get(form) {
                Some(term) => term,
                None => {
                    let term = parser::parse_definition(form, self.registry)?;
                    cache.insert(form.to_string(), term.clone());
                    term
                }
            },
            None => parser::parse_definition(form, self.registry)?,
        };
        Ok(term.into_mixed())
    }

    fn resolve_code(&self, code: &str) -> UcumResult<MixedTerm> {
        let unit = self
            .registry
            .lookup_unit(code)
            .ok_or_else(|| UcumError::unresolved(code))?;
        Ok(TermNode::unit(UnitNode::NoPrefix(unit)))
    }
}

fn combine(left: CanonicalStep, op: Operator, right: CanonicalStep) -> UcumResult<CanonicalStep> {
    let term = TermNode::combine(left.term.clone(), op, right.term.clone());
    match (op, left.special.clone(), right.special.clone()) {
        (Operator::Mul, Some(a), Some(b)) => Err(UcumError::AmbiguousSpecialUnitConversion(format!(
            "'{}' and '{}' cannot be multiplied",
            a.name, b.name
        ))),
        (Operator::Div, Some(_), _) | (Operator::Div, _, Some(_)) => Err(
            UcumError::InvalidSpecialUnitUsage("special unit cannot be used inside a division".to_string()),
        ),
        // factors next to a special unit apply before its function
        (Operator::Mul, Some(special), None) => Ok(CanonicalStep {
            term,
            cf_prefix: &left.cf_prefix * &right.factor()?,
            magnitude: left.magnitude,
            divisor: left.divisor,
            special: Some(special),
        }),
        (Operator::Mul, None, Some(special)) => Ok(CanonicalStep {
            term,
            cf_prefix: &right.cf_prefix * &left.factor()?,
            magnitude: right.magnitude,
            divisor: right.divisor,
            special: Some(special),
        }),
        (Operator::Mul, None, None) => Ok(CanonicalStep::ratio(
            term,
            &left.magnitude * &right.magnitude,
            &left.divisor * &right.divisor,
        )),
        (Operator::Div, None, None) => Ok(CanonicalStep::ratio(
            term,
            &left.magnitude * &right.divisor,
            &left.divisor * &right.magnitude,
        )),
    }
}

fn is_exact_one(value: &Decimal) -> bool {
    !value.is_limited() && value.compare(&Decimal::one()).is_eq()
}

/// `value × factor`; an exact factor of one leaves `value` untouched
fn multiply(value: &Decimal, factor: &Decimal) -> Decimal {
    if is_exact_one(factor) {
        value.clone()
    } else {
        value * factor
    }
}

/// `value / divisor`; an exact divisor of one leaves `value` untouched
fn divide(value: &Decimal, divisor: &Decimal) -> UcumResult<Decimal> {
    if is_exact_one(divisor) {
        Ok(value.clone())
    } else {
        value.checked_div(divisor)
    }
}

fn absolute(exponent: i32) -> UcumResult<i32> {
    exponent
        .checked_abs()
        .ok_or_else(|| UcumError::ExponentOverflow(exponent.to_string()))
}

/// Multiply every exponent in `term` by `exponent`
pub fn raise_to_power(term: CanonicalTerm, exponent: i32) -> UcumResult<CanonicalTerm> {
    let overflow = |unit: &str| UcumError::ExponentOverflow(unit.to_string());
    Ok(match term {
        TermNode::Component(component) => TermNode::Component(match component {
            Component::NoExponent(UnitNode::Integer(n)) => Component::NoExponent(UnitNode::Integer(n)),
            Component::NoExponent(unit) => Component::Exponent(unit, exponent),
            Component::Exponent(unit, current) => {
                let raised = current
                    .checked_mul(exponent)
                    .ok_or_else(|| overflow(&format!("{}^{}", current, exponent)))?;
                Component::Exponent(unit, raised)
            }
        }),
        TermNode::Annot(inner, text) => TermNode::Annot(Box::new(raise_to_power(*inner, exponent)?), text),
        TermNode::AnnotOnly(text) => TermNode::AnnotOnly(text),
        TermNode::Paren(inner) => TermNode::Paren(Box::new(raise_to_power(*inner, exponent)?)),
        TermNode::UnaryDiv(inner) => TermNode::UnaryDiv(Box::new(raise_to_power(*inner, exponent)?)),
        TermNode::Binary(left, op, right) => TermNode::Binary(
            Box::new(raise_to_power(*left, exponent)?),
            op,
            Box::new(raise_to_power(*right, exponent)?),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureFlags;
    use crate::flattener::flatten;
    use crate::registry::EssenceRegistry;
    use crate::resource_limits::ResourceLimits;

    fn parse(input: &str) -> Term {
        parser::parse(
            input,
            EssenceRegistry::shared().as_ref(),
            &FeatureFlags::default(),
            &ResourceLimits::default(),
        )
        .unwrap()
    }

    fn canonicalize(input: &str) -> UcumResult<CanonicalStep> {
        let registry = EssenceRegistry::shared();
        let functions = SpecialFunctions::standard();
        Canonicalizer::new(registry.as_ref(), &functions).canonicalize(&parse(input))
    }

    #[test]
    fn test_base_unit_is_unchanged() {
        let step = canonicalize("m.s-1").unwrap();
        assert_eq!(step.magnitude, Decimal::one());
        assert_eq!(Term::from(step.term).to_string(), "m.s-1");
        assert!(step.special.is_none());
    }

    #[test]
    fn test_prefix_moves_into_magnitude() {
        let step = canonicalize("km").unwrap();
        assert_eq!(step.magnitude.to_string(), "1000");
        assert_eq!(Term::from(step.term).to_string(), "m");
    }

    #[test]
    fn test_inch_squared() {
        let step = canonicalize("[in_i]2").unwrap();
        assert_eq!(step.magnitude.to_string(), "0.00064516");
        assert_eq!(Term::from(step.term).to_string(), "m2");
    }

    #[test]
    fn test_structure_is_kept() {
        let step = canonicalize("N").unwrap();
        assert_eq!(step.magnitude.to_string(), "1000");
        assert_eq!(Term::from(step.term).to_string(), "g.m/s2");
    }

    #[test]
    fn test_integer_factor() {
        let step = canonicalize("10.L").unwrap();
        assert_eq!(step.magnitude.to_string(), "0.01");
    }

    #[test]
    fn test_annotation_is_unity() {
        let step = canonicalize("{rbc}").unwrap();
        assert_eq!(step.magnitude, Decimal::one());
        assert!(flatten(&step.term).unwrap().is_unity());
    }

    #[test]
    fn test_celsius_is_special() {
        let step = canonicalize("Cel").unwrap();
        let special = step.special.clone().unwrap();
        assert_eq!(special.name, "Cel");
        assert_eq!(Term::from(step.term.clone()).to_string(), "K");

        let functions = SpecialFunctions::standard();
        let kelvin = step.apply(&Decimal::from(5), Direction::From, &functions).unwrap();
        assert_eq!(kelvin.to_string(), "278.15");
        let back = step.apply(&kelvin, Direction::To, &functions).unwrap();
        assert_eq!(back.to_string(), "5");
    }

    #[test]
    fn test_prefixed_special_unit_scales_before_function() {
        let step = canonicalize("mCel").unwrap();
        let functions = SpecialFunctions::standard();
        let kelvin = step.apply(&Decimal::from(1000), Direction::From, &functions).unwrap();
        assert_eq!(kelvin.to_string(), "274.15");
    }

    #[test]
    fn test_special_unit_restrictions() {
        assert!(matches!(canonicalize("Cel2"), Err(UcumError::InvalidSpecialUnitUsage(_))));
        assert!(matches!(canonicalize("m/Cel"), Err(UcumError::InvalidSpecialUnitUsage(_))));
        assert!(matches!(canonicalize("/[pH]"), Err(UcumError::InvalidSpecialUnitUsage(_))));
        assert!(matches!(
            canonicalize("Cel.[degF]"),
            Err(UcumError::AmbiguousSpecialUnitConversion(_))
        ));
    }

    #[test]
    fn test_arbitrary_unit_fails() {
        assert!(matches!(canonicalize("[IU]"), Err(UcumError::ArbitraryUnit(_))));
        assert!(matches!(canonicalize("[IU]/L"), Err(UcumError::ArbitraryUnit(_))));
    }

    #[test]
    fn test_exponent_overflow() {
        let term: CanonicalTerm = TermNode::Component(Component::Exponent(UnitNode::Integer(2), 1));
        assert!(raise_to_power(term, 2).is_ok());

        let registry = EssenceRegistry::shared();
        let meter = match registry.lookup_unit("m") {
            Some(UnitDefinition::Base(base)) => base,
            other => panic!("unexpected {:?}", other),
        };
        let term = TermNode::Component(Component::Exponent(UnitNode::NoPrefix(meter), i32::MAX));
        assert!(matches!(raise_to_power(term, 2), Err(UcumError::ExponentOverflow(_))));
    }

    #[test]
    fn test_molar_mass_substitution() {
        let registry = EssenceRegistry::shared();
        let functions = SpecialFunctions::standard();
        let step = Canonicalizer::new(registry.as_ref(), &functions)
            .with_molar_mass(Decimal::from(18))
            .canonicalize(&parse("mmol"))
            .unwrap();
        assert_eq!(Term::from(step.term).to_string(), "g");
        assert_eq!(step.magnitude.to_string(), "0.018");
    }

    #[test]
    fn test_definition_cache_is_filled() {
        let registry = EssenceRegistry::shared();
        let functions = SpecialFunctions::standard();
        let cache = Cache::new(100);
        let canonicalizer = Canonicalizer::new(registry.as_ref(), &functions).with_definition_cache(&cache);
        let first = canonicalizer.canonicalize(&parse("[ft_i]")).unwrap();
        let second = canonicalizer.canonicalize(&parse("[ft_i]")).unwrap();
        assert_eq!(first, second);
        assert!(cache.get("[in_i]").is_some());
    }

    #[test]
    fn test_fahrenheit_keeps_its_divisor() {
        let step = canonicalize("[degF]").unwrap();
        assert_eq!(step.magnitude.to_string(), "5");
        assert_eq!(step.divisor.to_string(), "9");

        let functions = SpecialFunctions::standard();
        let kelvin = step.apply(&Decimal::from(212), Direction::From, &functions).unwrap();
        assert_eq!(kelvin.to_string(), "373.15");
        let back = step.apply(&kelvin, Direction::To, &functions).unwrap();
        assert_eq!(back.to_string(), "212");
    }

    #[test]
    fn test_division_keeps_an_exact_ratio() {
        let step = canonicalize("m/km").unwrap();
        assert_eq!(step.magnitude.to_string(), "1");
        assert_eq!(step.divisor.to_string(), "1000");
        assert_eq!(step.factor().unwrap().to_string(), "0.001");

        let step = canonicalize("/h").unwrap();
        assert_eq!(step.divisor.to_string(), "3600");
        assert!(step.same_scale(&canonicalize("s-1.h-1.s").unwrap()));
    }

    #[test]
    fn test_exponent_limit() {
        let registry = EssenceRegistry::shared();
        let functions = SpecialFunctions::standard();
        let limits = ResourceLimits {
            max_exponent: 10,
            ..ResourceLimits::default()
        };
        let canonicalizer = Canonicalizer::new(registry.as_ref(), &functions).with_limits(limits);
        assert!(canonicalizer.canonicalize(&parse("[in_i]10")).is_ok());
        assert!(matches!(
            canonicalizer.canonicalize(&parse("[in_i]11")),
            Err(UcumError::ResourceLimitExceeded { .. })
        ));
        assert!(matches!(
            canonicalizer.canonicalize(&parse("m-11")),
            Err(UcumError::ResourceLimitExceeded { .. })
        ));
    }
}
