//! Staged builders for [`Term`] values.
//!
//! Each stage only exposes the next step, so a half-built term cannot be
//! observed. The rank of the result follows from the operands: any mixed
//! operand makes the whole term mixed.

use super::{CanonicalTerm, Component, MixedTerm, Operator, Term, TermNode, UnitNode};
use crate::error::UcumError;
use crate::registry::{BaseUnit, Prefix, UnitDefinition};
use crate::UcumResult;
use std::sync::Arc;

enum RankedUnit {
    Canonical(UnitNode<Arc<BaseUnit>>),
    Mixed(UnitNode<UnitDefinition>),
}

impl RankedUnit {
    fn of(unit: UnitDefinition, prefix: Option<Arc<Prefix>>) -> Self {
        match (unit, prefix) {
            (UnitDefinition::Base(base), None) => RankedUnit::Canonical(UnitNode::NoPrefix(base)),
            (UnitDefinition::Base(base), Some(prefix)) => {
                RankedUnit::Canonical(UnitNode::Prefixed(prefix, base))
            }
            (defined, None) => RankedUnit::Mixed(UnitNode::NoPrefix(defined)),
            (defined, Some(prefix)) => RankedUnit::Mixed(UnitNode::Prefixed(prefix, defined)),
        }
    }
}

fn component<D>(unit: UnitNode<D>, exponent: Option<i32>) -> TermNode<D> {
    TermNode::Component(match exponent {
        Some(exponent) => Component::Exponent(unit, exponent),
        None => Component::NoExponent(unit),
    })
}

/// Entry point of the unit → prefix → exponent → annotation chain
pub struct SoloTermBuilder;

impl SoloTermBuilder {
    pub fn unit(unit: UnitDefinition) -> PrefixStage {
        PrefixStage { unit }
    }

    /// Integer factors skip the prefix stage
    pub fn integer(value: u64) -> ExponentStage {
        ExponentStage {
            unit: RankedUnit::Canonical(UnitNode::Integer(value)),
        }
    }

    pub fn annotation_only(annotation: impl Into<String>) -> TermStage {
        TermStage {
            term: Term::Canonical(TermNode::AnnotOnly(annotation.into())),
        }
    }
}

pub struct PrefixStage {
    unit: UnitDefinition,
}

impl PrefixStage {
    pub fn no_prefix(self) -> ExponentStage {
        ExponentStage {
            unit: RankedUnit::of(self.unit, None),
        }
    }

    pub fn with_prefix(self, prefix: Arc<Prefix>) -> ExponentStage {
        ExponentStage {
            unit: RankedUnit::of(self.unit, Some(prefix)),
        }
    }
}

pub struct ExponentStage {
    unit: RankedUnit,
}

impl ExponentStage {
    pub fn no_exponent(self) -> AnnotationStage {
        AnnotationStage {
            unit: self.unit,
            exponent: None,
        }
    }

    pub fn with_exponent(self, exponent: i32) -> AnnotationStage {
        AnnotationStage {
            unit: self.unit,
            exponent: Some(exponent),
        }
    }
}

pub struct AnnotationStage {
    unit: RankedUnit,
    exponent: Option<i32>,
}

impl AnnotationStage {
    pub fn no_annotation(self) -> TermStage {
        let term = match self.unit {
            RankedUnit::Canonical(unit) => Term::Canonical(component(unit, self.exponent)),
            RankedUnit::Mixed(unit) => Term::Mixed(component(unit, self.exponent)),
        };
        TermStage { term }
    }

    pub fn with_annotation(self, annotation: impl Into<String>) -> TermStage {
        self.no_annotation().annotate(annotation)
    }
}

/// A complete term, optionally wrapped further
pub struct TermStage {
    term: Term,
}

impl From<Term> for TermStage {
    fn from(term: Term) -> Self {
        TermStage { term }
    }
}

impl TermStage {
    pub fn as_term(self) -> Term {
        self.term
    }

    pub fn with_parens(self) -> TermStage {
        let term = match self.term {
            Term::Canonical(t) => Term::Canonical(TermNode::Paren(Box::new(t))),
            Term::Mixed(t) => Term::Mixed(TermNode::Paren(Box::new(t))),
        };
        TermStage { term }
    }

    pub fn annotate(self, annotation: impl Into<String>) -> TermStage {
        let term = match self.term {
            Term::Canonical(t) => Term::Canonical(TermNode::annotate(t, annotation)),
            Term::Mixed(t) => Term::Mixed(TermNode::annotate(t, annotation)),
        };
        TermStage { term }
    }

    /// Fails with [`UcumError::TypeMismatch`] when the term is mixed
    pub fn build_canonical(self) -> UcumResult<CanonicalTerm> {
        match self.term {
            Term::Canonical(term) => Ok(term),
            Term::Mixed(term) => Err(UcumError::TypeMismatch(format!(
                "'{}' references non-base units and cannot be used as a canonical term",
                Term::Mixed(term)
            ))),
        }
    }
}

/// Entry point of the left → operator → right chain
pub struct CombineTermBuilder;

impl CombineTermBuilder {
    pub fn left(term: impl Into<Term>) -> OperatorStage {
        OperatorStage { left: term.into() }
    }

    pub fn unary_div(term: impl Into<Term>) -> TermStage {
        let term = match term.into() {
            Term::Canonical(t) => Term::Canonical(TermNode::unary_div(t)),
            Term::Mixed(t) => Term::Mixed(TermNode::unary_div(t)),
        };
        TermStage { term }
    }
}

pub struct OperatorStage {
    left: Term,
}

impl OperatorStage {
    pub fn multiply_by(self, right: impl Into<Term>) -> TermStage {
        self.combine(Operator::Mul, right.into())
    }

    pub fn divide_by(self, right: impl Into<Term>) -> TermStage {
        self.combine(Operator::Div, right.into())
    }

    fn combine(self, op: Operator, right: Term) -> TermStage {
        let term = match (self.left, right) {
            (Term::Canonical(l), Term::Canonical(r)) => Term::Canonical(TermNode::combine(l, op, r)),
            (l, r) => Term::Mixed(MixedTerm::combine(l.into_mixed(), op, r.into_mixed())),
        };
        TermStage { term }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EssenceRegistry, Registry};

    fn unit(code: &str) -> Term {
        let registry = EssenceRegistry::shared();
        let definition = registry.lookup_unit(code).unwrap();
        SoloTermBuilder::unit(definition)
            .no_prefix()
            .no_exponent()
            .no_annotation()
            .as_term()
    }

    #[test]
    fn test_base_unit_is_canonical() {
        assert!(unit("m").is_canonical());
        assert!(!unit("N").is_canonical());
    }

    #[test]
    fn test_integer_and_annotation_are_canonical() {
        let ten = SoloTermBuilder::integer(10).no_exponent().no_annotation().as_term();
        assert!(ten.is_canonical());
        assert!(SoloTermBuilder::annotation_only("rbc").as_term().is_canonical());
    }

    #[test]
    fn test_mixed_operand_is_contagious() {
        let canonical = CombineTermBuilder::left(unit("m")).divide_by(unit("s")).as_term();
        assert!(canonical.is_canonical());

        let mixed = CombineTermBuilder::left(unit("m")).multiply_by(unit("N")).as_term();
        assert!(!mixed.is_canonical());

        let mixed = CombineTermBuilder::left(unit("N")).multiply_by(unit("m")).as_term();
        assert!(!mixed.is_canonical());
    }

    #[test]
    fn test_build_canonical_rejects_mixed() {
        let result = CombineTermBuilder::left(unit("m"))
            .multiply_by(unit("N"))
            .build_canonical();
        assert!(matches!(result, Err(UcumError::TypeMismatch(_))));

        let result = CombineTermBuilder::left(unit("m"))
            .multiply_by(unit("g"))
            .build_canonical();
        assert!(result.is_ok());
    }

    #[test]
    fn test_prefix_keeps_rank() {
        let registry = EssenceRegistry::shared();
        let km = SoloTermBuilder::unit(registry.lookup_unit("m").unwrap())
            .with_prefix(registry.lookup_prefix("k").unwrap())
            .with_exponent(2)
            .no_annotation()
            .as_term();
        assert!(km.is_canonical());
        assert_eq!(km.to_string(), "km2");
    }

    #[test]
    fn test_division_operand_is_wrapped() {
        let inner = CombineTermBuilder::left(unit("s")).divide_by(unit("g")).as_term();
        let term = CombineTermBuilder::left(unit("m")).divide_by(inner).as_term();
        assert_eq!(term.to_string(), "m/(s/g)");

        let term = CombineTermBuilder::unary_div(
            CombineTermBuilder::left(unit("s")).multiply_by(unit("g")).as_term(),
        )
        .as_term();
        assert_eq!(term.to_string(), "/(s.g)");
    }
}
