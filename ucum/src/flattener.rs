//! Flattening of canonical terms into one product of base unit powers.

use crate::error::UcumError;
use crate::registry::BaseUnit;
use crate::term::{CanonicalTerm, Component, Operator, TermNode, UnitNode};
use crate::UcumResult;
use std::sync::Arc;

/// Product of distinct base units with non-zero exponents, in the order the
/// units first occur in the source term
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlatTerm {
    entries: Vec<(Arc<BaseUnit>, i32)>,
}

impl FlatTerm {
    pub fn entries(&self) -> &[(Arc<BaseUnit>, i32)] {
        &self.entries
    }

    /// Exponent of the base unit with this code, 0 if absent
    pub fn exponent(&self, code: &str) -> i32 {
        self.entries
            .iter()
            .find(|(unit, _)| unit.code == code)
            .map(|(_, exponent)| *exponent)
            .unwrap_or(0)
    }

    pub fn is_unity(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sorted(mut self, sorter: &dyn Sorter) -> FlatTerm {
        sorter.sort(&mut self.entries);
        self
    }

    /// Rebuild a term: `m2.s-1`, or `1` when everything cancelled
    pub fn to_term(&self) -> CanonicalTerm {
        let mut components = self.entries.iter().map(|(unit, exponent)| {
            let unit = UnitNode::NoPrefix(Arc::clone(unit));
            TermNode::Component(if *exponent == 1 {
                Component::NoExponent(unit)
            } else {
                Component::Exponent(unit, *exponent)
            })
        });
        match components.next() {
            Some(first) => components.fold(first, |acc, next| TermNode::combine(acc, Operator::Mul, next)),
            None => TermNode::unity(),
        }
    }

    fn push(&mut self, unit: &Arc<BaseUnit>, exponent: i32) -> UcumResult<()> {
        match self.entries.iter_mut().find(|(existing, _)| existing.code == unit.code) {
            Some((_, total)) => {
                *total = total
                    .checked_add(exponent)
                    .ok_or_else(|| overflow(unit, *total, exponent))?;
            }
            None => self.entries.push((Arc::clone(unit), exponent)),
        }
        Ok(())
    }
}

/// Flatten `term` and merge powers of the same base unit.
///
/// Integer factors and annotations carry no unit and are left out; the
/// canonicalizer has already moved their values into the magnitude.
///
/// Fails with `ExponentOverflow` when a summed or negated exponent leaves
/// the `i32` range.
pub fn flatten(term: &CanonicalTerm) -> UcumResult<FlatTerm> {
    let mut flat = FlatTerm::default();
    collect(term, false, &mut flat)?;
    flat.entries.retain(|(_, exponent)| *exponent != 0);
    Ok(flat)
}

/// `flatten` returned as a term
pub fn flatten_and_cancel(term: &CanonicalTerm) -> UcumResult<CanonicalTerm> {
    Ok(flatten(term)?.to_term())
}

fn collect(term: &CanonicalTerm, negated: bool, flat: &mut FlatTerm) -> UcumResult<()> {
    match term {
        TermNode::Component(component) => match component.unit() {
            UnitNode::Integer(_) => Ok(()),
            UnitNode::NoPrefix(unit) | UnitNode::Prefixed(_, unit) => {
                let exponent = component.exponent();
                let exponent = if negated {
                    exponent
                        .checked_neg()
                        .ok_or_else(|| UcumError::ExponentOverflow(format!("{}{}", unit.code, exponent)))?
                } else {
                    exponent
                };
                flat.push(unit, exponent)
            }
        },
        TermNode::Annot(inner, _) | TermNode::Paren(inner) => collect(inner, negated, flat),
        TermNode::AnnotOnly(_) => Ok(()),
        TermNode::UnaryDiv(inner) => collect(inner, !negated, flat),
        TermNode::Binary(left, op, right) => {
            collect(left, negated, flat)?;
            let negated = match op {
                Operator::Mul => negated,
                Operator::Div => !negated,
            };
            collect(right, negated, flat)
        }
    }
}

fn overflow(unit: &BaseUnit, total: i32, exponent: i32) -> UcumError {
    UcumError::ExponentOverflow(format!("{}{} . {}{}", unit.code, total, unit.code, exponent))
}

/// Orders flattened entries to give equal units the same printed form
pub trait Sorter: Send + Sync {
    fn sort(&self, entries: &mut Vec<(Arc<BaseUnit>, i32)>);
}

/// By base unit code, upper case before lower case
#[derive(Debug, Default, Clone, Copy)]
pub struct AlphabeticalSorter;

impl Sorter for AlphabeticalSorter {
    fn sort(&self, entries: &mut Vec<(Arc<BaseUnit>, i32)>) {
        entries.sort_by(|(a, _), (b, _)| a.code.cmp(&b.code));
    }
}
