//! Unit expression algebra.
//!
//! A term comes in two ranks. [`CanonicalTerm`] only references base units,
//! [`MixedTerm`] may reference any definition. Every canonical term can be
//! lifted into the mixed rank, never the reverse. [`Term`] carries the rank
//! as a runtime tag so the builders can derive it from their operands.

mod builder;

pub use builder::{
    AnnotationStage, CombineTermBuilder, ExponentStage, OperatorStage, PrefixStage,
    SoloTermBuilder, TermStage,
};

use crate::printer::PrintStyle;
use crate::registry::{BaseUnit, Prefix, UnitDefinition};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Mul => '.',
            Operator::Div => '/',
        }
    }
}

/// What the printers need to know about a unit, whatever its rank
pub trait UnitSymbol: Clone + fmt::Debug + PartialEq {
    fn code(&self) -> &str;
    fn name(&self) -> &str;
    fn print_symbol(&self) -> Option<&str>;
}

impl UnitSymbol for Arc<BaseUnit> {
    fn code(&self) -> &str {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn print_symbol(&self) -> Option<&str> {
        self.print_symbol.as_deref()
    }
}

impl UnitSymbol for UnitDefinition {
    fn code(&self) -> &str {
        UnitDefinition::code(self)
    }

    fn name(&self) -> &str {
        UnitDefinition::name(self)
    }

    fn print_symbol(&self) -> Option<&str> {
        UnitDefinition::print_symbol(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitNode<D> {
    /// A bare factor such as the `10` in `10.L`
    Integer(u64),
    NoPrefix(D),
    Prefixed(Arc<Prefix>, D),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component<D> {
    NoExponent(UnitNode<D>),
    Exponent(UnitNode<D>, i32),
}

impl<D> Component<D> {
    pub fn unit(&self) -> &UnitNode<D> {
        match self {
            Component::NoExponent(unit) | Component::Exponent(unit, _) => unit,
        }
    }

    /// Effective exponent, 1 when none was written
    pub fn exponent(&self) -> i32 {
        match self {
            Component::NoExponent(_) => 1,
            Component::Exponent(_, exponent) => *exponent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermNode<D> {
    Component(Component<D>),
    Annot(Box<TermNode<D>>, String),
    /// Annotation standing alone, dimensionless unity
    AnnotOnly(String),
    Paren(Box<TermNode<D>>),
    UnaryDiv(Box<TermNode<D>>),
    Binary(Box<TermNode<D>>, Operator, Box<TermNode<D>>),
}

pub type CanonicalTerm = TermNode<Arc<BaseUnit>>;
pub type MixedTerm = TermNode<UnitDefinition>;

impl<D> TermNode<D> {
    /// Combine two terms, parenthesizing a compound right operand so the
    /// printed form reparses to the same tree.
    pub fn combine(left: TermNode<D>, op: Operator, right: TermNode<D>) -> TermNode<D> {
        TermNode::Binary(Box::new(left), op, Box::new(right.wrapped()))
    }

    pub fn unary_div(inner: TermNode<D>) -> TermNode<D> {
        TermNode::UnaryDiv(Box::new(inner.wrapped()))
    }

    pub fn annotate(inner: TermNode<D>, annotation: impl Into<String>) -> TermNode<D> {
        TermNode::Annot(Box::new(inner.wrapped()), annotation.into())
    }

    pub fn unit(unit: UnitNode<D>) -> TermNode<D> {
        TermNode::Component(Component::NoExponent(unit))
    }

    pub fn unity() -> TermNode<D> {
        TermNode::unit(UnitNode::Integer(1))
    }

    fn wrapped(self) -> TermNode<D> {
        match self {
            TermNode::Binary(..) | TermNode::UnaryDiv(..) => TermNode::Paren(Box::new(self)),
            other => other,
        }
    }

    /// Rebuild the tree with every unit definition replaced through `f`
    pub fn map_units<E>(self, f: &impl Fn(D) -> E) -> TermNode<E> {
        match self {
            TermNode::Component(component) => TermNode::Component(match component {
                Component::NoExponent(unit) => Component::NoExponent(map_unit(unit, f)),
                Component::Exponent(unit, exponent) => {
                    Component::Exponent(map_unit(unit, f), exponent)
                }
            }),
            TermNode::Annot(inner, text) => TermNode::Annot(Box::new(inner.map_units(f)), text),
            TermNode::AnnotOnly(text) => TermNode::AnnotOnly(text),
            TermNode::Paren(inner) => TermNode::Paren(Box::new(inner.map_units(f))),
            TermNode::UnaryDiv(inner) => TermNode::UnaryDiv(Box::new(inner.map_units(f))),
            TermNode::Binary(left, op, right) => TermNode::Binary(
                Box::new(left.map_units(f)),
                op,
                Box::new(right.map_units(f)),
            ),
        }
    }

    /// Visit every component together with whether it sits inside a division
    pub fn for_each_component<'a>(&'a self, visit: &mut impl FnMut(&'a Component<D>, bool)) {
        self.walk_components(false, visit);
    }

    fn walk_components<'a>(&'a self, in_division: bool, visit: &mut impl FnMut(&'a Component<D>, bool)) {
        match self {
            TermNode::Component(component) => visit(component, in_division),
            TermNode::Annot(inner, _) | TermNode::Paren(inner) => {
                inner.walk_components(in_division, visit)
            }
            TermNode::AnnotOnly(_) => {}
            TermNode::UnaryDiv(inner) => inner.walk_components(true, visit),
            TermNode::Binary(left, op, right) => {
                let divides = in_division || *op == Operator::Div;
                left.walk_components(divides, visit);
                right.walk_components(divides, visit);
            }
        }
    }
}

fn map_unit<D, E>(unit: UnitNode<D>, f: &impl Fn(D) -> E) -> UnitNode<E> {
    match unit {
        UnitNode::Integer(n) => UnitNode::Integer(n),
        UnitNode::NoPrefix(definition) => UnitNode::NoPrefix(f(definition)),
        UnitNode::Prefixed(prefix, definition) => UnitNode::Prefixed(prefix, f(definition)),
    }
}

impl CanonicalTerm {
    pub fn into_mixed(self) -> MixedTerm {
        self.map_units(&|base| UnitDefinition::Base(base))
    }
}

/// A parsed or built unit expression tagged with its rank
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Canonical(CanonicalTerm),
    Mixed(MixedTerm),
}

impl Term {
    pub fn is_canonical(&self) -> bool {
        matches!(self, Term::Canonical(_))
    }

    pub fn as_canonical(&self) -> Option<&CanonicalTerm> {
        match self {
            Term::Canonical(term) => Some(term),
            Term::Mixed(_) => None,
        }
    }

    /// Lift into the mixed rank
    pub fn into_mixed(self) -> MixedTerm {
        match self {
            Term::Canonical(term) => term.into_mixed(),
            Term::Mixed(term) => term,
        }
    }

    pub fn to_mixed(&self) -> MixedTerm {
        self.clone().into_mixed()
    }

    /// Render with the given style
    pub fn print(&self, style: PrintStyle) -> String {
        match self {
            Term::Canonical(term) => style.print(term),
            Term::Mixed(term) => style.print(term),
        }
    }
}

impl From<CanonicalTerm> for Term {
    fn from(term: CanonicalTerm) -> Self {
        Term::Canonical(term)
    }
}

impl From<MixedTerm> for Term {
    fn from(term: MixedTerm) -> Self {
        Term::Mixed(term)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print(PrintStyle::Ucum))
    }
}

impl Serialize for Term {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Serialized as UCUM syntax
impl<D: UnitSymbol> Serialize for TermNode<D> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&PrintStyle::Ucum.print(self))
    }
}
