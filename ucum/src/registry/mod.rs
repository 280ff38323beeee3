//! Unit and prefix definitions and the lookup boundary the engine reads them through.

mod essence;

pub use essence::EssenceRegistry;

use crate::decimal::Decimal;
use crate::dimension::Dimension;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A multiplier such as `k` (1000) or `Ki` (1024)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix {
    pub code: String,
    pub name: String,
    pub value: Decimal,
}

/// One of the seven UCUM base units
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUnit {
    pub code: String,
    pub name: String,
    pub print_symbol: Option<String>,
    pub dimension: Dimension,
    pub property: String,
}

/// The function and scaled unit a special unit is defined through, e.g.
/// `Cel(1 K)` or `degF(5 K/9)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SpecialFunction {
    pub name: String,
    pub value: Decimal,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitClass {
    Derived,
    Special(SpecialFunction),
    /// No relation to base units, e.g. `[IU]`
    Arbitrary,
    Dimless,
}

/// A unit defined as `magnitude × base_form`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefinedUnit {
    pub code: String,
    pub name: String,
    pub print_symbol: Option<String>,
    pub metric: bool,
    pub class: UnitClass,
    pub magnitude: Decimal,
    /// UCUM expression the unit is defined in terms of
    pub base_form: String,
    pub property: String,
}

impl DefinedUnit {
    pub fn special_function(&self) -> Option<&SpecialFunction> {
        match &self.class {
            UnitClass::Special(function) => Some(function),
            _ => None,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self.class, UnitClass::Special(_))
    }

    pub fn is_arbitrary(&self) -> bool {
        matches!(self.class, UnitClass::Arbitrary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitDefinition {
    Base(Arc<BaseUnit>),
    Defined(Arc<DefinedUnit>),
}

impl UnitDefinition {
    pub fn code(&self) -> &str {
        match self {
            UnitDefinition::Base(unit) => &unit.code,
            UnitDefinition::Defined(unit) => &unit.code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            UnitDefinition::Base(unit) => &unit.name,
            UnitDefinition::Defined(unit) => &unit.name,
        }
    }

    pub fn print_symbol(&self) -> Option<&str> {
        match self {
            UnitDefinition::Base(unit) => unit.print_symbol.as_deref(),
            UnitDefinition::Defined(unit) => unit.print_symbol.as_deref(),
        }
    }

    /// Base units are always metric
    pub fn is_metric(&self) -> bool {
        match self {
            UnitDefinition::Base(_) => true,
            UnitDefinition::Defined(unit) => unit.metric,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self, UnitDefinition::Defined(unit) if unit.is_special())
    }
}

impl fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Read-only lookup of definitions by their case-sensitive code.
///
/// Implementations are shared between threads and must not change after
/// construction.
pub trait Registry: Send + Sync {
    fn lookup_unit(&self, code: &str) -> Option<UnitDefinition>;

    fn lookup_prefix(&self, code: &str) -> Option<Arc<Prefix>>;

    /// Every unit the registry knows, in no particular order
    fn units(&self) -> Vec<UnitDefinition>;
}
