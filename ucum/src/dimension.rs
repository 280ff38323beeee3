use crate::error::UcumError;
use crate::flattener::flatten;
use crate::term::CanonicalTerm;
use crate::UcumResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The physical dimension carried by each base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Dimension {
    Length,
    Mass,
    Time,
    PlaneAngle,
    Temperature,
    ElectricCharge,
    LuminousIntensity,
}

impl Dimension {
    /// One-letter symbol used by UCUM (L, M, T, A, C, Q, F)
    pub fn symbol(&self) -> char {
        match self {
            Dimension::Length => 'L',
            Dimension::Mass => 'M',
            Dimension::Time => 'T',
            Dimension::PlaneAngle => 'A',
            Dimension::Temperature => 'C',
            Dimension::ElectricCharge => 'Q',
            Dimension::LuminousIntensity => 'F',
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Exponents per dimension. Zero entries are never stored, so two vectors
/// are equal exactly when the units they describe are commensurable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DimensionVector(BTreeMap<Dimension, i32>);

impl DimensionVector {
    pub fn dimensionless() -> Self {
        Self::default()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.is_empty()
    }

    pub fn exponent(&self, dimension: Dimension) -> i32 {
        self.0.get(&dimension).copied().unwrap_or(0)
    }

    /// Sum exponents per dimension
    pub fn from_exponents<I: IntoIterator<Item = (Dimension, i32)>>(exponents: I) -> UcumResult<Self> {
        let mut vector = Self::default();
        for (dimension, exponent) in exponents {
            vector.add(dimension, exponent)?;
        }
        Ok(vector)
    }

    /// Add `exponent` to the entry for `dimension`
    pub fn add(&mut self, dimension: Dimension, exponent: i32) -> UcumResult<()> {
        let current = self.exponent(dimension);
        let sum = current
            .checked_add(exponent)
            .ok_or_else(|| UcumError::ExponentOverflow(format!("{}{} . {}{}", dimension, current, dimension, exponent)))?;
        if sum == 0 {
            self.0.remove(&dimension);
        } else {
            self.0.insert(dimension, sum);
        }
        Ok(())
    }

    /// Entries where `self` and `other` differ, as `self - other`
    pub fn difference(&self, other: &Self) -> UcumResult<DimensionVector> {
        let mut result = self.clone();
        for (dimension, exponent) in &other.0 {
            let negated = exponent
                .checked_neg()
                .ok_or_else(|| UcumError::ExponentOverflow(format!("{}{}", dimension, exponent)))?;
            result.add(*dimension, negated)?;
        }
        Ok(result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, i32)> + '_ {
        self.0.iter().map(|(d, e)| (*d, *e))
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("1");
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(d, e)| if *e == 1 { d.to_string() } else { format!("{}{}", d, e) })
            .collect();
        f.write_str(&parts.join("."))
    }
}

/// Dimension of a canonical term, summed over its flattened base units
pub fn analyze(term: &CanonicalTerm) -> UcumResult<DimensionVector> {
    DimensionVector::from_exponents(
        flatten(term)?
            .entries()
            .iter()
            .map(|(unit, exponent)| (unit.dimension, *exponent)),
    )
}
