use crate::canonicalizer::CanonicalStep;
use crate::dimension::{analyze, DimensionVector};
use crate::flattener::{flatten, AlphabeticalSorter};
use crate::term::Term;
use crate::UcumResult;
use serde::Serialize;
use std::fmt;

/// How two terms relate to each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "relation", rename_all = "snake_case")]
pub enum Relation {
    /// Same unit, possibly written differently (`N` and `kg.m/s2`)
    Equal,
    /// Convertible into each other
    Commensurable,
    /// Dimensions differ by `difference` (left minus right)
    NotCommensurable { difference: DimensionVector },
}

impl Relation {
    pub fn is_commensurable(&self) -> bool {
        !matches!(self, Relation::NotCommensurable { .. })
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Equal => write!(f, "equal"),
            Relation::Commensurable => write!(f, "commensurable"),
            Relation::NotCommensurable { difference } => {
                write!(f, "not commensurable (difference {})", difference)
            }
        }
    }
}

/// Classify two terms given their canonical steps
pub fn relate(
    left: &Term,
    left_step: &CanonicalStep,
    right: &Term,
    right_step: &CanonicalStep,
) -> UcumResult<Relation> {
    if left == right {
        return Ok(Relation::Equal);
    }
    let left_dimension = analyze(&left_step.term)?;
    let right_dimension = analyze(&right_step.term)?;
    if left_dimension != right_dimension {
        return Ok(Relation::NotCommensurable {
            difference: left_dimension.difference(&right_dimension)?,
        });
    }
    let same_units = flatten(&left_step.term)?.sorted(&AlphabeticalSorter)
        == flatten(&right_step.term)?.sorted(&AlphabeticalSorter);
    let same_scale = left_step.same_scale(right_step) && left_step.special == right_step.special;
    Ok(if same_units && same_scale {
        Relation::Equal
    } else {
        Relation::Commensurable
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonicalizer::Canonicalizer;
    use crate::config::FeatureFlags;
    use crate::dimension::Dimension;
    use crate::parser;
    use crate::registry::EssenceRegistry;
    use crate::resource_limits::ResourceLimits;
    use crate::special::SpecialFunctions;

    fn relation(a: &str, b: &str) -> Relation {
        let registry = EssenceRegistry::shared();
        let functions = SpecialFunctions::standard();
        let canonicalizer = Canonicalizer::new(registry.as_ref(), &functions);
        let parse = |input: &str| {
            parser::parse(
                input,
                registry.as_ref(),
                &FeatureFlags::default(),
                &ResourceLimits::default(),
            )
            .unwrap()
        };
        let (left, right) = (parse(a), parse(b));
        let left_step = canonicalizer.canonicalize(&left).unwrap();
        let right_step = canonicalizer.canonicalize(&right).unwrap();
        relate(&left, &left_step, &right, &right_step).unwrap()
    }

    #[test]
    fn test_equal() {
        assert_eq!(relation("m", "m"), Relation::Equal);
        assert_eq!(relation("N", "kg.m/s2"), Relation::Equal);
        assert_eq!(relation("m.s", "s.m"), Relation::Equal);
    }

    #[test]
    fn test_commensurable() {
        assert_eq!(relation("km", "[in_i]"), Relation::Commensurable);
        assert_eq!(relation("Cel", "K"), Relation::Commensurable);
    }

    #[test]
    fn test_not_commensurable() {
        let relation = relation("m", "s");
        assert!(!relation.is_commensurable());
        match relation {
            Relation::NotCommensurable { difference } => {
                assert_eq!(difference.exponent(Dimension::Length), 1);
                assert_eq!(difference.exponent(Dimension::Time), -1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
