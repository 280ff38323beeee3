//! Unit symbol resolution - splits a symbol into an optional prefix and a unit

use crate::config::FeatureFlags;
use crate::error::UcumError;
use crate::feedback;
use crate::registry::{Prefix, Registry, UnitDefinition};
use crate::UcumResult;
use std::sync::Arc;

pub type Resolved = (UnitDefinition, Option<Arc<Prefix>>);

/// Resolve a symbol such as `kPa` or `[in_i]`.
///
/// The whole symbol is tried first, so `cd` is candela rather than centi-day.
/// Otherwise the longest prefix that leaves a known unit wins.
pub fn resolve(symbol: &str, registry: &dyn Registry, flags: &FeatureFlags) -> UcumResult<Resolved> {
    if let Some(unit) = registry.lookup_unit(symbol) {
        return Ok((unit, None));
    }

    let mut rejected = None;
    for split in [2, 1] {
        if symbol.len() <= split || !symbol.is_char_boundary(split) {
            continue;
        }
        let (prefix_code, unit_code) = symbol.split_at(split);
        let (Some(prefix), Some(unit)) = (
            registry.lookup_prefix(prefix_code),
            registry.lookup_unit(unit_code),
        ) else {
            continue;
        };

        if !unit.is_metric() && !flags.prefix_on_non_metric {
            rejected.get_or_insert(UcumError::NonMetricPrefix {
                prefix: prefix_code.to_string(),
                unit: unit_code.to_string(),
            });
            continue;
        }
        return Ok((unit, Some(prefix)));
    }

    Err(rejected.unwrap_or_else(|| UcumError::UnresolvedSymbol {
        symbol: symbol.to_string(),
        suggestions: feedback::suggest_symbols(symbol, registry),
    }))
}
