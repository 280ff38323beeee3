use crate::engine::{Engine, MolarMassProvider};
use crate::persistence::{InMemoryPersistence, PersistenceRegistry};
use crate::{Configuration, Decimal, PrintStyle, Relation, UcumError};
use std::collections::HashMap;
use std::sync::Arc;

#[test]
fn test_validate_and_canonicalize() {
    let engine = Engine::new();
    let term = engine.validate("Ohm").unwrap();
    let canonical = engine.canonicalize(&term).unwrap();
    assert_eq!(canonical.code, "C-2.g.m2.s-1");
    assert_eq!(canonical.magnitude.to_string(), "1000");
    assert!(canonical.special.is_none());
    assert_eq!(canonical.dimension.to_string(), "L2.M.T-1.Q-2");
}

#[test]
fn test_canonicalize_base_term_is_identity() {
    let engine = Engine::new();
    let term = engine.validate("m.s-2").unwrap();
    let canonical = engine.canonicalize(&term).unwrap();
    assert_eq!(canonical.term, term);
    assert_eq!(canonical.magnitude, Decimal::one());
}

#[test]
fn test_canonical_code_ignores_spelling() {
    let engine = Engine::new();
    let a = engine.validate("N").unwrap();
    let b = engine.validate("s-2.m.g").unwrap();
    assert_eq!(engine.canonical_code(&a).unwrap(), engine.canonical_code(&b).unwrap());
}

#[test]
fn test_convert() {
    let engine = Engine::new();
    let foot = engine.validate("[ft_i]").unwrap();
    let meter = engine.validate("m").unwrap();
    let converted = engine.convert(&Decimal::from(10), &foot, &meter).unwrap();
    assert_eq!(converted.value.to_string(), "3.048");

    let hour = engine.validate("h").unwrap();
    let second = engine.validate("s").unwrap();
    let converted = engine.convert(&"1.5".parse().unwrap(), &hour, &second).unwrap();
    assert_eq!(converted.value.to_string(), "5400");
}

#[test]
fn test_convert_not_commensurable() {
    let engine = Engine::new();
    let meter = engine.validate("m").unwrap();
    let gram = engine.validate("g").unwrap();
    let result = engine.convert(&Decimal::one(), &meter, &gram);
    assert!(matches!(result, Err(UcumError::NotCommensurable { .. })));
}

#[test]
fn test_relation() {
    let engine = Engine::new();
    let newton = engine.validate("N").unwrap();
    let spelled = engine.validate("kg.m/s2").unwrap();
    let dyne = engine.validate("dyn").unwrap();
    let meter = engine.validate("m").unwrap();

    assert_eq!(engine.relation(&newton, &spelled).unwrap(), Relation::Equal);
    assert_eq!(engine.relation(&newton, &dyne).unwrap(), Relation::Commensurable);
    assert!(!engine.check_commensurable(&newton, &meter).unwrap());
    assert_eq!(
        engine.check_commensurable(&meter, &newton).unwrap(),
        engine.check_commensurable(&newton, &meter).unwrap()
    );
}

#[test]
fn test_print() {
    let engine = Engine::new();
    let term = engine.validate("kg.m/s2").unwrap();
    assert_eq!(engine.print(&term, PrintStyle::Ucum), "kg.m/s2");
    assert_eq!(engine.print(&term, PrintStyle::WolframAlpha), "kg * m / s^2");
}

#[test]
fn test_failures_are_cached_per_flag_set() {
    let mut shared = PersistenceRegistry::new();
    shared.register(Arc::new(InMemoryPersistence::new(100)));

    let strict = Engine::with_config(Configuration::default()).with_persistence(shared.clone());
    let lenient = Engine::with_config(Configuration::builder().prefix_on_non_metric(true).build())
        .with_persistence(shared);

    assert!(matches!(strict.validate("k[in_i]"), Err(UcumError::NonMetricPrefix { .. })));
    assert!(lenient.validate("k[in_i]").is_ok());
    // the strict failure is still served from the cache
    assert!(matches!(strict.validate("k[in_i]"), Err(UcumError::NonMetricPrefix { .. })));
}

#[test]
fn test_cached_result_equals_fresh_result() {
    let cached = Engine::new();
    let fresh = Engine::new().with_persistence(PersistenceRegistry::new());
    for input in ["mm[Hg]", "10*3/uL", "Cel", "kg/m2"] {
        let first = cached.validate(input).unwrap();
        let second = cached.validate(input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, fresh.validate(input).unwrap());
        assert_eq!(
            cached.canonicalize(&first).unwrap(),
            fresh.canonicalize(&first).unwrap()
        );
    }
}

#[test]
fn test_validate_batch_keeps_order() {
    let engine = Engine::new();
    let inputs = vec!["m", "foo", "kg", "m/", "[in_i]"];
    let results = engine.validate_batch(&inputs);
    assert_eq!(results.len(), inputs.len());
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(UcumError::UnresolvedSymbol { .. })));
    assert_eq!(results[2].as_ref().unwrap().to_string(), "kg");
    assert!(matches!(results[3], Err(UcumError::Syntax { .. })));
    assert_eq!(results[4].as_ref().unwrap().to_string(), "[in_i]");
}

#[test]
fn test_preheat() {
    let engine = Engine::new();
    assert_eq!(engine.preheat(&["m", "kg", "[IU]", "foo"]), 2);
}

struct Table(HashMap<&'static str, Decimal>);

impl MolarMassProvider for Table {
    fn molar_mass(&self, substance: &str) -> Option<Decimal> {
        self.0.get(substance).cloned()
    }
}

#[test]
fn test_convert_substance() {
    let table = Table(HashMap::from([("water", "18.015".parse().unwrap())]));
    let engine = Engine::new().with_molar_mass_provider(Arc::new(table));
    let mmol = engine.validate("mmol").unwrap();
    let mg = engine.validate("mg").unwrap();

    let converted = engine
        .convert_substance(&Decimal::from(2), &mmol, &mg, "water")
        .unwrap();
    assert_eq!(converted.value.to_string(), "36.03");

    let missing = engine.convert_substance(&Decimal::from(2), &mmol, &mg, "ethanol");
    assert!(matches!(missing, Err(UcumError::MissingMolarMass { .. })));
}
