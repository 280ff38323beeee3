use proptest::prelude::*;
use ucum::{flatten_and_cancel, Decimal, Engine, PrintStyle, Term};

const UNITS: &[&str] = &[
    "m", "s", "g", "K", "C", "cd", "rad", "km", "mg", "N", "J", "W", "Pa", "L", "h", "min", "[in_i]", "[ft_i]",
    "[lb_av]", "mol", "Hz", "V", "Ohm", "%", "{rbc}", "10*3",
];

fn unit() -> impl Strategy<Value = String> {
    (prop::sample::select(UNITS), prop::option::of(-3i32..=3)).prop_map(|(unit, exponent)| match exponent {
        Some(e) if e != 0 && !unit.starts_with('{') && !unit.starts_with("10*") => format!("{}{}", unit, e),
        _ => unit.to_string(),
    })
}

/// Random valid expressions: products, quotients and parenthesized groups
fn expression() -> impl Strategy<Value = String> {
    unit().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{}.{}", a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{}/{}", a, b)),
            inner.clone().prop_map(|a| format!("({})", a)),
            inner.prop_map(|a| format!("/{}", a)),
        ]
    })
}

fn literal() -> impl Strategy<Value = String> {
    (-100000i64..100000, 0u32..5).prop_map(|(unscaled, scale)| {
        let digits = unscaled.unsigned_abs().to_string();
        let sign = if unscaled < 0 { "-" } else { "" };
        if scale == 0 {
            format!("{}{}", sign, digits)
        } else {
            let padded = format!("{:0>width$}", digits, width = scale as usize + 1);
            let (integer, fraction) = padded.split_at(padded.len() - scale as usize);
            format!("{}{}.{}", sign, integer, fraction)
        }
    })
}

fn canonical(engine: &Engine, term: &Term) -> Option<ucum::Canonicalized> {
    engine.canonicalize(term).ok()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_ucum_printing_round_trips(input in expression()) {
        let engine = Engine::new();
        if let Ok(term) = engine.validate(&input) {
            let printed = engine.print(&term, PrintStyle::Ucum);
            let reparsed = engine.validate(&printed);
            prop_assert_eq!(reparsed, Ok(term));
        }
    }

    #[test]
    fn prop_flatten_is_idempotent(input in expression()) {
        let engine = Engine::new();
        if let Ok(term) = engine.validate(&input) {
            if let Some(canonical) = canonical(&engine, &term) {
                let flat = canonical.term.as_canonical().cloned().unwrap();
                prop_assert_eq!(flatten_and_cancel(&flat).unwrap(), flat);
            }
        }
    }

    #[test]
    fn prop_commensurability_is_symmetric(a in expression(), b in expression()) {
        let engine = Engine::new();
        if let (Ok(a), Ok(b)) = (engine.validate(&a), engine.validate(&b)) {
            let ab = engine.check_commensurable(&a, &b);
            let ba = engine.check_commensurable(&b, &a);
            prop_assert_eq!(ab.is_ok(), ba.is_ok());
            if let (Ok(ab), Ok(ba)) = (ab, ba) {
                prop_assert_eq!(ab, ba);
            }
        }
    }

    #[test]
    fn prop_canonical_code_matches_dimension(input in expression()) {
        let engine = Engine::new();
        if let Ok(term) = engine.validate(&input) {
            if let Some(canonical) = canonical(&engine, &term) {
                let recanonicalized = engine.validate(&canonical.code).unwrap();
                let again = engine.canonicalize(&recanonicalized).unwrap();
                prop_assert_eq!(again.dimension, canonical.dimension);
                prop_assert_eq!(again.code, canonical.code);
            }
        }
    }

    #[test]
    fn prop_addition_commutes(a in literal(), b in literal()) {
        let a: Decimal = a.parse().unwrap();
        let b: Decimal = b.parse().unwrap();
        prop_assert_eq!(&a + &b, &b + &a);
    }

    #[test]
    fn prop_subtracting_exact_value_inverts_addition(a in literal(), b in -100000i64..100000) {
        let a: Decimal = a.parse().unwrap();
        let b = Decimal::from(b);
        let back = &(&a + &b) - &b;
        prop_assert!(back.compare(&a).is_eq(), "{} + {} - {} = {}", a, b, b, back);
    }

    #[test]
    fn prop_multiplication_by_one(a in literal()) {
        let a: Decimal = a.parse().unwrap();
        prop_assert!((&a * &Decimal::one()).compare(&a).is_eq());
    }

    #[test]
    fn prop_display_parses_back(a in literal()) {
        let a: Decimal = a.parse().unwrap();
        let reparsed: Decimal = a.to_string().parse().unwrap();
        prop_assert!(reparsed.compare(&a).is_eq());
    }
}
