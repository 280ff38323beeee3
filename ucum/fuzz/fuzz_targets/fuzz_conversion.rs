#![no_main]

use libfuzzer_sys::fuzz_target;
use ucum::{Decimal, Engine};

fuzz_target!(|data: (&str, &str, i64)| {
    let (from, to, factor) = data;
    let engine = Engine::new();

    if let (Ok(from), Ok(to)) = (engine.validate(from), engine.validate(to)) {
        let _ = engine.convert(&Decimal::from(factor), &from, &to);
    }
});
