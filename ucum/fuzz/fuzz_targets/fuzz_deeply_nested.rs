#![no_main]

use libfuzzer_sys::fuzz_target;
use ucum::Engine;

fuzz_target!(|depth: u8| {
    let engine = Engine::new();

    let depth = (depth as usize % 80) + 1;

    let mut expr = String::from("m");
    for _ in 0..depth {
        expr = format!("({}/s)", expr);
    }

    if let Ok(term) = engine.validate(&expr) {
        let _ = engine.canonical_code(&term);
    }
});
