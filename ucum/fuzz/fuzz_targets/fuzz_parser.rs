#![no_main]

use libfuzzer_sys::fuzz_target;
use ucum::Engine;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let engine = Engine::new();

        if let Ok(term) = engine.validate(s) {
            let _ = engine.canonicalize(&term);
        }
    }
});
