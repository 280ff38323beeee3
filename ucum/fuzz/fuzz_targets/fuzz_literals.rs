#![no_main]

use libfuzzer_sys::fuzz_target;
use ucum::Decimal;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(value) = s.parse::<Decimal>() {
            let _ = value.to_string();
            let _ = &value * &value;
            let _ = value.checked_div(&value);
        }
    }
});
