#![no_main]

use libfuzzer_sys::fuzz_target;
use ctestkit_core::parse_invocations;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // The reader must reject bad input with an error, never panic
        let _ = parse_invocations(s);
    }
});
