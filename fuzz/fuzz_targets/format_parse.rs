//! Fuzz target for format token parsing

#![no_main]

use libfuzzer_sys::fuzz_target;
use sizeforge_core::FormatKind;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(format) = s.parse::<FormatKind>() {
            // Canonical names round-trip
            assert_eq!(format.as_str().parse::<FormatKind>().ok(), Some(format));
        }
    }
});
