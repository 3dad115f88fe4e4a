//! Fuzz target for size expression parsing
//!
//! Arbitrary input must either parse to a positive byte count or return an
//! error, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sizeforge_core::{SizeSpec, parse_size};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(target) = parse_size(s) {
            assert!(target.get() >= 1, "Parsed targets are positive");

            // Display output parses back to the same byte count
            let spec = SizeSpec::parse(s).expect("parse_size accepted it");
            let again = parse_size(&spec.to_string()).expect("Display re-parses");
            assert_eq!(again.get(), target.get());
        }
    }
});
