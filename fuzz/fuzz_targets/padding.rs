//! Fuzz target for the padding engine
//!
//! Drives the convergence loop with arbitrary targets and budgets over the
//! container builders.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sizeforge_core::skeleton::PackageBuilder;
use sizeforge_core::{EngineConfig, ForgeError, PaddingEngine, TargetBytes};

#[derive(Debug, Arbitrary)]
struct PaddingInput {
    format: u8,
    target: u32,
    max_iterations: u8,
    tolerance: Option<u16>,
}

fuzz_target!(|input: PaddingInput| {
    let builder = match input.format % 4 {
        0 => PackageBuilder::docx(),
        1 => PackageBuilder::xlsx(),
        2 => PackageBuilder::pptx(),
        _ => PackageBuilder::zip(),
    };

    // Cap the target to keep runs fast; a few hundred KiB exercises both
    // the comment slot and the filler entry
    let target = TargetBytes::new(u64::from(input.target % (512 * 1024)));
    let config = EngineConfig {
        max_iterations: usize::from(input.max_iterations % 8).max(1),
        tolerance: input.tolerance.map(u64::from),
    };

    match PaddingEngine::new(config).generate(&builder, target) {
        Ok(generated) => {
            assert!(generated.size() <= target.get(), "Never exceeds target");
            assert!(generated.iterations <= 1 + config.max_iterations);
        }
        Err(ForgeError::TargetTooSmall { minimum, .. }) => {
            assert!(minimum > target.get());
        }
        Err(e) => panic!("Unexpected error: {e}"),
    }
});
