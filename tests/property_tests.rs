//! Property-based tests for sizeforge
//!
//! Uses proptest to verify invariants across large input spaces.

use proptest::prelude::*;

// ============================================================================
// Size Parsing Properties
// ============================================================================

mod size_properties {
    use super::*;
    use sizeforge_core::{SizeSpec, parse_size};

    proptest! {
        /// Whole kilobyte counts map to exact multiples of 1024
        #[test]
        fn whole_kilobytes(n in 1u64..10_000_000) {
            prop_assert_eq!(parse_size(&format!("{n}KB")).unwrap().get(), n * 1024);
        }

        /// Whole megabyte counts, with or without the unit, map to multiples of 1024^2
        #[test]
        fn whole_megabytes(n in 1u64..100_000) {
            let expected = n * 1024 * 1024;
            prop_assert_eq!(parse_size(&format!("{n}MB")).unwrap().get(), expected);
            prop_assert_eq!(parse_size(&n.to_string()).unwrap().get(), expected);
        }

        /// Unit suffix is case-insensitive
        #[test]
        fn unit_case_insensitive(n in 1u64..100_000, upper in any::<bool>()) {
            let unit = if upper { "KB" } else { "kb" };
            prop_assert_eq!(parse_size(&format!("{n}{unit}")).unwrap().get(), n * 1024);
        }

        /// Fractional sizes round to the nearest byte
        #[test]
        fn fractional_rounding(whole in 0u64..1000, tenths in 1u64..10) {
            let input = format!("{whole}.{tenths}KB");
            let expected = ((whole as f64 + tenths as f64 / 10.0) * 1024.0).round() as u64;
            prop_assert_eq!(parse_size(&input).unwrap().get(), expected.max(1));
        }

        /// Anything with an unknown unit is rejected
        #[test]
        fn unknown_unit_rejected(n in 1u64..1000, unit in "[g-jG-J][bB]") {
            let input = format!("{n}{unit}");
            prop_assert!(SizeSpec::parse(&input).is_err());
        }

        /// Parsing never panics on arbitrary input
        #[test]
        fn parse_never_panics(input in "\\PC{0,24}") {
            let _ = parse_size(&input);
        }
    }
}

// ============================================================================
// Format Parsing Properties
// ============================================================================

mod format_properties {
    use super::*;
    use sizeforge_core::FormatKind;

    proptest! {
        /// Every format token parses regardless of case or a leading dot
        #[test]
        fn format_tokens_parse(idx in 0usize..6, upper in any::<bool>(), dot in any::<bool>()) {
            let format = FormatKind::ALL[idx];
            let mut token = format.as_str().to_string();
            if upper {
                token = token.to_uppercase();
            }
            if dot {
                token.insert(0, '.');
            }
            prop_assert_eq!(token.parse::<FormatKind>().unwrap(), format);
        }
    }
}

// ============================================================================
// Measurement Properties
// ============================================================================

mod measure_properties {
    use super::*;
    use sizeforge_core::{FillerUnit, measure};

    proptest! {
        /// Measuring the same bytes twice gives the same length
        #[test]
        fn measure_idempotent(len in 0u64..65_536, seed in any::<u64>()) {
            let bytes = FillerUnit::with_seed(len, seed).to_bytes();
            prop_assert_eq!(measure(&bytes), measure(&bytes));
            prop_assert_eq!(measure(&bytes), len);
        }

        /// Same seed, same filler
        #[test]
        fn filler_reproducible(len in 0u64..4096, seed in any::<u64>()) {
            let a = FillerUnit::with_seed(len, seed);
            let b = FillerUnit::with_seed(len, seed);
            prop_assert_eq!(a.to_bytes(), b.to_bytes());
        }
    }
}

// ============================================================================
// Convergence Properties
// ============================================================================

mod convergence_properties {
    use super::*;
    use sizeforge_core::skeleton::PackageBuilder;
    use sizeforge_core::{EngineConfig, PaddingEngine, SkeletonBuilder, TargetBytes, measure};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Plain ZIP hits any reachable target to the byte
        #[test]
        fn zip_exact(extra in 0u64..400_000) {
            let builder = PackageBuilder::zip();
            let minimal = measure(&builder.build_minimal().unwrap());
            let target = TargetBytes::new(minimal + extra);

            let generated = PaddingEngine::new(EngineConfig::default())
                .generate(&builder, target)
                .unwrap();
            prop_assert_eq!(generated.size(), target.get());
        }

        /// OOXML never overshoots and is either within tolerance or flagged
        #[test]
        fn docx_within_tolerance_or_flagged(extra in 0u64..300_000) {
            let builder = PackageBuilder::docx();
            let minimal = measure(&builder.build_minimal().unwrap());
            let target = TargetBytes::new(minimal + extra);
            let tolerance = builder.format().default_tolerance();

            let generated = PaddingEngine::new(EngineConfig::default())
                .generate(&builder, target)
                .unwrap();

            prop_assert!(generated.size() <= target.get());
            prop_assert!(
                target.get() - generated.size() <= tolerance || generated.is_approximate()
            );
            prop_assert!(generated.iterations <= 1 + EngineConfig::default().max_iterations);
        }
    }
}
