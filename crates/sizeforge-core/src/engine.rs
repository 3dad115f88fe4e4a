//! Size-targeting padding engine.
//!
//! The engine measures the unpadded skeleton, then asks the builder for
//! filler sized to the remaining gap and corrects the estimate from each
//! measured result:
//!
//! 1. build and measure the skeleton (`baseline`)
//! 2. reject targets below `baseline`
//! 3. emit the skeleton when the gap is zero or smaller than one filler unit
//! 4. build with `target - baseline` filler, measure, correct by `-error`,
//!    repeat up to `max_iterations` times
//! 5. if the budget runs out, emit the largest attempt not above the target
//!    and flag it [`Outcome::SizeApproximate`]
//!
//! Filler content is pseudo-random, so deflating containers map filler bytes
//! almost 1:1 onto output bytes and the linear correction settles in two or
//! three builds.

use crate::error::{ForgeError, Result};
use crate::filler::FillerUnit;
use crate::format::FormatKind;
use crate::size::TargetBytes;
use crate::skeleton::SkeletonBuilder;
use crate::verify::{Attempt, SizeVerifier};

/// Default build budget for one run
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Upper bound accepted by [`EngineConfig::validate`]
pub const MAX_ITERATIONS_LIMIT: usize = 64;

/// Convergence settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of padded builds
    pub max_iterations: usize,
    /// Accepted shortfall in bytes; `None` uses the format default
    pub tolerance: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: None,
        }
    }
}

impl EngineConfig {
    /// Tolerance applied to `format`
    #[must_use]
    pub fn tolerance_for(&self, format: FormatKind) -> u64 {
        self.tolerance.unwrap_or_else(|| format.default_tolerance())
    }

    /// Check the settings
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidConfig`] if `max_iterations` is zero or
    /// above [`MAX_ITERATIONS_LIMIT`].
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATIONS_LIMIT {
            return Err(ForgeError::InvalidConfig(format!(
                "max_iterations must be between 1 and {MAX_ITERATIONS_LIMIT}, got {}",
                self.max_iterations
            )));
        }
        Ok(())
    }
}

/// How close the result came to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Within tolerance below the target
    Exact,
    /// Budget exhausted or target unreachable; best attempt emitted
    SizeApproximate {
        /// Achieved size minus target (negative when short)
        deviation: i64,
    },
}

/// A generated document and how it got there
#[derive(Debug, Clone)]
pub struct Generated {
    /// Format of the document
    pub format: FormatKind,
    /// Requested size
    pub target: TargetBytes,
    /// Serialized document
    pub document: Vec<u8>,
    /// Filler length embedded in `document`
    pub filler: u64,
    /// Builds performed, including the baseline
    pub iterations: usize,
    /// Exact or approximate
    pub outcome: Outcome,
}

impl Generated {
    /// Size of the document in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.document.len() as u64
    }

    /// Size minus target
    #[must_use]
    pub fn deviation(&self) -> i64 {
        self.size() as i64 - self.target.get() as i64
    }

    /// Whether the result was flagged approximate
    #[must_use]
    pub fn is_approximate(&self) -> bool {
        matches!(self.outcome, Outcome::SizeApproximate { .. })
    }
}

/// Padding engine
#[derive(Debug, Clone, Default)]
pub struct PaddingEngine {
    config: EngineConfig,
}

impl PaddingEngine {
    /// Create an engine with `config`
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Build a document with `builder` sized as close to `target` as possible.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::TargetTooSmall`] if the skeleton alone exceeds
    /// `target`, and [`ForgeError::BuilderFailure`] if any build fails.
    pub fn generate<B>(&self, builder: &B, target: TargetBytes) -> Result<Generated>
    where
        B: SkeletonBuilder + ?Sized,
    {
        self.config.validate()?;

        let format = builder.format();
        let tolerance = self.config.tolerance_for(format);
        let build = |filler: &FillerUnit| {
            builder
                .inject_filler(filler)
                .map_err(|e| ForgeError::builder(format, e))
        };

        let skeleton = builder
            .build_minimal()
            .map_err(|e| ForgeError::builder(format, e))?;
        let baseline = builder.measure(&skeleton);

        if target.get() < baseline {
            return Err(ForgeError::TargetTooSmall {
                format,
                target: target.get(),
                minimum: baseline,
            });
        }

        let mut verifier = SizeVerifier::new(target, tolerance);
        let baseline_attempt = Attempt::new(0, baseline);
        verifier.record(baseline_attempt);

        let needed = target.get() - baseline;
        tracing::debug!(
            "{} baseline {} bytes, target {}, gap {}",
            format,
            baseline,
            target.get(),
            needed
        );

        if verifier.is_converged(&baseline_attempt) || needed < builder.min_filler() {
            return Ok(finish(format, &verifier, skeleton));
        }

        let mut best = skeleton;
        let mut filler = FillerUnit::new(needed);

        for round in 1..=self.config.max_iterations {
            let document = build(&filler)?;
            let attempt = Attempt::new(filler.len(), builder.measure(&document));
            tracing::debug!(
                "{} attempt {}: filler {} -> {} bytes (error {:+})",
                format,
                round,
                attempt.filler,
                attempt.actual,
                attempt.error(target)
            );

            if verifier.record(attempt) {
                best = document;
            }
            if verifier.is_converged(&attempt) {
                break;
            }

            let next = verifier.next_estimate(&attempt);
            if next == filler.len() || next == 0 {
                break;
            }
            filler = filler.resized(next);
        }

        Ok(finish(format, &verifier, best))
    }
}

fn finish(format: FormatKind, verifier: &SizeVerifier, document: Vec<u8>) -> Generated {
    let target = verifier.target();
    let best = verifier
        .best()
        .copied()
        .unwrap_or(Attempt::new(0, document.len() as u64));

    let outcome = if verifier.is_converged(&best) {
        tracing::info!(
            "{} converged at {} bytes (target {}) after {} builds",
            format,
            best.actual,
            target.get(),
            verifier.iterations()
        );
        Outcome::Exact
    } else {
        let deviation = best.error(target);
        tracing::warn!(
            "{} approximated at {} bytes, {} from target {}",
            format,
            best.actual,
            deviation,
            target.get()
        );
        Outcome::SizeApproximate { deviation }
    };

    Generated {
        format,
        target,
        document,
        filler: best.filler,
        iterations: verifier.iterations(),
        outcome,
    }
}
