//! Size measurement and correction.

use crate::size::TargetBytes;
use std::io;
use std::path::Path;

/// Byte length of a serialized document
#[must_use]
pub fn measure(document: &[u8]) -> u64 {
    document.len() as u64
}

/// Byte length of a written file
///
/// # Errors
///
/// Returns an error if the file metadata cannot be read.
pub fn measure_file(path: &Path) -> io::Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

/// One measured build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// Filler length requested from the builder
    pub filler: u64,
    /// Resulting document size
    pub actual: u64,
}

impl Attempt {
    /// Create an attempt record
    #[must_use]
    pub fn new(filler: u64, actual: u64) -> Self {
        Self { filler, actual }
    }

    /// Signed distance from `target` (positive when over)
    #[must_use]
    pub fn error(&self, target: TargetBytes) -> i64 {
        self.actual as i64 - target.get() as i64
    }
}

/// Tracks attempts of one convergence run.
///
/// An attempt converges when it does not exceed the target and sits no more
/// than `tolerance` bytes below it. The best attempt is the largest one that
/// does not exceed the target.
#[derive(Debug, Clone)]
pub struct SizeVerifier {
    target: TargetBytes,
    tolerance: u64,
    history: Vec<Attempt>,
    best: Option<usize>,
}

impl SizeVerifier {
    /// Create a verifier for `target`
    #[must_use]
    pub fn new(target: TargetBytes, tolerance: u64) -> Self {
        Self {
            target,
            tolerance,
            history: Vec::new(),
            best: None,
        }
    }

    /// Target size
    #[must_use]
    pub fn target(&self) -> TargetBytes {
        self.target
    }

    /// Record an attempt; returns true if it became the best so far
    pub fn record(&mut self, attempt: Attempt) -> bool {
        self.history.push(attempt);

        let fits = attempt.actual <= self.target.get();
        let better = match self.best() {
            Some(best) => attempt.actual > best.actual,
            None => true,
        };

        if fits && better {
            self.best = Some(self.history.len() - 1);
            true
        } else {
            false
        }
    }

    /// Whether `attempt` is close enough to stop
    #[must_use]
    pub fn is_converged(&self, attempt: &Attempt) -> bool {
        attempt.actual <= self.target.get() && self.target.get() - attempt.actual <= self.tolerance
    }

    /// Next filler estimate by linear correction, clamped at zero
    #[must_use]
    pub fn next_estimate(&self, attempt: &Attempt) -> u64 {
        let corrected = attempt.filler as i128 - attempt.error(self.target) as i128;
        corrected.clamp(0, u64::MAX as i128) as u64
    }

    /// Largest attempt that does not exceed the target
    #[must_use]
    pub fn best(&self) -> Option<&Attempt> {
        self.best.map(|i| &self.history[i])
    }

    /// Number of recorded attempts
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.history.len()
    }

    /// All recorded attempts in order
    #[must_use]
    pub fn history(&self) -> &[Attempt] {
        &self.history
    }
}
