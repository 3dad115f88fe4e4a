//! Generation progress display.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a document is built and written
pub struct GenerationProgress {
    bar: ProgressBar,
}

impl GenerationProgress {
    /// Create and start the spinner
    #[must_use]
    pub fn new(format: &str, target_bytes: u64) -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress bar template"),
        );

        bar.set_message(format!(
            "Generating {} ({})",
            format,
            format_bytes(target_bytes)
        ));
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Finish with custom message
    pub fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }

    /// Abandon the spinner (for errors)
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

/// Format bytes in human-readable format
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{size:.2} {}", UNITS[unit_idx])
}

/// Format a signed byte deviation, e.g. `-120 B`
#[must_use]
pub fn format_deviation(deviation: i64) -> String {
    if deviation < 0 {
        format!("-{}", format_bytes(deviation.unsigned_abs()))
    } else {
        format!("+{}", format_bytes(deviation as u64))
    }
}
