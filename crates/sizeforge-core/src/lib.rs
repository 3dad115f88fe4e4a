//! # sizeforge core
//!
//! Size-targeting padding engine for generated container files.
//!
//! This crate provides:
//! - Parsing of human size expressions ("150KB", "2.5MB", "10")
//! - Minimal skeleton builders for DOCX, XLSX, PPTX, PDF, PST and ZIP
//! - Incompressible, reproducible filler content
//! - A bounded convergence loop that measures and corrects the output size
//! - Atomic write of the final document
//!
//! # Example
//!
//! ```no_run
//! use sizeforge_core::{FormatKind, GenerateOptions, generate_file, parse_size};
//!
//! let target = parse_size("150KB")?;
//! let generated = generate_file(
//!     FormatKind::Docx,
//!     target,
//!     &GenerateOptions::default(),
//!     "report.docx".as_ref(),
//! )?;
//! println!("wrote {} bytes", generated.size());
//! # Ok::<(), sizeforge_core::ForgeError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod filler;
pub mod format;
pub mod output;
pub mod size;
pub mod skeleton;
pub mod verify;

use std::path::Path;

pub use engine::{EngineConfig, Generated, Outcome, PaddingEngine};
pub use error::{BuilderError, ForgeError, Result};
pub use filler::FillerUnit;
pub use format::{FormatKind, InjectionMechanism};
pub use size::{SizeSpec, SizeUnit, TargetBytes, parse_size};
pub use skeleton::{Builder, BuilderOptions, SkeletonBuilder};
pub use verify::{Attempt, SizeVerifier, measure};

/// Options for a complete generate-and-write run
#[derive(Debug, Default)]
pub struct GenerateOptions {
    /// Convergence settings
    pub engine: EngineConfig,
    /// Builder collaborators (mail engine)
    pub builders: BuilderOptions,
}

/// Generate a document of `format` sized to `target` and write it to `path`.
///
/// The document is fully built and verified in memory before anything touches
/// the filesystem; the write itself goes through [`output::write_atomically`].
///
/// # Errors
///
/// Returns [`ForgeError::TargetTooSmall`] when the minimal document already
/// exceeds `target`, and [`ForgeError::BuilderFailure`] when building or
/// writing fails. In every error case no file is left at `path`.
pub fn generate_file(
    format: FormatKind,
    target: TargetBytes,
    options: &GenerateOptions,
    path: &Path,
) -> Result<Generated> {
    options.engine.validate()?;

    let builder = Builder::for_format(format, options.builders.clone());
    let generated = PaddingEngine::new(options.engine).generate(&builder, target)?;

    output::write_atomically(path, &generated.document)
        .map_err(|e| ForgeError::builder(format, BuilderError::Io(e)))?;

    match verify::measure_file(path) {
        Ok(on_disk) if on_disk != generated.size() => tracing::warn!(
            "{} holds {} bytes, expected {}",
            path.display(),
            on_disk,
            generated.size()
        ),
        Ok(_) => {}
        Err(e) => tracing::warn!("Could not re-measure {}: {}", path.display(), e),
    }

    Ok(generated)
}
