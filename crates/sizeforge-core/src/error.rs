//! Error types for size parsing, building and generation.
//!
//! Parsing and validation errors are raised before any I/O happens. Builder
//! failures abort the whole run and keep their original cause reachable via
//! [`std::error::Error::source`]. Falling short of the target after the
//! convergence budget is not an error; see [`crate::Outcome`].

use crate::format::FormatKind;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Errors that can occur while generating a document
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Size expression could not be parsed or is not positive
    #[error("invalid size format '{input}': {reason}")]
    InvalidSizeFormat {
        /// Input as given by the caller
        input: String,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Format token outside the supported set
    #[error("unsupported format '{0}' (expected one of: docx, xlsx, pptx, pdf, pst, zip)")]
    UnsupportedFormat(String),

    /// Requested size is below the minimal valid document
    #[error(
        "target of {target} bytes is below the minimal {format} size of {minimum} bytes"
    )]
    TargetTooSmall {
        /// Format being generated
        format: FormatKind,
        /// Requested size
        target: u64,
        /// Smallest size this format can be produced at
        minimum: u64,
    },

    /// Building, injecting or writing a document failed
    #[error("{format} builder failed: {source}")]
    BuilderFailure {
        /// Format being generated
        format: FormatKind,
        /// Underlying cause
        #[source]
        source: BuilderError,
    },

    /// Engine configuration rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ForgeError {
    /// Wrap a builder error for `format`
    pub fn builder(format: FormatKind, source: BuilderError) -> Self {
        Self::BuilderFailure { format, source }
    }
}

/// Failures inside a skeleton builder
#[derive(Debug, Error)]
pub enum BuilderError {
    /// ZIP container could not be written
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// PDF object graph could not be serialized
    #[error("PDF serialization failed: {0}")]
    Pdf(String),

    /// No mail-format engine configured or the program is missing
    #[error("mail-format engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Mail-format engine ran but failed
    #[error("mail-format engine failed: {0}")]
    Engine(String),

    /// Mail engine manifest could not be encoded
    #[error("manifest encoding failed: {0}")]
    Manifest(#[from] serde_json::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
