//! Skeleton builders.
//!
//! Each builder produces the minimal valid document of its format and knows
//! one validity-preserving place to put filler. The padding engine only talks
//! to the [`SkeletonBuilder`] capability; [`Builder`] closes the set of
//! formats over three injection mechanisms.

pub mod mailbox;
pub mod ooxml;
pub mod package;
pub mod pdf;

use crate::error::BuilderError;
use crate::filler::FillerUnit;
use crate::format::{FormatKind, InjectionMechanism};

pub use mailbox::{CommandEngine, FillerRecord, MailEngine, MailboxBuilder, MailboxRequest};
pub use package::PackageBuilder;
pub use pdf::PdfBuilder;

/// Capability shared by every format builder
pub trait SkeletonBuilder {
    /// Format produced by this builder
    fn format(&self) -> FormatKind;

    /// How filler is embedded
    fn mechanism(&self) -> InjectionMechanism {
        self.format().mechanism()
    }

    /// Serialize the document with `filler` embedded.
    ///
    /// Any filler length, including zero, yields a well-formed document.
    ///
    /// # Errors
    ///
    /// Returns a [`BuilderError`] if serialization fails.
    fn inject_filler(&self, filler: &FillerUnit) -> Result<Vec<u8>, BuilderError>;

    /// Serialize the document without filler
    ///
    /// # Errors
    ///
    /// Returns a [`BuilderError`] if serialization fails.
    fn build_minimal(&self) -> Result<Vec<u8>, BuilderError> {
        self.inject_filler(&FillerUnit::empty())
    }

    /// Smallest filler length that can be embedded without overshooting
    /// by more than the filler itself
    fn min_filler(&self) -> u64 {
        1
    }

    /// Byte length of a serialized document
    fn measure(&self, document: &[u8]) -> u64 {
        crate::verify::measure(document)
    }
}

/// Collaborators needed by some builders
#[derive(Debug, Clone, Default)]
pub struct BuilderOptions {
    /// External engine used to write PST mailboxes
    pub mail_engine: Option<CommandEngine>,
}

/// Builder for any supported format
#[derive(Debug)]
pub enum Builder {
    /// ZIP-based containers (docx, xlsx, pptx, zip)
    Package(PackageBuilder),
    /// PDF
    Pdf(PdfBuilder),
    /// PST mailbox
    Mailbox(MailboxBuilder),
}

impl Builder {
    /// Select the builder for `format`
    #[must_use]
    pub fn for_format(format: FormatKind, options: BuilderOptions) -> Self {
        match format {
            FormatKind::Docx => Self::Package(PackageBuilder::docx()),
            FormatKind::Xlsx => Self::Package(PackageBuilder::xlsx()),
            FormatKind::Pptx => Self::Package(PackageBuilder::pptx()),
            FormatKind::Zip => Self::Package(PackageBuilder::zip()),
            FormatKind::Pdf => Self::Pdf(PdfBuilder::new()),
            FormatKind::Pst => Self::Mailbox(match options.mail_engine {
                Some(engine) => MailboxBuilder::new(Box::new(engine)),
                None => MailboxBuilder::without_engine(),
            }),
        }
    }

    fn inner(&self) -> &dyn SkeletonBuilder {
        match self {
            Self::Package(b) => b,
            Self::Pdf(b) => b,
            Self::Mailbox(b) => b,
        }
    }
}

impl SkeletonBuilder for Builder {
    fn format(&self) -> FormatKind {
        self.inner().format()
    }

    fn inject_filler(&self, filler: &FillerUnit) -> Result<Vec<u8>, BuilderError> {
        self.inner().inject_filler(filler)
    }

    fn build_minimal(&self) -> Result<Vec<u8>, BuilderError> {
        self.inner().build_minimal()
    }

    fn min_filler(&self) -> u64 {
        self.inner().min_filler()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_format_covers_every_format() {
        for format in FormatKind::ALL {
            let builder = Builder::for_format(format, BuilderOptions::default());
            assert_eq!(builder.format(), format);
            assert_eq!(builder.mechanism(), format.mechanism());
        }
    }

    #[test]
    fn test_pst_without_engine_fails_cleanly() {
        let builder = Builder::for_format(FormatKind::Pst, BuilderOptions::default());
        let err = builder.build_minimal().unwrap_err();
        assert!(matches!(err, BuilderError::EngineUnavailable(_)));
    }
}
