//! Container-append builder for ZIP-based formats.
//!
//! Filler becomes one extra archive entry. The entry's payload is the filler
//! length minus the header bytes the entry itself adds, so a filler of `n`
//! bytes grows the archive by roughly `n`. The plain ZIP format can also carry
//! filler in the archive comment, which covers gaps too small for an entry.

use super::SkeletonBuilder;
use super::ooxml::{self, Part};
use crate::error::BuilderError;
use crate::filler::FillerUnit;
use crate::format::FormatKind;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Fixed part of a local file header
const LOCAL_HEADER_LEN: u64 = 30;

/// Fixed part of a central directory header
const CENTRAL_HEADER_LEN: u64 = 46;

/// Largest archive comment the end-of-central-directory record can hold
pub const MAX_COMMENT_LEN: u64 = u16::MAX as u64;

/// Entries at or above this size need ZIP64 extensions
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Builder for docx, xlsx, pptx and zip
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    format: FormatKind,
    parts: &'static [Part],
    filler_name: &'static str,
    comment_slot: bool,
}

impl PackageBuilder {
    /// Word-processing document
    #[must_use]
    pub fn docx() -> Self {
        Self::ooxml(FormatKind::Docx, ooxml::DOCX_PARTS, "word/media/padding.bin")
    }

    /// Spreadsheet
    #[must_use]
    pub fn xlsx() -> Self {
        Self::ooxml(FormatKind::Xlsx, ooxml::XLSX_PARTS, "xl/media/padding.bin")
    }

    /// Presentation
    #[must_use]
    pub fn pptx() -> Self {
        Self::ooxml(FormatKind::Pptx, ooxml::PPTX_PARTS, "ppt/media/padding.bin")
    }

    /// Plain archive with stored entries and a comment slot
    #[must_use]
    pub fn zip() -> Self {
        Self {
            format: FormatKind::Zip,
            parts: ooxml::ZIP_PARTS,
            filler_name: "pad.bin",
            comment_slot: true,
        }
    }

    fn ooxml(format: FormatKind, parts: &'static [Part], filler_name: &'static str) -> Self {
        Self {
            format,
            parts,
            filler_name,
            comment_slot: false,
        }
    }

    /// Name of the filler entry
    #[must_use]
    pub fn filler_name(&self) -> &'static str {
        self.filler_name
    }

    /// Compression applied to every entry, filler included
    #[must_use]
    pub fn compression(&self) -> CompressionMethod {
        if self.format.compresses_filler() {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        }
    }

    /// Bytes a zero-length filler entry adds to the archive
    #[must_use]
    pub fn entry_overhead(&self) -> u64 {
        LOCAL_HEADER_LEN + CENTRAL_HEADER_LEN + 2 * self.filler_name.len() as u64
    }

    fn options(&self, compression: CompressionMethod) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(compression)
            .last_modified_time(DateTime::default())
    }

    fn write_archive(&self, filler: &FillerUnit) -> Result<Vec<u8>, BuilderError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for part in self.parts {
            zip.start_file(part.name, self.options(self.compression()))?;
            zip.write_all(part.body.as_bytes())?;
        }

        if !filler.is_empty() {
            if self.comment_slot && filler.len() <= MAX_COMMENT_LEN {
                zip.set_comment(filler.to_text());
            } else {
                let payload = filler.resized(filler.len().saturating_sub(self.entry_overhead()));
                let options = self
                    .options(self.compression())
                    .large_file(payload.len() >= ZIP64_THRESHOLD);
                zip.start_file(self.filler_name, options)?;
                payload.write_to(&mut zip)?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }
}

impl SkeletonBuilder for PackageBuilder {
    fn format(&self) -> FormatKind {
        self.format
    }

    fn inject_filler(&self, filler: &FillerUnit) -> Result<Vec<u8>, BuilderError> {
        self.write_archive(filler)
    }

    fn min_filler(&self) -> u64 {
        if self.comment_slot {
            1
        } else {
            self.entry_overhead()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(bytes)).expect("valid archive")
    }

    #[test]
    fn test_minimal_docx_has_required_parts() {
        let builder = PackageBuilder::docx();
        let mut archive = open(builder.build_minimal().unwrap());

        assert_eq!(archive.len(), ooxml::DOCX_PARTS.len());
        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert!(document.contains("<w:t>Sample</w:t>"));
        assert!(archive.by_name(ooxml::CONTENT_TYPES).is_ok());
    }

    #[test]
    fn test_minimal_is_deterministic() {
        let builder = PackageBuilder::xlsx();
        assert_eq!(builder.build_minimal().unwrap(), builder.build_minimal().unwrap());
    }

    #[test]
    fn test_stored_entry_maps_one_to_one() {
        let builder = PackageBuilder::zip();
        let base = builder.build_minimal().unwrap().len() as u64;

        let filler = FillerUnit::new(200_000);
        let padded = builder.inject_filler(&filler).unwrap();
        assert_eq!(padded.len() as u64, base + filler.len());

        let mut archive = open(padded);
        let entry = archive.by_name("pad.bin").unwrap();
        assert_eq!(entry.size(), filler.len() - builder.entry_overhead());
        assert_eq!(entry.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_zip_comment_slot_is_exact() {
        let builder = PackageBuilder::zip();
        let base = builder.build_minimal().unwrap().len() as u64;

        for len in [1u64, 17, 1000, MAX_COMMENT_LEN] {
            let padded = builder.inject_filler(&FillerUnit::new(len)).unwrap();
            assert_eq!(padded.len() as u64, base + len, "comment filler of {len}");
            let archive = open(padded);
            assert_eq!(archive.comment().len() as u64, len);
            assert_eq!(archive.len(), 1);
        }
    }

    #[test]
    fn test_ooxml_filler_is_deflated_but_incompressible() {
        let builder = PackageBuilder::docx();
        let base = builder.build_minimal().unwrap().len() as u64;

        let filler = FillerUnit::new(256 * 1024);
        let padded = builder.inject_filler(&filler).unwrap();
        let grown = padded.len() as u64 - base;

        // Random content survives deflate almost unchanged
        let drift = grown.abs_diff(filler.len());
        assert!(drift < 256, "deflated filler drifted by {drift} bytes");

        let mut archive = open(padded);
        let entry = archive.by_name(builder.filler_name()).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn test_ooxml_has_no_comment_slot() {
        let builder = PackageBuilder::pptx();
        assert_eq!(builder.min_filler(), builder.entry_overhead());
        let padded = builder.inject_filler(&FillerUnit::new(10)).unwrap();
        let mut archive = open(padded);
        assert!(archive.comment().is_empty());
        // Tiny filler still yields a valid, empty filler entry
        assert_eq!(archive.by_name(builder.filler_name()).unwrap().size(), 0);
    }

    #[test]
    fn test_every_entry_follows_format_compression() {
        for builder in [
            PackageBuilder::docx(),
            PackageBuilder::xlsx(),
            PackageBuilder::pptx(),
            PackageBuilder::zip(),
        ] {
            let expected = if builder.format().compresses_filler() {
                CompressionMethod::Deflated
            } else {
                CompressionMethod::Stored
            };
            assert_eq!(builder.compression(), expected);

            let padded = builder.inject_filler(&FillerUnit::new(100_000)).unwrap();
            let mut archive = open(padded);
            for i in 0..archive.len() {
                let entry = archive.by_index(i).unwrap();
                assert_eq!(entry.compression(), expected, "{}", entry.name());
            }
        }
    }
}
