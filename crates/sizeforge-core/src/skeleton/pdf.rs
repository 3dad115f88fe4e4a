//! Stream-append builder for PDF.
//!
//! The skeleton is a single A4 page with one line of text. Filler is an extra
//! stream object that nothing references, so page count and layout never
//! change. `lopdf` writes the cross-reference table from the final object
//! offsets on every save.

use super::SkeletonBuilder;
use crate::error::BuilderError;
use crate::filler::FillerUnit;
use crate::format::FormatKind;
use lopdf::{Document, Object, Stream, dictionary};

/// Approximate bytes added by an empty filler stream object, including its
/// cross-reference entry
pub const FILLER_OBJECT_OVERHEAD: u64 = 64;

/// A4 in points
const MEDIA_BOX: [i64; 4] = [0, 0, 595, 842];

const PRODUCER: &str = "sizeforge";

const PAGE_CONTENT: &[u8] = b"BT\n/F1 12 Tf\n100 750 Td\n(Sample) Tj\nET\n";

/// Builder for one-page PDF documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfBuilder;

impl PdfBuilder {
    /// Create a builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn document(&self, filler: &FillerUnit) -> Document {
        let mut doc = Document::with_version("1.5");

        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, PAGE_CONTENT.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => MEDIA_BOX.iter().map(|&v| v.into()).collect::<Vec<Object>>(),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        });
        doc.trailer.set("Info", info_id);

        if !filler.is_empty() {
            let payload = filler.resized(filler.len().saturating_sub(FILLER_OBJECT_OVERHEAD));
            doc.add_object(Stream::new(dictionary! {}, payload.to_bytes()));
        }

        doc
    }
}

impl SkeletonBuilder for PdfBuilder {
    fn format(&self) -> FormatKind {
        FormatKind::Pdf
    }

    fn inject_filler(&self, filler: &FillerUnit) -> Result<Vec<u8>, BuilderError> {
        let mut doc = self.document(filler);
        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| BuilderError::Pdf(e.to_string()))?;
        Ok(out)
    }

    fn min_filler(&self) -> u64 {
        FILLER_OBJECT_OVERHEAD
    }
}
