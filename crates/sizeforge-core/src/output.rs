//! Writing finished documents.

use crate::format::FormatKind;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// Readers never observe a partially written file: the data is flushed to a
/// sibling temp file and renamed over `path` only once complete. On error the
/// temp file is removed and `path` is left untouched.
///
/// # Errors
///
/// Returns an error if the directory is not writable or the rename fails.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Default output name: `<format>_<size>.<ext>`, e.g. `docx_150KB.docx`.
///
/// Characters other than ASCII alphanumerics and `.` are dropped from the
/// size so the name is safe on every platform.
#[must_use]
pub fn default_file_name(format: FormatKind, size_input: &str) -> PathBuf {
    let size: String = size_input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();

    if size.is_empty() {
        PathBuf::from(format!("output.{}", format.extension()))
    } else {
        PathBuf::from(format!("{}_{}.{}", format, size, format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomically_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zip");

        write_atomically(&path, b"hello").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        // Only the destination remains
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomically_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, b"old contents").unwrap();

        write_atomically(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_write_atomically_missing_dir_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.docx");

        assert!(write_atomically(&path, b"data").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(
            default_file_name(FormatKind::Docx, "150KB"),
            PathBuf::from("docx_150KB.docx")
        );
        assert_eq!(
            default_file_name(FormatKind::Pdf, " 2.5 MB"),
            PathBuf::from("pdf_2.5MB.pdf")
        );
        assert_eq!(
            default_file_name(FormatKind::Zip, "../8"),
            PathBuf::from("zip_..8.zip")
        );
        assert_eq!(default_file_name(FormatKind::Pst, "  "), PathBuf::from("output.pst"));
    }
}
