//! Record-append builder for PST mailboxes.
//!
//! PST files are written by an external mail-format engine. The builder
//! decides the folder hierarchy and splits filler into message records of
//! bounded size; the engine turns them into a mailbox with valid header and
//! root-folder records.
//!
//! The bundled [`CommandEngine`] speaks a small file protocol:
//!
//! ```text
//! <program> [args...] --manifest <manifest.json> --output <mailbox.pst>
//! ```
//!
//! The manifest lists folders and records; each record body is a separate
//! file next to the manifest.

use super::SkeletonBuilder;
use crate::error::BuilderError;
use crate::filler::FillerUnit;
use crate::format::FormatKind;
use serde::Serialize;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Largest body carried by a single filler record (8 MiB)
pub const MAX_RECORD_BYTES: u64 = 8 * 1024 * 1024;

/// Folder created under the root folder
pub const DEFAULT_FOLDER: &str = "Inbox";

/// One message record carrying filler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillerRecord {
    /// Folder the message is filed in
    pub folder: String,
    /// Message subject
    pub subject: String,
    /// Attachment content
    pub body: FillerUnit,
}

/// Everything an engine needs to write one mailbox
#[derive(Debug, Clone)]
pub struct MailboxRequest<'a> {
    /// Sub-folders of the root folder
    pub folders: &'a [String],
    /// Filler records, possibly empty
    pub records: Vec<FillerRecord>,
}

impl MailboxRequest<'_> {
    /// Total filler bytes carried by all records
    #[must_use]
    pub fn filler_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.body.len()).sum()
    }
}

/// External mail-format engine
pub trait MailEngine {
    /// Engine name for diagnostics
    fn name(&self) -> &str;

    /// Write a mailbox for `request` and return its bytes
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::EngineUnavailable`] if the engine cannot be
    /// started and [`BuilderError::Engine`] if it fails.
    fn create(&self, request: &MailboxRequest<'_>) -> Result<Vec<u8>, BuilderError>;
}

/// Builder for PST mailboxes
pub struct MailboxBuilder {
    engine: Option<Box<dyn MailEngine>>,
    folders: Vec<String>,
}

impl MailboxBuilder {
    /// Builder backed by `engine`
    #[must_use]
    pub fn new(engine: Box<dyn MailEngine>) -> Self {
        Self {
            engine: Some(engine),
            folders: vec![DEFAULT_FOLDER.to_string()],
        }
    }

    /// Builder with no engine; every build reports the engine as unavailable
    #[must_use]
    pub fn without_engine() -> Self {
        Self {
            engine: None,
            folders: vec![DEFAULT_FOLDER.to_string()],
        }
    }

    /// Split `filler` into records of at most [`MAX_RECORD_BYTES`]
    #[must_use]
    pub fn records(&self, filler: &FillerUnit) -> Vec<FillerRecord> {
        let mut records = Vec::new();
        let mut remaining = filler.len();
        let mut index = 0u64;

        while remaining > 0 {
            let len = remaining.min(MAX_RECORD_BYTES);
            records.push(FillerRecord {
                folder: self.folders[0].clone(),
                subject: format!("Filler {:04}", index + 1),
                body: FillerUnit::with_seed(len, filler.seed().wrapping_add(index)),
            });
            remaining -= len;
            index += 1;
        }
        records
    }
}

impl fmt::Debug for MailboxBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailboxBuilder")
            .field("engine", &self.engine.as_ref().map(|e| e.name().to_string()))
            .field("folders", &self.folders)
            .finish()
    }
}

impl SkeletonBuilder for MailboxBuilder {
    fn format(&self) -> FormatKind {
        FormatKind::Pst
    }

    fn inject_filler(&self, filler: &FillerUnit) -> Result<Vec<u8>, BuilderError> {
        let engine = self.engine.as_ref().ok_or_else(|| {
            BuilderError::EngineUnavailable("no mail-format engine configured".to_string())
        })?;

        let request = MailboxRequest {
            folders: &self.folders,
            records: self.records(filler),
        };
        tracing::debug!(
            "Requesting mailbox from {} ({} records, {} filler bytes)",
            engine.name(),
            request.records.len(),
            request.filler_bytes()
        );
        engine.create(&request)
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    version: &'static str,
    folders: &'a [String],
    records: Vec<ManifestRecord<'a>>,
}

#[derive(Serialize)]
struct ManifestRecord<'a> {
    folder: &'a str,
    subject: &'a str,
    body: PathBuf,
    size: u64,
}

/// Mail-format engine run as an external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandEngine {
    /// Engine invoking `program` with `args` before the protocol arguments
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Program path
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn write_manifest(
        &self,
        dir: &Path,
        request: &MailboxRequest<'_>,
    ) -> Result<PathBuf, BuilderError> {
        let mut records = Vec::with_capacity(request.records.len());
        for (i, record) in request.records.iter().enumerate() {
            let body = dir.join(format!("record-{i:04}.bin"));
            let mut file = BufWriter::new(File::create(&body)?);
            record.body.write_to(&mut file)?;
            file.flush()?;
            records.push(ManifestRecord {
                folder: &record.folder,
                subject: &record.subject,
                body,
                size: record.body.len(),
            });
        }

        let manifest = Manifest {
            version: "unicode",
            folders: request.folders,
            records,
        };
        let path = dir.join("manifest.json");
        fs::write(&path, serde_json::to_vec_pretty(&manifest)?)?;
        Ok(path)
    }
}

impl MailEngine for CommandEngine {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("mail engine")
    }

    fn create(&self, request: &MailboxRequest<'_>) -> Result<Vec<u8>, BuilderError> {
        let workdir = tempfile::tempdir()?;
        let manifest = self.write_manifest(workdir.path(), request)?;
        let output = workdir.path().join("mailbox.pst");

        let result = Command::new(&self.program)
            .args(&self.args)
            .arg("--manifest")
            .arg(&manifest)
            .arg("--output")
            .arg(&output)
            .output();

        let run = match result {
            Ok(run) => run,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BuilderError::EngineUnavailable(format!(
                    "{} not found",
                    self.program.display()
                )));
            }
            Err(e) => return Err(BuilderError::Io(e)),
        };

        if !run.status.success() {
            let stderr = String::from_utf8_lossy(&run.stderr);
            return Err(BuilderError::Engine(format!(
                "{} exited with {}: {}",
                self.name(),
                run.status,
                stderr.trim()
            )));
        }

        fs::read(&output).map_err(|e| {
            BuilderError::Engine(format!("{} produced no mailbox: {e}", self.name()))
        })
    }
}
