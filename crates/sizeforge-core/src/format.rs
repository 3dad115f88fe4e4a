//! Supported output formats and how each one accepts filler.

use crate::error::ForgeError;
use std::fmt;
use std::str::FromStr;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// Word-processing document (OOXML)
    Docx,
    /// Spreadsheet (OOXML)
    Xlsx,
    /// Presentation (OOXML)
    Pptx,
    /// PDF document
    Pdf,
    /// Outlook personal storage mailbox
    Pst,
    /// Plain ZIP archive
    Zip,
}

/// How filler is embedded without breaking the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionMechanism {
    /// Extra archive entry (and archive comment where allowed)
    ContainerAppend,
    /// Extra PDF stream object, cross-reference table rebuilt
    StreamAppend,
    /// Extra mailbox message records
    RecordAppend,
}

impl FormatKind {
    /// Every supported format
    pub const ALL: [FormatKind; 6] = [
        Self::Docx,
        Self::Xlsx,
        Self::Pptx,
        Self::Pdf,
        Self::Pst,
        Self::Zip,
    ];

    /// Lowercase format token, also used as the file extension
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
            Self::Pst => "pst",
            Self::Zip => "zip",
        }
    }

    /// File extension without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Injection mechanism used for this format
    #[must_use]
    pub const fn mechanism(self) -> InjectionMechanism {
        match self {
            Self::Docx | Self::Xlsx | Self::Pptx | Self::Zip => InjectionMechanism::ContainerAppend,
            Self::Pdf => InjectionMechanism::StreamAppend,
            Self::Pst => InjectionMechanism::RecordAppend,
        }
    }

    /// Accepted distance below the target, in bytes.
    ///
    /// Plain ZIP can hit any size through its archive comment. PDF drifts by a
    /// digit when the filler `/Length` crosses a power of ten. OOXML filler is
    /// deflated, which adds a few bytes per 64 KiB block. PST layout belongs to
    /// the external engine and is only coarsely controllable.
    #[must_use]
    pub const fn default_tolerance(self) -> u64 {
        match self {
            Self::Zip => 0,
            Self::Pdf => 16,
            Self::Docx | Self::Xlsx | Self::Pptx => 64,
            Self::Pst => 512,
        }
    }

    /// Whether filler is deflated inside the container
    #[must_use]
    pub const fn compresses_filler(self) -> bool {
        matches!(self, Self::Docx | Self::Xlsx | Self::Pptx)
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let token = token.strip_prefix('.').unwrap_or(token);
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ForgeError::UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_tokens() {
        for format in FormatKind::ALL {
            assert_eq!(format.as_str().parse::<FormatKind>().unwrap(), format);
        }
    }

    #[test]
    fn test_parse_case_and_dot() {
        assert_eq!("DOCX".parse::<FormatKind>().unwrap(), FormatKind::Docx);
        assert_eq!(".pdf".parse::<FormatKind>().unwrap(), FormatKind::Pdf);
        assert_eq!(" Zip ".parse::<FormatKind>().unwrap(), FormatKind::Zip);
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "odt".parse::<FormatKind>().unwrap_err();
        assert!(matches!(err, ForgeError::UnsupportedFormat(ref t) if t == "odt"));
        assert!("".parse::<FormatKind>().is_err());
    }

    #[test]
    fn test_mechanisms() {
        assert_eq!(FormatKind::Docx.mechanism(), InjectionMechanism::ContainerAppend);
        assert_eq!(FormatKind::Zip.mechanism(), InjectionMechanism::ContainerAppend);
        assert_eq!(FormatKind::Pdf.mechanism(), InjectionMechanism::StreamAppend);
        assert_eq!(FormatKind::Pst.mechanism(), InjectionMechanism::RecordAppend);
    }

    #[test]
    fn test_only_ooxml_compresses_filler() {
        let compressed: Vec<_> = FormatKind::ALL
            .into_iter()
            .filter(|f| f.compresses_filler())
            .collect();
        assert_eq!(
            compressed,
            vec![FormatKind::Docx, FormatKind::Xlsx, FormatKind::Pptx]
        );
    }
}
