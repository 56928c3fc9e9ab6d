//! Accepted input formats and the document handed to the intake flow.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// The two input formats the analysis service is asked to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Pdf,
    PlainText,
}

/// A file whose type is neither PDF nor plain text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please submit a valid PDF or TXT file (got {found}).")]
pub struct UnsupportedMediaType {
    pub found: String,
}

impl MediaType {
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
        }
    }

    /// Parse a MIME string. Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Result<Self, UnsupportedMediaType> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Ok(Self::Pdf),
            "text/plain" => Ok(Self::PlainText),
            _ => Err(UnsupportedMediaType {
                found: mime.to_string(),
            }),
        }
    }

    /// Infer the type from a file extension (`.pdf`, `.txt`).
    pub fn from_path(path: &Path) -> Result<Self, UnsupportedMediaType> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("txt") => Ok(Self::PlainText),
            _ => Err(UnsupportedMediaType {
                found: path.display().to_string(),
            }),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// A user-selected file, not yet validated.
///
/// `media_type` carries whatever the caller detected (browser-style MIME
/// string or a guess from the extension); validation happens when the
/// intake session accepts the file.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn accepted_media_type(&self) -> Result<MediaType, UnsupportedMediaType> {
        MediaType::from_mime(&self.media_type)
    }
}
