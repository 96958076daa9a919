use std::{fmt, path::Path, pin::Pin};

use serde::{Serialize, Serializer};
use thiserror::Error;
use tokio::io::AsyncRead;
use uuid::Uuid;

pub const DEFAULT_EXTENSION: &str = "pdf";

const MAX_ID_LEN: usize = 255;
const MAX_EXTENSION_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid file identifier: {0:?}")]
pub struct InvalidFileId(pub String);

/// Public identifier of a stored file, doubling as its storage key.
///
/// A `FileId` is always a single path component, so joining it onto the
/// store root can never escape that root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl FileId {
    pub fn parse(raw: &str) -> Result<Self, InvalidFileId> {
        let invalid = || InvalidFileId(raw.to_string());

        if raw.is_empty() || raw.len() > MAX_ID_LEN {
            return Err(invalid());
        }
        if raw.starts_with('.') || raw.contains(['/', '\\', '\0']) {
            return Err(invalid());
        }
        // Catches anything the platform would still treat as more than a bare name.
        match Path::new(raw).file_name().and_then(|name| name.to_str()) {
            Some(name) if name == raw => Ok(Self(raw.to_string())),
            _ => Err(invalid()),
        }
    }

    /// Fresh random identifier with a sanitized extension, `.pdf` by default.
    pub fn generate(extension: Option<&str>) -> Self {
        let extension = extension
            .and_then(sanitize_extension)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        Self(format!("{}.{}", Uuid::new_v4(), extension))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FileId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

fn sanitize_extension(extension: &str) -> Option<String> {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty()
        || extension.len() > MAX_EXTENSION_LEN
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// Extension of a client-supplied filename, if it has one.
pub fn filename_extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|ext| ext.to_str())
}

pub type FileReader = Pin<Box<dyn AsyncRead + Send>>;

/// A stored file opened for sequential reading.
pub struct FileContent {
    pub size: u64,
    pub reader: FileReader,
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileContent")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        let id = FileId::parse("0b3c7e0e-8d7c-4c53-9a0e-3f1d2e4b5a6c.pdf").unwrap();
        assert_eq!(id.as_str(), "0b3c7e0e-8d7c-4c53-9a0e-3f1d2e4b5a6c.pdf");
        assert!(FileId::parse("missing.pdf").is_ok());
        assert!(FileId::parse("no-extension").is_ok());
    }

    #[test]
    fn rejects_traversal_and_separators() {
        for raw in [
            "",
            ".",
            "..",
            "../secret.pdf",
            "..\\secret.pdf",
            "nested/file.pdf",
            "/etc/passwd",
            ".hidden",
            "nul\0byte.pdf",
        ] {
            assert!(FileId::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn rejects_overlong_identifiers() {
        let raw = "a".repeat(MAX_ID_LEN + 1);
        assert_eq!(FileId::parse(&raw), Err(InvalidFileId(raw.clone())));
    }

    #[test]
    fn generate_defaults_to_pdf_extension() {
        let id = FileId::generate(None);
        assert!(id.as_str().ends_with(".pdf"));
        assert!(FileId::parse(id.as_str()).is_ok());
    }

    #[test]
    fn generate_keeps_sane_extensions_only() {
        assert!(FileId::generate(Some("PNG")).as_str().ends_with(".png"));
        assert!(FileId::generate(Some(".docx")).as_str().ends_with(".docx"));
        assert!(FileId::generate(Some("../x")).as_str().ends_with(".pdf"));
        assert!(FileId::generate(Some("")).as_str().ends_with(".pdf"));
    }

    #[test]
    fn generated_identifiers_are_unique() {
        assert_ne!(FileId::generate(None), FileId::generate(None));
    }

    #[test]
    fn extension_comes_from_last_filename_suffix() {
        assert_eq!(filename_extension("report.final.PDF"), Some("PDF"));
        assert_eq!(filename_extension("README"), None);
        assert_eq!(filename_extension(""), None);
    }
}
