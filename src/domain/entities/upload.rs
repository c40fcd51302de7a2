//! Files selected for upload and the server's answer.

use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Upload endpoint to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// `/upload/image`
    Image,
    /// `/upload/file`
    File,
}

impl UploadKind {
    /// Endpoint path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Image => "/upload/image",
            Self::File => "/upload/file",
        }
    }
}

/// A file read from disk, ready for validation and upload.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    name: String,
    mime: String,
    bytes: Bytes,
}

impl LocalFile {
    /// Creates file from raw parts.
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Creates file guessing the MIME type from the file name.
    #[must_use]
    pub fn from_name(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(Path::new(&name))
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self::new(name, mime, bytes)
    }

    /// File name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type.
    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Contents.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl std::fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Stored file as reported by the upload endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Public URL of the stored file.
    pub url: String,
    /// Name given by the server.
    #[serde(default, alias = "filename")]
    pub file_name: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// MIME type.
    #[serde(default, alias = "mimetype")]
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_guessed_from_name() {
        let file = LocalFile::from_name("cover.PNG", vec![0_u8; 4]);
        assert_eq!(file.mime(), "image/png");
        assert_eq!(file.size(), 4);
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        let file = LocalFile::from_name("blob", Vec::<u8>::new());
        assert_eq!(file.mime(), "application/octet-stream");
    }

    #[test]
    fn test_uploaded_file_aliases() {
        let json = r#"{"url": "https://cdn.example.com/a.png", "filename": "a.png", "mimetype": "image/png"}"#;
        let uploaded: UploadedFile = serde_json::from_str(json).unwrap();
        assert_eq!(uploaded.file_name.as_deref(), Some("a.png"));
        assert_eq!(uploaded.mime_type.as_deref(), Some("image/png"));
    }
}
