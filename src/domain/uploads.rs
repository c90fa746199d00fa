//! Binary attachments carried by multipart forms (post images, avatars).

use std::fmt;
use std::path::Path;

use super::error::DomainError;

/// A file read into memory, ready to become a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read `path` and guess its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let display = path.display().to_string();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| DomainError::validation(format!("`{display}` has no file name")))?;
        let bytes = std::fs::read(path).map_err(|source| DomainError::upload(&display, source))?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn from_path_guesses_content_type() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("portada.png");
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(b"\x89PNG").expect("write");

        let upload = Upload::from_path(&path).expect("upload");
        assert_eq!(upload.file_name, "portada.png");
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.len(), 4);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = Upload::from_path(Path::new("/definitely/not/here.jpg")).expect_err("missing");
        assert!(err.to_string().contains("/definitely/not/here.jpg"));
    }
}
