//! Checking uploaded files before extraction.

use std::path::Path;

use anyhow::{Context, Result};

/// MIME type of the only accepted uploads.
pub const PDF_MIME: &str = "application/pdf";

const FALLBACK_MIME: &str = "application/octet-stream";

/// Reasons that an upload is not accepted for extraction.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("{name:?} is not a PDF file (MIME type {mime:?}); please upload a PDF")]
    NotPdf { name: String, mime: String },
}

/// A file accepted for extraction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Upload {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl Upload {
    /// Accepts a file only if `mime` is [PDF_MIME]. The file contents are not inspected.
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadError> {
        let name = name.into();
        let mime = mime.into();
        if mime != PDF_MIME {
            return Err(UploadError::NotPdf { name, mime });
        }
        Ok(Self { name, mime, bytes })
    }

    /// Reads the file at `path`. Its MIME type is `mime` if given, otherwise guessed from the
    /// file extension.
    pub fn from_path(path: &Path, mime: Option<&str>) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime.unwrap_or_else(|| guess_mime(path));

        // Check the type before reading a potentially large unrelated file.
        if mime != PDF_MIME {
            return Err(UploadError::NotPdf {
                name,
                mime: mime.to_string(),
            }
            .into());
        }

        let bytes = std::fs::read(path).with_context(|| format!("reading {path:?}"))?;
        log::debug!("Read {} bytes from {:?}.", bytes.len(), path);
        Ok(Self::new(name, mime, bytes)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Guesses a MIME type from the extension of `path`. Only PDFs are recognised.
pub fn guess_mime(path: &Path) -> &'static str {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME,
        _ => FALLBACK_MIME,
    }
}
