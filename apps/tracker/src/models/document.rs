use std::path::Path;

use bytes::Bytes;

use crate::api::FormPart;
use crate::errors::TrackerError;

pub const PDF_MIME: &str = "application/pdf";

/// A file attached to a resume or cover-letter form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl DocumentUpload {
    pub fn pdf(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: PDF_MIME.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Reads a PDF from disk. The file name must carry a `.pdf` extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TrackerError::Validation(format!("'{}' is not a file path", path.display()))
            })?
            .to_string();

        let upload = Self::pdf(file_name, tokio::fs::read(path).await?);
        upload.validate()?;
        Ok(upload)
    }

    /// Only PDF uploads are accepted by the backend.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.mime_type != PDF_MIME || !self.file_name.to_lowercase().ends_with(".pdf") {
            return Err(TrackerError::Validation(format!(
                "Only PDF files are supported, got '{}'",
                self.file_name
            )));
        }
        if self.bytes.is_empty() {
            return Err(TrackerError::Validation(format!(
                "'{}' is empty",
                self.file_name
            )));
        }
        Ok(())
    }
}

/// The body of a resume or cover letter: an uploaded PDF the backend extracts
/// text from, or text supplied directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Upload(DocumentUpload),
    Text(String),
}

impl Document {
    pub fn validate(&self) -> Result<(), TrackerError> {
        match self {
            Document::Upload(upload) => upload.validate(),
            Document::Text(text) if text.trim().is_empty() => Err(TrackerError::Validation(
                "document text must not be empty".to_string(),
            )),
            Document::Text(_) => Ok(()),
        }
    }

    pub(crate) fn form_part(&self) -> FormPart {
        match self {
            Document::Upload(upload) => FormPart::File {
                name: "file",
                upload: upload.clone(),
            },
            Document::Text(text) => FormPart::Text {
                name: "content",
                value: text.trim().to_string(),
            },
        }
    }
}
