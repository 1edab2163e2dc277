//! Document text extraction: PDF, DOCX and plain text uploads.
//!
//! Format detection prefers the declared content type and falls back to the
//! file extension when the type is missing or generic.

pub mod docx;
pub mod pdf;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    JobDescription,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::JobDescription => "job description",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let declared = content_type
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase()
            })
            .filter(|ct| !ct.is_empty() && ct != GENERIC_CONTENT_TYPE);

        match declared.as_deref() {
            Some("application/pdf") => Some(DocumentFormat::Pdf),
            Some(DOCX_CONTENT_TYPE) => Some(DocumentFormat::Docx),
            Some("text/plain") => Some(DocumentFormat::PlainText),
            Some(_) => None,
            None => Self::from_extension(file_name?),
        }
    }

    fn from_extension(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())?;

        match extension.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File is too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),
}

/// Extracted text of one uploaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub kind: DocumentKind,
    pub text: String,
    pub source_name: Option<String>,
}

impl Document {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn extract_document(
    kind: DocumentKind,
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: &[u8],
    max_bytes: usize,
) -> Result<Document, DocumentError> {
    if data.len() > max_bytes {
        return Err(DocumentError::TooLarge {
            size: data.len(),
            limit: max_bytes,
        });
    }

    let format = DocumentFormat::detect(content_type, file_name).ok_or_else(|| {
        DocumentError::UnsupportedType(
            content_type
                .or(file_name)
                .unwrap_or("unknown")
                .to_string(),
        )
    })?;

    let text = match format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(data)?,
        DocumentFormat::Docx => docx::extract_docx_text(data)?,
        DocumentFormat::PlainText => String::from_utf8_lossy(data).into_owned(),
    };

    Ok(Document {
        kind,
        text,
        source_name: file_name.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024;

    #[test]
    fn test_detect_from_content_type() {
        assert_eq!(
            DocumentFormat::detect(Some("application/pdf"), Some("cv.txt")),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::detect(Some(DOCX_CONTENT_TYPE), None),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::detect(Some("text/plain; charset=utf-8"), None),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(
            DocumentFormat::detect(None, Some("Resume.PDF")),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::detect(Some("application/octet-stream"), Some("jd.docx")),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::detect(None, Some("notes")), None);
        assert_eq!(DocumentFormat::detect(None, None), None);
    }

    #[test]
    fn test_unknown_declared_type_is_unsupported() {
        assert_eq!(DocumentFormat::detect(Some("image/png"), Some("cv.pdf")), None);

        let err = extract_document(
            DocumentKind::Resume,
            Some("photo.png"),
            Some("image/png"),
            b"\x89PNG",
            LIMIT,
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedType(t) if t == "image/png"));
    }

    #[test]
    fn test_plain_text_document() {
        let doc = extract_document(
            DocumentKind::JobDescription,
            Some("jd.txt"),
            None,
            "Python, SQL and Kubernetes".as_bytes(),
            LIMIT,
        )
        .unwrap();

        assert_eq!(doc.kind, DocumentKind::JobDescription);
        assert_eq!(doc.source_name.as_deref(), Some("jd.txt"));
        assert_eq!(doc.word_count(), 4);
        assert_eq!(doc.char_count(), 26);
    }

    #[test]
    fn test_oversized_upload_is_rejected() {
        let data = vec![b'a'; LIMIT + 1];
        let err =
            extract_document(DocumentKind::Resume, Some("cv.txt"), None, &data, LIMIT).unwrap_err();
        assert!(matches!(err, DocumentError::TooLarge { size, limit } if size == LIMIT + 1 && limit == LIMIT));
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let doc = extract_document(DocumentKind::Resume, Some("cv.txt"), None, b"", LIMIT).unwrap();
        assert_eq!(doc.word_count(), 0);
    }
}
