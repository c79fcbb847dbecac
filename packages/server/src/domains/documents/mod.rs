//! Text extraction from uploaded report files.

pub mod pdf;
pub mod spreadsheet;

use async_trait::async_trait;
use thiserror::Error;

use crate::kernel::BaseDocumentParser;

pub const PDF_MIME: &str = "application/pdf";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME: &str = "application/vnd.ms-excel";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document: {0}")]
    Parse(String),

    #[error("Extracted text is too short ({len} characters, need at least {min}); the document may be scanned or empty")]
    TooShort { len: usize, min: usize },
}

/// Document kinds the parser can read, resolved from a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Xlsx,
    Text,
}

impl DocumentFormat {
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => Some(Self::Pdf),
            XLSX_MIME => Some(Self::Xlsx),
            s if s.starts_with("text/") => Some(Self::Text),
            _ => None,
        }
    }
}

/// Extract plain text from `bytes` according to `mime_type`. Blocking.
pub fn extract_text(bytes: &[u8], mime_type: &str) -> Result<String, ExtractionError> {
    match DocumentFormat::from_mime(mime_type) {
        Some(DocumentFormat::Pdf) => pdf::extract_text(bytes),
        Some(DocumentFormat::Xlsx) => spreadsheet::extract_text(bytes),
        Some(DocumentFormat::Text) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        None => Err(ExtractionError::UnsupportedFormat(mime_type.to_string())),
    }
}

/// Production parser; runs extraction on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BaseDocumentParser for DocumentParser {
    async fn extract_text(&self, bytes: &[u8], mime_type: &str) -> Result<String, ExtractionError> {
        let bytes = bytes.to_vec();
        let mime_type = mime_type.to_string();

        tokio::task::spawn_blocking(move || {
            let _span = tracing::info_span!("documents.extract", mime_type = %mime_type).entered();
            extract_text(&bytes, &mime_type)
        })
        .await
        .map_err(|e| ExtractionError::Parse(format!("extraction task failed: {}", e)))?
    }
}
