use thiserror::Error;
use uuid::Uuid;

pub use crate::domains::documents::ExtractionError;

/// Failures raised before a record exists. These reach the HTTP caller.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl UploadError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Metadata extraction failed: {0}")]
    Provider(String),

    #[error("Metadata response was not valid JSON: {0}")]
    InvalidResponse(String),

    #[error("Could not identify the company from the report")]
    MissingCompany,
}

/// Failures of the background analysis call. Only ever written into a
/// record's `error` field.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("timeout")]
    Timeout,

    #[error("Analysis request failed: {0}")]
    Request(String),

    #[error("Analysis response was not valid JSON: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Analysis record not found: {0}")]
    NotFound(Uuid),
}
