//! Report analysis: the upload pipeline and the in-memory record store.

pub mod actions;
pub mod error;
pub mod models;
pub mod prompts;
pub mod store;

pub use error::{MetadataError, ProviderError, StoreError, UploadError};
pub use store::{AnalysisStore, StoreSnapshot};
