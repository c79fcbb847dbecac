//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by the
//! upload pipeline and the read routes. All external services use trait
//! abstractions to enable testing.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::domains::analysis::AnalysisStore;
use crate::kernel::{BaseAI, BaseDocumentParser, BaseReportCatalog};

/// Tunables for the metadata and analysis steps.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub analysis_model: String,
    pub metadata_model: String,
    /// Extracted text shorter than this is rejected as scanned or garbled
    pub min_text_length: usize,
    /// Wall-clock budget for one background analysis call
    pub analysis_timeout: Duration,
}

impl AnalysisSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            analysis_model: config.analysis_model.clone(),
            metadata_model: config.metadata_model.clone(),
            min_text_length: config.min_report_text_length,
            analysis_timeout: config.analysis_timeout,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            analysis_model: crate::config::DEFAULT_ANALYSIS_MODEL.to_string(),
            metadata_model: crate::config::DEFAULT_METADATA_MODEL.to_string(),
            min_text_length: crate::config::DEFAULT_MIN_REPORT_TEXT_LENGTH,
            analysis_timeout: Duration::from_secs(crate::config::DEFAULT_ANALYSIS_TIMEOUT_SECS),
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub ai: Arc<dyn BaseAI>,
    pub document_parser: Arc<dyn BaseDocumentParser>,
    /// In-memory registry backing the dashboard
    pub store: AnalysisStore,
    /// Durable report catalog (only when DATABASE_URL is configured)
    pub catalog: Option<Arc<dyn BaseReportCatalog>>,
    pub settings: AnalysisSettings,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseAI>,
        document_parser: Arc<dyn BaseDocumentParser>,
        store: AnalysisStore,
        catalog: Option<Arc<dyn BaseReportCatalog>>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            ai,
            document_parser,
            store,
            catalog,
            settings,
        }
    }
}
