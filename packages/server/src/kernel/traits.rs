// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for, when to store and how to react to failures lives in
// the domain layer (domains/analysis/actions).
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseReportCatalog)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::analysis::models::{CompanyType, FinancialAnalysis, ReportMetadata};
use crate::domains::documents::ExtractionError;
use crate::domains::reports::CompanyWithReports;

// =============================================================================
// AI Trait (Infrastructure - structured LLM output)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Generate output constrained by `schema` with the given model.
    /// Returns the raw JSON string; parse with serde_json in calling code.
    async fn generate_structured(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String>;
}

// =============================================================================
// Document Parser Trait (Infrastructure - text extraction)
// =============================================================================

#[async_trait]
pub trait BaseDocumentParser: Send + Sync {
    /// Convert uploaded bytes into plain text
    async fn extract_text(&self, bytes: &[u8], mime_type: &str) -> Result<String, ExtractionError>;
}

// =============================================================================
// Report Catalog Trait (Infrastructure - durable storage)
// =============================================================================

#[async_trait]
pub trait BaseReportCatalog: Send + Sync {
    /// Companies with their reports and each report's latest analysis
    async fn list_companies_with_reports(&self) -> Result<Vec<CompanyWithReports>>;

    /// Persist a successful analysis together with its company and report,
    /// all or nothing
    async fn record_completed_analysis(
        &self,
        metadata: &ReportMetadata,
        company_type: CompanyType,
        analysis: &FinancialAnalysis,
        document_name: Option<&str>,
    ) -> Result<()>;
}
