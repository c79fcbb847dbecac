use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CompanyType, FinancialAnalysis, ReportMetadata};

/// One uploaded report tracked from upload to terminal analysis outcome.
///
/// Lifecycle: created `{processing: true}`, then exactly one terminal update
/// to either `{processed: true, <analysis>}` or `{error: <message>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub company_name: String,
    pub company_symbol: String,
    pub company_type: CompanyType,
    pub report_type: String,
    pub fiscal_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_quarter: Option<u8>,
    pub filing_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processing: bool,
    pub processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Analysis sections, exposed at the top level of the record's JSON
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<FinancialAnalysis>,
}

/// Lifecycle stage derived from the record's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

impl AnalysisRecord {
    pub fn status(&self) -> AnalysisStatus {
        if self.processing {
            AnalysisStatus::Processing
        } else if self.processed {
            AnalysisStatus::Completed
        } else {
            AnalysisStatus::Failed
        }
    }

    pub fn is_terminal(&self) -> bool {
        !self.processing
    }

    /// Overlay the fields present in `patch`. Identity, timestamps and
    /// filing metadata are not patchable.
    pub(crate) fn apply(&mut self, patch: AnalysisPatch) {
        if let Some(processing) = patch.processing {
            self.processing = processing;
        }
        if let Some(processed) = patch.processed {
            self.processed = processed;
        }
        if let Some(error) = patch.error {
            self.error = error;
        }
        if let Some(analysis) = patch.analysis {
            self.analysis = Some(analysis);
        }
    }
}

/// Input to [`AnalysisStore::add`](crate::domains::analysis::AnalysisStore::add).
///
/// The store assigns `id`; `created_at` defaults to now.
#[derive(Debug, Clone)]
pub struct NewAnalysisRecord {
    pub company_type: CompanyType,
    pub metadata: ReportMetadata,
    pub file_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewAnalysisRecord {
    pub fn processing(metadata: ReportMetadata, company_type: CompanyType) -> Self {
        Self {
            company_type,
            metadata,
            file_name: None,
            created_at: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub(crate) fn into_record(self, id: Uuid) -> AnalysisRecord {
        let metadata = self.metadata;
        AnalysisRecord {
            id,
            company_name: metadata.company_name,
            company_symbol: metadata.company_symbol,
            company_type: self.company_type,
            report_type: metadata.report_type,
            fiscal_year: metadata.fiscal_year,
            fiscal_quarter: metadata.fiscal_quarter,
            filing_date: metadata.filing_date,
            file_name: self.file_name,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            processing: true,
            processed: false,
            error: None,
            analysis: None,
        }
    }
}

/// Field-wise patch applied in place by the store.
///
/// `None` leaves a field untouched. `error: Some(None)` clears the error.
#[derive(Debug, Clone, Default)]
pub struct AnalysisPatch {
    pub processing: Option<bool>,
    pub processed: Option<bool>,
    pub error: Option<Option<String>>,
    pub analysis: Option<FinancialAnalysis>,
}

impl AnalysisPatch {
    /// Terminal success.
    pub fn completed(analysis: FinancialAnalysis) -> Self {
        Self {
            processing: Some(false),
            processed: Some(true),
            error: Some(None),
            analysis: Some(analysis),
        }
    }

    /// Terminal failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            processing: Some(false),
            processed: Some(false),
            error: Some(Some(message.into())),
            analysis: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.processing == Some(false)
    }
}
