//! Upload pipeline: extract text, derive metadata, register a processing
//! record, then hand the slow analysis to a background task.
//!
//! Everything before the record exists fails the request. Everything after
//! is absorbed into the record's terminal update.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::extract_metadata::extract_metadata;
use super::run_analysis::run_analysis;
use crate::domains::analysis::error::{ExtractionError, ProviderError, UploadError};
use crate::domains::analysis::models::{
    AnalysisPatch, AnalysisRecord, CompanyType, FinancialAnalysis, NewAnalysisRecord,
    ReportMetadata,
};
use crate::domains::documents::DocumentFormat;
use crate::kernel::{BaseReportCatalog, ServerDeps};

const CATALOG_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Body returned to the client once the record is registered.
#[derive(Debug, Clone, Serialize)]
pub struct UploadAccepted {
    pub success: bool,
    pub analysis_id: Uuid,
    pub company_type: CompanyType,
    pub metadata: ReportMetadata,
    pub status: &'static str,
    pub message: String,
}

/// Holds back the background analysis until released.
///
/// Releasing or dropping the ticket both let the analysis start; the
/// record always receives exactly one terminal update.
#[must_use = "the background analysis starts when the ticket is released or dropped"]
pub struct AnalysisTicket {
    analysis_id: Uuid,
    gate: oneshot::Sender<()>,
}

impl AnalysisTicket {
    pub fn analysis_id(&self) -> Uuid {
        self.analysis_id
    }

    /// Let the background analysis begin.
    pub fn release(self) {
        let _ = self.gate.send(());
    }
}

pub async fn upload_report(
    file: UploadedFile,
    company_type: CompanyType,
    deps: &ServerDeps,
) -> Result<(UploadAccepted, AnalysisTicket), UploadError> {
    validate(&file)?;

    info!(
        file = file.file_name.as_deref().unwrap_or("<unnamed>"),
        mime_type = %file.mime_type,
        size = file.bytes.len(),
        company_type = %company_type,
        "Processing report upload"
    );

    let text = deps
        .document_parser
        .extract_text(&file.bytes, &file.mime_type)
        .await?;
    let len = text.trim().chars().count();
    if len < deps.settings.min_text_length {
        return Err(ExtractionError::TooShort {
            len,
            min: deps.settings.min_text_length,
        }
        .into());
    }

    let metadata = extract_metadata(&text, deps).await?;

    let mut new_record = NewAnalysisRecord::processing(metadata.clone(), company_type);
    if let Some(name) = &file.file_name {
        new_record = new_record.with_file_name(name.clone());
    }
    let record = deps.store.add(new_record).await;
    info!(analysis_id = %record.id, company = %record.company_name, "Created processing record");

    let (gate, released) = oneshot::channel();
    tokio::spawn(analyze_in_background(
        deps.clone(),
        record.clone(),
        text,
        metadata.clone(),
        released,
    ));

    let accepted = UploadAccepted {
        success: true,
        analysis_id: record.id,
        company_type,
        metadata,
        status: "processing",
        message: "Analysis started; refresh the dashboard to see the result".to_string(),
    };
    let ticket = AnalysisTicket {
        analysis_id: record.id,
        gate,
    };
    Ok((accepted, ticket))
}

fn validate(file: &UploadedFile) -> Result<(), UploadError> {
    if file.bytes.is_empty() {
        return Err(UploadError::invalid_input("Uploaded file is empty"));
    }
    if DocumentFormat::from_mime(&file.mime_type).is_none() {
        return Err(UploadError::invalid_input(format!(
            "Unsupported file type '{}': upload a PDF, XLSX or text document",
            file.mime_type
        )));
    }
    Ok(())
}

async fn analyze_in_background(
    deps: ServerDeps,
    record: AnalysisRecord,
    text: String,
    metadata: ReportMetadata,
    released: oneshot::Receiver<()>,
) {
    // A dropped ticket opens the gate too
    let _ = released.await;

    let id = record.id;
    let company_type = record.company_type;

    // Run in a child task so a panic still ends in a terminal update
    let worker = {
        let deps = deps.clone();
        let metadata = metadata.clone();
        tokio::spawn(async move { run_analysis(&text, &metadata, company_type, &deps).await })
    };
    let outcome: Result<FinancialAnalysis, ProviderError> = match worker.await {
        Ok(result) => result,
        Err(e) => Err(ProviderError::Request(format!("analysis task aborted: {}", e))),
    };

    // The terminal update never waits on the catalog
    let (patch, mirrored) = match outcome {
        Ok(analysis) => {
            info!(analysis_id = %id, company = %record.company_name, "Analysis completed");
            let mirrored = deps.catalog.is_some().then(|| analysis.clone());
            (AnalysisPatch::completed(analysis), mirrored)
        }
        Err(e) => {
            warn!(analysis_id = %id, company = %record.company_name, error = %e, "Analysis failed");
            (AnalysisPatch::failed(e.to_string()), None)
        }
    };

    if let Err(e) = deps.store.update(id, patch).await {
        error!(analysis_id = %id, error = %e, "Terminal update lost: record missing from store");
    }

    if let (Some(catalog), Some(analysis)) = (&deps.catalog, mirrored) {
        mirror_to_catalog(catalog.as_ref(), &record, &metadata, &analysis).await;
    }
}

/// Best-effort copy of a completed analysis into the durable catalog.
async fn mirror_to_catalog(
    catalog: &dyn BaseReportCatalog,
    record: &AnalysisRecord,
    metadata: &ReportMetadata,
    analysis: &FinancialAnalysis,
) {
    let id = record.id;

    // Companies are keyed by ticker
    if metadata.company_symbol.is_empty() {
        warn!(
            analysis_id = %id,
            company = %record.company_name,
            "No ticker symbol, skipping report catalog"
        );
        return;
    }

    let write = catalog.record_completed_analysis(
        metadata,
        record.company_type,
        analysis,
        record.file_name.as_deref(),
    );
    match tokio::time::timeout(CATALOG_WRITE_TIMEOUT, write).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(analysis_id = %id, error = %e, "Failed to persist analysis to catalog");
        }
        Err(_) => {
            error!(
                analysis_id = %id,
                timeout_secs = CATALOG_WRITE_TIMEOUT.as_secs(),
                "Report catalog write timed out"
            );
        }
    }
}
