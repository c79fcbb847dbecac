//! The long-running analysis call, run after the upload response is out.

use std::time::Instant;

use openrouter_client::{strip_code_blocks, OpenRouterError, StructuredOutput};
use tracing::{debug, info};

use crate::domains::analysis::error::ProviderError;
use crate::domains::analysis::models::{CompanyType, FinancialAnalysis, ReportMetadata};
use crate::domains::analysis::prompts::analysis_system_prompt;
use crate::kernel::ServerDeps;

/// Run the full analysis within the configured wall-clock budget.
pub async fn run_analysis(
    text: &str,
    metadata: &ReportMetadata,
    company_type: CompanyType,
    deps: &ServerDeps,
) -> Result<FinancialAnalysis, ProviderError> {
    let system_prompt = analysis_system_prompt(company_type);
    let user_prompt = build_user_prompt(text, metadata, company_type);
    let start = Instant::now();

    let call = deps.ai.generate_structured(
        &deps.settings.analysis_model,
        &system_prompt,
        &user_prompt,
        FinancialAnalysis::strict_schema(),
    );

    let raw = match tokio::time::timeout(deps.settings.analysis_timeout, call).await {
        Err(_elapsed) => return Err(ProviderError::Timeout),
        Ok(Err(e)) => return Err(classify_provider_error(e)),
        Ok(Ok(raw)) => raw,
    };

    let analysis: FinancialAnalysis = serde_json::from_str(strip_code_blocks(&raw)).map_err(|e| {
        debug!(response_len = raw.len(), "Unparseable analysis response");
        ProviderError::InvalidResponse(e.to_string())
    })?;

    info!(
        company = %metadata.company_name,
        model = %deps.settings.analysis_model,
        duration_ms = start.elapsed().as_millis() as u64,
        "Analysis generated"
    );
    Ok(analysis)
}

fn classify_provider_error(err: anyhow::Error) -> ProviderError {
    match err.downcast_ref::<OpenRouterError>() {
        Some(e) if e.is_timeout() => ProviderError::Timeout,
        _ => ProviderError::Request(err.to_string()),
    }
}

pub(crate) fn build_user_prompt(
    text: &str,
    metadata: &ReportMetadata,
    company_type: CompanyType,
) -> String {
    let consensus =
        serde_json::to_string_pretty(&metadata.consensus()).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Company type: {}\n\
         Company: {} ({})\n\
         Period: {}\n\
         Consensus baseline: {}\n\
         \n\
         Report:\n\
         {}\n\
         \n\
         Fill every field of the schema with detailed content. results_table must have 5-7 rows of key metrics.",
        company_type.label(),
        metadata.company_name,
        metadata.company_symbol,
        metadata.period_label(),
        consensus,
        text,
    )
}
