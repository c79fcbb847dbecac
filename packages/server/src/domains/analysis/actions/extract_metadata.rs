//! Filing metadata from report text (synchronous step of the upload).

use openrouter_client::{strip_code_blocks, StructuredOutput};
use tracing::{debug, info};

use crate::domains::analysis::error::MetadataError;
use crate::domains::analysis::models::ReportMetadata;
use crate::domains::analysis::prompts::METADATA_EXTRACTION_PROMPT;
use crate::kernel::ServerDeps;

/// Metadata sits on the cover and first pages; the rest is not sent.
pub const METADATA_TEXT_LIMIT: usize = 20_000;

pub async fn extract_metadata(
    text: &str,
    deps: &ServerDeps,
) -> Result<ReportMetadata, MetadataError> {
    let excerpt = leading_chars(text, METADATA_TEXT_LIMIT);
    let user_prompt = format!("Financial report (opening section):\n\n{}", excerpt);

    let raw = deps
        .ai
        .generate_structured(
            &deps.settings.metadata_model,
            METADATA_EXTRACTION_PROMPT,
            &user_prompt,
            ReportMetadata::strict_schema(),
        )
        .await
        .map_err(|e| MetadataError::Provider(e.to_string()))?;

    let metadata = parse_metadata(&raw)?;
    info!(
        company = %metadata.company_name,
        symbol = %metadata.company_symbol,
        period = %metadata.period_label(),
        "Extracted report metadata"
    );
    Ok(metadata)
}

fn parse_metadata(raw: &str) -> Result<ReportMetadata, MetadataError> {
    let metadata: ReportMetadata = serde_json::from_str(strip_code_blocks(raw)).map_err(|e| {
        debug!(response = raw, "Unparseable metadata response");
        MetadataError::InvalidResponse(e.to_string())
    })?;

    let metadata = metadata.normalized();
    if metadata.company_name.is_empty() {
        return Err(MetadataError::MissingCompany);
    }
    Ok(metadata)
}

/// The first `n` characters of `text`.
pub(crate) fn leading_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
