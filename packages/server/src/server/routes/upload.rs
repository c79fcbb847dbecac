//! POST /api/reports/upload
//!
//! Multipart form with a `file` field and an optional `companyType` field.
//! Responds as soon as the processing record exists; the analysis is
//! released only after the response body has been built.

use axum::{
    extract::{Extension, Multipart},
    response::{IntoResponse, Response},
    Json,
};

use crate::domains::analysis::actions::{upload_report, UploadedFile};
use crate::domains::analysis::models::CompanyType;
use crate::domains::documents::{PDF_MIME, XLSX_MIME};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

pub async fn upload_handler(
    Extension(state): Extension<AxumAppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut company_type_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let declared = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

                file = Some(UploadedFile {
                    mime_type: resolve_mime(declared.as_deref(), file_name.as_deref()),
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            Some("companyType") | Some("company_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                company_type_raw = Some(value);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    let company_type = match company_type_raw.as_deref().map(str::trim) {
        None | Some("") => CompanyType::default(),
        Some(raw) => raw.parse::<CompanyType>().map_err(ApiError::bad_request)?,
    };

    let (accepted, ticket) = upload_report(file, company_type, &state.deps).await?;

    let response = Json(accepted).into_response();
    ticket.release();
    Ok(response)
}

/// Declared content type, or one inferred from the file extension when the
/// client sent none or a generic binary type.
fn resolve_mime(declared: Option<&str>, file_name: Option<&str>) -> String {
    if let Some(declared) = declared.filter(|d| !d.is_empty() && *d != "application/octet-stream") {
        return declared.to_string();
    }

    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("xlsx") => XLSX_MIME,
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        _ => declared.unwrap_or("application/octet-stream"),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mime() {
        assert_eq!(resolve_mime(Some("application/pdf"), Some("x.xlsx")), PDF_MIME);
        assert_eq!(resolve_mime(None, Some("10-K.PDF")), PDF_MIME);
        assert_eq!(
            resolve_mime(Some("application/octet-stream"), Some("model.xlsx")),
            XLSX_MIME
        );
        assert_eq!(resolve_mime(None, Some("notes")), "application/octet-stream");
        assert_eq!(resolve_mime(None, None), "application/octet-stream");
    }
}
