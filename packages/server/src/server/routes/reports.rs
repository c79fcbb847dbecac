//! GET /api/reports
//!
//! Durable catalog view. Only available when a database is configured.

use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::domains::reports::CompanyWithReports;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

#[derive(Serialize)]
pub struct ReportsResponse {
    companies: Vec<CompanyWithReports>,
}

pub async fn reports_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<ReportsResponse>, ApiError> {
    let catalog = state
        .deps
        .catalog
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Report catalog is not configured"))?;

    let companies = catalog.list_companies_with_reports().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list report catalog");
        ApiError::internal("Failed to load reports")
    })?;

    Ok(Json(ReportsResponse { companies }))
}
