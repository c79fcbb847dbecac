//! Postgres-backed report catalog.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;

use super::models::{
    AnalysisResultRecord, Company, CreateAnalysisResult, CreateFinancialReport, FinancialReport,
};
use crate::domains::analysis::models::{CompanyType, FinancialAnalysis, ReportMetadata};
use crate::kernel::BaseReportCatalog;

/// A company with all of its reports, newest period first.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyWithReports {
    #[serde(flatten)]
    pub company: Company,
    pub reports: Vec<ReportWithAnalysis>,
}

/// A report and the content of its most recent analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ReportWithAnalysis {
    #[serde(flatten)]
    pub report: FinancialReport,
    pub analysis: Option<Value>,
}

pub struct PostgresReportCatalog {
    pool: PgPool,
}

impl PostgresReportCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseReportCatalog for PostgresReportCatalog {
    async fn list_companies_with_reports(&self) -> Result<Vec<CompanyWithReports>> {
        let mut result = Vec::new();

        for company in Company::find_all(&self.pool).await? {
            let mut reports = Vec::new();
            for report in FinancialReport::find_by_company(company.id, &self.pool).await? {
                let analysis = AnalysisResultRecord::find_latest_for_report(report.id, &self.pool)
                    .await?
                    .map(|record| record.analysis_content.0);
                reports.push(ReportWithAnalysis { report, analysis });
            }
            result.push(CompanyWithReports { company, reports });
        }

        Ok(result)
    }

    async fn record_completed_analysis(
        &self,
        metadata: &ReportMetadata,
        company_type: CompanyType,
        analysis: &FinancialAnalysis,
        document_name: Option<&str>,
    ) -> Result<()> {
        anyhow::ensure!(
            !metadata.company_symbol.is_empty(),
            "Cannot catalog a report without a ticker symbol"
        );

        // All four writes land together or not at all
        let mut tx = self.pool.begin().await?;

        let company = Company::find_or_create(
            &metadata.company_symbol,
            &metadata.company_name,
            company_type.as_str(),
            &mut *tx,
        )
        .await
        .context("Failed to upsert company")?;

        let report = FinancialReport::create(
            report_input(company.id, metadata, document_name),
            &mut *tx,
        )
        .await
        .context("Failed to create financial report")?;

        AnalysisResultRecord::create(analysis_input(report.id, company_type, analysis)?, &mut *tx)
            .await
            .context("Failed to store analysis result")?;

        FinancialReport::set_processed(report.id, true, &mut *tx).await?;

        tx.commit().await.context("Failed to commit report catalog write")?;

        info!(
            company = %company.symbol,
            report_id = %report.id,
            "Analysis stored in report catalog"
        );
        Ok(())
    }
}

fn report_input(
    company_id: uuid::Uuid,
    metadata: &ReportMetadata,
    document_name: Option<&str>,
) -> CreateFinancialReport {
    CreateFinancialReport {
        company_id,
        report_type: metadata.report_type.clone(),
        fiscal_year: metadata.fiscal_year,
        fiscal_quarter: metadata.fiscal_quarter.map(i32::from),
        filing_date: parse_filing_date(&metadata.filing_date),
        document_name: document_name.map(str::to_string),
    }
}

fn analysis_input(
    report_id: uuid::Uuid,
    company_type: CompanyType,
    analysis: &FinancialAnalysis,
) -> Result<CreateAnalysisResult> {
    Ok(CreateAnalysisResult {
        report_id,
        analysis_type: company_type.as_str().to_string(),
        analysis_content: serde_json::to_value(analysis)?,
        key_insights: Some(json!({
            "one_line_conclusion": analysis.one_line_conclusion,
            "results_summary": analysis.results_summary,
            "drivers_summary": analysis.drivers_summary,
        })),
        risk_factors: Some(serde_json::to_value(&analysis.sustainability_risks)?),
        model_impact: Some(serde_json::to_value(&analysis.model_impact)?),
    })
}

/// Filing dates come from model output; anything but YYYY-MM-DD is dropped.
fn parse_filing_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
