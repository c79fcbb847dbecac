//! Integration tests for the Postgres report catalog.
//!
//! Needs Docker for the shared Postgres container:
//! cargo test --test report_catalog_tests -- --ignored

mod common;

use report_core::domains::analysis::models::{CompanyType, ReportMetadata};
use report_core::domains::reports::models::Company;
use report_core::domains::reports::PostgresReportCatalog;
use report_core::kernel::BaseReportCatalog;
use test_context::test_context;
use uuid::Uuid;

use crate::common::{analysis, meta_metadata, CatalogHarness};

/// Ticker unique to one test run on the shared database
fn unique_symbol() -> String {
    format!("T{}", &Uuid::new_v4().simple().to_string()[..8]).to_uppercase()
}

fn metadata_for(symbol: &str, quarter: Option<u8>) -> ReportMetadata {
    ReportMetadata {
        company_symbol: symbol.to_string(),
        fiscal_quarter: quarter,
        ..meta_metadata()
    }
}

#[test_context(CatalogHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn recording_analyses_reuses_the_company(ctx: &mut CatalogHarness) {
    let catalog = PostgresReportCatalog::new(ctx.db_pool.clone());
    let symbol = unique_symbol();

    catalog
        .record_completed_analysis(
            &metadata_for(&symbol, Some(2)),
            CompanyType::AiApplication,
            &analysis("Q2 in line"),
            None,
        )
        .await
        .unwrap();
    catalog
        .record_completed_analysis(
            &metadata_for(&symbol, Some(3)),
            CompanyType::AiApplication,
            &analysis("Q3 beat"),
            Some("meta-10q-q3.pdf"),
        )
        .await
        .unwrap();

    let companies = catalog.list_companies_with_reports().await.unwrap();
    let matching: Vec<_> = companies
        .iter()
        .filter(|c| c.company.symbol == symbol)
        .collect();
    assert_eq!(matching.len(), 1);

    let company = matching[0];
    assert_eq!(company.company.company_type, "ai_application");
    assert_eq!(company.reports.len(), 2);

    // Newest period first
    let newest = &company.reports[0];
    assert_eq!(newest.report.fiscal_quarter, Some(3));
    assert!(newest.report.processed);
    assert_eq!(newest.report.document_name.as_deref(), Some("meta-10q-q3.pdf"));
    assert_eq!(
        newest.report.filing_date.map(|d| d.to_string()).as_deref(),
        Some("2025-10-29")
    );
    let content = newest.analysis.as_ref().expect("analysis should be stored");
    assert_eq!(content["one_line_conclusion"], "Q3 beat");
    assert_eq!(company.reports[1].report.fiscal_quarter, Some(2));
}

#[test_context(CatalogHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn unparseable_filing_date_is_stored_as_null(ctx: &mut CatalogHarness) {
    let catalog = PostgresReportCatalog::new(ctx.db_pool.clone());
    let symbol = unique_symbol();
    let metadata = ReportMetadata {
        filing_date: "late October".to_string(),
        ..metadata_for(&symbol, None)
    };

    catalog
        .record_completed_analysis(
            &metadata,
            CompanyType::AiSupplyChain,
            &analysis("FY solid"),
            None,
        )
        .await
        .unwrap();

    let company = Company::find_by_symbol(&symbol, &ctx.db_pool)
        .await
        .unwrap()
        .expect("company should exist");
    assert_eq!(company.company_type, "ai_supply_chain");

    let companies = catalog.list_companies_with_reports().await.unwrap();
    let stored = companies
        .into_iter()
        .find(|c| c.company.symbol == symbol)
        .unwrap();
    assert_eq!(stored.reports.len(), 1);
    assert!(stored.reports[0].report.filing_date.is_none());
    assert!(stored.reports[0].report.fiscal_quarter.is_none());
}

#[test_context(CatalogHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn failed_write_leaves_nothing_behind(ctx: &mut CatalogHarness) {
    let catalog = PostgresReportCatalog::new(ctx.db_pool.clone());
    let symbol = unique_symbol();

    // The company upsert succeeds, then the quarter check constraint rejects the report
    let result = catalog
        .record_completed_analysis(
            &metadata_for(&symbol, Some(7)),
            CompanyType::AiApplication,
            &analysis("Never stored"),
            Some("bad-quarter.pdf"),
        )
        .await;
    assert!(result.is_err());

    let company = Company::find_by_symbol(&symbol, &ctx.db_pool).await.unwrap();
    assert!(company.is_none());
}

#[test_context(CatalogHarness)]
#[tokio::test]
#[ignore = "requires docker"]
async fn empty_symbol_is_rejected(ctx: &mut CatalogHarness) {
    let catalog = PostgresReportCatalog::new(ctx.db_pool.clone());

    let result = catalog
        .record_completed_analysis(
            &metadata_for("", Some(3)),
            CompanyType::AiApplication,
            &analysis("No ticker"),
            None,
        )
        .await;
    assert!(result.is_err());

    let company = Company::find_by_symbol("", &ctx.db_pool).await.unwrap();
    assert!(company.is_none());
}
