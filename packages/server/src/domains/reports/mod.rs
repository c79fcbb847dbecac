//! Durable catalog of companies, their financial reports and analyses.

pub mod catalog;
pub mod models;

pub use catalog::{CompanyWithReports, PostgresReportCatalog, ReportWithAnalysis};
