pub mod analysis_result;
pub mod company;
pub mod financial_report;

pub use analysis_result::{AnalysisResultRecord, CreateAnalysisResult};
pub use company::Company;
pub use financial_report::{CreateFinancialReport, FinancialReport};
