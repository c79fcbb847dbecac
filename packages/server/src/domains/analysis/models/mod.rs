pub mod company_type;
pub mod financial_analysis;
pub mod metadata;
pub mod record;

pub use company_type::CompanyType;
pub use financial_analysis::*;
pub use metadata::ReportMetadata;
pub use record::{AnalysisPatch, AnalysisRecord, AnalysisStatus, NewAnalysisRecord};
