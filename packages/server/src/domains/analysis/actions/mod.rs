pub mod dashboard;
pub mod extract_metadata;
pub mod run_analysis;
pub mod upload_report;

pub use dashboard::{load_dashboard, DashboardStats, DashboardView, DEFAULT_DASHBOARD_LIMIT};
pub use extract_metadata::extract_metadata;
pub use run_analysis::run_analysis;
pub use upload_report::{upload_report, AnalysisTicket, UploadAccepted, UploadedFile};
