// HTTP routes
pub mod analyses;
pub mod dashboard;
pub mod health;
pub mod reports;
pub mod upload;

pub use analyses::*;
pub use dashboard::*;
pub use health::*;
pub use reports::*;
pub use upload::*;
