//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenRouterAI;
pub use deps::{AnalysisSettings, ServerDeps};
pub use test_dependencies::TestDependencies;
pub use traits::*;
