// Financial report analysis - API Core
//
// Accepts uploaded filings, extracts their text and metadata, and runs the
// long LLM analysis in the background while the dashboard reads an
// in-memory store. Completed analyses are mirrored into Postgres when a
// database is configured.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
