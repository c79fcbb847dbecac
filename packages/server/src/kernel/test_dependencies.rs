// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use openrouter_client::OpenRouterError;
use schemars::JsonSchema;
use serde::Serialize;

use super::{AnalysisSettings, BaseAI, BaseDocumentParser, BaseReportCatalog, ServerDeps};
use crate::domains::analysis::models::{CompanyType, FinancialAnalysis, ReportMetadata};
use crate::domains::analysis::AnalysisStore;
use crate::domains::documents::ExtractionError;
use crate::domains::reports::CompanyWithReports;

// =============================================================================
// Mock AI (structured output)
// =============================================================================

/// Arguments captured from a generate_structured call
#[derive(Debug, Clone)]
pub struct AiCall {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    /// `title` of the requested schema, e.g. "ReportMetadata"
    pub schema_title: String,
}

#[derive(Debug, Clone)]
enum MockReply {
    Json(String),
    Failure(String),
    Timeout,
}

impl MockReply {
    fn into_result(self) -> Result<String> {
        match self {
            MockReply::Json(json) => Ok(json),
            MockReply::Failure(message) => Err(anyhow::anyhow!(message)),
            MockReply::Timeout => Err(OpenRouterError::Timeout.into()),
        }
    }
}

/// Replies are keyed by the schema being requested, so concurrent metadata
/// and analysis calls each get the right shape regardless of ordering.
/// Queued replies are consumed first; the fixed reply answers afterwards.
pub struct MockAI {
    queued: Arc<Mutex<HashMap<String, Vec<MockReply>>>>,
    fixed: Arc<Mutex<HashMap<String, MockReply>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    calls: Arc<Mutex<Vec<AiCall>>>,
}

fn key<T: JsonSchema>() -> String {
    T::schema_name()
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            queued: Arc::new(Mutex::new(HashMap::new())),
            fixed: Arc::new(Mutex::new(HashMap::new())),
            delays: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every request for `T`'s schema with `data`
    pub fn with_structured<T: JsonSchema + Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.fixed.lock().unwrap().insert(key::<T>(), MockReply::Json(json));
        self
    }

    /// Answer every request for `T`'s schema with raw text (e.g. invalid JSON)
    pub fn with_raw_response<T: JsonSchema>(self, raw: impl Into<String>) -> Self {
        self.fixed
            .lock()
            .unwrap()
            .insert(key::<T>(), MockReply::Json(raw.into()));
        self
    }

    /// Queue a one-off response for `T`'s schema, used before the fixed reply
    pub fn with_queued<T: JsonSchema + Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.queued
            .lock()
            .unwrap()
            .entry(key::<T>())
            .or_default()
            .push(MockReply::Json(json));
        self
    }

    /// Fail every request for `T`'s schema
    pub fn with_failure<T: JsonSchema>(self, message: impl Into<String>) -> Self {
        self.fixed
            .lock()
            .unwrap()
            .insert(key::<T>(), MockReply::Failure(message.into()));
        self
    }

    /// Queue a one-off failure for `T`'s schema
    pub fn with_queued_failure<T: JsonSchema>(self, message: impl Into<String>) -> Self {
        self.queued
            .lock()
            .unwrap()
            .entry(key::<T>())
            .or_default()
            .push(MockReply::Failure(message.into()));
        self
    }

    /// Fail every request for `T`'s schema the way a client-side HTTP timeout does
    pub fn with_provider_timeout<T: JsonSchema>(self) -> Self {
        self.fixed
            .lock()
            .unwrap()
            .insert(key::<T>(), MockReply::Timeout);
        self
    }

    /// Sleep before answering requests for `T`'s schema
    pub fn with_delay<T: JsonSchema>(self, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(key::<T>(), delay);
        self
    }

    /// Get all calls that were made
    pub fn calls(&self) -> Vec<AiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the calls made for `T`'s schema
    pub fn calls_for<T: JsonSchema>(&self) -> Vec<AiCall> {
        let title = key::<T>();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.schema_title == title)
            .cloned()
            .collect()
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn generate_structured(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String> {
        let title = schema
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();

        // Record the call
        self.calls.lock().unwrap().push(AiCall {
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            schema_title: title.clone(),
        });

        let delay = self.delays.lock().unwrap().get(&title).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&title)
            .filter(|replies| !replies.is_empty())
            .map(|replies| replies.remove(0));
        let reply = queued.or_else(|| self.fixed.lock().unwrap().get(&title).cloned());

        match reply {
            Some(reply) => reply.into_result(),
            None => Err(anyhow::anyhow!("No mock response configured for {}", title)),
        }
    }
}

// =============================================================================
// Mock Document Parser
// =============================================================================

#[derive(Debug, Clone)]
enum MockExtraction {
    /// Decode the uploaded bytes as UTF-8
    Passthrough,
    Text(String),
    Unsupported,
    ParseFailure(String),
}

pub struct MockDocumentParser {
    behavior: MockExtraction,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockDocumentParser {
    /// Returns the uploaded bytes as text
    pub fn new() -> Self {
        Self {
            behavior: MockExtraction::Passthrough,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.behavior = MockExtraction::Text(text.into());
        self
    }

    pub fn unsupported(mut self) -> Self {
        self.behavior = MockExtraction::Unsupported;
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.behavior = MockExtraction::ParseFailure(message.into());
        self
    }

    /// MIME types passed to extract_text
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockDocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDocumentParser for MockDocumentParser {
    async fn extract_text(&self, bytes: &[u8], mime_type: &str) -> Result<String, ExtractionError> {
        self.calls.lock().unwrap().push(mime_type.to_string());

        match &self.behavior {
            MockExtraction::Passthrough => Ok(String::from_utf8_lossy(bytes).into_owned()),
            MockExtraction::Text(text) => Ok(text.clone()),
            MockExtraction::Unsupported => {
                Err(ExtractionError::UnsupportedFormat(mime_type.to_string()))
            }
            MockExtraction::ParseFailure(message) => Err(ExtractionError::Parse(message.clone())),
        }
    }
}

// =============================================================================
// Mock Report Catalog
// =============================================================================

/// Arguments captured from a record_completed_analysis call
#[derive(Debug, Clone)]
pub struct RecordedAnalysis {
    pub metadata: ReportMetadata,
    pub company_type: CompanyType,
    pub analysis: FinancialAnalysis,
    pub document_name: Option<String>,
}

pub struct MockReportCatalog {
    companies: Vec<CompanyWithReports>,
    fail_writes: bool,
    hang_writes: bool,
    recorded: Arc<Mutex<Vec<RecordedAnalysis>>>,
}

impl MockReportCatalog {
    pub fn new() -> Self {
        Self {
            companies: Vec::new(),
            fail_writes: false,
            hang_writes: false,
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_companies(mut self, companies: Vec<CompanyWithReports>) -> Self {
        self.companies = companies;
        self
    }

    /// Make every record_completed_analysis call fail
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Make every record_completed_analysis call block forever
    pub fn hanging_writes(mut self) -> Self {
        self.hang_writes = true;
        self
    }

    pub fn recorded(&self) -> Vec<RecordedAnalysis> {
        self.recorded.lock().unwrap().clone()
    }
}

impl Default for MockReportCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseReportCatalog for MockReportCatalog {
    async fn list_companies_with_reports(&self) -> Result<Vec<CompanyWithReports>> {
        Ok(self.companies.clone())
    }

    async fn record_completed_analysis(
        &self,
        metadata: &ReportMetadata,
        company_type: CompanyType,
        analysis: &FinancialAnalysis,
        document_name: Option<&str>,
    ) -> Result<()> {
        self.recorded.lock().unwrap().push(RecordedAnalysis {
            metadata: metadata.clone(),
            company_type,
            analysis: analysis.clone(),
            document_name: document_name.map(str::to_string),
        });

        if self.hang_writes {
            std::future::pending::<()>().await;
        }

        if self.fail_writes {
            anyhow::bail!("catalog unavailable");
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub document_parser: Arc<MockDocumentParser>,
    pub catalog: Option<Arc<MockReportCatalog>>,
    pub store: AnalysisStore,
    pub settings: AnalysisSettings,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            document_parser: Arc::new(MockDocumentParser::new()),
            catalog: None,
            store: AnalysisStore::new(),
            settings: AnalysisSettings {
                analysis_model: "test/analysis".to_string(),
                metadata_model: "test/metadata".to_string(),
                min_text_length: 100,
                analysis_timeout: Duration::from_secs(5),
            },
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Set a mock document parser
    pub fn mock_parser(mut self, parser: MockDocumentParser) -> Self {
        self.document_parser = Arc::new(parser);
        self
    }

    /// Attach a mock report catalog
    pub fn mock_catalog(mut self, catalog: MockReportCatalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn analysis_timeout(mut self, timeout: Duration) -> Self {
        self.settings.analysis_timeout = timeout;
        self
    }

    pub fn min_text_length(mut self, min: usize) -> Self {
        self.settings.min_text_length = min;
        self
    }

    /// Build ServerDeps sharing these mocks and store
    pub fn into_server_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.ai,
            self.document_parser,
            self.store,
            self.catalog
                .map(|catalog| catalog as Arc<dyn BaseReportCatalog>),
            self.settings,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
