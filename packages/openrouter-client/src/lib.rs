//! Client for OpenRouter's OpenAI-compatible REST API.
//!
//! Only strict JSON-schema structured output is supported.
//!
//! # Example
//!
//! ```rust,ignore
//! use openrouter_client::{OpenRouterClient, StructuredOutput, StructuredRequest};
//!
//! let client = OpenRouterClient::new(api_key)
//!     .with_timeout(std::time::Duration::from_secs(300));
//!
//! let request = StructuredRequest::new(
//!     "google/gemini-2.5-flash",
//!     "ReportMetadata",
//!     system_prompt,
//!     report_text,
//!     ReportMetadata::strict_schema(),
//! );
//! let json = client.structured_output(request).await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenRouterError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use std::time::{Duration, Instant};

use reqwest::{header, Client, RequestBuilder, Response};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter API client.
#[derive(Clone)]
pub struct OpenRouterClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    app_name: Option<String>,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            app_name: None,
        }
    }

    /// Point at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Per-request timeout. Expiry surfaces as [`OpenRouterError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sent as `X-Title` so requests are attributed in the OpenRouter dashboard.
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Structured output with a strict JSON schema. Returns the raw JSON text
    /// with any markdown fence removed.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<String> {
        let start = Instant::now();
        let response = self.send(self.post_json("chat/completions").json(&request)).await?;
        let raw = Self::parse_chat(response).await?;

        if let Some(usage) = &raw.usage {
            debug!(
                model = %request.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                duration_ms = start.elapsed().as_millis() as u64,
                "OpenRouter structured output"
            );
        }

        let content = first_content(&raw)?;
        Ok(strip_code_blocks(&content).to_string())
    }

    fn post_json(&self, path: &str) -> RequestBuilder {
        let mut builder = self
            .http_client
            .post(format!("{}/{}", self.base_url, path))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(name) = &self.app_name {
            builder = builder.header("X-Title", name);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "OpenRouter request failed");
            OpenRouterError::from_reqwest(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, "OpenRouter API error");
            return Err(OpenRouterError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn parse_chat(response: Response) -> Result<ChatResponseRaw> {
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                OpenRouterError::Timeout
            } else {
                OpenRouterError::Parse(e.to_string())
            }
        })
    }
}

fn first_content(raw: &ChatResponseRaw) -> Result<String> {
    raw.choices
        .first()
        .and_then(|c| c.message.content.clone())
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| OpenRouterError::Parse("No content in response".into()))
}
