// AI implementation using OpenRouter
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::Result;
use async_trait::async_trait;
use openrouter_client::{OpenRouterClient, StructuredRequest};

use super::BaseAI;

/// OpenRouter implementation of AI capabilities
#[derive(Clone)]
pub struct OpenRouterAI {
    client: OpenRouterClient,
}

impl OpenRouterAI {
    pub fn new(client: OpenRouterClient) -> Self {
        Self { client }
    }
}

/// Response-format name from the schema title, as required by the API.
fn response_name(schema: &serde_json::Value) -> String {
    schema
        .get("title")
        .and_then(|t| t.as_str())
        .map(|t| {
            t.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "response".to_string())
}

#[async_trait]
impl BaseAI for OpenRouterAI {
    async fn generate_structured(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String> {
        let name = response_name(&schema);
        let request = StructuredRequest::new(model, name, system_prompt, user_prompt, schema);

        // OpenRouterError is kept as the source so callers can detect timeouts
        let json = self.client.structured_output(request).await?;
        Ok(json)
    }
}
