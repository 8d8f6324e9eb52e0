use crate::providers::base::{ChatRequest, LLMProvider, LLMResponse, ProviderMetrics};
use crate::providers::errors::check_response;
use crate::providers::openai::convert_messages;
use crate::providers::provider_http_client;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq serves an OpenAI-compatible chat-completions API. Structured output
/// is requested via `json_object` mode; the field schema itself travels in
/// the prompt.
pub struct GroqProvider {
    api_key: String,
    default_model: String,
    base_url: String,
    client: Client,
    metrics: std::sync::Arc<std::sync::Mutex<ProviderMetrics>>,
}

impl GroqProvider {
    pub fn new(api_key: String, default_model: Option<String>) -> Self {
        Self::with_base_url(api_key, default_model, API_URL.to_string())
    }

    pub fn with_base_url(api_key: String, default_model: Option<String>, base_url: String) -> Self {
        Self {
            api_key,
            default_model: default_model.unwrap_or_else(|| "llama-3.3-70b-versatile".to_string()),
            base_url,
            client: provider_http_client(),
            metrics: std::sync::Arc::new(std::sync::Mutex::new(ProviderMetrics::default())),
        }
    }
}

#[async_trait]
impl LLMProvider for GroqProvider {
    async fn chat(&self, req: ChatRequest<'_>) -> Result<LLMResponse> {
        debug!(
            "groq chat: model={}",
            req.model.unwrap_or(&self.default_model)
        );

        let mut payload = json!({
            "model": req.model.unwrap_or(&self.default_model),
            "messages": convert_messages(req.messages),
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        });

        if req.response_schema.is_some() {
            payload["response_format"] = json!({"type": "json_object"});
        }

        let resp = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to Groq API")?;

        let json = check_response(resp, "Groq", &self.metrics).await?;

        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.request_count += 1;
            if let Some(tokens) = json["usage"]["total_tokens"].as_u64() {
                metrics.token_count += tokens;
            }
        }

        let content = json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .context("No choices in Groq response")?["message"]["content"]
            .as_str()
            .map(str::to_string);

        Ok(LLMResponse {
            content,
            total_tokens: json["usage"]["total_tokens"].as_u64(),
        })
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
