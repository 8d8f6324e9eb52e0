use crate::providers::base::{ChatRequest, LLMProvider, LLMResponse, Message, ProviderMetrics};
use crate::providers::errors::check_response;
use crate::providers::provider_http_client;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Partial Anthropic support: plain-text chat against the Messages API.
/// No structured-output contract — callers fall back to parsing raw JSON
/// from the text response.
pub struct AnthropicProvider {
    api_key: String,
    default_model: String,
    base_url: String,
    client: Client,
    metrics: std::sync::Arc<std::sync::Mutex<ProviderMetrics>>,
}

impl AnthropicProvider {
    pub fn new(api_key: String, default_model: Option<String>) -> Self {
        Self::with_base_url(api_key, default_model, API_URL.to_string())
    }

    pub fn with_base_url(api_key: String, default_model: Option<String>, base_url: String) -> Self {
        Self {
            api_key,
            default_model: default_model.unwrap_or_else(|| "claude-sonnet-4-5".to_string()),
            base_url,
            client: provider_http_client(),
            metrics: std::sync::Arc::new(std::sync::Mutex::new(ProviderMetrics::default())),
        }
    }
}

/// The Messages API takes the system prompt as a top-level field and only
/// user/assistant roles in the message list.
fn convert_messages(messages: Vec<Message>) -> (Option<String>, Vec<Value>) {
    let mut system = None;
    let mut converted = Vec::new();
    for msg in messages {
        if msg.role == "system" {
            system = Some(msg.content);
        } else {
            converted.push(json!({"role": msg.role, "content": msg.content}));
        }
    }
    (system, converted)
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn chat(&self, req: ChatRequest<'_>) -> Result<LLMResponse> {
        debug!(
            "anthropic chat: model={}",
            req.model.unwrap_or(&self.default_model)
        );

        if req.response_schema.is_some() {
            warn!("anthropic provider ignores structured-output schema; parsing raw text");
        }

        let (system, messages) = convert_messages(req.messages);

        let mut payload = json!({
            "model": req.model.unwrap_or(&self.default_model),
            "messages": messages,
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        });
        if let Some(system) = system {
            payload["system"] = json!(system);
        }

        let resp = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        let json = check_response(resp, "Anthropic", &self.metrics).await?;

        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.request_count += 1;
        }

        let content = json["content"]
            .as_array()
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find(|b| b["type"] == "text")
                    .and_then(|b| b["text"].as_str())
            })
            .map(str::to_string);

        let total_tokens = match (
            json["usage"]["input_tokens"].as_u64(),
            json["usage"]["output_tokens"].as_u64(),
        ) {
            (Some(i), Some(o)) => Some(i + o),
            _ => None,
        };

        Ok(LLMResponse {
            content,
            total_tokens,
        })
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
