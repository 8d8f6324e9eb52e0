use crate::providers::base::{ChatRequest, LLMProvider, LLMResponse, ProviderMetrics};
use crate::providers::errors::check_response;
use crate::providers::provider_http_client;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAIProvider {
    api_key: String,
    default_model: String,
    base_url: String,
    client: Client,
    metrics: std::sync::Arc<std::sync::Mutex<ProviderMetrics>>,
}

impl OpenAIProvider {
    pub fn new(api_key: String, default_model: Option<String>) -> Self {
        Self::with_base_url(api_key, default_model, API_URL.to_string())
    }

    pub fn with_base_url(api_key: String, default_model: Option<String>, base_url: String) -> Self {
        Self {
            api_key,
            default_model: default_model.unwrap_or_else(|| "gpt-4o".to_string()),
            base_url,
            client: provider_http_client(),
            metrics: std::sync::Arc::new(std::sync::Mutex::new(ProviderMetrics::default())),
        }
    }

    fn parse_response(&self, json: &Value) -> Result<LLMResponse> {
        let choice = json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .context("No choices in OpenAI response")?;

        let content = choice["message"]["content"].as_str().map(str::to_string);
        let total_tokens = json["usage"]["total_tokens"].as_u64();

        Ok(LLMResponse {
            content,
            total_tokens,
        })
    }
}

/// Serialize messages to the OpenAI wire format. Messages with attached
/// images become multi-part content with `image_url` data URIs.
pub(crate) fn convert_messages(messages: Vec<crate::providers::base::Message>) -> Vec<Value> {
    messages
        .into_iter()
        .map(|msg| {
            if msg.images.is_empty() {
                json!({"role": msg.role, "content": msg.content})
            } else {
                let mut parts = vec![json!({"type": "text", "text": msg.content})];
                for image in msg.images {
                    parts.push(json!({
                        "type": "image_url",
                        "image_url": {
                            "url": format!("data:{};base64,{}", image.media_type, image.data)
                        }
                    }));
                }
                json!({"role": msg.role, "content": parts})
            }
        })
        .collect()
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(&self, req: ChatRequest<'_>) -> Result<LLMResponse> {
        let mut payload = json!({
            "model": req.model.unwrap_or(&self.default_model),
            "messages": convert_messages(req.messages),
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        });

        if let Some(schema) = req.response_schema {
            payload["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "strict": true,
                    "schema": schema.schema,
                }
            });
        }

        let resp = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let json = check_response(resp, "OpenAI", &self.metrics).await?;

        // Update metrics on success
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.request_count += 1;
            if let Some(tokens) = json["usage"]["total_tokens"].as_u64() {
                metrics.token_count += tokens;
            }
        }

        self.parse_response(&json)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
