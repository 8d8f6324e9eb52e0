//! Routes each turn to the product pipeline or the general-conversation path.

use crate::providers::base::{ChatRequest, LLMProvider, Message, ResponseSchema};
use crate::{models, prompts, utils};
use anyhow::{Context, Result};
use serde_json::json;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    ProductRelated,
    GeneralConversation,
}

fn classification_schema() -> ResponseSchema {
    ResponseSchema {
        name: "classification".to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "enum": ["product_related", "general_conversation"]
                }
            },
            "required": ["category"],
            "additionalProperties": false
        }),
    }
}

/// Classify the conversation. Fails open: any transport or parse failure is
/// treated as product-related so a flaky classifier never drops a turn out
/// of the extraction pipeline.
pub async fn classify(provider: &dyn LLMProvider, messages: &[Message]) -> Classification {
    match try_classify(provider, messages).await {
        Ok(classification) => classification,
        Err(e) => {
            warn!("classification failed, treating turn as product related: {e:#}");
            Classification::ProductRelated
        }
    }
}

async fn try_classify(provider: &dyn LLMProvider, messages: &[Message]) -> Result<Classification> {
    let serialized = models::serialize_chat_messages(messages);
    let prompt = prompts::CONVERSATION_CLASSIFIER.replace("{message}", &serialized);
    let schema = classification_schema();

    let response = provider
        .chat(ChatRequest {
            messages: vec![Message::user(prompt)],
            model: None,
            max_tokens: 200,
            temperature: 0.0,
            response_schema: Some(&schema),
        })
        .await?;

    let text = response.text()?;
    let raw = utils::extract_json_object(text)
        .with_context(|| format!("no JSON object in classifier output: {text}"))?;
    let value: serde_json::Value =
        serde_json::from_str(raw).context("classifier output is not valid JSON")?;

    match value["category"].as_str() {
        Some("general_conversation") => Ok(Classification::GeneralConversation),
        _ => Ok(Classification::ProductRelated),
    }
}
