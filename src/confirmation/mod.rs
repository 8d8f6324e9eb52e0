//! Confirmation and change-request detection over the recent turns.
//!
//! Both checks fail closed: an uncertain or failed LLM call reads as "no",
//! so the pipeline keeps asking rather than committing a plan the user never
//! approved.

use crate::providers::base::{ChatRequest, LLMProvider, Message, ResponseSchema};
use crate::{models, prompts, utils};
use anyhow::{Context, Result};
use serde_json::json;
use tracing::warn;

/// Only the tail of the conversation matters for intent checks; older turns
/// add noise and stale confirmations.
const INTENT_WINDOW: usize = 3;

fn recent_window(messages: &[Message]) -> &[Message] {
    let start = messages.len().saturating_sub(INTENT_WINDOW);
    &messages[start..]
}

fn boolean_schema(name: &str) -> ResponseSchema {
    ResponseSchema {
        name: name.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "value": {"type": "string", "enum": ["true", "false"]}
            },
            "required": ["value"],
            "additionalProperties": false
        }),
    }
}

async fn boolean_check(
    provider: &dyn LLMProvider,
    template: &str,
    schema_name: &str,
    messages: &[Message],
) -> Result<bool> {
    let serialized = models::serialize_chat_messages(recent_window(messages));
    let prompt = template.replace("{message}", &serialized);
    let schema = boolean_schema(schema_name);

    let response = provider
        .chat(ChatRequest {
            messages: vec![Message::user(prompt)],
            model: None,
            max_tokens: 100,
            temperature: 0.0,
            response_schema: Some(&schema),
        })
        .await?;

    let text = response.text()?;
    let raw = utils::extract_json_object(text)
        .with_context(|| format!("no JSON object in {schema_name} output: {text}"))?;
    let value: serde_json::Value = serde_json::from_str(raw)?;
    Ok(value["value"]
        .as_str()
        .is_some_and(|v| v.eq_ignore_ascii_case("true")))
}

/// True only when the user explicitly asked to proceed with the full details.
pub async fn check_confirmation(provider: &dyn LLMProvider, messages: &[Message]) -> bool {
    match boolean_check(
        provider,
        prompts::CONFIRMATION_MESSAGE_CHECKER,
        "confirmation",
        messages,
    )
    .await
    {
        Ok(value) => value,
        Err(e) => {
            warn!("confirmation check failed, treating as not confirmed: {e:#}");
            false
        }
    }
}

/// True only when the user asked to modify an existing field without giving
/// a replacement value.
pub async fn check_change_requested(provider: &dyn LLMProvider, messages: &[Message]) -> bool {
    match boolean_check(
        provider,
        prompts::CHANGE_CONFIRMATION_CHECKER,
        "change_request",
        messages,
    )
    .await
    {
        Ok(value) => value,
        Err(e) => {
            warn!("change check failed, treating as no change requested: {e:#}");
            false
        }
    }
}

/// Name of the schema field a change request targets, snake_cased, or an
/// empty string when none could be determined.
pub async fn extract_field(provider: &dyn LLMProvider, messages: &[Message]) -> String {
    match try_extract_field(provider, messages).await {
        Ok(field) => field,
        Err(e) => {
            warn!("field extraction failed: {e:#}");
            String::new()
        }
    }
}

async fn try_extract_field(provider: &dyn LLMProvider, messages: &[Message]) -> Result<String> {
    let serialized = models::serialize_chat_messages(recent_window(messages));
    let prompt = prompts::FIELD_EXTRACTION.replace("{message}", &serialized);
    let schema = ResponseSchema {
        name: "field_name".to_string(),
        schema: json!({
            "type": "object",
            "properties": {"field_name": {"type": "string"}},
            "required": ["field_name"],
            "additionalProperties": false
        }),
    };

    let response = provider
        .chat(ChatRequest {
            messages: vec![Message::user(prompt)],
            model: None,
            max_tokens: 100,
            temperature: 0.0,
            response_schema: Some(&schema),
        })
        .await?;

    let text = response.text()?;
    let raw = utils::extract_json_object(text)
        .with_context(|| format!("no JSON object in field extraction output: {text}"))?;
    let value: serde_json::Value = serde_json::from_str(raw)?;
    Ok(value["field_name"]
        .as_str()
        .map(|f| f.trim().to_lowercase().replace(' ', "_"))
        .unwrap_or_default())
}
