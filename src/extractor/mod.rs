//! Plan extraction: turns the conversation into an updated `ProductPlan`.

use crate::errors::AaryaError;
use crate::plan::ProductPlan;
use crate::providers::base::{ChatRequest, LLMProvider, Message};
use crate::{models, prompts, utils};
use anyhow::Result;
use tracing::{debug, warn};

/// Conversations longer than this are trimmed before extraction.
const TRIM_THRESHOLD: usize = 6;
/// How many trailing turns survive the trim.
const TRIM_KEEP: usize = 4;

const MAX_ATTEMPTS: usize = 3;

/// Long conversations confuse the extractor more than they help it. Past the
/// threshold only the trailing turns are sent; the accumulated schema carries
/// the earlier context.
fn trim_context(messages: &[Message]) -> &[Message] {
    if messages.len() > TRIM_THRESHOLD {
        &messages[messages.len() - TRIM_KEEP..]
    } else {
        messages
    }
}

/// Extract the product schema from the conversation, merged over `current`.
/// Empty strings in the model output fall back to the accumulated value in
/// `current`; explicit nulls are kept. Up to three attempts before giving up
/// with a parse error.
pub async fn extract_plan(
    provider: &dyn LLMProvider,
    messages: &[Message],
    current: &ProductPlan,
) -> Result<ProductPlan> {
    let serialized = models::serialize_chat_messages(trim_context(messages));
    let schema_json = serde_json::to_string_pretty(current)?;
    let prompt = prompts::PRODUCT_INFO_EXTRACTION
        .replace("{messages}", &serialized)
        .replace("{product_schema}", &schema_json);
    let schema = ProductPlan::response_schema();

    for attempt in 1..=MAX_ATTEMPTS {
        let response = provider
            .chat(ChatRequest {
                messages: vec![Message::user(prompt.clone())],
                model: None,
                max_tokens: 1000,
                temperature: 0.1,
                response_schema: Some(&schema),
            })
            .await;

        let text = match response {
            Ok(r) => match r.content {
                Some(text) => text,
                None => {
                    warn!("extraction attempt {attempt} returned empty content");
                    continue;
                }
            },
            Err(e) => {
                warn!("extraction attempt {attempt} failed: {e:#}");
                continue;
            }
        };

        match parse_plan(&text) {
            Ok(extracted) => {
                debug!("plan extracted on attempt {attempt}");
                return Ok(ProductPlan::fill_from_extracted(current, extracted));
            }
            Err(e) => {
                warn!("extraction attempt {attempt} produced unparseable output: {e:#}");
            }
        }
    }

    Err(AaryaError::JsonParse.into())
}

fn parse_plan(text: &str) -> Result<ProductPlan> {
    let raw = utils::extract_json_object(text)
        .ok_or_else(|| anyhow::anyhow!("no JSON object in extractor output"))?;
    Ok(serde_json::from_str(raw)?)
}
