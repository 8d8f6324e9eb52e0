//! Vision extraction for plan-card images.

use crate::prompts;
use crate::providers::base::{ChatRequest, ImageData, LLMProvider, Message};
use anyhow::{Context, Result};

/// Sniff the media type from the base64 payload prefix. JPEG streams encode
/// to "/9j/", PNG to "iVBOR".
fn media_type_of(data: &str) -> &'static str {
    if data.starts_with("iVBOR") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

/// Transcribe the plan details visible in a base64-encoded image. Single
/// call, no retry; the caller decides what to do with a failure.
pub async fn extract_image_content(provider: &dyn LLMProvider, base64: &str) -> Result<String> {
    let image = ImageData {
        media_type: media_type_of(base64).to_string(),
        data: base64.to_string(),
    };

    let response = provider
        .chat(ChatRequest {
            messages: vec![Message::user_with_images(
                prompts::IMAGE_PRODUCT_EXTRACTION,
                vec![image],
            )],
            model: None,
            max_tokens: 1000,
            temperature: 0.1,
            response_schema: None,
        })
        .await
        .context("image extraction call failed")?;

    Ok(response.text()?.to_string())
}
