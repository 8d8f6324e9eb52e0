use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FlakyProvider {
    fail_first: usize,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl LLMProvider for FlakyProvider {
    async fn chat(&self, _req: ChatRequest<'_>) -> anyhow::Result<LLMResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first {
            anyhow::bail!("transient failure");
        }
        Ok(LLMResponse {
            content: Some("ok".to_string()),
            total_tokens: Some(1),
        })
    }

    fn default_model(&self) -> &str {
        "flaky-model"
    }
}

fn request() -> ChatRequest<'static> {
    ChatRequest {
        messages: vec![Message::user("hi")],
        model: None,
        max_tokens: 16,
        temperature: 0.0,
        response_schema: None,
    }
}

#[tokio::test]
async fn test_chat_with_retry_recovers_after_failures() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = FlakyProvider {
        fail_first: 2,
        calls: calls.clone(),
    };
    let config = RetryConfig {
        max_retries: 3,
        initial_delay_ms: 1,
        max_delay_ms: 5,
        backoff_multiplier: 2.0,
    };

    let resp = provider
        .chat_with_retry(request(), Some(config))
        .await
        .unwrap();
    assert_eq!(resp.content.as_deref(), Some("ok"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_chat_with_retry_exhausts_attempts() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = FlakyProvider {
        fail_first: usize::MAX,
        calls: calls.clone(),
    };
    let config = RetryConfig {
        max_retries: 2,
        initial_delay_ms: 1,
        max_delay_ms: 5,
        backoff_multiplier: 2.0,
    };

    let err = provider
        .chat_with_retry(request(), Some(config))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("transient failure"));
    // Initial attempt plus two retries.
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_message_constructors() {
    assert_eq!(Message::system("s").role, "system");
    assert_eq!(Message::user("u").role, "user");
    assert_eq!(Message::assistant("a").role, "assistant");

    let msg = Message::user_with_images(
        "look",
        vec![ImageData {
            media_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
        }],
    );
    assert_eq!(msg.images.len(), 1);
}

#[test]
fn test_response_text_requires_content() {
    let empty = LLMResponse {
        content: None,
        total_tokens: None,
    };
    assert!(empty.text().is_err());

    let full = LLMResponse {
        content: Some("answer".to_string()),
        total_tokens: None,
    };
    assert_eq!(full.text().unwrap(), "answer");
}
