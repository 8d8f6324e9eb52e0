// Shared test helpers — not all items used by every test binary.
#![allow(unused)]

use aarya::conversation::ConversationService;
use aarya::notify::Notifier;
use aarya::plan::MemoryPlanStore;
use aarya::providers::base::{ChatRequest, LLMProvider, LLMResponse, Message};
use aarya::providers::strategy::TaskProviders;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub schema_name: Option<String>,
}

pub struct MockLLMProvider {
    responses: Mutex<VecDeque<LLMResponse>>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl MockLLMProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, content: &str) {
        self.responses.lock().unwrap().push_back(LLMResponse {
            content: Some(content.to_string()),
            total_tokens: None,
        });
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMProvider for MockLLMProvider {
    async fn chat(&self, req: ChatRequest<'_>) -> anyhow::Result<LLMResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: req.messages,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            schema_name: req.response_schema.map(|s| s.name.clone()),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no mock response queued"))
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }
}

/// Every task provider mocked independently, wired into a real service and
/// plan store.
pub struct TestHarness {
    pub classification: Arc<MockLLMProvider>,
    pub extraction: Arc<MockLLMProvider>,
    pub confirmation: Arc<MockLLMProvider>,
    pub general: Arc<MockLLMProvider>,
    pub final_message: Arc<MockLLMProvider>,
    pub image: Arc<MockLLMProvider>,
    pub store: Arc<MemoryPlanStore>,
    pub service: Arc<ConversationService>,
}

impl TestHarness {
    pub fn new() -> Self {
        let classification = MockLLMProvider::new();
        let extraction = MockLLMProvider::new();
        let confirmation = MockLLMProvider::new();
        let general = MockLLMProvider::new();
        let final_message = MockLLMProvider::new();
        let image = MockLLMProvider::new();
        let store = Arc::new(MemoryPlanStore::new());

        let providers = Arc::new(TaskProviders {
            classification: classification.clone(),
            extraction: extraction.clone(),
            confirmation: confirmation.clone(),
            general: general.clone(),
            final_message: final_message.clone(),
            image: image.clone(),
        });
        let service = Arc::new(ConversationService::new(
            providers,
            store.clone(),
            Notifier::new(None, 2),
        ));

        Self {
            classification,
            extraction,
            confirmation,
            general,
            final_message,
            image,
            store,
            service,
        }
    }
}

/// Full plan JSON as the extraction model would return it.
pub fn plan_json(name: &str, price: &str, data: &str) -> String {
    format!(
        r#"{{
            "product_name": "{name}",
            "product_description": "{name}",
            "product_family": "GSM",
            "product_group": "Prepaid",
            "product_offer_price": "{price}",
            "pop_type": "Normal",
            "price_category": "Base Price",
            "price_mode": "Non-Recurring",
            "product_specification_type": "ADDON",
            "data_allowance": "{data}",
            "voice_allowance": ""
        }}"#
    )
}
