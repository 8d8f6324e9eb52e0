//! Scripted provider for unit tests: hand it a queue of responses and it
//! replays them in order, recording every request it saw.

use super::base::{ChatRequest, LLMProvider, LLMResponse, Message};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub schema_name: Option<String>,
}

#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<LLMResponse, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, content: &str) {
        self.responses.lock().unwrap().push_back(Ok(LLMResponse {
            content: Some(content.to_string()),
            total_tokens: None,
        }));
    }

    pub fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        std::mem::take(&mut self.calls.lock().unwrap())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn chat(&self, req: ChatRequest<'_>) -> anyhow::Result<LLMResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: req.messages.clone(),
            max_tokens: req.max_tokens,
            temperature: req.temperature,
            schema_name: req.response_schema.map(|s| s.name.clone()),
        });
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("no scripted response left")),
        }
    }

    fn default_model(&self) -> &str {
        "scripted"
    }
}
