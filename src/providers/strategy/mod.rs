use crate::config::schema::{Config, ProviderConfig, TaskModel, TasksConfig, normalize_provider};
use crate::providers::base::LLMProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// One constructed provider per logical task. Built once at startup and
/// injected into the services — call sites never branch on provider names.
pub struct TaskProviders {
    pub classification: Arc<dyn LLMProvider>,
    pub extraction: Arc<dyn LLMProvider>,
    pub confirmation: Arc<dyn LLMProvider>,
    pub general: Arc<dyn LLMProvider>,
    pub final_message: Arc<dyn LLMProvider>,
    pub image: Arc<dyn LLMProvider>,
}

/// Provider factory: resolves a `{provider, model}` task config against the
/// configured credentials and constructs the matching client.
pub struct ProviderFactory {
    groq: ProviderConfig,
    openai: ProviderConfig,
    anthropic: ProviderConfig,
}

impl ProviderFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            groq: config.providers.groq.clone(),
            openai: config.providers.openai.clone(),
            anthropic: config.providers.anthropic.clone(),
        }
    }

    pub fn create(&self, task: &TaskModel) -> Result<Arc<dyn LLMProvider>> {
        use crate::providers::{
            anthropic::AnthropicProvider, groq::GroqProvider, openai::OpenAIProvider,
        };

        let normalized = normalize_provider(&task.provider);
        let model = Some(task.model.clone());
        match normalized.as_str() {
            "groq" => {
                if self.groq.api_key.is_empty() {
                    anyhow::bail!("no Groq API key configured for model: {}", task.model);
                }
                info!("using Groq provider for model: {}", task.model);
                Ok(match &self.groq.api_base {
                    Some(base) => Arc::new(GroqProvider::with_base_url(
                        self.groq.api_key.clone(),
                        model,
                        base.clone(),
                    )),
                    None => Arc::new(GroqProvider::new(self.groq.api_key.clone(), model)),
                })
            }
            "openai" => {
                if self.openai.api_key.is_empty() {
                    anyhow::bail!("no OpenAI API key configured for model: {}", task.model);
                }
                info!("using OpenAI provider for model: {}", task.model);
                Ok(match &self.openai.api_base {
                    Some(base) => Arc::new(OpenAIProvider::with_base_url(
                        self.openai.api_key.clone(),
                        model,
                        base.clone(),
                    )),
                    None => Arc::new(OpenAIProvider::new(self.openai.api_key.clone(), model)),
                })
            }
            "anthropic" => {
                if self.anthropic.api_key.is_empty() {
                    anyhow::bail!("no Anthropic API key configured for model: {}", task.model);
                }
                info!("using Anthropic provider for model: {}", task.model);
                Ok(match &self.anthropic.api_base {
                    Some(base) => Arc::new(AnthropicProvider::with_base_url(
                        self.anthropic.api_key.clone(),
                        model,
                        base.clone(),
                    )),
                    None => Arc::new(AnthropicProvider::new(self.anthropic.api_key.clone(), model)),
                })
            }
            other => anyhow::bail!("unknown provider: {other}"),
        }
    }

    /// Construct every task provider up front so misconfiguration fails at
    /// startup instead of mid-conversation.
    pub fn build_tasks(&self, tasks: &TasksConfig) -> Result<TaskProviders> {
        Ok(TaskProviders {
            classification: self.create(&tasks.classification)?,
            extraction: self.create(&tasks.extraction)?,
            confirmation: self.create(&tasks.confirmation)?,
            general: self.create(&tasks.general)?,
            final_message: self.create(&tasks.final_message)?,
            image: self.create(&tasks.image)?,
        })
    }
}

#[cfg(test)]
mod tests;
