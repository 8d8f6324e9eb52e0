//! Retrieval-augmented answering over the knowledge index.

use super::{Embedder, KnowledgeIndex};
use crate::prompts;
use crate::providers::base::{ChatRequest, LLMProvider, Message};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct QaService {
    index: Arc<KnowledgeIndex>,
    embedder: Arc<Embedder>,
    provider: Arc<dyn LLMProvider>,
    top_k: usize,
}

impl QaService {
    pub fn new(
        index: Arc<KnowledgeIndex>,
        embedder: Arc<Embedder>,
        provider: Arc<dyn LLMProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            provider,
            top_k,
        }
    }

    /// Retrieve the closest chunks and answer the query against them.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let query_embedding = self.embedder.embed_query(query)?;
        let results = self.index.search_embedded(&query_embedding, self.top_k)?;
        debug!("retrieved {} contexts for query", results.len());

        let contexts = results
            .into_iter()
            .map(|(content, _)| content)
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = prompts::RAG_ANSWER
            .replace("{contexts}", &contexts)
            .replace("{query}", query);

        let response = self
            .provider
            .chat(ChatRequest {
                messages: vec![
                    Message::system("You are a helpful assistant."),
                    Message::user(prompt),
                ],
                model: None,
                max_tokens: 1000,
                temperature: 0.2,
                response_schema: None,
            })
            .await?;

        Ok(response.text()?.trim().to_string())
    }
}
