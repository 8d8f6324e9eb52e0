//! Semantic cache for general-conversation answers: near-duplicate prompts
//! reuse the previous response instead of another LLM round trip.

use crate::kb::Embedder;
use crate::kb::index::cosine_similarity;
use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct ResponseCache {
    embedder: Arc<Embedder>,
    threshold: f32,
    entries: Mutex<Vec<(Vec<f32>, String)>>,
}

impl ResponseCache {
    pub fn new(embedder: Arc<Embedder>, threshold: f32) -> Self {
        Self {
            embedder,
            threshold,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Closest cached response above the threshold, if any.
    pub fn get(&self, prompt: &str) -> Result<Option<String>> {
        let query = self.embedder.embed_query(prompt)?;
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("response cache lock poisoned"))?;

        let best = entries
            .iter()
            .map(|(embedding, response)| (cosine_similarity(&query, embedding), response))
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(match best {
            Some((score, response)) if score >= self.threshold => {
                debug!("cache hit with similarity {score:.3}");
                Some(response.clone())
            }
            _ => None,
        })
    }

    pub fn insert(&self, prompt: &str, response: &str) -> Result<()> {
        let embedding = self.embedder.embed_query(prompt)?;
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("response cache lock poisoned"))?
            .push((embedding, response.to_string()));
        Ok(())
    }
}
