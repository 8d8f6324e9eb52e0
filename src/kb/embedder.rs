//! Local embedding generation via fastembed (ONNX-based, no API key needed).

use anyhow::Result;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

pub struct Embedder {
    model: TextEmbedding,
}

impl Embedder {
    /// Load the embedding model. Downloads it on first use (~30MB).
    pub fn new() -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::BGESmallENV15).with_show_download_progress(true),
        )?;
        info!("embedding model loaded");
        Ok(Self { model })
    }

    /// Embed a batch of texts, one vector per text.
    pub fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.embed(texts.to_vec(), None)?)
    }

    /// Embed a single query string.
    pub fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let embeddings = self.model.embed(vec![query.to_string()], None)?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty embedding result"))
    }
}
