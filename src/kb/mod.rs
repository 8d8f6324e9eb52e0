//! Knowledge-base retrieval for the QA service: chunk a source document,
//! embed the chunks, persist them in SQLite, answer queries over the top
//! matches.

pub mod chunker;
#[cfg(feature = "embeddings")]
pub mod embedder;
pub mod index;
#[cfg(feature = "embeddings")]
pub mod qa;

#[cfg(feature = "embeddings")]
pub use embedder::Embedder;
pub use index::KnowledgeIndex;
#[cfg(feature = "embeddings")]
pub use qa::QaService;
