//! SQLite-persisted vector index over document chunks.
//!
//! Schema: `chunks(id INTEGER PRIMARY KEY, content TEXT, embedding BLOB)`
//! with vectors stored as little-endian f32 bytes. Retrieval is a full
//! cosine scan; corpora here are a single manual, not a corpus that needs
//! an ANN structure.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Cosine similarity. fastembed produces normalized vectors, so the dot
/// product is the cosine.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Serialize an embedding vector to little-endian bytes for BLOB storage.
pub fn serialize_embedding(v: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(v.len() * 4);
    for &val in v {
        bytes.extend_from_slice(&val.to_le_bytes());
    }
    bytes
}

/// Deserialize an embedding from little-endian bytes.
pub fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let mut arr = [0u8; 4];
            arr.copy_from_slice(chunk);
            f32::from_le_bytes(arr)
        })
        .collect()
}

/// Read a source document as plain text. PDF files go through text
/// extraction; anything else is read as UTF-8.
pub fn load_document(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        pdf_extract::extract_text(path)
            .with_context(|| format!("failed to extract text from PDF: {}", path.display()))
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read document: {}", path.display()))
    }
}

pub struct KnowledgeIndex {
    conn: Mutex<Connection>,
}

impl KnowledgeIndex {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::utils::ensure_dir(parent)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open index at {}", path.display()))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn chunk_count(&self) -> Result<usize> {
        let conn = self.conn.lock().map_err(|_| poisoned())?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Whether a previous build already populated this index.
    pub fn is_populated(&self) -> bool {
        self.chunk_count().map(|n| n > 0).unwrap_or(false)
    }

    pub fn insert_chunks(&self, chunks: &[(String, Vec<f32>)]) -> Result<()> {
        let mut conn = self.conn.lock().map_err(|_| poisoned())?;
        let tx = conn.transaction()?;
        for (content, embedding) in chunks {
            tx.execute(
                "INSERT INTO chunks (content, embedding) VALUES (?1, ?2)",
                params![content, serialize_embedding(embedding)],
            )?;
        }
        tx.commit()?;
        info!("indexed {} chunks", chunks.len());
        Ok(())
    }

    /// Top-k chunks by cosine similarity against an already-embedded query.
    pub fn search_embedded(&self, query: &[f32], k: usize) -> Result<Vec<(String, f32)>> {
        let conn = self.conn.lock().map_err(|_| poisoned())?;
        let mut stmt = conn.prepare("SELECT content, embedding FROM chunks")?;
        let rows = stmt.query_map([], |row| {
            let content: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((content, blob))
        })?;

        let mut scored: Vec<(String, f32)> = Vec::new();
        for row in rows {
            let (content, blob) = row?;
            let embedding = deserialize_embedding(&blob);
            scored.push((content, cosine_similarity(query, &embedding)));
        }
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

fn poisoned() -> anyhow::Error {
    anyhow::anyhow!("knowledge index lock poisoned")
}

/// Reuse the persisted index when it exists and is non-empty; otherwise
/// load the source document, chunk, embed, and persist. Idempotent across
/// restarts.
#[cfg(feature = "embeddings")]
pub fn open_or_build(
    index_path: &Path,
    document_path: &Path,
    chunk_size: usize,
    chunk_overlap: usize,
    embedder: &super::Embedder,
) -> Result<KnowledgeIndex> {
    let index = KnowledgeIndex::open(index_path)?;
    if index.is_populated() {
        info!(
            "loading existing knowledge index ({} chunks)",
            index.chunk_count()?
        );
        return Ok(index);
    }

    info!("building knowledge index from {}", document_path.display());
    let text = load_document(document_path)?;
    let chunks = super::chunker::chunk_text(&text, chunk_size, chunk_overlap);
    let embeddings = embedder.embed_texts(&chunks)?;
    let rows: Vec<(String, Vec<f32>)> = chunks.into_iter().zip(embeddings).collect();
    index.insert_chunks(&rows)?;
    Ok(index)
}
