//! Vector similarity ranking.
//!
//! Pure-Rust cosine similarity over an in-memory document index.

use copymill_core::Document;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal,
/// -1 = opposite. Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// A document with its precomputed embedding.
#[derive(Debug, Clone)]
struct IndexedDocument {
    document: Document,
    embedding: Vec<f32>,
}

/// An in-memory vector index, read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexedDocument>,
}

impl VectorIndex {
    /// Build an index from documents and their embeddings.
    ///
    /// The two slices must be the same length (one embedding per
    /// document, in order).
    pub fn new(documents: Vec<Document>, embeddings: Vec<Vec<f32>>) -> Result<Self, String> {
        if documents.len() != embeddings.len() {
            return Err(format!(
                "Embedding count {} does not match document count {}",
                embeddings.len(),
                documents.len()
            ));
        }

        let entries = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| IndexedDocument { document, embedding })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank all documents against a query embedding and return the
    /// top-k, most relevant first.
    pub fn rank(&self, query_embedding: &[f32], k: usize) -> Vec<Document> {
        let mut scored: Vec<(f32, &IndexedDocument)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(&e.embedding, query_embedding), e))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored.into_iter().map(|(_, e)| e.document.clone()).collect()
    }
}
