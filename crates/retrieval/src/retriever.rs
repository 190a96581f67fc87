//! The retrieval collaborator backing both RAG-enabled stages.

use crate::corpus;
use crate::index::VectorIndex;
use async_trait::async_trait;
use copymill_core::error::RetrievalError;
use copymill_core::provider::EmbeddingRequest;
use copymill_core::{Channel, Document, Provider, Retriever};
use std::sync::Arc;
use tracing::{debug, info};

/// Keep documents whose channel tag matches the requested channel or is
/// "general". When the filter empties the set, the input ranking is
/// returned unchanged — some reference context beats none.
pub fn filter_by_channel(docs: Vec<Document>, channel: Channel) -> Vec<Document> {
    let filtered: Vec<Document> = docs
        .iter()
        .filter(|d| {
            matches!(
                d.metadata.channel.as_deref(),
                Some(tag) if tag == channel.as_str() || tag == "general"
            )
        })
        .cloned()
        .collect();

    if filtered.is_empty() { docs } else { filtered }
}

/// Similarity-search retriever over the two seeded indexes.
pub struct VectorRetriever {
    provider: Arc<dyn Provider>,
    embedding_model: String,
    trends: VectorIndex,
    practices: VectorIndex,
}

impl VectorRetriever {
    /// Embed the built-in corpus and build both indexes.
    ///
    /// Called once at startup; the resulting retriever is read-only and
    /// safe to share across requests.
    pub async fn seed(
        provider: Arc<dyn Provider>,
        embedding_model: impl Into<String>,
    ) -> Result<Self, RetrievalError> {
        let embedding_model = embedding_model.into();

        let trend_docs = corpus::trend_documents();
        let practice_docs = corpus::best_practice_documents();

        let trends = Self::build_index(&provider, &embedding_model, trend_docs).await?;
        let practices = Self::build_index(&provider, &embedding_model, practice_docs).await?;

        info!(
            trends = trends.len(),
            practices = practices.len(),
            model = %embedding_model,
            "Retrieval indexes seeded"
        );

        Ok(Self { provider, embedding_model, trends, practices })
    }

    async fn build_index(
        provider: &Arc<dyn Provider>,
        model: &str,
        documents: Vec<Document>,
    ) -> Result<VectorIndex, RetrievalError> {
        let inputs: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();

        let response = provider
            .embed(EmbeddingRequest { model: model.to_string(), inputs })
            .await
            .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?;

        VectorIndex::new(documents, response.embeddings).map_err(RetrievalError::IndexUnavailable)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, RetrievalError> {
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.embedding_model.clone(),
                inputs: vec![query.to_string()],
            })
            .await
            .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::EmbeddingFailed("empty embedding response".into()))
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn search_trends(
        &self,
        query: &str,
        k: usize,
    ) -> std::result::Result<Vec<Document>, RetrievalError> {
        let embedding = self.embed_query(query).await?;
        let results = self.trends.rank(&embedding, k);
        debug!(query, hits = results.len(), "Trend search");
        Ok(results)
    }

    async fn search_best_practices(
        &self,
        channel: Channel,
        k: usize,
    ) -> std::result::Result<Vec<Document>, RetrievalError> {
        let query = format!("{channel} marketing best practices and content structure");
        let embedding = self.embed_query(&query).await?;
        let ranked = self.practices.rank(&embedding, k);
        let results = filter_by_channel(ranked, channel);
        debug!(channel = %channel, hits = results.len(), "Best-practice search");
        Ok(results)
    }
}
