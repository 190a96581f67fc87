//! Retriever trait — the query contract of the similarity-search
//! collaborator.
//!
//! The pipeline treats the retriever as a read-only, safely-shared
//! resource. Both operations are best-effort relevance ranked, most
//! relevant first, returning at most `k` documents.

use crate::document::Document;
use crate::error::RetrievalError;
use crate::state::Channel;
use async_trait::async_trait;

#[async_trait]
pub trait Retriever: Send + Sync {
    /// Search marketing-trend documents by free-text query.
    async fn search_trends(
        &self,
        query: &str,
        k: usize,
    ) -> std::result::Result<Vec<Document>, RetrievalError>;

    /// Search best-practice documents for a channel.
    ///
    /// Results prefer documents whose metadata channel matches the
    /// requested channel or is tagged "general". When that filter
    /// yields nothing, the unfiltered top-k is returned instead — a
    /// deliberate heuristic favoring "always some context" over strict
    /// filtering.
    async fn search_best_practices(
        &self,
        channel: Channel,
        k: usize,
    ) -> std::result::Result<Vec<Document>, RetrievalError>;
}
