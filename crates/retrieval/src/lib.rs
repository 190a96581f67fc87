//! Similarity search over the seeded marketing reference corpus.
//!
//! Two in-process vector indexes back the pipeline's retrieval
//! collaborator: one of marketing-trend documents, one of per-channel
//! best-practice documents. Embeddings come from the configured
//! provider; ranking is plain cosine similarity.
//!
//! The indexes are read-only after seeding, so one retriever can be
//! shared safely across concurrent requests.

pub mod corpus;
pub mod index;
pub mod retriever;

pub use index::{VectorIndex, cosine_similarity};
pub use retriever::{VectorRetriever, filter_by_channel};
