//! # Copymill Core
//!
//! Domain types, traits, and error definitions for the Copymill
//! marketing-content pipeline. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is defined as a trait here. Implementations live
//! in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod document;
pub mod error;
pub mod history;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod state;

// Re-export key types at crate root for ergonomics
pub use document::{Document, DocumentMetadata, format_context};
pub use error::{Error, HistoryError, ProviderError, Result, RetrievalError};
pub use history::{ContentRecord, HistoryStore, NewContentRecord};
pub use message::{Message, Role};
pub use provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};
pub use retrieval::Retriever;
pub use state::{Channel, PipelineState, StageMessage, StageRole};
