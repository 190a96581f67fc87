//! Error types for the Copymill domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Copymill operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider (generation) errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- History (persistence) errors ---
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Cooperative cancellation between stages ---
    #[error("Run cancelled before stage {stage}")]
    Cancelled { stage: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from the language-model backend. Fatal for the current run:
/// no retry, nothing persisted.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model returned an empty completion for stage {0}")]
    EmptyCompletion(String),
}

/// Failures from the retrieval collaborator. Absorbed at the stage
/// boundary: the stage degrades to an empty context and still runs.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Similarity query failed: {0}")]
    QueryFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Retrieval index unavailable: {0}")]
    IndexUnavailable(String),
}

/// Failures from the record store. Reported distinctly from generation
/// failures: the generated content is still available to the caller.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn retrieval_error_wraps_into_top_level() {
        let err: Error = RetrievalError::QueryFailed("index offline".into()).into();
        assert!(matches!(err, Error::Retrieval(_)));
        assert!(err.to_string().contains("index offline"));
    }

    #[test]
    fn cancelled_names_the_stage() {
        let err = Error::Cancelled { stage: "content".into() };
        assert!(err.to_string().contains("content"));
    }
}
