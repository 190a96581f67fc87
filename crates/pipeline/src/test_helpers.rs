//! Shared mocks for pipeline tests.

use crate::stage::StageContext;
use async_trait::async_trait;
use copymill_core::error::{ProviderError, RetrievalError};
use copymill_core::provider::{ProviderRequest, ProviderResponse};
use copymill_core::{Channel, Document, DocumentMetadata, Message, PipelineState, Provider, Retriever};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: None,
        model: "mock-model".to_string(),
    }
}

pub fn test_context(state: PipelineState) -> StageContext {
    StageContext {
        state,
        context: String::new(),
        messages: Vec::new(),
        response: String::new(),
    }
}

pub fn trend_doc(content: &str) -> Document {
    Document::new(
        content,
        DocumentMetadata { source: Some("mock".into()), category: None, channel: None },
    )
}

pub fn practice_doc(content: &str, channel: &str) -> Document {
    Document::new(
        content,
        DocumentMetadata { source: None, category: None, channel: Some(channel.into()) },
    )
}

/// Hands out queued responses in order; optionally fails once the
/// queue runs dry.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self { responses: Mutex::new(responses), failure: None, calls: AtomicUsize::new(0) }
    }

    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    /// Serve `responses`, then fail every further call with a network
    /// error carrying `message`.
    pub fn with_failure_after(responses: Vec<ProviderResponse>, message: &str) -> Self {
        Self {
            responses: Mutex::new(responses),
            failure: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(
        &self,
        _request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            match &self.failure {
                Some(message) => Err(ProviderError::Network(message.clone())),
                None => panic!("mock provider exhausted"),
            }
        } else {
            Ok(responses.remove(0))
        }
    }
}

/// Fails every completion call.
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn network(message: &str) -> Self {
        Self { message: message.to_string() }
    }
}

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(
        &self,
        _request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::Network(self.message.clone()))
    }
}

/// Retriever serving fixed documents, recording what it was asked.
pub struct StaticRetriever {
    trends: Vec<Document>,
    practices: Vec<Document>,
    failing: bool,
    last_trend_query: Mutex<Option<String>>,
    last_practice_channel: Mutex<Option<Channel>>,
}

impl StaticRetriever {
    pub fn with_trends(trends: Vec<Document>) -> Self {
        Self {
            trends,
            practices: Vec::new(),
            failing: false,
            last_trend_query: Mutex::new(None),
            last_practice_channel: Mutex::new(None),
        }
    }

    pub fn with_practices(practices: Vec<Document>) -> Self {
        Self::with_trends(Vec::new()).and_practices(practices)
    }

    pub fn and_practices(mut self, practices: Vec<Document>) -> Self {
        self.practices = practices;
        self
    }

    /// A retriever whose every search fails.
    pub fn failing() -> Self {
        let mut r = Self::with_trends(Vec::new());
        r.failing = true;
        r
    }

    pub fn last_trend_query(&self) -> Option<String> {
        self.last_trend_query.lock().unwrap().clone()
    }

    pub fn last_practice_channel(&self) -> Option<Channel> {
        *self.last_practice_channel.lock().unwrap()
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn search_trends(
        &self,
        query: &str,
        _k: usize,
    ) -> Result<Vec<Document>, RetrievalError> {
        *self.last_trend_query.lock().unwrap() = Some(query.to_string());
        if self.failing {
            return Err(RetrievalError::QueryFailed("mock failure".into()));
        }
        Ok(self.trends.clone())
    }

    async fn search_best_practices(
        &self,
        channel: Channel,
        _k: usize,
    ) -> Result<Vec<Document>, RetrievalError> {
        *self.last_practice_channel.lock().unwrap() = Some(channel);
        if self.failing {
            return Err(RetrievalError::QueryFailed("mock failure".into()));
        }
        Ok(self.practices.clone())
    }
}
