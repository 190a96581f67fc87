//! Stage 1: strategy formulation.

use crate::stage::{RAG_TOP_K, Stage, StageContext};
use async_trait::async_trait;
use copymill_core::{PipelineState, Retriever, StageRole, format_context};
use std::sync::Arc;
use tracing::warn;

const SYSTEM_PROMPT: &str = "You are a world-class marketing strategy consultant. \
You distill a business's strengths into a sharp, actionable marketing strategy for \
one specific channel and audience. You reason step by step and commit to concrete \
recommendations rather than hedging.";

/// Turns the business inputs into a written marketing strategy.
///
/// The only stage that searches the trend corpus. Constructed with
/// `None` when retrieval is disabled.
pub struct StrategyAgent {
    retriever: Option<Arc<dyn Retriever>>,
}

impl StrategyAgent {
    pub fn new(retriever: Option<Arc<dyn Retriever>>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Stage for StrategyAgent {
    fn role(&self) -> StageRole {
        StageRole::Strategy
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    async fn retrieve_context(&self, ctx: &mut StageContext) {
        let Some(retriever) = &self.retriever else {
            return;
        };

        let state = &ctx.state;
        let query = format!(
            "{} {} {} marketing trends",
            state.business_name, state.target_customer, state.channel
        );

        match retriever.search_trends(&query, RAG_TOP_K).await {
            Ok(docs) => {
                ctx.state.trend_docs = docs.iter().map(|d| d.content.clone()).collect();
                ctx.context = format_context(&docs);
            }
            Err(e) => {
                warn!(error = %e, query, "Trend retrieval failed, continuing without context");
            }
        }
    }

    fn create_prompt(&self, state: &PipelineState, context: &str) -> String {
        let mut prompt = String::new();

        if !context.is_empty() {
            prompt.push_str("Latest marketing trends for reference:\n\n");
            prompt.push_str(context);
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            "Develop a marketing strategy for the following business.\n\n\
             Business name: {}\n\
             Key features: {}\n\
             Target customer: {}\n\
             Channel: {}\n\
             Desired tone: {}\n\n\
             Work through these steps in order:\n\
             1. Identify the target persona's needs and pain points.\n\
             2. Define the core message that connects the business's features to those needs.\n\
             3. Recommend the tone and structure best suited to the {} channel.\n\n\
             Present the resulting strategy clearly under each step.",
            state.business_name,
            state.business_features,
            state.target_customer,
            state.channel,
            state.tone,
            state.channel,
        ));

        prompt
    }

    fn apply_response(&self, state: &mut PipelineState, response: &str) {
        state.strategy = Some(response.to_string());
    }
}
