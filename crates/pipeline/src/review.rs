//! Stage 3: review and polish.

use crate::stage::{Stage, StageContext};
use async_trait::async_trait;
use copymill_core::{PipelineState, StageRole};

const SYSTEM_PROMPT: &str = "You are a content quality-control expert. You inspect \
marketing copy against its strategy, fix every weakness you find, and return the \
polished final text. You never return commentary, notes, or anything but the copy \
itself.";

/// Checks the draft against the strategy and produces the final text.
///
/// The only stage without retrieval; the strategy and draft already in
/// the state are its entire input.
pub struct ReviewAgent;

impl ReviewAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReviewAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for ReviewAgent {
    fn role(&self) -> StageRole {
        StageRole::Review
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    async fn retrieve_context(&self, _ctx: &mut StageContext) {}

    fn create_prompt(&self, state: &PipelineState, _context: &str) -> String {
        let strategy = state.strategy.as_deref().unwrap_or_default();
        let draft = state.draft_content.as_deref().unwrap_or_default();

        format!(
            "Review the draft below against its strategy and return the improved \
             final version.\n\n\
             Strategy:\n{}\n\n\
             Draft ({} channel, {} tone):\n{}\n\n\
             Check every point:\n\
             1. Does the copy deliver the strategy's core message?\n\
             2. Does it fit the conventions of the {} channel?\n\
             3. Is the {} tone consistent throughout?\n\
             4. Are grammar and phrasing natural and correct?\n\
             5. Is the call-to-action clear and compelling?\n\
             6. Where relevant, are SEO keywords used naturally?\n\n\
             Fix everything that falls short. Output only the final polished copy, \
             with no explanations or review notes.",
            strategy, state.channel, state.tone, draft, state.channel, state.tone,
        )
    }

    fn apply_response(&self, state: &mut PipelineState, response: &str) {
        state.final_content = Some(response.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_context;
    use copymill_core::Channel;

    fn state() -> PipelineState {
        let mut s = PipelineState::new(
            "GreenSoap",
            "organic, cruelty-free",
            "women 20-30",
            Channel::Email,
            "friendly",
        );
        s.strategy = Some("Credibility first.".into());
        s.draft_content = Some("Subject: Gentle on skin".into());
        s
    }

    #[tokio::test]
    async fn retrieval_is_a_no_op() {
        let agent = ReviewAgent::new();
        let mut ctx = test_context(state());
        agent.retrieve_context(&mut ctx).await;
        assert!(ctx.context.is_empty());
        assert!(ctx.state.trend_docs.is_empty());
        assert!(ctx.state.best_practice_docs.is_empty());
    }

    #[test]
    fn prompt_carries_strategy_draft_and_checklist() {
        let agent = ReviewAgent::new();
        let prompt = agent.create_prompt(&state(), "");
        assert!(prompt.contains("Credibility first."));
        assert!(prompt.contains("Subject: Gentle on skin"));
        assert!(prompt.contains("email channel"));
        assert!(prompt.contains("Output only the final polished copy"));
    }

    #[test]
    fn completes_the_state() {
        let agent = ReviewAgent::new();
        let mut s = state();
        assert!(!s.is_complete());
        agent.apply_response(&mut s, "final copy");
        assert_eq!(s.final_content.as_deref(), Some("final copy"));
        assert!(s.is_complete());
    }
}
