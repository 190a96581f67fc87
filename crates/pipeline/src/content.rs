//! Stage 2: content drafting.

use crate::stage::{RAG_TOP_K, Stage, StageContext};
use async_trait::async_trait;
use copymill_core::{Channel, PipelineState, Retriever, StageRole, format_context};
use std::sync::Arc;
use tracing::warn;

const SYSTEM_PROMPT: &str = "You are a professional copywriter. You turn a marketing \
strategy into publish-ready copy for a specific channel, respecting the channel's \
conventions and the requested tone. You write the copy itself, not advice about copy.";

/// Channel-specific formatting requirements appended to every content
/// prompt. Fixed, not retrieved.
fn channel_checklist(channel: Channel) -> &'static str {
    match channel {
        Channel::Instagram => {
            "Formatting requirements for Instagram:\n\
             - Open with a striking first line that stops the scroll.\n\
             - Two or three short paragraphs, airy and easy to skim.\n\
             - Use emoji where they support the tone.\n\
             - End with 5-8 relevant hashtags.\n\
             - Weave in a storytelling element."
        }
        Channel::Blog => {
            "Formatting requirements for a blog post:\n\
             - Headline built on a question or a number.\n\
             - Clear intro, body, conclusion structure.\n\
             - At least 500 characters of body text.\n\
             - Break the body up with subheadings.\n\
             - Work natural SEO keywords into the text."
        }
        Channel::Email => {
            "Formatting requirements for a marketing email:\n\
             - Subject line under 40 characters, leading with urgency, benefit, or curiosity.\n\
             - Personalized greeting.\n\
             - Core message in three lines or fewer.\n\
             - Benefits as short bullet points.\n\
             - Exactly one clear call-to-action."
        }
    }
}

/// Writes the channel draft from the strategy.
///
/// The only stage that searches the best-practice corpus.
pub struct ContentAgent {
    retriever: Option<Arc<dyn Retriever>>,
}

impl ContentAgent {
    pub fn new(retriever: Option<Arc<dyn Retriever>>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Stage for ContentAgent {
    fn role(&self) -> StageRole {
        StageRole::Content
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    async fn retrieve_context(&self, ctx: &mut StageContext) {
        let Some(retriever) = &self.retriever else {
            return;
        };

        let channel = ctx.state.channel;
        match retriever.search_best_practices(channel, RAG_TOP_K).await {
            Ok(docs) => {
                ctx.state.best_practice_docs =
                    docs.iter().map(|d| d.content.clone()).collect();
                ctx.context = format_context(&docs);
            }
            Err(e) => {
                warn!(
                    error = %e,
                    channel = %channel,
                    "Best-practice retrieval failed, continuing without context"
                );
            }
        }
    }

    fn create_prompt(&self, state: &PipelineState, context: &str) -> String {
        let strategy = state.strategy.as_deref().unwrap_or_default();
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "Write marketing copy for the {} channel based on this strategy:\n\n{}\n\n",
            state.channel, strategy
        ));

        if !context.is_empty() {
            prompt.push_str(
                "Proven templates for this channel. Use them as structural reference, \
                 do not copy them:\n\n",
            );
            prompt.push_str(context);
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            "Business name: {}\n\
             Key features: {}\n\
             Target customer: {}\n\
             Desired tone: {}\n\n\
             Writing rules:\n\
             - Lead with the strategy's core message.\n\
             - Speak directly to the persona's pain points.\n\
             - Keep the requested tone throughout.\n\
             - Close with a clear call-to-action.\n\n{}",
            state.business_name,
            state.business_features,
            state.target_customer,
            state.tone,
            channel_checklist(state.channel),
        ));

        prompt
    }

    fn apply_response(&self, state: &mut PipelineState, response: &str) {
        state.draft_content = Some(response.to_string());
    }
}
