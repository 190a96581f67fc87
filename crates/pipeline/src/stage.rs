//! The per-stage execution machine and the Stage extension points.

use async_trait::async_trait;
use copymill_core::error::ProviderError;
use copymill_core::provider::ProviderRequest;
use copymill_core::{Error, Message, PipelineState, Provider, Result, StageMessage, StageRole};
use std::sync::Arc;
use tracing::{debug, info};

/// Sampling temperature for every stage completion.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// How many documents a RAG-enabled stage retrieves.
pub const RAG_TOP_K: usize = 2;

/// Ephemeral per-stage working data. Created at stage entry, merged
/// back into the returned PipelineState at stage exit.
pub struct StageContext {
    /// Working copy of the pipeline state. The caller's state is never
    /// touched; a failed stage simply drops this copy.
    pub state: PipelineState,
    /// Retrieved reference text, empty when RAG is off or retrieval failed.
    pub context: String,
    /// The outgoing message list for the model call.
    pub messages: Vec<Message>,
    /// The raw completion text.
    pub response: String,
}

impl StageContext {
    fn new(state: PipelineState) -> Self {
        Self {
            state,
            context: String::new(),
            messages: Vec::new(),
            response: String::new(),
        }
    }
}

/// Extension points of one pipeline stage.
///
/// The machine drives the fixed step order; implementations supply the
/// stage identity, its instruction text, its retrieval behavior, its
/// task prompt, and the single owned field it writes.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Which stage this is. Determines message roles and `prev_node`.
    fn role(&self) -> StageRole;

    /// Fixed per-stage instruction text, sent as the system turn.
    fn system_prompt(&self) -> &str;

    /// Stage-specific retrieval, gated by the RAG setting fixed at
    /// construction. On success, copies retrieved document text into
    /// the matching state field and fills `ctx.context`. Retrieval
    /// failures are absorbed here: log a warning, leave the context
    /// empty, and let the stage run anyway.
    async fn retrieve_context(&self, ctx: &mut StageContext);

    /// Build the stage's task instruction from the current state and
    /// the retrieved context. Pure.
    fn create_prompt(&self, state: &PipelineState, context: &str) -> String;

    /// Write the completion into the one state field this stage owns.
    fn apply_response(&self, state: &mut PipelineState, response: &str);
}

/// Drives any [`Stage`] through the four-step sequence. One machine is
/// shared by all three stages of a pipeline.
#[derive(Clone)]
pub struct StageMachine {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

impl StageMachine {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: GENERATION_TEMPERATURE,
        }
    }

    /// Override the sampling temperature for all stages.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Execute all four steps and return the updated state.
    ///
    /// Either the returned state has exactly the stage's owned field
    /// newly populated, one appended message, and `prev_node` advanced,
    /// or an error is returned and the input is untouched.
    pub async fn run(&self, stage: &dyn Stage, state: &PipelineState) -> Result<PipelineState> {
        let role = stage.role();
        info!(stage = %role, "Stage starting");

        let mut ctx = StageContext::new(state.clone());

        // RetrieveContext
        stage.retrieve_context(&mut ctx).await;

        // PrepareMessages
        self.prepare_messages(stage, &mut ctx);

        // GenerateResponse
        self.generate_response(&mut ctx, role).await?;

        // UpdateState
        stage.apply_response(&mut ctx.state, &ctx.response);
        ctx.state.messages.push(StageMessage {
            role: role.as_str().to_string(),
            content: ctx.response.clone(),
        });
        ctx.state.prev_node = role;

        info!(stage = %role, response_len = ctx.response.len(), "Stage complete");
        Ok(ctx.state)
    }

    /// Deterministic message composition: system turn first, then every
    /// prior record entry re-expressed as a turn, then the freshly
    /// built task turn last.
    ///
    /// Entries whose role is "assistant" pass through as assistant
    /// turns; all other roles are rendered as `"<role>: <content>"`
    /// user turns. In practice the record only carries stage-role
    /// strings, so everything takes the second branch.
    fn prepare_messages(&self, stage: &dyn Stage, ctx: &mut StageContext) {
        let mut messages = vec![Message::system(stage.system_prompt())];

        for entry in &ctx.state.messages {
            if entry.role == "assistant" {
                messages.push(Message::assistant(&entry.content));
            } else {
                messages.push(Message::user(format!("{}: {}", entry.role, entry.content)));
            }
        }

        messages.push(Message::user(stage.create_prompt(&ctx.state, &ctx.context)));
        ctx.messages = messages;
    }

    /// One blocking completion call at the fixed temperature. No retry,
    /// no timeout beyond the HTTP client's own; any failure aborts the
    /// stage and propagates.
    async fn generate_response(&self, ctx: &mut StageContext, role: StageRole) -> Result<()> {
        debug!(stage = %role, turns = ctx.messages.len(), "Requesting completion");

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: ctx.messages.clone(),
            temperature: self.temperature,
            max_tokens: None,
        };

        let response = self.provider.complete(request).await?;

        if response.message.content.trim().is_empty() {
            return Err(Error::Provider(ProviderError::EmptyCompletion(
                role.as_str().to_string(),
            )));
        }

        ctx.response = response.message.content;
        Ok(())
    }
}
