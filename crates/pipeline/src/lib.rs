//! The three-stage content generation pipeline.
//!
//! Every stage runs the same fixed four-step machine:
//!
//! 1. **RetrieveContext** — stage-specific similarity search (optional)
//! 2. **PrepareMessages** — system turn + re-expressed history + task turn
//! 3. **GenerateResponse** — one blocking model call, no retry
//! 4. **UpdateState** — write the stage's owned field, append to the record
//!
//! The orchestrator composes three stages into one fixed sequential
//! run: Strategy → Content → Review. No branching, no parallelism,
//! no cycles.

pub mod content;
pub mod event;
pub mod orchestrator;
pub mod review;
pub mod stage;
pub mod strategy;

pub use content::ContentAgent;
pub use event::PipelineEvent;
pub use orchestrator::Orchestrator;
pub use review::ReviewAgent;
pub use stage::{GENERATION_TEMPERATURE, RAG_TOP_K, Stage, StageContext, StageMachine};
pub use strategy::StrategyAgent;

#[cfg(test)]
pub(crate) mod test_helpers;
