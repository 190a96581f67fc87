//! Progress events emitted by a streaming pipeline run.

use copymill_core::{PipelineState, StageRole};
use serde::{Deserialize, Serialize};

/// One progress notification from [`crate::Orchestrator::run_streaming`].
///
/// A successful run emits one `StageCompleted` per stage, in order,
/// followed by a terminal `Completed`. A failed run emits the events of
/// the stages that finished, then a terminal `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A stage finished; carries its output and the state after it.
    StageCompleted {
        role: StageRole,
        output: String,
        state: PipelineState,
    },
    /// The whole pipeline finished.
    Completed { state: PipelineState },
    /// The run aborted; no further events follow.
    Failed { message: String },
}

impl PipelineEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            PipelineEvent::StageCompleted { .. } => "stage_completed",
            PipelineEvent::Completed { .. } => "completed",
            PipelineEvent::Failed { .. } => "failed",
        }
    }
}
