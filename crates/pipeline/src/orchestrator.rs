//! The orchestrator: Strategy → Content → Review, strictly in order.

use crate::content::ContentAgent;
use crate::event::PipelineEvent;
use crate::review::ReviewAgent;
use crate::stage::{Stage, StageMachine};
use crate::strategy::StrategyAgent;
use copymill_core::{Error, PipelineState, Provider, Result, Retriever};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{error, info};

const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Runs the three stages sequentially over one shared [`StageMachine`].
///
/// Cheap to clone; all stages and the provider sit behind `Arc`s.
#[derive(Clone)]
pub struct Orchestrator {
    machine: StageMachine,
    stages: Vec<Arc<dyn Stage>>,
}

impl Orchestrator {
    /// Wire the fixed stage sequence. `retriever` is `None` when
    /// retrieval is disabled; the review stage never retrieves.
    pub fn new(
        provider: Arc<dyn Provider>,
        retriever: Option<Arc<dyn Retriever>>,
        model: impl Into<String>,
    ) -> Self {
        let stages: Vec<Arc<dyn Stage>> = vec![
            Arc::new(StrategyAgent::new(retriever.clone())),
            Arc::new(ContentAgent::new(retriever)),
            Arc::new(ReviewAgent::new()),
        ];

        Self { machine: StageMachine::new(provider, model), stages }
    }

    /// Override the sampling temperature shared by all stages.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.machine = self.machine.with_temperature(temperature);
        self
    }

    /// Run the pipeline to completion, or fail at the first stage error.
    pub async fn run(&self, state: PipelineState) -> Result<PipelineState> {
        self.drive(state, None, None).await
    }

    /// Like [`run`](Self::run), but checks `cancel` between stages. A
    /// stage already in flight finishes; the next one never starts.
    pub async fn run_with_cancel(
        &self,
        state: PipelineState,
        cancel: &AtomicBool,
    ) -> Result<PipelineState> {
        self.drive(state, None, Some(cancel)).await
    }

    /// Spawn the run and stream progress events.
    ///
    /// The receiver yields one `StageCompleted` per finished stage and
    /// closes after a terminal `Completed` or `Failed`.
    pub fn run_streaming(
        &self,
        state: PipelineState,
        cancel: Option<Arc<AtomicBool>>,
    ) -> mpsc::Receiver<PipelineEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let orchestrator = self.clone();

        tokio::spawn(async move {
            let result = orchestrator
                .drive(state, Some(&tx), cancel.as_deref())
                .await;

            let terminal = match result {
                Ok(state) => PipelineEvent::Completed { state },
                Err(e) => {
                    error!(error = %e, "Pipeline run failed");
                    PipelineEvent::Failed { message: e.to_string() }
                }
            };
            // Receiver may already be gone; nothing left to report to.
            let _ = tx.send(terminal).await;
        });

        rx
    }

    async fn drive(
        &self,
        mut state: PipelineState,
        events: Option<&mpsc::Sender<PipelineEvent>>,
        cancel: Option<&AtomicBool>,
    ) -> Result<PipelineState> {
        info!(
            business = %state.business_name,
            channel = %state.channel,
            "Pipeline starting"
        );

        for stage in &self.stages {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(Error::Cancelled { stage: stage.role().as_str().to_string() });
                }
            }

            state = self.machine.run(stage.as_ref(), &state).await?;

            if let Some(tx) = events {
                let output = state
                    .messages
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                let _ = tx
                    .send(PipelineEvent::StageCompleted {
                        role: stage.role(),
                        output,
                        state: state.clone(),
                    })
                    .await;
            }
        }

        info!(business = %state.business_name, "Pipeline complete");
        Ok(state)
    }
}
