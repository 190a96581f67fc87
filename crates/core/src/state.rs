//! PipelineState — the shared record threaded through all three stages.
//!
//! Created once per user request, exclusively owned by the pipeline
//! while it runs, handed to the history store once `final_content` is
//! set. Stages receive it by value and return an updated copy; a
//! failing stage leaves the caller's copy untouched.

use serde::{Deserialize, Serialize};

/// The marketing channel the content is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Instagram,
    Blog,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Instagram => "instagram",
            Channel::Blog => "blog",
            Channel::Email => "email",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "instagram" => Ok(Channel::Instagram),
            "blog" => Ok(Channel::Blog),
            "email" => Ok(Channel::Email),
            other => Err(format!(
                "Unknown channel '{other}' (expected instagram, blog, or email)"
            )),
        }
    }
}

/// Identifies a pipeline stage. Each stage owns exactly one
/// PipelineState output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageRole {
    /// Before any stage has run
    Start,
    /// Strategy formulation — owns `strategy`
    Strategy,
    /// Draft writing — owns `draft_content`
    Content,
    /// Review and polish — owns `final_content`
    Review,
}

impl StageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageRole::Start => "start",
            StageRole::Strategy => "strategy",
            StageRole::Content => "content",
            StageRole::Review => "review",
        }
    }

    /// Human-readable label for progress display.
    pub fn label(&self) -> &'static str {
        match self {
            StageRole::Start => "Start",
            StageRole::Strategy => "Strategy formulation",
            StageRole::Content => "Content drafting",
            StageRole::Review => "Review & polish",
        }
    }
}

impl std::fmt::Display for StageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the pipeline's append-only conversation record.
///
/// `role` is the stage-role string of the stage that produced the
/// entry, never a raw model role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMessage {
    pub role: String,
    pub content: String,
}

/// The shared pipeline record.
///
/// The five input fields and `channel`/`tone` are immutable after
/// construction. Everything else is written exactly once by its owning
/// stage and never cleared within one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub business_name: String,
    pub business_features: String,
    pub target_customer: String,
    pub channel: Channel,
    pub tone: String,

    /// Append-only record of stage outputs; grows by exactly one per
    /// completed stage.
    pub messages: Vec<StageMessage>,

    pub strategy: Option<String>,
    pub draft_content: Option<String>,
    pub final_content: Option<String>,

    /// Raw text of trend documents retrieved by the strategy stage.
    pub trend_docs: Vec<String>,
    /// Raw text of best-practice documents retrieved by the content stage.
    pub best_practice_docs: Vec<String>,

    /// The last stage that completed.
    pub prev_node: StageRole,
}

impl PipelineState {
    /// Create the initial state for a new run. All stage-owned fields
    /// start unset.
    pub fn new(
        business_name: impl Into<String>,
        business_features: impl Into<String>,
        target_customer: impl Into<String>,
        channel: Channel,
        tone: impl Into<String>,
    ) -> Self {
        Self {
            business_name: business_name.into(),
            business_features: business_features.into(),
            target_customer: target_customer.into(),
            channel,
            tone: tone.into(),
            messages: Vec::new(),
            strategy: None,
            draft_content: None,
            final_content: None,
            trend_docs: Vec::new(),
            best_practice_docs: Vec::new(),
            prev_node: StageRole::Start,
        }
    }

    /// Whether the run has produced its final output.
    pub fn is_complete(&self) -> bool {
        self.final_content.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_parses_case_insensitively() {
        assert_eq!("Instagram".parse::<Channel>().unwrap(), Channel::Instagram);
        assert_eq!("BLOG".parse::<Channel>().unwrap(), Channel::Blog);
        assert!("tiktok".parse::<Channel>().is_err());
    }

    #[test]
    fn channel_display_matches_serde() {
        let json = serde_json::to_string(&Channel::Email).unwrap();
        assert_eq!(json, format!("\"{}\"", Channel::Email));
    }

    #[test]
    fn new_state_has_no_stage_output() {
        let state = PipelineState::new(
            "GreenSoap",
            "organic, cruelty-free",
            "women 20-30",
            Channel::Instagram,
            "friendly",
        );
        assert!(state.strategy.is_none());
        assert!(state.draft_content.is_none());
        assert!(state.final_content.is_none());
        assert!(state.messages.is_empty());
        assert_eq!(state.prev_node, StageRole::Start);
        assert!(!state.is_complete());
    }

    #[test]
    fn stage_role_strings() {
        assert_eq!(StageRole::Strategy.as_str(), "strategy");
        assert_eq!(StageRole::Review.to_string(), "review");
    }
}
