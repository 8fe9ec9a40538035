//! Conversation state types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coarse stage of the conversation. Moves forward exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the user to tell us their name
    #[default]
    AwaitingName,
    /// Name captured, open-ended questions
    Chatting { user_name: String },
}

impl Phase {
    pub fn user_name(&self) -> Option<&str> {
        match self {
            Phase::AwaitingName => None,
            Phase::Chatting { user_name } => Some(user_name),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::AwaitingName => "awaiting_name",
            Phase::Chatting { .. } => "chatting",
        }
    }
}

/// Full mutable state of one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvState {
    pub phase: Phase,
    /// True until the first question has been answered or the welcome
    /// sequence has finished. Allows one personalized answer.
    pub first_answer_pending: bool,
    /// A remote answer call is outstanding
    pub pending_request: bool,
    /// Pending contents of the input field
    pub draft: String,
}

impl Default for ConvState {
    fn default() -> Self {
        Self {
            phase: Phase::AwaitingName,
            first_answer_pending: true,
            pending_request: false,
            draft: String::new(),
        }
    }
}

impl ConvState {
    pub fn user_name(&self) -> Option<&str> {
        self.phase.user_name()
    }

    /// Check whether new submissions are currently accepted
    pub fn accepts_input(&self) -> bool {
        !self.pending_request
    }
}

/// A bot message delivered after a pacing delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedReply {
    /// Personalized welcome line, already rendered
    Welcome { text: String },
    /// Fixed description of what the bot can help with
    Capabilities,
}

/// Inputs for one remote answer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRequest {
    pub question: String,
    pub user_name: Option<String>,
    pub first_answer_pending: bool,
}

/// Delay before the first staged reply
pub const WELCOME_DELAY: Duration = Duration::from_millis(500);
/// Further delay before the follow-up reply
pub const FOLLOW_UP_DELAY: Duration = Duration::from_millis(1000);
/// Delay between a finished answer call and its appearance
pub const ANSWER_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub session_id: String,
}

impl ConvContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}
