//! Effects produced by state transitions

use super::state::AnswerRequest;
use crate::transcript::Sender;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage { sender: Sender, text: String },

    /// Start the paced welcome sequence for a freshly named user
    ScheduleStagedReplies { user_name: String },

    /// Make a remote answer call (spawns as background task)
    RequestAnswer { request: AnswerRequest },

    /// Publish the new state to observers
    PublishView,
}

impl Effect {
    pub fn user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}
