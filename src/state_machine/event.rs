//! Events that can occur in a conversation

use super::state::StagedReply;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Session created, nothing said yet
    SessionStarted,

    // User events
    UserSubmit {
        text: String,
    },
    /// A quick-reply topic was picked; fills the draft only
    QuickReplySelected {
        topic: String,
    },
    DraftEdited {
        text: String,
    },

    // Scheduled events
    StagedReplyDue {
        reply: StagedReply,
    },

    // Answer events
    AnswerReady {
        text: String,
    },
}

impl Event {
    pub fn user_submit(text: impl Into<String>) -> Self {
        Event::UserSubmit { text: text.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted => "session_started",
            Event::UserSubmit { .. } => "user_submit",
            Event::QuickReplySelected { .. } => "quick_reply_selected",
            Event::DraftEdited { .. } => "draft_edited",
            Event::StagedReplyDue { .. } => "staged_reply_due",
            Event::AnswerReady { .. } => "answer_ready",
        }
    }
}
