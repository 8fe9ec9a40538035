//! Pure state transition function
//!
//! Given the same state and event this always produces the same new state
//! and effects. All I/O happens in the runtime that executes the effects.

use super::state::{AnswerRequest, StagedReply};
use super::{ConvContext, ConvState, Effect, Event, Phase};
use crate::persona;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A request is outstanding, cannot accept input")]
    RequestPending,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: &ConvState,
    _context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (&state.phase, event) {
        // ============================================================
        // Session start
        // ============================================================
        (Phase::AwaitingName, Event::SessionStarted) => Ok(TransitionResult::new(state.clone())
            .with_effect(Effect::bot_message(persona::GREETING))
            .with_effect(Effect::PublishView)),

        (Phase::Chatting { .. }, Event::SessionStarted) => Err(
            TransitionError::InvalidTransition("session already started".to_string()),
        ),

        // ============================================================
        // Submissions
        // ============================================================

        // Empty input is ignored in every phase
        (_, Event::UserSubmit { text }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(state.clone()))
        }

        (_, Event::UserSubmit { .. }) if !state.accepts_input() => {
            Err(TransitionError::RequestPending)
        }

        // Name capture: one-way move to Chatting, welcome sequence follows
        (Phase::AwaitingName, Event::UserSubmit { text }) => {
            let name = text.trim().to_string();
            let new_state = ConvState {
                phase: Phase::Chatting {
                    user_name: name.clone(),
                },
                draft: String::new(),
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state).with_effects([
                Effect::user_message(name.clone()),
                Effect::PublishView,
                Effect::ScheduleStagedReplies { user_name: name },
            ]))
        }

        (Phase::Chatting { user_name }, Event::UserSubmit { text }) => {
            let question = text.trim().to_string();
            let request = AnswerRequest {
                question: question.clone(),
                user_name: Some(user_name.clone()),
                first_answer_pending: state.first_answer_pending,
            };
            let new_state = ConvState {
                pending_request: true,
                draft: String::new(),
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state).with_effects([
                Effect::user_message(question),
                Effect::PublishView,
                Effect::RequestAnswer { request },
            ]))
        }

        // ============================================================
        // Staged welcome replies
        // ============================================================
        (Phase::Chatting { .. }, Event::StagedReplyDue { reply }) => match reply {
            StagedReply::Welcome { text } => Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::bot_message(text))
                .with_effect(Effect::PublishView)),
            StagedReply::Capabilities => {
                let new_state = ConvState {
                    first_answer_pending: false,
                    ..state.clone()
                };
                Ok(TransitionResult::new(new_state)
                    .with_effect(Effect::bot_message(persona::CAPABILITIES))
                    .with_effect(Effect::PublishView))
            }
        },

        (Phase::AwaitingName, Event::StagedReplyDue { .. }) => Err(
            TransitionError::InvalidTransition("staged reply before name capture".to_string()),
        ),

        // ============================================================
        // Answers
        // ============================================================
        (Phase::Chatting { .. }, Event::AnswerReady { text }) if state.pending_request => {
            let new_state = ConvState {
                pending_request: false,
                first_answer_pending: false,
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::bot_message(text))
                .with_effect(Effect::PublishView))
        }

        (_, Event::AnswerReady { .. }) => Err(TransitionError::InvalidTransition(
            "answer without outstanding request".to_string(),
        )),

        // ============================================================
        // Input field
        // ============================================================

        // Quick replies are only offered once the name is known
        (Phase::AwaitingName, Event::QuickReplySelected { .. }) => {
            Ok(TransitionResult::new(state.clone()))
        }

        (Phase::Chatting { .. }, Event::QuickReplySelected { topic }) => {
            let new_state = ConvState {
                draft: topic,
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state).with_effect(Effect::PublishView))
        }

        (_, Event::DraftEdited { text }) => {
            let new_state = ConvState {
                draft: text,
                ..state.clone()
            };
            Ok(TransitionResult::new(new_state).with_effect(Effect::PublishView))
        }
    }
}
