//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::persona;
use crate::transcript::Sender;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ConvContext {
    ConvContext::new("test-session")
}

fn appended_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::AppendMessage { .. }))
        .count()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,10}"
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,6}"
}

fn arb_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::AwaitingName),
        arb_name().prop_map(|user_name| Phase::Chatting { user_name }),
    ]
}

/// Any state reachable through the public events
fn arb_state() -> impl Strategy<Value = ConvState> {
    (arb_phase(), any::<bool>(), any::<bool>(), "[a-z ]{0,10}").prop_map(
        |(phase, first_answer_pending, pending_request, draft)| {
            // No request can be outstanding before a name is known
            let pending_request = pending_request && matches!(phase, Phase::Chatting { .. });
            ConvState {
                phase,
                first_answer_pending,
                pending_request,
                draft,
            }
        },
    )
}

fn arb_chatting_state() -> impl Strategy<Value = ConvState> {
    (arb_name(), any::<bool>()).prop_map(|(user_name, first_answer_pending)| ConvState {
        phase: Phase::Chatting { user_name },
        first_answer_pending,
        pending_request: false,
        draft: String::new(),
    })
}

fn arb_staged_reply() -> impl Strategy<Value = StagedReply> {
    prop_oneof![
        "[a-zA-Z !]{1,30}".prop_map(|text| StagedReply::Welcome { text }),
        Just(StagedReply::Capabilities),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ]{0,30}".prop_map(Event::user_submit),
        arb_blank().prop_map(Event::user_submit),
        "[a-zA-Z ]{1,30}".prop_map(|text| Event::AnswerReady { text }),
        arb_staged_reply().prop_map(|reply| Event::StagedReplyDue { reply }),
        proptest::sample::select(persona::QUICK_REPLIES.to_vec())
            .prop_map(|topic| Event::QuickReplySelected { topic: topic.to_string() }),
        "[a-z ]{0,10}".prop_map(|text| Event::DraftEdited { text }),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: the phase never moves back and the name never changes
    #[test]
    fn prop_phase_is_one_way(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ConvState::default();
        let ctx = test_context();
        let mut captured: Option<String> = None;

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
                let now = state.user_name().map(String::from);
                if captured.is_some() {
                    prop_assert_eq!(&captured, &now);
                } else {
                    captured = now;
                }
            }
        }
    }

    // Invariant 2: at most one remote call is ever outstanding
    #[test]
    fn prop_single_outstanding_request(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ConvState::default();
        let ctx = test_context();

        for event in events {
            let was_pending = state.pending_request;
            if let Ok(result) = transition(&state, &ctx, event) {
                let requests = result
                    .effects
                    .iter()
                    .filter(|e| matches!(e, Effect::RequestAnswer { .. }))
                    .count();
                prop_assert!(requests <= 1);
                if was_pending {
                    prop_assert_eq!(requests, 0, "Second request while one is outstanding");
                }
                if requests == 1 {
                    prop_assert!(result.new_state.pending_request);
                }
                state = result.new_state;
            }
        }
    }

    // Invariant 3: blank submissions change nothing in any state
    #[test]
    fn prop_blank_submit_is_noop(state in arb_state(), blank in arb_blank()) {
        let result = transition(&state, &test_context(), Event::user_submit(blank));
        prop_assert!(result.is_ok());
        let result = result.unwrap();
        prop_assert!(result.effects.is_empty());
        prop_assert_eq!(result.new_state, state);
    }

    // Invariant 4: a pending request rejects every non-blank submission
    #[test]
    fn prop_pending_rejects_submit(state in arb_chatting_state(), text in "[a-zA-Z]{1,20}") {
        let state = ConvState { pending_request: true, ..state };
        let result = transition(&state, &test_context(), Event::user_submit(text));
        prop_assert_eq!(result.unwrap_err(), TransitionError::RequestPending);
    }

    // Invariant 5: name capture appends exactly the user's message and
    // schedules the welcome sequence
    #[test]
    fn prop_name_capture(name in arb_name(), pad in arb_blank()) {
        let text = format!("{pad}{name}{pad}");
        let result = transition(&ConvState::default(), &test_context(), Event::user_submit(text)).unwrap();

        prop_assert_eq!(result.new_state.user_name(), Some(name.as_str()));
        prop_assert_eq!(appended_count(&result.effects), 1);
        prop_assert!(
            matches!(
                result.effects.first(),
                Some(Effect::AppendMessage { sender: Sender::User, text }) if *text == name
            ),
            "User message must come first: {:?}",
            result.effects
        );
        let expected = Effect::ScheduleStagedReplies { user_name: name };
        prop_assert!(result.effects.contains(&expected));
    }

    // Invariant 6: input-field events never touch the transcript
    #[test]
    fn prop_draft_events_never_append(
        state in arb_state(),
        topic in proptest::sample::select(persona::QUICK_REPLIES.to_vec()),
        text in "[a-z ]{0,10}",
    ) {
        for event in [
            Event::QuickReplySelected { topic: topic.to_string() },
            Event::DraftEdited { text: text.clone() },
        ] {
            let result = transition(&state, &test_context(), event).unwrap();
            prop_assert_eq!(appended_count(&result.effects), 0);
            prop_assert_eq!(&result.new_state.phase, &state.phase);
            prop_assert_eq!(result.new_state.pending_request, state.pending_request);
        }
    }

    // Invariant 7: the personalization flag handed to the answer call is the
    // one in effect when the question was asked
    #[test]
    fn prop_request_carries_personalization(state in arb_chatting_state(), q in "[a-zA-Z]{1,20}") {
        let result = transition(&state, &test_context(), Event::user_submit(q.clone())).unwrap();
        let request = result.effects.iter().find_map(|e| match e {
            Effect::RequestAnswer { request } => Some(request.clone()),
            _ => None,
        });
        prop_assert_eq!(
            request,
            Some(AnswerRequest {
                question: q,
                user_name: state.user_name().map(String::from),
                first_answer_pending: state.first_answer_pending,
            })
        );
    }
}
