//! Conversation runtime executor

use super::traits::AnswerClient;
use super::{SessionView, SseEvent};
use crate::persona;
use crate::state_machine::state::{
    AnswerRequest, StagedReply, ANSWER_REVEAL_DELAY, FOLLOW_UP_DELAY, WELCOME_DELAY,
};
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event, TransitionError};
use crate::transcript::Transcript;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Conversation runtime, generic over the answer client
pub struct SessionRuntime<C>
where
    C: AnswerClient + 'static,
{
    context: ConvContext,
    state: ConvState,
    transcript: Transcript,
    answer_client: Arc<C>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    view_tx: watch::Sender<SessionView>,
    /// Session teardown; parent of every timer and answer task token
    cancel: CancellationToken,
}

impl<C> SessionRuntime<C>
where
    C: AnswerClient + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: ConvContext,
        state: ConvState,
        transcript: Transcript,
        answer_client: C,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<SseEvent>,
        view_tx: watch::Sender<SessionView>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            context,
            state,
            transcript,
            answer_client: Arc::new(answer_client),
            event_rx,
            event_tx,
            broadcast_tx,
            view_tx,
            cancel,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting conversation runtime");

        self.process_event(Event::SessionStarted);

        loop {
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => break,

                event = self.event_rx.recv() => match event {
                    Some(event) => self.process_event(event),
                    None => break,
                },
            }
        }

        tracing::info!(
            session_id = %self.context.session_id,
            messages = self.transcript.len(),
            last_sender = ?self.transcript.last().map(|m| m.sender),
            "Conversation runtime stopped"
        );
    }

    fn process_event(&mut self, event: Event) {
        let kind = event.kind();
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(TransitionError::RequestPending) => {
                // The submit control is disabled while loading; anything that
                // slips through is dropped without a trace in the transcript
                tracing::debug!(event = kind, "Input rejected, request outstanding");
                return;
            }
            Err(e) => {
                tracing::warn!(event = kind, error = %e, "Transition rejected");
                let _ = self.broadcast_tx.send(SseEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
        };

        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    /// Execute an effect. Long-running work is spawned and reports back
    /// through `event_tx`.
    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage { sender, text } => {
                let message = self.transcript.append(sender, text);
                tracing::debug!(seq = message.seq, sender = ?message.sender, "Message appended");
            }

            Effect::PublishView => {
                let view = SessionView::build(&self.context, &self.state, &self.transcript);
                let status = view.status.clone();
                self.view_tx.send_replace(view);
                let _ = self.broadcast_tx.send(SseEvent::StateChange { status });
            }

            Effect::ScheduleStagedReplies { user_name } => {
                let variant = rand::thread_rng().gen_range(0..persona::welcome_template_count());
                let welcome = persona::welcome_line(variant, &user_name);
                self.spawn_staged_replies(welcome);
            }

            Effect::RequestAnswer { request } => {
                self.spawn_answer(request);
            }
        }
    }

    /// Deliver the welcome line and the capability line, in that order, after
    /// their pacing delays. Both are sent from one task so they cannot swap.
    fn spawn_staged_replies(&self, welcome: String) {
        let token = self.cancel.child_token();
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let sequence = async {
                tokio::time::sleep(WELCOME_DELAY).await;
                let _ = event_tx
                    .send(Event::StagedReplyDue {
                        reply: StagedReply::Welcome { text: welcome },
                    })
                    .await;

                tokio::time::sleep(FOLLOW_UP_DELAY).await;
                let _ = event_tx
                    .send(Event::StagedReplyDue {
                        reply: StagedReply::Capabilities,
                    })
                    .await;
            };

            tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::debug!("Staged replies cancelled");
                }
                () = sequence => {}
            }
        });
    }

    /// Run the answer call in the background. Exactly one `AnswerReady`
    /// event is sent unless the session is torn down first.
    fn spawn_answer(&self, request: AnswerRequest) {
        let token = self.cancel.child_token();
        let event_tx = self.event_tx.clone();
        let client = self.answer_client.clone();

        tokio::spawn(async move {
            tracing::info!(
                question_len = request.question.len(),
                personal = request.first_answer_pending,
                "Requesting answer (background)"
            );

            let mut call = tokio::spawn(async move { client.answer(&request).await });

            let text = tokio::select! {
                biased;

                () = token.cancelled() => {
                    call.abort();
                    tracing::info!("Answer request cancelled");
                    return;
                }

                joined = &mut call => match joined {
                    Ok(answer) => {
                        tracing::debug!(outcome = ?answer.outcome, "Answer ready");
                        answer.text
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Answer task failed");
                        persona::PROCESSING_APOLOGY.to_string()
                    }
                },
            };

            tokio::select! {
                biased;
                () = token.cancelled() => return,
                () = tokio::time::sleep(ANSWER_REVEAL_DELAY) => {}
            }

            let _ = event_tx.send(Event::AnswerReady { text }).await;
        });
    }
}
