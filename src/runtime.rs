//! Runtime for executing the conversation
//!
//! One runtime task owns the conversation state and the transcript. Events
//! arrive over an mpsc channel and are processed one at a time; timers and
//! answer calls run as spawned tasks that report back with events.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::answer::AnswerService;
use crate::persona;
use crate::state_machine::{ConvContext, ConvState, Event};
use crate::transcript::{Message, Transcript, TranscriptListener};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Message { message: Message },
    StateChange { status: SessionStatus },
    Error { message: String },
}

/// Everything the front-end needs besides the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub title: &'static str,
    pub subtitle: String,
    pub phase: &'static str,
    pub user_name: Option<String>,
    /// A request is outstanding; show the thinking indicator and disable submit
    pub loading: bool,
    pub thinking_label: &'static str,
    pub draft: String,
    pub input_placeholder: &'static str,
    /// Empty until the user's name is known
    pub quick_replies: Vec<&'static str>,
}

impl SessionStatus {
    pub fn from_state(context: &ConvContext, state: &ConvState) -> Self {
        let user_name = state.user_name();
        Self {
            session_id: context.session_id.clone(),
            title: persona::TITLE,
            subtitle: persona::subtitle(user_name),
            phase: state.phase.as_str(),
            user_name: user_name.map(String::from),
            loading: state.pending_request,
            thinking_label: persona::THINKING_LABEL,
            draft: state.draft.clone(),
            input_placeholder: persona::input_placeholder(user_name.is_some()),
            quick_replies: if user_name.is_some() {
                persona::QUICK_REPLIES.to_vec()
            } else {
                Vec::new()
            },
        }
    }
}

/// Snapshot of the session: status plus the full transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub status: SessionStatus,
    pub messages: Vec<Message>,
}

impl SessionView {
    pub fn build(context: &ConvContext, state: &ConvState, transcript: &Transcript) -> Self {
        Self {
            status: SessionStatus::from_state(context, state),
            messages: transcript.all().to_vec(),
        }
    }
}

/// Forwards every transcript append to SSE subscribers
struct BroadcastListener {
    tx: broadcast::Sender<SseEvent>,
}

impl TranscriptListener for BroadcastListener {
    fn on_append(&self, message: &Message) {
        // No subscribers is fine
        let _ = self.tx.send(SseEvent::Message {
            message: message.clone(),
        });
    }
}

/// Handle to interact with the running conversation
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    view_rx: watch::Receiver<SessionView>,
    cancel: CancellationToken,
}

impl SessionHandle {
    /// Start the production runtime in the background
    pub fn start(
        session_id: impl Into<String>,
        service: Arc<dyn AnswerService>,
        answer_timeout: Duration,
    ) -> Self {
        let client = ServiceAnswerClient::new(service, answer_timeout);
        Self::start_with_client(ConvContext::new(session_id), client)
    }

    /// Start a runtime with any answer client
    pub fn start_with_client<C: AnswerClient + 'static>(context: ConvContext, client: C) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let cancel = CancellationToken::new();

        let state = ConvState::default();
        let transcript = Transcript::with_listener(Arc::new(BroadcastListener {
            tx: broadcast_tx.clone(),
        }));
        let (view_tx, view_rx) = watch::channel(SessionView::build(&context, &state, &transcript));

        let runtime = SessionRuntime::new(
            context,
            state,
            transcript,
            client,
            event_rx,
            event_tx.clone(),
            broadcast_tx.clone(),
            view_tx,
            cancel.clone(),
        );

        tokio::spawn(async move {
            runtime.run().await;
        });

        Self {
            event_tx,
            broadcast_tx,
            view_rx,
            cancel,
        }
    }

    /// Send an event to the conversation
    pub async fn send_event(&self, event: Event) -> Result<(), String> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {e}"))
    }

    /// Subscribe to conversation updates
    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Latest published snapshot
    pub fn view(&self) -> SessionView {
        self.view_rx.borrow().clone()
    }

    /// Watch receiver for waiting on view changes
    pub fn watch(&self) -> watch::Receiver<SessionView> {
        self.view_rx.clone()
    }

    /// Tear the session down. Staged replies and in-flight answers are
    /// cancelled and the runtime loop exits.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
