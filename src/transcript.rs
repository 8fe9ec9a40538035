//! Append-only conversation transcript

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// A single turn in the transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Random UUID, unique even for messages created in the same instant
    pub id: String,
    /// 1-based position in the transcript
    pub seq: u64,
    pub text: String,
    pub sender: Sender,
    /// Local wall-clock time, `HH:MM:SS`
    pub timestamp: String,
}

/// Observer notified on every append (re-render and scroll to newest)
pub trait TranscriptListener: Send + Sync {
    fn on_append(&self, message: &Message);
}

impl<T: TranscriptListener + ?Sized> TranscriptListener for Arc<T> {
    fn on_append(&self, message: &Message) {
        (**self).on_append(message);
    }
}

/// Ordered message log. There is no way to remove or reorder entries.
pub struct Transcript {
    messages: Vec<Message>,
    listener: Option<Arc<dyn TranscriptListener>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            listener: None,
        }
    }

    pub fn with_listener(listener: Arc<dyn TranscriptListener>) -> Self {
        Self {
            messages: Vec::new(),
            listener: Some(listener),
        }
    }

    /// Create a message from `sender` and append it at the end.
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> &Message {
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            seq: self.messages.len() as u64 + 1,
            text: text.into(),
            sender,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        };

        if let Some(listener) = &self.listener {
            listener.on_append(&message);
        }
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
