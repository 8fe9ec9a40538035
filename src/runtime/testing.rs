//! Mock implementations for testing
//!
//! These mocks drive a real runtime without any network I/O.

use super::{SessionHandle, SessionView};
use crate::answer::{AnswerError, AnswerService, ServiceReply};
use crate::state_machine::Event;
use crate::transcript::Message;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Answer Service
// ============================================================================

/// Answer service returning queued replies, optionally after a delay
pub struct MockAnswerService {
    replies: Mutex<VecDeque<Result<ServiceReply, AnswerError>>>,
    delay: Option<Duration>,
    /// Record of every instruction sent
    pub instructions: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockAnswerService {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            delay: None,
            instructions: Mutex::new(Vec::new()),
        }
    }

    /// Sleep this long before every reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_reply(&self, reply: ServiceReply) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    pub fn queue_error(&self, error: AnswerError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }
}

impl Default for MockAnswerService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, instruction: &str) -> Result<ServiceReply, AnswerError> {
        self.instructions
            .lock()
            .unwrap()
            .push(instruction.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AnswerError::network("No mock reply queued")))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Test Session
// ============================================================================

/// A running session wired to a mock service
pub struct TestSession {
    pub handle: Arc<SessionHandle>,
    pub service: Arc<MockAnswerService>,
}

impl TestSession {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> TestSessionBuilder {
        TestSessionBuilder {
            service: MockAnswerService::new(),
            answer_timeout: Duration::from_secs(60),
        }
    }

    pub async fn send(&self, event: Event) {
        self.handle.send_event(event).await.unwrap();
    }

    pub async fn submit(&self, text: &str) {
        self.send(Event::user_submit(text)).await;
    }

    pub fn messages(&self) -> Vec<Message> {
        self.handle.view().messages
    }

    /// Wait for the greeting, submit `name` and wait for the welcome sequence
    pub async fn capture_name(&self, name: &str) {
        assert!(self.wait_for_messages(1, Duration::from_secs(10)).await);
        self.submit(name).await;
        assert!(self.wait_for_messages(4, Duration::from_secs(10)).await);
    }

    pub async fn wait_for_messages(&self, count: usize, timeout: Duration) -> bool {
        self.wait_until(|view| view.messages.len() >= count, timeout)
            .await
    }

    pub async fn wait_for_loading(&self, loading: bool, timeout: Duration) -> bool {
        self.wait_until(|view| view.status.loading == loading, timeout)
            .await
    }

    pub async fn wait_for_draft(&self, draft: &str, timeout: Duration) -> bool {
        self.wait_until(|view| view.status.draft == draft, timeout)
            .await
    }

    async fn wait_until<F>(&self, predicate: F, timeout: Duration) -> bool
    where
        F: Fn(&SessionView) -> bool,
    {
        let mut rx = self.handle.watch();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if predicate(&rx.borrow_and_update()) {
                return true;
            }
            match tokio::time::timeout_at(deadline, rx.changed()).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) | Err(_) => return false,
            }
        }
    }
}

pub struct TestSessionBuilder {
    service: MockAnswerService,
    answer_timeout: Duration,
}

impl TestSessionBuilder {
    pub fn service(mut self, service: MockAnswerService) -> Self {
        self.service = service;
        self
    }

    pub fn answer_timeout(mut self, timeout: Duration) -> Self {
        self.answer_timeout = timeout;
        self
    }

    pub fn build(self) -> TestSession {
        let service = Arc::new(self.service);
        let handle = Arc::new(SessionHandle::start(
            "test-session",
            service.clone(),
            self.answer_timeout,
        ));
        TestSession { handle, service }
    }
}
