//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::answer::{AnswerError, AnswerService};
use crate::normalize::{build_instruction, normalize_reply, Answer, AnswerContext};
use crate::state_machine::state::AnswerRequest;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Client producing display-ready answers.
///
/// Never fails: every failure is already mapped to a fixed apology.
#[async_trait]
pub trait AnswerClient: Send + Sync {
    async fn answer(&self, request: &AnswerRequest) -> Answer;
}

#[async_trait]
impl<T: AnswerClient + ?Sized> AnswerClient for Arc<T> {
    async fn answer(&self, request: &AnswerRequest) -> Answer {
        (**self).answer(request).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter running an `AnswerService` through instruction building, a
/// deadline and normalization
pub struct ServiceAnswerClient {
    service: Arc<dyn AnswerService>,
    timeout: Duration,
}

impl ServiceAnswerClient {
    pub fn new(service: Arc<dyn AnswerService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }
}

#[async_trait]
impl AnswerClient for ServiceAnswerClient {
    async fn answer(&self, request: &AnswerRequest) -> Answer {
        let ctx = AnswerContext {
            user_name: request.user_name.as_deref(),
            first_answer_pending: request.first_answer_pending,
        };
        let instruction = build_instruction(&request.question, &ctx);

        let result = match tokio::time::timeout(self.timeout, self.service.ask(&instruction)).await
        {
            Ok(result) => result,
            Err(_) => Err(AnswerError::timeout(format!(
                "No reply within {}s",
                self.timeout.as_secs()
            ))),
        };

        if let Err(e) = &result {
            tracing::warn!(kind = e.kind.as_str(), error = %e, "Answer call failed");
        }

        normalize_reply(result, &ctx)
    }
}
