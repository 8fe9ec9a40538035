//! Remote answer service abstraction
//!
//! The text generation backend is a black box: it takes one instruction
//! string and returns a loosely shaped reply.

mod error;
mod http;
mod types;

pub use error::AnswerError;
pub use http::HttpAnswerService;
pub use types::ServiceReply;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for answer backends
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Send one instruction and wait for the reply
    async fn ask(&self, instruction: &str) -> Result<ServiceReply, AnswerError>;

    /// Human readable backend name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for Arc<T> {
    async fn ask(&self, instruction: &str) -> Result<ServiceReply, AnswerError> {
        (**self).ask(instruction).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logging wrapper for answer services
pub struct LoggingService {
    inner: Arc<dyn AnswerService>,
    name: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn AnswerService>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }
}

#[async_trait]
impl AnswerService for LoggingService {
    async fn ask(&self, instruction: &str) -> Result<ServiceReply, AnswerError> {
        let start = std::time::Instant::now();
        let result = self.inner.ask(instruction).await;
        let duration = start.elapsed();

        match &result {
            Ok(ServiceReply::Answer { .. }) => {
                tracing::info!(
                    backend = %self.name,
                    duration_ms = %duration.as_millis(),
                    instruction_len = instruction.len(),
                    "Answer request completed"
                );
            }
            Ok(ServiceReply::Error { message }) => {
                tracing::warn!(
                    backend = %self.name,
                    duration_ms = %duration.as_millis(),
                    error = %message,
                    "Answer service reported an error"
                );
            }
            Err(e) => {
                tracing::error!(
                    backend = %self.name,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Answer request failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}
