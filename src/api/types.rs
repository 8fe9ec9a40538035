//! API request and response types

use serde::{Deserialize, Serialize};

/// Request to submit the input field
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

/// Request to pick one of the quick-reply topics
#[derive(Debug, Deserialize)]
pub struct QuickReplyRequest {
    pub topic: String,
}

/// Request to replace the input field content
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

/// Response for a submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub queued: bool,
}

/// Input field content after the action
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
