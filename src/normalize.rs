//! Response normalization
//!
//! Turns a loosely shaped answer-service reply into display-ready text:
//! instruction building on the way out, payload decoding, answer field
//! extraction and name sanitization on the way back.

use crate::answer::{AnswerError, ServiceReply};
use crate::persona;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use thiserror::Error;

/// Answer fields tried in order on a structured payload
const ANSWER_FIELDS: [&str; 3] = ["answer", "antwort", "response"];

/// Personalization inputs shared by instruction building and sanitization
#[derive(Debug, Clone, Copy)]
pub struct AnswerContext<'a> {
    pub user_name: Option<&'a str>,
    pub first_answer_pending: bool,
}

impl AnswerContext<'_> {
    /// Name usage is allowed only while the first answer is pending
    fn personal_name(&self) -> Option<&str> {
        self.user_name.filter(|_| self.first_answer_pending)
    }

    fn name_to_strip(&self) -> Option<&str> {
        self.user_name
            .filter(|n| !self.first_answer_pending && !n.trim().is_empty())
    }
}

/// Build the outbound instruction for `question`.
pub fn build_instruction(question: &str, ctx: &AnswerContext<'_>) -> String {
    match ctx.personal_name() {
        Some(name) => persona::personal_instruction(name, question),
        None => persona::impersonal_instruction(question),
    }
}

/// Result of one answer round trip, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub outcome: AnswerOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Answered,
    ServiceError,
    TransportFailure,
}

impl Answer {
    fn fixed(text: &str, outcome: AnswerOutcome) -> Self {
        Self {
            text: text.to_string(),
            outcome,
        }
    }

    pub fn transport_failure() -> Self {
        Self::fixed(persona::TRANSPORT_APOLOGY, AnswerOutcome::TransportFailure)
    }

    pub fn service_error() -> Self {
        Self::fixed(persona::SERVICE_ERROR_APOLOGY, AnswerOutcome::ServiceError)
    }
}

/// Local extraction failure. Never shown to the user.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to render structured payload: {0}")]
    Render(#[from] serde_json::Error),
}

/// Payload after the explicit decode step
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerPayload {
    /// JSON object or array, either sent directly or string-encoded
    Structured(Value),
    /// Anything else, as text
    Text(String),
}

impl AnswerPayload {
    /// Decode a raw payload.
    ///
    /// A string is parsed once as JSON and becomes `Structured` only if that
    /// yields an object or array; otherwise the string is kept verbatim.
    pub fn decode(payload: &Value) -> Self {
        match payload {
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(inner @ (Value::Object(_) | Value::Array(_))) => Self::Structured(inner),
                _ => Self::Text(s.clone()),
            },
            Value::Object(_) | Value::Array(_) => Self::Structured(payload.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Pull the answer text out of the payload
    pub fn extract_text(&self) -> Result<String, NormalizeError> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Structured(value) => {
                if let Value::Object(map) = value {
                    if let Some(text) = ANSWER_FIELDS
                        .iter()
                        .find_map(|field| map.get(*field).and_then(field_text))
                    {
                        return Ok(text);
                    }
                }
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }
}

/// Text of an answer field, if the field counts as present.
///
/// Empty strings, `null` and `false` are skipped; any other value is
/// rendered as JSON.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null | Value::Bool(false) => None,
        other => serde_json::to_string_pretty(other).ok(),
    }
}

/// The payload as plain text, without any decoding
fn raw_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Remove the user's name from `text` when the context forbids using it.
///
/// Whole-word, case-insensitive matches are dropped, then leading and
/// trailing commas and whitespace left behind are trimmed.
pub fn sanitize(text: &str, ctx: &AnswerContext<'_>) -> String {
    let Some(name) = ctx.name_to_strip() else {
        return text.to_string();
    };

    let Some(pattern) = name_pattern(name) else {
        return text.to_string();
    };

    pattern
        .replace_all(text, "")
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .trim()
        .to_string()
}

fn name_pattern(name: &str) -> Option<Regex> {
    match RegexBuilder::new(&format!(r"\b{}\b", regex::escape(name.trim())))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot build name pattern, skipping sanitization");
            None
        }
    }
}

/// Normalize an answer payload into display text.
///
/// Extraction failures fall back to the raw payload text; sanitization is
/// applied either way.
pub fn normalize_payload(payload: &Value, ctx: &AnswerContext<'_>) -> String {
    let text = match AnswerPayload::decode(payload).extract_text() {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "Answer extraction failed, using raw payload");
            raw_text(payload)
        }
    };
    sanitize(&text, ctx)
}

/// Map the outcome of a remote call to the text appended to the transcript.
pub fn normalize_reply(
    result: Result<ServiceReply, AnswerError>,
    ctx: &AnswerContext<'_>,
) -> Answer {
    match result {
        Ok(ServiceReply::Answer { payload }) => Answer {
            text: normalize_payload(&payload, ctx),
            outcome: AnswerOutcome::Answered,
        },
        Ok(ServiceReply::Error { .. }) => Answer::service_error(),
        Err(_) => Answer::transport_failure(),
    }
}
