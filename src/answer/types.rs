//! Wire shape of the answer service reply

use serde_json::Value;

/// Reply of one answer call, after the body has been parsed as JSON
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceReply {
    /// The service handled the call but reported a failure
    Error { message: String },
    /// Answer payload. Its shape is not fixed: plain text, an object, or a
    /// string that itself holds JSON.
    Answer { payload: Value },
}

impl ServiceReply {
    /// Classify a reply body.
    ///
    /// A truthy `error` field wins over everything else. A body without an
    /// error and without a `response` payload is treated as an error too.
    pub fn from_body(body: Value) -> Self {
        let Value::Object(mut map) = body else {
            return Self::Error {
                message: "reply body is not an object".to_string(),
            };
        };

        if let Some(error) = map.get("error").filter(|e| is_truthy(e)) {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Self::Error { message };
        }

        match map.remove("response") {
            Some(payload) if !payload.is_null() => Self::Answer { payload },
            _ => Self::Error {
                message: "reply carries neither error nor response".to_string(),
            },
        }
    }

    pub fn answer(payload: impl Into<Value>) -> Self {
        Self::Answer {
            payload: payload.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Loose truthiness as used by the service: null, false, 0 and "" are false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
