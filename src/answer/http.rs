//! HTTP answer service
//!
//! Talks to the sustainability backend: one GET per question, with the full
//! instruction percent-encoded into the last path segment.

use super::types::ServiceReply;
use super::{AnswerError, AnswerService};
use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde_json::Value;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Answer service backed by the remote HTTP endpoint
pub struct HttpAnswerService {
    client: Client,
    base_url: Url,
}

impl HttpAnswerService {
    pub fn new(base_url: Url) -> Result<Self, AnswerError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AnswerError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, instruction: &str) -> Result<Url, AnswerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AnswerError::network(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["ai", "sustainability", instruction]);
        Ok(url)
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, instruction: &str) -> Result<ServiceReply, AnswerError> {
        let url = self.endpoint(instruction)?;

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        // Errors are reported in the body, often with a 5xx status, so the
        // body is read regardless of the status code.
        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            AnswerError::decode(format!("Failed to parse reply (status {status}): {e}"))
        })?;

        if !status.is_success() {
            tracing::debug!(status = %status, "Answer service returned non-success status");
        }

        Ok(ServiceReply::from_body(body))
    }

    fn name(&self) -> &str {
        self.base_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base: &str) -> HttpAnswerService {
        HttpAnswerService::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_instruction() {
        let svc = service("http://localhost:3000");
        let url = svc.endpoint("Frage: Bahn oder Auto?").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/ai/sustainability/Frage:%20Bahn%20oder%20Auto%3F"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let svc = service("http://example.test/greenbot/");
        let url = svc.endpoint("a/b").unwrap();
        assert_eq!(
            url.as_str(),
            "http://example.test/greenbot/ai/sustainability/a%2Fb"
        );
    }
}
