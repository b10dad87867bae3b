//! HTTP implementation of the answer service

use super::{AnswerPayload, AnswerService, HistoryEntry, TransportError};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;

/// Route appended to the configured base address
const ANSWER_ROUTE: &str = "/api/GenerateAnswerWithAOAI";

/// Answer service speaking the HTTP/JSON wire protocol
pub struct HttpAnswerService {
    client: Client,
    endpoint: String,
}

impl HttpAnswerService {
    /// Build the service from startup configuration. The base address is
    /// resolved here, once; only the fixed route is appended.
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{ANSWER_ROUTE}", config.api_base.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn generate(&self, history: &[HistoryEntry]) -> Result<String, TransportError> {
        let start = std::time::Instant::now();

        let result = self.request(history).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    entries = history.len(),
                    "answer request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "answer request failed"
                );
            }
        }

        result
    }
}

impl HttpAnswerService {
    async fn request(&self, history: &[HistoryEntry]) -> Result<String, TransportError> {
        let response = self.client.post(&self.endpoint).json(history).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let payload: AnswerPayload = serde_json::from_str(&body)?;
        Ok(payload.answer)
    }
}
