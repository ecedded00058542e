//! HTTP client for the passage question-answering service.
//!
//! POSTs `{"question_raw": [question], "top_facts": [passages]}` and
//! expects a batched reply `[[answer, confidence, position, sentence]]`.
//! Timeouts and non-2xx responses surface as `QaError`, which callers
//! treat as "no answer found".

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::ports::{QaAnswer, QaError, TextQa};

/// Configuration for the QA client.
#[derive(Debug, Clone)]
pub struct QaClientConfig {
    /// Service endpoint URL.
    pub url: String,
    /// Per-request timeout. The QA path is latency sensitive, keep short.
    pub timeout: Duration,
}

impl QaClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_millis(1_000),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// reqwest-backed implementation of the [`TextQa`] port.
pub struct HttpTextQa {
    config: QaClientConfig,
    client: Client,
}

impl HttpTextQa {
    pub fn new(config: QaClientConfig) -> Result<Self, QaError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| QaError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn parse_answer(payload: Value) -> Result<QaAnswer, QaError> {
        let row = payload
            .as_array()
            .and_then(|batch| batch.first())
            .and_then(Value::as_array)
            .ok_or_else(|| QaError::Malformed("expected a batched answer row".to_string()))?;
        let answer = row
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| QaError::Malformed("missing answer text".to_string()))?;
        let confidence = row
            .get(1)
            .and_then(Value::as_f64)
            .ok_or_else(|| QaError::Malformed("missing answer confidence".to_string()))?;
        let answer_sentence = row
            .get(3)
            .and_then(Value::as_str)
            .unwrap_or(answer)
            .to_string();
        Ok(QaAnswer {
            answer: answer.to_string(),
            confidence,
            answer_sentence,
        })
    }
}

#[async_trait]
impl TextQa for HttpTextQa {
    async fn answer(&self, question: &str, passages: &[String]) -> Result<QaAnswer, QaError> {
        let body = json!({
            "question_raw": [question],
            "top_facts": [passages],
        });
        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QaError::Timeout
                } else {
                    QaError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QaError::Status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| QaError::Malformed(e.to_string()))?;
        let answer = Self::parse_answer(payload)?;
        debug!(question, confidence = answer.confidence, "qa answer received");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answer_reads_batched_row() {
        let payload = json!([["1882", 0.97, 3, "The club was founded in 1882."]]);
        let answer = HttpTextQa::parse_answer(payload).unwrap();
        assert_eq!(answer.answer, "1882");
        assert_eq!(answer.confidence, 0.97);
        assert_eq!(answer.answer_sentence, "The club was founded in 1882.");
    }

    #[test]
    fn parse_answer_falls_back_to_answer_when_sentence_missing() {
        let payload = json!([["1882", 0.97]]);
        let answer = HttpTextQa::parse_answer(payload).unwrap();
        assert_eq!(answer.answer_sentence, "1882");
    }

    #[test]
    fn parse_answer_rejects_malformed_payload() {
        assert!(HttpTextQa::parse_answer(json!({})).is_err());
        assert!(HttpTextQa::parse_answer(json!([])).is_err());
        assert!(HttpTextQa::parse_answer(json!([[42]])).is_err());
    }
}
