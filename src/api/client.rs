// HTTP client for the assistant service.
//
// Sends `{ "question": ... }` to `POST {base}/ask` and decodes
// `{ answer?, error?, processing_time? }`. Failures are mapped into `AskError`
// classes; retrying is the caller's concern (see `retry.rs`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::AskError;
use crate::config::Config;

/// Shown when the service answers without an `answer` field.
pub const NO_RESPONSE_TEXT: &str = "No response received.";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub processing_time: Option<Value>,
}

/// A decoded, successful answer ready for the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub processing_time: Option<String>,
}

impl AskResponse {
    /// Interpret a 2xx payload. An `error` field wins over `answer`.
    pub fn into_answer(self) -> Result<Answer, AskError> {
        if let Some(error) = self.error {
            return Err(AskError::Payload(error));
        }
        let processing_time = self.processing_time.as_ref().and_then(processing_time_label);
        let text = match self.answer {
            Some(answer) if !answer.is_empty() => answer,
            _ => NO_RESPONSE_TEXT.to_string(),
        };
        Ok(Answer {
            text,
            processing_time,
        })
    }
}

/// Format a server-reported processing time. Strings pass through, numbers
/// get an `s` suffix, anything else is dropped.
pub fn processing_time_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(format!("{n}s")),
        _ => None,
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

// ---------------------------------------------------------------------------
// AskBackend
// ---------------------------------------------------------------------------

/// Anything that can answer a question. `AskClient` talks HTTP; tests plug in
/// scripted implementations.
#[async_trait]
pub trait AskBackend: Send + Sync {
    async fn ask(&self, question: &str) -> Result<AskResponse, AskError>;

    async fn health(&self) -> Result<HealthReport, AskError>;
}

// ---------------------------------------------------------------------------
// AskClient
// ---------------------------------------------------------------------------

pub struct AskClient {
    http: reqwest::Client,
    base_url: String,
}

impl AskClient {
    /// Build a client for `base_url` (without trailing slash) with a fixed
    /// per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AskError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("portfolio-assistant/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AskError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AskError> {
        Self::new(config.api.base_url.clone(), config.api.timeout())
    }

    pub fn ask_url(&self) -> String {
        format!("{}/ask", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

#[async_trait]
impl AskBackend for AskClient {
    async fn ask(&self, question: &str) -> Result<AskResponse, AskError> {
        let url = self.ask_url();
        debug!(%url, "sending question");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AskError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "assistant returned error status");
            let detail = error_detail(&body).or_else(|| status.canonical_reason().map(String::from));
            return Err(AskError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        parse_ask_response(&body)
    }

    async fn health(&self) -> Result<HealthReport, AskError> {
        let response = self
            .http
            .get(self.health_url())
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AskError::Server {
                status: status.as_u16(),
                detail: status.canonical_reason().map(String::from),
            });
        }
        response
            .json::<HealthReport>()
            .await
            .map_err(|e| AskError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A send error means no response arrived, except when the request itself
/// was malformed.
fn map_send_error(err: reqwest::Error) -> AskError {
    if err.is_builder() {
        AskError::Request(err.to_string())
    } else {
        AskError::Transport(err.to_string())
    }
}

pub(crate) fn parse_ask_response(body: &str) -> Result<AskResponse, AskError> {
    serde_json::from_str(body).map_err(|e| AskError::Decode(e.to_string()))
}

/// Pull a human-readable detail out of an error body: `error` first, then
/// FastAPI-style `detail`.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    ["error", "detail"]
        .iter()
        .filter_map(|key| v.get(*key))
        .find_map(|field| field.as_str().map(str::to_string))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
