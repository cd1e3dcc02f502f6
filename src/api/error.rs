// Error classes for a question submission and their user-facing copy.

use thiserror::Error;

/// Terminal copy once the retry bound is exhausted.
pub const NETWORK_GIVE_UP_MESSAGE: &str =
    "Network error: Unable to connect to server. Please check your internet connection and try again.";

pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AskError {
    /// Local validation failure; no request was made.
    #[error("question is empty")]
    EmptyQuestion,

    /// The server answered with a non-success HTTP status.
    #[error("server returned status {status}")]
    Server { status: u16, detail: Option<String> },

    /// The server answered 2xx but the payload carried an `error` field.
    #[error("assistant reported an error: {0}")]
    Payload(String),

    /// The response body was not the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built (bad URL and the like).
    #[error("invalid request: {0}")]
    Request(String),

    /// No response received: connect failure, timeout, reset.
    #[error("no response from server: {0}")]
    Transport(String),
}

impl AskError {
    /// Only transport failures are resent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AskError::Transport(_))
    }

    /// Copy shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            AskError::EmptyQuestion => EMPTY_QUESTION_MESSAGE.to_string(),
            AskError::Server { status, detail } => server_message(*status, detail.as_deref()),
            AskError::Payload(message) => format!("Error: {message}"),
            AskError::Decode(message) | AskError::Request(message) => format!("Error: {message}"),
            AskError::Transport(_) => NETWORK_GIVE_UP_MESSAGE.to_string(),
        }
    }
}

/// Status-coded copy. 400, 500 and 503 get fixed text; anything else shows
/// the server-provided detail.
pub fn server_message(status: u16, detail: Option<&str>) -> String {
    let suffix = match status {
        400 => "Invalid request. Please check your question format.".to_string(),
        500 => "Internal server error. Please try again later.".to_string(),
        503 => "Service temporarily unavailable. Please try again.".to_string(),
        _ => detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("Unexpected response from server")
            .to_string(),
    };
    format!("Server error ({status}): {suffix}")
}

/// Progress notice for retry `attempt` of `max`.
pub fn retry_notice(attempt: u32, max: u32) -> String {
    format!("Network error (Attempt {attempt}/{max}): Retrying...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
