// Message types exchanged between the TUI, the app orchestrator, and
// background request tasks.

use crate::chat::ChatMessage;
use crate::classify::QueryKind;

// ---------------------------------------------------------------------------
// Request task -> app
// ---------------------------------------------------------------------------

/// Events emitted by a background `/ask` or `/health` task.
///
/// Request events carry the generation of the task that produced them so the
/// app can discard events from a superseded request.
#[derive(Debug, Clone, PartialEq)]
pub enum AskEvent {
    /// A transport failure occurred and the request will be resent.
    Retrying {
        attempt: u32,
        max: u32,
        message: String,
        generation: u64,
    },
    /// The assistant answered.
    Answered {
        answer: String,
        processing_time: Option<String>,
        generation: u64,
    },
    /// The request ended without an answer.
    Failed { message: String, generation: u64 },
    /// Result of a `/health` probe.
    Health(ServiceStatus),
}

impl AskEvent {
    /// Generation of the request that produced this event, if it came from one.
    pub fn generation(&self) -> Option<u64> {
        match self {
            AskEvent::Retrying { generation, .. }
            | AskEvent::Answered { generation, .. }
            | AskEvent::Failed { generation, .. } => Some(*generation),
            AskEvent::Health(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Raw input text; validation happens in the app.
    Submit(String),
    /// Empty the transcript and reset the visualization.
    Clear,
    /// Re-probe the service health endpoint.
    CheckHealth,
    Quit,
}

// ---------------------------------------------------------------------------
// App -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    MessageAppended(Box<ChatMessage>),
    TranscriptCleared,
    RequestStatus(RequestStatus),
    /// Replace the error/notice line.
    Error(String),
    ErrorCleared,
    Notify(Notification),
    /// Show the sample visualization for a kind, or hide it with `None`.
    Visualization(Option<QueryKind>),
    ServiceStatus(ServiceStatus),
}

/// Lifecycle of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Pending,
    Retrying { attempt: u32, max: u32 },
}

/// Last known reachability of the assistant service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Unknown,
    Healthy,
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Short-lived toast shown above the input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Notification {
            text: text.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notification {
            text: text.into(),
            level: NotificationLevel::Error,
        }
    }
}
