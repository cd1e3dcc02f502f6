// Chat transcript: the ordered list of messages shown for the current session.

use chrono::{DateTime, Local};

use crate::api::AskError;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
    /// Server-reported processing time, already formatted for display.
    pub processing_time: Option<String>,
}

impl ChatMessage {
    /// Local wall-clock time in `HH:MM:SS`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// In-memory transcript. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(Sender::User, text.into(), None)
    }

    pub fn push_bot(&mut self, text: impl Into<String>, processing_time: Option<String>) -> &ChatMessage {
        self.push(Sender::Bot, text.into(), processing_time)
    }

    fn push(&mut self, sender: Sender, text: String, processing_time: Option<String>) -> &ChatMessage {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            sender,
            text,
            timestamp: Local::now(),
            processing_time,
        });
        // just pushed, so last() is Some
        &self.messages[self.messages.len() - 1]
    }

    /// Drop every message. Ids keep increasing so a cleared transcript never
    /// reuses an id.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn count_from(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.sender == sender).count()
    }
}

/// Reject empty or whitespace-only input before anything touches the network.
/// Returns the trimmed question on success.
pub fn validate_question(input: &str) -> Result<String, AskError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AskError::EmptyQuestion);
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
